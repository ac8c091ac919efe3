//! Parsing of field annotations such as `"HOST,required,default=localhost"`.
//!
//! An annotation is a comma-separated list of tokens. The first token is the
//! environment variable name; the rest are options:
//!
//! | token | effect |
//! |---|---|
//! | `required` | fail if the raw value is empty (checked before `default`) |
//! | `default=X` | use `X` when the raw value is empty |
//! | `separator=S` | split collection values on `S` (default `,`) |
//! | `type=byte` / `type=rune` | treat the value as single bytes / code points |
//!
//! Repeated options overwrite earlier ones.

use std::fmt;

use crate::error::EnvError;

/// Separator used to split collection values when none is given.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Disambiguates a single-byte or single-code-point field from a plain
/// integer of the same width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeAlias {
    /// `type=byte`: one byte per unit
    Byte,
    /// `type=rune`: one Unicode code point per unit
    Rune,
}

impl TypeAlias {
    fn from_option(value: Option<&str>) -> Option<Self> {
        match value {
            Some("byte") => Some(Self::Byte),
            Some("rune") => Some(Self::Rune),
            _ => None,
        }
    }
}

impl fmt::Display for TypeAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => write!(f, "byte"),
            Self::Rune => write!(f, "rune"),
        }
    }
}

/// Parsed form of one field annotation.
///
/// Borrows from the annotation string; built and dropped within a single
/// resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor<'a> {
    /// Environment variable to read
    pub name: &'a str,
    /// Fail when the raw value is empty
    pub required: bool,
    /// Substitute for an empty raw value
    pub default: Option<&'a str>,
    /// Separator for collection values
    pub separator: &'a str,
    /// Byte / rune interpretation
    pub type_alias: Option<TypeAlias>,
}

impl<'a> FieldDescriptor<'a> {
    /// Parse an annotation into a descriptor.
    ///
    /// # Errors
    ///
    /// - [`EnvError::EmptyVariableName`] if the first token is empty
    /// - [`EnvError::UnknownOption`] for a token that is not an option
    /// - [`EnvError::InvalidTypeAlias`] for `type=` other than `byte`/`rune`
    pub fn parse(annotation: &'a str) -> Result<Self, EnvError> {
        let mut tokens = annotation.split(',');
        let name = tokens.next().unwrap_or_default();
        if name.is_empty() {
            return Err(EnvError::EmptyVariableName);
        }

        let mut descriptor = Self {
            name,
            required: false,
            default: None,
            separator: DEFAULT_SEPARATOR,
            type_alias: None,
        };

        for token in tokens {
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            };

            match key {
                "required" if value.is_none() => descriptor.required = true,
                "default" => descriptor.default = Some(value.unwrap_or_default()),
                "separator" => {
                    descriptor.separator = value
                        .filter(|separator| !separator.is_empty())
                        .unwrap_or(DEFAULT_SEPARATOR);
                }
                "type" => {
                    let alias =
                        TypeAlias::from_option(value).ok_or_else(|| EnvError::InvalidTypeAlias {
                            name: name.to_string(),
                            option: token.to_string(),
                        })?;
                    descriptor.type_alias = Some(alias);
                }
                _ => {
                    return Err(EnvError::UnknownOption {
                        name: name.to_string(),
                        option: token.to_string(),
                    })
                }
            }
        }

        Ok(descriptor)
    }
}
