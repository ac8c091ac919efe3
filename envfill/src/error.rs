//! Error types for environment variable configuration

use crate::annotation::TypeAlias;
use crate::coerce::CoerceError;

/// Errors that can occur when resolving a struct from environment variables.
///
/// Resolution stops at the first failing field; the error names the
/// variable it was reading (except for [`EnvError::EmptyVariableName`],
/// which has no name to report).
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// The first token of a field annotation is empty.
    #[error("env variable name cannot be empty")]
    EmptyVariableName,

    /// The annotation contains a token that is not a recognized option.
    #[error("{name}: unknown option {option}")]
    UnknownOption {
        /// Name of the environment variable
        name: String,
        /// The offending annotation token
        option: String,
    },

    /// A `type=` option names something other than `byte` or `rune`.
    ///
    /// Reported while the annotation is parsed, before the environment is
    /// consulted.
    #[error("{name}: invalid type \"{option}\", valid options are: \"byte\", \"rune\"")]
    InvalidTypeAlias {
        /// Name of the environment variable
        name: String,
        /// The whole offending token, e.g. `type=frobnicate`
        option: String,
    },

    /// A valid `type=` alias was put on a field whose element type cannot
    /// hold that unit (e.g. `type=byte` on an `i64`).
    #[error("{name}: type={alias} is not supported for field type {type_name}")]
    UnsupportedFieldType {
        /// Name of the environment variable
        name: String,
        /// The requested alias
        alias: TypeAlias,
        /// Fully qualified type name of the field
        type_name: &'static str,
    },

    /// A `required` field's raw value was empty.
    ///
    /// Checked before `default=` is applied.
    #[error("{name}: value is required but was empty")]
    RequiredValueMissing {
        /// Name of the environment variable
        name: String,
    },

    /// The raw value could not be converted into the field's type.
    #[error("{name}: {source}")]
    Conversion {
        /// Name of the environment variable
        name: String,
        /// Error reported by the underlying parser
        source: CoerceError,
    },

    /// A `type=byte` / `type=rune` field received the wrong number of units:
    /// a scalar got zero or several, or a collection got a
    /// separator-delimited list.
    #[error("{name}: {}", arity_message(.alias, .collection))]
    SingleUnitArity {
        /// Name of the environment variable
        name: String,
        /// The alias in effect
        alias: TypeAlias,
        /// Whether the field is a collection
        collection: bool,
    },

    /// Failed to read the file named by `{VAR}_FILE`.
    ///
    /// Only produced through [`FileSecrets`](crate::lookup::FileSecrets).
    #[error("{name}: failed to read file '{path}': {source}")]
    FileRead {
        /// Name of the `{VAR}_FILE` environment variable (e.g. "API_KEY_FILE")
        name: String,
        /// Path to the file that failed to be read
        path: String,
        /// Underlying I/O error that caused the failure
        source: std::io::Error,
    },
}

fn arity_message(alias: &TypeAlias, collection: &bool) -> &'static str {
    match (alias, collection) {
        (TypeAlias::Byte, false) => "byte must be a single character value",
        (TypeAlias::Rune, false) => "rune must be a single character value",
        (TypeAlias::Byte, true) => "byte slice cannot have multiple values",
        (TypeAlias::Rune, true) => "rune slice cannot have multiple values",
    }
}

impl EnvError {
    /// Create a conversion error from any parser failure
    pub(crate) fn conversion(name: impl Into<String>, source: impl Into<CoerceError>) -> Self {
        Self::Conversion {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a missing required value error
    pub(crate) fn required(name: impl Into<String>) -> Self {
        Self::RequiredValueMissing { name: name.into() }
    }

    /// Name of the environment variable the error relates to, if any
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::EmptyVariableName => None,
            Self::UnknownOption { name, .. }
            | Self::InvalidTypeAlias { name, .. }
            | Self::UnsupportedFieldType { name, .. }
            | Self::RequiredValueMissing { name }
            | Self::Conversion { name, .. }
            | Self::SingleUnitArity { name, .. }
            | Self::FileRead { name, .. } => Some(name),
        }
    }
}
