//! Conversion of raw strings into field element types.
//!
//! Every supported element type implements [`Coerce`]. The set is closed:
//! a field whose element type has no implementation does not compile.

use std::time::Duration;

use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::annotation::TypeAlias;

/// Error produced by a conversion, kept as the underlying parser reported it.
pub type CoerceError = Box<dyn std::error::Error + Send + Sync>;

/// Type tag of a coercible element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    /// Parsed with 32-bit semantics
    Isize,
    U8,
    U16,
    U32,
    U64,
    /// Parsed with 32-bit semantics
    Usize,
    F32,
    F64,
    Bool,
    Str,
    Char,
    Duration,
    Timestamp,
    Pattern,
}

impl ScalarKind {
    /// Whether a field of this kind can hold one unit of `alias`.
    ///
    /// `byte` needs an 8-bit unsigned slot; `rune` needs a 32-bit slot or a `char`.
    pub fn accepts(self, alias: TypeAlias) -> bool {
        matches!(
            (self, alias),
            (Self::U8, TypeAlias::Byte) | (Self::I32 | Self::U32 | Self::Char, TypeAlias::Rune)
        )
    }
}

/// One elemental unit of a raw value read under a `type=` alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Byte(u8),
    Rune(char),
}

/// A type that can be produced from a raw environment string.
pub trait Coerce: Sized {
    /// Tag used to validate `type=` aliases before the lookup
    const KIND: ScalarKind;

    /// Convert a raw string.
    fn coerce(raw: &str) -> Result<Self, CoerceError>;

    /// Build a value from one unit; `None` unless [`ScalarKind::accepts`]
    /// holds for the unit's alias.
    fn from_unit(_unit: Unit) -> Option<Self> {
        None
    }
}

/// The raw value is not one of the accepted boolean literals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provided string was not a recognized boolean literal")]
pub struct ParseBoolLiteralError;

/// A finite float literal does not fit the target width.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("number too large to fit in target type")]
pub struct FloatRangeError;

/// Accepted literals are `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<bool, ParseBoolLiteralError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseBoolLiteralError),
    }
}

// std parses out-of-range floats to infinity; only explicit infinities may.
fn check_float_range(raw: &str, is_infinite: bool) -> Result<(), FloatRangeError> {
    let literal = raw.trim_start_matches(['+', '-']).to_ascii_lowercase();
    if is_infinite && literal != "inf" && literal != "infinity" {
        return Err(FloatRangeError);
    }
    Ok(())
}

macro_rules! coerce_from_str {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Coerce for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn coerce(raw: &str) -> Result<Self, CoerceError> {
                    Ok(raw.parse::<$ty>()?)
                }
            }
        )*
    };
}

coerce_from_str! {
    i8 => I8,
    i16 => I16,
    i64 => I64,
    u16 => U16,
    u64 => U64,
}

impl Coerce for i32 {
    const KIND: ScalarKind = ScalarKind::I32;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.parse::<i32>()?)
    }

    fn from_unit(unit: Unit) -> Option<Self> {
        match unit {
            Unit::Rune(c) => i32::try_from(u32::from(c)).ok(),
            Unit::Byte(_) => None,
        }
    }
}

impl Coerce for u32 {
    const KIND: ScalarKind = ScalarKind::U32;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.parse::<u32>()?)
    }

    fn from_unit(unit: Unit) -> Option<Self> {
        match unit {
            Unit::Rune(c) => Some(u32::from(c)),
            Unit::Byte(_) => None,
        }
    }
}

impl Coerce for u8 {
    const KIND: ScalarKind = ScalarKind::U8;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.parse::<u8>()?)
    }

    fn from_unit(unit: Unit) -> Option<Self> {
        match unit {
            Unit::Byte(b) => Some(b),
            Unit::Rune(_) => None,
        }
    }
}

impl Coerce for isize {
    const KIND: ScalarKind = ScalarKind::Isize;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        let value = raw.parse::<i32>()?;
        Ok(isize::try_from(value)?)
    }
}

impl Coerce for usize {
    const KIND: ScalarKind = ScalarKind::Usize;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        let value = raw.parse::<u32>()?;
        Ok(usize::try_from(value)?)
    }
}

impl Coerce for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        let value = raw.parse::<f32>()?;
        check_float_range(raw, value.is_infinite())?;
        Ok(value)
    }
}

impl Coerce for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        let value = raw.parse::<f64>()?;
        check_float_range(raw, value.is_infinite())?;
        Ok(value)
    }
}

impl Coerce for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(parse_bool(raw)?)
    }
}

impl Coerce for String {
    const KIND: ScalarKind = ScalarKind::Str;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_string())
    }
}

impl Coerce for char {
    const KIND: ScalarKind = ScalarKind::Char;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.parse::<char>()?)
    }

    fn from_unit(unit: Unit) -> Option<Self> {
        match unit {
            Unit::Rune(c) => Some(c),
            Unit::Byte(_) => None,
        }
    }
}

impl Coerce for Duration {
    const KIND: ScalarKind = ScalarKind::Duration;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(humantime::parse_duration(raw)?)
    }
}

impl Coerce for OffsetDateTime {
    const KIND: ScalarKind = ScalarKind::Timestamp;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(OffsetDateTime::parse(raw, &Rfc3339)?)
    }
}

impl Coerce for Regex {
    const KIND: ScalarKind = ScalarKind::Pattern;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(Regex::new(raw)?)
    }
}
