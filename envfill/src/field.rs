//! Resolution of a single annotated field.
//!
//! Used by `#[derive(FromEnv)]`; hand-written [`FromEnv`](crate::FromEnv)
//! implementations call [`resolve_field`] once per field.

use std::borrow::Cow;
use std::time::Duration;

use regex::Regex;
use time::OffsetDateTime;
use tracing::trace;

use crate::annotation::{FieldDescriptor, TypeAlias};
use crate::coerce::{Coerce, ScalarKind, Unit};
use crate::error::EnvError;
use crate::lookup::Lookup;

/// A field type the resolver can assign: a scalar, `Vec` of a scalar, or
/// `Option` of either.
pub trait EnvField: Sized {
    /// Tag of the scalar element, used to validate `type=` aliases
    const ELEMENT: ScalarKind;

    /// Build the field value from the raw (post-default) string.
    fn from_raw(raw: &str, descriptor: &FieldDescriptor<'_>) -> Result<Self, EnvError>;
}

/// Resolve one field from its annotation and store the result in `slot`.
///
/// The annotation is parsed first, so annotation errors surface even when
/// the variable is unset. `required` is checked against the raw value
/// before `default=` is substituted.
///
/// On error `slot` is left untouched.
pub fn resolve_field<T, L>(slot: &mut T, annotation: &str, lookup: &L) -> Result<(), EnvError>
where
    T: EnvField,
    L: Lookup + ?Sized,
{
    let descriptor = FieldDescriptor::parse(annotation)?;

    if let Some(alias) = descriptor.type_alias {
        if !T::ELEMENT.accepts(alias) {
            return Err(EnvError::UnsupportedFieldType {
                name: descriptor.name.to_string(),
                alias,
                type_name: std::any::type_name::<T>(),
            });
        }
    }

    let raw = lookup.lookup(descriptor.name)?;
    if descriptor.required && raw.is_empty() {
        return Err(EnvError::required(descriptor.name));
    }

    let raw = match descriptor.default {
        Some(default) if raw.is_empty() => Cow::Borrowed(default),
        _ => Cow::Owned(raw),
    };

    *slot = T::from_raw(&raw, &descriptor)?;
    trace!(
        variable = descriptor.name,
        defaulted = matches!(raw, Cow::Borrowed(_)),
        "resolved field"
    );
    Ok(())
}

fn units(raw: &str, alias: TypeAlias) -> Vec<Unit> {
    match alias {
        TypeAlias::Byte => raw.bytes().map(Unit::Byte).collect(),
        TypeAlias::Rune => raw.chars().map(Unit::Rune).collect(),
    }
}

fn from_unit<T: Coerce>(
    unit: Unit,
    descriptor: &FieldDescriptor<'_>,
    alias: TypeAlias,
) -> Result<T, EnvError> {
    T::from_unit(unit).ok_or_else(|| EnvError::UnsupportedFieldType {
        name: descriptor.name.to_string(),
        alias,
        type_name: std::any::type_name::<T>(),
    })
}

fn scalar_from_raw<T: Coerce>(raw: &str, descriptor: &FieldDescriptor<'_>) -> Result<T, EnvError> {
    let Some(alias) = descriptor.type_alias else {
        return T::coerce(raw).map_err(|e| EnvError::conversion(descriptor.name, e));
    };

    match units(raw, alias).as_slice() {
        [unit] => from_unit(*unit, descriptor, alias),
        _ => Err(EnvError::SingleUnitArity {
            name: descriptor.name.to_string(),
            alias,
            collection: false,
        }),
    }
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EnvField for $ty {
                const ELEMENT: ScalarKind = <$ty as Coerce>::KIND;

                fn from_raw(raw: &str, descriptor: &FieldDescriptor<'_>) -> Result<Self, EnvError> {
                    scalar_from_raw(raw, descriptor)
                }
            }
        )*
    };
}

scalar_field! {
    i8, i16, i32, i64, isize,
    u8, u16, u32, u64, usize,
    f32, f64, bool, String, char,
    Duration, OffsetDateTime, Regex,
}

impl<T: Coerce> EnvField for Vec<T> {
    const ELEMENT: ScalarKind = T::KIND;

    fn from_raw(raw: &str, descriptor: &FieldDescriptor<'_>) -> Result<Self, EnvError> {
        let Some(alias) = descriptor.type_alias else {
            return raw
                .split(descriptor.separator)
                .map(|part| T::coerce(part).map_err(|e| EnvError::conversion(descriptor.name, e)))
                .collect();
        };

        // The whole value is one sequence of units; a list of them is ambiguous.
        if raw.contains(descriptor.separator) {
            return Err(EnvError::SingleUnitArity {
                name: descriptor.name.to_string(),
                alias,
                collection: true,
            });
        }

        units(raw, alias)
            .into_iter()
            .map(|unit| from_unit(unit, descriptor, alias))
            .collect()
    }
}

impl<T: EnvField> EnvField for Option<T> {
    const ELEMENT: ScalarKind = T::ELEMENT;

    fn from_raw(raw: &str, descriptor: &FieldDescriptor<'_>) -> Result<Self, EnvError> {
        if raw.is_empty() {
            return Ok(None);
        }
        T::from_raw(raw, descriptor).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve<T: EnvField + Default>(
        annotation: &str,
        pairs: &[(&str, &str)],
    ) -> Result<T, EnvError> {
        let mut slot = T::default();
        resolve_field(&mut slot, annotation, &env(pairs))?;
        Ok(slot)
    }

    #[test]
    fn test_required_checked_before_default() {
        let err = resolve::<String>("HOST,required,default=localhost", &[]).unwrap_err();
        assert_eq!(err.to_string(), "HOST: value is required but was empty");

        // Token order does not change the precedence.
        let err = resolve::<String>("HOST,default=localhost,required", &[]).unwrap_err();
        assert!(matches!(err, EnvError::RequiredValueMissing { .. }));

        let value: String = resolve("HOST,required,default=localhost", &[("HOST", "db")]).unwrap();
        assert_eq!(value, "db");
    }

    #[test]
    fn test_default_applies_to_empty_value() {
        let port: i32 = resolve("PORT,default=8080", &[]).unwrap();
        assert_eq!(port, 8080);

        let port: i32 = resolve("PORT,default=8080", &[("PORT", "")]).unwrap();
        assert_eq!(port, 8080);

        let port: i32 = resolve("PORT,default=8080", &[("PORT", "9090")]).unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_conversion_error_is_prefixed() {
        let err = resolve::<i32>("PORT", &[("PORT", "abc")]).unwrap_err();
        assert_eq!(err.to_string(), "PORT: invalid digit found in string");

        let err = resolve::<u16>("PORT", &[]).unwrap_err();
        assert_eq!(err.to_string(), "PORT: cannot parse integer from empty string");
    }

    #[test]
    fn test_slot_untouched_on_error() {
        let mut slot = 7u8;
        let result = resolve_field(&mut slot, "N", &env(&[("N", "300")]));
        assert!(result.is_err());
        assert_eq!(slot, 7);
    }

    #[test]
    fn test_collection_split() {
        let names: Vec<String> = resolve("NAMES,default=n1:n2:n3,separator=:", &[]).unwrap();
        assert_eq!(names, vec!["n1", "n2", "n3"]);

        let ports: Vec<u16> = resolve("PORTS", &[("PORTS", "80,443")]).unwrap();
        assert_eq!(ports, vec![80, 443]);

        let single: Vec<u16> = resolve("PORTS", &[("PORTS", "80")]).unwrap();
        assert_eq!(single, vec![80]);
    }

    #[test]
    fn test_collection_empty_raw_is_one_part() {
        let names: Vec<String> = resolve("NAMES", &[]).unwrap();
        assert_eq!(names, vec![String::new()]);

        let err = resolve::<Vec<i32>>("NUMS", &[]).unwrap_err();
        assert_eq!(err.to_string(), "NUMS: cannot parse integer from empty string");
    }

    #[test]
    fn test_collection_reports_first_bad_part() {
        let err = resolve::<Vec<i8>>("NUMS", &[("NUMS", "1,300,x")]).unwrap_err();
        assert_eq!(err.to_string(), "NUMS: number too large to fit in target type");
    }

    #[test]
    fn test_byte_scalar() {
        let b: u8 = resolve("B,type=byte", &[("B", "a")]).unwrap();
        assert_eq!(b, b'a');

        for raw in ["", "ab"] {
            let err = resolve::<u8>("B,type=byte", &[("B", raw)]).unwrap_err();
            assert_eq!(err.to_string(), "B: byte must be a single character value");
        }

        // Multi-byte code point is more than one byte.
        assert!(resolve::<u8>("B,type=byte", &[("B", "é")]).is_err());

        let numeric: u8 = resolve("B", &[("B", "42")]).unwrap();
        assert_eq!(numeric, 42);
    }

    #[test]
    fn test_rune_scalar() {
        let c: char = resolve("R,type=rune", &[("R", "é")]).unwrap();
        assert_eq!(c, 'é');

        let code: i32 = resolve("R,type=rune", &[("R", "€")]).unwrap();
        assert_eq!(code, 0x20AC);

        let code: u32 = resolve("R,type=rune", &[("R", "a")]).unwrap();
        assert_eq!(code, 97);

        for raw in ["", "ab"] {
            let err = resolve::<char>("R,type=rune", &[("R", raw)]).unwrap_err();
            assert_eq!(err.to_string(), "R: rune must be a single character value");
        }
    }

    #[test]
    fn test_byte_collection() {
        let secret: Vec<u8> = resolve("SECRET,type=byte", &[("SECRET", "hello")]).unwrap();
        assert_eq!(secret, b"hello".to_vec());

        let err = resolve::<Vec<u8>>("SECRET,type=byte", &[("SECRET", "a,b")]).unwrap_err();
        assert_eq!(err.to_string(), "SECRET: byte slice cannot have multiple values");

        // A different separator lets the comma through.
        let secret: Vec<u8> =
            resolve("SECRET,type=byte,separator=;", &[("SECRET", "a,b")]).unwrap();
        assert_eq!(secret, b"a,b".to_vec());

        let numeric: Vec<u8> = resolve("BYTES", &[("BYTES", "1,2,3")]).unwrap();
        assert_eq!(numeric, vec![1, 2, 3]);
    }

    #[test]
    fn test_rune_collection() {
        let runes: Vec<char> = resolve("R,type=rune", &[("R", "héllo")]).unwrap();
        assert_eq!(runes, "héllo".chars().collect::<Vec<_>>());

        let codes: Vec<i32> = resolve("R,type=rune", &[("R", "ab")]).unwrap();
        assert_eq!(codes, vec![97, 98]);

        let err = resolve::<Vec<char>>("R,type=rune", &[("R", "a,b")]).unwrap_err();
        assert_eq!(err.to_string(), "R: rune slice cannot have multiple values");

        let chars: Vec<char> = resolve("R", &[("R", "a,b")]).unwrap();
        assert_eq!(chars, vec!['a', 'b']);
    }

    #[test]
    fn test_alias_on_unsupported_type() {
        let err = resolve::<i64>("N,type=byte", &[]).unwrap_err();
        assert_eq!(err.to_string(), "N: type=byte is not supported for field type i64");

        let err = resolve::<Vec<String>>("N,type=rune", &[("N", "x")]).unwrap_err();
        assert!(matches!(err, EnvError::UnsupportedFieldType { .. }));
    }

    #[test]
    fn test_invalid_alias_before_lookup() {
        let unset: &[(&str, &str)] = &[];
        for pairs in [unset, &[("LVL", "debug")]] {
            let err = resolve::<String>("LVL,type=frobnicate", pairs).unwrap_err();
            assert_eq!(
                err.to_string(),
                r#"LVL: invalid type "type=frobnicate", valid options are: "byte", "rune""#
            );
        }
    }

    #[test]
    fn test_option_fields() {
        let missing: Option<u16> = resolve("PORT", &[]).unwrap();
        assert_eq!(missing, None);

        let set: Option<u16> = resolve("PORT", &[("PORT", "80")]).unwrap();
        assert_eq!(set, Some(80));

        let defaulted: Option<u16> = resolve("PORT,default=81", &[]).unwrap();
        assert_eq!(defaulted, Some(81));

        let err = resolve::<Option<u16>>("PORT,required", &[]).unwrap_err();
        assert!(matches!(err, EnvError::RequiredValueMissing { .. }));

        let list: Option<Vec<String>> = resolve("L", &[("L", "a,b")]).unwrap();
        assert_eq!(list, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
