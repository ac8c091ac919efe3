//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates field attributes during macro expansion.
//! The annotation string itself is kept verbatim and parsed at runtime by
//! `envfill::annotation`.

use syn::{Field, LitStr};

/// How a field takes part in resolution.
#[derive(Debug)]
pub enum FieldRole {
    /// `#[env("NAME,options")]`: resolved from one environment variable
    Annotated(LitStr),
    /// `#[env(nested)]`: a struct resolved with the same lookup
    Nested,
    /// No `#[env]` attribute: left as is
    Skipped,
}

impl FieldRole {
    /// Extract the role of a struct field from its `#[env(...)]` attributes.
    ///
    /// Unlike other attributes, malformed `#[env]` attributes are reported
    /// as compile errors rather than ignored.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut role = Self::Skipped;

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            if !matches!(role, Self::Skipped) {
                return Err(syn::Error::new_spanned(
                    attr,
                    "only one #[env] attribute is allowed per field",
                ));
            }

            // #[env("NAME,required,...")]
            if let Ok(annotation) = attr.parse_args::<LitStr>() {
                role = Self::Annotated(annotation);
                continue;
            }

            // #[env(nested)]
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nested") {
                    role = Self::Nested;
                    return Ok(());
                }

                Err(meta.error(
                    "unsupported env attribute, expected a string annotation or `nested`",
                ))
            })?;
        }

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_annotation() {
        let field: Field = parse_quote! {
            #[env("HOST,required,default=localhost")]
            pub host: String
        };

        match FieldRole::from_field(&field).unwrap() {
            FieldRole::Annotated(lit) => assert_eq!(lit.value(), "HOST,required,default=localhost"),
            other => panic!("Expected annotated field, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested() {
        let field: Field = parse_quote! {
            #[env(nested)]
            pub server: ServerConfig
        };

        assert!(matches!(
            FieldRole::from_field(&field).unwrap(),
            FieldRole::Nested
        ));
    }

    #[test]
    fn test_parse_skipped() {
        let field: Field = parse_quote! {
            #[serde(skip)]
            pub skipped: i32
        };

        assert!(matches!(
            FieldRole::from_field(&field).unwrap(),
            FieldRole::Skipped
        ));
    }

    #[test]
    fn test_unknown_key_is_error() {
        let field: Field = parse_quote! {
            #[env(flatten)]
            pub server: ServerConfig
        };

        assert!(FieldRole::from_field(&field).is_err());
    }

    #[test]
    fn test_multiple_attributes_is_error() {
        let field: Field = parse_quote! {
            #[env("PORT")]
            #[env(nested)]
            pub port: u16
        };

        assert!(FieldRole::from_field(&field).is_err());
    }
}
