//! Derive macro implementation for envfill

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::FieldRole;

/// `FromEnv` derive macro
///
/// Implements `envfill::FromEnv` by resolving fields in declaration order.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[env("NAME,required,default=X,separator=S,type=byte|rune")]`: read the
///   field from `NAME`; the string is parsed at runtime
/// - `#[env(nested)]`: resolve a `FromEnv` field with the same lookup, no prefix
///
/// Fields without `#[env]` are left untouched.
///
/// # Example
///
/// See the `envfill` crate documentation for usage examples.
#[proc_macro_derive(FromEnv, attributes(env))]
pub fn derive_from_env(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    // Only structs with named fields can be resolved
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "FromEnv only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "FromEnv only supports structs with named fields",
            ));
        }
    };

    let mut steps = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };

        match FieldRole::from_field(field)? {
            FieldRole::Annotated(annotation) => steps.push(quote! {
                ::envfill::field::resolve_field(&mut self.#field_name, #annotation, lookup)?;
            }),
            FieldRole::Nested => steps.push(quote! {
                ::envfill::FromEnv::resolve_env(&mut self.#field_name, lookup)?;
            }),
            FieldRole::Skipped => {}
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::envfill::FromEnv for #struct_name #ty_generics #where_clause {
            fn resolve_env<__L: ::envfill::Lookup + ?Sized>(
                &mut self,
                lookup: &__L,
            ) -> ::core::result::Result<(), ::envfill::EnvError> {
                #(#steps)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_expand_struct() {
        let input: DeriveInput = parse_quote! {
            struct Config {
                #[env("HOST,default=localhost")]
                host: String,
                #[env(nested)]
                server: Server,
                skipped: i32,
            }
        };

        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("resolve_field"));
        assert!(output.contains("\"HOST,default=localhost\""));
        assert!(output.contains("resolve_env"));
        assert!(output.contains("self . server"));
        assert!(!output.contains("skipped"));
    }

    #[test]
    fn test_expand_rejects_enum() {
        let input: DeriveInput = parse_quote! {
            enum Config { A, B }
        };

        let err = expand(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "FromEnv only supports structs with named fields"
        );
    }

    #[test]
    fn test_expand_rejects_tuple_struct() {
        let input: DeriveInput = parse_quote! {
            struct Config(#[env("PORT")] u16);
        };

        assert!(expand(&input).is_err());
    }

    #[test]
    fn test_expand_forwards_generics() {
        let input: DeriveInput = parse_quote! {
            struct Config<T> where T: Default {
                #[env("VALUE")]
                value: T,
            }
        };

        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("Config < T >"));
        assert!(output.contains("Default"));
    }

    #[test]
    fn test_expand_reports_bad_attribute() {
        let input: DeriveInput = parse_quote! {
            struct Config {
                #[env(prefix = "APP_")]
                port: u16,
            }
        };

        assert!(expand(&input).is_err());
    }
}
