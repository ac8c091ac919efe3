//! Populate configuration structs from environment variables
//!
//! `envfill` reads each field of a struct from the environment variable named
//! in its annotation, converts the string into the field's type, and assigns
//! it. Annotations are plain strings so the same configuration can be
//! described without any code.
//!
//! # Features
//!
//! - **Declarative**: annotate fields with `#[env("NAME,options")]` and `#[derive(FromEnv)]`
//! - **Typed**: integers, floats, booleans, strings, bytes, code points,
//!   durations, RFC3339 timestamps, regular expressions, and `Vec`s of each
//! - **Defaults and required values**: `default=X`, `required`
//! - **Nested structs**: `#[env(nested)]` resolves a field with the same lookup
//! - **Pluggable sources**: process environment, maps, closures, file-based secrets
//!
//! # Example
//!
//! ```rust
//! use envfill::FromEnv;
//!
//! #[derive(Debug, Default, FromEnv)]
//! struct Config {
//!     #[env("HOST,default=localhost")]
//!     host: String,
//!
//!     #[env("PORT,default=8080")]
//!     port: u16,
//!
//!     #[env("NAMES,default=n1:n2:n3,separator=:")]
//!     names: Vec<String>,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::remove_var("HOST");
//! #     std::env::remove_var("PORT");
//! #     std::env::remove_var("NAMES");
//! let config = Config::from_env()?;
//! assert_eq!(config.host, "localhost");
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.names, ["n1", "n2", "n3"]);
//! #     Ok(())
//! # }
//! ```
//!
//! # Annotations
//!
//! `"NAME,option,option..."`; the first token is the variable name.
//!
//! | option | effect |
//! |---|---|
//! | `required` | fail if the value is empty, even when a default exists |
//! | `default=X` | use `X` when the value is empty |
//! | `separator=S` | split `Vec` fields on `S` instead of `,` |
//! | `type=byte` | `u8` / `Vec<u8>`: read single bytes instead of numbers |
//! | `type=rune` | `char`, `i32`, `u32` and their `Vec`s: read code points |
//!
//! The process environment does not distinguish an unset variable from an
//! empty one; both are "empty" here.
//!
//! ## Byte and rune fields
//!
//! ```rust
//! use envfill::{lookup::from_fn, FromEnv};
//!
//! #[derive(Debug, Default, FromEnv)]
//! struct Secrets {
//!     #[env("SECRET,type=byte")]
//!     secret: Vec<u8>,
//!
//!     #[env("DELIMITER,type=rune,default=|")]
//!     delimiter: char,
//! }
//!
//! let lookup = from_fn(|name| (name == "SECRET").then(|| "hello".to_string()));
//! let secrets = Secrets::from_lookup(&lookup).unwrap();
//! assert_eq!(secrets.secret, b"hello");
//! assert_eq!(secrets.delimiter, '|');
//! ```
//!
//! # Errors
//!
//! Resolution stops at the first failing field, in declaration order and
//! depth-first into nested structs. Messages read `"<NAME>: <cause>"`.
//! Fields resolved before the failure keep their new values; use
//! [`FromEnv::from_env`] to get all-or-nothing behaviour.

use tracing::debug;

pub mod annotation;
pub mod coerce;
pub mod field;
pub mod lookup;

mod error;

pub use annotation::{FieldDescriptor, TypeAlias, DEFAULT_SEPARATOR};
pub use envfill_derive::FromEnv;
pub use error::EnvError;
pub use lookup::{FileSecrets, Lookup, ProcessEnv};

/// A struct whose fields can be resolved from a [`Lookup`].
///
/// Usually derived; see the crate documentation for the attributes.
/// Implementing it by hand means calling [`field::resolve_field`] for each
/// annotated field and [`FromEnv::resolve_env`] for each nested struct:
///
/// ```rust
/// use envfill::{field::resolve_field, EnvError, FromEnv, Lookup};
///
/// #[derive(Default)]
/// struct Server {
///     port: u16,
/// }
///
/// impl FromEnv for Server {
///     fn resolve_env<L: Lookup + ?Sized>(&mut self, lookup: &L) -> Result<(), EnvError> {
///         resolve_field(&mut self.port, "PORT,default=8080", lookup)
///     }
/// }
/// ```
pub trait FromEnv {
    /// Resolve every annotated field of `self` in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first field-level failure; earlier fields stay assigned.
    fn resolve_env<L: Lookup + ?Sized>(&mut self, lookup: &L) -> Result<(), EnvError>;

    /// Build a value from `Default` and resolve it against the process environment.
    fn from_env() -> Result<Self, EnvError>
    where
        Self: Default + Sized,
    {
        Self::from_lookup(&ProcessEnv)
    }

    /// Build a value from `Default` and resolve it against `lookup`.
    fn from_lookup<L: Lookup + ?Sized>(lookup: &L) -> Result<Self, EnvError>
    where
        Self: Default + Sized,
    {
        let mut target = Self::default();
        resolve_with(&mut target, lookup)?;
        Ok(target)
    }
}

/// Resolve `target` from the process environment.
///
/// # Errors
///
/// See [`EnvError`]. Fields assigned before the failing one keep their values.
pub fn resolve<T: FromEnv>(target: &mut T) -> Result<(), EnvError> {
    resolve_with(target, &ProcessEnv)
}

/// Resolve `target` from an arbitrary [`Lookup`].
pub fn resolve_with<T, L>(target: &mut T, lookup: &L) -> Result<(), EnvError>
where
    T: FromEnv,
    L: Lookup + ?Sized,
{
    let config = std::any::type_name::<T>();
    debug!(config, "resolving configuration from environment");
    target.resolve_env(lookup)?;
    debug!(config, "resolved configuration from environment");
    Ok(())
}
