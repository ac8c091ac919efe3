//! Sources of raw values.
//!
//! A [`Lookup`] maps a variable name to its raw string. An empty string
//! means "unset": a missing variable and a variable set to `""` look the same.

use std::collections::{BTreeMap, HashMap};
use std::env::{self, VarError};
use std::fs;
use std::hash::BuildHasher;

use crate::error::EnvError;

/// Key-value source consulted once per annotated field.
pub trait Lookup {
    /// Raw value of `name`, or `""` when it is not set.
    fn lookup(&self, name: &str) -> Result<String, EnvError>;
}

impl<L: Lookup + ?Sized> Lookup for &L {
    fn lookup(&self, name: &str) -> Result<String, EnvError> {
        (**self).lookup(name)
    }
}

/// The process environment.
///
/// A value that is set but not valid UTF-8 is an error naming the variable;
/// the value itself is not included in the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Result<String, EnvError> {
        match env::var(name) {
            Ok(value) => Ok(value),
            Err(VarError::NotPresent) => Ok(String::new()),
            Err(VarError::NotUnicode(_)) => Err(EnvError::conversion(
                name,
                "environment variable was not valid unicode",
            )),
        }
    }
}

impl<S: BuildHasher> Lookup for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Result<String, EnvError> {
        Ok(self.get(name).cloned().unwrap_or_default())
    }
}

impl Lookup for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Result<String, EnvError> {
        Ok(self.get(name).cloned().unwrap_or_default())
    }
}

/// Lookup backed by a closure; see [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnLookup<F>(F);

/// Wrap a closure returning `Some(value)` for set variables.
///
/// ```rust
/// use envfill::lookup::{from_fn, Lookup};
///
/// let lookup = from_fn(|name| (name == "PORT").then(|| "8080".to_string()));
/// assert_eq!(lookup.lookup("PORT").unwrap(), "8080");
/// assert_eq!(lookup.lookup("HOST").unwrap(), "");
/// ```
pub fn from_fn<F>(f: F) -> FnLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    FnLookup(f)
}

impl<F> Lookup for FnLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Result<String, EnvError> {
        Ok((self.0)(name).unwrap_or_default())
    }
}

/// Falls back to `{NAME}_FILE` when `NAME` is unset.
///
/// Kubernetes Secrets and Docker Secrets are mounted as files; point
/// `API_KEY_FILE` at the mount and `API_KEY` resolves to the file's
/// trimmed contents. A non-empty `API_KEY` always wins, so local
/// development can keep setting the value directly.
///
/// Both names are read through the wrapped lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSecrets<L> {
    inner: L,
}

impl<L: Lookup> FileSecrets<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: Lookup> Lookup for FileSecrets<L> {
    fn lookup(&self, name: &str) -> Result<String, EnvError> {
        let value = self.inner.lookup(name)?;
        if !value.is_empty() {
            return Ok(value);
        }

        let file_var_name = format!("{}_FILE", name);
        let file_path = self.inner.lookup(&file_var_name)?;
        if file_path.is_empty() {
            return Ok(value);
        }

        fs::read_to_string(&file_path)
            .map(|s| s.trim().to_string())
            .map_err(|e| EnvError::FileRead {
                name: file_var_name,
                path: file_path,
                source: e,
            })
    }
}
