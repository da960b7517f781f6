//! Boundary traits for code that discovers or loads providers elsewhere.
//!
//! File discovery and module loading live outside this crate. They hand
//! their results to a [`Container`](crate::Container) through these traits
//! and helpers.

use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::value::Value;
use std::collections::HashMap;
use std::path::Path;

/// Something that can produce a provider for a location such as a module path.
pub trait ProviderSource {
  fn provider_at(&self, location: &str) -> Option<Provider>;
}

impl ProviderSource for HashMap<String, Provider> {
  fn provider_at(&self, location: &str) -> Option<Provider> {
    self.get(location).cloned()
  }
}

pub(crate) fn provider_at(source: &dyn ProviderSource, location: &str) -> Result<Provider> {
  source
    .provider_at(location)
    .ok_or_else(|| Error::UnknownLocation {
      location: location.to_owned(),
    })
}

/// A loaded module, as produced by a [`ModuleLoader`].
pub trait Module {
  /// The module's conventional default member, if it has one.
  fn default_export(&self) -> Option<Value>;

  /// The module as a whole.
  fn as_value(&self) -> Value;
}

/// A module that is nothing but a value.
impl Module for Value {
  fn default_export(&self) -> Option<Value> {
    None
  }

  fn as_value(&self) -> Value {
    self.clone()
  }
}

/// Resolves module specifiers to loaded modules.
pub trait ModuleLoader {
  fn load(&self, specifier: &str) -> Result<Box<dyn Module>>;
}

/// The requirements handed to [`Container::register_requirements`](crate::Container::register_requirements).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirements {
  /// Specifiers registered under a name derived from each one.
  List(Vec<String>),
  /// Explicit `(name, specifier)` pairs, in order.
  Named(Vec<(String, String)>),
}

impl Requirements {
  pub(crate) fn into_pairs(self) -> Vec<(String, String)> {
    match self {
      Requirements::List(specifiers) => specifiers
        .into_iter()
        .map(|specifier| (default_name(&specifier), specifier))
        .collect(),
      Requirements::Named(pairs) => pairs,
    }
  }
}

impl<S: Into<String>> FromIterator<S> for Requirements {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Requirements::List(iter.into_iter().map(Into::into).collect())
  }
}

/// The registration name derived from a file path or module specifier: its
/// base name without extension.
pub fn default_name(path: &str) -> String {
  let path = path.trim_end_matches(['/', '\\']);
  Path::new(path)
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.to_owned())
}

/// Pairs a provider found at `path` with its registration name: the name the
/// provider declares, else one derived from the path.
pub fn discovered(path: &str, provider: Provider) -> (String, Provider) {
  let name = provider
    .declared_name()
    .map(str::to_owned)
    .unwrap_or_else(|| default_name(path));
  (name, provider)
}
