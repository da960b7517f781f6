use thiserror::Error;

/// The error type for every fallible container operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Could not locate a parameter list in provider declaration: {declaration:?}")]
  Parse { declaration: String },

  #[error("Dependency not found: {}", .chain.join(" -> "))]
  DependencyNotFound { chain: Vec<String> },

  #[error("Dependency '{name}' is registered but resolved to no value")]
  NoValue { name: String },

  #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
  CircularDependency { cycle: Vec<String> },

  #[error("No argument at position {index} ('{name}')")]
  MissingArgument { index: usize, name: String },

  #[error("'{name}' holds a value of type {found}, expected {expected}")]
  TypeMismatch {
    name: String,
    expected: &'static str,
    found: &'static str,
  },

  #[error("No provider found at location '{location}'")]
  UnknownLocation { location: String },

  #[error("Failed to load module '{specifier}': {reason}")]
  Module { specifier: String, reason: String },

  #[error("Provider '{name}' failed: {reason}")]
  Provider { name: String, reason: String },
}

impl Error {
  /// Builds an [`Error::Provider`] from any displayable failure, for use inside factories.
  pub fn provider(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
    Error::Provider {
      name: name.into(),
      reason: reason.to_string(),
    }
  }

  /// The chain of names attached to resolution errors, if any.
  pub fn chain(&self) -> Option<&[String]> {
    match self {
      Error::DependencyNotFound { chain } => Some(chain),
      Error::CircularDependency { cycle } => Some(cycle),
      _ => None,
    }
  }
}

/// A specialized `Result` type for `fibre_inject` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
