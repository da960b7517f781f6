//! Container configuration.

use crate::value::Value;

fn default_self_name() -> String {
  "container".to_string()
}

/// Decides which caller-supplied locals shadow graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocalOverrides {
  /// Only truthy locals win; a falsy local (`0`, `false`, `""`, ...) falls
  /// through to the registered node.
  #[default]
  Truthy,
  /// Any local present for a name wins.
  Present,
}

impl LocalOverrides {
  pub fn accepts(&self, local: &Value) -> bool {
    match self {
      LocalOverrides::Truthy => local.is_truthy(),
      LocalOverrides::Present => true,
    }
  }
}

/// Settings fixed when a [`Container`](crate::Container) is created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ContainerConfig {
  /// The name the container registers itself under. Defaults to `"container"`.
  pub self_name: String,
  pub local_overrides: LocalOverrides,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      self_name: default_self_name(),
      local_overrides: LocalOverrides::default(),
    }
  }
}

impl ContainerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_self_name(mut self, name: impl Into<String>) -> Self {
    self.self_name = name.into();
    self
  }

  pub fn with_local_overrides(mut self, policy: LocalOverrides) -> Self {
    self.local_overrides = policy;
    self
  }
}
