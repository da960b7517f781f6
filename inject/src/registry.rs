//! Keyed, create-or-fetch storage for shared containers.

use crate::config::ContainerConfig;
use crate::container::Container;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::debug;

/// Hands out one [`Container`] per identity key.
///
/// The registry is an ordinary value: whoever needs shared containers owns
/// one and decides how long it lives. Removing a key or dropping the registry
/// releases the registry's handles; containers still referenced elsewhere
/// stay alive.
///
/// ```
/// use fibre_inject::{Container, ContainerRegistry};
///
/// let registry = ContainerRegistry::new();
/// let a = Container::keyed(&registry, "app");
/// let b = Container::keyed(&registry, "app");
/// assert!(Container::ptr_eq(&a, &b));
/// ```
#[derive(Default)]
pub struct ContainerRegistry {
  containers: RefCell<HashMap<String, Container>>,
}

impl ContainerRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the container for `key`, creating a default one first if needed.
  pub fn get_or_create(&self, key: &str) -> Container {
    self.get_or_create_with(key, ContainerConfig::default)
  }

  /// Returns the container for `key`, creating one from `config` first if needed.
  ///
  /// `config` is only called when the key is new, and may itself use the registry.
  pub fn get_or_create_with(&self, key: &str, config: impl FnOnce() -> ContainerConfig) -> Container {
    if let Some(existing) = self.get(key) {
      return existing;
    }
    let container = Container::with_config(config());
    self
      .containers
      .borrow_mut()
      .entry(key.to_owned())
      .or_insert_with(|| {
        debug!(key, "creating keyed container");
        container
      })
      .clone()
  }

  pub fn get(&self, key: &str) -> Option<Container> {
    self.containers.borrow().get(key).cloned()
  }

  pub fn contains(&self, key: &str) -> bool {
    self.containers.borrow().contains_key(key)
  }

  pub fn remove(&self, key: &str) -> Option<Container> {
    self.containers.borrow_mut().remove(key)
  }

  pub fn keys(&self) -> Vec<String> {
    self.containers.borrow().keys().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.containers.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.containers.borrow().is_empty()
  }

  pub fn clear(&self) {
    self.containers.borrow_mut().clear();
  }
}
