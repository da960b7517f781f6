//! Running providers with their resolved, positional arguments.

use crate::container::Container;
use crate::core::ResolutionChain;
use crate::error::{Error, Result};
use crate::provider::{Factory, Provider};
use crate::resolver;
use crate::signature::DependencyRef;
use crate::value::Value;
use std::any::{type_name, Any};
use std::rc::Rc;

/// The resolved arguments handed to a provider, in declaration order.
///
/// Besides positional access, `Arguments` can resolve further names from the
/// same container. Those lookups continue the resolution chain of the
/// provider being built, so cycles through them are still detected.
pub struct Arguments<'a> {
  dependencies: &'a [DependencyRef],
  values: Vec<Option<Value>>,
  container: &'a Container,
  chain: &'a ResolutionChain,
}

impl<'a> Arguments<'a> {
  pub(crate) fn new(
    dependencies: &'a [DependencyRef],
    values: Vec<Option<Value>>,
    container: &'a Container,
    chain: &'a ResolutionChain,
  ) -> Self {
    Self {
      dependencies,
      values,
      container,
      chain,
    }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The raw value at `index`; `None` for absent optional dependencies.
  pub fn value(&self, index: usize) -> Option<&Value> {
    self.values.get(index).and_then(Option::as_ref)
  }

  /// The dependency name declared at `index`.
  pub fn name(&self, index: usize) -> Option<&str> {
    self.dependencies.get(index).map(DependencyRef::name)
  }

  /// The value at `index`, downcast to `T`.
  pub fn get<T: Any>(&self, index: usize) -> Result<Rc<T>> {
    match self.value(index) {
      Some(value) => self.downcast(index, value),
      None => Err(Error::MissingArgument {
        index,
        name: self.name(index).unwrap_or_default().to_owned(),
      }),
    }
  }

  /// Like [`get`](Self::get), but an absent value is `Ok(None)`.
  pub fn optional<T: Any>(&self, index: usize) -> Result<Option<Rc<T>>> {
    self
      .value(index)
      .map(|value| self.downcast(index, value))
      .transpose()
  }

  /// Resolves another name as part of the current resolution.
  pub fn resolve(&self, name: &str) -> Result<Option<Value>> {
    resolver::resolve_name(self.container, name, self.chain, None)
  }

  pub fn container(&self) -> &Container {
    self.container
  }

  /// The names currently being resolved, outermost first.
  pub fn chain(&self) -> &ResolutionChain {
    self.chain
  }

  fn downcast<T: Any>(&self, index: usize, value: &Value) -> Result<Rc<T>> {
    value.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
      name: self.name(index).unwrap_or_default().to_owned(),
      expected: type_name::<T>(),
      found: value.type_name(),
    })
  }
}

/// Runs `provider` with `args`.
///
/// Constructible providers always produce a new instance. Callables may
/// produce nothing, and an unset provider is a no-op that produces nothing.
pub(crate) fn invoke(provider: &Provider, args: &Arguments<'_>) -> Result<Option<Value>> {
  match provider.factory() {
    None => Ok(None),
    Some(Factory::Function(function)) => function(args),
    Some(Factory::Constructor(construct)) => construct(args).map(Some),
  }
}
