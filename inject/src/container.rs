//! The main `Container` struct and its associated methods.

use crate::config::ContainerConfig;
use crate::core::{Graph, Node, ProviderNode, ResolutionChain};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::registry::ContainerRegistry;
use crate::resolver;
use crate::signature::{self, DependencyRef};
use crate::source::{self, Module, ModuleLoader, ProviderSource, Requirements};
use crate::value::{Locals, Value};
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

struct Inner {
  graph: RefCell<Graph>,
  config: ContainerConfig,
}

/// The dependency injection container.
///
/// A `Container` is a cheap, cloneable handle: clones share one graph. It is
/// meant to be owned by a single thread, so it is neither `Send` nor `Sync`.
/// No borrow of the graph is held while a provider runs, which lets
/// factories register or resolve other names from inside.
#[derive(Clone)]
pub struct Container {
  inner: Rc<Inner>,
}

/// A non-owning handle to a container, stored in the container's own graph.
///
/// The last handle given out is remembered weakly, so resolving the self name
/// yields the same allocation for as long as anyone holds it.
pub(crate) struct WeakContainer {
  inner: Weak<Inner>,
  handed_out: RefCell<Weak<Container>>,
}

impl WeakContainer {
  fn new(inner: &Rc<Inner>) -> Self {
    Self {
      inner: Rc::downgrade(inner),
      handed_out: RefCell::new(Weak::new()),
    }
  }

  pub(crate) fn value(&self) -> Option<Value> {
    if let Some(handle) = self.handed_out.borrow().upgrade() {
      return Some(Value::from_rc(handle));
    }
    let handle = Rc::new(Container {
      inner: self.inner.upgrade()?,
    });
    *self.handed_out.borrow_mut() = Rc::downgrade(&handle);
    Some(Value::from_rc(handle))
  }
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates a new container that holds only its own self-registration.
  pub fn new() -> Self {
    Self::with_config(ContainerConfig::default())
  }

  pub fn with_config(config: ContainerConfig) -> Self {
    let inner = Rc::new(Inner {
      graph: RefCell::new(Graph::default()),
      config,
    });
    let self_name = inner.config.self_name.clone();
    inner
      .graph
      .borrow_mut()
      .insert(self_name, Node::Container(WeakContainer::new(&inner)));
    Self { inner }
  }

  /// Returns the container stored under `key` in `registry`, creating it first if needed.
  pub fn keyed(registry: &ContainerRegistry, key: &str) -> Self {
    registry.get_or_create(key)
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.inner.config
  }

  /// Returns `true` if both handles refer to the same container.
  pub fn ptr_eq(a: &Container, b: &Container) -> bool {
    Rc::ptr_eq(&a.inner, &b.inner)
  }

  pub(crate) fn node(&self, name: &str) -> Option<Rc<Node>> {
    self.inner.graph.borrow().get(name)
  }

  // --- PRIVATE HELPERS ---

  fn insert_node(&self, name: String, node: Node) {
    let replaced = self.inner.graph.borrow_mut().insert(name.clone(), node);
    if replaced {
      debug!(service = %name, "overwrote existing registration");
    } else {
      debug!(service = %name, "registered");
    }
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Registers `provider` under `name`, replacing any previous registration.
  ///
  /// Fails only if the provider's declaration has no parameter list.
  pub fn register(&self, name: impl Into<String>, provider: Provider) -> Result<()> {
    let dependencies = signature::parse(&provider)?;
    self.insert_node(name.into(), Node::Provider(ProviderNode::new(provider, dependencies)));
    Ok(())
  }

  /// Registers a fixed value. Nothing about the value is inspected, so a
  /// [`Provider`] registered this way is stored, not run.
  pub fn register_value<T: Any>(&self, name: impl Into<String>, value: T) {
    self.insert_node(name.into(), Node::Value(Value::from_any(value)));
  }

  /// Registers every `(name, provider)` pair in order, stopping at the first failure.
  pub fn register_all<I, N>(&self, providers: I) -> Result<()>
  where
    I: IntoIterator<Item = (N, Provider)>,
    N: Into<String>,
  {
    providers
      .into_iter()
      .try_for_each(|(name, provider)| self.register(name, provider))
  }

  /// Registers a loaded module as a value: its default export if it has one,
  /// the module itself otherwise.
  pub fn register_module(&self, name: impl Into<String>, module: &dyn Module) {
    let value = module.default_export().unwrap_or_else(|| module.as_value());
    self.insert_node(name.into(), Node::Value(value));
  }

  /// Loads each requirement through `loader` and registers the result as a value.
  pub fn register_requirements(
    &self,
    loader: &dyn ModuleLoader,
    requirements: Requirements,
  ) -> Result<()> {
    for (name, specifier) in requirements.into_pairs() {
      let module = loader.load(&specifier)?;
      self.register_module(name, module.as_ref());
    }
    Ok(())
  }

  // --- Introspection ---

  /// Exact-name check; `_name_` and `name?` are not normalized here.
  pub fn is_registered(&self, name: &str) -> bool {
    self.inner.graph.borrow().contains(name)
  }

  /// All registered names in first-registration order.
  pub fn registered_names(&self) -> Vec<String> {
    self.inner.graph.borrow().names()
  }

  /// The dependencies of the provider registered under `name`.
  pub fn dependencies_of(&self, name: &str) -> Option<Vec<DependencyRef>> {
    match &*self.node(name)? {
      Node::Provider(node) => Some(node.dependencies.clone()),
      _ => None,
    }
  }

  /// The provider registered under `name`, if that name holds one.
  pub fn provider_of(&self, name: &str) -> Option<Provider> {
    match &*self.node(name)? {
      Node::Provider(node) => Some(node.provider.clone()),
      _ => None,
    }
  }

  /// Whether `name` already holds a value. Value registrations always do.
  pub fn is_resolved(&self, name: &str) -> bool {
    self.node(name).is_some_and(|node| node.is_resolved())
  }

  // --- Resolution ---

  /// Resolves `name`, running and memoizing providers as needed.
  ///
  /// `_name_` resolves `name`. `name?` makes the lookup optional: an
  /// unregistered name then resolves to `Ok(None)` instead of an error.
  pub fn resolve(&self, name: &str) -> Result<Option<Value>> {
    resolver::resolve_name(self, name, &ResolutionChain::new(None), None)
  }

  /// Resolves several names, returning their values in request order.
  pub fn resolve_many<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Option<Value>>> {
    resolver::resolve_many(self, names, None)
  }

  /// Like [`resolve_many`](Self::resolve_many), with `context` leading every
  /// chain reported in errors.
  pub fn resolve_many_in<S: AsRef<str>>(
    &self,
    names: &[S],
    context: &str,
  ) -> Result<Vec<Option<Value>>> {
    resolver::resolve_many(self, names, Some(context))
  }

  /// Resolves `name` and downcasts it to `T`.
  ///
  /// # Errors
  ///
  /// Besides the resolution errors of [`resolve`](Self::resolve), returns
  /// [`Error::NoValue`] when `name` resolves to nothing (a void callable, an
  /// unset provider, or an absent `name?`) and [`Error::TypeMismatch`] when it
  /// holds another type.
  pub fn get<T: Any>(&self, name: &str) -> Result<Rc<T>> {
    self.try_get(name)?.ok_or_else(|| Error::NoValue {
      name: name.to_owned(),
    })
  }

  /// Resolves `name` and downcasts it to `T`, keeping absence as `None`.
  pub fn try_get<T: Any>(&self, name: &str) -> Result<Option<Rc<T>>> {
    self
      .resolve(name)?
      .map(|value| {
        value.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
          name: name.to_owned(),
          expected: type_name::<T>(),
          found: value.type_name(),
        })
      })
      .transpose()
  }

  /// Resolves the dependencies of `provider` and runs it, returning its result.
  ///
  /// The provider is not registered and its result is not memoized.
  pub fn call(&self, provider: &Provider) -> Result<Option<Value>> {
    resolver::call(self, provider, &Locals::new(), None)
  }

  /// Like [`call`](Self::call), with `locals` shadowing graph nodes for the
  /// provider's direct dependencies and `context` leading error chains.
  pub fn call_with(
    &self,
    provider: &Provider,
    locals: &Locals,
    context: Option<&str>,
  ) -> Result<Option<Value>> {
    resolver::call(self, provider, locals, context)
  }

  /// Runs the provider found at `location` in `providers`, using the location as context.
  pub fn call_at(
    &self,
    providers: &dyn ProviderSource,
    location: &str,
    locals: &Locals,
  ) -> Result<Option<Value>> {
    let provider = source::provider_at(providers, location)?;
    resolver::call(self, &provider, locals, Some(location))
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("config", &self.inner.config)
      .field("names", &self.registered_names())
      .finish()
  }
}
