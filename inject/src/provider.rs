//! Provider descriptors: what to run, what it needs, and how to run it.

use crate::error::Result;
use crate::invoke::Arguments;
use crate::value::Value;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

/// How a provider turns its arguments into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
  /// A plain function, called with positional arguments and no receiver.
  Callable,
  /// A type that is instantiated from its constructor arguments.
  Constructible,
}

#[derive(Clone)]
pub(crate) enum Factory {
  Function(Rc<dyn Fn(&Arguments<'_>) -> Result<Option<Value>>>),
  Constructor(Rc<dyn Fn(&Arguments<'_>) -> Result<Value>>),
}

/// A type the container can build itself.
///
/// `DECLARATION` holds the constructor signature the dependencies are read
/// from, e.g. `"fn new(db, /* optional */ cache)"`.
///
/// ```
/// use fibre_inject::{Arguments, Container, Injectable, Provider, Result};
///
/// struct Greeter {
///   greeting: String,
/// }
///
/// impl Injectable for Greeter {
///   const DECLARATION: &'static str = "fn new(greeting: String)";
///
///   fn construct(args: &Arguments<'_>) -> Result<Self> {
///     Ok(Greeter { greeting: (*args.get::<String>(0)?).clone() })
///   }
/// }
///
/// let container = Container::new();
/// container.register_value("greeting", String::from("hello"));
/// container.register("greeter", Provider::constructible::<Greeter>()).unwrap();
///
/// let greeter = container.get::<Greeter>("greeter").unwrap();
/// assert_eq!(greeter.greeting, "hello");
/// ```
pub trait Injectable: Any + Sized {
  const DECLARATION: &'static str;

  fn construct(args: &Arguments<'_>) -> Result<Self>;
}

/// A registered factory together with the description of its dependencies.
#[derive(Clone)]
pub struct Provider {
  kind: ProviderKind,
  declaration: Cow<'static, str>,
  inject: Option<Vec<String>>,
  name: Option<String>,
  factory: Option<Factory>,
}

impl Provider {
  /// A plain function provider.
  ///
  /// The function's return value becomes the resolved value; returning `()`
  /// resolves to nothing, and returning a [`Value`] or `Option<Value>` is
  /// passed through without another layer of wrapping.
  pub fn callable<T, F>(declaration: impl Into<Cow<'static, str>>, f: F) -> Self
  where
    T: Any,
    F: Fn(&Arguments<'_>) -> Result<T> + 'static,
  {
    Self::with_factory(
      ProviderKind::Callable,
      declaration,
      Factory::Function(Rc::new(move |args: &Arguments<'_>| {
        f(args).map(into_output)
      })),
    )
  }

  /// A constructible provider from a closure that builds the instance.
  pub fn constructor<T, F>(declaration: impl Into<Cow<'static, str>>, f: F) -> Self
  where
    T: Any,
    F: Fn(&Arguments<'_>) -> Result<T> + 'static,
  {
    Self::with_factory(
      ProviderKind::Constructible,
      declaration,
      Factory::Constructor(Rc::new(move |args: &Arguments<'_>| {
        f(args).map(Value::from_any)
      })),
    )
  }

  /// A constructible provider for an [`Injectable`] type.
  pub fn constructible<T: Injectable>() -> Self {
    Self::constructor(T::DECLARATION, T::construct)
  }

  /// A provider with nothing to run. Resolving it yields no value.
  pub fn unset() -> Self {
    Self {
      kind: ProviderKind::Callable,
      declaration: Cow::Borrowed("||"),
      inject: None,
      name: None,
      factory: None,
    }
  }

  fn with_factory(
    kind: ProviderKind,
    declaration: impl Into<Cow<'static, str>>,
    factory: Factory,
  ) -> Self {
    Self {
      kind,
      declaration: declaration.into(),
      inject: None,
      name: None,
      factory: Some(factory),
    }
  }

  /// Overrides the declaration with an explicit, ordered list of dependency
  /// names. Entries may end in `?` to mark them optional.
  pub fn inject<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.inject = Some(names.into_iter().map(Into::into).collect());
    self
  }

  /// Declares the name this provider prefers to be registered under.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn kind(&self) -> ProviderKind {
    self.kind
  }

  pub fn declaration(&self) -> &str {
    &self.declaration
  }

  pub fn explicit_dependencies(&self) -> Option<&[String]> {
    self.inject.as_deref()
  }

  pub fn declared_name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn is_unset(&self) -> bool {
    self.factory.is_none()
  }

  pub(crate) fn factory(&self) -> Option<&Factory> {
    self.factory.as_ref()
  }
}

impl fmt::Debug for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Provider")
      .field("kind", &self.kind)
      .field("declaration", &self.declaration)
      .field("inject", &self.inject)
      .field("name", &self.name)
      .field("unset", &self.factory.is_none())
      .finish()
  }
}

fn into_output<T: Any>(output: T) -> Option<Value> {
  let any: &dyn Any = &output;
  if any.is::<()>() {
    return None;
  }
  if let Some(value) = any.downcast_ref::<Option<Value>>() {
    return value.clone();
  }
  Some(Value::from_any(output))
}
