//! Public macros for ergonomic provider declaration and resolution.

/// Resolves a named service from a container and downcasts it, panicking on failure.
///
/// This is the shorthand for dependencies that must exist. For a fallible
/// version, use [`Container::get`](crate::Container::get) directly.
///
/// # Panics
///
/// Panics if the name cannot be resolved, resolves to nothing, or holds a
/// value of another type.
///
/// # Examples
///
/// ```
/// use fibre_inject::{resolve, Container};
///
/// let container = Container::new();
/// container.register_value("greeting", String::from("hello"));
///
/// let message = resolve!(container, String, "greeting");
/// assert_eq!(*message, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($container:expr, $type:ty, $name:expr) => {
    $container.get::<$type>($name).unwrap_or_else(|err| {
      panic!(
        "Failed to resolve required service '{}' as {}: {}",
        $name,
        std::any::type_name::<$type>(),
        err
      )
    })
  };
}

/// Resolves a named service if it is registered and has the requested type.
///
/// Yields `Option<Rc<T>>`; any failure becomes `None`.
///
/// ```
/// use fibre_inject::{maybe_resolve, Container};
///
/// let container = Container::new();
/// assert!(maybe_resolve!(container, String, "missing").is_none());
/// ```
#[macro_export]
macro_rules! maybe_resolve {
  ($container:expr, $type:ty, $name:expr) => {
    $container.try_get::<$type>($name).ok().flatten()
  };
}

/// Builds a callable [`Provider`](crate::Provider) from a closure with typed parameters.
///
/// The parameter names become the dependency names, and each argument is
/// handed to the body as an `Rc<T>`.
///
/// ```
/// use fibre_inject::{provider, Container};
///
/// let container = Container::new();
/// container.register_value("a", 1_i32);
/// container.register_value("b", 2_i32);
/// container.register("sum", provider!(|a: i32, b: i32| *a + *b)).unwrap();
///
/// assert_eq!(*container.get::<i32>("sum").unwrap(), 3);
/// ```
#[macro_export]
macro_rules! provider {
  (|| $body:expr) => {
    $crate::Provider::callable("||", move |_args: &$crate::Arguments<'_>| {
      Ok::<_, $crate::Error>($body)
    })
  };
  (|$($arg:ident : $type:ty),* $(,)?| $body:expr) => {
    $crate::Provider::callable(
      stringify!(|$($arg),*|),
      move |args: &$crate::Arguments<'_>| {
        let mut _index = 0usize;
        $(
          let $arg: ::std::rc::Rc<$type> = args.get::<$type>(_index)?;
          _index += 1;
        )*
        Ok::<_, $crate::Error>($body)
      },
    )
  };
}
