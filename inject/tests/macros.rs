//! Tests for the `resolve!`, `maybe_resolve!` and `provider!` macros.

use fibre_inject::{maybe_resolve, provider, resolve, Container, DependencyRef};
use std::rc::Rc;

// --- Test Fixtures ---

struct MacroTestService {
  value: i32,
}

// --- Macro Tests ---

#[test]
fn test_resolve_returns_the_typed_service() {
  let container = Container::new();
  container.register_value("service", MacroTestService { value: 42 });

  let first = resolve!(container, MacroTestService, "service");
  let second = resolve!(&container, MacroTestService, "service");

  assert_eq!(first.value, 42);
  assert!(Rc::ptr_eq(&first, &second));
}

#[test]
#[should_panic(expected = "Failed to resolve required service 'missing'")]
fn test_resolve_panics_when_missing() {
  let container = Container::new();
  resolve!(container, MacroTestService, "missing");
}

#[test]
#[should_panic(expected = "Circular dependency detected: a -> b -> a")]
fn test_resolve_panics_on_cycles() {
  let container = Container::new();
  container.register("a", provider!(|b: i32| *b)).unwrap();
  container.register("b", provider!(|a: i32| *a)).unwrap();

  resolve!(container, i32, "a");
}

#[test]
fn test_maybe_resolve() {
  let container = Container::new();
  container.register_value("number", 5_u8);

  assert_eq!(*maybe_resolve!(container, u8, "number").unwrap(), 5);
  // Wrong type and missing name both yield None.
  assert!(maybe_resolve!(container, String, "number").is_none());
  assert!(maybe_resolve!(container, u8, "other").is_none());
}

#[test]
fn test_provider_macro_declares_its_parameters() {
  let container = Container::new();
  container.register_value("width", 3_u32);
  container.register_value("height", 4_u32);
  container
    .register("area", provider!(|width: u32, height: u32| *width * *height))
    .unwrap();
  container.register("unit", provider!(|| "unit")).unwrap();

  assert_eq!(
    container.dependencies_of("area").unwrap(),
    vec![DependencyRef::required("width"), DependencyRef::required("height")]
  );
  assert_eq!(*resolve!(container, u32, "area"), 12);
  assert_eq!(*resolve!(container, &str, "unit"), "unit");
}
