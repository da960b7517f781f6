use fibre_inject::{resolve, Container, Error, Provider};
use std::panic;

struct UnregisteredService;

fn main() {
  let container = Container::new();
  container
    .register("a", Provider::callable("|b|", |_| Ok(())))
    .unwrap();
  container
    .register("b", Provider::callable("|a|", |_| Ok(())))
    .unwrap();

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");
  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    let _service = resolve!(container, UnregisteredService, "unregistered");
  }));
  assert!(result.is_err(), "resolve! should have panicked.");

  // --- Using the fallible API ---
  match container.resolve("unregistered") {
    Err(Error::DependencyNotFound { chain }) => println!("Not found, chain: {:?}", chain),
    other => panic!("unexpected result: {:?}", other),
  }

  // Optional lookups never fail on absence.
  assert!(container.resolve("unregistered?").unwrap().is_none());

  match container.resolve("a") {
    Err(err @ Error::CircularDependency { .. }) => println!("{}", err),
    other => panic!("unexpected result: {:?}", other),
  }
}
