use fibre_inject::{
  Arguments, Container, DependencyRef, Error, Injectable, Locals, Provider, Result, Value,
};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

// --- Test Fixtures ---

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

struct Clock {
  ticks: u64,
}

impl Injectable for Clock {
  const DECLARATION: &'static str = "impl Clock { pub fn new(start: u64) -> Self }";

  fn construct(args: &Arguments<'_>) -> Result<Self> {
    Ok(Clock {
      ticks: *args.get::<u64>(0)?,
    })
  }
}

fn sum_provider() -> Provider {
  Provider::callable("|a, b|", |args| Ok(*args.get::<i32>(0)? + *args.get::<i32>(1)?))
}

fn ints(values: Vec<Option<Value>>) -> Vec<i32> {
  values
    .into_iter()
    .map(|value| *value.unwrap().downcast::<i32>().unwrap())
    .collect()
}

// --- Basic Tests ---

#[test]
fn test_sum_of_registered_values() {
  // Arrange
  let container = Container::new();
  container.register_value("a", 1_i32);
  container.register_value("b", 2_i32);
  container.register("sum", sum_provider()).unwrap();

  // Act
  let sum = container.get::<i32>("sum").unwrap();

  // Assert
  assert_eq!(*sum, 3);
}

#[test]
fn test_batch_resolution_preserves_request_order() {
  let container = Container::new();
  container.register_value("a", 1_i32);
  container.register_value("b", 2_i32);

  assert_eq!(ints(container.resolve_many(&["a", "b"]).unwrap()), vec![1, 2]);
  assert_eq!(ints(container.resolve_many(&["b", "a"]).unwrap()), vec![2, 1]);
}

#[test]
fn test_factory_runs_once_and_value_is_identical() {
  // Arrange
  let calls = Rc::new(Cell::new(0));
  let counter = Rc::clone(&calls);
  let container = Container::new();
  container
    .register(
      "service",
      Provider::callable("||", move |_| {
        counter.set(counter.get() + 1);
        Ok(SimpleService { id: 7 })
      }),
    )
    .unwrap();
  container
    .register(
      "dependent",
      Provider::callable("|service|", |args| Ok(args.get::<SimpleService>(0)?.id)),
    )
    .unwrap();

  // Act
  let first = container.resolve("service").unwrap().unwrap();
  let second = container.resolve("service").unwrap().unwrap();
  container.resolve("dependent").unwrap();

  // Assert
  assert_eq!(calls.get(), 1);
  assert!(Value::ptr_eq(&first, &second));
  assert!(container.is_resolved("service"));
}

#[test]
fn test_reregistration_uses_the_latest_provider() {
  let container = Container::new();
  container
    .register("greeting", Provider::callable("||", |_| Ok("first")))
    .unwrap();
  container
    .register("greeting", Provider::callable("||", |_| Ok("second")))
    .unwrap();

  assert_eq!(*container.get::<&str>("greeting").unwrap(), "second");
  // The name keeps its original position.
  assert_eq!(container.registered_names(), vec!["container", "greeting"]);
}

#[test]
fn test_optional_dependency_resolves_to_none() {
  let container = Container::new();
  container
    .register(
      "report",
      Provider::callable("|/* optional */ logger, extra?|", |args| {
        Ok((args.value(0).is_none(), args.value(1).is_none()))
      }),
    )
    .unwrap();

  let report = container.get::<(bool, bool)>("report").unwrap();
  assert_eq!(*report, (true, true));
  assert!(container.resolve("missing?").unwrap().is_none());
}

#[test]
fn test_optional_dependency_uses_the_registered_value() {
  let container = Container::new();
  container.register_value("logger", String::from("stdout"));
  container
    .register(
      "report",
      Provider::callable("|logger?|", |args| {
        Ok(args.optional::<String>(0)?.map(|logger| (*logger).clone()))
      }),
    )
    .unwrap();

  let report = container.get::<Option<String>>("report").unwrap();
  assert_eq!(*report, Some("stdout".to_string()));
  assert_eq!(
    *container.resolve("logger?").unwrap().unwrap().downcast::<String>().unwrap(),
    "stdout"
  );
}

#[test]
fn test_shadowed_optional_names_agree_between_resolve_and_declarations() {
  let container = Container::new();
  container.register_value("a", 5_i32);
  container
    .register(
      "declared",
      Provider::callable("|_a_?|", |args| Ok(args.optional::<i32>(0)?.map(|a| *a))),
    )
    .unwrap();

  assert_eq!(
    container.dependencies_of("declared").unwrap(),
    vec![DependencyRef::optional("_a_")]
  );
  assert_eq!(*container.get::<Option<i32>>("declared").unwrap(), Some(5));
  assert_eq!(*container.get::<i32>("_a_?").unwrap(), 5);

  let empty = Container::new();
  assert!(empty.resolve("_a_?").unwrap().is_none());
}

#[test]
fn test_missing_dependency_reports_its_chain() {
  let container = Container::new();
  container
    .register("top", Provider::callable("|middle|", |_| Ok(())))
    .unwrap();
  container
    .register("middle", Provider::callable("|missing|", |_| Ok(())))
    .unwrap();

  assert_eq!(
    container.resolve("missing").unwrap_err(),
    Error::DependencyNotFound {
      chain: vec!["missing".into()]
    }
  );
  assert_eq!(
    container.resolve("top").unwrap_err(),
    Error::DependencyNotFound {
      chain: vec!["top".into(), "middle".into(), "missing".into()]
    }
  );
}

#[test]
fn test_shadow_underscores_resolve_the_same_node() {
  let container = Container::new();
  container.register_value("a", SimpleService { id: 1 });

  let plain = container.resolve("a").unwrap().unwrap();
  let shadowed = container.resolve("_a_").unwrap().unwrap();

  assert!(Value::ptr_eq(&plain, &shadowed));
  assert!(!container.is_registered("_a_"));
}

#[test]
fn test_constructible_instance_is_memoized() {
  let container = Container::new();
  container.register_value("start", 40_u64);
  container
    .register("clock", Provider::constructible::<Clock>())
    .unwrap();

  assert!(!container.is_resolved("clock"));
  let first = container.get::<Clock>("clock").unwrap();
  let second = container.get::<Clock>("clock").unwrap();

  assert_eq!(first.ticks, 40);
  assert!(Rc::ptr_eq(&first, &second));
  assert_eq!(
    container.dependencies_of("clock").unwrap(),
    vec![DependencyRef::required("start")]
  );
}

#[test]
fn test_call_with_truthy_local_override() {
  let container = Container::new();
  container.register_value("a", 1_i32);
  container.register_value("b", 2_i32);

  let result = container
    .call_with(&sum_provider(), &Locals::new().with("a", 5_i32), None)
    .unwrap()
    .unwrap();

  assert_eq!(*result.downcast::<i32>().unwrap(), 7);
}

#[test]
fn test_call_with_falsy_local_falls_through() {
  let container = Container::new();
  container.register_value("a", 1_i32);
  container.register_value("b", 2_i32);

  let result = container
    .call_with(&sum_provider(), &Locals::new().with("a", 0_i32), None)
    .unwrap()
    .unwrap();

  assert_eq!(*result.downcast::<i32>().unwrap(), 3);
}

#[test]
fn test_call_returns_the_function_result_without_registering() {
  let container = Container::new();
  container.register_value("name", String::from("fibre"));

  let greeting = container
    .call(&Provider::callable("fn greet(name: &str)", |args| {
      Ok(format!("hello {}", args.get::<String>(0)?))
    }))
    .unwrap()
    .unwrap();

  assert_eq!(*greeting.downcast::<String>().unwrap(), "hello fibre");
  assert_eq!(container.registered_names(), vec!["container", "name"]);
}

#[test]
fn test_explicit_dependency_list_wins() {
  let container = Container::new();
  container.register_value("x", 10_i32);
  container
    .register(
      "doubled",
      Provider::callable("this text is never parsed", |args| Ok(*args.get::<i32>(0)? * 2))
        .inject(["x", "unused?"]),
    )
    .unwrap();

  assert_eq!(*container.get::<i32>("doubled").unwrap(), 20);
  assert_eq!(
    container.dependencies_of("doubled").unwrap(),
    vec![DependencyRef::required("x"), DependencyRef::optional("unused")]
  );
}

#[test]
fn test_parse_error_on_registration() {
  let container = Container::new();

  let err = container
    .register("broken", Provider::callable("no parameters here", |_| Ok(())))
    .unwrap_err();

  assert!(matches!(err, Error::Parse { .. }));
  assert!(!container.is_registered("broken"));
}

#[test]
fn test_register_value_stores_providers_verbatim() {
  let container = Container::new();
  container.register_value("factory", Provider::callable("||", |_| Ok(1_i32)));

  let stored = container.get::<Provider>("factory").unwrap();
  assert_eq!(stored.declaration(), "||");
  assert!(container.dependencies_of("factory").is_none());
}

#[test]
fn test_void_and_unset_providers_resolve_to_nothing() {
  let container = Container::new();
  container
    .register("side_effect", Provider::callable("||", |_| Ok(())))
    .unwrap();
  container.register("placeholder", Provider::unset()).unwrap();

  assert!(container.resolve("side_effect").unwrap().is_none());
  assert!(container.resolve("placeholder").unwrap().is_none());
  assert!(container.is_resolved("side_effect"));
}

#[test]
fn test_get_distinguishes_no_value_from_unregistered() {
  let container = Container::new();
  container.register("placeholder", Provider::unset()).unwrap();

  assert_eq!(
    container.get::<i32>("placeholder").unwrap_err(),
    Error::NoValue {
      name: "placeholder".into()
    }
  );
  assert_eq!(
    container.get::<i32>("unregistered").unwrap_err(),
    Error::DependencyNotFound {
      chain: vec!["unregistered".into()]
    }
  );
  assert!(container.try_get::<i32>("placeholder").unwrap().is_none());
}

#[test]
fn test_type_mismatch_is_reported() {
  let container = Container::new();
  container.register_value("port", 8080_u16);

  let err = container.get::<String>("port").unwrap_err();
  assert_eq!(
    err,
    Error::TypeMismatch {
      name: "port".into(),
      expected: std::any::type_name::<String>(),
      found: std::any::type_name::<u16>(),
    }
  );
}

#[test]
fn test_container_registers_itself() {
  let container = Container::new();

  assert!(container.is_registered("container"));
  let resolved = container.get::<Container>("container").unwrap();
  assert!(Container::ptr_eq(&container, &resolved));
}

#[test]
fn test_self_registration_resolves_to_the_identical_value() {
  let container = Container::new();

  let first = container.resolve("container").unwrap().unwrap();
  let second = container.resolve("container").unwrap().unwrap();

  assert!(Value::ptr_eq(&first, &second));
  assert!(Container::ptr_eq(
    &container,
    &first.downcast::<Container>().unwrap()
  ));
}
