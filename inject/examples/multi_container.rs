use fibre_inject::{Container, ContainerRegistry};

// A function that configures dependencies and runs some logic.
// By accepting a `&Container`, it can be tested with a controlled environment.
fn process_data(container: &Container) -> String {
  container.register_value("data", "test data".to_string());

  let data = container.get::<String>("data").expect("Data not found in container");
  format!("Processed: {}", data.to_uppercase())
}

fn main() {
  let registry = ContainerRegistry::new();

  println!("--- Running with a keyed container ---");
  let app = Container::keyed(&registry, "app");
  let result = process_data(&app);
  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // The same key hands back the same container.
  let again = Container::keyed(&registry, "app");
  assert!(again.is_registered("data"));

  // --- Verify Isolation ---
  let other = Container::keyed(&registry, "other");
  assert!(!other.is_registered("data"));
  assert!(!Container::new().is_registered("data"));

  println!("Verified that differently keyed containers are isolated.");
}
