use fibre_inject::{Container, Provider};
use std::cell::Cell;
use std::rc::Rc;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn main() {
  let container = Container::new();
  let next_id = Rc::new(Cell::new(0));

  // This factory will only be called ONCE per container.
  let ids = Rc::clone(&next_id);
  container
    .register(
      "tracker",
      Provider::callable("||", move |_| {
        println!("Creating RequestTracker...");
        let id = ids.get();
        ids.set(id + 1);
        Ok(RequestTracker { id })
      }),
    )
    .expect("declaration should parse");

  // A dependent provider reuses the memoized tracker.
  container
    .register(
      "report",
      Provider::callable("|tracker|", |args| {
        Ok(format!("report for request {}", args.get::<RequestTracker>(0)?.id))
      }),
    )
    .expect("declaration should parse");

  let t1 = container.get::<RequestTracker>("tracker").unwrap();
  let t2 = container.get::<RequestTracker>("tracker").unwrap();
  let report = container.get::<String>("report").unwrap();

  println!("Tracker 1 ID: {}, Tracker 2 ID: {}", t1.id, t2.id);
  println!("{}", report);
  assert!(Rc::ptr_eq(&t1, &t2), "Memoized instances should be identical");
  assert_eq!(next_id.get(), 1);
}
