use fibre_inject::{Arguments, Container, Injectable, Provider, Result};
use std::rc::Rc;

trait Logger {
  fn log(&self, message: &str);
}

struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// A service that depends on the abstraction and optionally on a title.
struct ReportService {
  logger: Rc<dyn Logger>,
  title: Option<Rc<String>>,
}

impl Injectable for ReportService {
  const DECLARATION: &'static str = r#"
    impl ReportService {
      fn new(logger: Rc<dyn Logger>, /* optional */ title: Option<String>) -> Self
    }
  "#;

  fn construct(args: &Arguments<'_>) -> Result<Self> {
    Ok(ReportService {
      logger: (*args.get::<Rc<dyn Logger>>(0)?).clone(),
      title: args.optional::<String>(1)?,
    })
  }
}

impl ReportService {
  fn generate_report(&self) {
    let title = self.title.as_deref().map_or("untitled", String::as_str);
    self.logger.log(&format!("Starting report '{}'.", title));
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  let container = Container::new();

  // Trait objects are stored as `Rc<dyn Trait>` values.
  container
    .register(
      "logger",
      Provider::callable("||", |_| Ok(Rc::new(ConsoleLogger) as Rc<dyn Logger>)),
    )
    .unwrap();
  container
    .register("reports", Provider::constructible::<ReportService>())
    .unwrap();

  println!("Resolving the high-level service...");
  let reports = container.get::<ReportService>("reports").unwrap();
  reports.generate_report();
}
