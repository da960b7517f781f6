//! # Fibre Inject
//!
//! A named-provider dependency injection runtime for Rust.
//!
//! Providers are registered under names together with a description of what
//! they need: either an explicit list of dependency names or a declaration
//! that reads like the provider's signature. Resolving a name walks the
//! dependency graph depth-first, runs each provider at most once, and caches
//! the result on its node.
//!
//! ## Core Concepts
//!
//! - **Container**: owns the graph of named nodes. Every container registers
//!   itself under `"container"` so providers can depend on it.
//! - **Provider**: a callable or a constructible type, tagged as such at
//!   registration.
//! - **Optional dependencies**: `name?` (or `/* optional */ name` in a
//!   declaration) resolves to `None` when nothing is registered.
//! - **Cycles**: detected along the resolution chain and reported with the
//!   full cycle.
//! - **ContainerRegistry**: create-or-fetch storage for containers shared
//!   under an identity key.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_inject::{Container, Provider};
//!
//! struct Database {
//!   url: String,
//! }
//!
//! struct UserService {
//!   db: std::rc::Rc<Database>,
//! }
//!
//! let container = Container::new();
//! container.register_value("url", String::from("postgres://localhost/app"));
//!
//! container
//!   .register(
//!     "db",
//!     Provider::callable("|url|", |args| {
//!       Ok(Database { url: (*args.get::<String>(0)?).clone() })
//!     }),
//!   )
//!   .unwrap();
//!
//! container
//!   .register(
//!     "users",
//!     Provider::constructor("fn new(db, /* optional */ cache)", |args| {
//!       Ok(UserService { db: args.get::<Database>(0)? })
//!     }),
//!   )
//!   .unwrap();
//!
//! let users = container.get::<UserService>("users").unwrap();
//! assert_eq!(users.db.url, "postgres://localhost/app");
//! ```

mod config;
mod container;
mod core;
mod error;
mod invoke;
mod macros;
mod provider;
mod registry;
mod resolver;
pub mod signature;
pub mod source;
mod value;

pub use config::{ContainerConfig, LocalOverrides};
pub use container::Container;
pub use crate::core::ResolutionChain;
pub use error::{Error, Result};
pub use invoke::Arguments;
pub use provider::{Injectable, Provider, ProviderKind};
pub use registry::ContainerRegistry;
pub use signature::DependencyRef;
pub use source::{Module, ModuleLoader, ProviderSource, Requirements};
pub use value::{Locals, Value};
