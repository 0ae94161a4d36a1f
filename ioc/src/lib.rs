//! # Weft IoC
//!
//! An in-process object-graph resolver. Factories are registered against a
//! type (and optionally a name); consumer functions declare what they need
//! through their parameter types, and the container builds and wires
//! everything on demand.
//!
//! ## Core Concepts
//!
//! - **Service**: a singleton registration, built at most once per container.
//! - **Component**: a transient registration, built on every resolution.
//! - **Index**: a type plus an optional name. A named request with no
//!   registration of its own falls back to the bare type.
//! - **Injection**: factories, consumers and configuration functions are all
//!   plain functions whose parameters (`Arc<T>`, `Option<Arc<T>>`,
//!   `Named<T, N>`) are resolved from the container before they run.
//! - **Configuration**: post-construction callbacks attached to an index.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use weft_ioc::Container;
//!
//! struct Database {
//!   url: String,
//! }
//!
//! struct Mapper {
//!   db: Arc<Database>,
//! }
//!
//! let mut container = Container::new();
//! container
//!   .add_service(|| Database { url: "postgres://localhost/app".into() })
//!   .unwrap();
//! container
//!   .add_service(|db: Arc<Database>| Mapper { db })
//!   .unwrap();
//!
//! let mapper = container.invoke(|mapper: Arc<Mapper>| mapper).unwrap();
//! let db = container.invoke(|db: Arc<Database>| db).unwrap();
//!
//! assert!(Arc::ptr_eq(&mapper.db, &db));
//! assert_eq!(db.url, "postgres://localhost/app");
//! ```

mod builder;
mod container;
mod core;
mod error;
mod hierarchy;
mod inject;
mod macros;
mod provider;
#[cfg(feature = "shared")]
mod shared;

pub use builder::ContainerBuilder;
pub use container::{Container, Factory};
pub use crate::core::{Index, Instance, Lifetime, TypeKey};
pub use error::{Error, Result};
pub use inject::{Inject, Injector, IntoInjector, Name, Named, Param};
pub use provider::Provider;
#[cfg(feature = "shared")]
pub use shared::SharedContainer;
