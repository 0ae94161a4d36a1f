//! A thread-safe handle around a `Container`.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::container::{Container, Factory};
use crate::core::Lifetime;
use crate::error::Result;
use crate::inject::IntoInjector;

/// A `Container` shared between threads.
///
/// Every call takes one exclusive lock for its whole duration, so the first
/// resolution of a service builds it exactly once and concurrent callers
/// observe the cached instance. Clones share the same registry.
#[derive(Clone, Default)]
pub struct SharedContainer {
  inner: Arc<Mutex<Container>>,
}

impl SharedContainer {
  pub fn new(container: Container) -> Self {
    Self {
      inner: Arc::new(Mutex::new(container)),
    }
  }

  /// Runs `f` with exclusive access to the container.
  pub fn with<R>(&self, f: impl FnOnce(&mut Container) -> R) -> R {
    let mut guard = self.inner.lock();
    f(&mut guard)
  }

  pub fn register(&self, factory: Factory, lifetime: Lifetime) -> Result<()> {
    self.with(|container| container.register(factory, lifetime))
  }

  pub fn override_factory(&self, factory: Factory, lifetime: Lifetime) -> Result<()> {
    self.with(|container| container.override_factory(factory, lifetime))
  }

  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Result<Arc<T>> {
    self.with(|container| container.get::<T>(name))
  }

  pub fn invoke<A, R, F>(&self, func: F) -> Result<R>
  where
    R: 'static,
    F: IntoInjector<A, R>,
  {
    self.with(|container| container.invoke(func))
  }

  pub fn configure<A, F>(&self, func: F) -> Result<()>
  where
    F: IntoInjector<A, ()>,
  {
    self.with(|container| container.configure(func))
  }
}

impl From<Container> for SharedContainer {
  fn from(container: Container) -> Self {
    Self::new(container)
  }
}
