//! Core data structures shared by the registry: type tokens, indices and
//! type-erased instances.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::inject::Injector;

/// A runtime token identifying a type.
///
/// Equality and hashing only look at the `TypeId`; the type name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// The lookup key of a registration: a type plus an optional name.
///
/// A named index is distinct from the bare index of the same type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Index {
  ty: TypeKey,
  name: Option<String>,
}

impl Index {
  pub fn new(ty: TypeKey, name: Option<&str>) -> Self {
    Self {
      ty,
      name: name.map(str::to_owned),
    }
  }

  pub fn of<T: ?Sized + Any>(name: Option<&str>) -> Self {
    Self::new(TypeKey::of::<T>(), name)
  }

  pub fn ty(&self) -> TypeKey {
    self.ty
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn is_named(&self) -> bool {
    self.name.is_some()
  }

  /// The same type without a name.
  pub fn bare(&self) -> Self {
    Self {
      ty: self.ty,
      name: None,
    }
  }

  /// The same name attached to another type.
  pub(crate) fn retyped(&self, ty: TypeKey) -> Self {
    Self {
      ty,
      name: self.name.clone(),
    }
  }
}

impl fmt::Debug for Index {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "Index({}, Name({}))", self.ty.name, name),
      None => write!(f, "Index({})", self.ty.name),
    }
  }
}

impl fmt::Display for Index {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "{}[\"{}\"]", self.ty.name, name),
      None => write!(f, "{}", self.ty.name),
    }
  }
}

/// A type-erased shared object held by the container.
///
/// The payload is always an `Arc<T>` boxed behind `dyn Any`, which lets `T`
/// be a trait object.
#[derive(Clone)]
pub struct Instance {
  key: TypeKey,
  value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  pub fn from_arc<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      key: TypeKey::of::<T>(),
      value: Arc::new(value),
    }
  }

  /// The type this instance was built as.
  pub fn key(&self) -> TypeKey {
    self.key
  }

  pub fn is<T: ?Sized + Any + Send + Sync>(&self) -> bool {
    self.value.is::<Arc<T>>()
  }

  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.value.downcast_ref::<Arc<T>>().cloned()
  }

  /// Returns `true` if both handles refer to the same stored object.
  pub fn ptr_eq(&self, other: &Instance) -> bool {
    Arc::ptr_eq(&self.value, &other.value)
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.key.name)
  }
}

/// How long a constructed object lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
  /// Built at most once and shared for the container's lifetime.
  Service,
  /// Built anew on every resolution, never cached.
  Component,
}

impl Lifetime {
  pub fn is_singleton(self) -> bool {
    matches!(self, Lifetime::Service)
  }
}

impl fmt::Display for Lifetime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Lifetime::Service => f.write_str("service"),
      Lifetime::Component => f.write_str("component"),
    }
  }
}

/// What is stored at an index. A missing factory marks a direct instance,
/// which is always a service.
pub(crate) struct Registration {
  pub(crate) lifetime: Lifetime,
  pub(crate) factory: Option<Arc<Injector<Instance>>>,
}

impl Registration {
  pub(crate) fn factory(lifetime: Lifetime, factory: Injector<Instance>) -> Self {
    Self {
      lifetime,
      factory: Some(Arc::new(factory)),
    }
  }

  pub(crate) fn instance() -> Self {
    Self {
      lifetime: Lifetime::Service,
      factory: None,
    }
  }
}

/// Tracks the indices currently under construction so a factory that needs
/// its own index, directly or transitively, is caught before it recurses.
///
/// The stack sits behind its own lock so a [`ResolutionGuard`] can pop it
/// while the container is mutably borrowed by the construction it guards.
#[derive(Default)]
pub(crate) struct ResolutionStack {
  indices: Arc<Mutex<Vec<Index>>>,
}

impl ResolutionStack {
  /// Pushes `index`, or returns the cycle path if it is already being built.
  pub(crate) fn enter(&self, index: &Index) -> Result<ResolutionGuard, Vec<Index>> {
    let mut indices = self.indices.lock();
    if let Some(start) = indices.iter().position(|i| i == index) {
      let mut path = indices[start..].to_vec();
      path.push(index.clone());
      return Err(path);
    }
    let depth = indices.len();
    indices.push(index.clone());
    Ok(ResolutionGuard {
      indices: Arc::clone(&self.indices),
      depth,
    })
  }
}

/// Pops its index off the resolution stack when dropped, including when the
/// factory it guards unwinds.
pub(crate) struct ResolutionGuard {
  indices: Arc<Mutex<Vec<Index>>>,
  depth: usize,
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    self.indices.lock().truncate(self.depth);
  }
}
