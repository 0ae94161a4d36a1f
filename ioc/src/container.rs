//! The main `Container` struct and its associated methods.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::builder::ContainerBuilder;
use crate::core::{Index, Instance, Lifetime, Registration, ResolutionStack, TypeKey};
use crate::error::{Error, Result};
use crate::hierarchy::Hierarchy;
use crate::inject::{Injector, IntoInjector, Param};
use crate::provider::Provider;

/// A factory bound to the index it produces.
pub struct Factory {
  index: Index,
  injector: Injector<Instance>,
}

impl Factory {
  /// A factory for `T`. Its parameters are resolved from the container
  /// before it runs.
  pub fn new<T, A, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: IntoInjector<A, T>,
  {
    Self {
      index: Index::of::<T>(None),
      injector: factory.into_injector().map(Instance::new::<T>),
    }
  }

  /// A factory producing an already shared value, typically a trait object.
  pub fn shared<I, A, F>(factory: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    F: IntoInjector<A, Arc<I>>,
  {
    Self {
      index: Index::of::<I>(None),
      injector: factory.into_injector().map(Instance::from_arc::<I>),
    }
  }

  /// A factory whose output is only checked against `ty` when it runs.
  /// Output that is neither `ty` nor a declared subtype of it fails with
  /// `WrongReturnType`.
  pub fn dynamic(ty: TypeKey, injector: Injector<Instance>) -> Self {
    Self {
      index: Index::new(ty, None),
      injector,
    }
  }

  pub fn named(mut self, name: &str) -> Self {
    self.index = Index::new(self.index.ty(), Some(name));
    self
  }

  pub fn index(&self) -> &Index {
    &self.index
  }
}

impl fmt::Debug for Factory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Factory")
      .field("index", &self.index)
      .field("params", &self.injector.params())
      .finish()
  }
}

/// The dependency registry.
///
/// Holds factories, direct instances, cached singletons and pending
/// configuration functions. Every operation runs to completion on the
/// calling thread; wrap the container in a `SharedContainer` to use it from
/// several threads.
pub struct Container {
  entries: HashMap<Index, Registration>,
  instances: HashMap<Index, Instance>,
  configs: HashMap<Index, Vec<Arc<Injector<()>>>>,
  hierarchy: Hierarchy,
  stack: ResolutionStack,
  detect_cycles: bool,
}

impl Default for Container {
  fn default() -> Self {
    ContainerBuilder::new().build()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("registrations", &self.entries.len())
      .field("instances", &self.instances.len())
      .field("pending_configs", &self.configs.len())
      .field("detect_cycles", &self.detect_cycles)
      .finish()
  }
}

impl Container {
  /// Creates a new, empty `Container` with default options.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  pub(crate) fn with_options(detect_cycles: bool) -> Self {
    Self {
      entries: HashMap::new(),
      instances: HashMap::new(),
      configs: HashMap::new(),
      hierarchy: Hierarchy::default(),
      stack: ResolutionStack::default(),
      detect_cycles,
    }
  }

  // --- Registration ---

  /// Registers `factory` at its index.
  ///
  /// Fails with `DuplicateRegistration` if the index already holds a factory
  /// or an instance.
  pub fn register(&mut self, factory: Factory, lifetime: Lifetime) -> Result<()> {
    let Factory { index, injector } = factory;
    if self.entries.contains_key(&index) {
      return Err(Error::duplicate(&index));
    }
    debug!(index = %index, lifetime = %lifetime, "Registered factory");
    self
      .entries
      .insert(index, Registration::factory(lifetime, injector));
    Ok(())
  }

  /// Replaces the factory at `factory`'s index, or registers it if the index
  /// is free.
  ///
  /// The lifetime must match the existing registration, and a service can
  /// only be overridden until its instance has been built.
  pub fn override_factory(&mut self, factory: Factory, lifetime: Lifetime) -> Result<()> {
    let existing = match self.entries.get(&factory.index) {
      Some(existing) => existing.lifetime,
      None => return self.register(factory, lifetime),
    };
    let Factory { index, injector } = factory;
    if existing != lifetime {
      return Err(Error::conflicting(&index, existing, lifetime));
    }
    if existing.is_singleton() && self.instances.contains_key(&index) {
      return Err(Error::already_initialized(&index));
    }
    debug!(index = %index, lifetime = %lifetime, "Overrode factory");
    self
      .entries
      .insert(index, Registration::factory(lifetime, injector));
    Ok(())
  }

  pub fn add_service<T, A, F>(&mut self, factory: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: IntoInjector<A, T>,
  {
    self.register(Factory::new(factory), Lifetime::Service)
  }

  pub fn add_service_with_name<T, A, F>(&mut self, name: &str, factory: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: IntoInjector<A, T>,
  {
    self.register(Factory::new(factory).named(name), Lifetime::Service)
  }

  pub fn add_component<T, A, F>(&mut self, factory: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: IntoInjector<A, T>,
  {
    self.register(Factory::new(factory), Lifetime::Component)
  }

  pub fn add_component_with_name<T, A, F>(&mut self, name: &str, factory: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: IntoInjector<A, T>,
  {
    self.register(Factory::new(factory).named(name), Lifetime::Component)
  }

  // --- Direct instances ---

  pub fn add_instance<T: Any + Send + Sync>(&mut self, value: T) -> Result<()> {
    self.insert_internal(TypeKey::of::<T>(), None, Instance::new(value), false)
  }

  pub fn add_instance_with_name<T: Any + Send + Sync>(&mut self, name: &str, value: T) -> Result<()> {
    self.insert_internal(TypeKey::of::<T>(), Some(name), Instance::new(value), false)
  }

  /// Stores a pre-built object at `(ty, name)`.
  ///
  /// The instance must be a `ty`, either directly or through a declared
  /// supertype; otherwise this fails with `InvalidArgument`.
  pub fn insert_instance(&mut self, ty: TypeKey, name: Option<&str>, instance: Instance) -> Result<()> {
    self.insert_internal(ty, name, instance, false)
  }

  /// Like [`insert_instance`](Self::insert_instance), but replaces an
  /// existing service or instance. Replacing a component fails with
  /// `ConflictingKind`.
  pub fn replace_instance(&mut self, ty: TypeKey, name: Option<&str>, instance: Instance) -> Result<()> {
    self.insert_internal(ty, name, instance, true)
  }

  fn insert_internal(
    &mut self,
    ty: TypeKey,
    name: Option<&str>,
    instance: Instance,
    replace: bool,
  ) -> Result<()> {
    let index = Index::new(ty, name);
    let value = self
      .hierarchy
      .cast(&instance, ty)
      .ok_or_else(|| Error::InvalidArgument {
        reason: format!("{} is not an instance of {}", instance.key(), ty),
      })?;

    match self.entries.get(&index) {
      Some(_) if !replace => return Err(Error::duplicate(&index)),
      Some(existing) if existing.lifetime == Lifetime::Component => {
        return Err(Error::conflicting(&index, Lifetime::Component, Lifetime::Service));
      }
      _ => {}
    }

    debug!(index = %index, replace, "Inserted instance");
    self.entries.insert(index.clone(), Registration::instance());
    self.instances.insert(index.clone(), value);
    self.dispatch_configuration(&index, &instance, true)
  }

  /// Declares that every `S` is also a `P`.
  ///
  /// Configuration registered for `P` then also applies to `S` instances, and
  /// dynamic factories registered for `P` may produce an `S`.
  pub fn declare_supertype<S, P>(&mut self, cast: impl Fn(Arc<S>) -> Arc<P> + Send + Sync + 'static)
  where
    S: ?Sized + Any + Send + Sync,
    P: ?Sized + Any + Send + Sync,
  {
    debug!(
      subtype = std::any::type_name::<S>(),
      supertype = std::any::type_name::<P>(),
      "Declared supertype"
    );
    self.hierarchy.declare::<S, P, _>(cast);
  }

  /// Runs a batch of registrations.
  pub fn apply<P: Provider + ?Sized>(&mut self, provider: &P) -> Result<()> {
    provider.provide(self)
  }

  // --- Queries ---

  /// Returns `true` if resolving `(ty, name)` would find a factory or an
  /// instance, counting the fallback to the bare type.
  pub fn contains(&self, ty: TypeKey, name: Option<&str>) -> bool {
    self.effective_index(&Index::new(ty, name)).is_some()
  }

  /// Returns `true` if a singleton is cached at exactly `(ty, name)`.
  pub fn is_initialized(&self, ty: TypeKey, name: Option<&str>) -> bool {
    self.instances.contains_key(&Index::new(ty, name))
  }

  /// The number of registered indices.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  // --- Resolution ---

  /// Resolves a typed dependency.
  pub fn get<T: ?Sized + Any + Send + Sync>(&mut self, name: Option<&str>) -> Result<Arc<T>> {
    let instance = self.resolve(TypeKey::of::<T>(), name)?;
    instance
      .downcast::<T>()
      .ok_or_else(|| Error::WrongReturnType {
        index: Index::of::<T>(name).to_string(),
        expected: std::any::type_name::<T>(),
        actual: instance.key().name(),
      })
  }

  /// Returns the instance for `(ty, name)`, building it if needed.
  ///
  /// An exact named registration always wins. A named request with no
  /// registration of its own falls back to the bare type, whose instance is
  /// cached under the bare index only.
  pub fn resolve(&mut self, ty: TypeKey, name: Option<&str>) -> Result<Instance> {
    let requested = Index::new(ty, name);
    if let Some(instance) = self.instances.get(&requested) {
      trace!(index = %requested, "Resolved cached instance");
      return Ok(instance.clone());
    }

    let index = self
      .effective_index(&requested)
      .ok_or_else(|| Error::undefined(&requested))?;
    if index != requested {
      trace!(requested = %requested, index = %index, "Falling back to default registration");
      if let Some(instance) = self.instances.get(&index) {
        return Ok(instance.clone());
      }
    }

    self.construct(&index)
  }

  /// Calls `func` with every parameter resolved from the container.
  ///
  /// Optional parameters with nothing registered for them are passed as
  /// absent; `func` runs regardless.
  pub fn invoke<A, R, F>(&mut self, func: F) -> Result<R>
  where
    R: 'static,
    F: IntoInjector<A, R>,
  {
    let injector = func.into_injector();
    let args = self.resolve_params(injector.params())?;
    injector.call(args)
  }

  /// Attaches a configuration function to the index named by its single
  /// parameter.
  ///
  /// If the singleton at that index already exists the function runs on it
  /// now. Otherwise it runs when the index is next built: once for a
  /// service, on every build for a component.
  pub fn configure<A, F>(&mut self, func: F) -> Result<()>
  where
    F: IntoInjector<A, ()>,
  {
    let injector = func.into_injector();
    let [param] = injector.params() else {
      return Err(Error::InvalidArgument {
        reason: format!(
          "a configuration function takes exactly one parameter, found {}",
          injector.params().len()
        ),
      });
    };
    let ty = param.ty().ok_or_else(|| missing_type_hint(param, 0))?;
    let requested = Index::new(ty, param.name());
    let index = self
      .effective_index(&requested)
      .ok_or_else(|| Error::undefined(&requested))?;

    if let Some(instance) = self.instances.get(&index).cloned() {
      debug!(index = %index, "Configuring initialized instance");
      return injector.call(vec![Some(instance)]);
    }

    debug!(index = %index, "Queued configuration");
    self
      .configs
      .entry(index)
      .or_default()
      .push(Arc::new(injector));
    Ok(())
  }

  // --- PRIVATE HELPERS ---

  fn effective_index(&self, requested: &Index) -> Option<Index> {
    if self.entries.contains_key(requested) {
      return Some(requested.clone());
    }
    let bare = requested.bare();
    if requested.is_named() && self.entries.contains_key(&bare) {
      return Some(bare);
    }
    None
  }

  fn construct(&mut self, index: &Index) -> Result<Instance> {
    let (lifetime, factory) = match self.entries.get(index) {
      Some(Registration {
        lifetime,
        factory: Some(factory),
      }) => (*lifetime, Arc::clone(factory)),
      // Direct instances are cached on insertion, so an entry without a
      // factory never reaches this point with its instance missing.
      _ => return Err(Error::undefined(index)),
    };

    let _guard = if self.detect_cycles {
      Some(self.stack.enter(index).map_err(|path| Error::cyclic(&path))?)
    } else {
      None
    };
    self.build(index, lifetime, &factory)
  }

  fn build(
    &mut self,
    index: &Index,
    lifetime: Lifetime,
    factory: &Injector<Instance>,
  ) -> Result<Instance> {
    let args = self.resolve_params(factory.params())?;
    debug!(index = %index, lifetime = %lifetime, "Running factory");
    let produced = factory.call(args)?;
    let value = self
      .hierarchy
      .cast(&produced, index.ty())
      .ok_or_else(|| Error::WrongReturnType {
        index: index.to_string(),
        expected: index.ty().name(),
        actual: produced.key().name(),
      })?;

    self.dispatch_configuration(index, &produced, lifetime.is_singleton())?;
    if lifetime.is_singleton() {
      self.instances.insert(index.clone(), value.clone());
    }
    Ok(value)
  }

  fn resolve_params(&mut self, params: &[Param]) -> Result<Vec<Option<Instance>>> {
    let mut types = Vec::with_capacity(params.len());
    for (position, param) in params.iter().enumerate() {
      types.push(param.ty().ok_or_else(|| missing_type_hint(param, position))?);
    }

    let mut args = Vec::with_capacity(params.len());
    for (param, ty) in params.iter().zip(types) {
      if param.is_optional() && !self.contains(ty, param.name()) {
        trace!(param = %param, "Optional parameter left absent");
        args.push(None);
        continue;
      }
      args.push(Some(self.resolve(ty, param.name())?));
    }
    Ok(args)
  }

  /// Runs the configuration registered for each type in the produced
  /// value's lineage, under the name of `index`. With `drain`, the list at
  /// `index` itself is discarded once it has run.
  fn dispatch_configuration(&mut self, index: &Index, produced: &Instance, drain: bool) -> Result<()> {
    for view in self.hierarchy.lineage(produced) {
      let at = index.retyped(view.key());
      let Some(configs) = self.configs.get(&at) else {
        continue;
      };
      trace!(index = %at, count = configs.len(), "Running configuration");
      for config in configs {
        config.call(vec![Some(view.clone())])?;
      }
    }
    if drain {
      self.configs.remove(index);
    }
    Ok(())
  }
}

fn missing_type_hint(param: &Param, position: usize) -> Error {
  Error::MissingTypeHint {
    param: param
      .name()
      .map_or_else(|| format!("#{}", position), str::to_owned),
  }
}
