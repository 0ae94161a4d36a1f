//! Injectable functions.
//!
//! A function's parameters declare what it needs from the container. Typed
//! Rust functions describe themselves through [`IntoInjector`]; callers that
//! only know their parameters at runtime build an [`Injector`] by hand from
//! [`Param`] descriptors.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use crate::core::{Instance, TypeKey};
use crate::error::{Error, Result};

/// One declared parameter of an injectable function.
#[derive(Clone, PartialEq, Eq)]
pub struct Param {
  ty: Option<TypeKey>,
  name: Option<String>,
  optional: bool,
}

impl Param {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self::typed(TypeKey::of::<T>())
  }

  pub fn typed(ty: TypeKey) -> Self {
    Self {
      ty: Some(ty),
      name: None,
      optional: false,
    }
  }

  /// A parameter with no declared type. Resolving it always fails with
  /// `MissingTypeHint`.
  pub fn untyped() -> Self {
    Self {
      ty: None,
      name: None,
      optional: false,
    }
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Marks the parameter as optional: when nothing is registered for it the
  /// function receives an absent value instead of failing.
  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn ty(&self) -> Option<TypeKey> {
    self.ty
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn is_optional(&self) -> bool {
    self.optional
  }
}

impl fmt::Debug for Param {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Param")
      .field("ty", &self.ty.map(|t| t.name()))
      .field("name", &self.name)
      .field("optional", &self.optional)
      .finish()
  }
}

impl fmt::Display for Param {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.optional {
      f.write_str("?")?;
    }
    match self.ty {
      Some(ty) => f.write_str(ty.name())?,
      None => f.write_str("_")?,
    }
    if let Some(name) = &self.name {
      write!(f, " {}", name)?;
    }
    Ok(())
  }
}

type Body<R> = Box<dyn Fn(Vec<Option<Instance>>) -> Result<R> + Send + Sync>;

/// A callable whose parameters are satisfied by the container.
///
/// The body receives one slot per declared parameter, in declaration order;
/// `None` marks an optional parameter that nothing was registered for.
pub struct Injector<R> {
  params: Vec<Param>,
  body: Body<R>,
}

impl<R: 'static> Injector<R> {
  pub fn new<B>(params: Vec<Param>, body: B) -> Self
  where
    B: Fn(Vec<Option<Instance>>) -> Result<R> + Send + Sync + 'static,
  {
    Self {
      params,
      body: Box::new(body),
    }
  }

  pub fn params(&self) -> &[Param] {
    &self.params
  }

  pub(crate) fn call(&self, args: Vec<Option<Instance>>) -> Result<R> {
    (self.body)(args)
  }

  pub(crate) fn map<S, M>(self, map: M) -> Injector<S>
  where
    S: 'static,
    M: Fn(R) -> S + Send + Sync + 'static,
  {
    let body = self.body;
    Injector {
      params: self.params,
      body: Box::new(move |args| body(args).map(&map)),
    }
  }
}

impl<R> fmt::Debug for Injector<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Injector")
      .field("params", &self.params)
      .finish_non_exhaustive()
  }
}

/// A value that can be handed to an injectable function as a parameter.
pub trait Inject: Sized + 'static {
  /// Describes what the parameter asks the container for.
  fn param() -> Param;

  /// Converts the resolved slot into the parameter value. Returns `None`
  /// when the slot does not hold what the parameter expects.
  fn extract(value: Option<Instance>) -> Option<Self>;
}

impl<T: ?Sized + Any + Send + Sync> Inject for Arc<T> {
  fn param() -> Param {
    Param::of::<T>()
  }

  fn extract(value: Option<Instance>) -> Option<Self> {
    value?.downcast::<T>()
  }
}

impl<I: Inject> Inject for Option<I> {
  fn param() -> Param {
    I::param().optional()
  }

  fn extract(value: Option<Instance>) -> Option<Self> {
    match value {
      None => Some(None),
      Some(value) => I::extract(Some(value)).map(Some),
    }
  }
}

/// A compile-time dependency name. Declare one with [`name!`](crate::name).
pub trait Name: 'static {
  const NAME: &'static str;
}

/// A parameter resolved by type and name.
///
/// When nothing is registered under the name the bare type is used instead.
pub struct Named<T: ?Sized, N: Name> {
  value: Arc<T>,
  _name: PhantomData<fn() -> N>,
}

impl<T: ?Sized, N: Name> Named<T, N> {
  pub fn name() -> &'static str {
    N::NAME
  }

  pub fn into_inner(self) -> Arc<T> {
    self.value
  }
}

impl<T: ?Sized, N: Name> Clone for Named<T, N> {
  fn clone(&self) -> Self {
    Self {
      value: Arc::clone(&self.value),
      _name: PhantomData,
    }
  }
}

impl<T: ?Sized, N: Name> Deref for Named<T, N> {
  type Target = T;

  fn deref(&self) -> &T {
    &self.value
  }
}

impl<T: ?Sized, N: Name> AsRef<Arc<T>> for Named<T, N> {
  fn as_ref(&self) -> &Arc<T> {
    &self.value
  }
}

impl<T: ?Sized + Any + Send + Sync, N: Name> Inject for Named<T, N> {
  fn param() -> Param {
    Param::of::<T>().named(N::NAME)
  }

  fn extract(value: Option<Instance>) -> Option<Self> {
    value?.downcast::<T>().map(|value| Named {
      value,
      _name: PhantomData,
    })
  }
}

/// Conversion of a function into an [`Injector`].
///
/// Implemented for every `Fn(A1, ..., An) -> R` with up to eight [`Inject`]
/// parameters, and for an `Injector` itself.
pub trait IntoInjector<Args, R> {
  fn into_injector(self) -> Injector<R>;
}

impl<R: 'static> IntoInjector<Injector<R>, R> for Injector<R> {
  fn into_injector(self) -> Injector<R> {
    self
  }
}

fn take<I: Inject>(slot: Option<Option<Instance>>) -> Result<I> {
  let value = slot.flatten();
  let actual = value.as_ref().map_or("nothing", |v| v.key().name());
  I::extract(value).ok_or_else(|| {
    let param = I::param();
    Error::WrongReturnType {
      index: param.to_string(),
      expected: param.ty().map_or("_", |t| t.name()),
      actual,
    }
  })
}

macro_rules! impl_into_injector {
  ($($arg:ident),*) => {
    impl<F, R, $($arg,)*> IntoInjector<($($arg,)*), R> for F
    where
      F: Fn($($arg),*) -> R + Send + Sync + 'static,
      R: 'static,
      $($arg: Inject,)*
    {
      #[allow(non_snake_case, unused_mut, unused_variables)]
      fn into_injector(self) -> Injector<R> {
        let params = vec![$($arg::param()),*];
        Injector::new(params, move |args| {
          let mut args = args.into_iter();
          $(let $arg = take::<$arg>(args.next())?;)*
          Ok((self)($($arg),*))
        })
      }
    }
  };
}

impl_into_injector!();
impl_into_injector!(A1);
impl_into_injector!(A1, A2);
impl_into_injector!(A1, A2, A3);
impl_into_injector!(A1, A2, A3, A4);
impl_into_injector!(A1, A2, A3, A4, A5);
impl_into_injector!(A1, A2, A3, A4, A5, A6);
impl_into_injector!(A1, A2, A3, A4, A5, A6, A7);
impl_into_injector!(A1, A2, A3, A4, A5, A6, A7, A8);
