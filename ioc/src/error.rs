use thiserror::Error;

use crate::core::{Index, Lifetime};

/// The error type for every fallible registry operation.
///
/// No operation recovers internally; an error aborts the call that raised it.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid argument: {reason}")]
  InvalidArgument { reason: String },

  #[error("Dependency {index} is already defined")]
  DuplicateRegistration { index: String },

  #[error("Dependency {index} is registered as a {existing}, cannot redefine it as a {requested}")]
  ConflictingKind {
    index: String,
    existing: Lifetime,
    requested: Lifetime,
  },

  #[error("Service {index} has already been initialized and cannot be overridden")]
  AlreadyInitialized { index: String },

  #[error("Undefined dependency: {index}")]
  UndefinedDependency { index: String },

  #[error("Factory for {index} returned {actual}, expected {expected}")]
  WrongReturnType {
    index: String,
    expected: &'static str,
    actual: &'static str,
  },

  #[error("Parameter '{param}' has no declared type")]
  MissingTypeHint { param: String },

  #[error("Circular dependency detected: {path}")]
  CyclicDependency { path: String },
}

impl Error {
  pub(crate) fn duplicate(index: &Index) -> Self {
    Error::DuplicateRegistration {
      index: index.to_string(),
    }
  }

  pub(crate) fn conflicting(index: &Index, existing: Lifetime, requested: Lifetime) -> Self {
    Error::ConflictingKind {
      index: index.to_string(),
      existing,
      requested,
    }
  }

  pub(crate) fn already_initialized(index: &Index) -> Self {
    Error::AlreadyInitialized {
      index: index.to_string(),
    }
  }

  pub(crate) fn undefined(index: &Index) -> Self {
    Error::UndefinedDependency {
      index: index.to_string(),
    }
  }

  pub(crate) fn cyclic(path: &[Index]) -> Self {
    let path = path
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(" -> ");
    Error::CyclicDependency { path }
  }
}

/// A specialized `Result` type for registry operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
