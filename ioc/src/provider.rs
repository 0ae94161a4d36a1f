use crate::container::Container;
use crate::error::Result;

/// A reusable batch of registrations.
///
/// Any `Fn(&mut Container) -> Result<()>` is a provider.
pub trait Provider {
  fn provide(&self, container: &mut Container) -> Result<()>;
}

impl<F> Provider for F
where
  F: Fn(&mut Container) -> Result<()>,
{
  fn provide(&self, container: &mut Container) -> Result<()> {
    self(container)
  }
}
