//! Construction options for a `Container`.

use crate::container::Container;
#[cfg(feature = "shared")]
use crate::shared::SharedContainer;

/// A builder for creating `Container` instances.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
  detect_cycles: bool,
}

impl Default for ContainerBuilder {
  fn default() -> Self {
    Self {
      detect_cycles: true,
    }
  }
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Enables or disables the circular dependency check. Enabled by default.
  ///
  /// With the check enabled, a factory that needs its own index, directly or
  /// through other factories, fails with `CyclicDependency`. With it
  /// disabled, such a graph recurses until the stack overflows.
  pub fn detect_cycles(mut self, enabled: bool) -> Self {
    self.detect_cycles = enabled;
    self
  }

  pub fn build(self) -> Container {
    Container::with_options(self.detect_cycles)
  }

  /// Builds a container that can be shared between threads.
  #[cfg(feature = "shared")]
  pub fn build_shared(self) -> SharedContainer {
    SharedContainer::new(self.build())
  }
}
