//! Declared supertype relations between registered types.

use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::core::{Instance, TypeKey};

type Upcast = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

struct Parent {
  key: TypeKey,
  upcast: Upcast,
}

/// Maps a type to the supertypes it was declared to extend, together with the
/// conversion that views a value as its supertype.
#[derive(Default)]
pub(crate) struct Hierarchy {
  parents: HashMap<TypeKey, Vec<Parent>>,
}

impl Hierarchy {
  pub(crate) fn declare<S, P, C>(&mut self, cast: C)
  where
    S: ?Sized + Any + Send + Sync,
    P: ?Sized + Any + Send + Sync,
    C: Fn(Arc<S>) -> Arc<P> + Send + Sync + 'static,
  {
    let key = TypeKey::of::<P>();
    let upcast: Upcast = Arc::new(move |instance| {
      instance
        .downcast::<S>()
        .map(|value| Instance::from_arc(cast(value)))
    });
    let parents = self.parents.entry(TypeKey::of::<S>()).or_default();
    // Redeclaring the same pair replaces the previous conversion.
    parents.retain(|p| p.key != key);
    parents.push(Parent { key, upcast });
  }

  /// The instance viewed as its own type, then as each ancestor, breadth
  /// first. Every type appears once.
  pub(crate) fn lineage(&self, instance: &Instance) -> Vec<Instance> {
    let mut seen = HashSet::new();
    let mut lineage = Vec::new();
    let mut queue = VecDeque::from([instance.clone()]);
    while let Some(current) = queue.pop_front() {
      if !seen.insert(current.key()) {
        continue;
      }
      if let Some(parents) = self.parents.get(&current.key()) {
        for parent in parents {
          if let Some(up) = (parent.upcast)(&current) {
            queue.push_back(up);
          }
        }
      }
      lineage.push(current);
    }
    lineage
  }

  /// Views `instance` as `target` if it is one, directly or through an
  /// ancestor.
  pub(crate) fn cast(&self, instance: &Instance, target: TypeKey) -> Option<Instance> {
    if instance.key() == target {
      return Some(instance.clone());
    }
    self
      .lineage(instance)
      .into_iter()
      .find(|ancestor| ancestor.key() == target)
  }
}
