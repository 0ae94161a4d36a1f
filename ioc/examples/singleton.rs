use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use weft_ioc::{resolve, Container};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn track() -> RequestTracker {
  RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }
}

fn main() -> weft_ioc::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let mut container = Container::new();

  // --- Service Registration ---
  // This factory will only be called ONCE.
  container.add_service_with_name("service_tracker", track)?;

  // --- Component Registration ---
  // This factory will be called EVERY time the component is resolved.
  container.add_component_with_name("component_tracker", track)?;

  println!("--- Resolving Services ---");
  let s1 = resolve!(container, RequestTracker, "service_tracker");
  let s2 = resolve!(container, RequestTracker, "service_tracker");
  println!("Service 1 ID: {}, Service 2 ID: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2), "Service instances should be identical");

  println!("--- Resolving Components ---");
  let c1 = resolve!(container, RequestTracker, "component_tracker");
  let c2 = resolve!(container, RequestTracker, "component_tracker");
  println!("Component 1 ID: {}, Component 2 ID: {}", c1.id, c2.id);
  assert!(!Arc::ptr_eq(&c1, &c2), "Component instances should be different");

  Ok(())
}
