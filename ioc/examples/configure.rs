use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use weft_ioc::Container;

struct Pool {
  size: AtomicUsize,
}

fn main() -> weft_ioc::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let mut container = Container::new();
  container.add_service(|| Pool {
    size: AtomicUsize::new(1),
  })?;

  // Queued until the pool is first built.
  container.configure(|pool: Arc<Pool>| {
    pool.size.fetch_add(4, Ordering::SeqCst);
  })?;

  let size = container.invoke(|pool: Arc<Pool>| pool.size.load(Ordering::SeqCst))?;
  println!("Pool size after configuration: {}", size);
  assert_eq!(size, 5);

  // The pool exists now, so this runs immediately.
  container.configure(|pool: Arc<Pool>| {
    pool.size.store(10, Ordering::SeqCst);
  })?;
  let size = container.invoke(|pool: Arc<Pool>| pool.size.load(Ordering::SeqCst))?;
  println!("Pool size after reconfiguration: {}", size);

  Ok(())
}
