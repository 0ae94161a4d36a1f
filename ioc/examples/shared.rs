use std::sync::Arc;
use std::thread;

use weft_ioc::{ContainerBuilder, Factory, Lifetime};

struct Settings {
  name: &'static str,
}

fn main() -> weft_ioc::Result<()> {
  let shared = ContainerBuilder::new().build_shared();
  shared.register(Factory::new(|| Settings { name: "weft" }), Lifetime::Service)?;

  let names: Vec<&'static str> = thread::scope(|s| {
    let handles: Vec<_> = (0..4)
      .map(|_| {
        let shared = shared.clone();
        s.spawn(move || shared.invoke(|settings: Arc<Settings>| settings.name))
      })
      .collect();
    handles
      .into_iter()
      .map(|h| h.join().expect("worker panicked"))
      .collect::<weft_ioc::Result<_>>()
  })?;

  println!("Resolved from {} threads: {:?}", names.len(), names);
  Ok(())
}
