use std::sync::Arc;

use weft_ioc::{Container, Error};

struct UnregisteredService;

struct Report {
  auditor: Option<Arc<UnregisteredService>>,
}

fn main() {
  let mut container = Container::new();

  // A required parameter with nothing registered fails the whole call.
  match container.invoke(|_s: Arc<UnregisteredService>| ()) {
    Err(Error::UndefinedDependency { index }) => println!("Undefined dependency: {}", index),
    other => panic!("expected an undefined dependency, got {:?}", other),
  }

  // An optional parameter is simply absent and the function still runs.
  let report = container
    .invoke(|auditor: Option<Arc<UnregisteredService>>| Report { auditor })
    .expect("optional parameters never fail when unregistered");
  assert!(report.auditor.is_none());
  println!("Optional dependency was absent, as expected.");
}
