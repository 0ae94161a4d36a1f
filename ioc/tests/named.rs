//! Named registrations and their fallback to the bare type.

use std::sync::Arc;

use weft_ioc::{name, Container, Error, Named, TypeKey};

#[derive(Debug)]
struct Endpoint {
  url: &'static str,
}

struct Client {
  endpoint: Arc<Endpoint>,
}

name!(Replica = "replica");
name!(Archive = "archive");

fn container_with_endpoints() -> Container {
  let mut container = Container::new();
  container
    .add_service(|| Endpoint { url: "db://default" })
    .unwrap();
  container
    .add_service_with_name("replica", || Endpoint { url: "db://replica" })
    .unwrap();
  container
}

#[test]
fn test_named_request_prefers_named_registration() {
  let mut container = container_with_endpoints();

  let named = container.get::<Endpoint>(Some("replica")).unwrap();
  let bare = container.get::<Endpoint>(None).unwrap();

  assert_eq!(named.url, "db://replica");
  assert_eq!(bare.url, "db://default");
  assert!(!Arc::ptr_eq(&named, &bare));
}

#[test]
fn test_named_request_falls_back_to_bare_registration() {
  let mut container = container_with_endpoints();

  let unknown = container.get::<Endpoint>(Some("unknown")).unwrap();
  let bare = container.get::<Endpoint>(None).unwrap();

  assert_eq!(unknown.url, "db://default");
  assert!(Arc::ptr_eq(&unknown, &bare));
}

#[test]
fn test_fallback_instance_is_not_rekeyed_under_the_name() {
  // Arrange
  let mut container = container_with_endpoints();

  // Act
  container.get::<Endpoint>(Some("unknown")).unwrap();

  // Assert
  let ty = TypeKey::of::<Endpoint>();
  assert!(container.is_initialized(ty, None));
  assert!(!container.is_initialized(ty, Some("unknown")));
  assert!(container.contains(ty, Some("unknown")));
}

#[test]
fn test_exact_named_registration_wins_over_cached_bare_instance() {
  // Arrange
  let mut container = container_with_endpoints();
  container.get::<Endpoint>(None).unwrap();

  // Act
  let named = container.get::<Endpoint>(Some("replica")).unwrap();

  // Assert
  assert_eq!(named.url, "db://replica");
}

#[test]
fn test_named_parameter_in_consumer() {
  let mut container = container_with_endpoints();

  let (replica, archive) = container
    .invoke(|replica: Named<Endpoint, Replica>, archive: Named<Endpoint, Archive>| {
      (replica.url, archive.url)
    })
    .unwrap();

  assert_eq!(replica, "db://replica");
  assert_eq!(archive, "db://default");
}

#[test]
fn test_named_parameter_in_factory() {
  // Arrange
  let mut container = container_with_endpoints();
  container
    .add_service(|endpoint: Named<Endpoint, Replica>| Client {
      endpoint: endpoint.into_inner(),
    })
    .unwrap();

  // Act
  let client = container.get::<Client>(None).unwrap();
  let replica = container.get::<Endpoint>(Some("replica")).unwrap();

  // Assert
  assert!(Arc::ptr_eq(&client.endpoint, &replica));
}

#[test]
fn test_named_request_without_any_registration_is_undefined() {
  let mut container = Container::new();
  container
    .add_service_with_name("replica", || Endpoint { url: "db://replica" })
    .unwrap();

  // Only the named entry exists; a different name has nothing to fall back to.
  let err = container.get::<Endpoint>(Some("archive")).unwrap_err();

  match err {
    Error::UndefinedDependency { index } => assert!(index.contains("archive")),
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_named_and_bare_components_are_independent() {
  let mut container = Container::new();
  container.add_component(|| Endpoint { url: "db://default" }).unwrap();
  container
    .add_component_with_name("replica", || Endpoint { url: "db://replica" })
    .unwrap();

  assert_eq!(container.get::<Endpoint>(Some("replica")).unwrap().url, "db://replica");
  assert_eq!(container.get::<Endpoint>(Some("other")).unwrap().url, "db://default");
}
