//! Public macros for ergonomic resolution and dependency names.

/// Resolves a dependency from a container, panicking if it cannot be
/// resolved.
///
/// # Panics
///
/// This macro panics with the resolution error. For a non-panicking
/// version, use `container.get(...)` directly.
///
/// # Examples
///
/// ```
/// use weft_ioc::{resolve, Container};
///
/// let mut container = Container::new();
/// container.add_service(|| String::from("hello")).unwrap();
///
/// let message = resolve!(container, String);
/// assert_eq!(*message, "hello");
/// ```
///
/// ```
/// use std::sync::Arc;
/// use weft_ioc::{resolve, Container, Factory, Lifetime};
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let mut container = Container::new();
/// container
///   .register(
///     Factory::shared(|| Arc::new(EnglishGreeter) as Arc<dyn Greeter>).named("english"),
///     Lifetime::Service,
///   )
///   .unwrap();
///
/// let greeter = resolve!(container, trait Greeter, "english");
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(container, trait MyTrait)
  ($container:expr, trait $trait_ident:ident) => {
    $container
      .get::<dyn $trait_ident>(None)
      .unwrap_or_else(|err| panic!("Failed to resolve required trait service: {}", err))
  };

  // resolve!(container, trait MyTrait, "name")
  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    $container
      .get::<dyn $trait_ident>(Some($name))
      .unwrap_or_else(|err| panic!("Failed to resolve required trait service: {}", err))
  };

  // resolve!(container, MyService)
  ($container:expr, $type:ty) => {
    $container
      .get::<$type>(None)
      .unwrap_or_else(|err| panic!("Failed to resolve required service: {}", err))
  };

  // resolve!(container, MyService, "name")
  ($container:expr, $type:ty, $name:expr) => {
    $container
      .get::<$type>(Some($name))
      .unwrap_or_else(|err| panic!("Failed to resolve required service: {}", err))
  };
}

/// Declares a marker type carrying a dependency name, for use with
/// [`Named`](crate::Named) parameters.
///
/// ```
/// use std::sync::Arc;
/// use weft_ioc::{name, Container, Named};
///
/// name!(pub Primary = "primary");
///
/// let mut container = Container::new();
/// container.add_service_with_name("primary", || 5432_u16).unwrap();
///
/// let port = container.invoke(|port: Named<u16, Primary>| *port).unwrap();
/// assert_eq!(port, 5432);
/// ```
#[macro_export]
macro_rules! name {
  ($(#[$meta:meta])* $vis:vis $ident:ident = $name:expr) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    $vis struct $ident;

    impl $crate::Name for $ident {
      const NAME: &'static str = $name;
    }
  };
}
