use std::sync::Arc;

use weft_ioc::{name, Container, Factory, Lifetime, Named};

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

name!(Email = "email");
name!(Sms = "sms");
name!(Pager = "pager");

fn main() -> weft_ioc::Result<()> {
  let mut container = Container::new();

  // The bare registration is the default for every name without its own entry.
  container.register(
    Factory::shared(|| Arc::new(EmailSender) as Arc<dyn MessageSender>),
    Lifetime::Service,
  )?;
  container.register(
    Factory::shared(|| Arc::new(SmsSender) as Arc<dyn MessageSender>).named("sms"),
    Lifetime::Service,
  )?;

  let results = container.invoke(
    |email: Named<dyn MessageSender, Email>,
     sms: Named<dyn MessageSender, Sms>,
     pager: Named<dyn MessageSender, Pager>| {
      [
        email.send("test@example.com", "Hello!"),
        sms.send("+123456789", "Hello!"),
        pager.send("oncall", "Hello!"),
      ]
    },
  )?;

  for line in &results {
    println!("{}", line);
  }
  assert!(results[0].contains("email"));
  assert!(results[1].contains("SMS"));
  assert!(results[2].contains("email"));

  Ok(())
}
