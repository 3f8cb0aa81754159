//! Notifier that routes user-facing messages into the tracing pipeline.

use rocketcart_cart::Notifier;

/// Tracing target used for user-facing notifications.
pub const NOTIFY_TARGET: &str = "rocketcart::notify";

/// Emits every user-facing message as a `warn` event on [`NOTIFY_TARGET`].
///
/// Useful for headless runs where there is no toast surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: NOTIFY_TARGET, notification = message, "user notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn notification_is_a_warn_event_on_notify_target() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingNotifier.error("Requested quantity out of stock");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let event: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(event["target"], NOTIFY_TARGET);
        assert_eq!(event["level"], "WARN");
        assert_eq!(
            event["fields"]["notification"],
            "Requested quantity out of stock"
        );
    }
}
