/// Fire-and-forget sink for user-facing messages
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);

    fn info(&self, message: &str);
}

/// Notifier that writes messages to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!(target: "warehouse::notify", "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "warehouse::notify", "{message}");
    }
}
