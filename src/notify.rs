//! The user-facing notification collaborator.
//!
//! The engine reports the outcome of loads and mutations through a
//! [Notifier] so the embedding application can surface them however it
//! likes (a toast, a status bar, a log line).

/// Receives success and error messages intended for the user.
pub trait Notifier {
    /// Report that an operation completed.
    fn success(&self, message: &str);

    /// Report that an operation failed.
    fn error(&self, message: &str);
}

/// A [Notifier] that writes messages to the log.
///
/// Useful for headless tools that have no notification surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Mutex;

    use super::Notifier;

    /// Records every message it receives so tests can assert on them.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub(crate) fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push(format!("success: {message}"));
        }

        fn error(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push(format!("error: {message}"));
        }
    }
}
