//! Fire-and-forget user notifications.
//!
//! Callers report outcomes here and never inspect a result; rendering
//! (console today, toasts in a frontend) is the sink's business.

/// Side-effect-only success/warning/error display.
pub trait NotificationSink {
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints successes to stdout, warnings and errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{}", message);
    }

    // Warnings arrive already labelled; no extra prefix.
    fn warn(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::NotificationSink;
    use std::cell::RefCell;

    /// Records every message for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub successes: RefCell<Vec<String>>,
        pub warnings: RefCell<Vec<String>>,
        pub errors: RefCell<Vec<String>>,
    }

    impl NotificationSink for RecordingNotifier {
        fn success(&self, message: &str) {
            self.successes.borrow_mut().push(message.to_string());
        }

        fn warn(&self, message: &str) {
            self.warnings.borrow_mut().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }
}
