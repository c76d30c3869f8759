/// Receives the user-visible status messages of one interaction
pub trait Notifier {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::Notifier;

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        infos: RefCell<Vec<String>>,
        warnings: RefCell<Vec<String>>,
        errors: RefCell<Vec<String>>,
    }

    impl RecordingNotifier {
        pub(crate) fn infos(&self) -> Vec<String> {
            self.infos.borrow().clone()
        }

        pub(crate) fn warnings(&self) -> Vec<String> {
            self.warnings.borrow().clone()
        }

        pub(crate) fn errors(&self) -> Vec<String> {
            self.errors.borrow().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, message: &str) {
            self.infos.borrow_mut().push(message.to_string());
        }

        fn warn(&self, message: &str) {
            self.warnings.borrow_mut().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }
}
