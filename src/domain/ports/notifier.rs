/// User-facing status messages (toasts, status bar, terminal).
pub trait Notifier: Send + Sync {
    /// Show `message`, styled as an error when `is_error` is set.
    fn notify(&self, message: &str, is_error: bool);
}
