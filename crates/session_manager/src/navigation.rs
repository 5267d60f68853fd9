//! Navigation collaborator

/// Receives the post-logout navigation signal so the shell can move the UI
/// to the login view. Implementations must not block.
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// Navigator that ignores the signal, for headless and test use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn to_login(&self) {}
}
