/// Yes/no decisions the pipeline needs from an operator
///
/// The CLI answers on the terminal; tests and `--yes` use [`AutoConfirm`].
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Gives the same answer to every prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(answer = self.0, "Auto-answered: {}", prompt);
        self.0
    }
}
