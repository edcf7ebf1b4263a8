/// Blocking user interaction: alerts after failed mutations and yes/no confirmations.
pub trait UserPrompt: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}
