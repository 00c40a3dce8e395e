use crate::shared::Result;

/// Destination of the formatted report (stdout or a file)
pub trait OutputPresenter {
    /// Writes the report text as-is
    fn present(&self, content: &str) -> Result<()>;
}
