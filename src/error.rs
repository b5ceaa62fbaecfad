use thiserror::Error;

/// Errors returned by the layout engine and the report drivers.
///
/// Degenerate data (no rows, cells wider than their column, a total row
/// taller than a page) is never an error: the engine resolves it by
/// truncating, wrapping or spilling onto a new page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The report was configured in a way no layout can satisfy.
    #[error("Invalid layout configuration: {0}")]
    InvalidLayoutConfig(String),
    /// The page writer rejected a draw call or failed to serialize.
    #[error("Failed to render report: {0}")]
    RenderFailed(String),
    /// A period filter combination that does not describe a date range.
    #[error("Invalid report period: {0}")]
    InvalidPeriod(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
