//! Error types for statement resolution and verification.

use crate::fact::FormType;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while building or verifying a statement.
///
/// Per-line problems (an unavailable or ambiguous line item) are not
/// errors: they are recorded in the statement itself. Only a total
/// absence of usable facts is fatal; fetch and serialization failures
/// belong to the collaborators that perform them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The fact store holds no usable facts for the requested window.
    #[error("no usable facts for fiscal year {fiscal_year} ({form})")]
    NoFacts {
        /// Target fiscal year
        fiscal_year: i32,
        /// Target report type
        form: FormType,
    },
}
