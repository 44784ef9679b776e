//!
//! # Layout Result and Error Types
//!

// Local Imports
pub use crate::utils::{self, ErrorContext};

/// # [LayoutError] Result Type
pub type LayoutResult<T> = Result<T, LayoutError>;

///
/// # Layout Error Enumeration
///
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Error Exporting to Foreign Format
    #[error("Export Error: {message} (in {})", fmt_stack(.stack))]
    Export {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Error Importing from Foreign Format
    #[error("Import Error: {message} (in {})", fmt_stack(.stack))]
    Import {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Request for a port a cell does not have
    #[error("No port {name:?} in {available:?}")]
    MissingPort {
        name: String,
        available: Vec<String>,
    },
    /// Errors from the GDSII reader and writer.
    /// Stored as their message, as [gds21::GdsError] is neither [Send] nor [Sync].
    #[error("GDSII Error: {0}")]
    Gds(String),
    /// Boxed External Errors
    #[error(transparent)]
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// Uncategorized Error, with String Message
    #[error("{0}")]
    Str(String),
    /// # [Ptr] Locking
    /// Caused by trouble with a [Ptr]: either deadlock, or panic while holding a lock.
    /// Generally caused by a [std::sync::PoisonError], which is not forwardable due to lifetime constraints.
    ///
    /// [Ptr]: crate::utils::Ptr
    #[error("Cell pointer lock poisoned")]
    PtrLock,
}
impl LayoutError {
    /// Create a [LayoutError::Str] from anything String-convertible
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
    /// Create an error-variant [Result] of our [LayoutError::Str] variant from anything String-convertible
    pub fn fail<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::msg(s))
    }
}
fn fmt_stack(stack: &[ErrorContext]) -> String {
    let parts: Vec<String> = stack.iter().map(|c| c.to_string()).collect();
    parts.join(" / ")
}

impl From<String> for LayoutError {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for LayoutError {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<std::num::TryFromIntError> for LayoutError {
    fn from(e: std::num::TryFromIntError) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::io::Error> for LayoutError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<utils::ser::Error> for LayoutError {
    fn from(e: utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<gds21::GdsError> for LayoutError {
    fn from(e: gds21::GdsError) -> Self {
        Self::Gds(e.to_string())
    }
}
impl<T> From<std::sync::PoisonError<T>> for LayoutError {
    fn from(_e: std::sync::PoisonError<T>) -> Self {
        Self::PtrLock
    }
}
