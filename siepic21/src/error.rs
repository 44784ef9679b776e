//!
//! # PDK Error Types
//!

// Std-Lib
use std::path::PathBuf;

// Local imports
use crate::raw::LayoutError;
use crate::utils;

/// # [PdkError] Result Type
pub type PdkResult<T> = Result<T, PdkError>;

///
/// # PDK Error Enumeration
///
#[derive(Debug, thiserror::Error)]
pub enum PdkError {
    /// Errors from the raw layout layer: import, export, missing ports
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Not valid polarization {0:?} in [TE, TM]")]
    InvalidPolarization(String),
    #[error("{0} is not a valid wavelength: 1.0 < wavelength < 2.0 (µm)")]
    InvalidWavelength(f64),
    #[error("Unknown cell {0:?}")]
    UnknownCell(String),
    #[error("Fixture not found: {}", .0.display())]
    FixtureNotFound(PathBuf),
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
}
impl PdkError {
    /// Create a [PdkError::InvalidParameter]
    pub fn param(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
impl From<utils::ser::Error> for PdkError {
    fn from(e: utils::ser::Error) -> Self {
        Self::Config(e.to_string())
    }
}
impl<T> From<std::sync::PoisonError<T>> for PdkError {
    fn from(_e: std::sync::PoisonError<T>) -> Self {
        Self::Layout(LayoutError::PtrLock)
    }
}
