//!
//! # Error-Helper Utilities
//!
//! ```rust
//! use siepic21utils::error::{ErrorHelper, Unwrapper};
//!
//! /// Example implementer of [`ErrorHelper`], reporting the fixture it was working on.
//! struct FixtureReader {
//!     fname: String,
//! }
//! impl ErrorHelper for FixtureReader {
//!     type Error = String;
//!     fn err(&self, msg: impl Into<String>) -> Self::Error {
//!         format!("{}: {}", self.fname, msg.into())
//!     }
//! }
//! impl FixtureReader {
//!     fn read(&self) -> Result<i32, String> {
//!         let width = Some(500).unwrapper(self, "Path has no width")?;
//!         self.assert(width > 0, "Path width must be positive")?;
//!         Ok(width)
//!     }
//! }
//! ```
//!

///
/// # ErrorHelper
///
/// Shared by the hierarchy tree-walkers: importers, exporters, and rewriting passes.
/// Each implementer carries some state worth reporting upon failure
/// (a context stack, a file name), which it injects in the required `err` method.
///
pub trait ErrorHelper {
    type Error;

    /// Create and return a [Self::Error] value.
    fn err(&self, msg: impl Into<String>) -> Self::Error;
    /// Return failure
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Self::Error> {
        Err(self.err(msg))
    }
    /// Unwrap the [Option] `opt` if it is [Some], and return our error if not.
    fn unwrap<T>(&self, opt: Option<T>, msg: impl Into<String>) -> Result<T, Self::Error> {
        match opt {
            Some(val) => Ok(val),
            None => self.fail(msg),
        }
    }
    /// Assert a boolean condition. Returns through `self.fail` if it is not satisfied.
    fn assert(&self, b: bool, msg: impl Into<String>) -> Result<(), Self::Error> {
        match b {
            true => Ok(()),
            false => self.fail(msg),
        }
    }
}

///
/// # Unwrapper
///
/// Post-fix [`ErrorHelper`] handling for [`Option`]s and [`Result`]s.
/// Routes failures to the helper rather than panicking.
///
pub trait Unwrapper {
    type Ok;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper;
}
impl<T> Unwrapper for Option<T> {
    type Ok = T;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper,
    {
        match self {
            Some(t) => Ok(t),
            None => helper.fail(msg),
        }
    }
}
impl<T, E> Unwrapper for Result<T, E> {
    type Ok = T;
    fn unwrapper<H>(
        self,
        helper: &H,
        msg: impl Into<String>,
    ) -> Result<<Self as Unwrapper>::Ok, H::Error>
    where
        H: ErrorHelper,
    {
        match self {
            Ok(t) => Ok(t),
            Err(_) => helper.fail(msg),
        }
    }
}
