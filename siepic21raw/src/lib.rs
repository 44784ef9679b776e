//!
//! # SiEPIC21 Raw Layout
//!
//! The geometric data model underneath the PDK:
//! integer-unit shapes on numbered layers, text labels,
//! cells instancing shared definitions, and micrometer-valued [Port]s.
//!
//! Conversion to and from GDSII is supported via [Library::to_gds] and [Library::from_gds].
//!

// Internal modules & re-exports
pub use siepic21utils as utils;

pub mod bbox;
pub use bbox::*;

pub mod data;
pub use data::*;

pub mod error;
pub use error::*;

pub mod gds;
pub use gds::*;

pub mod geom;
pub use geom::*;

pub mod ports;
pub use ports::*;
