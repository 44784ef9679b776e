//!
//! # SiEPIC21
//!
//! Process design kit for the UBC SiEPIC EBeam silicon-photonics process.
//!
//! Fixed cells are imported from the EBeam GDSII library and given typed, oriented [Port]s
//! recovered from their SiEPIC pin markers by [add_ports_from_siepic_pins].
//! A handful of parametric cells are generated directly, with pins of their own.
//! Everything is reached through a [Pdk]:
//!
//! ```no_run
//! use siepic21::{Pdk, PdkResult};
//!
//! fn main() -> PdkResult<()> {
//!     let mut pdk = Pdk::from_env();
//!     let splitter = pdk.cell("ebeam_y_1550")?;
//!     println!("{:?}", splitter.ports()?.names());
//!     let gc = pdk.cell("gc_te1550")?;
//!     println!("{}", pdk.input_label_text(&gc, "ebeam_y_1550")?);
//!     Ok(())
//! }
//! ```
//!

// Internal modules & re-exports
pub use siepic21raw as raw;
pub use siepic21utils as utils;

pub use raw::{Port, PortType, Ports};

pub mod cleanup;
pub use cleanup::*;

pub mod component;
pub use component::*;

pub mod components;

pub mod config;
pub use config::*;

pub mod error;
pub use error::*;

pub mod fixtures;
pub use fixtures::*;

pub mod info;
pub use info::*;

pub mod labels;
pub use labels::*;

pub mod pdk;
pub use pdk::*;

pub mod pins;
pub use pins::*;

pub mod tech;
pub use tech::*;

#[cfg(test)]
mod tests;
