//!
//! # PDK Configuration
//!
//! Loaded from TOML, YAML, or JSON, with environment-variable overrides:
//!
//! ```toml
//! gds_dir = "/path/to/gds/EBeam"
//! username = "someone"
//! rename_ports = true
//! ```
//!

// Std-Lib
use std::path::{Path, PathBuf};

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::error::PdkResult;
use crate::utils::SerdeFile;

/// Environment variable overriding [PdkConfig::gds_dir]
pub const GDS_DIR_VAR: &str = "SIEPIC21_GDS_DIR";
/// Environment variable overriding [PdkConfig::username]
pub const USERNAME_VAR: &str = "SIEPIC21_USERNAME";

/// # PDK Configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PdkConfig {
    /// Directory holding the fixture GDSII files
    pub gds_dir: PathBuf,
    /// Designer name, written into automated-measurement labels
    pub username: String,
    /// Rename imported fixture ports clockwise to `o1, o2, ...` and `e1, e2, ...`
    pub rename_ports: bool,
}
impl Default for PdkConfig {
    fn default() -> Self {
        Self {
            gds_dir: PathBuf::from("gds/EBeam"),
            username: "YourUserName".into(),
            rename_ports: true,
        }
    }
}
impl SerdeFile for PdkConfig {}

impl PdkConfig {
    /// Load from file `fname`, with its format inferred from its extension.
    /// Environment overrides are applied afterwards.
    pub fn load(fname: impl AsRef<Path>) -> PdkResult<Self> {
        let mut cfg = Self::open_any(&fname)?;
        log::debug!("Loaded PDK config from {}", fname.as_ref().display());
        cfg.apply_env();
        Ok(cfg)
    }
    /// The defaults, with environment overrides applied
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }
    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|var| std::env::var(var).ok())
    }
    /// Apply overrides from `lookup`, a map from variable names to values
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(GDS_DIR_VAR) {
            log::info!("{GDS_DIR_VAR} overrides gds_dir: {dir}");
            self.gds_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(USERNAME_VAR) {
            self.username = name;
        }
    }
    /// Path to fixture file `filename`
    pub fn fixture_path(&self, filename: &str) -> PathBuf {
        self.gds_dir.join(filename)
    }
}
