//!
//! # Fixtures
//!
//! Pre-made GDSII cells, imported once, annotated with ports, and cached.
//!

// Std-Lib
use std::collections::HashMap;
use std::path::Path;

// Local imports
use crate::component::Component;
use crate::error::{PdkError, PdkResult};
use crate::info::Info;
use crate::pins::add_ports_from_siepic_pins;
use crate::raw::{Cell, LayoutError, Library};
use crate::tech::Technology;
use crate::utils::Ptr;

/// Library recorded in fixture [Info]
pub const FIXTURE_LIBRARY: &str = "Design kits/ebeam";

/// # Fixture Cache Key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureKey {
    /// File name, relative to the fixture directory
    pub filename: String,
    /// Cell within the file. `None` selects its single top cell.
    pub cellname: Option<String>,
    /// Whether the entry is the y-axis mirror of the imported cell
    pub mirrored: bool,
}
impl FixtureKey {
    pub fn new(filename: impl Into<String>, cellname: Option<&str>) -> Self {
        Self {
            filename: filename.into(),
            cellname: cellname.map(String::from),
            mirrored: false,
        }
    }
    /// The same key, for the mirrored entry
    pub fn mirrored(self) -> Self {
        Self {
            mirrored: true,
            ..self
        }
    }
}

/// # Fixture Cache
///
/// One [Component] per [FixtureKey], loaded on first request and kept for the cache's lifetime.
/// Entries are never invalidated; hits share the same cell pointer.
///
#[derive(Debug, Default)]
pub struct FixtureCache {
    entries: HashMap<FixtureKey, Component>,
}
impl FixtureCache {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, key: &FixtureKey) -> Option<&Component> {
        self.entries.get(key)
    }
    pub fn contains(&self, key: &FixtureKey) -> bool {
        self.entries.contains_key(key)
    }
    pub fn insert(&mut self, key: FixtureKey, comp: Component) {
        self.entries.insert(key, comp);
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Get the entry for `key`, creating it with `make` if absent.
    /// Failures from `make` are returned and nothing is cached.
    pub fn get_or_try_insert_with(
        &mut self,
        key: FixtureKey,
        make: impl FnOnce() -> PdkResult<Component>,
    ) -> PdkResult<Component> {
        if let Some(comp) = self.entries.get(&key) {
            log::debug!("Fixture cache hit: {:?}", key);
            return Ok(comp.clone());
        }
        let comp = make()?;
        self.entries.insert(key, comp.clone());
        Ok(comp)
    }
}

/// Fixture [Info] for `filename`. The model is its name up to the first `.`.
pub fn fixture_info(filename: &str) -> Info {
    Info::Fixture {
        model: filename.split('.').next().unwrap_or(filename).to_string(),
        library: FIXTURE_LIBRARY.to_string(),
    }
}

/// Import a cell from GDSII file `path` and annotate it with ports from its SiEPIC pins.
///
/// Selects cell `cellname` if provided, or the file's single top cell otherwise.
/// The file must use `tech`'s database units.
/// With `rename`, ports are then renamed clockwise (see [crate::raw::Ports::auto_rename]).
///
pub fn import_fixture(
    path: &Path,
    cellname: Option<&str>,
    tech: &Technology,
    rename: bool,
) -> PdkResult<Ptr<Cell>> {
    if !path.is_file() {
        return Err(PdkError::FixtureNotFound(path.to_path_buf()));
    }
    let lib = Library::load(path)?;
    if lib.units != tech.units {
        return Err(LayoutError::msg(format!(
            "{} uses {:?} units, expected {:?}",
            path.display(),
            lib.units,
            tech.units
        ))
        .into());
    }
    let ptr = match cellname {
        Some(name) => lib
            .cell(name)?
            .ok_or_else(|| PdkError::UnknownCell(format!("{} in {}", name, path.display())))?,
        None => {
            let mut tops = lib.top_cells()?;
            if tops.len() != 1 {
                return Err(LayoutError::msg(format!(
                    "{} has {} top cells; a cell name is required",
                    path.display(),
                    tops.len()
                ))
                .into());
            }
            tops.remove(0)
        }
    };
    {
        let mut cell = ptr.write()?;
        let count = add_ports_from_siepic_pins(&mut cell, &tech.pins, lib.units)?;
        if rename {
            cell.ports.auto_rename();
        }
        log::info!(
            "Imported {} from {} with {} ports",
            cell.name,
            path.display(),
            count
        );
    }
    Ok(ptr)
}
