//!
//! # Components
//!
//! A [Component] pairs a shared [Cell] definition with its typed [Info].
//! Everything the PDK hands out, fixture or parametric, is one of these.
//!

// Std-Lib
use std::path::Path as FsPath;

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::cleanup::remove_pins_recursive;
use crate::error::{PdkError, PdkResult};
use crate::info::Info;
use crate::raw::{Cell, Element, Instance, Library, Point, Port, Ports, Units};
use crate::tech::Technology;
use crate::utils::{Ptr, SerdeFile};

/// # Component
#[derive(Debug, Clone)]
pub struct Component {
    /// Cell definition, shared with the fixture cache and any parent cells
    pub cell: Ptr<Cell>,
    pub info: Info,
}

/// # Component Settings
///
/// Serializable snapshot of a [Component]'s name, info, and ports,
/// for comparison between runs.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub name: String,
    pub info: Info,
    pub ports: Vec<Port>,
}
impl SerdeFile for Settings {}

impl Component {
    /// Create a [Component] from a new, unshared `cell`
    pub fn new(cell: Cell, info: Info) -> Self {
        Self {
            cell: Ptr::new(cell),
            info,
        }
    }
    /// Cell name
    pub fn name(&self) -> PdkResult<String> {
        Ok(self.cell.read()?.name.clone())
    }
    /// Copy of our ports
    pub fn ports(&self) -> PdkResult<Ports> {
        Ok(self.cell.read()?.ports.clone())
    }
    /// Copy of port `name`. Fails with [crate::raw::LayoutError::MissingPort] if we have none such.
    pub fn port(&self, name: &str) -> PdkResult<Port> {
        Ok(self.cell.read()?.ports.get(name)?.clone())
    }
    pub fn settings(&self) -> PdkResult<Settings> {
        let cell = self.cell.read()?;
        Ok(Settings {
            name: cell.name.clone(),
            info: self.info.clone(),
            ports: cell.ports.iter().cloned().collect(),
        })
    }
    /// All geometric elements of our hierarchy, flattened into our coordinates
    pub fn flat_elements(&self) -> PdkResult<Vec<Element>> {
        Ok(self.cell.read()?.layout.flatten()?.elems)
    }
    /// Create an instance-free copy, with the same name, ports, and info
    pub fn flatten(&self) -> PdkResult<Component> {
        let flat = self.cell.read()?.flatten()?;
        Ok(Component::new(flat, self.info.clone()))
    }
    /// Create a copy reflected across the y-axis, named `{name}_mirror`.
    /// Our cell is instanced, not copied.
    pub fn mirror(&self, units: Units) -> PdkResult<Component> {
        Ok(Component::new(mirror(&self.cell, units)?, self.info.clone()))
    }
    /// Create a copy with all marker layers removed from its entire hierarchy.
    /// Ports are kept.
    pub fn remove_pins(&self, tech: &Technology) -> PdkResult<Component> {
        Ok(Component {
            cell: remove_pins_recursive(&self.cell, &tech.marker_layers())?,
            info: self.info.clone(),
        })
    }
    /// Create a [Library] holding our hierarchy
    pub fn to_library(&self, units: Units) -> PdkResult<Library> {
        let mut lib = Library::new(self.name()?, units);
        lib.add_hierarchy(&self.cell)?;
        Ok(lib)
    }
    /// Save our hierarchy as GDSII file `fname`
    pub fn save_gds(&self, fname: impl AsRef<FsPath>, units: Units) -> PdkResult<()> {
        self.to_library(units)?.save(&fname)?;
        log::info!("Wrote {}", fname.as_ref().display());
        Ok(())
    }
    /// Check that every port center lies on the `units` database grid
    pub fn assert_ports_on_grid(&self, units: Units) -> PdkResult<()> {
        let cell = self.cell.read()?;
        for port in cell.ports.iter() {
            let on_grid = |um: f64| {
                let dbu = um / units.scale();
                (dbu - dbu.round()).abs() < 1e-6
            };
            if !on_grid(port.center.x) || !on_grid(port.center.y) {
                return Err(PdkError::param(
                    "port",
                    format!(
                        "{} of {} at ({}, {}) is off the {:?} grid",
                        port.name, cell.name, port.center.x, port.center.y, units
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Create a new cell reflecting `src` across the y-axis.
///
/// The new cell holds a single instance of `src`, reflected and rotated by 180 degrees,
/// and carries `src`'s ports moved to match.
///
pub fn mirror(src: &Ptr<Cell>, units: Units) -> PdkResult<Cell> {
    let (name, ports) = {
        let src = src.read()?;
        (src.name.clone(), src.ports.clone())
    };
    let inst = Instance {
        inst_name: name.clone(),
        cell: src.clone(),
        loc: Point::new(0, 0),
        reflect_vert: true,
        angle: Some(180.0),
    };
    let mut cell = Cell::new(format!("{name}_mirror"));
    cell.ports = ports.transform(&inst.transform(), units);
    cell.ports.canonicalize();
    cell.layout.insts.push(inst);
    Ok(cell)
}
