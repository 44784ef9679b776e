//!
//! # Raw Layout Data Model
//!
//! Units, layers, cells, instances, and libraries.
//!

// Std-Lib
use std::collections::HashMap;

// Crates.io
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// Local imports
use crate::{
    bbox::{BoundBox, BoundBoxTrait},
    error::{LayoutError, LayoutResult},
    geom::{Point, Shape, Transform, TransformTrait},
    ports::Ports,
    utils::{DepOrder, DepOrderer, Ptr, PtrList},
};

/// # Location Integer Type-Alias
///
/// Used for all layout spatial coordinates, in database units.
///
pub type Int = isize;

/// Distance Units Enumeration
///
/// The size of one database unit.
/// Port metadata is kept in micrometers; everything geometric is in these units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Units {
    /// Micrometers, or microns for we olde folke
    Micro,
    /// Nanometers
    Nano,
    /// Angstroms
    Angstrom,
    /// Picometers
    Pico,
}
impl Default for Units {
    /// Default units are nanometers
    fn default() -> Units {
        Units::Nano
    }
}
impl Units {
    /// Size of one database unit, in meters
    pub fn meters(&self) -> f64 {
        match self {
            Units::Micro => 1e-6,
            Units::Nano => 1e-9,
            Units::Angstrom => 1e-10,
            Units::Pico => 1e-12,
        }
    }
    /// Size of one database unit, in micrometers
    pub fn scale(&self) -> f64 {
        match self {
            Units::Micro => 1.0,
            Units::Nano => 1e-3,
            Units::Angstrom => 1e-4,
            Units::Pico => 1e-6,
        }
    }
    /// Convert a database-unit length to micrometers
    pub fn to_microns(&self, val: Int) -> f64 {
        val as f64 * self.scale()
    }
    /// Convert a micrometer length to the nearest database-unit value
    pub fn from_microns(&self, um: f64) -> Int {
        (um / self.scale()).round() as Int
    }
    /// Look up the [Units] whose database unit is (approximately) `meters` in size
    pub fn from_meters(meters: f64) -> Option<Units> {
        [Units::Micro, Units::Nano, Units::Angstrom, Units::Pico]
            .into_iter()
            .find(|u| approx::relative_eq!(u.meters(), meters, max_relative = 1e-6))
    }
}

/// # Layer Specification
/// As in seemingly every layout system, this uses two numbers to identify each layer:
/// the GDSII layer number, and its datatype.
#[derive(
    Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct LayerSpec(pub i16, pub i16);
impl std::fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// # Layer Map
///
/// Named [LayerSpec]s, in definition order.
/// Several names may share one spec; `name_of` reports the first defined.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LayerMap(IndexMap<String, LayerSpec>);
impl LayerMap {
    /// Create a [LayerMap] from (name, spec) pairs
    pub fn from_pairs(pairs: &[(&str, LayerSpec)]) -> Self {
        Self(pairs.iter().map(|(n, s)| (n.to_string(), *s)).collect())
    }
    /// Add or replace layer `name`
    pub fn add(&mut self, name: impl Into<String>, spec: LayerSpec) {
        self.0.insert(name.into(), spec);
    }
    /// Get the [LayerSpec] named `name`
    pub fn get(&self, name: &str) -> Option<LayerSpec> {
        self.0.get(name).copied()
    }
    /// Get the [LayerSpec] named `name`, or fail
    pub fn require(&self, name: &str) -> LayoutResult<LayerSpec> {
        self.get(name)
            .ok_or_else(|| LayoutError::msg(format!("Unknown layer {name}")))
    }
    /// Get the first name defined for `spec`
    pub fn name_of(&self, spec: &LayerSpec) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, s)| *s == spec)
            .map(|(n, _)| n.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LayerSpec)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// # Primitive Geometric Element
///
/// Primary unit of [Layout] definition.
/// Combines a geometric [Shape] with a [LayerSpec].
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Element {
    /// Layer
    pub layer: LayerSpec,
    /// Shape
    pub inner: Shape,
}
impl Element {
    pub fn new(layer: LayerSpec, inner: impl Into<Shape>) -> Self {
        Self {
            layer,
            inner: inner.into(),
        }
    }
}

/// # Text Label
///
/// Free-floating text on a layer.
/// Port names arrive this way in SiEPIC fixtures, alongside their pin paths.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextElement {
    /// String Value
    pub string: String,
    /// Location
    pub loc: Point,
    /// Layer
    pub layer: LayerSpec,
}
impl TextElement {
    pub fn new(string: impl Into<String>, loc: Point, layer: LayerSpec) -> Self {
        Self {
            string: string.into(),
            loc,
            layer,
        }
    }
}

/// Instance of another Cell
#[derive(Debug, Clone)]
pub struct Instance {
    /// Instance Name
    pub inst_name: String,
    /// Cell Definition Reference
    pub cell: Ptr<Cell>,
    /// Location of `cell` origin
    /// regardless of rotation or reflection
    pub loc: Point,
    /// Vertical reflection,
    /// applied *before* rotation
    pub reflect_vert: bool,
    /// Angle of rotation (degrees),
    /// Counter-clockwise and applied *after* reflection
    pub angle: Option<f64>,
}
impl Instance {
    /// Create an un-rotated, un-reflected [Instance] of `cell` at `loc`
    pub fn new(inst_name: impl Into<String>, cell: &Ptr<Cell>, loc: Point) -> Self {
        Self {
            inst_name: inst_name.into(),
            cell: cell.clone(),
            loc,
            reflect_vert: false,
            angle: None,
        }
    }
    /// Our placement [Transform]
    pub fn transform(&self) -> Transform {
        Transform::from_instance(&self.loc, self.reflect_vert, self.angle)
    }
}

/// # Raw-Layout Implementation
///
/// The geometric-level content of a [Cell].
/// Comprised of geometric [Element]s, text labels, and instances of other [Cell]s.
///
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Instances
    pub insts: Vec<Instance>,
    /// Primitive/ Geometric Elements
    pub elems: Vec<Element>,
    /// Text Labels
    pub labels: Vec<TextElement>,
}
impl Layout {
    /// Create a rectangular [BoundBox] surrounding all elements and instances in the [Layout].
    pub fn bbox(&self) -> LayoutResult<BoundBox> {
        let mut bbox = BoundBox::empty();
        for elem in &self.elems {
            bbox = elem.inner.union(&bbox);
        }
        for inst in &self.insts {
            let child = inst.cell.read()?.layout.bbox()?;
            if child.is_empty() {
                continue;
            }
            let trans = inst.transform();
            let corners = Shape::Rect(crate::geom::Rect::new(child.p0, child.p1));
            bbox = corners.transform(&trans).union(&bbox);
        }
        Ok(bbox)
    }
    /// Flatten a [Layout], particularly its hierarchical instances,
    /// into a new instance-free [Layout].
    pub fn flatten(&self) -> LayoutResult<Layout> {
        // Kick off recursive calls, with the identity-transform applied for the top-level `layout`
        let mut flat = Layout::default();
        flatten_helper(self, &Transform::identity(), &mut flat)?;
        Ok(flat)
    }
    /// Remove all elements and labels on any of `layers`.
    /// Instances are not visited. Returns the number of items removed.
    pub fn remove_layers(&mut self, layers: &[LayerSpec]) -> usize {
        let before = self.elems.len() + self.labels.len();
        self.elems.retain(|e| !layers.contains(&e.layer));
        self.labels.retain(|t| !layers.contains(&t.layer));
        before - self.elems.len() - self.labels.len()
    }
    /// Get the [Path](crate::geom::Path) elements on `layer`
    pub fn paths_on(&self, layer: &LayerSpec) -> Vec<&crate::geom::Path> {
        self.elems
            .iter()
            .filter(|e| e.layer == *layer)
            .filter_map(|e| e.inner.as_path())
            .collect()
    }
}
/// Internal helper and core logic for [Layout::flatten].
fn flatten_helper(layout: &Layout, trans: &Transform, flat: &mut Layout) -> LayoutResult<()> {
    for elem in layout.elems.iter() {
        flat.elems.push(Element {
            layer: elem.layer,
            inner: elem.inner.transform(trans),
        });
    }
    for label in layout.labels.iter() {
        flat.labels.push(TextElement {
            string: label.string.clone(),
            loc: label.loc.transform(trans),
            layer: label.layer,
        });
    }
    // Visit all of `layout`'s instances, recursively getting their elements
    for inst in &layout.insts {
        let cell = inst.cell.read()?;
        // Cascade the parent's and instance's transforms
        let trans = Transform::cascade(trans, &inst.transform());
        flatten_helper(&cell.layout, &trans, flat)?;
    }
    Ok(())
}

/// # Cell
///
/// A named, reusable layout definition, with its [Ports].
///
#[derive(Debug, Default, Clone)]
pub struct Cell {
    /// Cell Name
    pub name: String,
    /// Layout Content
    pub layout: Layout,
    /// Ports
    pub ports: Ports,
}
impl Cell {
    /// Create a new and empty Cell named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Get each distinct child-cell pointer, in first-instanced order
    pub fn children(&self) -> Vec<Ptr<Cell>> {
        let mut rv: Vec<Ptr<Cell>> = Vec::new();
        for inst in self.layout.insts.iter() {
            if !rv.contains(&inst.cell) {
                rv.push(inst.cell.clone());
            }
        }
        rv
    }
    /// Create a flattened copy of this cell. Ports are kept as-is.
    pub fn flatten(&self) -> LayoutResult<Cell> {
        Ok(Cell {
            name: self.name.clone(),
            layout: self.layout.flatten()?,
            ports: self.ports.clone(),
        })
    }
}

/// # Children-First Cell Ordering
///
/// Orders a [Cell] hierarchy such that each definition follows everything it instances.
/// Each distinct definition (by pointer) appears once.
///
pub struct CellDepOrder;
impl DepOrder for CellDepOrder {
    type Item = Ptr<Cell>;
    type Error = LayoutError;

    fn process(item: &Ptr<Cell>, orderer: &mut DepOrderer<Self>) -> LayoutResult<()> {
        // Collect before pushing, releasing our read-lock on `item`
        let children = item.read()?.children();
        for child in children.iter() {
            orderer.push(child)?;
        }
        Ok(())
    }
    fn fail(item: &Ptr<Cell>) -> LayoutResult<()> {
        let name = item.read()?.name.clone();
        LayoutError::fail(format!("Cell hierarchy cycle through {name}"))
    }
}

/// # Raw Layout Library
/// A collection of cell-definitions, in dependency order.
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Library Name
    pub name: String,
    /// Distance Units
    pub units: Units,
    /// Cell Definitions
    pub cells: PtrList<Cell>,
}
impl Library {
    /// Create a new and empty Library
    pub fn new(name: impl Into<String>, units: Units) -> Self {
        Self {
            name: name.into(),
            units,
            ..Default::default()
        }
    }
    /// Add `top` and every cell it depends upon, children first.
    /// Cells already in the library are skipped.
    pub fn add_hierarchy(&mut self, top: &Ptr<Cell>) -> LayoutResult<()> {
        for cell in CellDepOrder::order(&[top.clone()])? {
            self.cells.add_ptr(&cell);
        }
        Ok(())
    }
    /// Get the cells not instanced by any other cell in the library
    pub fn top_cells(&self) -> LayoutResult<Vec<Ptr<Cell>>> {
        let mut instanced: HashMap<Ptr<Cell>, usize> = HashMap::new();
        for cell in self.cells.iter() {
            for child in cell.read()?.children() {
                *instanced.entry(child).or_insert(0) += 1;
            }
        }
        Ok(self
            .cells
            .iter()
            .filter(|c| !instanced.contains_key(*c))
            .cloned()
            .collect())
    }
    /// Get the cell named `name`, if there is one
    pub fn cell(&self, name: &str) -> LayoutResult<Option<Ptr<Cell>>> {
        for cell in self.cells.iter() {
            if cell.read()?.name == name {
                return Ok(Some(cell.clone()));
            }
        }
        Ok(None)
    }
}
