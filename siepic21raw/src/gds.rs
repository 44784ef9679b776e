//!
//! # GDSII Import & Export Module
//!

// Std-Lib
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::path::Path as FsPath;

// Crates.io
use gds21::{GdsElement, GdsLibrary, GdsPoint, GdsStrans, GdsStruct};

// Local imports
use crate::{
    data::{Cell, Element, Instance, LayerSpec, Library, TextElement, Units},
    error::{ErrorContext, LayoutError, LayoutResult},
    geom::{Path, Point, Polygon, Rect, Shape},
    utils::{ErrorHelper, Ptr, Unwrapper},
    Int,
};

impl Library {
    /// Import a [GdsLibrary]
    pub fn from_gds(gdslib: &GdsLibrary) -> LayoutResult<Library> {
        GdsImporter::import(gdslib)
    }
    /// Convert to a [GdsLibrary]
    pub fn to_gds(&self) -> LayoutResult<GdsLibrary> {
        GdsExporter::export(self)
    }
    /// Load and import the GDSII file at `fname`
    pub fn load(fname: impl AsRef<FsPath>) -> LayoutResult<Library> {
        let gdslib = GdsLibrary::load(&fname)?;
        log::debug!(
            "Loaded {} ({} structs)",
            fname.as_ref().display(),
            gdslib.structs.len()
        );
        Self::from_gds(&gdslib)
    }
    /// Export and save to GDSII file `fname`
    pub fn save(&self, fname: impl AsRef<FsPath>) -> LayoutResult<()> {
        self.to_gds()?.save(fname)?;
        Ok(())
    }
}

/// # GDSII Exporter
///
/// Converts a [Library] to a [GdsLibrary].
/// Ports have no GDSII counterpart and are not written;
/// cells carrying SiEPIC pins write those as ordinary paths and labels.
///
#[derive(Debug)]
pub struct GdsExporter<'lib> {
    lib: &'lib Library,
    ctx_stack: Vec<ErrorContext>,
}
impl<'lib> GdsExporter<'lib> {
    pub fn export(lib: &'lib Library) -> LayoutResult<GdsLibrary> {
        Self {
            lib,
            ctx_stack: vec![ErrorContext::Library(lib.name.clone())],
        }
        .export_lib()
    }
    fn export_lib(&mut self) -> LayoutResult<GdsLibrary> {
        let lib = self.lib;
        let mut gdslib = GdsLibrary::new(&lib.name);
        // First number: database unit in (micrometer) user units. Second: in meters.
        let meters = lib.units.meters();
        gdslib.units = gds21::GdsUnits::new(meters / 1e-6, meters);

        let mut names = HashSet::new();
        for ptr in lib.cells.iter() {
            let cell = ptr.read()?;
            if !names.insert(cell.name.clone()) {
                return self.fail(format!("Duplicate cell name {}", cell.name));
            }
            let strukt = self.export_cell(&cell)?;
            gdslib.structs.push(strukt);
        }
        Ok(gdslib)
    }
    /// Convert a [Cell] to a [GdsStruct] cell-definition
    fn export_cell(&mut self, cell: &Cell) -> LayoutResult<GdsStruct> {
        self.ctx_stack.push(ErrorContext::Cell(cell.name.clone()));
        let layout = &cell.layout;
        let mut elems =
            Vec::with_capacity(layout.insts.len() + layout.elems.len() + layout.labels.len());
        for inst in layout.insts.iter() {
            elems.push(self.export_instance(inst)?);
        }
        for elem in layout.elems.iter() {
            elems.push(self.export_element(elem)?);
        }
        for label in layout.labels.iter() {
            elems.push(self.export_label(label)?);
        }
        let mut strukt = GdsStruct::new(&cell.name);
        strukt.elems = elems;
        self.ctx_stack.pop();
        Ok(strukt)
    }
    /// Convert an [Instance] to a [gds21::GdsStructRef]
    fn export_instance(&mut self, inst: &Instance) -> LayoutResult<GdsElement> {
        let name = inst.cell.read()?.name.clone();
        self.ctx_stack.push(ErrorContext::Instance(name.clone()));
        let strans = if inst.reflect_vert || inst.angle.is_some() {
            Some(GdsStrans {
                reflected: inst.reflect_vert,
                angle: inst.angle,
                ..Default::default()
            })
        } else {
            None
        };
        let sref = gds21::GdsStructRef {
            name,
            xy: self.export_point(&inst.loc)?,
            strans,
            ..Default::default()
        };
        self.ctx_stack.pop();
        Ok(GdsElement::GdsStructRef(sref))
    }
    /// Convert an [Element] to a boundary or path.
    /// Boundaries repeat their first point to close.
    fn export_element(&mut self, elem: &Element) -> LayoutResult<GdsElement> {
        self.ctx_stack.push(ErrorContext::Geometry);
        let LayerSpec(layer, datatype) = elem.layer;
        let rv = match &elem.inner {
            Shape::Rect(r) => {
                let (p0, p1) = (&r.p0, &r.p1);
                let pts = [
                    Point::new(p0.x, p0.y),
                    Point::new(p1.x, p0.y),
                    Point::new(p1.x, p1.y),
                    Point::new(p0.x, p1.y),
                    Point::new(p0.x, p0.y),
                ];
                GdsElement::GdsBoundary(gds21::GdsBoundary {
                    layer,
                    datatype,
                    xy: self.export_points(&pts)?,
                    ..Default::default()
                })
            }
            Shape::Polygon(p) => {
                let first = self.unwrap(p.points.first(), "Empty polygon")?;
                let mut xy = self.export_points(&p.points)?;
                xy.push(self.export_point(first)?);
                GdsElement::GdsBoundary(gds21::GdsBoundary {
                    layer,
                    datatype,
                    xy,
                    ..Default::default()
                })
            }
            Shape::Path(p) => GdsElement::GdsPath(gds21::GdsPath {
                layer,
                datatype,
                xy: self.export_points(&p.points)?,
                width: Some(i32::try_from(p.width).unwrapper(&*self, "Path width out of range")?),
                ..Default::default()
            }),
        };
        self.ctx_stack.pop();
        Ok(rv)
    }
    /// Convert a [TextElement] to a [gds21::GdsTextElem]
    fn export_label(&mut self, label: &TextElement) -> LayoutResult<GdsElement> {
        self.ctx_stack.push(ErrorContext::Label);
        let text = gds21::GdsTextElem {
            string: label.string.clone(),
            layer: label.layer.0,
            texttype: label.layer.1,
            xy: self.export_point(&label.loc)?,
            ..Default::default()
        };
        self.ctx_stack.pop();
        Ok(GdsElement::GdsTextElem(text))
    }
    fn export_point(&self, pt: &Point) -> LayoutResult<GdsPoint> {
        let x = i32::try_from(pt.x).unwrapper(self, "Coordinate out of GDSII range")?;
        let y = i32::try_from(pt.y).unwrapper(self, "Coordinate out of GDSII range")?;
        Ok(GdsPoint::new(x, y))
    }
    fn export_points(&self, pts: &[Point]) -> LayoutResult<Vec<GdsPoint>> {
        pts.iter().map(|p| self.export_point(p)).collect()
    }
}
impl ErrorHelper for GdsExporter<'_> {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> LayoutError {
        LayoutError::Export {
            message: msg.into(),
            stack: self.ctx_stack.clone(),
        }
    }
}

/// # GDSII Importer
///
/// Struct definitions are imported on first reference, so that every
/// [Instance] can point at its (already imported) definition.
/// The resulting [Library] lists cells children-first.
///
#[derive(Debug)]
pub struct GdsImporter<'g> {
    /// Source structs, by name
    structs: HashMap<&'g str, &'g GdsStruct>,
    /// Completed cells, by name
    done: HashMap<String, Ptr<Cell>>,
    /// Struct names currently being imported, for cycle detection
    pending: HashSet<String>,
    ctx_stack: Vec<ErrorContext>,
    lib: Library,
}
impl<'g> GdsImporter<'g> {
    /// Import a [GdsLibrary] into a [Library]
    pub fn import(gdslib: &'g GdsLibrary) -> LayoutResult<Library> {
        let mut importer = Self {
            structs: HashMap::new(),
            done: HashMap::new(),
            pending: HashSet::new(),
            ctx_stack: vec![ErrorContext::Library(gdslib.name.clone())],
            lib: Library::new(&gdslib.name, Units::default()),
        };
        importer.import_lib(gdslib)?;
        Ok(importer.lib)
    }
    fn import_lib(&mut self, gdslib: &'g GdsLibrary) -> LayoutResult<()> {
        self.lib.units = self.import_units(&gdslib.units)?;
        for strukt in gdslib.structs.iter() {
            if self.structs.insert(strukt.name.as_str(), strukt).is_some() {
                return self.fail(format!("Duplicate struct name {}", strukt.name));
            }
        }
        for strukt in gdslib.structs.iter() {
            self.import_struct(&strukt.name)?;
        }
        Ok(())
    }
    /// Import our [Units]
    fn import_units(&mut self, units: &gds21::GdsUnits) -> LayoutResult<Units> {
        self.ctx_stack.push(ErrorContext::Units);
        // The database unit, in meters, is the one that really matters
        let dbu = units.db_unit();
        let rv = self.unwrap(
            Units::from_meters(dbu),
            format!("Unsupported GDSII Unit: {:10.3e}", dbu),
        )?;
        self.ctx_stack.pop();
        Ok(rv)
    }
    /// Import struct `name`, or return it if already imported
    fn import_struct(&mut self, name: &str) -> LayoutResult<Ptr<Cell>> {
        if let Some(ptr) = self.done.get(name) {
            return Ok(ptr.clone());
        }
        if self.pending.contains(name) {
            return self.fail(format!("Struct reference cycle through {name}"));
        }
        let strukt = *self.unwrap(
            self.structs.get(name),
            format!("Reference to undefined struct {name}"),
        )?;
        self.pending.insert(name.to_string());
        let cell = self.import_cell(strukt)?;
        self.pending.remove(name);

        let ptr = self.lib.cells.add(cell);
        self.done.insert(name.to_string(), ptr.clone());
        Ok(ptr)
    }
    /// Import a GDS Cell ([GdsStruct]) into a [Cell]
    fn import_cell(&mut self, strukt: &'g GdsStruct) -> LayoutResult<Cell> {
        self.ctx_stack.push(ErrorContext::Cell(strukt.name.clone()));
        let mut cell = Cell::new(&strukt.name);
        for elem in &strukt.elems {
            use GdsElement::*;
            match elem {
                GdsBoundary(x) => {
                    let e = self.import_boundary(x)?;
                    cell.layout.elems.push(e);
                }
                GdsPath(x) => {
                    let e = self.import_path(x)?;
                    cell.layout.elems.push(e);
                }
                GdsBox(x) => {
                    let e = self.import_box(x)?;
                    cell.layout.elems.push(e);
                }
                GdsStructRef(x) => {
                    let inst = self.import_instance(x)?;
                    cell.layout.insts.push(inst);
                }
                GdsArrayRef(x) => {
                    let insts = self.import_instance_array(x)?;
                    cell.layout.insts.extend(insts);
                }
                GdsTextElem(x) => cell.layout.labels.push(TextElement {
                    string: x.string.clone(),
                    loc: import_point(&x.xy),
                    layer: LayerSpec(x.layer, x.texttype),
                }),
                GdsNode(x) => {
                    // Nodes carry electrical connectivity only, and have no geometry
                    log::warn!(
                        "Skipping GDSII Node on layer {} in {}",
                        x.layer,
                        strukt.name
                    );
                }
            }
        }
        self.ctx_stack.pop();
        Ok(cell)
    }
    /// Import a [gds21::GdsBoundary] into an [Element]
    fn import_boundary(&mut self, x: &gds21::GdsBoundary) -> LayoutResult<Element> {
        self.ctx_stack.push(ErrorContext::Geometry);
        let mut pts: Vec<Point> = x.xy.iter().map(import_point).collect();
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        self.assert(pts.len() >= 3, "GDS Boundary must have at least three points")?;
        let inner = if pts.len() == 4
            && ((pts[0].x == pts[1].x // Clockwise
                && pts[1].y == pts[2].y
                && pts[2].x == pts[3].x
                && pts[3].y == pts[0].y)
                || (pts[0].y == pts[1].y // Counter-clockwise
                    && pts[1].x == pts[2].x
                    && pts[2].y == pts[3].y
                    && pts[3].x == pts[0].x))
        {
            let (p0, p1) = (pts[0], pts[2]);
            Shape::Rect(Rect::new(
                Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
                Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
            ))
        } else {
            Shape::Polygon(Polygon::new(pts))
        };
        self.ctx_stack.pop();
        Ok(Element::new(LayerSpec(x.layer, x.datatype), inner))
    }
    /// Import a [gds21::GdsBox] into an [Element]
    fn import_box(&mut self, x: &gds21::GdsBox) -> LayoutResult<Element> {
        // GDS stores *five* coordinates per box.
        // The first and third are, for any valid box, opposite corners.
        let (p0, p1) = (import_point(&x.xy[0]), import_point(&x.xy[2]));
        let inner = Rect::new(
            Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        );
        Ok(Element::new(LayerSpec(x.layer, x.boxtype), inner))
    }
    /// Import a [gds21::GdsPath] into an [Element].
    /// Missing widths are zero; negative (absolute) widths are used as their magnitude.
    fn import_path(&mut self, x: &gds21::GdsPath) -> LayoutResult<Element> {
        let points = x.xy.iter().map(import_point).collect();
        let width = x.width.unwrap_or(0).unsigned_abs() as usize;
        Ok(Element::new(
            LayerSpec(x.layer, x.datatype),
            Path::new(points, width),
        ))
    }
    /// Import the reflection and rotation settings of `strans`
    fn import_strans(&self, strans: &Option<GdsStrans>) -> LayoutResult<(bool, Option<f64>)> {
        let strans = match strans {
            None => return Ok((false, None)),
            Some(s) => s,
        };
        if strans.abs_mag || strans.abs_angle {
            return self.fail("Unsupported GDSII Instance: Absolute");
        }
        if let Some(mag) = strans.mag {
            self.assert(
                approx::relative_eq!(mag, 1.0),
                format!("Unsupported GDSII Instance Magnification {mag}"),
            )?;
        }
        Ok((strans.reflected, strans.angle))
    }
    /// Import a [gds21::GdsStructRef] cell/struct-instance into an [Instance]
    fn import_instance(&mut self, sref: &gds21::GdsStructRef) -> LayoutResult<Instance> {
        self.ctx_stack.push(ErrorContext::Instance(sref.name.clone()));
        let cell = self.import_struct(&sref.name)?;
        let (reflect_vert, angle) = self.import_strans(&sref.strans)?;
        let inst = Instance {
            inst_name: sref.name.clone(),
            cell,
            loc: import_point(&sref.xy),
            reflect_vert,
            angle,
        };
        self.ctx_stack.pop();
        Ok(inst)
    }
    /// Import a [gds21::GdsArrayRef] into one [Instance] per array entry.
    ///
    /// `xy` holds the origin, the origin displaced by `cols` column-pitches,
    /// and the origin displaced by `rows` row-pitches.
    fn import_instance_array(&mut self, aref: &gds21::GdsArrayRef) -> LayoutResult<Vec<Instance>> {
        self.ctx_stack.push(ErrorContext::Array(aref.name.clone()));
        self.assert(
            aref.cols > 0 && aref.rows > 0,
            "GDS Array must have positive rows and columns",
        )?;
        let cell = self.import_struct(&aref.name)?;
        let (reflect_vert, angle) = self.import_strans(&aref.strans)?;

        let (cols, rows) = (aref.cols as Int, aref.rows as Int);
        let origin = import_point(&aref.xy[0]);
        let colend = import_point(&aref.xy[1]);
        let rowend = import_point(&aref.xy[2]);
        let colstep = Point::new((colend.x - origin.x) / cols, (colend.y - origin.y) / cols);
        let rowstep = Point::new((rowend.x - origin.x) / rows, (rowend.y - origin.y) / rows);

        let mut insts = Vec::with_capacity((cols * rows) as usize);
        for ir in 0..rows {
            for ic in 0..cols {
                insts.push(Instance {
                    inst_name: format!("{}[{}][{}]", aref.name, ir, ic),
                    cell: cell.clone(),
                    loc: Point::new(
                        origin.x + ic * colstep.x + ir * rowstep.x,
                        origin.y + ic * colstep.y + ir * rowstep.y,
                    ),
                    reflect_vert,
                    angle,
                });
            }
        }
        self.ctx_stack.pop();
        Ok(insts)
    }
}
impl ErrorHelper for GdsImporter<'_> {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> LayoutError {
        LayoutError::Import {
            message: msg.into(),
            stack: self.ctx_stack.clone(),
        }
    }
}
fn import_point(pt: &GdsPoint) -> Point {
    Point::new(pt.x as Int, pt.y as Int)
}
