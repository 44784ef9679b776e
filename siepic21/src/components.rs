//!
//! # Component Catalogue
//!
//! The EBeam fixed cells, its grating couplers, and the parametric cells generated here.
//! All parameters are in micrometers.
//!

// Local imports
use crate::component::Component;
use crate::error::{PdkError, PdkResult};
use crate::info::{Info, Polarization};
use crate::pins::add_pins_bbox_siepic;
use crate::raw::{
    Cell, Element, Instance, LayerSpec, Path, Point, Port, PortType, Rect, UmPoint, Units,
};
use crate::tech::{Technology, M2_ROUTER, PAD_OPEN, WG};
use crate::utils::Ptr;

/// # Fixed-Cell Catalogue Entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureSpec {
    /// Catalogue name
    pub name: &'static str,
    /// GDSII file, relative to the fixture directory
    pub filename: &'static str,
    /// Cell within `filename`, if it holds several
    pub cellname: Option<&'static str>,
}
const fn fixed(name: &'static str, filename: &'static str) -> FixtureSpec {
    FixtureSpec {
        name,
        filename,
        cellname: None,
    }
}
const fn phase_shifter(name: &'static str, cellname: &'static str) -> FixtureSpec {
    FixtureSpec {
        name,
        filename: "thermal_phase_shifters.gds",
        cellname: Some(cellname),
    }
}

/// The EBeam fixed cells
pub const FIXTURES: &[FixtureSpec] = &[
    fixed("ebeam_BondPad", "ebeam_BondPad.gds"),
    fixed("ebeam_adiabatic_te1550", "ebeam_adiabatic_te1550.gds"),
    fixed("ebeam_adiabatic_tm1550", "ebeam_adiabatic_tm1550.gds"),
    fixed("ebeam_bdc_te1550", "ebeam_bdc_te1550.gds"),
    fixed("ebeam_bdc_tm1550", "ebeam_bdc_tm1550.gds"),
    fixed("ebeam_crossing4", "ebeam_crossing4.gds"),
    fixed("ebeam_splitter_adiabatic_swg_te1550", "ebeam_splitter_adiabatic_swg_te1550.gds"),
    fixed("ebeam_splitter_swg_assist_te1310", "ebeam_splitter_swg_assist_te1310.gds"),
    fixed("ebeam_splitter_swg_assist_te1550", "ebeam_splitter_swg_assist_te1550.gds"),
    fixed("ebeam_swg_edgecoupler", "ebeam_swg_edgecoupler.gds"),
    fixed("ebeam_terminator_te1310", "ebeam_terminator_te1310.gds"),
    fixed("ebeam_terminator_te1550", "ebeam_terminator_te1550.gds"),
    fixed("ebeam_terminator_tm1550", "ebeam_terminator_tm1550.gds"),
    fixed("ebeam_y_1550", "ebeam_y_1550.gds"),
    fixed("ebeam_y_adiabatic", "ebeam_y_adiabatic.gds"),
    fixed("ebeam_y_adiabatic_1310", "ebeam_y_adiabatic_1310.gds"),
    fixed("metal_via", "metal_via.gds"),
    fixed("photonic_wirebond_surfacetaper_1310", "photonic_wirebond_surfacetaper_1310.gds"),
    fixed("photonic_wirebond_surfacetaper_1550", "photonic_wirebond_surfacetaper_1550.gds"),
    phase_shifter("thermal_phase_shifter0", "thermal_phase_shifter_multimode_500um"),
    phase_shifter("thermal_phase_shifter1", "thermal_phase_shifter_te_1310_500um"),
    phase_shifter("thermal_phase_shifter2", "thermal_phase_shifter_te_1310_500um_lowloss"),
    phase_shifter("thermal_phase_shifter3", "thermal_phase_shifter_te_1550_500um_lowloss"),
];

/// # Grating-Coupler Catalogue Entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GratingCouplerSpec {
    pub name: &'static str,
    pub filename: &'static str,
    pub polarization: Polarization,
    /// Design wavelength (µm)
    pub wavelength: f64,
}
const fn gc(
    name: &'static str,
    filename: &'static str,
    polarization: Polarization,
    wavelength: f64,
) -> GratingCouplerSpec {
    GratingCouplerSpec {
        name,
        filename,
        polarization,
        wavelength,
    }
}

/// The EBeam grating couplers
pub const GRATING_COUPLERS: &[GratingCouplerSpec] = &[
    gc("gc_te1310", "ebeam_gc_te1310.gds", Polarization::Te, 1.31),
    gc("gc_te1310_8deg", "ebeam_gc_te1310_8deg.gds", Polarization::Te, 1.31),
    gc("gc_te1310_broadband", "ebeam_gc_te1310_broadband.gds", Polarization::Te, 1.31),
    gc("gc_te1550", "ebeam_gc_te1550.gds", Polarization::Te, 1.55),
    gc("gc_te1550_90nmSlab", "ebeam_gc_te1550_90nmSlab.gds", Polarization::Te, 1.55),
    gc("gc_te1550_broadband", "ebeam_gc_te1550_broadband.gds", Polarization::Te, 1.55),
    gc("gc_tm1550", "ebeam_gc_tm1550.gds", Polarization::Tm, 1.55),
];

/// Names of the cells generated in [components](self)
pub const PARAMETRIC: &[&str] = &[
    "straight",
    "pad",
    "dbr",
    "dc_halfring_straight",
    "ring_single",
];

/// Name of the fiber port added to each grating coupler
pub const FIBER_PORT: &str = "o2";
/// Fiber-port location (µm), relative to the coupler's waveguide port
pub const FIBER_PORT_X: f64 = 25.0;
/// Fiber mode-field width (µm)
pub const FIBER_PORT_WIDTH: f64 = 9.0;
/// Default bragg-reflector tooth length (µm): a quarter of 1550nm at an index of 2.44, halved
pub const DBR_TOOTH: f64 = 1.55 / 4.0 / 2.0 / 2.44;
/// Default pad size (µm)
pub const PAD_SIZE: (f64, f64) = (75.0, 75.0);
/// Inset of the pad opening from the pad metal (µm)
pub const PAD_OPEN_INSET: f64 = 1.8;

/// Wrap mirrored grating-coupler fixture `mirrored` in a cell named after `spec`,
/// adding its vertical-fiber port.
pub fn grating_coupler(
    spec: &GratingCouplerSpec,
    mirrored: &Ptr<Cell>,
    tech: &Technology,
) -> PdkResult<Component> {
    let mut cell = Cell::new(spec.name);
    cell.ports = mirrored.read()?.ports.clone();
    cell.layout
        .insts
        .push(Instance::new(spec.filename, mirrored, Point::new(0, 0)));
    cell.ports.add(Port::new(
        FIBER_PORT,
        UmPoint::new(FIBER_PORT_X, 0.0),
        FIBER_PORT_WIDTH,
        0,
        PortType::Fiber,
        tech.strip.layer,
    ))?;
    let info = Info::GratingCoupler {
        model: spec.filename.split('.').next().unwrap_or(spec.filename).to_string(),
        polarization: spec.polarization,
        wavelength: spec.wavelength,
    };
    Ok(Component::new(cell, info))
}

/// Straight strip waveguide of `length`, from the origin along +x
pub fn straight(tech: &Technology, length: f64) -> PdkResult<Component> {
    if !(length > 0.0) {
        return Err(PdkError::param("length", format!("{length} must be positive")));
    }
    let (units, xs) = (tech.units, &tech.strip);
    let w = xs.width;
    let mut cell = Cell::new(format!("straight_L{length}"));
    cell.layout
        .elems
        .push(Element::new(xs.layer, um_rect(units, 0.0, -w / 2.0, length, w / 2.0)));
    cell.ports.add(optical("o1", 0.0, 0.0, w, 180, xs.layer))?;
    cell.ports.add(optical("o2", length, 0.0, w, 0, xs.layer))?;
    add_pins_bbox_siepic(&mut cell, tech)?;
    Ok(Component::new(
        cell,
        Info::Waveguide {
            length,
            width: w,
        },
    ))
}

/// Bond pad of `size` on the routing metal, with a passivation opening inset by [PAD_OPEN_INSET].
/// Electrical ports `e1` through `e4` sit on its west, north, east, and south edges.
pub fn pad(tech: &Technology, size: (f64, f64)) -> PdkResult<Component> {
    let (w, h) = size;
    if !(w > 2.0 * PAD_OPEN_INSET && h > 2.0 * PAD_OPEN_INSET) {
        return Err(PdkError::param(
            "size",
            format!("({w}, {h}) leaves no room for the pad opening"),
        ));
    }
    let units = tech.units;
    let (hw, hh) = (w / 2.0, h / 2.0);
    let inset = PAD_OPEN_INSET;
    let mut cell = Cell::new(format!("pad_{w}x{h}"));
    let layout = &mut cell.layout;
    layout
        .elems
        .push(Element::new(M2_ROUTER, um_rect(units, -hw, -hh, hw, hh)));
    layout.elems.push(Element::new(
        PAD_OPEN,
        um_rect(units, -hw + inset, -hh + inset, hw - inset, hh - inset),
    ));
    let ports = [
        ("e1", -hw, 0.0, h, 180),
        ("e2", 0.0, hh, w, 90),
        ("e3", hw, 0.0, h, 0),
        ("e4", 0.0, -hh, w, 270),
    ];
    for (name, x, y, width, orientation) in ports {
        cell.ports.add(Port::new(
            name,
            UmPoint::new(x, y),
            width,
            orientation,
            PortType::Electrical,
            M2_ROUTER,
        ))?;
    }
    Ok(Component::new(cell, Info::Pad { size }))
}

/// Distributed bragg reflector: a strip-waveguide lead-in of `l1`,
/// followed by `n` periods of widths `w0 - dw/2` and `w0 + dw/2`, of lengths `l1` and `l2`.
/// Its only port `o1` faces west at the origin.
pub fn dbr(tech: &Technology, w0: f64, dw: f64, n: usize, l1: f64, l2: f64) -> PdkResult<Component> {
    let (w1, w2) = (w0 - dw / 2.0, w0 + dw / 2.0);
    if n == 0 {
        return Err(PdkError::param("n", "at least one period is required"));
    }
    if !(w1 > 0.0) {
        return Err(PdkError::param("dw", format!("{dw} leaves {w1} narrow sections")));
    }
    if !(l1 > 0.0 && l2 > 0.0) {
        return Err(PdkError::param("l1", format!("({l1}, {l2}) must be positive")));
    }
    let (units, layer, w) = (tech.units, tech.strip.layer, tech.strip.width);

    let mut period = Cell::new(format!("dbr_cell_w{w1}_{w2}_l{l1}_{l2}"));
    period
        .layout
        .elems
        .push(Element::new(layer, um_rect(units, 0.0, -w1 / 2.0, l1, w1 / 2.0)));
    period
        .layout
        .elems
        .push(Element::new(layer, um_rect(units, l1, -w2 / 2.0, l1 + l2, w2 / 2.0)));
    let period = Ptr::new(period);

    let mut cell = Cell::new(format!("dbr_w0{w0}_dw{dw}_n{n}_l{l1}_{l2}"));
    cell.layout
        .elems
        .push(Element::new(layer, um_rect(units, 0.0, -w / 2.0, l1, w / 2.0)));
    for i in 0..n {
        let x = l1 + i as f64 * (l1 + l2);
        cell.layout.insts.push(Instance::new(
            format!("period{i}"),
            &period,
            Point::new(units.from_microns(x), 0),
        ));
    }
    cell.ports.add(optical("o1", 0.0, 0.0, w, 180, layer))?;
    add_pins_bbox_siepic(&mut cell, tech)?;
    Ok(Component::new(
        cell,
        Info::Bragg { w0, dw, n, l1, l2 },
    ))
}

/// Half-ring coupled to a straight bus waveguide.
///
/// ```text
///      o2              o3
///      |                |
///       \              /
///        `--length_x--'
///     o1 ---------------- o4
/// ```
///
/// The ring section sits `gap` above the bus, edge to edge.
///
pub fn dc_halfring_straight(
    tech: &Technology,
    gap: f64,
    radius: f64,
    length_x: f64,
) -> PdkResult<Component> {
    if !(gap > 0.0) {
        return Err(PdkError::param("gap", format!("{gap} must be positive")));
    }
    if !(radius > 0.0) {
        return Err(PdkError::param("radius", format!("{radius} must be positive")));
    }
    if !(length_x >= 0.0) {
        return Err(PdkError::param("length_x", format!("{length_x} must be non-negative")));
    }
    let (units, xs) = (tech.units, &tech.strip);
    let wg_thickness = tech.stack.thickness(&WG).ok_or_else(|| {
        PdkError::param("stack", format!("no thickness for waveguide layer {WG}"))
    })?;
    let w = xs.width;
    let (hx, xr, yc) = (length_x / 2.0, length_x / 2.0 + radius, w + gap);

    let mut cell = Cell::new(format!("dc_halfring_straight_g{gap}_r{radius}_lx{length_x}"));
    cell.layout
        .elems
        .push(Element::new(xs.layer, um_rect(units, -xr, -w / 2.0, xr, w / 2.0)));
    let mut ring = arc(UmPoint::new(-hx, yc + radius), radius, 180.0, 270.0);
    ring.extend(arc(UmPoint::new(hx, yc + radius), radius, 270.0, 360.0));
    cell.layout
        .elems
        .push(Element::new(xs.layer, um_path(units, &ring, w)));

    cell.ports.add(optical("o1", -xr, 0.0, w, 180, xs.layer))?;
    cell.ports.add(optical("o2", -xr, yc + radius, w, 90, xs.layer))?;
    cell.ports.add(optical("o3", xr, yc + radius, w, 90, xs.layer))?;
    cell.ports.add(optical("o4", xr, 0.0, w, 0, xs.layer))?;
    add_pins_bbox_siepic(&mut cell, tech)?;
    Ok(Component::new(
        cell,
        Info::RingCoupler {
            model: "ebeam_dc_halfring_straight".into(),
            gap,
            radius,
            wg_thickness,
            wg_width: w,
            lc: length_x,
        },
    ))
}

/// All-pass ring resonator: a [dc_halfring_straight] closed by straight sides of `length_y`
/// and a top half-ring. Ports `o1` and `o2` are the bus ends.
pub fn ring_single(
    tech: &Technology,
    gap: f64,
    radius: f64,
    length_x: f64,
    length_y: f64,
) -> PdkResult<Component> {
    if !(length_y >= 0.0) {
        return Err(PdkError::param("length_y", format!("{length_y} must be non-negative")));
    }
    let coupler = dc_halfring_straight(tech, gap, radius, length_x)?;
    let (left, right) = (coupler.port("o2")?, coupler.port("o3")?);
    let (units, xs) = (tech.units, &tech.strip);
    let hx = length_x / 2.0;
    let top = left.center.y + length_y;

    let mut cell = Cell::new(format!(
        "ring_single_g{gap}_r{radius}_lx{length_x}_ly{length_y}"
    ));
    cell.layout
        .insts
        .push(Instance::new("coupler", &coupler.cell, Point::new(0, 0)));
    let mut ring = vec![left.center, UmPoint::new(left.center.x, top)];
    ring.extend(arc(UmPoint::new(-hx, top), radius, 180.0, 90.0));
    ring.extend(arc(UmPoint::new(hx, top), radius, 90.0, 0.0));
    ring.push(UmPoint::new(right.center.x, top));
    ring.push(right.center);
    cell.layout
        .elems
        .push(Element::new(xs.layer, um_path(units, &ring, xs.width)));

    let west = coupler.port("o1")?;
    let east = coupler.port("o4")?;
    cell.ports.add(west)?;
    cell.ports.add(Port {
        name: "o2".into(),
        ..east
    })?;
    add_pins_bbox_siepic(&mut cell, tech)?;
    Ok(Component::new(
        cell,
        Info::Ring {
            radius,
            gap,
            length_x,
            length_y,
        },
    ))
}

/// Points along a circular arc from `start` to `end` degrees, inclusive.
/// A quarter circle gets 32 segments.
fn arc(center: UmPoint, radius: f64, start: f64, end: f64) -> Vec<UmPoint> {
    let segments = ((end - start).abs() / 90.0 * 32.0).ceil().max(1.0) as usize;
    (0..=segments)
        .map(|i| {
            let angle = start + (end - start) * i as f64 / segments as f64;
            let (sin, cos) = angle.to_radians().sin_cos();
            UmPoint::new(center.x + radius * cos, center.y + radius * sin)
        })
        .collect()
}

/// Rectangle between micrometer corners
fn um_rect(units: Units, x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    Rect::new(
        Point::new(units.from_microns(x0), units.from_microns(y0)),
        Point::new(units.from_microns(x1), units.from_microns(y1)),
    )
}

/// Path through micrometer `points`, dropping any that round onto their predecessor
fn um_path(units: Units, points: &[UmPoint], width: f64) -> Path {
    let mut dbu: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        let p = Point::new(units.from_microns(p.x), units.from_microns(p.y));
        if dbu.last() != Some(&p) {
            dbu.push(p);
        }
    }
    Path::new(dbu, units.from_microns(width).unsigned_abs())
}

fn optical(name: &str, x: f64, y: f64, width: f64, orientation: i32, layer: LayerSpec) -> Port {
    Port::new(
        name,
        UmPoint::new(x, y),
        width,
        orientation,
        PortType::Optical,
        layer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::Shape;
    use crate::tech::{DEVREC, PORT};

    #[test]
    fn test_straight() -> PdkResult<()> {
        let tech = Technology::ebeam();
        let wg = straight(&tech, 10.0)?;
        assert_eq!(wg.name()?, "straight_L10");
        let o2 = wg.port("o2")?;
        assert_eq!(o2.center, UmPoint::new(10.0, 0.0));
        assert_eq!(o2.orientation, 0);
        assert_eq!(wg.port("o1")?.orientation, 180);
        wg.assert_ports_on_grid(tech.units)?;

        let cell = wg.cell.read()?;
        let pins = cell.layout.paths_on(&PORT);
        assert_eq!(pins.len(), 2);
        assert!(pins.iter().all(|p| p.width == 500));
        let devrec: Vec<_> = cell.layout.elems.iter().filter(|e| e.layer == DEVREC).collect();
        assert_eq!(devrec.len(), 1);
        assert_eq!(
            devrec[0].inner,
            Shape::Rect(Rect::new(Point::new(0, -250), Point::new(10_000, 250)))
        );
        assert!(straight(&tech, 0.0).is_err());
        Ok(())
    }
    #[test]
    fn test_pad() -> PdkResult<()> {
        let tech = Technology::ebeam();
        let pad = pad(&tech, PAD_SIZE)?;
        assert_eq!(pad.ports()?.names(), vec!["e1", "e2", "e3", "e4"]);
        assert_eq!(pad.port("e2")?.center, UmPoint::new(0.0, 37.5));
        let cell = pad.cell.read()?;
        let open = cell.layout.elems.iter().find(|e| e.layer == PAD_OPEN);
        assert_eq!(
            open.map(|e| e.inner.clone()),
            Some(Shape::Rect(Rect::new(
                Point::new(-35_700, -35_700),
                Point::new(35_700, 35_700)
            )))
        );
        assert!(cell.layout.paths_on(&tech.pins.electrical).is_empty());
        Ok(())
    }
    #[test]
    fn test_dbr() -> PdkResult<()> {
        let tech = Technology::ebeam();
        let dbr = dbr(&tech, 0.5, 0.1, 10, DBR_TOOTH, DBR_TOOTH)?;
        assert_eq!(dbr.ports()?.names(), vec!["o1"]);
        let cell = dbr.cell.read()?;
        assert_eq!(cell.layout.insts.len(), 10);
        assert_eq!(cell.children().len(), 1);
        // Widest section sets the height
        let bbox = cell.layout.bbox()?;
        assert_eq!(bbox.p0.y, -275);
        assert_eq!(bbox.p1.y, 275);
        assert!(super::dbr(&tech, 0.5, 0.1, 0, DBR_TOOTH, DBR_TOOTH).is_err());
        Ok(())
    }
    #[test]
    fn test_dc_halfring_straight() -> PdkResult<()> {
        let tech = Technology::ebeam();
        let coupler = dc_halfring_straight(&tech, 0.2, 5.0, 4.0)?;
        let ports = coupler.ports()?;
        assert_eq!(ports.names(), vec!["o1", "o2", "o3", "o4"]);
        assert!(ports.get("o1")?.center.isclose(&UmPoint::new(-7.0, 0.0)));
        assert!(ports.get("o3")?.center.isclose(&UmPoint::new(7.0, 5.7)));
        assert_eq!(ports.get("o3")?.orientation, 90);
        match &coupler.info {
            Info::RingCoupler {
                model,
                wg_thickness,
                lc,
                ..
            } => {
                assert_eq!(model, "ebeam_dc_halfring_straight");
                assert!((wg_thickness - 0.22).abs() < 1e-12);
                assert_eq!(*lc, 4.0);
            }
            other => panic!("Unexpected info {:?}", other),
        }
        // The ring section ends exactly on its ports
        let cell = coupler.cell.read()?;
        let ring = cell
            .layout
            .elems
            .iter()
            .filter(|e| e.layer == WG)
            .find_map(|e| e.inner.as_path())
            .ok_or("no ring path")
            .map_err(crate::raw::LayoutError::from)?;
        assert_eq!(ring.ends(), Some((Point::new(-7_000, 5_700), Point::new(7_000, 5_700))));
        Ok(())
    }
    #[test]
    fn test_ring_single() -> PdkResult<()> {
        let tech = Technology::ebeam();
        let ring = ring_single(&tech, 0.2, 10.0, 4.0, 0.6)?;
        let ports = ring.ports()?;
        assert_eq!(ports.names(), vec!["o1", "o2"]);
        assert_eq!(ports.get("o2")?.center, UmPoint::new(12.0, 0.0));
        assert_eq!(ports.get("o2")?.orientation, 0);
        // Ring closed at the top, half a width above its centerline
        let bbox = ring.cell.read()?.layout.bbox()?;
        assert_eq!(bbox.p1.y, 21_300 + 250);
        assert!(bbox.contains(&Point::new(0, 21_300)));
        assert_eq!(ring.cell.read()?.children().len(), 1);
        Ok(())
    }
    #[test]
    fn test_catalogue() {
        assert_eq!(FIXTURES.len(), 23);
        assert_eq!(GRATING_COUPLERS.len(), 7);
        let mut names: Vec<&str> = FIXTURES.iter().map(|f| f.name).collect();
        names.extend(GRATING_COUPLERS.iter().map(|g| g.name));
        names.extend(PARAMETRIC.iter());
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
        assert!(DBR_TOOTH > 0.079 && DBR_TOOTH < 0.080);
    }
}
