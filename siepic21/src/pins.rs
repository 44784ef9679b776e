//!
//! # SiEPIC Pins
//!
//! SiEPIC cells mark each connection point with a short, zero-width path on a pin layer
//! ("pin"), running from inside the device outward, plus a text label naming it.
//! [add_ports_from_siepic_pins] recovers [Port]s from these pairs;
//! [add_pins_bbox_siepic] writes them (and a device-recognition box) for cells we generate.
//!

// Local imports
use crate::error::PdkResult;
use crate::raw::{
    Cell, Element, LayerSpec, Path, Point, Port, PortType, Rect, Shape,
    TextElement, UmPoint, Units,
};
use crate::tech::{PinLayers, Technology, DEVREC};

/// # Cardinal Orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    East,
    North,
    West,
    South,
}
impl Orientation {
    /// Degrees counter-clockwise from +x
    pub fn degrees(&self) -> i32 {
        match self {
            Orientation::East => 0,
            Orientation::North => 90,
            Orientation::West => 180,
            Orientation::South => 270,
        }
    }
}

/// Guess the orientation of a port from its position, its cell's name,
/// its label, and the number of ports on the cell.
/// Used for pins with no usable direction. Decided in order, first match wins:
///
/// * Grating couplers (`name` containing "gc") face east.
/// * Label `opt1` faces west.
/// * Crossings (`name` containing "crossing") face north above the x-axis, south below it.
/// * On four-port cells, `opt1` and `opt2` face west, `opt3` and `opt4` east.
/// * Anything else faces west if at or left of the y-axis, east otherwise.
///
pub fn guess_port_orientation(position: UmPoint, name: &str, label: &str, n: usize) -> Orientation {
    if name.contains("gc") {
        return Orientation::East;
    }
    if label == "opt1" {
        return Orientation::West;
    }
    if position.y > 0.0 && name.contains("crossing") {
        return Orientation::North;
    }
    if position.y < 0.0 && name.contains("crossing") {
        return Orientation::South;
    }
    if n == 4 {
        if label == "opt1" || label == "opt2" {
            return Orientation::West;
        }
        if label == "opt3" || label == "opt4" {
            return Orientation::East;
        }
    }
    if position.x <= 0.0 {
        Orientation::West
    } else {
        Orientation::East
    }
}

/// Classified pin, awaiting its label
struct Pin {
    p1: UmPoint,
    p2: UmPoint,
    width: f64,
    port_type: PortType,
    layer: LayerSpec,
}

/// Add ports to `cell` from its SiEPIC pin-and-label pairs.
///
/// Paths on the `pins` layers are pins; all other paths are ignored.
/// Each pin claims the first unclaimed label lying (within tolerance) at its midpoint or either end.
/// Pins without a label are skipped with a warning.
/// Names already in use get a `_1`, `_2`, ... suffix.
/// Ports are finally sorted by orientation, then x, then y.
///
/// Returns the number of ports added.
///
pub fn add_ports_from_siepic_pins(cell: &mut Cell, pins: &PinLayers, units: Units) -> PdkResult<usize> {
    let um = |p: &Point| UmPoint::new(units.to_microns(p.x), units.to_microns(p.y));

    // Classify first; anything off the pin layers never claims a label
    let mut found = Vec::new();
    for elem in cell.layout.elems.iter() {
        let path = match &elem.inner {
            Shape::Path(p) => p,
            _ => continue,
        };
        let port_type = if elem.layer == pins.optical {
            PortType::Optical
        } else if elem.layer == pins.electrical {
            PortType::Electrical
        } else {
            continue;
        };
        let (p1, p2) = match path.ends() {
            Some(ends) => ends,
            None => {
                log::warn!(
                    "Skipping pin with {} point(s) on {} in {}",
                    path.points.len(),
                    elem.layer,
                    cell.name
                );
                continue;
            }
        };
        found.push(Pin {
            p1: um(&p1),
            p2: um(&p2),
            width: units.to_microns(path.width as isize),
            port_type,
            layer: elem.layer,
        });
    }

    let mut labels: Vec<(UmPoint, &str)> = cell
        .layout
        .labels
        .iter()
        .map(|l| (um(&l.loc), l.string.as_str()))
        .collect();
    let mut ports = Vec::with_capacity(found.len());
    for pin in found.iter() {
        let center = pin.p1.midpoint(&pin.p2);
        let idx = labels.iter().position(|(loc, _)| {
            loc.isclose(&center) || loc.isclose(&pin.p1) || loc.isclose(&pin.p2)
        });
        let label = match idx {
            Some(idx) => labels.remove(idx).1,
            None => {
                log::warn!(
                    "Label not found for pin in {}: center=({}, {}) p1=({}, {}) p2=({}, {})",
                    cell.name,
                    center.x,
                    center.y,
                    pin.p1.x,
                    pin.p1.y,
                    pin.p2.x,
                    pin.p2.y
                );
                continue;
            }
        };
        let (dx, dy) = (pin.p2.x - pin.p1.x, pin.p2.y - pin.p1.y);
        let orientation = if dx == 0.0 && dy == 0.0 {
            guess_port_orientation(center, &cell.name, label, found.len()).degrees()
        } else {
            dy.atan2(dx).to_degrees().round() as i32
        };
        let layer = match pin.port_type {
            PortType::Electrical => pins.port_electrical,
            _ => pins.port_optical,
        }
        .unwrap_or(pin.layer);
        ports.push(Port::new(
            label,
            center,
            pin.width,
            orientation,
            pin.port_type,
            layer,
        ));
    }

    let count = ports.len();
    for mut port in ports.into_iter() {
        port.name = cell.ports.unique_name(&port.name);
        cell.ports.add(port)?;
    }
    cell.ports.canonicalize();
    Ok(count)
}

/// Add SiEPIC pins for each of `cell`'s optical and electrical ports,
/// and a device-recognition box around its contents.
///
/// Each pin is a `pin_length` path centered on its port and pointing outward,
/// with the port name as a label at its center.
/// Fiber ports get no pin.
///
pub fn add_pins_bbox_siepic(cell: &mut Cell, tech: &Technology) -> PdkResult<()> {
    let units = tech.units;
    let half = tech.pin_length / 2.0;
    let mut pins = Vec::new();
    let mut labels = Vec::new();
    for port in cell.ports.iter() {
        let layer = match port.port_type {
            PortType::Optical => tech.pins.optical,
            PortType::Electrical => tech.pins.electrical,
            PortType::Fiber => continue,
        };
        let [dx, dy] = port.direction();
        let (cx, cy) = (port.center.x, port.center.y);
        let p1 = Point::new(
            units.from_microns(cx - dx * half),
            units.from_microns(cy - dy * half),
        );
        let p2 = Point::new(
            units.from_microns(cx + dx * half),
            units.from_microns(cy + dy * half),
        );
        let width = units.from_microns(port.width).unsigned_abs();
        pins.push(Element::new(layer, Path::new(vec![p1, p2], width)));
        labels.push(TextElement::new(
            &port.name,
            Point::new(units.from_microns(cx), units.from_microns(cy)),
            layer,
        ));
    }
    let bbox = cell.layout.bbox()?;
    if !bbox.is_empty() {
        cell.layout
            .elems
            .push(Element::new(DEVREC, Rect::new(bbox.p0, bbox.p1)));
    }
    cell.layout.elems.extend(pins);
    cell.layout.labels.extend(labels);
    Ok(())
}
