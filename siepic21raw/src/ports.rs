//!
//! # Cell Ports
//!
//! Named, oriented, typed connection points, denominated in micrometers.
//!

// Crates.io
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// Local imports
use crate::{
    data::{LayerSpec, Units},
    error::{LayoutError, LayoutResult},
    geom::Transform,
    utils::{enumstr, EnumStr},
};

enumstr!(
    /// # Port Type
    PortType {
        Optical: "optical",
        Electrical: "electrical",
        Fiber: "fiber",
    }
);

/// # Micrometer-Valued Point
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct UmPoint {
    pub x: f64,
    pub y: f64,
}
impl UmPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Midpoint between `self` and `other`
    pub fn midpoint(&self, other: &UmPoint) -> UmPoint {
        UmPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
    /// Tolerance-equality in both coordinates.
    /// Relative tolerance 1e-5, absolute 1e-8.
    pub fn isclose(&self, other: &UmPoint) -> bool {
        approx::relative_eq!(self.x, other.x, epsilon = 1e-8, max_relative = 1e-5)
            && approx::relative_eq!(self.y, other.y, epsilon = 1e-8, max_relative = 1e-5)
    }
}

/// # Port
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Port {
    /// Port Name, unique within its cell
    pub name: String,
    /// Center Location
    pub center: UmPoint,
    /// Width
    pub width: f64,
    /// Outward-facing direction, in degrees counter-clockwise from +x, in [0, 360)
    pub orientation: i32,
    /// Port Type
    pub port_type: PortType,
    /// Layer
    pub layer: LayerSpec,
}
impl Port {
    /// Create a new [Port]. `orientation` is normalized into [0, 360).
    pub fn new(
        name: impl Into<String>,
        center: UmPoint,
        width: f64,
        orientation: i32,
        port_type: PortType,
        layer: LayerSpec,
    ) -> Self {
        Self {
            name: name.into(),
            center,
            width,
            orientation: orientation.rem_euclid(360),
            port_type,
            layer,
        }
    }
    /// Unit vector along our orientation
    pub fn direction(&self) -> [f64; 2] {
        let (sin, cos) = (self.orientation as f64).to_radians().sin_cos();
        [cos, sin]
    }
    /// Create a new [Port] moved by placement `trans`, whose translation is in `units`
    pub fn transform(&self, trans: &Transform, units: Units) -> Port {
        let scale = units.scale();
        let um = Transform {
            a: trans.a,
            b: [trans.b[0] * scale, trans.b[1] * scale],
        };
        let [x, y] = um.apply([self.center.x, self.center.y]);
        let [dx, dy] = um.apply_dir(self.direction());
        let orientation = dy.atan2(dx).to_degrees().round() as i32;
        Port {
            center: UmPoint::new(x, y),
            orientation: orientation.rem_euclid(360),
            ..self.clone()
        }
    }
}

/// Compass side of a port, derived from its orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    West,
    North,
    East,
    South,
}
impl Side {
    fn of(orientation: i32) -> Side {
        match orientation.rem_euclid(360) {
            45..=134 => Side::North,
            135..=224 => Side::West,
            225..=314 => Side::South,
            _ => Side::East,
        }
    }
}

/// # Ports
///
/// Name-keyed, insertion-ordered [Port] map.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ports(IndexMap<String, Port>);
impl Ports {
    pub fn new() -> Self {
        Self::default()
    }
    /// Add `port`. Fails if its name is taken.
    pub fn add(&mut self, port: Port) -> LayoutResult<()> {
        if self.0.contains_key(&port.name) {
            return LayoutError::fail(format!("Duplicate port name {}", port.name));
        }
        self.0.insert(port.name.clone(), port);
        Ok(())
    }
    /// Get `name` if unused, or the first of `name_1`, `name_2`, ... that is.
    pub fn unique_name(&self, name: &str) -> String {
        if !self.0.contains_key(name) {
            return name.to_string();
        }
        (1..)
            .map(|i| format!("{name}_{i}"))
            .find(|n| !self.0.contains_key(n))
            .unwrap_or_default()
    }
    /// Get port `name`, or fail with [LayoutError::MissingPort]
    pub fn get(&self, name: &str) -> LayoutResult<&Port> {
        self.0.get(name).ok_or_else(|| LayoutError::MissingPort {
            name: name.to_string(),
            available: self.names(),
        })
    }
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.0.values()
    }
    /// Port names, in order
    pub fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }
    /// Stable re-order by (orientation, x, y)
    pub fn canonicalize(&mut self) {
        self.0.sort_by(|_, a, _, b| {
            a.orientation
                .cmp(&b.orientation)
                .then(a.center.x.total_cmp(&b.center.x))
                .then(a.center.y.total_cmp(&b.center.y))
        });
    }
    /// Rename ports clockwise from the west side:
    /// west ports south-to-north, north west-to-east, east north-to-south, south east-to-west.
    /// Optical ports become `o1, o2, ...` and electrical ports `e1, e2, ...`, each counted separately.
    /// Other port types keep their names. Map order is unchanged.
    pub fn auto_rename(&mut self) {
        let mut clockwise: Vec<&Port> = self.0.values().collect();
        clockwise.sort_by(|a, b| {
            let (sa, sb) = (Side::of(a.orientation), Side::of(b.orientation));
            sa.cmp(&sb).then_with(|| match sa {
                Side::West => a.center.y.total_cmp(&b.center.y),
                Side::North => a.center.x.total_cmp(&b.center.x),
                Side::East => b.center.y.total_cmp(&a.center.y),
                Side::South => b.center.x.total_cmp(&a.center.x),
            })
        });
        let mut renames: IndexMap<String, String> = IndexMap::new();
        let (mut nopt, mut nelec) = (0, 0);
        for port in clockwise {
            let new = match port.port_type {
                PortType::Optical => {
                    nopt += 1;
                    format!("o{nopt}")
                }
                PortType::Electrical => {
                    nelec += 1;
                    format!("e{nelec}")
                }
                PortType::Fiber => port.name.clone(),
            };
            renames.insert(port.name.clone(), new);
        }
        let old = std::mem::take(&mut self.0);
        for (name, mut port) in old.into_iter() {
            let new = renames.get(&name).cloned().unwrap_or(name);
            port.name = self.unique_name(&new);
            self.0.insert(port.name.clone(), port);
        }
    }
    /// Create a new [Ports], each moved by placement `trans`
    pub fn transform(&self, trans: &Transform, units: Units) -> Ports {
        Ports(
            self.0
                .iter()
                .map(|(k, p)| (k.clone(), p.transform(trans, units)))
                .collect(),
        )
    }
}
impl<'a> IntoIterator for &'a Ports {
    type Item = &'a Port;
    type IntoIter = indexmap::map::Values<'a, String, Port>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}
