//!
//! # EBeam Technology
//!
//! Layers, cross-sections, and the vertical layer stack.
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::raw::{LayerMap, LayerSpec, Units};

/// Waveguide core
pub const WG: LayerSpec = LayerSpec(1, 0);
/// Second silicon layer
pub const WG2: LayerSpec = LayerSpec(31, 0);
/// Device-recognition boxes
pub const DEVREC: LayerSpec = LayerSpec(68, 0);
pub const LABEL: LayerSpec = LayerSpec(10, 0);
/// Optical pins
pub const PORT: LayerSpec = LayerSpec(1, 10);
/// Electrical pins
pub const PORTE: LayerSpec = LayerSpec(1, 11);
pub const FLOORPLAN: LayerSpec = LayerSpec(99, 0);
pub const M1_HEATER: LayerSpec = LayerSpec(11, 0);
pub const M2_ROUTER: LayerSpec = LayerSpec(12, 0);
pub const PAD_OPEN: LayerSpec = LayerSpec(13, 0);
/// Measurement and device labels
pub const TEXT: LayerSpec = LayerSpec(10, 0);

/// # Pin Marker Layers
///
/// Where the annotator looks for SiEPIC pins,
/// and which layers the ports it creates are placed on.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PinLayers {
    /// Layer of optical pin paths
    pub optical: LayerSpec,
    /// Layer of electrical pin paths
    pub electrical: LayerSpec,
    /// Layer for optical ports. Falls back to `optical` if unset.
    pub port_optical: Option<LayerSpec>,
    /// Layer for electrical ports. Falls back to `electrical` if unset.
    pub port_electrical: Option<LayerSpec>,
}
impl Default for PinLayers {
    fn default() -> Self {
        Self {
            optical: PORT,
            electrical: PORTE,
            port_optical: Some(WG),
            port_electrical: None,
        }
    }
}

/// # Waveguide Cross-Section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrossSection {
    /// Core width (µm)
    pub width: f64,
    /// Default bend radius (µm)
    pub radius: f64,
    /// Cladding (device-recognition) offset on each side of the core (µm)
    pub cladding_offset: f64,
    pub layer: LayerSpec,
    pub cladding_layer: LayerSpec,
}
impl CrossSection {
    /// The EBeam strip waveguide
    pub fn strip() -> Self {
        Self {
            width: 0.5,
            radius: 10.0,
            cladding_offset: 3.0,
            layer: WG,
            cladding_layer: DEVREC,
        }
    }
}

/// # Layer-Stack Entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerLevel {
    pub name: String,
    pub layer: LayerSpec,
    /// Thickness (µm)
    pub thickness: f64,
    /// Bottom elevation (µm)
    pub zmin: f64,
    pub material: String,
}

/// # Vertical Layer Stack
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LayerStack {
    pub levels: Vec<LayerLevel>,
}
impl LayerStack {
    /// The EBeam stack: two silicon layers of `thickness_nm`
    pub fn ebeam(thickness_nm: f64) -> Self {
        let level = |name: &str, layer| LayerLevel {
            name: name.into(),
            layer,
            thickness: thickness_nm / 1000.0,
            zmin: 0.0,
            material: "si".into(),
        };
        Self {
            levels: vec![level("core", WG), level("core2", WG2)],
        }
    }
    /// Thickness of `layer` (µm), if it is in the stack
    pub fn thickness(&self, layer: &LayerSpec) -> Option<f64> {
        self.levels
            .iter()
            .find(|l| l.layer == *layer)
            .map(|l| l.thickness)
    }
}

/// # Technology
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Technology {
    pub name: String,
    /// Database units for everything the PDK creates
    pub units: Units,
    pub layers: LayerMap,
    pub strip: CrossSection,
    pub stack: LayerStack,
    pub pins: PinLayers,
    /// Length of generated pin paths (µm)
    pub pin_length: f64,
}
impl Technology {
    /// The UBC SiEPIC EBeam process
    pub fn ebeam() -> Self {
        Self {
            name: "ubc".into(),
            units: Units::Nano,
            layers: LayerMap::from_pairs(&[
                ("WG", WG),
                ("WG2", WG2),
                ("DEVREC", DEVREC),
                ("LABEL", LABEL),
                ("PORT", PORT),
                ("PORTE", PORTE),
                ("FLOORPLAN", FLOORPLAN),
                ("M1_HEATER", M1_HEATER),
                ("M2_ROUTER", M2_ROUTER),
                ("PAD_OPEN", PAD_OPEN),
                ("TEXT", TEXT),
            ]),
            strip: CrossSection::strip(),
            stack: LayerStack::ebeam(220.0),
            pins: PinLayers::default(),
            pin_length: 0.1,
        }
    }
    /// Marker-only layers, stripped by pin removal
    pub fn marker_layers(&self) -> Vec<LayerSpec> {
        vec![self.pins.optical, self.pins.electrical, DEVREC]
    }
}
impl Default for Technology {
    fn default() -> Self {
        Self::ebeam()
    }
}
