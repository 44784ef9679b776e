//!
//! # Component Metadata
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::error::{PdkError, PdkResult};
use crate::utils::{enumstr, EnumStr};

enumstr!(
    /// # Waveguide Polarization
    Polarization {
        Te: "TE",
        Tm: "TM",
    }
);
impl Polarization {
    /// Parse, case-insensitively
    pub fn parse(s: &str) -> PdkResult<Self> {
        Self::from_str(&s.to_uppercase())
            .ok_or_else(|| PdkError::InvalidPolarization(s.to_uppercase()))
    }
}

/// Check that `wavelength` (µm) lies in the open interval (1.0, 2.0)
pub fn check_wavelength(wavelength: f64) -> PdkResult<f64> {
    if wavelength > 1.0 && wavelength < 2.0 {
        Ok(wavelength)
    } else {
        Err(PdkError::InvalidWavelength(wavelength))
    }
}

/// # Component Info
///
/// Per-family metadata. All lengths in µm.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Info {
    /// Imported fixed cell
    Fixture { model: String, library: String },
    /// Imported grating coupler
    GratingCoupler {
        model: String,
        polarization: Polarization,
        wavelength: f64,
    },
    Waveguide { length: f64, width: f64 },
    Pad { size: (f64, f64) },
    Bragg {
        w0: f64,
        dw: f64,
        n: usize,
        l1: f64,
        l2: f64,
    },
    /// Straight-waveguide-coupled half ring
    RingCoupler {
        model: String,
        gap: f64,
        radius: f64,
        wg_thickness: f64,
        wg_width: f64,
        lc: f64,
    },
    Ring {
        radius: f64,
        gap: f64,
        length_x: f64,
        length_y: f64,
    },
}
impl Info {
    /// Grating-coupler (polarization, wavelength), if we are one
    pub fn optical_io(&self) -> Option<(Polarization, f64)> {
        match self {
            Info::GratingCoupler {
                polarization,
                wavelength,
                ..
            } => Some((*polarization, *wavelength)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarization() -> PdkResult<()> {
        assert_eq!(Polarization::parse("te")?, Polarization::Te);
        assert_eq!(Polarization::parse("TM")?, Polarization::Tm);
        assert_eq!(Polarization::Te.to_string(), "TE");
        match Polarization::parse("te0") {
            Err(PdkError::InvalidPolarization(p)) => assert_eq!(p, "TE0"),
            other => panic!("Expected InvalidPolarization, got {:?}", other),
        }
        Ok(())
    }
    #[test]
    fn test_wavelength() {
        assert!(check_wavelength(1.55).is_ok());
        assert!(check_wavelength(1.31).is_ok());
        assert!(matches!(check_wavelength(1.0), Err(PdkError::InvalidWavelength(_))));
        assert!(matches!(check_wavelength(1550.0), Err(PdkError::InvalidWavelength(_))));
        assert!(check_wavelength(f64::NAN).is_err());
    }
}
