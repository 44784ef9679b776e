//!
//! # Device Labels
//!
//! Text labels read by automated optical and electrical test equipment.
//!

// Local imports
use crate::component::Component;
use crate::error::{PdkError, PdkResult};
use crate::info::{check_wavelength, Polarization};
use crate::raw::{Cell, Point, TextElement, Units};
use crate::tech::{LABEL, TEXT};

/// Replace underscores with dots, as device names in labels require
pub fn clean_name(name: &str) -> String {
    name.replace('_', ".")
}

/// Optical-input label text for device `name`, measured with `polarization` light at `wavelength` (µm).
///
/// Both are validated before anything is built:
/// `polarization` must be TE or TM (in any case), and `wavelength` within (1.0, 2.0).
///
/// ```
/// # use siepic21::labels::input_label_text;
/// let text = input_label_text("te", 1.55, "someone", "ring_single").unwrap();
/// assert_eq!(text, "opt_in_TE_1550_device_someone-ring.single");
/// ```
pub fn input_label_text(
    polarization: &str,
    wavelength: f64,
    username: &str,
    name: &str,
) -> PdkResult<String> {
    let polarization = Polarization::parse(polarization)?;
    let wavelength = check_wavelength(wavelength)?;
    Ok(format!(
        "opt_in_{}_{}_device_{}-{}",
        polarization,
        (wavelength * 1000.0) as i64,
        username,
        clean_name(name)
    ))
}

/// Optical-input label text for device `name`, measured through grating coupler `gc`
pub fn get_input_label_text(gc: &Component, username: &str, name: &str) -> PdkResult<String> {
    match gc.info.optical_io() {
        Some((polarization, wavelength)) => {
            input_label_text(&polarization.to_string(), wavelength, username, name)
        }
        None => Err(PdkError::param(
            "gc",
            format!("{} is not a grating coupler", gc.name()?),
        )),
    }
}

/// Optical-input label for device `name`, placed on the LABEL layer at port `gc_port` of grating coupler `gc`.
///
/// The text is validated as in [get_input_label_text].
/// Fails with [crate::raw::LayoutError::MissingPort] if `gc` has no port `gc_port`.
///
pub fn get_input_labels(
    gc: &Component,
    gc_port: &str,
    name: &str,
    username: &str,
    units: Units,
) -> PdkResult<TextElement> {
    let text = get_input_label_text(gc, username, name)?;
    let center = gc.port(gc_port)?.center;
    let loc = Point::new(units.from_microns(center.x), units.from_microns(center.y));
    Ok(TextElement::new(text, loc, LABEL))
}

/// Add label `text` on the TEXT layer at the center of electrical port `port_name`.
/// Fails with [crate::raw::LayoutError::MissingPort] if `cell` has no such port.
pub fn add_label_electrical(
    cell: &mut Cell,
    text: &str,
    port_name: &str,
    units: Units,
) -> PdkResult<()> {
    let center = cell.ports.get(port_name)?.center;
    let loc = Point::new(units.from_microns(center.x), units.from_microns(center.y));
    cell.layout.labels.push(TextElement::new(text, loc, TEXT));
    Ok(())
}
