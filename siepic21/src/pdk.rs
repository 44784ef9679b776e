//!
//! # The PDK
//!
//! Configuration, technology, and the fixture cache, behind one catalogue lookup.
//!

// Local imports
use crate::component::{mirror, Component};
use crate::components::{
    self, GratingCouplerSpec, DBR_TOOTH, FIXTURES, GRATING_COUPLERS, PAD_SIZE, PARAMETRIC,
};
use crate::config::PdkConfig;
use crate::error::{PdkError, PdkResult};
use crate::fixtures::{fixture_info, import_fixture, FixtureCache, FixtureKey};
use crate::labels::{get_input_label_text, get_input_labels};
use crate::raw::TextElement;
use crate::tech::Technology;
use crate::utils::Ptr;

/// # SiEPIC EBeam PDK
///
/// Configuration and technology are fixed at construction,
/// as every cached fixture was imported under them.
///
#[derive(Debug, Default)]
pub struct Pdk {
    config: PdkConfig,
    tech: Technology,
    cache: FixtureCache,
}
impl Pdk {
    pub fn new(config: PdkConfig, tech: Technology) -> Self {
        Self {
            config,
            tech,
            cache: FixtureCache::new(),
        }
    }
    /// The EBeam technology, configured from the environment
    pub fn from_env() -> Self {
        Self::new(PdkConfig::from_env(), Technology::ebeam())
    }
    pub fn config(&self) -> &PdkConfig {
        &self.config
    }
    pub fn tech(&self) -> &Technology {
        &self.tech
    }
    pub fn cache(&self) -> &FixtureCache {
        &self.cache
    }
    /// Get fixture `filename`, or its cell `cellname`, importing it on first request
    pub fn fixture(&mut self, filename: &str, cellname: Option<&str>) -> PdkResult<Component> {
        let (config, tech) = (&self.config, &self.tech);
        self.cache
            .get_or_try_insert_with(FixtureKey::new(filename, cellname), || {
                let path = config.fixture_path(filename);
                let cell = import_fixture(&path, cellname, tech, config.rename_ports)?;
                Ok(Component {
                    cell,
                    info: fixture_info(filename),
                })
            })
    }
    /// Get grating coupler `spec`: its fixture, mirrored across the y-axis,
    /// wrapped and given a vertical-fiber port
    pub fn grating_coupler(&mut self, spec: &GratingCouplerSpec) -> PdkResult<Component> {
        let base = self.fixture(spec.filename, None)?;
        let tech = &self.tech;
        self.cache.get_or_try_insert_with(
            FixtureKey::new(spec.filename, None).mirrored(),
            || {
                let mirrored = Ptr::new(mirror(&base.cell, tech.units)?);
                components::grating_coupler(spec, &mirrored, tech)
            },
        )
    }
    /// Get catalogue cell `name`. Parametric cells get their default parameters.
    pub fn cell(&mut self, name: &str) -> PdkResult<Component> {
        let tech = &self.tech;
        match name {
            "straight" => components::straight(tech, 1.0),
            "pad" => components::pad(tech, PAD_SIZE),
            "dbr" => components::dbr(tech, 0.5, 0.1, 100, DBR_TOOTH, DBR_TOOTH),
            "dc_halfring_straight" => components::dc_halfring_straight(tech, 0.2, 5.0, 4.0),
            "ring_single" => components::ring_single(tech, 0.2, 10.0, 4.0, 0.6),
            _ => {
                if let Some(spec) = FIXTURES.iter().find(|f| f.name == name) {
                    self.fixture(spec.filename, spec.cellname)
                } else if let Some(spec) = GRATING_COUPLERS.iter().find(|g| g.name == name) {
                    self.grating_coupler(spec)
                } else {
                    Err(PdkError::UnknownCell(name.to_string()))
                }
            }
        }
    }
    /// Names of every catalogue cell
    pub fn cell_names() -> Vec<&'static str> {
        PARAMETRIC
            .iter()
            .copied()
            .chain(FIXTURES.iter().map(|f| f.name))
            .chain(GRATING_COUPLERS.iter().map(|g| g.name))
            .collect()
    }
    /// Optical-input label for device `name` measured through `gc`, with the configured username
    pub fn input_label_text(&self, gc: &Component, name: &str) -> PdkResult<String> {
        get_input_label_text(gc, &self.config.username, name)
    }
    /// Optical-input label for device `name`, placed at port `gc_port` of `gc`
    pub fn input_labels(&self, gc: &Component, gc_port: &str, name: &str) -> PdkResult<TextElement> {
        get_input_labels(gc, gc_port, name, &self.config.username, self.tech.units)
    }
}
