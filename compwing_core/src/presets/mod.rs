//! # Aircraft Presets
//!
//! Built-in aircraft with their baseline wing geometry, optional material
//! defaults and CAD model references.
//!
//! ## Modules
//!
//! - [`wing`] - Wing geometry and the override merge
//! - [`aircraft`] - Preset records
//! - [`catalog`] - Preset lookup (built-in TOML or user file)

pub mod aircraft;
pub mod catalog;
pub mod wing;

pub use aircraft::{AircraftInfo, AircraftSpecs, ExternalProject, MaterialSpecs, ModelSpecs, STANDARD_GRAVITY};
pub use catalog::{NamedPreset, PresetCatalog};
pub use wing::{WingGeometry, WingOverrides};
