//! Aircraft preset records.
//!
//! Everything except the wing geometry and material defaults is carried
//! through unchanged for consumers (image paths, CAD identifiers).

use serde::{Deserialize, Serialize};

use super::wing::WingGeometry;
use crate::composite::VolumeFractions;
use crate::units::{Kilograms, Meters};

/// One aircraft preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftSpecs {
    pub specs: AircraftInfo,
    pub wing: WingGeometry,
    /// Suggested constituents, by catalog position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<MaterialSpecs>,
    pub model: ModelSpecs,
}

/// Identifying and sizing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftInfo {
    pub name: String,
    pub manufacturer: String,
    pub mass: Kilograms,
    /// Design load factor (g)
    pub load_factor: f64,
    pub wingspan: Meters,
    /// Path of the three-view drawing
    #[serde(rename = "3_view")]
    pub three_view: String,
    /// Crop rectangle of the three-view image: x, y, width, height (px)
    pub crop_params: [u32; 4],
}

impl AircraftInfo {
    /// Design load at the load factor, in newtons
    pub fn design_load(&self) -> f64 {
        self.mass.0 * self.load_factor * STANDARD_GRAVITY
    }
}

/// Standard gravity, m/s²
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Material defaults of a preset.
///
/// `fiber` and `matrix` are zero-based positions in the material catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpecs {
    pub fiber: usize,
    pub matrix: usize,
    pub vf: f64,
    pub vvoid: f64,
}

impl MaterialSpecs {
    pub fn fractions(&self) -> VolumeFractions {
        VolumeFractions::new(self.vf, self.vvoid)
    }
}

/// CAD model element identifiers. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpecs {
    /// Key into the external project table
    pub project: String,
    pub wing: String,
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub box_element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_manual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutouts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ribs_full: Option<String>,
}

/// CAD document identifiers for one external project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProject {
    pub name: String,
    /// Document id
    pub did: String,
    /// Workspace or version selector
    pub wv: String,
    /// Workspace/version id
    pub wvid: String,
}
