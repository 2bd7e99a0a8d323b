//! # Wing Geometry
//!
//! Preset baseline geometry and the partial override record merged on top
//! of it.
//!
//! ## Merge Rule
//!
//! Field by field: an override that is `Some` wins, `None` keeps the
//! baseline. The merge never fails.
//!
//! ```rust
//! use compwing_core::presets::{PresetCatalog, WingOverrides};
//! use compwing_core::units::Meters;
//!
//! let presets = PresetCatalog::builtin().unwrap();
//! let baseline = &presets.resolve("P-51").unwrap().wing;
//!
//! let overrides = WingOverrides { tip: Some(Meters(1.5)), ..Default::default() };
//! let effective = baseline.with_overrides(&overrides);
//! assert_eq!(effective.tip, Meters(1.5));
//! assert_eq!(effective.root, Meters(2.752));
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Degrees, Meters};

/// Planform and airfoil parameters of one wing half.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingGeometry {
    /// Wetted semi-span
    pub span_wet: Meters,
    /// Front spar position as a fraction of chord
    #[serde(with = "crate::units::lossless")]
    pub fwd_spar: f64,
    /// Aft spar position as a fraction of chord
    #[serde(with = "crate::units::lossless")]
    pub aft_spar: f64,
    /// Tip chord
    pub tip: Meters,
    /// Root chord
    pub root: Meters,
    pub sweep_angle: Degrees,
    pub dihedral_angle: Degrees,
    pub airfoil_root: String,
    pub airfoil_tip: String,
}

impl WingGeometry {
    /// Apply a partial override record, keeping baseline values for every
    /// field the record leaves unset.
    pub fn with_overrides(&self, overrides: &WingOverrides) -> WingGeometry {
        WingGeometry {
            span_wet: overrides.span_wet.unwrap_or(self.span_wet),
            fwd_spar: overrides.fwd_spar.unwrap_or(self.fwd_spar),
            aft_spar: overrides.aft_spar.unwrap_or(self.aft_spar),
            tip: overrides.tip.unwrap_or(self.tip),
            root: overrides.root.unwrap_or(self.root),
            sweep_angle: overrides.sweep_angle.unwrap_or(self.sweep_angle),
            dihedral_angle: overrides.dihedral_angle.unwrap_or(self.dihedral_angle),
            airfoil_root: overrides
                .airfoil_root
                .clone()
                .unwrap_or_else(|| self.airfoil_root.clone()),
            airfoil_tip: overrides
                .airfoil_tip
                .clone()
                .unwrap_or_else(|| self.airfoil_tip.clone()),
        }
    }

    /// Tip chord over root chord
    pub fn taper_ratio(&self) -> f64 {
        self.tip.0 / self.root.0
    }

    /// Trapezoidal planform area of one wing half, in m²
    pub fn half_area(&self) -> f64 {
        0.5 * (self.root.0 + self.tip.0) * self.span_wet.0
    }

    /// Mean aerodynamic chord of a trapezoidal planform
    pub fn mean_aerodynamic_chord(&self) -> Meters {
        let lambda = self.taper_ratio();
        Meters((2.0 / 3.0) * self.root.0 * (1.0 + lambda + lambda * lambda) / (1.0 + lambda))
    }
}

/// Partial wing geometry. `None` means "use the preset value".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_wet: Option<Meters>,
    #[serde(skip_serializing_if = "Option::is_none", with = "crate::units::lossless::option")]
    pub fwd_spar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "crate::units::lossless::option")]
    pub aft_spar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<Meters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<Meters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_angle: Option<Degrees>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dihedral_angle: Option<Degrees>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airfoil_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airfoil_tip: Option<String>,
}

impl WingOverrides {
    /// The baseline record: nothing overridden.
    pub fn none() -> Self {
        WingOverrides::default()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == WingOverrides::default()
    }

    /// Number of fields that are set
    pub fn count(&self) -> usize {
        [
            self.span_wet.is_some(),
            self.fwd_spar.is_some(),
            self.aft_spar.is_some(),
            self.tip.is_some(),
            self.root.is_some(),
            self.sweep_angle.is_some(),
            self.dihedral_angle.is_some(),
            self.airfoil_root.is_some(),
            self.airfoil_tip.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}
