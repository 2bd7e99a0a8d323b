//! # Composite Material Descriptor
//!
//! Volume fractions and the resolved fiber/matrix pair that together define
//! one lamina. Both are plain values: a change in any constituent input
//! produces a new descriptor instead of editing an existing one.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::materials::{FiberProperties, MaterialCatalog, MatrixProperties};

/// Fiber, void and matrix volume fractions.
///
/// The matrix fraction is always derived as `1 - Vf - Vvoid`; there is no
/// way to set it independently, so the three always sum to one.
///
/// ```rust
/// use compwing_core::composite::VolumeFractions;
///
/// let fractions = VolumeFractions::new(0.55, 0.025);
/// assert!((fractions.vm() - 0.425).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "FractionsRecord", from = "FractionsRecord")]
pub struct VolumeFractions {
    vf: f64,
    vvoid: f64,
}

impl VolumeFractions {
    /// No range checks: out-of-range fractions flow into the formulas as-is.
    pub fn new(vf: f64, vvoid: f64) -> Self {
        VolumeFractions { vf, vvoid }
    }

    /// Fiber volume fraction
    pub fn vf(&self) -> f64 {
        self.vf
    }

    /// Void volume fraction
    pub fn vvoid(&self) -> f64 {
        self.vvoid
    }

    /// Matrix volume fraction, `1 - Vf - Vvoid`
    pub fn vm(&self) -> f64 {
        1.0 - self.vf - self.vvoid
    }
}

/// Serialized form; `vm` is written for readers and ignored on input.
#[derive(Serialize, Deserialize)]
struct FractionsRecord {
    #[serde(with = "crate::units::lossless")]
    vf: f64,
    #[serde(with = "crate::units::lossless")]
    vvoid: f64,
    #[serde(default, skip_deserializing, serialize_with = "crate::units::lossless::serialize")]
    vm: f64,
}

impl From<VolumeFractions> for FractionsRecord {
    fn from(v: VolumeFractions) -> Self {
        FractionsRecord {
            vf: v.vf,
            vvoid: v.vvoid,
            vm: v.vm(),
        }
    }
}

impl From<FractionsRecord> for VolumeFractions {
    fn from(r: FractionsRecord) -> Self {
        VolumeFractions::new(r.vf, r.vvoid)
    }
}

/// A fiber/matrix pair with its volume fractions, resolved against a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeMaterial {
    /// Display name, e.g. "T-300/3501-6, Vf=0.55"
    pub name: String,
    pub fiber: String,
    pub matrix: String,
    pub fractions: VolumeFractions,
    pub fiber_properties: FiberProperties,
    pub matrix_properties: MatrixProperties,
}

impl CompositeMaterial {
    /// Resolve the constituents by name and build a descriptor.
    ///
    /// Fails with `UnknownMaterial` if either name is missing from the catalog.
    ///
    /// ```rust
    /// use compwing_core::composite::{CompositeMaterial, VolumeFractions};
    /// use compwing_core::materials::MaterialCatalog;
    ///
    /// let catalog = MaterialCatalog::builtin().unwrap();
    /// let cm = CompositeMaterial::resolve(catalog, "T-300", "3501-6", VolumeFractions::new(0.55, 0.025)).unwrap();
    /// assert_eq!(cm.name, "T-300/3501-6, Vf=0.55");
    /// ```
    pub fn resolve(
        catalog: &MaterialCatalog,
        fiber: &str,
        matrix: &str,
        fractions: VolumeFractions,
    ) -> CalcResult<Self> {
        let fiber_properties = catalog.resolve_fiber(fiber)?.clone();
        let matrix_properties = catalog.resolve_matrix(matrix)?.clone();
        Ok(CompositeMaterial {
            name: display_name(fiber, matrix, fractions.vf()),
            fiber: fiber.to_string(),
            matrix: matrix.to_string(),
            fractions,
            fiber_properties,
            matrix_properties,
        })
    }

    pub fn vf(&self) -> f64 {
        self.fractions.vf()
    }

    pub fn vm(&self) -> f64 {
        self.fractions.vm()
    }
}

fn display_name(fiber: &str, matrix: &str, vf: f64) -> String {
    format!("{}/{}, Vf={:.2}", fiber, matrix, vf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;

    #[test]
    fn test_matrix_fraction_derived() {
        for (vf, vvoid) in [(0.55, 0.025), (0.0, 0.0), (0.6, 0.4), (0.3, 0.1), (0.72, 0.0)] {
            let fr = VolumeFractions::new(vf, vvoid);
            assert!((fr.vf() + fr.vvoid() + fr.vm() - 1.0).abs() < f64::EPSILON * 4.0);
            assert!((fr.vm() - (1.0 - vf - vvoid)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_fractions_serialization_ignores_vm_on_input() {
        let json = serde_json::to_string(&VolumeFractions::new(0.5, 0.25)).unwrap();
        assert!(json.contains("\"vm\":0.25"));

        let parsed: VolumeFractions = serde_json::from_str(r#"{"vf":0.5,"vvoid":0.25,"vm":0.9}"#).unwrap();
        assert!((parsed.vm() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_composite() {
        let catalog = MaterialCatalog::builtin().unwrap();
        let cm = CompositeMaterial::resolve(catalog, "T-300", "3501-6", VolumeFractions::new(0.55, 0.025)).unwrap();
        assert_eq!(cm.fiber_properties.e1f, 230.0);
        assert_eq!(cm.matrix_properties.em, 4.2);
        assert!((cm.vm() - 0.425).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_unknown_constituent() {
        let catalog = MaterialCatalog::builtin().unwrap();
        let err = CompositeMaterial::resolve(catalog, "T-300", "Bakelite", VolumeFractions::new(0.5, 0.0))
            .unwrap_err();
        assert_eq!(err, CalcError::unknown_matrix("Bakelite"));
    }

    #[test]
    fn test_display_name_rounds_vf() {
        assert_eq!(display_name("AS4", "8552", 0.5789), "AS4/8552, Vf=0.58");
    }
}
