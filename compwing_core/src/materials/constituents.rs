//! Constituent Material Records
//!
//! Physical constants for the two phases of a unidirectional lamina.
//! Moduli are in GPa, strengths in MPa. Fields that are unknown for a
//! given material are `None`.

use serde::{Deserialize, Serialize};

/// Reinforcing fiber properties.
///
/// The field names follow the usual micromechanics notation: direction 1 is
/// along the fiber, direction 2 is transverse to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberProperties {
    /// Catalog key (e.g., "T-300")
    pub name: String,
    /// Fiber family (Carbon, Glass, Aramid, ...)
    #[serde(rename = "type")]
    pub fiber_type: String,
    /// Longitudinal modulus E1f (GPa)
    pub e1f: f64,
    /// Transverse modulus E2f (GPa)
    pub e2f: f64,
    /// In-plane shear modulus G12f (GPa)
    pub g12f: f64,
    /// Transverse shear modulus G23f (GPa)
    pub g23f: f64,
    /// Major Poisson ratio
    pub nu12f: f64,
    /// Minor Poisson ratio
    pub nu21f: f64,
    /// Longitudinal tensile strength F1ft (MPa)
    pub f1ft: f64,
    /// Longitudinal compressive strength F1fc (MPa)
    pub f1fc: Option<f64>,
    /// Tensile strain to failure
    pub eps1ft: f64,
    /// Compressive strain to failure
    pub eps1fc: Option<f64>,
    /// Longitudinal CTE (1/degC)
    pub alpha1f: Option<f64>,
    /// Transverse CTE (1/degC)
    pub alpha2f: Option<f64>,
}

/// Polymer matrix properties. The matrix is treated as isotropic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixProperties {
    /// Catalog key (e.g., "3501-6")
    pub name: String,
    /// Resin family (Epoxy, Polyester, ...)
    #[serde(rename = "type")]
    pub matrix_type: String,
    /// Density (g/cm^3)
    pub rho: f64,
    /// Young's modulus Em (GPa)
    pub em: f64,
    /// Shear modulus Gm (GPa)
    pub gm: f64,
    /// Poisson ratio
    pub num: f64,
    /// Tensile strength (MPa)
    pub fmt: f64,
    /// Compressive strength (MPa)
    pub fmc: f64,
    /// Shear strength (MPa)
    pub fms: f64,
    /// Tensile strain to failure
    pub eps_mt: f64,
    /// CTE (1/degC)
    pub alpha_m: f64,
    /// Glass transition temperature (degC)
    pub tg: f64,
    /// Maximum service temperature (degC)
    pub tmax: Option<f64>,
}

impl MatrixProperties {
    /// Shear modulus implied by isotropy, `Em / (2(1 + num))`.
    ///
    /// Useful as a sanity check against the tabulated `gm`.
    pub fn isotropic_shear_modulus(&self) -> f64 {
        self.em / (2.0 * (1.0 + self.num))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_isotropic_shear_modulus() {
        let m = epoxy_3501_6();
        // 4.2 / 2.68 = 1.567
        assert!((m.isotropic_shear_modulus() - m.gm).abs() < 0.001);
    }

    #[test]
    fn test_optional_fields_deserialize() {
        let json = r#"{
            "name": "E-glass", "type": "Glass",
            "e1f": 72.4, "e2f": 72.4, "g12f": 30.2, "g23f": 30.2,
            "nu12f": 0.2, "nu21f": 0.2, "f1ft": 3450.0, "eps1ft": 0.0477
        }"#;
        let fiber: FiberProperties = serde_json::from_str(json).unwrap();
        assert_eq!(fiber.fiber_type, "Glass");
        assert!(fiber.f1fc.is_none());
        assert!(fiber.alpha1f.is_none());
    }

    #[test]
    fn test_type_field_renamed() {
        let json = serde_json::to_string(&t300()).unwrap();
        assert!(json.contains("\"type\":\"Carbon\""));
    }
}
