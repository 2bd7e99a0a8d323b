//! # Unit Types
//!
//! Type-safe wrappers for the units used by the wing presets and the
//! property registry. These are plain f64 newtypes that serialize as bare
//! numbers, so preset files stay readable.
//!
//! ## SI Units (Primary)
//!
//! Compwing works in SI throughout:
//! - Length: meters (m)
//! - Angle: degrees (deg) for input, radians for trigonometry
//! - Mass: kilograms (kg)
//! - Modulus: gigapascals (GPa); strengths in megapascals (MPa)
//!
//! ## Example
//!
//! ```rust
//! use compwing_core::units::{Degrees, Meters};
//!
//! let sweep = Degrees(10.0);
//! assert!((sweep.to_radians() - 0.174533).abs() < 1e-6);
//!
//! let chord = Meters(2.752) - Meters(1.297);
//! assert!((chord.0 - 1.455).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length / Angle / Mass
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(#[serde(with = "crate::units::lossless")] pub f64);

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(#[serde(with = "crate::units::lossless")] pub f64);

impl Degrees {
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(#[serde(with = "crate::units::lossless")] pub f64);

// ============================================================================
// Serialization
// ============================================================================

/// Serde adapter for `f64` fields that may hold infinity or NaN.
///
/// JSON has no literal for non-finite numbers, so serde_json would write
/// them as `null` and refuse to read them back. Finite values stay bare
/// numbers; the rest become `"inf"`, `"-inf"` or `"NaN"`.
///
/// ```rust
/// use compwing_core::units::Meters;
///
/// let json = serde_json::to_string(&Meters(f64::INFINITY)).unwrap();
/// assert_eq!(json, r#""inf""#);
/// let back: Meters = serde_json::from_str(&json).unwrap();
/// assert_eq!(back, Meters(f64::INFINITY));
/// ```
pub mod lossless {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => text
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid number \"{}\"", text))),
        }
    }

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    struct Value(#[serde(with = "crate::units::lossless")] f64);

    /// Same encoding for `Option<f64>`; `None` is `null`.
    pub mod option {
        use super::Value;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
            value.map(Value).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
            Ok(Option::<Value>::deserialize(deserializer)?.map(|v| v.0))
        }
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

macro_rules! impl_arithmetic {
    ($t:ty) => {
        impl Add for $t {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $t {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $t {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $t {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Degrees);
impl_arithmetic!(Kilograms);

// ============================================================================
// Display units for computed properties
// ============================================================================

/// Unit attached to a registry property for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Gigapascals (moduli)
    #[serde(rename = "GPa")]
    Gpa,
    /// Ratios such as Poisson's ratio
    #[serde(rename = "-")]
    Dimensionless,
}

impl Unit {
    /// Symbol used in tables and generated docs
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Gpa => "GPa",
            Unit::Dimensionless => "-",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_arithmetic() {
        let span = Meters(5.643);
        let half = span / 2.0;
        assert!((half.0 - 2.8215).abs() < 1e-9);
        assert_eq!(Meters(1.0) + Meters(2.0), Meters(3.0));
        assert_eq!(Meters(1.5) * 2.0, Meters(3.0));
    }

    #[test]
    fn test_unit_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Unit::Gpa).unwrap(), r#""GPa""#);
        assert_eq!(serde_json::to_string(&Unit::Dimensionless).unwrap(), r#""-""#);
        let parsed: Unit = serde_json::from_str(r#""GPa""#).unwrap();
        assert_eq!(parsed, Unit::Gpa);
    }

    #[test]
    fn test_non_finite_lengths_survive_json() {
        assert_eq!(serde_json::to_string(&Meters(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Meters(f64::NEG_INFINITY)).unwrap(), r#""-inf""#);

        let nan: Degrees = serde_json::from_str(&serde_json::to_string(&Degrees(f64::NAN)).unwrap()).unwrap();
        assert!(nan.0.is_nan());
        let whole: Meters = serde_json::from_str("2").unwrap();
        assert_eq!(whole, Meters(2.0));
        assert!(serde_json::from_str::<Meters>(r#""wide""#).is_err());
    }

    #[test]
    fn test_lengths_parse_from_toml() {
        #[derive(Deserialize)]
        struct Row {
            span: Meters,
            sweep: Degrees,
        }
        let row: Row = toml::from_str("span = 5.643\nsweep = 0").unwrap();
        assert_eq!(row.span, Meters(5.643));
        assert_eq!(row.sweep, Degrees(0.0));
    }

    #[test]
    fn test_degrees_to_radians() {
        assert!((Degrees(180.0).to_radians() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Meters(2.752)).unwrap();
        assert_eq!(json, "2.752");
        let back: Degrees = serde_json::from_str("10.388").unwrap();
        assert_eq!(back, Degrees(10.388));
    }

    #[test]
    fn test_unit_symbols() {
        assert_eq!(Unit::Gpa.symbol(), "GPa");
        assert_eq!(Unit::Dimensionless.to_string(), "-");
    }
}
