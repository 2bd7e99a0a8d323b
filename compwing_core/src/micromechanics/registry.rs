//! # Property Registry
//!
//! Central registry of the lamina properties this tool computes and the
//! competing micromechanics theories available for each one.
//!
//! ## Architecture
//!
//! The property and theory sets are closed, so both are enums:
//! - [`Property`] identifies an output quantity (E1, E2, G12, ...)
//! - [`Theory`] identifies a model (ROM, Chamis, Halpin-Tsai, ...)
//! - [`Property::metadata`] returns the [`PropertyCalculation`] table row,
//!   which maps each admissible theory to its formula and description
//!
//! String keys ("E1", "Inverse ROM") are parsed at the boundary with
//! [`Property::from_key`] and [`Theory::from_key`].
//!
//! ## Usage
//!
//! ```rust
//! use compwing_core::micromechanics::registry::{get_formula, list_theories, Property, Theory};
//!
//! let theories = list_theories("E2").unwrap();
//! assert_eq!(theories, vec![Theory::Rom, Theory::Chamis, Theory::HalpinTsai]);
//!
//! let formula = get_formula(Property::E2, Theory::Chamis).unwrap();
//! let meta = Property::E2.metadata();
//! println!("{} [{}]", meta.name, meta.unit);
//! # let _ = formula;
//! ```

use serde::{Deserialize, Serialize};

use super::formulas;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{FiberProperties, MatrixProperties};
use crate::units::Unit;

/// Signature shared by every registered formula: `(fiber, matrix, Vf, Vm) -> value`.
pub type Formula = fn(&FiberProperties, &MatrixProperties, f64, f64) -> f64;

// ============================================================================
// Sources
// ============================================================================

/// Literature source a theory is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Barbero, Introduction to Composite Materials Design
    Barbero { edition: u8, section: &'static str },
    /// Chamis, NASA TM-83320 (1983)
    Chamis,
    /// Halpin & Kardos (1976)
    HalpinKardos,
    /// Hashin & Rosen (1964)
    HashinRosen,
    /// Follows from symmetry of the compliance matrix
    Elasticity,
}

impl Source {
    /// Format the reference for generated docs
    pub fn citation(&self) -> String {
        match self {
            Source::Barbero { edition, section } => {
                format!("Barbero, Introduction to Composite Materials Design, {}ed, Section {}", edition, section)
            }
            Source::Chamis => "Chamis, Simplified Composite Micromechanics Equations, NASA TM-83320".to_string(),
            Source::HalpinKardos => "Halpin & Kardos, Polym. Eng. Sci. 16(5), 1976".to_string(),
            Source::HashinRosen => "Hashin & Rosen, J. Appl. Mech. 31, 1964".to_string(),
            Source::Elasticity => "Linear elasticity (compliance symmetry)".to_string(),
        }
    }
}

// ============================================================================
// Theories
// ============================================================================

/// Micromechanics models known to the registry.
///
/// Not every theory is registered under every property; see
/// [`Property::theories`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Theory {
    #[serde(rename = "ROM")]
    Rom,
    #[serde(rename = "Inverse ROM")]
    InverseRom,
    #[serde(rename = "Halpin-Tsai")]
    HalpinTsai,
    #[serde(rename = "Chamis")]
    Chamis,
    #[serde(rename = "Hashin-Rosen")]
    HashinRosen,
    #[serde(rename = "Symmetry")]
    Symmetry,
}

impl Theory {
    pub const ALL: [Theory; 6] = [
        Theory::Rom,
        Theory::InverseRom,
        Theory::HalpinTsai,
        Theory::Chamis,
        Theory::HashinRosen,
        Theory::Symmetry,
    ];

    /// Registry key (e.g., "Inverse ROM")
    pub fn key(&self) -> &'static str {
        match self {
            Theory::Rom => "ROM",
            Theory::InverseRom => "Inverse ROM",
            Theory::HalpinTsai => "Halpin-Tsai",
            Theory::Chamis => "Chamis",
            Theory::HashinRosen => "Hashin-Rosen",
            Theory::Symmetry => "Symmetry",
        }
    }

    /// Parse a theory key for the given property.
    ///
    /// The property is only used to build the error; use
    /// [`get_formula`] to check that the theory is registered under it.
    pub fn from_key(property: &str, key: &str) -> CalcResult<Self> {
        Theory::ALL
            .iter()
            .copied()
            .find(|t| t.key() == key)
            .ok_or_else(|| CalcError::unknown_theory(property, key))
    }
}

impl std::fmt::Display for Theory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ============================================================================
// Registry rows
// ============================================================================

/// One theory registered under a property.
#[derive(Debug, Clone)]
pub struct TheoryFormula {
    pub theory: Theory,
    /// The implementation
    pub formula: Formula,
    /// Human-readable model name
    pub description: &'static str,
    /// The formula in plain text for markdown
    pub formula_plain: &'static str,
    /// LaTeX rendering, when one has been written
    pub formula_latex: Option<&'static str>,
    pub source: Source,
    /// Function name implementing the formula (for linking)
    pub source_function: &'static str,
}

/// Static definition of one output quantity.
#[derive(Debug, Clone)]
pub struct PropertyCalculation {
    /// Human-readable name (e.g., "Young's longitudinal modulus")
    pub name: &'static str,
    pub unit: Unit,
    /// Admissible theories in display order
    pub formulas: Vec<TheoryFormula>,
}

impl PropertyCalculation {
    /// Find the row for a theory, if registered.
    pub fn formula_for(&self, theory: Theory) -> Option<&TheoryFormula> {
        self.formulas.iter().find(|tf| tf.theory == theory)
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Lamina properties computed by the registry, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    E1,
    E2,
    G12,
    G23,
    #[serde(rename = "nu12")]
    Nu12,
    #[serde(rename = "nu21")]
    Nu21,
    #[serde(rename = "nu23")]
    Nu23,
}

impl Property {
    /// Registry key (e.g., "nu12")
    pub fn key(&self) -> &'static str {
        match self {
            Property::E1 => "E1",
            Property::E2 => "E2",
            Property::G12 => "G12",
            Property::G23 => "G23",
            Property::Nu12 => "nu12",
            Property::Nu21 => "nu21",
            Property::Nu23 => "nu23",
        }
    }

    /// Parse a property key.
    pub fn from_key(key: &str) -> CalcResult<Self> {
        ALL_PROPERTIES
            .iter()
            .copied()
            .find(|p| p.key() == key)
            .ok_or_else(|| CalcError::unknown_property(key))
    }

    /// Theories registered under this property, in display order.
    pub fn theories(&self) -> Vec<Theory> {
        self.metadata().formulas.iter().map(|tf| tf.theory).collect()
    }

    /// Get the full registry row for this property
    pub fn metadata(&self) -> PropertyCalculation {
        match self {
            Property::E1 => PropertyCalculation {
                name: "Young's longitudinal modulus",
                unit: Unit::Gpa,
                formulas: vec![
                    TheoryFormula {
                        theory: Theory::Rom,
                        formula: formulas::e1_rule_of_mixtures,
                        description: "Rule of Mixtures",
                        formula_plain: "E1 = E1f*Vf + Em*Vm",
                        formula_latex: Some(r"E_1 = E_{1f}V_f + E_mV_m"),
                        source: Source::Barbero { edition: 2, section: "4.1.1" },
                        source_function: "e1_rule_of_mixtures",
                    },
                    TheoryFormula {
                        theory: Theory::InverseRom,
                        formula: formulas::e1_inverse_rule_of_mixtures,
                        description: "Inverse Rule of Mixtures",
                        formula_plain: "1/E1 = Vf/E1f + Vm/Em",
                        formula_latex: Some(r"\frac{1}{E_1} = \frac{V_f}{E_{1f}} + \frac{V_m}{E_m}"),
                        source: Source::Barbero { edition: 2, section: "4.1.2" },
                        source_function: "e1_inverse_rule_of_mixtures",
                    },
                    TheoryFormula {
                        theory: Theory::HalpinTsai,
                        formula: formulas::e1_halpin_tsai,
                        description: "Halpin-Tsai equation",
                        formula_plain: "E1 = E1f*Em / (Vf*Em + Vm*E1f)",
                        formula_latex: Some(r"E_1 = \frac{E_{1f} \cdot E_m}{V_f \cdot E_m + V_m \cdot E_{1f}}"),
                        source: Source::HalpinKardos,
                        source_function: "e1_halpin_tsai",
                    },
                ],
            },

            Property::E2 => PropertyCalculation {
                name: "Young's transverse modulus",
                unit: Unit::Gpa,
                formulas: vec![
                    TheoryFormula {
                        theory: Theory::Rom,
                        formula: formulas::e2_rule_of_mixtures,
                        description: "Rule of Mixtures",
                        formula_plain: "E2 = E2f*Em / (Em*Vf + E2f*Vm)",
                        formula_latex: Some(r"E_2 = \frac{E_{2f} \cdot E_m}{E_m \cdot V_f + E_{2f} \cdot V_m}"),
                        source: Source::Barbero { edition: 2, section: "4.1.2" },
                        source_function: "e2_rule_of_mixtures",
                    },
                    TheoryFormula {
                        theory: Theory::Chamis,
                        formula: formulas::e2_chamis,
                        description: "Chamis model",
                        formula_plain: "E2 = Em / (1 - sqrt(Vf)*(1 - Em/E2f))",
                        formula_latex: Some(
                            r"E_2 = \frac{E_m}{1 - \sqrt{V_f} \left( 1 - \frac{E_m}{E_{2f}} \right)}",
                        ),
                        source: Source::Chamis,
                        source_function: "e2_chamis",
                    },
                    TheoryFormula {
                        theory: Theory::HalpinTsai,
                        formula: formulas::e2_halpin_tsai,
                        description: "Halpin-Tsai equation (xi = 2)",
                        formula_plain: "E2 = Em*(1 + xi*eta*Vf) / (1 - eta*Vf), eta = (E2f/Em - 1)/(E2f/Em + xi)",
                        formula_latex: None,
                        source: Source::HalpinKardos,
                        source_function: "e2_halpin_tsai",
                    },
                ],
            },

            Property::G12 => PropertyCalculation {
                name: "In-plane shear modulus",
                unit: Unit::Gpa,
                formulas: vec![
                    TheoryFormula {
                        theory: Theory::Rom,
                        formula: formulas::g12_rule_of_mixtures,
                        description: "Rule of Mixtures",
                        formula_plain: "G12 = G12f*Gm / (Gm*Vf + G12f*Vm)",
                        formula_latex: Some(r"G_{12} = \frac{G_{12f} G_m}{G_m V_f + G_{12f} V_m}"),
                        source: Source::Barbero { edition: 2, section: "4.1.4" },
                        source_function: "g12_rule_of_mixtures",
                    },
                    TheoryFormula {
                        theory: Theory::Chamis,
                        formula: formulas::g12_chamis,
                        description: "Chamis model",
                        formula_plain: "G12 = Gm / (1 - sqrt(Vf)*(1 - Gm/G12f))",
                        formula_latex: None,
                        source: Source::Chamis,
                        source_function: "g12_chamis",
                    },
                    TheoryFormula {
                        theory: Theory::HalpinTsai,
                        formula: formulas::g12_halpin_tsai,
                        description: "Halpin-Tsai equation (xi = 1)",
                        formula_plain: "G12 = Gm*(1 + eta*Vf) / (1 - eta*Vf), eta = (G12f/Gm - 1)/(G12f/Gm + 1)",
                        formula_latex: None,
                        source: Source::HalpinKardos,
                        source_function: "g12_halpin_tsai",
                    },
                    TheoryFormula {
                        theory: Theory::HashinRosen,
                        formula: formulas::g12_hashin_rosen,
                        description: "Hashin-Rosen cylinder assemblage",
                        formula_plain: "G12 = Gm*((1+Vf)*G12f + (1-Vf)*Gm) / ((1-Vf)*G12f + (1+Vf)*Gm)",
                        formula_latex: Some(
                            r"G_{12} = G_m \frac{(1+V_f) G_{12f} + (1-V_f) G_m}{(1-V_f) G_{12f} + (1+V_f) G_m}",
                        ),
                        source: Source::HashinRosen,
                        source_function: "g12_hashin_rosen",
                    },
                ],
            },

            Property::G23 => PropertyCalculation {
                name: "Transverse shear modulus",
                unit: Unit::Gpa,
                formulas: vec![TheoryFormula {
                    theory: Theory::Chamis,
                    formula: formulas::g23_chamis,
                    description: "Chamis model",
                    formula_plain: "G23 = Gm / (1 - sqrt(Vf)*(1 - Gm/G23f))",
                    formula_latex: None,
                    source: Source::Chamis,
                    source_function: "g23_chamis",
                }],
            },

            Property::Nu12 => PropertyCalculation {
                name: "Major Poisson ratio",
                unit: Unit::Dimensionless,
                formulas: vec![TheoryFormula {
                    theory: Theory::Rom,
                    formula: formulas::nu12_rule_of_mixtures,
                    description: "Rule of Mixtures",
                    formula_plain: "nu12 = nu12f*Vf + num*Vm",
                    formula_latex: Some(r"\nu_{12} = \nu_{12f} V_f + \nu_m V_m"),
                    source: Source::Barbero { edition: 2, section: "4.1.3" },
                    source_function: "nu12_rule_of_mixtures",
                }],
            },

            Property::Nu21 => PropertyCalculation {
                name: "Minor Poisson ratio",
                unit: Unit::Dimensionless,
                formulas: vec![TheoryFormula {
                    theory: Theory::Symmetry,
                    formula: formulas::nu21_symmetry,
                    description: "Compliance symmetry (E1: ROM, E2: Chamis, nu12: ROM)",
                    formula_plain: "nu21 = nu12 * E2 / E1",
                    formula_latex: Some(r"\nu_{21} = \nu_{12} \frac{E_2}{E_1}"),
                    source: Source::Elasticity,
                    source_function: "nu21_symmetry",
                }],
            },

            Property::Nu23 => PropertyCalculation {
                name: "Transverse Poisson ratio",
                unit: Unit::Dimensionless,
                formulas: vec![TheoryFormula {
                    theory: Theory::Symmetry,
                    formula: formulas::nu23_symmetry,
                    description: "Transverse isotropy (E2: Chamis, G23: Chamis)",
                    formula_plain: "nu23 = E2 / (2*G23) - 1",
                    formula_latex: Some(r"\nu_{23} = \frac{E_2}{2 G_{23}} - 1"),
                    source: Source::Elasticity,
                    source_function: "nu23_symmetry",
                }],
            },
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// All properties in the registry, in display order
pub static ALL_PROPERTIES: &[Property] = &[
    Property::E1,
    Property::E2,
    Property::G12,
    Property::G23,
    Property::Nu12,
    Property::Nu21,
    Property::Nu23,
];

// ============================================================================
// Registry contract
// ============================================================================

/// Registered property keys, in display order.
pub fn list_properties() -> Vec<&'static str> {
    ALL_PROPERTIES.iter().map(|p| p.key()).collect()
}

/// Theories registered under a property key.
///
/// Fails with `UnknownProperty` when the key is not registered.
pub fn list_theories(property: &str) -> CalcResult<Vec<Theory>> {
    Ok(Property::from_key(property)?.theories())
}

/// Look up the formula for a (property, theory) pair.
///
/// Fails with `UnknownTheory` when the theory is not registered under the
/// property.
pub fn get_formula(property: Property, theory: Theory) -> CalcResult<Formula> {
    property
        .metadata()
        .formula_for(theory)
        .map(|tf| tf.formula)
        .ok_or_else(|| CalcError::unknown_theory(property.key(), theory.key()))
}

/// String-keyed variant of [`get_formula`].
pub fn get_formula_by_key(property: &str, theory: &str) -> CalcResult<(Property, Theory, Formula)> {
    let prop = Property::from_key(property)?;
    let th = Theory::from_key(property, theory)?;
    let formula = get_formula(prop, th)?;
    Ok((prop, th, formula))
}

/// Total number of registered (property, theory) pairs
pub fn theory_count() -> usize {
    ALL_PROPERTIES.iter().map(|p| p.metadata().formulas.len()).sum()
}

// ============================================================================
// Markdown Documentation Generation
// ============================================================================

/// Generate the theory reference document (THEORIES.md).
///
/// ```rust
/// use compwing_core::micromechanics::registry::generate_theories_markdown;
///
/// let markdown = generate_theories_markdown();
/// assert!(markdown.contains("Compwing Micromechanics Reference"));
/// assert!(markdown.contains("Chamis model"));
/// ```
pub fn generate_theories_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Compwing Micromechanics Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-theories`

Every lamina property below can be computed with several competing theories.
All of them take the fiber record, the matrix record, the fiber volume
fraction Vf and the matrix volume fraction Vm = 1 - Vf - Vvoid.

Inputs are not validated: Vf = 0 or Vm = 0 in a denominator produces
infinity or NaN, which is reported as-is.

---

"#,
    );

    for property in ALL_PROPERTIES {
        let meta = property.metadata();
        output.push_str(&format!("## {} ({}) [{}]\n\n", meta.name, property.key(), meta.unit));

        for tf in &meta.formulas {
            output.push_str(&format!("### {} - {}\n\n", tf.theory.key(), tf.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", tf.formula_plain));
            if let Some(latex) = tf.formula_latex {
                output.push_str(&format!("**LaTeX:** `{}`\n\n", latex));
            }
            output.push_str(&format!("**Reference:** {}\n\n", tf.source.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`](src/micromechanics/formulas.rs)\n\n",
                tf.source_function
            ));
        }

        output.push_str("---\n\n");
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Properties:** {}\n- **Theories:** {}\n",
        ALL_PROPERTIES.len(),
        theory_count()
    ));

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_properties_have_theories() {
        assert_eq!(ALL_PROPERTIES.len(), 7);
        for property in ALL_PROPERTIES {
            let meta = property.metadata();
            assert!(!meta.name.is_empty(), "{:?} has no name", property);
            assert!(!meta.formulas.is_empty(), "{:?} has no theories", property);
            for tf in &meta.formulas {
                assert!(!tf.description.is_empty());
                assert!(!tf.formula_plain.is_empty());
            }
        }
        assert_eq!(theory_count(), 14);
    }

    #[test]
    fn test_list_properties_order() {
        assert_eq!(list_properties(), vec!["E1", "E2", "G12", "G23", "nu12", "nu21", "nu23"]);
    }

    #[test]
    fn test_list_theories() {
        assert_eq!(
            list_theories("E1").unwrap(),
            vec![Theory::Rom, Theory::InverseRom, Theory::HalpinTsai]
        );
        assert_eq!(list_theories("G23").unwrap(), vec![Theory::Chamis]);
    }

    #[test]
    fn test_list_theories_unknown_property() {
        let err = list_theories("E9").unwrap_err();
        assert_eq!(err, CalcError::unknown_property("E9"));
    }

    #[test]
    fn test_get_formula_unregistered_theory() {
        // Chamis exists, but not under E1
        let err = get_formula(Property::E1, Theory::Chamis).unwrap_err();
        assert_eq!(err, CalcError::unknown_theory("E1", "Chamis"));
    }

    #[test]
    fn test_get_formula_by_key() {
        let (prop, theory, _) = get_formula_by_key("nu21", "Symmetry").unwrap();
        assert_eq!(prop, Property::Nu21);
        assert_eq!(theory, Theory::Symmetry);

        assert!(matches!(
            get_formula_by_key("E1", "Voigt"),
            Err(CalcError::UnknownTheory { .. })
        ));
        assert!(matches!(
            get_formula_by_key("E7", "ROM"),
            Err(CalcError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_keys_roundtrip_through_serde() {
        for property in ALL_PROPERTIES {
            let json = serde_json::to_string(property).unwrap();
            assert_eq!(json, format!("\"{}\"", property.key()));
        }
        for theory in Theory::ALL {
            let json = serde_json::to_string(&theory).unwrap();
            assert_eq!(json, format!("\"{}\"", theory.key()));
            assert_eq!(Theory::from_key("E1", theory.key()).unwrap(), theory);
        }
    }

    #[test]
    fn test_source_citation() {
        let src = Source::Barbero { edition: 2, section: "4.1.1" };
        assert!(src.citation().contains("Section 4.1.1"));
    }

    #[test]
    fn test_generate_theories_markdown() {
        let md = generate_theories_markdown();
        for property in ALL_PROPERTIES {
            assert!(md.contains(&format!("({})", property.key())));
        }
        assert!(md.contains("Hashin-Rosen"));
        assert!(md.contains("**Theories:** 14"));
    }
}
