//! # Formula Evaluator
//!
//! Evaluates registry formulas on demand. Nothing is cached: every call
//! resolves the formula through the registry and runs it once.
//!
//! Results are returned unmodified. No rounding, no unit conversion, and
//! infinity/NaN from degenerate inputs pass straight through. Serialized
//! values use [`crate::units::lossless`], so a degenerate table still reads
//! back from its own JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::registry::{get_formula, Property, Theory, ALL_PROPERTIES};
use crate::composite::CompositeMaterial;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{FiberProperties, MatrixProperties};
use crate::units::Unit;

/// Evaluate a single (property, theory) pair.
///
/// # Example
///
/// ```rust
/// use compwing_core::materials::MaterialCatalog;
/// use compwing_core::micromechanics::{evaluate_one, Property, Theory};
///
/// let catalog = MaterialCatalog::builtin().unwrap();
/// let f = catalog.resolve_fiber("T-300").unwrap();
/// let m = catalog.resolve_matrix("3501-6").unwrap();
///
/// let e1 = evaluate_one(Property::E1, Theory::Rom, f, m, 0.55, 0.425).unwrap();
/// assert!((e1 - (230.0 * 0.55 + 4.2 * 0.425)).abs() < 1e-9);
/// ```
pub fn evaluate_one(
    property: Property,
    theory: Theory,
    fiber: &FiberProperties,
    matrix: &MatrixProperties,
    vf: f64,
    vm: f64,
) -> CalcResult<f64> {
    let formula = get_formula(property, theory)?;
    Ok(formula(fiber, matrix, vf, vm))
}

/// String-keyed variant of [`evaluate_one`] for callers holding raw keys.
pub fn evaluate_one_by_key(
    property: &str,
    theory: &str,
    fiber: &FiberProperties,
    matrix: &MatrixProperties,
    vf: f64,
    vm: f64,
) -> CalcResult<f64> {
    let prop = Property::from_key(property)?;
    let th = Theory::from_key(property, theory)?;
    evaluate_one(prop, th, fiber, matrix, vf, vm)
}

/// Evaluate every theory registered under one property, in display order.
pub fn evaluate_property(
    property: Property,
    fiber: &FiberProperties,
    matrix: &MatrixProperties,
    vf: f64,
    vm: f64,
) -> Vec<CalculationResult> {
    property
        .metadata()
        .formulas
        .iter()
        .map(|tf| CalculationResult {
            theory: tf.theory,
            value: (tf.formula)(fiber, matrix, vf, vm),
        })
        .collect()
}

/// Evaluate every registered theory for every registered property.
///
/// Each formula runs exactly once per call.
pub fn evaluate_all(fiber: &FiberProperties, matrix: &MatrixProperties, vf: f64, vm: f64) -> ResultsTable {
    let properties = ALL_PROPERTIES
        .iter()
        .map(|&property| PropertyResults {
            property,
            unit: property.metadata().unit,
            results: evaluate_property(property, fiber, matrix, vf, vm),
        })
        .collect();
    ResultsTable { properties }
}

// ============================================================================
// Results
// ============================================================================

/// Value of one theory for one property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub theory: Theory,
    #[serde(with = "crate::units::lossless")]
    pub value: f64,
}

/// All theory results for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyResults {
    pub property: Property,
    pub unit: Unit,
    pub results: Vec<CalculationResult>,
}

/// Property → theory → value, in registry display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultsTable {
    pub properties: Vec<PropertyResults>,
}

impl ResultsTable {
    /// Evaluate every theory for a composite descriptor.
    pub fn for_composite(composite: &CompositeMaterial) -> Self {
        evaluate_all(
            &composite.fiber_properties,
            &composite.matrix_properties,
            composite.vf(),
            composite.vm(),
        )
    }

    /// Look up one value.
    pub fn get(&self, property: Property, theory: Theory) -> Option<f64> {
        self.property(property)?
            .results
            .iter()
            .find(|r| r.theory == theory)
            .map(|r| r.value)
    }

    /// All results for one property.
    pub fn property(&self, property: Property) -> Option<&PropertyResults> {
        self.properties.iter().find(|p| p.property == property)
    }

    /// Number of (property, theory) values in the table
    pub fn len(&self) -> usize {
        self.properties.iter().map(|p| p.results.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(property, theory, value)` triples in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, Theory, f64)> + '_ {
        self.properties
            .iter()
            .flat_map(|p| p.results.iter().map(move |r| (p.property, r.theory, r.value)))
    }

    /// Pick one value per property according to a theory selection.
    ///
    /// Fails with `UnknownTheory` when the selection names a theory that is
    /// not registered under its property.
    pub fn select(&self, selection: &TheorySelection) -> CalcResult<Vec<SelectedValue>> {
        selection
            .choices()
            .map(|(&property, &theory)| {
                get_formula(property, theory)?;
                let value = self
                    .get(property, theory)
                    .ok_or_else(|| CalcError::unknown_theory(property.key(), theory.key()))?;
                Ok(SelectedValue { property, theory, value })
            })
            .collect()
    }
}

// ============================================================================
// Theory selection
// ============================================================================

/// A design value picked out of a results table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedValue {
    pub property: Property,
    pub theory: Theory,
    #[serde(with = "crate::units::lossless")]
    pub value: f64,
}

/// Which theory to use as the design value for each property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TheorySelection {
    choices: BTreeMap<Property, Theory>,
}

impl TheorySelection {
    pub fn new() -> Self {
        TheorySelection {
            choices: BTreeMap::new(),
        }
    }

    /// Builder-style choice of theory for a property.
    pub fn with(mut self, property: Property, theory: Theory) -> Self {
        self.choices.insert(property, theory);
        self
    }

    pub fn set(&mut self, property: Property, theory: Theory) {
        self.choices.insert(property, theory);
    }

    pub fn theory_for(&self, property: Property) -> Option<Theory> {
        self.choices.get(&property).copied()
    }

    pub fn choices(&self) -> impl Iterator<Item = (&Property, &Theory)> {
        self.choices.iter()
    }
}

impl Default for TheorySelection {
    /// E1 by ROM and E2 by Chamis, the remaining properties by the theories
    /// their dependent formulas are fixed to.
    fn default() -> Self {
        TheorySelection::new()
            .with(Property::E1, Theory::Rom)
            .with(Property::E2, Theory::Chamis)
            .with(Property::G12, Theory::Chamis)
            .with(Property::G23, Theory::Chamis)
            .with(Property::Nu12, Theory::Rom)
            .with(Property::Nu21, Theory::Symmetry)
            .with(Property::Nu23, Theory::Symmetry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::constituents::fixtures::{epoxy_3501_6, t300};
    use crate::micromechanics::registry::{list_properties, theory_count};

    const VF: f64 = 0.55;
    const VM: f64 = 0.425;

    #[test]
    fn test_evaluate_one_reference_scenarios() {
        let (f, m) = (t300(), epoxy_3501_6());
        let e1 = evaluate_one(Property::E1, Theory::Rom, &f, &m, VF, VM).unwrap();
        assert!((e1 - (230.0 * 0.55 + 4.2 * 0.425)).abs() < 1e-9);

        let e2 = evaluate_one(Property::E2, Theory::Chamis, &f, &m, VF, VM).unwrap();
        assert_eq!(e2, 4.2 / (1.0 - 0.55_f64.sqrt() * (1.0 - 4.2 / 15.0)));
    }

    #[test]
    fn test_evaluate_all_covers_registry() {
        let (f, m) = (t300(), epoxy_3501_6());
        let table = evaluate_all(&f, &m, VF, VM);
        assert_eq!(table.len(), theory_count());

        let keys: Vec<&str> = table.properties.iter().map(|p| p.property.key()).collect();
        assert_eq!(keys, list_properties());

        for property in ALL_PROPERTIES {
            for theory in property.theories() {
                assert!(table.get(*property, theory).is_some(), "missing {}/{}", property, theory);
            }
        }
    }

    #[test]
    fn test_evaluate_all_matches_evaluate_one() {
        let (f, m) = (t300(), epoxy_3501_6());
        for (vf, vm) in [(VF, VM), (0.3, 0.68), (0.7, 0.29)] {
            let table = evaluate_all(&f, &m, vf, vm);
            for (property, theory, value) in table.iter() {
                let single = evaluate_one(property, theory, &f, &m, vf, vm).unwrap();
                assert_eq!(value.to_bits(), single.to_bits(), "{}/{} drifted", property, theory);
            }
        }
    }

    #[test]
    fn test_evaluate_property_display_order() {
        let (f, m) = (t300(), epoxy_3501_6());
        let results = evaluate_property(Property::E2, &f, &m, VF, VM);
        let theories: Vec<Theory> = results.iter().map(|r| r.theory).collect();
        assert_eq!(theories, vec![Theory::Rom, Theory::Chamis, Theory::HalpinTsai]);
    }

    #[test]
    fn test_evaluate_unknown_keys() {
        let (f, m) = (t300(), epoxy_3501_6());
        assert_eq!(
            evaluate_one_by_key("E9", "ROM", &f, &m, VF, VM).unwrap_err(),
            CalcError::unknown_property("E9")
        );
        assert_eq!(
            evaluate_one_by_key("E1", "Chamis", &f, &m, VF, VM).unwrap_err(),
            CalcError::unknown_theory("E1", "Chamis")
        );
        assert_eq!(
            evaluate_one(Property::G23, Theory::Rom, &f, &m, VF, VM).unwrap_err(),
            CalcError::unknown_theory("G23", "ROM")
        );
    }

    #[test]
    fn test_degenerate_input_propagates_as_number() {
        let (f, m) = (t300(), epoxy_3501_6());
        let value = evaluate_one(Property::E1, Theory::InverseRom, &f, &m, 0.0, 0.0).unwrap();
        assert!(value.is_infinite());
        let table = evaluate_all(&f, &m, 0.0, 0.0);
        assert!(table.iter().any(|(_, _, v)| !v.is_finite()));
    }

    #[test]
    fn test_degenerate_table_reads_back_from_json() {
        let (f, m) = (t300(), epoxy_3501_6());
        let table = evaluate_all(&f, &m, 0.0, 0.0);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains(r#"{"theory":"Inverse ROM","value":"inf"}"#));
        assert!(!json.contains("null"));
        assert!(json.contains(r#""unit":"GPa""#));

        let parsed: ResultsTable = serde_json::from_str(&json).unwrap();
        for ((_, _, a), (property, theory, b)) in table.iter().zip(parsed.iter()) {
            assert!(a == b || (a.is_nan() && b.is_nan()), "{}/{} changed", property, theory);
        }
    }

    #[test]
    fn test_default_selection() {
        let (f, m) = (t300(), epoxy_3501_6());
        let table = evaluate_all(&f, &m, VF, VM);
        let selected = table.select(&TheorySelection::default()).unwrap();
        assert_eq!(selected.len(), ALL_PROPERTIES.len());

        let e2 = selected.iter().find(|s| s.property == Property::E2).unwrap();
        assert_eq!(e2.theory, Theory::Chamis);
        assert_eq!(Some(e2.value), table.get(Property::E2, Theory::Chamis));
    }

    #[test]
    fn test_selection_with_unregistered_theory() {
        let (f, m) = (t300(), epoxy_3501_6());
        let table = evaluate_all(&f, &m, VF, VM);
        let selection = TheorySelection::new().with(Property::Nu12, Theory::HashinRosen);
        assert_eq!(
            table.select(&selection).unwrap_err(),
            CalcError::unknown_theory("nu12", "Hashin-Rosen")
        );
    }

    #[test]
    fn test_selection_serializes_as_map() {
        let selection = TheorySelection::new().with(Property::E1, Theory::InverseRom);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"E1":"Inverse ROM"}"#);
    }
}
