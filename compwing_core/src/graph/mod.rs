//! # Reactive Parameter Graph
//!
//! Holds the root inputs of a wing study and keeps every derived value
//! (composite descriptor, results table, preset and effective wing) in step
//! with them.
//!
//! ## Propagation
//!
//! A setter recomputes every node downstream of the inputs it touched,
//! once each and in [`TOPOLOGICAL_ORDER`], into a staged copy of the state.
//! Only when every node succeeded are the new inputs and the staged state
//! committed; observers are then notified node by node in the same order.
//! A failed setter returns the error and leaves inputs, derived values and
//! observers untouched.
//!
//! ```text
//! fiber ─┐
//! matrix ┼─► composite ─► results
//! vf ────┤
//! vvoid ─┘
//! aircraft ─► preset_wing ─┐
//! overrides ───────────────┴─► effective_wing
//! ```
//!
//! ## Example
//!
//! ```rust
//! use compwing_core::graph::ParameterGraph;
//! use compwing_core::micromechanics::{Property, Theory};
//!
//! let mut graph = ParameterGraph::with_builtin_catalogs().unwrap();
//! graph.set_fiber_fraction(0.6).unwrap();
//!
//! let e1 = graph.results().get(Property::E1, Theory::Rom).unwrap();
//! assert!((e1 - (230.0 * 0.6 + 4.2 * (1.0 - 0.6 - 0.025))).abs() < 1e-9);
//! assert_eq!(graph.composite().name, "T-300/3501-6, Vf=0.60");
//! ```

pub mod nodes;
pub mod observer;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use nodes::{Dependency, DerivedNode, RootInput, TOPOLOGICAL_ORDER};
pub use observer::SubscriptionId;

use crate::composite::{CompositeMaterial, VolumeFractions};
use crate::errors::CalcResult;
use crate::materials::MaterialCatalog;
use crate::micromechanics::ResultsTable;
use crate::presets::{PresetCatalog, WingGeometry, WingOverrides};
use observer::{Callback, Observers};

/// Aircraft preset selected on startup
pub const DEFAULT_AIRCRAFT: &str = "P-51";
/// Fiber selected on startup
pub const DEFAULT_FIBER: &str = "T-300";
/// Matrix selected on startup
pub const DEFAULT_MATRIX: &str = "3501-6";
/// Fiber volume fraction selected on startup
pub const DEFAULT_VF: f64 = 0.55;
/// Void volume fraction selected on startup
pub const DEFAULT_VVOID: f64 = 0.025;

// ============================================================================
// Inputs and derived state
// ============================================================================

/// The consumer-writable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootInputs {
    pub aircraft: String,
    pub fiber: String,
    pub matrix: String,
    #[serde(with = "crate::units::lossless")]
    pub vf: f64,
    #[serde(with = "crate::units::lossless")]
    pub vvoid: f64,
    #[serde(default)]
    pub overrides: WingOverrides,
}

impl RootInputs {
    pub fn fractions(&self) -> VolumeFractions {
        VolumeFractions::new(self.vf, self.vvoid)
    }

    /// Roots whose value differs from `other`.
    pub fn changed_from(&self, other: &RootInputs) -> BTreeSet<RootInput> {
        let mut changed = BTreeSet::new();
        if self.aircraft != other.aircraft {
            changed.insert(RootInput::Aircraft);
        }
        if self.fiber != other.fiber {
            changed.insert(RootInput::Fiber);
        }
        if self.matrix != other.matrix {
            changed.insert(RootInput::Matrix);
        }
        if self.vf != other.vf {
            changed.insert(RootInput::FiberFraction);
        }
        if self.vvoid != other.vvoid {
            changed.insert(RootInput::VoidFraction);
        }
        if self.overrides != other.overrides {
            changed.insert(RootInput::Overrides);
        }
        changed
    }
}

impl Default for RootInputs {
    fn default() -> Self {
        RootInputs {
            aircraft: DEFAULT_AIRCRAFT.to_string(),
            fiber: DEFAULT_FIBER.to_string(),
            matrix: DEFAULT_MATRIX.to_string(),
            vf: DEFAULT_VF,
            vvoid: DEFAULT_VVOID,
            overrides: WingOverrides::none(),
        }
    }
}

/// Current value of every derived node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedState {
    pub composite: CompositeMaterial,
    pub results: ResultsTable,
    pub preset_wing: WingGeometry,
    pub effective_wing: WingGeometry,
}

// ============================================================================
// Graph
// ============================================================================

/// Root inputs, derived values and their observers.
#[derive(Debug)]
pub struct ParameterGraph {
    materials: Arc<MaterialCatalog>,
    presets: Arc<PresetCatalog>,
    inputs: RootInputs,
    baseline_overrides: WingOverrides,
    state: DerivedState,
    observers: Observers,
}

impl ParameterGraph {
    /// Build a graph and compute every derived node once.
    ///
    /// The overrides in `inputs` become the baseline that
    /// [`reset_overrides`](Self::reset_overrides) returns to. No observer
    /// exists yet, so nothing is notified.
    pub fn new(materials: Arc<MaterialCatalog>, presets: Arc<PresetCatalog>, inputs: RootInputs) -> CalcResult<Self> {
        let composite = compute_composite(&materials, &inputs)?;
        let results = ResultsTable::for_composite(&composite);
        let preset_wing = presets.resolve(&inputs.aircraft)?.wing.clone();
        let effective_wing = preset_wing.with_overrides(&inputs.overrides);

        tracing::debug!(
            aircraft = %inputs.aircraft,
            composite = %composite.name,
            "parameter graph initialized"
        );

        Ok(ParameterGraph {
            materials,
            presets,
            baseline_overrides: inputs.overrides.clone(),
            inputs,
            state: DerivedState {
                composite,
                results,
                preset_wing,
                effective_wing,
            },
            observers: Observers::default(),
        })
    }

    /// Graph over the built-in catalogs with the default inputs.
    pub fn with_builtin_catalogs() -> CalcResult<Self> {
        Self::new(
            Arc::new(MaterialCatalog::builtin()?.clone()),
            Arc::new(PresetCatalog::builtin()?.clone()),
            RootInputs::default(),
        )
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn inputs(&self) -> &RootInputs {
        &self.inputs
    }

    pub fn state(&self) -> &DerivedState {
        &self.state
    }

    pub fn composite(&self) -> &CompositeMaterial {
        &self.state.composite
    }

    pub fn results(&self) -> &ResultsTable {
        &self.state.results
    }

    pub fn preset_wing(&self) -> &WingGeometry {
        &self.state.preset_wing
    }

    pub fn effective_wing(&self) -> &WingGeometry {
        &self.state.effective_wing
    }

    pub fn materials(&self) -> &MaterialCatalog {
        &self.materials
    }

    pub fn presets(&self) -> &PresetCatalog {
        &self.presets
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    pub fn set_aircraft(&mut self, aircraft: impl Into<String>) -> CalcResult<()> {
        let mut next = self.inputs.clone();
        next.aircraft = aircraft.into();
        self.propagate(next, BTreeSet::from([RootInput::Aircraft]))
    }

    pub fn set_fiber(&mut self, fiber: impl Into<String>) -> CalcResult<()> {
        let mut next = self.inputs.clone();
        next.fiber = fiber.into();
        self.propagate(next, BTreeSet::from([RootInput::Fiber]))
    }

    pub fn set_matrix(&mut self, matrix: impl Into<String>) -> CalcResult<()> {
        let mut next = self.inputs.clone();
        next.matrix = matrix.into();
        self.propagate(next, BTreeSet::from([RootInput::Matrix]))
    }

    /// Set Vf. Out-of-range values are accepted and flow into the formulas.
    pub fn set_fiber_fraction(&mut self, vf: f64) -> CalcResult<()> {
        let mut next = self.inputs.clone();
        next.vf = vf;
        self.propagate(next, BTreeSet::from([RootInput::FiberFraction]))
    }

    pub fn set_void_fraction(&mut self, vvoid: f64) -> CalcResult<()> {
        let mut next = self.inputs.clone();
        next.vvoid = vvoid;
        self.propagate(next, BTreeSet::from([RootInput::VoidFraction]))
    }

    pub fn set_overrides(&mut self, overrides: WingOverrides) -> CalcResult<()> {
        let mut next = self.inputs.clone();
        next.overrides = overrides;
        self.propagate(next, BTreeSet::from([RootInput::Overrides]))
    }

    /// Put the overrides back to the record the graph was built with.
    pub fn reset_overrides(&mut self) -> CalcResult<()> {
        self.set_overrides(self.baseline_overrides.clone())
    }

    /// Apply several root inputs in one propagation.
    ///
    /// Only roots whose value actually changed are touched; if none did,
    /// nothing is recomputed or notified.
    pub fn set_inputs(&mut self, next: RootInputs) -> CalcResult<()> {
        let touched = next.changed_from(&self.inputs);
        if touched.is_empty() {
            return Ok(());
        }
        self.propagate(next, touched)
    }

    /// Copy the selected preset's material defaults into the inputs.
    ///
    /// Returns `Ok(false)` without touching anything when the preset has no
    /// material defaults.
    pub fn apply_preset_materials(&mut self) -> CalcResult<bool> {
        let Some(specs) = self.presets.resolve(&self.inputs.aircraft)?.materials else {
            return Ok(false);
        };
        let mut next = self.inputs.clone();
        next.fiber = self.materials.fiber_at(specs.fiber)?.name.clone();
        next.matrix = self.materials.matrix_at(specs.matrix)?.name.clone();
        next.vf = specs.vf;
        next.vvoid = specs.vvoid;
        self.set_inputs(next)?;
        Ok(true)
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    pub fn subscribe_composite(&mut self, f: impl FnMut(&CompositeMaterial) + 'static) -> SubscriptionId {
        self.observers.add(Callback::Composite(Box::new(f)))
    }

    pub fn subscribe_results(&mut self, f: impl FnMut(&ResultsTable) + 'static) -> SubscriptionId {
        self.observers.add(Callback::Results(Box::new(f)))
    }

    pub fn subscribe_preset_wing(&mut self, f: impl FnMut(&WingGeometry) + 'static) -> SubscriptionId {
        self.observers.add(Callback::PresetWing(Box::new(f)))
    }

    pub fn subscribe_effective_wing(&mut self, f: impl FnMut(&WingGeometry) + 'static) -> SubscriptionId {
        self.observers.add(Callback::EffectiveWing(Box::new(f)))
    }

    /// Remove an observer. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    pub fn subscription_count(&self) -> usize {
        self.observers.len()
    }

    // ------------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------------

    fn propagate(&mut self, next: RootInputs, touched: BTreeSet<RootInput>) -> CalcResult<()> {
        let affected = DerivedNode::affected_by(&touched);

        let staged = match self.recompute(&next, &affected) {
            Ok(staged) => staged,
            Err(e) => {
                tracing::warn!(error = %e, ?touched, "update rejected, state unchanged");
                return Err(e);
            }
        };

        self.inputs = next;
        self.state = staged;
        tracing::debug!(?touched, ?affected, "propagated");

        for node in affected {
            self.observers.notify(node, &self.state);
        }
        Ok(())
    }

    fn recompute(&self, next: &RootInputs, affected: &BTreeSet<DerivedNode>) -> CalcResult<DerivedState> {
        let mut staged = self.state.clone();
        for node in affected {
            match node {
                DerivedNode::Composite => staged.composite = compute_composite(&self.materials, next)?,
                DerivedNode::Results => staged.results = ResultsTable::for_composite(&staged.composite),
                DerivedNode::PresetWing => staged.preset_wing = self.presets.resolve(&next.aircraft)?.wing.clone(),
                DerivedNode::EffectiveWing => {
                    staged.effective_wing = staged.preset_wing.with_overrides(&next.overrides)
                }
            }
        }
        Ok(staged)
    }
}

fn compute_composite(materials: &MaterialCatalog, inputs: &RootInputs) -> CalcResult<CompositeMaterial> {
    CompositeMaterial::resolve(materials, &inputs.fiber, &inputs.matrix, inputs.fractions())
}
