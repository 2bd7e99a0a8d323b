//! Observer registry for derived nodes.
//!
//! Callbacks receive a shared reference to the freshly committed value, so
//! they cannot write back into the graph while a propagation is running.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nodes::DerivedNode;
use super::DerivedState;
use crate::composite::CompositeMaterial;
use crate::micromechanics::ResultsTable;
use crate::presets::WingGeometry;

/// Handle returned by a subscribe call; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        SubscriptionId(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) enum Callback {
    Composite(Box<dyn FnMut(&CompositeMaterial)>),
    Results(Box<dyn FnMut(&ResultsTable)>),
    PresetWing(Box<dyn FnMut(&WingGeometry)>),
    EffectiveWing(Box<dyn FnMut(&WingGeometry)>),
}

impl Callback {
    fn node(&self) -> DerivedNode {
        match self {
            Callback::Composite(_) => DerivedNode::Composite,
            Callback::Results(_) => DerivedNode::Results,
            Callback::PresetWing(_) => DerivedNode::PresetWing,
            Callback::EffectiveWing(_) => DerivedNode::EffectiveWing,
        }
    }

    fn call(&mut self, state: &DerivedState) {
        match self {
            Callback::Composite(f) => f(&state.composite),
            Callback::Results(f) => f(&state.results),
            Callback::PresetWing(f) => f(&state.preset_wing),
            Callback::EffectiveWing(f) => f(&state.effective_wing),
        }
    }
}

/// Subscriptions in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Call every observer of `node` with its committed value.
    pub(crate) fn notify(&mut self, node: DerivedNode, state: &DerivedState) {
        for (_, callback) in self.entries.iter_mut().filter(|(_, cb)| cb.node() == node) {
            callback.call(state);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("count", &self.entries.len()).finish()
    }
}
