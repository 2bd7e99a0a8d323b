//! Node identities and the dependency edges between them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Values written directly by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootInput {
    Aircraft,
    Fiber,
    Matrix,
    FiberFraction,
    VoidFraction,
    Overrides,
}

impl RootInput {
    pub const ALL: [RootInput; 6] = [
        RootInput::Aircraft,
        RootInput::Fiber,
        RootInput::Matrix,
        RootInput::FiberFraction,
        RootInput::VoidFraction,
        RootInput::Overrides,
    ];
}

impl fmt::Display for RootInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RootInput::Aircraft => "aircraft",
            RootInput::Fiber => "fiber",
            RootInput::Matrix => "matrix",
            RootInput::FiberFraction => "vf",
            RootInput::VoidFraction => "vvoid",
            RootInput::Overrides => "overrides",
        };
        write!(f, "{}", name)
    }
}

/// Values computed from root inputs and other derived values.
///
/// Variant order is the topological order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedNode {
    Composite,
    Results,
    PresetWing,
    EffectiveWing,
}

/// Every derived node, dependencies before dependents.
pub const TOPOLOGICAL_ORDER: [DerivedNode; 4] = [
    DerivedNode::Composite,
    DerivedNode::Results,
    DerivedNode::PresetWing,
    DerivedNode::EffectiveWing,
];

/// An incoming edge of a derived node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Root(RootInput),
    Node(DerivedNode),
}

impl DerivedNode {
    /// Direct dependencies
    pub fn dependencies(&self) -> &'static [Dependency] {
        use Dependency::{Node, Root};
        match self {
            DerivedNode::Composite => &[
                Root(RootInput::Fiber),
                Root(RootInput::Matrix),
                Root(RootInput::FiberFraction),
                Root(RootInput::VoidFraction),
            ],
            DerivedNode::Results => &[Node(DerivedNode::Composite)],
            DerivedNode::PresetWing => &[Root(RootInput::Aircraft)],
            DerivedNode::EffectiveWing => &[Node(DerivedNode::PresetWing), Root(RootInput::Overrides)],
        }
    }

    /// Every node transitively downstream of the touched roots, in
    /// topological order.
    ///
    /// ```rust
    /// use std::collections::BTreeSet;
    /// use compwing_core::graph::{DerivedNode, RootInput};
    ///
    /// let touched = BTreeSet::from([RootInput::Aircraft]);
    /// let affected: Vec<_> = DerivedNode::affected_by(&touched).into_iter().collect();
    /// assert_eq!(affected, vec![DerivedNode::PresetWing, DerivedNode::EffectiveWing]);
    /// ```
    pub fn affected_by(touched: &BTreeSet<RootInput>) -> BTreeSet<DerivedNode> {
        let mut affected = BTreeSet::new();
        for node in TOPOLOGICAL_ORDER {
            let stale = node.dependencies().iter().any(|dep| match dep {
                Dependency::Root(root) => touched.contains(root),
                Dependency::Node(upstream) => affected.contains(upstream),
            });
            if stale {
                affected.insert(node);
            }
        }
        affected
    }
}

impl fmt::Display for DerivedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DerivedNode::Composite => "composite",
            DerivedNode::Results => "results",
            DerivedNode::PresetWing => "preset_wing",
            DerivedNode::EffectiveWing => "effective_wing",
        };
        write!(f, "{}", name)
    }
}
