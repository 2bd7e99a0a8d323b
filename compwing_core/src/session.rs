//! # Sessions
//!
//! A `Session` is a saved wing study: the root inputs of a
//! [`ParameterGraph`] plus the design-value theory selection. Sessions
//! serialize to `.cws` files as human-readable JSON; derived values are
//! never stored and are recomputed when the session is opened.
//!
//! ## Structure
//!
//! ```text
//! Session
//! ├── meta: SessionMetadata (version, id, name, timestamps)
//! ├── inputs: RootInputs (aircraft, fiber, matrix, Vf, Vvoid, overrides)
//! └── selection: TheorySelection (design theory per property)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use compwing_core::session::Session;
//!
//! let mut session = Session::new("Glider spar study");
//! session.inputs.aircraft = "Glider".to_string();
//!
//! let graph = session.open_builtin().unwrap();
//! assert_eq!(graph.inputs().aircraft, "Glider");
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcResult;
use crate::graph::{ParameterGraph, RootInputs};
use crate::materials::MaterialCatalog;
use crate::micromechanics::{SelectedValue, TheorySelection};
use crate::presets::PresetCatalog;

/// Current schema version for .cws files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// File extension for session files
pub const SESSION_EXTENSION: &str = "cws";

/// Root container written to `.cws` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub meta: SessionMetadata,
    pub inputs: RootInputs,
    #[serde(default)]
    pub selection: TheorySelection,
}

impl Session {
    /// New session with the default inputs.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_inputs(name, RootInputs::default())
    }

    pub fn with_inputs(name: impl Into<String>, inputs: RootInputs) -> Self {
        let now = Utc::now();
        Session {
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                name: name.into(),
                created: now,
                modified: now,
            },
            inputs,
            selection: TheorySelection::default(),
        }
    }

    /// Build a graph from the stored inputs.
    pub fn open(&self, materials: Arc<MaterialCatalog>, presets: Arc<PresetCatalog>) -> CalcResult<ParameterGraph> {
        ParameterGraph::new(materials, presets, self.inputs.clone())
    }

    /// Build a graph over the built-in catalogs.
    pub fn open_builtin(&self) -> CalcResult<ParameterGraph> {
        self.open(
            Arc::new(MaterialCatalog::builtin()?.clone()),
            Arc::new(PresetCatalog::builtin()?.clone()),
        )
    }

    /// Copy a graph's current inputs into the session.
    ///
    /// Only marks the session modified when something changed.
    pub fn capture(&mut self, graph: &ParameterGraph) {
        if &self.inputs != graph.inputs() {
            self.inputs = graph.inputs().clone();
            self.touch();
        }
    }

    /// Design values of a graph under this session's selection.
    pub fn design_values(&self, graph: &ParameterGraph) -> CalcResult<Vec<SelectedValue>> {
        graph.results().select(&self.selection)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Session header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::micromechanics::{Property, Theory};

    #[test]
    fn test_session_creation() {
        let session = Session::new("P-51 baseline");
        assert_eq!(session.meta.name, "P-51 baseline");
        assert_eq!(session.meta.version, SCHEMA_VERSION);
        assert_eq!(session.inputs, RootInputs::default());
        assert_eq!(session.meta.created, session.meta.modified);
    }

    #[test]
    fn test_session_serialization() {
        let session = Session::new("Spar study");
        let json = serde_json::to_string_pretty(&session).unwrap();
        assert!(json.contains("Spar study"));
        assert!(json.contains("\"fiber\": \"T-300\""));

        let roundtrip: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, session);
    }

    #[test]
    fn test_missing_selection_defaults() {
        let session = Session::new("old");
        let mut value = serde_json::to_value(&session).unwrap();
        value.as_object_mut().unwrap().remove("selection");
        let parsed: Session = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.selection, TheorySelection::default());
    }

    #[test]
    fn test_capture_from_graph() {
        let mut session = Session::new("capture");
        let mut graph = session.open_builtin().unwrap();

        session.capture(&graph);
        assert_eq!(session.meta.created, session.meta.modified);

        graph.set_matrix("8552").unwrap();
        session.capture(&graph);
        assert_eq!(session.inputs.matrix, "8552");
        assert!(session.meta.modified >= session.meta.created);
    }

    #[test]
    fn test_open_with_unknown_preset_fails() {
        let mut session = Session::new("bad");
        session.inputs.aircraft = "Concorde".to_string();
        assert!(session.open_builtin().is_err());
    }

    #[test]
    fn test_design_values_follow_selection() {
        let mut session = Session::new("selection");
        session.selection.set(Property::E2, Theory::HalpinTsai);
        let graph = session.open_builtin().unwrap();

        let values = session.design_values(&graph).unwrap();
        let e2 = values.iter().find(|v| v.property == Property::E2).unwrap();
        assert_eq!(e2.theory, Theory::HalpinTsai);
        assert_eq!(Some(e2.value), graph.results().get(Property::E2, Theory::HalpinTsai));
    }
}
