//! # compwing_core - Composite Lamina Micromechanics Engine
//!
//! `compwing_core` computes the homogenized elastic properties of a
//! unidirectional fiber/matrix lamina with several competing theories, and
//! keeps those results in step with a wing study's inputs through a small
//! reactive parameter graph. Inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Closed registry**: properties and theories are enums; string keys are
//!   parsed once at the boundary
//! - **Pure formulas**: every theory is a plain function of the constituents
//!   and volume fractions, no caching and no validation
//! - **Rich errors**: structured error types, not just strings
//! - **All or nothing updates**: a rejected input leaves the graph as it was
//!
//! ## Quick Start
//!
//! ```rust
//! use compwing_core::graph::ParameterGraph;
//! use compwing_core::micromechanics::{Property, Theory};
//!
//! let mut graph = ParameterGraph::with_builtin_catalogs().unwrap();
//! graph.set_fiber("AS4").unwrap();
//!
//! let e2 = graph.results().get(Property::E2, Theory::Chamis).unwrap();
//! assert!(e2 > 0.0);
//!
//! let json = serde_json::to_string_pretty(graph.results()).unwrap();
//! assert!(json.contains("Halpin-Tsai"));
//! ```
//!
//! ## Modules
//!
//! - [`micromechanics`] - Property registry, formulas and evaluator
//! - [`materials`] - Fiber/matrix records and the material catalog
//! - [`composite`] - Volume fractions and the composite descriptor
//! - [`presets`] - Aircraft presets and wing geometry overrides
//! - [`graph`] - Reactive parameter graph
//! - [`session`] - Saved wing studies
//! - [`file_io`] - Session files with atomic saves and locking
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod composite;
pub mod errors;
pub mod file_io;
pub mod graph;
pub mod materials;
pub mod micromechanics;
pub mod presets;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use composite::{CompositeMaterial, VolumeFractions};
pub use errors::{CalcError, CalcResult, MaterialKind};
pub use file_io::{load_session, save_session, FileLock};
pub use graph::{ParameterGraph, RootInputs};
pub use materials::{FiberProperties, MaterialCatalog, MatrixProperties};
pub use micromechanics::{evaluate_all, evaluate_one, Property, ResultsTable, Theory, TheorySelection};
pub use presets::{AircraftSpecs, PresetCatalog, WingGeometry, WingOverrides};
pub use session::{Session, SessionMetadata};
