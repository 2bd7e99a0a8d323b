//! # Micromechanics
//!
//! Homogenization of a fiber/matrix pair into lamina properties.
//!
//! ## Modules
//!
//! - [`formulas`] - The individual formulas (ROM, Chamis, Halpin-Tsai, ...)
//! - [`registry`] - Which theories are admissible for which property
//! - [`evaluator`] - Evaluate one pair, one property, or the whole table
//!
//! ## Example
//!
//! ```rust
//! use compwing_core::composite::{CompositeMaterial, VolumeFractions};
//! use compwing_core::materials::MaterialCatalog;
//! use compwing_core::micromechanics::{Property, ResultsTable, Theory};
//!
//! let catalog = MaterialCatalog::builtin().unwrap();
//! let cm = CompositeMaterial::resolve(catalog, "T-300", "3501-6", VolumeFractions::new(0.55, 0.025)).unwrap();
//! let table = ResultsTable::for_composite(&cm);
//! let g12 = table.get(Property::G12, Theory::HashinRosen).unwrap();
//! assert!(g12 > 0.0);
//! ```

pub mod evaluator;
pub mod formulas;
pub mod registry;

pub use evaluator::{
    evaluate_all,
    evaluate_one,
    evaluate_one_by_key,
    evaluate_property,
    CalculationResult,
    PropertyResults,
    ResultsTable,
    SelectedValue,
    TheorySelection,
};

pub use registry::{
    generate_theories_markdown,
    get_formula,
    get_formula_by_key,
    list_properties,
    list_theories,
    Formula,
    Property,
    PropertyCalculation,
    Theory,
    TheoryFormula,
    ALL_PROPERTIES,
};
