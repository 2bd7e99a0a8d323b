//! # Materials Database
//!
//! Constituent records (fibers and matrices) and the read-only catalog that
//! resolves them by name.
//!
//! ## Example
//!
//! ```rust
//! use compwing_core::materials::MaterialCatalog;
//!
//! let catalog = MaterialCatalog::builtin().unwrap();
//! let fiber = catalog.resolve_fiber("T-300").unwrap();
//! let matrix = catalog.resolve_matrix("3501-6").unwrap();
//! println!("E1f = {} GPa, Em = {} GPa", fiber.e1f, matrix.em);
//! ```

pub mod catalog;
pub mod constituents;

pub use catalog::MaterialCatalog;
pub use constituents::{FiberProperties, MatrixProperties};
