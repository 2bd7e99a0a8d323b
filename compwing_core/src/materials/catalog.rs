//! Material Catalog
//!
//! Read-only lookup from a fiber or matrix name to its property record.
//!
//! The built-in catalog is TOML data embedded at compile time and parsed
//! once on first access. User catalogs in the same format can be loaded
//! from a string or a file.

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::constituents::{FiberProperties, MatrixProperties};
use crate::errors::{CalcError, CalcResult};

const BUILTIN_MATERIALS_TOML: &str = include_str!("../../data/materials.toml");

static BUILTIN: Lazy<CalcResult<MaterialCatalog>> =
    Lazy::new(|| MaterialCatalog::from_toml_str(BUILTIN_MATERIALS_TOML));

/// Fiber and matrix records, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    #[serde(rename = "fiber", default)]
    fibers: Vec<FiberProperties>,
    #[serde(rename = "matrix", default)]
    matrices: Vec<MatrixProperties>,
}

impl MaterialCatalog {
    /// Build a catalog from records. Names must be unique per kind.
    pub fn new(fibers: Vec<FiberProperties>, matrices: Vec<MatrixProperties>) -> CalcResult<Self> {
        let catalog = MaterialCatalog { fibers, matrices };
        catalog.check_unique_names()?;
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use compwing_core::materials::MaterialCatalog;
    ///
    /// let catalog = MaterialCatalog::builtin().unwrap();
    /// let fiber = catalog.resolve_fiber("T-300").unwrap();
    /// assert_eq!(fiber.e1f, 230.0);
    /// ```
    pub fn builtin() -> CalcResult<&'static MaterialCatalog> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Parse a catalog from TOML (`[[fiber]]` and `[[matrix]]` tables).
    pub fn from_toml_str(toml_text: &str) -> CalcResult<Self> {
        let catalog: MaterialCatalog = toml::from_str(toml_text)
            .map_err(|e| CalcError::serialization(format!("Invalid material catalog: {}", e)))?;
        catalog.check_unique_names()?;
        Ok(catalog)
    }

    /// Load a catalog from a TOML file.
    pub fn from_path(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let catalog = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            fibers = catalog.fibers.len(),
            matrices = catalog.matrices.len(),
            "loaded material catalog"
        );
        Ok(catalog)
    }

    /// Resolve a fiber by name.
    pub fn resolve_fiber(&self, name: &str) -> CalcResult<&FiberProperties> {
        self.fibers
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| CalcError::unknown_fiber(name))
    }

    /// Resolve a matrix by name.
    pub fn resolve_matrix(&self, name: &str) -> CalcResult<&MatrixProperties> {
        self.matrices
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| CalcError::unknown_matrix(name))
    }

    /// Fiber at a zero-based catalog position (used by preset material defaults).
    pub fn fiber_at(&self, index: usize) -> CalcResult<&FiberProperties> {
        self.fibers
            .get(index)
            .ok_or_else(|| CalcError::unknown_fiber(format!("#{}", index)))
    }

    /// Matrix at a zero-based catalog position.
    pub fn matrix_at(&self, index: usize) -> CalcResult<&MatrixProperties> {
        self.matrices
            .get(index)
            .ok_or_else(|| CalcError::unknown_matrix(format!("#{}", index)))
    }

    pub fn fibers(&self) -> &[FiberProperties] {
        &self.fibers
    }

    pub fn matrices(&self) -> &[MatrixProperties] {
        &self.matrices
    }

    pub fn fiber_names(&self) -> Vec<&str> {
        self.fibers.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn matrix_names(&self) -> Vec<&str> {
        self.matrices.iter().map(|m| m.name.as_str()).collect()
    }

    fn check_unique_names(&self) -> CalcResult<()> {
        let mut seen = std::collections::HashSet::new();
        for fiber in &self.fibers {
            if !seen.insert(fiber.name.as_str()) {
                return Err(CalcError::invalid_input("fiber.name", &fiber.name, "Duplicate fiber name"));
            }
        }
        seen.clear();
        for matrix in &self.matrices {
            if !seen.insert(matrix.name.as_str()) {
                return Err(CalcError::invalid_input("matrix.name", &matrix.name, "Duplicate matrix name"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::constituents::fixtures::{epoxy_3501_6, t300};

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = MaterialCatalog::builtin().unwrap();
        assert_eq!(catalog.fibers().len(), 6);
        assert_eq!(catalog.matrices().len(), 7);
        assert_eq!(catalog.fiber_names()[0], "T-300");
        assert_eq!(catalog.matrix_names()[0], "3501-6");
    }

    #[test]
    fn test_builtin_matches_reference_records() {
        let catalog = MaterialCatalog::builtin().unwrap();
        assert_eq!(catalog.resolve_fiber("T-300").unwrap(), &t300());
        assert_eq!(catalog.resolve_matrix("3501-6").unwrap(), &epoxy_3501_6());
    }

    #[test]
    fn test_unknown_material() {
        let catalog = MaterialCatalog::builtin().unwrap();
        let err = catalog.resolve_fiber("T-1000").unwrap_err();
        assert_eq!(err, CalcError::unknown_fiber("T-1000"));

        let err = catalog.resolve_matrix("Bakelite").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MATERIAL");
    }

    #[test]
    fn test_index_lookup() {
        let catalog = MaterialCatalog::builtin().unwrap();
        assert_eq!(catalog.fiber_at(5).unwrap().name, "Kevlar-49");
        assert_eq!(catalog.matrix_at(6).unwrap().name, "Derakane 411-350");
        assert!(catalog.fiber_at(42).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = MaterialCatalog::new(vec![t300(), t300()], vec![epoxy_3501_6()]);
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = MaterialCatalog::from_toml_str("[[fiber]]\nname = 3");
        assert!(matches!(result, Err(CalcError::SerializationError { .. })));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = MaterialCatalog::from_toml_str("").unwrap();
        assert!(catalog.fibers().is_empty());
        assert!(catalog.resolve_fiber("T-300").is_err());
    }
}
