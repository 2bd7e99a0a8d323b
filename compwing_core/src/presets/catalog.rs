//! Aircraft Preset Catalog
//!
//! Read-only lookup from a preset key ("P-51", "Glider", ...) to its
//! [`AircraftSpecs`], plus the external CAD project table.

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::aircraft::{AircraftInfo, AircraftSpecs, ExternalProject, MaterialSpecs, ModelSpecs};
use super::wing::WingGeometry;
use crate::errors::{CalcError, CalcResult};

const BUILTIN_PRESETS_TOML: &str = include_str!("../../data/aircraft_presets.toml");

static BUILTIN: Lazy<CalcResult<PresetCatalog>> =
    Lazy::new(|| PresetCatalog::from_toml_str(BUILTIN_PRESETS_TOML));

/// A preset together with its lookup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPreset {
    pub key: String,
    pub aircraft: AircraftSpecs,
}

/// On-disk shape of one `[[aircraft]]` table.
#[derive(Deserialize)]
struct PresetEntry {
    key: String,
    specs: AircraftInfo,
    wing: WingGeometry,
    #[serde(default)]
    materials: Option<MaterialSpecs>,
    model: ModelSpecs,
}

impl From<PresetEntry> for NamedPreset {
    fn from(entry: PresetEntry) -> Self {
        NamedPreset {
            key: entry.key,
            aircraft: AircraftSpecs {
                specs: entry.specs,
                wing: entry.wing,
                materials: entry.materials,
                model: entry.model,
            },
        }
    }
}

#[derive(Deserialize)]
struct PresetFile {
    #[serde(default)]
    aircraft: Vec<PresetEntry>,
    #[serde(default)]
    project: Vec<ExternalProject>,
}

/// Aircraft presets and external projects, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresetCatalog {
    presets: Vec<NamedPreset>,
    projects: Vec<ExternalProject>,
}

impl PresetCatalog {
    /// Build a catalog from records. Preset keys must be unique.
    pub fn new(presets: Vec<NamedPreset>, projects: Vec<ExternalProject>) -> CalcResult<Self> {
        let catalog = PresetCatalog { presets, projects };
        catalog.check_unique_keys()?;
        Ok(catalog)
    }

    /// The presets shipped with the crate.
    ///
    /// ```rust
    /// use compwing_core::presets::PresetCatalog;
    ///
    /// let presets = PresetCatalog::builtin().unwrap();
    /// assert_eq!(presets.preset_names(), vec!["P-51", "330-LT", "Glider", "Space elevator (wip)"]);
    /// ```
    pub fn builtin() -> CalcResult<&'static PresetCatalog> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Parse presets from TOML (`[[aircraft]]` and `[[project]]` tables).
    pub fn from_toml_str(toml_text: &str) -> CalcResult<Self> {
        let file: PresetFile = toml::from_str(toml_text)
            .map_err(|e| CalcError::serialization(format!("Invalid preset catalog: {}", e)))?;
        Self::new(file.aircraft.into_iter().map(NamedPreset::from).collect(), file.project)
    }

    /// Load presets from a TOML file.
    pub fn from_path(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let catalog = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            presets = catalog.presets.len(),
            projects = catalog.projects.len(),
            "loaded preset catalog"
        );
        Ok(catalog)
    }

    /// Resolve a preset by key.
    pub fn resolve(&self, key: &str) -> CalcResult<&AircraftSpecs> {
        self.presets
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.aircraft)
            .ok_or_else(|| CalcError::unknown_preset(key))
    }

    /// External CAD project by name, if present.
    pub fn external_project(&self, name: &str) -> Option<&ExternalProject> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// External CAD project referenced by a preset's model, if present.
    pub fn project_for(&self, key: &str) -> CalcResult<Option<&ExternalProject>> {
        let aircraft = self.resolve(key)?;
        Ok(self.external_project(&aircraft.model.project))
    }

    pub fn presets(&self) -> &[NamedPreset] {
        &self.presets
    }

    pub fn projects(&self) -> &[ExternalProject] {
        &self.projects
    }

    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.key.as_str()).collect()
    }

    fn check_unique_keys(&self) -> CalcResult<()> {
        let mut seen = std::collections::HashSet::new();
        for preset in &self.presets {
            if !seen.insert(preset.key.as_str()) {
                return Err(CalcError::invalid_input("aircraft.key", &preset.key, "Duplicate preset key"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialCatalog;
    use crate::units::{Degrees, Kilograms, Meters};

    #[test]
    fn test_builtin_presets_load() {
        let presets = PresetCatalog::builtin().unwrap();
        assert_eq!(presets.presets().len(), 4);
        assert_eq!(presets.projects().len(), 5);
    }

    #[test]
    fn test_p51_wing() {
        let p51 = PresetCatalog::builtin().unwrap().resolve("P-51").unwrap();
        assert_eq!(p51.specs.name, "P-51 Mustang");
        assert_eq!(p51.specs.mass, Kilograms(5489.0));
        assert_eq!(p51.specs.crop_params, [0, 1103, 1693, 1100]);
        assert_eq!(p51.wing.span_wet, Meters(5.643));
        assert_eq!(p51.wing.root, Meters(2.752));
        assert_eq!(p51.wing.sweep_angle, Degrees(10.388));
        assert_eq!(p51.wing.airfoil_root, "NACA-2418");
        assert!(p51.materials.is_none());
        assert_eq!(p51.model.box_element.as_deref(), Some("0f38721b826a5669e2acf9d0"));
    }

    #[test]
    fn test_material_defaults_resolve_in_builtin_catalog() {
        let presets = PresetCatalog::builtin().unwrap();
        let materials = MaterialCatalog::builtin().unwrap();
        for preset in presets.presets() {
            if let Some(specs) = preset.aircraft.materials {
                assert!(materials.fiber_at(specs.fiber).is_ok(), "{} fiber", preset.key);
                assert!(materials.matrix_at(specs.matrix).is_ok(), "{} matrix", preset.key);
            }
        }
        let glider = presets.resolve("Glider").unwrap().materials.unwrap();
        assert_eq!(glider.vvoid, 0.155);
    }

    #[test]
    fn test_unknown_preset() {
        let err = PresetCatalog::builtin().unwrap().resolve("Concorde").unwrap_err();
        assert_eq!(err, CalcError::unknown_preset("Concorde"));
        assert_eq!(err.error_code(), "UNKNOWN_PRESET");
    }

    #[test]
    fn test_external_project_lookup() {
        let presets = PresetCatalog::builtin().unwrap();
        let project = presets.project_for("330-LT").unwrap().unwrap();
        assert_eq!(project.did, "3b6bce5824912adfda10b52d");
        assert_eq!(project.wv, "w");
        assert!(presets.external_project("Nope").is_none());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let presets = PresetCatalog::builtin().unwrap();
        let p51 = presets.presets()[0].clone();
        let result = PresetCatalog::new(vec![p51.clone(), p51], Vec::new());
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_malformed_presets() {
        let result = PresetCatalog::from_toml_str("[[aircraft]]\nkey = \"X\"");
        assert!(matches!(result, Err(CalcError::SerializationError { .. })));
        assert!(PresetCatalog::from_toml_str("").unwrap().presets().is_empty());
    }
}
