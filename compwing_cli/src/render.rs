//! Plain-text output for the terminal.

use serde::Serialize;

use compwing_core::file_io::LockInfo;
use compwing_core::graph::ParameterGraph;
use compwing_core::materials::MaterialCatalog;
use compwing_core::micromechanics::{
    CalculationResult,
    Property,
    ResultsTable,
    SelectedValue,
    Theory,
    ALL_PROPERTIES,
};
use compwing_core::presets::{PresetCatalog, WingGeometry};
use compwing_core::session::Session;
use compwing_core::CalcResult;

const RULE: &str = "═══════════════════════════════════════════════════════";

fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
}

/// Format a computed value; non-finite values are shown as-is.
pub fn number(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        format!("{}", value)
    }
}

/// One row of `properties --json`.
#[derive(Serialize)]
pub struct PropertyListing {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub theories: Vec<Theory>,
}

impl PropertyListing {
    pub fn for_key(key: &str) -> CalcResult<Self> {
        let property = Property::from_key(key)?;
        let meta = property.metadata();
        Ok(PropertyListing {
            key: property.key(),
            name: meta.name,
            unit: meta.unit.symbol(),
            theories: property.theories(),
        })
    }
}

pub fn properties() {
    banner("LAMINA PROPERTIES");
    for property in ALL_PROPERTIES {
        let meta = property.metadata();
        println!();
        println!("{:<5} {} [{}]", property.key(), meta.name, meta.unit);
        for tf in &meta.formulas {
            println!("      {:<13} {}", tf.theory.key(), tf.formula_plain);
        }
    }
}

pub fn property_results(property: Property, results: &[CalculationResult]) {
    let meta = property.metadata();
    println!("{} ({}) [{}]", meta.name, property.key(), meta.unit);
    for r in results {
        println!("  {:<13} {:>12}", r.theory.key(), number(r.value));
    }
}

pub fn results_table(title: &str, table: &ResultsTable, selected: &[SelectedValue]) {
    banner(title);
    for entry in &table.properties {
        println!();
        println!("{} [{}]", entry.property.key(), entry.unit);
        for r in &entry.results {
            let marker = if selected
                .iter()
                .any(|s| s.property == entry.property && s.theory == r.theory)
            {
                "*"
            } else {
                " "
            };
            println!("  {} {:<13} {:>12}", marker, r.theory.key(), number(r.value));
        }
    }
    println!();
    println!("* design value");
}

fn wing_rows(preset: &WingGeometry, effective: &WingGeometry) {
    let rows: [(&str, String, String); 9] = [
        ("span_wet (m)", number(preset.span_wet.0), number(effective.span_wet.0)),
        ("fwd_spar", number(preset.fwd_spar), number(effective.fwd_spar)),
        ("aft_spar", number(preset.aft_spar), number(effective.aft_spar)),
        ("tip (m)", number(preset.tip.0), number(effective.tip.0)),
        ("root (m)", number(preset.root.0), number(effective.root.0)),
        ("sweep (deg)", number(preset.sweep_angle.0), number(effective.sweep_angle.0)),
        ("dihedral (deg)", number(preset.dihedral_angle.0), number(effective.dihedral_angle.0)),
        ("airfoil root", preset.airfoil_root.clone(), effective.airfoil_root.clone()),
        ("airfoil tip", preset.airfoil_tip.clone(), effective.airfoil_tip.clone()),
    ];
    println!("  {:<16} {:>12} {:>12}", "", "preset", "effective");
    for (label, p, e) in rows {
        let flag = if p != e { " *" } else { "" };
        println!("  {:<16} {:>12} {:>12}{}", label, p, e, flag);
    }
}

pub fn wing(graph: &ParameterGraph) {
    let aircraft = &graph.inputs().aircraft;
    banner(&format!("WING: {}", aircraft));
    wing_rows(graph.preset_wing(), graph.effective_wing());

    let effective = graph.effective_wing();
    println!();
    println!("  taper ratio      {:>12}", number(effective.taper_ratio()));
    println!("  half area (m²)   {:>12}", number(effective.half_area()));
    println!("  MAC (m)          {:>12}", number(effective.mean_aerodynamic_chord().0));
}

pub fn catalog(materials: &MaterialCatalog, presets: &PresetCatalog) {
    banner("MATERIAL CATALOG");
    println!();
    println!("Fibers:");
    for (i, f) in materials.fibers().iter().enumerate() {
        println!("  {:>2}  {:<18} {:<8} E1f={:>6} GPa", i, f.name, f.fiber_type, f.e1f);
    }
    println!();
    println!("Matrices:");
    for (i, m) in materials.matrices().iter().enumerate() {
        println!("  {:>2}  {:<18} {:<12} Em={:>5} GPa", i, m.name, m.matrix_type, m.em);
    }
    println!();
    banner("AIRCRAFT PRESETS");
    for preset in presets.presets() {
        let specs = &preset.aircraft.specs;
        println!(
            "  {:<22} {} ({}), {} kg, n={}",
            preset.key, specs.name, specs.manufacturer, specs.mass.0, specs.load_factor
        );
    }
}

pub fn session(session: &Session, lock: Option<&LockInfo>, graph: &ParameterGraph, design_values: &[SelectedValue]) {
    banner(&format!("SESSION: {}", session.meta.name));
    println!("  id        {}", session.meta.id);
    println!("  version   {}", session.meta.version);
    println!("  created   {}", session.meta.created.to_rfc3339());
    println!("  modified  {}", session.meta.modified.to_rfc3339());
    if let Some(lock) = lock {
        println!("  locked by {} on {} since {}", lock.user_id, lock.machine, lock.locked_at.to_rfc3339());
    }

    println!();
    println!("  aircraft  {}", graph.inputs().aircraft);
    println!("  lamina    {}", graph.composite().name);
    println!();
    println!("Design values:");
    for v in design_values {
        let unit = v.property.metadata().unit;
        println!("  {:<5} {:>12} {:<4} ({})", v.property.key(), number(v.value), unit.symbol(), v.theory.key());
    }
    println!();
    println!("Wing:");
    wing_rows(graph.preset_wing(), graph.effective_wing());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(128.285), "128.2850");
        assert_eq!(number(f64::INFINITY), "inf");
        assert_eq!(number(f64::NAN), "NaN");
    }

    #[test]
    fn test_property_listing() {
        let listing = PropertyListing::for_key("G12").unwrap();
        assert_eq!(listing.unit, "GPa");
        assert_eq!(listing.theories.len(), 4);
        assert!(PropertyListing::for_key("G13").is_err());
    }
}
