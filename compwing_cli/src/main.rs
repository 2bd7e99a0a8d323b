//! # Compwing CLI
//!
//! Terminal front end for the lamina micromechanics engine.
//!
//! ## Commands
//!
//! - `properties`: list registry properties, units and theories
//! - `evaluate`: evaluate one theory, one property, or the whole table
//! - `wing`: preset and effective wing geometry with overrides
//! - `catalog`: list fibers, matrices and aircraft presets
//! - `session new|show`: create or inspect `.cws` session files
//!
//! Every result command takes `--json` for machine-readable output. Errors
//! are printed to stderr, followed by their JSON form.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use compwing_core::composite::VolumeFractions;
use compwing_core::file_io::{load_session_with_lock_check, save_session, FileLock};
use compwing_core::graph::{ParameterGraph, RootInputs, DEFAULT_AIRCRAFT, DEFAULT_FIBER, DEFAULT_MATRIX};
use compwing_core::materials::MaterialCatalog;
use compwing_core::micromechanics::{
    evaluate_all,
    evaluate_one,
    evaluate_property,
    list_properties,
    Property,
    SelectedValue,
    Theory,
    TheorySelection,
};
use compwing_core::presets::{PresetCatalog, WingOverrides};
use compwing_core::session::Session;
use compwing_core::units::{Degrees, Meters};
use compwing_core::{CalcError, CalcResult};

/// Compwing - composite lamina properties and wing presets
#[derive(Parser)]
#[command(name = "compwing")]
#[command(version)]
#[command(about = "Composite lamina micromechanics and wing parameter explorer")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Material catalog TOML to use instead of the built-in one
    #[arg(long, global = true, value_name = "PATH")]
    materials: Option<PathBuf>,

    /// Aircraft preset TOML to use instead of the built-in one
    #[arg(long, global = true, value_name = "PATH")]
    presets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List properties, their units and registered theories
    Properties {
        #[arg(long)]
        json: bool,
    },
    /// Evaluate micromechanics formulas for a fiber/matrix pair
    Evaluate(EvaluateArgs),
    /// Show preset and effective wing geometry
    Wing(WingArgs),
    /// List catalog fibers, matrices and aircraft presets
    Catalog {
        #[arg(long)]
        json: bool,
    },
    /// Session file commands
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
}

#[derive(Args)]
struct EvaluateArgs {
    #[arg(long, default_value = DEFAULT_FIBER)]
    fiber: String,
    #[arg(long, default_value = DEFAULT_MATRIX)]
    matrix: String,
    /// Fiber volume fraction
    #[arg(long, default_value_t = compwing_core::graph::DEFAULT_VF)]
    vf: f64,
    /// Void volume fraction
    #[arg(long, default_value_t = compwing_core::graph::DEFAULT_VVOID)]
    vvoid: f64,
    /// Only this property (e.g. E1, nu12)
    #[arg(long)]
    property: Option<String>,
    /// Only this theory; requires --property
    #[arg(long, requires = "property")]
    theory: Option<String>,
    #[arg(long)]
    json: bool,
}

impl EvaluateArgs {
    fn fractions(&self) -> VolumeFractions {
        VolumeFractions::new(self.vf, self.vvoid)
    }
}

#[derive(Args)]
struct WingArgs {
    #[arg(long, default_value = DEFAULT_AIRCRAFT)]
    aircraft: String,
    #[command(flatten)]
    overrides: OverrideArgs,
    #[arg(long)]
    json: bool,
}

/// Wing geometry overrides; unset flags keep the preset value.
#[derive(Args)]
struct OverrideArgs {
    /// Wetted semi-span (m)
    #[arg(long)]
    span_wet: Option<f64>,
    /// Front spar position (chord fraction)
    #[arg(long)]
    fwd_spar: Option<f64>,
    /// Aft spar position (chord fraction)
    #[arg(long)]
    aft_spar: Option<f64>,
    /// Tip chord (m)
    #[arg(long)]
    tip: Option<f64>,
    /// Root chord (m)
    #[arg(long)]
    root: Option<f64>,
    /// Sweep angle (deg)
    #[arg(long)]
    sweep_angle: Option<f64>,
    /// Dihedral angle (deg)
    #[arg(long)]
    dihedral_angle: Option<f64>,
    #[arg(long)]
    airfoil_root: Option<String>,
    #[arg(long)]
    airfoil_tip: Option<String>,
}

impl From<OverrideArgs> for WingOverrides {
    fn from(args: OverrideArgs) -> Self {
        WingOverrides {
            span_wet: args.span_wet.map(Meters),
            fwd_spar: args.fwd_spar,
            aft_spar: args.aft_spar,
            tip: args.tip.map(Meters),
            root: args.root.map(Meters),
            sweep_angle: args.sweep_angle.map(Degrees),
            dihedral_angle: args.dihedral_angle.map(Degrees),
            airfoil_root: args.airfoil_root,
            airfoil_tip: args.airfoil_tip,
        }
    }
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Create a session file from inputs
    New {
        path: PathBuf,
        #[arg(long, default_value = "Untitled")]
        name: String,
        #[arg(long, default_value = DEFAULT_AIRCRAFT)]
        aircraft: String,
        #[arg(long, default_value = DEFAULT_FIBER)]
        fiber: String,
        #[arg(long, default_value = DEFAULT_MATRIX)]
        matrix: String,
        #[arg(long, default_value_t = compwing_core::graph::DEFAULT_VF)]
        vf: f64,
        #[arg(long, default_value_t = compwing_core::graph::DEFAULT_VVOID)]
        vvoid: f64,
        /// Replace fiber, matrix and fractions with the preset's material defaults
        #[arg(long)]
        preset_materials: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Name recorded in the lock file while saving (default: $USER)
        #[arg(long)]
        user: Option<String>,
    },
    /// Print a session and its computed values
    Show {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(code = e.error_code(), "command failed");
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let catalogs = Catalogs::load(cli.materials.as_deref(), cli.presets.as_deref())?;

    match cli.command {
        Commands::Properties { json } => cmd_properties(json),
        Commands::Evaluate(args) => cmd_evaluate(&catalogs, args),
        Commands::Wing(args) => cmd_wing(&catalogs, args),
        Commands::Catalog { json } => cmd_catalog(&catalogs, json),
        Commands::Session { action } => match action {
            SessionCommands::New {
                path,
                name,
                aircraft,
                fiber,
                matrix,
                vf,
                vvoid,
                preset_materials,
                overrides,
                user,
            } => {
                let inputs = RootInputs {
                    aircraft,
                    fiber,
                    matrix,
                    vf,
                    vvoid,
                    overrides: overrides.into(),
                };
                cmd_session_new(&catalogs, &path, name, inputs, preset_materials, user)
            }
            SessionCommands::Show { path, json } => cmd_session_show(&catalogs, &path, json),
        },
    }
}

/// Material and preset catalogs for this invocation.
struct Catalogs {
    materials: Arc<MaterialCatalog>,
    presets: Arc<PresetCatalog>,
}

impl Catalogs {
    fn load(materials: Option<&Path>, presets: Option<&Path>) -> CalcResult<Self> {
        let materials = match materials {
            Some(path) => MaterialCatalog::from_path(path)?,
            None => MaterialCatalog::builtin()?.clone(),
        };
        let presets = match presets {
            Some(path) => PresetCatalog::from_path(path)?,
            None => PresetCatalog::builtin()?.clone(),
        };
        Ok(Catalogs {
            materials: Arc::new(materials),
            presets: Arc::new(presets),
        })
    }

    fn graph(&self, inputs: RootInputs) -> CalcResult<ParameterGraph> {
        ParameterGraph::new(self.materials.clone(), self.presets.clone(), inputs)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_properties(json: bool) -> CalcResult<()> {
    if json {
        let listing: Vec<render::PropertyListing> = list_properties()
            .into_iter()
            .map(render::PropertyListing::for_key)
            .collect::<CalcResult<_>>()?;
        return print_json(&listing);
    }
    render::properties();
    Ok(())
}

fn cmd_evaluate(catalogs: &Catalogs, args: EvaluateArgs) -> CalcResult<()> {
    let fiber = catalogs.materials.resolve_fiber(&args.fiber)?;
    let matrix = catalogs.materials.resolve_matrix(&args.matrix)?;
    let vm = args.fractions().vm();
    tracing::info!(fiber = %fiber.name, matrix = %matrix.name, vf = args.vf, vm, "evaluating");

    match (args.property.as_deref(), args.theory.as_deref()) {
        (Some(key), Some(theory)) => {
            let property = Property::from_key(key)?;
            let theory = Theory::from_key(key, theory)?;
            let value = evaluate_one(property, theory, fiber, matrix, args.vf, vm)?;
            if args.json {
                print_json(&SelectedValue { property, theory, value })
            } else {
                println!("{} [{}] = {}", property, theory, render::number(value));
                Ok(())
            }
        }
        (Some(property), None) => {
            let property = Property::from_key(property)?;
            let results = evaluate_property(property, fiber, matrix, args.vf, vm);
            if args.json {
                print_json(&results)
            } else {
                render::property_results(property, &results);
                Ok(())
            }
        }
        _ => {
            let table = evaluate_all(fiber, matrix, args.vf, vm);
            let selected = table.select(&TheorySelection::default())?;
            if args.json {
                print_json(&serde_json::json!({ "results": table, "design_values": selected }))
            } else {
                let title = format!("{}/{}, Vf={:.2}, Vm={:.3}", fiber.name, matrix.name, args.vf, vm);
                render::results_table(&title, &table, &selected);
                Ok(())
            }
        }
    }
}

fn cmd_wing(catalogs: &Catalogs, args: WingArgs) -> CalcResult<()> {
    let inputs = RootInputs {
        aircraft: args.aircraft,
        overrides: args.overrides.into(),
        ..RootInputs::default()
    };
    let graph = catalogs.graph(inputs)?;

    if args.json {
        return print_json(&serde_json::json!({
            "aircraft": graph.inputs().aircraft,
            "preset": graph.preset_wing(),
            "overrides": graph.inputs().overrides,
            "effective": graph.effective_wing(),
        }));
    }
    render::wing(&graph);
    Ok(())
}

fn cmd_catalog(catalogs: &Catalogs, json: bool) -> CalcResult<()> {
    if json {
        return print_json(&serde_json::json!({
            "fibers": catalogs.materials.fibers(),
            "matrices": catalogs.materials.matrices(),
            "presets": catalogs.presets.presets(),
            "projects": catalogs.presets.projects(),
        }));
    }
    render::catalog(&catalogs.materials, &catalogs.presets);
    Ok(())
}

fn cmd_session_new(
    catalogs: &Catalogs,
    path: &Path,
    name: String,
    inputs: RootInputs,
    preset_materials: bool,
    user: Option<String>,
) -> CalcResult<()> {
    let user = user
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "compwing".to_string());
    let mut graph = catalogs.graph(inputs.clone())?;
    if preset_materials && !graph.apply_preset_materials()? {
        tracing::warn!(aircraft = %inputs.aircraft, "preset has no material defaults, keeping inputs");
    }

    let mut session = Session::with_inputs(name, inputs);
    session.capture(&graph);

    let _lock = FileLock::acquire(path, user)?;
    save_session(&session, path)?;

    println!("Created session '{}' at {}", session.meta.name, path.display());
    println!("  {}", graph.composite().name);
    Ok(())
}

fn cmd_session_show(catalogs: &Catalogs, path: &Path, json: bool) -> CalcResult<()> {
    let (session, lock) = load_session_with_lock_check(path)?;
    let graph = session.open(catalogs.materials.clone(), catalogs.presets.clone())?;
    let design_values = session.design_values(&graph)?;

    if json {
        return print_json(&serde_json::json!({
            "session": session,
            "locked_by": lock,
            "derived": graph.state(),
            "design_values": design_values,
        }));
    }
    render::session(&session, lock.as_ref(), &graph, &design_values);
    Ok(())
}
