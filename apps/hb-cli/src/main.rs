use clap::{Parser, Subcommand};
use hb_app::{AppResult, project_service, run_service, unit_catalog};
use hb_project::{Defaults, PlantGraph, RunCase};
use hb_results::{PlantResult, ResultsError, write_result};
use hb_solver::SolverError;
use hb_units::UnitRegistry;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "hb-cli")]
#[command(about = "Heat balance CLI - Combined-cycle plant steady-state solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a plant document and show its evaluation order
    Validate {
        /// Path to the plant JSON or YAML file
        plant_path: PathBuf,
        /// Run case to validate alongside the plant
        #[arg(long)]
        run_case: Option<PathBuf>,
    },
    /// Solve a plant once
    Simulate {
        /// Path to the plant JSON or YAML file
        plant_path: PathBuf,
        /// Path to the run case file
        run_case: PathBuf,
        /// Write the full result JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Optimize a plant within the run case bounds
    Optimize {
        /// Path to the plant JSON or YAML file
        plant_path: PathBuf,
        /// Path to the run case file
        run_case: PathBuf,
        /// Write the full result JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List registered unit types with their ports and parameters
    Units,
    /// Print the defaults table in effect
    Defaults {
        /// Load this asset instead of the discovered one
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Validate {
            plant_path,
            run_case,
        } => cmd_validate(&plant_path, run_case.as_deref()),
        Commands::Simulate {
            plant_path,
            run_case,
            output,
        } => cmd_simulate(&plant_path, &run_case, output.as_deref()),
        Commands::Optimize {
            plant_path,
            run_case,
            output,
        } => cmd_optimize(&plant_path, &run_case, output.as_deref()),
        Commands::Units => cmd_units(),
        Commands::Defaults { path } => cmd_defaults(path.as_deref()),
    };

    if let Err(err) = outcome {
        eprintln!("error [{}]: {}", err.status_code(), err);
        std::process::exit(1);
    }
}

fn cmd_validate(plant_path: &Path, run_case_path: Option<&Path>) -> AppResult<()> {
    println!("Validating plant: {}", plant_path.display());
    let plant = project_service::load_plant(plant_path)?;
    let run_case = run_case_path.map(project_service::load_run_case).transpose()?;
    let registry = registry()?;

    let summary = project_service::validate(&plant, run_case.as_ref(), registry)?;
    println!("✓ Plant is valid");
    println!("  Units: {}", summary.units);
    println!("  Streams: {}", summary.streams);
    println!("  Order: {}", summary.order.join(" -> "));
    if summary.recycle_streams.is_empty() {
        println!("  Recycle streams: none");
    } else {
        println!("  Recycle streams:");
        for stream in &summary.recycle_streams {
            println!("    {}", stream);
        }
    }
    Ok(())
}

fn cmd_simulate(plant_path: &Path, run_case_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let (plant, run_case) = load_inputs(plant_path, run_case_path)?;
    let result = run_service::simulate(&plant, &run_case)?;
    emit_result(&result, output)
}

fn cmd_optimize(plant_path: &Path, run_case_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let (plant, run_case) = load_inputs(plant_path, run_case_path)?;
    let result = run_service::optimize(&plant, &run_case)?;
    emit_result(&result, output)
}

fn cmd_units() -> AppResult<()> {
    print_json(&unit_catalog(registry()?))
}

fn cmd_defaults(path: Option<&Path>) -> AppResult<()> {
    match path {
        Some(p) => print_json(&Defaults::load(p)?),
        None => print_json(Defaults::global()),
    }
}

fn registry() -> AppResult<&'static UnitRegistry> {
    Ok(UnitRegistry::global().map_err(SolverError::Registry)?)
}

fn load_inputs(plant_path: &Path, run_case_path: &Path) -> AppResult<(PlantGraph, RunCase)> {
    let plant = project_service::load_plant(plant_path)?;
    let run_case = project_service::load_run_case(run_case_path)?;
    Ok((plant, run_case))
}

/// Full result to `output` (or stdout), headline figures to stderr.
fn emit_result(result: &PlantResult, output: Option<&Path>) -> AppResult<()> {
    let s = &result.summary;
    eprintln!(
        "✓ NET {:.2} MW (GT {:.2}, ST {:.2}, AUX {:.2}), efficiency {:.2}% LHV",
        s.net_power_mw, s.gt_power_mw, s.st_power_mw, s.aux_load_mw, s.net_eff_lhv_pct
    );
    let balance = &result.mass_energy_balance;
    eprintln!(
        "  Converged: {} after {} iteration(s), closure {:.4}%",
        balance.converged, balance.iterations, balance.closure_error_pct
    );
    for violation in &result.violations {
        eprintln!("  ! {}", violation);
    }

    match output {
        Some(path) => {
            write_result(path, result)?;
            info!(path = %path.display(), "result written");
            Ok(())
        }
        None => print_json(result),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(ResultsError::from)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use hb_app::AppError;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simulate_takes_optional_output() {
        let cli = Cli::try_parse_from(["hb-cli", "simulate", "plant.json", "case.json", "-o", "out.json"]).unwrap();
        match cli.command {
            Commands::Simulate { output, .. } => assert_eq!(output, Some(PathBuf::from("out.json"))),
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn missing_plant_is_not_found() {
        let err = cmd_validate(Path::new("does/not/exist.json"), None).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
