//! Off-grid planner entry point: load a system, evaluate it, report.

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use offgrid_planner::config::SystemInputs;
use offgrid_planner::engine::Evaluation;
use offgrid_planner::engine::message::group_by_severity;
use offgrid_planner::io::export::{export_diagnostics_csv, export_stats_csv};
use offgrid_planner::model::SystemModel;
use offgrid_planner::presets;
use offgrid_planner::project::ProjectFile;

use cli::CliOptions;

fn main() {
    env_logger::Builder::from_default_env()
        .format_target(false)
        .format_timestamp(None)
        .init();

    let opts = CliOptions::parse();
    if let Err(err) = run(&opts) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn load_model(opts: &CliOptions) -> Result<SystemModel> {
    let project = match &opts.project {
        Some(path) => ProjectFile::from_json_file(path)?,
        None => presets::from_preset(opts.preset_name())?,
    };
    let mut model = SystemModel::from_project(project);

    if let Some(path) = &opts.assumptions {
        let inputs = SystemInputs::from_toml_file(path)?;
        model.set_inputs(inputs);
    }

    let errors = model.inputs().validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        anyhow::bail!("{} invalid assumption(s)", errors.len());
    }
    Ok(model)
}

fn run(opts: &CliOptions) -> Result<()> {
    let model = load_model(opts)?;
    log::info!(
        "evaluating {} component(s) at {} V",
        model.len(),
        model.inputs().system_wide_voltage
    );
    let eval = model.evaluate();

    if opts.json {
        let body = serde_json::to_string_pretty(&eval).context("serializing evaluation")?;
        println!("{body}");
    } else {
        print_report(&eval, opts.group);
    }

    if let Some(path) = &opts.stats_out {
        export_stats_csv(&eval.stats, path)
            .with_context(|| format!("writing statistics to {}", path.display()))?;
        eprintln!("Statistics exported to {}", path.display());
    }
    if let Some(path) = &opts.diagnostics_out {
        export_diagnostics_csv(&eval.messages, path)
            .with_context(|| format!("writing diagnostics to {}", path.display()))?;
        eprintln!("Diagnostics exported to {}", path.display());
    }
    if let Some(path) = &opts.save {
        model.to_project().write_json_file(path)?;
        eprintln!("Project saved to {}", path.display());
    }
    Ok(())
}

fn print_report(eval: &Evaluation, grouped: bool) {
    println!("{}", eval.stats);
    println!();
    println!("--- Diagnostics ---");
    if grouped {
        for (severity, messages) in group_by_severity(&eval.messages) {
            println!("{severity:?}:");
            for m in messages {
                println!("  {m}");
            }
        }
    } else {
        for m in &eval.messages {
            println!("{m}");
        }
    }
    println!();
    println!("{}", eval.cost);
}
