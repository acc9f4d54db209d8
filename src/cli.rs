use std::path::PathBuf;

use clap::Parser;

/// Evaluate an off-grid solar design for electrical compatibility.
#[derive(Debug, Parser)]
#[command(name = "offgrid-planner", author, version, about, long_about = None)]
pub struct CliOptions {
    /// Load the system from a JSON project file.
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub project: Option<PathBuf>,

    /// Use a built-in preset (cabin, van, empty).
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the project's assumptions with a TOML file.
    #[arg(long, value_name = "PATH")]
    pub assumptions: Option<PathBuf>,

    /// Print the evaluation as JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Group diagnostics by severity instead of rule order.
    #[arg(long, default_value_t = false)]
    pub group: bool,

    /// Export statistics to CSV.
    #[arg(long, value_name = "PATH")]
    pub stats_out: Option<PathBuf>,

    /// Export diagnostics to CSV.
    #[arg(long, value_name = "PATH")]
    pub diagnostics_out: Option<PathBuf>,

    /// Write the loaded project back out as JSON.
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

impl CliOptions {
    /// Preset used when neither a project nor a preset is given.
    pub const DEFAULT_PRESET: &'static str = "cabin";

    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(Self::DEFAULT_PRESET)
    }
}
