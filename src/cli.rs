//! Command-line argument parsing for the simulator

use clap::Parser;
use std::path::PathBuf;

use crate::config::SimConfig;
use crate::keymap::Layer;

/// Play a scripted session on the stratokeister guitar keyboard
#[derive(Parser, Debug)]
#[command(
    name = "stratokeister",
    version,
    about = "Play a scripted session on the stratokeister guitar keyboard"
)]
pub struct CliArgs {
    /// Script of switch and encoder events (YAML)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Wiring file applied on top of the defaults
    #[arg(long, value_name = "FILE")]
    pub wiring: Option<PathBuf>,

    /// Print one JSON object per step
    #[arg(long)]
    pub json: bool,

    /// Layer to move to before the first step (e.g. normal, tone2)
    #[arg(long, value_name = "NAME")]
    pub layer: Option<String>,

    /// Log every raw switch transition
    #[arg(long)]
    pub trace_matrix: bool,
}

/// Configuration derived from CLI arguments and saved preferences
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub script: PathBuf,
    pub wiring: Option<PathBuf>,
    pub json: bool,
    pub sim: SimConfig,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    ///
    /// Flags override the matching fields of `sim`.
    pub fn into_config(self, mut sim: SimConfig) -> Result<RunConfig, String> {
        if let Some(name) = &self.layer {
            sim.start_layer = name.parse::<Layer>()?;
        }
        if self.trace_matrix {
            sim.trace_matrix = true;
        }

        Ok(RunConfig {
            script: self.script,
            wiring: self.wiring,
            json: self.json,
            sim,
        })
    }
}
