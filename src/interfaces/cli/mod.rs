use std::path::PathBuf;

use clap::Parser;

use crate::interfaces::input::ServerConfig;
use crate::io::format::{casgrid_output, log_title};
use crate::presets::PresetRegistry;

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs the server heading to the `casgrid-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    casgrid_output!("╭──────────────────────────────────────────────────────╮");
    casgrid_output!("│ casgrid — natural-orbital grid server        {version:>7} │");
    casgrid_output!("╰──────────────────────────────────────────────────────╯");
    casgrid_output!("");
}

/// Logs the effective server configuration to the `casgrid-output` logger.
pub fn log_configuration(config: &ServerConfig, registry: &PresetRegistry) {
    log_title("Server configuration");
    casgrid_output!("");
    casgrid_output!("Bind address: {}", config.bind);
    match config.solver_timeout_secs {
        Some(secs) => casgrid_output!("Solver budget: {secs} s"),
        None => casgrid_output!("Solver budget: unlimited"),
    }
    casgrid_output!("Default grid size: {}", config.render.grid_size);
    casgrid_output!("Default batch grid size: {}", config.render.batch_grid_size);
    casgrid_output!("Default margin: {} Å", config.render.margin);
    casgrid_output!("Default molecule: {}", config.render.molecule);
    casgrid_output!(
        "Molecule presets: {}",
        registry
            .iter()
            .map(|preset| preset.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    casgrid_output!("");
}

/// Command-line arguments of the `casgrid` server binary.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML configuration file; built-in defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Socket address to bind, overriding the configuration file.
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Use verbose output. May be specified twice for 'very verbose'.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
