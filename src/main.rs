use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use casgrid::cache::SolveCache;
use casgrid::interfaces::cli::{log_configuration, log_heading, Cli};
use casgrid::interfaces::input::ServerConfig;
use casgrid::interfaces::web::{build_router, AppState};
use casgrid::presets::PresetRegistry;
use casgrid::solver::minimal::MinimalBasisSolver;
use casgrid::solver::OrbitalSolver;

/// Initialises logging: plain main-output lines on the `casgrid-output` logger and
/// timestamped diagnostics everywhere else, both to the console.
fn init_logging(verbose: u8) -> Result<(), anyhow::Error> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let output = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();
    let diagnostics = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "[{d(%Y-%m-%d %H:%M:%S)} {l}] {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("output", Box::new(output)))
        .appender(Appender::builder().build("diagnostics", Box::new(diagnostics)))
        .logger(
            Logger::builder()
                .appender("output")
                .additive(false)
                .build("casgrid-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("diagnostics").build(level))
        .with_context(|| "Unable to construct the logging configuration.")?;
    log4rs::init_config(config).with_context(|| "Unable to initialise logging.")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    log_heading();

    let mut config = match cli.config.as_ref() {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    let registry = Arc::new(PresetRegistry::standard());
    log_configuration(&config, &registry);
    let solver = Arc::new(MinimalBasisSolver::new()) as Arc<dyn OrbitalSolver>;
    let cache = SolveCache::new(
        Arc::clone(&registry),
        solver,
        config.solver_timeout_secs.map(Duration::from_secs),
    );
    let router = build_router(AppState {
        cache,
        defaults: config.render.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Unable to bind to `{}`.", config.bind))?;
    log::info!(
        "Serving {} molecule presets on {}.",
        registry.len(),
        config.bind
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "The server terminated abnormally.")?;
    log::info!("Server shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Unable to listen for the shutdown signal: {err}");
    }
}
