mod cli;
mod session;
mod surface;

use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use offpaint_common::{ConfigError, EventBus, OffpaintError};
use offpaint_config::schema::OffpaintConfig;
use tracing_subscriber::EnvFilter;

use session::Session;

const DEFAULT_DIRECTIVE: &str = "offpaint=info";

fn load_config(args: &cli::Args) -> Result<OffpaintConfig, ConfigError> {
    match &args.config {
        Some(path) => offpaint_config::load_config_from(Path::new(path)),
        None => offpaint_config::load_config(),
    }
}

/// `--log-level` wins over the config file, which wins over the default.
fn log_directive(args: &cli::Args, config: Option<&OffpaintConfig>) -> String {
    args.log_level
        .clone()
        .or_else(|| config.map(|c| c.logging.level.directive().to_string()))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

fn env_filter(directive: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match directive.parse().or_else(|_| DEFAULT_DIRECTIVE.parse()) {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn run(config: &OffpaintConfig) -> Result<(), OffpaintError> {
    let events = Rc::new(EventBus::default());
    let mut lifecycle = events.subscribe();

    let mut session = Session::new(config, Rc::clone(&events))?;
    let summary = session.run(config.demo.frames);
    session.shutdown();

    while let Ok(event) = lifecycle.try_recv() {
        tracing::debug!(?event, "host event");
    }

    let summary = summary?;
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!("Failed to serialize session summary: {e}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config is read before logging starts since it may set the level.
    let loaded = load_config(&args);
    let directive = log_directive(&args, loaded.as_ref().ok());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&directive))
        .init();

    tracing::info!("offpaint v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => {
            if let Some(ref path) = args.config {
                tracing::info!("Using config override: {path}");
            }
            config
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            OffpaintConfig::default()
        }
    };
    if let Some(frames) = args.frames {
        config.demo.frames = frames;
    }

    if args.dump_config {
        println!("{}", offpaint_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    match run(&config) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Session failed: {e}");
            ExitCode::FAILURE
        }
    }
}
