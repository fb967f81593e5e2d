//! Main entry point for the Superset configuration resolver
//!
//! Resolves the deployment configuration once, logs a redacted summary and
//! prints the result for the hosting application to consume.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use superset_config::config::{
    validate_config, DeploymentConfig, OutputFormat, ProcessEnv, SecretStore, DEFAULT_SECRETS_DIR,
};
use tracing::{error, info};

/// Superset Config - resolve database and Celery settings
#[derive(Parser)]
#[command(
    name = "superset-config",
    version,
    about = "Resolve Superset database and Celery broker settings from the environment",
    long_about = "Reads DB_HOST, DB_PORT, DB_NAME, REDIS_HOST and REDIS_PORT from the environment \
                 and the database credentials from mounted secret files, then prints the \
                 SQLAlchemy URI and Celery configuration."
)]
struct Args {
    /// Secrets root directory
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_SECRETS_DIR,
        help = "Directory secrets are mounted under"
    )]
    secrets_dir: PathBuf,

    /// Output format
    #[arg(
        short,
        long,
        value_name = "FORMAT",
        default_value = "json",
        help = "Output format (json, toml, env)"
    )]
    format: OutputFormat,

    /// Print credentials unmasked
    #[arg(long, help = "Include the database password in the output")]
    reveal_secrets: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Resolve and validate configuration without printing it")]
    dry_run: bool,
}

/// Initialize structured logging on stderr so stdout carries only the output
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Log resolved settings with credentials masked
fn display_summary(config: &DeploymentConfig) {
    info!("Superset deployment configuration");
    info!("   Database: {}", config.redacted_database_uri());
    info!("   Broker: {}", config.task_queue.broker_url);
    info!("   Result backend: {}", config.task_queue.result_backend);
    info!("   Imports: {}", config.task_queue.imports.join(", "));
    for (task, limit) in config.task_queue.rate_limits() {
        info!("   Rate limit: {} = {}", task, limit);
    }
    info!("   Task protocol: {}", config.task_queue.task_protocol);
}

fn run(args: &Args) -> Result<()> {
    let secrets = SecretStore::new(args.secrets_dir.clone());
    let config = DeploymentConfig::resolve(&ProcessEnv, &secrets)?;
    validate_config(&config)?;

    display_summary(&config);

    if args.dry_run {
        info!("Dry run completed - configuration is valid");
        return Ok(());
    }

    let output = if args.reveal_secrets {
        config.render(args.format)?
    } else {
        config.redacted().render(args.format)?
    };
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { args.log_level.as_str() };
    if let Err(e) = init_logging(log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }
}
