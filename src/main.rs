//! Context Zones CLI
//!
//! Detects the zone of a directory, prints its instructions, or serves
//! zone tools over MCP.

use clap::Parser;
use context_zones::{
    config::{AppConfig, LogFormat, load_config},
    content::ContentLoader,
    init::{HOOK_SCRIPT, init_user_config},
    metrics::UsageLog,
    render::{
        OutputMode, render_metrics, render_summary, render_zone_list, render_zone_names_json,
    },
    server::ZoneMcpHandler,
    transport::run_stdio,
    zones::ZoneResolver,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Context Zones - behavioral context detection by working directory
#[derive(Parser, Debug)]
#[command(name = "context-zones")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to check (defaults to the current directory)
    path: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Output only the zone name
    #[arg(long)]
    zone_only: bool,

    /// Output the zone's instructions
    #[arg(long)]
    config: bool,

    /// Include inherited zone instructions (with --config)
    #[arg(long)]
    with_inheritance: bool,

    /// Record this detection in the usage history
    #[arg(long)]
    log: bool,

    /// Show usage metrics
    #[arg(long)]
    metrics: bool,

    /// List available zones
    #[arg(long)]
    list_zones: bool,

    /// Create an example registry and hook under ~/.claude
    #[arg(long)]
    init: bool,

    /// Print the session-start hook script
    #[arg(long)]
    hook: bool,

    /// Run as an MCP server over stdio
    #[arg(long)]
    serve: bool,

    /// Path to the settings file
    #[arg(long, env = "CONTEXT_ZONES_CONFIG")]
    settings: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CONTEXT_ZONES_LOG_LEVEL")]
    log_level: Option<String>,
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

/// Absolute target path; relative arguments are joined onto `cwd`
fn target_path(arg: Option<&Path>, cwd: &Path) -> PathBuf {
    match arg {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd.to_path_buf(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Settings are loaded before logging so the configured level applies
    let loaded = load_config(args.settings.as_deref());
    let defaults = AppConfig::default();
    let (level, format) = match &loaded {
        Ok(config) => (config.logging.level.clone(), config.logging.format),
        Err(_) => (defaults.logging.level.clone(), defaults.logging.format),
    };
    init_logging(args.log_level.as_deref().unwrap_or(&level), format);

    let config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load settings, using defaults");
        defaults
    });

    let cwd = std::env::current_dir()
        .inspect_err(|e| error!(error = %e, "Cannot determine current directory"))?;

    if args.serve {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            "Starting context zones MCP server"
        );
        return run_stdio(ZoneMcpHandler::new(config, cwd)).await;
    }

    if args.hook {
        print!("{}", HOOK_SCRIPT);
        return Ok(());
    }

    if args.init {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("No home directory"))?;
        let report = init_user_config(&home.join(".claude"))
            .inspect_err(|e| error!(error = %e, "Initialization failed"))?;
        println!("{}", report.message());
        return Ok(());
    }

    if args.metrics {
        let summary = UsageLog::from_config(&config.metrics).summary();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", render_metrics(&summary));
        }
        return Ok(());
    }

    // Registry problems are logged by the loader and never stop resolution
    let resolver = ZoneResolver::from_config(&config);

    if args.list_zones {
        if args.json {
            println!("{}", render_zone_names_json(resolver.registry())?);
        } else {
            print!("{}", render_zone_list(resolver.registry()));
        }
        return Ok(());
    }

    let target = target_path(args.path.as_deref(), &cwd);
    let resolved = resolver.resolve(&target);

    if args.log && config.metrics.enabled {
        UsageLog::from_config(&config.metrics).record(&resolved.zone, &resolved.path);
    }

    let mode = OutputMode::from_flags(
        args.zone_only,
        args.config,
        args.with_inheritance,
        args.json,
    );
    match mode {
        OutputMode::ZoneOnly => println!("{}", resolved.zone),
        OutputMode::Config { with_inheritance } => {
            let content = ContentLoader::from_config(&config);
            if with_inheritance {
                println!(
                    "{}",
                    content.load_inherited(&resolved.zone, resolver.registry())
                );
            } else {
                println!("{}", content.load(&resolved.config));
            }
        }
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputMode::Summary => print!(
            "{}",
            render_summary(&resolved, &config.overrides.file_name)
        ),
    }

    Ok(())
}
