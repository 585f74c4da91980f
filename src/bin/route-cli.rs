//! Management CLI for the task router.
//!
//! Inspects a routing configuration the way the publish path would use it:
//! `check` validates, `resolve` prints the destination for one task dispatch,
//! `watch` keeps rebuilding the routing table as the file changes.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use task_router::config::{load_config, ConfigWatcher};
use task_router::observability::init_logging;
use task_router::routing::{PolicyRegistry, Router, RouterHandle};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and exercise task routing configuration", long_about = None)]
struct Cli {
    /// Path to the routing configuration file.
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the configuration
    Check,
    /// Resolve a task name to its broker destination
    Resolve {
        /// Task identifier, e.g. "tasks.video.encode"
        task: String,

        /// Publish option as key=value; the value is parsed as JSON when it
        /// is valid JSON, else taken as a string. Repeatable.
        #[arg(short, long)]
        option: Vec<String>,
    },
    /// Watch the configuration file and rebuild the routing table on change
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability.log_level);
    tracing::info!(
        config = %cli.config.display(),
        queues = config.queues.len(),
        routes = config.routes.len(),
        "Configuration loaded"
    );

    // The CLI registers no policies, so configs using references fail fast
    // here with the unknown-reference error.
    let policies = PolicyRegistry::new();

    match cli.command {
        Commands::Check => {
            Router::from_config(&config, &policies)?;
            println!("{} OK", cli.config.display());
        }
        Commands::Resolve { task, option } => {
            let router = Router::from_config(&config, &policies)?;
            let options = parse_options(&option)?;
            let destination = router.route(options, &task, &[], &Map::new())?;
            println!("{}", serde_json::to_string_pretty(&Value::Object(destination))?);
        }
        Commands::Watch => {
            let handle = RouterHandle::new(Router::from_config(&config, &policies)?);
            let (watcher, mut updates) = ConfigWatcher::new(&cli.config);
            let _watcher = watcher.run()?;

            loop {
                tokio::select! {
                    Some(new_config) = updates.recv() => {
                        match Router::from_config(&new_config, &policies) {
                            Ok(router) => handle.install(router),
                            Err(e) => {
                                tracing::error!("Rejected new routing table: {}", e);
                            }
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutting down watcher");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn parse_options(pairs: &[String]) -> Result<Map<String, Value>, String> {
    let mut options = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("option {:?} is not key=value", pair))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        options.insert(key.to_string(), value);
    }
    Ok(options)
}
