//! Branch CLI - Command-line interface for the Branch deep-link API.
//!
//! Creates, inspects, and updates deep links from the terminal. Credentials
//! come from the TOML config file and can be overridden per invocation.

mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use branch_api::CancellationToken;
use branch_core::config::AppConfig;
use branch_core::error::BranchResult;
use branch_core::logging;
use branch_core::platform::Platform;

/// Branch deep-link manager.
#[derive(Parser)]
#[command(
    name = "branch",
    version,
    about = "Create, read, and update Branch deep links",
    long_about = "A command-line interface for the Branch deep-link API.\n\
                   Credentials are read from the config file unless given with --key / --secret."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Branch access key (overrides config).
    #[arg(long, global = true)]
    key: Option<String>,

    /// Branch access secret (overrides config).
    #[arg(long, global = true)]
    secret: Option<String>,

    /// API base URL (overrides config).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a deep link and print its URL.
    Create {
        #[command(flatten)]
        link: commands::LinkArgs,

        /// Output format (text, json).
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show an existing deep link.
    Get {
        /// The deep link to look up.
        url: String,
    },
    /// Update an existing deep link.
    Update {
        /// The deep link to update.
        url: String,
        #[command(flatten)]
        link: commands::LinkArgs,
    },
    /// Write the effective credentials to the config file.
    Configure,
}

#[tokio::main]
async fn main() -> BranchResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let (config_path, mut config) = match cli.config.clone() {
        Some(path) => {
            let config = load_config(&path)?;
            (path, config)
        }
        None => (AppConfig::default_config_path()?, AppConfig::load_default()?),
    };
    if let Some(key) = cli.key.clone() {
        config.branch.branch_key = key;
    }
    if let Some(secret) = cli.secret.clone() {
        config.branch.branch_secret = secret;
    }
    if let Some(api_url) = cli.api_url.as_deref() {
        config.branch.api_url = AppConfig::sanitize_api_url(api_url)?;
    }

    // Initialize logging
    let log_level = if cli.verbose { "debug".to_string() } else { config.logging.level.clone() };
    let log_dir = config.effective_log_dir()?;
    let _guard = logging::init_logging(&log_level, &log_dir, config.logging.json_output)?;

    info!(
        "Branch CLI v{} on {}",
        branch_core::constants::APP_VERSION,
        Platform::current()
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Create { link, format } => {
            commands::create::run(&config, &cancel, link, format).await
        }
        Commands::Get { url } => {
            commands::get::run(&config, &cancel, &url).await
        }
        Commands::Update { url, link } => {
            commands::update::run(&config, &cancel, &url, link).await
        }
        Commands::Configure => commands::configure::run(&config, &config_path),
    }
}

/// Load the config file if it exists, defaults otherwise.
fn load_config(path: &Path) -> BranchResult<AppConfig> {
    if path.exists() {
        AppConfig::load_from_file(path)
    } else {
        Ok(AppConfig::default())
    }
}
