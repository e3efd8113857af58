//! # Queue Browser CLI
//!
//! Command-line front end for bounded, filtered message browsing.
//!
//! This module provides CLI commands for:
//! - Browsing a queue snapshot with a result cap or identifier filters
//! - Validating and printing the resolved configuration

use clap::{Parser, Subcommand};
use queue_browser_core::{
    BoundedMessageBrowser, BrowseError, BrowserConfig, ConfigurationError, ErrorDescriptor,
    InMemoryMessageSource, RetrievalRequest, RetrievalResult, ValidationError,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod output;
pub mod snapshot;

use snapshot::{Snapshot, SnapshotError};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

// ============================================================================
// CLI Structure
// ============================================================================

/// Queue Browser - bounded, filtered message retrieval
#[derive(Parser, Debug)]
#[command(name = "queue-browser")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bounded, filtered message browsing")]
#[command(
    long_about = "Queue Browser retrieves up to N messages from a queue, or a single message matching a message or correlation identifier"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QUEUE_BROWSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level, overrides the configured level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve messages from a queue snapshot
    Browse(BrowseArgs),

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Output format for configuration
        #[arg(short = 'f', long, default_value = "yaml")]
        format: ConfigFormat,
    },
}

/// Arguments for the browse command
#[derive(clap::Args, Debug, Clone)]
pub struct BrowseArgs {
    /// JSON snapshot file used to seed the in-memory source
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Queue to read from
    #[arg(short, long)]
    pub queue: String,

    /// Message identifier to match, in hex
    #[arg(short, long)]
    pub message_id: Option<String>,

    /// Correlation identifier to match, in hex
    #[arg(short = 'C', long)]
    pub correlation_id: Option<String>,

    /// Maximum number of messages to return (1-100)
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub limit: Option<i64>,

    /// Apply identifier filters together with the limit
    #[arg(long)]
    pub combine: bool,

    /// Bound on each read, in milliseconds
    #[arg(long)]
    pub wait_interval_ms: Option<u64>,

    /// Output format, defaults to the configured format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// Output format options
#[derive(
    Clone, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Text with payloads as hex dumps
    Hexdump,
}

/// Configuration format options
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
    /// TOML format
    Toml,
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Command failed: {message}")]
    CommandFailed { message: String },

    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Retrieval failed: {error}")]
    RetrievalFailed { error: ErrorDescriptor },
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::CommandFailed { .. } => 3,
            Self::InvalidArgument { .. } => 4,
            Self::Snapshot(_) => 5,
            Self::RetrievalFailed { .. } => 6,
        }
    }
}

impl From<BrowseError> for CliError {
    fn from(error: BrowseError) -> Self {
        match error {
            BrowseError::InvalidArgument(validation) => {
                let arg = match &validation {
                    ValidationError::Required { field }
                    | ValidationError::InvalidFormat { field, .. }
                    | ValidationError::OutOfRange { field, .. } => field.clone(),
                };
                Self::InvalidArgument {
                    arg,
                    message: validation.to_string(),
                }
            }
            BrowseError::Configuration(config) => Self::Configuration(ConfigError::Browser(config)),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid browser configuration: {0}")]
    Browser(#[from] ConfigurationError),

    #[error("Failed to render configuration: {message}")]
    Render { message: String },
}

// ============================================================================
// Configuration Types
// ============================================================================

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CliConfig {
    /// Retrieval settings
    pub browser: BrowserConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Log format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum LogFormat {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    pub default_format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
        }
    }
}

impl CliConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.browser.validate()?;
        Ok(())
    }

    /// Render the configuration in the requested format
    pub fn render(&self, format: &ConfigFormat) -> Result<String, ConfigError> {
        let rendered = match format {
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| ConfigError::Render { message })
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

pub async fn run_cli() -> Result<(), CliError> {
    run(Cli::parse()).await
}

/// Execute an already parsed command line
pub async fn run(cli: Cli) -> Result<(), CliError> {
    // Configuration comes first so its logging section can take effect
    let config = load_configuration(cli.config.as_deref())?;

    initialize_logging(&cli, &config.logging);

    match cli.command {
        Commands::Browse(args) => execute_browse_command(&args, &config).await,
        Commands::Config { show, format } => execute_config_command(show, format, &config),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` wins over both the command line and the configuration.
pub fn initialize_logging(cli: &Cli, logging: &LoggingConfig) {
    let level = cli.log_level.as_deref().unwrap_or(&logging.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);

    // A subscriber may already be installed when running inside tests
    let result = if cli.json_logs || logging.format == LogFormat::Json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Load configuration
///
/// Sources, later ones overriding earlier ones:
///  1. `config/queue-browser.{toml,yaml,json}` when present
///  2. The explicit configuration file, which must exist
///  3. Environment variables prefixed `QB__`, e.g.
///     `QB__BROWSER__WAIT_INTERVAL_MS=250`
pub fn load_configuration(config_path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::with_name("config/queue-browser").required(false));

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let config: CliConfig = builder
        .add_source(
            config::Environment::with_prefix("QB")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}

/// Build the browser configuration for one browse invocation
pub fn browser_config_for(args: &BrowseArgs, config: &CliConfig) -> BrowserConfig {
    let mut browser = config.browser.clone();
    if let Some(wait_interval_ms) = args.wait_interval_ms {
        browser = browser.with_wait_interval_ms(wait_interval_ms);
    }
    if args.combine {
        browser = browser.with_combine_limit_and_filter(true);
    }
    browser
}

/// Build the retrieval request described by the browse arguments
pub fn request_for(args: &BrowseArgs) -> RetrievalRequest {
    let mut request = RetrievalRequest::new(args.queue.clone());
    if let Some(ref message_id) = args.message_id {
        request = request.with_message_id(message_id.as_str());
    }
    if let Some(ref correlation_id) = args.correlation_id {
        request = request.with_correlation_id(correlation_id.as_str());
    }
    if let Some(limit) = args.limit {
        request = request.with_limit(limit);
    }
    request
}

/// Seed an in-memory source from the snapshot and run one retrieval
pub async fn browse_snapshot(
    args: &BrowseArgs,
    config: &CliConfig,
) -> Result<RetrievalResult, CliError> {
    let browser = BoundedMessageBrowser::new(browser_config_for(args, config))?;

    let snapshot = Snapshot::load(&args.snapshot)?;
    let source = InMemoryMessageSource::new();
    snapshot.seed(&source)?;

    let result = browser.retrieve(&source, &request_for(args)).await?;
    Ok(result)
}

async fn execute_browse_command(args: &BrowseArgs, config: &CliConfig) -> Result<(), CliError> {
    info!(
        snapshot = %args.snapshot.display(),
        queue = %args.queue,
        limit = ?args.limit,
        "Processing browse command"
    );

    let result = browse_snapshot(args, config).await?;

    let format = args
        .format
        .clone()
        .unwrap_or_else(|| config.output.default_format.clone());
    let rendered = output::render_result(&args.queue, &result, &format)?;
    print!("{}", rendered);

    match result.error {
        Some(error) => Err(CliError::RetrievalFailed { error }),
        None => Ok(()),
    }
}

fn execute_config_command(
    show: bool,
    format: ConfigFormat,
    config: &CliConfig,
) -> Result<(), CliError> {
    info!(show = show, format = ?format, "Processing config command");

    if show {
        print!("{}", config.render(&format)?);
    } else {
        println!("Configuration is valid");
    }

    Ok(())
}
