//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Hubclient - talk to the app service of a hub application
///
/// Discovers a hub's infrastructure, lists its applications, logs in and
/// registers device tokens, learning the hub's URL dialect along the way.
#[derive(Parser, Debug)]
#[command(
    name = "hubclient",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HUBCLIENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the learned-settings file (overrides configuration)
    #[arg(long, global = true, env = "HUBCLIENT_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query a hub's infrastructure and attach to it on success
    Infrastructure(InfrastructureArgs),

    /// List the applications published on a hub
    Applications(ApplicationsArgs),

    /// Log in on the attached hub application
    Login(LoginArgs),

    /// Register a device token on the attached hub application
    RegisterToken(RegisterTokenArgs),

    /// Print the app service URL of an operation under the learned dialect
    Url(UrlArgs),

    /// Print the URL of an application image
    ImageUrl(ImageUrlArgs),

    /// Print the URL that opens a hub application
    WebUrl(WebUrlArgs),

    /// Inspect or reset learned settings
    Settings(SettingsArgs),
}

/// Arguments for the infrastructure command
#[derive(Parser, Debug)]
pub struct InfrastructureArgs {
    /// Hub host, e.g. tenant.outsystems.net
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Do not attach to the hub on success
    #[arg(long)]
    pub no_attach: bool,
}

/// Arguments for the applications command
#[derive(Parser, Debug)]
pub struct ApplicationsArgs {
    /// Hub host (defaults to the attached hub application)
    #[arg(value_name = "HOST")]
    pub host: Option<String>,
}

/// Arguments for the login command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// User name
    #[arg(short, long, env = "HUBCLIENT_USERNAME")]
    pub username: Option<String>,

    /// Password
    #[arg(short, long, env = "HUBCLIENT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Device token
    #[arg(short, long)]
    pub device: Option<String>,
}

/// Arguments for the register-token command
#[derive(Parser, Debug)]
pub struct RegisterTokenArgs {
    /// Device token
    #[arg(short, long)]
    pub device: Option<String>,
}

/// Arguments for the url command
#[derive(Parser, Debug)]
pub struct UrlArgs {
    /// Operation path, e.g. login
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Hub host (defaults to the attached hub application)
    #[arg(long)]
    pub host: Option<String>,
}

/// Arguments for the image-url command
#[derive(Parser, Debug)]
pub struct ImageUrlArgs {
    /// Image identifier from the application list
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Hub host (defaults to the attached hub application)
    #[arg(long)]
    pub host: Option<String>,
}

/// Arguments for the web-url command
#[derive(Parser, Debug)]
pub struct WebUrlArgs {
    /// Application path from the application list
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Hub host (defaults to the attached hub application)
    #[arg(long)]
    pub host: Option<String>,
}

/// Arguments for the settings command
#[derive(Parser, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Settings management actions
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the learned dialect and the attached hub application
    Show,

    /// Forget the learned dialect and detach from the hub application
    Reset,

    /// Attach to a hub application without querying it
    SetHost {
        /// Hub host
        host: String,
    },
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::env::var("NO_COLOR").is_err()
    }
}
