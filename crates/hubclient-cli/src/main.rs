//! Hubclient CLI - command-line access to hub applications
//!
//! This is the main entry point for the hubclient CLI, providing commands
//! for discovering a hub, listing its applications, logging in and
//! registering device tokens.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;
mod settings;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use handlers::AppContext;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Configuration feeds logging, so it is loaded first
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, config).await {
        Ok(()) => process::exit(0),
        Err(e) => exit_with(e),
    }
}

fn exit_with(e: error::Error) -> ! {
    eprintln!(
        "{}",
        error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
    );

    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    process::exit(e.exit_code());
}

/// Main application logic
#[instrument(skip_all, fields(request_id = logging::current_request_id().unwrap_or("unknown")))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(
        cli.output,
        cli.use_color() && config.output.color,
        cli.quiet,
        config.output.progress,
    );

    let ctx = AppContext::new(config, cli.settings.as_deref())?;
    tracing::debug!(client = ?ctx.client, settings = %ctx.settings.path().display(), "Client ready");

    match cli.command {
        Commands::Infrastructure(args) => {
            handlers::handle_infrastructure(args, &ctx, &mut output).await
        }
        Commands::Applications(args) => handlers::handle_applications(args, &ctx, &mut output).await,
        Commands::Login(args) => handlers::handle_login(args, &ctx, &mut output).await,
        Commands::RegisterToken(args) => {
            handlers::handle_register_token(args, &ctx, &mut output).await
        }
        Commands::Url(args) => handlers::handle_url(args, &ctx, &mut output),
        Commands::ImageUrl(args) => handlers::handle_image_url(args, &ctx, &mut output),
        Commands::WebUrl(args) => handlers::handle_web_url(args, &ctx, &mut output),
        Commands::Settings(args) => handlers::handle_settings(args, &ctx, &mut output),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_file(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
