//! Handlers for the four app service operations

use super::{completion_outcome, AppContext};
use crate::cli::{ApplicationsArgs, InfrastructureArgs, LoginArgs, RegisterTokenArgs};
use crate::error::Result;
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use hubclient_core::{Operation, SettingsStore};
use tracing::{debug, info, instrument, warn};

/// Handle the infrastructure command
#[instrument(skip(ctx, output), fields(host = %args.host))]
pub async fn handle_infrastructure(
    args: InfrastructureArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("infrastructure_command", &args.host);

    let spinner = output.spinner(&format!("Querying {}...", args.host));
    let completion = ctx.client.get_infrastructure(&args.host).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    output.completion(&Operation::Infrastructure.to_string(), &completion)?;

    if completion.is_success() && !args.no_attach {
        ctx.settings.set_hub_application(Some(args.host.clone()))?;
        info!(host = %args.host, "Attached to hub application");
        output.info(&format!("Attached to {}", args.host))?;
    }

    completion_outcome(&Operation::Infrastructure.to_string(), &completion)
}

/// Handle the applications command
#[instrument(skip(ctx, output))]
pub async fn handle_applications(
    args: ApplicationsArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let host = ctx.resolve_host(args.host)?;
    let _timer = Timer::with_details("applications_command", &host);

    let spinner = output.spinner(&format!("Listing applications on {}...", host));
    let completion = ctx.client.get_applications(&host).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    output.completion(&Operation::Applications.to_string(), &completion)?;
    completion_outcome(&Operation::Applications.to_string(), &completion)
}

/// Handle the login command
///
/// Missing credentials are passed through; the client rejects them without
/// sending anything.
#[instrument(skip_all)]
pub async fn handle_login(
    args: LoginArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("login_command");
    debug!(
        request = %redaction::redact_sensitive(&format!(
            "username={} password={} device={}",
            args.username.as_deref().unwrap_or("-"),
            args.password.as_deref().unwrap_or("-"),
            args.device.as_deref().unwrap_or("-"),
        )),
        "Logging in"
    );
    warn_if_detached(ctx, output)?;

    let spinner = output.spinner("Logging in...");
    let completion = ctx
        .client
        .login(
            args.username.as_deref(),
            args.password.as_deref(),
            args.device.as_deref(),
        )
        .await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    output.completion(&Operation::Login.to_string(), &completion)?;
    completion_outcome(&Operation::Login.to_string(), &completion)
}

/// Handle the register-token command
#[instrument(skip_all)]
pub async fn handle_register_token(
    args: RegisterTokenArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("register_token_command");
    warn_if_detached(ctx, output)?;

    let spinner = output.spinner("Registering device token...");
    let completion = ctx.client.register_token(args.device.as_deref()).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    output.completion(&Operation::RegisterToken.to_string(), &completion)?;
    completion_outcome(&Operation::RegisterToken.to_string(), &completion)
}

fn warn_if_detached(ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    if ctx.settings.hub_application().is_none() {
        warn!("No hub application attached");
        output.warning(
            "No hub application attached; run 'hubclient infrastructure <HOST>' or 'hubclient settings set-host <HOST>' first",
        )?;
    }
    Ok(())
}
