//! Settings management handler

use super::AppContext;
use crate::cli::{OutputFormat, SettingsAction, SettingsArgs};
use crate::error::Result;
use crate::output::OutputWriter;
use hubclient_core::SettingsStore;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct SettingsView {
    path: String,
    dialect: String,
    hub_application: Option<String>,
}

/// Handle the settings command
pub fn handle_settings(args: SettingsArgs, ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        SettingsAction::Show => show(ctx, output),
        SettingsAction::Reset => {
            ctx.settings.reset()?;
            info!(path = %ctx.settings.path().display(), "Settings reset");
            output.success("✓ Learned settings cleared")
        }
        SettingsAction::SetHost { host } => {
            ctx.settings.set_hub_application(Some(host.clone()))?;
            info!(%host, "Attached to hub application");
            output.success(&format!("✓ Attached to {}", host))
        }
    }
}

fn show(ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let stored = ctx.settings.snapshot();
    let view = SettingsView {
        path: ctx.settings.path().display().to_string(),
        dialect: stored.dialect.to_string(),
        hub_application: stored.hub_application,
    };

    if output.format() != OutputFormat::Human {
        return output.data(&view);
    }

    output.section("Learned Settings")?;
    output.table(
        &["Setting", "Value"],
        vec![
            vec!["file".to_string(), view.path],
            vec!["dialect".to_string(), view.dialect],
            vec![
                "hub_application".to_string(),
                view.hub_application.unwrap_or_else(|| "(none)".to_string()),
            ],
            vec![
                "trusted_domains".to_string(),
                ctx.config.client.trusted_domains.join(", "),
            ],
        ],
    )
}
