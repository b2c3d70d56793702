//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//! Handlers share one [`AppContext`]: the loaded configuration, the
//! file-backed settings and a client built on top of them.

mod operations;
mod settings;
mod urls;

pub use operations::{
    handle_applications, handle_infrastructure, handle_login, handle_register_token,
};
pub use settings::handle_settings;
pub use urls::{handle_image_url, handle_url, handle_web_url};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::settings::FileSettings;
use hubclient_core::{Completion, HubClient, SettingsStore};
use std::path::Path;
use std::sync::Arc;

/// Everything a handler needs to talk to a hub
pub struct AppContext {
    pub config: Config,
    pub settings: Arc<FileSettings>,
    pub client: HubClient,
}

impl AppContext {
    /// Open the settings file and build the client
    pub fn new(config: Config, settings_override: Option<&Path>) -> Result<Self> {
        let settings = Arc::new(FileSettings::open(config.settings_path(settings_override)));
        let store: Arc<dyn SettingsStore> = settings.clone();
        let client = HubClient::new(config.client.clone(), store)?;

        Ok(Self {
            config,
            settings,
            client,
        })
    }

    /// `host` if given, otherwise the attached hub application
    pub fn resolve_host(&self, host: Option<String>) -> Result<String> {
        host.filter(|h| !h.is_empty())
            .or_else(|| self.settings.hub_application())
            .ok_or(Error::NoHubApplication)
    }
}

/// Turn a failed completion into the CLI error carrying its exit code
pub fn completion_outcome<T>(operation: &str, completion: &Completion<T>) -> Result<()> {
    match completion.classification() {
        None => Ok(()),
        Some(classification) => Err(Error::OperationFailed {
            operation: operation.to_string(),
            classification: classification.to_string(),
            status_code: completion.status_code,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> AppContext {
        let config = Config {
            settings_file: Some(dir.path().join("settings.json")),
            ..Config::default()
        };
        AppContext::new(config, None).unwrap()
    }

    #[test]
    fn test_resolve_host_prefers_argument() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        ctx.settings
            .set_hub_application(Some("attached.example.com".to_string()))
            .unwrap();

        assert_eq!(
            ctx.resolve_host(Some("given.example.com".to_string())).unwrap(),
            "given.example.com"
        );
        assert_eq!(ctx.resolve_host(None).unwrap(), "attached.example.com");
    }

    #[test]
    fn test_resolve_host_without_attachment() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        assert!(matches!(ctx.resolve_host(None), Err(Error::NoHubApplication)));
        assert!(matches!(
            ctx.resolve_host(Some(String::new())),
            Err(Error::NoHubApplication)
        ));
    }

    #[test]
    fn test_completion_outcome() {
        assert!(completion_outcome("login", &Completion::success(Some(1), 200)).is_ok());

        let err = completion_outcome::<()>("registertoken", &Completion::failure(404)).unwrap_err();
        match err {
            Error::OperationFailed {
                operation,
                classification,
                status_code,
            } => {
                assert_eq!(operation, "registertoken");
                assert_eq!(classification, "dialect mismatch");
                assert_eq!(status_code, 404);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
