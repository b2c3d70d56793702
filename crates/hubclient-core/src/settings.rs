//! Learned settings shared across operations
//!
//! The core never persists anything itself. It reads and writes the learned
//! dialect and the current hub application through [`SettingsStore`], and
//! keeps an atomic cache of the dialect in [`DialectState`] so that the
//! one-shot correction cannot be applied twice in the same process.

use crate::error::Result;
use crate::types::Dialect;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Persisted-settings collaborator
pub trait SettingsStore: Send + Sync {
    /// Dialect learned so far
    fn dialect(&self) -> Dialect;

    /// Record a newly learned dialect
    fn set_dialect(&self, dialect: Dialect) -> Result<()>;

    /// Host of the hub application the app is currently attached to
    fn hub_application(&self) -> Option<String>;

    /// Attach to (or detach from) a hub application
    fn set_hub_application(&self, host: Option<String>) -> Result<()>;
}

/// In-process settings store
#[derive(Debug, Default)]
pub struct MemorySettings {
    dialect: RwLock<Dialect>,
    hub_application: RwLock<Option<String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already attached to `host`
    pub fn with_hub_application(host: impl Into<String>) -> Self {
        Self {
            dialect: RwLock::new(Dialect::default()),
            hub_application: RwLock::new(Some(host.into())),
        }
    }

    /// Create a store with a previously learned dialect
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = RwLock::new(dialect);
        self
    }
}

impl SettingsStore for MemorySettings {
    fn dialect(&self) -> Dialect {
        self.dialect.read().map(|d| *d).unwrap_or_default()
    }

    fn set_dialect(&self, dialect: Dialect) -> Result<()> {
        let mut guard = self
            .dialect
            .write()
            .map_err(|_| crate::Error::settings("dialect lock poisoned", None))?;
        *guard = dialect;
        Ok(())
    }

    fn hub_application(&self) -> Option<String> {
        self.hub_application.read().ok().and_then(|h| h.clone())
    }

    fn set_hub_application(&self, host: Option<String>) -> Result<()> {
        let mut guard = self
            .hub_application
            .write()
            .map_err(|_| crate::Error::settings("hub application lock poisoned", None))?;
        *guard = host;
        Ok(())
    }
}

/// Process-wide dialect cell backed by a [`SettingsStore`]
///
/// Reads never touch the store after construction. The `Aspx -> Jsf`
/// correction is a compare-and-swap on the cache, so concurrent 404s flip
/// the dialect once and everybody else just sees the corrected value.
#[derive(Clone)]
pub struct DialectState {
    jsf: Arc<AtomicBool>,
    store: Arc<dyn SettingsStore>,
}

impl DialectState {
    /// Load the current dialect from `store`
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        let jsf = store.dialect() == Dialect::Jsf;
        Self {
            jsf: Arc::new(AtomicBool::new(jsf)),
            store,
        }
    }

    /// Current dialect
    pub fn get(&self) -> Dialect {
        if self.jsf.load(Ordering::Acquire) {
            Dialect::Jsf
        } else {
            Dialect::Aspx
        }
    }

    /// Force a dialect, bypassing the one-shot rule.
    ///
    /// Meant for resets and tests; operations only ever call [`Self::correct`].
    pub fn set(&self, dialect: Dialect) {
        self.jsf.store(dialect == Dialect::Jsf, Ordering::Release);
        self.persist(dialect);
    }

    /// Apply the correction for a 404 received under `observed`.
    ///
    /// Returns the dialect to retry with, or `None` when `observed` cannot be
    /// corrected. Only the caller that wins the swap persists the change.
    pub fn correct(&self, observed: Dialect) -> Option<Dialect> {
        let target = observed.corrected()?;
        let won = self
            .jsf
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if won {
            info!(from = %observed, to = %target, "Application server dialect corrected");
            self.persist(target);
        }

        Some(target)
    }

    /// The backing settings store
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    fn persist(&self, dialect: Dialect) {
        if let Err(e) = self.store.set_dialect(dialect) {
            warn!(error = %e, dialect = %dialect, "Failed to persist learned dialect");
        }
    }
}

impl std::fmt::Debug for DialectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectState")
            .field("dialect", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_settings_defaults() {
        let settings = MemorySettings::new();
        assert_eq!(settings.dialect(), Dialect::Aspx);
        assert_eq!(settings.hub_application(), None);
    }

    #[test]
    fn test_memory_settings_roundtrip() {
        let settings = MemorySettings::with_hub_application("tenant.outsystems.net");
        assert_eq!(settings.hub_application().as_deref(), Some("tenant.outsystems.net"));

        settings.set_hub_application(None).unwrap();
        assert_eq!(settings.hub_application(), None);
    }

    #[test]
    fn test_dialect_state_loads_from_store() {
        let store = Arc::new(MemorySettings::new().with_dialect(Dialect::Jsf));
        let state = DialectState::new(store);
        assert_eq!(state.get(), Dialect::Jsf);
    }

    #[test]
    fn test_correct_flips_once_and_persists() {
        let store = Arc::new(MemorySettings::new());
        let state = DialectState::new(store.clone());

        assert_eq!(state.correct(Dialect::Aspx), Some(Dialect::Jsf));
        assert_eq!(state.get(), Dialect::Jsf);
        assert_eq!(store.dialect(), Dialect::Jsf);

        // A late 404 from a request sent before the flip still gets to retry,
        // but the state is already corrected
        assert_eq!(state.correct(Dialect::Aspx), Some(Dialect::Jsf));
        assert_eq!(state.get(), Dialect::Jsf);

        assert_eq!(state.correct(Dialect::Jsf), None);
        assert_eq!(state.get(), Dialect::Jsf);
    }

    #[test]
    fn test_concurrent_corrections_flip_once() {
        let store = Arc::new(MemorySettings::new());
        let state = DialectState::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || state.correct(Dialect::Aspx))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(Dialect::Jsf));
        }
        assert_eq!(state.get(), Dialect::Jsf);
    }

    #[test]
    fn test_set_resets_dialect() {
        let store = Arc::new(MemorySettings::new());
        let state = DialectState::new(store.clone());
        state.correct(Dialect::Aspx);

        state.set(Dialect::Aspx);
        assert_eq!(state.get(), Dialect::Aspx);
        assert_eq!(store.dialect(), Dialect::Aspx);
    }
}
