//! Certificate trust policy for hub requests
//!
//! Requests to the operator's own domains are sent with permissive
//! certificate and hostname verification; every other host gets strict
//! verification. The decision is recomputed for every request and handed to
//! the transport as a [`TrustMode`], so no shared client state is mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain suffixes for which permissive trust is accepted by default
pub const DEFAULT_TRUSTED_DOMAINS: [&str; 3] =
    ["outsystems.com", "outsystems.net", "outsystemscloud.com"];

/// Certificate verification mode for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustMode {
    /// Default platform verification of certificate chain and hostname
    #[default]
    Strict,
    /// Accept any certificate for any hostname
    Permissive,
}

impl fmt::Display for TrustMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustMode::Strict => write!(f, "strict"),
            TrustMode::Permissive => write!(f, "permissive"),
        }
    }
}

/// Decides per destination host whether to elevate trust
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustPolicy {
    trusted_domains: Vec<String>,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TRUSTED_DOMAINS.iter().map(|d| d.to_string()))
    }
}

impl TrustPolicy {
    /// Create a policy from a set of trusted domain suffixes.
    ///
    /// Empty entries are dropped: an empty suffix would match every host.
    pub fn new<I, S>(trusted_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trusted_domains: trusted_domains
                .into_iter()
                .map(Into::into)
                .filter(|d: &String| !d.is_empty())
                .collect(),
        }
    }

    /// A policy that never elevates
    pub fn strict_only() -> Self {
        Self {
            trusted_domains: Vec::new(),
        }
    }

    /// True iff `host` contains one of the trusted domains.
    ///
    /// This is substring containment, not a suffix match: deployed hubs rely on it.
    pub fn should_elevate_trust(&self, host: Option<&str>) -> bool {
        match host {
            Some(host) if !host.is_empty() => self
                .trusted_domains
                .iter()
                .any(|domain| host.contains(domain.as_str())),
            _ => false,
        }
    }

    /// Trust mode to use for a request to `host`
    pub fn decide(&self, host: Option<&str>) -> TrustMode {
        if self.should_elevate_trust(host) {
            TrustMode::Permissive
        } else {
            TrustMode::Strict
        }
    }

    pub fn trusted_domains(&self) -> &[String] {
        &self.trusted_domains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_hosts_elevate() {
        let policy = TrustPolicy::default();
        assert!(policy.should_elevate_trust(Some("tenant.outsystems.net")));
        assert!(policy.should_elevate_trust(Some("acme.outsystemscloud.com")));
        assert!(policy.should_elevate_trust(Some("apps8.outsystems.com")));
        assert_eq!(policy.decide(Some("tenant.outsystems.net")), TrustMode::Permissive);
    }

    #[test]
    fn test_untrusted_hosts_stay_strict() {
        let policy = TrustPolicy::default();
        assert!(!policy.should_elevate_trust(Some("intranet.example.com")));
        assert!(!policy.should_elevate_trust(Some("outsystems.org")));
        assert_eq!(policy.decide(Some("example.com")), TrustMode::Strict);
    }

    #[test]
    fn test_missing_or_empty_host_is_strict() {
        let policy = TrustPolicy::default();
        assert!(!policy.should_elevate_trust(None));
        assert!(!policy.should_elevate_trust(Some("")));
        assert_eq!(policy.decide(None), TrustMode::Strict);
    }

    #[test]
    fn test_containment_not_suffix() {
        // Matches anywhere in the host string
        let policy = TrustPolicy::default();
        assert!(policy.should_elevate_trust(Some("outsystems.net.evil.example")));
    }

    #[test]
    fn test_custom_domains_ignore_empty_entries() {
        let policy = TrustPolicy::new(["", "corp.internal"]);
        assert_eq!(policy.trusted_domains(), &["corp.internal".to_string()]);
        assert!(!policy.should_elevate_trust(Some("example.com")));
        assert!(policy.should_elevate_trust(Some("hub.corp.internal")));
    }

    #[test]
    fn test_strict_only_never_elevates() {
        let policy = TrustPolicy::strict_only();
        assert!(!policy.should_elevate_trust(Some("tenant.outsystems.net")));
    }
}
