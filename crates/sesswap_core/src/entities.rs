use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Unique identifier for a stored account.
///
/// Assigned once when the account is created and never regenerated; edits
/// keep the id stable so references never go stale. Time-based with a
/// process-local sequence suffix, which is unique enough for lookup in a
/// single-operator store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl AccountId {
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}-{}", millis, seq))
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored credential the operator can switch the page session to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Display name shown in listings and in the in-page notification.
    pub name: String,
    /// Opaque credential value, written verbatim into the page's session key.
    pub token: String,
}

impl Account {
    pub fn new(name: String, token: String) -> Self {
        Self {
            id: AccountId::generate(),
            name,
            token,
        }
    }
}

/// A page a switch can be delivered to.
///
/// `id` is the host browser's handle for the page; how the transport turns it
/// into an attachable endpoint is an adapter concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Result of a completed switch, for operator-facing confirmation.
#[derive(Debug, Clone)]
pub struct SwitchOutcome {
    pub account_name: String,
    pub page: PageTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_generate_is_unique() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_account_id_roundtrip() {
        let id = AccountId::new("1700000000000-0");
        assert_eq!(id.as_str(), "1700000000000-0");
        assert_eq!(id.to_string(), "1700000000000-0");
    }

    #[test]
    fn test_account_id_serde_transparent() {
        let id = AccountId::new("1700000000000-3");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1700000000000-3\"");

        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_account_new_assigns_id() {
        let account = Account::new("Work".to_string(), "tok-123".to_string());

        assert_eq!(account.name, "Work");
        assert_eq!(account.token, "tok-123");
        assert!(!account.id.as_str().is_empty());
    }

    #[test]
    fn test_account_new_ids_differ() {
        let a = Account::new("One".to_string(), "t1".to_string());
        let b = Account::new("Two".to_string(), "t2".to_string());
        assert_ne!(a.id, b.id);
    }
}
