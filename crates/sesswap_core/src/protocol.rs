//! Wire types for the switch protocol between the controller and the page
//!
//! The page-side executor speaks JSON: one request carrying the action tag
//! and credential payload, answered by one success/failure response. Field
//! names on the wire are fixed; changing them breaks deployed executors.

use serde::{Deserialize, Serialize};

use crate::entities::Account;

/// Local-storage key the executor writes the credential under.
///
/// The target application reads its session from this key; the `_v1` suffix
/// tracks that application's storage schema, not ours.
pub const SESSION_STORAGE_KEY: &str = "session_v1";

/// Action tag of the single request kind the executor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchAction {
    #[serde(rename = "SET_LOCAL_STORAGE_AUTH")]
    SetLocalStorageAuth,
}

/// Credential payload delivered to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchPayload {
    /// Credential value stored under [`SESSION_STORAGE_KEY`], verbatim
    #[serde(rename = "authId")]
    pub auth_id: String,
    /// Display name shown in the page's reload notification
    pub name: String,
}

/// Message sent from the controller to the page-side executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRequest {
    pub action: SwitchAction,
    pub payload: SwitchPayload,
}

impl SwitchRequest {
    pub fn for_account(account: &Account) -> Self {
        Self {
            action: SwitchAction::SetLocalStorageAuth,
            payload: SwitchPayload {
                auth_id: account.token.clone(),
                name: account.name.clone(),
            },
        }
    }
}

/// Reply sent from the executor back to the controller
///
/// `success: false` is a logical failure: the executor ran but the storage
/// write was refused. Transport failures never take this form; they surface
/// as errors from the delivery port instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchResponse {
    pub success: bool,
    /// Human-readable failure detail, omitted from the wire when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SwitchResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AccountId;

    fn account(name: &str, token: &str) -> Account {
        Account {
            id: AccountId::new("1700000000000-0"),
            name: name.to_string(),
            token: token.to_string(),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = SwitchRequest::for_account(&account("Work", "abc123XYZ"));
        let json = serde_json::to_string(&request).unwrap();

        assert_eq!(
            json,
            r#"{"action":"SET_LOCAL_STORAGE_AUTH","payload":{"authId":"abc123XYZ","name":"Work"}}"#
        );
    }

    #[test]
    fn test_request_roundtrip() {
        let request = SwitchRequest::for_account(&account("Staging", "tok-9"));
        let json = serde_json::to_string(&request).unwrap();
        let decoded: SwitchRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, request);
        assert_eq!(decoded.action, SwitchAction::SetLocalStorageAuth);
        assert_eq!(decoded.payload.auth_id, "tok-9");
        assert_eq!(decoded.payload.name, "Staging");
    }

    #[test]
    fn test_response_success_omits_message() {
        let json = serde_json::to_string(&SwitchResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn test_response_failure_carries_message() {
        let json = serde_json::to_string(&SwitchResponse::failed("Access denied")).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Access denied"}"#);
    }

    #[test]
    fn test_response_parses_without_message() {
        let decoded: SwitchResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(decoded.success);
        assert!(decoded.message.is_none());
    }

    #[test]
    fn test_response_tolerates_unknown_fields() {
        let decoded: SwitchResponse =
            serde_json::from_str(r#"{"success":false,"message":"nope","extra":42}"#).unwrap();
        assert!(!decoded.success);
        assert_eq!(decoded.message.as_deref(), Some("nope"));
    }

    #[test]
    fn test_storage_key_is_pinned() {
        // The executor and the target application must agree on this key.
        assert_eq!(SESSION_STORAGE_KEY, "session_v1");
    }
}
