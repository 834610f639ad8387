//! Wire types for the DevTools endpoint
//!
//! Only the slice of the protocol the bridge needs: target listings from
//! `/json/list` and the `Runtime.evaluate` envelope. Replies are parsed
//! tolerantly because the browser interleaves event notifications with
//! command replies on the same socket.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use sesswap_core::protocol::SwitchResponse;
use sesswap_core::Error;

/// One entry of the `/json/list` target listing
#[derive(Debug, Clone, Deserialize)]
pub struct TargetInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Attachment endpoint; absent while another debugger is attached
    #[serde(rename = "webSocketDebuggerUrl", default)]
    pub ws_url: Option<String>,
}

impl TargetInfo {
    /// Whether this target is a switchable user page.
    ///
    /// DevTools front-ends and extension surfaces list with type "page"
    /// too; they are never the page the operator means.
    pub fn is_user_page(&self) -> bool {
        self.kind == "page"
            && !self.url.starts_with("devtools://")
            && !self.url.starts_with("chrome-extension://")
    }
}

/// Command sent over the per-page socket
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateCommand {
    pub id: u64,
    pub method: &'static str,
    pub params: Value,
}

impl EvaluateCommand {
    /// Evaluate `expression` in the page, returning the result by value.
    pub fn evaluate(id: u64, expression: &str) -> Self {
        Self {
            id,
            method: "Runtime.evaluate",
            params: json!({
                "expression": expression,
                "returnByValue": true,
            }),
        }
    }
}

/// Protocol-level error attached to a command reply
#[derive(Debug, Clone, Deserialize)]
pub struct CdpError {
    pub code: i64,
    pub message: String,
}

/// Envelope of one frame from the per-page socket
///
/// Command replies carry `id` and either `result` or `error`; event
/// notifications carry `method` and no `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpReply {
    pub id: Option<u64>,
    pub method: Option<String>,
    pub result: Option<Value>,
    pub error: Option<CdpError>,
}

/// Decode one socket frame into the reply envelope.
pub fn decode_reply(raw: &str) -> Result<CdpReply, Error> {
    serde_json::from_str(raw).map_err(|e| Error::Execution(format!("malformed frame: {}", e)))
}

/// Interpret a matched `Runtime.evaluate` reply as a switch response.
///
/// A protocol error or an uncaught page-side exception is an execution
/// failure; a well-formed payload is returned as-is, whether it reports
/// success or refusal.
pub fn parse_evaluate_reply(reply: &CdpReply) -> Result<SwitchResponse, Error> {
    if let Some(error) = &reply.error {
        return Err(Error::Execution(format!(
            "{} (code {})",
            error.message, error.code
        )));
    }

    let result = reply
        .result
        .as_ref()
        .ok_or_else(|| Error::Execution("reply carries no result".to_string()))?;

    if let Some(details) = result.get("exceptionDetails") {
        return Err(Error::Execution(exception_text(details)));
    }

    let value = result.get("result").and_then(|r| r.get("value"));
    match value {
        Some(Value::String(payload)) => serde_json::from_str(payload)
            .map_err(|e| Error::Execution(format!("malformed switch response: {}", e))),
        Some(other) => serde_json::from_value(other.clone())
            .map_err(|e| Error::Execution(format!("malformed switch response: {}", e))),
        None => Err(Error::Execution("page returned no payload".to_string())),
    }
}

// =========================================================================
// Private helpers
// =========================================================================

/// Best human-readable text for an `exceptionDetails` object.
fn exception_text(details: &Value) -> String {
    if let Some(description) = details
        .get("exception")
        .and_then(|e| e.get("description"))
        .and_then(|d| d.as_str())
    {
        return description.to_string();
    }

    details
        .get("text")
        .and_then(|t| t.as_str())
        .unwrap_or("uncaught exception in page")
        .to_string()
}
