//! DevTools client implementing the session bridge
//!
//! Target discovery goes over the endpoint's HTTP listing; delivery attaches
//! to the page's own WebSocket and runs the injected executor script through
//! `Runtime.evaluate`. Every terminal transport condition maps to
//! `Error::Unreachable` with text telling the operator what to do next.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument, warn};

use sesswap_core::config::CdpSettings;
use sesswap_core::entities::PageTarget;
use sesswap_core::ports::SessionBridge;
use sesswap_core::protocol::{SwitchRequest, SwitchResponse};
use sesswap_core::Error;

use super::injection::build_switch_script;
use super::protocol::{decode_reply, parse_evaluate_reply, EvaluateCommand, TargetInfo};
use crate::network::build_cdp_client;

/// Timeout for attaching to the per-page socket
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the evaluate round trip. The protocol layer itself never
/// times out or retries; terminating is the transport's job.
const REPLY_TIMEOUT: Duration = Duration::from_secs(30);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "Browser", default)]
    browser: String,
}

/// Session bridge backed by a Chromium DevTools endpoint
pub struct CdpSessionBridge {
    http: Client,
    settings: CdpSettings,
    next_command_id: AtomicU64,
}

impl CdpSessionBridge {
    pub fn new(settings: CdpSettings) -> Result<Self, Error> {
        Ok(Self {
            http: build_cdp_client()?,
            settings,
            next_command_id: AtomicU64::new(1),
        })
    }

    /// Fetch the raw target listing from the endpoint.
    pub async fn list_targets(&self) -> Result<Vec<TargetInfo>, Error> {
        let url = format!("{}/json/list", self.settings.base_url());

        let response = self.http.get(&url).send().await.map_err(|e| {
            Error::Unreachable(format!(
                "cannot reach the browser endpoint at {}; is the browser running with --remote-debugging-port={}? ({})",
                self.settings.base_url(),
                self.settings.port,
                e
            ))
        })?;

        response.json::<Vec<TargetInfo>>().await.map_err(|e| {
            Error::Unreachable(format!(
                "invalid target listing from the browser endpoint: {}",
                e
            ))
        })
    }

    /// Browser version string, for reachability checks.
    pub async fn browser_version(&self) -> Result<String, Error> {
        let url = format!("{}/json/version", self.settings.base_url());

        let response = self.http.get(&url).send().await.map_err(|e| {
            Error::Unreachable(format!(
                "cannot reach the browser endpoint at {}; is the browser running with --remote-debugging-port={}? ({})",
                self.settings.base_url(),
                self.settings.port,
                e
            ))
        })?;

        let info: VersionInfo = response.json().await.map_err(|e| {
            Error::Unreachable(format!("invalid version info from the browser endpoint: {}", e))
        })?;

        Ok(info.browser)
    }

    // =========================================================================
    // Private helpers
    // =========================================================================

    /// Re-resolve the attachment endpoint for a page id at delivery time.
    ///
    /// The listing is fetched again so a page torn down between discovery
    /// and delivery surfaces here as unreachable, not as a hang.
    async fn resolve_ws_url(&self, page_id: &str) -> Result<String, Error> {
        let targets = self.list_targets().await?;

        let target = targets.into_iter().find(|t| t.id == page_id).ok_or_else(|| {
            Error::Unreachable(
                "the page is no longer open; reload the target page and try again".to_string(),
            )
        })?;

        target.ws_url.ok_or_else(|| {
            Error::Unreachable(
                "the page exposes no debugger socket; close DevTools for that tab and try again"
                    .to_string(),
            )
        })
    }

    async fn recv_reply(socket: &mut WsStream, command_id: u64) -> Result<SwitchResponse, Error> {
        while let Some(frame) = socket.next().await {
            let frame = frame.map_err(|e| {
                Error::Unreachable(format!("connection to the page failed: {}", e))
            })?;

            let text = match frame {
                Message::Text(text) => text,
                Message::Close(_) => {
                    return Err(Error::Unreachable(
                        "the page closed the connection before replying".to_string(),
                    ))
                }
                _ => continue,
            };

            let reply = match decode_reply(&text) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("skipping malformed frame: {}", e);
                    continue;
                }
            };

            // Event notifications interleave with command replies on the
            // same socket; only our command id counts.
            if reply.id != Some(command_id) {
                continue;
            }

            return parse_evaluate_reply(&reply);
        }

        Err(Error::Unreachable(
            "connection to the page ended before a reply arrived".to_string(),
        ))
    }
}

#[async_trait]
impl SessionBridge for CdpSessionBridge {
    #[instrument(skip(self))]
    async fn active_page(&self) -> Result<Option<PageTarget>, Error> {
        let targets = self.list_targets().await?;
        Ok(pick_active_page(&targets))
    }

    #[instrument(skip(self, request))]
    async fn deliver(
        &self,
        page: &PageTarget,
        request: &SwitchRequest,
    ) -> Result<SwitchResponse, Error> {
        let ws_url = self.resolve_ws_url(&page.id).await?;

        let script = build_switch_script(request)?;
        let command_id = self.next_command_id.fetch_add(1, Ordering::SeqCst);
        let command = EvaluateCommand::evaluate(command_id, &script);
        let payload = serde_json::to_string(&command)
            .map_err(|e| Error::Other(format!("failed to encode evaluate command: {}", e)))?;

        debug!(%ws_url, "attaching to page");
        let (mut socket, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(ws_url.as_str()))
            .await
            .map_err(|_| {
                Error::Unreachable(
                    "timed out attaching to the page; reload the target page and try again"
                        .to_string(),
                )
            })?
            .map_err(|e| {
                Error::Unreachable(format!(
                    "cannot attach to the page ({}); reload the target page and try again",
                    e
                ))
            })?;

        socket
            .send(Message::text(payload))
            .await
            .map_err(|e| Error::Unreachable(format!("failed to send to the page: {}", e)))?;

        let result = tokio::time::timeout(REPLY_TIMEOUT, Self::recv_reply(&mut socket, command_id))
            .await
            .map_err(|_| {
                Error::Unreachable(
                    "no answer from the page; reload the target page and try again".to_string(),
                )
            })
            .and_then(|inner| inner);

        socket.close(None).await.ok();
        result
    }
}

/// First switchable user page wins; the endpoint lists targets most
/// recently focused first.
fn pick_active_page(targets: &[TargetInfo]) -> Option<PageTarget> {
    targets.iter().find(|t| t.is_user_page()).map(|t| PageTarget {
        id: t.id.clone(),
        title: t.title.clone(),
        url: t.url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, kind: &str, url: &str) -> TargetInfo {
        TargetInfo {
            id: id.to_string(),
            kind: kind.to_string(),
            title: format!("title of {id}"),
            url: url.to_string(),
            ws_url: Some(format!("ws://127.0.0.1:9222/devtools/page/{id}")),
        }
    }

    #[test]
    fn test_pick_active_page_prefers_first_user_page() {
        let targets = vec![
            target("D1", "page", "devtools://devtools/bundled/inspector.html"),
            target("W1", "service_worker", "https://app.example.com/sw.js"),
            target("P1", "page", "https://app.example.com/dashboard"),
            target("P2", "page", "https://other.example.com/"),
        ];

        let page = pick_active_page(&targets).unwrap();
        assert_eq!(page.id, "P1");
        assert_eq!(page.url, "https://app.example.com/dashboard");
    }

    #[test]
    fn test_pick_active_page_none_without_user_pages() {
        let targets = vec![
            target("D1", "page", "devtools://devtools/bundled/inspector.html"),
            target("E1", "page", "chrome-extension://abcdef/popup.html"),
            target("W1", "service_worker", "https://app.example.com/sw.js"),
        ];

        assert!(pick_active_page(&targets).is_none());
        assert!(pick_active_page(&[]).is_none());
    }

    #[test]
    fn test_bridge_construction() {
        let bridge = CdpSessionBridge::new(CdpSettings::default());
        assert!(bridge.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires a browser with an open debugging port"]
    async fn test_live_target_discovery() {
        let bridge = CdpSessionBridge::new(CdpSettings::default()).unwrap();

        let version = bridge.browser_version().await.unwrap();
        println!("browser: {}", version);

        let targets = bridge.list_targets().await.unwrap();
        println!("targets: {:#?}", targets);
    }
}
