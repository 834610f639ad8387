//! Shared HTTP client configuration for DevTools endpoint access.
//!
//! Provides a factory for the client used against the browser's discovery
//! endpoint, with timeouts suited to a local listener.

use std::time::Duration;

use reqwest::Client;
use sesswap_core::Error;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout (10 seconds)
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent presented to the DevTools endpoint
pub const CDP_USER_AGENT: &str = "sesswap";

/// Build a configured HTTP client for DevTools discovery requests.
///
/// The endpoint listens on localhost, so the proxy environment is bypassed
/// entirely.
pub fn build_cdp_client() -> Result<Client, Error> {
    Client::builder()
        .no_proxy()
        .user_agent(CDP_USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .build()
        .map_err(|e| Error::Other(format!("failed to create CDP HTTP client: {}", e)))
}
