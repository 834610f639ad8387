use std::sync::Arc;

use tracing::{info, warn};

use crate::entities::{Account, SwitchOutcome};
use crate::error::Error;
use crate::ports::SessionBridge;
use crate::protocol::SwitchRequest;

/// Orchestrates one session switch end to end:
/// - resolve the single target page, failing locally when there is none
/// - build and deliver the switch request
/// - keep transport failures and executor refusals distinct
pub struct SessionSwitch<B>
where
    B: SessionBridge,
{
    bridge: Arc<B>,
}

impl<B> SessionSwitch<B>
where
    B: SessionBridge,
{
    pub fn new(bridge: Arc<B>) -> Self {
        Self { bridge }
    }

    /// Switch the active page's session to `account`.
    ///
    /// Flow:
    /// 1. Resolve the active page; when there is none, fail locally and
    ///    send nothing at all
    /// 2. Deliver the switch request and wait for the response
    /// 3. Map an executor refusal to `SwitchRejected`, surfacing its
    ///    message verbatim
    ///
    /// A transport error from the bridge propagates unchanged; it is
    /// terminal and never retried here.
    pub async fn switch_to(&self, account: &Account) -> Result<SwitchOutcome, Error> {
        let page = self
            .bridge
            .active_page()
            .await?
            .ok_or(Error::NoActivePage)?;

        let request = SwitchRequest::for_account(account);
        let response = self.bridge.deliver(&page, &request).await?;

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "page reported failure without detail".to_string());
            warn!(page = %page.url, "switch rejected: {}", message);
            return Err(Error::SwitchRejected(message));
        }

        info!(account = %account.name, page = %page.url, "session switched");
        Ok(SwitchOutcome {
            account_name: account.name.clone(),
            page,
        })
    }
}
