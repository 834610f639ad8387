use async_trait::async_trait;

use crate::entities::{Account, PageTarget};
use crate::error::Error;
use crate::protocol::{SwitchRequest, SwitchResponse};

/// Account persistence over an opaque host key-value store
///
/// The ordered sequence is the unit of storage: implementations read and
/// write it wholesale, never individual records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Load the full ordered sequence.
    ///
    /// Absence of persisted data is an empty sequence, not an error.
    async fn load(&self) -> Result<Vec<Account>, Error>;

    /// Overwrite the full ordered sequence.
    ///
    /// Atomic from the caller's perspective: a concurrent reader observes
    /// either the previous sequence or the new one, never a partial write.
    async fn save(&self, accounts: &[Account]) -> Result<(), Error>;
}

/// One-shot request/response channel to the active page of the host browser
#[async_trait]
pub trait SessionBridge: Send + Sync {
    /// Resolve the single switch target: the currently active page.
    ///
    /// `Ok(None)` means no page qualifies. `Err(Unreachable)` means the
    /// browser endpoint itself cannot be reached.
    async fn active_page(&self) -> Result<Option<PageTarget>, Error>;

    /// Deliver one request and wait for the matching response.
    ///
    /// `Err(Unreachable)` is the terminal transport failure: no executor in
    /// the page, page torn down, or no answer within the transport's own
    /// deadline. A logical refusal arrives as `Ok` with `success: false`;
    /// the two are never conflated.
    async fn deliver(
        &self,
        page: &PageTarget,
        request: &SwitchRequest,
    ) -> Result<SwitchResponse, Error>;
}
