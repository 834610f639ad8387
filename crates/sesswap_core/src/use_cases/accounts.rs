use std::sync::Arc;

use tracing::info;

use crate::entities::{Account, AccountId};
use crate::error::Error;
use crate::ports::AccountStore;

/// Orchestrates account CRUD over the wholesale store:
/// - every mutation is load, modify, save
/// - validation happens before anything is persisted
/// - records are addressed by stable id only
pub struct AccountManager<S>
where
    S: AccountStore,
{
    store: Arc<S>,
}

impl<S> AccountManager<S>
where
    S: AccountStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List the stored sequence in order.
    pub async fn list(&self) -> Result<Vec<Account>, Error> {
        self.store.load().await
    }

    /// Validate and append a new account, returning it with its fresh id.
    pub async fn add(&self, name: &str, token: &str) -> Result<Account, Error> {
        let (name, token) = validate_fields(name, token)?;

        let mut accounts = self.store.load().await?;
        let account = Account::new(name, token);
        accounts.push(account.clone());
        self.store.save(&accounts).await?;

        info!(id = %account.id, "account added");
        Ok(account)
    }

    /// Replace name and token of the account with `id`.
    ///
    /// The id and the record's position in the sequence never change.
    pub async fn edit(&self, id: &AccountId, name: &str, token: &str) -> Result<Account, Error> {
        let (name, token) = validate_fields(name, token)?;

        let mut accounts = self.store.load().await?;
        let slot = accounts
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        slot.name = name;
        slot.token = token;
        let updated = slot.clone();
        self.store.save(&accounts).await?;

        info!(id = %updated.id, "account updated");
        Ok(updated)
    }

    /// Remove the account with `id`, preserving the order of the others.
    pub async fn remove(&self, id: &AccountId) -> Result<Account, Error> {
        let mut accounts = self.store.load().await?;
        let index = accounts
            .iter()
            .position(|a| a.id == *id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let removed = accounts.remove(index);
        self.store.save(&accounts).await?;

        info!(id = %removed.id, "account removed");
        Ok(removed)
    }

    /// Resolve an operator-supplied selector to one account: exact id match
    /// first, then exact name match. A name shared by several accounts is
    /// ambiguous and rejected rather than guessed at.
    pub async fn find(&self, selector: &str) -> Result<Account, Error> {
        let accounts = self.store.load().await?;

        if let Some(account) = accounts.iter().find(|a| a.id.as_str() == selector) {
            return Ok(account.clone());
        }

        let mut by_name = accounts.iter().filter(|a| a.name == selector);
        match (by_name.next(), by_name.next()) {
            (Some(account), None) => Ok(account.clone()),
            (Some(_), Some(_)) => Err(Error::Validation(format!(
                "name '{}' matches more than one account, use the id",
                selector
            ))),
            (None, _) => Err(Error::NotFound(selector.to_string())),
        }
    }
}

// =========================================================================
// Private helpers
// =========================================================================

fn validate_fields(name: &str, token: &str) -> Result<(String, String), Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }
    if token.trim().is_empty() {
        return Err(Error::Validation("token must not be empty".to_string()));
    }
    // Names are stored trimmed; tokens go in verbatim because the switch
    // writes them byte-for-byte into the page.
    Ok((name.to_string(), token.to_string()))
}
