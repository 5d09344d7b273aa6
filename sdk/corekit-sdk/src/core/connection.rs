use async_trait::async_trait;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use std::error::Error;

/// Account lookup supplied by the caller's RPC layer.
#[async_trait]
pub trait SolConnection: Send + Sync {
    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>>;

    /// Fetches several accounts; the default issues one lookup per key.
    async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, Box<dyn Error + Send + Sync>> {
        let mut accounts = Vec::with_capacity(pubkeys.len());
        for pubkey in pubkeys {
            accounts.push(self.get_account(pubkey).await?);
        }
        Ok(accounts)
    }
}
