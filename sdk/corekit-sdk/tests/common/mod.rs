use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use corekit_sdk::core::connection::SolConnection;
use corekit_sdk::DEFAULT_PROGRAM_ID;
use corekit_state::{
    AccountBuilder, Asset, BaseAssetV1, BaseCollectionV1, Collection, Plugin, PluginAuthority,
    UpdateAuthority,
};
use solana_sdk::{account::Account, pubkey::Pubkey};
use tokio::sync::Mutex;

/// In-memory account store standing in for an RPC node.
#[derive(Default, Clone)]
pub struct TestContext {
    accounts: Arc<Mutex<HashMap<Pubkey, Account>>>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_account(&self, address: Pubkey, data: Vec<u8>, owner: Pubkey) {
        let account = Account {
            lamports: 1_000_000,
            data,
            owner,
            executable: false,
            rent_epoch: 0,
        };
        self.accounts.lock().await.insert(address, account);
    }

    pub async fn set_core_account(&self, address: Pubkey, data: Vec<u8>) {
        self.set_account(address, data, DEFAULT_PROGRAM_ID).await;
    }
}

#[async_trait]
impl SolConnection for TestContext {
    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.accounts.lock().await.get(pubkey).cloned())
    }
}

/// Connection whose every call fails.
pub struct OfflineConnection;

#[async_trait]
impl SolConnection for OfflineConnection {
    async fn get_account(
        &self,
        _pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn std::error::Error + Send + Sync>> {
        Err("connection refused".into())
    }
}

pub fn random_pubkey() -> Pubkey {
    Pubkey::new_from_array(rand::random::<[u8; 32]>())
}

pub fn bread(owner: &Pubkey, update_authority: UpdateAuthority) -> BaseAssetV1 {
    BaseAssetV1 {
        owner: owner.to_bytes(),
        update_authority,
        name: "Test Bread".to_string(),
        uri: "https://example.com/bread".to_string(),
        seq: None,
    }
}

pub fn bakery(update_authority: &Pubkey) -> BaseCollectionV1 {
    BaseCollectionV1 {
        update_authority: update_authority.to_bytes(),
        name: "Bakery".to_string(),
        uri: "https://example.com/bakery".to_string(),
        num_minted: 1,
        current_size: 1,
    }
}

/// Builds and assembles an asset with the given plugins.
pub fn asset_with(
    address: &Pubkey,
    base: BaseAssetV1,
    plugins: Vec<(Plugin, PluginAuthority)>,
) -> anyhow::Result<Asset> {
    let mut builder = AccountBuilder::new(base);
    for (plugin, authority) in plugins {
        builder.add_plugin(plugin, authority)?;
    }
    Ok(Asset::from_bytes(address.to_bytes(), &builder.build()?)?)
}

pub fn collection_with(
    address: &Pubkey,
    base: BaseCollectionV1,
    plugins: Vec<(Plugin, PluginAuthority)>,
) -> anyhow::Result<Collection> {
    let mut builder = AccountBuilder::new(base);
    for (plugin, authority) in plugins {
        builder.add_plugin(plugin, authority)?;
    }
    Ok(Collection::from_bytes(address.to_bytes(), &builder.build()?)?)
}

pub fn address(key: &Pubkey) -> PluginAuthority {
    PluginAuthority::address(key.to_bytes())
}
