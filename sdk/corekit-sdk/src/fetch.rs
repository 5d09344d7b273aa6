//! Fetching and decoding Core accounts through a [`SolConnection`].

use corekit_state::{Asset, BaseRecord, Collection, CoreAccount};
use log::debug;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;

use crate::core::config::CoreClientConfig;
use crate::core::connection::SolConnection;
use crate::error::{CoreSdkError, Result};
use crate::types::AssetWithCollection;

/// Fetch raw account data, checking the account owner when configured
pub async fn fetch_core_account(
    connection: &impl SolConnection,
    address: &Pubkey,
    config: &CoreClientConfig,
) -> Result<Account> {
    let account = connection
        .get_account(address)
        .await
        .map_err(|e| CoreSdkError::Connection(e.to_string()))?
        .ok_or(CoreSdkError::AccountNotFound(*address))?;

    if config.verify_account_owner {
        let program_id = config.program_id()?;
        if account.owner != program_id {
            return Err(CoreSdkError::InvalidAccountOwner {
                address: *address,
                owner: account.owner,
            });
        }
    }
    debug!("fetched {} bytes for {}", account.data.len(), address);
    Ok(account)
}

/// Decode and assemble account bytes under the config's unknown-kind policy
pub fn parse_core_account<B: BaseRecord>(
    address: &Pubkey,
    data: &[u8],
    config: &CoreClientConfig,
) -> Result<CoreAccount<B>> {
    let account = CoreAccount::<B>::from_bytes(address.to_bytes(), data)?;
    if config.strict_plugin_decoding {
        if let Some(kind) = account.unknown_plugin_kinds.first() {
            return Err(CoreSdkError::UnknownPluginKind(*kind));
        }
    }
    Ok(account)
}

pub async fn fetch_asset(
    connection: &impl SolConnection,
    address: &Pubkey,
    config: &CoreClientConfig,
) -> Result<Asset> {
    let account = fetch_core_account(connection, address, config).await?;
    parse_core_account(address, &account.data, config)
}

pub async fn fetch_collection(
    connection: &impl SolConnection,
    address: &Pubkey,
    config: &CoreClientConfig,
) -> Result<Collection> {
    let account = fetch_core_account(connection, address, config).await?;
    parse_core_account(address, &account.data, config)
}

/// Fetch an asset and, when it belongs to one, its collection
pub async fn fetch_asset_with_collection(
    connection: &impl SolConnection,
    address: &Pubkey,
    config: &CoreClientConfig,
) -> Result<AssetWithCollection> {
    let asset = fetch_asset(connection, address, config).await?;
    let collection = match asset.collection_address() {
        Some(collection) => {
            let collection = Pubkey::new_from_array(*collection);
            debug!("asset {} belongs to collection {}", address, collection);
            Some(fetch_collection(connection, &collection, config).await?)
        },
        None => None,
    };
    Ok(AssetWithCollection { asset, collection })
}

/// Fetch several assets in one round trip, skipping addresses with no account
pub async fn fetch_assets(
    connection: &impl SolConnection,
    addresses: &[Pubkey],
    config: &CoreClientConfig,
) -> Result<Vec<Asset>> {
    let accounts = connection
        .get_multiple_accounts(addresses)
        .await
        .map_err(|e| CoreSdkError::Connection(e.to_string()))?;

    let program_id = config.program_id()?;
    let mut assets = Vec::with_capacity(accounts.len());
    for (address, account) in addresses.iter().zip(accounts) {
        let Some(account) = account else {
            debug!("no account at {}", address);
            continue;
        };
        if config.verify_account_owner && account.owner != program_id {
            return Err(CoreSdkError::InvalidAccountOwner {
                address: *address,
                owner: account.owner,
            });
        }
        assets.push(parse_core_account(address, &account.data, config)?);
    }
    Ok(assets)
}
