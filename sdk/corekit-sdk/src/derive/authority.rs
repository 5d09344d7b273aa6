use corekit_state::{Asset, Collection, PluginAuthority, PluginType, UpdateAuthority};
use log::debug;
use solana_sdk::pubkey::Pubkey;

use super::check_collection;
use crate::error::Result;

/// Whether `candidate` may update the asset.
///
/// # Arguments
/// * `candidate` - Key presenting itself as update authority
/// * `asset` - Assembled asset
/// * `collection` - The asset's collection, if it belongs to one
///
/// # Returns
/// * `Result<bool>` - `MismatchedCollection` if `collection` is not the asset's
pub fn has_asset_update_authority(
    candidate: &Pubkey,
    asset: &Asset,
    collection: Option<&Collection>,
) -> Result<bool> {
    check_collection(asset, collection)?;
    let key = candidate.to_bytes();

    if let UpdateAuthority::Address(address) = asset.base.update_authority {
        if address == key {
            return Ok(true);
        }
    }
    if let Some(delegate) = asset.plugins.get(PluginType::UpdateDelegate) {
        if delegate.authority.is_address(&key)
            || delegate.plugin.additional_delegates().contains(&key)
        {
            return Ok(true);
        }
    }
    Ok(collection
        .map(|c| has_collection_update_authority(candidate, c))
        .unwrap_or(false))
}

/// Whether `candidate` is the collection's update authority or one of its update delegates.
pub fn has_collection_update_authority(candidate: &Pubkey, collection: &Collection) -> bool {
    let key = candidate.to_bytes();
    if collection.base.update_authority == key {
        return true;
    }
    collection
        .plugins
        .get(PluginType::UpdateDelegate)
        .map(|delegate| {
            delegate.authority.is_address(&key)
                || delegate.plugin.additional_delegates().contains(&key)
        })
        .unwrap_or(false)
}

/// The authority that governs `plugin_type` on the asset.
///
/// The asset's own plugin decides, except that a collection plugin of the same
/// kind held by `UpdateAuthority` overrides an asset plugin held by `Owner`.
/// Without an asset plugin an inheritable collection plugin decides.
pub fn effective_plugin_authority(
    asset: &Asset,
    collection: Option<&Collection>,
    plugin_type: PluginType,
) -> Option<PluginAuthority> {
    let collection_authority = collection
        .filter(|_| plugin_type.is_collection_inheritable())
        .and_then(|c| c.plugins.get(plugin_type))
        .map(|entry| entry.authority);

    match (asset.plugins.get(plugin_type), collection_authority) {
        (Some(entry), Some(PluginAuthority::UpdateAuthority))
            if entry.authority == PluginAuthority::Owner =>
        {
            Some(PluginAuthority::UpdateAuthority)
        },
        (Some(entry), _) => Some(entry.authority),
        (None, inherited) => inherited,
    }
}

/// For each requested kind, whether `authority` satisfies its effective authority.
///
/// Kinds defined at neither level yield `false`; callers wanting the update
/// authority fallback check [`has_asset_update_authority`] separately.
pub fn check_plugin_authorities(
    asset: &Asset,
    plugin_types: &[PluginType],
    authority: &Pubkey,
    collection: Option<&Collection>,
) -> Result<Vec<bool>> {
    check_collection(asset, collection)?;
    let ctx = asset.authority_context(collection);
    let key = authority.to_bytes();

    let results = plugin_types
        .iter()
        .map(|plugin_type| {
            let allowed = effective_plugin_authority(asset, collection, *plugin_type)
                .map(|effective| effective.is_satisfied_by(&key, &ctx))
                .unwrap_or(false);
            debug!("{:?} authority check for {}: {}", plugin_type, authority, allowed);
            allowed
        })
        .collect();
    Ok(results)
}
