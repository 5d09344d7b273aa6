use corekit_state::{Asset, AuthorityContext, Collection, PluginAuthority, PluginType};
use log::debug;
use solana_sdk::pubkey::Pubkey;

use super::{check_collection, freeze::is_frozen};
use crate::error::Result;

/// Authority a plugin holds after the asset changes hands.
///
/// Owner-managed plugins delegated to an explicit address fall back to `Owner`;
/// everything else is unchanged.
pub fn transfer_reset_authority(
    plugin_type: PluginType,
    authority: PluginAuthority,
) -> PluginAuthority {
    match authority {
        PluginAuthority::Address { .. } if PluginType::OWNER_MANAGED.contains(&plugin_type) => {
            PluginAuthority::Owner
        },
        other => other,
    }
}

/// Applies an ownership transfer to `asset`, returning the kinds whose authority was reset.
pub fn apply_transfer(asset: &mut Asset, new_owner: &Pubkey) -> Vec<PluginType> {
    asset.base.owner = new_owner.to_bytes();

    let mut reset = Vec::new();
    for plugin_type in PluginType::OWNER_MANAGED {
        if let Some(entry) = asset.plugins.get_mut(plugin_type) {
            let next = transfer_reset_authority(plugin_type, entry.authority);
            if next != entry.authority {
                entry.authority = next;
                reset.push(plugin_type);
            }
        }
    }
    debug!("transfer to {} reset {:?}", new_owner, reset);
    reset
}

/// Whether the permanent delegate of `plugin_type` on the asset or its collection is `key`.
fn permanent_delegate(
    key: &corekit_state::Pubkey,
    asset: &Asset,
    collection: Option<&Collection>,
    plugin_type: PluginType,
    ctx: &AuthorityContext,
) -> bool {
    let on_asset = asset.plugins.get(plugin_type);
    let on_collection = collection.and_then(|c| c.plugins.get(plugin_type));
    on_asset
        .into_iter()
        .chain(on_collection)
        .any(|entry| entry.authority.is_satisfied_by(key, ctx))
}

fn owner_or_delegate(
    candidate: &Pubkey,
    asset: &Asset,
    collection: Option<&Collection>,
    permanent: PluginType,
    delegate: PluginType,
) -> Result<bool> {
    check_collection(asset, collection)?;
    let key = candidate.to_bytes();
    let ctx = asset.authority_context(collection);

    // Permanent delegates act on frozen assets too
    if permanent_delegate(&key, asset, collection, permanent, &ctx) {
        return Ok(true);
    }
    if is_frozen(asset, collection) {
        return Ok(false);
    }
    if asset.base.owner == key {
        return Ok(true);
    }
    Ok(asset
        .plugins
        .get(delegate)
        .map(|entry| entry.authority.is_satisfied_by(&key, &ctx))
        .unwrap_or(false))
}

/// Whether `candidate` could transfer the asset right now.
pub fn can_transfer(
    candidate: &Pubkey,
    asset: &Asset,
    collection: Option<&Collection>,
) -> Result<bool> {
    owner_or_delegate(
        candidate,
        asset,
        collection,
        PluginType::PermanentTransferDelegate,
        PluginType::TransferDelegate,
    )
}

/// Whether `candidate` could burn the asset right now.
pub fn can_burn(candidate: &Pubkey, asset: &Asset, collection: Option<&Collection>) -> Result<bool> {
    owner_or_delegate(
        candidate,
        asset,
        collection,
        PluginType::PermanentBurnDelegate,
        PluginType::BurnDelegate,
    )
}
