//! Authority and derivation engine.
//!
//! Pure functions over an assembled asset and, optionally, the collection it
//! belongs to. Results describe whether an action should be attempted; the
//! on-chain program remains the final authority.

pub mod authority;
pub mod freeze;
pub mod legacy;
pub mod plugins;
pub mod transfer;

use corekit_state::{Asset, Collection, UpdateAuthority};
use solana_sdk::pubkey::Pubkey;

use crate::error::{CoreSdkError, Result};

pub use authority::{
    check_plugin_authorities, effective_plugin_authority, has_asset_update_authority,
    has_collection_update_authority,
};
pub use freeze::{is_execute_frozen, is_frozen};
pub use legacy::{apply_plugin_actions, legacy_delegate, legacy_revoke, PluginAction};
pub use plugins::derive_asset_plugins;
pub use transfer::{apply_transfer, can_burn, can_transfer, transfer_reset_authority};

/// Fails unless `collection`, when given, is the one the asset points at.
pub(crate) fn check_collection(asset: &Asset, collection: Option<&Collection>) -> Result<()> {
    let Some(collection) = collection else {
        return Ok(());
    };
    match asset.base.update_authority {
        UpdateAuthority::Collection(address) if address == collection.address => Ok(()),
        _ => Err(CoreSdkError::MismatchedCollection(Pubkey::new_from_array(
            collection.address,
        ))),
    }
}
