//! Compatibility with the single "delegate" of older token standards.
//!
//! A legacy delegate is the same third party holding the freeze, transfer
//! and burn delegate plugins at once.

use corekit_state::plugins::{BurnDelegate, FreezeDelegate, TransferDelegate};
use corekit_state::{AccountBuilder, Asset, Plugin, PluginAuthority, PluginEntry, PluginType};
use log::debug;
use solana_sdk::pubkey::Pubkey;

use crate::error::{CoreSdkError, Result};

/// Owner-managed plugins that together make up a legacy delegate.
pub const LEGACY_DELEGATE_PLUGINS: [PluginType; 3] = [
    PluginType::FreezeDelegate,
    PluginType::TransferDelegate,
    PluginType::BurnDelegate,
];

/// A plugin change the instruction layer would submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginAction {
    /// Re-point an existing plugin's authority
    Approve {
        plugin_type: PluginType,
        authority: PluginAuthority,
    },
    /// Add a missing plugin with an initial authority
    Add {
        plugin: Plugin,
        authority: PluginAuthority,
    },
    /// Return an owner-managed plugin's authority to the owner
    Revoke { plugin_type: PluginType },
}

fn empty_plugin(plugin_type: PluginType) -> Option<Plugin> {
    match plugin_type {
        PluginType::FreezeDelegate => Some(Plugin::FreezeDelegate(FreezeDelegate { frozen: false })),
        PluginType::TransferDelegate => Some(Plugin::TransferDelegate(TransferDelegate {})),
        PluginType::BurnDelegate => Some(Plugin::BurnDelegate(BurnDelegate {})),
        _ => None,
    }
}

/// Actions that hand all three legacy delegate plugins to `target`.
///
/// Fails with `CannotDelegate` if `target` owns the asset or already holds one of them.
pub fn legacy_delegate(asset: &Asset, target: &Pubkey) -> Result<Vec<PluginAction>> {
    let key = target.to_bytes();
    if asset.base.owner == key {
        return Err(CoreSdkError::CannotDelegate(*target));
    }
    let already_delegate = LEGACY_DELEGATE_PLUGINS
        .iter()
        .filter_map(|t| asset.plugins.get(*t))
        .any(|entry| entry.authority.is_address(&key));
    if already_delegate {
        return Err(CoreSdkError::CannotDelegate(*target));
    }

    let authority = PluginAuthority::address(key);
    let mut actions = Vec::with_capacity(LEGACY_DELEGATE_PLUGINS.len());
    for plugin_type in LEGACY_DELEGATE_PLUGINS {
        if asset.plugins.contains(plugin_type) {
            actions.push(PluginAction::Approve {
                plugin_type,
                authority,
            });
        } else if let Some(plugin) = empty_plugin(plugin_type) {
            actions.push(PluginAction::Add { plugin, authority });
        }
    }
    debug!("legacy delegate to {}: {} actions", target, actions.len());
    Ok(actions)
}

/// Actions that revoke a legacy delegate.
///
/// Fails with `CannotRevoke` unless at least one of the plugins is present
/// and every present one is held by a third party.
pub fn legacy_revoke(asset: &Asset) -> Result<Vec<PluginAction>> {
    let owner = asset.base.owner;
    let defined: Vec<&PluginEntry> = LEGACY_DELEGATE_PLUGINS
        .iter()
        .filter_map(|t| asset.plugins.get(*t))
        .collect();
    if defined.is_empty() {
        return Err(CoreSdkError::CannotRevoke);
    }
    let held_by_owner = defined.iter().any(|entry| {
        entry.authority == PluginAuthority::Owner || entry.authority.is_address(&owner)
    });
    if held_by_owner {
        return Err(CoreSdkError::CannotRevoke);
    }
    Ok(defined
        .into_iter()
        .map(|entry| PluginAction::Revoke {
            plugin_type: entry.plugin_type(),
        })
        .collect())
}

/// Returns the asset as it reads after `actions` are applied, re-encoded so
/// every offset is what the program would write.
pub fn apply_plugin_actions(asset: &Asset, actions: &[PluginAction]) -> Result<Asset> {
    let mut next = asset.clone();
    for action in actions {
        match action {
            PluginAction::Approve {
                plugin_type,
                authority,
            } => {
                let entry = next
                    .plugins
                    .get_mut(*plugin_type)
                    .ok_or(CoreSdkError::PluginNotFound(*plugin_type))?;
                entry.authority = *authority;
            },
            PluginAction::Add { plugin, authority } => {
                let plugin_type = plugin.plugin_type();
                if next.plugins.contains(plugin_type) {
                    return Err(CoreSdkError::CannotAddPlugin(plugin_type));
                }
                // Offset is assigned when the account is re-encoded below
                next.plugins.insert(PluginEntry {
                    authority: *authority,
                    offset: 0,
                    plugin: plugin.clone(),
                });
            },
            PluginAction::Revoke { plugin_type } => {
                let entry = next
                    .plugins
                    .get_mut(*plugin_type)
                    .ok_or(CoreSdkError::PluginNotFound(*plugin_type))?;
                entry.authority = plugin_type.default_authority();
            },
        }
    }
    let bytes = AccountBuilder::from_account(&next)?.build()?;
    Ok(Asset::from_bytes(next.address, &bytes)?)
}
