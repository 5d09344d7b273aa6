use corekit_state::{Asset, Collection, PluginType};

/// Whether the asset is frozen for transfer and burn.
///
/// Only `PermanentFreezeDelegate` propagates from the collection; collections
/// never carry a plain `FreezeDelegate`.
pub fn is_frozen(asset: &Asset, collection: Option<&Collection>) -> bool {
    asset.plugins.is_frozen_by(PluginType::FreezeDelegate)
        || asset.plugins.is_frozen_by(PluginType::PermanentFreezeDelegate)
        || collection
            .map(|c| c.plugins.is_frozen_by(PluginType::PermanentFreezeDelegate))
            .unwrap_or(false)
}

/// Whether the asset's signer may not execute on its behalf.
pub fn is_execute_frozen(asset: &Asset, collection: Option<&Collection>) -> bool {
    asset.plugins.is_frozen_by(PluginType::FreezeExecute)
        || asset.plugins.is_frozen_by(PluginType::PermanentFreezeExecute)
        || collection
            .map(|c| c.plugins.is_frozen_by(PluginType::PermanentFreezeExecute))
            .unwrap_or(false)
}
