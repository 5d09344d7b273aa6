use corekit_state::{Asset, Collection};
use solana_sdk::pubkey::Pubkey;

/// An asset fetched together with the collection it belongs to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetWithCollection {
    pub asset: Asset,
    pub collection: Option<Collection>,
}

impl AssetWithCollection {
    pub fn address(&self) -> Pubkey {
        Pubkey::new_from_array(self.asset.address)
    }

    pub fn collection(&self) -> Option<&Collection> {
        self.collection.as_ref()
    }
}

impl AssetWithCollection {
    /// Frozen state with the collection's permanent freeze applied.
    pub fn is_frozen(&self) -> bool {
        crate::derive::is_frozen(&self.asset, self.collection())
    }

    /// Plugins in effect on the asset, including inherited collection plugins.
    pub fn derived_plugins(&self) -> corekit_state::PluginsList {
        crate::derive::derive_asset_plugins(&self.asset, self.collection())
    }
}
