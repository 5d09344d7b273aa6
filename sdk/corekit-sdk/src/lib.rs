//! Client-side layer for Core assets and collections: fetching, authority
//! derivation and adapter data.

pub mod core;
pub mod data;
pub mod derive;
pub mod error;
pub mod fetch;
pub mod types;

pub use crate::core::config::CoreClientConfig;
pub use crate::core::connection::SolConnection;
pub use crate::core::constants::DEFAULT_PROGRAM_ID;
pub use crate::data::{decode_adapter_data, encode_json_data, AdapterData};
pub use crate::derive::{
    apply_plugin_actions, apply_transfer, can_burn, can_transfer, check_plugin_authorities,
    derive_asset_plugins, effective_plugin_authority, has_asset_update_authority,
    has_collection_update_authority, is_execute_frozen, is_frozen, legacy_delegate,
    legacy_revoke, PluginAction,
};
pub use crate::error::{CoreSdkError, Result};
pub use crate::fetch::{
    fetch_asset, fetch_asset_with_collection, fetch_assets, fetch_collection, parse_core_account,
};
pub use crate::types::AssetWithCollection;

pub mod state {
    pub use corekit_state::{
        Asset, AuthorityContext, Collection, CoreAccount, ExternalPluginAdapter,
        ExternalPluginAdapterKey, Plugin, PluginAuthority, PluginType, UpdateAuthority,
    };
}
