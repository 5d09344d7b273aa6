use corekit_state::{Asset, Collection, PluginsList};

/// The asset's plugins with inheritable collection plugins filled in.
///
/// Asset-level plugins win over collection plugins of the same kind.
pub fn derive_asset_plugins(asset: &Asset, collection: Option<&Collection>) -> PluginsList {
    let mut plugins = asset.plugins.clone();
    let Some(collection) = collection else {
        return plugins;
    };
    for entry in collection.plugins.iter() {
        let plugin_type = entry.plugin_type();
        if plugin_type.is_collection_inheritable() && !plugins.contains(plugin_type) {
            plugins.insert(entry.clone());
        }
    }
    plugins
}
