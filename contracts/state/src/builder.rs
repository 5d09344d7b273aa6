//! Builder for constructing Core account bytes.
//!
//! Produces `[base][PluginHeaderV1][plugins][adapters + data][PluginRegistryV1]`
//! with every offset filled in, the same layout [`CoreAccount::from_bytes`]
//! reads back.

use crate::{
    assembly::CoreAccount,
    authority::PluginAuthority,
    base::{write_base, BaseRecord},
    cursor::AccountWriter,
    error::{CoreStateError, StateResult},
    plugins::{
        lifecycle::LifecycleChecks,
        registry::{ExternalRegistryRecord, RecordKind, RegistryRecord},
        ExternalPluginAdapter, Plugin, PluginHeaderV1, PluginRegistryV1, PluginType,
    },
};

#[derive(Debug, Clone)]
struct PendingAdapter {
    adapter: ExternalPluginAdapter,
    authority: PluginAuthority,
    lifecycle_checks: Option<LifecycleChecks>,
    data: Option<Vec<u8>>,
}

/// Builder for constructing Core account bytes.
#[derive(Debug, Clone)]
pub struct AccountBuilder<B: BaseRecord> {
    base: B,
    plugins: Vec<(Plugin, PluginAuthority)>,
    adapters: Vec<PendingAdapter>,
}

impl<B: BaseRecord> AccountBuilder<B> {
    pub fn new(base: B) -> Self {
        Self {
            base,
            plugins: Vec::new(),
            adapters: Vec::new(),
        }
    }

    /// Starts from an assembled account, keeping its plugin and adapter order.
    pub fn from_account(account: &CoreAccount<B>) -> StateResult<Self>
    where
        B: Clone,
    {
        let mut builder = Self::new(account.base.clone());
        for entry in account.plugins.iter() {
            builder.add_plugin(entry.plugin.clone(), entry.authority)?;
        }
        for entry in account.external_plugin_adapters.iter() {
            builder.add_external_adapter(
                entry.adapter.clone(),
                entry.authority,
                entry.lifecycle_checks.clone(),
                entry.data.clone(),
            )?;
        }
        Ok(builder)
    }

    /// Adds a plugin with its kind's default authority.
    pub fn add_plugin_default(&mut self, plugin: Plugin) -> StateResult<&mut Self> {
        let authority = plugin.plugin_type().default_authority();
        self.add_plugin(plugin, authority)
    }

    /// Adds a plugin.
    ///
    /// # Arguments
    /// * `plugin` - Payload to store
    /// * `authority` - Authority recorded in the registry for this plugin
    ///
    /// # Returns
    /// * `StateResult<&mut Self>` - Fails if the kind is not allowed on this
    ///   account kind or is already present
    pub fn add_plugin(
        &mut self,
        plugin: Plugin,
        authority: PluginAuthority,
    ) -> StateResult<&mut Self> {
        let plugin_type = plugin.plugin_type();
        if !plugin_type.allowed_on(B::KEY) {
            return Err(CoreStateError::PluginNotAllowed {
                plugin_type,
                kind: B::KEY,
            });
        }
        if self.plugins.iter().any(|(p, _)| p.plugin_type() == plugin_type) {
            return Err(CoreStateError::DuplicatePlugin(plugin_type));
        }
        self.plugins.push((plugin, authority));
        Ok(self)
    }

    /// Adds an external adapter, optionally followed by its data blob.
    pub fn add_external_adapter(
        &mut self,
        adapter: ExternalPluginAdapter,
        authority: PluginAuthority,
        lifecycle_checks: Option<LifecycleChecks>,
        data: Option<Vec<u8>>,
    ) -> StateResult<&mut Self> {
        let adapter_type = adapter.adapter_type();
        if !adapter_type.allowed_on(B::KEY) {
            return Err(CoreStateError::ExternalAdapterNotAllowed {
                adapter_type,
                kind: B::KEY,
            });
        }
        if data.is_some() && !adapter.can_hold_data() {
            return Err(CoreStateError::Encode {
                field: "external_data",
                reason: format!("{:?} adapters cannot hold data", adapter_type),
            });
        }
        let key = adapter.key();
        if self.adapters.iter().any(|a| a.adapter.key() == key) {
            return Err(CoreStateError::DuplicateExternalAdapter);
        }
        self.adapters.push(PendingAdapter {
            adapter,
            authority,
            lifecycle_checks,
            data,
        });
        Ok(self)
    }

    pub fn has_plugin(&self, plugin_type: PluginType) -> bool {
        self.plugins.iter().any(|(p, _)| p.plugin_type() == plugin_type)
    }

    /// Serializes the account.
    pub fn build(&self) -> StateResult<Vec<u8>> {
        let mut writer = AccountWriter::new();
        write_base(&self.base, &mut writer)?;

        if self.plugins.is_empty() && self.adapters.is_empty() {
            return Ok(writer.into_inner());
        }

        // Header first with a placeholder; the registry offset is known only at the end
        let header_offset = writer.position();
        PluginHeaderV1 {
            plugin_registry_offset: 0,
        }
        .encode(&mut writer)?;

        let mut registry = PluginRegistryV1::default();
        for (plugin, authority) in &self.plugins {
            let offset = writer.position() as u64;
            writer.write("plugin", plugin)?;
            registry.registry.push(RegistryRecord {
                plugin_type: RecordKind::Known(plugin.plugin_type()),
                authority: *authority,
                offset,
            });
        }

        for pending in &self.adapters {
            let offset = writer.position() as u64;
            writer.write("external_plugin_adapter", &pending.adapter)?;
            let (data_offset, data_len) = match &pending.data {
                Some(data) => {
                    let data_offset = writer.position() as u64;
                    writer.write_bytes(data);
                    (Some(data_offset), Some(data.len() as u64))
                },
                None => (None, None),
            };
            registry.external_registry.push(ExternalRegistryRecord {
                plugin_type: RecordKind::Known(pending.adapter.adapter_type()),
                authority: pending.authority,
                lifecycle_checks: pending.lifecycle_checks.clone(),
                offset,
                data_offset,
                data_len,
            });
        }

        let registry_offset = writer.position() as u64;
        registry.encode(&mut writer)?;
        // Skip the header key byte
        writer.patch_u64(
            "plugin_registry_offset",
            header_offset + 1,
            registry_offset,
        )?;

        Ok(writer.into_inner())
    }
}
