//! Plugin assembly: folds the registry and its payloads into a typed account.

use log::{debug, warn};

use crate::{
    authority::{AuthorityContext, PluginAuthority},
    base::{decode_base, BaseAssetV1, BaseCollectionV1, BaseRecord, UpdateAuthority},
    cursor::AccountReader,
    error::{CoreStateError, StateResult},
    plugins::{
        decode_external_adapter, decode_plugin, decode_registry,
        lifecycle::{self, ExternalCheckResult, HookableLifecycleEvent, LifecycleChecks},
        registry::RecordKind,
        ExternalPluginAdapter, ExternalPluginAdapterKey, ExternalPluginAdapterType, Plugin,
        PluginHeaderV1, PluginRegistryV1, PluginType,
    },
    Pubkey,
};

/// A surfaced internal plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginEntry {
    pub authority: PluginAuthority,
    /// Absolute offset of the payload in the account it was read from
    pub offset: u64,
    pub plugin: Plugin,
}

impl PluginEntry {
    pub fn plugin_type(&self) -> PluginType {
        self.plugin.plugin_type()
    }
}

/// Internal plugins of one account, at most one per kind, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginsList {
    entries: Vec<PluginEntry>,
}

impl PluginsList {
    pub fn get(&self, plugin_type: PluginType) -> Option<&PluginEntry> {
        self.entries.iter().find(|e| e.plugin_type() == plugin_type)
    }

    pub fn get_mut(&mut self, plugin_type: PluginType) -> Option<&mut PluginEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.plugin_type() == plugin_type)
    }

    /// Looks a plugin up by its camelCase key, e.g. `freezeDelegate`.
    pub fn get_by_name(&self, key: &str) -> Option<&PluginEntry> {
        PluginType::from_key_name(key).and_then(|t| self.get(t))
    }

    pub fn contains(&self, plugin_type: PluginType) -> bool {
        self.get(plugin_type).is_some()
    }

    /// Inserts an entry, replacing and returning any entry of the same kind.
    pub fn insert(&mut self, entry: PluginEntry) -> Option<PluginEntry> {
        match self.get_mut(entry.plugin_type()) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            },
        }
    }

    pub fn remove(&mut self, plugin_type: PluginType) -> Option<PluginEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.plugin_type() == plugin_type)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginEntry> {
        self.entries.iter()
    }

    /// Entries paired with their camelCase keys.
    pub fn named(&self) -> impl Iterator<Item = (String, &PluginEntry)> {
        self.entries.iter().map(|e| (e.plugin_type().key_name(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frozen flag of the given freeze-style plugin, false when absent.
    pub fn is_frozen_by(&self, plugin_type: PluginType) -> bool {
        self.get(plugin_type)
            .and_then(|e| e.plugin.frozen())
            .unwrap_or(false)
    }
}

/// A surfaced external plugin adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAdapterEntry {
    pub authority: PluginAuthority,
    pub offset: u64,
    pub lifecycle_checks: Option<LifecycleChecks>,
    pub adapter: ExternalPluginAdapter,
    pub data_offset: Option<u64>,
    pub data_len: Option<u64>,
    /// Raw data blob for data-holding adapters
    pub data: Option<Vec<u8>>,
}

impl ExternalAdapterEntry {
    pub fn key(&self) -> ExternalPluginAdapterKey {
        self.adapter.key()
    }

    pub fn adapter_type(&self) -> ExternalPluginAdapterType {
        self.adapter.adapter_type()
    }

    pub fn check_for(&self, event: HookableLifecycleEvent) -> Option<ExternalCheckResult> {
        self.lifecycle_checks
            .as_deref()
            .and_then(|checks| lifecycle::check_for(checks, event))
    }
}

/// External adapters of one account, unique by identity key, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalAdaptersList {
    entries: Vec<ExternalAdapterEntry>,
}

impl ExternalAdaptersList {
    pub fn get(&self, key: &ExternalPluginAdapterKey) -> Option<&ExternalAdapterEntry> {
        self.entries.iter().find(|e| e.key() == *key)
    }

    pub fn of_type(
        &self,
        adapter_type: ExternalPluginAdapterType,
    ) -> impl Iterator<Item = &ExternalAdapterEntry> {
        self.entries
            .iter()
            .filter(move |e| e.adapter_type() == adapter_type)
    }

    /// Adapters that asked to be consulted for `event`.
    pub fn hooked_on(
        &self,
        event: HookableLifecycleEvent,
    ) -> impl Iterator<Item = (&ExternalAdapterEntry, ExternalCheckResult)> {
        self.entries
            .iter()
            .filter_map(move |e| e.check_for(event).map(|check| (e, check)))
    }

    /// Adds an entry; fails if one with the same identity exists.
    pub fn push(&mut self, entry: ExternalAdapterEntry) -> StateResult<()> {
        if self.get(&entry.key()).is_some() {
            return Err(CoreStateError::DuplicateExternalAdapter);
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalAdapterEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fully decoded Core account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreAccount<B> {
    pub address: Pubkey,
    pub base: B,
    pub plugin_header: Option<PluginHeaderV1>,
    pub plugins: PluginsList,
    pub external_plugin_adapters: ExternalAdaptersList,
    /// Discriminants of registry records that were not surfaced
    pub unknown_plugin_kinds: Vec<u8>,
}

pub type Asset = CoreAccount<BaseAssetV1>;
pub type Collection = CoreAccount<BaseCollectionV1>;

impl<B: BaseRecord> CoreAccount<B> {
    /// Decodes and assembles an account of kind `B` from raw bytes.
    pub fn from_bytes(address: Pubkey, data: &[u8]) -> StateResult<Self> {
        let (base, consumed) = decode_base::<B>(data)?;
        let registry = if consumed == data.len() {
            None
        } else {
            Some(decode_registry(data, consumed)?)
        };
        assemble(address, base, registry, data)
    }
}

impl Asset {
    pub fn owner(&self) -> &Pubkey {
        &self.base.owner
    }

    pub fn update_authority(&self) -> &UpdateAuthority {
        &self.base.update_authority
    }

    /// The collection this asset belongs to, if any.
    pub fn collection_address(&self) -> Option<&Pubkey> {
        self.base.update_authority.collection()
    }

    /// Resolution context for this asset's plugin authorities.
    ///
    /// A collection-managed asset only resolves `UpdateAuthority` when its
    /// collection is supplied.
    pub fn authority_context(&self, collection: Option<&Collection>) -> AuthorityContext {
        let update_authority = match self.base.update_authority {
            UpdateAuthority::None => None,
            UpdateAuthority::Address(address) => Some(address),
            UpdateAuthority::Collection(_) => collection.map(|c| c.base.update_authority),
        };
        AuthorityContext {
            owner: Some(self.base.owner),
            update_authority,
        }
    }
}

impl Collection {
    pub fn update_authority(&self) -> &Pubkey {
        &self.base.update_authority
    }

    pub fn authority_context(&self) -> AuthorityContext {
        AuthorityContext {
            owner: None,
            update_authority: Some(self.base.update_authority),
        }
    }
}

/// Combines a decoded base record with its registry and payloads.
///
/// Reserved and unknown plugin kinds are not surfaced; unknown kinds are
/// recorded in `unknown_plugin_kinds`. Data recorded for an adapter that
/// cannot hold data is ignored.
pub fn assemble<B: BaseRecord>(
    address: Pubkey,
    base: B,
    registry: Option<(PluginHeaderV1, PluginRegistryV1)>,
    data: &[u8],
) -> StateResult<CoreAccount<B>> {
    let mut account = CoreAccount {
        address,
        base,
        plugin_header: None,
        plugins: PluginsList::default(),
        external_plugin_adapters: ExternalAdaptersList::default(),
        unknown_plugin_kinds: Vec::new(),
    };
    let Some((header, registry)) = registry else {
        return Ok(account);
    };
    account.plugin_header = Some(header);
    account.unknown_plugin_kinds = registry.unknown_kinds();

    for record in &registry.registry {
        let plugin_type = match record.plugin_type {
            RecordKind::Known(plugin_type) => plugin_type,
            RecordKind::Unknown(raw) => {
                warn!("dropping unknown plugin kind {} at offset {}", raw, record.offset);
                continue;
            },
        };
        if plugin_type == PluginType::Reserved {
            debug!("skipping reserved plugin at offset {}", record.offset);
            continue;
        }
        if !plugin_type.allowed_on(B::KEY) {
            return Err(CoreStateError::PluginNotAllowed {
                plugin_type,
                kind: B::KEY,
            });
        }
        let plugin = decode_plugin(data, record.offset, plugin_type)?;
        let previous = account.plugins.insert(PluginEntry {
            authority: record.authority,
            offset: record.offset,
            plugin,
        });
        if previous.is_some() {
            return Err(CoreStateError::DuplicatePlugin(plugin_type));
        }
    }

    let reader = AccountReader::new(data);
    for record in &registry.external_registry {
        let adapter_type = match record.plugin_type {
            RecordKind::Known(adapter_type) => adapter_type,
            RecordKind::Unknown(raw) => {
                warn!(
                    "dropping unknown external adapter kind {} at offset {}",
                    raw, record.offset
                );
                continue;
            },
        };
        if !adapter_type.allowed_on(B::KEY) {
            return Err(CoreStateError::ExternalAdapterNotAllowed {
                adapter_type,
                kind: B::KEY,
            });
        }
        let adapter = decode_external_adapter(data, record.offset, adapter_type)?;
        let attached = match (record.data_offset, record.data_len) {
            (Some(offset), Some(len)) if adapter.can_hold_data() => Some((offset, len)),
            (Some(_), Some(_)) => {
                warn!(
                    "ignoring data attached to {:?} adapter at offset {}",
                    adapter_type, record.offset
                );
                None
            },
            _ => None,
        };
        let data_blob = match attached {
            Some((offset, len)) => Some(reader.slice_at("external_data", offset, len)?.to_vec()),
            None => None,
        };
        account.external_plugin_adapters.push(ExternalAdapterEntry {
            authority: record.authority,
            offset: record.offset,
            lifecycle_checks: record.lifecycle_checks.clone(),
            adapter,
            data_offset: attached.map(|(offset, _)| offset),
            data_len: attached.map(|(_, len)| len),
            data: data_blob,
        })?;
    }

    debug!(
        "assembled account with {} plugins and {} external adapters",
        account.plugins.len(),
        account.external_plugin_adapters.len()
    );
    Ok(account)
}
