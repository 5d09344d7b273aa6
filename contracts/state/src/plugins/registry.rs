//! Plugin header and registry.
//!
//! Layout after the base record:
//! `[PluginHeaderV1][payloads...][PluginRegistryV1]`. The header sits right
//! after the base record and points at the registry; each registry record
//! points at its payload.
//!
//! Record kinds are read permissively. The byte layout of a record following
//! its kind byte (authority, then offsets) does not depend on the kind, so an
//! unrecognized kind is kept as [`RecordKind::Unknown`] and the array stays
//! aligned. That holds only while new kinds keep the same record shape; a
//! kind-specific record layout would misalign the rest of the array.

use log::{debug, warn};

use crate::{
    authority::PluginAuthority,
    cursor::{AccountReader, AccountWriter},
    error::{CoreStateError, StateResult},
    plugins::{
        external::ExternalPluginAdapterType,
        lifecycle::{self, ExternalCheckResult, HookableLifecycleEvent, LifecycleChecks},
        PluginType,
    },
    Key,
};

/// Smallest possible encoded registry record (kind + `None` authority + offset).
const MIN_RECORD_LEN: usize = 1 + 1 + 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginHeaderV1 {
    /// Absolute offset of the plugin registry
    pub plugin_registry_offset: u64,
}

impl PluginHeaderV1 {
    /// Key byte + u64 offset
    pub const LEN: usize = 9;

    pub fn decode(reader: &mut AccountReader<'_>) -> StateResult<Self> {
        Key::expect(reader, Key::PluginHeaderV1)?;
        Ok(Self {
            plugin_registry_offset: reader.read_u64("plugin_registry_offset")?,
        })
    }

    pub fn encode(&self, writer: &mut AccountWriter) -> StateResult<()> {
        Key::PluginHeaderV1.write(writer)?;
        writer.write("plugin_registry_offset", &self.plugin_registry_offset)
    }
}

/// A record kind that may not be known to this version of the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind<T> {
    Known(T),
    Unknown(u8),
}

impl<T: TryFrom<u8, Error = u8> + Copy + Into<u8>> RecordKind<T> {
    fn decode(reader: &mut AccountReader<'_>, field: &'static str) -> StateResult<Self> {
        let raw = reader.read_u8(field)?;
        Ok(match T::try_from(raw) {
            Ok(kind) => RecordKind::Known(kind),
            Err(raw) => RecordKind::Unknown(raw),
        })
    }

    fn raw(&self) -> u8 {
        match self {
            RecordKind::Known(kind) => (*kind).into(),
            RecordKind::Unknown(raw) => *raw,
        }
    }

    pub fn known(&self) -> Option<T> {
        match self {
            RecordKind::Known(kind) => Some(*kind),
            RecordKind::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryRecord {
    pub plugin_type: RecordKind<PluginType>,
    pub authority: PluginAuthority,
    /// Absolute offset of the `Plugin` payload
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRegistryRecord {
    pub plugin_type: RecordKind<ExternalPluginAdapterType>,
    pub authority: PluginAuthority,
    pub lifecycle_checks: Option<LifecycleChecks>,
    /// Absolute offset of the `ExternalPluginAdapter` payload
    pub offset: u64,
    pub data_offset: Option<u64>,
    pub data_len: Option<u64>,
}

impl ExternalRegistryRecord {
    pub fn check_for(&self, event: HookableLifecycleEvent) -> Option<ExternalCheckResult> {
        self.lifecycle_checks
            .as_deref()
            .and_then(|checks| lifecycle::check_for(checks, event))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginRegistryV1 {
    pub registry: Vec<RegistryRecord>,
    pub external_registry: Vec<ExternalRegistryRecord>,
}

impl PluginRegistryV1 {
    pub fn decode(reader: &mut AccountReader<'_>) -> StateResult<Self> {
        Key::expect(reader, Key::PluginRegistryV1)?;

        let count = reader.read_u32("registry.len")? as usize;
        let mut registry = Vec::with_capacity(count.min(reader.remaining() / MIN_RECORD_LEN));
        for _ in 0..count {
            let plugin_type = RecordKind::decode(reader, "registry.plugin_type")?;
            if let RecordKind::Unknown(raw) = plugin_type {
                warn!(
                    "unknown plugin kind {} in registry at offset {}",
                    raw,
                    reader.position() - 1
                );
            }
            registry.push(RegistryRecord {
                plugin_type,
                authority: reader.read("registry.authority")?,
                offset: reader.read_u64("registry.offset")?,
            });
        }

        let count = reader.read_u32("external_registry.len")? as usize;
        let mut external_registry =
            Vec::with_capacity(count.min(reader.remaining() / MIN_RECORD_LEN));
        for _ in 0..count {
            let plugin_type = RecordKind::decode(reader, "external_registry.plugin_type")?;
            if let RecordKind::Unknown(raw) = plugin_type {
                warn!(
                    "unknown external plugin adapter kind {} at offset {}",
                    raw,
                    reader.position() - 1
                );
            }
            external_registry.push(ExternalRegistryRecord {
                plugin_type,
                authority: reader.read("external_registry.authority")?,
                lifecycle_checks: reader.read("external_registry.lifecycle_checks")?,
                offset: reader.read_u64("external_registry.offset")?,
                data_offset: reader.read("external_registry.data_offset")?,
                data_len: reader.read("external_registry.data_len")?,
            });
        }

        debug!(
            "decoded plugin registry: {} plugins, {} external adapters",
            registry.len(),
            external_registry.len()
        );
        Ok(Self {
            registry,
            external_registry,
        })
    }

    pub fn encode(&self, writer: &mut AccountWriter) -> StateResult<()> {
        Key::PluginRegistryV1.write(writer)?;

        writer.write("registry.len", &(self.registry.len() as u32))?;
        for record in &self.registry {
            writer.write("registry.plugin_type", &record.plugin_type.raw())?;
            writer.write("registry.authority", &record.authority)?;
            writer.write("registry.offset", &record.offset)?;
        }

        writer.write("external_registry.len", &(self.external_registry.len() as u32))?;
        for record in &self.external_registry {
            writer.write("external_registry.plugin_type", &record.plugin_type.raw())?;
            writer.write("external_registry.authority", &record.authority)?;
            writer.write("external_registry.lifecycle_checks", &record.lifecycle_checks)?;
            writer.write("external_registry.offset", &record.offset)?;
            writer.write("external_registry.data_offset", &record.data_offset)?;
            writer.write("external_registry.data_len", &record.data_len)?;
        }
        Ok(())
    }

    /// Raw discriminants of all records this codec does not recognize.
    pub fn unknown_kinds(&self) -> Vec<u8> {
        let internal = self.registry.iter().filter_map(|r| match r.plugin_type {
            RecordKind::Unknown(raw) => Some(raw),
            RecordKind::Known(_) => None,
        });
        let external = self
            .external_registry
            .iter()
            .filter_map(|r| match r.plugin_type {
                RecordKind::Unknown(raw) => Some(raw),
                RecordKind::Known(_) => None,
            });
        internal.chain(external).collect()
    }

    /// Checks every payload offset lies in `[header_end, account_len)`.
    fn check_offsets(&self, header_end: usize, account_len: usize) -> StateResult<()> {
        let in_range = |field: &'static str, offset: u64| {
            if offset >= header_end as u64 && offset < account_len as u64 {
                Ok(())
            } else {
                Err(CoreStateError::OffsetOutOfBounds {
                    field,
                    offset,
                    len: account_len,
                })
            }
        };
        for record in &self.registry {
            in_range("registry.offset", record.offset)?;
        }
        for record in &self.external_registry {
            in_range("external_registry.offset", record.offset)?;
            if let Some(data_offset) = record.data_offset {
                in_range("external_registry.data_offset", data_offset)?;
            }
        }
        Ok(())
    }
}

/// Decodes the plugin header at `header_offset` and the registry it points to.
pub fn decode_registry(
    data: &[u8],
    header_offset: usize,
) -> StateResult<(PluginHeaderV1, PluginRegistryV1)> {
    let mut reader = AccountReader::at(data, "plugin_header", header_offset as u64)?;
    let header = PluginHeaderV1::decode(&mut reader)?;
    let header_end = reader.position();

    let registry_offset = header.plugin_registry_offset;
    if registry_offset < header_end as u64 || registry_offset >= data.len() as u64 {
        return Err(CoreStateError::OffsetOutOfBounds {
            field: "plugin_registry_offset",
            offset: registry_offset,
            len: data.len(),
        });
    }

    let mut reader = AccountReader::at(data, "plugin_registry", registry_offset)?;
    let registry = PluginRegistryV1::decode(&mut reader)?;
    registry.check_offsets(header_end, data.len())?;
    Ok((header, registry))
}
