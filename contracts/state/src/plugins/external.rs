//! External plugin adapters.
//!
//! Adapters delegate validation to another program or carry an auxiliary data
//! blob. Unlike internal plugins several adapters of one type may coexist; each
//! is identified by an [`ExternalPluginAdapterKey`].

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    authority::PluginAuthority,
    cursor::AccountReader,
    error::{CoreStateError, StateResult},
    Key, Pubkey,
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExternalPluginAdapterType {
    LifecycleHook = 0,
    Oracle = 1,
    AppData = 2,
    LinkedLifecycleHook = 3,
    LinkedAppData = 4,
    DataSection = 5,
}

impl TryFrom<u8> for ExternalPluginAdapterType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::LifecycleHook),
            1 => Ok(Self::Oracle),
            2 => Ok(Self::AppData),
            3 => Ok(Self::LinkedLifecycleHook),
            4 => Ok(Self::LinkedAppData),
            5 => Ok(Self::DataSection),
            other => Err(other),
        }
    }
}

impl From<ExternalPluginAdapterType> for u8 {
    fn from(t: ExternalPluginAdapterType) -> u8 {
        t as u8
    }
}

impl ExternalPluginAdapterType {
    pub fn allowed_on(&self, kind: Key) -> bool {
        match self {
            Self::LinkedLifecycleHook | Self::LinkedAppData => kind == Key::CollectionV1,
            Self::DataSection => kind == Key::AssetV1,
            _ => matches!(kind, Key::AssetV1 | Key::CollectionV1),
        }
    }
}

/// Encoding of an adapter's data blob.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExternalPluginAdapterSchema {
    #[default]
    Binary,
    Json,
    MsgPack,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Collection,
    Owner,
    Recipient,
    Asset,
    Address(Pubkey),
    Bytes(Vec<u8>),
}

/// An account the hooked program expects alongside the instruction.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum ExtraAccount {
    PreconfiguredProgram {
        is_signer: bool,
        is_writable: bool,
    },
    PreconfiguredCollection {
        is_signer: bool,
        is_writable: bool,
    },
    PreconfiguredOwner {
        is_signer: bool,
        is_writable: bool,
    },
    PreconfiguredRecipient {
        is_signer: bool,
        is_writable: bool,
    },
    PreconfiguredAsset {
        is_signer: bool,
        is_writable: bool,
    },
    CustomPda {
        seeds: Vec<Seed>,
        custom_program_id: Option<Pubkey>,
        is_signer: bool,
        is_writable: bool,
    },
    Address {
        address: Pubkey,
        is_signer: bool,
        is_writable: bool,
    },
}

/// Where validation results start inside an oracle account.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationResultsOffset {
    #[default]
    NoOffset,
    Anchor,
    Custom(u64),
}

/// The linked adapter a data section belongs to.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkedDataKey {
    LinkedLifecycleHook(Pubkey),
    LinkedAppData(PluginAuthority),
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct LifecycleHook {
    pub hooked_program: Pubkey,
    pub extra_accounts: Option<Vec<ExtraAccount>>,
    pub data_authority: Option<PluginAuthority>,
    pub schema: ExternalPluginAdapterSchema,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Oracle {
    pub base_address: Pubkey,
    pub base_address_config: Option<ExtraAccount>,
    pub results_offset: ValidationResultsOffset,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppData {
    pub data_authority: PluginAuthority,
    pub schema: ExternalPluginAdapterSchema,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkedLifecycleHook {
    pub hooked_program: Pubkey,
    pub extra_accounts: Option<Vec<ExtraAccount>>,
    pub data_authority: Option<PluginAuthority>,
    pub schema: ExternalPluginAdapterSchema,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkedAppData {
    pub data_authority: PluginAuthority,
    pub schema: ExternalPluginAdapterSchema,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct DataSection {
    pub parent_key: LinkedDataKey,
    pub schema: ExternalPluginAdapterSchema,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum ExternalPluginAdapter {
    LifecycleHook(LifecycleHook),
    Oracle(Oracle),
    AppData(AppData),
    LinkedLifecycleHook(LinkedLifecycleHook),
    LinkedAppData(LinkedAppData),
    DataSection(DataSection),
}

/// Identity of an adapter within one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalPluginAdapterKey {
    LifecycleHook(Pubkey),
    Oracle(Pubkey),
    AppData(PluginAuthority),
    LinkedLifecycleHook(Pubkey),
    LinkedAppData(PluginAuthority),
    DataSection(LinkedDataKey),
}

impl ExternalPluginAdapter {
    pub fn adapter_type(&self) -> ExternalPluginAdapterType {
        match self {
            Self::LifecycleHook(_) => ExternalPluginAdapterType::LifecycleHook,
            Self::Oracle(_) => ExternalPluginAdapterType::Oracle,
            Self::AppData(_) => ExternalPluginAdapterType::AppData,
            Self::LinkedLifecycleHook(_) => ExternalPluginAdapterType::LinkedLifecycleHook,
            Self::LinkedAppData(_) => ExternalPluginAdapterType::LinkedAppData,
            Self::DataSection(_) => ExternalPluginAdapterType::DataSection,
        }
    }

    pub fn key(&self) -> ExternalPluginAdapterKey {
        match self {
            Self::LifecycleHook(a) => ExternalPluginAdapterKey::LifecycleHook(a.hooked_program),
            Self::Oracle(a) => ExternalPluginAdapterKey::Oracle(a.base_address),
            Self::AppData(a) => ExternalPluginAdapterKey::AppData(a.data_authority),
            Self::LinkedLifecycleHook(a) => {
                ExternalPluginAdapterKey::LinkedLifecycleHook(a.hooked_program)
            },
            Self::LinkedAppData(a) => ExternalPluginAdapterKey::LinkedAppData(a.data_authority),
            Self::DataSection(a) => ExternalPluginAdapterKey::DataSection(a.parent_key),
        }
    }

    /// Schema of the adapter's data blob; oracles carry no data.
    pub fn schema(&self) -> Option<ExternalPluginAdapterSchema> {
        match self {
            Self::LifecycleHook(a) => Some(a.schema),
            Self::Oracle(_) => None,
            Self::AppData(a) => Some(a.schema),
            Self::LinkedLifecycleHook(a) => Some(a.schema),
            Self::LinkedAppData(a) => Some(a.schema),
            Self::DataSection(a) => Some(a.schema),
        }
    }

    /// Whether a data blob may be stored next to this adapter in the same account.
    ///
    /// Linked adapters keep their data in a `DataSection` on each asset instead.
    pub fn can_hold_data(&self) -> bool {
        match self {
            Self::LifecycleHook(a) => a.data_authority.is_some(),
            Self::AppData(_) | Self::DataSection(_) => true,
            Self::Oracle(_) | Self::LinkedLifecycleHook(_) | Self::LinkedAppData(_) => false,
        }
    }
}

/// Decodes the adapter payload at `offset`, which the registry says is `expected`.
pub fn decode_external_adapter(
    data: &[u8],
    offset: u64,
    expected: ExternalPluginAdapterType,
) -> StateResult<ExternalPluginAdapter> {
    let mut reader = AccountReader::at(data, "external_plugin_adapter", offset)?;
    let tag = reader.peek_u8("external_plugin_adapter")?;
    if ExternalPluginAdapterType::try_from(tag).is_err() {
        return Err(CoreStateError::UnknownPluginKind {
            discriminant: tag,
            offset: reader.position(),
        });
    }
    if tag != expected as u8 {
        return Err(CoreStateError::PluginTypeMismatch {
            expected: expected as u8,
            found: tag,
        });
    }
    reader.read("external_plugin_adapter")
}
