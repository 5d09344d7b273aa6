//! Internal plugins.
//!
//! Each plugin payload is the tagged [`Plugin`] union whose tag equals the
//! [`PluginType`] discriminant recorded in the registry.

pub mod external;
pub mod lifecycle;
pub mod registry;
pub mod types;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    authority::PluginAuthority,
    cursor::AccountReader,
    error::{CoreStateError, StateResult},
    Key,
};

pub use external::{
    decode_external_adapter, ExternalPluginAdapter, ExternalPluginAdapterKey,
    ExternalPluginAdapterType,
};
pub use registry::{decode_registry, PluginHeaderV1, PluginRegistryV1, RecordKind};
pub use types::*;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginType {
    Royalties = 0,
    FreezeDelegate = 1,
    BurnDelegate = 2,
    TransferDelegate = 3,
    UpdateDelegate = 4,
    PermanentFreezeDelegate = 5,
    Attributes = 6,
    PermanentTransferDelegate = 7,
    PermanentBurnDelegate = 8,
    Edition = 9,
    MasterEdition = 10,
    AddBlocker = 11,
    ImmutableMetadata = 12,
    VerifiedCreators = 13,
    Autograph = 14,
    /// Slot held by the program for an internal plugin; never surfaced
    Reserved = 15,
    FreezeExecute = 16,
    PermanentFreezeExecute = 17,
    Treasury = 18,
}

/// Who manages a plugin by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginManager {
    Owner,
    UpdateAuthority,
}

/// Which account kinds a plugin may live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginPlacement {
    AssetOnly,
    CollectionOnly,
    Both,
}

impl TryFrom<u8> for PluginType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PluginType::ALL
            .iter()
            .copied()
            .find(|t| *t as u8 == value)
            .ok_or(value)
    }
}

impl From<PluginType> for u8 {
    fn from(t: PluginType) -> u8 {
        t as u8
    }
}

impl PluginType {
    pub const ALL: [PluginType; 19] = [
        PluginType::Royalties,
        PluginType::FreezeDelegate,
        PluginType::BurnDelegate,
        PluginType::TransferDelegate,
        PluginType::UpdateDelegate,
        PluginType::PermanentFreezeDelegate,
        PluginType::Attributes,
        PluginType::PermanentTransferDelegate,
        PluginType::PermanentBurnDelegate,
        PluginType::Edition,
        PluginType::MasterEdition,
        PluginType::AddBlocker,
        PluginType::ImmutableMetadata,
        PluginType::VerifiedCreators,
        PluginType::Autograph,
        PluginType::Reserved,
        PluginType::FreezeExecute,
        PluginType::PermanentFreezeExecute,
        PluginType::Treasury,
    ];

    /// Plugins whose authority follows the owner and resets on transfer.
    pub const OWNER_MANAGED: [PluginType; 4] = [
        PluginType::FreezeDelegate,
        PluginType::TransferDelegate,
        PluginType::BurnDelegate,
        PluginType::FreezeExecute,
    ];

    /// Discriminant name, e.g. `FreezeDelegate`.
    pub fn name(&self) -> &'static str {
        match self {
            PluginType::Royalties => "Royalties",
            PluginType::FreezeDelegate => "FreezeDelegate",
            PluginType::BurnDelegate => "BurnDelegate",
            PluginType::TransferDelegate => "TransferDelegate",
            PluginType::UpdateDelegate => "UpdateDelegate",
            PluginType::PermanentFreezeDelegate => "PermanentFreezeDelegate",
            PluginType::Attributes => "Attributes",
            PluginType::PermanentTransferDelegate => "PermanentTransferDelegate",
            PluginType::PermanentBurnDelegate => "PermanentBurnDelegate",
            PluginType::Edition => "Edition",
            PluginType::MasterEdition => "MasterEdition",
            PluginType::AddBlocker => "AddBlocker",
            PluginType::ImmutableMetadata => "ImmutableMetadata",
            PluginType::VerifiedCreators => "VerifiedCreators",
            PluginType::Autograph => "Autograph",
            PluginType::Reserved => "Reserved",
            PluginType::FreezeExecute => "FreezeExecute",
            PluginType::PermanentFreezeExecute => "PermanentFreezeExecute",
            PluginType::Treasury => "Treasury",
        }
    }

    /// Canonical camelCase key of the plugin in an assembled account, e.g. `freezeDelegate`.
    pub fn key_name(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn from_key_name(key: &str) -> Option<Self> {
        PluginType::ALL.iter().copied().find(|t| t.key_name() == key)
    }

    pub fn manager(&self) -> PluginManager {
        if PluginType::OWNER_MANAGED.contains(self) {
            PluginManager::Owner
        } else {
            PluginManager::UpdateAuthority
        }
    }

    /// Permanent plugins can only be added at creation.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            PluginType::PermanentFreezeDelegate
                | PluginType::PermanentTransferDelegate
                | PluginType::PermanentBurnDelegate
                | PluginType::PermanentFreezeExecute
                | PluginType::Edition
        )
    }

    pub fn default_authority(&self) -> PluginAuthority {
        match self.manager() {
            PluginManager::Owner => PluginAuthority::Owner,
            PluginManager::UpdateAuthority => PluginAuthority::UpdateAuthority,
        }
    }

    pub fn placement(&self) -> PluginPlacement {
        match self {
            PluginType::FreezeDelegate
            | PluginType::BurnDelegate
            | PluginType::TransferDelegate
            | PluginType::Edition
            | PluginType::FreezeExecute => PluginPlacement::AssetOnly,
            PluginType::MasterEdition | PluginType::Treasury | PluginType::Reserved => {
                PluginPlacement::CollectionOnly
            },
            _ => PluginPlacement::Both,
        }
    }

    pub fn allowed_on(&self, kind: Key) -> bool {
        match (self.placement(), kind) {
            (PluginPlacement::Both, Key::AssetV1 | Key::CollectionV1) => true,
            (PluginPlacement::AssetOnly, Key::AssetV1) => true,
            (PluginPlacement::CollectionOnly, Key::CollectionV1) => true,
            _ => false,
        }
    }

    /// A collection-level instance of this plugin applies to member assets.
    pub fn is_collection_inheritable(&self) -> bool {
        self.placement() == PluginPlacement::Both
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum Plugin {
    Royalties(Royalties),
    FreezeDelegate(FreezeDelegate),
    BurnDelegate(BurnDelegate),
    TransferDelegate(TransferDelegate),
    UpdateDelegate(UpdateDelegate),
    PermanentFreezeDelegate(PermanentFreezeDelegate),
    Attributes(Attributes),
    PermanentTransferDelegate(PermanentTransferDelegate),
    PermanentBurnDelegate(PermanentBurnDelegate),
    Edition(Edition),
    MasterEdition(MasterEdition),
    AddBlocker(AddBlocker),
    ImmutableMetadata(ImmutableMetadata),
    VerifiedCreators(VerifiedCreators),
    Autograph(Autograph),
    Reserved(Reserved),
    FreezeExecute(FreezeExecute),
    PermanentFreezeExecute(PermanentFreezeExecute),
    Treasury(Treasury),
}

impl Plugin {
    pub fn plugin_type(&self) -> PluginType {
        match self {
            Plugin::Royalties(_) => PluginType::Royalties,
            Plugin::FreezeDelegate(_) => PluginType::FreezeDelegate,
            Plugin::BurnDelegate(_) => PluginType::BurnDelegate,
            Plugin::TransferDelegate(_) => PluginType::TransferDelegate,
            Plugin::UpdateDelegate(_) => PluginType::UpdateDelegate,
            Plugin::PermanentFreezeDelegate(_) => PluginType::PermanentFreezeDelegate,
            Plugin::Attributes(_) => PluginType::Attributes,
            Plugin::PermanentTransferDelegate(_) => PluginType::PermanentTransferDelegate,
            Plugin::PermanentBurnDelegate(_) => PluginType::PermanentBurnDelegate,
            Plugin::Edition(_) => PluginType::Edition,
            Plugin::MasterEdition(_) => PluginType::MasterEdition,
            Plugin::AddBlocker(_) => PluginType::AddBlocker,
            Plugin::ImmutableMetadata(_) => PluginType::ImmutableMetadata,
            Plugin::VerifiedCreators(_) => PluginType::VerifiedCreators,
            Plugin::Autograph(_) => PluginType::Autograph,
            Plugin::Reserved(_) => PluginType::Reserved,
            Plugin::FreezeExecute(_) => PluginType::FreezeExecute,
            Plugin::PermanentFreezeExecute(_) => PluginType::PermanentFreezeExecute,
            Plugin::Treasury(_) => PluginType::Treasury,
        }
    }

    /// The `frozen` flag of freeze-style plugins.
    pub fn frozen(&self) -> Option<bool> {
        match self {
            Plugin::FreezeDelegate(p) => Some(p.frozen),
            Plugin::PermanentFreezeDelegate(p) => Some(p.frozen),
            Plugin::FreezeExecute(p) => Some(p.frozen),
            Plugin::PermanentFreezeExecute(p) => Some(p.frozen),
            _ => None,
        }
    }

    /// Extra update delegates carried by an `UpdateDelegate` plugin.
    pub fn additional_delegates(&self) -> &[crate::Pubkey] {
        match self {
            Plugin::UpdateDelegate(p) => &p.additional_delegates,
            _ => &[],
        }
    }
}

/// Decodes the plugin payload at `offset`, which the registry says is `expected`.
pub fn decode_plugin(data: &[u8], offset: u64, expected: PluginType) -> StateResult<Plugin> {
    let mut reader = AccountReader::at(data, "plugin", offset)?;
    let tag = reader.peek_u8("plugin")?;
    if PluginType::try_from(tag).is_err() {
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
    reader.read("plugin")
}
