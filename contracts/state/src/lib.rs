//! CoreKit State Module
//!
//! Account data model for Core assets and collections: a fixed base record
//! followed by an optional plugin registry. Decoding is pure and works over a
//! single borrowed account buffer.

pub mod assembly;
pub mod authority;
pub mod base;
pub mod builder;
pub mod cursor;
pub mod error;
pub mod plugins;

pub use pinocchio::pubkey::Pubkey;

pub use assembly::{
    assemble, Asset, Collection, CoreAccount, ExternalAdapterEntry, ExternalAdaptersList,
    PluginEntry, PluginsList,
};
pub use authority::{AuthorityContext, PluginAuthority};
pub use base::{decode_base, encode_base, BaseAssetV1, BaseCollectionV1, BaseRecord, UpdateAuthority};
pub use builder::AccountBuilder;
pub use cursor::{AccountReader, AccountWriter};
pub use error::{CoreStateError, StateResult};
pub use plugins::{
    decode_external_adapter, decode_plugin, decode_registry, ExternalPluginAdapter,
    ExternalPluginAdapterKey, ExternalPluginAdapterType, Plugin, PluginHeaderV1,
    PluginRegistryV1, PluginType,
};

/// Account type discriminator, always the first byte of a Core account.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Burned account sentinel
    Uninitialized = 0,
    AssetV1 = 1,
    HashedAssetV1 = 2,
    PluginHeaderV1 = 3,
    PluginRegistryV1 = 4,
    CollectionV1 = 5,
}

impl TryFrom<u8> for Key {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Key::Uninitialized),
            1 => Ok(Key::AssetV1),
            2 => Ok(Key::HashedAssetV1),
            3 => Ok(Key::PluginHeaderV1),
            4 => Ok(Key::PluginRegistryV1),
            5 => Ok(Key::CollectionV1),
            other => Err(other),
        }
    }
}

impl Key {
    /// Consumes the discriminator byte and checks it is `expected`.
    pub fn expect(reader: &mut AccountReader<'_>, expected: Key) -> StateResult<()> {
        let at_start = reader.position() == 0;
        let found = reader.read_u8("key")?;
        if found == expected as u8 {
            return Ok(());
        }
        if at_start && found == Key::Uninitialized as u8 && reader.data().len() == 1 {
            return Err(CoreStateError::AccountBurned);
        }
        Err(CoreStateError::UnexpectedAccountKind { expected, found })
    }

    pub fn write(self, writer: &mut AccountWriter) -> StateResult<()> {
        writer.write("key", &(self as u8))
    }
}

/// Returns true for an account that was burned and resized to the sentinel byte.
pub fn is_burned(data: &[u8]) -> bool {
    data == [Key::Uninitialized as u8]
}
