//! Base records: the fixed prefix of every asset and collection account.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    cursor::{AccountReader, AccountWriter},
    error::StateResult,
    Key, Pubkey,
};

/// Update authority of an asset.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateAuthority {
    None,
    Address(Pubkey),
    Collection(Pubkey),
}

impl UpdateAuthority {
    /// The key stored in the variant, if any.
    pub fn key(&self) -> Option<&Pubkey> {
        match self {
            UpdateAuthority::None => None,
            UpdateAuthority::Address(key) | UpdateAuthority::Collection(key) => Some(key),
        }
    }

    /// The collection this asset belongs to, if any.
    pub fn collection(&self) -> Option<&Pubkey> {
        match self {
            UpdateAuthority::Collection(key) => Some(key),
            _ => None,
        }
    }
}

/// A fixed-prefix account record identified by its leading [`Key`].
pub trait BaseRecord: Sized {
    const KEY: Key;

    /// Decodes the fields following the key.
    fn decode_fields(reader: &mut AccountReader<'_>) -> StateResult<Self>;

    /// Encodes the fields following the key.
    fn encode_fields(&self, writer: &mut AccountWriter) -> StateResult<()>;
}

/// Decodes a base record from the start of `data`, returning it and the bytes consumed.
pub fn decode_base<B: BaseRecord>(data: &[u8]) -> StateResult<(B, usize)> {
    let mut reader = AccountReader::new(data);
    Key::expect(&mut reader, B::KEY)?;
    let record = B::decode_fields(&mut reader)?;
    Ok((record, reader.position()))
}

pub fn encode_base<B: BaseRecord>(record: &B) -> StateResult<Vec<u8>> {
    let mut writer = AccountWriter::new();
    write_base(record, &mut writer)?;
    Ok(writer.into_inner())
}

pub(crate) fn write_base<B: BaseRecord>(record: &B, writer: &mut AccountWriter) -> StateResult<()> {
    B::KEY.write(writer)?;
    record.encode_fields(writer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseAssetV1 {
    pub owner: Pubkey,
    pub update_authority: UpdateAuthority,
    pub name: String,
    pub uri: String,
    /// Sequence number maintained for compressed-asset indexing
    pub seq: Option<u64>,
}

impl BaseRecord for BaseAssetV1 {
    const KEY: Key = Key::AssetV1;

    fn decode_fields(reader: &mut AccountReader<'_>) -> StateResult<Self> {
        Ok(Self {
            owner: reader.read_pubkey("owner")?,
            update_authority: reader.read("update_authority")?,
            name: reader.read_string("name")?,
            uri: reader.read_string("uri")?,
            seq: reader.read("seq")?,
        })
    }

    fn encode_fields(&self, writer: &mut AccountWriter) -> StateResult<()> {
        writer.write("owner", &self.owner)?;
        writer.write("update_authority", &self.update_authority)?;
        writer.write("name", &self.name)?;
        writer.write("uri", &self.uri)?;
        writer.write("seq", &self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCollectionV1 {
    pub update_authority: Pubkey,
    pub name: String,
    pub uri: String,
    /// Total assets ever minted into the collection; never decremented
    pub num_minted: u32,
    /// Assets currently pointing at the collection
    pub current_size: u32,
}

impl BaseRecord for BaseCollectionV1 {
    const KEY: Key = Key::CollectionV1;

    fn decode_fields(reader: &mut AccountReader<'_>) -> StateResult<Self> {
        Ok(Self {
            update_authority: reader.read_pubkey("update_authority")?,
            name: reader.read_string("name")?,
            uri: reader.read_string("uri")?,
            num_minted: reader.read_u32("num_minted")?,
            current_size: reader.read_u32("current_size")?,
        })
    }

    fn encode_fields(&self, writer: &mut AccountWriter) -> StateResult<()> {
        writer.write("update_authority", &self.update_authority)?;
        writer.write("name", &self.name)?;
        writer.write("uri", &self.uri)?;
        writer.write("num_minted", &self.num_minted)?;
        writer.write("current_size", &self.current_size)
    }
}
