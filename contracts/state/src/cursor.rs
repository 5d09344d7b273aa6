//! Cursor-based primitive codec.
//!
//! Every sub-decoder receives an [`AccountReader`] over the whole account
//! buffer instead of a re-sliced copy, so offsets reported in errors are
//! always absolute account offsets and bounds checks live in one place.
//! Field encoding itself is borsh.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    error::{CoreStateError, StateResult},
    Pubkey,
};

/// Read-only view over account bytes with a consumption cursor.
#[derive(Debug, Clone)]
pub struct AccountReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> AccountReader<'a> {
    /// Creates a reader positioned at the start of the account.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    /// Creates a reader positioned at an absolute offset.
    pub fn at(data: &'a [u8], field: &'static str, offset: u64) -> StateResult<Self> {
        let cursor = usize::try_from(offset)
            .ok()
            .filter(|o| *o <= data.len())
            .ok_or(CoreStateError::OffsetOutOfBounds {
                field,
                offset,
                len: data.len(),
            })?;
        Ok(Self { data, cursor })
    }

    /// Absolute offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The full underlying account buffer.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self, field: &'static str) -> StateResult<u8> {
        self.data
            .get(self.cursor)
            .copied()
            .ok_or_else(|| CoreStateError::decode(field, self.cursor, "unexpected end of data"))
    }

    /// Decodes one borsh value and advances past it.
    pub fn read<T: BorshDeserialize>(&mut self, field: &'static str) -> StateResult<T> {
        let mut rest = self
            .data
            .get(self.cursor..)
            .ok_or_else(|| CoreStateError::decode(field, self.cursor, "cursor past end"))?;
        let before = rest.len();
        let value =
            T::deserialize(&mut rest).map_err(|e| CoreStateError::decode(field, self.cursor, e))?;
        self.cursor += before - rest.len();
        Ok(value)
    }

    pub fn read_u8(&mut self, field: &'static str) -> StateResult<u8> {
        self.read(field)
    }

    pub fn read_u32(&mut self, field: &'static str) -> StateResult<u32> {
        self.read(field)
    }

    pub fn read_u64(&mut self, field: &'static str) -> StateResult<u64> {
        self.read(field)
    }

    pub fn read_pubkey(&mut self, field: &'static str) -> StateResult<Pubkey> {
        self.read(field)
    }

    pub fn read_string(&mut self, field: &'static str) -> StateResult<String> {
        self.read(field)
    }

    /// Returns `len` raw bytes starting at an absolute offset, without moving the cursor.
    pub fn slice_at(&self, field: &'static str, offset: u64, len: u64) -> StateResult<&'a [u8]> {
        let out_of_bounds = CoreStateError::OffsetOutOfBounds {
            field,
            offset,
            len: self.data.len(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_bounds.clone())?;
        let len = usize::try_from(len).map_err(|_| out_of_bounds.clone())?;
        let end = start.checked_add(len).ok_or(out_of_bounds.clone())?;
        self.data.get(start..end).ok_or(out_of_bounds)
    }
}

/// Append-only account buffer.
#[derive(Debug, Default, Clone)]
pub struct AccountWriter {
    buf: Vec<u8>,
}

impl AccountWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute offset the next write lands at.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write<T: BorshSerialize>(&mut self, field: &'static str, value: &T) -> StateResult<()> {
        value
            .serialize(&mut self.buf)
            .map_err(|e| CoreStateError::Encode {
                field,
                reason: e.to_string(),
            })
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrites a little-endian u64 previously written at `offset`.
    pub fn patch_u64(&mut self, field: &'static str, offset: usize, value: u64) -> StateResult<()> {
        let slot = self
            .buf
            .get_mut(offset..offset + 8)
            .ok_or_else(|| CoreStateError::Encode {
                field,
                reason: format!("no u64 slot at offset {}", offset),
            })?;
        slot.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances_cursor() {
        let mut writer = AccountWriter::new();
        writer.write("a", &7u8).unwrap();
        writer.write("b", &"bread".to_string()).unwrap();
        writer.write("c", &42u64).unwrap();
        let data = writer.into_inner();

        let mut reader = AccountReader::new(&data);
        assert_eq!(reader.read_u8("a").unwrap(), 7);
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_string("b").unwrap(), "bread");
        assert_eq!(reader.position(), 1 + 4 + 5);
        assert_eq!(reader.read_u64("c").unwrap(), 42);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_truncated_read_names_field_and_offset() {
        let data = [1u8, 2, 3];
        let mut reader = AccountReader::new(&data);
        reader.read_u8("key").unwrap();
        let err = reader.read_u64("offset").unwrap_err();
        match err {
            CoreStateError::Decode { field, offset, .. } => {
                assert_eq!(field, "offset");
                assert_eq!(offset, 1);
            },
            other => panic!("unexpected error: {:?}", other),
        }
        // A failed read does not move the cursor
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_string_length_prefix_is_not_truncated() {
        // Declares 10 bytes but only 3 follow
        let mut data = 10u32.to_le_bytes().to_vec();
        data.extend_from_slice(b"abc");
        let mut reader = AccountReader::new(&data);
        assert!(reader.read_string("name").is_err());
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut data = 2u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        let mut reader = AccountReader::new(&data);
        assert!(reader.read_string("uri").is_err());
    }

    #[test]
    fn test_reader_at_out_of_bounds() {
        let data = [0u8; 4];
        assert!(AccountReader::at(&data, "registry", 4).is_ok());
        assert!(matches!(
            AccountReader::at(&data, "registry", 5),
            Err(CoreStateError::OffsetOutOfBounds { offset: 5, .. })
        ));
    }

    #[test]
    fn test_slice_at_checks_overflow() {
        let data = [0u8; 8];
        let reader = AccountReader::new(&data);
        assert_eq!(reader.slice_at("data", 2, 4).unwrap().len(), 4);
        assert!(reader.slice_at("data", 6, 4).is_err());
        assert!(reader.slice_at("data", u64::MAX, 2).is_err());
    }

    #[test]
    fn test_patch_u64() {
        let mut writer = AccountWriter::new();
        writer.write("k", &3u8).unwrap();
        writer.write("off", &0u64).unwrap();
        writer.patch_u64("off", 1, 99).unwrap();
        let data = writer.into_inner();
        assert_eq!(u64::from_le_bytes(data[1..9].try_into().unwrap()), 99);
        let mut w = AccountWriter::new();
        assert!(w.patch_u64("off", 0, 1).is_err());
    }
}
