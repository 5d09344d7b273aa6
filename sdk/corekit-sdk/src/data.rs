//! Interpreting the data blobs attached to data-holding adapters.

use corekit_state::plugins::external::ExternalPluginAdapterSchema;
use corekit_state::ExternalAdapterEntry;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Adapter data decoded according to the adapter's schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterData {
    Json(serde_json::Value),
    Binary(Vec<u8>),
    /// Raw MessagePack bytes, left for the caller to decode
    MsgPack(Vec<u8>),
}

impl AdapterData {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            AdapterData::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Deserializes JSON data into a caller type.
    pub fn json_into<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match self {
            AdapterData::Json(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            _ => Ok(None),
        }
    }
}

/// Decodes the entry's data blob; `None` when it has no schema or no data.
pub fn decode_adapter_data(entry: &ExternalAdapterEntry) -> Result<Option<AdapterData>> {
    let (Some(schema), Some(data)) = (entry.adapter.schema(), entry.data.as_deref()) else {
        return Ok(None);
    };
    if data.is_empty() {
        return Ok(None);
    }
    let decoded = match schema {
        ExternalPluginAdapterSchema::Json => AdapterData::Json(serde_json::from_slice(data)?),
        ExternalPluginAdapterSchema::Binary => AdapterData::Binary(data.to_vec()),
        ExternalPluginAdapterSchema::MsgPack => AdapterData::MsgPack(data.to_vec()),
    };
    Ok(Some(decoded))
}

/// Encodes a value as a JSON data blob.
pub fn encode_json_data<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}
