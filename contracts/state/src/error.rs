use pinocchio::program_error::ProgramError;
use thiserror::Error;

use crate::{
    plugins::{ExternalPluginAdapterType, PluginType},
    Key,
};

/// Error types raised while decoding or encoding Core accounts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreStateError {
    /// Truncated or malformed bytes at a known position
    #[error("failed to decode `{field}` at offset {offset}: {reason}")]
    Decode {
        field: &'static str,
        offset: usize,
        reason: String,
    },

    /// A value could not be written into the account buffer
    #[error("failed to encode `{field}`: {reason}")]
    Encode { field: &'static str, reason: String },

    /// The discriminant at this position belongs to another account kind
    #[error("unexpected account kind: expected {expected:?}, found discriminant {found}")]
    UnexpectedAccountKind { expected: Key, found: u8 },

    /// The account was burned and only holds the uninitialized sentinel
    #[error("account has been burned")]
    AccountBurned,

    /// A plugin discriminant no known plugin kind uses
    #[error("unknown plugin kind {discriminant} at offset {offset}")]
    UnknownPluginKind { discriminant: u8, offset: usize },

    /// An offset stored in the account points outside the usable range
    #[error("`{field}` offset {offset} is outside the account (len {len})")]
    OffsetOutOfBounds {
        field: &'static str,
        offset: u64,
        len: usize,
    },

    /// The payload tag disagrees with the registry record that located it
    #[error("plugin payload mismatch: registry says {expected}, payload tag is {found}")]
    PluginTypeMismatch { expected: u8, found: u8 },

    /// Two registry records for the same plugin kind
    #[error("duplicate plugin {0:?}")]
    DuplicatePlugin(PluginType),

    /// Two external adapters with the same identity
    #[error("duplicate external plugin adapter")]
    DuplicateExternalAdapter,

    /// The plugin kind cannot live on this account kind
    #[error("plugin {plugin_type:?} is not allowed on {kind:?} accounts")]
    PluginNotAllowed { plugin_type: PluginType, kind: Key },

    /// The adapter kind cannot live on this account kind
    #[error("external plugin adapter {adapter_type:?} is not allowed on {kind:?} accounts")]
    ExternalAdapterNotAllowed {
        adapter_type: ExternalPluginAdapterType,
        kind: Key,
    },
}

impl CoreStateError {
    pub(crate) fn decode(field: &'static str, offset: usize, reason: impl ToString) -> Self {
        Self::Decode {
            field,
            offset,
            reason: reason.to_string(),
        }
    }

    fn code(&self) -> u32 {
        match self {
            Self::Decode { .. } => 0,
            Self::Encode { .. } => 9,
            Self::UnexpectedAccountKind { .. } => 1,
            Self::AccountBurned => 2,
            Self::UnknownPluginKind { .. } => 3,
            Self::OffsetOutOfBounds { .. } => 4,
            Self::PluginTypeMismatch { .. } => 5,
            Self::DuplicatePlugin(_) => 6,
            Self::DuplicateExternalAdapter => 7,
            Self::PluginNotAllowed { .. } => 8,
            Self::ExternalAdapterNotAllowed { .. } => 10,
        }
    }
}

impl From<CoreStateError> for ProgramError {
    fn from(e: CoreStateError) -> Self {
        match e {
            CoreStateError::Decode { .. } => ProgramError::InvalidAccountData,
            other => ProgramError::Custom(other.code() + 2000),
        }
    }
}

pub type StateResult<T> = Result<T, CoreStateError>;
