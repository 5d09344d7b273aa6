use corekit_state::{CoreStateError, PluginType};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// SDK-specific error types for Core account operations
#[derive(Debug, Error)]
pub enum CoreSdkError {
    /// Connection or RPC error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Account not found on-chain
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Account exists but is not owned by the configured program
    #[error("Account {address} is owned by {owner}, not the Core program")]
    InvalidAccountOwner { address: Pubkey, owner: Pubkey },

    /// Account bytes failed to decode or assemble
    #[error("State error: {0}")]
    State(#[from] CoreStateError),

    /// Strict decoding found a plugin kind this version does not know
    #[error("Unknown plugin kind {0}")]
    UnknownPluginKind(u8),

    /// The supplied collection is not the one the asset points at
    #[error("Asset does not belong to collection {0}")]
    MismatchedCollection(Pubkey),

    /// No third-party owner-managed delegate exists to revoke
    #[error("Cannot revoke: no third-party delegate on the asset")]
    CannotRevoke,

    /// Target is the owner or already a delegate
    #[error("Cannot delegate to {0}")]
    CannotDelegate(Pubkey),

    /// The asset has no plugin of this kind
    #[error("Plugin {0:?} not found on the asset")]
    PluginNotFound(PluginType),

    /// The asset already has a plugin of this kind
    #[error("Cannot add {0:?} to the asset")]
    CannotAddPlugin(PluginType),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, CoreSdkError>;
