//! Client configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::core::constants::DEFAULT_PROGRAM_ID;
use crate::error::{CoreSdkError, Result};

fn default_program_id() -> String {
    DEFAULT_PROGRAM_ID.to_string()
}

const fn default_verify_account_owner() -> bool {
    true
}

/// Settings for fetching and decoding Core accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreClientConfig {
    /// Program that must own fetched accounts (base58).
    #[serde(default = "default_program_id")]
    pub program_id: String,

    /// Fail fetches that meet an unknown plugin kind instead of dropping it.
    #[serde(default)]
    pub strict_plugin_decoding: bool,

    /// Reject accounts whose owner is not `program_id`.
    #[serde(default = "default_verify_account_owner")]
    pub verify_account_owner: bool,
}

impl Default for CoreClientConfig {
    fn default() -> Self {
        Self {
            program_id: default_program_id(),
            strict_plugin_decoding: false,
            verify_account_owner: default_verify_account_owner(),
        }
    }
}

impl CoreClientConfig {
    /// Parses a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.program_id()?;
        Ok(config)
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        Pubkey::from_str(&self.program_id).map_err(|e| {
            CoreSdkError::InvalidConfig(format!("program_id {:?}: {}", self.program_id, e))
        })
    }
}
