use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

// Core program on mainnet and devnet
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("CoREENxT6tW1HoK8ypY1SxRMZTcVPm7R94rH4PZNhX7d");
