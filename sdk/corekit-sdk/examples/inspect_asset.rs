// Example: decoding an asset and inspecting its derived state
//
// This example demonstrates how to:
// 1. Build asset account bytes with a frozen FreezeDelegate
// 2. Decode them into an assembled asset
// 3. Ask the derivation engine who may act on it

use corekit_sdk::{can_transfer, check_plugin_authorities, is_frozen};
use corekit_state::plugins::FreezeDelegate;
use corekit_state::{
    AccountBuilder, Asset, BaseAssetV1, Plugin, PluginAuthority, PluginType, UpdateAuthority,
};
use solana_sdk::pubkey::Pubkey;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let owner = Pubkey::new_unique();
    let update_authority = Pubkey::new_unique();
    let address = Pubkey::new_unique();

    // 1. Account bytes as the program would store them
    let mut builder = AccountBuilder::new(BaseAssetV1 {
        owner: owner.to_bytes(),
        update_authority: UpdateAuthority::Address(update_authority.to_bytes()),
        name: "Test Bread".to_string(),
        uri: "https://example.com/bread".to_string(),
        seq: None,
    });
    builder.add_plugin(
        Plugin::FreezeDelegate(FreezeDelegate { frozen: true }),
        PluginAuthority::Owner,
    )?;
    let data = builder.build()?;
    println!("Account is {} bytes", data.len());

    // 2. Decode
    let asset = Asset::from_bytes(address.to_bytes(), &data)?;
    for (name, entry) in asset.plugins.named() {
        println!("  {} at offset {} ({:?})", name, entry.offset, entry.authority);
    }

    // 3. Derive
    println!("Frozen: {}", is_frozen(&asset, None));
    println!("Owner can transfer: {}", can_transfer(&owner, &asset, None)?);
    let checks = check_plugin_authorities(&asset, &[PluginType::FreezeDelegate], &owner, None)?;
    println!("Owner controls freezeDelegate: {}", checks[0]);

    Ok(())
}
