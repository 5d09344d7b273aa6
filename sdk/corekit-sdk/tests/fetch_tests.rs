use corekit_sdk::{
    decode_adapter_data, encode_json_data, fetch_asset, fetch_asset_with_collection,
    fetch_assets, fetch_collection, AdapterData, CoreClientConfig, CoreSdkError,
};
use corekit_state::plugins::external::{AppData, ExternalPluginAdapterSchema};
use corekit_state::plugins::registry::RegistryRecord;
use corekit_state::plugins::{FreezeDelegate, PermanentFreezeDelegate, RecordKind, Royalties};
use corekit_state::{
    encode_base, AccountBuilder, AccountWriter, ExternalPluginAdapter, ExternalPluginAdapterKey,
    Plugin, PluginAuthority, PluginHeaderV1, PluginRegistryV1, PluginType, UpdateAuthority,
};

mod common;
use common::{bakery, bread, random_pubkey, OfflineConnection, TestContext};

#[test_log::test(tokio::test)]
async fn test_fetch_plain_asset() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let asset_address = random_pubkey();
    let owner = random_pubkey();
    let data = encode_base(&bread(&owner, UpdateAuthority::Address(owner.to_bytes())))?;
    ctx.set_core_account(asset_address, data).await;

    let asset = fetch_asset(&ctx, &asset_address, &CoreClientConfig::default()).await?;
    assert_eq!(asset.base.name, "Test Bread");
    assert_eq!(asset.base.uri, "https://example.com/bread");
    assert!(asset.plugin_header.is_none());
    assert!(asset.plugins.is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_fetch_asset_with_collection() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let asset_address = random_pubkey();
    let collection_address = random_pubkey();
    let owner = random_pubkey();
    let authority = random_pubkey();

    let mut collection = AccountBuilder::new(bakery(&authority));
    collection.add_plugin_default(Plugin::PermanentFreezeDelegate(PermanentFreezeDelegate {
        frozen: true,
    }))?;
    ctx.set_core_account(collection_address, collection.build()?).await;

    let mut asset = AccountBuilder::new(bread(
        &owner,
        UpdateAuthority::Collection(collection_address.to_bytes()),
    ));
    asset.add_plugin_default(Plugin::Royalties(Royalties {
        basis_points: 250,
        ..Royalties::default()
    }))?;
    ctx.set_core_account(asset_address, asset.build()?).await;

    let config = CoreClientConfig::default();
    let fetched = fetch_asset_with_collection(&ctx, &asset_address, &config).await?;
    assert_eq!(fetched.address(), asset_address);
    let collection = fetched.collection().expect("collection fetched");
    assert_eq!(collection.base.name, "Bakery");
    // Frozen only through the collection's permanent freeze
    assert!(fetched.is_frozen());
    let derived = fetched.derived_plugins();
    assert!(derived.contains(PluginType::Royalties));
    assert!(derived.contains(PluginType::PermanentFreezeDelegate));

    let direct = fetch_collection(&ctx, &collection_address, &config).await?;
    assert_eq!(&direct, collection);
    Ok(())
}

#[tokio::test]
async fn test_fetch_errors() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let config = CoreClientConfig::default();
    let missing = random_pubkey();
    assert!(matches!(
        fetch_asset(&ctx, &missing, &config).await,
        Err(CoreSdkError::AccountNotFound(key)) if key == missing
    ));

    let foreign = random_pubkey();
    let owner = random_pubkey();
    let data = encode_base(&bread(&owner, UpdateAuthority::None))?;
    ctx.set_account(foreign, data.clone(), random_pubkey()).await;
    assert!(matches!(
        fetch_asset(&ctx, &foreign, &config).await,
        Err(CoreSdkError::InvalidAccountOwner { .. })
    ));
    let lenient = CoreClientConfig {
        verify_account_owner: false,
        ..CoreClientConfig::default()
    };
    assert!(fetch_asset(&ctx, &foreign, &lenient).await.is_ok());

    // An asset is not a collection
    let asset_address = random_pubkey();
    ctx.set_core_account(asset_address, data).await;
    assert!(matches!(
        fetch_collection(&ctx, &asset_address, &config).await,
        Err(CoreSdkError::State(_))
    ));

    let burned = random_pubkey();
    ctx.set_core_account(burned, vec![0]).await;
    assert!(matches!(
        fetch_asset(&ctx, &burned, &config).await,
        Err(CoreSdkError::State(corekit_state::CoreStateError::AccountBurned))
    ));

    assert!(matches!(
        fetch_asset(&OfflineConnection, &missing, &config).await,
        Err(CoreSdkError::Connection(_))
    ));
    Ok(())
}

/// An asset whose registry holds an unknown kind ahead of a frozen FreezeDelegate.
fn asset_with_unknown_kind(owner: &solana_sdk::pubkey::Pubkey) -> anyhow::Result<Vec<u8>> {
    let mut writer = AccountWriter::new();
    writer.write_bytes(&encode_base(&bread(owner, UpdateAuthority::None))?);
    let header_offset = writer.position();
    PluginHeaderV1 {
        plugin_registry_offset: 0,
    }
    .encode(&mut writer)?;

    let unknown_offset = writer.position() as u64;
    writer.write_bytes(&[99, 1, 2, 3]);
    let freeze_offset = writer.position() as u64;
    writer.write("plugin", &Plugin::FreezeDelegate(FreezeDelegate { frozen: true }))?;

    let registry = PluginRegistryV1 {
        registry: vec![
            RegistryRecord {
                plugin_type: RecordKind::Unknown(99),
                authority: PluginAuthority::UpdateAuthority,
                offset: unknown_offset,
            },
            RegistryRecord {
                plugin_type: RecordKind::Known(PluginType::FreezeDelegate),
                authority: PluginAuthority::Owner,
                offset: freeze_offset,
            },
        ],
        external_registry: vec![],
    };
    let registry_offset = writer.position() as u64;
    registry.encode(&mut writer)?;
    writer.patch_u64("plugin_registry_offset", header_offset + 1, registry_offset)?;
    Ok(writer.into_inner())
}

#[test_log::test(tokio::test)]
async fn test_unknown_kind_policy() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let address = random_pubkey();
    let owner = random_pubkey();
    ctx.set_core_account(address, asset_with_unknown_kind(&owner)?).await;

    let asset = fetch_asset(&ctx, &address, &CoreClientConfig::default()).await?;
    assert_eq!(asset.unknown_plugin_kinds, vec![99]);
    let freeze = asset.plugins.get(PluginType::FreezeDelegate).expect("aligned");
    assert_eq!(freeze.authority, PluginAuthority::Owner);
    assert!(corekit_sdk::is_frozen(&asset, None));

    let strict = CoreClientConfig::from_json(r#"{"strict_plugin_decoding": true}"#)?;
    assert!(matches!(
        fetch_asset(&ctx, &address, &strict).await,
        Err(CoreSdkError::UnknownPluginKind(99))
    ));
    Ok(())
}

#[tokio::test]
async fn test_fetch_many_and_app_data() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let owner = random_pubkey();
    let data_authority = random_pubkey();

    let mut builder = AccountBuilder::new(bread(&owner, UpdateAuthority::None));
    builder.add_external_adapter(
        ExternalPluginAdapter::AppData(AppData {
            data_authority: PluginAuthority::address(data_authority.to_bytes()),
            schema: ExternalPluginAdapterSchema::Json,
        }),
        PluginAuthority::UpdateAuthority,
        None,
        Some(encode_json_data(&serde_json::json!({ "crust": "dark", "loaves": 3 }))?),
    )?;
    let first = random_pubkey();
    let second = random_pubkey();
    ctx.set_core_account(first, builder.build()?).await;
    ctx.set_core_account(second, encode_base(&bread(&owner, UpdateAuthority::None))?)
        .await;

    let assets = fetch_assets(
        &ctx,
        &[first, random_pubkey(), second],
        &CoreClientConfig::default(),
    )
    .await?;
    assert_eq!(assets.len(), 2);

    let entry = assets[0]
        .external_plugin_adapters
        .get(&ExternalPluginAdapterKey::AppData(PluginAuthority::address(
            data_authority.to_bytes(),
        )))
        .expect("app data adapter");
    let content = decode_adapter_data(entry)?.expect("json content");
    assert_eq!(content.as_json().and_then(|v| v["loaves"].as_u64()), Some(3));
    assert!(!matches!(content, AdapterData::Binary(_)));
    Ok(())
}
