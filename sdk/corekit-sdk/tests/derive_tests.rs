use corekit_sdk::{
    apply_transfer, can_burn, can_transfer, check_plugin_authorities, derive_asset_plugins,
    effective_plugin_authority, has_asset_update_authority, has_collection_update_authority,
    is_execute_frozen, is_frozen, CoreSdkError,
};
use corekit_state::plugins::{
    Attributes, BurnDelegate, FreezeDelegate, FreezeExecute, PermanentBurnDelegate,
    PermanentFreezeDelegate, PermanentFreezeExecute, PermanentTransferDelegate, Royalties,
    TransferDelegate, UpdateDelegate,
};
use corekit_state::{Plugin, PluginAuthority, PluginType, UpdateAuthority};

mod common;
use common::{address, asset_with, bakery, bread, collection_with, random_pubkey};

#[test_log::test]
fn test_frozen_by_freeze_delegate() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::None),
        vec![(
            Plugin::FreezeDelegate(FreezeDelegate { frozen: true }),
            PluginAuthority::Owner,
        )],
    )?;
    assert!(is_frozen(&asset, None));

    let thawed = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::None),
        vec![(
            Plugin::FreezeDelegate(FreezeDelegate { frozen: false }),
            PluginAuthority::Owner,
        )],
    )?;
    assert!(!is_frozen(&thawed, None));
    Ok(())
}

#[test]
fn test_frozen_is_monotonic() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let ua = random_pubkey();
    let collection_address = random_pubkey();

    for (freeze, permanent, collection_permanent) in [
        (false, false, false),
        (true, false, false),
        (false, true, false),
        (false, false, true),
        (true, true, true),
    ] {
        let asset = asset_with(
            &random_pubkey(),
            bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
            vec![
                (
                    Plugin::FreezeDelegate(FreezeDelegate { frozen: freeze }),
                    PluginAuthority::Owner,
                ),
                (
                    Plugin::PermanentFreezeDelegate(PermanentFreezeDelegate { frozen: permanent }),
                    PluginAuthority::UpdateAuthority,
                ),
            ],
        )?;
        let collection = collection_with(
            &collection_address,
            bakery(&ua),
            vec![(
                Plugin::PermanentFreezeDelegate(PermanentFreezeDelegate {
                    frozen: collection_permanent,
                }),
                PluginAuthority::UpdateAuthority,
            )],
        )?;
        let expected = freeze || permanent || collection_permanent;
        assert_eq!(is_frozen(&asset, Some(&collection)), expected);
        // Without the collection only asset-level flags count
        assert_eq!(is_frozen(&asset, None), freeze || permanent);
    }
    Ok(())
}

#[test]
fn test_execute_freeze() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let collection_address = random_pubkey();
    let asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![(
            Plugin::FreezeExecute(FreezeExecute { frozen: false }),
            PluginAuthority::Owner,
        )],
    )?;
    let collection = collection_with(
        &collection_address,
        bakery(&random_pubkey()),
        vec![(
            Plugin::PermanentFreezeExecute(PermanentFreezeExecute { frozen: true }),
            PluginAuthority::UpdateAuthority,
        )],
    )?;
    assert!(!is_execute_frozen(&asset, None));
    assert!(is_execute_frozen(&asset, Some(&collection)));
    // Execute freeze does not freeze transfers
    assert!(!is_frozen(&asset, Some(&collection)));
    Ok(())
}

#[test]
fn test_update_authority_through_collection_delegate() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let ua = random_pubkey();
    let delegate = random_pubkey();
    let collection_address = random_pubkey();

    let asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![],
    )?;
    let collection = collection_with(
        &collection_address,
        bakery(&ua),
        vec![(
            Plugin::UpdateDelegate(UpdateDelegate::default()),
            address(&delegate),
        )],
    )?;

    assert!(has_asset_update_authority(&delegate, &asset, Some(&collection))?);
    assert!(has_asset_update_authority(&ua, &asset, Some(&collection))?);
    assert!(!has_asset_update_authority(&owner, &asset, Some(&collection))?);
    assert!(has_collection_update_authority(&delegate, &collection));
    assert!(!has_collection_update_authority(&owner, &collection));

    let other = collection_with(&random_pubkey(), bakery(&ua), vec![])?;
    assert!(matches!(
        has_asset_update_authority(&ua, &asset, Some(&other)),
        Err(CoreSdkError::MismatchedCollection(_))
    ));
    Ok(())
}

#[test]
fn test_update_authority_on_asset() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let ua = random_pubkey();
    let extra = random_pubkey();
    let asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Address(ua.to_bytes())),
        vec![(
            Plugin::UpdateDelegate(UpdateDelegate {
                additional_delegates: vec![extra.to_bytes()],
            }),
            PluginAuthority::UpdateAuthority,
        )],
    )?;
    assert!(has_asset_update_authority(&ua, &asset, None)?);
    assert!(has_asset_update_authority(&extra, &asset, None)?);
    assert!(!has_asset_update_authority(&owner, &asset, None)?);

    // A supplied collection must be the asset's
    let collection = collection_with(&random_pubkey(), bakery(&ua), vec![])?;
    assert!(has_asset_update_authority(&ua, &asset, Some(&collection)).is_err());
    Ok(())
}

#[test]
fn test_plugin_authorities_inherit_from_collection() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let ua = random_pubkey();
    let royalty_admin = random_pubkey();
    let collection_address = random_pubkey();

    let asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![(
            Plugin::FreezeDelegate(FreezeDelegate { frozen: false }),
            PluginAuthority::Owner,
        )],
    )?;
    let collection = collection_with(
        &collection_address,
        bakery(&ua),
        vec![(Plugin::Royalties(Royalties::default()), address(&royalty_admin))],
    )?;

    let kinds = [
        PluginType::FreezeDelegate,
        PluginType::Royalties,
        PluginType::Attributes,
    ];
    assert_eq!(
        check_plugin_authorities(&asset, &kinds, &owner, Some(&collection))?,
        vec![true, false, false]
    );
    assert_eq!(
        check_plugin_authorities(&asset, &kinds, &royalty_admin, Some(&collection))?,
        vec![false, true, false]
    );
    // Undefined plugins deny even the update authority
    assert_eq!(
        check_plugin_authorities(&asset, &kinds, &ua, Some(&collection))?,
        vec![false, false, false]
    );
    // Without the collection only the asset's own plugins are consulted
    assert_eq!(
        check_plugin_authorities(&asset, &kinds, &owner, None)?,
        vec![true, false, false]
    );
    assert_eq!(
        check_plugin_authorities(&asset, &kinds, &royalty_admin, None)?,
        vec![false, false, false]
    );
    Ok(())
}

#[test]
fn test_collection_update_authority_overrides_asset_owner() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let ua = random_pubkey();
    let collection_address = random_pubkey();
    let collection = collection_with(
        &collection_address,
        bakery(&ua),
        vec![(
            Plugin::Attributes(Attributes::default()),
            PluginAuthority::UpdateAuthority,
        )],
    )?;

    let owner_held = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![(Plugin::Attributes(Attributes::default()), PluginAuthority::Owner)],
    )?;
    assert_eq!(
        effective_plugin_authority(&owner_held, Some(&collection), PluginType::Attributes),
        Some(PluginAuthority::UpdateAuthority)
    );
    assert_eq!(
        check_plugin_authorities(&owner_held, &[PluginType::Attributes], &owner, Some(&collection))?,
        vec![false]
    );
    assert_eq!(
        check_plugin_authorities(&owner_held, &[PluginType::Attributes], &ua, Some(&collection))?,
        vec![true]
    );

    let ua_held = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![(
            Plugin::Attributes(Attributes::default()),
            PluginAuthority::UpdateAuthority,
        )],
    )?;
    assert_eq!(
        check_plugin_authorities(&ua_held, &[PluginType::Attributes], &ua, Some(&collection))?,
        vec![true]
    );
    Ok(())
}

#[test]
fn test_derived_plugins_prefer_asset() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let collection_address = random_pubkey();
    let asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![(
            Plugin::Royalties(Royalties {
                basis_points: 100,
                ..Royalties::default()
            }),
            PluginAuthority::UpdateAuthority,
        )],
    )?;
    let collection = collection_with(
        &collection_address,
        bakery(&random_pubkey()),
        vec![
            (
                Plugin::Royalties(Royalties {
                    basis_points: 900,
                    ..Royalties::default()
                }),
                PluginAuthority::UpdateAuthority,
            ),
            (
                Plugin::PermanentTransferDelegate(PermanentTransferDelegate {}),
                PluginAuthority::UpdateAuthority,
            ),
        ],
    )?;

    let derived = derive_asset_plugins(&asset, Some(&collection));
    assert_eq!(derived.len(), 2);
    match &derived.get(PluginType::Royalties).expect("royalties").plugin {
        Plugin::Royalties(royalties) => assert_eq!(royalties.basis_points, 100),
        other => panic!("unexpected plugin {:?}", other),
    }
    assert!(derived.contains(PluginType::PermanentTransferDelegate));
    assert_eq!(derive_asset_plugins(&asset, None), asset.plugins);
    Ok(())
}

#[test_log::test]
fn test_transfer_resets_owner_managed_delegates() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let delegate = random_pubkey();
    let new_owner = random_pubkey();
    let mut asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::None),
        vec![
            (
                Plugin::FreezeDelegate(FreezeDelegate { frozen: false }),
                address(&delegate),
            ),
            (Plugin::BurnDelegate(BurnDelegate {}), PluginAuthority::Owner),
            (
                Plugin::PermanentFreezeDelegate(PermanentFreezeDelegate { frozen: false }),
                address(&delegate),
            ),
        ],
    )?;

    let reset = apply_transfer(&mut asset, &new_owner);
    assert_eq!(reset, vec![PluginType::FreezeDelegate]);
    assert_eq!(asset.base.owner, new_owner.to_bytes());
    let authority = |t| asset.plugins.get(t).map(|e| e.authority);
    assert_eq!(authority(PluginType::FreezeDelegate), Some(PluginAuthority::Owner));
    assert_eq!(authority(PluginType::BurnDelegate), Some(PluginAuthority::Owner));
    assert_eq!(
        authority(PluginType::PermanentFreezeDelegate),
        Some(address(&delegate))
    );
    // Owner authority now resolves to the new owner
    assert!(can_burn(&new_owner, &asset, None)?);
    assert!(!can_burn(&owner, &asset, None)?);
    Ok(())
}

#[test]
fn test_transfer_and_burn_permissions() -> anyhow::Result<()> {
    let owner = random_pubkey();
    let delegate = random_pubkey();
    let permanent = random_pubkey();
    let collection_address = random_pubkey();
    let ua = random_pubkey();

    let asset = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![
            (
                Plugin::FreezeDelegate(FreezeDelegate { frozen: true }),
                address(&delegate),
            ),
            (Plugin::TransferDelegate(TransferDelegate {}), address(&delegate)),
        ],
    )?;
    let collection = collection_with(
        &collection_address,
        bakery(&ua),
        vec![
            (
                Plugin::PermanentTransferDelegate(PermanentTransferDelegate {}),
                address(&permanent),
            ),
            (
                Plugin::PermanentBurnDelegate(PermanentBurnDelegate {}),
                PluginAuthority::UpdateAuthority,
            ),
        ],
    )?;

    // Frozen: only permanent delegates act
    assert!(!can_transfer(&owner, &asset, Some(&collection))?);
    assert!(!can_transfer(&delegate, &asset, Some(&collection))?);
    assert!(can_transfer(&permanent, &asset, Some(&collection))?);
    assert!(can_burn(&ua, &asset, Some(&collection))?);
    assert!(!can_burn(&owner, &asset, Some(&collection))?);

    let thawed = asset_with(
        &random_pubkey(),
        bread(&owner, UpdateAuthority::Collection(collection_address.to_bytes())),
        vec![(Plugin::TransferDelegate(TransferDelegate {}), address(&delegate))],
    )?;
    assert!(can_transfer(&owner, &thawed, Some(&collection))?);
    assert!(can_transfer(&delegate, &thawed, Some(&collection))?);
    assert!(!can_burn(&delegate, &thawed, Some(&collection))?);
    Ok(())
}
