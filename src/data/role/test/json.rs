use super::*;

/// Opens a store backed by a file inside a fresh temporary directory.
async fn open_temp_store() -> (tempfile::TempDir, JsonRoleStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRoleStore::open(dir.path().join("roles_config.json"))
        .await
        .unwrap();
    (dir, store)
}

/// Tests that a missing document loads as an empty allow-list.
///
/// Expected: Ok with no roles and no file created yet
#[tokio::test]
async fn missing_file_is_empty() -> Result<(), StoreError> {
    let (_dir, store) = open_temp_store().await;

    assert!(store.list_roles(1).await?.is_empty());
    assert!(!store.path().exists());

    Ok(())
}

/// Tests the add -> allowed -> remove -> denied cycle.
///
/// Expected: Ok with the role allowed only between add and remove
#[tokio::test]
async fn add_then_remove_toggles_permission() -> Result<(), StoreError> {
    let (_dir, store) = open_temp_store().await;

    assert_eq!(store.add_role(10, 100).await?, RoleChange::Added);
    assert!(store.is_allowed(10, &[100]).await?);

    assert_eq!(store.remove_role(10, 100).await?, RoleChange::Removed);
    assert!(!store.is_allowed(10, &[100]).await?);

    Ok(())
}

/// Tests that adding the same role twice stores it once.
///
/// Expected: Ok with AlreadyPresent on the second add and a single entry
#[tokio::test]
async fn add_is_idempotent() -> Result<(), StoreError> {
    let (_dir, store) = open_temp_store().await;

    assert_eq!(store.add_role(10, 100).await?, RoleChange::Added);
    assert_eq!(store.add_role(10, 100).await?, RoleChange::AlreadyPresent);
    assert_eq!(store.list_roles(10).await?, vec![100]);

    Ok(())
}

/// Tests removing a role that was never added.
///
/// Expected: Ok with NotPresent and nothing written to disk
#[tokio::test]
async fn remove_absent_role_is_noop() -> Result<(), StoreError> {
    let (_dir, store) = open_temp_store().await;

    assert_eq!(store.remove_role(10, 100).await?, RoleChange::NotPresent);

    store.add_role(10, 100).await?;
    assert_eq!(store.remove_role(10, 200).await?, RoleChange::NotPresent);
    assert_eq!(store.list_roles(10).await?, vec![100]);

    Ok(())
}

/// Tests that roles are listed in insertion order and scoped per guild.
///
/// Expected: Ok with each guild seeing only its own roles, oldest first
#[tokio::test]
async fn lists_in_insertion_order_per_guild() -> Result<(), StoreError> {
    let (_dir, store) = open_temp_store().await;

    store.add_role(10, 300).await?;
    store.add_role(10, 100).await?;
    store.add_role(20, 200).await?;

    assert_eq!(store.list_roles(10).await?, vec![300, 100]);
    assert_eq!(store.list_roles(20).await?, vec![200]);
    assert!(!store.is_allowed(20, &[300]).await?);

    Ok(())
}

/// Tests that mutations are flushed and visible to a store reopened on the same file.
///
/// Expected: Ok with the reopened store seeing the same allow-lists
#[tokio::test]
async fn mutations_survive_reopen() -> Result<(), StoreError> {
    let (dir, store) = open_temp_store().await;

    store.add_role(10, 100).await?;
    store.add_role(10, 101).await?;
    store.add_role(20, 200).await?;
    store.remove_role(10, 100).await?;
    drop(store);

    let reopened = JsonRoleStore::open(dir.path().join("roles_config.json")).await?;
    assert_eq!(reopened.list_roles(10).await?, vec![101]);
    assert_eq!(reopened.list_roles(20).await?, vec![200]);

    Ok(())
}

/// Tests the on-disk layout: guild id strings mapped to integer role ids.
///
/// Expected: Ok with a JSON object keyed by guild id; emptied guilds are dropped
#[tokio::test]
async fn writes_guild_keyed_document() -> Result<(), StoreError> {
    let (_dir, store) = open_temp_store().await;

    store.add_role(10, 100).await?;
    store.add_role(30, 300).await?;
    store.remove_role(30, 300).await?;

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, serde_json::json!({ "10": [100] }));

    Ok(())
}

/// Tests loading a document written by an earlier deployment.
///
/// Expected: Ok with the existing roles available immediately
#[tokio::test]
async fn loads_existing_document() -> Result<(), StoreError> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roles_config.json");
    std::fs::write(&path, r#"{"555": [1, 2, 3]}"#).unwrap();

    let store = JsonRoleStore::open(&path).await?;
    assert_eq!(store.list_roles(555).await?, vec![1, 2, 3]);
    assert!(store.is_allowed(555, &[9, 2]).await?);

    Ok(())
}

/// Tests that a malformed document is reported rather than silently replaced.
///
/// Expected: Err(StoreError::Json)
#[tokio::test]
async fn malformed_document_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roles_config.json");
    std::fs::write(&path, r#"{"555": "not a list"}"#).unwrap();

    let result = JsonRoleStore::open(&path).await;
    assert!(matches!(result, Err(StoreError::Json { .. })));
}

/// Tests concurrent adds for the same guild.
///
/// Verifies the read-modify-write is a critical section: no add is lost.
///
/// Expected: Ok with all roles present after the tasks finish
#[tokio::test]
async fn concurrent_adds_are_not_lost() -> Result<(), StoreError> {
    let (dir, store) = open_temp_store().await;
    let store = std::sync::Arc::new(store);

    let mut handles = Vec::new();
    for role_id in 0..20u64 {
        let store = store.clone();
        handles.push(tokio::spawn(
            async move { store.add_role(10, role_id).await },
        ));
    }
    for handle in handles {
        handle.await.unwrap()?;
    }

    let mut roles = store.list_roles(10).await?;
    roles.sort();
    assert_eq!(roles, (0..20).collect::<Vec<u64>>());

    let reopened = JsonRoleStore::open(dir.path().join("roles_config.json")).await?;
    assert_eq!(reopened.list_roles(10).await?.len(), 20);

    Ok(())
}
