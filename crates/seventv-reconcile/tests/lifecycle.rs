//! End-to-end lifecycle of a managed emote set against the in-memory API.

use std::sync::Arc;

use serde_json::json;
use seventv_api::{ApiOperation, EmoteSetApi, MemoryApi};
use seventv_core::{Emote, EmoteSetConfig};
use seventv_reconcile::{EmoteSetState, ErrorKind, Reconciler, StateStore};

fn desired(value: serde_json::Value) -> EmoteSetConfig {
    EmoteSetConfig::from_json(&value).unwrap()
}

#[tokio::test]
async fn test_full_lifecycle_with_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.json"));
    let api = MemoryApi::new();
    api.push_next_id("abc");
    let reconciler = Reconciler::new(api.clone());
    let addr = "seventv_emote_set.main";

    // Create: the set starts empty remotely.
    let config = desired(json!({"name": "pog", "emotes": [{"id": "1", "name": "a"}]}));
    let out = reconciler.create(EmoteSetState::default(), &config).await;
    assert!(out.diagnostics.is_empty());
    store.commit(addr, &out);

    // Converge membership with an update against the stored record.
    let prior = store.get(addr).unwrap();
    assert!(prior.emotes.is_empty());
    let out = reconciler.update(prior, &config).await;
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.state.emotes, vec![Emote::new("1", "a")]);
    store.commit(addr, &out);

    // Change membership and name together.
    let config = desired(json!({
        "name": "poggers",
        "emotes": [{"id": "1", "name": "a"}, {"id": "2", "name": "b"}],
    }));
    api.clear_calls();
    let out = reconciler.update(store.get(addr).unwrap(), &config).await;
    assert!(out.diagnostics.is_empty());
    assert_eq!(api.calls_of(ApiOperation::AddEmoteToSet).len(), 1);
    assert!(api.calls_of(ApiOperation::DeleteEmoteBinding).is_empty());
    assert_eq!(out.state.name, "poggers");
    store.commit(addr, &out);

    // Drift outside the controller is picked up by a refresh.
    api.delete_emote_binding("abc", "1").await.unwrap();
    let out = reconciler.read(store.get(addr).unwrap()).await;
    assert_eq!(out.state.emotes, vec![Emote::new("2", "b")]);
    store.commit(addr, &out);

    // Delete clears the record.
    let out = reconciler.delete(store.get(addr).unwrap()).await;
    assert!(out.diagnostics.is_empty());
    store.commit(addr, &out);
    assert!(store.get(addr).is_none());
    assert!(api.set("abc").is_none());

    // The persisted file survives a reopen.
    let reopened = StateStore::open(&dir.path().join("state.json"));
    assert!(reopened.list().is_empty());
}

#[tokio::test]
async fn test_import_then_manage() {
    let api = MemoryApi::new();
    let id = api.create_emote_set("existing").await.unwrap();
    api.add_emote_to_set(&id, "1", Some("a")).await.unwrap();
    api.clear_calls();

    let reconciler = Reconciler::new(Arc::new(api.clone()));
    let out = reconciler.import(&id).await;
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.state.name, "existing");
    assert_eq!(out.state.emotes, vec![Emote::new("1", "a")]);

    let config = desired(json!({"name": "existing", "emotes": [{"id": "1", "name": "a"}]}));
    let out = reconciler.update(out.state, &config).await;
    assert!(out.diagnostics.is_empty());
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn test_vanished_set_reports_not_found() {
    let api = MemoryApi::new();
    let reconciler = Reconciler::new(api.clone());
    let out = reconciler
        .create(EmoteSetState::default(), &desired(json!({"name": "pog"})))
        .await;
    let id = out.state.id().unwrap().to_string();

    api.delete_emote_set(&id).await.unwrap();

    let out = reconciler.read(out.state).await;
    assert!(out.diagnostics.has_kind(ErrorKind::NotFound));
    assert!(out.diagnostics.has_errors());
}

#[tokio::test]
async fn test_repeated_update_is_idempotent() {
    let api = MemoryApi::new();
    let reconciler = Reconciler::new(api.clone());
    let config = desired(json!({
        "name": "pog",
        "emotes": [{"id": "1", "name": "a"}, {"id": "2", "name": "b"}],
    }));

    let out = reconciler.create(EmoteSetState::default(), &config).await;
    let out = reconciler.update(out.state, &config).await;
    assert!(out.diagnostics.is_empty());

    api.clear_calls();
    let out = reconciler.update(out.state, &config).await;
    assert!(out.diagnostics.is_empty());
    assert!(api.calls_of(ApiOperation::AddEmoteToSet).is_empty());
    assert!(api.calls_of(ApiOperation::DeleteEmoteBinding).is_empty());
    assert!(api.calls_of(ApiOperation::UpdateEmoteSet).is_empty());
}
