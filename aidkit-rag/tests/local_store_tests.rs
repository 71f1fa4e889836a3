//! Durability and corruption-handling tests for [`LocalVectorStore`].

use std::collections::HashMap;

use aidkit_rag::document::Chunk;
use aidkit_rag::localstore::LocalVectorStore;
use aidkit_rag::vectorstore::{CollectionSpec, CollectionStatus, VectorStore};

fn spec() -> CollectionSpec {
    CollectionSpec { dimensions: 4, embedding_model: "mock-bag-of-words".to_string() }
}

fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("passage {id}"),
        embedding,
        metadata: HashMap::new(),
        document_id: "manual.txt".to_string(),
    }
}

#[tokio::test]
async fn missing_collection_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalVectorStore::new(dir.path());
    assert_eq!(store.status("nope").await.unwrap(), CollectionStatus::Missing);
}

#[tokio::test]
async fn collection_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = LocalVectorStore::new(dir.path());
        store.create_collection("manuals", &spec()).await.unwrap();
        store
            .upsert("manuals", &[chunk("a", vec![1.0, 0.0, 0.0, 0.0]), chunk("b", vec![0.0, 1.0, 0.0, 0.0])])
            .await
            .unwrap();
    }

    // A fresh instance simulates a new process.
    let store = LocalVectorStore::new(dir.path());
    match store.status("manuals").await.unwrap() {
        CollectionStatus::Ready { entries, spec: stored } => {
            assert_eq!(entries, 2);
            assert_eq!(stored, spec());
        }
        other => panic!("expected Ready, got {other:?}"),
    }

    let results = store.search("manuals", &[1.0, 0.0, 0.0, 0.0], 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.id, "a");
}

#[tokio::test]
async fn unparseable_file_reports_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("manuals.json"), b"{ this is not json").unwrap();

    let store = LocalVectorStore::new(dir.path());
    assert_eq!(store.status("manuals").await.unwrap(), CollectionStatus::Corrupt);
}

#[tokio::test]
async fn unsupported_format_version_reports_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("manuals.json"),
        serde_json::json!({
            "version": 99,
            "spec": { "dimensions": 4, "embedding_model": "mock-bag-of-words" },
            "chunks": {}
        })
        .to_string(),
    )
    .unwrap();

    let store = LocalVectorStore::new(dir.path());
    assert_eq!(store.status("manuals").await.unwrap(), CollectionStatus::Corrupt);
}

#[tokio::test]
async fn delete_collection_removes_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalVectorStore::new(dir.path());
    store.create_collection("manuals", &spec()).await.unwrap();
    store.upsert("manuals", &[chunk("a", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();

    store.delete_collection("manuals").await.unwrap();
    assert_eq!(store.status("manuals").await.unwrap(), CollectionStatus::Missing);
    assert!(!dir.path().join("manuals.json").exists());

    // Deleting again is a no-op.
    store.delete_collection("manuals").await.unwrap();
}

#[tokio::test]
async fn publish_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalVectorStore::new(dir.path());
    store.create_collection("manuals", &spec()).await.unwrap();
    store.upsert("manuals", &[chunk("a", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}

#[tokio::test]
async fn delete_removes_individual_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalVectorStore::new(dir.path());
    store.create_collection("manuals", &spec()).await.unwrap();
    store
        .upsert("manuals", &[chunk("a", vec![1.0, 0.0, 0.0, 0.0]), chunk("b", vec![0.0, 1.0, 0.0, 0.0])])
        .await
        .unwrap();

    store.delete("manuals", &["a"]).await.unwrap();

    match store.status("manuals").await.unwrap() {
        CollectionStatus::Ready { entries, .. } => assert_eq!(entries, 1),
        other => panic!("expected Ready, got {other:?}"),
    }
}

#[tokio::test]
async fn collection_names_are_sanitized_to_safe_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalVectorStore::new(dir.path());
    store.create_collection("first aid/manuals", &spec()).await.unwrap();

    assert!(dir.path().join("first_aid_manuals.json").exists());
}
