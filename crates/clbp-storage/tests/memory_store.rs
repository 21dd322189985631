use serde::{Deserialize, Serialize};

use clbp_storage::documents;
use clbp_storage::error::StorageError;
use clbp_storage::settings::StoreSettings;
use clbp_storage::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Doc {
    id: u32,
    name: String,
}

#[tokio::test]
async fn save_then_load_returns_document() {
    let store = DocumentStore::memory();
    let doc = Doc {
        id: 1,
        name: "intake".to_string(),
    };

    documents::save(&store, "docs/1.json", &doc).await.unwrap();
    let loaded: Doc = documents::load(&store, "docs/1.json").await.unwrap();
    assert_eq!(loaded, doc);
}

#[tokio::test]
async fn missing_key_is_not_found() {
    let store = DocumentStore::memory();
    let err = documents::load::<Doc>(&store, "docs/missing.json")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { key } if key == "docs/missing.json"));

    let none: Option<Doc> = documents::load_optional(&store, "docs/missing.json")
        .await
        .unwrap();
    assert!(none.is_none());
    assert!(!documents::exists(&store, "docs/missing.json").await.unwrap());
}

#[tokio::test]
async fn list_is_scoped_to_prefix() {
    let store = DocumentStore::memory();
    store.put("notes/a.json", b"{}".to_vec(), None).await.unwrap();
    store.put("notes/b.json", b"{}".to_vec(), None).await.unwrap();
    store.put("notesx/c.json", b"{}".to_vec(), None).await.unwrap();
    store.put("patients/a.json", b"{}".to_vec(), None).await.unwrap();

    let keys = store.list("notes/").await.unwrap();
    assert_eq!(keys, vec!["notes/a.json", "notes/b.json"]);
}

#[tokio::test]
async fn load_all_reads_every_document_under_prefix() {
    let store = DocumentStore::memory();
    for id in 0..3 {
        let doc = Doc {
            id,
            name: format!("doc {id}"),
        };
        documents::save(&store, &format!("docs/{id}.json"), &doc)
            .await
            .unwrap();
    }

    let docs: Vec<Doc> = documents::load_all(&store, "docs/").await.unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[2].name, "doc 2");
}

#[tokio::test]
async fn delete_is_idempotent() {
    let store = DocumentStore::memory();
    store.put("docs/1.json", b"{}".to_vec(), None).await.unwrap();
    store.delete("docs/1.json").await.unwrap();
    store.delete("docs/1.json").await.unwrap();
    assert!(store.list("docs/").await.unwrap().is_empty());
}

#[tokio::test]
async fn clones_share_the_backend() {
    let store = DocumentStore::memory();
    let other = store.clone();
    store.put("k", b"v".to_vec(), None).await.unwrap();
    assert_eq!(other.get("k").await.unwrap(), b"v".to_vec());
}

#[tokio::test]
async fn memory_settings_open_a_reachable_store() {
    let store = DocumentStore::open(&StoreSettings::Memory).await.unwrap();
    assert_eq!(store.backend_name(), "memory");
    store.ping().await.unwrap();
}

#[test]
fn s3_settings_require_bucket_and_region() {
    let settings = StoreSettings::S3 {
        bucket: " ".to_string(),
        region: "us-east-1".to_string(),
        endpoint_url: None,
    };
    assert!(settings.validate().is_err());

    let parsed: StoreSettings = serde_json::from_value(serde_json::json!({
        "backend": "s3",
        "bucket": "clbp",
        "region": "eu-west-1",
        "endpointUrl": "http://localhost:9000"
    }))
    .unwrap();
    assert_eq!(
        parsed,
        StoreSettings::S3 {
            bucket: "clbp".to_string(),
            region: "eu-west-1".to_string(),
            endpoint_url: Some("http://localhost:9000".to_string()),
        }
    );
}
