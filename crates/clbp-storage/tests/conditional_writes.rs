use serde::{Deserialize, Serialize};

use clbp_storage::documents;
use clbp_storage::error::StorageError;
use clbp_storage::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counter {
    hits: Vec<u32>,
}

#[tokio::test]
async fn stale_etag_is_rejected() {
    let store = DocumentStore::memory();
    store.put("k", b"one".to_vec(), None).await.unwrap();

    let (_, etag) = store.get_versioned("k").await.unwrap();
    let etag = etag.unwrap();
    store.put("k", b"two".to_vec(), None).await.unwrap();

    let err = store
        .put_if_match("k", b"three".to_vec(), None, &etag)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { key } if key == "k"));
    assert_eq!(store.get("k").await.unwrap(), b"two".to_vec());
}

#[tokio::test]
async fn matching_etag_writes_and_rotates_the_tag() {
    let store = DocumentStore::memory();
    store.put("k", b"one".to_vec(), None).await.unwrap();

    let (_, etag) = store.get_versioned("k").await.unwrap();
    let etag = etag.unwrap();
    let next = store
        .put_if_match("k", b"two".to_vec(), None, &etag)
        .await
        .unwrap();
    assert_ne!(next, etag);

    // The old tag is spent.
    assert!(
        store
            .put_if_match("k", b"three".to_vec(), None, &etag)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn create_refuses_an_existing_key() {
    let store = DocumentStore::memory();
    documents::create(&store, "docs/a.json", &Counter { hits: vec![1] })
        .await
        .unwrap();

    let err = documents::create(&store, "docs/a.json", &Counter { hits: vec![2] })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));

    let kept: Counter = documents::load(&store, "docs/a.json").await.unwrap();
    assert_eq!(kept.hits, vec![1]);
}

#[tokio::test]
async fn update_of_missing_document_is_none() {
    let store = DocumentStore::memory();
    let outcome =
        documents::update::<Counter, (), StorageError, _>(&store, "docs/none.json", |c| {
            c.hits.push(1);
            Ok(())
        })
        .await
        .unwrap();
    assert!(outcome.is_none());
    assert!(!documents::exists(&store, "docs/none.json").await.unwrap());
}

#[tokio::test]
async fn update_error_leaves_document_untouched() {
    let store = DocumentStore::memory();
    documents::save(&store, "docs/c.json", &Counter { hits: vec![] })
        .await
        .unwrap();

    let err = documents::update::<Counter, (), StorageError, _>(&store, "docs/c.json", |c| {
        c.hits.push(9);
        Err(StorageError::Config("rejected".to_string()))
    })
    .await
    .unwrap_err();
    assert!(matches!(err, StorageError::Config(_)));

    let stored: Counter = documents::load(&store, "docs/c.json").await.unwrap();
    assert!(stored.hits.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_are_not_lost() {
    let store = DocumentStore::memory();
    documents::save(&store, "docs/c.json", &Counter { hits: vec![] })
        .await
        .unwrap();

    let writers: Vec<_> = (0..12u32)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                documents::update::<Counter, (), StorageError, _>(&store, "docs/c.json", |c| {
                    c.hits.push(n);
                    Ok(())
                })
                .await
            })
        })
        .collect();

    for writer in writers {
        assert!(writer.await.unwrap().unwrap().is_some());
    }

    let mut stored: Counter = documents::load(&store, "docs/c.json").await.unwrap();
    stored.hits.sort_unstable();
    assert_eq!(stored.hits, (0..12).collect::<Vec<_>>());
}
