//! Integration tests for the file-backed singleton result store.
//!
//! Tests cover:
//! - Absence vs. corruption as distinct outcomes
//! - Save/load round-trip and wholesale overwrite
//! - Readers never observing partial bytes under concurrent writes

mod common;

use common::*;
use std::sync::Arc;

use yolo_upload_server::adapters::fs::result_store::FsResultStore;
use yolo_upload_server::application::ports::ResultStorePort;
use yolo_upload_server::domain::detection::DetectionResult;
use yolo_upload_server::domain::errors::DomainError;

fn result_with(url: &str, detections: Vec<yolo_upload_server::domain::detection::Detection>) -> DetectionResult {
    DetectionResult {
        image_url: url.to_string(),
        detections,
    }
}

#[tokio::test]
async fn load_from_fresh_store_is_none() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = FsResultStore::new(static_dir(&temp))?;
    assert_eq!(store.load().await?, None);
    Ok(())
}

#[tokio::test]
async fn save_then_load_round_trips() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = FsResultStore::new(static_dir(&temp))?;

    let result = result_with("/static/uploads/a.jpg", sample_detections());
    store.save(&result).await?;
    assert_eq!(store.load().await?, Some(result));
    Ok(())
}

#[tokio::test]
async fn save_overwrites_previous_value_wholesale() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = FsResultStore::new(static_dir(&temp))?;

    store
        .save(&result_with("/static/uploads/a.jpg", sample_detections()))
        .await?;
    let second = result_with("/static/uploads/b.jpg", other_detections());
    store.save(&second).await?;

    assert_eq!(store.load().await?, Some(second));
    Ok(())
}

#[tokio::test]
async fn corrupt_persisted_data_is_a_storage_failure() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = FsResultStore::new(static_dir(&temp))?;

    let path = static_dir(&temp).join("results").join("latest_result.json");
    std::fs::write(&path, b"{ this is not json")?;

    let err = store.load().await.unwrap_err();
    assert!(matches!(err, DomainError::StorageFailure(_)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_never_corrupt_the_store() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = Arc::new(FsResultStore::new(static_dir(&temp))?);

    // 1. Hammer the store from several writers at once
    let mut writers = Vec::new();
    for task in 0..8 {
        let store = store.clone();
        writers.push(tokio::spawn(async move {
            for n in 0..20 {
                let result = result_with(
                    &format!("/static/uploads/{}-{}.jpg", task, n),
                    sample_detections(),
                );
                store.save(&result).await.unwrap();
            }
        }));
    }

    // 2. Read concurrently: every load must parse (complete old or new value)
    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let loaded = store.load().await.expect("read must never see partial bytes");
                if let Some(result) = loaded {
                    assert!(result.image_url.starts_with("/static/uploads/"));
                    assert_eq!(result.detections, sample_detections());
                }
                tokio::task::yield_now().await;
            }
        })
    };

    for w in writers {
        w.await?;
    }
    reader.await?;

    // 3. After the dust settles, exactly one complete value remains
    assert!(store.load().await?.is_some());
    Ok(())
}
