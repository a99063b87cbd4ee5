//! Shared helpers: a scripted mock detector plus service/router builders
//! backed by a temporary static directory.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use yolo_upload_server::adapters::fs::{result_store::FsResultStore, upload_store::FsUploadStore};
use yolo_upload_server::adapters::http::{router, state::HttpState};
use yolo_upload_server::application::ports::DetectorPort;
use yolo_upload_server::application::services::DetectionService;
use yolo_upload_server::domain::detection::Detection;
use yolo_upload_server::domain::errors::{DomainError, DomainResult};

/// A few JPEG magic bytes; the mock detector never decodes them.
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

/// Detector that plays back a script: each call pops the next detection
/// list; an exhausted script fails like a broken model would.
pub struct MockDetector {
    script: Mutex<VecDeque<Vec<Detection>>>,
}

impl MockDetector {
    pub fn returning(lists: Vec<Vec<Detection>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(lists.into()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::returning(vec![])
    }
}

#[async_trait]
impl DetectorPort for MockDetector {
    async fn detect(&self, _path: &Path) -> DomainResult<Vec<Detection>> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DomainError::DetectorFailure("mock model error".into()))
    }
}

pub fn sample_detections() -> Vec<Detection> {
    vec![
        Detection {
            label: "dog".to_string(),
            confidence: 0.91,
            bbox: [10.0, 20.0, 110.0, 220.0],
        },
        Detection {
            label: "person".to_string(),
            confidence: 0.58,
            bbox: [0.0, 0.0, 64.0, 128.0],
        },
    ]
}

pub fn other_detections() -> Vec<Detection> {
    vec![Detection {
        label: "cat".to_string(),
        confidence: 0.77,
        bbox: [5.0, 5.0, 50.0, 50.0],
    }]
}

pub fn static_dir(temp: &TempDir) -> PathBuf {
    temp.path().join("static")
}

pub fn uploads_dir(temp: &TempDir) -> PathBuf {
    static_dir(temp).join("uploads")
}

pub fn test_service(temp: &TempDir, detector: Arc<dyn DetectorPort>) -> Arc<DetectionService> {
    let dir = static_dir(temp);
    let uploads = Arc::new(FsUploadStore::new(&dir).unwrap());
    let results = Arc::new(FsResultStore::new(&dir).unwrap());
    Arc::new(DetectionService::new(
        uploads,
        detector,
        results,
        1,
        Duration::from_secs(5),
    ))
}

pub fn test_router(temp: &TempDir, detector: Arc<dyn DetectorPort>) -> axum::Router {
    router(HttpState {
        detection: test_service(temp, detector),
    })
}

/// Number of regular files under a directory (0 if it does not exist yet).
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|rd| rd.flatten().filter(|e| e.path().is_file()).count())
        .unwrap_or(0)
}
