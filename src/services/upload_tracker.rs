// src/services/upload_tracker.rs
// DOCUMENTATION: In-memory upload status registry
// PURPOSE: Let clients poll progress of an in-flight upload by id

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::GalleryImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Pending,
    Uploading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadStatus {
    pub upload_id: Uuid,
    pub state: UploadState,
    pub percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<GalleryImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadStatus {
    fn pending(upload_id: Uuid) -> Self {
        Self {
            upload_id,
            state: UploadState::Pending,
            percent: 0,
            image: None,
            error: None,
        }
    }
}

#[derive(Clone, Debug)]
struct TrackedUpload {
    status: UploadStatus,
    /// Bumped on every restart; progress from older attempts is dropped
    attempt: u32,
    expires_at: Instant,
}

impl TrackedUpload {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe status map with TTL
/// DOCUMENTATION: Every update refreshes the entry's expiry
pub struct UploadTracker {
    store: Arc<RwLock<HashMap<Uuid, TrackedUpload>>>,
    ttl: Duration,
}

impl UploadTracker {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    async fn update<T, F>(&self, upload_id: Uuid, apply: F) -> T
    where
        F: FnOnce(&mut TrackedUpload) -> T,
    {
        let mut store = self.store.write().await;
        let entry = store.entry(upload_id).or_insert_with(|| TrackedUpload {
            status: UploadStatus::pending(upload_id),
            attempt: 0,
            expires_at: Instant::now() + self.ttl,
        });
        let out = apply(entry);
        entry.expires_at = Instant::now() + self.ttl;
        out
    }

    pub async fn start(&self, upload_id: Uuid) {
        self.update(upload_id, |entry| {
            entry.status = UploadStatus::pending(upload_id);
            entry.attempt = 0;
        })
        .await;
    }

    /// Back to pending for a fresh transfer; returns the new attempt number
    pub async fn restart(&self, upload_id: Uuid) -> u32 {
        self.update(upload_id, |entry| {
            entry.status = UploadStatus::pending(upload_id);
            entry.attempt += 1;
            entry.attempt
        })
        .await
    }

    /// Progress never moves backwards within an attempt
    pub async fn progress(&self, upload_id: Uuid, attempt: u32, percent: u8) {
        self.update(upload_id, |entry| {
            let status = &mut entry.status;
            let active =
                status.state == UploadState::Pending || status.state == UploadState::Uploading;
            if entry.attempt == attempt && active {
                status.state = UploadState::Uploading;
                status.percent = status.percent.max(percent.min(100));
            }
        })
        .await;
    }

    pub async fn succeed(&self, upload_id: Uuid, image: GalleryImage) {
        self.update(upload_id, |entry| {
            entry.status.state = UploadState::Succeeded;
            entry.status.percent = 100;
            entry.status.image = Some(image);
            entry.status.error = None;
        })
        .await;
    }

    pub async fn fail(&self, upload_id: Uuid, error: String) {
        self.update(upload_id, |entry| {
            entry.status.state = UploadState::Failed;
            entry.status.error = Some(error);
        })
        .await;
    }

    pub async fn get(&self, upload_id: Uuid) -> Option<UploadStatus> {
        let store = self.store.read().await;
        store
            .get(&upload_id)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.status.clone())
    }

    /// Drop expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Upload tracker cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired statuses
pub fn start_cleanup_task(tracker: Arc<UploadTracker>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            tracker.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn image() -> GalleryImage {
        GalleryImage {
            id: Some(Uuid::new_v4()),
            url: "https://cdn.example/a.jpg".into(),
            title: "A".into(),
            category: Category::Park,
            description: None,
            storage_path: Some("a.jpg".into()),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_progress_is_monotonic() {
        let tracker = UploadTracker::new(60);
        let id = Uuid::new_v4();

        tracker.start(id).await;
        tracker.progress(id, 0, 40).await;
        tracker.progress(id, 0, 20).await;

        let status = tracker.get(id).await.unwrap();
        assert_eq!(status.state, UploadState::Uploading);
        assert_eq!(status.percent, 40);
    }

    #[tokio::test]
    async fn test_success_and_failure_are_terminal() {
        let tracker = UploadTracker::new(60);
        let id = Uuid::new_v4();

        tracker.start(id).await;
        tracker.succeed(id, image()).await;
        tracker.progress(id, 0, 10).await;

        let status = tracker.get(id).await.unwrap();
        assert_eq!(status.state, UploadState::Succeeded);
        assert_eq!(status.percent, 100);
        assert!(status.image.is_some());

        let failed = Uuid::new_v4();
        tracker.start(failed).await;
        tracker.fail(failed, "bucket missing".into()).await;
        let status = tracker.get(failed).await.unwrap();
        assert_eq!(status.state, UploadState::Failed);
        assert_eq!(status.error.as_deref(), Some("bucket missing"));
    }

    #[tokio::test]
    async fn test_restart_resets_percent_and_drops_stale_progress() {
        let tracker = UploadTracker::new(60);
        let id = Uuid::new_v4();

        tracker.start(id).await;
        tracker.progress(id, 0, 100).await;

        let attempt = tracker.restart(id).await;
        assert_eq!(attempt, 1);
        let status = tracker.get(id).await.unwrap();
        assert_eq!(status.state, UploadState::Pending);
        assert_eq!(status.percent, 0);

        // a late report from the first transfer
        tracker.progress(id, 0, 100).await;
        tracker.progress(id, attempt, 25).await;

        let status = tracker.get(id).await.unwrap();
        assert_eq!(status.state, UploadState::Uploading);
        assert_eq!(status.percent, 25);

        // start resets the attempt counter
        tracker.start(id).await;
        tracker.progress(id, 0, 5).await;
        assert_eq!(tracker.get(id).await.unwrap().percent, 5);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let tracker = UploadTracker::new(60);
        assert!(tracker.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_removes_expired() {
        let tracker = UploadTracker::new(1);
        tracker.start(Uuid::new_v4()).await;
        tracker.start(Uuid::new_v4()).await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        tracker.cleanup().await;

        assert_eq!(tracker.len().await, 0);
    }
}
