// src/services/gallery_service.rs
// DOCUMENTATION: Gallery upload pipeline and image management
// PURPOSE: Validate -> store blob -> categorize -> persist metadata,
// plus list/edit/delete over the paired blob + record

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::GalleryStore;
use crate::errors::SiteError;
use crate::models::{
    seed_gallery_images, CategorizeRequest, CategorizeResponse, Category, GalleryImage,
    NewGalleryImage, UpdateImageRequest,
};
use crate::services::categorizer;
use crate::services::gemini_client::GeminiError;
use crate::services::storage_client::{ObjectStorage, ProgressFn, StorageError};
use crate::services::upload_tracker::UploadTracker;

/// Media types accepted for upload, with the extension used in storage keys
pub const ALLOWED_IMAGE_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Structured answer of a vision classifier
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct VisionSuggestion {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// AI image classifier seam
#[async_trait]
pub trait VisionCategorizer: Send + Sync {
    async fn suggest(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<VisionSuggestion, GeminiError>;
}

/// One image as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub description: Option<String>,
    pub bytes: Vec<u8>,
    pub upload_id: Option<Uuid>,
}

/// Check the declared media type against the allow-list
/// DOCUMENTATION: Parameters ("; charset=...") are ignored, comparison is
/// case-insensitive. Returns the storage extension.
pub fn validate_media_type(content_type: &str) -> Result<&'static str, SiteError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| SiteError::UnsupportedMediaType(content_type.to_string()))
}

/// Collision-resistant object key: <unix-millis>-<uuid-v4>.<ext>
pub fn storage_key(extension: &str) -> String {
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        extension
    )
}

fn normalize(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

pub struct GalleryService {
    storage: Arc<dyn ObjectStorage>,
    store: Arc<dyn GalleryStore>,
    vision: Option<Arc<dyn VisionCategorizer>>,
    tracker: Arc<UploadTracker>,
    bucket: String,
    fallback_bucket: Option<String>,
    max_upload_bytes: usize,
}

impl GalleryService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        store: Arc<dyn GalleryStore>,
        tracker: Arc<UploadTracker>,
        bucket: String,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            storage,
            store,
            vision: None,
            tracker,
            bucket,
            fallback_bucket: None,
            max_upload_bytes,
        }
    }

    /// Alternate bucket name tried once when the primary fails
    pub fn with_fallback_bucket(mut self, bucket: Option<String>) -> Self {
        self.fallback_bucket = bucket.filter(|b| *b != self.bucket);
        self
    }

    pub fn with_vision(mut self, vision: Arc<dyn VisionCategorizer>) -> Self {
        self.vision = Some(vision);
        self
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &Arc<UploadTracker> {
        &self.tracker
    }

    fn buckets(&self) -> Vec<&str> {
        let mut buckets = vec![self.bucket.as_str()];
        if let Some(alt) = self.fallback_bucket.as_deref() {
            buckets.push(alt);
        }
        buckets
    }

    /// Upload one image and persist its metadata record
    /// DOCUMENTATION: The tracker (when an upload id is given) mirrors the outcome
    pub async fn upload(&self, upload: ImageUpload) -> Result<GalleryImage, SiteError> {
        let upload_id = upload.upload_id;
        let result = self.run_upload(upload).await;

        if let Some(id) = upload_id {
            match &result {
                Ok(image) => self.tracker.succeed(id, image.clone()).await,
                Err(e) => self.tracker.fail(id, e.to_string()).await,
            }
        }

        result
    }

    async fn run_upload(&self, upload: ImageUpload) -> Result<GalleryImage, SiteError> {
        // Validation happens before any storage or database call
        let extension = validate_media_type(&upload.content_type)?;

        if upload.bytes.is_empty() {
            return Err(SiteError::ValidationError("image body is empty".to_string()));
        }
        if upload.bytes.len() > self.max_upload_bytes {
            return Err(SiteError::PayloadTooLarge(upload.bytes.len()));
        }

        let path = storage_key(extension);
        let description = normalize(upload.description);

        if let Some(id) = upload.upload_id {
            self.tracker.start(id).await;
        }

        let bucket = self
            .store_blob(&path, &upload.bytes, &upload.content_type, upload.upload_id)
            .await?;
        let url = self.storage.public_url(&bucket, &path);

        log::info!(
            "Stored {} ({} bytes) as {}/{}",
            upload.file_name,
            upload.bytes.len(),
            bucket,
            path
        );

        let suggestion = self.vision_suggestion(&upload.bytes, &upload.content_type).await;

        let inference = categorizer::resolve(
            suggestion.category.as_deref(),
            &upload.file_name,
            description.as_deref(),
        );

        let record = NewGalleryImage {
            url,
            storage_path: path.clone(),
            title: normalize(suggestion.title)
                .unwrap_or_else(|| categorizer::suggest_title(&upload.file_name)),
            category: inference.category(),
            description: description.or_else(|| normalize(suggestion.description)),
        };

        log::info!(
            "Categorized {} as {} ({})",
            upload.file_name,
            record.category,
            inference.source()
        );

        match self.store.insert(&record).await {
            Ok(image) => Ok(image),
            Err(e) => {
                // Blob without a record is unreachable; try to clean it up
                if let Err(remove_err) = self.storage.remove(&bucket, &path).await {
                    log::warn!(
                        "Could not remove orphaned blob {}/{}: {}",
                        bucket,
                        path,
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }

    fn tracker_progress(&self, upload_id: Uuid, attempt: u32) -> ProgressFn {
        let tracker = self.tracker.clone();
        Arc::new(move |percent| {
            let tracker = tracker.clone();
            tokio::spawn(async move {
                tracker.progress(upload_id, attempt, percent).await;
            });
        })
    }

    /// Upload to the primary bucket, retrying once against the alternate
    /// bucket on a transport or missing-bucket failure. Returns the bucket used.
    /// DOCUMENTATION: The retry restarts tracked progress from zero
    async fn store_blob(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
        upload_id: Option<Uuid>,
    ) -> Result<String, SiteError> {
        let progress = upload_id.map(|id| self.tracker_progress(id, 0));
        let first = self
            .storage
            .upload(&self.bucket, path, bytes.to_vec(), content_type, progress)
            .await;

        let err = match first {
            Ok(()) => return Ok(self.bucket.clone()),
            Err(e) => e,
        };

        let retryable = matches!(
            err,
            StorageError::Transport(_) | StorageError::BucketNotFound(_)
        );

        match (&self.fallback_bucket, retryable) {
            (Some(alt), true) => {
                log::warn!(
                    "Upload to bucket '{}' failed ({}), retrying with '{}'",
                    self.bucket,
                    err,
                    alt
                );
                let progress = match upload_id {
                    Some(id) => {
                        let attempt = self.tracker.restart(id).await;
                        Some(self.tracker_progress(id, attempt))
                    }
                    None => None,
                };
                match self
                    .storage
                    .upload(alt, path, bytes.to_vec(), content_type, progress)
                    .await
                {
                    Ok(()) => Ok(alt.clone()),
                    Err(retry_err) => {
                        log::error!("Retry against bucket '{}' failed: {}", alt, retry_err);
                        Err(err.into())
                    }
                }
            }
            _ => Err(err.into()),
        }
    }

    /// AI suggestion, or an empty one when vision is off or fails
    async fn vision_suggestion(&self, bytes: &[u8], content_type: &str) -> VisionSuggestion {
        let Some(vision) = &self.vision else {
            return VisionSuggestion::default();
        };

        match vision.suggest(bytes, content_type).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                log::warn!("Vision categorization unavailable, using keywords: {}", e);
                VisionSuggestion::default()
            }
        }
    }

    /// Stored images (newest first) followed by the seed images
    pub async fn list(
        &self,
        category: Option<Category>,
        include_seed: bool,
    ) -> Result<Vec<GalleryImage>, SiteError> {
        let mut images = self.store.list(category).await?;

        if include_seed {
            images.extend(
                seed_gallery_images()
                    .into_iter()
                    .filter(|img| category.map_or(true, |c| img.category == c)),
            );
        }

        Ok(images)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateImageRequest,
    ) -> Result<GalleryImage, SiteError> {
        if req.is_empty() {
            return Err(SiteError::InvalidInput(
                "provide at least one of title, category, description".to_string(),
            ));
        }

        let req = UpdateImageRequest {
            title: normalize(req.title),
            category: req.category,
            description: req.description.map(|d| d.trim().to_string()),
        };

        // A blank title is dropped above and may leave nothing to change
        if req.is_empty() {
            return Err(SiteError::InvalidInput("title must not be blank".to_string()));
        }

        self.store.update(id, &req).await
    }

    /// Delete the record; blob removal is best effort across both bucket names
    pub async fn delete(&self, id: Uuid) -> Result<(), SiteError> {
        let image = self.store.get(id).await?;

        if let Some(path) = image.storage_path.as_deref() {
            for bucket in self.buckets() {
                if let Err(e) = self.storage.remove(bucket, path).await {
                    log::warn!("Could not remove blob {}/{}: {}", bucket, path, e);
                }
            }
        }

        self.store.delete(id).await?;
        log::info!("Deleted gallery image {}", id);
        Ok(())
    }

    /// Categorizer preview without uploading anything
    pub fn preview(req: &CategorizeRequest) -> CategorizeResponse {
        let description = req.description.as_deref();
        let inference =
            categorizer::resolve(req.suggestion.as_deref(), &req.file_name, description);

        CategorizeResponse {
            category: inference.category(),
            source: inference.source(),
            suggested_title: categorizer::suggest_title(&req.file_name),
            scores: categorizer::score(&req.file_name, description),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::upload_tracker::{UploadState, UploadStatus};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    const PUBLIC_BASE: &str = "https://cdn.test/public";

    #[derive(Default)]
    pub(crate) struct FakeStorage {
        pub(crate) uploads: Mutex<Vec<(String, String)>>,
        pub(crate) removes: Mutex<Vec<(String, String)>>,
        pub(crate) upload_failures: HashMap<String, StorageError>,
        pub(crate) fail_remove: bool,
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn upload(
            &self,
            bucket: &str,
            path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
            progress: Option<ProgressFn>,
        ) -> Result<(), StorageError> {
            self.uploads
                .lock()
                .unwrap()
                .push((bucket.to_string(), path.to_string()));
            if let Some(err) = self.upload_failures.get(bucket) {
                return Err(err.clone());
            }
            if let Some(report) = progress {
                report(100);
            }
            Ok(())
        }

        fn public_url(&self, bucket: &str, path: &str) -> String {
            format!("{}/{}/{}", PUBLIC_BASE, bucket, path)
        }

        async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
            self.removes
                .lock()
                .unwrap()
                .push((bucket.to_string(), path.to_string()));
            if self.fail_remove {
                return Err(StorageError::Transport("connection reset".into()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeStore {
        pub(crate) records: Mutex<Vec<GalleryImage>>,
        pub(crate) insert_calls: Mutex<usize>,
        pub(crate) fail_insert: bool,
    }

    #[async_trait]
    impl GalleryStore for FakeStore {
        async fn insert(&self, image: &NewGalleryImage) -> Result<GalleryImage, SiteError> {
            *self.insert_calls.lock().unwrap() += 1;
            if self.fail_insert {
                return Err(SiteError::DatabaseError("insert failed".into()));
            }
            let stored = GalleryImage {
                id: Some(Uuid::new_v4()),
                url: image.url.clone(),
                title: image.title.clone(),
                category: image.category,
                description: image.description.clone(),
                storage_path: Some(image.storage_path.clone()),
                created_at: Some(Utc::now()),
            };
            self.records.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn list(&self, category: Option<Category>) -> Result<Vec<GalleryImage>, SiteError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|img| category.map_or(true, |c| img.category == c))
                .cloned()
                .collect())
        }

        async fn get(&self, id: Uuid) -> Result<GalleryImage, SiteError> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|img| img.id == Some(id))
                .cloned()
                .ok_or_else(|| SiteError::NotFound(id.to_string()))
        }

        async fn update(
            &self,
            id: Uuid,
            req: &UpdateImageRequest,
        ) -> Result<GalleryImage, SiteError> {
            let mut records = self.records.lock().unwrap();
            let image = records
                .iter_mut()
                .find(|img| img.id == Some(id))
                .ok_or_else(|| SiteError::NotFound(id.to_string()))?;
            if let Some(title) = &req.title {
                image.title = title.clone();
            }
            if let Some(category) = req.category {
                image.category = category;
            }
            if let Some(description) = &req.description {
                image.description = Some(description.clone());
            }
            Ok(image.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), SiteError> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|img| img.id != Some(id));
            if records.len() == before {
                return Err(SiteError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }

    struct FakeVision(Result<VisionSuggestion, ()>);

    #[async_trait]
    impl VisionCategorizer for FakeVision {
        async fn suggest(
            &self,
            _image: &[u8],
            _content_type: &str,
        ) -> Result<VisionSuggestion, GeminiError> {
            self.0
                .clone()
                .map_err(|_| GeminiError::Request("timeout".into()))
        }
    }

    fn service(storage: Arc<FakeStorage>, store: Arc<FakeStore>) -> GalleryService {
        GalleryService::new(
            storage,
            store,
            Arc::new(UploadTracker::new(60)),
            "gallery".to_string(),
            1024,
        )
        .with_fallback_bucket(Some("Gallery".to_string()))
    }

    fn jpeg(file_name: &str) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_string(),
            content_type: "image/jpeg".to_string(),
            description: None,
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            upload_id: None,
        }
    }

    #[test]
    fn test_validate_media_type() {
        assert_eq!(validate_media_type("image/jpeg").unwrap(), "jpg");
        assert_eq!(validate_media_type("IMAGE/WebP; q=1").unwrap(), "webp");
        assert!(validate_media_type("text/plain").is_err());
        assert!(validate_media_type("image/svg+xml").is_err());
        assert!(validate_media_type("").is_err());
    }

    #[test]
    fn test_storage_keys_are_unique() {
        let a = storage_key("png");
        let b = storage_key("png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_text_plain_rejected_without_io() {
        let storage = Arc::new(FakeStorage::default());
        let store = Arc::new(FakeStore::default());
        let svc = service(storage.clone(), store.clone());

        let mut upload = jpeg("notes.txt");
        upload.content_type = "text/plain".to_string();

        let err = svc.upload(upload).await.unwrap_err();
        assert!(matches!(err, SiteError::UnsupportedMediaType(_)));
        assert!(storage.uploads.lock().unwrap().is_empty());
        assert_eq!(*store.insert_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_and_oversized_bodies_rejected() {
        let storage = Arc::new(FakeStorage::default());
        let svc = service(storage.clone(), Arc::new(FakeStore::default()));

        let mut empty = jpeg("a.jpg");
        empty.bytes.clear();
        assert!(matches!(
            svc.upload(empty).await,
            Err(SiteError::ValidationError(_))
        ));

        let mut large = jpeg("a.jpg");
        large.bytes = vec![0; 2048];
        assert!(matches!(
            svc.upload(large).await,
            Err(SiteError::PayloadTooLarge(2048))
        ));

        assert!(storage.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_upload_creates_one_record_with_public_url() {
        let storage = Arc::new(FakeStorage::default());
        let store = Arc::new(FakeStore::default());
        let svc = service(storage.clone(), store.clone());

        let image = assert_ok!(svc.upload(jpeg("laundry-room.jpg")).await);

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);

        let uploads = storage.uploads.lock().unwrap();
        let (bucket, path) = &uploads[0];
        assert_eq!(records[0].url, storage.public_url(bucket, path));
        assert_eq!(image.url, records[0].url);
        assert_eq!(image.category, Category::Facilities);
        assert_eq!(image.title, "Laundry Room");
        assert_eq!(image.storage_path.as_deref(), Some(path.as_str()));
    }

    #[tokio::test]
    async fn test_valid_vision_label_wins() {
        let storage = Arc::new(FakeStorage::default());
        let store = Arc::new(FakeStore::default());
        let svc = service(storage, store).with_vision(Arc::new(FakeVision(Ok(
            VisionSuggestion {
                category: Some("Scenery".into()),
                title: Some("Evening Glow".into()),
                description: Some("Mountains at dusk.".into()),
            },
        ))));

        let image = svc.upload(jpeg("laundry.jpg")).await.unwrap();
        assert_eq!(image.category, Category::Scenery);
        assert_eq!(image.title, "Evening Glow");
        assert_eq!(image.description.as_deref(), Some("Mountains at dusk."));
    }

    #[tokio::test]
    async fn test_invalid_vision_label_falls_back_to_keywords() {
        let svc = service(
            Arc::new(FakeStorage::default()),
            Arc::new(FakeStore::default()),
        )
        .with_vision(Arc::new(FakeVision(Ok(VisionSuggestion {
            category: Some("Lakefront".into()),
            title: None,
            description: None,
        }))));

        let mut upload = jpeg("IMG_1.jpg");
        upload.description = Some("  washer and dryer  ".into());
        let image = svc.upload(upload).await.unwrap();
        assert_eq!(image.category, Category::Facilities);
        // user description wins and is trimmed
        assert_eq!(image.description.as_deref(), Some("washer and dryer"));
    }

    #[tokio::test]
    async fn test_vision_failure_falls_back_to_keywords() {
        let svc = service(
            Arc::new(FakeStorage::default()),
            Arc::new(FakeStore::default()),
        )
        .with_vision(Arc::new(FakeVision(Err(()))));

        let image = svc.upload(jpeg("photo.jpg")).await.unwrap();
        assert_eq!(image.category, Category::Park);
    }

    #[tokio::test]
    async fn test_transport_failure_retries_alternate_bucket_once() {
        let storage = Arc::new(FakeStorage {
            upload_failures: HashMap::from([(
                "gallery".to_string(),
                StorageError::Transport("reset".into()),
            )]),
            ..Default::default()
        });
        let svc = service(storage.clone(), Arc::new(FakeStore::default()));

        let image = svc.upload(jpeg("site.jpg")).await.unwrap();

        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[1].0, "Gallery");
        assert!(image.url.starts_with(&format!("{}/Gallery/", PUBLIC_BASE)));
    }

    #[tokio::test]
    async fn test_permission_denied_is_not_retried() {
        let storage = Arc::new(FakeStorage {
            upload_failures: HashMap::from([(
                "gallery".to_string(),
                StorageError::PermissionDenied("policy".into()),
            )]),
            ..Default::default()
        });
        let store = Arc::new(FakeStore::default());
        let svc = service(storage.clone(), store.clone());

        let err = assert_err!(svc.upload(jpeg("site.jpg")).await);
        assert!(matches!(err, SiteError::StoragePermissionDenied(_)));
        assert_eq!(storage.uploads.lock().unwrap().len(), 1);
        assert_eq!(*store.insert_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_bucket_reports_primary_name() {
        let storage = Arc::new(FakeStorage {
            upload_failures: HashMap::from([
                (
                    "gallery".to_string(),
                    StorageError::BucketNotFound("gallery".into()),
                ),
                (
                    "Gallery".to_string(),
                    StorageError::BucketNotFound("Gallery".into()),
                ),
            ]),
            ..Default::default()
        });
        let svc = service(storage.clone(), Arc::new(FakeStore::default()));

        match svc.upload(jpeg("site.jpg")).await {
            Err(SiteError::StorageBucketMissing(bucket)) => assert_eq!(bucket, "gallery"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(storage.uploads.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_failure_removes_orphaned_blob() {
        let storage = Arc::new(FakeStorage::default());
        let store = Arc::new(FakeStore {
            fail_insert: true,
            ..Default::default()
        });
        let svc = service(storage.clone(), store);

        let err = svc.upload(jpeg("site.jpg")).await.unwrap_err();
        assert!(matches!(err, SiteError::DatabaseError(_)));

        let uploads = storage.uploads.lock().unwrap();
        let removes = storage.removes.lock().unwrap();
        assert_eq!(removes.as_slice(), uploads.as_slice());
    }

    #[tokio::test]
    async fn test_tracker_reflects_outcome() {
        let svc = service(
            Arc::new(FakeStorage::default()),
            Arc::new(FakeStore::default()),
        );
        let id = Uuid::new_v4();
        let mut upload = jpeg("sunset.jpg");
        upload.upload_id = Some(id);

        svc.upload(upload).await.unwrap();
        let status = svc.tracker().get(id).await.unwrap();
        assert_eq!(status.state, UploadState::Succeeded);
        assert_eq!(status.percent, 100);

        let failed = Uuid::new_v4();
        let mut bad = jpeg("notes.txt");
        bad.content_type = "text/plain".into();
        bad.upload_id = Some(failed);
        assert!(svc.upload(bad).await.is_err());
        let status = svc.tracker().get(failed).await.unwrap();
        assert_eq!(status.state, UploadState::Failed);
    }

    /// Fails the first transfer after reporting it complete, then records
    /// what the tracker shows while the second transfer is under way
    struct RetryingStorage {
        tracker: Arc<UploadTracker>,
        upload_id: Uuid,
        calls: Mutex<usize>,
        mid_retry: Mutex<Option<UploadStatus>>,
    }

    #[async_trait]
    impl ObjectStorage for RetryingStorage {
        async fn upload(
            &self,
            bucket: &str,
            _path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
            progress: Option<ProgressFn>,
        ) -> Result<(), StorageError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            let report = progress.expect("tracked upload reports progress");

            if call == 1 {
                report(100);
                tokio::task::yield_now().await;
                return Err(StorageError::BucketNotFound(bucket.to_string()));
            }

            report(10);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            let status = self.tracker.get(self.upload_id).await;
            *self.mid_retry.lock().unwrap() = status;
            report(100);
            Ok(())
        }

        fn public_url(&self, bucket: &str, path: &str) -> String {
            format!("{}/{}/{}", PUBLIC_BASE, bucket, path)
        }

        async fn remove(&self, _bucket: &str, _path: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_retry_restarts_tracked_progress() {
        let tracker = Arc::new(UploadTracker::new(60));
        let id = Uuid::new_v4();
        let storage = Arc::new(RetryingStorage {
            tracker: tracker.clone(),
            upload_id: id,
            calls: Mutex::new(0),
            mid_retry: Mutex::new(None),
        });
        let svc = GalleryService::new(
            storage.clone(),
            Arc::new(FakeStore::default()),
            tracker.clone(),
            "gallery".to_string(),
            1024,
        )
        .with_fallback_bucket(Some("Gallery".to_string()));

        let mut upload = jpeg("site.jpg");
        upload.upload_id = Some(id);
        assert_ok!(svc.upload(upload).await);

        let during = storage.mid_retry.lock().unwrap().clone().unwrap();
        assert_eq!(during.state, UploadState::Uploading);
        assert_eq!(during.percent, 10);

        let done = tracker.get(id).await.unwrap();
        assert_eq!(done.state, UploadState::Succeeded);
        assert_eq!(done.percent, 100);
    }

    #[tokio::test]
    async fn test_delete_survives_blob_removal_failure() {
        let storage = Arc::new(FakeStorage {
            fail_remove: true,
            ..Default::default()
        });
        let store = Arc::new(FakeStore::default());
        let svc = service(storage.clone(), store.clone());

        let image = svc.upload(jpeg("site.jpg")).await.unwrap();
        let id = image.id.unwrap();

        assert_ok!(svc.delete(id).await);
        assert!(store.records.lock().unwrap().is_empty());

        // both bucket name variants were attempted
        let removes = storage.removes.lock().unwrap();
        let buckets: Vec<&str> = removes.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(buckets, vec!["gallery", "Gallery"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let storage = Arc::new(FakeStorage::default());
        let svc = service(storage.clone(), Arc::new(FakeStore::default()));

        assert!(matches!(
            svc.delete(Uuid::new_v4()).await,
            Err(SiteError::NotFound(_))
        ));
        assert!(storage.removes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_a_field() {
        let store = Arc::new(FakeStore::default());
        let svc = service(Arc::new(FakeStorage::default()), store.clone());
        let image = svc.upload(jpeg("site.jpg")).await.unwrap();
        let id = image.id.unwrap();

        assert!(matches!(
            svc.update(id, UpdateImageRequest::default()).await,
            Err(SiteError::InvalidInput(_))
        ));

        let updated = svc
            .update(
                id,
                UpdateImageRequest {
                    title: Some("  Site 12  ".into()),
                    category: Some(Category::General),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Site 12");
        assert_eq!(updated.category, Category::General);
    }

    #[tokio::test]
    async fn test_blank_title_only_update_is_rejected() {
        let store = Arc::new(FakeStore::default());
        let svc = service(Arc::new(FakeStorage::default()), store.clone());
        let image = svc.upload(jpeg("site.jpg")).await.unwrap();
        let id = image.id.unwrap();

        let err = svc
            .update(
                id,
                UpdateImageRequest {
                    title: Some("   ".into()),
                    category: None,
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SiteError::InvalidInput(_)));
        assert_eq!(store.records.lock().unwrap()[0].title, image.title);
    }

    #[tokio::test]
    async fn test_list_appends_filtered_seed_images() {
        let svc = service(
            Arc::new(FakeStorage::default()),
            Arc::new(FakeStore::default()),
        );
        svc.upload(jpeg("mountain.jpg")).await.unwrap();

        let all = svc.list(None, true).await.unwrap();
        assert_eq!(all.len(), 1 + seed_gallery_images().len());
        assert!(all[0].id.is_some());

        let scenery = svc.list(Some(Category::Scenery), true).await.unwrap();
        assert!(scenery.iter().all(|img| img.category == Category::Scenery));

        let stored_only = svc.list(None, false).await.unwrap();
        assert_eq!(stored_only.len(), 1);
    }

    #[test]
    fn test_preview_reports_source_and_scores() {
        let response = GalleryService::preview(&CategorizeRequest {
            file_name: "laundry.jpg".into(),
            description: None,
            suggestion: Some("nonsense".into()),
        });
        assert_eq!(response.category, Category::Facilities);
        assert_eq!(response.source, "fallback");
        assert_eq!(response.scores.len(), 4);
        assert_eq!(response.suggested_title, "Laundry");
    }
}
