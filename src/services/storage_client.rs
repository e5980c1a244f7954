// src/services/storage_client.rs
// DOCUMENTATION: Object storage client (Supabase Storage REST API)
// PURPOSE: Upload, resolve public URLs for, and remove gallery blobs

use async_trait::async_trait;
use futures::stream;
use reqwest::{Body, Client, StatusCode};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Upload progress callback, called with 0..=100
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Bodies are streamed in chunks this size so progress can be reported
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The bucket does not exist (or is misnamed)
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// A storage policy rejected the request
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Network or unexpected server failure
    #[error("transport error: {0}")]
    Transport(String),
}

/// Object storage seam used by the gallery pipeline
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<ProgressFn>,
    ) -> Result<(), StorageError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError>;
}

/// Supabase Storage client
/// DOCUMENTATION: Authenticates with the service key on every request
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStorage {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    /// Map a failed storage response onto the error taxonomy
    /// DOCUMENTATION: Supabase sometimes reports a missing bucket as a 400
    /// with "Bucket not found" in the body, so the body is checked too
    fn classify_failure(bucket: &str, status: StatusCode, body: &str) -> StorageError {
        let lower = body.to_lowercase();

        if lower.contains("bucket not found") || status == StatusCode::NOT_FOUND {
            return StorageError::BucketNotFound(bucket.to_string());
        }

        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || lower.contains("row-level security")
            || lower.contains("policy")
        {
            return StorageError::PermissionDenied(format!("{}: {}", status, body));
        }

        StorageError::Transport(format!("{}: {}", status, body))
    }
}

/// Split a body into chunks, reporting the cumulative percentage as each
/// chunk is handed to the transport
fn progress_stream(
    bytes: Vec<u8>,
    progress: Option<ProgressFn>,
) -> impl futures::Stream<Item = Result<Vec<u8>, std::io::Error>> {
    let total = bytes.len().max(1);
    let sent = Arc::new(AtomicUsize::new(0));

    let chunks: Vec<Vec<u8>> = bytes
        .chunks(UPLOAD_CHUNK_BYTES)
        .map(|chunk| chunk.to_vec())
        .collect();

    stream::iter(chunks.into_iter().map(move |chunk| {
        let done = sent.fetch_add(chunk.len(), Ordering::SeqCst) + chunk.len();
        if let Some(report) = &progress {
            report(((done * 100) / total).min(100) as u8);
        }
        Ok(chunk)
    }))
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<ProgressFn>,
    ) -> Result<(), StorageError> {
        let url = self.object_url(bucket, path);
        let length = bytes.len();

        log::debug!("Uploading {} bytes to {}/{}", length, bucket, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Content-Type", content_type)
            .header("Content-Length", length)
            .header("x-upsert", "false")
            .header("cache-control", "max-age=3600")
            .body(Body::wrap_stream(progress_stream(bytes, progress)))
            .send()
            .await
            .map_err(|e| {
                log::error!("Storage upload request failed: {}", e);
                StorageError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Storage upload error {} for {}/{}: {}", status, bucket, path, body);
            return Err(Self::classify_failure(bucket, status, &body));
        }

        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/object/{}", self.base_url, bucket);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&json!({ "prefixes": [path] }))
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_failure(bucket, status, &body));
        }

        Ok(())
    }
}
