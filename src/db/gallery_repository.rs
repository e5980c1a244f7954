// src/db/gallery_repository.rs
// DOCUMENTATION: Gallery metadata database operations
// PURPOSE: CRUD for the gallery_images table behind the GalleryStore seam

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::SiteError;
use crate::models::{Category, GalleryImage, NewGalleryImage, UpdateImageRequest};

/// Metadata store for gallery images
#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn insert(&self, image: &NewGalleryImage) -> Result<GalleryImage, SiteError>;

    /// Newest first, optionally restricted to one category
    async fn list(&self, category: Option<Category>) -> Result<Vec<GalleryImage>, SiteError>;

    async fn get(&self, id: Uuid) -> Result<GalleryImage, SiteError>;

    async fn update(&self, id: Uuid, req: &UpdateImageRequest)
        -> Result<GalleryImage, SiteError>;

    async fn delete(&self, id: Uuid) -> Result<(), SiteError>;
}

/// Internal struct for mapping database rows
/// DOCUMENTATION: category is stored as text and parsed on the way out
#[derive(Debug, FromRow)]
struct GalleryImageRow {
    id: Uuid,
    url: String,
    storage_path: Option<String>,
    title: String,
    category: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl GalleryImageRow {
    fn into_image(self) -> GalleryImage {
        let category = Category::parse(&self.category).unwrap_or_else(|| {
            log::warn!(
                "Gallery image {} has unknown category {:?}, reporting General",
                self.id,
                self.category
            );
            Category::General
        });

        GalleryImage {
            id: Some(self.id),
            url: self.url,
            title: self.title,
            category,
            description: self.description,
            storage_path: self.storage_path,
            created_at: Some(self.created_at),
        }
    }
}

pub struct GalleryRepository {
    pool: PgPool,
}

impl GalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryStore for GalleryRepository {
    async fn insert(&self, image: &NewGalleryImage) -> Result<GalleryImage, SiteError> {
        let row = sqlx::query_as::<_, GalleryImageRow>(
            r#"
            INSERT INTO gallery_images (url, storage_path, title, category, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, url, storage_path, title, category, description, created_at
            "#,
        )
        .bind(&image.url)
        .bind(&image.storage_path)
        .bind(&image.title)
        .bind(image.category.as_str())
        .bind(&image.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to insert gallery image: {}", e);
            SiteError::DatabaseError(format!("Insert gallery image failed: {}", e))
        })?;

        Ok(row.into_image())
    }

    async fn list(&self, category: Option<Category>) -> Result<Vec<GalleryImage>, SiteError> {
        let rows = sqlx::query_as::<_, GalleryImageRow>(
            r#"
            SELECT id, url, storage_path, title, category, description, created_at
            FROM gallery_images
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list gallery images: {}", e);
            SiteError::DatabaseError(format!("List gallery images failed: {}", e))
        })?;

        Ok(rows.into_iter().map(GalleryImageRow::into_image).collect())
    }

    async fn get(&self, id: Uuid) -> Result<GalleryImage, SiteError> {
        let row = sqlx::query_as::<_, GalleryImageRow>(
            r#"
            SELECT id, url, storage_path, title, category, description, created_at
            FROM gallery_images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SiteError::DatabaseError(e.to_string()))?
        .ok_or_else(|| SiteError::NotFound(format!("gallery image {}", id)))?;

        Ok(row.into_image())
    }

    async fn update(
        &self,
        id: Uuid,
        req: &UpdateImageRequest,
    ) -> Result<GalleryImage, SiteError> {
        let row = sqlx::query_as::<_, GalleryImageRow>(
            r#"
            UPDATE gallery_images
            SET title = COALESCE($2, title),
                category = COALESCE($3, category),
                description = COALESCE($4, description)
            WHERE id = $1
            RETURNING id, url, storage_path, title, category, description, created_at
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(req.category.map(|c| c.as_str()))
        .bind(&req.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update gallery image {}: {}", id, e);
            SiteError::DatabaseError(format!("Update gallery image failed: {}", e))
        })?
        .ok_or_else(|| SiteError::NotFound(format!("gallery image {}", id)))?;

        Ok(row.into_image())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SiteError> {
        let result = sqlx::query("DELETE FROM gallery_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete gallery image {}: {}", id, e);
                SiteError::DatabaseError(format!("Delete gallery image failed: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(SiteError::NotFound(format!("gallery image {}", id)));
        }

        Ok(())
    }
}
