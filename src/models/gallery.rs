// src/models/gallery.rs
// DOCUMENTATION: Gallery image records, categories and request DTOs
// PURPOSE: Shared shapes for the upload pipeline, repository and handlers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// The only classification taxonomy for gallery images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Park,
    Scenery,
    Facilities,
    General,
}

impl Category {
    /// Every label, in the order the categorizer declares its rules
    pub const ALL: [Category; 4] = [
        Category::Scenery,
        Category::Park,
        Category::Facilities,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Park => "Park",
            Category::Scenery => "Scenery",
            Category::Facilities => "Facilities",
            Category::General => "General",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace
    pub fn parse(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gallery image, either persisted (has `id`) or a static seed image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub url: String,
    pub title: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Object key inside the bucket; absent for seed images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Record handed to the metadata store on upload
#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryImage {
    pub url: String,
    pub storage_path: String,
    pub title: String,
    pub category: Category,
    pub description: Option<String>,
}

/// Query string of POST /gallery/images
/// DOCUMENTATION: The image itself is the raw request body; its media
/// type comes from the Content-Type header
#[derive(Debug, Deserialize, Validate)]
pub struct UploadImageQuery {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Client-chosen id for polling GET /gallery/uploads/{id}
    pub upload_id: Option<Uuid>,
}

/// PUT /gallery/images/{id}
/// Only provided fields are updated
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct UpdateImageRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    pub category: Option<Category>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl UpdateImageRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category.is_none() && self.description.is_none()
    }
}

/// GET /gallery/images query
#[derive(Debug, Deserialize)]
pub struct GalleryListQuery {
    pub category: Option<Category>,
    pub include_seed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct GalleryListResponse {
    pub images: Vec<GalleryImage>,
    pub total: usize,
}

/// POST /gallery/categorize body
#[derive(Debug, Deserialize, Validate)]
pub struct CategorizeRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    pub description: Option<String>,
    /// Label suggested by an external classifier, if the client has one
    pub suggestion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u32,
}

#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub category: Category,
    /// "inferred" when the suggestion was used, "fallback" for keyword scoring
    pub source: &'static str,
    pub suggested_title: String,
    pub scores: Vec<CategoryScore>,
}
