// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod assistant_service;
pub mod booking_service;
pub mod categorizer;
pub mod gallery_service;
pub mod gemini_client;
pub mod storage_client;
pub mod upload_tracker;

pub use assistant_service::*;
pub use booking_service::*;
pub use gallery_service::*;
pub use gemini_client::*;
pub use storage_client::*;
pub use upload_tracker::*;
