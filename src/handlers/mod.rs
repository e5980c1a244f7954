// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod assistant;
pub mod bookings;
pub mod content;
pub mod gallery;
pub mod health;

pub use assistant::config as assistant_config;
pub use bookings::config as bookings_config;
pub use content::config as content_config;
pub use gallery::config as gallery_config;
pub use health::config as health_config;
