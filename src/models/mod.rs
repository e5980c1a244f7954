// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod booking;
pub mod chat;
pub mod content;
pub mod gallery;
pub mod view;

pub use booking::*;
pub use chat::*;
pub use content::*;
pub use gallery::*;
pub use view::*;
