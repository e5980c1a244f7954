// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod booking_repository;
pub mod gallery_repository;

pub use booking_repository::*;
pub use gallery_repository::*;
