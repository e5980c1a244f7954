// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Environment config and database pool setup

pub mod db;
pub mod env;

pub use db::init_db_pool;
pub use env::Config;
