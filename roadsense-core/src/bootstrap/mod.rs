//! Bootstrap module for initializing the Roadsense server
//!
//! This module handles:
//! - Configuration loading
//! - Database initialization

pub mod config;
pub mod database;

pub use config::load_config;
pub use database::init_database;
