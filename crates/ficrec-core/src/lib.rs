//! Ficrec Core - Domain rules shared across the service
//!
//! This crate defines the pieces of the recommendation service that do not
//! depend on HTTP or storage:
//! - Canonicalization of user-supplied labels (tags, fiction types)
//! - Configuration management

pub mod canonical;
pub mod config;

pub use canonical::{canonical_fiction_type, canonical_tag, slugify};
pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
