/// Post Service Library
///
/// Handles post creation, the reverse-chronological feed, and post deletion
/// for the Prism platform. Media files are persisted to an S3-compatible
/// blob store; post records live in PostgreSQL; callers authenticate with
/// bearer tokens issued by the identity provider.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Post and feed data structures
/// - `services`: Business logic layer
/// - `db`: Database access layer and repositories
/// - `storage`: Blob store client for uploaded media
/// - `middleware`: HTTP middleware for authentication
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};
