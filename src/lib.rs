//! Valueator - posterized value studies from photos
//!
//! Configuration, recent-image storage, ingestion and PNG export around
//! the `value-study` pipeline. This library exposes modules for the CLI
//! and for integration testing.

pub mod assets;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod render;
pub mod store;
