//! Photo Pick Adapters - External adapters for photo-pick.
//!
//! This crate provides:
//! - Filesystem image discovery
//! - Output materialization for the ranked selection
//! - Emotion model downloading and caching

pub mod fs;
pub mod models;

pub use fs::{collect_image_refs, materialize};
pub use models::ModelStore;
