//! # Lessons Common Library
//!
//! Shared code for the lesson planner crates including:
//! - Curriculum, activity and tag models with typed identity keys
//! - Tag inheritance (curriculum tags derived from activity tags)
//! - API request/response types
//! - Configuration loading

pub mod api;
pub mod config;
pub mod error;
pub mod inheritance;
pub mod models;

pub use error::{Error, Result};
pub use inheritance::{
    derive_all_curricula_tags, derive_curriculum_tags, is_inheritable, merge_tag_into, merge_tags,
    refresh_curriculum_tags,
};
pub use models::{Activity, ActivityId, Curriculum, CurriculumId, Tag, TagId};
