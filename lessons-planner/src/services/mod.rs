//! Relationship reconcilers
//!
//! Each service receives its [`crate::LessonsApi`] at construction and keeps
//! no state of its own.

pub mod add_activity;
pub mod add_tag;

pub use add_activity::{AddActivityOutcome, AddActivityService};
pub use add_tag::{AddTagOutcome, AddTagService};
