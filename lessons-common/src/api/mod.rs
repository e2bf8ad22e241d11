//! Shared HTTP API types for the lessons REST API
//!
//! Request bodies for the partial updates and create calls the planner
//! issues. Pure data; the HTTP client lives in `lessons-planner`.

pub mod types;

pub use types::{
    ActivityLink, ActivityRelsUpdate, ActivityUpdate, CurriculumRelation, NewActivity,
    NewCurriculum, NewLink, NewStep, NewTag, TagIdsUpdate,
};
