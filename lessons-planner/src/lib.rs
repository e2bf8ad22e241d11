//! lessons-planner library interface
//!
//! REST client for the lessons API, the relationship reconcilers that keep
//! curricula, activities and tags consistent after partial updates, and the
//! planner session used by the CLI.

pub mod api;
pub mod board;
pub mod error;
pub mod services;

pub use crate::api::{HttpLessonsApi, LessonsApi};
pub use crate::board::CurriculumBoard;
pub use crate::error::{ClientError, ClientResult};
pub use crate::services::{AddActivityOutcome, AddActivityService, AddTagOutcome, AddTagService};
