//! Lessons REST API access
//!
//! [`LessonsApi`] is the seam between the reconcilers and the network. The
//! reconcilers and [`crate::CurriculumBoard`] receive an implementation at
//! construction; [`HttpLessonsApi`] is the reqwest-backed one.

mod http;

pub use http::HttpLessonsApi;

use async_trait::async_trait;
use lessons_common::api::{
    ActivityRelsUpdate, ActivityUpdate, NewActivity, NewCurriculum, NewLink, NewStep, NewTag,
    TagIdsUpdate,
};
use lessons_common::models::{
    Activity, ActivityId, Curriculum, CurriculumId, Material, Resource, Step, Tag,
};

use crate::error::ClientResult;

/// Operations the planner needs from the lessons API
#[async_trait]
pub trait LessonsApi: Send + Sync {
    /// `GET /api/curricula/`
    async fn list_curricula(&self) -> ClientResult<Vec<Curriculum>>;

    /// `GET /api/curricula/:id`
    async fn get_curriculum(&self, id: CurriculumId) -> ClientResult<Curriculum>;

    /// `POST /api/curricula/`
    async fn create_curriculum(&self, new: &NewCurriculum) -> ClientResult<Curriculum>;

    /// `PATCH /api/curricula/:id` with `{ activity_rels }`
    ///
    /// Returns the curriculum with its activities in server-assigned order.
    async fn update_curriculum_activities(
        &self,
        id: CurriculumId,
        update: &ActivityRelsUpdate,
    ) -> ClientResult<Curriculum>;

    /// `GET /api/activities/`
    async fn list_activities(&self) -> ClientResult<Vec<Activity>>;

    /// `POST /api/activities/`
    async fn create_activity(&self, new: &NewActivity) -> ClientResult<Activity>;

    /// `PATCH /api/activities/:id` with `{ tag_IDs }`
    async fn update_activity_tags(
        &self,
        id: ActivityId,
        update: &TagIdsUpdate,
    ) -> ClientResult<Activity>;

    /// `PATCH /api/activities/:id` with the edit form fields
    async fn update_activity(
        &self,
        id: ActivityId,
        update: &ActivityUpdate,
    ) -> ClientResult<Activity>;

    /// `GET /api/tags/`
    async fn list_tags(&self) -> ClientResult<Vec<Tag>>;

    /// `POST /api/tags/`
    async fn create_tag(&self, new: &NewTag) -> ClientResult<Tag>;

    /// `GET /api/materials/`
    async fn list_materials(&self) -> ClientResult<Vec<Material>>;

    /// `POST /api/materials/`
    async fn create_material(&self, new: &NewLink) -> ClientResult<Material>;

    /// `GET /api/resources/`
    async fn list_resources(&self) -> ClientResult<Vec<Resource>>;

    /// `POST /api/resources/`
    async fn create_resource(&self, new: &NewLink) -> ClientResult<Resource>;

    /// `GET /api/steps/`
    async fn list_steps(&self) -> ClientResult<Vec<Step>>;

    /// `POST /api/steps/`
    async fn create_step(&self, new: &NewStep) -> ClientResult<Step>;
}
