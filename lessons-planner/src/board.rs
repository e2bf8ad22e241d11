//! Planner session state
//!
//! [`CurriculumBoard`] holds the curricula, activities and tags fetched from
//! the API and routes every relationship edit through the reconcilers, so
//! each curriculum's derived tags stay a function of its activities. The
//! same activity can appear in the board's activity list and inside several
//! curricula; edits are applied to every copy.

use std::sync::Arc;

use lessons_common::api::{
    ActivityUpdate, CurriculumRelation, NewActivity, NewCurriculum, NewLink, NewStep, NewTag,
};
use lessons_common::inheritance::{
    derive_all_curricula_tags, merge_tag_into, refresh_curriculum_tags,
};
use lessons_common::models::{
    contains_by_id, Activity, ActivityId, Curriculum, CurriculumId, Material, Resource, Step, Tag,
    TagCategory, TagId,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::api::LessonsApi;
use crate::error::{ClientError, ClientResult};
use crate::services::{AddActivityOutcome, AddActivityService, AddTagOutcome, AddTagService};

/// Local view of the lessons catalogue
pub struct CurriculumBoard<A: ?Sized> {
    api: Arc<A>,
    add_activity: AddActivityService<A>,
    add_tag: AddTagService<A>,
    curricula: Vec<Curriculum>,
    activities: Vec<Activity>,
    tags: Vec<Tag>,
}

impl<A: LessonsApi + ?Sized> CurriculumBoard<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            add_activity: AddActivityService::new(Arc::clone(&api)),
            add_tag: AddTagService::new(Arc::clone(&api)),
            api,
            curricula: Vec::new(),
            activities: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Fetch curricula, activities and tags, deriving curriculum tags
    pub async fn load(&mut self) -> ClientResult<()> {
        let mut curricula = self.api.list_curricula().await?;
        derive_all_curricula_tags(&mut curricula);
        let activities = self.api.list_activities().await?;
        let tags = self.api.list_tags().await?;

        info!(
            curricula = curricula.len(),
            activities = activities.len(),
            tags = tags.len(),
            "Loaded lessons catalogue"
        );

        self.curricula = curricula;
        self.activities = activities;
        self.tags = tags;
        Ok(())
    }

    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn curriculum(&self, id: CurriculumId) -> Option<&Curriculum> {
        self.curricula.iter().find(|c| c.id == id)
    }

    /// Activity by id, from the activity list or any curriculum
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id).or_else(|| {
            self.curricula
                .iter()
                .flat_map(|c| c.activities.iter())
                .find(|a| a.id == id)
        })
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    fn curriculum_mut(&mut self, id: CurriculumId) -> ClientResult<&mut Curriculum> {
        self.curricula
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("curriculum {}", id)))
    }

    fn require_activity(&self, id: ActivityId) -> ClientResult<&Activity> {
        self.activity(id)
            .ok_or_else(|| ClientError::NotFound(format!("activity {}", id)))
    }

    /// Apply `update` to every copy of an activity and re-derive the tags
    /// of each curriculum holding it. Returns the number of copies touched.
    fn update_activity_copies(
        &mut self,
        id: ActivityId,
        mut update: impl FnMut(&mut Activity),
    ) -> usize {
        let mut touched = 0;
        if let Some(activity) = self.activities.iter_mut().find(|a| a.id == id) {
            update(activity);
            touched += 1;
        }
        for curriculum in &mut self.curricula {
            if let Some(activity) = curriculum.activity_mut(id) {
                update(activity);
                touched += 1;
                refresh_curriculum_tags(curriculum);
            }
        }
        touched
    }

    // ========================================
    // Relationship edits
    // ========================================

    /// Add an activity to the end of a curriculum
    pub async fn add_activity(
        &mut self,
        curriculum_id: CurriculumId,
        activity: &Activity,
    ) -> ClientResult<AddActivityOutcome> {
        let curriculum = self
            .curricula
            .iter_mut()
            .find(|c| c.id == curriculum_id)
            .ok_or_else(|| ClientError::NotFound(format!("curriculum {}", curriculum_id)))?;

        self.add_activity.add_activity(curriculum, activity).await
    }

    /// Attach a tag to an activity and re-derive affected curricula
    pub async fn add_tag(
        &mut self,
        activity_id: ActivityId,
        tag: &Tag,
    ) -> ClientResult<AddTagOutcome> {
        let mut activity = self.require_activity(activity_id)?.clone();

        let outcome = self.add_tag.add_tag(&mut activity, tag).await?;
        if outcome == AddTagOutcome::Added {
            let tags = activity.tags;
            self.update_activity_copies(activity_id, |copy| copy.tags = tags.clone());
        }
        merge_tag_into(&mut self.tags, tag);

        Ok(outcome)
    }

    /// Save the activity edit form
    ///
    /// The server's activity replaces every local copy, so a changed tag
    /// list is re-derived into each curriculum holding the activity.
    pub async fn edit_activity(
        &mut self,
        activity_id: ActivityId,
        update: &ActivityUpdate,
    ) -> ClientResult<Activity> {
        self.require_activity(activity_id)?;

        let updated = self.api.update_activity(activity_id, update).await?;
        if updated.id != activity_id {
            return Err(ClientError::UnexpectedResponse(format!(
                "expected activity {}, server returned {}",
                activity_id, updated.id
            )));
        }

        let copies = self.update_activity_copies(activity_id, |copy| *copy = updated.clone());
        for tag in &updated.tags {
            merge_tag_into(&mut self.tags, tag);
        }
        info!(activity_id = %activity_id, copies, "Saved activity");

        Ok(updated)
    }

    // ========================================
    // Create calls
    // ========================================

    /// Create a tag on an activity, then attach it to the activity
    pub async fn create_tag(
        &mut self,
        activity_id: ActivityId,
        name: &str,
        category: TagCategory,
    ) -> ClientResult<Tag> {
        self.require_activity(activity_id)?;

        let new = NewTag::new(name, category).for_activity(activity_id);
        let tag = self.api.create_tag(&new).await?;
        merge_tag_into(&mut self.tags, &tag);

        self.add_tag(activity_id, &tag).await?;
        Ok(tag)
    }

    /// Create a curriculum and add it to the board
    pub async fn create_curriculum(&mut self, new: &NewCurriculum) -> ClientResult<&Curriculum> {
        let mut created = self.api.create_curriculum(new).await?;
        refresh_curriculum_tags(&mut created);
        info!(curriculum_id = %created.id, name = %created.name, "Created curriculum");

        let index = self.curricula.len();
        self.curricula.push(created);
        Ok(&self.curricula[index])
    }

    /// Re-fetch one curriculum and fold its activities into local state
    pub async fn reload_curriculum(
        &mut self,
        curriculum_id: CurriculumId,
    ) -> ClientResult<&Curriculum> {
        let refreshed = self.api.get_curriculum(curriculum_id).await?;
        let curriculum = self.curriculum_mut(curriculum_id)?;
        AddActivityService::<A>::apply_response(curriculum, refreshed)?;
        Ok(curriculum)
    }

    /// Create an activity as the next position of a curriculum
    pub async fn create_activity_in(
        &mut self,
        curriculum_id: CurriculumId,
        mut new: NewActivity,
    ) -> ClientResult<Activity> {
        let number = self
            .curriculum(curriculum_id)
            .ok_or_else(|| ClientError::NotFound(format!("curriculum {}", curriculum_id)))?
            .activities
            .len() as u32
            + 1;
        new.curriculum_rels.push(CurriculumRelation {
            curriculum_id,
            number,
        });

        let created = self.api.create_activity(&new).await?;
        info!(
            activity_id = %created.id,
            curriculum_id = %curriculum_id,
            number,
            "Created activity"
        );

        self.reload_curriculum(curriculum_id).await?;
        if !contains_by_id(&self.activities, created.id) {
            self.activities.push(created.clone());
        }
        Ok(created)
    }

    pub async fn create_material(
        &mut self,
        activity_id: ActivityId,
        name: &str,
        url: &str,
    ) -> ClientResult<Material> {
        self.require_activity(activity_id)?;

        let material = self
            .api
            .create_material(&NewLink::new(name, url, activity_id))
            .await?;
        self.update_activity_copies(activity_id, |activity| {
            if !contains_by_id(&activity.materials, material.id) {
                activity.materials.push(material.clone());
            }
        });
        Ok(material)
    }

    pub async fn create_resource(
        &mut self,
        activity_id: ActivityId,
        name: &str,
        url: &str,
    ) -> ClientResult<Resource> {
        self.require_activity(activity_id)?;

        let resource = self
            .api
            .create_resource(&NewLink::new(name, url, activity_id))
            .await?;
        self.update_activity_copies(activity_id, |activity| {
            if !contains_by_id(&activity.resources, resource.id) {
                activity.resources.push(resource.clone());
            }
        });
        Ok(resource)
    }

    pub async fn create_step(
        &mut self,
        activity_id: ActivityId,
        fields: Map<String, Value>,
    ) -> ClientResult<Step> {
        self.require_activity(activity_id)?;

        let new = NewStep {
            activity: vec![activity_id],
            fields,
        };
        let step = self.api.create_step(&new).await?;
        self.update_activity_copies(activity_id, |activity| {
            if !contains_by_id(&activity.steps, step.id) {
                activity.steps.push(step.clone());
            }
        });
        Ok(step)
    }
}
