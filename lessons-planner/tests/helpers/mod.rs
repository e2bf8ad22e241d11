//! Shared test helpers: an in-memory lessons API
//!
//! `FakeApi` behaves like the server for the calls the planner makes: it
//! stores curricula without tags (tags are derived client side), resolves
//! relation lists against its activity catalogue, and records every call.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use lessons_common::api::{
    ActivityRelsUpdate, ActivityUpdate, NewActivity, NewCurriculum, NewLink, NewStep, NewTag,
    TagIdsUpdate,
};
use lessons_common::models::{
    Activity, ActivityId, Curriculum, CurriculumId, Material, MaterialId, Resource, ResourceId,
    Step, StepId, Tag, TagCategory, TagId,
};
use lessons_planner::{ClientError, ClientResult, LessonsApi};
use serde_json::{json, Value};

/// Recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListCurricula,
    GetCurriculum(CurriculumId),
    CreateCurriculum(String),
    PatchCurriculum(CurriculumId, ActivityRelsUpdate),
    ListActivities,
    CreateActivity(NewActivity),
    PatchActivity(ActivityId, TagIdsUpdate),
    UpdateActivity(ActivityId, ActivityUpdate),
    ListTags,
    CreateTag(NewTag),
    CreateMaterial(NewLink),
    CreateResource(NewLink),
    CreateStep,
    ListOther,
}

#[derive(Default)]
pub struct FakeState {
    pub curricula: Vec<Curriculum>,
    pub activities: Vec<Activity>,
    pub tags: Vec<Tag>,
    pub calls: Vec<Call>,
    /// Every PATCH fails with this status and payload
    pub reject_patches: Option<(u16, Value)>,
    /// PATCH responses list activities in reverse number order
    pub reverse_patch_order: bool,
    next_id: i64,
}

impl FakeState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        1000 + self.next_id
    }

    fn activity(&self, id: ActivityId) -> Option<Activity> {
        self.activities.iter().find(|a| a.id == id).cloned()
    }

    fn served_curriculum(&self, id: CurriculumId) -> ClientResult<Curriculum> {
        self.curricula
            .iter()
            .find(|c| c.id == id)
            .map(|c| Curriculum {
                tags: Vec::new(),
                ..c.clone()
            })
            .ok_or_else(not_found)
    }
}

fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        payload: json!({"detail": "Not found."}),
    }
}

pub struct FakeApi {
    pub state: Mutex<FakeState>,
}

impl FakeApi {
    /// Server whose catalogue holds `activities` and `tags`, with `curricula`
    /// referencing activities from the catalogue
    pub fn new(curricula: Vec<Curriculum>, activities: Vec<Activity>, tags: Vec<Tag>) -> Self {
        let curricula = curricula
            .into_iter()
            .map(|c| Curriculum {
                tags: Vec::new(),
                ..c
            })
            .collect();
        Self {
            state: Mutex::new(FakeState {
                curricula,
                activities,
                tags,
                ..Default::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn patch_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::PatchCurriculum(..) | Call::PatchActivity(..) | Call::UpdateActivity(..)
                )
            })
            .collect()
    }

    pub fn reject_patches(&self, status: u16, payload: Value) {
        self.state.lock().unwrap().reject_patches = Some((status, payload));
    }

    pub fn reverse_patch_order(&self) {
        self.state.lock().unwrap().reverse_patch_order = true;
    }
}

#[async_trait]
impl LessonsApi for FakeApi {
    async fn list_curricula(&self) -> ClientResult<Vec<Curriculum>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListCurricula);
        let ids: Vec<_> = state.curricula.iter().map(|c| c.id).collect();
        ids.into_iter().map(|id| state.served_curriculum(id)).collect()
    }

    async fn get_curriculum(&self, id: CurriculumId) -> ClientResult<Curriculum> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetCurriculum(id));
        state.served_curriculum(id)
    }

    async fn create_curriculum(&self, new: &NewCurriculum) -> ClientResult<Curriculum> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateCurriculum(new.name.clone()));
        let mut curriculum = Curriculum::new(state.next_id(), new.name.clone());
        curriculum.lower_grade = Some(new.lower_grade);
        curriculum.upper_grade = Some(new.upper_grade);
        for rel in &new.activity_rels {
            let activity = state.activity(rel.activity_id).ok_or_else(not_found)?;
            curriculum.activities.push(activity);
        }
        state.curricula.push(curriculum.clone());
        Ok(curriculum)
    }

    async fn update_curriculum_activities(
        &self,
        id: CurriculumId,
        update: &ActivityRelsUpdate,
    ) -> ClientResult<Curriculum> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::PatchCurriculum(id, update.clone()));
        if let Some((status, payload)) = state.reject_patches.clone() {
            return Err(ClientError::Api { status, payload });
        }

        let mut rels = update.activity_rels.clone();
        rels.sort_by_key(|r| r.number);
        let mut activities = Vec::new();
        for rel in rels {
            let invalid = format!("Invalid activity {}", rel.activity_id);
            let activity = state.activity(rel.activity_id).ok_or_else(|| ClientError::Api {
                status: 400,
                payload: json!({ "activity_rels": [invalid] }),
            })?;
            activities.push(activity);
        }
        if state.reverse_patch_order {
            activities.reverse();
        }

        let curriculum = state
            .curricula
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(not_found)?;
        curriculum.activities = activities;
        Ok(curriculum.clone())
    }

    async fn list_activities(&self) -> ClientResult<Vec<Activity>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListActivities);
        Ok(state.activities.clone())
    }

    async fn create_activity(&self, new: &NewActivity) -> ClientResult<Activity> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateActivity(new.clone()));
        let mut activity = Activity::new(state.next_id(), new.name.clone());
        activity.description = new.description.clone();
        activity.tags = state
            .tags
            .iter()
            .filter(|t| new.tag_ids.contains(&t.id))
            .cloned()
            .collect();
        state.activities.push(activity.clone());
        for rel in &new.curriculum_rels {
            let target = state.curricula.iter_mut().find(|c| c.id == rel.curriculum_id);
            if let Some(curriculum) = target {
                curriculum.activities.push(activity.clone());
            }
        }
        Ok(activity)
    }

    async fn update_activity_tags(
        &self,
        id: ActivityId,
        update: &TagIdsUpdate,
    ) -> ClientResult<Activity> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::PatchActivity(id, update.clone()));
        if let Some((status, payload)) = state.reject_patches.clone() {
            return Err(ClientError::Api { status, payload });
        }

        // Server returns tags in catalogue order, not request order
        let tags: Vec<Tag> = state
            .tags
            .iter()
            .filter(|t| update.tag_ids.contains(&t.id))
            .cloned()
            .collect();
        let activity = state
            .activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(not_found)?;
        activity.tags = tags;
        let updated = activity.clone();
        for curriculum in &mut state.curricula {
            if let Some(copy) = curriculum.activity_mut(id) {
                *copy = updated.clone();
            }
        }
        Ok(updated)
    }

    async fn update_activity(
        &self,
        id: ActivityId,
        update: &ActivityUpdate,
    ) -> ClientResult<Activity> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateActivity(id, update.clone()));
        if let Some((status, payload)) = state.reject_patches.clone() {
            return Err(ClientError::Api { status, payload });
        }

        let tags: Vec<Tag> = state
            .tags
            .iter()
            .filter(|t| update.tag_ids.contains(&t.id))
            .cloned()
            .collect();
        let activity = state
            .activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(not_found)?;
        activity.name = update.name.clone();
        activity.tags = tags;
        activity.teaching_notes = update.teaching_notes.clone();
        activity.video_url = update.video_url.clone();
        activity.category = update.category.clone();
        let updated = activity.clone();
        for curriculum in &mut state.curricula {
            if let Some(copy) = curriculum.activity_mut(id) {
                *copy = updated.clone();
            }
        }
        Ok(updated)
    }

    async fn list_tags(&self) -> ClientResult<Vec<Tag>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListTags);
        Ok(state.tags.clone())
    }

    async fn create_tag(&self, new: &NewTag) -> ClientResult<Tag> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateTag(new.clone()));
        if state.tags.iter().any(|t| t.name == new.name) {
            return Err(ClientError::Api {
                status: 400,
                payload: json!({"name": ["tag with this name already exists."]}),
            });
        }
        let category: TagCategory = new.category.parse().map_err(|_| ClientError::Api {
            status: 400,
            payload: json!({"category": ["Not a valid choice."]}),
        })?;
        let tag = Tag::new(TagId(state.next_id()), new.name.clone(), category);
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn list_materials(&self) -> ClientResult<Vec<Material>> {
        self.state.lock().unwrap().calls.push(Call::ListOther);
        Ok(Vec::new())
    }

    async fn create_material(&self, new: &NewLink) -> ClientResult<Material> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateMaterial(new.clone()));
        Ok(Material {
            id: MaterialId(state.next_id()),
            name: new.name.clone(),
            url: new.url.clone(),
            activities: new.activities.clone(),
        })
    }

    async fn list_resources(&self) -> ClientResult<Vec<Resource>> {
        self.state.lock().unwrap().calls.push(Call::ListOther);
        Ok(Vec::new())
    }

    async fn create_resource(&self, new: &NewLink) -> ClientResult<Resource> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateResource(new.clone()));
        Ok(Resource {
            id: ResourceId(state.next_id()),
            name: new.name.clone(),
            url: new.url.clone(),
            activities: new.activities.clone(),
        })
    }

    async fn list_steps(&self) -> ClientResult<Vec<Step>> {
        self.state.lock().unwrap().calls.push(Call::ListOther);
        Ok(Vec::new())
    }

    async fn create_step(&self, new: &NewStep) -> ClientResult<Step> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateStep);
        Ok(Step {
            id: StepId(state.next_id()),
            activity: new.activity.clone(),
            fields: new.fields.clone(),
        })
    }
}

// ========================================
// Fixtures
// ========================================

pub fn python() -> Tag {
    Tag::new(1, "python", TagCategory::Language)
}

pub fn loops() -> Tag {
    Tag::new(2, "loops", TagCategory::Concept)
}

pub fn raspberry_pi() -> Tag {
    Tag::new(3, "raspberry-pi", TagCategory::Technology)
}

pub fn beginner() -> Tag {
    Tag::new(4, "beginner", TagCategory::Difficulty)
}

pub fn html() -> Tag {
    Tag::new(5, "html", TagCategory::Language)
}

/// Catalogue: activities 10 and 11 on curriculum 1, activity 12 unassigned
pub fn catalogue() -> (Vec<Curriculum>, Vec<Activity>, Vec<Tag>) {
    let a10 = Activity::new(10, "Hello Python").with_tags(vec![python(), loops()]);
    let a11 = Activity::new(11, "Blink an LED").with_tags(vec![raspberry_pi(), python()]);
    let a12 = Activity::new(12, "First web page").with_tags(vec![html(), beginner()]);

    let curriculum = Curriculum::new(1, "Python on the Pi")
        .with_activities(vec![a10.clone(), a11.clone()]);
    let second = Curriculum::new(2, "Web Foundations").with_activities(vec![a11.clone()]);

    (
        vec![curriculum, second],
        vec![a10, a11, a12],
        vec![python(), loops(), raspberry_pi(), beginner(), html()],
    )
}

pub fn fake_api() -> FakeApi {
    let (curricula, activities, tags) = catalogue();
    FakeApi::new(curricula, activities, tags)
}
