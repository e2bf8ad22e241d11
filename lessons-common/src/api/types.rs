//! Request body types
//!
//! Field names match the lessons API exactly, including its mixed-case
//! `activityID` / `tag_IDs` keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{
    Activity, ActivityId, CurriculumActivityRelation, CurriculumId, Grade, MaterialId, ResourceId,
    TagCategory, TagId,
};

// ========================================
// Partial updates
// ========================================

/// `PATCH /api/curricula/:id` body replacing a curriculum's activity order
///
/// # Examples
///
/// ```
/// use lessons_common::api::ActivityRelsUpdate;
/// use lessons_common::models::{ActivityId, CurriculumActivityRelation};
///
/// let update = ActivityRelsUpdate {
///     activity_rels: vec![CurriculumActivityRelation { activity_id: ActivityId(4), number: 1 }],
/// };
/// let json = serde_json::to_string(&update).unwrap();
/// assert_eq!(json, r#"{"activity_rels":[{"activityID":4,"number":1}]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRelsUpdate {
    pub activity_rels: Vec<CurriculumActivityRelation>,
}

impl ActivityRelsUpdate {
    /// Number assigned to the last relation (the appended activity)
    pub fn last_number(&self) -> Option<u32> {
        self.activity_rels.last().map(|rel| rel.number)
    }
}

/// `PATCH /api/activities/:id` body replacing an activity's tag set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagIdsUpdate {
    #[serde(rename = "tag_IDs")]
    pub tag_ids: Vec<TagId>,
}

/// `PATCH /api/activities/:id` body for the activity edit form
///
/// Carries the editable fields together with the full tag id list; the
/// server replaces every field it receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityUpdate {
    pub name: String,
    #[serde(rename = "tag_IDs")]
    pub tag_ids: Vec<TagId>,
    pub teaching_notes: String,
    pub video_url: String,
    pub category: String,
}

impl ActivityUpdate {
    /// Edit form prefilled from the current activity
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            name: activity.name.clone(),
            tag_ids: activity.tags.iter().map(|t| t.id).collect(),
            teaching_notes: activity.teaching_notes.clone(),
            video_url: activity.video_url.clone(),
            category: activity.category.clone(),
        }
    }
}

// ========================================
// Create requests
// ========================================

/// Curriculum membership given when creating an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRelation {
    #[serde(rename = "curriculumID")]
    pub curriculum_id: CurriculumId,
    pub number: u32,
}

/// Activity-to-activity relationship given when creating an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLink {
    #[serde(rename = "activityID")]
    pub activity_id: ActivityId,
    /// Relationship type code: SUB, SUP or EXT
    #[serde(rename = "type")]
    pub rel_type: String,
}

/// `POST /api/curricula/` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCurriculum {
    pub name: String,
    pub description: String,
    pub lower_grade: Grade,
    pub upper_grade: Grade,
    #[serde(default)]
    pub tagline: String,
    /// Optional first activity, always numbered 1
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_rels: Vec<CurriculumActivityRelation>,
}

impl NewCurriculum {
    pub fn with_first_activity(mut self, activity_id: ActivityId) -> Self {
        self.activity_rels = vec![CurriculumActivityRelation {
            activity_id,
            number: 1,
        }];
        self
    }
}

/// `POST /api/activities/` body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewActivity {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub teaching_notes: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(rename = "tag_IDs", default)]
    pub tag_ids: Vec<TagId>,
    #[serde(rename = "resource_IDs", default)]
    pub resource_ids: Vec<ResourceId>,
    #[serde(rename = "material_IDs", default)]
    pub material_ids: Vec<MaterialId>,
    #[serde(default)]
    pub curriculum_rels: Vec<CurriculumRelation>,
    #[serde(default)]
    pub activity_rels: Vec<ActivityLink>,
}

/// `POST /api/tags/` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub category: String,
    /// Activities the new tag is attached to on creation
    #[serde(default)]
    pub activities: Vec<ActivityId>,
}

impl NewTag {
    pub fn new(name: impl Into<String>, category: TagCategory) -> Self {
        Self {
            name: name.into(),
            category: category.as_str().to_string(),
            activities: Vec::new(),
        }
    }

    pub fn for_activity(mut self, activity_id: ActivityId) -> Self {
        self.activities = vec![activity_id];
        self
    }
}

/// `POST /api/materials/` and `POST /api/resources/` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub activities: Vec<ActivityId>,
}

impl NewLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>, activity_id: ActivityId) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            activities: vec![activity_id],
        }
    }
}

/// `POST /api/steps/` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStep {
    pub activity: Vec<ActivityId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

// ========================================
// Tests
// ========================================
