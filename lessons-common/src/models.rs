//! Curriculum, activity and tag models
//!
//! Wire shapes follow the lessons REST API. Every record carries a typed
//! identity key; membership checks go through [`Identified`] rather than
//! structural comparison.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::Error;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Tag primary key
    TagId
);
id_type!(
    /// Activity primary key
    ActivityId
);
id_type!(
    /// Curriculum primary key
    CurriculumId
);
id_type!(
    /// Material primary key
    MaterialId
);
id_type!(
    /// Resource primary key
    ResourceId
);
id_type!(
    /// Step primary key
    StepId
);

/// Record with a typed identity key
pub trait Identified {
    type Key: Copy + Eq + fmt::Display;

    fn key(&self) -> Self::Key;
}

/// True if any record in `list` has identity `key`
pub fn contains_by_id<T: Identified>(list: &[T], key: T::Key) -> bool {
    list.iter().any(|item| item.key() == key)
}

// ========================================
// Tags
// ========================================

/// Tag category as displayed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    Language,
    Technology,
    Concept,
    Difficulty,
    Length,
}

impl TagCategory {
    /// All categories in the order the tag form offers them
    pub const ALL: [TagCategory; 5] = [
        TagCategory::Language,
        TagCategory::Technology,
        TagCategory::Concept,
        TagCategory::Difficulty,
        TagCategory::Length,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Language => "Language",
            TagCategory::Technology => "Technology",
            TagCategory::Concept => "Concept",
            TagCategory::Difficulty => "Difficulty",
            TagCategory::Length => "Length",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagCategory {
    type Err = Error;

    /// Exact, case-sensitive match on the display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown tag category: {}", s)))
    }
}

/// Categorized label attached to activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Display name of the category ("Language", "Concept", ...)
    pub category: String,
    /// Logo image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Tag {
    pub fn new(id: impl Into<TagId>, name: impl Into<String>, category: TagCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.as_str().to_string(),
            logo: None,
        }
    }

    /// Parsed category, `None` for strings the API does not define
    pub fn category_kind(&self) -> Option<TagCategory> {
        self.category.parse().ok()
    }
}

impl Identified for Tag {
    type Key = TagId;

    fn key(&self) -> TagId {
        self.id
    }
}

// ========================================
// Materials, resources and steps
// ========================================

/// Document required to complete an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub activities: Vec<ActivityId>,
}

impl Identified for Material {
    type Key = MaterialId;

    fn key(&self) -> MaterialId {
        self.id
    }
}

/// Further reading for an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub activities: Vec<ActivityId>,
}

impl Identified for Resource {
    type Key = ResourceId;

    fn key(&self) -> ResourceId {
        self.id
    }
}

/// Instruction step of an activity
///
/// Only the identity and owning activities are interpreted; the rest of
/// the record is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    #[serde(default)]
    pub activity: Vec<ActivityId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Identified for Step {
    type Key = StepId;

    fn key(&self) -> StepId {
        self.id
    }
}

// ========================================
// Activities
// ========================================

/// Single lesson or exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display category (Offline, Online, Discussion, Extension); not interpreted
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub teaching_notes: String,
    #[serde(default)]
    pub video_url: String,
}

impl Activity {
    pub fn new(id: impl Into<ActivityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            tags: Vec::new(),
            materials: Vec::new(),
            resources: Vec::new(),
            steps: Vec::new(),
            teaching_notes: String::new(),
            video_url: String::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn has_tag(&self, id: TagId) -> bool {
        contains_by_id(&self.tags, id)
    }
}

impl Identified for Activity {
    type Key = ActivityId;

    fn key(&self) -> ActivityId {
        self.id
    }
}

// ========================================
// Curricula
// ========================================

/// Ordered position of an activity within a curriculum (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumActivityRelation {
    #[serde(rename = "activityID")]
    pub activity_id: ActivityId,
    pub number: u32,
}

/// School grade, K through twelfth
///
/// The API writes kindergarten as `"K"` and every other grade as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(u8);

impl Grade {
    pub const KINDERGARTEN: Grade = Grade(0);
    pub const MAX: u8 = 12;

    pub fn new(value: u8) -> crate::Result<Self> {
        if value > Self::MAX {
            return Err(Error::InvalidInput(format!(
                "Grade must be K or 1-{}, got {}",
                Self::MAX,
                value
            )));
        }
        Ok(Grade(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            f.write_str("K")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("k") {
            return Ok(Grade::KINDERGARTEN);
        }
        let value: u8 = trimmed
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid grade: {}", s)))?;
        Grade::new(value)
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 == 0 {
            serializer.serialize_str("K")
        } else {
            serializer.serialize_u8(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawGrade {
            Number(u8),
            Text(String),
        }

        match RawGrade::deserialize(deserializer)? {
            RawGrade::Number(n) => Grade::new(n).map_err(serde::de::Error::custom),
            RawGrade::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Ordered set of activities with a derived tag set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub id: CurriculumId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_grade: Option<Grade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_grade: Option<Grade>,
    /// Activities ordered by relation number
    #[serde(default, deserialize_with = "deserialize_activities")]
    pub activities: Vec<Activity>,
    /// Tags inherited from `activities`; recomputed, never edited directly
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Curriculum {
    pub fn new(id: impl Into<CurriculumId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tagline: String::new(),
            lower_grade: None,
            upper_grade: None,
            activities: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities = activities;
        self
    }

    pub fn contains_activity(&self, id: ActivityId) -> bool {
        contains_by_id(&self.activities, id)
    }

    pub fn activity_mut(&mut self, id: ActivityId) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.id == id)
    }

    /// Relation list numbering the current activities 1..=N in order
    pub fn activity_relations(&self) -> Vec<CurriculumActivityRelation> {
        self.activities
            .iter()
            .zip(1u32..)
            .map(|(activity, number)| CurriculumActivityRelation {
                activity_id: activity.id,
                number,
            })
            .collect()
    }
}

impl Identified for Curriculum {
    type Key = CurriculumId;

    fn key(&self) -> CurriculumId {
        self.id
    }
}

/// Accept either a flat activity list or relationship records
/// (`{ activity: {...}, number }`); records are ordered by `number`.
fn deserialize_activities<'de, D>(deserializer: D) -> Result<Vec<Activity>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ActivityEntry {
        Related { activity: Activity, number: u32 },
        Flat(Activity),
    }

    let entries = Vec::<ActivityEntry>::deserialize(deserializer)?;
    let mut numbered: Vec<(Option<u32>, Activity)> = entries
        .into_iter()
        .map(|entry| match entry {
            ActivityEntry::Related { activity, number } => (Some(number), activity),
            ActivityEntry::Flat(activity) => (None, activity),
        })
        .collect();

    if numbered.iter().all(|(number, _)| number.is_some()) {
        numbered.sort_by_key(|(number, _)| *number);
    }

    Ok(numbered.into_iter().map(|(_, activity)| activity).collect())
}
