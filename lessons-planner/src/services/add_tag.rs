//! Tag-to-activity relationship reconciler
//!
//! The activity's full tag id list is resubmitted with the new tag first,
//! followed by the existing tags in their current order. The server's
//! returned tag list replaces the local one. Curricula holding the activity
//! are re-derived by the caller (see [`crate::CurriculumBoard::add_tag`]).

use std::sync::Arc;

use lessons_common::api::TagIdsUpdate;
use lessons_common::models::{Activity, Tag};
use tracing::{debug, info, warn};

use crate::api::LessonsApi;
use crate::error::{ClientError, ClientResult};

/// Result of [`AddTagService::add_tag`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTagOutcome {
    /// Activity already carried the tag; no request was made
    AlreadyPresent,
    /// Server accepted the new tag list
    Added,
}

/// Attaches tags to activities through the lessons API
pub struct AddTagService<A: ?Sized> {
    api: Arc<A>,
}

impl<A: LessonsApi + ?Sized> AddTagService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Tag id list with `tag` prepended, or `None` if already attached
    pub fn plan(activity: &Activity, tag: &Tag) -> Option<TagIdsUpdate> {
        if activity.has_tag(tag.id) {
            return None;
        }

        let tag_ids = std::iter::once(tag.id)
            .chain(activity.tags.iter().map(|t| t.id))
            .collect();
        Some(TagIdsUpdate { tag_ids })
    }

    /// Replace the activity's tags with the server's list
    pub fn apply_response(activity: &mut Activity, response: Activity) -> ClientResult<()> {
        if response.id != activity.id {
            return Err(ClientError::UnexpectedResponse(format!(
                "expected activity {}, server returned {}",
                activity.id, response.id
            )));
        }
        activity.tags = response.tags;
        Ok(())
    }

    pub async fn add_tag(&self, activity: &mut Activity, tag: &Tag) -> ClientResult<AddTagOutcome> {
        let Some(update) = Self::plan(activity, tag) else {
            debug!(activity_id = %activity.id, tag_id = %tag.id, "Tag already on activity");
            return Ok(AddTagOutcome::AlreadyPresent);
        };

        let response = match self.api.update_activity_tags(activity.id, &update).await {
            Ok(response) => response,
            Err(e) => {
                warn!(activity_id = %activity.id, error = %e, "Activity tag update failed");
                return Err(e);
            }
        };
        Self::apply_response(activity, response)?;

        info!(
            activity_id = %activity.id,
            tag = %tag.name,
            tag_count = activity.tags.len(),
            "Added tag to activity"
        );
        Ok(AddTagOutcome::Added)
    }
}
