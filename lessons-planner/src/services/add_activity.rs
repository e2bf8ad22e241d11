//! Activity-to-curriculum relationship reconciler
//!
//! Adding an activity rewrites the curriculum's whole relation list: the
//! current activities are renumbered 1..N in order and the new one is
//! appended as N+1. The server's response is authoritative; its activity
//! list replaces the local one and the curriculum's tags are re-derived
//! from it. Nothing is changed locally before the response arrives, so a
//! failed request leaves the curriculum as the last successful response
//! left it.
//!
//! Concurrent adds against the same curriculum are not serialized. Two
//! plans taken from the same snapshot both number their activity N+1; the
//! second request then carries a stale relation list.

use std::sync::Arc;

use lessons_common::api::ActivityRelsUpdate;
use lessons_common::inheritance::refresh_curriculum_tags;
use lessons_common::models::{Activity, Curriculum, CurriculumActivityRelation};
use tracing::{debug, info, warn};

use crate::api::LessonsApi;
use crate::error::{ClientError, ClientResult};

/// Result of [`AddActivityService::add_activity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddActivityOutcome {
    /// Activity was already on the curriculum; no request was made
    AlreadyPresent,
    /// Server accepted the relation list; `number` is the position requested
    Added { number: u32 },
}

/// Adds activities to curricula through the lessons API
pub struct AddActivityService<A: ?Sized> {
    api: Arc<A>,
}

impl<A: LessonsApi + ?Sized> AddActivityService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Relation list adding `new_activity` at the end, or `None` if the
    /// curriculum already contains it
    ///
    /// This is the synchronous optimistic step: the returned list is the
    /// order the caller expects, computed before any request is made, while
    /// the curriculum itself only changes once [`Self::apply_response`]
    /// folds in the server's answer.
    pub fn plan(curriculum: &Curriculum, new_activity: &Activity) -> Option<ActivityRelsUpdate> {
        if curriculum.contains_activity(new_activity.id) {
            return None;
        }

        let mut activity_rels = curriculum.activity_relations();
        let number = activity_rels.len() as u32 + 1;
        activity_rels.push(CurriculumActivityRelation {
            activity_id: new_activity.id,
            number,
        });

        Some(ActivityRelsUpdate { activity_rels })
    }

    /// Fold a server curriculum representation into local state
    ///
    /// Replaces `activities` with the server's list, then re-derives tags.
    pub fn apply_response(curriculum: &mut Curriculum, response: Curriculum) -> ClientResult<()> {
        if response.id != curriculum.id {
            return Err(ClientError::UnexpectedResponse(format!(
                "expected curriculum {}, server returned {}",
                curriculum.id, response.id
            )));
        }

        curriculum.activities = response.activities;
        refresh_curriculum_tags(curriculum);
        Ok(())
    }

    /// Submit a planned relation list and reconcile the response
    pub async fn submit(
        &self,
        curriculum: &mut Curriculum,
        update: &ActivityRelsUpdate,
    ) -> ClientResult<()> {
        debug!(
            curriculum_id = %curriculum.id,
            relations = update.activity_rels.len(),
            "Submitting curriculum activity relations"
        );

        let response = match self
            .api
            .update_curriculum_activities(curriculum.id, update)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    curriculum_id = %curriculum.id,
                    error = %e,
                    "Activity relation update failed"
                );
                return Err(e);
            }
        };

        Self::apply_response(curriculum, response)
    }

    /// Add `new_activity` to the end of `curriculum`
    ///
    /// Re-adding an activity that is already present is a no-op.
    pub async fn add_activity(
        &self,
        curriculum: &mut Curriculum,
        new_activity: &Activity,
    ) -> ClientResult<AddActivityOutcome> {
        let Some(update) = Self::plan(curriculum, new_activity) else {
            debug!(
                curriculum_id = %curriculum.id,
                activity_id = %new_activity.id,
                "Activity already on curriculum"
            );
            return Ok(AddActivityOutcome::AlreadyPresent);
        };
        let number = update.last_number().unwrap_or(1);

        self.submit(curriculum, &update).await?;

        info!(
            curriculum_id = %curriculum.id,
            activity_id = %new_activity.id,
            number,
            tag_count = curriculum.tags.len(),
            "Added activity to curriculum"
        );
        Ok(AddActivityOutcome::Added { number })
    }
}
