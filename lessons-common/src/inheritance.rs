//! Curriculum tag inheritance
//!
//! A curriculum's tag set is derived from its activities: every Language or
//! Technology tag found on an activity is inherited, deduplicated by tag id,
//! in first-seen order (activities in curriculum order, tags in activity
//! order). Derivation always restarts from empty, so it can be re-run after
//! any change to `activities` without drifting.

use crate::models::{contains_by_id, Curriculum, Tag, TagCategory};

/// Whether a tag propagates from an activity to its curricula
///
/// Exact, case-sensitive match on "Language" or "Technology".
pub fn is_inheritable(tag: &Tag) -> bool {
    matches!(
        tag.category_kind(),
        Some(TagCategory::Language) | Some(TagCategory::Technology)
    )
}

/// Append `candidate` unless a tag with the same id is already present
pub fn merge_tags(existing: &[Tag], candidate: &Tag) -> Vec<Tag> {
    let mut merged = existing.to_vec();
    merge_tag_into(&mut merged, candidate);
    merged
}

/// In-place [`merge_tags`]; returns true if the tag was appended
pub fn merge_tag_into(tags: &mut Vec<Tag>, candidate: &Tag) -> bool {
    if contains_by_id(tags, candidate.id) {
        return false;
    }
    tags.push(candidate.clone());
    true
}

/// Compute the inherited tag set of a curriculum without modifying it
pub fn derive_curriculum_tags(curriculum: &Curriculum) -> Vec<Tag> {
    let mut derived = Vec::new();
    for activity in &curriculum.activities {
        for tag in activity.tags.iter().filter(|t| is_inheritable(t)) {
            merge_tag_into(&mut derived, tag);
        }
    }
    derived
}

/// Recompute and store `curriculum.tags`
pub fn refresh_curriculum_tags(curriculum: &mut Curriculum) {
    curriculum.tags = derive_curriculum_tags(curriculum);
    tracing::trace!(
        curriculum_id = %curriculum.id,
        tag_count = curriculum.tags.len(),
        "Derived curriculum tags"
    );
}

/// Recompute the tag set of every curriculum in place
pub fn derive_all_curricula_tags(curricula: &mut [Curriculum]) {
    for curriculum in curricula.iter_mut() {
        refresh_curriculum_tags(curriculum);
    }
}
