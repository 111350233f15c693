//! Retrieval over a story collection.
//!
//! Two query modes share one ranking core: an existing story (read its
//! precomputed matrix row, exclude the story itself) or a free-text query
//! vector (per-query cosine against every stored embedding).

use std::cmp::Reverse;

use ahash::AHashSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::collection::StoryCollection;
use crate::error::{Error, Result};
use crate::vector::Vector;

/// One ranked retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: u64,
    pub title: String,
    pub tags: Vec<String>,
    pub output: String,
    pub score: f32,
}

impl Recommendation {
    fn from_position(collection: &StoryCollection, position: usize, score: f32) -> Self {
        let story = collection.story_at(position);
        Self {
            id: story.id,
            title: story.title.clone(),
            tags: story.tags.clone(),
            output: story.output.clone(),
            score,
        }
    }
}

/// Rank candidate positions by similarity, descending.
///
/// The sort is stable, so equal scores keep collection order.
fn rank(similarities: &[f32], exclude: Option<usize>, top_k: usize) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..similarities.len())
        .filter(|&pos| Some(pos) != exclude)
        .collect();
    positions.sort_by_key(|&pos| Reverse(OrderedFloat(similarities[pos])));
    positions.truncate(top_k);
    positions
}

fn validate(collection: &StoryCollection, top_k: usize) -> Result<()> {
    if top_k < 1 {
        return Err(Error::InvalidTopK(top_k));
    }
    if collection.is_empty() {
        return Err(Error::EmptyCollection);
    }
    Ok(())
}

/// Recommend the `top_k` stories most similar to an existing story.
///
/// The query story itself is excluded from the results. An id absent from
/// the collection fails with [`Error::StoryNotFound`].
pub fn recommend_by_id(
    collection: &StoryCollection,
    story_id: u64,
    top_k: usize,
) -> Result<Vec<Recommendation>> {
    validate(collection, top_k)?;

    let position = collection
        .position_of(story_id)
        .ok_or(Error::StoryNotFound(story_id))?;
    let similarities = collection.matrix().row(position);

    Ok(rank(similarities, Some(position), top_k)
        .into_iter()
        .map(|pos| Recommendation::from_position(collection, pos, similarities[pos]))
        .collect())
}

/// Recommend the `top_k` stories most similar to an already-encoded query.
///
/// The query must come from the same encoder the collection was built with;
/// a differing dimension is rejected. No self-exclusion applies.
pub fn recommend_by_vector(
    collection: &StoryCollection,
    query: &Vector,
    top_k: usize,
) -> Result<Vec<Recommendation>> {
    validate(collection, top_k)?;

    let expected = collection.dimension().expect("non-empty collection has a dimension");
    if query.dim() != expected {
        return Err(Error::InvalidDimension {
            expected,
            actual: query.dim(),
        });
    }

    let similarities: Vec<f32> = collection
        .stories()
        .iter()
        .map(|story| {
            story
                .embedding
                .as_ref()
                .expect("collection stories are embedded")
                .cosine_similarity(query)
        })
        .collect();

    Ok(rank(&similarities, None, top_k)
        .into_iter()
        .map(|pos| Recommendation::from_position(collection, pos, similarities[pos]))
        .collect())
}

/// Deduplicated union of the tags across a result set.
///
/// Feeds downstream prompt construction; order carries no meaning and is
/// not part of the ranking contract.
#[must_use]
pub fn tag_union(recommendations: &[Recommendation]) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut union = Vec::new();
    for rec in recommendations {
        for tag in &rec.tags {
            if seen.insert(tag.clone()) {
                union.push(tag.clone());
            }
        }
    }
    union
}
