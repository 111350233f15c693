use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// A normalized story with derived tags and an optional embedding.
///
/// Ids are 1-based and assigned in dataset order by the normalizer. The
/// embedding starts out as `None` and is set exactly once by the embedding
/// stage; a story is immutable after that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Story {
    pub id: u64,
    pub title: String,
    /// Original prompt text, preserved verbatim.
    pub input: String,
    /// Story body; tags and embeddings are computed over this field.
    pub output: String,
    pub tags: Vec<String>,
    pub embedding: Option<Vector>,
}

impl Story {
    #[must_use]
    pub fn new(id: u64, title: String, input: String, output: String, tags: Vec<String>) -> Self {
        Self {
            id,
            title,
            input,
            output,
            tags,
            embedding: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    #[inline]
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    /// Placeholder title used when the source text carries no `title:` label.
    #[must_use]
    pub fn synthetic_title(id: u64) -> String {
        format!("Story {}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_serializes_as_null_until_set() {
        let story = Story::new(1, "Story 1".into(), String::new(), "body".into(), vec![]);
        let json = serde_json::to_value(&story).unwrap();
        assert_eq!(json["embedding"], serde_json::Value::Null);

        let story = story.with_embedding(Vector::new(vec![0.1, 0.2]));
        let json = serde_json::to_value(&story).unwrap();
        assert_eq!(json["embedding"], serde_json::json!([0.1f32, 0.2f32]));
    }

    #[test]
    fn test_synthetic_title() {
        assert_eq!(Story::synthetic_title(7), "Story 7");
    }
}
