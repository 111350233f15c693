//! Embedding stage.
//!
//! The encoder itself is an external pretrained model behind the [`Embedder`]
//! trait; this module owns only order preservation and dimension enforcement.

use crate::error::{Error, Result};
use crate::story::Story;
use crate::vector::Vector;

/// A sentence encoder collaborator.
///
/// Contract: given N strings in order, returns N fixed-dimension vectors in
/// the same order. Deterministic for a fixed model version only; callers
/// must not assume bit-exact reproducibility across encoder upgrades.
pub trait Embedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>>;

    /// Named model identifier, e.g. `all-MiniLM-L6-v2`.
    fn model(&self) -> &str;

    fn embed(&self, text: &str) -> Result<Vector> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| Error::collaborator("encoder", "returned no vector for single input"))
    }
}

/// Attach embeddings to a collection of stories, in order.
///
/// All vectors must share one dimension; a mismatch rejects the whole batch
/// so a bad vector can never silently corrupt the similarity matrix. On any
/// failure the input stories are returned untouched conceptually: the error
/// carries no partially embedded state.
pub fn embed_stories<E: Embedder + ?Sized>(mut stories: Vec<Story>, embedder: &E) -> Result<Vec<Story>> {
    if stories.is_empty() {
        return Ok(stories);
    }

    let texts: Vec<&str> = stories.iter().map(|s| s.output.as_str()).collect();
    let vectors = embedder.embed_batch(&texts)?;

    if vectors.len() != stories.len() {
        return Err(Error::collaborator(
            "encoder",
            format!("returned {} vectors for {} inputs", vectors.len(), stories.len()),
        ));
    }

    let expected = vectors[0].dim();
    for vector in &vectors {
        if vector.dim() != expected {
            return Err(Error::InvalidDimension {
                expected,
                actual: vector.dim(),
            });
        }
    }

    for (story, vector) in stories.iter_mut().zip(vectors) {
        story.embedding = Some(vector);
    }

    Ok(stories)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEmbedder {
        vectors: Vec<Vec<f32>>,
    }

    impl Embedder for FixedEmbedder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
            assert_eq!(texts.len(), self.vectors.len());
            Ok(self.vectors.iter().cloned().map(Vector::new).collect())
        }

        fn model(&self) -> &str {
            "fixed-test-model"
        }
    }

    fn stories(n: usize) -> Vec<Story> {
        (1..=n as u64)
            .map(|id| Story::new(id, Story::synthetic_title(id), String::new(), format!("body {}", id), vec![]))
            .collect()
    }

    #[test]
    fn test_attaches_vectors_in_order() {
        let embedder = FixedEmbedder {
            vectors: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        };
        let embedded = embed_stories(stories(2), &embedder).unwrap();
        assert_eq!(embedded[0].embedding.as_ref().unwrap().as_slice(), &[1.0, 0.0]);
        assert_eq!(embedded[1].embedding.as_ref().unwrap().as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_rejects_mixed_dimensions() {
        let embedder = FixedEmbedder {
            vectors: vec![vec![1.0, 0.0], vec![0.0, 1.0, 0.5]],
        };
        let err = embed_stories(stories(2), &embedder).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_empty_collection_is_a_no_op() {
        let embedder = FixedEmbedder { vectors: vec![] };
        assert!(embed_stories(Vec::new(), &embedder).unwrap().is_empty());
    }
}
