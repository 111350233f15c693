//! Engine handle.
//!
//! Explicit initialization in place of process-wide state: the engine is
//! constructed once from a dataset (or a restored collection) plus an
//! encoder, and every pipeline stage works off the handle. Rebuilds
//! construct the new collection fully and then swap the shared reference;
//! requests already holding the old collection keep reading it.

use std::sync::Arc;

use parking_lot::RwLock;
use storyrec_core::{
    embed_stories, normalize, recommend, Embedder, RawRecord, Recommendation, Result, Story,
    StoryCollection,
};
use tracing::info;

pub struct StoryEngine {
    collection: RwLock<Arc<StoryCollection>>,
    embedder: Box<dyn Embedder + Send + Sync>,
}

impl StoryEngine {
    /// Run the full pipeline over a raw dataset and return a serving handle.
    pub fn build(records: &[RawRecord], embedder: Box<dyn Embedder + Send + Sync>) -> Result<Self> {
        let collection = Self::build_collection(records, embedder.as_ref())?;
        Ok(Self {
            collection: RwLock::new(Arc::new(collection)),
            embedder,
        })
    }

    /// Wrap an already-built collection (e.g. restored from a snapshot).
    pub fn new(collection: StoryCollection, embedder: Box<dyn Embedder + Send + Sync>) -> Self {
        Self {
            collection: RwLock::new(Arc::new(collection)),
            embedder,
        }
    }

    /// Restore from persisted enriched stories.
    pub fn from_stories(stories: Vec<Story>, embedder: Box<dyn Embedder + Send + Sync>) -> Result<Self> {
        let collection =
            StoryCollection::from_stories(stories)?.with_encoder_model(embedder.model());
        Ok(Self::new(collection, embedder))
    }

    fn build_collection(records: &[RawRecord], embedder: &dyn Embedder) -> Result<StoryCollection> {
        let stories = normalize::normalize(records);
        info!(stories = stories.len(), "normalized dataset");

        let stories = embed_stories(stories, embedder)?;
        info!(model = embedder.model(), "embeddings computed");

        Ok(StoryCollection::from_stories(stories)?.with_encoder_model(embedder.model()))
    }

    /// Current collection snapshot. The Arc stays valid for the caller even
    /// if a rebuild swaps the engine's reference afterwards.
    #[must_use]
    pub fn collection(&self) -> Arc<StoryCollection> {
        self.collection.read().clone()
    }

    /// Re-run the pipeline and atomically swap in the result.
    pub fn rebuild(&self, records: &[RawRecord]) -> Result<()> {
        let fresh = Self::build_collection(records, self.embedder.as_ref())?;
        *self.collection.write() = Arc::new(fresh);
        info!("collection rebuilt and swapped");
        Ok(())
    }

    pub fn recommend_by_id(&self, story_id: u64, top_k: usize) -> Result<Vec<Recommendation>> {
        recommend::recommend_by_id(&self.collection(), story_id, top_k)
    }

    /// Encode a free-text query with the engine's encoder and rank against
    /// the stored embeddings.
    pub fn recommend_by_query(&self, query: &str, top_k: usize) -> Result<Vec<Recommendation>> {
        let query_vector = self.embedder.embed(query)?;
        recommend::recommend_by_vector(&self.collection(), &query_vector, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyrec_core::{Error, Vector};

    /// Deterministic stand-in for the encoder collaborator: hashes tokens
    /// into a small fixed-dimension vector.
    struct HashEmbedder;

    impl Embedder for HashEmbedder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
            Ok(texts
                .iter()
                .map(|text| {
                    let mut data = vec![0.0f32; 8];
                    for token in text.split_whitespace() {
                        let mut h: u32 = 2166136261;
                        for b in token.bytes() {
                            h = (h ^ b as u32).wrapping_mul(16777619);
                        }
                        data[(h % 8) as usize] += 1.0;
                    }
                    let mut v = Vector::new(data);
                    v.normalize();
                    v
                })
                .collect())
        }

        fn model(&self) -> &str {
            "hash-test-model"
        }
    }

    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord::new(
                Some("title: Cabin"),
                Some("A dark cabin in snowy woods, wolves howling, cabin fear"),
            ),
            RawRecord::new(Some(""), Some("A bright beach day, sun and waves and sand")),
        ]
    }

    #[test]
    fn test_build_runs_full_pipeline() {
        let engine = StoryEngine::build(&records(), Box::new(HashEmbedder)).unwrap();
        let collection = engine.collection();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.stories()[0].title, "Cabin");
        assert_eq!(collection.encoder_model(), Some("hash-test-model"));
        assert!(collection.stories().iter().all(Story::has_embedding));
    }

    #[test]
    fn test_recommend_by_id_excludes_self() {
        let engine = StoryEngine::build(&records(), Box::new(HashEmbedder)).unwrap();
        let recs = engine.recommend_by_id(1, 1).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, 2);
    }

    #[test]
    fn test_recommend_by_query_uses_engine_encoder() {
        let engine = StoryEngine::build(&records(), Box::new(HashEmbedder)).unwrap();
        let recs = engine
            .recommend_by_query("A bright beach day, sun and waves and sand", 1)
            .unwrap();
        assert_eq!(recs[0].id, 2);
    }

    #[test]
    fn test_empty_dataset_fails_recommend_explicitly() {
        let engine = StoryEngine::build(&[], Box::new(HashEmbedder)).unwrap();
        let err = engine.recommend_by_id(1, 3).unwrap_err();
        assert!(matches!(err, Error::EmptyCollection));
    }

    #[test]
    fn test_rebuild_does_not_disturb_held_snapshot() {
        let engine = StoryEngine::build(&records(), Box::new(HashEmbedder)).unwrap();
        let held = engine.collection();

        let mut more = records();
        more.push(RawRecord::new(None, Some("A third story about trains")));
        engine.rebuild(&more).unwrap();

        assert_eq!(held.len(), 2);
        assert_eq!(engine.collection().len(), 3);
    }
}
