use crate::error::{Error, Result};
use crate::similarity::SimilarityMatrix;
use crate::story::Story;

/// An ordered story collection with its derived similarity matrix.
///
/// The matrix is indexed by collection position, not story id; id lookup is
/// an explicit found/not-found operation. A collection is immutable after
/// construction — a rebuild produces a whole new collection.
#[derive(Debug, Clone)]
pub struct StoryCollection {
    stories: Vec<Story>,
    matrix: SimilarityMatrix,
    encoder_model: Option<String>,
}

impl StoryCollection {
    /// Build a collection from fully embedded stories.
    ///
    /// Every story must carry an embedding of one shared dimension; the
    /// similarity matrix is computed here, once.
    pub fn from_stories(stories: Vec<Story>) -> Result<Self> {
        let mut vectors = Vec::with_capacity(stories.len());
        for story in &stories {
            match &story.embedding {
                Some(v) => vectors.push(v.clone()),
                None => return Err(Error::MissingEmbedding(story.id)),
            }
        }

        let matrix = SimilarityMatrix::build(&vectors)?;

        Ok(Self {
            stories,
            matrix,
            encoder_model: None,
        })
    }

    /// Record the encoder model the embeddings came from. Mixing encoder
    /// versions within one collection is a caller error; the recorded id
    /// makes it detectable.
    #[must_use]
    pub fn with_encoder_model(mut self, model: impl Into<String>) -> Self {
        self.encoder_model = Some(model.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    #[inline]
    #[must_use]
    pub fn encoder_model(&self) -> Option<&str> {
        self.encoder_model.as_deref()
    }

    /// Embedding dimension shared by all stories, `None` when empty.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.stories
            .first()
            .and_then(|s| s.embedding.as_ref())
            .map(|v| v.dim())
    }

    /// Resolve a story id to its collection position (first match).
    #[must_use]
    pub fn position_of(&self, story_id: u64) -> Option<usize> {
        self.stories.iter().position(|s| s.id == story_id)
    }

    #[must_use]
    pub fn get(&self, story_id: u64) -> Option<&Story> {
        self.position_of(story_id).map(|pos| &self.stories[pos])
    }

    #[inline]
    #[must_use]
    pub fn story_at(&self, position: usize) -> &Story {
        &self.stories[position]
    }
}
