//! # storyrec
//!
//! A content-based recommendation engine for short text stories.
//!
//! storyrec normalizes a raw story dataset into a canonical schema, derives
//! keyword tags from word frequencies, embeds each story through an external
//! pretrained sentence encoder, and retrieves the most similar stories to a
//! query over a dense cosine-similarity matrix. Snapshots persist the
//! enriched collection so the encoder pass runs once per dataset version.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! storyrec build dataset.json
//! storyrec recommend --story-id 1 --top-k 3
//! storyrec recommend --query "a storm at sea"
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use storyrec::prelude::*;
//!
//! let records = vec![
//!     RawRecord::new(Some("title: Cabin"), Some("A dark cabin in snowy woods")),
//!     RawRecord::new(None, Some("A bright beach day, sun and waves")),
//! ];
//!
//! // The encoder is an external collaborator; any Embedder works here.
//! let encoder = EncoderClient::new("http://localhost:8080/v1", "all-MiniLM-L6-v2", None).unwrap();
//! let engine = StoryEngine::build(&records, Box::new(encoder)).unwrap();
//!
//! let recs = engine.recommend_by_id(1, 3).unwrap();
//! for rec in recs {
//!     println!("{} ({:?})", rec.title, rec.tags);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! storyrec is composed of several crates:
//!
//! - `storyrec-core` - Data model, tagger, normalizer, similarity matrix, retrieval
//! - `storyrec-storage` - Dataset files and collection snapshots
//! - `storyrec-collab` - Encoder, generator, and narrator HTTP clients

pub mod engine;
pub mod media;

// Re-export core types
pub use storyrec_core::{
    embed_stories, extract_keywords, recommend_by_id, recommend_by_vector, tag_union, Embedder,
    Error, RawRecord, Recommendation, Result, SimilarityMatrix, Story, StoryCollection, Vector,
};

// Re-export storage
pub use storyrec_storage::{load_raw_dataset, read_stories, write_stories, SnapshotStore};

// Re-export collaborator clients
pub use storyrec_collab::{EncoderClient, GeneratorClient, NarratorClient};

pub use engine::StoryEngine;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::StoryEngine;
    pub use crate::media::list_media;
    pub use storyrec_collab::{EncoderClient, GeneratorClient, NarratorClient};
    pub use storyrec_core::{
        Embedder, Error, RawRecord, Recommendation, Result, SimilarityMatrix, Story,
        StoryCollection, Vector,
    };
    pub use storyrec_storage::SnapshotStore;
}
