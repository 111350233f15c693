//! # storyrec Core
//!
//! Core library for the storyrec recommendation engine.
//!
//! This crate provides the full normalization → tagging → embedding →
//! similarity → retrieval pipeline:
//!
//! - [`RawRecord`] / [`normalize()`](normalize::normalize) - canonical story schema from raw records
//! - [`tagger`] - frequency-based keyword extraction
//! - [`Embedder`] / [`embed_stories()`](embed::embed_stories) - encoder seam and embedding stage
//! - [`SimilarityMatrix`] - dense pairwise cosine similarity
//! - [`StoryCollection`] - ordered stories plus derived matrix
//! - [`recommend`] - by-id and by-vector top-K retrieval
//!
//! The sentence encoder itself is an external collaborator behind the
//! [`Embedder`] trait; this crate never fabricates vectors.
//!
//! ## Example
//!
//! ```rust
//! use storyrec_core::{normalize, recommend, RawRecord, StoryCollection, Vector};
//!
//! let records = vec![
//!     RawRecord::new(Some("title: Cabin"), Some("A dark cabin in snowy woods")),
//!     RawRecord::new(None, Some("A bright beach day, sun and waves")),
//! ];
//! let stories = normalize::normalize(&records);
//! assert_eq!(stories[0].title, "Cabin");
//!
//! // Embeddings normally come from the encoder collaborator.
//! let stories: Vec<_> = stories
//!     .into_iter()
//!     .zip([vec![1.0, 0.0], vec![0.0, 1.0]])
//!     .map(|(s, v)| s.with_embedding(Vector::new(v)))
//!     .collect();
//!
//! let collection = StoryCollection::from_stories(stories).unwrap();
//! let recs = recommend::recommend_by_id(&collection, 1, 1).unwrap();
//! assert_eq!(recs[0].id, 2);
//! ```

pub mod collection;
pub mod embed;
pub mod error;
pub mod normalize;
pub mod recommend;
pub mod similarity;
pub mod story;
pub mod tagger;
pub mod vector;

pub use collection::StoryCollection;
pub use embed::{embed_stories, Embedder};
pub use error::{Error, Result};
pub use normalize::{RawRecord, TAGS_PER_STORY};
pub use recommend::{recommend_by_id, recommend_by_vector, tag_union, Recommendation};
pub use similarity::SimilarityMatrix;
pub use story::Story;
pub use tagger::extract_keywords;
pub use vector::Vector;
