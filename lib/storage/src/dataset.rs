//! Flat dataset files.
//!
//! The raw dataset is a JSON array of loosely structured records; the
//! normalized and enriched story files share one schema in which an
//! embedding is either `null` or a plain number array. The in-memory
//! [`Vector`] type never appears on disk — conversion happens here.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use serde::{Deserialize, Serialize};
use storyrec_core::{RawRecord, Story, Vector};

/// On-disk form of one story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryData {
    pub id: u64,
    pub title: String,
    pub input: String,
    pub output: String,
    pub tags: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

impl From<&Story> for StoryData {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id,
            title: story.title.clone(),
            input: story.input.clone(),
            output: story.output.clone(),
            tags: story.tags.clone(),
            embedding: story.embedding.as_ref().map(|v| v.as_slice().to_vec()),
        }
    }
}

impl From<StoryData> for Story {
    fn from(data: StoryData) -> Self {
        Story {
            id: data.id,
            title: data.title,
            input: data.input,
            output: data.output,
            tags: data.tags,
            embedding: data.embedding.map(Vector::new),
        }
    }
}

/// Load the raw dataset: a JSON array of records with optional `input` and
/// `output` fields. Absent fields deserialize to `None`.
pub fn load_raw_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let records: Vec<RawRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed dataset {}", path.display()))?;
    Ok(records)
}

/// Write a story file (normalized or enriched) atomically as pretty JSON.
pub fn write_stories<P: AsRef<Path>>(path: P, stories: &[Story]) -> Result<()> {
    let path = path.as_ref();
    let data: Vec<StoryData> = stories.iter().map(StoryData::from).collect();
    let json = serde_json::to_vec_pretty(&data)?;

    AtomicFile::new(path, AllowOverwrite)
        .write(|f| std::io::Write::write_all(f, &json))
        .with_context(|| format!("failed to write stories to {}", path.display()))?;
    Ok(())
}

/// Read a story file written by [`write_stories`].
pub fn read_stories<P: AsRef<Path>>(path: P) -> Result<Vec<Story>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open stories {}", path.display()))?;
    let data: Vec<StoryData> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed stories file {}", path.display()))?;
    Ok(data.into_iter().map(Story::from).collect())
}
