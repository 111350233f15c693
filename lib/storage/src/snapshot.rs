// Snapshot support for the story collection
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use storyrec_core::{Story, StoryCollection};

use crate::dataset::StoryData;

/// Snapshot description for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDescription {
    pub name: String,
    pub creation_time: Option<String>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Collection snapshot payload - every story field plus encoder provenance.
/// The similarity matrix is derived state and is rebuilt on load.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionSnapshotData {
    pub encoder_model: Option<String>,
    pub stories: Vec<StoryData>,
    pub created_at: u64,
}

pub struct SnapshotStore {
    snapshot_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(snapshot_dir: P) -> Result<Self> {
        let snapshot_dir = snapshot_dir.as_ref().to_path_buf();
        fs::create_dir_all(&snapshot_dir)?;
        Ok(Self { snapshot_dir })
    }

    /// Generate snapshot filename with timestamp
    fn generate_snapshot_name() -> String {
        let now: DateTime<Utc> = Utc::now();
        format!("stories-{}.snapshot", now.format("%Y-%m-%d-%H-%M-%S"))
    }

    fn describe(&self, path: &Path) -> Result<SnapshotDescription> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("snapshot path has no file name"))?
            .to_string();

        let file_data = fs::read(path)?;
        let checksum = format!("{:x}", Sha256::digest(&file_data));

        let metadata = fs::metadata(path)?;
        let creation_time = metadata
            .created()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .and_then(|d| {
                DateTime::from_timestamp(d.as_secs() as i64, 0)
                    .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            });

        Ok(SnapshotDescription {
            name,
            creation_time,
            size: metadata.len(),
            checksum: Some(checksum),
        })
    }

    /// Create a snapshot of the collection
    pub fn create(&self, collection: &StoryCollection) -> Result<SnapshotDescription> {
        let data = CollectionSnapshotData {
            encoder_model: collection.encoder_model().map(str::to_string),
            stories: collection.stories().iter().map(StoryData::from).collect(),
            created_at: Utc::now().timestamp() as u64,
        };

        let snapshot_name = Self::generate_snapshot_name();
        let snapshot_path = self.snapshot_dir.join(&snapshot_name);

        // Serialize to JSON and compress with gzip
        let json_data = serde_json::to_vec(&data)?;

        let file = File::create(&snapshot_path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        encoder.write_all(&json_data)?;
        encoder.finish()?;

        self.describe(&snapshot_path)
    }

    /// List all snapshots, newest first
    pub fn list(&self) -> Result<Vec<SnapshotDescription>> {
        if !self.snapshot_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.snapshot_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("snapshot") {
                snapshots.push(self.describe(&path)?);
            }
        }

        // Sort by name (which includes timestamp)
        snapshots.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(snapshots)
    }

    /// Load a snapshot and rebuild the collection (matrix included)
    pub fn load(&self, snapshot_name: &str) -> Result<StoryCollection> {
        let snapshot_path = self.snapshot_dir.join(snapshot_name);

        if !snapshot_path.exists() {
            return Err(anyhow!("Snapshot '{}' not found", snapshot_name));
        }

        let file = File::open(&snapshot_path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut json_data = Vec::new();
        decoder.read_to_end(&mut json_data)?;

        let data: CollectionSnapshotData = serde_json::from_slice(&json_data)?;
        let stories: Vec<Story> = data.stories.into_iter().map(Story::from).collect();

        let mut collection = StoryCollection::from_stories(stories)?;
        if let Some(model) = data.encoder_model {
            collection = collection.with_encoder_model(model);
        }
        Ok(collection)
    }

    /// Load the most recent snapshot, if any exists
    pub fn load_latest(&self) -> Result<Option<StoryCollection>> {
        match self.list()?.first() {
            Some(desc) => Ok(Some(self.load(&desc.name)?)),
            None => Ok(None),
        }
    }

    /// Delete a snapshot
    pub fn delete(&self, snapshot_name: &str) -> Result<bool> {
        let snapshot_path = self.snapshot_dir.join(snapshot_name);

        if snapshot_path.exists() {
            fs::remove_file(&snapshot_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
