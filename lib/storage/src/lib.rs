pub mod dataset;
pub mod snapshot;

pub use dataset::{load_raw_dataset, read_stories, write_stories, StoryData};
pub use snapshot::{CollectionSnapshotData, SnapshotDescription, SnapshotStore};
