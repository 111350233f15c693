// Integration tests for storyrec
use storyrec::engine::StoryEngine;
use storyrec::media;
use storyrec_core::{
    embed_stories, normalize, recommend, Embedder, Error, RawRecord, Result, Story, Vector,
};
use storyrec_storage::{dataset, SnapshotStore};

/// Deterministic stand-in for the encoder collaborator. Tokens are hashed
/// into a small fixed-dimension vector so related texts land close together.
struct HashEmbedder;

impl Embedder for HashEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut data = vec![0.0f32; 16];
                for token in text.to_lowercase().split_whitespace() {
                    let mut h: u32 = 2166136261;
                    for b in token.bytes() {
                        h = (h ^ b as u32).wrapping_mul(16777619);
                    }
                    data[(h % 16) as usize] += 1.0;
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

fn cabin_beach_records() -> Vec<RawRecord> {
    vec![
        RawRecord::new(
            Some("title: Cabin"),
            Some("A dark cabin in snowy woods, wolves howling, cabin fear"),
        ),
        RawRecord::new(Some(""), Some("A bright beach day, sun and waves and sand")),
    ]
}

#[test]
fn test_normalization_scenario() {
    let stories = normalize::normalize(&cabin_beach_records());

    let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(stories[0].title, "Cabin");
    assert_eq!(stories[1].title, "Story 2");

    // "cabin" appears three times in the body and must rank first
    assert_eq!(stories[0].tags[0], "cabin");
    assert!(stories[0].tags.len() <= 5);
    assert!(stories.iter().all(|s| s.embedding.is_none()));
}

#[test]
fn test_two_story_recommendation_returns_the_other() {
    let engine = StoryEngine::build(&cabin_beach_records(), Box::new(HashEmbedder)).unwrap();
    let recs = engine.recommend_by_id(1, 1).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, 2);
}

#[test]
fn test_empty_dataset_scenario() {
    let engine = StoryEngine::build(&[], Box::new(HashEmbedder)).unwrap();
    assert!(engine.collection().is_empty());

    let err = engine.recommend_by_id(1, 3).unwrap_err();
    assert!(matches!(err, Error::EmptyCollection));

    let err = engine.recommend_by_query("anything", 3).unwrap_err();
    assert!(matches!(err, Error::EmptyCollection));
}

#[test]
fn test_unknown_id_fails_with_not_found() {
    let engine = StoryEngine::build(&cabin_beach_records(), Box::new(HashEmbedder)).unwrap();
    let err = engine.recommend_by_id(99, 3).unwrap_err();
    assert!(matches!(err, Error::StoryNotFound(99)));
}

#[test]
fn test_matrix_diagonal_is_unit() {
    let engine = StoryEngine::build(&cabin_beach_records(), Box::new(HashEmbedder)).unwrap();
    let collection = engine.collection();
    let matrix = collection.matrix();

    assert_eq!(matrix.len(), collection.len());
    for i in 0..matrix.len() {
        assert!((1.0 - matrix.get(i, i)).abs() < 1e-5);
    }
}

#[test]
fn test_results_are_ordered_and_bounded() {
    let bodies: Vec<String> = (0..8)
        .map(|i| format!("story number {} about topic {}", i, i % 3))
        .collect();
    let records: Vec<RawRecord> = bodies
        .iter()
        .map(|body| RawRecord::new(None, Some(body.as_str())))
        .collect();
    let engine = StoryEngine::build(&records, Box::new(HashEmbedder)).unwrap();

    let recs = engine.recommend_by_id(1, 4).unwrap();
    assert!(recs.len() <= 4);
    assert!(recs.iter().all(|r| r.id != 1));
    for pair in recs.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_pipeline_files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("dataset.json");
    std::fs::write(
        &dataset_path,
        r#"[
            {"input": "title: Cabin", "output": "A dark cabin in snowy woods, wolves howling, cabin fear"},
            {"input": "", "output": "A bright beach day, sun and waves and sand"}
        ]"#,
    )
    .unwrap();

    let records = dataset::load_raw_dataset(&dataset_path).unwrap();
    let stories = normalize::normalize(&records);

    let normalized_path = dir.path().join("stories.json");
    dataset::write_stories(&normalized_path, &stories).unwrap();

    let stories = embed_stories(stories, &HashEmbedder).unwrap();
    let enriched_path = dir.path().join("stories_enriched.json");
    dataset::write_stories(&enriched_path, &stories).unwrap();

    let restored = dataset::read_stories(&enriched_path).unwrap();
    assert_eq!(restored, stories);

    // The enriched file can seed a serving engine directly
    let engine = StoryEngine::from_stories(restored, Box::new(HashEmbedder)).unwrap();
    assert_eq!(engine.collection().len(), 2);
}

#[test]
fn test_snapshot_round_trip_preserves_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("snapshots")).unwrap();

    let engine = StoryEngine::build(&cabin_beach_records(), Box::new(HashEmbedder)).unwrap();
    let original = engine.collection();
    store.create(&original).unwrap();

    let restored = store.load_latest().unwrap().unwrap();
    assert_eq!(restored.stories(), original.stories());
    assert_eq!(restored.encoder_model(), Some("hash-test-model"));

    // Serving against the restored collection behaves identically
    let recs = recommend::recommend_by_id(&restored, 1, 1).unwrap();
    assert_eq!(recs[0].id, 2);
}

#[test]
fn test_free_text_query_and_tag_union() {
    let engine = StoryEngine::build(&cabin_beach_records(), Box::new(HashEmbedder)).unwrap();

    let recs = engine
        .recommend_by_query("A bright beach day, sun and waves and sand", 2)
        .unwrap();
    assert_eq!(recs[0].id, 2);

    let union = recommend::tag_union(&recs);
    assert!(union.contains(&"beach".to_string()));
    let unique: std::collections::HashSet<&String> = union.iter().collect();
    assert_eq!(unique.len(), union.len());
}

#[test]
fn test_media_listing_contract() {
    let dir = tempfile::tempdir().unwrap();
    let media_dir = dir.path().join("media");
    std::fs::create_dir_all(&media_dir).unwrap();
    std::fs::write(media_dir.join("story-1.mp3"), b"audio").unwrap();

    assert_eq!(media::list_media(&media_dir).unwrap(), vec!["story-1.mp3"]);
    assert!(media::list_media(dir.path().join("missing")).unwrap().is_empty());
}

#[test]
fn test_stories_survive_disk_precision() {
    let stories = vec![Story::new(1, "Story 1".into(), String::new(), "x".into(), vec![])
        .with_embedding(Vector::new(vec![0.1234567f32, -0.000001f32, 1.0e-30f32]))];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stories.json");
    dataset::write_stories(&path, &stories).unwrap();
    let restored = dataset::read_stories(&path).unwrap();

    // serde_json emits the shortest representation that round-trips f32
    assert_eq!(restored, stories);
}
