//! Raw dataset normalization.
//!
//! Raw records are loosely structured; this is the one boundary where the
//! optional-field schema is resolved into the canonical [`Story`] shape.
//! Normalization never rejects a record: missing fields degrade to defaults.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::story::Story;
use crate::tagger;

/// Number of tags derived per story.
pub const TAGS_PER_STORY: usize = 5;

/// A `title:` label followed by text to end of line.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)title:\s*(.+)").expect("valid title regex"));

/// One record of the raw dataset.
///
/// Both fields are optional in the source; an absent field is distinct from
/// an empty string, though normalization maps both to `""`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl RawRecord {
    #[must_use]
    pub fn new(input: Option<&str>, output: Option<&str>) -> Self {
        Self {
            input: input.map(str::to_string),
            output: output.map(str::to_string),
        }
    }
}

/// Extract an explicit title from prompt text, if one is labeled.
fn extract_title(input: &str) -> Option<String> {
    TITLE_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Normalize raw records into stories with 1-based sequential ids.
///
/// Titles come from a case-insensitive `title:` label in the prompt text,
/// falling back to the synthetic `"Story {id}"` placeholder. Tags are
/// derived from the story body; embeddings are left unset.
pub fn normalize(records: &[RawRecord]) -> Vec<Story> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let id = idx as u64 + 1;
            let input = record.input.clone().unwrap_or_default();
            let output = record.output.clone().unwrap_or_default();

            let title = extract_title(&input).unwrap_or_else(|| Story::synthetic_title(id));
            let tags = tagger::extract_keywords(&output, TAGS_PER_STORY);

            Story::new(id, title, input, output, tags)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigns_sequential_ids() {
        let records = vec![RawRecord::default(), RawRecord::default(), RawRecord::default()];
        let stories = normalize(&records);
        let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_extracts_labeled_title() {
        let records = vec![RawRecord::new(Some("Write a story.\ntitle: The Cabin\nmake it short"), None)];
        let stories = normalize(&records);
        assert_eq!(stories[0].title, "The Cabin");
    }

    #[test]
    fn test_title_label_is_case_insensitive() {
        let records = vec![RawRecord::new(Some("TITLE:  Snowbound  "), None)];
        let stories = normalize(&records);
        assert_eq!(stories[0].title, "Snowbound");
    }

    #[test]
    fn test_synthetic_title_when_label_absent() {
        let records = vec![RawRecord::default(), RawRecord::new(Some("no label here"), None)];
        let stories = normalize(&records);
        assert_eq!(stories[0].title, "Story 1");
        assert_eq!(stories[1].title, "Story 2");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let stories = normalize(&[RawRecord::default()]);
        assert_eq!(stories[0].input, "");
        assert_eq!(stories[0].output, "");
        assert!(stories[0].tags.is_empty());
        assert!(stories[0].embedding.is_none());
    }

    #[test]
    fn test_tags_come_from_output() {
        let records = vec![RawRecord::new(
            Some("cabin cabin cabin"),
            Some("beach waves beach sun"),
        )];
        let stories = normalize(&records);
        assert_eq!(stories[0].tags[0], "beach");
        assert!(!stories[0].tags.contains(&"cabin".to_string()));
    }

    #[test]
    fn test_absent_field_deserializes_to_none() {
        let record: RawRecord = serde_json::from_str(r#"{"output": ""}"#).unwrap();
        assert_eq!(record.input, None);
        assert_eq!(record.output, Some(String::new()));
    }
}
