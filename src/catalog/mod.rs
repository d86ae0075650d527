//! The static topic catalog.
//!
//! Loaded once at startup, either from the JSON files embedded in the binary
//! or from a user-supplied file or directory, then shared read-only.

mod lint;
mod types;

pub use lint::CatalogWarning;
pub use types::{ContentSection, Dimension, McqOption, McqQuestion, Subtopic, Topic};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog file too large: {} ({size} bytes, max {max} bytes)", path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },
}

/// A catalog file holds either a single topic or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum TopicFile {
    Many(Vec<Topic>),
    One(Box<Topic>),
}

const BUILTIN: [(&str, &str); 4] = [
    (
        "introduction.json",
        include_str!("../../catalog/introduction.json"),
    ),
    (
        "process-management.json",
        include_str!("../../catalog/process-management.json"),
    ),
    ("memory.json", include_str!("../../catalog/memory.json")),
    (
        "file-systems.json",
        include_str!("../../catalog/file-systems.json"),
    ),
];

// ============================================================================
// Catalog
// ============================================================================

/// Ordered, immutable collection of topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    topics: Vec<Topic>,
}

impl Catalog {
    /// Maximum size of a single catalog file (4 MB).
    const MAX_FILE_SIZE: u64 = 4 * 1_048_576;

    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut topics = Vec::new();
        for (origin, json) in BUILTIN {
            topics.extend(parse_topics(origin, json)?);
        }
        Ok(Self { topics })
    }

    /// Load a catalog from a JSON file, or from every `*.json` file in a
    /// directory (non-recursive, in file-name order).
    ///
    /// Text is stripped of terminal control sequences since it is rendered
    /// straight into the terminal.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let io_err = |source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };

        let files = if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)
                .map_err(io_err)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            files.sort();
            files
        } else {
            vec![path.to_path_buf()]
        };

        let mut topics = Vec::new();
        for file in &files {
            topics.extend(Self::load_file(file)?);
        }
        topics.iter_mut().for_each(Topic::sanitize);

        if topics.is_empty() {
            tracing::warn!(path = %path.display(), "Catalog contains no topics");
        }
        tracing::info!(
            path = %path.display(),
            files = files.len(),
            topics = topics.len(),
            "Loaded catalog"
        );
        Ok(Self { topics })
    }

    fn load_file(path: &Path) -> Result<Vec<Topic>, CatalogError> {
        let io_err = |source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path).map_err(io_err)?.len();
        if size > Self::MAX_FILE_SIZE {
            return Err(CatalogError::TooLarge {
                path: path.to_path_buf(),
                size,
                max: Self::MAX_FILE_SIZE,
            });
        }

        let json = std::fs::read_to_string(path).map_err(io_err)?;
        parse_topics(&path.display().to_string(), &json)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Find a topic by id. First match wins if ids are duplicated.
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn subtopic(&self, topic_id: &str, subtopic_id: &str) -> Option<&Subtopic> {
        self.topic(topic_id)?
            .subtopics
            .iter()
            .find(|s| s.id == subtopic_id)
    }

    /// Number of subtopics across all topics.
    pub fn total_subtopic_count(&self) -> usize {
        self.topics.iter().map(|t| t.subtopics.len()).sum()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.topics.iter()
    }
}

fn parse_topics(origin: &str, json: &str) -> Result<Vec<Topic>, CatalogError> {
    let file: TopicFile = serde_json::from_str(json).map_err(|source| CatalogError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    Ok(match file {
        TopicFile::Many(topics) => topics,
        TopicFile::One(topic) => vec![*topic],
    })
}
