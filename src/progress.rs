//! Completion tracking and progress aggregation.
//!
//! The completion set stores plain strings so it survives catalog edits:
//! keys that no longer name anything are kept and simply never counted.

use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{Catalog, Topic};

/// Joins topic and subtopic ids in a subtopic completion key.
pub const KEY_SEPARATOR: char = '-';

// ============================================================================
// Completion Keys
// ============================================================================

/// Something that can be marked complete.
///
/// A topic's key is its bare id. A subtopic's key is
/// `"{topic_id}-{subtopic_id}"`. Ids may themselves contain `-`
/// (`process-management`), so distinct pairs can render to the same key;
/// [`Catalog::lint`] reports those collisions. The separator is part of the
/// persisted format and cannot change without migrating stored progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompletionKey {
    Topic(String),
    Subtopic {
        topic_id: String,
        subtopic_id: String,
    },
}

impl CompletionKey {
    pub fn topic(id: impl Into<String>) -> Self {
        CompletionKey::Topic(id.into())
    }

    pub fn subtopic(topic_id: impl Into<String>, subtopic_id: impl Into<String>) -> Self {
        CompletionKey::Subtopic {
            topic_id: topic_id.into(),
            subtopic_id: subtopic_id.into(),
        }
    }
}

impl fmt::Display for CompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionKey::Topic(id) => f.write_str(id),
            CompletionKey::Subtopic {
                topic_id,
                subtopic_id,
            } => write!(f, "{topic_id}{KEY_SEPARATOR}{subtopic_id}"),
        }
    }
}

// ============================================================================
// Completion Set
// ============================================================================

/// The set of completed keys.
///
/// Backed by a `BTreeSet`, so iteration and [`encode`](Self::encode) are in
/// ascending byte order regardless of the order keys were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet(BTreeSet<String>);

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &CompletionKey) -> bool {
        self.0.contains(&key.to_string())
    }

    /// Membership test on the stored string form.
    pub fn contains_raw(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// Invert membership of `key`. Returns whether the key is now present.
    pub fn toggle(&mut self, key: &CompletionKey) -> bool {
        let key = key.to_string();
        if self.0.remove(&key) {
            false
        } else {
            self.0.insert(key);
            true
        }
    }

    /// A copy of this set with `key`'s membership inverted.
    pub fn toggled(&self, key: &CompletionKey) -> Self {
        let mut next = self.clone();
        next.toggle(key);
        next
    }

    pub fn insert(&mut self, key: &CompletionKey) -> bool {
        self.0.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Canonical persisted form: a JSON array of unique strings, sorted.
    pub fn encode(&self) -> String {
        Value::Array(self.0.iter().cloned().map(Value::String).collect()).to_string()
    }

    /// Parse the persisted form. Duplicates collapse; order is irrelevant.
    pub fn decode(s: &str) -> Result<Self, serde_json::Error> {
        let keys: Vec<String> = serde_json::from_str(s)?;
        Ok(keys.into_iter().collect())
    }
}

impl FromIterator<String> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Progress Aggregation
// ============================================================================

/// `completed` out of `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Rounded to the nearest whole percent; 0 when there is nothing to complete.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let ratio = self.completed.min(self.total) as f64 / self.total as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }

    /// Fraction in `0.0..=1.0` for gauges.
    pub fn ratio(&self) -> f64 {
        f64::from(self.percentage()) / 100.0
    }
}

/// Share of topics whose topic-level key is in `completed`.
pub fn overall(catalog: &Catalog, completed: &CompletionSet) -> Progress {
    Progress {
        completed: catalog
            .iter()
            .filter(|t| completed.contains_raw(&t.id))
            .count(),
        total: catalog.len(),
    }
}

/// Share of a topic's subtopics whose composite key is in `completed`.
pub fn for_topic(topic: &Topic, completed: &CompletionSet) -> Progress {
    Progress {
        completed: topic
            .subtopics
            .iter()
            .filter(|s| completed.contains(&CompletionKey::subtopic(&topic.id, &s.id)))
            .count(),
        total: topic.subtopics.len(),
    }
}

/// Figures for the home page summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub completed_topics: usize,
    pub remaining_topics: usize,
    pub total_subtopics: usize,
}

pub fn stats(catalog: &Catalog, completed: &CompletionSet) -> CatalogStats {
    let topics = overall(catalog, completed);
    CatalogStats {
        completed_topics: topics.completed,
        remaining_topics: topics.remaining(),
        total_subtopics: catalog.total_subtopic_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Subtopic;
    use pretty_assertions::assert_eq;

    fn subtopic(id: &str) -> Subtopic {
        Subtopic {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            duration: None,
            content: Vec::new(),
            key_points: Vec::new(),
            questions: Vec::new(),
            quiz: Vec::new(),
        }
    }

    fn intro_catalog() -> Catalog {
        Catalog::new(vec![Topic {
            id: "intro".into(),
            title: "Intro".into(),
            description: String::new(),
            overview: None,
            objectives: Vec::new(),
            quiz: Vec::new(),
            subtopics: vec![subtopic("a"), subtopic("b")],
        }])
    }

    #[test]
    fn test_key_display() {
        assert_eq!(CompletionKey::topic("memory").to_string(), "memory");
        assert_eq!(
            CompletionKey::subtopic("process-management", "pcb").to_string(),
            "process-management-pcb"
        );
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut set = CompletionSet::new();
        set.insert(&CompletionKey::topic("memory"));
        let before = set.clone();

        let key = CompletionKey::subtopic("memory", "paging");
        assert!(set.toggle(&key));
        assert!(set.contains(&key));
        assert!(!set.toggle(&key));
        assert_eq!(set, before);
    }

    #[test]
    fn test_toggled_leaves_original_untouched() {
        let set = CompletionSet::new();
        let next = set.toggled(&CompletionKey::topic("intro"));
        assert!(set.is_empty());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_encode_is_sorted_and_canonical() {
        let a: CompletionSet = ["zeta", "alpha", "mid"].map(String::from).into_iter().collect();
        let b: CompletionSet = ["mid", "zeta", "alpha", "alpha"]
            .map(String::from)
            .into_iter()
            .collect();
        assert_eq!(a.encode(), r#"["alpha","mid","zeta"]"#);
        assert_eq!(a.encode(), b.encode());
        assert_eq!(CompletionSet::new().encode(), "[]");
    }

    #[test]
    fn test_decode_round_trip() {
        let set: CompletionSet = ["intro", "intro-a"].map(String::from).into_iter().collect();
        assert_eq!(CompletionSet::decode(&set.encode()).unwrap(), set);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(CompletionSet::decode("{\"intro\": true}").is_err());
        assert!(CompletionSet::decode("not json").is_err());
    }

    #[test]
    fn test_topic_and_overall_progress() {
        let catalog = intro_catalog();
        let mut set: CompletionSet = ["intro-a".to_string()].into_iter().collect();

        let topic = catalog.topic("intro").unwrap();
        assert_eq!(for_topic(topic, &set).percentage(), 50);
        assert_eq!(overall(&catalog, &set).percentage(), 0);

        set.insert(&CompletionKey::topic("intro"));
        assert_eq!(overall(&catalog, &set).percentage(), 100);
    }

    #[test]
    fn test_empty_catalog_is_zero_percent() {
        let set: CompletionSet = ["anything".to_string()].into_iter().collect();
        let progress = overall(&Catalog::default(), &set);
        assert_eq!(progress, Progress { completed: 0, total: 0 });
        assert_eq!(progress.percentage(), 0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        assert_eq!(Progress { completed: 1, total: 3 }.percentage(), 33);
        assert_eq!(Progress { completed: 2, total: 3 }.percentage(), 67);
        assert_eq!(Progress { completed: 1, total: 8 }.percentage(), 13);
    }

    #[test]
    fn test_stale_keys_are_not_counted() {
        let catalog = intro_catalog();
        let set: CompletionSet = ["intro-zzz", "gone"].map(String::from).into_iter().collect();
        assert_eq!(overall(&catalog, &set).completed, 0);
        assert_eq!(for_topic(&catalog.topics()[0], &set).completed, 0);
    }

    #[test]
    fn test_stats() {
        let catalog = Catalog::builtin().unwrap();
        let set: CompletionSet = ["memory".to_string()].into_iter().collect();
        assert_eq!(
            stats(&catalog, &set),
            CatalogStats {
                completed_topics: 1,
                remaining_topics: 3,
                total_subtopics: 12,
            }
        );
    }
}
