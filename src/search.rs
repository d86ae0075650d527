//! Case-insensitive substring search over topic and subtopic titles and
//! descriptions.
//!
//! Results are recomputed from scratch on every query change; the catalog is
//! small enough that a linear scan is instant.

use crate::catalog::{Catalog, Subtopic, Topic};
use crate::navigation::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Topic,
    Subtopic,
}

/// A single search match. `title` and `description` are those of the matched
/// item; the `topic_*`/`subtopic_*` fields give its trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub kind: HitKind,
    pub topic_id: String,
    pub subtopic_id: Option<String>,
    pub topic_title: String,
    pub subtopic_title: Option<String>,
    pub title: String,
    pub description: String,
}

impl SearchHit {
    fn topic(topic: &Topic) -> Self {
        Self {
            kind: HitKind::Topic,
            topic_id: topic.id.clone(),
            subtopic_id: None,
            topic_title: topic.title.clone(),
            subtopic_title: None,
            title: topic.title.clone(),
            description: topic.description.clone(),
        }
    }

    fn subtopic(topic: &Topic, sub: &Subtopic) -> Self {
        Self {
            kind: HitKind::Subtopic,
            topic_id: topic.id.clone(),
            subtopic_id: Some(sub.id.clone()),
            topic_title: topic.title.clone(),
            subtopic_title: Some(sub.title.clone()),
            title: sub.title.clone(),
            description: sub.description.clone(),
        }
    }

    /// The page this hit navigates to.
    pub fn target(&self) -> Page {
        match &self.subtopic_id {
            Some(subtopic_id) => Page::Subtopic {
                topic_id: self.topic_id.clone(),
                subtopic_id: subtopic_id.clone(),
            },
            None => Page::Topic {
                topic_id: self.topic_id.clone(),
            },
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Find every topic and subtopic whose title or description contains `query`,
/// ignoring case.
///
/// A query that is blank after trimming matches nothing. Results follow
/// catalog order, with each topic's own hit ahead of its subtopics' hits.
pub fn search(catalog: &Catalog, query: &str) -> Vec<SearchHit> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let matches = |title: &str, description: &str| {
        contains_folded(title, &needle) || contains_folded(description, &needle)
    };

    let mut hits = Vec::new();
    for topic in catalog {
        if matches(&topic.title, &topic.description) {
            hits.push(SearchHit::topic(topic));
        }
        for sub in &topic.subtopics {
            if matches(&sub.title, &sub.description) {
                hits.push(SearchHit::subtopic(topic, sub));
            }
        }
    }

    tracing::debug!(query = %query, hits = hits.len(), "Search");
    hits
}

// ============================================================================
// Search State
// ============================================================================

/// The live query and the hits derived from it. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    hits: Vec<SearchHit>,
}

impl SearchState {
    pub fn set_query(&mut self, catalog: &Catalog, query: impl Into<String>) {
        self.query = query.into();
        self.hits = search(catalog, &self.query);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.hits.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    /// True when the query is non-blank, i.e. results replace the page view.
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

// ============================================================================
// Highlighting
// ============================================================================

/// A run of text that either matches the query or doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

struct Folded {
    start: usize,
    end: usize,
    ch: char,
}

/// Split `text` into segments marking every non-overlapping, case-insensitive
/// occurrence of `query`. Segments concatenate back to `text`.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    let needle: Vec<char> = if query.trim().is_empty() {
        Vec::new()
    } else {
        query.to_lowercase().chars().collect()
    };
    if needle.is_empty() {
        return vec![Segment {
            text,
            matched: false,
        }];
    }

    // Lowercasing can expand one char into several, so keep the source span
    // of every folded char.
    let folded: Vec<Folded> = text
        .char_indices()
        .flat_map(|(start, c)| {
            let end = start + c.len_utf8();
            c.to_lowercase().map(move |ch| Folded { start, end, ch })
        })
        .collect();

    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut i = 0;
    while i + needle.len() <= folded.len() {
        let window = &folded[i..i + needle.len()];
        if !window.iter().map(|f| f.ch).eq(needle.iter().copied()) {
            i += 1;
            continue;
        }
        let start = window[0].start;
        let end = window[needle.len() - 1].end;
        if start < cursor {
            i += 1;
            continue;
        }
        if start > cursor {
            segments.push(Segment {
                text: &text[cursor..start],
                matched: false,
            });
        }
        segments.push(Segment {
            text: &text[start..end],
            matched: true,
        });
        cursor = end;
        i += needle.len();
    }

    if cursor < text.len() || segments.is_empty() {
        segments.push(Segment {
            text: &text[cursor..],
            matched: false,
        });
    }
    segments
}
