use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::util::strip_control_chars;

// ============================================================================
// Topics and Subtopics
// ============================================================================

/// A top-level unit of study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique across the catalog. Also the completion key for the topic.
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives: Vec<String>,
    /// Free-form knowledge-check questions shown on the topic page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quiz: Vec<String>,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
}

/// A lesson within a topic. `(topic.id, subtopic.id)` is its global identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_points: Vec<String>,
    /// Open-ended practice questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quiz: Vec<McqQuestion>,
}

// ============================================================================
// Content Sections
// ============================================================================

/// One renderable block of subtopic content, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentSection {
    Paragraph {
        #[serde(default)]
        content: String,
    },
    Heading {
        #[serde(default)]
        content: String,
    },
    /// `content` is an optional lead-in line shown above the items.
    List {
        #[serde(default)]
        content: String,
        #[serde(default)]
        items: Vec<String>,
    },
    Code {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Note {
        #[serde(default)]
        content: String,
    },
    Image {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<Dimension>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<Dimension>,
    },
}

/// Image size hint: a bare pixel count or a CSS-style string like `"100%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(u32),
    Css(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{px}px"),
            Dimension::Css(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Multiple-choice Quiz
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<McqOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl McqQuestion {
    /// The first option marked correct. Questions are expected to have exactly one.
    pub fn correct_option(&self) -> Option<&McqOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

// ============================================================================
// Sanitizing
// ============================================================================

fn clean(s: &mut String) {
    let cleaned = match strip_control_chars(s) {
        Cow::Borrowed(_) => return,
        Cow::Owned(cleaned) => cleaned,
    };
    *s = cleaned;
}

fn clean_opt(s: &mut Option<String>) {
    if let Some(s) = s {
        clean(s);
    }
}

fn clean_all(v: &mut [String]) {
    v.iter_mut().for_each(clean);
}

impl Topic {
    /// Strip terminal control sequences from every displayed string.
    pub(crate) fn sanitize(&mut self) {
        clean(&mut self.title);
        clean(&mut self.description);
        clean_opt(&mut self.overview);
        clean_all(&mut self.objectives);
        clean_all(&mut self.quiz);
        self.subtopics.iter_mut().for_each(Subtopic::sanitize);
    }
}

impl Subtopic {
    fn sanitize(&mut self) {
        clean(&mut self.title);
        clean(&mut self.description);
        clean_opt(&mut self.duration);
        clean_all(&mut self.key_points);
        clean_all(&mut self.questions);

        for section in &mut self.content {
            match section {
                ContentSection::Paragraph { content }
                | ContentSection::Heading { content }
                | ContentSection::Note { content } => clean(content),
                ContentSection::List { content, items } => {
                    clean(content);
                    clean_all(items);
                }
                ContentSection::Code { content, language } => {
                    clean(content);
                    clean_opt(language);
                }
                ContentSection::Image {
                    content,
                    alt,
                    caption,
                    ..
                } => {
                    clean(content);
                    clean_opt(alt);
                    clean_opt(caption);
                }
            }
        }

        for question in &mut self.quiz {
            clean(&mut question.question);
            clean_opt(&mut question.explanation);
            for option in &mut question.options {
                clean(&mut option.text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_tags_parse() {
        let json = r#"[
            {"type": "paragraph", "content": "An OS manages hardware."},
            {"type": "list", "items": ["CPU", "Memory"]},
            {"type": "code", "content": "fork();", "language": "c"},
            {"type": "image", "content": "Diagram", "src": "/images/os.png", "width": "100%", "height": 240}
        ]"#;
        let sections: Vec<ContentSection> = serde_json::from_str(json).unwrap();

        assert!(matches!(sections[0], ContentSection::Paragraph { .. }));
        assert_eq!(
            sections[1],
            ContentSection::List {
                content: String::new(),
                items: vec!["CPU".into(), "Memory".into()],
            }
        );
        assert_eq!(
            sections[2],
            ContentSection::Code {
                content: "fork();".into(),
                language: Some("c".into()),
            }
        );
        match &sections[3] {
            ContentSection::Image { width, height, .. } => {
                assert_eq!(width.as_ref().map(ToString::to_string).as_deref(), Some("100%"));
                assert_eq!(height, &Some(Dimension::Pixels(240)));
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_section_type_rejected() {
        let json = r#"{"type": "video", "content": "x"}"#;
        assert!(serde_json::from_str::<ContentSection>(json).is_err());
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{
            "id": "pcb", "title": "PCB", "description": "d",
            "keyPoints": ["one"],
            "quiz": [{"id": "q1", "question": "?", "options": [
                {"id": "a", "text": "yes", "isCorrect": true},
                {"id": "b", "text": "no", "isCorrect": false}
            ]}]
        }"#;
        let sub: Subtopic = serde_json::from_str(json).unwrap();
        assert_eq!(sub.key_points, vec!["one".to_string()]);
        assert!(sub.content.is_empty());
        assert_eq!(sub.quiz[0].correct_option().map(|o| o.id.as_str()), Some("a"));
    }

    #[test]
    fn test_sanitize_strips_escapes() {
        let mut topic: Topic = serde_json::from_str(
            r#"{"id": "t", "title": "\u001b[2JTitle", "description": "ok",
                "subtopics": [{"id": "s", "title": "S", "description": "d",
                  "content": [{"type": "list", "items": ["\u001b]0;x\u0007item"]}]}]}"#,
        )
        .unwrap();
        topic.sanitize();

        assert_eq!(topic.title, "Title");
        assert_eq!(
            topic.subtopics[0].content[0],
            ContentSection::List {
                content: String::new(),
                items: vec!["item".into()],
            }
        );
    }
}
