use std::collections::{HashMap, HashSet};
use std::fmt;

use super::{Catalog, ContentSection};
use crate::progress::CompletionKey;

/// A structural problem in catalog data. None of these stop the app; they
/// are logged at startup and printed by `--check-catalog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    DuplicateTopic {
        topic_id: String,
    },
    DuplicateSubtopic {
        topic_id: String,
        subtopic_id: String,
    },
    /// Two different items produce the same completion key, so completing
    /// one also marks the other.
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },
    CorrectOptionCount {
        topic_id: String,
        subtopic_id: String,
        question_id: String,
        correct: usize,
    },
    EmptyList {
        topic_id: String,
        subtopic_id: String,
    },
    MissingImageSource {
        topic_id: String,
        subtopic_id: String,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::DuplicateTopic { topic_id } => {
                write!(f, "duplicate topic id {topic_id:?}")
            }
            CatalogWarning::DuplicateSubtopic {
                topic_id,
                subtopic_id,
            } => write!(f, "duplicate subtopic id {subtopic_id:?} in topic {topic_id:?}"),
            CatalogWarning::KeyCollision { key, first, second } => {
                write!(f, "completion key {key:?} shared by {first} and {second}")
            }
            CatalogWarning::CorrectOptionCount {
                topic_id,
                subtopic_id,
                question_id,
                correct,
            } => write!(
                f,
                "quiz question {question_id:?} in {topic_id}/{subtopic_id} has {correct} correct options"
            ),
            CatalogWarning::EmptyList {
                topic_id,
                subtopic_id,
            } => write!(f, "list section without items in {topic_id}/{subtopic_id}"),
            CatalogWarning::MissingImageSource {
                topic_id,
                subtopic_id,
            } => write!(f, "image section without src in {topic_id}/{subtopic_id}"),
        }
    }
}

impl Catalog {
    /// Check the catalog for data problems.
    pub fn lint(&self) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();
        let mut seen_topics = HashSet::new();
        let mut owners: HashMap<String, String> = HashMap::new();

        let mut claim = |key: CompletionKey, owner: String, warnings: &mut Vec<CatalogWarning>| {
            let key = key.to_string();
            match owners.get(&key) {
                Some(first) => warnings.push(CatalogWarning::KeyCollision {
                    key,
                    first: first.clone(),
                    second: owner,
                }),
                None => {
                    owners.insert(key, owner);
                }
            }
        };

        for topic in self.iter() {
            if !seen_topics.insert(topic.id.as_str()) {
                warnings.push(CatalogWarning::DuplicateTopic {
                    topic_id: topic.id.clone(),
                });
                continue;
            }
            claim(
                CompletionKey::topic(&topic.id),
                format!("topic {}", topic.id),
                &mut warnings,
            );

            let mut seen_subtopics = HashSet::new();
            for sub in &topic.subtopics {
                if !seen_subtopics.insert(sub.id.as_str()) {
                    warnings.push(CatalogWarning::DuplicateSubtopic {
                        topic_id: topic.id.clone(),
                        subtopic_id: sub.id.clone(),
                    });
                    continue;
                }
                claim(
                    CompletionKey::subtopic(&topic.id, &sub.id),
                    format!("subtopic {}/{}", topic.id, sub.id),
                    &mut warnings,
                );

                for section in &sub.content {
                    match section {
                        ContentSection::List { items, .. } if items.is_empty() => {
                            warnings.push(CatalogWarning::EmptyList {
                                topic_id: topic.id.clone(),
                                subtopic_id: sub.id.clone(),
                            });
                        }
                        ContentSection::Image { src, .. }
                            if src.as_deref().map_or(true, |s| s.trim().is_empty()) =>
                        {
                            warnings.push(CatalogWarning::MissingImageSource {
                                topic_id: topic.id.clone(),
                                subtopic_id: sub.id.clone(),
                            });
                        }
                        _ => {}
                    }
                }

                for question in &sub.quiz {
                    let correct = question.options.iter().filter(|o| o.is_correct).count();
                    if correct != 1 {
                        warnings.push(CatalogWarning::CorrectOptionCount {
                            topic_id: topic.id.clone(),
                            subtopic_id: sub.id.clone(),
                            question_id: question.id.clone(),
                            correct,
                        });
                    }
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{McqOption, McqQuestion, Subtopic, Topic};
    use pretty_assertions::assert_eq;

    fn topic(id: &str, subtopics: &[&str]) -> Topic {
        Topic {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            overview: None,
            objectives: Vec::new(),
            quiz: Vec::new(),
            subtopics: subtopics
                .iter()
                .map(|s| Subtopic {
                    id: (*s).into(),
                    title: (*s).into(),
                    description: String::new(),
                    duration: None,
                    content: Vec::new(),
                    key_points: Vec::new(),
                    questions: Vec::new(),
                    quiz: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_detects_key_collision() {
        let catalog = Catalog::new(vec![topic("a", &["b-c"]), topic("a-b", &["c"])]);
        assert_eq!(
            catalog.lint(),
            vec![CatalogWarning::KeyCollision {
                key: "a-b-c".into(),
                first: "subtopic a/b-c".into(),
                second: "subtopic a-b/c".into(),
            }]
        );
    }

    #[test]
    fn test_topic_id_colliding_with_subtopic_key() {
        let catalog = Catalog::new(vec![topic("process", &["management"]), topic("process-management", &[])]);
        let warnings = catalog.lint();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("process-management"));
    }

    #[test]
    fn test_duplicates_reported_once() {
        let catalog = Catalog::new(vec![topic("t", &["s", "s"]), topic("t", &[])]);
        assert_eq!(
            catalog.lint(),
            vec![
                CatalogWarning::DuplicateSubtopic {
                    topic_id: "t".into(),
                    subtopic_id: "s".into(),
                },
                CatalogWarning::DuplicateTopic {
                    topic_id: "t".into()
                },
            ]
        );
    }

    #[test]
    fn test_quiz_and_section_checks() {
        let mut t = topic("t", &["s"]);
        let sub = &mut t.subtopics[0];
        sub.content = vec![
            ContentSection::List {
                content: "Lead".into(),
                items: Vec::new(),
            },
            ContentSection::Image {
                content: "Diagram".into(),
                src: None,
                alt: None,
                caption: None,
                width: None,
                height: None,
            },
        ];
        sub.quiz = vec![McqQuestion {
            id: "q1".into(),
            question: "?".into(),
            options: vec![
                McqOption {
                    id: "a".into(),
                    text: "x".into(),
                    is_correct: true,
                },
                McqOption {
                    id: "b".into(),
                    text: "y".into(),
                    is_correct: true,
                },
            ],
            explanation: None,
        }];

        let warnings = Catalog::new(vec![t]).lint();
        assert_eq!(warnings.len(), 3);
        assert!(matches!(warnings[0], CatalogWarning::EmptyList { .. }));
        assert!(matches!(warnings[1], CatalogWarning::MissingImageSource { .. }));
        assert!(matches!(
            warnings[2],
            CatalogWarning::CorrectOptionCount { correct: 2, .. }
        ));
    }
}
