//! Which page is showing, and the breadcrumb trail leading to it.

use crate::catalog::{Catalog, Subtopic, Topic};

/// The current page. Ids are not validated; a page naming something absent
/// from the catalog renders empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Topic {
        topic_id: String,
    },
    Subtopic {
        topic_id: String,
        subtopic_id: String,
    },
}

impl Page {
    pub fn topic(topic_id: impl Into<String>) -> Self {
        Page::Topic {
            topic_id: topic_id.into(),
        }
    }

    pub fn subtopic(topic_id: impl Into<String>, subtopic_id: impl Into<String>) -> Self {
        Page::Subtopic {
            topic_id: topic_id.into(),
            subtopic_id: subtopic_id.into(),
        }
    }

    pub fn topic_id(&self) -> Option<&str> {
        match self {
            Page::Home => None,
            Page::Topic { topic_id } | Page::Subtopic { topic_id, .. } => Some(topic_id.as_str()),
        }
    }

    pub fn subtopic_id(&self) -> Option<&str> {
        match self {
            Page::Subtopic { subtopic_id, .. } => Some(subtopic_id.as_str()),
            _ => None,
        }
    }

    /// One level up: subtopic → topic → home.
    pub fn parent(&self) -> Page {
        match self {
            Page::Home | Page::Topic { .. } => Page::Home,
            Page::Subtopic { topic_id, .. } => Page::topic(topic_id.clone()),
        }
    }

    pub fn resolve_topic<'a>(&self, catalog: &'a Catalog) -> Option<&'a Topic> {
        catalog.topic(self.topic_id()?)
    }

    pub fn resolve_subtopic<'a>(&self, catalog: &'a Catalog) -> Option<&'a Subtopic> {
        match self {
            Page::Subtopic {
                topic_id,
                subtopic_id,
            } => catalog.subtopic(topic_id, subtopic_id),
            _ => None,
        }
    }
}

/// One breadcrumb: its label and where it leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub target: Page,
}

/// Home, then the topic title, then the subtopic title.
///
/// The trail stops at the first segment that doesn't resolve, so an unknown
/// topic id yields just Home.
pub fn breadcrumbs(catalog: &Catalog, page: &Page) -> Vec<Crumb> {
    let mut trail = vec![Crumb {
        label: "Home".to_string(),
        target: Page::Home,
    }];

    let Some(topic) = page.resolve_topic(catalog) else {
        return trail;
    };
    trail.push(Crumb {
        label: topic.title.clone(),
        target: Page::topic(topic.id.clone()),
    });

    if let Some(sub) = page.resolve_subtopic(catalog) {
        trail.push(Crumb {
            label: sub.title.clone(),
            target: page.clone(),
        });
    }
    trail
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(catalog: &Catalog, page: &Page) -> Vec<String> {
        breadcrumbs(catalog, page)
            .into_iter()
            .map(|c| c.label)
            .collect()
    }

    #[test]
    fn test_default_is_home() {
        assert_eq!(Page::default(), Page::Home);
    }

    #[test]
    fn test_breadcrumbs_full_trail() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(labels(&catalog, &Page::Home), vec!["Home"]);
        assert_eq!(
            labels(&catalog, &Page::topic("memory")),
            vec!["Home", "Memory Management"]
        );

        let page = Page::subtopic("process-management", "pcb");
        let trail = breadcrumbs(&catalog, &page);
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[1].target, Page::topic("process-management"));
        assert_eq!(trail[2].target, page);
    }

    #[test]
    fn test_breadcrumbs_stop_at_unresolvable_segment() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(labels(&catalog, &Page::topic("missing")), vec!["Home"]);
        assert_eq!(
            labels(&catalog, &Page::subtopic("memory", "missing")),
            vec!["Home", "Memory Management"]
        );
        assert_eq!(
            labels(&catalog, &Page::subtopic("missing", "pcb")),
            vec!["Home"]
        );
    }

    #[test]
    fn test_parent() {
        assert_eq!(Page::subtopic("t", "s").parent(), Page::topic("t"));
        assert_eq!(Page::topic("t").parent(), Page::Home);
        assert_eq!(Page::Home.parent(), Page::Home);
    }
}
