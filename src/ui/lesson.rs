//! Lesson (subtopic) view.
//!
//! The lesson is laid out into pre-wrapped lines once per render so the line
//! count is exact for scroll clamping and image references can be located by
//! line.

use crate::app::App;
use crate::catalog::{ContentSection, Subtopic, Topic};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::helpers::{panel_block, push_wrapped};
use super::render::render_missing;

/// A laid-out lesson.
pub(super) struct LessonLayout {
    pub lines: Vec<Line<'static>>,
    /// `(line, src)` for each image section.
    pub images: Vec<(usize, String)>,
}

/// Render the lesson for the current page.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let width = area.width.saturating_sub(2) as usize;

    let layout = {
        let (Some(topic), Some(sub)) = (
            app.notebook.current_topic(),
            app.notebook.current_subtopic(),
        ) else {
            render_missing(f, app, area, "Lesson not found");
            return;
        };
        layout_lesson(app, topic, sub, width)
    };

    // Record sizes for scroll clamping, then clamp before drawing so a resize
    // never renders one frame past the end.
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.reader_line_count = layout.lines.len();
    app.image_lines = layout.images;
    app.clamp_reader_scroll();

    let max_scroll = app
        .reader_line_count
        .saturating_sub(app.reader_visible_lines);
    let title = if max_scroll > 0 {
        format!(" Lesson {}% ", app.scroll_offset * 100 / max_scroll)
    } else {
        " Lesson ".to_string()
    };

    let scroll = u16::try_from(app.scroll_offset).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(layout.lines)
        .block(panel_block(app, title, true))
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

/// Lay out `sub` at `width` columns.
pub(super) fn layout_lesson(app: &App, topic: &Topic, sub: &Subtopic, width: usize) -> LessonLayout {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut images = Vec::new();

    push_wrapped(&mut lines, &topic.title, width, "", app.style("muted"));
    push_wrapped(&mut lines, &sub.title, width, "", app.style("page_title"));
    push_wrapped(&mut lines, &sub.description, width, "", app.style("body"));
    if let Some(duration) = &sub.duration {
        lines.push(Line::from(Span::styled(
            format!("Estimated time: {}", duration),
            app.style("muted"),
        )));
    }
    lines.push(Line::default());

    for section in &sub.content {
        match section {
            ContentSection::Heading { content } => {
                push_wrapped(&mut lines, content, width, "", app.style("heading"));
            }
            ContentSection::Paragraph { content } => {
                push_wrapped(&mut lines, content, width, "", app.style("body"));
                lines.push(Line::default());
            }
            ContentSection::Note { content } => {
                push_wrapped(&mut lines, content, width, "│ ", app.style("note"));
                lines.push(Line::default());
            }
            ContentSection::List { content, items } => {
                if !content.trim().is_empty() {
                    push_wrapped(&mut lines, content, width, "", app.style("body"));
                }
                for item in items {
                    push_wrapped(&mut lines, item, width, "  • ", app.style("body"));
                }
                lines.push(Line::default());
            }
            ContentSection::Code { content, language } => {
                if let Some(language) = language {
                    lines.push(Line::from(Span::styled(
                        format!("── {} ──", language),
                        app.style("muted"),
                    )));
                }
                // Code keeps its own line breaks; overlong lines are clipped.
                for row in content.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", row),
                        app.style("code"),
                    )));
                }
                lines.push(Line::default());
            }
            ContentSection::Image {
                content,
                src,
                alt,
                caption,
                width: img_width,
                height: img_height,
            } => {
                let src = src.as_deref().map(str::trim).filter(|s| !s.is_empty());
                if let Some(src) = src {
                    images.push((lines.len(), src.to_string()));
                }
                let label = alt
                    .as_deref()
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or(content.as_str());
                let mut header = format!("[Diagram] {}", label);
                if let (Some(w), Some(h)) = (img_width, img_height) {
                    header.push_str(&format!(" ({}×{})", w, h));
                }
                push_wrapped(&mut lines, &header, width, "▣ ", app.style("image"));
                if let Some(caption) = caption {
                    push_wrapped(&mut lines, caption, width, "  ", app.style("muted"));
                }
                if let Some(src) = src {
                    let key = app
                        .keybindings
                        .key_for(KbAction::OpenImage, KbContext::Reader)
                        .unwrap_or_default();
                    push_wrapped(
                        &mut lines,
                        &format!("{} opens {}", key, src),
                        width,
                        "  ",
                        app.style("muted"),
                    );
                }
                lines.push(Line::default());
            }
        }
    }

    if !sub.key_points.is_empty() {
        lines.push(Line::from(Span::styled("Key points", app.style("heading"))));
        for point in &sub.key_points {
            push_wrapped(&mut lines, point, width, "  ✓ ", app.style("key_point"));
        }
        lines.push(Line::default());
    }

    if !sub.questions.is_empty() {
        lines.push(Line::from(Span::styled(
            "Practice questions",
            app.style("heading"),
        )));
        for (i, question) in sub.questions.iter().enumerate() {
            let prefix = format!("  {}. ", i + 1);
            push_wrapped(&mut lines, question, width, &prefix, app.style("body"));
        }
        lines.push(Line::default());
    }

    if !sub.quiz.is_empty() {
        let key = app
            .keybindings
            .key_for(KbAction::StartQuiz, KbContext::Reader)
            .unwrap_or_default();
        lines.push(Line::from(Span::styled("Quiz", app.style("heading"))));
        lines.push(Line::from(Span::styled(
            format!(
                "  {} question{} · press {} to start",
                sub.quiz.len(),
                if sub.quiz.len() == 1 { "" } else { "s" },
                key
            ),
            app.style("body"),
        )));
    }

    LessonLayout { lines, images }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::notebook::Notebook;
    use crate::storage::Database;
    use std::sync::Arc;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let notebook = Notebook::init(Arc::new(Catalog::builtin().unwrap()), db).await;
        App::new(notebook, &Config::default())
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[tokio::test]
    async fn test_image_line_recorded() {
        let app = test_app().await;
        let catalog = app.notebook.catalog();
        let topic = catalog.topic("intro-os").unwrap();
        let sub = catalog.subtopic("intro-os", "os-services").unwrap();

        let layout = layout_lesson(&app, topic, sub, 60);
        assert_eq!(layout.images.len(), 1);
        let (line, src) = &layout.images[0];
        assert_eq!(src, "/images/os_concept.png");
        assert!(text_of(&layout.lines[*line]).contains("[Diagram]"));
    }

    #[tokio::test]
    async fn test_lines_fit_width() {
        let app = test_app().await;
        let catalog = app.notebook.catalog();
        let topic = catalog.topic("memory").unwrap();
        for sub in &topic.subtopics {
            let layout = layout_lesson(&app, topic, sub, 40);
            for line in layout.lines.iter().filter(|l| {
                // code rows are clipped, not wrapped
                l.spans.first().map(|s| s.style) != Some(app.style("code"))
            }) {
                assert!(crate::util::display_width(&text_of(line)) <= 40);
            }
        }
    }

    #[tokio::test]
    async fn test_quiz_entry_point_shown() {
        let app = test_app().await;
        let catalog = app.notebook.catalog();
        let topic = catalog.topic("process-management").unwrap();
        let sub = catalog.subtopic("process-management", "pcb").unwrap();

        let layout = layout_lesson(&app, topic, sub, 80);
        let all: Vec<String> = layout.lines.iter().map(text_of).collect();
        assert!(all.iter().any(|l| l.contains("2 questions · press z to start")));
        assert!(all.iter().any(|l| l == "Key points"));
    }
}
