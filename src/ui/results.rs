use crate::app::{App, Focus};
use crate::search::{highlight, HitKind};
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::helpers::panel_block;

/// Spans for `text` with every match of `query` highlighted.
fn highlighted(text: &str, query: &str, base: Style, matched: Style) -> Vec<Span<'static>> {
    highlight(text, query)
        .into_iter()
        .map(|seg| {
            let style = if seg.matched { matched } else { base };
            Span::styled(seg.text.to_string(), style)
        })
        .collect()
}

/// "Found 1 result for …" / "Found 3 results for …"
pub(super) fn summary(count: usize, query: &str) -> String {
    format!(
        "Found {} result{} for \"{}\"",
        count,
        if count == 1 { "" } else { "s" },
        query
    )
}

/// Render search results in place of the current page.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height < 4 {
        return;
    }
    let query = app.notebook.query();
    let hits = app.notebook.hits();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    if hits.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(" No results found", app.style("page_title"))),
            Line::from(Span::styled(
                " Try a different search term.",
                app.style("muted"),
            )),
        ]);
        f.render_widget(empty, area);
        return;
    }

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", summary(hits.len(), query)),
            app.style("page_title"),
        ))),
        chunks[0],
    );

    let focused = app.effective_focus() == Focus::Main && !app.search_mode;
    let width = chunks[1].width.saturating_sub(4) as usize;
    let matched = app.style("search_match");

    let items: Vec<ListItem> = hits
        .iter()
        .map(|hit| {
            let trail = match (hit.kind, &hit.subtopic_title) {
                (HitKind::Subtopic, Some(sub)) => format!(" {} › {}", hit.topic_title, sub),
                _ => format!(" {}", hit.topic_title),
            };
            let mut title = vec![Span::raw(" ")];
            title.extend(highlighted(
                &truncate_to_width(&hit.title, width),
                query,
                app.style("sidebar_topic"),
                matched,
            ));
            let mut description = vec![Span::raw(" ")];
            description.extend(highlighted(
                &truncate_to_width(&hit.description, width),
                query,
                app.style("body"),
                matched,
            ));

            ListItem::new(vec![
                Line::from(Span::styled(
                    truncate_to_width(&trail, width + 1).into_owned(),
                    app.style("breadcrumb"),
                )),
                Line::from(title),
                Line::from(description),
                Line::default(),
            ])
        })
        .collect();

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_item.min(items.len() - 1)));
    }

    let list = List::new(items)
        .block(panel_block(app, " Search results ", focused))
        .highlight_style(app.style("selected"));
    f.render_stateful_widget(list, chunks[1], &mut state);
}
