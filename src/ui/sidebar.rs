use crate::app::{App, Focus, SidebarRow};
use crate::progress::CompletionKey;
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

use super::helpers::{completion_mark, panel_block};

/// Columns taken by the sidebar, docked or as an overlay.
pub(super) const SIDEBAR_WIDTH: u16 = 34;

/// Render the topic tree.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let rows = app.sidebar_rows();
    let active = app.active_sidebar_row(&rows);
    let focused = app.effective_focus() == Focus::Sidebar;
    let inner_width = area.width.saturating_sub(2) as usize;
    let topics = app.notebook.catalog().topics();

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, &row)| {
            let line = match row {
                SidebarRow::Topic(ti) => topics.get(ti).map(|topic| {
                    let chevron = if app.expanded_topics.contains(&topic.id) {
                        "▾ "
                    } else {
                        "▸ "
                    };
                    let done = app.notebook.is_complete(&CompletionKey::topic(&topic.id));
                    let progress = app.notebook.topic_progress(topic);
                    let counts = format!(" {}/{}", progress.completed, progress.total);
                    let prefix = format!("{}{} ", chevron, completion_mark(done));

                    let room = inner_width
                        .saturating_sub(display_width(&prefix))
                        .saturating_sub(counts.len());
                    let mark_style = if done {
                        app.style("complete")
                    } else {
                        app.style("incomplete")
                    };
                    Line::from(vec![
                        Span::styled(prefix, mark_style),
                        Span::styled(
                            truncate_to_width(&topic.title, room).into_owned(),
                            app.style("sidebar_topic"),
                        ),
                        Span::styled(counts, app.style("muted")),
                    ])
                }),
                SidebarRow::Subtopic(ti, si) => topics
                    .get(ti)
                    .and_then(|t| t.subtopics.get(si).map(|s| (t, s)))
                    .map(|(topic, sub)| {
                        let done = app
                            .notebook
                            .is_complete(&CompletionKey::subtopic(&topic.id, &sub.id));
                        let prefix = format!("    {} ", completion_mark(done));
                        let room = inner_width.saturating_sub(display_width(&prefix));
                        Line::from(vec![
                            Span::styled(prefix, app.style("muted")),
                            Span::styled(
                                truncate_to_width(&sub.title, room).into_owned(),
                                app.style("sidebar_subtopic"),
                            ),
                        ])
                    }),
            };

            let item = ListItem::new(line.unwrap_or_default());
            if Some(i) == active {
                item.style(app.style("sidebar_active"))
            } else {
                item
            }
        })
        .collect();

    let mut state = ListState::default();
    state.select(if focused {
        Some(app.selected_sidebar.min(rows.len().saturating_sub(1)))
    } else {
        active
    });

    let highlight = if focused {
        app.style("selected")
    } else {
        app.style("sidebar_active")
    };
    let list = List::new(items)
        .block(panel_block(app, " Topics ", focused))
        .highlight_style(highlight);

    f.render_stateful_widget(list, area, &mut state);
}
