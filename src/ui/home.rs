use crate::app::{App, Focus};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::progress::CompletionKey;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::helpers::{completion_mark, panel_block};

/// Render the home page: welcome, overall progress, statistics, topic list.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height < 8 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            " Operating Systems Notebook",
            app.style("page_title"),
        )),
        Line::from(Span::styled(
            " Work through the topics in order and mark each one complete as you go.",
            app.style("muted"),
        )),
    ]);
    f.render_widget(welcome, chunks[0]);

    let overall = app.notebook.overall_progress();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Overall progress "),
        )
        .gauge_style(app.style("progress_gauge"))
        .ratio(overall.ratio())
        .label(format!(
            "{}% ({}/{} topics)",
            overall.percentage(),
            overall.completed,
            overall.total
        ));
    f.render_widget(gauge, chunks[1]);

    let stats = app.notebook.stats();
    let stats_line = Line::from(vec![
        Span::styled(" Completed ", app.style("muted")),
        Span::styled(stats.completed_topics.to_string(), app.style("complete")),
        Span::styled("  Remaining ", app.style("muted")),
        Span::styled(stats.remaining_topics.to_string(), app.style("body")),
        Span::styled("  Lessons ", app.style("muted")),
        Span::styled(stats.total_subtopics.to_string(), app.style("body")),
    ]);
    f.render_widget(Paragraph::new(stats_line), chunks[2]);

    render_topic_list(f, app, chunks[3]);
}

fn render_topic_list(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.effective_focus() == Focus::Main;
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .notebook
        .catalog()
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let done = app.notebook.is_complete(&CompletionKey::topic(&topic.id));
            let progress = app.notebook.topic_progress(topic);
            let mark_style = if done {
                app.style("complete")
            } else {
                app.style("incomplete")
            };
            let title = format!("{}. {}", i + 1, topic.title);
            let detail = format!(
                "   {} lessons · {}% read",
                topic.subtopics.len(),
                progress.percentage()
            );

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!(" {} ", completion_mark(done)), mark_style),
                    Span::styled(title, app.style("sidebar_topic")),
                ]),
                Line::from(Span::styled(
                    truncate_to_width(&format!("   {}", topic.description), width).into_owned(),
                    app.style("body"),
                )),
                Line::from(Span::styled(detail, app.style("muted"))),
            ])
        })
        .collect();

    let hint = app
        .keybindings
        .key_for(KbAction::ToggleComplete, KbContext::Global)
        .map(|k| format!(" Topics ({} toggles complete) ", k))
        .unwrap_or_else(|| " Topics ".to_string());

    let mut state = ListState::default();
    if focused && !items.is_empty() {
        state.select(Some(app.selected_item.min(items.len() - 1)));
    }

    let list = List::new(items)
        .block(panel_block(app, hint, focused))
        .highlight_style(app.style("selected"));
    f.render_stateful_widget(list, area, &mut state);
}
