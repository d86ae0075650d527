use crate::app::{App, Focus};
use crate::catalog::Topic;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::progress::CompletionKey;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::helpers::{completion_mark, panel_block, push_wrapped};
use super::render::render_missing;

/// Render a topic page: intro, subtopic list, knowledge check.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(topic) = app.notebook.current_topic() else {
        render_missing(f, app, area, "Topic not found");
        return;
    };
    if area.width < 10 || area.height < 8 {
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let intro = intro_lines(app, topic, width);
    let check = knowledge_check_lines(app, topic, width);

    // Intro and knowledge check shrink before the subtopic list does.
    let intro_height = (intro.len() as u16).min(area.height / 2);
    let check_height = if check.is_empty() {
        0
    } else {
        (check.len() as u16 + 2).min(area.height / 4)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(intro_height),
            Constraint::Min(3),
            Constraint::Length(check_height),
        ])
        .split(area);

    f.render_widget(Paragraph::new(intro), chunks[0]);
    render_subtopic_list(f, app, topic, chunks[1]);
    if check_height > 0 {
        let paragraph =
            Paragraph::new(check).block(panel_block(app, " Quick knowledge check ", false));
        f.render_widget(paragraph, chunks[2]);
    }
}

fn intro_lines(app: &App, topic: &Topic, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_wrapped(&mut lines, &topic.title, width, " ", app.style("page_title"));
    push_wrapped(&mut lines, &topic.description, width, " ", app.style("body"));

    let done = app.notebook.is_complete(&CompletionKey::topic(&topic.id));
    let key = app
        .keybindings
        .key_for(KbAction::ToggleComplete, KbContext::Global)
        .unwrap_or_default();
    let status = if done {
        Span::styled(
            format!(" {} Completed ({} to undo)", completion_mark(true), key),
            app.style("complete"),
        )
    } else {
        Span::styled(
            format!(" {} Not completed ({} to mark complete)", completion_mark(false), key),
            app.style("incomplete"),
        )
    };
    lines.push(Line::from(status));

    if let Some(overview) = &topic.overview {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(" Overview", app.style("heading"))));
        push_wrapped(&mut lines, overview, width, " ", app.style("body"));
    }

    if !topic.objectives.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            " Learning objectives",
            app.style("heading"),
        )));
        for objective in &topic.objectives {
            push_wrapped(&mut lines, objective, width, "  • ", app.style("body"));
        }
    }
    lines.push(Line::default());
    lines
}

fn knowledge_check_lines(app: &App, topic: &Topic, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, question) in topic.quiz.iter().enumerate() {
        let prefix = format!(" {}. ", i + 1);
        push_wrapped(
            &mut lines,
            question,
            width.saturating_sub(2),
            &prefix,
            app.style("body"),
        );
    }
    lines
}

fn render_subtopic_list(f: &mut Frame, app: &App, topic: &Topic, area: Rect) {
    let focused = app.effective_focus() == Focus::Main;

    let items: Vec<ListItem> = topic
        .subtopics
        .iter()
        .enumerate()
        .map(|(i, sub)| {
            let done = app
                .notebook
                .is_complete(&CompletionKey::subtopic(&topic.id, &sub.id));
            let mut first = vec![
                Span::styled(format!(" {} ", completion_mark(done)), app.style("muted")),
                Span::styled(format!("{}. {}", i + 1, sub.title), app.style("sidebar_topic")),
            ];
            if let Some(duration) = &sub.duration {
                first.push(Span::styled(format!("  ({})", duration), app.style("muted")));
            }
            ListItem::new(vec![
                Line::from(first),
                Line::from(Span::styled(
                    format!("      {}", sub.description),
                    app.style("muted"),
                )),
            ])
        })
        .collect();

    let mut state = ListState::default();
    if focused && !items.is_empty() {
        state.select(Some(app.selected_item.min(items.len() - 1)));
    }

    let title = format!(" Subtopics ({}) ", topic.subtopics.len());
    let list = List::new(items)
        .block(panel_block(app, title, focused))
        .highlight_style(app.style("selected"));
    f.render_stateful_widget(list, area, &mut state);
}
