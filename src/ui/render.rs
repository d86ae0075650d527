//! Render functions for the TUI.
//!
//! Routes to the page views and draws overlays on top.

use crate::app::App;
use crate::navigation::Page;
use crate::util::display_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use super::sidebar::SIDEBAR_WIDTH;
use super::{help, home, lesson, quiz, results, sidebar, status, topic};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    app.terminal_width = area.width;

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, chunks[1]);
    status::render(f, app, chunks[2]);

    if let Some(ref overlay) = app.quiz {
        quiz::render(f, app, overlay);
    }
    if app.show_help {
        help::render(f, app);
    }
}

/// Title and breadcrumbs on the left, search field and theme on the right.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let search = if app.search_mode {
        format!("Search: {}_", app.notebook.query())
    } else if app.notebook.is_searching() {
        format!("Search: {}", app.notebook.query())
    } else {
        "/ to search".to_string()
    };
    let right = format!("{}  {} ", search, app.theme_variant.name());
    let right_width = (display_width(&right) as u16).min(area.width / 2);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    let crumbs = app.notebook.breadcrumbs();
    let last = crumbs.len().saturating_sub(1);
    let mut spans = vec![Span::styled(" OS Notebook ", app.style("page_title"))];
    for (i, crumb) in crumbs.iter().enumerate() {
        spans.push(Span::styled(
            if i == 0 { "│ " } else { " › " },
            app.style("muted"),
        ));
        let style = if i == last {
            app.style("breadcrumb_current")
        } else {
            app.style("breadcrumb")
        };
        spans.push(Span::styled(crumb.label.clone(), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let search_style = if app.search_mode {
        app.style("search_input")
    } else {
        app.style("muted")
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(right, search_style))).alignment(Alignment::Right),
        chunks[1],
    );
}

/// Sidebar docked beside the page on wide terminals, drawn over it on narrow ones.
fn render_body(f: &mut Frame, app: &mut App, area: Rect) {
    if app.sidebar_docked() {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        sidebar::render(f, app, chunks[0]);
        render_main(f, app, chunks[1]);
        return;
    }

    render_main(f, app, area);
    if app.sidebar_visible() {
        let overlay = Rect {
            width: SIDEBAR_WIDTH.min(area.width),
            ..area
        };
        f.render_widget(Clear, overlay);
        sidebar::render(f, app, overlay);
    }
}

fn render_main(f: &mut Frame, app: &mut App, area: Rect) {
    if app.notebook.is_searching() {
        results::render(f, app, area);
        return;
    }
    match app.notebook.page() {
        Page::Home => home::render(f, app, area),
        Page::Topic { .. } => topic::render(f, app, area),
        Page::Subtopic { .. } => lesson::render(f, app, area),
    }
}

/// Placeholder for a page whose id no longer resolves.
pub(super) fn render_missing(f: &mut Frame, app: &App, area: Rect, msg: &str) {
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(format!(" {}", msg), app.style("error"))),
        Line::from(Span::styled(" Press Esc to go back.", app.style("muted"))),
    ]);
    f.render_widget(paragraph, area);
}
