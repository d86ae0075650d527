//! Helper functions shared across the UI widgets.

use crate::app::App;
use crate::util::{display_width, wrap_to_width};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// Marker shown next to completed items.
pub(super) const DONE_MARK: &str = "✓";
/// Marker shown next to items not yet completed.
pub(super) const TODO_MARK: &str = "○";

pub(super) fn completion_mark(done: bool) -> &'static str {
    if done {
        DONE_MARK
    } else {
        TODO_MARK
    }
}

/// Bordered panel whose border color follows focus.
pub(super) fn panel_block(app: &App, title: impl Into<String>, focused: bool) -> Block<'static> {
    let border = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title.into())
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Word-wrap `text` to `width` columns and append it as styled lines.
///
/// The first row starts with `first_prefix`; continuation rows are indented
/// by the same display width, giving list items a hanging indent.
pub(super) fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    width: usize,
    first_prefix: &str,
    style: Style,
) {
    let indent = display_width(first_prefix);
    let body_width = width.saturating_sub(indent).max(1);
    let continuation = " ".repeat(indent);

    for (i, row) in wrap_to_width(text, body_width).into_iter().enumerate() {
        let prefix = if i == 0 {
            first_prefix.to_string()
        } else {
            continuation.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(row, style),
        ]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_push_wrapped_hanging_indent() {
        let mut lines = Vec::new();
        push_wrapped(&mut lines, "one two three four", 10, "• ", Style::default());
        let rows: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(rows, vec!["• one two", "  three", "  four"]);
    }

    #[test]
    fn test_push_wrapped_empty_text_gives_one_row() {
        let mut lines = Vec::new();
        push_wrapped(&mut lines, "", 10, "", Style::default());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_centered_rect_within_parent() {
        let area = Rect::new(0, 0, 100, 50);
        let r = centered_rect(50, 50, area);
        assert_eq!(r, Rect::new(25, 12, 50, 25));
    }
}
