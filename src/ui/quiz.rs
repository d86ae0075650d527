//! Quiz overlay.

use crate::app::{App, QuizOverlay};
use crate::quiz::{OptionMark, QuizPhase};
use ratatui::{
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use super::helpers::{centered_rect, panel_block, push_wrapped};

/// Render the quiz overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App, quiz: &QuizOverlay) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 30 || overlay.height < 10 {
        return;
    }
    f.render_widget(Clear, overlay);

    let width = overlay.width.saturating_sub(4) as usize;
    let lines = match quiz.session.phase() {
        QuizPhase::Finished => score_lines(app, quiz, width),
        QuizPhase::Answering | QuizPhase::Reviewing => question_lines(app, quiz, width),
    };

    let title = format!(" Quiz: {} ", quiz.subtopic_title);
    let paragraph = Paragraph::new(lines)
        .block(panel_block(app, title, true))
        .style(app.style("body"));
    f.render_widget(paragraph, overlay);
}

fn question_lines(app: &App, quiz: &QuizOverlay, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let Some(question) = quiz.session.current_question() else {
        return lines;
    };
    let (n, total) = quiz.session.position();
    let reviewing = quiz.session.phase() == QuizPhase::Reviewing;

    lines.push(Line::from(Span::styled(
        format!(" Question {} of {}", n, total),
        app.style("muted"),
    )));
    lines.push(Line::default());
    push_wrapped(&mut lines, &question.question, width, " ", app.style("page_title"));
    lines.push(Line::default());

    for (i, option) in question.options.iter().enumerate() {
        let cursor = if i == quiz.cursor && !reviewing { "›" } else { " " };
        let letter = char::from(b'A' + (i % 26) as u8);
        let (marker, style) = match quiz.session.option_mark(option) {
            OptionMark::Plain => ("( )", app.style("body")),
            OptionMark::Selected => ("(•)", app.style("quiz_selected")),
            OptionMark::Correct => (" ✓ ", app.style("quiz_correct")),
            OptionMark::Wrong => (" ✗ ", app.style("quiz_wrong")),
        };
        let prefix = format!(" {} {} {}. ", cursor, marker, letter);
        push_wrapped(&mut lines, &option.text, width, &prefix, style);
    }

    lines.push(Line::default());
    if reviewing {
        let verdict = if quiz.session.is_correct(question) {
            Span::styled(" Correct!", app.style("quiz_correct"))
        } else {
            Span::styled(" Not quite.", app.style("quiz_wrong"))
        };
        lines.push(Line::from(verdict));
        if let Some(explanation) = question.explanation.as_deref().filter(|e| !e.trim().is_empty()) {
            push_wrapped(&mut lines, explanation, width, " ", app.style("muted"));
        }
        lines.push(Line::default());
        let next = if quiz.session.is_last() {
            " Enter: see results · Esc: close"
        } else {
            " Enter: next question · Esc: close"
        };
        lines.push(Line::from(Span::styled(next, app.style("muted"))));
    } else {
        lines.push(Line::from(Span::styled(
            " j/k: move · Space: choose · Enter: submit · Esc: close",
            app.style("muted"),
        )));
    }
    lines
}

fn score_lines(app: &App, quiz: &QuizOverlay, _width: usize) -> Vec<Line<'static>> {
    let score = quiz.session.score();
    let verdict_style = if score.percentage() >= 60 {
        app.style("quiz_correct")
    } else {
        app.style("quiz_wrong")
    };
    vec![
        Line::from(Span::styled(" Quiz complete", app.style("page_title"))),
        Line::default(),
        Line::from(vec![
            Span::styled(" Score: ", app.style("muted")),
            Span::styled(
                format!("{}/{} ({}%)", score.correct, score.total, score.percentage()),
                app.style("heading"),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {}", score.verdict().message()),
            verdict_style,
        )),
        Line::default(),
        Line::from(Span::styled(
            " r: retake · Enter/Esc: close",
            app.style("muted"),
        )),
    ]
}
