use crate::app::App;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Hints shown per context, as (action, label) pairs.
fn hint_actions(ctx: KbContext) -> &'static [(KbAction, &'static str)] {
    match ctx {
        KbContext::Search => &[
            (KbAction::ExitSearch, "cancel"),
            (KbAction::CommitSearch, "browse results"),
        ],
        KbContext::Quiz => &[
            (KbAction::ChooseOption, "choose"),
            (KbAction::QuizConfirm, "submit"),
            (KbAction::RetakeQuiz, "retake"),
            (KbAction::Back, "close"),
        ],
        KbContext::Reader => &[
            (KbAction::ScrollDown, "scroll"),
            (KbAction::PageDown, "page"),
            (KbAction::OpenImage, "diagram"),
            (KbAction::StartQuiz, "quiz"),
            (KbAction::Back, "back"),
            (KbAction::ShowHelp, "help"),
        ],
        KbContext::Sidebar => &[
            (KbAction::Select, "open"),
            (KbAction::ExpandTopic, "expand"),
            (KbAction::CollapseTopic, "collapse"),
            (KbAction::CycleFocus, "switch panel"),
            (KbAction::ShowHelp, "help"),
        ],
        KbContext::Global => &[
            (KbAction::Select, "open"),
            (KbAction::EnterSearch, "search"),
            (KbAction::ToggleComplete, "complete"),
            (KbAction::ToggleTheme, "theme"),
            (KbAction::ShowHelp, "help"),
            (KbAction::Quit, "quit"),
        ],
    }
}

/// Key hints for the current context, built from the live bindings.
pub(super) fn hints(app: &App) -> String {
    let ctx = app.context();
    hint_actions(ctx)
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_for(*action, ctx)
                .map(|key| format!("[{}] {}", key, label))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.search_mode {
        Cow::Owned(format!("Type to search  {}", hints(app)))
    } else {
        Cow::Owned(hints(app))
    };

    let paragraph = Paragraph::new(format!(" {}", text)).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
