//! Input handling for the TUI.
//!
//! Overlays capture keys first (help, then search typing); everything else
//! is looked up in the keybinding registry for the current context.

use crate::app::{App, PAGE_LINES};
use crate::keybindings::Action as KbAction;
use crate::progress::CompletionKey;
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    // Help overlay captures all keys when visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.search_mode {
        handle_search_input(app, code, modifiers);
        return Ok(Action::Continue);
    }

    let action = app
        .keybindings
        .action_for_key(code, modifiers, app.context());

    match action {
        Some(KbAction::Quit) => return Ok(Action::Quit),
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::CycleFocus) => app.cycle_focus(),
        Some(KbAction::Back) => app.back(),
        Some(KbAction::Select) => app.select(),
        Some(KbAction::GoHome) => app.go_home(),
        Some(KbAction::EnterSearch) => app.enter_search(),
        Some(KbAction::ToggleComplete) => toggle_complete(app).await,
        Some(KbAction::ToggleTheme) => {
            let dark = app.notebook.toggle_dark_mode().await;
            app.sync_theme();
            app.set_status(if dark { "Dark mode on" } else { "Dark mode off" });
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::ToggleSidebar) => app.toggle_sidebar(),
        Some(KbAction::ExpandTopic) => app.expand_selected(),
        Some(KbAction::CollapseTopic) => app.collapse_selected(),
        Some(KbAction::ScrollDown) => {
            app.scroll_down(1);
            app.clamp_reader_scroll();
        }
        Some(KbAction::ScrollUp) => app.scroll_up(1),
        Some(KbAction::PageDown) => {
            app.scroll_down(PAGE_LINES);
            app.clamp_reader_scroll();
        }
        Some(KbAction::PageUp) => app.scroll_up(PAGE_LINES),
        Some(KbAction::OpenImage) => app.open_image(),
        Some(KbAction::StartQuiz) => app.start_quiz(),
        Some(KbAction::ChooseOption) => app.quiz_choose(),
        Some(KbAction::QuizConfirm) => app.quiz_confirm(),
        Some(KbAction::RetakeQuiz) => app.quiz_retake(),
        // Search actions are handled by the search field itself
        Some(KbAction::ExitSearch) | Some(KbAction::CommitSearch) | None => {}
    }
    Ok(Action::Continue)
}

/// Flip the completion mark of the topic under the cursor and persist it.
async fn toggle_complete(app: &mut App) {
    let Some(topic) = app.completion_target() else {
        return;
    };
    let key = CompletionKey::topic(topic.id.clone());
    let title = topic.title.clone();

    let now_complete = app.notebook.toggle_completion(&key).await;
    app.set_status(if now_complete {
        format!("Marked \"{}\" complete", title)
    } else {
        format!("Marked \"{}\" incomplete", title)
    });
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while typing a query. Results update on every keystroke.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Only the search context's own bindings apply; everything else is text.
    match app
        .keybindings
        .action_for_key(code, modifiers, app.context())
    {
        Some(KbAction::ExitSearch) => return app.exit_search(),
        Some(KbAction::CommitSearch) => return app.commit_search(),
        _ => {}
    }

    match code {
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if app.notebook.query().chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return;
            }
            app.push_search_char(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::navigation::Page;
    use crate::notebook::Notebook;
    use crate::storage::Database;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let notebook = Notebook::init(Arc::new(Catalog::builtin().unwrap()), db).await;
        App::new(notebook, &Config::default())
    }

    async fn press(app: &mut App, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE).await.unwrap()
    }

    async fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = test_app().await;
        assert!(matches!(press(&mut app, KeyCode::Char('q')).await, Action::Quit));
    }

    #[tokio::test]
    async fn test_typing_q_in_search_does_not_quit() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('/')).await;
        let action = press(&mut app, KeyCode::Char('q')).await;
        assert!(matches!(action, Action::Continue));
        assert_eq!(app.notebook.query(), "q");
    }

    #[tokio::test]
    async fn test_search_then_open_result() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('/')).await;
        type_str(&mut app, "Context Switch").await;
        press(&mut app, KeyCode::Enter).await;
        assert!(!app.search_mode);
        // The topic's own hit comes first, then the subtopic.
        assert_eq!(app.notebook.hits().len(), 2);

        press(&mut app, KeyCode::Char('j')).await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(
            app.notebook.page(),
            &Page::subtopic("process-management", "context-switching")
        );
        assert_eq!(app.notebook.query(), "");
    }

    #[tokio::test]
    async fn test_backspace_and_escape_in_search() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('/')).await;
        type_str(&mut app, "mem").await;
        press(&mut app, KeyCode::Backspace).await;
        assert_eq!(app.notebook.query(), "me");

        press(&mut app, KeyCode::Esc).await;
        assert!(!app.search_mode);
        assert!(!app.notebook.is_searching());
    }

    #[tokio::test]
    async fn test_query_length_capped() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('/')).await;
        type_str(&mut app, &"a".repeat(MAX_SEARCH_QUERY_LENGTH + 5)).await;
        assert_eq!(app.notebook.query().len(), MAX_SEARCH_QUERY_LENGTH);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_toggle_complete_on_home_selection() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('j')).await;
        press(&mut app, KeyCode::Char('c')).await;

        assert!(app
            .notebook
            .is_complete(&CompletionKey::topic("process-management")));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Marked \"Process Management\" complete");

        press(&mut app, KeyCode::Char('c')).await;
        assert!(app.notebook.completed().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_theme_updates_styles() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('T')).await;
        assert!(app.notebook.dark_mode());
        assert_eq!(app.theme_variant, crate::theme::ThemeVariant::Dark);
    }

    #[tokio::test]
    async fn test_reader_keys_scroll_instead_of_navigate() {
        let mut app = test_app().await;
        app.go_to(Page::subtopic("intro-os", "os-services"));
        app.reader_line_count = 100;
        app.reader_visible_lines = 10;

        press(&mut app, KeyCode::Char('j')).await;
        assert_eq!(app.scroll_offset, 1);
        handle_input(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL)
            .await
            .unwrap();
        assert_eq!(app.scroll_offset, 21);
        press(&mut app, KeyCode::Esc).await;
        assert_eq!(app.notebook.page(), &Page::topic("intro-os"));
    }

    #[tokio::test]
    async fn test_quiz_keys() {
        let mut app = test_app().await;
        app.go_to(Page::subtopic("process-management", "pcb"));
        press(&mut app, KeyCode::Char('z')).await;
        assert!(app.quiz.is_some());

        press(&mut app, KeyCode::Char(' ')).await;
        assert!(app.quiz.as_ref().unwrap().session.selected().is_some());
        press(&mut app, KeyCode::Esc).await;
        assert!(app.quiz.is_none());
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('?')).await;
        assert!(app.show_help);
        assert!(matches!(press(&mut app, KeyCode::Char('q')).await, Action::Continue));
        assert!(!app.show_help);
    }
}
