use crate::catalog::Topic;
use crate::config::Config;
use crate::keybindings::{Context as KbContext, KeybindingRegistry};
use crate::navigation::Page;
use crate::notebook::Notebook;
use crate::quiz::{QuizPhase, QuizSession};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::resolve_image;
use ratatui::style::Style;
use std::borrow::Cow;
use std::collections::HashSet;
use tokio::time::Instant;

/// Maximum scroll offset for the lesson view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Lines moved by a page scroll.
pub const PAGE_LINES: usize = 20;

// ============================================================================
// Focus and Sidebar Rows
// ============================================================================

/// Which panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Main,
}

/// A visible row of the sidebar tree, as indices into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarRow {
    Topic(usize),
    Subtopic(usize, usize),
}

impl SidebarRow {
    pub fn topic_index(self) -> usize {
        match self {
            Self::Topic(t) | Self::Subtopic(t, _) => t,
        }
    }
}

// ============================================================================
// Quiz Overlay
// ============================================================================

/// An open quiz: the session plus the option cursor.
pub struct QuizOverlay {
    pub subtopic_title: String,
    pub session: QuizSession,
    pub cursor: usize,
}

impl QuizOverlay {
    fn option_count(&self) -> usize {
        self.session
            .current_question()
            .map_or(0, |q| q.options.len())
    }

    pub fn cursor_down(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.cursor = self.cursor.saturating_add(1).min(count - 1);
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Select the option under the cursor.
    pub fn choose(&mut self) -> bool {
        let option_id = self
            .session
            .current_question()
            .and_then(|q| q.options.get(self.cursor))
            .map(|o| o.id.clone());
        match option_id {
            Some(id) => self.session.select(&id),
            None => false,
        }
    }

    /// Submit (choosing the cursor option if nothing is selected yet), move
    /// past a reviewed question, or report `false` once the quiz is over.
    /// A question with no options can't be answered and also reports `false`.
    pub fn confirm(&mut self) -> bool {
        match self.session.phase() {
            QuizPhase::Answering => {
                if self.session.selected().is_none() {
                    self.choose();
                }
                self.session.submit()
            }
            QuizPhase::Reviewing => {
                self.session.advance();
                self.cursor = 0;
                true
            }
            QuizPhase::Finished => false,
        }
    }

    pub fn retake(&mut self) {
        self.session.reset();
        self.cursor = 0;
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state: the notebook plus everything only the
/// terminal front end cares about.
pub struct App {
    pub notebook: Notebook,

    // Theme
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering, rebuilt when the display mode flips.
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    pub focus: Focus,
    /// Typing into the search field.
    pub search_mode: bool,
    pub selected_sidebar: usize,
    /// Topics whose subtopics are listed in the sidebar. Not persisted.
    pub expanded_topics: HashSet<String>,
    /// Selection in the main panel's list (home topics, topic subtopics or search hits).
    pub selected_item: usize,
    pub scroll_offset: usize,

    /// Lesson viewport height from the last render, for scroll clamping.
    pub reader_visible_lines: usize,
    /// Lesson length in display lines from the last render.
    pub reader_line_count: usize,
    /// `(line, src)` of every image reference in the rendered lesson.
    pub image_lines: Vec<(usize, String)>,

    pub quiz: Option<QuizOverlay>,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    pub image_base: Option<String>,
    pub sidebar_min_width: u16,
    /// Terminal width from the last render.
    pub terminal_width: u16,
}

impl App {
    /// Build the front-end state around `notebook`, applying the config's
    /// keybinding overrides.
    pub fn new(notebook: Notebook, config: &Config) -> Self {
        let variant = ThemeVariant::from_dark_mode(notebook.dark_mode());

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!(warning = %warning, "Keybinding override skipped");
        }

        Self {
            notebook,
            theme_variant: variant,
            theme: StyleMap::from_palette(&variant.palette()),
            keybindings,
            focus: Focus::Main,
            search_mode: false,
            selected_sidebar: 0,
            expanded_topics: HashSet::new(),
            selected_item: 0,
            scroll_offset: 0,
            reader_visible_lines: 0,
            reader_line_count: 0,
            image_lines: Vec::new(),
            quiz: None,
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
            image_base: config.image_base.clone(),
            sidebar_min_width: config.sidebar_min_width,
            terminal_width: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Rebuild the style map from the notebook's display mode.
    pub fn sync_theme(&mut self) {
        let variant = ThemeVariant::from_dark_mode(self.notebook.dark_mode());
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Keybinding context for the current state. Overlays win over panels.
    pub fn context(&self) -> KbContext {
        if self.quiz.is_some() {
            KbContext::Quiz
        } else if self.search_mode {
            KbContext::Search
        } else if self.effective_focus() == Focus::Sidebar {
            KbContext::Sidebar
        } else if !self.notebook.is_searching()
            && matches!(self.notebook.page(), Page::Subtopic { .. })
        {
            KbContext::Reader
        } else {
            KbContext::Global
        }
    }

    // ========================================================================
    // Sidebar
    // ========================================================================

    pub fn sidebar_docked(&self) -> bool {
        self.terminal_width >= self.sidebar_min_width
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_docked() || self.notebook.sidebar_open()
    }

    /// Focus, corrected for a sidebar that is no longer on screen.
    pub fn effective_focus(&self) -> Focus {
        if self.focus == Focus::Sidebar && !self.sidebar_visible() {
            Focus::Main
        } else {
            self.focus
        }
    }

    /// Flattened sidebar tree: every topic, followed by its subtopics when expanded.
    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for (ti, topic) in self.notebook.catalog().iter().enumerate() {
            rows.push(SidebarRow::Topic(ti));
            if self.expanded_topics.contains(&topic.id) {
                rows.extend((0..topic.subtopics.len()).map(|si| SidebarRow::Subtopic(ti, si)));
            }
        }
        rows
    }

    pub fn row_page(&self, row: SidebarRow) -> Option<Page> {
        let topics = self.notebook.catalog().topics();
        match row {
            SidebarRow::Topic(ti) => topics.get(ti).map(|t| Page::topic(t.id.clone())),
            SidebarRow::Subtopic(ti, si) => {
                let topic = topics.get(ti)?;
                let sub = topic.subtopics.get(si)?;
                Some(Page::subtopic(topic.id.clone(), sub.id.clone()))
            }
        }
    }

    /// Row matching the current page, or its topic's row when the subtopic
    /// is collapsed away.
    pub fn active_sidebar_row(&self, rows: &[SidebarRow]) -> Option<usize> {
        let page = self.notebook.page();
        rows.iter()
            .position(|&r| self.row_page(r).as_ref() == Some(page))
            .or_else(|| {
                let parent = page.parent();
                rows.iter()
                    .position(|&r| self.row_page(r).as_ref() == Some(&parent))
            })
    }

    fn sync_sidebar_selection(&mut self) {
        let rows = self.sidebar_rows();
        if let Some(i) = self.active_sidebar_row(&rows) {
            self.selected_sidebar = i;
        }
    }

    /// Docked: move focus between sidebar and page. Narrow: open or close the overlay.
    pub fn toggle_sidebar(&mut self) {
        if self.sidebar_docked() {
            self.cycle_focus();
        } else if self.notebook.sidebar_open() {
            self.notebook.set_sidebar_open(false);
            self.focus = Focus::Main;
        } else {
            self.notebook.set_sidebar_open(true);
            self.focus = Focus::Sidebar;
            self.sync_sidebar_selection();
        }
    }

    pub fn cycle_focus(&mut self) {
        if !self.sidebar_visible() {
            return;
        }
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Main,
            Focus::Main => {
                self.sync_sidebar_selection();
                Focus::Sidebar
            }
        };
    }

    pub fn expand_selected(&mut self) {
        let Some(row) = self.sidebar_rows().get(self.selected_sidebar).copied() else {
            return;
        };
        if let Some(topic) = self.notebook.catalog().topics().get(row.topic_index()) {
            self.expanded_topics.insert(topic.id.clone());
        }
    }

    /// Collapse the selected topic (or the parent of a selected subtopic),
    /// leaving the selection on the topic row.
    pub fn collapse_selected(&mut self) {
        let Some(row) = self.sidebar_rows().get(self.selected_sidebar).copied() else {
            return;
        };
        let ti = row.topic_index();
        if let Some(topic) = self.notebook.catalog().topics().get(ti) {
            self.expanded_topics.remove(&topic.id);
        }
        self.selected_sidebar = self
            .sidebar_rows()
            .iter()
            .position(|r| *r == SidebarRow::Topic(ti))
            .unwrap_or(0);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Show `page`, resetting every per-page cursor. The page's topic is
    /// expanded in the sidebar.
    pub fn go_to(&mut self, page: Page) {
        if let Some(id) = page.topic_id() {
            self.expanded_topics.insert(id.to_string());
        }
        let keep_sidebar = self.sidebar_docked() && self.focus == Focus::Sidebar;
        self.notebook.go_to(page);

        self.search_mode = false;
        self.focus = if keep_sidebar { Focus::Sidebar } else { Focus::Main };
        self.selected_item = 0;
        self.scroll_offset = 0;
        self.reader_line_count = 0;
        self.image_lines.clear();
        self.quiz = None;
        self.sync_sidebar_selection();
    }

    pub fn go_home(&mut self) {
        self.go_to(Page::Home);
    }

    /// Number of entries in the main panel's list.
    pub fn main_list_len(&self) -> usize {
        if self.notebook.is_searching() {
            return self.notebook.hits().len();
        }
        match self.notebook.page() {
            Page::Home => self.notebook.catalog().len(),
            Page::Topic { .. } => self
                .notebook
                .current_topic()
                .map_or(0, |t| t.subtopics.len()),
            Page::Subtopic { .. } => 0,
        }
    }

    fn selected_main_page(&self) -> Option<Page> {
        if self.notebook.is_searching() {
            return self.notebook.hits().get(self.selected_item).map(|h| h.target());
        }
        match self.notebook.page() {
            Page::Home => self
                .notebook
                .catalog()
                .topics()
                .get(self.selected_item)
                .map(|t| Page::topic(t.id.clone())),
            Page::Topic { topic_id } => self
                .notebook
                .current_topic()?
                .subtopics
                .get(self.selected_item)
                .map(|s| Page::subtopic(topic_id.clone(), s.id.clone())),
            Page::Subtopic { .. } => None,
        }
    }

    /// Position of `page` within its parent's list.
    fn child_index(&self, page: &Page) -> Option<usize> {
        let catalog = self.notebook.catalog();
        match page {
            Page::Home => None,
            Page::Topic { topic_id } => catalog.topics().iter().position(|t| &t.id == topic_id),
            Page::Subtopic {
                topic_id,
                subtopic_id,
            } => catalog
                .topic(topic_id)?
                .subtopics
                .iter()
                .position(|s| &s.id == subtopic_id),
        }
    }

    /// Open whatever is selected in the focused panel.
    pub fn select(&mut self) {
        let target = match self.effective_focus() {
            Focus::Sidebar => self
                .sidebar_rows()
                .get(self.selected_sidebar)
                .and_then(|&r| self.row_page(r)),
            Focus::Main => self.selected_main_page(),
        };
        if let Some(page) = target {
            self.go_to(page);
        }
    }

    /// Step back one level: close the quiz, then the sidebar overlay, then
    /// the search results, then leave the sidebar, then go up a page.
    pub fn back(&mut self) {
        if self.quiz.take().is_some() {
            return;
        }
        if self.notebook.sidebar_open() {
            self.notebook.set_sidebar_open(false);
            self.focus = Focus::Main;
            return;
        }
        if self.notebook.is_searching() {
            self.notebook.clear_search();
            self.selected_item = 0;
            return;
        }
        if self.focus == Focus::Sidebar {
            self.focus = Focus::Main;
            return;
        }
        let current = self.notebook.page().clone();
        if current != Page::Home {
            self.go_to(current.parent());
            self.selected_item = self.child_index(&current).unwrap_or(0);
        }
    }

    pub fn nav_up(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.cursor_up();
            return;
        }
        match self.effective_focus() {
            Focus::Sidebar => self.selected_sidebar = self.selected_sidebar.saturating_sub(1),
            Focus::Main => self.selected_item = self.selected_item.saturating_sub(1),
        }
    }

    pub fn nav_down(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.cursor_down();
            return;
        }
        match self.effective_focus() {
            Focus::Sidebar => {
                let max_index = self.sidebar_rows().len().saturating_sub(1);
                self.selected_sidebar = self.selected_sidebar.saturating_add(1).min(max_index);
            }
            Focus::Main => {
                let len = self.main_list_len();
                if len > 0 {
                    self.selected_item = self.selected_item.saturating_add(1).min(len - 1);
                }
            }
        }
    }

    /// The topic a completion toggle applies to: the sidebar row's topic,
    /// the selected home entry or search hit, else the page's topic.
    pub fn completion_target(&self) -> Option<&Topic> {
        let catalog = self.notebook.catalog();
        match self.effective_focus() {
            Focus::Sidebar => {
                let row = self.sidebar_rows().get(self.selected_sidebar).copied()?;
                catalog.topics().get(row.topic_index())
            }
            Focus::Main if self.notebook.is_searching() => {
                let hit = self.notebook.hits().get(self.selected_item)?;
                catalog.topic(&hit.topic_id)
            }
            Focus::Main => match self.notebook.page() {
                Page::Home => catalog.topics().get(self.selected_item),
                _ => self.notebook.current_topic(),
            },
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.focus = Focus::Main;
        self.selected_item = 0;
    }

    /// Leave the search field and drop the results.
    pub fn exit_search(&mut self) {
        self.search_mode = false;
        self.notebook.clear_search();
        self.selected_item = 0;
    }

    /// Leave the search field, keeping the results for browsing.
    pub fn commit_search(&mut self) {
        self.search_mode = false;
        self.selected_item = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut query = self.notebook.query().to_string();
        query.push(c);
        self.notebook.set_query(query);
        self.selected_item = 0;
    }

    pub fn pop_search_char(&mut self) {
        let mut query = self.notebook.query().to_string();
        query.pop();
        self.notebook.set_query(query);
        self.selected_item = 0;
    }

    // ========================================================================
    // Lesson Scrolling and Images
    // ========================================================================

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp scroll offset so the last page of content stays in view.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    /// Clamp using the sizes recorded by the last lesson render.
    pub fn clamp_reader_scroll(&mut self) {
        self.clamp_scroll(self.reader_line_count, self.reader_visible_lines);
    }

    /// The first image at or below the scroll position, else the last one above it.
    pub fn image_in_view(&self) -> Option<&str> {
        self.image_lines
            .iter()
            .find(|(line, _)| *line >= self.scroll_offset)
            .or_else(|| self.image_lines.last())
            .map(|(_, src)| src.as_str())
    }

    /// Open the image in view with the system viewer.
    pub fn open_image(&mut self) {
        let Some(src) = self.image_in_view() else {
            self.set_status("No diagram in view");
            return;
        };
        match resolve_image(src, self.image_base.as_deref()) {
            Ok(target) => match target.open() {
                Ok(()) => self.set_status(format!("Opened {}", target)),
                Err(e) => self.set_status(format!("Failed to open viewer: {}", e)),
            },
            Err(e) => {
                tracing::debug!(error = %e, "Image reference not resolvable");
                self.set_status(format!("Cannot open diagram: {}", e));
            }
        }
    }

    // ========================================================================
    // Quiz
    // ========================================================================

    pub fn start_quiz(&mut self) {
        let Some(sub) = self.notebook.current_subtopic() else {
            return;
        };
        if sub.quiz.is_empty() {
            self.set_status("This lesson has no quiz");
            return;
        }
        self.quiz = Some(QuizOverlay {
            subtopic_title: sub.title.clone(),
            session: QuizSession::new(sub.quiz.clone()),
            cursor: 0,
        });
    }

    pub fn quiz_choose(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.choose();
        }
    }

    /// Enter in the quiz. Closes the overlay after the score screen.
    pub fn quiz_confirm(&mut self) {
        let keep_open = self.quiz.as_mut().is_some_and(|q| q.confirm());
        if !keep_open {
            self.quiz = None;
        }
    }

    pub fn quiz_retake(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.retake();
        }
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
