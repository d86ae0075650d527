//! The notebook's state container.
//!
//! Owns everything the views read: catalog, current page, search, the
//! sidebar overlay flag, completion marks and display mode. Every mutation
//! goes through a method here; the two persisted values are written through
//! to the database as soon as they change.

use std::sync::Arc;

use crate::catalog::{Catalog, Subtopic, Topic};
use crate::navigation::{breadcrumbs, Crumb, Page};
use crate::progress::{self, CatalogStats, CompletionKey, CompletionSet, Progress};
use crate::search::{SearchHit, SearchState};
use crate::storage::Database;

pub struct Notebook {
    catalog: Arc<Catalog>,
    db: Database,
    page: Page,
    search: SearchState,
    sidebar_open: bool,
    completed: CompletionSet,
    dark_mode: bool,
}

impl Notebook {
    /// Load persisted state and start on the home page.
    ///
    /// Missing or malformed stored values fall back to defaults (light mode,
    /// nothing completed); this never fails.
    pub async fn init(catalog: Arc<Catalog>, db: Database) -> Self {
        let completed = db.load_completions().await;
        let dark_mode = db.load_dark_mode().await;
        tracing::info!(
            topics = catalog.len(),
            completed = completed.len(),
            dark_mode,
            "Notebook ready"
        );

        Self {
            catalog,
            db,
            page: Page::Home,
            search: SearchState::default(),
            sidebar_open: false,
            completed,
            dark_mode,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn hits(&self) -> &[SearchHit] {
        self.search.hits()
    }

    /// Whether search results replace the page view.
    pub fn is_searching(&self) -> bool {
        self.search.is_searching()
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        self.page.resolve_topic(&self.catalog)
    }

    pub fn current_subtopic(&self) -> Option<&Subtopic> {
        self.page.resolve_subtopic(&self.catalog)
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        breadcrumbs(&self.catalog, &self.page)
    }

    pub fn is_complete(&self, key: &CompletionKey) -> bool {
        self.completed.contains(key)
    }

    pub fn overall_progress(&self) -> Progress {
        progress::overall(&self.catalog, &self.completed)
    }

    pub fn topic_progress(&self, topic: &Topic) -> Progress {
        progress::for_topic(topic, &self.completed)
    }

    pub fn stats(&self) -> CatalogStats {
        progress::stats(&self.catalog, &self.completed)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Show `page`. Clears the search and closes the sidebar overlay.
    pub fn go_to(&mut self, page: Page) {
        tracing::debug!(?page, "Navigate");
        self.page = page;
        self.search.clear();
        self.sidebar_open = false;
    }

    pub fn go_home(&mut self) {
        self.go_to(Page::Home);
    }

    pub fn go_to_topic(&mut self, topic_id: &str) {
        self.go_to(Page::topic(topic_id));
    }

    pub fn go_to_subtopic(&mut self, topic_id: &str, subtopic_id: &str) {
        self.go_to(Page::subtopic(topic_id, subtopic_id));
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.search.set_query(&self.catalog, query);
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    // ========================================================================
    // Persisted State
    // ========================================================================

    /// Flip `key`'s completion mark and persist the whole set. Returns whether
    /// the key is now complete.
    ///
    /// A failed write is logged; the in-memory change stands.
    pub async fn toggle_completion(&mut self, key: &CompletionKey) -> bool {
        let now_complete = self.completed.toggle(key);
        tracing::debug!(key = %key, now_complete, "Toggled completion");
        if let Err(e) = self.db.save_completions(&self.completed).await {
            tracing::warn!(error = %e, "Failed to persist completion set");
        }
        now_complete
    }

    /// Flip the display mode and persist it. Returns the new value.
    pub async fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        if let Err(e) = self.db.save_dark_mode(self.dark_mode).await {
            tracing::warn!(error = %e, "Failed to persist display mode");
        }
        self.dark_mode
    }

    /// Clear every completion mark, in memory and in storage.
    pub async fn reset_progress(&mut self) {
        self.completed = CompletionSet::new();
        if let Err(e) = self.db.clear_completions().await {
            tracing::warn!(error = %e, "Failed to clear stored completion set");
        }
    }
}
