//! Integration tests for persisted notebook state: completion marks and the
//! display mode survive a restart, bad stored values fall back to defaults,
//! and failed writes never lose the in-memory change.

use std::path::PathBuf;
use std::sync::Arc;

use osnote::catalog::Catalog;
use osnote::navigation::Page;
use osnote::notebook::Notebook;
use osnote::progress::CompletionKey;
use osnote::storage::{Database, COMPLETED_KEY, DARK_MODE_KEY};
use pretty_assertions::assert_eq;

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin().unwrap())
}

/// A fresh database path under the system temp dir.
fn scratch_db(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "osnote_lifecycle_{}_{}.db",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

async fn open_notebook(path: &PathBuf) -> (Notebook, Database) {
    let db = Database::open(path.to_str().unwrap()).await.unwrap();
    let notebook = Notebook::init(catalog(), db.clone()).await;
    (notebook, db)
}

// ============================================================================
// Persistence Across Restarts
// ============================================================================

#[tokio::test]
async fn test_completion_survives_restart() {
    let path = scratch_db("completion");

    let (mut notebook, db) = open_notebook(&path).await;
    assert!(notebook.toggle_completion(&CompletionKey::topic("intro-os")).await);
    assert!(notebook.toggle_completion(&CompletionKey::topic("memory")).await);
    db.close().await;

    let (notebook, db) = open_notebook(&path).await;
    assert!(notebook.is_complete(&CompletionKey::topic("intro-os")));
    assert!(notebook.is_complete(&CompletionKey::topic("memory")));
    assert!(!notebook.is_complete(&CompletionKey::topic("file-systems")));
    assert_eq!(notebook.overall_progress().percentage(), 50);
    db.close().await;

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_dark_mode_survives_restart() {
    let path = scratch_db("dark_mode");

    let (mut notebook, db) = open_notebook(&path).await;
    assert!(!notebook.dark_mode());
    assert!(notebook.toggle_dark_mode().await);
    db.close().await;

    let (notebook, db) = open_notebook(&path).await;
    assert!(notebook.dark_mode());
    db.close().await;

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_completion_stored_canonically() {
    let db = Database::open(":memory:").await.unwrap();
    let mut notebook = Notebook::init(catalog(), db.clone()).await;

    notebook
        .toggle_completion(&CompletionKey::topic("process-management"))
        .await;
    notebook
        .toggle_completion(&CompletionKey::topic("intro-os"))
        .await;

    let stored = db.get_preference(COMPLETED_KEY).await.unwrap();
    assert_eq!(
        stored.as_deref(),
        Some(r#"["intro-os","process-management"]"#)
    );
}

#[tokio::test]
async fn test_reset_progress_clears_storage() {
    let path = scratch_db("reset");

    let (mut notebook, db) = open_notebook(&path).await;
    notebook.toggle_completion(&CompletionKey::topic("memory")).await;
    notebook.reset_progress().await;
    assert_eq!(notebook.overall_progress().completed, 0);
    db.close().await;

    let (notebook, db) = open_notebook(&path).await;
    assert!(notebook.completed().is_empty());
    db.close().await;

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_navigation_leaves_progress_untouched() {
    let catalog: Catalog = serde_json::from_value::<Vec<_>>(serde_json::json!([
        {
            "id": "processes",
            "title": "Process Management",
            "description": "Creating and scheduling processes",
            "subtopics": [
                {"id": "scheduling", "title": "Scheduling", "description": "Choosing who runs next"}
            ]
        },
        {"id": "memory", "title": "Memory", "description": "Paging and segmentation"}
    ]))
    .map(Catalog::new)
    .unwrap();
    let catalog_before = catalog.clone();

    let db = Database::open(":memory:").await.unwrap();
    let mut notebook = Notebook::init(Arc::new(catalog), db).await;
    notebook
        .toggle_completion(&CompletionKey::topic("processes"))
        .await;
    let completed_before = notebook.completed().clone();

    assert_eq!(notebook.page(), &Page::Home);
    notebook.go_to_topic("processes");
    assert_eq!(notebook.page(), &Page::topic("processes"));
    notebook.go_to_subtopic("processes", "scheduling");
    assert_eq!(notebook.page(), &Page::subtopic("processes", "scheduling"));
    notebook.go_home();

    assert_eq!(notebook.page(), &Page::Home);
    assert_eq!(notebook.completed(), &completed_before);
    assert_eq!(notebook.catalog(), &catalog_before);
}

// ============================================================================
// Malformed Stored Values
// ============================================================================

#[tokio::test]
async fn test_malformed_values_fall_back_to_defaults() {
    let db = Database::open(":memory:").await.unwrap();
    db.set_preference(DARK_MODE_KEY, "not json").await.unwrap();
    db.set_preference(COMPLETED_KEY, "{\"intro-os\": true}")
        .await
        .unwrap();

    let notebook = Notebook::init(catalog(), db).await;
    assert!(!notebook.dark_mode());
    assert!(notebook.completed().is_empty());
}

#[tokio::test]
async fn test_toggle_after_malformed_dark_mode_persists() {
    let db = Database::open(":memory:").await.unwrap();
    db.set_preference(DARK_MODE_KEY, "{{{").await.unwrap();

    let mut notebook = Notebook::init(catalog(), db.clone()).await;
    assert!(!notebook.dark_mode());
    assert!(notebook.toggle_dark_mode().await);
    assert_eq!(
        db.get_preference(DARK_MODE_KEY).await.unwrap().as_deref(),
        Some("true")
    );

    let reloaded = Notebook::init(catalog(), db).await;
    assert!(reloaded.dark_mode());
}

#[tokio::test]
async fn test_unknown_completion_keys_kept_but_not_counted() {
    let db = Database::open(":memory:").await.unwrap();
    db.set_preference(COMPLETED_KEY, r#"["intro-os","retired-topic"]"#)
        .await
        .unwrap();

    let notebook = Notebook::init(catalog(), db).await;
    assert_eq!(notebook.completed().len(), 2);
    assert_eq!(notebook.overall_progress().completed, 1);
    assert_eq!(notebook.overall_progress().total, 4);
}

// ============================================================================
// Write Failures
// ============================================================================

#[tokio::test]
async fn test_failed_write_keeps_in_memory_state() {
    let db = Database::open(":memory:").await.unwrap();
    let mut notebook = Notebook::init(catalog(), db.clone()).await;
    db.close().await;

    assert!(notebook.toggle_completion(&CompletionKey::topic("intro-os")).await);
    assert!(notebook.is_complete(&CompletionKey::topic("intro-os")));

    assert!(notebook.toggle_dark_mode().await);
    assert!(notebook.dark_mode());
}
