use anyhow::Result;

use super::schema::Database;
use crate::progress::CompletionSet;

/// Preference key for the display-mode flag (JSON boolean).
pub const DARK_MODE_KEY: &str = "darkMode";
/// Preference key for the completion set (JSON array of strings).
pub const COMPLETED_KEY: &str = "completedTopics";

impl Database {
    // ========================================================================
    // Notebook Settings
    // ========================================================================

    /// Read and decode `key`, substituting the default when the value is
    /// missing, unreadable or malformed.
    async fn load_or_default<T, E>(&self, key: &str, decode: impl FnOnce(&str) -> Result<T, E>) -> T
    where
        T: Default,
        E: std::fmt::Display,
    {
        match self.get_preference(key).await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Stored value is malformed, using default");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read stored value, using default");
                T::default()
            }
        }
    }

    /// Stored display mode. `false` when absent or malformed.
    pub async fn load_dark_mode(&self) -> bool {
        self.load_or_default(DARK_MODE_KEY, |raw| serde_json::from_str::<bool>(raw))
            .await
    }

    pub async fn save_dark_mode(&self, dark: bool) -> Result<()> {
        self.set_preference(DARK_MODE_KEY, if dark { "true" } else { "false" })
            .await
    }

    /// Stored completion set. Empty when absent or malformed.
    pub async fn load_completions(&self) -> CompletionSet {
        self.load_or_default(COMPLETED_KEY, CompletionSet::decode)
            .await
    }

    pub async fn save_completions(&self, completed: &CompletionSet) -> Result<()> {
        self.set_preference(COMPLETED_KEY, &completed.encode())
            .await
    }

    /// Forget all completion marks.
    pub async fn clear_completions(&self) -> Result<()> {
        self.delete_preference(COMPLETED_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CompletionKey;
    use pretty_assertions::assert_eq;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let db = test_db().await;
        assert!(!db.load_dark_mode().await);
        assert!(db.load_completions().await.is_empty());
    }

    #[tokio::test]
    async fn test_dark_mode_persists_as_json_bool() {
        let db = test_db().await;
        db.save_dark_mode(true).await.unwrap();
        assert_eq!(
            db.get_preference(DARK_MODE_KEY).await.unwrap().as_deref(),
            Some("true")
        );
        assert!(db.load_dark_mode().await);
    }

    #[tokio::test]
    async fn test_malformed_values_fall_back() {
        let db = test_db().await;
        db.set_preference(DARK_MODE_KEY, "not-json").await.unwrap();
        db.set_preference(COMPLETED_KEY, "{\"intro\": 1}").await.unwrap();

        assert!(!db.load_dark_mode().await);
        assert!(db.load_completions().await.is_empty());
    }

    #[tokio::test]
    async fn test_completions_stored_canonically() {
        let db = test_db().await;
        let mut set = CompletionSet::new();
        set.insert(&CompletionKey::topic("memory"));
        set.insert(&CompletionKey::subtopic("intro-os", "os-services"));
        db.save_completions(&set).await.unwrap();

        assert_eq!(
            db.get_preference(COMPLETED_KEY).await.unwrap().as_deref(),
            Some(r#"["intro-os-os-services","memory"]"#)
        );
        assert_eq!(db.load_completions().await, set);
    }

    #[tokio::test]
    async fn test_clear_completions() {
        let db = test_db().await;
        let set: CompletionSet = ["memory".to_string()].into_iter().collect();
        db.save_completions(&set).await.unwrap();
        db.save_dark_mode(true).await.unwrap();

        db.clear_completions().await.unwrap();
        assert!(db.load_completions().await.is_empty());
        assert!(db.load_dark_mode().await, "display mode is untouched");
    }

    #[tokio::test]
    async fn test_read_failure_falls_back() {
        let db = test_db().await;
        db.save_dark_mode(true).await.unwrap();
        db.close().await;
        assert!(!db.load_dark_mode().await);
    }
}
