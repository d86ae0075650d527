use anyhow::Result;

use super::schema::Database;

impl Database {
    // ========================================================================
    // User Preferences Operations
    // ========================================================================

    /// Get a single preference value by key, or `None` if not set.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a preference value (UPSERT), refreshing its timestamp.
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a preference. Returns whether it existed.
    pub async fn delete_preference(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_preference_missing() {
        let db = test_db().await;
        assert_eq!(db.get_preference("darkMode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_preference_upsert() {
        let db = test_db().await;
        db.set_preference("darkMode", "false").await.unwrap();
        db.set_preference("darkMode", "true").await.unwrap();

        let value = db.get_preference("darkMode").await.unwrap();
        assert_eq!(value, Some("true".to_string()));
    }

    #[tokio::test]
    async fn test_delete_preference() {
        let db = test_db().await;
        db.set_preference("completedTopics", "[]").await.unwrap();

        assert!(db.delete_preference("completedTopics").await.unwrap());
        assert!(!db.delete_preference("completedTopics").await.unwrap());
        assert_eq!(db.get_preference("completedTopics").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_preference_records_timestamp() {
        let db = test_db().await;
        db.set_preference("darkMode", "true").await.unwrap();

        let row: (String,) =
            sqlx::query_as("SELECT updated_at FROM user_preferences WHERE key = ?")
                .bind("darkMode")
                .fetch_one(&db.pool)
                .await
                .unwrap();
        assert!(!row.0.is_empty());
    }
}
