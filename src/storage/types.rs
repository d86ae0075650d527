use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of osnote appears to be running. Please close it and try again.")]
    InstanceLocked,

    #[error("Database migration failed: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// SQLITE_BUSY and SQLITE_LOCKED mean another process holds the file.
    pub(crate) fn is_lock_message(message: &str) -> bool {
        let message = message.to_lowercase();
        [
            "database is locked",
            "database table is locked",
            "sqlite_busy",
            "sqlite_locked",
        ]
        .iter()
        .any(|needle| message.contains(needle))
    }

    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if Self::is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_messages_detected() {
        assert!(DatabaseError::is_lock_message("error returned from database: (code: 5) database is locked"));
        assert!(DatabaseError::is_lock_message("SQLITE_BUSY"));
        assert!(!DatabaseError::is_lock_message("no such table: user_preferences"));
    }

    #[test]
    fn test_pool_closed_is_other() {
        let err = DatabaseError::from_sqlx(sqlx::Error::PoolClosed);
        assert!(matches!(err, DatabaseError::Other(_)));
    }
}
