//! Translation of sqlx failures into storage errors.

use reviews_core::store::StoreError;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error onto [`StoreError`].
///
/// Unique violations keep the violated constraint name so callers can tell a
/// taken slug from a duplicate head row.
pub fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::UniqueViolation {
                constraint: db_err.constraint().unwrap_or("unknown").to_string(),
            };
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// Map a content (de)serialization failure onto [`StoreError`].
pub fn content_error(table: &str, err: serde_json::Error) -> StoreError {
    tracing::error!(table, error = %err, "Malformed document content");
    StoreError::Backend(format!("Malformed content in {table}: {err}"))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_are_backend_failures() {
        assert_matches!(store_error(sqlx::Error::RowNotFound), StoreError::Backend(_));
        assert_matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::Backend(msg) if msg.contains("timed out")
        );
    }
}
