use thiserror::Error;

use crate::helpers::Transient;

/// SQLite primary result codes for `SQLITE_BUSY` and `SQLITE_LOCKED`.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The store could not take the lock or hand out a connection in time. Nothing was written.
    #[error("The database is busy. {0}")]
    Busy(String),
    #[error("A database constraint was violated. {0}")]
    ConstraintViolation(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Transient for StorageError {
    fn is_transient(&self) -> bool {
        matches!(self, StorageError::Busy(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut => StorageError::Busy(e.to_string()),
            sqlx::Error::Database(db) => {
                let primary_code = db.code().and_then(|c| c.parse::<i64>().ok()).map(|c| c & 0xff);
                if matches!(primary_code, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED)) {
                    StorageError::Busy(db.message().to_string())
                } else if db.is_unique_violation() || db.is_check_violation() || db.is_foreign_key_violation() {
                    StorageError::ConstraintViolation(db.message().to_string())
                } else {
                    StorageError::DatabaseError(e.to_string())
                }
            },
            _ => StorageError::DatabaseError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_busy_is_transient() {
        assert!(StorageError::Busy("locked".into()).is_transient());
        assert!(!StorageError::ConstraintViolation("sold <= capacity".into()).is_transient());
        assert!(!StorageError::DatabaseError("disk I/O error".into()).is_transient());
        assert!(!StorageError::InvalidInput("quantity".into()).is_transient());
    }

    #[test]
    fn pool_timeouts_are_busy() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StorageError::Busy(_)));
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StorageError::DatabaseError(_)));
    }
}
