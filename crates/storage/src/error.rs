use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found")]
    NotFound,

    /// A uniqueness rule was broken; the message is safe to show to users.
    #[error("{0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    fn sql_state(&self) -> Option<String> {
        match self {
            Self::Database(sqlx::Error::Database(e)) => e.code().map(|code| code.into_owned()),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    }

    /// Maps an insert failure: duplicates become `ConstraintViolation(duplicate)`
    /// and a vanished parent row becomes `NotFound`.
    pub(crate) fn on_insert(error: sqlx::Error, duplicate: impl FnOnce() -> String) -> Self {
        let error = Self::from(error);
        if error.is_unique_violation() {
            Self::ConstraintViolation(duplicate())
        } else if error.is_foreign_key_violation() {
            Self::NotFound
        } else {
            error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_are_not_constraint_violations() {
        let error = StorageError::on_insert(sqlx::Error::RowNotFound, || "duplicate".to_string());

        assert!(matches!(error, StorageError::Database(sqlx::Error::RowNotFound)));
        assert!(!error.is_unique_violation());
        assert!(!error.is_foreign_key_violation());
    }

    #[test]
    fn test_constraint_message_is_shown_verbatim() {
        let error = StorageError::ConstraintViolation("Slug already exists".to_string());
        assert_eq!(error.to_string(), "Slug already exists");
    }
}
