//! Storage error taxonomy shared by every store implementation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("conflict: {0}")]
    Conflict(String),

    /// The row an update targeted disappeared
    #[error("{entity} {id} not found")]
    Missing { entity: &'static str, id: i64 },

    #[error("migration {module}/{id} failed: {source}")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}
