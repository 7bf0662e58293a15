use thiserror::Error;

/// Workspace-wide error taxonomy.
///
/// Per-record input problems surface as `Validation` and never abort a
/// batch; `Database` covers infrastructure failures of the persistence
/// layer; `Conflict` is the constraint-violation subtype (duplicate
/// reference, duplicate account code, unbalanced write rejected by a
/// CHECK constraint) and is always fatal to the single attempt that
/// triggered it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Database error: {0}")]
    Database(anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Map an sqlx error, turning unique/check constraint violations into
    /// `Conflict` so callers can distinguish "the store rejected this
    /// write" from "the store is unreachable".
    pub fn from_sqlx(context: &str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err)
                if db_err.is_unique_violation() || db_err.is_check_violation() =>
            {
                AppError::Conflict(anyhow::anyhow!("{}: {}", context, err))
            }
            sqlx::Error::RowNotFound => {
                AppError::NotFound(anyhow::anyhow!("{}: row not found", context))
            }
            _ => AppError::Database(anyhow::anyhow!("{}: {}", context, err)),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(anyhow::Error::new(err))
    }
}
