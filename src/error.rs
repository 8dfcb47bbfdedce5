use std::collections::HashMap;

/// The main error type for mooring operations
#[derive(Debug, thiserror::Error)]
pub enum MooringError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Session error: {0}")]
    Session(String),

    #[cfg(feature = "sessions-db")]
    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl MooringError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Add context to this error, returning an ErrorWithContext
    pub fn with_context(self, context: ErrorContext) -> ErrorWithContext {
        ErrorWithContext::new(self, context)
    }
}

/// Error context for additional error information
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Additional error details
    pub details: Option<String>,
    /// Contextual key-value pairs
    pub context: HashMap<String, String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details = Some(detail.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Error with attached context
///
/// Allows attaching context to a MooringError while still being usable
/// as a MooringError via `Into`.
#[derive(Debug)]
pub struct ErrorWithContext {
    error: MooringError,
    context: ErrorContext,
}

impl ErrorWithContext {
    pub fn new(error: MooringError, context: ErrorContext) -> Self {
        Self { error, context }
    }

    pub fn error(&self) -> &MooringError {
        &self.error
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }
}

impl std::fmt::Display for ErrorWithContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(ref details) = self.context.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorWithContext {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<ErrorWithContext> for MooringError {
    fn from(err: ErrorWithContext) -> Self {
        err.error
    }
}

/// Result type alias for mooring operations
pub type Result<T> = std::result::Result<T, MooringError>;

#[cfg(feature = "sessions-db")]
impl From<sea_orm::DbErr> for MooringError {
    fn from(err: sea_orm::DbErr) -> Self {
        match &err {
            sea_orm::DbErr::Conn(inner) => {
                MooringError::Database(format!("Connection error: {}", inner))
            }
            sea_orm::DbErr::Query(inner) => {
                MooringError::Database(format!("Query error: {}", inner))
            }
            sea_orm::DbErr::Exec(inner) => {
                MooringError::Database(format!("Execution error: {}", inner))
            }
            _ => MooringError::Database(format!("Database error: {}", err)),
        }
    }
}
