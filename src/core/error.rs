//! Error - Tassonomia degli errori restituiti dai motori di dominio

use serde::Serialize;
use std::fmt;

/// Categoria dell'errore, indipendente dal trasporto che la espone
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The referenced entity does not exist (or the user is inactive)
    NotFound,
    /// The state already satisfies the request, or a uniqueness constraint collided
    Conflict,
    /// The request violates a business rule
    InvalidOperation,
    /// The actor lacks the required relationship with the resource
    Unauthorized,
    /// Unexpected store failure
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidOperation => "invalid operation",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    kind: ErrorKind,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn invalid_operation(message: &'static str) -> Self {
        Self::new(ErrorKind::InvalidOperation, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn internal(message: &'static str) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

/// True quando l'errore deriva da un vincolo UNIQUE / PRIMARY KEY violato
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return Self::conflict("Resource already exists").with_details(err.to_string());
        }

        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::internal("Database unavailable")
            }

            other => Self::internal("Internal server error").with_details(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::internal("Database migration failed").with_details(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::invalid_operation("Validation error").with_details(err.to_string())
    }
}
