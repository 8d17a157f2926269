//! # Engine Error Types
//!
//! ## Error Stack
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Engine Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────────────┐      ┌─────────────────────────────────┐  │
//! │  │  Domain (CoreError)     │      │  Store (StoreError)             │  │
//! │  │                         │      │                                 │  │
//! │  │  NotFound               │      │  Db(DbError)                    │  │
//! │  │  NotAvailable           │      │  NotFound ─► NOT_FOUND          │  │
//! │  │                         │      │  Conflict ─► INVALID_TRANSITION │  │
//! │  │  Forbidden              │      │  Unavailable                    │  │
//! │  │  InvalidTransition      │      │  Duplicate  ─► INVALID_INPUT    │  │
//! │  │  CarInUse               │      │                                 │  │
//! │  │  Validation             │      │                                 │  │
//! │  └─────────────────────────┘      └─────────────────────────────────┘  │
//! │                 │                               │                       │
//! │                 └───────────────┬───────────────┘                       │
//! │                                 ▼                                       │
//! │                 ApiError { code: ErrorCode, message }                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use rental_core::{CoreError, ValidationError};
use rental_db::DbError;

// =============================================================================
// Store Error
// =============================================================================

/// Result type for [`crate::store::EntityStore`] operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the entity store itself, as opposed to domain refusals.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite backend failed.
    #[error("Database error: {0}")]
    Db(DbError),

    /// A write referenced an entity that is gone.
    ///
    /// ## When This Occurs
    /// - `commit_transition` for a booking whose car was deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A guarded write found the entity changed since it was read.
    ///
    /// ## When This Occurs
    /// - `commit_transition` lost a race on the same booking
    #[error("{entity} {id} was modified concurrently")]
    Conflict { entity: String, id: String },

    /// A uniqueness rule rejected the write.
    ///
    /// ## When This Occurs
    /// - Two signups raced for the same username
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// The store cannot serve requests (closed, poisoned, unreachable).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Conflict {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            DbError::Conflict { entity, id } => StoreError::Conflict { entity, id },
            DbError::UniqueViolation { field, value } => StoreError::Duplicate { field, value },
            DbError::ConnectionFailed(msg) => StoreError::Unavailable(msg),
            DbError::PoolExhausted => StoreError::Unavailable("connection pool exhausted".to_string()),
            other => StoreError::Db(other),
        }
    }
}

// =============================================================================
// Engine Error
// =============================================================================

/// Result type for engine and service operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error returned by every engine and service operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request was refused by a business rule.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Storage failed; propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Domain(CoreError::Validation(err))
    }
}

impl EngineError {
    /// Machine-readable category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Domain(err) => match err {
                CoreError::NotFound { .. } => ErrorCode::NotFound,
                CoreError::NotAvailable { .. } => ErrorCode::NotAvailable,
                CoreError::Forbidden { .. } => ErrorCode::Forbidden,
                CoreError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
                CoreError::CarInUse { .. } => ErrorCode::CarInUse,
                CoreError::Validation(_) => ErrorCode::InvalidInput,
            },
            EngineError::Store(StoreError::NotFound { .. }) => ErrorCode::NotFound,
            EngineError::Store(StoreError::Conflict { .. }) => ErrorCode::InvalidTransition,
            EngineError::Store(StoreError::Duplicate { .. }) => ErrorCode::InvalidInput,
            EngineError::Store(_) => ErrorCode::StoreError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Error codes for the presentation layer.
///
/// ## Usage in a Frontend
/// ```typescript
/// switch (e.code) {
///   case 'NOT_AVAILABLE':
///     showNotification('This car was just booked');
///     break;
///   case 'INVALID_INPUT':
///     showForm(e.message);
///     break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    NotAvailable,
    InvalidInput,
    Forbidden,
    InvalidTransition,
    CarInUse,
    StoreError,
}

/// Serializable error for whatever renders the booking screens.
///
/// ```json
/// { "code": "FORBIDDEN", "message": "User U005 is not allowed to approve booking B1" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let code = err.code();
        match err {
            // Storage details stay in the log
            EngineError::Store(StoreError::Db(db)) => {
                tracing::error!("Store operation failed: {}", db);
                ApiError::new(code, "Database operation failed")
            }
            other => ApiError::new(code, other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
