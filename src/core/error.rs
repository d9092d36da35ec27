//! Typed error handling for the orders service
//!
//! Two families of errors live here:
//!
//! - [`OrdersError`] is what callers of the coordinator (and HTTP clients) see:
//!   not-found, persistence failures, and boundary rejections. It maps onto an
//!   HTTP status and a JSON body.
//! - [`CacheError`] describes cache-layer trouble (unreachable backend, an entry
//!   that cannot be decoded). It never leaves the coordinator: every cache error
//!   is recovered locally by treating it as a miss or ignoring it.
//!
//! # Example
//!
//! ```rust,ignore
//! match coordinator.get_by_id(&id).await {
//!     Ok(order) => println!("Found: {:?}", order),
//!     Err(OrdersError::NotFound { id }) => println!("Order {} not found", id),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Result alias for coordinator operations
pub type OrdersResult<T> = Result<T, OrdersError>;

/// The main error type surfaced by the coordinator and the HTTP layer
#[derive(Debug)]
pub enum OrdersError {
    /// No order exists for the given id
    NotFound { id: Uuid },

    /// The record store could not complete the operation
    Persistence(PersistenceError),

    /// The create payload failed boundary validation
    Validation(ValidationError),

    /// The request itself was malformed (bad JSON, bad id)
    Request(RequestError),
}

impl fmt::Display for OrdersError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrdersError::NotFound { id } => write!(f, "Order with ID {} not found", id),
            OrdersError::Persistence(e) => write!(f, "{}", e),
            OrdersError::Validation(e) => write!(f, "{}", e),
            OrdersError::Request(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OrdersError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrdersError::NotFound { .. } => None,
            OrdersError::Persistence(e) => Some(e),
            OrdersError::Validation(e) => Some(e),
            OrdersError::Request(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl OrdersError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrdersError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrdersError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrdersError::Validation(_) => StatusCode::BAD_REQUEST,
            OrdersError::Request(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            OrdersError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrdersError::Persistence(_) => "PERSISTENCE_FAILURE",
            OrdersError::Validation(_) => "VALIDATION_ERROR",
            OrdersError::Request(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    ///
    /// Persistence failures are reported with a generic message; the backend
    /// detail only goes to the log.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            OrdersError::Persistence(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            OrdersError::NotFound { id } => Some(serde_json::json!({ "orderId": id.to_string() })),
            OrdersError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for OrdersError {
    fn into_response(self) -> Response {
        if let OrdersError::Persistence(e) = &self {
            tracing::error!(error = %e, "Request failed in the record store");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Persistence Errors
// =============================================================================

/// Errors raised by a record store backend
#[derive(Debug)]
pub enum PersistenceError {
    /// Could not reach the backend
    ConnectionError { backend: String, message: String },

    /// Statement execution failed
    QueryError { backend: String, message: String },

    /// A storage constraint rejected the record
    ConstraintViolation { constraint: String, message: String },
}

impl PersistenceError {
    pub fn connection(backend: &str, message: impl fmt::Display) -> Self {
        PersistenceError::ConnectionError {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }

    pub fn query(backend: &str, message: impl fmt::Display) -> Self {
        PersistenceError::QueryError {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            PersistenceError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            PersistenceError::ConstraintViolation {
                constraint,
                message,
            } => {
                write!(f, "Constraint '{}' violated: {}", constraint, message)
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<PersistenceError> for OrdersError {
    fn from(err: PersistenceError) -> Self {
        OrdersError::Persistence(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields are invalid
    FieldErrors(Vec<FieldValidationError>),
}

/// One invalid field
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", messages.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for OrdersError {
    fn from(err: ValidationError) -> Self {
        OrdersError::Validation(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Malformed requests rejected before validation
#[derive(Debug)]
pub enum RequestError {
    /// Body is not valid JSON for the expected shape
    InvalidJson { message: String },

    /// Path segment is not a UUID
    InvalidUuid { value: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidJson { .. } => "INVALID_JSON",
            RequestError::InvalidUuid { .. } => "INVALID_UUID",
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidJson { message } => write!(f, "Invalid JSON: {}", message),
            RequestError::InvalidUuid { value } => write!(f, "Invalid UUID format: {}", value),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for OrdersError {
    fn from(err: RequestError) -> Self {
        OrdersError::Request(err)
    }
}

// =============================================================================
// Cache Errors
// =============================================================================

/// Cache-layer failures, recovered inside the coordinator
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl CacheError {
    pub fn unavailable(backend: &str, message: impl fmt::Display) -> Self {
        CacheError::Unavailable {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }
}

/// Failures translating an order to or from its cached byte form
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode order: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode cached order: {0}")]
    Decode(#[source] serde_json::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration loading and validation
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file not found
    FileNotFound { path: String },

    /// Failed to read or parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A value is present but unusable
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::ParseError { file, message } => match file {
                Some(file) => write!(f, "Failed to parse configuration '{}': {}", file, message),
                None => write!(f, "Failed to parse configuration: {}", message),
            },
            ConfigError::InvalidValue { key, message } => {
                write!(f, "Invalid configuration value for '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
