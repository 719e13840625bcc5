//! Typed error handling for the storefront backend
//!
//! Handlers and services return [`ShopError`] so that callers can match on the
//! failure category instead of string-sniffing a generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`EntityError`]: CRUD failures (not found, conflicts)
//! - [`OrderError`]: purchase-order business rules (terminal states, transitions)
//! - [`CourierError`]: courier dispatch failures
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ValidationError`]: request payload validation
//! - [`StorageError`]: storage backend failures
//! - [`RequestError`]: malformed HTTP requests
//!
//! Courier failures during a status refresh or a timeline read never show up
//! here: the tracker degrades them to a stale read (see
//! [`StaleStatus`](crate::courier::StaleStatus)).
//!
//! # Example
//!
//! ```rust,ignore
//! match collection.move_to(&id, 2).await {
//!     Ok(sorted) => println!("{} records", sorted.len()),
//!     Err(ShopError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("record {} is gone", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the storefront backend
#[derive(Debug, Error)]
pub enum ShopError {
    /// Entity-related errors (CRUD operations)
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Purchase-order business rule violations
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Courier dispatch errors
    #[error(transparent)]
    Courier(#[from] CourierError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
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

impl ShopError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Entity(e) => e.status_code(),
            ShopError::Order(e) => e.status_code(),
            ShopError::Courier(e) => e.status_code(),
            ShopError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShopError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Request(_) => StatusCode::BAD_REQUEST,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::Entity(e) => e.error_code(),
            ShopError::Order(e) => e.error_code(),
            ShopError::Courier(e) => e.error_code(),
            ShopError::Config(_) => "CONFIG_ERROR",
            ShopError::Validation(_) => "VALIDATION_ERROR",
            ShopError::Storage(_) => "STORAGE_ERROR",
            ShopError::Request(e) => e.error_code(),
            ShopError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            ShopError::Order(OrderError::InvalidTransition { from, to }) => {
                Some(serde_json::json!({ "from": from, "to": to }))
            }
            ShopError::Courier(CourierError::UpstreamStatus {
                provider, status, ..
            }) => Some(serde_json::json!({
                "provider": provider,
                "upstream_status": status
            })),
            ShopError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    /// Entity already exists (conflict)
    #[error("{entity_type} with id '{id}' already exists")]
    AlreadyExists { entity_type: String, id: Uuid },

    /// No entity matches a secondary key (e.g. a tracking id)
    #[error("no {entity_type} with {field} '{value}'")]
    NotFoundBy {
        entity_type: String,
        field: String,
        value: String,
    },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
            EntityError::NotFoundBy { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::NotFoundBy { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

// =============================================================================
// Order Errors
// =============================================================================

/// Business-rule violations on purchase orders
#[derive(Debug, Error)]
pub enum OrderError {
    /// Delivered and cancelled orders are frozen
    #[error("order is {status} and can no longer be modified")]
    Terminal { status: String },

    /// Requested status does not follow the allowed flow
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The order was already handed to a courier
    #[error("order already dispatched with tracking id '{tracking_id}'")]
    AlreadyDispatched { tracking_id: String },
}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Terminal { .. } => StatusCode::CONFLICT,
            OrderError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            OrderError::AlreadyDispatched { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::Terminal { .. } => "ORDER_TERMINAL",
            OrderError::InvalidTransition { .. } => "ORDER_INVALID_TRANSITION",
            OrderError::AlreadyDispatched { .. } => "ORDER_ALREADY_DISPATCHED",
        }
    }
}

// =============================================================================
// Courier Errors
// =============================================================================

/// Errors raised while handing an order to a courier
#[derive(Debug, Error)]
pub enum CourierError {
    /// No adapter exists for this provider name
    #[error("unknown courier provider '{provider}'")]
    UnknownProvider { provider: String },

    /// The provider exists but has no credentials in the configuration
    #[error("courier provider '{provider}' is not configured")]
    NotConfigured { provider: String },

    /// The order lacks data the courier requires
    #[error("order cannot be dispatched: {field} {message}")]
    InvalidOrder { field: String, message: String },

    /// The request never produced an HTTP response
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    /// The courier answered with a non-success status
    #[error("{provider} responded with HTTP {status}")]
    UpstreamStatus {
        provider: String,
        status: u16,
        body: String,
    },

    /// The courier answered 2xx but the body has no tracking code where expected
    #[error("{provider} response is missing a tracking code")]
    MissingTrackingCode { provider: String },

    /// The courier answered 2xx with a body we cannot read
    #[error("{provider} returned an unreadable response: {message}")]
    MalformedResponse { provider: String, message: String },
}

impl CourierError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CourierError::UnknownProvider { .. } => StatusCode::BAD_REQUEST,
            CourierError::NotConfigured { .. } => StatusCode::BAD_REQUEST,
            CourierError::InvalidOrder { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CourierError::Transport { .. } => StatusCode::BAD_GATEWAY,
            CourierError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            CourierError::MissingTrackingCode { .. } => StatusCode::BAD_GATEWAY,
            CourierError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CourierError::UnknownProvider { .. } => "COURIER_UNKNOWN_PROVIDER",
            CourierError::NotConfigured { .. } => "COURIER_NOT_CONFIGURED",
            CourierError::InvalidOrder { .. } => "COURIER_INVALID_ORDER",
            CourierError::Transport { .. } => "COURIER_UNREACHABLE",
            CourierError::UpstreamStatus { .. } => "COURIER_UPSTREAM_ERROR",
            CourierError::MissingTrackingCode { .. } => "COURIER_MISSING_TRACKING_CODE",
            CourierError::MalformedResponse { .. } => "COURIER_MALFORMED_RESPONSE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse config{}: {message}", file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", .0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join(", "))]
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Invalid UUID format
    #[error("Invalid UUID format: {value}")]
    InvalidUuid { value: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

fn collect_field_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<FieldValidationError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(FieldValidationError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// Backend not compiled in or not reachable
    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Invalid entity ID format
    #[error("Invalid entity ID format: '{id}'")]
    InvalidEntityId { id: String },

    /// Invalid request body
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<validator::ValidationErrors> for ShopError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ShopError::Validation(errors.into())
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for ShopError {
    fn from(err: std::io::Error) -> Self {
        ShopError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ShopError {
    fn from(err: serde_yaml::Error) -> Self {
        ShopError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<uuid::Error> for ShopError {
    fn from(err: uuid::Error) -> Self {
        ShopError::Validation(ValidationError::InvalidUuid {
            value: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for ShopError {
    fn from(err: reqwest::Error) -> Self {
        let provider = err
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("courier")
            .to_string();
        match err.status() {
            Some(status) => ShopError::Courier(CourierError::UpstreamStatus {
                provider,
                status: status.as_u16(),
                body: String::new(),
            }),
            None => ShopError::Courier(CourierError::Transport {
                provider,
                message: err.to_string(),
            }),
        }
    }
}

/// Storage services speak `anyhow`; anything that is not already a
/// `ShopError` is reported as a storage failure.
impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ShopError>() {
            Ok(shop_err) => shop_err,
            Err(err) => ShopError::Storage(StorageError::QueryError {
                backend: "storage".to_string(),
                message: format!("{:#}", err),
            }),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
