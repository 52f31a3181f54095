//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Parking slot not found: {0}")]
    SlotNotFound(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("You already have an active booking at this location. Please complete or cancel it first.")]
    DuplicateActiveBooking,

    #[error("Slot is already booked for this time period")]
    SlotTimeConflict,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
