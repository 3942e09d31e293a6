//! Error types for CoreDesk.

use std::fmt::{self, Display, Formatter};

/// Errors returned by CoreDesk operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreDeskError {
    /// An unexpected IO or serialization error occurred.
    Io(String),
    /// Configuration loading or validation failed.
    Configuration(String),
    /// A bulk action or update was requested with an unusable argument.
    InvalidAction(String),
    /// No ticket matches the requested identifier.
    TicketNotFound(String),
    /// Session state in local storage could not be resolved.
    Session(String),
    /// Ticket operation failed.
    TicketOperation(String),
}

impl Display for CoreDeskError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CoreDeskError::Io(message) => write!(formatter, "{message}"),
            CoreDeskError::Configuration(message) => write!(formatter, "{message}"),
            CoreDeskError::InvalidAction(message) => write!(formatter, "{message}"),
            CoreDeskError::TicketNotFound(identifier) => {
                write!(formatter, "ticket not found: {identifier}")
            }
            CoreDeskError::Session(message) => write!(formatter, "{message}"),
            CoreDeskError::TicketOperation(message) => write!(formatter, "{message}"),
        }
    }
}

impl std::error::Error for CoreDeskError {}
