//! Unified error type for the conta corrente service.
//!
//! Business-rule failures (validation, balance checks, missing references) and
//! infrastructure failures (database, I/O, CSV, configuration) share one enum so
//! that `?` works across the core and API layers.

use rust_decimal::Decimal;
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// A business rule rejected the input
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// A monetary amount was zero, negative or otherwise unusable
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A payment would pay more than the commitment still owes
    #[error("Payment of {amount} exceeds outstanding balance of {outstanding}")]
    ExceedsOutstandingBalance {
        /// The rejected payment amount
        amount: Decimal,
        /// Outstanding balance at the time of the attempt
        outstanding: Decimal,
    },

    /// The commitment has nothing left to pay
    #[error("Commitment {id} is already fully paid")]
    CommitmentAlreadySettled {
        /// Commitment id
        id: String,
    },

    /// A unique name is already taken
    #[error("Name already in use: {name}")]
    DuplicateName {
        /// The conflicting name
        name: String,
    },

    /// The referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"Compromisso"`
        entity: &'static str,
        /// Requested id
        id: String,
    },

    /// The row changed between read and write
    #[error("Commitment {id} was modified concurrently, reload and retry")]
    ConcurrentModification {
        /// Commitment id
        id: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether the error is a rejected business rule rather than an infrastructure fault.
    #[must_use]
    pub const fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidAmount { .. }
                | Self::ExceedsOutstandingBalance { .. }
                | Self::CommitmentAlreadySettled { .. }
                | Self::DuplicateName { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
