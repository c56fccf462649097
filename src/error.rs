use std::path::PathBuf;

use thiserror::Error;

use crate::models::Money;
use crate::store::codec::DecodeError;

/// Everything an inventory operation can report back to the shell. None of
/// these are fatal: the caller shows the message and carries on.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Invalid boat record: {0}")]
    Decode(#[from] DecodeError),

    #[error("No boat with that name: {name}")]
    NotFound { name: String },

    #[error("No boat at row {}.", index + 1)]
    NoSuchRow { index: usize },

    #[error("Maximum number of boats reached ({capacity}).")]
    CapacityExceeded { capacity: usize },

    #[error("That is more than the amount owed, ${owed}. Payment of ${payment} rejected.")]
    PaymentExceedsOwed { payment: Money, owed: Money },

    #[error("Payment amount cannot be negative (${payment}).")]
    NegativePayment { payment: Money },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl InventoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InventoryError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
