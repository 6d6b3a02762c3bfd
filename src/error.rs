use thiserror::Error;

use crate::client::ClientError;

/// Errors surfaced to the operator by every inventory operation.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The remote read failed.
    #[error("could not load the sheet: {0}")]
    Load(#[source] ClientError),

    /// The sheet was read but its contents cannot form an inventory table.
    #[error("malformed sheet: {0}")]
    Malformed(String),

    #[error("no item named '{0}'")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Only raised when negative stock is rejected by policy.
    #[error("cannot sell {requested} of '{name}': only {on_hand} on hand")]
    InsufficientStock {
        name: String,
        on_hand: f64,
        requested: i64,
    },

    /// The remote write failed; the in-memory table is unchanged.
    #[error("could not save to the sheet: {0}")]
    Persist(#[source] ClientError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InventoryError>;

impl InventoryError {
    /// True for both flavours of load failure (remote read and bad data).
    pub fn is_load_error(&self) -> bool {
        matches!(self, InventoryError::Load(_) | InventoryError::Malformed(_))
    }
}
