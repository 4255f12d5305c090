//! Error type shared by the rental library.

use thiserror::Error;

/// Everything that can stop a rental run.
#[derive(Debug, Error)]
pub enum RentalError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Standard input ended while a prompt was waiting for an answer.
    #[error("input closed while waiting for {0}")]
    InputClosed(&'static str),

    #[error("car {0} is not in the catalog")]
    UnknownCar(i64),
}

pub type Result<T> = std::result::Result<T, RentalError>;
