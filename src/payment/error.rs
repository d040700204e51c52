use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A transaction reference that does not decode to `room-feeId-amount-nonce`.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Malformed transaction reference: {0:?}")]
pub struct MalformedTxnRef(pub String);
