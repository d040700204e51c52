//! Payment gateway callback verification and settlement.

pub mod error;
pub mod settlement;
pub mod verifier;

pub use error::{MalformedTxnRef, PaymentError};
pub use settlement::{SettlementGuard, SettlementOutcome, TxnRef, response_indicates_success};
pub use verifier::{CallbackVerifier, VerifiedNotification, VerifyOutcome};
