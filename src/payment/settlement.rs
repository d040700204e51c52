//! Idempotent settlement of verified payment notifications.

use std::str::FromStr;
use std::sync::Arc;

use super::error::{MalformedTxnRef, PaymentError};
use crate::registry::{Database, FeeRepository};

/// The idempotency key decoded from a gateway transaction reference,
/// formatted as `room-feeId-amount-nonce`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxnRef {
    pub room: i32,
    pub fee_id: i64,
    pub amount: i64,
    pub nonce: i64,
}

impl FromStr for TxnRef {
    type Err = MalformedTxnRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let [room, fee_id, amount, nonce] = parts.as_slice() else {
            return Err(MalformedTxnRef(s.to_string()));
        };
        Ok(Self {
            room: room.parse().map_err(|_| MalformedTxnRef(s.to_string()))?,
            fee_id: fee_id.parse().map_err(|_| MalformedTxnRef(s.to_string()))?,
            amount: amount.parse().map_err(|_| MalformedTxnRef(s.to_string()))?,
            nonce: nonce.parse().map_err(|_| MalformedTxnRef(s.to_string()))?,
        })
    }
}

/// Whether a gateway response code indicates a settled payment.
pub fn response_indicates_success(code: &str) -> bool {
    matches!(code, "00" | "07")
}

/// Outcome of applying one verified notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// The payment was recorded by this call.
    Applied,
    /// A prior notification with the same reference already settled it.
    AlreadyApplied,
}

/// Applies verified payments exactly once per transaction reference.
pub struct SettlementGuard {
    db: Arc<Database>,
}

impl SettlementGuard {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record the payment unless its reference key was already applied.
    ///
    /// One conditional insert: the primary key on (room, fee_id, amount,
    /// nonce) plus ON CONFLICT DO NOTHING means concurrent duplicates
    /// resolve to exactly one `Applied` and the rest `AlreadyApplied`.
    pub async fn apply(&self, txn: &TxnRef) -> Result<SettlementOutcome, PaymentError> {
        // Fee rows are owned by fee management; read-only sanity check.
        match FeeRepository::get_by_id(self.db.pool(), txn.fee_id).await? {
            Some(fee) => {
                if txn.amount < fee.lower || txn.amount > fee.upper {
                    tracing::warn!(
                        fee_id = txn.fee_id,
                        amount = txn.amount,
                        lower = fee.lower,
                        upper = fee.upper,
                        "settling amount outside fee range"
                    );
                }
            }
            None => {
                tracing::warn!(fee_id = txn.fee_id, "settling payment for unknown fee");
            }
        }

        let result = sqlx::query(
            r#"
            INSERT INTO payments (room, fee_id, amount, nonce)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (room, fee_id, amount, nonce) DO NOTHING
            "#,
        )
        .bind(txn.room)
        .bind(txn.fee_id)
        .bind(txn.amount)
        .bind(txn.nonce)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            tracing::info!(?txn, "duplicate settlement ignored");
            Ok(SettlementOutcome::AlreadyApplied)
        } else {
            tracing::info!(?txn, "payment settled");
            Ok(SettlementOutcome::Applied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txn_ref_parses() {
        let txn: TxnRef = "12-3-500000-1".parse().unwrap();
        assert_eq!(
            txn,
            TxnRef {
                room: 12,
                fee_id: 3,
                amount: 500_000,
                nonce: 1
            }
        );
    }

    #[test]
    fn test_txn_ref_malformed() {
        assert!("12-3-500000".parse::<TxnRef>().is_err());
        assert!("12-3-500000-1-9".parse::<TxnRef>().is_err());
        assert!("12-three-500000-1".parse::<TxnRef>().is_err());
        assert!("".parse::<TxnRef>().is_err());
    }

    #[test]
    fn test_success_response_codes() {
        assert!(response_indicates_success("00"));
        assert!(response_indicates_success("07"));
        assert!(!response_indicates_success("02"));
        assert!(!response_indicates_success("99"));
    }
}
