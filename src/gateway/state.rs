use std::sync::Arc;

use crate::payment::{CallbackVerifier, SettlementGuard};
use crate::registry::Database;
use crate::snowflake::IdAllocator;

/// Shared gateway application state.
///
/// Constructed once at startup and passed to every handler; there is no
/// global mutable state.
pub struct AppState {
    /// Connection pool, shared by all repositories.
    pub db: Arc<Database>,
    /// Id allocator for request and resident ids.
    pub ids: Arc<IdAllocator>,
    /// Payment callback authentication gate.
    pub verifier: CallbackVerifier,
    /// Idempotent payment application.
    pub settlement: SettlementGuard,
    /// Server-side page size for admin queries.
    pub page_size: i64,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        ids: Arc<IdAllocator>,
        verifier: CallbackVerifier,
        page_size: i64,
    ) -> Self {
        let settlement = SettlementGuard::new(db.clone());
        Self {
            db,
            ids,
            verifier,
            settlement,
            page_size,
        }
    }
}
