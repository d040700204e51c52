//! Resident Registry - registration queue, admissions and fee settlement
//!
//! A database-backed API service: residents submit registration requests,
//! administrators admit or reject them in bulk, and a third-party payment
//! gateway posts asynchronous notifications that settle fee payments.
//!
//! # Modules
//!
//! - [`snowflake`] - Time-ordered unique id allocation
//! - [`validation`] - Pure field validators for intake and search filters
//! - [`registry`] - Queue intake/search, admission engine, backing storage
//! - [`payment`] - Gateway callback verification and idempotent settlement
//! - [`admin_auth`] - Admin credential checks for the management routes
//! - [`gateway`] - Axum HTTP surface
//! - [`config`] / [`logging`] - Startup configuration and tracing setup

pub mod admin_auth;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod payment;
pub mod registry;
pub mod snowflake;
pub mod validation;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use payment::{CallbackVerifier, SettlementGuard, SettlementOutcome, TxnRef};
pub use registry::{
    AdmissionEngine, CreateOutcome, Database, NewRegistration, OrderBy, QueueFilter,
    RegistrationQueue, RegistrationRequest, RejectCode, Resident,
};
pub use snowflake::IdAllocator;
