//! Registration queue, admission engine and backing storage.

pub mod admission;
pub mod db;
pub mod error;
pub mod fees;
pub mod models;
pub mod password;
pub mod queue;
pub mod residents;

pub use admission::AdmissionEngine;
pub use db::Database;
pub use error::RegistryError;
pub use fees::FeeRepository;
pub use models::{Fee, NewRegistration, PublicInfo, RegistrationRequest, Resident};
pub use queue::{CreateOutcome, OrderBy, QueueFilter, RegistrationQueue, RejectCode};
pub use residents::ResidentRepository;
