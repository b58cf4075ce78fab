//! Payments

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod sweep;

pub use errors::PaymentsServiceError;
pub use service::*;
pub use sweep::*;
