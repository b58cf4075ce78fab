//! M-Pesa (Daraja) STK push integration.

mod callback;
mod client;
mod config;
mod credentials;
mod errors;
mod gateway;
mod phone;

pub use callback::*;
pub use client::MpesaClient;
pub use config::{MpesaConfig, SANDBOX_BASE_URL};
pub use credentials::{password, timestamp};
pub use errors::MpesaError;
pub use gateway::*;
pub use phone::normalize_phone;
