//! Payment Handlers

pub(crate) mod callback;
pub(crate) mod initiate;
