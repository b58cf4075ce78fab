//! Checkout Handlers

pub(crate) mod summary;
