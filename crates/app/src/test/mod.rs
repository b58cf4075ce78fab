//! Shared service test infrastructure.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
