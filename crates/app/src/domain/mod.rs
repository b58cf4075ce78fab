//! Duka Domain Concerns

pub mod categories;
pub mod checkout;
pub mod orders;
pub mod payments;
pub mod products;
