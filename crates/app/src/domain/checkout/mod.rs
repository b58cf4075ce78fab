//! Checkout
//!
//! The cart is held by the client; the server only prices it.

pub mod cart;
pub mod errors;

pub use cart::*;
pub use errors::CheckoutError;
