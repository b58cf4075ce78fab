//! Admin API token generation and hashing.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Admin API token prefix.
pub const ADMIN_TOKEN_PREFIX: &str = "dk";

/// Number of random bytes encoded in a token.
pub const ADMIN_TOKEN_SECRET_BYTES: usize = 32;

/// Generate a new raw admin token.
///
/// The raw value is shown to the operator once; only its hash is stored.
#[must_use]
pub fn generate_admin_token() -> String {
    let mut secret = [0_u8; ADMIN_TOKEN_SECRET_BYTES];
    OsRng.fill_bytes(&mut secret);

    let token = format!("{ADMIN_TOKEN_PREFIX}_{}", to_hex(&secret));

    secret.zeroize();

    token
}

/// Hex-encoded SHA-256 of a raw token, the form tokens are stored in.
#[must_use]
pub fn hash_token(token: &str) -> String {
    to_hex(&Sha256::digest(token.as_bytes()))
}

fn to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        hex.extend(char::from_digit(u32::from(byte >> 4), 16));
        hex.extend(char::from_digit(u32::from(byte & 0x0f), 16));
    }

    hex
}
