//! STK push password and timestamp.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use jiff::{
    Timestamp,
    tz::{self, TimeZone},
};

/// East Africa Time, which the gateway expects timestamps in.
const EAT_OFFSET_HOURS: i8 = 3;

/// Format `now` as the `YYYYMMDDHHmmss` East Africa Time timestamp.
#[must_use]
pub fn timestamp(now: Timestamp) -> String {
    now.to_zoned(TimeZone::fixed(tz::offset(EAT_OFFSET_HOURS)))
        .strftime("%Y%m%d%H%M%S")
        .to_string()
}

/// Base64 of shortcode, passkey and timestamp concatenated.
#[must_use]
pub fn password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    BASE64.encode(format!("{shortcode}{passkey}{timestamp}"))
}
