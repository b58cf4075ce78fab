//! Phone number normalisation.

/// Convert a Kenyan phone number into the `254…` form the gateway expects.
///
/// A leading `0` becomes `254` and a leading `+` is dropped. Anything else is
/// passed through unchanged.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    let phone = phone.trim();

    if let Some(rest) = phone.strip_prefix('+') {
        return rest.to_string();
    }

    if let Some(rest) = phone.strip_prefix('0') {
        return format!("254{rest}");
    }

    phone.to_string()
}
