//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic address shape: local part, one '@', dotted domain
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$").unwrap()
});

/// Check if an email address is well formed
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Mask an email address for logs (e.g., a***e@example.com)
///
/// Values without an '@' are fully masked.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let chars: Vec<char> = local.chars().collect();
            let masked_local = match chars.len() {
                1 => "*".to_string(),
                2 => format!("{}*", chars[0]),
                n => format!("{}{}{}", chars[0], "*".repeat(n - 2), chars[n - 1]),
            };
            format!("{}@{}", masked_local, domain)
        }
        _ => "****".to_string(),
    }
}
