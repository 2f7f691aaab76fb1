//! Shared detection patterns for rules.
//!
//! Homework must be something a pupil can do from the journal entry alone, so
//! web addresses are not allowed in it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Web link pattern: explicit scheme, `www.` prefix, or a bare domain
    /// ending in one of the TLDs teachers actually paste.
    pub static ref URL_PATTERN: Regex = Regex::new(
        r"https?://\S+|www\.\S+|\b[a-zA-Z0-9.-]+\.(?:com|org|net|edu|gov|io|uk|ru|ua)\b"
    ).unwrap();
}

/// Check if text contains anything that looks like a web link.
pub fn contains_link(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}
