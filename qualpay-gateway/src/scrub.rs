//! Transcript scrubbing
//!
//! Redacts credentials and card data from captured HTTP exchanges before
//! they are stored or logged. The pattern set is fixed: basic-auth header
//! values, `card_num` and `card_ccv2` form fields.

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement for redacted values
pub const FILTERED: &str = "[FILTERED]";

static BASIC_AUTH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Authorization: Basic )[A-Za-z0-9+/=_-]+").unwrap());

static CARD_NUM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(&?card_num=)[^&]*").unwrap());

static CARD_CCV2_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(&?card_ccv2=)[^&]*").unwrap());

/// Redact sensitive values from a transcript
///
/// # Examples
///
/// ```
/// use qualpay_gateway::scrub_transcript;
///
/// let scrubbed = scrub_transcript("card_num=4111111111111111&foo=bar");
/// assert_eq!(scrubbed, "card_num=[FILTERED]&foo=bar");
/// ```
pub fn scrub_transcript(transcript: &str) -> String {
    let replacement = format!("${{1}}{}", FILTERED);

    let result = BASIC_AUTH_REGEX.replace_all(transcript, replacement.as_str());
    let result = CARD_NUM_REGEX.replace_all(&result, replacement.as_str());
    let result = CARD_CCV2_REGEX.replace_all(&result, replacement.as_str());

    result.into_owned()
}
