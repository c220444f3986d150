//! Daemon response interpretation
//!
//! The daemon answers HTTP 200 even when an import fails; the failure is
//! reported as text inside a `LINEERROR` element of the response body.

use once_cell::sync::Lazy;
use regex::Regex;
use tallybridge_domain::constants::ALREADY_EXISTS_MARKER;

static LINE_ERROR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<LINEERROR>(.*?)</LINEERROR>")
        .expect("LINE_ERROR_REGEX should compile - this is a bug")
});

/// First line error embedded in a response body, if any.
///
/// The match does not span newlines. An empty element counts as no error.
pub fn extract_line_error(body: &str) -> Option<String> {
    LINE_ERROR_REGEX
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|error| error.as_str().to_string())
        .filter(|error| !error.is_empty())
}

/// Whether a line error reports a duplicate create.
pub fn is_already_exists(error: &str) -> bool {
    error.to_lowercase().contains(ALREADY_EXISTS_MARKER)
}
