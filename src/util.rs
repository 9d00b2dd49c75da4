use once_cell::sync::Lazy;
use regex::Regex;

static DOC_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/document/(?:u/\d+/)?d/([a-zA-Z0-9_-]+)").unwrap());
static BARE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{20,}$").unwrap());

/// Extract a document id from a Google Docs URL.
///
/// Accepts `https://docs.google.com/document/d/<id>/edit...` style links, or
/// a bare id (20+ URL-safe characters). Returns None for anything else.
pub fn doc_id_from_url(input: &str) -> Option<String> {
    let input = input.trim();
    if let Some(caps) = DOC_URL_RE.captures(input) {
        return Some(caps[1].to_string());
    }
    if BARE_ID_RE.is_match(input) {
        return Some(input.to_string());
    }
    None
}
