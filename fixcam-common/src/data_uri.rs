//! Canonical data-URI handling for stored preview strings.
//!
//! Every preview persisted by fixcam is either an empty string or a
//! well-formed `data:<mime>;base64,<payload>` URI with exactly one prefix.
//! Clients send previews in whatever shape their platform produced (raw
//! base64, already-prefixed, occasionally double-prefixed after a retry),
//! so normalization must be idempotent.

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// True if the string carries a `data:<mime>;base64,` prefix.
pub fn is_data_uri(s: &str) -> bool {
    s.starts_with(DATA_SCHEME) && s.contains(BASE64_MARKER)
}

/// Return the bare base64 payload, stripping any data-URI prefixes.
///
/// Repeated prefixes (from clients that re-wrapped an already-canonical
/// string) are all removed.
pub fn strip_prefix(s: &str) -> &str {
    let mut payload = s;
    while payload.starts_with(DATA_SCHEME) {
        match payload.find(BASE64_MARKER) {
            Some(idx) => payload = &payload[idx + BASE64_MARKER.len()..],
            None => break,
        }
    }
    payload
}

/// Extract the MIME type from a data URI, if present.
pub fn mime_type(s: &str) -> Option<&str> {
    if !s.starts_with(DATA_SCHEME) {
        return None;
    }
    let rest = &s[DATA_SCHEME.len()..];
    rest.find(';').map(|idx| &rest[..idx])
}

/// Normalize to canonical form: exactly one `data:<mime>;base64,` prefix.
///
/// Idempotent: `normalize(mime, &normalize(mime, s)) == normalize(mime, s)`.
/// An empty payload normalizes to the empty string (previews are never a
/// bare prefix with nothing behind it).
pub fn normalize(mime: &str, s: &str) -> String {
    let payload = strip_prefix(s).trim();
    if payload.is_empty() {
        return String::new();
    }
    format!("{}{}{}{}", DATA_SCHEME, mime, BASE64_MARKER, payload)
}
