//! Identifier sanitizer: raw path segment -> table-safe identifier.

/// Returned when nothing identifier-safe survives sanitization.
pub const FALLBACK_IDENTIFIER: &str = "unknown";

/// Lower-case `raw`, replace every char outside `[a-z0-9_]` with `_`, collapse runs of `_`,
/// strip leading/trailing `_`. Empty results become [`FALLBACK_IDENTIFIER`].
///
/// Total and idempotent: `sanitize_identifier(&sanitize_identifier(x)) == sanitize_identifier(x)`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '_'
        };
        if c == '_' && (out.is_empty() || out.ends_with('_')) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        FALLBACK_IDENTIFIER.to_string()
    } else {
        out
    }
}
