/// Normalizes a symbol or source code: surrounding whitespace is dropped and
/// ASCII letters are upper-cased.
///
/// Every identifier entering the crate goes through here exactly once, so
/// lookups never need to fold case again.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
