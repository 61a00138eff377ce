//! URL-safe identifiers derived from display names.

/// Map a display string to a lowercase, hyphen-separated token.
///
/// Every character that is not an ASCII letter, ASCII digit or whitespace is
/// dropped, and runs of whitespace become a single hyphen. The result never
/// starts or ends with a hyphen and may be empty (e.g. for `"!!!"`); callers
/// decide what an empty slug means. Two different inputs can produce the same
/// slug, uniqueness is left to storage.
pub fn slugify(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
