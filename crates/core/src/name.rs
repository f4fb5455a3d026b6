/// Honorific titles dropped during normalization. Compared after
/// lower-casing and punctuation stripping, so "Mr." and "mr" both match.
const TITLES: [&str; 5] = ["mr", "mrs", "ms", "miss", "dr"];

/// Canonical comparable form of a free-text personal name: lower-cased,
/// periods and commas turned into spaces, title tokens dropped, remaining
/// tokens rejoined with single spaces. Empty input yields empty output.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['.', ','], " ")
        .split_whitespace()
        .filter(|w| !TITLES.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a name into (first, last) tokens. One token counts as a first name
/// with no surname; middle tokens are discarded.
pub fn first_last(raw: &str) -> (String, String) {
    let normalized = normalize(raw);
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    match parts.as_slice() {
        [] => (String::new(), String::new()),
        [only] => ((*only).to_string(), String::new()),
        [first, .., last] => ((*first).to_string(), (*last).to_string()),
    }
}
