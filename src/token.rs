//! Line-level tokenizing for the INI text format.

/// Returns `true` when the first non-whitespace character of `line` is `[`.
#[must_use]
pub fn is_section_header(line: &str) -> bool {
    line.trim_start().starts_with('[')
}

/// Extracts the section name from a header line, stripping surrounding whitespace and brackets.
///
/// `"  [ dc1.webservers ]"` becomes `"dc1.webservers"`.
#[must_use]
pub fn section_name(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '[' || c == ']')
}

/// Splits an option line into its name and value.
///
/// The line is split at the first `=`, or at the first `:` when there is no `=`. Anything after
/// the split point is kept verbatim (apart from trimming), so values such as
/// `provider_options = gcache.size=1G; gcs.fc_limit=128` survive intact. A line without either
/// delimiter is a key-only option with an empty value.
#[must_use]
pub fn split_option(line: &str) -> (&str, &str) {
    let split = line.find('=').or_else(|| line.find(':'));

    match split {
        // Both delimiters are one byte wide.
        Some(i) => (line[..i].trim(), line[i + 1..].trim()),
        None => (line.trim(), ""),
    }
}
