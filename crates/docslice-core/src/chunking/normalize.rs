use once_cell::sync::Lazy;
use regex::Regex;

static NEWLINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline-run pattern is valid"));

/// Strips leading whitespace from every line, then collapses runs of three or
/// more newlines to exactly two.
///
/// Run this before chunking: the boundary search windows are measured in
/// characters of the normalized text.
pub fn normalize(text: &str) -> String {
    let stripped = text
        .split('\n')
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n");

    NEWLINE_RUNS.replace_all(&stripped, "\n\n").into_owned()
}
