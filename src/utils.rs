use regex::Regex;
use std::sync::LazyLock;

/// Runs of whitespace and characters that are unsafe in file names
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s/\\:?&=#%*"<>|]+"#).expect("filename pattern should be valid")
});

/// Maximum length, in characters, of a generated file name
const MAX_FILENAME_CHARS: usize = 100;

/// Convert a free-form label (search term, city) into a file name stem
///
/// Whitespace and path-unsafe characters collapse into a single `-`, and the
/// result is capped at a reasonable length.
pub fn sanitize_filename(label: &str) -> String {
    let name = UNSAFE_FILENAME_CHARS.replace_all(label.trim(), "-");
    name.chars().take(MAX_FILENAME_CHARS).collect()
}
