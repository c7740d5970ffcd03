use regex::Regex;
use std::sync::LazyLock;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("unsafe char pattern"));

/// Filesystem-safe artifact stem: every character outside `[A-Za-z0-9_]`
/// becomes `_`, one underscore per character.
pub fn sanitize_title(title: &str) -> String {
    UNSAFE_CHARS.replace_all(title, "_").into_owned()
}
