//! Pure text transforms applied to every CSV cell and to interactive input.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

static TAG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<[^>]*>").expect("tag pattern is valid")
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s+").expect("whitespace pattern is valid")
});

/// Remove every `<...>` span. No nesting awareness; an unclosed `<` stays.
pub fn strip_markup(text: &str) -> String {
  TAG.replace_all(text, "").into_owned()
}

/// Decompose to NFD and drop the combining marks, leaving base glyphs only.
pub fn strip_diacritics(text: &str) -> String {
  if text.is_empty() {
    return String::new();
  }
  text
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .map(|c| match c {
      'ç' => 'c',
      'Ç' => 'C',
      other => other,
    })
    .collect()
}

/// Trim both ends and collapse internal whitespace runs to one space.
pub fn collapse_whitespace(text: &str) -> String {
  WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
