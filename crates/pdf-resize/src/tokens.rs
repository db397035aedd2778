//! Filename templates
//!
//! A template is a plain file name that may contain the tokens `*size*`,
//! `*YYMMDD*` and `*DDMMYY*`. Detection and replacement help turn an existing
//! name (`scan_210x297_240105`) into a template; expansion produces the
//! concrete name for one adjuster at export time.

use crate::constants::FALLBACK_FILE_NAME;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// `<digits>x<digits>` bounded by underscores, string edges or word boundaries.
/// Both the Latin `x` and the Cyrillic `х` are accepted. Word boundaries are
/// ASCII-only, so Cyrillic letters next to the size count as separators.
static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<pre>^|_|(?-u:\b))(?P<size>[0-9]+[xх][0-9]+)(?P<post>$|_|(?-u:\b))")
        .expect("valid regex")
});

/// A-series paper code (Latin or Cyrillic `A`), optional `h`/`v` orientation flag
static PAPER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<pre>^|[_\-\s])(?P<size>[AА][0-5][hv]?)(?P<post>$|[_\-\s])")
        .expect("valid regex")
});

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("valid regex"));

/// Placeholder recognized in file name templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameToken {
    /// Output size in whole millimeters, `210x297`
    Size,
    /// Export date, year first
    Yymmdd,
    /// Export date, day first
    Ddmmyy,
}

impl FilenameToken {
    pub const ALL: [FilenameToken; 3] = [
        FilenameToken::Size,
        FilenameToken::Yymmdd,
        FilenameToken::Ddmmyy,
    ];

    pub fn text(self) -> &'static str {
        match self {
            FilenameToken::Size => "*size*",
            FilenameToken::Yymmdd => "*YYMMDD*",
            FilenameToken::Ddmmyy => "*DDMMYY*",
        }
    }

    fn expanded(self, width_mm: f64, height_mm: f64, date: NaiveDate) -> String {
        let yy = date.year().rem_euclid(100);
        let mm = date.month();
        let dd = date.day();
        match self {
            FilenameToken::Size => format!(
                "{}x{}",
                width_mm.round() as i64,
                height_mm.round() as i64
            ),
            FilenameToken::Yymmdd => format!("{:02}{:02}{:02}", yy, mm, dd),
            FilenameToken::Ddmmyy => format!("{:02}{:02}{:02}", dd, mm, yy),
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Whether `text` contains a size (`100x200`) or paper code (`A4`, `A3h`)
pub fn contains_size_pattern(text: &str) -> bool {
    SIZE_PATTERN.is_match(text) || PAPER_PATTERN.is_match(text)
}

/// Whether `text` contains a run of exactly six digits.
/// The digits are not checked to be a valid calendar date.
pub fn contains_date_pattern(text: &str) -> bool {
    first_date_run(text).is_some()
}

fn first_date_run(text: &str) -> Option<std::ops::Range<usize>> {
    DIGIT_RUN
        .find_iter(text)
        .find(|m| m.as_str().len() == 6)
        .map(|m| m.range())
}

// =============================================================================
// Replacement
// =============================================================================

/// Replace every size pattern with `*size*`, keeping the delimiters around it.
/// Paper codes are only replaced when no numeric size is present.
pub fn replace_size_pattern(text: &str) -> String {
    let replacement = format!("${{pre}}{}${{post}}", FilenameToken::Size.text());
    if SIZE_PATTERN.is_match(text) {
        return SIZE_PATTERN
            .replace_all(text, replacement.as_str())
            .into_owned();
    }
    PAPER_PATTERN
        .replace_all(text, replacement.as_str())
        .into_owned()
}

/// Replace the first six-digit run with the given date token.
/// Later runs are left untouched.
pub fn replace_first_date_pattern(text: &str, token: FilenameToken) -> String {
    match first_date_run(text) {
        Some(range) => {
            let mut result = String::with_capacity(text.len() + token.text().len());
            result.push_str(&text[..range.start]);
            result.push_str(token.text());
            result.push_str(&text[range.end..]);
            result
        }
        None => text.to_string(),
    }
}

/// Insert `token` over the selected byte range (or at the caret when empty).
///
/// Returns the new text and the caret position right after the token.
pub fn insert_token(
    text: &str,
    selection: std::ops::Range<usize>,
    token: FilenameToken,
) -> (String, usize) {
    let end = clamp_to_char_boundary(text, selection.end.min(text.len()));
    let start = clamp_to_char_boundary(text, selection.start.min(end));
    let mut result = String::with_capacity(text.len() + token.text().len());
    result.push_str(&text[..start]);
    result.push_str(token.text());
    result.push_str(&text[end..]);
    (result, start + token.text().len())
}

fn clamp_to_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

// =============================================================================
// Expansion
// =============================================================================

/// Expand the tokens of `template` for one output.
///
/// Tokens end up delimited by single underscores, leading and trailing
/// underscores are stripped, and an empty result becomes `output`.
/// The `.pdf` extension is not appended.
pub fn expand_filename(template: &str, width_mm: f64, height_mm: f64, date: NaiveDate) -> String {
    let base = template.trim();
    let base = if base.is_empty() {
        FALLBACK_FILE_NAME
    } else {
        base
    };

    let mut result = base.to_string();
    for token in FilenameToken::ALL {
        result = result.replace(token.text(), &format!("_{}_", token.text()));
    }
    result = collapse_underscores(&result);

    for token in FilenameToken::ALL {
        result = result.replace(token.text(), &token.expanded(width_mm, height_mm, date));
    }
    result = collapse_underscores(&result);

    let result = result.trim_matches('_');
    if result.trim().is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        result.to_string()
    }
}

fn collapse_underscores(text: &str) -> String {
    UNDERSCORE_RUN.replace_all(text, "_").into_owned()
}

/// Strip the final extension from a file name (`scan.v2.pdf` → `scan.v2`)
pub fn base_file_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

// =============================================================================
// Editor state
// =============================================================================

/// The file name field: current template plus the name it started from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilenameEditor {
    value: String,
    original: String,
}

impl FilenameEditor {
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            value: original.clone(),
            original,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_modified(&self) -> bool {
        self.value != self.original
    }

    pub fn restore(&mut self) {
        self.value = self.original.clone();
    }

    pub fn can_replace_size(&self) -> bool {
        contains_size_pattern(&self.value)
    }

    pub fn can_replace_date(&self) -> bool {
        contains_date_pattern(&self.value)
    }

    /// Returns false when there was nothing to replace
    pub fn replace_size(&mut self) -> bool {
        if !self.can_replace_size() {
            return false;
        }
        self.value = replace_size_pattern(&self.value);
        true
    }

    pub fn replace_date(&mut self, token: FilenameToken) -> bool {
        if !self.can_replace_date() {
            return false;
        }
        self.value = replace_first_date_pattern(&self.value, token);
        true
    }

    /// Insert a token at the caret; returns the caret position after it
    pub fn insert(&mut self, selection: std::ops::Range<usize>, token: FilenameToken) -> usize {
        let (value, caret) = insert_token(&self.value, selection, token);
        self.value = value;
        caret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_size_detection() {
        assert!(contains_size_pattern("photo_100x200_v2"));
        assert!(contains_size_pattern("100x200"));
        assert!(contains_size_pattern("poster 100х200"));
        assert!(contains_size_pattern("flyer_A4"));
        assert!(contains_size_pattern("А3h-final"));
        assert!(contains_size_pattern("визитка_90х50мм"));
        assert!(contains_size_pattern("макет100x200"));
        assert!(!contains_size_pattern("photo100x200"));
        assert!(!contains_size_pattern("A7_flyer"));
        assert!(!contains_size_pattern("FA4"));
    }

    #[test]
    fn test_date_detection() {
        assert!(contains_date_pattern("report_240101"));
        assert!(!contains_date_pattern("report_2401011"));
        assert!(!contains_date_pattern("report_24010"));
    }

    #[test]
    fn test_replace_size_keeps_delimiters() {
        assert_eq!(replace_size_pattern("photo_100x200_v2"), "photo_*size*_v2");
        assert_eq!(replace_size_pattern("100x200_cover"), "*size*_cover");
        assert_eq!(replace_size_pattern("flyer_A4_print"), "flyer_*size*_print");
        assert_eq!(replace_size_pattern("визитка_90х50мм"), "визитка_*size*мм");
        assert_eq!(replace_size_pattern("nothing"), "nothing");
    }

    #[test]
    fn test_replace_first_date_only() {
        assert_eq!(
            replace_first_date_pattern("230101_report_240101", FilenameToken::Yymmdd),
            "*YYMMDD*_report_240101"
        );
        assert_eq!(
            replace_first_date_pattern("no date", FilenameToken::Ddmmyy),
            "no date"
        );
    }

    #[test]
    fn test_expand_size_and_dates() {
        assert_eq!(
            expand_filename("photo_*size*_v2", 210.0, 297.0, date()),
            "photo_210x297_v2"
        );
        assert_eq!(
            expand_filename("*YYMMDD*report", 1.0, 1.0, date()),
            "240307_report"
        );
        assert_eq!(
            expand_filename("report*DDMMYY*", 1.0, 1.0, date()),
            "report_070324"
        );
    }

    #[test]
    fn test_expand_rounds_size() {
        assert_eq!(expand_filename("*size*", 209.6, 296.4, date()), "210x296");
    }

    #[test]
    fn test_expand_collapses_underscores() {
        assert_eq!(expand_filename("file_*size*", 10.0, 20.0, date()), "file_10x20");
        assert_eq!(expand_filename("__a__*size*__", 10.0, 20.0, date()), "a_10x20");
    }

    #[test]
    fn test_expand_adjacent_tokens() {
        assert_eq!(
            expand_filename("*size**YYMMDD*", 10.0, 20.0, date()),
            "10x20_240307"
        );
    }

    #[test]
    fn test_expand_empty_falls_back() {
        assert_eq!(expand_filename("   ", 10.0, 20.0, date()), "output");
        assert_eq!(expand_filename("___", 10.0, 20.0, date()), "output");
    }

    #[test]
    fn test_base_file_name() {
        assert_eq!(base_file_name("scan.v2.pdf"), "scan.v2");
        assert_eq!(base_file_name("scan"), "scan");
        assert_eq!(base_file_name(".hidden"), ".hidden");
    }

    #[test]
    fn test_insert_token_over_selection() {
        let (value, caret) = insert_token("photo_old_v2", 6..9, FilenameToken::Size);
        assert_eq!(value, "photo_*size*_v2");
        assert_eq!(caret, 12);

        let (value, _) = insert_token("abc", 10..10, FilenameToken::Yymmdd);
        assert_eq!(value, "abc*YYMMDD*");
    }

    #[test]
    fn test_editor_restore() {
        let mut editor = FilenameEditor::new("scan_100x200");
        assert!(editor.replace_size());
        assert_eq!(editor.value(), "scan_*size*");
        assert!(editor.is_modified());
        assert!(!editor.replace_date(FilenameToken::Yymmdd));
        editor.restore();
        assert!(!editor.is_modified());
    }
}
