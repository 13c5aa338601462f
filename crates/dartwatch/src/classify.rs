//! Keyword classification of filing titles.
//!
//! A filing counts as a value-up plan disclosure when its report title
//! contains any keyword variant, case-insensitively. Substring match
//! only; no stemming or fuzzy matching.

/// Keyword variants identifying a value-up plan (기업가치제고계획)
/// disclosure. All entries are stored lower-cased.
pub const VALUE_UP_KEYWORDS: [&str; 6] = [
    "기업가치제고",
    "기업가치제고계획",
    "밸류업",
    "value up",
    "value-up",
    "기업가치 제고",
];

/// Returns true when the report title matches any value-up keyword.
pub fn is_value_up(title: &str) -> bool {
    let title = title.to_lowercase();
    VALUE_UP_KEYWORDS.iter().any(|keyword| title.contains(keyword))
}
