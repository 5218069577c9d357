//! Search filter for the millionaire listing.
//!
//! Each non-empty field becomes a case-insensitive substring condition on
//! its column; conditions are AND-ed together. An empty filter matches
//! every row.

use serde::Deserialize;

/// Optional substring filters. Empty strings mean "no condition".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MillionaireFilter {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub country: String,
}

impl MillionaireFilter {
    /// True when no field contributes a condition.
    pub fn is_empty(&self) -> bool {
        self.conditions().next().is_none()
    }

    /// `(column, value)` pairs for every non-empty field, in a fixed order.
    pub fn conditions(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("last_name", self.last_name.as_str()),
            ("first_name", self.first_name.as_str()),
            ("middle_name", self.middle_name.as_str()),
            ("country", self.country.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    }
}

/// Build an `ILIKE` pattern matching `value` anywhere in the column.
///
/// `%`, `_` and `\` in the input are escaped so they match literally.
pub fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
