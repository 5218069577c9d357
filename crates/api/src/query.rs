//! Query parameter types for the listing and search endpoints.
//!
//! Numbers arrive as strings and are parsed leniently: a missing or
//! unparseable value falls back to the default and is then normalised by
//! the record service, so `?page=abc` behaves like `?page=1`.

use serde::Deserialize;
use wealthlist_core::pagination::{PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use wealthlist_core::search::MillionaireFilter;

/// `?page=&pageSize=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            lenient(self.page.as_deref(), DEFAULT_PAGE),
            lenient(self.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        )
    }
}

/// `?lastName=&firstName=&middleName=&country=&page=&pageSize=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub country: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl SearchParams {
    pub fn filter(&self) -> MillionaireFilter {
        MillionaireFilter {
            last_name: trimmed(&self.last_name),
            first_name: trimmed(&self.first_name),
            middle_name: trimmed(&self.middle_name),
            country: trimmed(&self.country),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            lenient(self.page.as_deref(), DEFAULT_PAGE),
            lenient(self.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        )
    }
}

fn lenient(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}
