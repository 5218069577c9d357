//! Millionaire entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};
use wealthlist_core::types::{DbId, Timestamp};

/// A row from the `millionaires` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Millionaire {
    pub id: DbId,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub company: Option<String>,
    pub net_worth: Option<f64>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub biography: Option<String>,
    /// Relative path of the stored photo, owned by the photo endpoints.
    pub path_to_photo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a millionaire or fully replacing an existing one.
///
/// The photo path is not part of this DTO; it is set through the photo
/// endpoints only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MillionaireInput {
    #[validate(
        length(min = 1, max = 500, message = "lastName must be 1-500 characters"),
        custom(function = "not_blank", message = "lastName must not be blank")
    )]
    pub last_name: String,
    #[validate(
        length(min = 1, max = 500, message = "firstName must be 1-500 characters"),
        custom(function = "not_blank", message = "firstName must not be blank")
    )]
    pub first_name: String,
    #[validate(length(max = 500, message = "middleName must be at most 500 characters"))]
    pub middle_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub company: Option<String>,
    #[validate(range(min = 0.0, message = "netWorth must not be negative"))]
    pub net_worth: Option<f64>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub biography: Option<String>,
}

impl MillionaireInput {
    /// Trim text fields and turn blank optional strings into `None`.
    pub fn normalized(self) -> Self {
        Self {
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            middle_name: blank_to_none(self.middle_name),
            birth_date: self.birth_date,
            birth_place: blank_to_none(self.birth_place),
            company: blank_to_none(self.company),
            net_worth: self.net_worth,
            industry: blank_to_none(self.industry),
            country: blank_to_none(self.country),
            biography: blank_to_none(self.biography),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
