use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use validator::Validate;

/// Digits with an optional leading `+` and the usual separators; an area
/// code may open with `(`
pub(crate) static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?\(?[0-9][0-9 ().\-]*$").expect("invalid phone regex")
});

/// User entity - matches the `users` table
///
/// The id is chosen by the client and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Client-assigned primary key. May be omitted on PUT, where the path id is used.
    #[serde(default)]
    #[validate(length(min = 1, max = 40, message = "id must be 1-40 characters"))]
    #[schema(example = "u1", max_length = 40)]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    #[schema(example = "ann", max_length = 100)]
    pub username: String,

    #[validate(
        email(message = "must be a valid e-mail address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    #[schema(example = "ann@example.com", max_length = 100)]
    pub email: String,

    #[validate(
        length(min = 1, max = 18, message = "phone must be 1-18 characters"),
        regex(path = *PHONE_RE, message = "phone may only contain digits, an optional leading '+' and separators")
    )]
    #[schema(example = "+1 555-0100", max_length = 18)]
    pub phone: String,

    #[serde(default)]
    #[schema(example = "1990-01-01")]
    pub date_of_birth: Option<NaiveDate>,
}

/// Sparse PATCH body: external field name to new value
pub type UserPatch = serde_json::Map<String, serde_json::Value>;

/// Result of a write against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Statement applied, with the number of rows it changed
    Applied(u64),
    /// No row matched the key
    NotFound,
    /// The primary key is already taken
    Conflict,
}

impl WriteOutcome {
    /// Zero rows means the key matched nothing.
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            WriteOutcome::NotFound
        } else {
            WriteOutcome::Applied(rows)
        }
    }
}
