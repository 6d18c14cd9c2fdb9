//! Static mapping between the JSON field names of [`User`](crate::User) and
//! the columns of the `users` table, and the typed patch built from it.
//!
//! The table replaces any runtime reflection over the struct: a PATCH body is
//! checked key by key against [`USER_COLUMNS`] and turned into a [`PatchSet`].

use chrono::NaiveDate;
use serde_json::Value;
use validator::{ValidateEmail, ValidateLength};

use crate::error::{UserError, UserResult};
use crate::models::{PHONE_RE, UserPatch};

pub const USER_TABLE: &str = "users";

/// Value rules for a text column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    Plain,
    Email,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text { min_len: u64, max_len: u64, rule: TextRule },
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Name on the wire (`dateOfBirth`)
    pub field: &'static str,
    /// Name in SQL (`date_of_birth`)
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    /// Selects the row; never assigned by a patch
    pub key: bool,
}

/// Every column of `users`, in table order.
pub const USER_COLUMNS: &[Column] = &[
    Column {
        field: "id",
        name: "id",
        kind: ColumnKind::Text { min_len: 1, max_len: 40, rule: TextRule::Plain },
        nullable: false,
        key: true,
    },
    Column {
        field: "username",
        name: "username",
        kind: ColumnKind::Text { min_len: 1, max_len: 100, rule: TextRule::Plain },
        nullable: false,
        key: false,
    },
    Column {
        field: "email",
        name: "email",
        kind: ColumnKind::Text { min_len: 1, max_len: 100, rule: TextRule::Email },
        nullable: false,
        key: false,
    },
    Column {
        field: "phone",
        name: "phone",
        kind: ColumnKind::Text { min_len: 1, max_len: 18, rule: TextRule::Phone },
        nullable: false,
        key: false,
    },
    Column {
        field: "dateOfBirth",
        name: "date_of_birth",
        kind: ColumnKind::Date,
        nullable: true,
        key: false,
    },
];

pub fn column_for_field(field: &str) -> Option<&'static Column> {
    USER_COLUMNS.iter().find(|c| c.field == field)
}

pub fn key_column() -> &'static Column {
    // USER_COLUMNS always starts with the primary key.
    &USER_COLUMNS[0]
}

/// A checked column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchValue {
    Text(String),
    Date(Option<NaiveDate>),
}

/// Validated partial update: the row key plus the columns to assign, in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSet {
    pub key: String,
    pub assignments: Vec<(&'static Column, PatchValue)>,
}

impl PatchSet {
    /// Check every known key of `fields` and collect the assignments.
    ///
    /// Unknown keys are skipped. Fails when the key field is missing, when a
    /// value has the wrong type or breaks its column's rules, and when nothing
    /// would be assigned.
    pub fn from_fields(fields: &UserPatch) -> UserResult<Self> {
        for name in fields.keys() {
            if column_for_field(name).is_none() {
                tracing::debug!(field = %name, "Ignoring unknown patch field");
            }
        }

        let key_col = key_column();
        let Some(raw_key) = fields.get(key_col.field) else {
            return Err(UserError::Validation(format!(
                "patch must contain '{}'",
                key_col.field
            )));
        };
        let PatchValue::Text(key) = check_value(key_col, raw_key)? else {
            return Err(UserError::Internal("key column is not text".to_string()));
        };

        let mut assignments = Vec::new();
        for column in USER_COLUMNS.iter().filter(|c| !c.key) {
            if let Some(value) = fields.get(column.field) {
                assignments.push((column, check_value(column, value)?));
            }
        }

        if assignments.is_empty() {
            return Err(UserError::Validation(
                "patch contains no updatable fields".to_string(),
            ));
        }

        Ok(Self { key, assignments })
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.assignments.iter().map(|(column, _)| column.name)
    }
}

fn check_value(column: &Column, value: &Value) -> UserResult<PatchValue> {
    match (column.kind, value) {
        (_, Value::Null) if !column.nullable => Err(UserError::Validation(format!(
            "'{}' cannot be null",
            column.field
        ))),
        (ColumnKind::Date, Value::Null) => Ok(PatchValue::Date(None)),
        (ColumnKind::Date, Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|date| PatchValue::Date(Some(date)))
            .map_err(|_| {
                UserError::Validation(format!(
                    "'{}' must be a date formatted YYYY-MM-DD",
                    column.field
                ))
            }),
        (ColumnKind::Text { min_len, max_len, rule }, Value::String(s)) => {
            if !s.validate_length(Some(min_len), Some(max_len), None) {
                return Err(UserError::Validation(format!(
                    "'{}' must be {}-{} characters",
                    column.field, min_len, max_len
                )));
            }
            let valid = match rule {
                TextRule::Plain => true,
                TextRule::Email => s.validate_email(),
                TextRule::Phone => PHONE_RE.is_match(s),
            };
            if !valid {
                return Err(UserError::Validation(format!(
                    "'{}' has an invalid format",
                    column.field
                )));
            }
            Ok(PatchValue::Text(s.clone()))
        }
        (_, other) => Err(UserError::Validation(format!(
            "'{}' must be a string, got {}",
            column.field,
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
