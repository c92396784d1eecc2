//! Input validation helpers
//!
//! Request DTOs validate themselves with these helpers before any service
//! touches the database. Failures are collected per field so a single
//! response can report every problem at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Maximum length of short text columns such as event titles.
pub const MAX_SHORT_TEXT: usize = 40;

/// Field name to error messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .errors
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// A required text field: present and not blank.
pub fn require_text<'a>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text),
        _ => {
            errors.add(field, format!("The {} field is required.", pascal_case(field)));
            None
        }
    }
}

/// Any required value.
pub fn require<T: Copy>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.add(field, format!("The {} field is required.", pascal_case(field)));
    }
    value
}

pub fn check_max_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(text) = value {
        if text.chars().count() > max {
            errors.add(
                field,
                format!(
                    "The field {} must be a string with a maximum length of {}.",
                    pascal_case(field),
                    max
                ),
            );
        }
    }
}

pub fn check_range(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<i32>,
    min: i32,
    max: i32,
) {
    if let Some(number) = value {
        if !(min..=max).contains(&number) {
            errors.add(
                field,
                format!("The field {} must be between {} and {}.", pascal_case(field), min, max),
            );
        }
    }
}

/// `firstName` -> `FirstName`, used in human-readable messages.
fn pascal_case(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
