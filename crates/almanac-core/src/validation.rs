//! ## Summary
//! Field-level validation failures.
//!
//! Domain checks collect every problem they find instead of stopping at the
//! first one, so a client can fix a whole form in one round trip.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single failed check on a named input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// ## Summary
/// Accumulated field errors for one request.
///
/// An empty set means validation passed; use [`ValidationErrors::into_result`]
/// to turn the collection into a `Result`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Shorthand for a collection holding exactly one error.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Appends every error from `other`.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// Records the error of a failed check, if any, and yields its value.
    pub fn capture<T>(&mut self, result: Result<T, Self>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.merge(errors);
                None
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if any error was recorded against `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// ## Summary
    /// Groups messages by field name, in field order.
    #[must_use]
    pub fn by_field(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            grouped
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }

    /// ## Summary
    /// Converts the collection into `Ok(())` when empty.
    ///
    /// ## Errors
    /// Returns `self` if at least one error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// ## Summary
/// Checks a `#RRGGBB` display color.
pub(crate) fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}
