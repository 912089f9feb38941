use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::validation::{ValidationErrors, is_hex_color};

pub const NAME_MAX_LEN: usize = 50;
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Editable calendar fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFields {
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_visible: bool,
}

impl CalendarFields {
    /// ## Summary
    /// Checks the name length and the color format.
    ///
    /// ## Errors
    /// Returns every failed check as a field error.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "This field may not be blank.");
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.push(
                "name",
                format!("Ensure this field has no more than {NAME_MAX_LEN} characters."),
            );
        }

        if !is_hex_color(&self.color) {
            errors.push("color", "Enter a color in #RRGGBB format.");
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calendar {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Calendar {
    pub fn assign(&mut self, fields: CalendarFields) {
        self.name = fields.name.trim().to_string();
        self.description = fields.description;
        self.color = fields.color;
        self.is_visible = fields.is_visible;
    }
}
