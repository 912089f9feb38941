//! ## Summary
//! Decides what an event write does to its recurrence rule.
//!
//! The relation has two states, unlinked and linked:
//!
//! | stored rule | bundle present | change |
//! |-------------|----------------|--------------------------------|
//! | none        | no             | `Unchanged`                    |
//! | none        | yes            | `Attach` a rule built from it  |
//! | some        | yes            | `Patch` with the merged rule   |
//! | some        | no             | `Detach` and delete the rule   |

use almanac_core::model::{RecurrenceBundle, RecurrencePattern, RecurrenceRule};
use almanac_core::validation::ValidationErrors;

/// The recurrence side effect of one event write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceChange {
    Unchanged,
    Attach(RecurrencePattern),
    Patch(RecurrenceRule),
    Detach(uuid::Uuid),
}

impl RecurrenceChange {
    /// ## Summary
    /// Plans the change for an update of an event whose current rule is `existing`.
    ///
    /// ## Errors
    /// Returns field errors if the new or merged definition is invalid.
    pub fn plan(
        existing: Option<&RecurrenceRule>,
        bundle: &RecurrenceBundle,
    ) -> Result<Self, ValidationErrors> {
        match (existing, bundle.is_present()) {
            (Some(rule), true) => Ok(Self::Patch(rule.merged(bundle)?)),
            (None, true) => Ok(Self::Attach(RecurrencePattern::from_bundle(bundle)?)),
            (Some(rule), false) => Ok(Self::Detach(rule.id)),
            (None, false) => Ok(Self::Unchanged),
        }
    }

    /// ## Summary
    /// Plans the rule for a brand-new event: a rule exists only when the
    /// bundle is present.
    ///
    /// ## Errors
    /// Returns field errors if the definition is invalid.
    pub fn plan_create(
        bundle: &RecurrenceBundle,
    ) -> Result<Option<RecurrencePattern>, ValidationErrors> {
        match Self::plan(None, bundle)? {
            Self::Attach(pattern) => Ok(Some(pattern)),
            _ => Ok(None),
        }
    }
}
