pub mod person_ops;
pub mod business_ops;
pub mod project_ops;
pub mod interaction_ops;
pub mod relationship_ops;

use crate::error::FieldErrors;

/// Outcome of a form-style save. Validation failure is data, not an error:
/// the caller redisplays the form with the per-field report.
#[derive(Debug)]
pub enum SaveOutcome<T> {
    Saved(T),
    Invalid(FieldErrors),
}

impl<T> SaveOutcome<T> {
    pub fn saved(self) -> Option<T> {
        match self {
            SaveOutcome::Saved(value) => Some(value),
            SaveOutcome::Invalid(_) => None,
        }
    }

    pub fn invalid(self) -> Option<FieldErrors> {
        match self {
            SaveOutcome::Saved(_) => None,
            SaveOutcome::Invalid(errors) => Some(errors),
        }
    }
}
