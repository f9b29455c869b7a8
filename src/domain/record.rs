//! Creation and replacement of records from client drafts.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::InvalidInput;
use crate::persistence::Entity;

/// Identity and timestamp assigned when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRecord {
    /// Fresh UUID v4.
    pub id: Uuid,
    /// Creation time; also the first `updated_at`.
    pub now: DateTime<Utc>,
}

impl NewRecord {
    /// New random id stamped with the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4(),
            now: Utc::now(),
        }
    }
}

/// A record built from, and replaced by, a client-supplied draft.
pub trait Editable: Entity {
    /// Client-writable fields.
    type Draft: DeserializeOwned + Send + Sync + 'static;

    /// Checks field rules the draft's types cannot express. Runs before
    /// every create and replace.
    ///
    /// # Errors
    ///
    /// Returns the first rule the draft breaks.
    fn validate(_draft: &Self::Draft) -> Result<(), InvalidInput> {
        Ok(())
    }

    /// Builds a new record.
    fn create(draft: Self::Draft, record: NewRecord) -> Self;

    /// Replaces every client-writable field, keeping identity and
    /// creation time.
    fn apply(&mut self, draft: Self::Draft, now: DateTime<Utc>);
}

/// Fails when `value` is present and outside `min..=max`.
///
/// # Errors
///
/// Returns [`InvalidInput::OutOfRange`] naming `field`.
pub fn check_range(
    field: &'static str,
    value: Option<i32>,
    min: i32,
    max: i32,
) -> Result<(), InvalidInput> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(InvalidInput::OutOfRange { field, min, max }),
        _ => Ok(()),
    }
}

/// A record that only exists under a parent record.
pub trait Child: Editable {
    /// Owning record type.
    type Parent: Entity;

    /// Column holding the parent's id. Must be a declared filter field.
    const PARENT_KEY: &'static str;

    /// Owning record's id.
    fn parent_id(&self) -> Uuid;

    /// Moves the record under `parent`.
    fn attach(&mut self, parent: Uuid);
}
