//! Structural validation of an update collection.
//!
//! Validation never executes anything. It walks the collection once and reports the
//! first problem it finds as a [`ValidationResult`], which callers may inspect before
//! deciding to turn it into an error with [`ValidationResult::ensure_correct`].

use crate::errors::{ErrorKind, UpdateError, UpdateResult};
use crate::update::{Update, UpdateCollection};
use crate::Version;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of validating an [`UpdateCollection`] against an expected final version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidationResult {
    /// Versions strictly increase and end at the expected version.
    Correct,
    /// The collection has no elements.
    Empty,
    /// A later update has a lower version than the one before it.
    WrongOrder {
        from_version: Version,
        to_version: Version,
    },
    /// Two adjacent updates share a version.
    EqualVersions { version: Version },
    /// The collection is ordered but does not end at the expected version.
    WrongFinalVersion { expected: Version, actual: Version },
}

impl ValidationResult {
    pub fn is_correct(&self) -> bool {
        matches!(self, ValidationResult::Correct)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ValidationResult::Empty)
    }

    pub fn is_wrong_order(&self) -> bool {
        matches!(self, ValidationResult::WrongOrder { .. })
    }

    pub fn has_equal_versions(&self) -> bool {
        matches!(self, ValidationResult::EqualVersions { .. })
    }

    pub fn is_unexpected_final_version(&self) -> bool {
        matches!(self, ValidationResult::WrongFinalVersion { .. })
    }

    /// Converts a failed validation into the error reported to the caller.
    ///
    /// Returns `None` for [`ValidationResult::Correct`].
    pub fn into_error(self) -> Option<UpdateError> {
        if self.is_correct() {
            None
        } else {
            Some(UpdateError::new(
                &self.to_string(),
                ErrorKind::ValidationError(self),
            ))
        }
    }

    /// Fails with a [`ErrorKind::ValidationError`] unless the result is `Correct`.
    pub fn ensure_correct(self) -> UpdateResult<()> {
        match self.into_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Display for ValidationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationResult::Correct => write!(f, "Updates are correctly ordered"),
            ValidationResult::Empty => write!(f, "There are no updates provided!"),
            ValidationResult::WrongOrder {
                from_version,
                to_version,
            } => write!(
                f,
                "Wrong update order from version '{}' to '{}'",
                from_version, to_version
            ),
            ValidationResult::EqualVersions { version } => {
                write!(f, "Found more than one update for version '{}'", version)
            }
            ValidationResult::WrongFinalVersion { expected, actual } => write!(
                f,
                "The provided updates are not sufficient to push the storage to the expected version. Expected: {}, actual: {}",
                expected, actual
            ),
        }
    }
}

/// Validates the order and completeness of `updates`.
///
/// The collection is scanned once, pair by pair. For each adjacent pair the order
/// check runs before the equality check, and the final version is only compared
/// once the whole collection is known to be ordered. The first violation wins.
///
/// # Errors
///
/// Fails with [`ErrorKind::NullInput`] if `updates` is `None` or contains a hole.
/// Data problems are not errors; they come back as a non-`Correct` result.
pub fn validate_updates<U: Update>(
    updates: Option<&UpdateCollection<U>>,
    expected_final_version: Version,
) -> UpdateResult<ValidationResult> {
    let updates = updates.ok_or_else(|| {
        log::error!("Update collection is missing");
        UpdateError::new("There is no update collection to validate", ErrorKind::NullInput)
    })?;

    let mut slots = updates.iter();
    let first = match slots.next() {
        None => return Ok(ValidationResult::Empty),
        Some(first) => first.ok_or_else(|| {
            log::error!("First update of the collection is missing");
            UpdateError::new("The first update is null", ErrorKind::NullInput)
        })?,
    };

    let mut prev_version = first.update_version();
    for slot in slots {
        let update = slot.ok_or_else(|| {
            log::error!("Update following version {} is missing", prev_version);
            UpdateError::new(
                &format!("The update after version '{}' is null", prev_version),
                ErrorKind::NullInput,
            )
        })?;

        let version = update.update_version();
        if prev_version > version {
            return Ok(ValidationResult::WrongOrder {
                from_version: prev_version,
                to_version: version,
            });
        }
        if prev_version == version {
            return Ok(ValidationResult::EqualVersions {
                version: prev_version,
            });
        }
        prev_version = version;
    }

    if prev_version != expected_final_version {
        return Ok(ValidationResult::WrongFinalVersion {
            expected: expected_final_version,
            actual: prev_version,
        });
    }

    Ok(ValidationResult::Correct)
}
