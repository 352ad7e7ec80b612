//! Support for testing updates against a real storage.
//!
//! An [`UpdateTest`] is an update that can also produce an [`UpdateTestExecutor`].
//! Right after the update ran, the executor inserts mock data into the storage and
//! checks that the storage is consistent. Two workers drive this:
//!
//! - [`UpdateTester`] wraps an existing worker and adds the test after its post-hook
//! - [`UpdateTestRunner`] runs a list of shared update tests against a storage managed
//!   by a [`StorageProvider`]

mod runner;
mod tester;

pub use runner::{SharedUpdateTest, StorageProvider, UpdateTestRunner};
pub use tester::UpdateTester;

use crate::errors::{ErrorKind, UpdateError, UpdateResult};
use crate::update::Update;
use crate::Version;
use std::sync::Arc;

/// Inserts mock data after an update and verifies the result.
pub trait UpdateTestExecutor<S: ?Sized> {
    /// Inserts mock data into the freshly updated storage.
    fn insert_mock_data(&mut self, storage: &mut S) -> anyhow::Result<()>;

    /// Checks the storage, mock data included. May clean the mock data up again.
    fn test_consistency(&mut self, storage: &mut S) -> anyhow::Result<()>;
}

/// An [`Update`] that knows how to test itself.
pub trait UpdateTest: Update {
    /// Creates the test for this update.
    ///
    /// Called once the update was executed; `storage` is already updated. `None` means
    /// the update cannot be tested, which fails the run.
    fn create_test_executor(
        &self,
        storage: &Self::Storage,
    ) -> Option<Box<dyn UpdateTestExecutor<Self::Storage> + '_>>;
}

impl<T: UpdateTest + ?Sized> UpdateTest for Box<T> {
    fn create_test_executor(
        &self,
        storage: &Self::Storage,
    ) -> Option<Box<dyn UpdateTestExecutor<Self::Storage> + '_>> {
        (**self).create_test_executor(storage)
    }
}

impl<T: UpdateTest + ?Sized> UpdateTest for Arc<T> {
    fn create_test_executor(
        &self,
        storage: &Self::Storage,
    ) -> Option<Box<dyn UpdateTestExecutor<Self::Storage> + '_>> {
        (**self).create_test_executor(storage)
    }
}

/// Creates the executor of `update` and runs it against `storage`.
pub(crate) fn execute_update_test<U: UpdateTest + ?Sized>(
    update: &U,
    storage: &mut U::Storage,
) -> UpdateResult<()> {
    let version = update.update_version();
    let mut executor = update.create_test_executor(storage).ok_or_else(|| {
        log::error!("No test available for update {}", version);
        UpdateError::new(
            &format!("Test is null for update with version '{}'", version),
            ErrorKind::TestExecutionFailed,
        )
    })?;

    executor
        .insert_mock_data(storage)
        .map_err(|cause| test_failure("Inserting mock data", version, cause))?;
    executor
        .test_consistency(storage)
        .map_err(|cause| test_failure("Consistency check", version, cause))?;
    Ok(())
}

fn test_failure(stage: &str, version: Version, cause: anyhow::Error) -> UpdateError {
    log::error!("{} failed for update {}: {}", stage, version, cause);
    UpdateError::new_with_cause(
        &format!("{} failed for update with version '{}'", stage, version),
        ErrorKind::TestExecutionFailed,
        cause,
    )
}
