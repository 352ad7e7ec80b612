use super::{execute_update_test, UpdateTest};
use crate::errors::UpdateResult;
use crate::update::{Update, UpdateCollection};
use crate::update_helper::{UpdateHelper, UpgradeSummary};
use crate::worker::UpdateWorker;
use crate::Version;
use std::sync::Arc;

/// An update test shared between the runner and the caller.
pub type SharedUpdateTest<S> = Arc<dyn UpdateTest<Storage = S>>;

/// Storage management for an [`UpdateTestRunner`].
pub trait StorageProvider<S: ?Sized> {
    /// Persists `version` as the current version of `storage`.
    ///
    /// Called after every executed update, before its test runs.
    fn set_version_by(&mut self, _version: Version, _storage: &mut S) -> UpdateResult<()> {
        Ok(())
    }

    fn is_storage_closed(&self, storage: &S) -> bool;

    /// Closes the storage once the whole run succeeded.
    fn close_storage(&mut self, storage: &mut S) -> UpdateResult<()>;
}

/// Self-contained worker that runs a list of update tests.
///
/// The tests must be ordered by version. The run's target version doubles as the
/// latest update version, so a list that stops short of it fails validation.
pub struct UpdateTestRunner<S: ?Sized + 'static, P> {
    storage_provider: P,
    update_tests: Vec<SharedUpdateTest<S>>,
    new_version: Version,
}

impl<S, P> UpdateTestRunner<S, P>
where
    S: ?Sized + 'static,
    P: StorageProvider<S>,
{
    pub fn new(storage_provider: P, update_tests: Vec<SharedUpdateTest<S>>) -> Self {
        UpdateTestRunner {
            storage_provider,
            update_tests,
            new_version: 0,
        }
    }

    /// Runs every test with a version above `old_version` up to `new_version`.
    pub fn run_test_updates(
        &mut self,
        storage: &mut S,
        old_version: Version,
        new_version: Version,
    ) -> UpdateResult<UpgradeSummary> {
        self.new_version = new_version;
        UpdateHelper::new(&mut *self).on_upgrade(storage, old_version, new_version)
    }

    pub fn storage_provider(&self) -> &P {
        &self.storage_provider
    }

    pub fn update_tests(&self) -> &[SharedUpdateTest<S>] {
        &self.update_tests
    }
}

impl<S, P> UpdateWorker for UpdateTestRunner<S, P>
where
    S: ?Sized + 'static,
    P: StorageProvider<S>,
{
    type Storage = S;
    type Update = SharedUpdateTest<S>;

    fn latest_update_version(&self, _: &S) -> Version {
        self.new_version
    }

    fn create_updates(&mut self) -> UpdateCollection<SharedUpdateTest<S>> {
        self.update_tests.iter().cloned().collect()
    }

    fn on_post_update(&mut self, storage: &mut S, update: &SharedUpdateTest<S>) -> UpdateResult<()> {
        self.storage_provider
            .set_version_by(update.update_version(), storage)?;
        execute_update_test(update, storage)
    }

    fn on_upgrading_done(&mut self, storage: &mut S) -> UpdateResult<()> {
        self.storage_provider.close_storage(storage)
    }

    fn is_storage_closed(&self, storage: &S) -> bool {
        self.storage_provider.is_storage_closed(storage)
    }
}
