use super::{execute_update_test, UpdateTest};
use crate::errors::UpdateResult;
use crate::update::{Update, UpdateCollection};
use crate::update_helper::{UpdateHelper, UpgradeSummary};
use crate::worker::UpdateWorker;
use crate::Version;

/// Worker adapter that tests every update right after it ran.
///
/// All calls are delegated to the wrapped worker. After the wrapped post-hook, the
/// update's test executor inserts mock data and checks consistency; a missing or
/// failing executor aborts the upgrade with
/// [`ErrorKind::TestExecutionFailed`](crate::errors::ErrorKind::TestExecutionFailed).
pub struct UpdateTester<W> {
    worker: W,
    tested_versions: Vec<Version>,
}

impl<W> UpdateTester<W>
where
    W: UpdateWorker,
    W::Update: UpdateTest,
{
    pub fn new(worker: W) -> Self {
        UpdateTester {
            worker,
            tested_versions: Vec::new(),
        }
    }

    /// Upgrades `storage` the same way [`UpdateHelper::on_upgrade`] does, testing
    /// every executed update.
    pub fn on_upgrade(
        &mut self,
        storage: &mut W::Storage,
        old_version: Version,
        new_version: Version,
    ) -> UpdateResult<UpgradeSummary> {
        UpdateHelper::new(&mut *self).on_upgrade(storage, old_version, new_version)
    }

    /// Versions whose test passed, across all runs.
    pub fn tested_versions(&self) -> &[Version] {
        &self.tested_versions
    }

    pub fn worker(&self) -> &W {
        &self.worker
    }

    pub fn into_worker(self) -> W {
        self.worker
    }
}

impl<W> UpdateWorker for UpdateTester<W>
where
    W: UpdateWorker,
    W::Update: UpdateTest,
{
    type Storage = W::Storage;
    type Update = W::Update;

    fn latest_update_version(&self, storage: &Self::Storage) -> Version {
        self.worker.latest_update_version(storage)
    }

    fn create_updates(&mut self) -> UpdateCollection<Self::Update> {
        self.worker.create_updates()
    }

    fn on_pre_update(
        &mut self,
        storage: &mut Self::Storage,
        update: &Self::Update,
    ) -> UpdateResult<()> {
        self.worker.on_pre_update(storage, update)
    }

    fn on_post_update(
        &mut self,
        storage: &mut Self::Storage,
        update: &Self::Update,
    ) -> UpdateResult<()> {
        self.worker.on_post_update(storage, update)?;
        execute_update_test(update, storage)?;
        self.tested_versions.push(update.update_version());
        Ok(())
    }

    fn on_upgrading_done(&mut self, storage: &mut Self::Storage) -> UpdateResult<()> {
        self.worker.on_upgrading_done(storage)
    }

    fn is_storage_closed(&self, storage: &Self::Storage) -> bool {
        self.worker.is_storage_closed(storage)
    }
}
