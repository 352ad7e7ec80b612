use crate::errors::UpdateResult;
use crate::update::{Update, UpdateCollection};
use crate::Version;

/// Caller-supplied collaborator of the [`UpdateHelper`](crate::UpdateHelper).
///
/// The worker knows everything storage specific: which version the updates lead
/// to, how to build them, whether the storage is still usable, and what to do
/// around every step. The helper only sequences the calls.
///
/// The hooks default to doing nothing.
///
/// # Examples
///
/// ```rust,ignore
/// struct SchemaWorker;
///
/// impl UpdateWorker for SchemaWorker {
///     type Storage = Database;
///     type Update = Box<dyn Update<Storage = Database>>;
///
///     fn latest_update_version(&self, _: &Database) -> Version {
///         2
///     }
///
///     fn create_updates(&mut self) -> UpdateCollection<Self::Update> {
///         vec![create_users_table(), add_email_column()].into()
///     }
///
///     fn is_storage_closed(&self, db: &Database) -> bool {
///         db.is_closed()
///     }
/// }
/// ```
pub trait UpdateWorker {
    /// The storage to update (a database, a file or similar).
    type Storage: ?Sized;

    /// The updates this worker creates.
    type Update: Update<Storage = Self::Storage>;

    /// Version of the last update. Must equal the `new_version` passed to
    /// [`UpdateHelper::on_upgrade`](crate::UpdateHelper::on_upgrade).
    fn latest_update_version(&self, storage: &Self::Storage) -> Version;

    /// Creates the updates, ordered by strictly increasing version.
    fn create_updates(&mut self) -> UpdateCollection<Self::Update>;

    /// Called right before an update is executed.
    fn on_pre_update(
        &mut self,
        _storage: &mut Self::Storage,
        _update: &Self::Update,
    ) -> UpdateResult<()> {
        Ok(())
    }

    /// Called right after an update was executed successfully.
    fn on_post_update(
        &mut self,
        _storage: &mut Self::Storage,
        _update: &Self::Update,
    ) -> UpdateResult<()> {
        Ok(())
    }

    /// Called once all pending updates were executed.
    fn on_upgrading_done(&mut self, _storage: &mut Self::Storage) -> UpdateResult<()> {
        Ok(())
    }

    /// Checks whether the storage was closed and can no longer be updated.
    fn is_storage_closed(&self, storage: &Self::Storage) -> bool;
}

impl<W: UpdateWorker + ?Sized> UpdateWorker for &mut W {
    type Storage = W::Storage;
    type Update = W::Update;

    fn latest_update_version(&self, storage: &Self::Storage) -> Version {
        (**self).latest_update_version(storage)
    }

    fn create_updates(&mut self) -> UpdateCollection<Self::Update> {
        (**self).create_updates()
    }

    fn on_pre_update(
        &mut self,
        storage: &mut Self::Storage,
        update: &Self::Update,
    ) -> UpdateResult<()> {
        (**self).on_pre_update(storage, update)
    }

    fn on_post_update(
        &mut self,
        storage: &mut Self::Storage,
        update: &Self::Update,
    ) -> UpdateResult<()> {
        (**self).on_post_update(storage, update)
    }

    fn on_upgrading_done(&mut self, storage: &mut Self::Storage) -> UpdateResult<()> {
        (**self).on_upgrading_done(storage)
    }

    fn is_storage_closed(&self, storage: &Self::Storage) -> bool {
        (**self).is_storage_closed(storage)
    }
}
