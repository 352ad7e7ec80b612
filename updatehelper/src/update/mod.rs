//! Versioned units of migration work.
//!
//! An [`Update`] brings a storage to exactly one target version. Updates are handed
//! to the [`UpdateHelper`](crate::UpdateHelper) as an [`UpdateCollection`], built
//! fresh by the worker on every upgrade call.
//!
//! # Creating Updates
//!
//! ```rust,ignore
//! use updatehelper::update::{FnUpdate, UpdateCollection};
//!
//! let updates: UpdateCollection<_> = vec![
//!     FnUpdate::new(1, |db: &mut Vec<String>| {
//!         db.push("users".to_string());
//!         Ok(())
//!     }),
//!     FnUpdate::new(2, |db: &mut Vec<String>| {
//!         db.push("orders".to_string());
//!         Ok(())
//!     }),
//! ]
//! .into();
//! ```

mod collection;
mod fn_update;

pub use collection::UpdateCollection;
pub use fn_update::FnUpdate;

use crate::Version;
use std::sync::Arc;

/// A single versioned update of a storage.
///
/// Implementations should be immutable: the helper only ever reads the version and
/// calls [`Update::execute`] once per upgrade run.
pub trait Update {
    /// The storage this update is applied to.
    type Storage: ?Sized;

    /// The version the storage is at once this update has been executed.
    fn update_version(&self) -> Version;

    /// Applies the update to the storage.
    fn execute(&self, storage: &mut Self::Storage) -> anyhow::Result<()>;
}

impl<T: Update + ?Sized> Update for Box<T> {
    type Storage = T::Storage;

    fn update_version(&self) -> Version {
        (**self).update_version()
    }

    fn execute(&self, storage: &mut Self::Storage) -> anyhow::Result<()> {
        (**self).execute(storage)
    }
}

impl<T: Update + ?Sized> Update for Arc<T> {
    type Storage = T::Storage;

    fn update_version(&self) -> Version {
        (**self).update_version()
    }

    fn execute(&self, storage: &mut Self::Storage) -> anyhow::Result<()> {
        (**self).execute(storage)
    }
}

impl<T: Update + ?Sized> Update for &T {
    type Storage = T::Storage;

    fn update_version(&self) -> Version {
        (**self).update_version()
    }

    fn execute(&self, storage: &mut Self::Storage) -> anyhow::Result<()> {
        (**self).execute(storage)
    }
}
