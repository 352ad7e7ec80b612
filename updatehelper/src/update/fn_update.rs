use super::Update;
use crate::Version;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// An [`Update`] backed by a closure.
///
/// The storage type is inferred from the closure's argument, so annotate it when
/// the compiler cannot see it otherwise:
///
/// ```rust,ignore
/// let update = FnUpdate::new(2, |storage: &mut Vec<i64>| {
///     storage.push(2);
///     Ok(())
/// });
/// ```
pub struct FnUpdate<S: ?Sized, F> {
    version: Version,
    action: F,
    _storage: PhantomData<fn(&mut S)>,
}

impl<S, F> FnUpdate<S, F>
where
    S: ?Sized,
    F: Fn(&mut S) -> anyhow::Result<()>,
{
    pub fn new(version: Version, action: F) -> Self {
        FnUpdate {
            version,
            action,
            _storage: PhantomData,
        }
    }
}

impl<S, F> Update for FnUpdate<S, F>
where
    S: ?Sized,
    F: Fn(&mut S) -> anyhow::Result<()>,
{
    type Storage = S;

    fn update_version(&self) -> Version {
        self.version
    }

    fn execute(&self, storage: &mut S) -> anyhow::Result<()> {
        (self.action)(storage)
    }
}

impl<S: ?Sized, F: Clone> Clone for FnUpdate<S, F> {
    fn clone(&self) -> Self {
        FnUpdate {
            version: self.version,
            action: self.action.clone(),
            _storage: PhantomData,
        }
    }
}

impl<S: ?Sized, F> Debug for FnUpdate<S, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnUpdate")
            .field("version", &self.version)
            .field("action", &"<closure>")
            .finish()
    }
}
