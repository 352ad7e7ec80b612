use super::Update;
use crate::Version;

/// An ordered sequence of update slots.
///
/// A slot is normally filled, but a worker may hand out a collection with holes
/// (for instance when an update factory could not produce an update for a position).
/// Holes are reported as [`ErrorKind::NullInput`](crate::errors::ErrorKind::NullInput)
/// by validation instead of being silently dropped.
///
/// The collection itself does not check ordering; that is the job of
/// [`validate_updates`](crate::validation::validate_updates).
#[derive(Debug, Clone)]
pub struct UpdateCollection<U> {
    slots: Vec<Option<U>>,
}

impl<U> Default for UpdateCollection<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> UpdateCollection<U> {
    pub fn new() -> Self {
        UpdateCollection { slots: Vec::new() }
    }

    /// Creates a collection from raw slots, holes included.
    pub fn from_slots(slots: Vec<Option<U>>) -> Self {
        UpdateCollection { slots }
    }

    /// Appends an update at the end of the collection.
    pub fn push(&mut self, update: U) {
        self.slots.push(Some(update));
    }

    /// Appends an empty slot at the end of the collection.
    pub fn push_missing(&mut self) {
        self.slots.push(None);
    }

    /// Inserts a slot at `index`, shifting all later slots.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, slot: Option<U>) {
        self.slots.insert(index, slot);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<U>] {
        &self.slots
    }

    /// Iterates over the slots in order; holes are yielded as `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&U>> {
        self.slots.iter().map(Option::as_ref)
    }

    pub fn into_slots(self) -> Vec<Option<U>> {
        self.slots
    }
}

impl<U: Update> UpdateCollection<U> {
    /// Highest version among the present updates, ignoring order and holes.
    ///
    /// Handy for workers that derive their latest version from the updates they
    /// create.
    pub fn latest_version(&self) -> Option<Version> {
        self.iter().flatten().map(|update| update.update_version()).max()
    }

    /// The version of every slot, in collection order.
    pub fn versions(&self) -> Vec<Option<Version>> {
        self.iter()
            .map(|slot| slot.map(|update| update.update_version()))
            .collect()
    }
}

impl<U> From<Vec<U>> for UpdateCollection<U> {
    fn from(updates: Vec<U>) -> Self {
        updates.into_iter().collect()
    }
}

impl<U> FromIterator<U> for UpdateCollection<U> {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        UpdateCollection {
            slots: iter.into_iter().map(Some).collect(),
        }
    }
}

impl<U> Extend<U> for UpdateCollection<U> {
    fn extend<I: IntoIterator<Item = U>>(&mut self, iter: I) {
        self.slots.extend(iter.into_iter().map(Some));
    }
}
