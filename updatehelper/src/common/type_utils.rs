use parking_lot::RwLock;
use std::sync::Arc;

/// Shared, lock-protected value. Clones point at the same value.
pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}
