//! A cache of one value guarded by dependency stamps.

use std::convert::Infallible;
use std::fmt;

use parking_lot::RwLock;
use tracing::trace;

use crate::{Dependency, StampSnapshot};

struct Memoized<V> {
    value: V,
    stamps: StampSnapshot,
}

/// A memoized value that is recomputed whenever one of its dependencies moves.
///
/// No lock is held while the producer runs. Concurrent readers that all find
/// the cell stale may each compute a value; the last one to finish publishes
/// its result. Producers must therefore be pure functions of their inputs.
///
/// Value and stamps are always replaced together, so a reader never observes
/// a value paired with the stamps of another computation.
pub struct MemoCell<V> {
    label: &'static str,
    dependencies: Vec<Dependency>,
    slot: RwLock<Option<Memoized<V>>>,
}

impl<V: Clone> MemoCell<V> {
    /// Creates an empty cell.
    ///
    /// # Arguments
    ///
    /// * `label` - Name used in trace logs
    /// * `dependencies` - Sources whose stamps guard the cached value
    pub fn new(label: &'static str, dependencies: Vec<Dependency>) -> Self {
        Self {
            label,
            dependencies,
            slot: RwLock::new(None),
        }
    }

    /// Returns the cached value, recomputing it with `produce` if stale.
    pub fn get_or_compute(&self, produce: impl FnOnce() -> V) -> V {
        let Ok(value) = self.try_get_or_compute(|| Ok::<_, Infallible>(produce()));
        value
    }

    /// Returns the cached value, recomputing it with `produce` if stale.
    ///
    /// An error from `produce` is returned as-is and leaves the cell untouched:
    /// the previous value stays in place until a later attempt succeeds.
    pub fn try_get_or_compute<E>(
        &self,
        produce: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.peek() {
            return Ok(value);
        }

        // Stamps are taken before producing: a dependency that moves while
        // the producer runs leaves the stored snapshot already stale.
        let stamps = StampSnapshot::capture(&self.dependencies);
        let value = produce()?;

        trace!(cell = self.label, stamps = ?stamps, "Recomputed memoized value");
        *self.slot.write() = Some(Memoized {
            value: value.clone(),
            stamps,
        });

        Ok(value)
    }

    /// Returns the cached value without computing, if it is still fresh.
    pub fn peek(&self) -> Option<V> {
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|memo| memo.stamps.is_current())
            .map(|memo| memo.value.clone())
    }

    /// Returns whether a fresh value is cached.
    pub fn is_fresh(&self) -> bool {
        self.slot
            .read()
            .as_ref()
            .is_some_and(|memo| memo.stamps.is_current())
    }

    /// Drops the cached value.
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }
}

impl<V> fmt::Debug for MemoCell<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.read();
        f.debug_struct("MemoCell")
            .field("label", &self.label)
            .field("dependencies", &self.dependencies.len())
            .field("stamps", &slot.as_ref().map(|memo| &memo.stamps))
            .finish()
    }
}
