//! Dependency sources and stamp snapshots.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A source of version stamps.
///
/// The stamp must never decrease and must change whenever anything derived
/// from the source could change.
pub trait DependencySource: Send + Sync {
    fn stamp(&self) -> u64;
}

/// Shared handle to a dependency source.
pub type Dependency = Arc<dyn DependencySource>;

/// A plain generation counter.
#[derive(Debug, Default)]
pub struct Generation {
    counter: AtomicU64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the generation and returns the new stamp.
    pub fn advance(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

impl DependencySource for Generation {
    fn stamp(&self) -> u64 {
        self.current()
    }
}

/// A source whose stamp moves whenever any of its constituents moves.
///
/// The stamp is the sum of the constituent stamps. Each constituent is
/// non-decreasing, so the sum changes exactly when one of them advances.
pub struct CombinedSource {
    sources: Vec<Dependency>,
}

impl CombinedSource {
    pub fn new(sources: Vec<Dependency>) -> Self {
        Self { sources }
    }
}

impl DependencySource for CombinedSource {
    fn stamp(&self) -> u64 {
        self.sources
            .iter()
            .fold(0u64, |acc, source| acc.wrapping_add(source.stamp()))
    }
}

impl fmt::Debug for CombinedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedSource")
            .field("sources", &self.sources.len())
            .field("stamp", &self.stamp())
            .finish()
    }
}

/// Stamps of a set of dependencies captured at one point in time.
#[derive(Clone)]
pub struct StampSnapshot {
    entries: Vec<(Dependency, u64)>,
}

impl StampSnapshot {
    /// Captures the current stamp of every dependency.
    pub fn capture(dependencies: &[Dependency]) -> Self {
        Self {
            entries: dependencies
                .iter()
                .map(|source| (Arc::clone(source), source.stamp()))
                .collect(),
        }
    }

    /// Returns true while every recorded stamp equals its source's current stamp.
    pub fn is_current(&self) -> bool {
        self.entries
            .iter()
            .all(|(source, recorded)| source.stamp() == *recorded)
    }

    /// Recorded stamps, in dependency order.
    pub fn stamps(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|(_, stamp)| *stamp)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for StampSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stamps()).finish()
    }
}
