//! # gqlsp_memo
//!
//! Dependency-stamped memoization.
//!
//! A [`MemoCell`] caches exactly one value together with the stamps of the
//! [`DependencySource`]s it was computed from. Reading the cell returns the
//! cached value while every recorded stamp still matches its source, and
//! recomputes otherwise.
//!
//! ## Invalidation Strategy
//!
//! 1. **Counters, not events**: sources expose a monotonically increasing
//!    stamp; nothing is pushed to the cells
//! 2. **Any-mismatch staleness**: a combined snapshot is stale as soon as one
//!    constituent moved
//! 3. **Fail-soft**: a failed recomputation leaves the previous value in place
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gqlsp_memo::{Dependency, Generation, MemoCell};
//!
//! let config = Arc::new(Generation::new());
//! let deps: Vec<Dependency> = vec![config.clone()];
//! let cell = MemoCell::new("example", deps);
//!
//! assert_eq!(cell.get_or_compute(|| 1), 1);
//! assert_eq!(cell.get_or_compute(|| 2), 1);
//!
//! config.advance();
//! assert_eq!(cell.get_or_compute(|| 3), 3);
//! ```

mod cell;
mod error;
mod stamp;

pub use cell::MemoCell;
pub use error::Cancelled;
pub use stamp::{CombinedSource, Dependency, DependencySource, Generation, StampSnapshot};
