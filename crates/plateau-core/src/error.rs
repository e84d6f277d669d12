#![forbid(unsafe_code)]

//! Errors reported by cell writes.
//!
//! Reads, subscriptions and ordinary writes never fail. The only refusals
//! come from [`Cell::try_set`](crate::Cell::try_set) and friends, which
//! surface the re-entrancy guard and the read-only nature of derived cells.

/// A write that a cell refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
    /// The cell was already notifying `depth` times and its policy allows at
    /// most `limit` nested sweeps.
    #[error("re-entrant write refused at notification depth {depth} (limit {limit})")]
    Reentrant {
        /// Sweeps in flight when the write arrived.
        depth: usize,
        /// Limit configured by the cell's policy.
        limit: usize,
    },
    /// Derived cells only change through their own recompute.
    #[error("derived cells cannot be written directly")]
    DerivedWrite,
}
