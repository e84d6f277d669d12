#![forbid(unsafe_code)]

//! Cells mirrored into a live node property.
//!
//! A [`SyncedCell`] is a `Cell<String>` whose every accepted write is first
//! copied into a property of a host node (an input's `value`, say) and then
//! published to listeners. Reads and subscriptions behave exactly like any
//! other cell.

use std::fmt;
use std::ops::Deref;

use plateau_core::Cell;

use crate::host::Node;

/// A string cell kept in step with one property of a node.
#[derive(Clone)]
pub struct SyncedCell<N: Node> {
    cell: Cell<String>,
    target: N,
    property: String,
}

/// Create a cell mirrored into `target.property`.
///
/// The initial value is the property's current value, or the empty string
/// when the node has none.
pub fn sync_cell<N: Node>(target: &N, property: &str) -> SyncedCell<N> {
    let initial = target.property(property).unwrap_or_default();
    let mirror_target = target.clone();
    let mirror_property = property.to_string();
    let cell = Cell::with_mirror(initial, move |value: &String| {
        mirror_target.set_property(&mirror_property, value);
    });
    tracing::trace!(property, "synced cell created");
    SyncedCell {
        cell,
        target: target.clone(),
        property: property.to_string(),
    }
}

impl<N: Node> SyncedCell<N> {
    /// Re-read the property and publish it.
    ///
    /// For hosts whose property changes outside the cell, e.g. user input.
    pub fn pull(&self) {
        let current = self.target.property(&self.property).unwrap_or_default();
        self.cell.set(current);
    }

    /// Name of the mirrored property.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The node being mirrored into.
    #[must_use]
    pub fn target(&self) -> &N {
        &self.target
    }

    /// Plain handle to the underlying cell, for scopes and derive sources.
    #[must_use]
    pub fn to_cell(&self) -> Cell<String> {
        self.cell.clone()
    }
}

impl<N: Node> Deref for SyncedCell<N> {
    type Target = Cell<String>;

    fn deref(&self) -> &Self::Target {
        &self.cell
    }
}

impl<N: Node> From<SyncedCell<N>> for Cell<String> {
    fn from(synced: SyncedCell<N>) -> Self {
        synced.cell
    }
}

impl<N: Node> fmt::Debug for SyncedCell<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncedCell")
            .field("property", &self.property)
            .field("cell", &self.cell)
            .finish()
    }
}
