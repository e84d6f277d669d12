#![forbid(unsafe_code)]

//! Point-in-time dumps of a scope's state.

use std::fmt;

/// Root description used when the root node carries no identifier.
pub const ANONYMOUS_ROOT: &str = "anonymous";

/// One registered cell as seen by [`Scope::snapshot`](crate::Scope::snapshot).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellState {
    /// Registered name.
    pub name: String,
    /// Value type.
    pub type_name: String,
    /// `Debug` rendering of the current value.
    pub value: String,
    /// Write count of the cell.
    pub version: u64,
    /// Whether the cell was built by `deal` or `derive`.
    pub derived: bool,
}

/// Every cell value, the factory count and the root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeSnapshot {
    /// Scope label.
    pub label: String,
    /// Cells sorted by name.
    pub cells: Vec<CellState>,
    /// Registered factories.
    pub factory_count: usize,
    /// Root identifier, [`ANONYMOUS_ROOT`] for a root without one, `None`
    /// when unrooted.
    pub root: Option<String>,
}

impl ScopeSnapshot {
    /// The entry for `name`, if registered.
    #[must_use]
    pub fn cell(&self, name: &str) -> Option<&CellState> {
        self.cells.iter().find(|cell| cell.name == name)
    }

    /// Rendered value of `name`, if registered.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.cell(name).map(|cell| cell.value.as_str())
    }
}

impl fmt::Display for ScopeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "scope `{}`: {} cells, {} factories, root {}",
            self.label,
            self.cells.len(),
            self.factory_count,
            self.root.as_deref().unwrap_or("(none)")
        )?;
        for cell in &self.cells {
            let marker = if cell.derived { " (derived)" } else { "" };
            writeln!(f, "  {}{marker}: {}", cell.name, cell.value)?;
        }
        Ok(())
    }
}
