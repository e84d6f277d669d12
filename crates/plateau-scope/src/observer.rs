#![forbid(unsafe_code)]

//! Optional observation of scope mutations.
//!
//! A scope reports each mutation to its [`ScopeObserver`], if it has one.
//! Observers receive the scope label and an owned [`ScopeEvent`]; they are
//! never handed the scope itself, so they cannot re-enter it.
//!
//! [`TracingObserver`] forwards events to `tracing` and can dump a
//! [`ScopeSnapshot`] on demand.

use std::cell::Cell as Flag;

use crate::snapshot::ScopeSnapshot;

/// A mutation of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEvent {
    /// A cell was registered with `add_cell`, `insert_cell` or `replace_cell`.
    CellAdded {
        /// Registered name.
        name: String,
        /// Value type.
        type_name: &'static str,
    },
    /// A derived cell was built by `deal`.
    CellDealt {
        /// Registered name.
        name: String,
        /// Source names, in combine order.
        sources: Vec<String>,
    },
    /// A registration replaced an existing cell. Listeners attached to the
    /// previous cell stay attached to it.
    CellShadowed {
        /// Name that now refers to a different cell.
        name: String,
        /// Value type of the cell that was replaced.
        previous_type: &'static str,
    },
    /// A factory was registered.
    FactoryRegistered {
        /// Registered name.
        name: String,
    },
    /// A root was set and cleared.
    RootSet {
        /// Root identifier, if the node has one.
        id: Option<String>,
    },
    /// A root identifier did not resolve; the scope is unrooted.
    RootUnresolved {
        /// Identifier that was looked up.
        id: String,
    },
    /// Output was mounted into the root.
    Mounted,
    /// Output was appended to the root without clearing it.
    Appended,
    /// A traced cell was written.
    CellChanged {
        /// Registered name.
        name: String,
        /// `Debug` rendering of the new value.
        value: String,
    },
}

impl ScopeEvent {
    /// Short tag for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CellAdded { .. } => "cell_added",
            Self::CellDealt { .. } => "cell_dealt",
            Self::CellShadowed { .. } => "cell_shadowed",
            Self::FactoryRegistered { .. } => "factory_registered",
            Self::RootSet { .. } => "root_set",
            Self::RootUnresolved { .. } => "root_unresolved",
            Self::Mounted => "mounted",
            Self::Appended => "appended",
            Self::CellChanged { .. } => "cell_changed",
        }
    }
}

/// Receives scope mutations.
pub trait ScopeObserver {
    /// Called after each mutation of the scope labelled `scope`.
    fn on_event(&self, scope: &str, event: &ScopeEvent);
}

impl<F> ScopeObserver for F
where
    F: Fn(&str, &ScopeEvent),
{
    fn on_event(&self, scope: &str, event: &ScopeEvent) {
        self(scope, event);
    }
}

/// Observer that logs every event through `tracing`.
#[derive(Debug)]
pub struct TracingObserver {
    enabled: Flag<bool>,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingObserver {
    /// An enabled observer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: Flag::new(true),
        }
    }

    /// Turn logging on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
        tracing::debug!(enabled, "scope logging toggled");
    }

    /// Whether events are being logged.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Log every cell of `snapshot` at info level.
    ///
    /// `trigger` names what prompted the dump, if anything.
    pub fn log_state(&self, snapshot: &ScopeSnapshot, trigger: Option<&str>) {
        if !self.is_enabled() {
            return;
        }
        tracing::info!(
            scope = %snapshot.label,
            trigger = trigger.unwrap_or("initialization"),
            cells = snapshot.cells.len(),
            factories = snapshot.factory_count,
            root = snapshot.root.as_deref().unwrap_or("(none)"),
            "scope state"
        );
        for cell in &snapshot.cells {
            tracing::info!(
                scope = %snapshot.label,
                cell = %cell.name,
                value = %cell.value,
                version = cell.version,
                derived = cell.derived,
                "cell state"
            );
        }
    }
}

impl ScopeObserver for TracingObserver {
    fn on_event(&self, scope: &str, event: &ScopeEvent) {
        if !self.is_enabled() {
            return;
        }
        match event {
            ScopeEvent::CellChanged { name, value } => {
                tracing::debug!(scope, cell = %name, value = %value, "cell changed");
            }
            ScopeEvent::CellShadowed { name, previous_type } => {
                tracing::debug!(scope, cell = %name, previous_type, "cell shadowed");
            }
            ScopeEvent::RootUnresolved { id } => {
                tracing::debug!(scope, id = %id, "root unresolved");
            }
            other => {
                tracing::debug!(scope, event = other.kind(), detail = ?other, "scope event");
            }
        }
    }
}
