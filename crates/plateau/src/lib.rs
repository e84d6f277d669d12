#![forbid(unsafe_code)]

//! Plateau: observable cells, derived cells, and live bindings onto a host
//! document.
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`cells`] | `plateau-core` | `Cell`, `derive`, `EventCell`, re-entrancy policy |
//! | [`binding`] | `plateau-bind` | host traits, facets, `bind`, `sync_cell` |
//! | [`scope`] | `plateau-scope` | `Scope`, `deal`, observers (feature `scope`) |
//!
//! Most programs only need the [`prelude`].
//!
//! ```
//! use plateau::prelude::*;
//! use plateau_harness::{MemoryNode, assert_markup};
//!
//! let count = Cell::new(0);
//! let label = count.map(|n| format!("Result: {n}"));
//!
//! let display = MemoryNode::element("span");
//! let _binding = Binding::on(&display).text(&label).finish();
//!
//! count.set(3);
//! assert_markup!(display, "<span>Result: 3</span>");
//! ```

pub use plateau_bind as binding;
pub use plateau_core as cells;
#[cfg(feature = "scope")]
pub use plateau_scope as scope;

pub use plateau_bind::{
    BindError, Binding, Facet, FacetCell, Host, Node, Props, bind, props, sync_cell,
};
pub use plateau_core::{Cell, CellError, EventCell, ReentrancyPolicy, Subscription, derive};
#[cfg(feature = "scope")]
pub use plateau_scope::{Scope, ScopeConfig, ScopeError, ScopeEvent, ScopeObserver};

/// Everything needed to build and bind a reactive view.
pub mod prelude {
    pub use plateau_bind::{
        Binding, Facet, FacetCell, Host, Node, Props, SyncedCell, bind, props, sync_cell,
    };
    pub use plateau_core::{Cell, EventCell, ReentrancyPolicy, Subscription, derive};
    #[cfg(feature = "scope")]
    pub use plateau_scope::{RootRef, Scope, ScopeConfig, ScopeError, TracingObserver};
}
