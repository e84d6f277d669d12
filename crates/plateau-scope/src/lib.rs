#![forbid(unsafe_code)]

//! Named registries of Plateau cells and output factories.
//!
//! A [`Scope`] holds the cells of one application under string names, builds
//! derived cells from named sources with [`Scope::deal`], keeps output
//! factories, and owns the root container output is mounted into.
//!
//! ```
//! use plateau_core::Cell;
//! use plateau_harness::MemoryNode;
//! use plateau_scope::Scope;
//!
//! let scope: Scope<MemoryNode> = Scope::new();
//! scope.add_cell("a", Cell::new(2)).add_cell("b", Cell::new(3));
//! scope.deal("product", &["a", "b"], |(a, b): (i32, i32)| a * b)?;
//!
//! let product = scope.cell::<i32>("product")?;
//! assert_eq!(product.get(), 6);
//!
//! scope.cell::<i32>("a")?.set(5);
//! assert_eq!(product.get(), 15);
//! # Ok::<(), plateau_scope::ScopeError>(())
//! ```

pub mod config;
mod entry;
pub mod error;
pub mod observer;
pub mod scope;
pub mod snapshot;
pub mod sources;

pub use config::ScopeConfig;
pub use entry::Factory;
pub use error::ScopeError;
pub use observer::{ScopeEvent, ScopeObserver, TracingObserver};
pub use scope::{RootRef, Scope};
pub use snapshot::{CellState, ScopeSnapshot};
pub use sources::DealValues;
