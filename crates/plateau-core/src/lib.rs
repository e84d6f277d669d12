#![forbid(unsafe_code)]

//! Reactive core for Plateau.
//!
//! This crate provides the dependency graph the rest of the workspace builds
//! on:
//!
//! - [`Cell`]: a shared, version-tracked value with synchronous change
//!   notification and subscribe-with-replay semantics.
//! - [`Subscription`]: RAII handle that removes its listener on drop.
//! - [`derive`]: cells whose value is a pure function of other cells,
//!   recomputed eagerly on every source write.
//! - [`EventCell`]: discrete occurrences published through the same machinery.
//! - [`ReentrancyPolicy`]: per-cell guard against unbounded recursive writes.
//!
//! # Architecture
//!
//! Cells use `Rc<RefCell<..>>` for single-threaded shared ownership and are
//! therefore `!Send`; mutation from several threads cannot compile. Every
//! write runs its whole notification sweep, including downstream derived
//! cells, before returning (depth-first, no batching, no scheduler).
//!
//! # Example
//!
//! ```
//! use plateau_core::{Cell, derive};
//!
//! let list = Cell::new(Vec::<u32>::new());
//! let count = derive((list.clone(),), |(items,)| items.len());
//! assert_eq!(count.get(), 0);
//!
//! list.set(vec![1, 2, 3]);
//! assert_eq!(count.get(), 3);
//! ```

pub mod cell;
pub mod derive;
pub mod error;
pub mod event;
pub mod policy;

pub use cell::{Cell, Subscription};
pub use derive::{Sources, derive, derive_with_policy};
pub use error::CellError;
pub use event::EventCell;
pub use policy::{DEFAULT_MAX_REENTRANT_DEPTH, ReentrancyPolicy};
