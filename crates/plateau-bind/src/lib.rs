#![forbid(unsafe_code)]

//! Bindings between Plateau cells and host output nodes.
//!
//! - [`Node`] / [`Host`]: the host contract (addressable nodes, facet
//!   setters, container lookup).
//! - [`Facet`]: the closed set of projectable node aspects.
//! - [`bind`] / [`Binding`]: live facet projections.
//! - [`sync_cell`]: a string cell mirrored into a node property.

pub mod binding;
pub mod error;
pub mod facet;
pub mod host;
pub mod sync;

#[cfg(test)]
mod testing;

pub use binding::{Binding, BindingBuilder, bind};
pub use error::BindError;
pub use facet::{Facet, FacetCell, FacetKey, FacetKind};
pub use host::{Host, Node, Props, props};
pub use sync::{SyncedCell, sync_cell};
