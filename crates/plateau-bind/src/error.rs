#![forbid(unsafe_code)]

//! Errors from binding construction.

use crate::facet::{Facet, FacetKind};

/// A binding that could not be built. Nothing is subscribed when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// A facet name that is not one of the known facets.
    #[error("unknown facet `{0}`")]
    UnknownFacet(String),
    /// The cell's value shape does not fit the facet.
    #[error("facet `{facet}` expects a {expected} cell, got a {found} cell")]
    FacetKind {
        /// Facet being bound.
        facet: Facet,
        /// Shape the facet projects.
        expected: FacetKind,
        /// Shape of the supplied cell.
        found: FacetKind,
    },
    /// The same facet appeared twice in one binding.
    #[error("facet `{0}` is bound more than once")]
    DuplicateFacet(Facet),
}
