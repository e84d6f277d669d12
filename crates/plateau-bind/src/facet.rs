#![forbid(unsafe_code)]

//! Facets: the named aspects of a node a binding can drive.
//!
//! The set is closed. Parsing a facet name that is not one of the five known
//! names fails with [`BindError::UnknownFacet`] rather than being ignored.

use std::fmt;
use std::str::FromStr;

use plateau_core::Cell;

use crate::error::BindError;
use crate::host::Props;

/// A projectable aspect of an output node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Facet {
    /// Text content.
    Text,
    /// Inner markup, unescaped.
    Html,
    /// Class list.
    ClassName,
    /// Style properties, merged onto the node.
    Style,
    /// Attributes, set one by one.
    Attributes,
}

/// The value shape a facet expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// A single string (`Cell<String>`).
    Scalar,
    /// A property map (`Cell<Props>`).
    Map,
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("string"),
            Self::Map => f.write_str("property-map"),
        }
    }
}

impl Facet {
    /// Every facet, in projection order.
    pub const ALL: [Facet; 5] = [
        Facet::Text,
        Facet::Html,
        Facet::ClassName,
        Facet::Style,
        Facet::Attributes,
    ];

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::ClassName => "className",
            Self::Style => "style",
            Self::Attributes => "attributes",
        }
    }

    /// Value shape this facet expects.
    #[must_use]
    pub const fn kind(self) -> FacetKind {
        match self {
            Self::Text | Self::Html | Self::ClassName => FacetKind::Scalar,
            Self::Style | Self::Attributes => FacetKind::Map,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Facet {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "className" | "class_name" | "class" => Ok(Self::ClassName),
            "style" => Ok(Self::Style),
            "attributes" => Ok(Self::Attributes),
            other => Err(BindError::UnknownFacet(other.to_string())),
        }
    }
}

/// Anything that names a facet: a [`Facet`] or its string name.
pub trait FacetKey {
    /// Resolve to a facet.
    ///
    /// # Errors
    ///
    /// [`BindError::UnknownFacet`] when a string name is not recognised.
    fn to_facet(self) -> Result<Facet, BindError>;
}

impl FacetKey for Facet {
    fn to_facet(self) -> Result<Facet, BindError> {
        Ok(self)
    }
}

impl FacetKey for &str {
    fn to_facet(self) -> Result<Facet, BindError> {
        self.parse()
    }
}

impl FacetKey for String {
    fn to_facet(self) -> Result<Facet, BindError> {
        self.parse()
    }
}

/// The cell driving one facet.
#[derive(Clone)]
pub enum FacetCell {
    /// Drives text, html or class name.
    Scalar(Cell<String>),
    /// Drives style or attributes.
    Map(Cell<Props>),
}

impl FacetCell {
    /// Value shape of the wrapped cell.
    #[must_use]
    pub fn kind(&self) -> FacetKind {
        match self {
            Self::Scalar(_) => FacetKind::Scalar,
            Self::Map(_) => FacetKind::Map,
        }
    }
}

impl fmt::Debug for FacetCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(cell) => f.debug_tuple("Scalar").field(cell).finish(),
            Self::Map(cell) => f.debug_tuple("Map").field(cell).finish(),
        }
    }
}

impl From<Cell<String>> for FacetCell {
    fn from(cell: Cell<String>) -> Self {
        Self::Scalar(cell)
    }
}

impl From<&Cell<String>> for FacetCell {
    fn from(cell: &Cell<String>) -> Self {
        Self::Scalar(cell.clone())
    }
}

impl From<Cell<Props>> for FacetCell {
    fn from(cell: Cell<Props>) -> Self {
        Self::Map(cell)
    }
}

impl From<&Cell<Props>> for FacetCell {
    fn from(cell: &Cell<Props>) -> Self {
        Self::Map(cell.clone())
    }
}
