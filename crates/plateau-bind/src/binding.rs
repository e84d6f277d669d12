#![forbid(unsafe_code)]

//! Live projection of cells onto facets of an output node.
//!
//! A [`Binding`] subscribes to one cell per facet. Because subscriptions
//! replay the current value, construction performs the initial projection
//! pass; every later write to a bound cell re-projects that facet.
//!
//! # Usage
//!
//! ```
//! use plateau_bind::{Binding, FacetCell, bind};
//! use plateau_core::Cell;
//! use plateau_harness::MemoryNode;
//!
//! let node = MemoryNode::element("h2");
//! let label = Cell::new(String::from("Result: 0"));
//! let class = Cell::new(String::from("result"));
//!
//! // Dynamic form: facets named at runtime, checked on construction.
//! let text = bind(&node, [("text", FacetCell::from(&label))])?;
//!
//! // Typed form: facet/cell shapes checked by the compiler.
//! let class_binding = Binding::on(&node).class_name(&class).finish();
//!
//! label.set("Result: 5".into());
//! assert_eq!(node.text_content(), "Result: 5");
//! assert_eq!(node.class_name(), "result");
//! # drop((text, class_binding));
//! # Ok::<(), plateau_bind::BindError>(())
//! ```
//!
//! # Invariants
//!
//! 1. After construction, every bound facet of the node equals its cell's
//!    current value.
//! 2. After every write to a bound cell, the matching facet reflects it.
//! 3. Style and attribute facets merge: keys absent from the map are left
//!    as they are on the node.
//! 4. A failed `bind` subscribes nothing.
//!
//! # Failure Modes
//!
//! - Unknown facet name: [`BindError::UnknownFacet`].
//! - Cell shape does not fit the facet: [`BindError::FacetKind`].
//! - Facet named twice: [`BindError::DuplicateFacet`].
//! - Binding dropped: projection stops; call [`Binding::detach`] to tie the
//!   projection to the cells' lifetime instead.

use std::fmt;

use plateau_core::{Cell, Subscription};

use crate::error::BindError;
use crate::facet::{Facet, FacetCell, FacetKey};
use crate::host::{Node, Props};

// ---------------------------------------------------------------------------
// Projection, one function per facet
// ---------------------------------------------------------------------------

fn project_text<N: Node>(node: &N, cell: &Cell<String>) -> Subscription {
    let node = node.clone();
    cell.subscribe(move |text| node.set_text(text))
}

fn project_html<N: Node>(node: &N, cell: &Cell<String>) -> Subscription {
    let node = node.clone();
    cell.subscribe(move |html| node.set_html(html))
}

fn project_class_name<N: Node>(node: &N, cell: &Cell<String>) -> Subscription {
    let node = node.clone();
    cell.subscribe(move |class_name| node.set_class_name(class_name))
}

fn project_style<N: Node>(node: &N, cell: &Cell<Props>) -> Subscription {
    let node = node.clone();
    cell.subscribe(move |style| {
        for (property, value) in style {
            node.set_style(property, value);
        }
    })
}

fn project_attributes<N: Node>(node: &N, cell: &Cell<Props>) -> Subscription {
    let node = node.clone();
    cell.subscribe(move |attributes| {
        for (name, value) in attributes {
            node.set_attribute(name, value);
        }
    })
}

fn project<N: Node>(node: &N, facet: Facet, cell: &FacetCell) -> Result<Subscription, BindError> {
    match (facet, cell) {
        (Facet::Text, FacetCell::Scalar(cell)) => Ok(project_text(node, cell)),
        (Facet::Html, FacetCell::Scalar(cell)) => Ok(project_html(node, cell)),
        (Facet::ClassName, FacetCell::Scalar(cell)) => Ok(project_class_name(node, cell)),
        (Facet::Style, FacetCell::Map(cell)) => Ok(project_style(node, cell)),
        (Facet::Attributes, FacetCell::Map(cell)) => Ok(project_attributes(node, cell)),
        (facet, cell) => Err(BindError::FacetKind {
            facet,
            expected: facet.kind(),
            found: cell.kind(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// A set of live facet projections onto one node.
///
/// Dropping the binding stops the projections.
#[must_use = "dropping a Binding stops its projections; call `detach` to keep them"]
pub struct Binding {
    links: Vec<(Facet, Subscription)>,
}

/// Bind `facets` of `output` to cells.
///
/// Facets may be named by [`Facet`] or by string. Every entry is validated
/// before anything is subscribed.
///
/// # Errors
///
/// See the module-level failure modes.
pub fn bind<N, K, I>(output: &N, facets: I) -> Result<Binding, BindError>
where
    N: Node,
    K: FacetKey,
    I: IntoIterator<Item = (K, FacetCell)>,
{
    let mut resolved: Vec<(Facet, FacetCell)> = Vec::new();
    for (key, cell) in facets {
        let facet = key.to_facet()?;
        if facet.kind() != cell.kind() {
            return Err(BindError::FacetKind {
                facet,
                expected: facet.kind(),
                found: cell.kind(),
            });
        }
        if resolved.iter().any(|(bound, _)| *bound == facet) {
            return Err(BindError::DuplicateFacet(facet));
        }
        resolved.push((facet, cell));
    }

    let links = resolved
        .iter()
        .map(|(facet, cell)| project(output, *facet, cell).map(|sub| (*facet, sub)))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::trace!(facets = links.len(), "binding created");
    Ok(Binding { links })
}

impl Binding {
    /// Start a typed binding on `node`.
    pub fn on<N: Node>(node: &N) -> BindingBuilder<N> {
        BindingBuilder {
            node: node.clone(),
            binding: Binding { links: Vec::new() },
        }
    }

    /// Number of bound facets.
    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.links.len()
    }

    /// Bound facets, in projection order.
    #[must_use]
    pub fn facets(&self) -> Vec<Facet> {
        self.links.iter().map(|(facet, _)| *facet).collect()
    }

    /// Whether `facet` is bound.
    #[must_use]
    pub fn is_bound(&self, facet: Facet) -> bool {
        self.links.iter().any(|(bound, _)| *bound == facet)
    }

    /// Keep every projection alive for as long as its cell lives.
    pub fn detach(self) {
        for (_, sub) in self.links {
            sub.detach();
        }
    }

    fn replace(&mut self, facet: Facet, sub: Subscription) {
        self.links.retain(|(bound, _)| *bound != facet);
        self.links.push((facet, sub));
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("facets", &self.facets())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// BindingBuilder
// ---------------------------------------------------------------------------

/// Typed construction of a [`Binding`].
///
/// Each method projects immediately. Binding the same facet again replaces
/// the earlier projection.
pub struct BindingBuilder<N: Node> {
    node: N,
    binding: Binding,
}

impl<N: Node> BindingBuilder<N> {
    /// Drive the node's text from `cell`.
    pub fn text(mut self, cell: &Cell<String>) -> Self {
        let sub = project_text(&self.node, cell);
        self.binding.replace(Facet::Text, sub);
        self
    }

    /// Drive the node's inner markup from `cell`.
    pub fn html(mut self, cell: &Cell<String>) -> Self {
        let sub = project_html(&self.node, cell);
        self.binding.replace(Facet::Html, sub);
        self
    }

    /// Drive the node's class list from `cell`.
    pub fn class_name(mut self, cell: &Cell<String>) -> Self {
        let sub = project_class_name(&self.node, cell);
        self.binding.replace(Facet::ClassName, sub);
        self
    }

    /// Merge style properties from `cell`.
    pub fn style(mut self, cell: &Cell<Props>) -> Self {
        let sub = project_style(&self.node, cell);
        self.binding.replace(Facet::Style, sub);
        self
    }

    /// Set attributes from `cell`.
    pub fn attributes(mut self, cell: &Cell<Props>) -> Self {
        let sub = project_attributes(&self.node, cell);
        self.binding.replace(Facet::Attributes, sub);
        self
    }

    /// Finish, returning the binding that owns the projections.
    pub fn finish(self) -> Binding {
        tracing::trace!(facets = self.binding.facet_count(), "binding created");
        self.binding
    }
}

impl<N: Node> fmt::Debug for BindingBuilder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingBuilder")
            .field("facets", &self.binding.facets())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::props;
    use crate::testing::RecordingNode;
    use tracing_test::traced_test;

    #[test]
    fn text_projection_follows_writes() {
        let node = RecordingNode::default();
        let label = Cell::new(String::from("initial"));
        let _binding = bind(&node, [(Facet::Text, FacetCell::from(&label))]).unwrap();
        assert_eq!(node.record().text, "initial");

        for value in ["a", "b", "X"] {
            label.set(value.to_string());
            assert_eq!(node.record().text, value);
        }
    }

    #[test]
    fn string_facet_names() {
        let node = RecordingNode::default();
        let class = Cell::new(String::from("counter-display"));
        let html = Cell::new(String::from("<b>hi</b>"));
        let binding = bind(
            &node,
            [("className", class.clone().into()), ("html", html.into())],
        )
        .unwrap();

        assert_eq!(binding.facets(), vec![Facet::ClassName, Facet::Html]);
        assert_eq!(node.record().class_name, "counter-display");
        assert_eq!(node.record().html, "<b>hi</b>");

        class.set("active".into());
        assert_eq!(node.record().class_name, "active");
    }

    #[test]
    fn unknown_facet_is_rejected_without_subscribing() {
        let node = RecordingNode::default();
        let text = Cell::new(String::from("t"));
        let err = bind(
            &node,
            [("text", text.clone().into()), ("value", text.clone().into())],
        )
        .unwrap_err();

        assert_eq!(err, BindError::UnknownFacet("value".into()));
        assert_eq!(text.subscriber_count(), 0);
        assert_eq!(node.record().writes, 0);
    }

    #[test]
    fn mismatched_cell_shape_is_rejected() {
        let node = RecordingNode::default();
        let text = Cell::new(String::from("t"));
        let err = bind(&node, [(Facet::Style, FacetCell::from(text))]).unwrap_err();
        assert!(matches!(err, BindError::FacetKind { facet: Facet::Style, .. }));
    }

    #[test]
    fn duplicate_facet_is_rejected() {
        let node = RecordingNode::default();
        let a = Cell::new(String::from("a"));
        let b = Cell::new(String::from("b"));
        let err = bind(&node, [("text", a.into()), ("text", b.into())]).unwrap_err();
        assert_eq!(err, BindError::DuplicateFacet(Facet::Text));
    }

    #[test]
    fn style_merges_onto_existing_properties() {
        let node = RecordingNode::default();
        node.set_style("color", "red");
        let style = Cell::new(props([("font-weight", "bold")]));
        let _binding = Binding::on(&node).style(&style).finish();

        assert_eq!(node.record().style["color"], "red");
        assert_eq!(node.record().style["font-weight"], "bold");

        style.set(props([("font-weight", "normal")]));
        assert_eq!(node.record().style["font-weight"], "normal");
        assert_eq!(node.record().style["color"], "red");
    }

    #[test]
    fn attributes_are_set_individually() {
        let node = RecordingNode::default();
        let attrs = Cell::new(props([("type", "checkbox"), ("checked", "")]));
        let _binding = Binding::on(&node).attributes(&attrs).finish();

        let record = node.record();
        assert_eq!(record.attributes["type"], "checkbox");
        assert_eq!(record.attributes["checked"], "");
    }

    #[test]
    fn builder_replaces_rebound_facet() {
        let node = RecordingNode::default();
        let first = Cell::new(String::from("first"));
        let second = Cell::new(String::from("second"));
        let binding = Binding::on(&node).text(&first).text(&second).finish();

        assert_eq!(binding.facet_count(), 1);
        assert_eq!(first.subscriber_count(), 0);
        first.set("ignored".into());
        assert_eq!(node.record().text, "second");
    }

    #[test]
    fn dropping_binding_stops_projection() {
        let node = RecordingNode::default();
        let label = Cell::new(String::from("a"));
        let binding = Binding::on(&node).text(&label).finish();
        drop(binding);

        label.set("b".into());
        assert_eq!(node.record().text, "a");
    }

    #[test]
    fn detached_binding_lives_with_cells() {
        let node = RecordingNode::default();
        let label = Cell::new(String::from("a"));
        Binding::on(&node).text(&label).finish().detach();

        label.set("b".into());
        assert_eq!(node.record().text, "b");
    }

    #[test]
    fn derived_cells_drive_facets() {
        let node = RecordingNode::default();
        let count = Cell::new(0);
        let label = count.map(|n| format!("Result: {n}"));
        let _binding = Binding::on(&node).text(&label).finish();

        count.set(7);
        assert_eq!(node.record().text, "Result: 7");
    }

    #[test]
    fn debug_lists_facets() {
        let node = RecordingNode::default();
        let label = Cell::new(String::new());
        let binding = Binding::on(&node).text(&label).finish();
        assert!(format!("{binding:?}").contains("Text"));
    }

    #[test]
    #[traced_test]
    fn construction_is_traced() {
        let node = RecordingNode::default();
        let label = Cell::new(String::from("x"));
        let _dynamic = bind(&node, [("text", FacetCell::from(&label))]).unwrap();
        let _typed = Binding::on(&node).class_name(&label).finish();
        assert!(logs_contain("binding created"));
        assert!(logs_contain("facets=1"));
    }
}
