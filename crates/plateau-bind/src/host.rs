#![forbid(unsafe_code)]

//! Host environment traits.
//!
//! The reactive layer never builds or renders output itself. It needs a host
//! that hands out addressable nodes, lets facets of those nodes be set, and
//! can resolve a container by identifier. [`Node`] and [`Host`] describe that
//! contract; `plateau-harness` provides an in-memory implementation.
//!
//! Node handles are shared references (like DOM element handles): cloning a
//! node yields another handle to the same node, and every mutator takes
//! `&self`.

use std::collections::BTreeMap;

/// Ordered string map used by the style and attribute facets.
pub type Props = BTreeMap<String, String>;

/// Build a [`Props`] map from key/value pairs.
///
/// ```
/// let style = plateau_bind::props([("font-weight", "bold")]);
/// assert_eq!(style["font-weight"], "bold");
/// ```
pub fn props<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Props
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// An addressable output node.
pub trait Node: Clone + 'static {
    /// Replace the node's text content (and children) with `text`.
    fn set_text(&self, text: &str);

    /// Replace the node's inner markup. No escaping is performed.
    fn set_html(&self, html: &str);

    /// Replace the node's class list.
    fn set_class_name(&self, class_name: &str);

    /// Set one style property, leaving the others untouched.
    fn set_style(&self, property: &str, value: &str);

    /// Set one attribute, leaving the others untouched.
    fn set_attribute(&self, name: &str, value: &str);

    /// Read a live property (e.g. an input's `value`).
    fn property(&self, name: &str) -> Option<String>;

    /// Write a live property.
    fn set_property(&self, name: &str, value: &str);

    /// Append `child` as the node's last child.
    fn append_child(&self, child: &Self);

    /// Remove every child of the node.
    fn clear_children(&self);

    /// Identifier of the node, if it has one.
    fn id(&self) -> Option<String> {
        None
    }
}

/// A host able to create nodes and resolve containers by identifier.
pub trait Host {
    /// Node type produced by this host.
    type Node: Node;

    /// Create a detached element with the given tag.
    fn create_element(&self, tag: &str) -> Self::Node;

    /// Resolve a container by identifier.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
}
