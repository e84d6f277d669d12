#![forbid(unsafe_code)]

//! In-memory host and assertions for Plateau.
//!
//! - [`MemoryDocument`] / [`MemoryNode`]: a DOM-like element tree
//!   implementing [`plateau_bind::Host`] and [`plateau_bind::Node`].
//! - [`render`]: deterministic markup serialization.
//! - [`assert_markup!`]: compare a node's rendered markup with an expected
//!   string.

pub mod document;
pub mod render;

pub use document::{Child, MemoryDocument, MemoryNode};
pub use render::{render, render_children};

/// Assert that a node renders to the expected markup.
///
/// ```
/// use plateau_harness::{MemoryNode, assert_markup};
///
/// let node = MemoryNode::element("span").with_text("0");
/// assert_markup!(node, "<span>0</span>");
/// ```
#[macro_export]
macro_rules! assert_markup {
    ($node:expr, $expected:expr $(,)?) => {{
        let actual = $crate::render(&$node);
        let expected: &str = $expected;
        assert!(
            actual == expected,
            "markup mismatch\n  expected: {expected}\n    actual: {actual}"
        );
    }};
}
