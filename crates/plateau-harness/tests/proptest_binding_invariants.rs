//! Property-based invariant tests for bindings on the in-memory host.
//!
//! 1. A bound text facet always shows the cell's latest value.
//! 2. Style maps merge per key: each key shows the last value written for it.
//! 3. Once a binding is dropped, writes no longer reach the node.
//! 4. A bound derived cell keeps updating without a handle of its own.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use plateau_bind::{Binding, FacetCell, Props, bind, props};
use plateau_core::Cell;
use plateau_harness::{MemoryNode, render};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-z <&>]{0,12}"
}

fn style_strategy() -> impl Strategy<Value = Props> {
    proptest::collection::btree_map("(color|margin|padding|width)", "[a-z0-9]{1,6}", 0..4)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Text projection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn text_facet_tracks_latest_write(writes in proptest::collection::vec(text_strategy(), 0..12)) {
        let node = MemoryNode::element("span");
        let cell = Cell::new(String::from("initial"));
        let _binding = bind(&node, [("text", FacetCell::from(&cell))]).unwrap();
        prop_assert_eq!(node.text_content(), "initial");

        for text in &writes {
            cell.set(text.clone());
            prop_assert_eq!(node.text_content(), text.clone());
            prop_assert!(node.child_count() <= 1);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Style merge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn style_facet_merges_per_key(writes in proptest::collection::vec(style_strategy(), 1..8)) {
        let node = MemoryNode::element("div");
        let cell = Cell::new(Props::new());
        let _binding = Binding::on(&node).style(&cell).finish();

        let mut expected: BTreeMap<String, String> = BTreeMap::new();
        for style in &writes {
            cell.set(style.clone());
            expected.extend(style.clone());
            prop_assert_eq!(node.styles(), expected.clone());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Drop ends projection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dropped_binding_stops_projecting(
        before in text_strategy(),
        after in proptest::collection::vec(text_strategy(), 1..6),
    ) {
        let node = MemoryNode::element("p");
        let text = Cell::new(before.clone());
        let class = Cell::new(String::from("live"));
        let binding = bind(
            &node,
            [("text", FacetCell::from(&text)), ("className", FacetCell::from(&class))],
        )
        .unwrap();
        let frozen = render(&node);
        drop(binding);

        for value in after {
            text.set(value.clone());
            class.set(value);
        }
        prop_assert_eq!(render(&node), frozen);
        prop_assert_eq!(text.subscriber_count(), 0);
    }
}

#[test]
fn attribute_facet_sets_each_pair() {
    let node = MemoryNode::element("a");
    let attrs = Cell::new(props([("href", "/docs"), ("title", "Docs")]));
    let _binding = bind(&node, [("attributes", FacetCell::from(&attrs))]).unwrap();
    assert_eq!(render(&node), r#"<a href="/docs" title="Docs"></a>"#);

    attrs.set(props([("title", "Guide")]));
    assert_eq!(render(&node), r#"<a href="/docs" title="Guide"></a>"#);
}

#[test]
fn binding_keeps_an_unheld_derived_cell_alive() {
    let node = MemoryNode::element("h2");
    let count = Cell::new(0_i64);
    let _binding = Binding::on(&node)
        .text(&count.map(|n| format!("Result: {n}")))
        .finish();
    assert_eq!(node.text_content(), "Result: 0");

    count.set(7);
    assert_eq!(node.text_content(), "Result: 7");
}

#[test]
fn detached_binding_outlives_the_derived_handle() {
    let node = MemoryNode::element("h2");
    let count = Cell::new(0_i64);
    let label = count.map(|n| format!("Result: {n}"));
    bind(&node, [("text", FacetCell::from(&label))]).unwrap().detach();

    count.set(7);
    drop(label);
    count.set(9);
    assert_eq!(node.text_content(), "Result: 9");
}
