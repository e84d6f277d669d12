//! Demo applications driven through their rendered views.
//!
//! 1. The counter's heading always shows `clicks * multiplier`.
//! 2. The todo list's visible rows agree with `counting` under every filter.
//! 3. Traced scopes log cell writes made by the views.

#![forbid(unsafe_code)]

use plateau::prelude::*;
use plateau_demo::todo::{Counts, Filter, Todo};
use plateau_demo::{counter, todo};
use plateau_harness::{MemoryDocument, MemoryNode};
use proptest::prelude::*;
use tracing_test::traced_test;

// ── Helpers ─────────────────────────────────────────────────────────────

fn mounted(
    assemble: fn(&Scope<MemoryNode>) -> Result<(), ScopeError>,
    map: fn(&Scope<MemoryNode>, &str) -> Result<MemoryNode, ScopeError>,
    config: ScopeConfig,
) -> (Scope<MemoryNode>, MemoryNode) {
    let doc = MemoryDocument::new();
    doc.add_container("root");
    let scope = Scope::new()
        .with_host(doc)
        .with_config(config)
        .with_observer(TracingObserver::new());
    assemble(&scope).unwrap();
    let view = map(&scope, "root").unwrap();
    (scope, view)
}

fn button(view: &MemoryNode, label: &str) -> MemoryNode {
    view.find_by_tag("button")
        .into_iter()
        .find(|b| b.text_content() == label)
        .unwrap()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Counter
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn counter_heading_is_clicks_times_multiplier(clicks in 0_usize..12, multiplier in 1_i64..20) {
        let (_scope, view) = mounted(counter::assemble, counter::map, ScopeConfig::default());
        let increment = button(&view, "Increment");
        for _ in 0..clicks {
            increment.click();
        }
        let input = view.find_by_tag("input")[0].clone();
        input.set_property("value", &multiplier.to_string());
        input.dispatch("change");

        let expected = format!("Result: {}", clicks as i64 * multiplier);
        prop_assert_eq!(view.find_by_tag("h2")[0].text_content(), expected);
        prop_assert_eq!(
            view.find_by_class("counter-display")[0].text_content(),
            clicks.to_string()
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Todo
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visible_rows_match_counts(
        texts in proptest::collection::vec("[a-z]{1,8}", 1..8),
        toggles in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let (scope, view) = mounted(todo::assemble, todo::map, ScopeConfig::default());
        let input = view.find_by_tag("form")[0].find_by_tag("input")[0].clone();
        let form = view.find_by_tag("form")[0].clone();
        for text in &texts {
            input.type_text(text);
            form.dispatch("submit");
        }

        let storing = scope.cell::<Vec<Todo>>("storing").unwrap();
        storing.update(|todos| {
            for (todo, done) in todos.iter_mut().zip(&toggles) {
                todo.completed = *done;
            }
        });

        let counts = scope.cell::<Counts>("counting").unwrap().get();
        prop_assert_eq!(counts, Counts::of(&storing.get()));
        prop_assert_eq!(counts.total, texts.len());

        let filtering = scope.cell::<Filter>("filtering").unwrap();
        for (filter, expected) in [
            (Filter::All, counts.total),
            (Filter::Active, counts.active),
            (Filter::Completed, counts.completed),
        ] {
            filtering.set(filter);
            prop_assert_eq!(view.find_by_class("task").len(), expected);
            prop_assert_eq!(scope.cell::<Vec<Todo>>("showing").unwrap().get().len(), expected);
        }
    }
}

#[test]
fn submitting_clears_the_input() {
    let (scope, view) = mounted(todo::assemble, todo::map, ScopeConfig::default());
    let input = view.find_by_tag("input")[0].clone();
    input.type_text("water plants");
    view.find_by_tag("form")[0].dispatch("submit");

    assert_eq!(input.property("value").as_deref(), Some(""));
    assert_eq!(scope.cell::<String>("typing").unwrap().get(), "");
    assert_eq!(view.find_by_class("task")[0].find_by_tag("span")[0].text_content(), "water plants");
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Tracing
// ═════════════════════════════════════════════════════════════════════════

#[test]
#[traced_test]
fn traced_counter_logs_clicks() {
    let config = ScopeConfig::default().with_label("counter").with_trace_cells(true);
    let (_scope, view) = mounted(counter::assemble, counter::map, config);
    button(&view, "Increment").click();

    assert!(logs_contain("cell changed"));
    assert!(logs_contain("counting"));
}
