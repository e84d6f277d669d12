#![forbid(unsafe_code)]

//! Counter with a multiplier, a derived display, and an event log line.
//!
//! Cells: `counting`, `multiplying`, `computing = counting * multiplying`,
//! `displaying = "Result: {computing}"`, and the `clicking` event cell.
//! The `eventFlowExample` factory deals `eventText` from `clicking` the first
//! time it is built.

use plateau::prelude::*;
use plateau_harness::MemoryNode;

/// Text shown before any event has fired.
pub const NO_EVENTS: &str = "No events yet";

/// A user interaction published through the `clicking` event cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    /// Event type, e.g. `click`.
    pub kind: String,
}

impl UiEvent {
    /// An event of the given type.
    #[must_use]
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

/// Register the counter's cells and factories on `scope`.
///
/// # Errors
///
/// Lookup errors from the deals; none occur on a fresh scope.
pub fn assemble(scope: &Scope<MemoryNode>) -> Result<(), ScopeError> {
    let clicking = EventCell::<UiEvent>::new();
    scope
        .add_cell("counting", Cell::new(0_i64))
        .add_cell("multiplying", Cell::new(1_i64))
        .add_cell("clicking", clicking.to_cell());
    scope
        .deal("computing", &["counting", "multiplying"], |(count, mult): (i64, i64)| {
            count * mult
        })?
        .deal("displaying", &["computing"], |(computed,): (i64,)| {
            format!("Result: {computed}")
        })?;

    let displaying = scope.cell::<String>("displaying")?;
    scope.register_factory("displayingComputed", move |_| {
        let heading = MemoryNode::element("h2");
        Binding::on(&heading).text(&displaying).finish().detach();
        heading
    });

    let counting = scope.cell::<i64>("counting")?;
    scope.register_factory("incrementing", move |_| {
        let button = MemoryNode::element("button").with_text("Increment");
        let counting = counting.clone();
        button.on("click", move |_| counting.update(|n| *n += 1));
        button
    });

    let multiplying = scope.cell::<i64>("multiplying")?;
    scope.register_factory("multiplyingControl", move |_| multiplier_control(&multiplying));

    let count_text = scope.cell::<i64>("counting")?.map(|n| n.to_string());
    scope.register_factory("domFlowExample", move |_| {
        let display = MemoryNode::element("div").with_class("counter-display");
        match bind(&display, [("text", FacetCell::from(&count_text))]) {
            Ok(binding) => binding.detach(),
            Err(err) => tracing::warn!(error = %err, "counter display not bound"),
        }
        display
    });

    scope.register_factory("eventFlowExample", move |scope| event_example(scope, &clicking));

    scope.register_factory("advancedCounter", |scope| {
        let container = MemoryNode::element("div");
        for part in [
            "displayingComputed",
            "incrementing",
            "multiplyingControl",
            "domFlowExample",
            "eventFlowExample",
        ] {
            match scope.build(part) {
                Ok(node) => container.append_child(&node),
                Err(err) => tracing::warn!(part, error = %err, "counter part not built"),
            }
        }
        container
    });
    Ok(())
}

/// Set the root to `root_id` and mount the full counter.
///
/// # Errors
///
/// [`ScopeError::UnknownFactory`] if [`assemble`] was not run.
pub fn map(scope: &Scope<MemoryNode>, root_id: &str) -> Result<MemoryNode, ScopeError> {
    scope.set_root(root_id);
    let view = scope.build("advancedCounter")?;
    scope.mount(&view);
    Ok(view)
}

fn multiplier_control(multiplying: &Cell<i64>) -> MemoryNode {
    let control = MemoryNode::element("div");
    control.append_child(&MemoryNode::element("label").with_text("Multiplier: "));

    let input = MemoryNode::element("input");
    input.set_attribute("type", "number");
    input.set_property("value", &multiplying.get().to_string());
    let multiplying = multiplying.clone();
    input.on("change", move |input| {
        let parsed = input
            .property("value")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n != 0)
            .unwrap_or(1);
        multiplying.set(parsed);
    });
    control.append_child(&input);
    control
}

fn event_example(scope: &Scope<MemoryNode>, clicking: &EventCell<UiEvent>) -> MemoryNode {
    let trigger = MemoryNode::element("button").with_text("Trigger Event");
    let events = clicking.clone();
    trigger.on("click", move |_| events.trigger(UiEvent::new("click")));

    let display = MemoryNode::element("div").with_class("event-display");
    let text = scope
        .deal("eventText", &["clicking"], |(event,): (Option<UiEvent>,)| match event {
            Some(event) => format!("Last event: {}", event.kind),
            None => NO_EVENTS.to_string(),
        })
        .and_then(|scope| scope.cell::<String>("eventText"));
    match text {
        Ok(text) => Binding::on(&display).text(&text).finish().detach(),
        Err(err) => {
            tracing::warn!(error = %err, "event text not dealt");
            display.set_text(NO_EVENTS);
        }
    }

    let wrapper = MemoryNode::element("div");
    wrapper.append_child(&trigger);
    wrapper.append_child(&display);
    wrapper
}
