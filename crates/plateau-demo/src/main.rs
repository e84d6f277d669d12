#![forbid(unsafe_code)]

//! Run the counter and todo demos against an in-memory document, simulating
//! a few interactions and printing the rendered markup after each.
//!
//! ```text
//! plateau-demo [counter|todo|all]
//! RUST_LOG=debug PLATEAU_TRACE_CELLS=1 plateau-demo todo
//! ```

use std::process::ExitCode;
use std::rc::Rc;

use plateau::prelude::*;
use plateau::scope::ScopeObserver;
use plateau_demo::{counter, todo};
use plateau_harness::{MemoryDocument, MemoryNode, render};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const ROOT_ID: &str = "root";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let which = std::env::args().nth(1).unwrap_or_else(|| String::from("all"));
    let result = match which.as_str() {
        "counter" => run_counter(),
        "todo" => run_todo(),
        "all" => run_counter().and_then(|()| run_todo()),
        other => {
            eprintln!("unknown demo `{other}`; expected counter, todo or all");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn scope_for(
    label: &str,
    doc: &MemoryDocument,
    observer: Rc<TracingObserver>,
) -> Scope<MemoryNode> {
    let observer: Rc<dyn ScopeObserver> = observer;
    Scope::new()
        .with_host(doc.clone())
        .with_config(ScopeConfig::from_env().with_label(label))
        .with_shared_observer(observer)
}

fn print_step(step: &str, doc: &MemoryDocument) {
    println!("── {step}");
    match doc.element_by_id(ROOT_ID) {
        Some(root) => println!("{}\n", render(&root)),
        None => println!("(no root)\n"),
    }
}

fn run_counter() -> Result<(), ScopeError> {
    let doc = MemoryDocument::new();
    doc.add_container(ROOT_ID);
    let observer = Rc::new(TracingObserver::new());
    let scope = scope_for("counter", &doc, Rc::clone(&observer));

    counter::assemble(&scope)?;
    let view = counter::map(&scope, ROOT_ID)?;
    print_step("counter: mounted", &doc);

    let buttons = view.find_by_tag("button");
    if let Some(increment) = buttons.first() {
        increment.click();
        increment.click();
    }
    print_step("counter: incremented twice", &doc);

    if let Some(input) = view.find_by_tag("input").first() {
        input.set_property("value", "5");
        input.dispatch("change");
    }
    print_step("counter: multiplier set to 5", &doc);

    if let Some(trigger) = buttons.last() {
        trigger.click();
    }
    print_step("counter: event triggered", &doc);

    observer.log_state(&scope.snapshot(), Some("counter"));
    info!(cells = scope.cell_count(), "counter demo finished");
    Ok(())
}

fn run_todo() -> Result<(), ScopeError> {
    let doc = MemoryDocument::new();
    doc.add_container(ROOT_ID);
    let observer = Rc::new(TracingObserver::new());
    let scope = scope_for("todo", &doc, Rc::clone(&observer));

    todo::assemble(&scope)?;
    let view = todo::map(&scope, ROOT_ID)?;
    print_step("todo: mounted", &doc);

    let input = view.find_by_tag("input").first().cloned();
    let form = view.find_by_tag("form").first().cloned();
    if let (Some(input), Some(form)) = (input, form) {
        for text in ["write docs", "review bindings", "ship"] {
            input.type_text(text);
            form.dispatch("submit");
        }
    }
    print_step("todo: three items added", &doc);

    if let Some(task) = view.find_by_class("task").first() {
        if let Some(checkbox) = task.find_by_tag("input").first() {
            checkbox.dispatch("change");
        }
    }
    print_step("todo: first item completed", &doc);

    scope.cell::<todo::Filter>("filtering")?.set(todo::Filter::Active);
    print_step("todo: showing active", &doc);

    observer.log_state(&scope.snapshot(), Some("todo"));
    info!(cells = scope.cell_count(), "todo demo finished");
    Ok(())
}
