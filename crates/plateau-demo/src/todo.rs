#![forbid(unsafe_code)]

//! Todo list with filtering, counts, and a synced text input.
//!
//! Cells: `storing` (every todo), `filtering` (the active [`Filter`]),
//! `showing` (todos passing the filter), `counting` ([`Counts`]), and
//! `typing`, a synced cell over the input's `value`, registered when the
//! `inputting` factory runs. The `controlling` factory deals `selecting`,
//! the current filter paired with the counts.

use std::fmt;

use plateau::prelude::*;
use plateau_harness::MemoryNode;

/// One todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Unique within a list.
    pub id: u64,
    /// Item text.
    pub text: String,
    /// Whether the item is done.
    pub completed: bool,
}

/// Which todos are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every todo.
    #[default]
    All,
    /// Todos not yet completed.
    Active,
    /// Completed todos.
    Completed,
}

impl Filter {
    /// Every filter, in control order.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether `todo` passes this filter.
    #[must_use]
    pub fn accepts(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        })
    }
}

/// Totals shown on the filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    /// All todos.
    pub total: usize,
    /// Todos not completed.
    pub active: usize,
    /// Completed todos.
    pub completed: usize,
}

impl Counts {
    /// Tally `todos`.
    #[must_use]
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|todo| todo.completed).count();
        Self {
            total: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }

    fn for_filter(self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.total,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
        }
    }
}

/// Register the todo list's cells and factories on `scope`.
///
/// # Errors
///
/// Lookup errors from the deals; none occur on a fresh scope.
pub fn assemble(scope: &Scope<MemoryNode>) -> Result<(), ScopeError> {
    scope
        .add_cell("storing", Cell::new(Vec::<Todo>::new()))
        .add_cell("filtering", Cell::new(Filter::All));
    scope
        .deal(
            "showing",
            &["storing", "filtering"],
            |(todos, filter): (Vec<Todo>, Filter)| {
                todos
                    .into_iter()
                    .filter(|todo| filter.accepts(todo))
                    .collect::<Vec<_>>()
            },
        )?
        .deal("counting", &["storing"], |(todos,): (Vec<Todo>,)| {
            Counts::of(&todos)
        })?;

    let storing = scope.cell::<Vec<Todo>>("storing")?;
    let filtering = scope.cell::<Filter>("filtering")?;
    let showing = scope.cell::<Vec<Todo>>("showing")?;
    let counting = scope.cell::<Counts>("counting")?;

    let store = storing.clone();
    scope.register_factory("inputting", move |scope| input_form(scope, &store));

    let store = storing.clone();
    scope.register_factory_with("displaying", move |_, todo: Todo| todo_item(&store, &todo));

    let store = storing.clone();
    scope.register_factory("listing", move |_| task_list(&showing, &store));

    scope.register_factory("controlling", move |scope| filter_controls(scope, &filtering));

    scope.register_factory("clearing", move |_| clear_button(&storing, &counting));

    scope.register_factory("todoApp", |scope| {
        let app = MemoryNode::element("div").with_id("app");
        app.append_child(&MemoryNode::element("h1").with_text("Todos"));
        for part in ["inputting", "controlling", "listing", "clearing"] {
            match scope.build(part) {
                Ok(node) => app.append_child(&node),
                Err(err) => tracing::warn!(part, error = %err, "todo part not built"),
            }
        }
        app
    });
    Ok(())
}

/// Set the root to `root_id` and mount the todo app.
///
/// # Errors
///
/// [`ScopeError::UnknownFactory`] if [`assemble`] was not run.
pub fn map(scope: &Scope<MemoryNode>, root_id: &str) -> Result<MemoryNode, ScopeError> {
    scope.set_root(root_id);
    let view = scope.build("todoApp")?;
    scope.mount(&view);
    Ok(view)
}

/// Append a new, active todo unless `text` is blank.
///
/// Returns whether a todo was added.
pub fn add_todo(storing: &Cell<Vec<Todo>>, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    storing.update(|todos| {
        let id = todos.iter().map(|todo| todo.id).max().map_or(1, |max| max + 1);
        todos.push(Todo {
            id,
            text: text.to_string(),
            completed: false,
        });
    });
    true
}

fn input_form(scope: &Scope<MemoryNode>, storing: &Cell<Vec<Todo>>) -> MemoryNode {
    let input = MemoryNode::element("input");
    input.set_attribute("type", "text");
    input.set_attribute("placeholder", "What needs to be done?");

    let typing = sync_cell(&input, "value");
    scope.add_cell("typing", typing.to_cell());

    let pulled = typing.clone();
    input.on("input", move |_| pulled.pull());

    let form = MemoryNode::element("form");
    let storing = storing.clone();
    form.on("submit", move |_| {
        if add_todo(&storing, &typing.get()) {
            typing.set(String::new());
        }
    });
    form.append_child(&input);
    form
}

fn todo_item(storing: &Cell<Vec<Todo>>, todo: &Todo) -> MemoryNode {
    let class = if todo.completed { "task completed" } else { "task" };
    let item = MemoryNode::element("div").with_class(class);

    let checkbox = MemoryNode::element("input");
    checkbox.set_attribute("type", "checkbox");
    if todo.completed {
        checkbox.set_attribute("checked", "");
    }
    let (store, id) = (storing.clone(), todo.id);
    checkbox.on("change", move |_| {
        store.update(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                todo.completed = !todo.completed;
            }
        });
    });

    let delete = MemoryNode::element("button").with_text("Delete");
    let store = storing.clone();
    delete.on("click", move |_| store.update(|todos| todos.retain(|todo| todo.id != id)));

    item.append_child(&checkbox);
    item.append_child(&MemoryNode::element("span").with_text(&todo.text));
    item.append_child(&delete);
    item
}

fn task_list(showing: &Cell<Vec<Todo>>, storing: &Cell<Vec<Todo>>) -> MemoryNode {
    let list = MemoryNode::element("div").with_class("tasks");
    let target = list.clone();
    let storing = storing.clone();
    showing
        .subscribe(move |todos| {
            target.clear_children();
            for todo in todos {
                target.append_child(&todo_item(&storing, todo));
            }
        })
        .detach();
    list
}

fn filter_controls(scope: &Scope<MemoryNode>, filtering: &Cell<Filter>) -> MemoryNode {
    let controls = MemoryNode::element("div").with_class("mode-selector");
    let selecting = scope
        .deal("selecting", &["filtering", "counting"], |pair: (Filter, Counts)| pair)
        .and_then(|scope| scope.cell::<(Filter, Counts)>("selecting"));
    let selecting = match selecting {
        Ok(selecting) => selecting,
        Err(err) => {
            tracing::warn!(error = %err, "filter controls not dealt");
            return controls;
        }
    };

    let target = controls.clone();
    let filtering = filtering.clone();
    selecting
        .subscribe(move |(current, counts)| {
            target.clear_children();
            for filter in Filter::ALL {
                let label = format!("{filter} ({})", counts.for_filter(filter));
                let button = MemoryNode::element("button").with_text(&label);
                if filter == *current {
                    button.set_style("font-weight", "bold");
                }
                let select = filtering.clone();
                button.on("click", move |_| select.set(filter));
                target.append_child(&button);
            }
        })
        .detach();
    controls
}

fn clear_button(storing: &Cell<Vec<Todo>>, counting: &Cell<Counts>) -> MemoryNode {
    let container = MemoryNode::element("div");
    container.set_style("text-align", "center");
    container.set_style("margin-top", "20px");

    let target = container.clone();
    let storing = storing.clone();
    counting
        .subscribe(move |counts| {
            target.clear_children();
            if counts.completed > 0 {
                let button = MemoryNode::element("button").with_text("Clear completed");
                let store = storing.clone();
                button.on("click", move |_| {
                    store.update(|todos| todos.retain(|todo| !todo.completed));
                });
                target.append_child(&button);
            }
        })
        .detach();
    container
}
