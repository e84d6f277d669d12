#![forbid(unsafe_code)]

//! The scope: a named registry of cells and factories with a mount point.
//!
//! # Design
//!
//! A [`Scope`] maps names to type-erased cells and to output factories. All
//! methods take `&self`; the maps live behind `RefCell`s and no borrow is
//! held while user code (combine functions, factories, observer callbacks)
//! runs, so a factory may look up cells, deal new ones, and build other
//! factories through the scope it is handed.
//!
//! # Invariants
//!
//! 1. A failed `deal`, `insert_cell` or lookup leaves the scope unchanged.
//! 2. Registering a name that is taken replaces the entry (last write wins);
//!    listeners attached to the replaced cell stay attached to it.
//! 3. `mount` is a no-op returning `false` while the scope is unrooted.
//! 4. Setting a root clears its children; the previous root is left as is.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown source in `deal` | Typo or ordering mistake | `ScopeError::UnknownCell`, nothing inserted |
//! | Wrong value type | Name registered with another `T` | `ScopeError::TypeMismatch` |
//! | Unresolvable root id | Host has no such container | `set_root` warns and unroots; `try_set_root` returns `HostNotFound` |

use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use plateau_bind::{Host, Node};
use plateau_core::{Cell, Subscription, derive_with_policy};

use crate::config::ScopeConfig;
use crate::entry::{ErasedCell, Factory, FactoryEntry};
use crate::error::ScopeError;
use crate::observer::{ScopeEvent, ScopeObserver};
use crate::snapshot::{ANONYMOUS_ROOT, CellState, ScopeSnapshot};
use crate::sources::DealValues;

/// A root given either directly or by identifier.
#[derive(Debug, Clone)]
pub enum RootRef<N> {
    /// A node handle.
    Node(N),
    /// An identifier resolved through the scope's host.
    Id(String),
}

impl<N> From<&str> for RootRef<N> {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl<N> From<String> for RootRef<N> {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// Named cells and factories over output nodes of type `N`.
pub struct Scope<N: Node> {
    cells: RefCell<AHashMap<String, Rc<dyn ErasedCell>>>,
    factories: RefCell<AHashMap<String, FactoryEntry>>,
    traces: RefCell<AHashMap<String, Subscription>>,
    root: RefCell<Option<N>>,
    host: Option<Rc<dyn Host<Node = N>>>,
    observer: Option<Rc<dyn ScopeObserver>>,
    config: ScopeConfig,
}

impl<N: Node> Default for Scope<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> Scope<N> {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// An empty, unrooted scope with no host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: RefCell::new(AHashMap::new()),
            factories: RefCell::new(AHashMap::new()),
            traces: RefCell::new(AHashMap::new()),
            root: RefCell::new(None),
            host: None,
            observer: None,
            config: ScopeConfig::default(),
        }
    }

    /// Resolve root identifiers and create surfaces through `host`.
    #[must_use]
    pub fn with_host(mut self, host: impl Host<Node = N> + 'static) -> Self {
        self.host = Some(Rc::new(host));
        self
    }

    /// Report mutations to `observer`.
    ///
    /// Cell tracing (see [`ScopeConfig::trace_cells`]) covers cells
    /// registered after this call.
    #[must_use]
    pub fn with_observer(mut self, observer: impl ScopeObserver + 'static) -> Self {
        self.observer = Some(Rc::new(observer));
        self
    }

    /// Like [`with_observer`](Self::with_observer) for an observer the caller
    /// keeps a handle to.
    #[must_use]
    pub fn with_shared_observer(mut self, observer: Rc<dyn ScopeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ScopeConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Scope label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.config.label
    }

    // -----------------------------------------------------------------------
    // Cells
    // -----------------------------------------------------------------------

    /// Register `cell` under `name`, replacing any cell already there.
    pub fn add_cell<T>(&self, name: &str, cell: Cell<T>) -> &Self
    where
        T: Clone + fmt::Debug + 'static,
    {
        self.replace_cell(name, cell);
        self
    }

    /// Register `cell` under a name that must be free.
    ///
    /// # Errors
    ///
    /// [`ScopeError::Collision`] if `name` is taken.
    pub fn insert_cell<T>(&self, name: &str, cell: Cell<T>) -> Result<&Self, ScopeError>
    where
        T: Clone + fmt::Debug + 'static,
    {
        if self.has_cell(name) {
            return Err(ScopeError::Collision(name.to_string()));
        }
        self.replace_cell(name, cell);
        Ok(self)
    }

    /// Register `cell` under `name`, returning whether a cell was replaced.
    pub fn replace_cell<T>(&self, name: &str, cell: Cell<T>) -> bool
    where
        T: Clone + fmt::Debug + 'static,
    {
        let replaced = self.store(name, cell);
        tracing::debug!(
            scope = %self.config.label,
            cell = name,
            value_type = type_name::<T>(),
            replaced,
            "cell added"
        );
        self.emit(ScopeEvent::CellAdded {
            name: name.to_string(),
            type_name: type_name::<T>(),
        });
        replaced
    }

    /// Build a derived cell from the named sources and register it as `name`.
    ///
    /// The combine function's argument type picks the resolution rule (see
    /// [`DealValues`]): `|(count,): (i32,)| count * 2` takes one `i32` cell,
    /// `|items: Vec<String>| items.len()` takes any number of string cells.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownCell`], [`ScopeError::TypeMismatch`] or
    /// [`ScopeError::Arity`]. The scope is unchanged on error.
    pub fn deal<V, R, F>(
        &self,
        name: &str,
        sources: &[&str],
        combine: F,
    ) -> Result<&Self, ScopeError>
    where
        V: DealValues,
        R: Clone + fmt::Debug + 'static,
        F: Fn(V) -> R + 'static,
    {
        let cells = V::resolve(self, name, sources)?;
        let derived = derive_with_policy(cells, combine, self.config.deal_policy);
        let replaced = self.store(name, derived);
        tracing::debug!(
            scope = %self.config.label,
            cell = name,
            sources = ?sources,
            replaced,
            "cell dealt"
        );
        self.emit(ScopeEvent::CellDealt {
            name: name.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        });
        Ok(self)
    }

    /// The cell registered as `name`, if it exists and holds `T`.
    #[must_use]
    pub fn get_cell<T: Clone + 'static>(&self, name: &str) -> Option<Cell<T>> {
        self.cell(name).ok()
    }

    /// The cell registered as `name`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownCell`] or [`ScopeError::TypeMismatch`].
    pub fn cell<T: Clone + 'static>(&self, name: &str) -> Result<Cell<T>, ScopeError> {
        let cells = self.cells.borrow();
        let entry = cells
            .get(name)
            .ok_or_else(|| ScopeError::UnknownCell(name.to_string()))?;
        entry
            .as_any()
            .downcast_ref::<Cell<T>>()
            .cloned()
            .ok_or_else(|| ScopeError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
                found: entry.value_type(),
            })
    }

    /// Whether a cell is registered as `name`.
    #[must_use]
    pub fn has_cell(&self, name: &str) -> bool {
        self.cells.borrow().contains_key(name)
    }

    /// Registered cell names, sorted.
    #[must_use]
    pub fn cell_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cells.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.borrow().len()
    }

    fn store<T>(&self, name: &str, cell: Cell<T>) -> bool
    where
        T: Clone + fmt::Debug + 'static,
    {
        let trace = self.trace(name, &cell);
        let previous = self
            .cells
            .borrow_mut()
            .insert(name.to_string(), Rc::new(cell));
        let stale_trace = match trace {
            Some(sub) => self.traces.borrow_mut().insert(name.to_string(), sub),
            None => self.traces.borrow_mut().remove(name),
        };
        drop(stale_trace);

        match previous {
            Some(previous) => {
                let previous_type = previous.value_type();
                drop(previous);
                tracing::debug!(scope = %self.config.label, cell = name, "cell shadowed");
                self.emit(ScopeEvent::CellShadowed {
                    name: name.to_string(),
                    previous_type,
                });
                true
            }
            None => false,
        }
    }

    fn trace<T>(&self, name: &str, cell: &Cell<T>) -> Option<Subscription>
    where
        T: Clone + fmt::Debug + 'static,
    {
        if !self.config.trace_cells {
            return None;
        }
        let observer = Rc::clone(self.observer.as_ref()?);
        let label = self.config.label.clone();
        let name = name.to_string();
        let report: Rc<dyn Fn(String)> = Rc::new(move |value| {
            observer.on_event(
                &label,
                &ScopeEvent::CellChanged {
                    name: name.clone(),
                    value,
                },
            );
        });
        Some(cell.trace(report))
    }

    // -----------------------------------------------------------------------
    // Factories
    // -----------------------------------------------------------------------

    /// Register a zero-argument factory, replacing any factory named `name`.
    pub fn register_factory<F>(&self, name: &str, factory: F) -> &Self
    where
        F: Fn(&Scope<N>) -> N + 'static,
    {
        self.register_factory_with(name, move |scope: &Scope<N>, ()| factory(scope))
    }

    /// Register a one-argument factory, replacing any factory named `name`.
    pub fn register_factory_with<A, F>(&self, name: &str, factory: F) -> &Self
    where
        A: 'static,
        F: Fn(&Scope<N>, A) -> N + 'static,
    {
        let factory: Factory<A, N> = Rc::new(factory);
        let previous = self
            .factories
            .borrow_mut()
            .insert(name.to_string(), FactoryEntry::new(factory));
        drop(previous);
        tracing::debug!(
            scope = %self.config.label,
            factory = name,
            arg_type = type_name::<A>(),
            "factory registered"
        );
        self.emit(ScopeEvent::FactoryRegistered {
            name: name.to_string(),
        });
        self
    }

    /// The factory registered as `name`, if it takes an `A`.
    ///
    /// Zero-argument factories are `Factory<(), N>`.
    #[must_use]
    pub fn get_factory<A: 'static>(&self, name: &str) -> Option<Factory<A, N>> {
        self.factory(name).ok()
    }

    fn factory<A: 'static>(&self, name: &str) -> Result<Factory<A, N>, ScopeError> {
        let factories = self.factories.borrow();
        let entry = factories
            .get(name)
            .ok_or_else(|| ScopeError::UnknownFactory(name.to_string()))?;
        entry
            .typed::<A, N>()
            .ok_or_else(|| ScopeError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<A>(),
                found: entry.arg_type,
            })
    }

    /// Run the zero-argument factory `name`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownFactory`] or [`ScopeError::TypeMismatch`].
    pub fn build(&self, name: &str) -> Result<N, ScopeError> {
        self.build_with(name, ())
    }

    /// Run the factory `name` with `arg`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownFactory`] or [`ScopeError::TypeMismatch`].
    pub fn build_with<A: 'static>(&self, name: &str, arg: A) -> Result<N, ScopeError> {
        let factory = self.factory::<A>(name)?;
        tracing::trace!(scope = %self.config.label, factory = name, "building output");
        Ok(factory(self, arg))
    }

    /// Number of registered factories.
    #[must_use]
    pub fn factory_count(&self) -> usize {
        self.factories.borrow().len()
    }

    // -----------------------------------------------------------------------
    // Root and mounting
    // -----------------------------------------------------------------------

    /// Set the root, clearing its children.
    ///
    /// An identifier that does not resolve leaves the scope unrooted and is
    /// logged at warn level.
    pub fn set_root(&self, root: impl Into<RootRef<N>>) -> &Self {
        if let Err(err) = self.try_set_root(root) {
            tracing::warn!(
                scope = %self.config.label,
                error = %err,
                "root not set, scope is unrooted"
            );
        }
        self
    }

    /// Set the root, clearing its children.
    ///
    /// # Errors
    ///
    /// [`ScopeError::HostNotFound`] if an identifier does not resolve; the
    /// scope is unrooted afterwards.
    pub fn try_set_root(&self, root: impl Into<RootRef<N>>) -> Result<&Self, ScopeError> {
        match self.resolve_root(root.into()) {
            Ok(node) => {
                node.clear_children();
                let id = node.id();
                let previous = self.root.borrow_mut().replace(node);
                drop(previous);
                tracing::debug!(scope = %self.config.label, root = ?id, "root set");
                self.emit(ScopeEvent::RootSet { id });
                Ok(self)
            }
            Err(err) => {
                let previous = self.root.borrow_mut().take();
                drop(previous);
                if let ScopeError::HostNotFound(id) = &err {
                    self.emit(ScopeEvent::RootUnresolved { id: id.clone() });
                }
                Err(err)
            }
        }
    }

    fn resolve_root(&self, root: RootRef<N>) -> Result<N, ScopeError> {
        match root {
            RootRef::Node(node) => Ok(node),
            RootRef::Id(id) => self
                .host
                .as_ref()
                .and_then(|host| host.element_by_id(&id))
                .ok_or(ScopeError::HostNotFound(id)),
        }
    }

    /// Current root, if rooted.
    #[must_use]
    pub fn root(&self) -> Option<N> {
        self.root.borrow().clone()
    }

    /// Whether a root is set.
    #[must_use]
    pub fn is_rooted(&self) -> bool {
        self.root.borrow().is_some()
    }

    /// Replace the root's children with `output`.
    ///
    /// Returns `false`, doing nothing, while unrooted.
    pub fn mount(&self, output: &N) -> bool {
        let Some(root) = self.root() else {
            tracing::trace!(scope = %self.config.label, "mount skipped, scope is unrooted");
            return false;
        };
        root.clear_children();
        root.append_child(output);
        tracing::debug!(scope = %self.config.label, "output mounted");
        self.emit(ScopeEvent::Mounted);
        true
    }

    /// Append `output` to the root, keeping what is already there.
    ///
    /// Returns `false`, doing nothing, while unrooted.
    pub fn append(&self, output: &N) -> bool {
        let Some(root) = self.root() else {
            return false;
        };
        root.append_child(output);
        self.emit(ScopeEvent::Appended);
        true
    }

    /// A fresh `div` container with the given class, created by the host.
    ///
    /// # Errors
    ///
    /// [`ScopeError::NoHost`] when the scope was built without a host.
    pub fn create_surface(&self, class_name: &str) -> Result<N, ScopeError> {
        let host = self.host.as_ref().ok_or(ScopeError::NoHost)?;
        let surface = host.create_element("div");
        surface.set_class_name(class_name);
        Ok(surface)
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Current value of every cell, the factory count, and the root.
    #[must_use]
    pub fn snapshot(&self) -> ScopeSnapshot {
        let entries: Vec<(String, Rc<dyn ErasedCell>)> = self
            .cells
            .borrow()
            .iter()
            .map(|(name, cell)| (name.clone(), Rc::clone(cell)))
            .collect();
        let mut cells: Vec<CellState> = entries
            .into_iter()
            .map(|(name, cell)| CellState {
                name,
                type_name: cell.value_type().to_string(),
                value: cell.render(),
                version: cell.version(),
                derived: cell.is_derived(),
            })
            .collect();
        cells.sort_by(|a, b| a.name.cmp(&b.name));

        let root = self
            .root()
            .map(|root| root.id().unwrap_or_else(|| ANONYMOUS_ROOT.to_string()));
        ScopeSnapshot {
            label: self.config.label.clone(),
            cells,
            factory_count: self.factory_count(),
            root,
        }
    }

    fn emit(&self, event: ScopeEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&self.config.label, &event);
        }
    }
}

impl<N: Node> fmt::Debug for Scope<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("label", &self.config.label)
            .field("cells", &self.cell_names())
            .field("factories", &self.factory_count())
            .field("rooted", &self.is_rooted())
            .field("has_host", &self.host.is_some())
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use plateau_core::ReentrancyPolicy;
    use plateau_harness::{MemoryDocument, MemoryNode};

    use super::*;

    type TestScope = Scope<MemoryNode>;

    fn recording_scope(config: ScopeConfig) -> (TestScope, Rc<RefCell<Vec<ScopeEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&events);
        let scope = Scope::new()
            .with_config(config)
            .with_observer(move |_: &str, event: &ScopeEvent| log.borrow_mut().push(event.clone()));
        (scope, events)
    }

    #[test]
    fn add_then_lookup() {
        let scope = TestScope::new();
        let count = Cell::new(0);
        scope.add_cell("counting", count.clone());

        let found = scope.get_cell::<i32>("counting").unwrap();
        assert!(found.ptr_eq(&count));
        assert!(scope.get_cell::<i32>("missing").is_none());
    }

    #[test]
    fn lookup_with_wrong_type_is_a_mismatch() {
        let scope = TestScope::new();
        scope.add_cell("counting", Cell::new(0_i32));

        assert!(scope.get_cell::<String>("counting").is_none());
        assert!(matches!(
            scope.cell::<String>("counting"),
            Err(ScopeError::TypeMismatch { found: "i32", .. })
        ));
    }

    #[test]
    fn overwrite_keeps_latest() {
        let scope = TestScope::new();
        let first = Cell::new(1);
        let second = Cell::new(2);
        scope.add_cell("x", first).add_cell("x", second.clone());

        assert!(scope.cell::<i32>("x").unwrap().ptr_eq(&second));
        assert_eq!(scope.cell_count(), 1);
    }

    #[test]
    fn insert_refuses_taken_names() {
        let scope = TestScope::new();
        scope.insert_cell("x", Cell::new(1)).unwrap();
        let err = scope.insert_cell("x", Cell::new(2)).unwrap_err();
        assert_eq!(err, ScopeError::Collision("x".into()));
        assert_eq!(scope.cell::<i32>("x").unwrap().get(), 1);
    }

    #[test]
    fn replace_reports_whether_it_replaced() {
        let scope = TestScope::new();
        assert!(!scope.replace_cell("x", Cell::new(1)));
        assert!(scope.replace_cell("x", Cell::new(2)));
    }

    #[test]
    fn deal_tuple_sources() {
        let scope = TestScope::new();
        scope.add_cell("a", Cell::new(2)).add_cell("b", Cell::new(3));
        scope
            .deal("p", &["a", "b"], |(a, b): (i32, i32)| a * b)
            .unwrap();

        let p = scope.cell::<i32>("p").unwrap();
        assert_eq!(p.get(), 6);
        assert!(p.is_derived());
        scope.cell::<i32>("a").unwrap().set(5);
        assert_eq!(p.get(), 15);
    }

    #[test]
    fn deal_vec_sources() {
        let scope = TestScope::new();
        scope
            .add_cell("x", Cell::new(1))
            .add_cell("y", Cell::new(2))
            .add_cell("z", Cell::new(3));
        scope
            .deal("sum", &["x", "y", "z"], |values: Vec<i32>| values.iter().sum::<i32>())
            .unwrap();
        assert_eq!(scope.cell::<i32>("sum").unwrap().get(), 6);
    }

    #[test]
    fn deal_array_sources() {
        let scope = TestScope::new();
        scope.add_cell("w", Cell::new(4_u32)).add_cell("h", Cell::new(5_u32));
        scope
            .deal("area", &["w", "h"], |[w, h]: [u32; 2]| w * h)
            .unwrap();
        assert_eq!(scope.cell::<u32>("area").unwrap().get(), 20);
    }

    #[test]
    fn deal_with_missing_source_changes_nothing() {
        let scope = TestScope::new();
        let err = scope
            .deal("missing", &["doesNotExist"], |(v,): (i32,)| v)
            .unwrap_err();
        assert_eq!(err, ScopeError::UnknownCell("doesNotExist".into()));
        assert!(!scope.has_cell("missing"));
        assert_eq!(scope.cell_count(), 0);
    }

    #[test]
    fn deal_arity_is_checked() {
        let scope = TestScope::new();
        scope.add_cell("a", Cell::new(1)).add_cell("b", Cell::new(2));
        let err = scope
            .deal("pair", &["a"], |(a, b): (i32, i32)| a + b)
            .unwrap_err();
        assert_eq!(
            err,
            ScopeError::Arity {
                name: "pair".into(),
                expected: 2,
                found: 1
            }
        );
        assert!(!scope.has_cell("pair"));
    }

    #[test]
    fn deal_type_mismatch_names_the_source() {
        let scope = TestScope::new();
        scope.add_cell("text", Cell::new(String::from("hi")));
        let err = scope
            .deal("len", &["text"], |(n,): (usize,)| n)
            .unwrap_err();
        assert!(matches!(err, ScopeError::TypeMismatch { ref name, .. } if name == "text"));
    }

    #[test]
    fn dealt_cells_use_configured_policy() {
        let scope = TestScope::new()
            .with_config(ScopeConfig::default().with_deal_policy(ReentrancyPolicy::Reject));
        scope.add_cell("a", Cell::new(1));
        scope.deal("b", &["a"], |(a,): (i32,)| a + 1).unwrap();
        assert_eq!(
            scope.cell::<i32>("b").unwrap().policy(),
            ReentrancyPolicy::Reject
        );
    }

    #[test]
    fn shadowed_cell_keeps_its_subscribers() {
        let scope = TestScope::new();
        let count = Cell::new(1);
        scope.add_cell("count", count.clone());
        scope.deal("doubled", &["count"], |(c,): (i32,)| c * 2).unwrap();

        let old = scope.cell::<i32>("doubled").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let _sub = old.watch(move |v| log.borrow_mut().push(*v));

        scope.deal("doubled", &["count"], |(c,): (i32,)| c * 10).unwrap();
        count.set(3);

        assert_eq!(*seen.borrow(), vec![6]);
        assert_eq!(scope.cell::<i32>("doubled").unwrap().get(), 30);
    }

    #[test]
    fn factories_build_outputs() {
        let scope = TestScope::new();
        scope.add_cell("label", Cell::new(String::from("hello")));
        scope.register_factory("display", |scope: &TestScope| {
            let text = scope.get_cell::<String>("label").map(|c| c.get()).unwrap_or_default();
            MemoryNode::element("span").with_text(&text)
        });

        let output = scope.build("display").unwrap();
        assert_eq!(output.text_content(), "hello");
        assert!(scope.get_factory::<()>("display").is_some());
        assert_eq!(scope.factory_count(), 1);
    }

    #[test]
    fn factories_with_arguments() {
        let scope = TestScope::new();
        scope.register_factory_with("item", |_: &TestScope, text: String| {
            MemoryNode::element("li").with_text(&text)
        });

        let item = scope.build_with("item", String::from("milk")).unwrap();
        assert_eq!(item.text_content(), "milk");

        assert!(scope.get_factory::<()>("item").is_none());
        assert!(matches!(
            scope.build("item"),
            Err(ScopeError::TypeMismatch { .. })
        ));
        assert_eq!(
            scope.build("nothing").unwrap_err(),
            ScopeError::UnknownFactory("nothing".into())
        );
    }

    #[test]
    fn factories_can_use_the_scope() {
        let scope = TestScope::new();
        scope.add_cell("n", Cell::new(2));
        scope.register_factory("inner", |_: &TestScope| MemoryNode::element("b"));
        scope.register_factory("outer", |scope: &TestScope| {
            scope.deal("n2", &["n"], |(n,): (i32,)| n * n).unwrap();
            let outer = MemoryNode::element("div");
            outer.append_child(&scope.build("inner").unwrap());
            outer
        });

        let outer = scope.build("outer").unwrap();
        assert_eq!(outer.children().len(), 1);
        assert_eq!(scope.cell::<i32>("n2").unwrap().get(), 4);
    }

    #[test]
    fn set_root_by_id_clears_and_mounts() {
        let doc = MemoryDocument::new();
        let app = doc.add_container("app");
        app.append_child(&MemoryNode::element("p"));

        let scope = TestScope::new().with_host(doc.clone());
        scope.set_root("app");
        assert!(scope.is_rooted());
        assert_eq!(app.child_count(), 0);

        let view = MemoryNode::element("main");
        assert!(scope.mount(&view));
        assert_eq!(app.children().len(), 1);
        assert!(app.children()[0].ptr_eq(&view));

        let next = MemoryNode::element("section");
        scope.mount(&next);
        assert_eq!(app.children().len(), 1);
        assert!(app.children()[0].ptr_eq(&next));
    }

    #[test]
    fn unresolved_root_unroots_and_mount_is_noop() {
        let doc = MemoryDocument::new();
        let scope = TestScope::new().with_host(doc);
        scope.set_root(RootRef::Node(MemoryNode::element("div")));
        assert!(scope.is_rooted());

        scope.set_root("nowhere");
        assert!(!scope.is_rooted());
        assert!(!scope.mount(&MemoryNode::element("main")));
    }

    #[test]
    fn try_set_root_reports_missing_host_container() {
        let scope = TestScope::new().with_host(MemoryDocument::new());
        let err = scope.try_set_root("app").unwrap_err();
        assert_eq!(err, ScopeError::HostNotFound("app".into()));
    }

    #[test]
    fn ids_without_a_host_do_not_resolve() {
        let scope = TestScope::new();
        assert!(scope.try_set_root("app").is_err());
    }

    #[test]
    fn repeated_set_root_leaves_old_root_alone() {
        let first = MemoryNode::element("div");
        let second = MemoryNode::element("div");
        let scope = TestScope::new();
        scope.set_root(RootRef::Node(first.clone()));
        scope.mount(&MemoryNode::element("main"));

        scope.set_root(RootRef::Node(second.clone()));
        assert_eq!(first.child_count(), 1);
        assert!(scope.root().is_some_and(|root| root.ptr_eq(&second)));
    }

    #[test]
    fn append_keeps_existing_children() {
        let root = MemoryNode::element("div");
        let scope = TestScope::new();
        assert!(!scope.append(&MemoryNode::element("p")));

        scope.set_root(RootRef::Node(root.clone()));
        scope.append(&MemoryNode::element("p"));
        scope.append(&MemoryNode::element("p"));
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn surfaces_need_a_host() {
        let scope = TestScope::new();
        assert_eq!(scope.create_surface("todo-list").unwrap_err(), ScopeError::NoHost);

        let scope = TestScope::new().with_host(MemoryDocument::new());
        let surface = scope.create_surface("todo-list").unwrap();
        assert_eq!(surface.tag(), "div");
        assert_eq!(surface.class_name(), "todo-list");
    }

    #[test]
    fn snapshot_renders_every_cell() {
        let scope = TestScope::new().with_config(ScopeConfig::default().with_label("counter"));
        scope.add_cell("counting", Cell::new(2));
        scope.deal("multiplying", &["counting"], |(c,): (i32,)| c * 2).unwrap();
        scope.register_factory("display", |_: &TestScope| MemoryNode::element("span"));

        let snapshot = scope.snapshot();
        assert_eq!(snapshot.label, "counter");
        assert_eq!(snapshot.value("counting"), Some("2"));
        assert_eq!(snapshot.value("multiplying"), Some("4"));
        assert!(snapshot.cell("multiplying").is_some_and(|c| c.derived));
        assert_eq!(snapshot.factory_count, 1);
        assert_eq!(snapshot.root, None);

        scope.set_root(RootRef::Node(MemoryNode::element("div")));
        assert_eq!(scope.snapshot().root.as_deref(), Some("anonymous"));
        scope.set_root(RootRef::Node(MemoryNode::element("div").with_id("app")));
        assert_eq!(scope.snapshot().root.as_deref(), Some("app"));
    }

    #[test]
    fn observer_sees_mutations_in_order() {
        let (scope, events) = recording_scope(ScopeConfig::default());
        scope.add_cell("a", Cell::new(1));
        scope.add_cell("a", Cell::new(2));
        scope.deal("b", &["a"], |(a,): (i32,)| a).unwrap();
        scope.register_factory("f", |_: &TestScope| MemoryNode::element("div"));
        scope.set_root("nowhere");

        let kinds: Vec<&str> = events.borrow().iter().map(ScopeEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "cell_added",
                "cell_shadowed",
                "cell_added",
                "cell_dealt",
                "factory_registered",
                "root_unresolved",
            ]
        );
    }

    #[test]
    fn failed_deal_emits_nothing() {
        let (scope, events) = recording_scope(ScopeConfig::default());
        let _ = scope.deal("x", &["nope"], |(v,): (i32,)| v);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn traced_cells_report_writes() {
        let (scope, events) = recording_scope(ScopeConfig::default().with_trace_cells(true));
        let count = Cell::new(0);
        scope.add_cell("counting", count.clone());
        scope.deal("doubled", &["counting"], |(c,): (i32,)| c * 2).unwrap();
        events.borrow_mut().clear();

        count.set(4);
        let changes: Vec<(String, String)> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ScopeEvent::CellChanged { name, value } => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![
                ("counting".to_string(), "4".to_string()),
                ("doubled".to_string(), "8".to_string()),
            ]
        );
    }

    #[test]
    fn untraced_scopes_do_not_subscribe() {
        let (scope, _events) = recording_scope(ScopeConfig::default());
        let count = Cell::new(0);
        scope.add_cell("counting", count.clone());
        assert_eq!(count.subscriber_count(), 0);
    }

    #[test]
    fn replacing_a_traced_cell_stops_tracing_the_old_one() {
        let (scope, _events) = recording_scope(ScopeConfig::default().with_trace_cells(true));
        let old = Cell::new(0);
        scope.add_cell("x", old.clone());
        assert_eq!(old.subscriber_count(), 1);
        scope.add_cell("x", Cell::new(1));
        assert_eq!(old.subscriber_count(), 0);
    }
}
