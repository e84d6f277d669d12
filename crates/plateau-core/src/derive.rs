#![forbid(unsafe_code)]

//! Derived cells: values that are a pure function of other cells.
//!
//! # Design
//!
//! [`derive`] computes the initial value from the current source values, then
//! registers one listener per source. Each listener recomputes `combine` over
//! **all** sources and publishes the result through the derived cell's own
//! write path, so downstream listeners are notified exactly as for a plain
//! cell. The derived cell owns those subscriptions. It disconnects from its
//! sources once no handle and no subscription refers to it; a detached
//! listener pins it for good.
//!
//! Propagation is eager and per edge: N upstream writes produce N recomputes
//! and N downstream notifications, with no deduplication. When two derived
//! cells share a source, a third cell combining both can observe one of them
//! updated and the other not yet (a glitch); it converges once the upstream
//! write has fully propagated.
//!
//! # Invariants
//!
//! 1. After any source write returns, `derived.get() == combine(sources)`.
//! 2. The recompute reads every source, not only the one that changed.
//! 3. Derived cells refuse external writes ([`CellError::DerivedWrite`]).
//!
//! [`CellError::DerivedWrite`]: crate::CellError::DerivedWrite

use std::rc::Rc;

use crate::cell::{Cell, Subscription, Writer};
use crate::policy::ReentrancyPolicy;

/// An ordered set of source cells a derivation reads from.
///
/// Implemented for homogeneous `Vec<Cell<T>>` and `[Cell<T>; N]` (the
/// combine function receives `Vec<T>` / `[T; N]`) and for tuples of up to six
/// cells of different types (the combine function receives a tuple of
/// values).
pub trait Sources: 'static {
    /// Snapshot type handed to the combine function.
    type Values;

    /// Read the current value of every source, in order.
    fn values(&self) -> Self::Values;

    /// Register `on_change` (without initial replay) on every source.
    fn watch_each(&self, on_change: &Rc<dyn Fn()>) -> Vec<Subscription>;

    /// Number of source cells.
    fn arity(&self) -> usize;
}

fn watch_one<T: Clone + 'static>(cell: &Cell<T>, on_change: &Rc<dyn Fn()>) -> Subscription {
    let on_change = Rc::clone(on_change);
    cell.watch(move |_| on_change())
}

impl<T: Clone + 'static> Sources for Vec<Cell<T>> {
    type Values = Vec<T>;

    fn values(&self) -> Vec<T> {
        self.iter().map(Cell::get).collect()
    }

    fn watch_each(&self, on_change: &Rc<dyn Fn()>) -> Vec<Subscription> {
        self.iter().map(|cell| watch_one(cell, on_change)).collect()
    }

    fn arity(&self) -> usize {
        self.len()
    }
}

impl<T: Clone + 'static, const N: usize> Sources for [Cell<T>; N] {
    type Values = [T; N];

    fn values(&self) -> [T; N] {
        std::array::from_fn(|i| self[i].get())
    }

    fn watch_each(&self, on_change: &Rc<dyn Fn()>) -> Vec<Subscription> {
        self.iter().map(|cell| watch_one(cell, on_change)).collect()
    }

    fn arity(&self) -> usize {
        N
    }
}

macro_rules! impl_tuple_sources {
    ($arity:expr; $($name:ident $idx:tt),+) => {
        impl<$($name: Clone + 'static),+> Sources for ($(Cell<$name>,)+) {
            type Values = ($($name,)+);

            fn values(&self) -> Self::Values {
                ($(self.$idx.get(),)+)
            }

            fn watch_each(&self, on_change: &Rc<dyn Fn()>) -> Vec<Subscription> {
                vec![$(watch_one(&self.$idx, on_change)),+]
            }

            fn arity(&self) -> usize {
                $arity
            }
        }
    };
}

impl_tuple_sources!(1; A 0);
impl_tuple_sources!(2; A 0, B 1);
impl_tuple_sources!(3; A 0, B 1, C 2);
impl_tuple_sources!(4; A 0, B 1, C 2, D 3);
impl_tuple_sources!(5; A 0, B 1, C 2, D 3, E 4);
impl_tuple_sources!(6; A 0, B 1, C 2, D 3, E 4, F 5);

/// Build a derived cell whose value is `combine` over `sources`.
///
/// ```
/// use plateau_core::{Cell, derive};
///
/// let a = Cell::new(2);
/// let b = Cell::new(3);
/// let product = derive((a.clone(), b.clone()), |(x, y)| x * y);
/// assert_eq!(product.get(), 6);
///
/// a.set(5);
/// assert_eq!(product.get(), 15);
/// ```
pub fn derive<S, R, F>(sources: S, combine: F) -> Cell<R>
where
    S: Sources,
    R: Clone + 'static,
    F: Fn(S::Values) -> R + 'static,
{
    derive_with_policy(sources, combine, ReentrancyPolicy::default())
}

/// [`derive`] with an explicit re-entrancy policy for the derived cell.
pub fn derive_with_policy<S, R, F>(sources: S, combine: F, policy: ReentrancyPolicy) -> Cell<R>
where
    S: Sources,
    R: Clone + 'static,
    F: Fn(S::Values) -> R + 'static,
{
    build(sources, combine, policy, None)
}

fn build<S, R, F>(
    sources: S,
    combine: F,
    policy: ReentrancyPolicy,
    effect: Option<Box<dyn Fn(&R)>>,
) -> Cell<R>
where
    S: Sources,
    R: Clone + 'static,
    F: Fn(S::Values) -> R + 'static,
{
    let initial = combine(sources.values());
    let derived = Cell::derived(initial, policy);
    let arity = sources.arity();

    let weak = derived.downgrade();
    let sources = Rc::new(sources);
    let upstream = Rc::clone(&sources);
    let effect = effect.map(Rc::<dyn Fn(&R)>::from);
    let after = effect.clone();

    let recompute: Rc<dyn Fn()> = Rc::new(move || {
        let Some(cell) = Cell::upgrade(&weak) else {
            return;
        };
        let next = combine(upstream.values());
        let published = after.as_ref().map(|_| next.clone());
        if let Err(err) = cell.commit(Writer::Recompute, move |value| *value = next) {
            tracing::warn!(error = %err, "derived recompute refused");
            return;
        }
        if let (Some(effect), Some(value)) = (&after, published) {
            effect(&value);
        }
    });

    derived.attach_upstream(sources.watch_each(&recompute));
    tracing::trace!(sources = arity, "derived cell created");

    if let Some(effect) = effect {
        effect(&derived.get());
    }
    derived
}

impl<T: Clone + 'static> Cell<T> {
    /// Derive a cell from this one through `f`.
    ///
    /// ```
    /// use plateau_core::Cell;
    ///
    /// let count = Cell::new(2);
    /// let label = count.map(|n| format!("Result: {n}"));
    /// count.set(4);
    /// assert_eq!(label.get(), "Result: 4");
    /// ```
    pub fn map<R: Clone + 'static>(&self, f: impl Fn(&T) -> R + 'static) -> Cell<R> {
        derive((self.clone(),), move |(value,)| f(&value))
    }

    /// Derive a cell through `f` and run `effect` with every value it takes,
    /// including the initial one, right after the value is published.
    pub fn map_with_effect<R: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> R + 'static,
        effect: impl Fn(&R) + 'static,
    ) -> Cell<R> {
        build(
            (self.clone(),),
            move |(value,)| f(&value),
            ReentrancyPolicy::default(),
            Some(Box::new(effect)),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
