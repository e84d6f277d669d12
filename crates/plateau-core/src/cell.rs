#![forbid(unsafe_code)]

//! Observable value cells with synchronous change notification.
//!
//! # Design
//!
//! [`Cell<T>`] is a cheap, cloneable handle to shared `Rc<RefCell<..>>`
//! storage. Listeners are stored as `Weak` function pointers; the strong
//! side lives in the [`Subscription`] returned at registration, so dropping
//! the subscription is enough to stop delivery. Dead entries are pruned
//! lazily on the next write.
//!
//! A live subscription also holds its cell, so a cell is freed only once it
//! is both unreferenced and unsubscribed. A derived cell that received a
//! detached listener pins itself: its sources keep driving it for the rest
//! of the process.
//!
//! # Invariants
//!
//! 1. `get()` returns the value of the most recent accepted write.
//! 2. Every listener registered when a write is accepted is invoked exactly
//!    once for that write, in registration order, before the write returns.
//! 3. Writes are unconditional: setting an equal value still notifies and
//!    still bumps the version.
//! 4. `subscribe()` delivers the current value once before returning.
//! 5. No internal borrow is held while listeners run.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Re-entrant write over the limit | Listener writes back into a notifying cell | Write refused, value unchanged |
//! | External write to a derived cell | Caller bypasses the derivation | Write refused, value unchanged |
//! | `update` closure touches its own cell | Nested borrow | Panics (`RefCell` borrow error) |
//! | Listener captures its own cell and is detached | `Rc` cycle | Cell is never freed |
//! | Listener detached onto a derived cell | Cell pins itself | Cell and its sources are never freed |

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::CellError;
use crate::policy::ReentrancyPolicy;

/// Listener storage; the `Rc` is owned by a [`Subscription`].
struct ListenerFn<T>(Box<dyn Fn(&T)>);

/// Hook run with every accepted value before listeners are notified.
type Mirror<T> = Rc<dyn Fn(&T)>;

/// Who is writing: recompute writes are the only ones a derived cell accepts.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Writer {
    External,
    Recompute,
}

pub(crate) struct CellInner<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<ListenerFn<T>>>,
    /// Listeners whose subscription was detached; they live as long as the cell.
    retained: Vec<Rc<dyn Any>>,
    /// Subscriptions a derived cell holds on its sources.
    upstream: Vec<Subscription>,
    /// Self-reference taken when a derived cell receives a detached listener.
    pin: Option<Rc<dyn Any>>,
    mirror: Option<Mirror<T>>,
    policy: ReentrancyPolicy,
    /// Notification sweeps currently in flight.
    depth: usize,
    derived: bool,
}

/// Lets a detached [`Subscription`] hand its listener to the owning cell.
trait Retain {
    fn retain(self: Rc<Self>, guard: Rc<dyn Any>);
}

impl<T: 'static> Retain for RefCell<CellInner<T>> {
    fn retain(self: Rc<Self>, guard: Rc<dyn Any>) {
        let mut inner = self.borrow_mut();
        inner.retained.push(guard);
        if inner.derived && inner.pin.is_none() {
            let this = Rc::clone(&self);
            let pin: Rc<dyn Any> = this;
            inner.pin = Some(pin);
        }
    }
}

/// Decrements the sweep counter when a notification pass ends, even on panic.
struct SweepGuard<'a, T> {
    inner: &'a RefCell<CellInner<T>>,
}

impl<T> Drop for SweepGuard<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.depth = inner.depth.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle for a listener registered on a [`Cell`].
///
/// Dropping the handle removes the listener. [`unsubscribe`](Self::unsubscribe)
/// does the same explicitly and may be called any number of times.
/// [`detach`](Self::detach) keeps the listener for the lifetime of the cell.
///
/// While active, the handle keeps its cell alive.
#[must_use = "dropping a Subscription removes its listener; call `detach` to keep it"]
pub struct Subscription {
    guard: Option<Rc<dyn Any>>,
    owner: Option<Rc<dyn Retain>>,
}

impl Subscription {
    /// Stop delivering future writes to this listener.
    ///
    /// A sweep that is already running still completes with the listener set
    /// it captured when the write was accepted.
    pub fn unsubscribe(&mut self) {
        self.guard = None;
        self.owner = None;
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Give up the handle and keep the listener for as long as the cell lives.
    pub fn detach(mut self) {
        if let (Some(guard), Some(owner)) = (self.guard.take(), self.owner.take()) {
            owner.retain(guard);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A shared, observable value.
///
/// Cloning a `Cell` creates another handle to the **same** value and
/// listener set.
pub struct Cell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Cell")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("derived", &inner.derived)
            .field(
                "subscribers",
                &inner
                    .listeners
                    .iter()
                    .filter(|l| l.strong_count() > 0)
                    .count(),
            )
            .finish()
    }
}

impl<T: Clone + Default + 'static> Default for Cell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Cell<T> {
    /// Create a cell holding `initial`, with no listeners.
    pub fn new(initial: T) -> Self {
        Self::with_policy(initial, ReentrancyPolicy::default())
    }

    /// Create a cell with an explicit re-entrancy policy.
    pub fn with_policy(initial: T, policy: ReentrancyPolicy) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellInner {
                value: initial,
                version: 0,
                listeners: Vec::new(),
                retained: Vec::new(),
                upstream: Vec::new(),
                pin: None,
                mirror: None,
                policy,
                depth: 0,
                derived: false,
            })),
        }
    }

    /// Create a cell that runs `mirror` with every accepted value before its
    /// listeners are notified.
    ///
    /// This is the write path of externally synced cells: the hook copies the
    /// value into some outside property so the two never disagree.
    pub fn with_mirror(initial: T, mirror: impl Fn(&T) + 'static) -> Self {
        let cell = Self::new(initial);
        cell.inner.borrow_mut().mirror = Some(Rc::new(mirror));
        cell
    }

    pub(crate) fn derived(initial: T, policy: ReentrancyPolicy) -> Self {
        let cell = Self::with_policy(initial, policy);
        cell.inner.borrow_mut().derived = true;
        cell
    }

    pub(crate) fn attach_upstream(&self, subscriptions: Vec<Subscription>) {
        self.inner.borrow_mut().upstream.extend(subscriptions);
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<CellInner<T>>> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<RefCell<CellInner<T>>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Current value (cloned).
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if `f` writes to this same cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify every listener.
    ///
    /// A write refused by the re-entrancy guard (or aimed at a derived cell)
    /// is logged at `warn` and dropped; use [`try_set`](Self::try_set) to
    /// observe the refusal.
    pub fn set(&self, next: T) {
        if let Err(err) = self.try_set(next) {
            tracing::warn!(error = %err, "cell write refused");
        }
    }

    /// Replace the value and notify every listener, reporting refusals.
    ///
    /// # Errors
    ///
    /// - [`CellError::Reentrant`] when the cell's policy refuses a nested write.
    /// - [`CellError::DerivedWrite`] when the cell is derived.
    pub fn try_set(&self, next: T) -> Result<(), CellError> {
        self.commit(Writer::External, move |value| *value = next)
    }

    /// Mutate the value in place, then notify like [`set`](Self::set).
    ///
    /// # Panics
    ///
    /// Panics if `f` reads or writes this same cell.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        if let Err(err) = self.commit(Writer::External, f) {
            tracing::warn!(error = %err, "cell update refused");
        }
    }

    pub(crate) fn commit(
        &self,
        writer: Writer,
        mutate: impl FnOnce(&mut T),
    ) -> Result<(), CellError> {
        let (value, listeners, mirror) = {
            let mut inner = self.inner.borrow_mut();
            if inner.derived && writer == Writer::External {
                return Err(CellError::DerivedWrite);
            }
            if !inner.policy.permits(inner.depth) {
                return Err(CellError::Reentrant {
                    depth: inner.depth,
                    limit: inner.policy.limit(),
                });
            }
            mutate(&mut inner.value);
            inner.version += 1;
            inner.depth += 1;
            inner.listeners.retain(|l| l.strong_count() > 0);
            let listeners: Vec<Rc<ListenerFn<T>>> =
                inner.listeners.iter().filter_map(Weak::upgrade).collect();
            tracing::trace!(
                version = inner.version,
                depth = inner.depth,
                listeners = listeners.len(),
                "cell write"
            );
            (inner.value.clone(), listeners, inner.mirror.clone())
        };

        let _sweep = SweepGuard { inner: &self.inner };
        if let Some(mirror) = mirror {
            mirror(&value);
        }
        for listener in &listeners {
            (listener.0)(&value);
        }
        Ok(())
    }

    /// Register `listener`, deliver the current value to it once, and return
    /// the handle that removes it.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let callback = Rc::new(ListenerFn(Box::new(listener) as Box<dyn Fn(&T)>));
        self.register(&callback);
        let current = self.get();
        (callback.0)(&current);
        self.guard(callback)
    }

    /// Register `listener` for future writes only (no initial delivery).
    pub fn watch(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let callback = Rc::new(ListenerFn(Box::new(listener) as Box<dyn Fn(&T)>));
        self.register(&callback);
        self.guard(callback)
    }

    fn register(&self, callback: &Rc<ListenerFn<T>>) {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.push(Rc::downgrade(callback));
        tracing::trace!(listeners = inner.listeners.len(), "cell subscribe");
    }

    fn guard(&self, callback: Rc<ListenerFn<T>>) -> Subscription {
        let inner = Rc::clone(&self.inner);
        let owner: Rc<dyn Retain> = inner;
        let guard: Rc<dyn Any> = callback;
        Subscription {
            guard: Some(guard),
            owner: Some(owner),
        }
    }

    /// Number of write-count increments since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner
            .listeners
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    /// Whether this cell is maintained by a derivation.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.inner.borrow().derived
    }

    /// Whether the cell is currently delivering a write.
    #[must_use]
    pub fn is_notifying(&self) -> bool {
        self.inner.borrow().depth > 0
    }

    /// The cell's re-entrancy policy.
    #[must_use]
    pub fn policy(&self) -> ReentrancyPolicy {
        self.inner.borrow().policy
    }

    /// Change the re-entrancy policy; applies to the next write.
    pub fn set_policy(&self, policy: ReentrancyPolicy) {
        self.inner.borrow_mut().policy = policy;
    }

    /// Whether two handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
