#![forbid(unsafe_code)]

//! Type-erased registry entries.

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

use plateau_bind::Node;
use plateau_core::{Cell, Subscription};

use crate::scope::Scope;

/// A registered cell of any value type.
pub(crate) trait ErasedCell {
    fn as_any(&self) -> &dyn Any;
    fn value_type(&self) -> &'static str;
    fn render(&self) -> String;
    fn version(&self) -> u64;
    fn is_derived(&self) -> bool;
    /// Report every future write, rendered with `Debug`.
    fn trace(&self, report: Rc<dyn Fn(String)>) -> Subscription;
}

impl<T: Clone + fmt::Debug + 'static> ErasedCell for Cell<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn render(&self) -> String {
        self.with(|value| format!("{value:?}"))
    }

    fn version(&self) -> u64 {
        Cell::version(self)
    }

    fn is_derived(&self) -> bool {
        Cell::is_derived(self)
    }

    fn trace(&self, report: Rc<dyn Fn(String)>) -> Subscription {
        self.watch(move |value| report(format!("{value:?}")))
    }
}

/// An output-producing function registered on a scope.
///
/// Zero-argument factories take `()`.
pub type Factory<A, N> = Rc<dyn Fn(&Scope<N>, A) -> N>;

pub(crate) struct FactoryEntry {
    pub(crate) handle: Box<dyn Any>,
    pub(crate) arg_type: &'static str,
}

impl FactoryEntry {
    pub(crate) fn new<A: 'static, N: Node>(factory: Factory<A, N>) -> Self {
        Self {
            handle: Box::new(factory),
            arg_type: type_name::<A>(),
        }
    }

    pub(crate) fn typed<A: 'static, N: Node>(&self) -> Option<Factory<A, N>> {
        self.handle.downcast_ref::<Factory<A, N>>().cloned()
    }
}
