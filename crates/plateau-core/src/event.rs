#![forbid(unsafe_code)]

//! Event cells: discrete occurrences published through the cell machinery.
//!
//! An [`EventCell<E>`] is a `Cell<Option<E>>` that starts at `None` and whose
//! write entry point is [`trigger`](EventCell::trigger). Because it derefs to
//! the underlying cell, it can be subscribed to, derived from and registered
//! in a scope like any continuous value.

use std::fmt;
use std::ops::Deref;

use crate::cell::Cell;

/// A cell holding the most recent event, if any.
pub struct EventCell<E> {
    cell: Cell<Option<E>>,
}

impl<E> Clone for EventCell<E> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for EventCell<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventCell").field(&self.cell).finish()
    }
}

impl<E: Clone + 'static> Default for EventCell<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + 'static> EventCell<E> {
    /// Create an event cell with no event recorded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: Cell::new(None),
        }
    }

    /// Publish `event`; equivalent to `set(Some(event))`.
    pub fn trigger(&self, event: E) {
        self.cell.set(Some(event));
    }

    /// The most recent event, if one has been triggered.
    #[must_use]
    pub fn last(&self) -> Option<E> {
        self.cell.get()
    }

    /// The underlying cell handle.
    #[must_use]
    pub fn to_cell(&self) -> Cell<Option<E>> {
        self.cell.clone()
    }
}

impl<E> Deref for EventCell<E> {
    type Target = Cell<Option<E>>;

    fn deref(&self) -> &Self::Target {
        &self.cell
    }
}

impl<E> From<EventCell<E>> for Cell<Option<E>> {
    fn from(events: EventCell<E>) -> Self {
        events.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Click {
        kind: &'static str,
    }

    #[test]
    fn starts_empty() {
        let clicks: EventCell<Click> = EventCell::new();
        assert_eq!(clicks.last(), None);
        assert_eq!(clicks.get(), None);
    }

    #[test]
    fn trigger_notifies_like_set() {
        let clicks = EventCell::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = clicks.subscribe(move |e: &Option<Click>| s.borrow_mut().push(e.clone()));

        clicks.trigger(Click { kind: "click" });
        clicks.trigger(Click { kind: "click" });
        assert_eq!(
            *seen.borrow(),
            vec![
                None,
                Some(Click { kind: "click" }),
                Some(Click { kind: "click" }),
            ]
        );
    }

    #[test]
    fn events_feed_derivations() {
        let clicks = EventCell::new();
        let text = clicks.map(|e: &Option<Click>| match e {
            Some(click) => format!("Last event: {}", click.kind),
            None => "No events yet".to_string(),
        });
        assert_eq!(text.get(), "No events yet");

        clicks.trigger(Click { kind: "click" });
        assert_eq!(text.get(), "Last event: click");
    }

    #[test]
    fn converts_into_plain_cell() {
        let clicks: EventCell<u8> = EventCell::new();
        let cell: Cell<Option<u8>> = clicks.clone().into();
        clicks.trigger(1);
        assert_eq!(cell.get(), Some(1));
        assert!(cell.ptr_eq(&clicks.to_cell()));
    }
}
