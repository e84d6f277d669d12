#![forbid(unsafe_code)]

//! An in-memory element tree implementing the host traits.
//!
//! [`MemoryNode`] behaves like a DOM element handle: clones share the node,
//! appending a node that already has a parent moves it, and setting text or
//! markup replaces every child. [`MemoryDocument`] owns a `body` and
//! resolves containers by `id` among the nodes attached under it.
//!
//! Nodes also carry simple event listeners so tests and demos can simulate
//! clicks and typing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use plateau_bind::{Host, Node, Props};

type Listener = Rc<dyn Fn(&MemoryNode)>;

/// A child of a [`MemoryNode`].
#[derive(Clone)]
pub enum Child {
    /// A nested element.
    Element(MemoryNode),
    /// A text node.
    Text(String),
    /// Raw markup set through the html facet.
    Markup(String),
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(node) => fmt::Debug::fmt(node, f),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Markup(markup) => f.debug_tuple("Markup").field(markup).finish(),
        }
    }
}

struct NodeData {
    tag: String,
    class_name: String,
    style: Props,
    attributes: Props,
    properties: Props,
    children: Vec<Child>,
    listeners: Vec<(String, Listener)>,
    parent: Weak<RefCell<NodeData>>,
}

/// Shared handle to an in-memory element.
#[derive(Clone)]
pub struct MemoryNode {
    inner: Rc<RefCell<NodeData>>,
}

impl MemoryNode {
    /// A detached element with the given tag.
    #[must_use]
    pub fn element(tag: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                tag: tag.to_string(),
                class_name: String::new(),
                style: Props::new(),
                attributes: Props::new(),
                properties: Props::new(),
                children: Vec::new(),
                listeners: Vec::new(),
                parent: Weak::new(),
            })),
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.set_attribute("id", id);
        self
    }

    /// Set the class list.
    #[must_use]
    pub fn with_class(self, class_name: &str) -> Self {
        self.set_class_name(class_name);
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Element tag.
    #[must_use]
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    /// Class list.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.inner.borrow().class_name.clone()
    }

    /// Whether the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.inner
            .borrow()
            .class_name
            .split_whitespace()
            .any(|c| c == class)
    }

    /// One style property.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.inner.borrow().style.get(property).cloned()
    }

    /// Every style property.
    #[must_use]
    pub fn styles(&self) -> Props {
        self.inner.borrow().style.clone()
    }

    /// One attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.borrow().attributes.get(name).cloned()
    }

    /// Every attribute.
    #[must_use]
    pub fn attributes(&self) -> Props {
        self.inner.borrow().attributes.clone()
    }

    /// All children, including text and markup.
    #[must_use]
    pub fn child_nodes(&self) -> Vec<Child> {
        self.inner.borrow().children.clone()
    }

    /// Element children.
    #[must_use]
    pub fn children(&self) -> Vec<MemoryNode> {
        self.inner
            .borrow()
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Element(node) => Some(node.clone()),
                Child::Text(_) | Child::Markup(_) => None,
            })
            .collect()
    }

    /// Number of children of any kind.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Parent element, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<MemoryNode> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| MemoryNode { inner })
    }

    /// Concatenated text of the subtree, with markup tags stripped.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in self.child_nodes() {
            match child {
                Child::Element(node) => node.collect_text(out),
                Child::Text(text) => out.push_str(&text),
                Child::Markup(markup) => out.push_str(&strip_tags(&markup)),
            }
        }
    }

    /// Whether both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// First node in the subtree (including this one) with the given id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<MemoryNode> {
        self.find(&|node| node.attribute("id").as_deref() == Some(id))
            .into_iter()
            .next()
    }

    /// Nodes in the subtree whose class list contains `class`, in document
    /// order.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<MemoryNode> {
        self.find(&|node| node.has_class(class))
    }

    /// Nodes in the subtree with the given tag, in document order.
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Vec<MemoryNode> {
        self.find(&|node| node.inner.borrow().tag == tag)
    }

    fn find(&self, matches: &dyn Fn(&MemoryNode) -> bool) -> Vec<MemoryNode> {
        let mut found = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if matches(&node) {
                found.push(node.clone());
            }
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
        }
        found
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Run `handler` every time `event` is dispatched on this node.
    pub fn on(&self, event: &str, handler: impl Fn(&MemoryNode) + 'static) {
        self.inner
            .borrow_mut()
            .listeners
            .push((event.to_string(), Rc::new(handler)));
    }

    /// Run every handler registered for `event`, returning how many ran.
    ///
    /// Handlers added while dispatching do not run for this dispatch.
    pub fn dispatch(&self, event: &str) -> usize {
        let handlers: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        tracing::trace!(event, handlers = handlers.len(), "dispatching");
        for handler in &handlers {
            handler(self);
        }
        handlers.len()
    }

    /// Dispatch `click`.
    pub fn click(&self) -> usize {
        self.dispatch("click")
    }

    /// Set the `value` property as a user typing would, then dispatch `input`.
    pub fn type_text(&self, value: &str) -> usize {
        self.set_property("value", value);
        self.dispatch("input")
    }

    fn detach_from_parent(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .inner
            .borrow_mut()
            .children
            .retain(|child| !matches!(child, Child::Element(node) if node.ptr_eq(self)));
        self.inner.borrow_mut().parent = Weak::new();
    }

    fn replace_children(&self, replacement: Option<Child>) {
        let previous = std::mem::take(&mut self.inner.borrow_mut().children);
        for child in &previous {
            if let Child::Element(node) = child {
                node.inner.borrow_mut().parent = Weak::new();
            }
        }
        if let Some(child) = replacement {
            self.inner.borrow_mut().children.push(child);
        }
    }
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

impl Node for MemoryNode {
    fn set_text(&self, text: &str) {
        let child = (!text.is_empty()).then(|| Child::Text(text.to_string()));
        self.replace_children(child);
    }

    fn set_html(&self, html: &str) {
        let child = (!html.is_empty()).then(|| Child::Markup(html.to_string()));
        self.replace_children(child);
    }

    fn set_class_name(&self, class_name: &str) {
        self.inner.borrow_mut().class_name = class_name.to_string();
    }

    fn set_style(&self, property: &str, value: &str) {
        self.inner
            .borrow_mut()
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn property(&self, name: &str) -> Option<String> {
        self.inner.borrow().properties.get(name).cloned()
    }

    fn set_property(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .properties
            .insert(name.to_string(), value.to_string());
    }

    fn append_child(&self, child: &Self) {
        if child.ptr_eq(self) {
            tracing::warn!(tag = %self.tag(), "refusing to append a node to itself");
            return;
        }
        child.detach_from_parent();
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner
            .borrow_mut()
            .children
            .push(Child::Element(child.clone()));
    }

    fn clear_children(&self) {
        self.replace_children(None);
    }

    fn id(&self) -> Option<String> {
        self.attribute("id")
    }
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryNode")
            .field("tag", &inner.tag)
            .field("id", &inner.attributes.get("id"))
            .field("class_name", &inner.class_name)
            .field("children", &inner.children.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// MemoryDocument
// ---------------------------------------------------------------------------

/// An in-memory document: a `body` plus id lookup. Clones share the body.
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    body: MemoryNode,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document with an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            body: MemoryNode::element("body"),
        }
    }

    /// The document body.
    #[must_use]
    pub fn body(&self) -> MemoryNode {
        self.body.clone()
    }

    /// Append a `div` with the given id to the body and return it.
    pub fn add_container(&self, id: &str) -> MemoryNode {
        let container = MemoryNode::element("div").with_id(id);
        self.body.append_child(&container);
        container
    }
}

impl Host for MemoryDocument {
    type Node = MemoryNode;

    fn create_element(&self, tag: &str) -> MemoryNode {
        MemoryNode::element(tag)
    }

    fn element_by_id(&self, id: &str) -> Option<MemoryNode> {
        self.body.find_by_id(id)
    }
}
