#![forbid(unsafe_code)]

//! Minimal recording node for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::{Node, Props};

#[derive(Debug, Default)]
pub(crate) struct Record {
    pub text: String,
    pub html: String,
    pub class_name: String,
    pub style: Props,
    pub attributes: Props,
    pub properties: Props,
    pub children: Vec<RecordingNode>,
    pub writes: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingNode(pub Rc<RefCell<Record>>);

impl RecordingNode {
    pub fn record(&self) -> std::cell::Ref<'_, Record> {
        self.0.borrow()
    }
}

impl Node for RecordingNode {
    fn set_text(&self, text: &str) {
        let mut r = self.0.borrow_mut();
        r.text = text.to_string();
        r.writes += 1;
    }

    fn set_html(&self, html: &str) {
        let mut r = self.0.borrow_mut();
        r.html = html.to_string();
        r.writes += 1;
    }

    fn set_class_name(&self, class_name: &str) {
        let mut r = self.0.borrow_mut();
        r.class_name = class_name.to_string();
        r.writes += 1;
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut r = self.0.borrow_mut();
        r.style.insert(property.to_string(), value.to_string());
        r.writes += 1;
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut r = self.0.borrow_mut();
        r.attributes.insert(name.to_string(), value.to_string());
        r.writes += 1;
    }

    fn property(&self, name: &str) -> Option<String> {
        self.0.borrow().properties.get(name).cloned()
    }

    fn set_property(&self, name: &str, value: &str) {
        let mut r = self.0.borrow_mut();
        r.properties.insert(name.to_string(), value.to_string());
        r.writes += 1;
    }

    fn append_child(&self, child: &Self) {
        self.0.borrow_mut().children.push(child.clone());
    }

    fn clear_children(&self) {
        self.0.borrow_mut().children.clear();
    }
}
