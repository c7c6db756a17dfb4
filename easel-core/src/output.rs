//! Committed host output.
//!
//! `OutputTree` is what the host has actually committed: every element that
//! carries an `id` is addressable here, and its attributes can be rewritten
//! after the fact (a document frame's `src`, for instance).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::vnode::{Attributes, VNode};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    #[error("Output element not found: #{0}")]
    ElementNotFound(String),
    #[error("Output tree lock poisoned")]
    Poisoned,
}

/// Output tree shared between the host and target callbacks.
pub type SharedOutput = Arc<RwLock<OutputTree>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputElement {
    pub id: String,
    pub tag: String,
    pub attrs: Attributes,
}

impl OutputElement {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// `class` attribute split on whitespace.
    pub fn classes(&self) -> Vec<&str> {
        self.attrs
            .get("class")
            .and_then(Value::as_str)
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct OutputTree {
    elements: HashMap<String, OutputElement>,
    commits: u64,
}

impl OutputTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedOutput {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Commit `node`: every element with an `id` becomes addressable.
    /// Returns the ids committed, in tree order.
    pub fn commit(&mut self, node: &VNode) -> Vec<String> {
        let mut committed = Vec::new();
        self.commit_node(node, &mut committed);
        self.commits += 1;
        log::trace!("Committed {} addressable element(s)", committed.len());
        committed
    }

    fn commit_node(&mut self, node: &VNode, committed: &mut Vec<String>) {
        if let VNode::Element(el) = node {
            if let Some(id) = el.id() {
                self.elements.insert(
                    id.to_string(),
                    OutputElement {
                        id: id.to_string(),
                        tag: el.tag.clone(),
                        attrs: el.attrs.clone(),
                    },
                );
                committed.push(id.to_string());
            }
        }
        for child in node.child_nodes() {
            self.commit_node(child, committed);
        }
    }

    pub fn element(&self, id: &str) -> Option<&OutputElement> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<&Value> {
        self.elements.get(id)?.attribute(name)
    }

    pub fn set_attribute(
        &mut self,
        id: &str,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), OutputError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| OutputError::ElementNotFound(id.to_string()))?;
        element.attrs.insert(name.into(), value.into());
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<OutputElement> {
        self.elements.remove(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of commits applied so far.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::Element;

    #[test]
    fn test_commit_registers_nested_ids() {
        let mut tree = OutputTree::new();
        let node: VNode = Element::new("section")
            .attr("id", "outer")
            .child(Element::new("iframe").attr("id", "frame").into())
            .child(Element::new("span").into())
            .into();

        let ids = tree.commit(&node);
        assert_eq!(ids, vec!["outer".to_string(), "frame".to_string()]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.element("frame").unwrap().tag, "iframe");
        assert_eq!(tree.commit_count(), 1);
    }

    #[test]
    fn test_set_attribute() {
        let mut tree = OutputTree::new();
        tree.commit(&Element::new("iframe").attr("id", "d1").attr("src", Value::Null).into());

        tree.set_attribute("d1", "src", "blob://abc").unwrap();
        assert_eq!(tree.attribute("d1", "src"), Some(&Value::from("blob://abc")));
    }

    #[test]
    fn test_set_attribute_missing_element() {
        let mut tree = OutputTree::new();
        let err = tree.set_attribute("nope", "src", "x").unwrap_err();
        assert_eq!(err, OutputError::ElementNotFound("nope".into()));
    }

    #[test]
    fn test_classes() {
        let el = OutputElement {
            id: "c".into(),
            tag: "div".into(),
            attrs: [("class".to_string(), Value::from("a  b"))].into_iter().collect(),
        };
        assert_eq!(el.classes(), vec!["a", "b"]);
    }
}
