//! Virtual-node trees.
//!
//! A `VNode` tree is the declarative description of desired output. It may
//! still contain `Component` and `Anchor` nodes; `scope::expand` evaluates
//! those and leaves only elements, text and fragments behind.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::instance::InstanceContext;
use crate::scope::Scope;

/// Attribute map of an element. Ordered so output is deterministic.
pub type Attributes = BTreeMap<String, Value>;

/// Captured child content: re-evaluated every time it is rendered.
pub type Slot = Arc<dyn Fn(&Scope) -> Vec<VNode> + Send + Sync>;

/// Wrap a closure as a `Slot`.
pub fn slot<F>(render: F) -> Slot
where
    F: Fn(&Scope) -> Vec<VNode> + Send + Sync + 'static,
{
    Arc::new(render)
}

/// A renderable component.
pub trait Component: Send + Sync {
    fn name(&self) -> &str;

    /// Produce this component's output. `scope` is bound to a fresh instance
    /// whose parent is the enclosing instance.
    fn render(&self, scope: &mut Scope) -> VNode;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attributes,
    pub children: Vec<VNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// The element's `id` attribute, when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").and_then(Value::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.attrs.get(name).and_then(Value::as_f64)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }
}

/// Use of a component inside a tree, with the children passed to it.
#[derive(Clone)]
pub struct ComponentNode {
    pub component: Arc<dyn Component>,
    pub children: Vec<VNode>,
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("component", &self.component.name())
            .field("children", &self.children)
            .finish()
    }
}

impl PartialEq for ComponentNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.component, &other.component) && self.children == other.children
    }
}

/// A subtree evaluated under an explicitly supplied instance context instead of
/// the context of wherever it ends up in the tree.
#[derive(Clone, Debug)]
pub struct AnchorNode {
    pub context: InstanceContext,
    pub children: Vec<VNode>,
}

impl PartialEq for AnchorNode {
    fn eq(&self, other: &Self) -> bool {
        self.context.id == other.context.id && self.children == other.children
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum VNode {
    Element(Element),
    Text(String),
    /// Transparent grouping node.
    Fragment(Vec<VNode>),
    Component(ComponentNode),
    Anchor(AnchorNode),
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Element {
        Element::new(tag)
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text(content.into())
    }

    pub fn fragment(children: impl IntoIterator<Item = VNode>) -> Self {
        VNode::Fragment(children.into_iter().collect())
    }

    pub fn component<C>(component: C, children: Vec<VNode>) -> Self
    where
        C: Component + 'static,
    {
        VNode::Component(ComponentNode {
            component: Arc::new(component),
            children,
        })
    }

    pub fn anchor(context: InstanceContext, children: Vec<VNode>) -> Self {
        VNode::Anchor(AnchorNode { context, children })
    }

    /// Direct children of this node (empty for text).
    pub fn child_nodes(&self) -> &[VNode] {
        match self {
            VNode::Element(el) => &el.children,
            VNode::Fragment(children) => children,
            VNode::Component(node) => &node.children,
            VNode::Anchor(anchor) => &anchor.children,
            VNode::Text(_) => &[],
        }
    }

    /// Whether the subtree still holds component or anchor nodes.
    pub fn needs_expansion(&self) -> bool {
        match self {
            VNode::Component(_) | VNode::Anchor(_) => true,
            other => other.child_nodes().iter().any(VNode::needs_expansion),
        }
    }

    /// Concatenated text of every text node in the subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Total node count of the subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.child_nodes().iter().map(VNode::node_count).sum::<usize>()
    }
}

fn collect_text(node: &VNode, out: &mut String) {
    match node {
        VNode::Text(text) => out.push_str(text),
        other => other.child_nodes().iter().for_each(|child| collect_text(child, out)),
    }
}

impl From<Element> for VNode {
    fn from(el: Element) -> Self {
        VNode::Element(el)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let node: VNode = Element::new("rect")
            .attr("id", "r1")
            .attr("width", 40)
            .child(VNode::text("label"))
            .into();

        match &node {
            VNode::Element(el) => {
                assert_eq!(el.id(), Some("r1"));
                assert_eq!(el.number("width"), Some(40.0));
                assert_eq!(el.children.len(), 1);
            }
            _ => panic!("Expected element"),
        }
        assert_eq!(node.node_count(), 2);
    }

    #[test]
    fn test_text_content_flattens_fragments() {
        let node = VNode::fragment([
            VNode::text("a"),
            Element::new("p").child(VNode::text("b")).into(),
            VNode::fragment([VNode::text("c")]),
        ]);
        assert_eq!(node.text_content(), "abc");
        assert!(!node.needs_expansion());
    }

    #[test]
    fn test_needs_expansion_sees_nested_anchor() {
        let anchored = VNode::anchor(InstanceContext::detached(), vec![VNode::text("x")]);
        let tree: VNode = Element::new("group").child(anchored).into();
        assert!(tree.needs_expansion());
    }
}
