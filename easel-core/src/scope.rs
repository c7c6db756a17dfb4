//! Evaluation scopes and tree expansion.
//!
//! `expand` is the reconciliation pass a renderer runs over a `VNode` tree:
//! every `Component` is rendered under a fresh child instance of the current
//! scope, and every `Anchor` replaces the current scope with its own context.
//!
//! ```text
//!  Fragment
//!    └─ Anchor(ctx)            scope := ctx
//!         └─ Component(Card)   scope := ctx.child()
//!              └─ Element      (inject resolves through ctx.provides)
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::instance::InstanceContext;
use crate::provide::{InjectionKey, ProvideTable};
use crate::vnode::{Element, VNode};

/// Evaluation scope bound to one instance.
#[derive(Clone, Debug)]
pub struct Scope {
    context: InstanceContext,
    children: Vec<VNode>,
}

impl Scope {
    pub fn new(context: InstanceContext) -> Self {
        Self {
            context,
            children: Vec::new(),
        }
    }

    /// Scope with no ancestry. Lookups made here only see what is provided
    /// inside the evaluated tree itself.
    pub fn detached() -> Self {
        Self::new(InstanceContext::detached())
    }

    pub fn context(&self) -> &InstanceContext {
        &self.context
    }

    pub fn inject<T>(&self, key: InjectionKey<T>) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.context.inject(key)
    }

    /// Provide a value to everything rendered below this scope.
    pub fn provide<T>(&mut self, key: InjectionKey<T>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.context.provides = ProvideTable::layered(&self.context.provides, key, value);
    }

    /// Children handed to the component being rendered.
    pub fn children(&self) -> &[VNode] {
        &self.children
    }

    /// Take ownership of the children, e.g. to place them in the output.
    pub fn take_children(&mut self) -> Vec<VNode> {
        std::mem::take(&mut self.children)
    }

    fn for_component(&self, children: Vec<VNode>) -> Self {
        Self {
            context: self.context.child(),
            children,
        }
    }
}

/// Evaluate `node` under `scope`, returning a tree free of component and
/// anchor nodes.
pub fn expand(node: &VNode, scope: &Scope) -> VNode {
    match node {
        VNode::Text(text) => VNode::Text(text.clone()),
        VNode::Element(el) => VNode::Element(Element {
            tag: el.tag.clone(),
            attrs: el.attrs.clone(),
            children: expand_all(&el.children, scope),
        }),
        VNode::Fragment(children) => VNode::Fragment(expand_all(children, scope)),
        VNode::Component(component) => {
            let mut inner = scope.for_component(component.children.clone());
            log::trace!(
                "Rendering component '{}' as {}",
                component.component.name(),
                inner.context().id
            );
            let rendered = component.component.render(&mut inner);
            expand(&rendered, &inner)
        }
        VNode::Anchor(anchor) => {
            let inner = Scope::new(anchor.context.clone());
            VNode::Fragment(expand_all(&anchor.children, &inner))
        }
    }
}

fn expand_all(nodes: &[VNode], scope: &Scope) -> Vec<VNode> {
    nodes.iter().map(|node| expand(node, scope)).collect()
}

// ===================================================================
// Tests
// ===================================================================
