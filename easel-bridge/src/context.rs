//! Context bridge: carries the bridge's ancestry into detached content.
//!
//! The foreign renderer evaluates what it is given outside the host's
//! traversal. Content captured inside the bridge is therefore wrapped under a
//! synthetic anchor whose linkage is copied from the bridge's own context:
//!
//! ```text
//!  host:    App ─ Layout ─ Bridge          (provides: T, parent: P, root: R)
//!                             ┆ captured content
//!  foreign: Fragment
//!             └─ Anchor                    (provides: T, parent: P, root: R)
//!                  └─ content…             (inject resolves through T)
//! ```
//!
//! The anchor is a new value built from the bridge context; the bridge
//! context itself is only read.

use std::sync::Arc;

use easel_core::{InstanceContext, InstanceId, Scope, Slot, VNode};

/// Throwaway instance hosting the bridge's linkage for one render pass.
#[derive(Clone, Debug)]
pub struct SyntheticAnchor {
    context: InstanceContext,
}

impl SyntheticAnchor {
    /// Anchor with a fresh identity and exactly the bridge's parent, root,
    /// application context and inherited-value table.
    pub fn from_bridge(bridge: &InstanceContext) -> Self {
        Self {
            context: InstanceContext {
                id: InstanceId::new(),
                parent: bridge.parent,
                root: bridge.root,
                app: Arc::clone(&bridge.app),
                provides: Arc::clone(&bridge.provides),
            },
        }
    }

    pub fn context(&self) -> &InstanceContext {
        &self.context
    }

    pub fn scope(&self) -> Scope {
        Scope::new(self.context.clone())
    }
}

/// Captured content evaluated under its anchor, ready for a foreign renderer.
#[derive(Clone, Debug)]
pub struct WrappedTree {
    anchor: SyntheticAnchor,
    tree: VNode,
}

impl WrappedTree {
    pub fn anchor(&self) -> &SyntheticAnchor {
        &self.anchor
    }

    /// Transparent fragment whose single child is the anchored content.
    pub fn tree(&self) -> &VNode {
        &self.tree
    }

    /// Top-level nodes produced by the captured content.
    pub fn content(&self) -> &[VNode] {
        match &self.tree {
            VNode::Fragment(children) => match children.first() {
                Some(VNode::Anchor(anchor)) => &anchor.children,
                _ => &[],
            },
            _ => &[],
        }
    }

    pub fn into_tree(self) -> VNode {
        self.tree
    }
}

pub struct ContextBridge;

impl ContextBridge {
    /// Wrap `content` so it resolves contextual values as if it were rendered
    /// in place of `bridge`. Absent content yields an empty anchor.
    ///
    /// Must run on every render pass: the slot is re-evaluated each time.
    pub fn wrap(content: Option<&Slot>, bridge: &InstanceContext) -> WrappedTree {
        let anchor = SyntheticAnchor::from_bridge(bridge);
        let children = match content {
            Some(slot) => slot(&anchor.scope()),
            None => Vec::new(),
        };
        let tree = VNode::Fragment(vec![VNode::anchor(anchor.context().clone(), children)]);
        WrappedTree { anchor, tree }
    }
}

// ===================================================================
// Tests
// ===================================================================
