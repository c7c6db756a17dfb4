//! Component instances and their positional metadata.
//!
//! `HostTree` is an arena of `InstanceContext`s. Contexts are plain values:
//! reading one out of the tree gives an immutable snapshot of the instance's
//! parent, root, application context and inherited-value table.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::provide::{InjectionKey, ProvideTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Instance not found: {0}")]
    InstanceNotFound(InstanceId),
}

/// Opaque identity of one component instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application-wide context shared by every instance of one app.
#[derive(Debug)]
pub struct AppContext {
    pub name: String,
    /// Values provided at the application level; every root table layers on it.
    pub provides: Arc<ProvideTable>,
}

impl AppContext {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            provides: ProvideTable::empty(),
        })
    }

    /// App context with a pre-populated application table.
    pub fn with_provides(name: impl Into<String>, provides: Arc<ProvideTable>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            provides,
        })
    }
}

/// Immutable snapshot of an instance's position in the host tree.
#[derive(Clone, Debug)]
pub struct InstanceContext {
    pub id: InstanceId,
    pub parent: Option<InstanceId>,
    pub root: InstanceId,
    pub app: Arc<AppContext>,
    pub provides: Arc<ProvideTable>,
}

impl InstanceContext {
    /// Context of a root instance of `app`.
    pub fn root(app: Arc<AppContext>) -> Self {
        let id = InstanceId::new();
        let provides = Arc::clone(&app.provides);
        Self {
            id,
            parent: None,
            root: id,
            app,
            provides,
        }
    }

    /// Context with no ancestry and an empty table.
    pub fn detached() -> Self {
        Self::root(AppContext::new("detached"))
    }

    /// Context of a fresh child instance. The child shares the parent's table
    /// until it provides something of its own.
    pub fn child(&self) -> Self {
        Self {
            id: InstanceId::new(),
            parent: Some(self.id),
            root: self.root,
            app: Arc::clone(&self.app),
            provides: Arc::clone(&self.provides),
        }
    }

    pub fn inject<T>(&self, key: InjectionKey<T>) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.provides.lookup(key)
    }

    /// Whether `other` sits at exactly the same position: same parent, same
    /// root, same application and the same table (by identity).
    pub fn same_linkage(&self, other: &InstanceContext) -> bool {
        self.parent == other.parent
            && self.root == other.root
            && Arc::ptr_eq(&self.app, &other.app)
            && Arc::ptr_eq(&self.provides, &other.provides)
    }
}

/// Arena of live instances.
#[derive(Debug, Default)]
pub struct HostTree {
    instances: FxHashMap<InstanceId, InstanceEntry>,
}

#[derive(Debug)]
struct InstanceEntry {
    name: String,
    context: InstanceContext,
    children: Vec<InstanceId>,
}

impl HostTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root instance for `app`.
    pub fn mount_root(&mut self, app: Arc<AppContext>, name: impl Into<String>) -> InstanceId {
        let context = InstanceContext::root(app);
        let id = context.id;
        self.instances.insert(
            id,
            InstanceEntry {
                name: name.into(),
                context,
                children: Vec::new(),
            },
        );
        id
    }

    /// Register a child of `parent`.
    pub fn create_child(
        &mut self,
        parent: InstanceId,
        name: impl Into<String>,
    ) -> Result<InstanceId, HostError> {
        let parent_entry = self
            .instances
            .get_mut(&parent)
            .ok_or(HostError::InstanceNotFound(parent))?;
        let context = parent_entry.context.child();
        let id = context.id;
        parent_entry.children.push(id);

        self.instances.insert(
            id,
            InstanceEntry {
                name: name.into(),
                context,
                children: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Provide `value` under `key` for `id` and every child created afterwards.
    pub fn provide<T>(&mut self, id: InstanceId, key: InjectionKey<T>, value: T) -> Result<(), HostError>
    where
        T: Any + Send + Sync,
    {
        let entry = self
            .instances
            .get_mut(&id)
            .ok_or(HostError::InstanceNotFound(id))?;
        entry.context.provides = ProvideTable::layered(&entry.context.provides, key, value);
        Ok(())
    }

    pub fn inject<T>(&self, id: InstanceId, key: InjectionKey<T>) -> Result<Option<Arc<T>>, HostError>
    where
        T: Any + Send + Sync,
    {
        Ok(self.entry(id)?.context.inject(key))
    }

    /// Snapshot of `id`'s context.
    pub fn context(&self, id: InstanceId) -> Result<InstanceContext, HostError> {
        Ok(self.entry(id)?.context.clone())
    }

    pub fn name(&self, id: InstanceId) -> Result<&str, HostError> {
        Ok(self.entry(id)?.name.as_str())
    }

    pub fn children(&self, id: InstanceId) -> Result<&[InstanceId], HostError> {
        Ok(&self.entry(id)?.children)
    }

    /// Remove `id` and its whole subtree. Returns the number of instances removed.
    pub fn remove(&mut self, id: InstanceId) -> Result<usize, HostError> {
        let entry = self
            .instances
            .remove(&id)
            .ok_or(HostError::InstanceNotFound(id))?;

        if let Some(parent) = entry.context.parent {
            if let Some(parent_entry) = self.instances.get_mut(&parent) {
                parent_entry.children.retain(|child| *child != id);
            }
        }

        let mut removed = 1;
        let mut stack = entry.children;
        while let Some(child) = stack.pop() {
            if let Some(child_entry) = self.instances.remove(&child) {
                removed += 1;
                stack.extend(child_entry.children);
            }
        }
        Ok(removed)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn entry(&self, id: InstanceId) -> Result<&InstanceEntry, HostError> {
        self.instances.get(&id).ok_or(HostError::InstanceNotFound(id))
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALE: InjectionKey<String> = InjectionKey::new("locale");

    #[test]
    fn test_child_links_to_parent_and_root() {
        let mut tree = HostTree::new();
        let root = tree.mount_root(AppContext::new("app"), "App");
        let child = tree.create_child(root, "Panel").unwrap();
        let grandchild = tree.create_child(child, "Leaf").unwrap();

        let ctx = tree.context(grandchild).unwrap();
        assert_eq!(ctx.parent, Some(child));
        assert_eq!(ctx.root, root);
        assert_eq!(tree.children(root).unwrap(), &[child]);
        assert_eq!(tree.name(grandchild).unwrap(), "Leaf");
    }

    #[test]
    fn test_provided_value_reaches_later_descendants() {
        let mut tree = HostTree::new();
        let root = tree.mount_root(AppContext::new("app"), "App");
        tree.provide(root, LOCALE, "fa-IR".to_string()).unwrap();
        let middle = tree.create_child(root, "Middle").unwrap();
        let leaf = tree.create_child(middle, "Leaf").unwrap();

        let value = tree.inject(leaf, LOCALE).unwrap();
        assert_eq!(value.as_deref(), Some(&"fa-IR".to_string()));
    }

    #[test]
    fn test_child_shares_parent_table_until_it_provides() {
        let mut tree = HostTree::new();
        let root = tree.mount_root(AppContext::new("app"), "App");
        let child = tree.create_child(root, "Child").unwrap();

        let root_ctx = tree.context(root).unwrap();
        let child_ctx = tree.context(child).unwrap();
        assert!(Arc::ptr_eq(&root_ctx.provides, &child_ctx.provides));

        tree.provide(child, LOCALE, "en".to_string()).unwrap();
        let child_ctx = tree.context(child).unwrap();
        assert!(!Arc::ptr_eq(&root_ctx.provides, &child_ctx.provides));
        assert!(tree.inject(root, LOCALE).unwrap().is_none());
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = HostTree::new();
        let root = tree.mount_root(AppContext::new("app"), "App");
        let a = tree.create_child(root, "A").unwrap();
        let b = tree.create_child(a, "B").unwrap();
        tree.create_child(b, "C").unwrap();

        assert_eq!(tree.remove(a).unwrap(), 3);
        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.context(b).unwrap_err(), HostError::InstanceNotFound(b));
    }

    #[test]
    fn test_same_linkage() {
        let ctx = InstanceContext::detached();
        let sibling = InstanceContext {
            id: InstanceId::new(),
            ..ctx.clone()
        };
        assert!(ctx.same_linkage(&sibling));
        assert!(!ctx.same_linkage(&ctx.child()));
    }
}
