//! Inherited-value tables.
//!
//! A `ProvideTable` is an immutable layer of contextual values. Providing a
//! value never edits an existing table: it stacks a new layer on top, so any
//! `Arc<ProvideTable>` handed out earlier keeps resolving exactly as before.
//!
//! ```text
//!  app table ◀── root layer ◀── provider layer ◀── (shared by descendants)
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased contextual value.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Typed name for a contextual value.
///
/// Two keys with the same name address the same slot; the type parameter only
/// drives the downcast on lookup.
pub struct InjectionKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InjectionKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for InjectionKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for InjectionKey<T> {}

impl<T> fmt::Debug for InjectionKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InjectionKey").field(&self.name).finish()
    }
}

/// One layer of inherited values, linked to the layer it shadows.
#[derive(Default)]
pub struct ProvideTable {
    parent: Option<Arc<ProvideTable>>,
    values: HashMap<&'static str, ContextValue>,
}

impl ProvideTable {
    /// An empty table with no ancestry.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stack a new layer holding `key → value` on top of `parent`.
    pub fn layered<T>(parent: &Arc<ProvideTable>, key: InjectionKey<T>, value: T) -> Arc<Self>
    where
        T: Any + Send + Sync,
    {
        let mut values: HashMap<&'static str, ContextValue> = HashMap::with_capacity(1);
        values.insert(key.name(), Arc::new(value));
        Arc::new(Self {
            parent: Some(Arc::clone(parent)),
            values,
        })
    }

    /// Resolve `key`, walking toward the outermost layer.
    ///
    /// Returns `None` when no layer provides the name, or when the nearest
    /// provided value is of a different type.
    pub fn lookup<T>(&self, key: InjectionKey<T>) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let raw = self.lookup_raw(key.name())?;
        match raw.downcast::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::debug!("Contextual value '{}' has an unexpected type", key.name());
                None
            }
        }
    }

    /// Untyped lookup by name.
    pub fn lookup_raw(&self, name: &str) -> Option<ContextValue> {
        let mut layer = Some(self);
        while let Some(table) = layer {
            if let Some(value) = table.values.get(name) {
                return Some(Arc::clone(value));
            }
            layer = table.parent.as_deref();
        }
        None
    }

    /// Whether any layer provides `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup_raw(name).is_some()
    }

    /// Number of layers including this one.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut layer = Some(self);
        while let Some(table) = layer {
            depth += 1;
            layer = table.parent.as_deref();
        }
        depth
    }

    pub fn parent(&self) -> Option<&Arc<ProvideTable>> {
        self.parent.as_ref()
    }
}

impl fmt::Debug for ProvideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&&str> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("ProvideTable")
            .field("keys", &keys)
            .field("depth", &self.depth())
            .finish()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: InjectionKey<String> = InjectionKey::new("theme");
    const SCALE: InjectionKey<f32> = InjectionKey::new("scale");

    #[test]
    fn test_lookup_walks_layers() {
        let root = ProvideTable::empty();
        let themed = ProvideTable::layered(&root, THEME, "dark".to_string());
        let scaled = ProvideTable::layered(&themed, SCALE, 2.0);

        assert_eq!(scaled.lookup(THEME).as_deref(), Some(&"dark".to_string()));
        assert_eq!(scaled.lookup(SCALE).as_deref(), Some(&2.0));
        assert!(themed.lookup(SCALE).is_none());
        assert_eq!(scaled.depth(), 3);
    }

    #[test]
    fn test_inner_layer_shadows_outer() {
        let root = ProvideTable::empty();
        let outer = ProvideTable::layered(&root, THEME, "dark".to_string());
        let inner = ProvideTable::layered(&outer, THEME, "light".to_string());

        assert_eq!(inner.lookup(THEME).as_deref(), Some(&"light".to_string()));
        // The outer layer is untouched.
        assert_eq!(outer.lookup(THEME).as_deref(), Some(&"dark".to_string()));
    }

    #[test]
    fn test_type_mismatch_is_none() {
        let root = ProvideTable::empty();
        let table = ProvideTable::layered(&root, THEME, "dark".to_string());
        let wrong: InjectionKey<u32> = InjectionKey::new("theme");

        assert!(table.lookup(wrong).is_none());
        assert!(table.contains("theme"));
    }

    #[test]
    fn test_missing_key() {
        let root = ProvideTable::empty();
        assert!(root.lookup(THEME).is_none());
        assert!(!root.contains("theme"));
    }
}
