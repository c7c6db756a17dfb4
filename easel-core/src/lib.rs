//! # easel-core
//!
//! Host component tree model for Easel: instances, inherited values,
//! virtual nodes and the committed output tree.
//!
//! ## Architecture
//!
//! ```text
//!  HostTree (instances)          OutputTree (committed elements)
//!       │                               ▲
//!       │ context(id)                   │ commit(VNode)
//!       ▼                               │
//!  InstanceContext ──▶ Scope ──▶ expand(VNode) ──▶ component-free VNode
//!       │
//!       └── provides: Arc<ProvideTable>  (layered, never mutated)
//! ```
//!
//! ## Crate modules
//!
//! - [`instance`]: instance ids, application context, `HostTree`
//! - [`provide`]: inherited-value tables and injection keys
//! - [`vnode`]: virtual nodes, components, slots
//! - [`scope`]: evaluation scopes and `expand`
//! - [`output`]: committed, id-addressable output elements
//! - [`registry`]: component registration under fixed names

pub mod instance;
pub mod output;
pub mod provide;
pub mod registry;
pub mod scope;
pub mod vnode;

// Re-exports for convenience
pub use instance::{AppContext, HostError, HostTree, InstanceContext, InstanceId};
pub use output::{OutputElement, OutputError, OutputTree, SharedOutput};
pub use provide::{ContextValue, InjectionKey, ProvideTable};
pub use registry::{ComponentRegistry, PropKind, PropSpec, RegisteredComponent, RegistryError};
pub use scope::{expand, Scope};
pub use vnode::{slot, AnchorNode, Attributes, Component, ComponentNode, Element, Slot, VNode};
