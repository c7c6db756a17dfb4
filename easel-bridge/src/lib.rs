//! # easel-bridge
//!
//! Render bridge for Easel: hands a component's child content to a foreign
//! renderer drawing into a canvas or a generated document, while that content
//! keeps resolving values provided by the bridge's ancestors.
//!
//! ## Architecture
//!
//! ```text
//!  host commit ──▶ BridgeRuntime.commit(mp)
//!                      │ select_output(kind, id) ──▶ OutputTree
//!                      │ MountOrchestrator.committed()
//!                      │     └─ TargetLifecycle.obtain()  (create | flush + reuse)
//!                      ▼
//!                  pending queue
//!                      │
//!  post-commit ──▶ BridgeRuntime.settle()
//!                      │ ContextBridge.wrap(content, bridge ctx)
//!                      │     └─ Fragment[Anchor{bridge linkage}, content…]
//!                      ▼
//!                  ForeignRenderer.render(tree, target)
//! ```
//!
//! ## Crate modules
//!
//! - [`props`]: component props and runtime configuration
//! - [`output`]: the bridge's own output node
//! - [`context`]: synthetic anchor and content wrapping
//! - [`orchestrator`]: per mount point state machine
//! - [`runtime`]: all mount points of one host, diagnostics
//! - [`component`]: registration under `SurfaceFrame`
//! - [`error`]: bridge errors and diagnostics

pub mod component;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod props;
pub mod runtime;

// Re-exports for convenience
pub use component::{props_from_declaration, register, SURFACE_FRAME, SURFACE_FRAME_PROPS};
pub use context::{ContextBridge, SyntheticAnchor, WrappedTree};
pub use error::{BridgeError, Diagnostic};
pub use orchestrator::{MountOrchestrator, MountState};
pub use output::{select_output, DOCUMENT_MIME, FRAME_CLASS, OUTPUT_CLASS};
pub use props::{BridgeConfig, BridgeProps};
pub use runtime::{BridgeRuntime, SettleResult};
