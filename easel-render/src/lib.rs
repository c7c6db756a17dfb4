//! # easel-render
//!
//! Render targets and the foreign renderer boundary for Easel.
//!
//! ## Architecture
//!
//! ```text
//!  SurfaceDescriptor
//!       │
//!       ▼
//!  TargetLifecycle.obtain()     ◀─── one live target per mount point
//!       │  (first call)                (flush + reuse afterwards)
//!       ▼
//!  TargetFactory.create()       ◀─── canvas bound to #id / document + src callback
//!       │
//!       ▼
//!  ForeignRenderer.render(tree, &mut target)
//! ```
//!
//! ## Crate modules
//!
//! - [`descriptor`]: surface kinds and descriptors
//! - [`target`]: canvas and document targets
//! - [`factory`]: descriptor → target construction
//! - [`lifecycle`]: per-mount-point ownership, flush-and-reuse
//! - [`renderer`]: `ForeignRenderer` trait and `SceneRenderer`
//! - [`scene`]: expanded tree → draw commands / pages

pub mod descriptor;
pub mod factory;
pub mod lifecycle;
pub mod renderer;
pub mod scene;
pub mod target;

// Re-exports for convenience
pub use descriptor::{ConfigMap, SurfaceDescriptor, SurfaceKind};
pub use factory::{SurfaceTargetFactory, TargetError, TargetFactory};
pub use lifecycle::{LifecycleStats, MountPointId, TargetLifecycle};
pub use renderer::{ForeignRenderer, RenderError, SceneRenderer, DEFAULT_LINE_HEIGHT};
pub use target::{
    CanvasTarget, DocumentPage, DocumentTarget, DrawCommand, PageLayout, RenderTarget, TargetId,
    UpdateCallback,
};
