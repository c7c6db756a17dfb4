//! Target factory: turns a surface descriptor into a render target.

use std::sync::Arc;

use easel_core::{OutputError, SharedOutput};
use thiserror::Error;

use crate::descriptor::{SurfaceDescriptor, SurfaceKind};
use crate::target::{CanvasTarget, DocumentTarget, PageLayout, RenderTarget, UpdateCallback};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// Non-fatal: the mount proceeds without a target.
    #[error("Unrecognized surface type: '{0}'")]
    UnrecognizedSurfaceType(String),
    /// The output element was not committed before the target was requested.
    #[error("Output node #{0} has not been committed")]
    MissingOutputNode(String),
    #[error("No live target for mount point '{0}'")]
    NoLiveTarget(String),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

pub trait TargetFactory {
    fn create(&self, descriptor: &SurfaceDescriptor) -> Result<RenderTarget, TargetError>;
}

impl<F: TargetFactory + ?Sized> TargetFactory for Arc<F> {
    fn create(&self, descriptor: &SurfaceDescriptor) -> Result<RenderTarget, TargetError> {
        (**self).create(descriptor)
    }
}

/// Factory binding targets to elements of a committed output tree.
#[derive(Clone)]
pub struct SurfaceTargetFactory {
    output: SharedOutput,
}

impl SurfaceTargetFactory {
    pub fn new(output: SharedOutput) -> Self {
        Self { output }
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    fn ensure_committed(&self, id: &str) -> Result<(), TargetError> {
        let tree = self.output.read().map_err(|_| OutputError::Poisoned)?;
        if tree.contains(id) {
            Ok(())
        } else {
            Err(TargetError::MissingOutputNode(id.to_string()))
        }
    }

    /// Callback that points the frame's `src` at each new content source.
    fn frame_updater(&self, frame_id: &str) -> UpdateCallback {
        let output = Arc::clone(&self.output);
        let frame_id = frame_id.to_string();
        Arc::new(move |source: &str| {
            let mut tree = match output.write() {
                Ok(tree) => tree,
                Err(_) => {
                    log::error!("Output tree poisoned; dropping update for #{frame_id}");
                    return;
                }
            };
            if let Err(e) = tree.set_attribute(&frame_id, "src", source) {
                log::warn!("Document update for #{frame_id} not applied: {e}");
            }
        })
    }
}

impl TargetFactory for SurfaceTargetFactory {
    fn create(&self, descriptor: &SurfaceDescriptor) -> Result<RenderTarget, TargetError> {
        match &descriptor.kind {
            SurfaceKind::Canvas => {
                self.ensure_committed(&descriptor.id)?;
                log::info!("Creating canvas target bound to #{}", descriptor.id);
                Ok(RenderTarget::Canvas(CanvasTarget::new(
                    descriptor.id.clone(),
                    descriptor.context_config.clone(),
                    descriptor.layer_config.clone(),
                )))
            }
            SurfaceKind::Document => {
                self.ensure_committed(&descriptor.id)?;
                log::info!(
                    "Creating document target for #{} ({}×{}, margin {})",
                    descriptor.id,
                    descriptor.width,
                    descriptor.height,
                    descriptor.margin
                );
                let layout = PageLayout {
                    width: descriptor.width,
                    height: descriptor.height,
                    margin: descriptor.margin,
                };
                Ok(RenderTarget::Document(DocumentTarget::new(
                    descriptor.id.clone(),
                    layout,
                    self.frame_updater(&descriptor.id),
                )))
            }
            SurfaceKind::Unrecognized(tag) => Err(TargetError::UnrecognizedSurfaceType(tag.clone())),
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
