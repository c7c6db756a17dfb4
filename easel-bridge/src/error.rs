//! Bridge errors and recorded diagnostics.

use easel_core::{OutputError, RegistryError};
use easel_render::{MountPointId, RenderError, TargetError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Unknown mount point: '{0}'")]
    UnknownMountPoint(MountPointId),
    #[error("Invalid bridge props: {0}")]
    InvalidProps(#[from] serde_json::Error),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Target error: {0}")]
    Target(#[from] TargetError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Non-fatal condition absorbed by the bridge instead of reaching the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("Unknown render context '{tag}' for mount point '{mount}'; nothing will be rendered")]
    UnrecognizedSurfaceType { mount: MountPointId, tag: String },
    #[error("Output node #{mount} was not committed before its target was requested")]
    MissingOutputNode { mount: MountPointId },
    #[error("Render pass for '{mount}' failed: {reason}")]
    RenderFailed { mount: MountPointId, reason: String },
}

impl Diagnostic {
    pub fn from_error(mount: &MountPointId, err: BridgeError) -> Self {
        match err {
            BridgeError::Target(TargetError::UnrecognizedSurfaceType(tag)) => {
                Diagnostic::UnrecognizedSurfaceType { mount: mount.clone(), tag }
            }
            BridgeError::Target(TargetError::MissingOutputNode(_)) => {
                Diagnostic::MissingOutputNode { mount: mount.clone() }
            }
            other => Diagnostic::RenderFailed {
                mount: mount.clone(),
                reason: other.to_string(),
            },
        }
    }

    pub fn mount_point(&self) -> &MountPointId {
        match self {
            Diagnostic::UnrecognizedSurfaceType { mount, .. }
            | Diagnostic::MissingOutputNode { mount }
            | Diagnostic::RenderFailed { mount, .. } => mount,
        }
    }

    /// Emit through the `log` facade at the level matching its severity.
    pub fn log(&self) {
        match self {
            Diagnostic::MissingOutputNode { .. } => log::error!("{self}"),
            _ => log::warn!("{self}"),
        }
    }
}
