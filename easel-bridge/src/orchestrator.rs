//! Mount orchestrator: sequences one mount point's render passes.
//!
//! ```text
//!  Uninitialized ──committed()──▶ Mounted ──obtain target──▶ Scheduled
//!        ▲                          │  ▲                         │
//!        │ type changed             │  │ update() / committed()   │ settle()
//!        │                          ▼  │                         ▼
//!        └──────────────────── (stalls: no target)           Rendered
//! ```
//!
//! Phase 1 is the host committing [`MountOrchestrator::output_node`]. The
//! explicit `committed()` signal starts phase 2: target acquisition happens
//! synchronously, and the foreign render waits for `settle()`, the host's
//! post-commit turn, so sibling commits are in place first.

use easel_core::{InstanceContext, Slot, VNode};
use easel_render::{ForeignRenderer, MountPointId, TargetError, TargetFactory, TargetLifecycle};

use crate::context::ContextBridge;
use crate::error::BridgeError;
use crate::output::select_output;
use crate::props::BridgeProps;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MountState {
    Uninitialized,
    Mounted,
    Scheduled,
    Rendered,
}

pub struct MountOrchestrator {
    mount: MountPointId,
    props: BridgeProps,
    bridge: InstanceContext,
    content: Option<Slot>,
    state: MountState,
    passes: u64,
}

impl MountOrchestrator {
    pub fn new(props: BridgeProps, bridge: InstanceContext, content: Option<Slot>) -> Self {
        Self {
            mount: MountPointId::new(props.id.clone()),
            props,
            bridge,
            content,
            state: MountState::Uninitialized,
            passes: 0,
        }
    }

    pub fn mount_point(&self) -> &MountPointId {
        &self.mount
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn props(&self) -> &BridgeProps {
        &self.props
    }

    pub fn bridge_context(&self) -> &InstanceContext {
        &self.bridge
    }

    /// Completed render passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// The bridge's own output node, for the host to commit.
    pub fn output_node(&self) -> VNode {
        select_output(&self.props.kind, &self.props.id)
    }

    /// Host signal: the output node is committed.
    ///
    /// Moves to `Mounted` and immediately asks for a target. On failure the
    /// state stays at `Mounted`. A mount that is already `Scheduled` is left as is.
    pub fn committed<F: TargetFactory>(
        &mut self,
        lifecycle: &mut TargetLifecycle<F>,
    ) -> Result<MountState, BridgeError> {
        if self.state == MountState::Scheduled {
            log::trace!("Mount point '{}' already scheduled", self.mount);
            return Ok(self.state);
        }
        self.transition(MountState::Mounted);
        self.schedule(lifecycle)
    }

    fn schedule<F: TargetFactory>(
        &mut self,
        lifecycle: &mut TargetLifecycle<F>,
    ) -> Result<MountState, BridgeError> {
        lifecycle.obtain(&self.mount, &self.props.descriptor())?;
        self.transition(MountState::Scheduled);
        Ok(self.state)
    }

    /// Host's post-commit turn: wrap the captured content and render it.
    ///
    /// Does nothing unless the mount is `Scheduled`. A failed render still
    /// ends the pass.
    pub fn settle<F, R>(
        &mut self,
        lifecycle: &mut TargetLifecycle<F>,
        renderer: &mut R,
    ) -> Result<MountState, BridgeError>
    where
        F: TargetFactory,
        R: ForeignRenderer + ?Sized,
    {
        if self.state != MountState::Scheduled {
            return Ok(self.state);
        }

        let target = match lifecycle.target_mut(&self.mount) {
            Some(target) => target,
            None => {
                self.transition(MountState::Mounted);
                return Err(TargetError::NoLiveTarget(self.mount.to_string()).into());
            }
        };

        let wrapped = ContextBridge::wrap(self.content.as_ref(), &self.bridge);
        let result = renderer.render(wrapped.tree(), target);

        self.passes += 1;
        self.transition(MountState::Rendered);
        result?;
        Ok(self.state)
    }

    /// New props or content from the host.
    ///
    /// A changed surface type reshapes the output node, so the mount goes back
    /// to `Uninitialized` and waits for the new node to be committed. Otherwise
    /// a rendered mount re-enters `Mounted` and is scheduled again.
    pub fn update<F: TargetFactory>(
        &mut self,
        props: BridgeProps,
        content: Option<Slot>,
        lifecycle: &mut TargetLifecycle<F>,
    ) -> Result<MountState, BridgeError> {
        debug_assert_eq!(props.id, self.props.id, "mount point ids are immutable");
        let reshaped = props.kind != self.props.kind;
        self.props = props;
        self.content = content;

        if reshaped {
            self.transition(MountState::Uninitialized);
            return Ok(self.state);
        }

        match self.state {
            // Not committed yet, or a render is already pending and will pick
            // up the new content.
            MountState::Uninitialized | MountState::Scheduled => Ok(self.state),
            MountState::Mounted | MountState::Rendered => {
                self.transition(MountState::Mounted);
                self.schedule(lifecycle)
            }
        }
    }

    /// The host mounted a fresh instance of the bridge at this point.
    pub fn remount(&mut self, props: BridgeProps, bridge: InstanceContext, content: Option<Slot>) {
        self.props = props;
        self.bridge = bridge;
        self.content = content;
        self.transition(MountState::Uninitialized);
    }

    fn transition(&mut self, next: MountState) {
        if self.state != next {
            log::debug!("Mount point '{}': {:?} -> {:?}", self.mount, self.state, next);
        }
        self.state = next;
    }
}

// ===================================================================
// Tests
// ===================================================================
