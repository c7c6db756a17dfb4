//! Bridge runtime: owns every mount point of one host.
//!
//! The host drives it in two phases per update:
//!
//! 1. `commit()` each changed bridge (writes its output node, acquires a
//!    target, queues the mount)
//! 2. `settle()` once all commits are in (renders every queued mount)
//!
//! Recoverable failures never reach the host. They are logged, kept as
//! [`Diagnostic`]s and the mount simply renders nothing.

use std::collections::{BTreeMap, VecDeque};

use easel_core::{InstanceContext, OutputError, SharedOutput, Slot, VNode};
use easel_render::{
    ForeignRenderer, MountPointId, RenderTarget, SceneRenderer, SurfaceTargetFactory, TargetFactory,
    TargetLifecycle,
};

use crate::error::{BridgeError, Diagnostic};
use crate::orchestrator::{MountOrchestrator, MountState};
use crate::props::{BridgeConfig, BridgeProps};

/// Outcome of one `settle()` turn.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SettleResult {
    pub rendered: Vec<MountPointId>,
    /// Queued mounts that no longer needed rendering (unmounted or reshaped).
    pub skipped: usize,
    pub failed: Vec<MountPointId>,
}

impl SettleResult {
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty() && self.skipped == 0 && self.failed.is_empty()
    }
}

pub struct BridgeRuntime<F, R> {
    output: SharedOutput,
    lifecycle: TargetLifecycle<F>,
    renderer: R,
    mounts: BTreeMap<MountPointId, MountOrchestrator>,
    pending: VecDeque<MountPointId>,
    diagnostics: Vec<Diagnostic>,
    config: BridgeConfig,
}

impl<R: ForeignRenderer> BridgeRuntime<SurfaceTargetFactory, R> {
    /// Runtime whose targets bind to elements of `output`.
    pub fn new(output: SharedOutput, renderer: R) -> Self {
        let factory = SurfaceTargetFactory::new(output.clone());
        Self::with_factory(output, factory, renderer)
    }
}

impl BridgeRuntime<SurfaceTargetFactory, SceneRenderer> {
    /// Runtime using the built-in scene renderer.
    pub fn scene(output: SharedOutput, config: BridgeConfig) -> Self {
        let renderer = SceneRenderer::new(config.line_height);
        Self::new(output, renderer).with_config(config)
    }
}

impl<F: TargetFactory, R: ForeignRenderer> BridgeRuntime<F, R> {
    pub fn with_factory(output: SharedOutput, factory: F, renderer: R) -> Self {
        Self {
            output,
            lifecycle: TargetLifecycle::new(factory),
            renderer,
            mounts: BTreeMap::new(),
            pending: VecDeque::new(),
            diagnostics: Vec::new(),
            config: BridgeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Register a bridge instance at `props.id`.
    ///
    /// Setting up an id that already exists re-mounts it: the live target is
    /// kept and will be flushed on the next pass.
    pub fn setup(&mut self, props: BridgeProps, bridge: InstanceContext, content: Option<Slot>) -> MountPointId {
        let mount = MountPointId::new(props.id.clone());
        match self.mounts.get_mut(&mount) {
            Some(existing) => {
                log::debug!("Re-mounting bridge at '{mount}'");
                existing.remount(props, bridge, content);
            }
            None => {
                log::debug!("Setting up bridge at '{mount}' ({})", props.kind);
                self.mounts
                    .insert(mount.clone(), MountOrchestrator::new(props, bridge, content));
            }
        }
        mount
    }

    /// The node the host must commit for `mount`.
    pub fn output_node(&self, mount: &MountPointId) -> Result<VNode, BridgeError> {
        Ok(self.orchestrator(mount)?.output_node())
    }

    /// Commit the output node of `mount` into the shared output tree and
    /// signal the commit.
    pub fn commit(&mut self, mount: &MountPointId) -> Result<MountState, BridgeError> {
        let node = self.output_node(mount)?;
        self.output
            .write()
            .map_err(|_| OutputError::Poisoned)?
            .commit(&node);
        self.committed(mount)
    }

    /// Host signal that the output node of `mount` is committed.
    ///
    /// Target failures are absorbed into diagnostics; the returned state tells
    /// whether a render was scheduled.
    pub fn committed(&mut self, mount: &MountPointId) -> Result<MountState, BridgeError> {
        let orchestrator = self
            .mounts
            .get_mut(mount)
            .ok_or_else(|| BridgeError::UnknownMountPoint(mount.clone()))?;

        match orchestrator.committed(&mut self.lifecycle) {
            Ok(state) => {
                self.enqueue(mount);
                Ok(state)
            }
            Err(e) => {
                let state = orchestrator.state();
                self.record(Diagnostic::from_error(mount, e));
                Ok(state)
            }
        }
    }

    /// Render every queued mount, in commit order.
    pub fn settle(&mut self) -> SettleResult {
        let mut result = SettleResult::default();

        while let Some(mount) = self.pending.pop_front() {
            let Some(orchestrator) = self.mounts.get_mut(&mount) else {
                result.skipped += 1;
                continue;
            };
            if orchestrator.state() != MountState::Scheduled {
                result.skipped += 1;
                continue;
            }

            match orchestrator.settle(&mut self.lifecycle, &mut self.renderer) {
                Ok(_) => result.rendered.push(mount),
                Err(e) => {
                    self.record(Diagnostic::from_error(&mount, e));
                    result.failed.push(mount);
                }
            }
        }

        if !result.is_empty() {
            log::debug!(
                "Settled: {} rendered, {} skipped, {} failed",
                result.rendered.len(),
                result.skipped,
                result.failed.len()
            );
        }
        result
    }

    /// Apply new props and content to `mount`.
    ///
    /// A different `props.id` moves the bridge: the old mount point is torn
    /// down and a new one set up, which the host must then commit. Returns the
    /// mount point the bridge now lives at.
    pub fn update(
        &mut self,
        mount: &MountPointId,
        props: BridgeProps,
        content: Option<Slot>,
    ) -> Result<MountPointId, BridgeError> {
        let orchestrator = self
            .mounts
            .get_mut(mount)
            .ok_or_else(|| BridgeError::UnknownMountPoint(mount.clone()))?;

        if props.id != mount.as_str() {
            let bridge = orchestrator.bridge_context().clone();
            log::info!("Bridge '{mount}' moved to '{}'", props.id);
            self.unmount(mount)?;
            return Ok(self.setup(props, bridge, content));
        }

        match orchestrator.update(props, content, &mut self.lifecycle) {
            Ok(MountState::Scheduled) => self.enqueue(mount),
            Ok(_) => {}
            Err(e) => self.record(Diagnostic::from_error(mount, e)),
        }
        Ok(mount.clone())
    }

    /// Tear down `mount`: releases its target, drops any queued render and
    /// removes its output node. Returns the released target, if any.
    pub fn unmount(&mut self, mount: &MountPointId) -> Result<Option<RenderTarget>, BridgeError> {
        if self.mounts.remove(mount).is_none() {
            return Err(BridgeError::UnknownMountPoint(mount.clone()));
        }
        self.pending.retain(|queued| queued != mount);
        let released = self.lifecycle.release(mount);
        self.output
            .write()
            .map_err(|_| OutputError::Poisoned)?
            .remove(mount.as_str());
        log::debug!("Unmounted bridge at '{mount}'");
        Ok(released)
    }

    /// Set up, commit and settle a bridge in one go.
    pub fn mount(
        &mut self,
        props: BridgeProps,
        bridge: InstanceContext,
        content: Option<Slot>,
    ) -> Result<MountPointId, BridgeError> {
        let mount = self.setup(props, bridge, content);
        self.commit(&mount)?;
        self.settle();
        Ok(mount)
    }

    pub fn state(&self, mount: &MountPointId) -> Option<MountState> {
        self.mounts.get(mount).map(MountOrchestrator::state)
    }

    pub fn target(&self, mount: &MountPointId) -> Option<&RenderTarget> {
        self.lifecycle.target(mount)
    }

    pub fn mount_points(&self) -> impl Iterator<Item = &MountPointId> {
        self.mounts.keys()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn lifecycle(&self) -> &TargetLifecycle<F> {
        &self.lifecycle
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn orchestrator(&self, mount: &MountPointId) -> Result<&MountOrchestrator, BridgeError> {
        self.mounts
            .get(mount)
            .ok_or_else(|| BridgeError::UnknownMountPoint(mount.clone()))
    }

    fn enqueue(&mut self, mount: &MountPointId) {
        if !self.pending.contains(mount) {
            self.pending.push_back(mount.clone());
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        if self.config.diagnostics_capacity == 0 {
            return;
        }
        if self.diagnostics.len() >= self.config.diagnostics_capacity {
            self.diagnostics.remove(0);
        }
        self.diagnostics.push(diagnostic);
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::{slot, AppContext, Element, HostTree, InjectionKey, OutputTree};
    use easel_render::SurfaceKind;

    const LABEL: InjectionKey<String> = InjectionKey::new("label");

    fn host() -> (HostTree, InstanceContext) {
        let mut host = HostTree::new();
        let root = host.mount_root(AppContext::new("app"), "App");
        host.provide(root, LABEL, "hello".to_string()).unwrap();
        let bridge = host.create_child(root, "SurfaceFrame").unwrap();
        let ctx = host.context(bridge).unwrap();
        (host, ctx)
    }

    fn paragraph() -> Slot {
        slot(|scope| {
            let label = scope.inject(LABEL).map(|l| l.as_ref().clone()).unwrap_or_default();
            vec![Element::new("p").child(VNode::text(label)).into()]
        })
    }

    fn runtime() -> BridgeRuntime<SurfaceTargetFactory, SceneRenderer> {
        BridgeRuntime::scene(OutputTree::shared(), BridgeConfig::default())
    }

    #[test]
    fn test_render_waits_for_settle() {
        let (_host, ctx) = host();
        let mut rt = runtime();
        let mount = rt.setup(BridgeProps::document("d1", 200.0, 300.0, 10.0), ctx, Some(paragraph()));

        assert_eq!(rt.commit(&mount).unwrap(), MountState::Scheduled);
        assert_eq!(rt.pending(), 1);
        assert_eq!(rt.renderer().passes(), 0);

        let result = rt.settle();
        assert_eq!(result.rendered, vec![mount.clone()]);
        assert_eq!(rt.state(&mount), Some(MountState::Rendered));

        let doc = rt.target(&mount).unwrap().as_document().unwrap();
        assert_eq!(doc.pages()[0].lines, vec!["hello".to_string()]);
        let src = rt.output().read().unwrap().attribute("d1", "src").cloned();
        assert_eq!(src, doc.source().map(|s| s.into()));
    }

    #[test]
    fn test_double_commit_queues_once() {
        let (_host, ctx) = host();
        let mut rt = runtime();
        let mount = rt.setup(BridgeProps::canvas("c1", 10.0, 10.0), ctx, None);

        rt.commit(&mount).unwrap();
        rt.committed(&mount).unwrap();
        assert_eq!(rt.pending(), 1);
        assert_eq!(rt.settle().rendered.len(), 1);
        assert_eq!(rt.renderer().passes(), 1);
    }

    #[test]
    fn test_committed_without_output_is_diagnosed() {
        let (_host, ctx) = host();
        let mut rt = runtime();
        let mount = rt.setup(BridgeProps::canvas("c1", 10.0, 10.0), ctx, None);

        assert_eq!(rt.committed(&mount).unwrap(), MountState::Mounted);
        assert_eq!(rt.diagnostics(), &[Diagnostic::MissingOutputNode { mount: mount.clone() }]);
        assert_eq!(rt.pending(), 0);
    }

    #[test]
    fn test_unknown_mount_point() {
        let mut rt = runtime();
        let missing = MountPointId::from("nope");
        assert!(matches!(rt.commit(&missing), Err(BridgeError::UnknownMountPoint(_))));
        assert!(matches!(rt.unmount(&missing), Err(BridgeError::UnknownMountPoint(_))));
    }

    #[test]
    fn test_unmount_drops_pending_render() {
        let (_host, ctx) = host();
        let mut rt = runtime();
        let mount = rt.setup(BridgeProps::canvas("c1", 10.0, 10.0), ctx, None);
        rt.commit(&mount).unwrap();

        let released = rt.unmount(&mount).unwrap();
        assert!(released.is_some());
        assert_eq!(rt.pending(), 0);
        assert!(rt.settle().is_empty());
        assert!(!rt.output().read().unwrap().contains("c1"));
        assert_eq!(rt.renderer().passes(), 0);
    }

    #[test]
    fn test_update_with_new_id_moves_bridge() {
        let (_host, ctx) = host();
        let mut rt = runtime();
        let old = rt.mount(BridgeProps::canvas("a", 10.0, 10.0), ctx, None).unwrap();

        let new = rt.update(&old, BridgeProps::canvas("b", 10.0, 10.0), None).unwrap();
        assert_eq!(new, MountPointId::from("b"));
        assert_eq!(rt.state(&old), None);
        assert_eq!(rt.state(&new), Some(MountState::Uninitialized));
        assert!(!rt.lifecycle().contains(&old));

        rt.commit(&new).unwrap();
        rt.settle();
        assert_eq!(rt.state(&new), Some(MountState::Rendered));
    }

    #[test]
    fn test_update_schedules_rerender() {
        let (_host, ctx) = host();
        let mut rt = runtime();
        let mount = rt.mount(BridgeProps::canvas("c1", 10.0, 10.0), ctx, None).unwrap();

        rt.update(&mount, BridgeProps::canvas("c1", 50.0, 50.0), None).unwrap();
        assert_eq!(rt.state(&mount), Some(MountState::Scheduled));
        rt.settle();

        assert_eq!(rt.lifecycle().stats().created, 1);
        assert_eq!(rt.lifecycle().stats().flushed, 1);
        assert_eq!(rt.renderer().passes(), 2);
    }

    #[test]
    fn test_reshape_skips_queued_render() {
        let (_host, ctx) = host();
        let mut rt = runtime();
        let mount = rt.setup(BridgeProps::canvas("m", 10.0, 10.0), ctx, None);
        rt.commit(&mount).unwrap();

        rt.update(&mount, BridgeProps::document("m", 10.0, 10.0, 0.0), None).unwrap();
        let result = rt.settle();
        assert_eq!(result.skipped, 1);
        assert!(result.rendered.is_empty());
        assert_eq!(rt.state(&mount), Some(MountState::Uninitialized));
    }

    #[test]
    fn test_diagnostics_are_capped() {
        let (_host, ctx) = host();
        let config = BridgeConfig { diagnostics_capacity: 2, ..BridgeConfig::default() };
        let mut rt = BridgeRuntime::scene(OutputTree::shared(), config);
        let mount = rt.setup(
            BridgeProps::new(SurfaceKind::parse("svg"), "u", 1.0, 1.0, 0.0),
            ctx,
            None,
        );

        for _ in 0..5 {
            rt.commit(&mount).unwrap();
        }
        assert_eq!(rt.diagnostics().len(), 2);
        assert_eq!(rt.take_diagnostics().len(), 2);
        assert!(rt.diagnostics().is_empty());
    }
}
