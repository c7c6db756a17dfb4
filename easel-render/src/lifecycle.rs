//! Target lifecycle: at most one live target per mount point.
//!
//! ```text
//!  obtain(mp, desc)
//!     │
//!     ├─ no slot ──────────────▶ factory.create ──▶ Live
//!     ├─ Live, same kind ──────▶ flush, reuse
//!     ├─ Live, other kind ─────▶ destroy ──▶ factory.create
//!     └─ Unsupported ──────────▶ UnrecognizedSurfaceType (factory not called)
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::descriptor::SurfaceDescriptor;
use crate::factory::{TargetError, TargetFactory};
use crate::target::RenderTarget;

/// Identity of one bridge mount point: the id of its embedding output node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountPointId(String);

impl MountPointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MountPointId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for MountPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
enum TargetSlot {
    Live(RenderTarget),
    /// The descriptor named a kind the factory rejected; remembered so later
    /// mounts of the same point do not retry.
    Unsupported(String),
}

/// Counters over the lifetime of a lifecycle manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LifecycleStats {
    pub created: u64,
    pub flushed: u64,
    pub destroyed: u64,
}

enum Plan {
    Reuse,
    Create,
    Replace,
    Reject(String),
}

/// Owns every render target, keyed by mount point.
pub struct TargetLifecycle<F> {
    factory: F,
    slots: HashMap<MountPointId, TargetSlot>,
    stats: LifecycleStats,
}

impl<F: TargetFactory> TargetLifecycle<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            slots: HashMap::new(),
            stats: LifecycleStats::default(),
        }
    }

    /// Target for `mount`: created on first call, flushed and reused after.
    pub fn obtain(
        &mut self,
        mount: &MountPointId,
        descriptor: &SurfaceDescriptor,
    ) -> Result<&mut RenderTarget, TargetError> {
        let plan = match self.slots.get(mount) {
            None => Plan::Create,
            Some(TargetSlot::Live(target)) if target.kind() == descriptor.kind => Plan::Reuse,
            Some(TargetSlot::Live(_)) => Plan::Replace,
            Some(TargetSlot::Unsupported(tag)) if !descriptor.kind.is_recognized() => {
                Plan::Reject(tag.clone())
            }
            Some(TargetSlot::Unsupported(_)) => Plan::Create,
        };

        let slot = match plan {
            Plan::Reject(tag) => return Err(TargetError::UnrecognizedSurfaceType(tag)),
            Plan::Reuse => {
                self.stats.flushed += 1;
                log::debug!("Flushing target for mount point '{mount}'");
                self.slots.get_mut(mount).map(|slot| {
                    if let TargetSlot::Live(target) = slot {
                        target.flush();
                    }
                    slot
                })
            }
            Plan::Replace => {
                self.destroy(mount);
                Some(self.install(mount, descriptor)?)
            }
            Plan::Create => Some(self.install(mount, descriptor)?),
        };

        match slot {
            Some(TargetSlot::Live(target)) => Ok(target),
            _ => Err(TargetError::NoLiveTarget(mount.to_string())),
        }
    }

    fn install(
        &mut self,
        mount: &MountPointId,
        descriptor: &SurfaceDescriptor,
    ) -> Result<&mut TargetSlot, TargetError> {
        let target = self.construct(mount, descriptor)?;
        Ok(match self.slots.entry(mount.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(TargetSlot::Live(target));
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(TargetSlot::Live(target)),
        })
    }

    fn construct(
        &mut self,
        mount: &MountPointId,
        descriptor: &SurfaceDescriptor,
    ) -> Result<RenderTarget, TargetError> {
        match self.factory.create(descriptor) {
            Ok(target) => {
                self.stats.created += 1;
                log::debug!("Created {} target {} for '{mount}'", target.kind(), target.id());
                Ok(target)
            }
            Err(TargetError::UnrecognizedSurfaceType(tag)) => {
                self.slots
                    .insert(mount.clone(), TargetSlot::Unsupported(tag.clone()));
                Err(TargetError::UnrecognizedSurfaceType(tag))
            }
            Err(e) => {
                self.slots.remove(mount);
                Err(e)
            }
        }
    }

    fn destroy(&mut self, mount: &MountPointId) {
        if let Some(TargetSlot::Live(target)) = self.slots.remove(mount) {
            self.stats.destroyed += 1;
            log::info!(
                "Destroying {} target {} for '{mount}' (surface type changed)",
                target.kind(),
                target.id()
            );
        }
    }

    /// Tear down `mount`, handing back its target if one was live.
    pub fn release(&mut self, mount: &MountPointId) -> Option<RenderTarget> {
        match self.slots.remove(mount)? {
            TargetSlot::Live(target) => {
                self.stats.destroyed += 1;
                log::debug!("Released target {} for '{mount}'", target.id());
                Some(target)
            }
            TargetSlot::Unsupported(_) => None,
        }
    }

    pub fn target(&self, mount: &MountPointId) -> Option<&RenderTarget> {
        match self.slots.get(mount)? {
            TargetSlot::Live(target) => Some(target),
            TargetSlot::Unsupported(_) => None,
        }
    }

    pub fn target_mut(&mut self, mount: &MountPointId) -> Option<&mut RenderTarget> {
        match self.slots.get_mut(mount)? {
            TargetSlot::Live(target) => Some(target),
            TargetSlot::Unsupported(_) => None,
        }
    }

    /// Whether `mount` is known, live or marked unsupported.
    pub fn contains(&self, mount: &MountPointId) -> bool {
        self.slots.contains_key(mount)
    }

    /// Number of live targets.
    pub fn live_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, TargetSlot::Live(_)))
            .count()
    }

    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

// ===================================================================
// Tests
// ===================================================================
