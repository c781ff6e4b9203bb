//! Synthesized, user-facing storage entities.
//!
//! A presentable is rebuilt from scratch on every recompute pass. Its
//! identifier — not the allocation — is its identity: two presentables with
//! equal identifiers across generations are the same logical entity, and the
//! reconciler keeps the older instance. `enclosed_by` is an identifier
//! back-reference resolved against the engine's retained set, never an
//! ownership edge.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::{DeviceId, HubCategory};

/// Stable identifier of a presentable; the equality and sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PresentableId(String);

impl PresentableId {
    /// The machine root, shared by every generation.
    pub fn machine() -> Self {
        Self("machine".to_string())
    }

    pub fn hub(category: HubCategory) -> Self {
        Self(format!("hub:{category}"))
    }

    pub fn drive(device: &DeviceId) -> Self {
        Self(format!("drive:{device}"))
    }

    /// Drive-like presentable for an MD RAID array, running or not; keyed by
    /// the array UUID so the placeholder and the assembled array share
    /// identity.
    pub fn md_drive(uuid: &Uuid) -> Self {
        Self(format!("md-drive:{uuid}"))
    }

    pub fn volume(device: &DeviceId, enclosing: &PresentableId) -> Self {
        Self(format!("volume:{device}@{enclosing}"))
    }

    pub fn volume_hole(offset: u64, enclosing: &PresentableId) -> Self {
        Self(format!("hole:{offset}@{enclosing}"))
    }

    pub fn lvm_volume_group(uuid: &Uuid) -> Self {
        Self(format!("lvm-vg:{uuid}"))
    }

    pub fn lvm_volume(uuid: &Uuid, enclosing: &PresentableId) -> Self {
        Self(format!("lvm-lv:{uuid}@{enclosing}"))
    }

    pub fn lvm_volume_hole(enclosing: &PresentableId) -> Self {
        Self(format!("lvm-hole@{enclosing}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PresentableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Variant tag plus variant-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentableKind {
    /// Root of the whole topology; exactly one per generation.
    Machine,

    /// Virtual grouping node with no device backing.
    Hub(HubCategory),

    /// A physical drive.
    Drive,

    /// An MD RAID array, either running (`assembled`) or synthesized from
    /// member metadata before assembly.
    LinuxMdDrive { uuid: Uuid, assembled: bool },

    /// A partition, whole-disk filesystem, or unlocked cleartext view.
    Volume,

    /// Unallocated space inside a partitioned drive or extended partition.
    VolumeHole,

    /// An LVM2 volume group, discovered through any one of its PVs.
    LinuxLvm2VolumeGroup { uuid: Uuid, name: String },

    /// An LVM2 logical volume.
    LinuxLvm2Volume { uuid: Uuid, name: String },

    /// Unallocated space inside a volume group.
    LinuxLvm2VolumeHole,
}

/// A synthesized storage entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentable {
    pub id: PresentableId,
    pub kind: PresentableKind,

    /// Backing device; absent for virtual objects (hubs, holes, groups,
    /// not-yet-assembled arrays).
    pub device: Option<DeviceId>,

    /// Identifier of the enclosing presentable; `None` only for the root.
    pub enclosed_by: Option<PresentableId>,

    /// Offset in bytes within the enclosing object, where meaningful.
    pub offset: u64,

    /// Size in bytes at synthesis time.
    pub size: u64,
}

impl Presentable {
    pub fn is_root(&self) -> bool {
        matches!(self.kind, PresentableKind::Machine)
    }
}
