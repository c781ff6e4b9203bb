//! Raw block-device records supplied by the external storage daemon.
//!
//! A record is immutable between change notifications: a "changed" event
//! replaces the whole record, there is no partial mutation. Records link to
//! each other by [`DeviceId`] only; a link that does not resolve makes the
//! referencing record an orphan for the current pass, never an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Daemon object identifier for a raw device record (e.g. `/block/sda1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// Virtual grouping category a drive can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HubCategory {
    /// Multipath path aggregation.
    Multipath,
    /// Multi-disk aggregates (MD RAID, LVM).
    RaidLvm,
    /// Plain peripheral attachment; also the fallback for unresolvable ports.
    Peripheral,
}

impl fmt::Display for HubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            HubCategory::Multipath => "multipath",
            HubCategory::RaidLvm => "raid-lvm",
            HubCategory::Peripheral => "peripheral",
        };
        f.write_str(tag)
    }
}

/// Partitioning scheme advertised by a partition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionScheme {
    Mbr,
    Gpt,
}

/// MBR type codes that mark an extended partition.
pub const MBR_EXTENDED_TYPES: [u32; 3] = [0x05, 0x0f, 0x85];

/// First partition number the MBR scheme reserves for logical partitions.
pub const MBR_FIRST_LOGICAL_NUMBER: u32 = 5;

/// A physical (or aggregate) drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveAttrs {
    pub vendor: String,
    pub model: String,

    /// Total capacity in bytes.
    pub size: u64,

    /// Whether media is currently inserted (always true for fixed disks).
    pub media_available: bool,

    /// Whether this drive is one path of a multipath device.
    pub multipath_path: bool,

    /// Upstream port record, when the daemon reports one.
    pub port: Option<DeviceId>,
}

/// An adapter/expander/port record, reduced to the hub category it
/// aggregates drives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAttrs {
    pub category: HubCategory,
}

/// A partition table living on a drive-like block device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTableAttrs {
    pub drive: DeviceId,
    pub scheme: PartitionScheme,
}

/// A single partition entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionAttrs {
    /// The partition-table record this entry belongs to.
    pub table: DeviceId,

    /// Partition number within the table (1-based).
    pub number: u32,

    /// Scheme-specific type code (e.g. 0x05 for an MBR extended partition).
    pub type_code: u32,

    /// Offset from the start of the drive in bytes.
    pub offset: u64,

    /// Size in bytes.
    pub size: u64,
}

impl PartitionAttrs {
    /// Whether this is an MBR extended partition under the given scheme.
    pub fn is_extended(&self, scheme: PartitionScheme) -> bool {
        scheme == PartitionScheme::Mbr && MBR_EXTENDED_TYPES.contains(&self.type_code)
    }

    /// Whether this is an MBR logical partition under the given scheme.
    pub fn is_logical(&self, scheme: PartitionScheme) -> bool {
        scheme == PartitionScheme::Mbr && self.number >= MBR_FIRST_LOGICAL_NUMBER
    }

    /// End offset in bytes (exclusive).
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// A running MD RAID array block device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidArrayAttrs {
    pub uuid: Uuid,
    pub name: String,
    pub level: String,
    pub size: u64,
}

/// A block device carrying MD RAID member metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidComponentAttrs {
    pub array_uuid: Uuid,
    pub size: u64,
}

/// An LVM physical volume, carrying its group's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LvmPvAttrs {
    pub vg_uuid: Uuid,
    pub vg_name: String,

    /// Total group size in bytes.
    pub vg_size: u64,

    /// Unallocated group space in bytes.
    pub vg_free: u64,

    /// Semicolon-delimited logical-volume descriptor blob; one entry per LV
    /// with space-separated `name=`/`uuid=`/`size=` fields.
    pub lv_descriptors: String,
}

/// The cleartext view of an unlocked encrypted container.
///
/// The encrypted payload itself is not a distinct record kind: `backing`
/// points at whichever block (partition or whole disk) holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuksCleartextAttrs {
    pub backing: DeviceId,
    pub size: u64,
}

/// Kind classification plus the kind-specific payload of a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    Drive(DriveAttrs),
    Port(PortAttrs),
    PartitionTable(PartitionTableAttrs),
    Partition(PartitionAttrs),
    RaidArray(RaidArrayAttrs),
    RaidComponent(RaidComponentAttrs),
    LvmPhysicalVolume(LvmPvAttrs),
    LuksCleartext(LuksCleartextAttrs),
}

/// A raw device record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
}

impl Device {
    pub fn new(id: impl Into<DeviceId>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Whether this record can carry a partition table and volumes.
    pub fn is_drive_like(&self) -> bool {
        matches!(self.kind, DeviceKind::Drive(_) | DeviceKind::RaidArray(_))
    }

    /// Capacity in bytes, zero for records without one (ports, tables).
    pub fn size(&self) -> u64 {
        match &self.kind {
            DeviceKind::Drive(attrs) => attrs.size,
            DeviceKind::Partition(attrs) => attrs.size,
            DeviceKind::RaidArray(attrs) => attrs.size,
            DeviceKind::RaidComponent(attrs) => attrs.size,
            DeviceKind::LvmPhysicalVolume(attrs) => attrs.vg_size,
            DeviceKind::LuksCleartext(attrs) => attrs.size,
            DeviceKind::Port(_) | DeviceKind::PartitionTable(_) => 0,
        }
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}
