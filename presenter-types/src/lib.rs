//! Canonical domain models for the storage presentable engine
//!
//! This crate defines the data types shared between the engine and its
//! consumers:
//!
//! - **Raw side**: `Device` records as supplied by the external block-device
//!   daemon, replaced wholesale on every change notification.
//! - **Synthesized side**: `Presentable` records the engine derives from the
//!   raw feed — drives, volumes, free-space holes, RAID/LVM aggregates and
//!   virtual grouping hubs.
//! - **Events**: the upstream `DeviceEvent` feed and the downstream
//!   `PoolEvent` streams.
//!
//! Presentables reference each other by identifier only (`PresentableId`),
//! never by pointer; the engine resolves those identifiers against its
//! retained set.

pub mod device;
pub mod event;
pub mod presentable;

pub use device::{
    Device, DeviceId, DeviceKind, DriveAttrs, HubCategory, LuksCleartextAttrs, LvmPvAttrs,
    MBR_EXTENDED_TYPES, MBR_FIRST_LOGICAL_NUMBER, PartitionAttrs, PartitionScheme,
    PartitionTableAttrs, PortAttrs, RaidArrayAttrs, RaidComponentAttrs,
};
pub use event::{DeviceEvent, PoolEvent};
pub use presentable::{Presentable, PresentableId, PresentableKind};
