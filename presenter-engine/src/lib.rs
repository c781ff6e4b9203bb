// SPDX-License-Identifier: GPL-3.0-only

//! Presentable reconciliation engine.
//!
//! Turns the flat record feed of an external block-device daemon into a
//! live, hierarchical read model: drives, volumes, free-space holes, RAID
//! arrays (running or not), LVM groups/volumes and virtual grouping hubs.
//!
//! The engine is a pure, synchronous transform driven by the host event
//! loop. Every upstream notification triggers one full recompute of the
//! presentable set — never an incremental patch — and the [`Pool`] diffs the
//! fresh set against its retained state to emit minimal, dependency-ordered
//! add/remove events while unchanged entries keep their original instances.

// Error types
pub mod error;

// Engine stages, in pipeline order
pub mod gaps;
pub mod lvm;
pub mod pool;
pub mod reconcile;
pub mod registry;
pub mod synth;
pub mod topo;

// Re-export presenter-types models (canonical domain models)
pub use presenter_types;
pub use presenter_types::{Device, DeviceEvent, DeviceId, PoolEvent, Presentable, PresentableId};

pub use error::{EngineError, Result};
pub use gaps::{GAP_MIN_FRACTION_DENOM, Gap, Region, RegionMode, gaps_in_region};
pub use lvm::{LvDescriptor, parse_lv_descriptors};
pub use pool::{Pool, PoolConfig, PoolEventStream};
pub use reconcile::{Delta, RetainedSet, reconcile};
pub use registry::DeviceRegistry;
pub use synth::{LVM_HOLE_FLOOR_BYTES, synthesize};
pub use topo::sorted_devices;
