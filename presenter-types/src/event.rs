//! Change notifications: the upstream device feed and the downstream
//! presentable streams.

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceId};
use crate::presentable::Presentable;

/// Upstream notification from the storage daemon.
///
/// `Changed` replaces the record wholesale; there is no partial mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceEvent {
    Added(Device),
    Changed(Device),
    Removed(DeviceId),
}

/// Downstream notification about a presentable.
///
/// Within one recompute, every `Removed` precedes every `Added`; removals are
/// ordered children before parents and additions parents before children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    Added(Presentable),
    Removed(Presentable),
    Changed(Presentable),
}

impl PoolEvent {
    pub fn presentable(&self) -> &Presentable {
        match self {
            PoolEvent::Added(p) | PoolEvent::Removed(p) | PoolEvent::Changed(p) => p,
        }
    }
}
