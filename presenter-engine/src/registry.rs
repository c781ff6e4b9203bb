// SPDX-License-Identifier: GPL-3.0-only

//! Keyed store of raw device records.
//!
//! The registry applies upstream add/remove/change events and hands the
//! current record set to the recompute pipeline. It makes no ordering
//! guarantees and does not validate cross-references; a record whose link
//! does not resolve is treated as orphaned by the consuming pass.

use std::collections::HashMap;

use presenter_types::{Device, DeviceId};

#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: HashMap<DeviceId, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record wholesale; returns the replaced record.
    pub fn upsert(&mut self, device: Device) -> Option<Device> {
        self.devices.insert(device.id.clone(), device)
    }

    pub fn remove(&mut self, id: &DeviceId) -> Option<Device> {
        self.devices.remove(id)
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn contains(&self, id: &DeviceId) -> bool {
        self.devices.contains_key(id)
    }

    /// All records, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
