// SPDX-License-Identifier: GPL-3.0-only

//! Long-lived engine facade.
//!
//! The pool owns the device registry and the retained presentable set. It
//! runs entirely on the thread that dispatches upstream notifications: each
//! one triggers a single, synchronous, full recompute (sort → synthesize →
//! reconcile) and fans the resulting events out to subscribers. There is no
//! incremental patching and no reentrancy.

use std::rc::Rc;

use futures::stream::Stream;
use futures::task::{Context, Poll};
use presenter_types::{Device, DeviceEvent, DeviceId, PoolEvent, Presentable, PresentableId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::reconcile::{self, RetainedSet};
use crate::registry::DeviceRegistry;
use crate::{synth, topo};

/// Default ceiling for the topological sorter's recursion guard. Real
/// stacks (LVM on RAID on LUKS) stay far below this; anything approaching
/// it is a cyclic device feed.
pub const DEFAULT_MAX_SORT_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Recursion ceiling of the dependency sorter; tripping it aborts the
    /// recompute instead of hanging.
    pub max_sort_depth: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_sort_depth: DEFAULT_MAX_SORT_DEPTH,
        }
    }
}

/// Subscriber handle delivering pool events in emission order.
pub struct PoolEventStream {
    receiver: mpsc::UnboundedReceiver<PoolEvent>,
}

impl PoolEventStream {
    /// Non-blocking read; `None` when no event is pending.
    pub fn try_next_event(&mut self) -> Option<PoolEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drain everything currently pending.
    pub fn drain(&mut self) -> Vec<PoolEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Stream for PoolEventStream {
    type Item = PoolEvent;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

pub struct Pool {
    config: PoolConfig,
    registry: DeviceRegistry,
    retained: RetainedSet,
    subscribers: Vec<mpsc::UnboundedSender<PoolEvent>>,
}

impl Pool {
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            config,
            registry: DeviceRegistry::new(),
            retained: RetainedSet::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> PoolEventStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        PoolEventStream { receiver }
    }

    /// Apply one upstream notification and recompute the presentable set.
    ///
    /// A `Changed` record additionally forwards `PoolEvent::Changed` for
    /// every surviving presentable backed by that device; identity and
    /// topology are re-derived by the recompute like for any other event.
    pub fn apply(&mut self, event: DeviceEvent) -> Result<()> {
        let changed = match event {
            DeviceEvent::Added(device) => {
                self.registry.upsert(device);
                None
            }
            DeviceEvent::Changed(device) => {
                let id = device.id.clone();
                self.registry.upsert(device);
                Some(id)
            }
            DeviceEvent::Removed(id) => {
                if self.registry.remove(&id).is_none() {
                    warn!("Remove notification for unknown device {id}");
                }
                None
            }
        };

        self.recompute()?;

        if let Some(device_id) = changed {
            let affected: Vec<Presentable> = self
                .retained
                .iter()
                .filter(|p| p.device.as_ref() == Some(&device_id))
                .map(|p| (*p).clone())
                .collect();
            for presentable in affected {
                broadcast(&mut self.subscribers, PoolEvent::Changed(presentable));
            }
        }

        Ok(())
    }

    /// Full recompute over the entire current device set; never incremental.
    fn recompute(&mut self) -> Result<()> {
        let sorted = topo::sorted_devices(&self.registry, self.config.max_sort_depth)?;
        let fresh = synth::synthesize(&sorted, &self.registry);
        debug!(
            "Recompute: {} devices -> {} presentables",
            sorted.len(),
            fresh.len()
        );

        let subscribers = &mut self.subscribers;
        reconcile::reconcile(&mut self.retained, fresh, |event| {
            broadcast(subscribers, event);
        })?;
        Ok(())
    }

    /// All retained presentables, in the order they were added.
    pub fn presentables(&self) -> Vec<Rc<Presentable>> {
        self.retained.iter().collect()
    }

    /// Identifier-keyed lookup into retained state. Resolving a
    /// presentable's `enclosed_by` through this always yields the retained
    /// instance.
    pub fn lookup(&self, id: &PresentableId) -> Option<Rc<Presentable>> {
        self.retained.get(id)
    }

    /// Raw-attribute read access for consumers following a `Changed` event.
    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

fn broadcast(subscribers: &mut Vec<mpsc::UnboundedSender<PoolEvent>>, event: PoolEvent) {
    // Closed receivers are pruned on the way.
    subscribers.retain(|sender| sender.send(event.clone()).is_ok());
}

#[cfg(test)]
mod tests {
    use super::*;
    use presenter_types::{DeviceKind, DriveAttrs, PresentableKind};

    fn drive(id: &str, size: u64) -> Device {
        Device::new(
            id,
            DeviceKind::Drive(DriveAttrs {
                vendor: String::new(),
                model: String::new(),
                size,
                media_available: true,
                multipath_path: false,
                port: None,
            }),
        )
    }

    #[test]
    fn first_event_populates_root_hub_drive_and_volume() {
        let mut pool = Pool::new();
        let mut events = pool.subscribe();

        pool.apply(DeviceEvent::Added(drive("/block/sda", 1 << 30)))
            .expect("apply");

        let received = events.drain();
        assert_eq!(received.len(), 4);
        assert!(matches!(&received[0], PoolEvent::Added(p) if p.is_root()));
        assert!(
            received
                .iter()
                .all(|e| matches!(e, PoolEvent::Added(_)))
        );
        assert_eq!(pool.presentables().len(), 4);
    }

    #[test]
    fn changed_device_forwards_without_churn() {
        let mut pool = Pool::new();
        pool.apply(DeviceEvent::Added(drive("/block/sda", 1 << 30)))
            .expect("seed");
        let mut events = pool.subscribe();

        pool.apply(DeviceEvent::Changed(drive("/block/sda", 2 << 30)))
            .expect("change");

        let received = events.drain();
        // The drive presentable and its whole-disk volume are both backed by
        // the changed device; nothing is added or removed.
        assert_eq!(received.len(), 2);
        assert!(
            received
                .iter()
                .all(|e| matches!(e, PoolEvent::Changed(_)))
        );
    }

    #[test]
    fn lookup_resolves_enclosure_to_retained_instances() {
        let mut pool = Pool::new();
        pool.apply(DeviceEvent::Added(drive("/block/sda", 1 << 30)))
            .expect("apply");

        let drive_id = PresentableId::drive(&"/block/sda".into());
        let drive = pool.lookup(&drive_id).expect("drive");
        let hub = pool
            .lookup(drive.enclosed_by.as_ref().expect("parent"))
            .expect("hub");
        assert!(matches!(hub.kind, PresentableKind::Hub(_)));
    }

    #[test]
    fn config_roundtrips_through_serde() {
        let config = PoolConfig { max_sort_depth: 42 };
        let json = serde_json::to_string(&config).expect("serialize config");
        let parsed: PoolConfig = serde_json::from_str(&json).expect("deserialize config");
        assert_eq!(parsed, config);
    }

    #[test]
    fn remove_for_unknown_device_is_harmless() {
        let mut pool = Pool::new();
        pool.apply(DeviceEvent::Removed("/block/nope".into()))
            .expect("apply");
        // Only the machine root exists.
        assert_eq!(pool.presentables().len(), 1);
    }
}
