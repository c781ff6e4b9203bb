// SPDX-License-Identifier: GPL-3.0-only

//! Dependency ordering of raw device records.
//!
//! Every dependency precedes its dependents: table before partition, MBR
//! extended partition before its logical partitions, encrypted backing
//! before the cleartext view. MD RAID is deliberately inverted — a running
//! array precedes its member devices, so the array's identity exists before
//! each member is wrapped.
//!
//! Records whose required link does not resolve are dropped from the pass
//! with a warning and picked up again once the missing record appears. A
//! recursion ceiling guards against dependency cycles; tripping it is a
//! data-integrity fault, not a normal error path.

use std::collections::{BTreeMap, HashMap, HashSet};

use presenter_types::{Device, DeviceId, DeviceKind};
use tracing::warn;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::registry::DeviceRegistry;

/// Order the registry's records so that every dependency precedes its
/// dependents. The output contains each non-orphaned record exactly once.
pub fn sorted_devices(registry: &DeviceRegistry, max_depth: usize) -> Result<Vec<&Device>> {
    let admitted = admitted_for_pass(registry);

    let mut extended_by_table: HashMap<&DeviceId, &DeviceId> = HashMap::new();
    let mut array_by_uuid: HashMap<Uuid, &DeviceId> = HashMap::new();
    for &device in admitted.values() {
        match &device.kind {
            DeviceKind::Partition(p) => {
                if let Some(&table) = admitted.get(&p.table)
                    && let DeviceKind::PartitionTable(t) = &table.kind
                    && p.is_extended(t.scheme)
                {
                    extended_by_table.entry(&p.table).or_insert(&device.id);
                }
            }
            DeviceKind::RaidArray(a) => {
                array_by_uuid.entry(a.uuid).or_insert(&device.id);
            }
            _ => {}
        }
    }

    let input = admitted.len();
    let mut ctx = SortCtx {
        admitted: &admitted,
        extended_by_table,
        array_by_uuid,
        placed: HashSet::new(),
        order: Vec::with_capacity(input),
        max_depth,
    };

    let ids: Vec<&DeviceId> = admitted.keys().copied().collect();
    for id in ids {
        ctx.visit(id, 0)?;
    }

    if ctx.order.len() != input {
        return Err(EngineError::SortCountMismatch {
            input,
            output: ctx.order.len(),
        });
    }

    Ok(ctx.order)
}

/// Drop records whose required link is absent, transitively, and return the
/// remainder keyed for deterministic iteration.
fn admitted_for_pass(registry: &DeviceRegistry) -> BTreeMap<&DeviceId, &Device> {
    let mut admitted: BTreeMap<&DeviceId, &Device> =
        registry.all().map(|device| (&device.id, device)).collect();

    loop {
        let mut dropped: Vec<&DeviceId> = Vec::new();
        for (&id, device) in &admitted {
            if let Some(dep) = required_dependency(device)
                && !admitted.contains_key(dep)
            {
                warn!("Skipping {id} for this pass: dependency {dep} is not registered");
                dropped.push(id);
            }
        }
        if dropped.is_empty() {
            break;
        }
        for id in dropped {
            admitted.remove(id);
        }
    }

    admitted
}

/// The link that must resolve for the record to take part in a pass.
fn required_dependency(device: &Device) -> Option<&DeviceId> {
    match &device.kind {
        DeviceKind::Partition(p) => Some(&p.table),
        DeviceKind::PartitionTable(t) => Some(&t.drive),
        DeviceKind::LuksCleartext(c) => Some(&c.backing),
        _ => None,
    }
}

struct SortCtx<'a, 'b> {
    admitted: &'b BTreeMap<&'a DeviceId, &'a Device>,
    extended_by_table: HashMap<&'a DeviceId, &'a DeviceId>,
    array_by_uuid: HashMap<Uuid, &'a DeviceId>,
    placed: HashSet<&'a DeviceId>,
    order: Vec<&'a Device>,
    max_depth: usize,
}

impl<'a, 'b> SortCtx<'a, 'b> {
    fn visit(&mut self, id: &'a DeviceId, depth: usize) -> Result<()> {
        if self.placed.contains(id) {
            return Ok(());
        }
        if depth > self.max_depth {
            return Err(EngineError::DependencyCycle {
                device: id.clone(),
                limit: self.max_depth,
            });
        }
        let Some(&device) = self.admitted.get(id) else {
            return Ok(());
        };

        for dep in self.dependencies_of(device) {
            if self.admitted.contains_key(dep) {
                self.visit(dep, depth + 1)?;
            }
        }

        self.placed.insert(id);
        self.order.push(device);
        Ok(())
    }

    fn dependencies_of(&self, device: &'a Device) -> Vec<&'a DeviceId> {
        match &device.kind {
            DeviceKind::Partition(p) => {
                let mut deps = vec![&p.table];
                if let Some(&table) = self.admitted.get(&p.table)
                    && let DeviceKind::PartitionTable(t) = &table.kind
                    && p.is_logical(t.scheme)
                    && let Some(&extended) = self.extended_by_table.get(&p.table)
                {
                    deps.push(extended);
                }
                deps
            }
            DeviceKind::PartitionTable(t) => vec![&t.drive],
            DeviceKind::LuksCleartext(c) => vec![&c.backing],
            // Inverted rule: the aggregate precedes its parts.
            DeviceKind::RaidComponent(rc) => self
                .array_by_uuid
                .get(&rc.array_uuid)
                .map(|&array| vec![array])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}
