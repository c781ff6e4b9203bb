// SPDX-License-Identifier: GPL-3.0-only

//! Generation diffing against the retained presentable set.
//!
//! The freshly synthesized set is a disposable snapshot. Entries whose
//! identifier already exists in the retained set are dropped in favour of
//! the retained instance; everything else is an addition, and retained
//! entries with no fresh counterpart are removals. Removals are emitted
//! children before parents so a listener never observes a dangling
//! reference; additions are emitted parents before children, after their
//! enclosing reference has been resolved against retained state.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use presenter_types::{PoolEvent, Presentable, PresentableId};

use crate::error::{EngineError, Result};

/// The long-lived presentable set, indexed by identifier.
///
/// Instances are shared (`Rc`); looking up an identifier always returns the
/// retained instance, never a fresh-batch duplicate.
#[derive(Debug, Default)]
pub struct RetainedSet {
    by_id: HashMap<PresentableId, Rc<Presentable>>,
    order: Vec<PresentableId>,
}

impl RetainedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &PresentableId) -> Option<Rc<Presentable>> {
        self.by_id.get(id).cloned()
    }

    pub fn contains(&self, id: &PresentableId) -> bool {
        self.by_id.contains_key(id)
    }

    /// All retained presentables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Rc<Presentable>> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn insert(&mut self, presentable: Rc<Presentable>) {
        self.order.push(presentable.id.clone());
        self.by_id.insert(presentable.id.clone(), presentable);
    }

    fn remove(&mut self, id: &PresentableId) -> Option<Rc<Presentable>> {
        self.order.retain(|entry| entry != id);
        self.by_id.remove(id)
    }
}

/// What one reconciliation pass surfaced to listeners.
#[derive(Debug, Default)]
pub struct Delta {
    pub added: Vec<Rc<Presentable>>,
    pub removed: Vec<Rc<Presentable>>,
}

/// Diff `fresh` against the retained set, apply the delta and emit events.
/// Removal events are emitted before addition events.
pub fn reconcile(
    retained: &mut RetainedSet,
    fresh: Vec<Presentable>,
    mut emit: impl FnMut(PoolEvent),
) -> Result<Delta> {
    let mut old_ids: Vec<PresentableId> = retained.by_id.keys().cloned().collect();
    old_ids.sort();
    let mut new_ids: Vec<(&PresentableId, usize)> =
        fresh.iter().enumerate().map(|(i, p)| (&p.id, i)).collect();
    new_ids.sort();

    // Classic sorted-list merge diff.
    let mut removed_ids: Vec<PresentableId> = Vec::new();
    let mut added_indices: HashSet<usize> = HashSet::new();
    let (mut i, mut j) = (0, 0);
    while i < old_ids.len() && j < new_ids.len() {
        match old_ids[i].cmp(new_ids[j].0) {
            std::cmp::Ordering::Less => {
                removed_ids.push(old_ids[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                added_indices.insert(new_ids[j].1);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    removed_ids.extend(old_ids[i..].iter().cloned());
    added_indices.extend(new_ids[j..].iter().map(|(_, idx)| idx));

    // Remove deepest first: children must go before their parents. Depths
    // are taken against the previous generation, before anything is dropped.
    let depths: HashMap<PresentableId, usize> = removed_ids
        .iter()
        .map(|id| (id.clone(), enclosure_depth(&retained.by_id, id)))
        .collect();
    removed_ids.sort_by(|a, b| depths[b].cmp(&depths[a]).then_with(|| a.cmp(b)));

    let mut delta = Delta::default();
    for id in removed_ids {
        if let Some(presentable) = retained.remove(&id) {
            emit(PoolEvent::Removed((*presentable).clone()));
            delta.removed.push(presentable);
        }
    }

    // Add in forward dependency order, which is the synthesizer's
    // construction order. Each entry's enclosing reference is rewritten to
    // the retained instance's identifier before it becomes visible; parents
    // added earlier in this batch are already retained at that point.
    for (index, mut presentable) in fresh.into_iter().enumerate() {
        if !added_indices.contains(&index) {
            continue;
        }
        if let Some(parent_id) = presentable.enclosed_by.take() {
            match retained.by_id.get_key_value(&parent_id) {
                Some((retained_id, _)) => presentable.enclosed_by = Some(retained_id.clone()),
                None => {
                    return Err(EngineError::DanglingEnclosure {
                        child: presentable.id,
                        parent: parent_id,
                    });
                }
            }
        }
        let presentable = Rc::new(presentable);
        retained.insert(presentable.clone());
        emit(PoolEvent::Added((*presentable).clone()));
        delta.added.push(presentable);
    }

    Ok(delta)
}

fn enclosure_depth(set: &HashMap<PresentableId, Rc<Presentable>>, id: &PresentableId) -> usize {
    let mut depth = 0;
    let mut cursor = set.get(id).and_then(|p| p.enclosed_by.clone());
    while let Some(parent) = cursor {
        depth += 1;
        // A reference loop cannot walk past the set size.
        if depth > set.len() {
            break;
        }
        cursor = set.get(&parent).and_then(|p| p.enclosed_by.clone());
    }
    depth
}
