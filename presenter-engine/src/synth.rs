// SPDX-License-Identifier: GPL-3.0-only

//! The presentable synthesizer.
//!
//! One forward pass over the topologically sorted device list produces the
//! complete presentable set for a generation: the machine root, lazily
//! created grouping hubs, drives and MD RAID drives (running or synthesized
//! from member metadata), volumes, LVM groups/volumes, and — in a post-pass
//! step per partitioned drive — unallocated-space holes.
//!
//! All lookup tables are pass-scoped and discarded afterwards; the output is
//! in forward dependency order by construction.

use std::collections::HashMap;

use presenter_types::{
    Device, DeviceId, DeviceKind, DriveAttrs, HubCategory, LuksCleartextAttrs, LvmPvAttrs,
    PartitionAttrs, Presentable, PresentableId, PresentableKind, RaidArrayAttrs,
    RaidComponentAttrs,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gaps::{self, Region, RegionMode};
use crate::lvm;
use crate::registry::DeviceRegistry;

/// Volume-group free space below this floor is allocation slack, not a
/// presentable hole.
pub const LVM_HOLE_FLOOR_BYTES: u64 = 1024 * 1024;

/// Produce the full presentable set for the current generation. `sorted`
/// must come from [`crate::topo::sorted_devices`] over the same registry.
pub fn synthesize<'a>(sorted: &[&'a Device], registry: &'a DeviceRegistry) -> Vec<Presentable> {
    let mut tables_by_drive: HashMap<&DeviceId, &'a Device> = HashMap::new();
    for &device in sorted {
        if let DeviceKind::PartitionTable(t) = &device.kind {
            tables_by_drive.entry(&t.drive).or_insert(device);
        }
    }

    let mut pass = Pass::new(registry);

    for &device in sorted {
        match &device.kind {
            DeviceKind::Drive(attrs) => pass.add_drive(device, attrs, &tables_by_drive),
            DeviceKind::RaidArray(attrs) => pass.add_raid_array(device, attrs, &tables_by_drive),
            DeviceKind::Partition(attrs) => pass.add_partition(device, attrs),
            DeviceKind::LuksCleartext(attrs) => pass.add_cleartext(device, attrs),
            DeviceKind::LvmPhysicalVolume(attrs) => pass.add_physical_volume(attrs),
            DeviceKind::RaidComponent(attrs) => pass.add_raid_component(attrs),
            // Tables are consumed when their drive is classified; ports only
            // matter once a drive resolves them.
            DeviceKind::PartitionTable(_) | DeviceKind::Port(_) => {}
        }
    }

    pass.synthesize_gaps(sorted);
    pass.output
}

struct Pass<'a> {
    registry: &'a DeviceRegistry,
    output: Vec<Presentable>,
    hubs: HashMap<HubCategory, PresentableId>,
    md_by_uuid: HashMap<Uuid, PresentableId>,
    vg_by_uuid: HashMap<Uuid, PresentableId>,
    drive_by_device: HashMap<DeviceId, PresentableId>,
    volume_by_device: HashMap<DeviceId, PresentableId>,
    extended_volume_by_table: HashMap<DeviceId, PresentableId>,
    /// Drive-like devices that own a partition table, kept for the gap
    /// post-pass.
    partitioned: Vec<(&'a Device, &'a Device)>,
}

impl<'a> Pass<'a> {
    fn new(registry: &'a DeviceRegistry) -> Self {
        let root = Presentable {
            id: PresentableId::machine(),
            kind: PresentableKind::Machine,
            device: None,
            enclosed_by: None,
            offset: 0,
            size: 0,
        };
        Self {
            registry,
            output: vec![root],
            hubs: HashMap::new(),
            md_by_uuid: HashMap::new(),
            vg_by_uuid: HashMap::new(),
            drive_by_device: HashMap::new(),
            volume_by_device: HashMap::new(),
            extended_volume_by_table: HashMap::new(),
            partitioned: Vec::new(),
        }
    }

    /// Memoized singleton hub for this pass, created on first demand.
    fn hub(&mut self, category: HubCategory) -> PresentableId {
        if let Some(id) = self.hubs.get(&category) {
            return id.clone();
        }
        let id = PresentableId::hub(category);
        self.output.push(Presentable {
            id: id.clone(),
            kind: PresentableKind::Hub(category),
            device: None,
            enclosed_by: Some(PresentableId::machine()),
            offset: 0,
            size: 0,
        });
        self.hubs.insert(category, id.clone());
        id
    }

    fn drive_parent(&mut self, device: &Device, attrs: &DriveAttrs) -> PresentableId {
        if let Some(port_id) = &attrs.port {
            if let Some(port) = self.registry.get(port_id)
                && let DeviceKind::Port(port_attrs) = &port.kind
            {
                return self.hub(port_attrs.category);
            }
            debug!("Port {port_id} of drive {} did not resolve", device.id);
        }
        if attrs.multipath_path {
            return self.hub(HubCategory::Multipath);
        }
        self.hub(HubCategory::Peripheral)
    }

    fn add_drive(
        &mut self,
        device: &'a Device,
        attrs: &DriveAttrs,
        tables: &HashMap<&DeviceId, &'a Device>,
    ) {
        let parent = self.drive_parent(device, attrs);
        let id = PresentableId::drive(&device.id);
        self.output.push(Presentable {
            id: id.clone(),
            kind: PresentableKind::Drive,
            device: Some(device.id.clone()),
            enclosed_by: Some(parent),
            offset: 0,
            size: attrs.size,
        });
        self.drive_by_device.insert(device.id.clone(), id.clone());
        self.attach_drive_body(device, &id, attrs.size, attrs.media_available, tables);
    }

    fn add_raid_array(
        &mut self,
        device: &'a Device,
        attrs: &RaidArrayAttrs,
        tables: &HashMap<&DeviceId, &'a Device>,
    ) {
        if self.md_by_uuid.contains_key(&attrs.uuid) {
            warn!(
                "Ignoring duplicate MD RAID array {} for UUID {}",
                device.id, attrs.uuid
            );
            return;
        }
        let hub = self.hub(HubCategory::RaidLvm);
        let id = PresentableId::md_drive(&attrs.uuid);
        self.output.push(Presentable {
            id: id.clone(),
            kind: PresentableKind::LinuxMdDrive {
                uuid: attrs.uuid,
                assembled: true,
            },
            device: Some(device.id.clone()),
            enclosed_by: Some(hub),
            offset: 0,
            size: attrs.size,
        });
        self.md_by_uuid.insert(attrs.uuid, id.clone());
        self.drive_by_device.insert(device.id.clone(), id.clone());
        // A running array carries media by definition.
        self.attach_drive_body(device, &id, attrs.size, true, tables);
    }

    /// Shared drive-body rule: a partitioned drive waits for the gap
    /// post-pass, a bare drive with media gets one whole-disk volume.
    fn attach_drive_body(
        &mut self,
        device: &'a Device,
        drive_id: &PresentableId,
        size: u64,
        media_available: bool,
        tables: &HashMap<&DeviceId, &'a Device>,
    ) {
        if let Some(&table) = tables.get(&device.id) {
            self.partitioned.push((device, table));
        } else if media_available && size > 0 {
            let id = PresentableId::volume(&device.id, drive_id);
            self.output.push(Presentable {
                id: id.clone(),
                kind: PresentableKind::Volume,
                device: Some(device.id.clone()),
                enclosed_by: Some(drive_id.clone()),
                offset: 0,
                size,
            });
            self.volume_by_device.insert(device.id.clone(), id);
        }
    }

    fn add_partition(&mut self, device: &'a Device, attrs: &PartitionAttrs) {
        let Some(table) = self.registry.get(&attrs.table) else {
            warn!("Partition {} references unknown table {}", device.id, attrs.table);
            return;
        };
        let DeviceKind::PartitionTable(table_attrs) = &table.kind else {
            warn!(
                "Partition {} references {}, which is not a partition table",
                device.id, attrs.table
            );
            return;
        };

        let enclosing = if attrs.is_logical(table_attrs.scheme) {
            match self.extended_volume_by_table.get(&attrs.table) {
                Some(id) => id.clone(),
                None => {
                    warn!(
                        "Logical partition {} has no extended partition on {}",
                        device.id, attrs.table
                    );
                    return;
                }
            }
        } else {
            match self.drive_by_device.get(&table_attrs.drive) {
                Some(id) => id.clone(),
                None => {
                    warn!(
                        "Partition {} belongs to unclassified drive {}",
                        device.id, table_attrs.drive
                    );
                    return;
                }
            }
        };

        let id = PresentableId::volume(&device.id, &enclosing);
        self.output.push(Presentable {
            id: id.clone(),
            kind: PresentableKind::Volume,
            device: Some(device.id.clone()),
            enclosed_by: Some(enclosing),
            offset: attrs.offset,
            size: attrs.size,
        });
        self.volume_by_device.insert(device.id.clone(), id.clone());
        if attrs.is_extended(table_attrs.scheme) {
            self.extended_volume_by_table
                .entry(attrs.table.clone())
                .or_insert(id);
        }
    }

    fn add_cleartext(&mut self, device: &'a Device, attrs: &LuksCleartextAttrs) {
        // The backing volume exists already: the sorter places the encrypted
        // container before its cleartext view.
        let Some(enclosing) = self.volume_by_device.get(&attrs.backing).cloned() else {
            warn!(
                "Cleartext view {} has no volume for its backing {}",
                device.id, attrs.backing
            );
            return;
        };
        let id = PresentableId::volume(&device.id, &enclosing);
        self.output.push(Presentable {
            id: id.clone(),
            kind: PresentableKind::Volume,
            device: Some(device.id.clone()),
            enclosed_by: Some(enclosing),
            offset: 0,
            size: attrs.size,
        });
        self.volume_by_device.insert(device.id.clone(), id);
    }

    fn add_physical_volume(&mut self, attrs: &LvmPvAttrs) {
        // One group per UUID per pass, discovered through any one of its PVs.
        if self.vg_by_uuid.contains_key(&attrs.vg_uuid) {
            return;
        }
        let hub = self.hub(HubCategory::RaidLvm);
        let vg_id = PresentableId::lvm_volume_group(&attrs.vg_uuid);
        self.output.push(Presentable {
            id: vg_id.clone(),
            kind: PresentableKind::LinuxLvm2VolumeGroup {
                uuid: attrs.vg_uuid,
                name: attrs.vg_name.clone(),
            },
            device: None,
            enclosed_by: Some(hub),
            offset: 0,
            size: attrs.vg_size,
        });
        self.vg_by_uuid.insert(attrs.vg_uuid, vg_id.clone());

        for lv in lvm::parse_lv_descriptors(&attrs.lv_descriptors) {
            let id = PresentableId::lvm_volume(&lv.uuid, &vg_id);
            self.output.push(Presentable {
                id,
                kind: PresentableKind::LinuxLvm2Volume {
                    uuid: lv.uuid,
                    name: lv.name,
                },
                device: None,
                enclosed_by: Some(vg_id.clone()),
                offset: 0,
                size: lv.size,
            });
        }

        if attrs.vg_free >= LVM_HOLE_FLOOR_BYTES {
            self.output.push(Presentable {
                id: PresentableId::lvm_volume_hole(&vg_id),
                kind: PresentableKind::LinuxLvm2VolumeHole,
                device: None,
                enclosed_by: Some(vg_id),
                offset: 0,
                size: attrs.vg_free,
            });
        }
    }

    fn add_raid_component(&mut self, attrs: &RaidComponentAttrs) {
        // The running array was sorted ahead of its members, so reaching
        // this point with an unknown UUID means the array is not assembled.
        if self.md_by_uuid.contains_key(&attrs.array_uuid) {
            return;
        }
        let hub = self.hub(HubCategory::RaidLvm);
        let id = PresentableId::md_drive(&attrs.array_uuid);
        self.output.push(Presentable {
            id: id.clone(),
            kind: PresentableKind::LinuxMdDrive {
                uuid: attrs.array_uuid,
                assembled: false,
            },
            device: None,
            enclosed_by: Some(hub),
            offset: 0,
            size: 0,
        });
        self.md_by_uuid.insert(attrs.array_uuid, id);
    }

    /// Post-pass: unallocated-space holes for every partitioned drive, in
    /// primary space and inside any extended partition.
    fn synthesize_gaps(&mut self, sorted: &[&'a Device]) {
        let partitioned = std::mem::take(&mut self.partitioned);
        for (drive_dev, table_dev) in partitioned {
            let Some(drive_id) = self.drive_by_device.get(&drive_dev.id).cloned() else {
                continue;
            };
            let DeviceKind::PartitionTable(table_attrs) = &table_dev.kind else {
                continue;
            };
            let drive_size = drive_dev.size();

            let parts: Vec<&PartitionAttrs> = sorted
                .iter()
                .filter_map(|d| match &d.kind {
                    DeviceKind::Partition(p) if p.table == table_dev.id => Some(p),
                    _ => None,
                })
                .collect();

            for gap in gaps::gaps_in_region(
                drive_size,
                Region {
                    start: 0,
                    length: drive_size,
                },
                table_attrs.scheme,
                &parts,
                RegionMode::Primary,
            ) {
                self.output.push(Presentable {
                    id: PresentableId::volume_hole(gap.offset, &drive_id),
                    kind: PresentableKind::VolumeHole,
                    device: None,
                    enclosed_by: Some(drive_id.clone()),
                    offset: gap.offset,
                    size: gap.size,
                });
            }

            if let Some(ext_id) = self.extended_volume_by_table.get(&table_dev.id).cloned()
                && let Some(ext) = parts.iter().find(|p| p.is_extended(table_attrs.scheme))
            {
                for gap in gaps::gaps_in_region(
                    drive_size,
                    Region {
                        start: ext.offset,
                        length: ext.size,
                    },
                    table_attrs.scheme,
                    &parts,
                    RegionMode::Extended,
                ) {
                    self.output.push(Presentable {
                        id: PresentableId::volume_hole(gap.offset, &ext_id),
                        kind: PresentableKind::VolumeHole,
                        device: None,
                        enclosed_by: Some(ext_id.clone()),
                        offset: gap.offset,
                        size: gap.size,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topo::sorted_devices;
    use presenter_types::{PartitionScheme, PartitionTableAttrs, PortAttrs};

    fn drive(id: &str, size: u64, media_available: bool) -> Device {
        Device::new(
            id,
            DeviceKind::Drive(DriveAttrs {
                vendor: String::new(),
                model: String::new(),
                size,
                media_available,
                multipath_path: false,
                port: None,
            }),
        )
    }

    fn table(id: &str, drive: &str, scheme: PartitionScheme) -> Device {
        Device::new(
            id,
            DeviceKind::PartitionTable(PartitionTableAttrs {
                drive: drive.into(),
                scheme,
            }),
        )
    }

    fn partition(
        id: &str,
        table: &str,
        number: u32,
        type_code: u32,
        offset: u64,
        size: u64,
    ) -> Device {
        Device::new(
            id,
            DeviceKind::Partition(PartitionAttrs {
                table: table.into(),
                number,
                type_code,
                offset,
                size,
            }),
        )
    }

    fn synthesized(devices: Vec<Device>) -> Vec<Presentable> {
        let mut registry = DeviceRegistry::new();
        for device in devices {
            registry.upsert(device);
        }
        let sorted = sorted_devices(&registry, 100).expect("sort");
        synthesize(&sorted, &registry)
    }

    fn find<'p>(set: &'p [Presentable], id: &PresentableId) -> &'p Presentable {
        set.iter()
            .find(|p| &p.id == id)
            .unwrap_or_else(|| panic!("{id} missing from synthesized set"))
    }

    #[test]
    fn machine_root_opens_every_generation() {
        let set = synthesized(vec![]);
        assert_eq!(set.len(), 1);
        assert!(set[0].is_root());
        assert!(set[0].enclosed_by.is_none());
    }

    #[test]
    fn bare_drive_with_media_gets_whole_disk_volume() {
        let set = synthesized(vec![drive("/block/sda", 1 << 30, true)]);

        let drive_id = PresentableId::drive(&"/block/sda".into());
        let volume_id = PresentableId::volume(&"/block/sda".into(), &drive_id);
        assert_eq!(find(&set, &volume_id).enclosed_by.as_ref(), Some(&drive_id));

        // Machine, peripheral hub, drive, whole-disk volume.
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn drive_without_media_gets_no_volume() {
        let set = synthesized(vec![drive("/block/sr0", 0, false)]);
        assert!(!set.iter().any(|p| p.kind == PresentableKind::Volume));
    }

    #[test]
    fn hubs_are_memoized_singletons() {
        let set = synthesized(vec![
            drive("/block/sda", 1 << 30, true),
            drive("/block/sdb", 1 << 30, true),
        ]);

        let hubs: Vec<_> = set
            .iter()
            .filter(|p| matches!(p.kind, PresentableKind::Hub(_)))
            .collect();
        assert_eq!(hubs.len(), 1);
        assert_eq!(
            hubs[0].enclosed_by.as_ref(),
            Some(&PresentableId::machine())
        );
    }

    #[test]
    fn drive_parent_follows_resolved_port() {
        let set = synthesized(vec![
            Device::new(
                "/port/0",
                DeviceKind::Port(PortAttrs {
                    category: HubCategory::Multipath,
                }),
            ),
            Device::new(
                "/block/sda",
                DeviceKind::Drive(DriveAttrs {
                    vendor: String::new(),
                    model: String::new(),
                    size: 1 << 30,
                    media_available: false,
                    multipath_path: false,
                    port: Some("/port/0".into()),
                }),
            ),
        ]);

        let drive = find(&set, &PresentableId::drive(&"/block/sda".into()));
        assert_eq!(
            drive.enclosed_by.as_ref(),
            Some(&PresentableId::hub(HubCategory::Multipath))
        );
    }

    #[test]
    fn logical_partitions_are_enclosed_by_extended_volume() {
        let set = synthesized(vec![
            drive("/block/sda", 100_000, true),
            table("/block/sda:table", "/block/sda", PartitionScheme::Mbr),
            partition("/block/sda1", "/block/sda:table", 1, 0x83, 1_000, 9_000),
            partition("/block/sda2", "/block/sda:table", 2, 0x05, 10_000, 90_000),
            partition("/block/sda5", "/block/sda:table", 5, 0x83, 11_000, 40_000),
            partition("/block/sda6", "/block/sda:table", 6, 0x83, 52_000, 48_000),
        ]);

        let drive_id = PresentableId::drive(&"/block/sda".into());
        let extended_id = PresentableId::volume(&"/block/sda2".into(), &drive_id);
        let logical5 = find(
            &set,
            &PresentableId::volume(&"/block/sda5".into(), &extended_id),
        );
        let logical6 = find(
            &set,
            &PresentableId::volume(&"/block/sda6".into(), &extended_id),
        );

        assert_eq!(logical5.enclosed_by.as_ref(), Some(&extended_id));
        assert_eq!(logical6.enclosed_by.as_ref(), Some(&extended_id));
        assert_ne!(logical5.enclosed_by.as_ref(), Some(&drive_id));
    }

    #[test]
    fn raid_components_without_running_array_yield_one_placeholder() {
        let uuid = Uuid::new_v4();
        let component = |id: &str| {
            Device::new(
                id,
                DeviceKind::RaidComponent(RaidComponentAttrs {
                    array_uuid: uuid,
                    size: 1 << 30,
                }),
            )
        };
        let set = synthesized(vec![
            component("/block/sdb1"),
            component("/block/sdc1"),
            component("/block/sdd1"),
        ]);

        let md_drives: Vec<_> = set
            .iter()
            .filter(|p| matches!(p.kind, PresentableKind::LinuxMdDrive { .. }))
            .collect();
        assert_eq!(md_drives.len(), 1);
        assert_eq!(md_drives[0].id, PresentableId::md_drive(&uuid));
        assert_eq!(
            md_drives[0].kind,
            PresentableKind::LinuxMdDrive {
                uuid,
                assembled: false
            }
        );
        assert!(md_drives[0].device.is_none());
    }

    #[test]
    fn running_array_wins_over_placeholder() {
        let uuid = Uuid::new_v4();
        let set = synthesized(vec![
            Device::new(
                "/block/md0",
                DeviceKind::RaidArray(RaidArrayAttrs {
                    uuid,
                    name: "storage".to_string(),
                    level: "raid1".to_string(),
                    size: 1 << 30,
                }),
            ),
            Device::new(
                "/block/sdb1",
                DeviceKind::RaidComponent(RaidComponentAttrs {
                    array_uuid: uuid,
                    size: 1 << 30,
                }),
            ),
        ]);

        let md = find(&set, &PresentableId::md_drive(&uuid));
        assert_eq!(
            md.kind,
            PresentableKind::LinuxMdDrive {
                uuid,
                assembled: true
            }
        );
        assert_eq!(md.device.as_ref().map(|d| d.as_str()), Some("/block/md0"));
    }

    #[test]
    fn cleartext_volume_nests_under_its_container_volume() {
        let set = synthesized(vec![
            drive("/block/sda", 100_000, true),
            table("/block/sda:table", "/block/sda", PartitionScheme::Gpt),
            partition("/block/sda1", "/block/sda:table", 1, 0x83, 1_000, 99_000),
            Device::new(
                "/block/dm-0",
                DeviceKind::LuksCleartext(LuksCleartextAttrs {
                    backing: "/block/sda1".into(),
                    size: 98_000,
                }),
            ),
        ]);

        let drive_id = PresentableId::drive(&"/block/sda".into());
        let container_id = PresentableId::volume(&"/block/sda1".into(), &drive_id);
        let cleartext = find(
            &set,
            &PresentableId::volume(&"/block/dm-0".into(), &container_id),
        );
        assert_eq!(cleartext.enclosed_by.as_ref(), Some(&container_id));
    }

    #[test]
    fn physical_volume_expands_into_group_volumes_and_hole() {
        let vg_uuid = Uuid::new_v4();
        let lv_uuid = Uuid::new_v4();
        let pv = |id: &str| {
            Device::new(
                id,
                DeviceKind::LvmPhysicalVolume(LvmPvAttrs {
                    vg_uuid,
                    vg_name: "vg0".to_string(),
                    vg_size: 10 << 30,
                    vg_free: 2 << 30,
                    lv_descriptors: format!("name=root uuid={lv_uuid} size=1073741824"),
                }),
            )
        };
        // Two PVs of the same group must not duplicate it.
        let set = synthesized(vec![pv("/block/sda1"), pv("/block/sdb1")]);

        let vg_id = PresentableId::lvm_volume_group(&vg_uuid);
        let groups: Vec<_> = set
            .iter()
            .filter(|p| matches!(p.kind, PresentableKind::LinuxLvm2VolumeGroup { .. }))
            .collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, vg_id);

        let lv = find(&set, &PresentableId::lvm_volume(&lv_uuid, &vg_id));
        assert_eq!(lv.enclosed_by.as_ref(), Some(&vg_id));
        assert_eq!(lv.size, 1 << 30);

        let hole = find(&set, &PresentableId::lvm_volume_hole(&vg_id));
        assert_eq!(hole.size, 2 << 30);
    }

    #[test]
    fn tiny_group_free_space_yields_no_hole() {
        let vg_uuid = Uuid::new_v4();
        let set = synthesized(vec![Device::new(
            "/block/sda1",
            DeviceKind::LvmPhysicalVolume(LvmPvAttrs {
                vg_uuid,
                vg_name: "vg0".to_string(),
                vg_size: 10 << 30,
                vg_free: LVM_HOLE_FLOOR_BYTES - 1,
                lv_descriptors: String::new(),
            }),
        )]);

        assert!(
            !set.iter()
                .any(|p| p.kind == PresentableKind::LinuxLvm2VolumeHole)
        );
    }

    #[test]
    fn partitioned_drive_grows_holes_in_both_regions() {
        let set = synthesized(vec![
            drive("/block/sda", 100_000, true),
            table("/block/sda:table", "/block/sda", PartitionScheme::Mbr),
            partition("/block/sda1", "/block/sda:table", 1, 0x83, 999, 9_001),
            partition("/block/sda2", "/block/sda:table", 2, 0x05, 10_000, 90_000),
            partition("/block/sda5", "/block/sda:table", 5, 0x83, 12_000, 40_000),
        ]);

        let drive_id = PresentableId::drive(&"/block/sda".into());
        let extended_id = PresentableId::volume(&"/block/sda2".into(), &drive_id);

        // Primary space is fully covered (999 leading bytes < 1%), so the
        // only holes are inside the extended partition.
        let holes: Vec<_> = set
            .iter()
            .filter(|p| p.kind == PresentableKind::VolumeHole)
            .collect();
        assert_eq!(holes.len(), 2);
        assert!(
            holes
                .iter()
                .all(|h| h.enclosed_by.as_ref() == Some(&extended_id))
        );
        assert_eq!(holes[0].offset, 10_000);
        assert_eq!(holes[0].size, 2_000);
        assert_eq!(holes[1].offset, 52_000);
        assert_eq!(holes[1].size, 48_000);
    }
}
