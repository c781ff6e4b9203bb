// SPDX-License-Identifier: GPL-3.0-only

//! LVM logical-volume descriptor parsing.
//!
//! A physical-volume record embeds its group's logical volumes as a
//! semicolon-delimited blob, one entry per LV, each entry holding
//! space-separated `key=value` fields with keys `name`, `uuid` and `size`
//! (bytes). A malformed entry is logged and skipped; it never fails the
//! pass or drops its well-formed siblings.

use tracing::warn;
use uuid::Uuid;

/// One parsed logical-volume entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LvDescriptor {
    pub name: String,
    pub uuid: Uuid,
    pub size: u64,
}

pub fn parse_lv_descriptors(blob: &str) -> Vec<LvDescriptor> {
    blob.split(';')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            match parse_entry(entry) {
                Some(lv) => Some(lv),
                None => {
                    warn!("Skipping malformed logical-volume descriptor: {entry:?}");
                    None
                }
            }
        })
        .collect()
}

fn parse_entry(entry: &str) -> Option<LvDescriptor> {
    let mut name = None;
    let mut uuid = None;
    let mut size = None;

    for field in entry.split_whitespace() {
        let (key, value) = field.split_once('=')?;
        match key {
            "name" => name = Some(value.to_string()),
            "uuid" => uuid = Some(Uuid::parse_str(value).ok()?),
            "size" => size = Some(value.parse::<u64>().ok()?),
            _ => {}
        }
    }

    Some(LvDescriptor {
        name: name?,
        uuid: uuid?,
        size: size?,
    })
}
