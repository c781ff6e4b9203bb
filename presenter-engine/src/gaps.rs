// SPDX-License-Identifier: GPL-3.0-only

//! Unallocated-space computation for partitioned drives.
//!
//! A region is either the whole drive (primary space, logical partitions
//! ignored) or the slice owned by one extended partition (its logical
//! partitions only). Partitions starting strictly inside the region are
//! sorted by offset and walked front to back; the space between one
//! partition's end and the next partition's start is a gap, as is the space
//! after the last partition up to the region's end.

use presenter_types::{PartitionAttrs, PartitionScheme};

/// Denominator of the minimum-gap fraction: a gap smaller than
/// `drive_size / 100` is alignment padding, not presentable free space.
pub const GAP_MIN_FRACTION_DENOM: u64 = 100;

/// Byte range to scan for gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: u64,
    pub length: u64,
}

/// Which partitions count when scanning a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMode {
    /// Whole-drive scan; MBR logical partitions are ignored (they live
    /// inside the extended partition's slice).
    Primary,
    /// Scan of one extended partition's slice; no number restriction.
    Extended,
}

/// One unallocated segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub offset: u64,
    pub size: u64,
}

/// Compute the surviving gaps of a region. `drive_size` is the whole
/// drive's capacity and anchors the minimum-size filter in both modes.
pub fn gaps_in_region(
    drive_size: u64,
    region: Region,
    scheme: PartitionScheme,
    partitions: &[&PartitionAttrs],
    mode: RegionMode,
) -> Vec<Gap> {
    let region_end = region.start.saturating_add(region.length);
    let min_size = drive_size / GAP_MIN_FRACTION_DENOM;

    let mut inside: Vec<&PartitionAttrs> = partitions
        .iter()
        .copied()
        .filter(|p| {
            if mode == RegionMode::Primary && p.is_logical(scheme) {
                return false;
            }
            p.offset > region.start && p.offset < region_end
        })
        .collect();
    inside.sort_by_key(|p| p.offset);

    let mut gaps = Vec::new();
    let mut cursor = region.start;
    for p in &inside {
        if p.offset > cursor {
            let size = p.offset - cursor;
            if size >= min_size {
                gaps.push(Gap {
                    offset: cursor,
                    size,
                });
            }
        }
        // Overlapping entries never move the cursor backwards.
        cursor = cursor.max(p.end());
    }
    if region_end > cursor {
        let size = region_end - cursor;
        if size >= min_size {
            gaps.push(Gap {
                offset: cursor,
                size,
            });
        }
    }

    gaps
}
