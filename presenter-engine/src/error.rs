// SPDX-License-Identifier: GPL-3.0-only

use presenter_types::{DeviceId, PresentableId};
use thiserror::Error;

/// Structural invariant violations.
///
/// These indicate an internally inconsistent device feed; the engine has no
/// sound way to produce a partial result, so they abort the recompute.
/// Recoverable conditions (orphaned references, malformed LV descriptors)
/// are logged and skipped instead and never surface here.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("dependency chain at {device} exceeded {limit} levels; the device feed has a cycle")]
    DependencyCycle { device: DeviceId, limit: usize },

    #[error("topological sort produced {output} devices from {input} inputs")]
    SortCountMismatch { input: usize, output: usize },

    #[error("presentable {child} encloses {parent}, which is not in the retained set")]
    DanglingEnclosure {
        child: PresentableId,
        parent: PresentableId,
    },
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
