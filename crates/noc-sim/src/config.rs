use std::collections::BTreeMap;

use noc_core::CellMemory;
use noc_prims::PrimOp;

/// Per-core configuration: an optional pre-loaded memory image and the
/// primitive queue to seed and run.
///
/// Loading `@addr <hex>` image files and JSON config documents into this
/// shape is the job of a collaborator outside the core; this
/// struct is the interface contract the core actually consumes.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    pub initial_memory: Option<CellMemory>,
    pub prim_queue: Vec<PrimOp>,
}

/// Grid dimensions plus the per-core configuration for a run.
#[derive(Debug, Clone, Default)]
pub struct ArrayConfig {
    pub height: u32,
    pub width: u32,
    pub cores: BTreeMap<(u32, u32), CoreConfig>,
}

impl ArrayConfig {
    #[must_use]
    pub fn new(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            cores: BTreeMap::new(),
        }
    }

    pub fn set_core(&mut self, y: u32, x: u32, config: CoreConfig) {
        self.cores.insert((y, x), config);
    }
}
