use std::collections::{HashMap, VecDeque};

use noc_core::CellMemory;
use noc_prims::PrimOp;
use noc_router::RouterTableEntry;

/// One buffered Send payload, waiting for a matching `Recv` to post at the
/// destination on a handshake miss.
#[derive(Debug, Clone)]
pub struct PendingPayload {
    pub is_cell_mode: bool,
    pub rte: RouterTableEntry,
    pub payload: Vec<u8>,
}

/// One core in the array: its memory, parsed primitive queue, and any
/// Send payloads buffered for it pending a matching Recv.
#[derive(Debug, Clone)]
pub struct CoreNode {
    pub y: u32,
    pub x: u32,
    pub mem: CellMemory,
    pub prim_queue: Vec<PrimOp>,
    pub pending_by_tag: HashMap<u8, VecDeque<PendingPayload>>,
}

impl CoreNode {
    pub fn new(y: u32, x: u32, mem: CellMemory) -> Self {
        Self {
            y,
            x,
            mem,
            prim_queue: Vec::new(),
            pending_by_tag: HashMap::new(),
        }
    }

    /// The `recv_addr` of the first (in queue order) `Recv` primitive with
    /// a matching tag, or 0 if none exists yet.
    #[must_use]
    pub fn recv_base_for_tag(&self, tag: u8) -> u16 {
        self.prim_queue
            .iter()
            .find_map(|op| op.recv.as_ref().filter(|r| r.tag_id == tag).map(|r| r.recv_addr))
            .unwrap_or(0)
    }

    /// Whether any primitive in this core's queue is a `Recv` for `tag`,
    /// regardless of whether it has already executed — the handshake
    /// policy looks at the whole queue, not just what already ran.
    #[must_use]
    pub fn has_recv_acceptor(&self, tag: u8) -> bool {
        self.prim_queue
            .iter()
            .any(|op| op.recv.as_ref().is_some_and(|r| r.tag_id == tag))
    }
}
