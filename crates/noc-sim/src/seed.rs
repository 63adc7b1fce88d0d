use std::collections::HashSet;

use noc_prims::{decode_prim_cell, encode_prim_cell, PrimOp};
use noc_router::write_router_table;

use crate::config::CoreConfig;
use crate::node::CoreNode;

/// Place `cfg`'s primitive queue into `node`'s memory:
///
/// 1. Ops with an explicit `mem_addr` go exactly there.
/// 2. Remaining ops are placed sequentially from cell 0, skipping any cell
///    already occupied (by the initial memory image or step 1).
/// 3. Any `Send` carrying inline router-table entries has those entries
///    written at its `para_addr`.
///
/// Placement silently stops once the core runs out of cells; a core that
/// cannot fit its whole configured queue just runs the prefix that fit.
pub fn seed_core(node: &mut CoreNode, cfg: &CoreConfig) {
    let num_cells = node.mem.num_cells();
    let mut occupied: HashSet<u32> = (0..num_cells).filter(|&addr| node.mem.is_occupied(addr)).collect();

    for op in &cfg.prim_queue {
        if let Some(addr) = op.mem_addr {
            let _ = node.mem.write_cell(i64::from(addr), encode_prim_cell(op));
            occupied.insert(addr);
        }
    }

    let mut next_addr = 0u32;
    for op in &cfg.prim_queue {
        if op.mem_addr.is_some() {
            continue;
        }
        while occupied.contains(&next_addr) && next_addr < num_cells {
            next_addr += 1;
        }
        if next_addr >= num_cells {
            break;
        }
        let _ = node.mem.write_cell(i64::from(next_addr), encode_prim_cell(op));
        occupied.insert(next_addr);
        next_addr += 1;
    }

    for op in &cfg.prim_queue {
        if let Some(send) = &op.send {
            if let Some(messages) = &send.messages {
                let _ = write_router_table(&mut node.mem, i64::from(send.para_addr), messages);
            }
        }
    }
}

/// Decode a core's primitive queue back off its memory, starting at cell 0
/// and stopping at the first terminator cell.
pub fn parse_prims_from_memory(node: &CoreNode) -> Vec<PrimOp> {
    let mut prims = Vec::new();
    for addr in 0..node.mem.num_cells() {
        let cell = match node.mem.read_cell(i64::from(addr)) {
            Ok(cell) => cell,
            Err(_) => break,
        };
        match decode_prim_cell(&cell) {
            Ok(Some(op)) => prims.push(op),
            _ => break,
        }
    }
    prims
}
