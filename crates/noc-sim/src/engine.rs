use std::collections::BTreeMap;

use noc_core::{map_a1, map_a8, CoreError, CELL_BYTES};
use noc_prims::{AddressingMode, RecvPrim, SendPrim};
use noc_router::{parse_router_table, RouterTableEntry};

use crate::node::{CoreNode, PendingPayload};

/// Wrap a candidate `(y, x)` core coordinate onto the torus.
///
/// `rem_euclid` keeps the result non-negative for a positive modulus,
/// which is what the wraparound grid needs.
#[must_use]
pub fn wrap_coord(y: i64, x: i64, height: u32, width: u32) -> (u32, u32) {
    let wy = y.rem_euclid(i64::from(height));
    let wx = x.rem_euclid(i64::from(width));
    (wy as u32, wx as u32)
}

/// Sum of `counts[..upto]`, the byte/cell offset a message's data starts at
/// once every earlier message in the same `Send`'s router table has been
/// accounted for.
fn prefix_sum(counts: &[u16], upto: usize) -> i64 {
    counts[..upto].iter().map(|&c| i64::from(c)).sum()
}

/// Walk `data` (a whole number of 32-byte cells) into the destination at
/// `recv_base`, applying the group-stride `A` progression.
fn write_stream_cell_mode(
    dst: &mut CoreNode,
    recv_base: i64,
    rte: &RouterTableEntry,
    data: &[u8],
) -> Result<(), CoreError> {
    let mut a = i64::from(rte.a0);
    let group_size = i64::from(rte.group_size());
    let mut cells_done: i64 = 0;
    for chunk in data.chunks(CELL_BYTES) {
        for seg in 0..4u8 {
            let start = usize::from(seg) * 8;
            let data8: [u8; 8] = chunk[start..start + 8].try_into().unwrap();
            let (cell_delta, seg_idx) = map_a8(a);
            dst.mem.write_8b(recv_base + cell_delta, seg_idx, data8)?;
            a += 1;
        }
        cells_done += 1;
        if cells_done % group_size == 0 {
            a += i64::from(rte.a_offset) - 1;
        }
    }
    Ok(())
}

/// Walk `data` (one byte per neuron) into the destination at `recv_base`,
/// applying the group-stride `A` progression.
fn write_stream_neuron_mode(
    dst: &mut CoreNode,
    recv_base: i64,
    rte: &RouterTableEntry,
    data: &[u8],
) -> Result<(), CoreError> {
    let mut a = i64::from(rte.a0);
    let group_size = i64::from(rte.group_size());
    for (idx, &byte_val) in data.iter().enumerate() {
        let (cell_delta, byte_idx) = map_a1(a);
        dst.mem.write_1b(recv_base + cell_delta, byte_idx, byte_val)?;
        a += 1;
        if (idx as i64 + 1) % group_size == 0 {
            a += i64::from(rte.a_offset) - 1;
        }
    }
    Ok(())
}

/// Execute one `Send` primitive: parse its router table, then for each
/// enabled entry either write straight through to the destination or, if
/// the handshake bit is set and no `Recv` acceptor exists yet, buffer the
/// payload at the destination.
pub fn execute_send(
    cores: &mut BTreeMap<(u32, u32), CoreNode>,
    src: (u32, u32),
    sp: &SendPrim,
    height: u32,
    width: u32,
) -> Result<(), CoreError> {
    let msg_num = sp.normalized_message_num();
    let rtes = {
        let src_core = cores.get(&src).expect("src core must exist in array");
        parse_router_table(&src_core.mem, i64::from(sp.para_addr), msg_num)?
    };
    let msg_counts: Vec<u16> = rtes.iter().map(RouterTableEntry::normalized_cnt).collect();

    for (msg_idx, rte) in rtes.iter().enumerate() {
        if !rte.en {
            continue;
        }
        let dst = wrap_coord(
            i64::from(src.0) + i64::from(rte.y),
            i64::from(src.1) + i64::from(rte.x),
            height,
            width,
        );
        let has_acceptor = cores
            .get(&dst)
            .expect("dst core must exist in array")
            .has_recv_acceptor(rte.tag_id);

        if rte.handshake && !has_acceptor {
            buffer_send_payload(cores, src, dst, sp, rte, msg_idx, &msg_counts)?;
        } else {
            match sp.cell_or_neuron {
                AddressingMode::Cell => send_cell_mode(cores, src, dst, sp, rte, msg_idx, &msg_counts)?,
                AddressingMode::Neuron => send_neuron_mode(cores, src, dst, sp, rte, msg_idx, &msg_counts)?,
            }
        }
    }
    Ok(())
}

fn send_cell_mode(
    cores: &mut BTreeMap<(u32, u32), CoreNode>,
    src: (u32, u32),
    dst: (u32, u32),
    sp: &SendPrim,
    rte: &RouterTableEntry,
    msg_idx: usize,
    msg_counts: &[u16],
) -> Result<(), CoreError> {
    let cell_per_message = usize::from(rte.normalized_cnt());
    let src_cell_base = i64::from(sp.send_addr) + prefix_sum(msg_counts, msg_idx);
    let data = {
        let src_core = cores.get(&src).expect("src core must exist in array");
        src_core
            .mem
            .read_bytes_linear(src_cell_base, 0, cell_per_message * CELL_BYTES)?
    };
    let recv_base = i64::from(
        cores
            .get(&dst)
            .expect("dst core must exist in array")
            .recv_base_for_tag(rte.tag_id),
    );
    let dst_core = cores.get_mut(&dst).expect("dst core must exist in array");
    write_stream_cell_mode(dst_core, recv_base, rte, &data)
}

fn send_neuron_mode(
    cores: &mut BTreeMap<(u32, u32), CoreNode>,
    src: (u32, u32),
    dst: (u32, u32),
    sp: &SendPrim,
    rte: &RouterTableEntry,
    msg_idx: usize,
    msg_counts: &[u16],
) -> Result<(), CoreError> {
    let neuron_per_message = usize::from(rte.normalized_cnt());
    let prev = prefix_sum(msg_counts, msg_idx) as usize;
    let start_cell = i64::from(sp.send_addr) + (prev / CELL_BYTES) as i64;
    let start_off = (prev % CELL_BYTES) as u8;
    let data = {
        let src_core = cores.get(&src).expect("src core must exist in array");
        src_core.mem.read_bytes_linear(start_cell, start_off, neuron_per_message)?
    };
    let recv_base = i64::from(
        cores
            .get(&dst)
            .expect("dst core must exist in array")
            .recv_base_for_tag(rte.tag_id),
    );
    let dst_core = cores.get_mut(&dst).expect("dst core must exist in array");
    write_stream_neuron_mode(dst_core, recv_base, rte, &data)
}

/// Materialize the payload for one disabled-handshake message and stash it
/// at the destination, keyed by tag, until a matching `Recv` runs.
fn buffer_send_payload(
    cores: &mut BTreeMap<(u32, u32), CoreNode>,
    src: (u32, u32),
    dst: (u32, u32),
    sp: &SendPrim,
    rte: &RouterTableEntry,
    msg_idx: usize,
    msg_counts: &[u16],
) -> Result<(), CoreError> {
    let is_cell_mode = sp.cell_or_neuron == AddressingMode::Cell;
    let data = if is_cell_mode {
        let cell_per_message = usize::from(rte.normalized_cnt());
        let src_cell_base = i64::from(sp.send_addr) + prefix_sum(msg_counts, msg_idx);
        let src_core = cores.get(&src).expect("src core must exist in array");
        src_core
            .mem
            .read_bytes_linear(src_cell_base, 0, cell_per_message * CELL_BYTES)?
    } else {
        let neuron_per_message = usize::from(rte.normalized_cnt());
        let prev = prefix_sum(msg_counts, msg_idx) as usize;
        let start_cell = i64::from(sp.send_addr) + (prev / CELL_BYTES) as i64;
        let start_off = (prev % CELL_BYTES) as u8;
        let src_core = cores.get(&src).expect("src core must exist in array");
        src_core.mem.read_bytes_linear(start_cell, start_off, neuron_per_message)?
    };
    let dst_core = cores.get_mut(&dst).expect("dst core must exist in array");
    dst_core
        .pending_by_tag
        .entry(rte.tag_id)
        .or_default()
        .push_back(PendingPayload {
            is_cell_mode,
            rte: *rte,
            payload: data,
        });
    Ok(())
}

/// Execute one `Recv` primitive: flush any payloads buffered for its tag,
/// replaying each one's stored `A` progression against the current
/// `recv_addr` for that tag.
pub fn execute_recv(cores: &mut BTreeMap<(u32, u32), CoreNode>, dst: (u32, u32), rp: &RecvPrim) -> Result<(), CoreError> {
    let tag = rp.tag_id;
    let pending = {
        let dst_core = cores.get_mut(&dst).expect("dst core must exist in array");
        match dst_core.pending_by_tag.remove(&tag) {
            Some(queue) => queue,
            None => return Ok(()),
        }
    };
    let recv_base = i64::from(
        cores
            .get(&dst)
            .expect("dst core must exist in array")
            .recv_base_for_tag(tag),
    );
    for item in pending {
        let dst_core = cores.get_mut(&dst).expect("dst core must exist in array");
        if item.is_cell_mode {
            write_stream_cell_mode(dst_core, recv_base, &item.rte, &item.payload)?;
        } else {
            write_stream_neuron_mode(dst_core, recv_base, &item.rte, &item.payload)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_coord_positive_in_range() {
        assert_eq!(wrap_coord(1, 1, 4, 4), (1, 1));
    }

    #[test]
    fn wrap_coord_wraps_negative_and_overflow() {
        assert_eq!(wrap_coord(-1, 0, 4, 4), (3, 0));
        assert_eq!(wrap_coord(4, 5, 4, 4), (0, 1));
        assert_eq!(wrap_coord(0, 0, 1, 1), (0, 0));
    }

    #[test]
    fn prefix_sum_of_empty_prefix_is_zero() {
        assert_eq!(prefix_sum(&[3, 4, 5], 0), 0);
        assert_eq!(prefix_sum(&[3, 4, 5], 2), 7);
    }
}
