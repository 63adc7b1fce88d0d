use noc_core::{get_bits, set_bits, sign_extend, to_twos_complement, CoreError, CELL_BYTES};

use crate::types::{AddressingMode, PrimKind, PrimOp, RecvPrim, SendPrim};

/// Split a big-endian 32-byte cell into its low 128 bits (global bits
/// `0..127`) and high 128 bits (global bits `128..255`).
fn split_cell(cell: &[u8; CELL_BYTES]) -> (u128, u128) {
    let hi = u128::from_be_bytes(cell[0..16].try_into().unwrap());
    let lo = u128::from_be_bytes(cell[16..32].try_into().unwrap());
    (lo, hi)
}

fn join_cell(lo: u128, hi: u128) -> [u8; CELL_BYTES] {
    let mut cell = [0u8; CELL_BYTES];
    cell[0..16].copy_from_slice(&hi.to_be_bytes());
    cell[16..32].copy_from_slice(&lo.to_be_bytes());
    cell
}

/// Encode one primitive into its 32-byte memory cell.
#[must_use]
pub fn encode_prim_cell(op: &PrimOp) -> [u8; CELL_BYTES] {
    if op.kind == PrimKind::Stop {
        let mut lo = 0u128;
        set_bits(&mut lo, 0, 8, 0x03);
        return join_cell(lo, 0);
    }

    let mut lo = 0u128;
    let mut hi = 0u128;

    if let Some(send) = &op.send {
        set_bits(&mut lo, 0, 4, 0x6);
        set_bits(&mut lo, 4, 1, 1);
        set_bits(&mut lo, 8, 16, u128::from(send.deps));
        set_bits(&mut lo, 48, 16, u128::from(send.send_addr));
        set_bits(&mut hi, 40, 1, u128::from(send.cell_or_neuron.as_bit()));
        set_bits(&mut hi, 48, 8, u128::from(send.normalized_message_num().saturating_sub(1)));
        set_bits(&mut hi, 112, 16, u128::from(send.para_addr));
    }

    if let Some(recv) = &op.recv {
        set_bits(&mut lo, 0, 4, 0x6);
        set_bits(&mut lo, 5, 1, 1);
        set_bits(&mut lo, 8, 16, u128::from(recv.deps));
        set_bits(&mut lo, 32, 16, u128::from(recv.recv_addr));
        set_bits(&mut hi, 44, 2, u128::from(recv.relay_mode));
        set_bits(&mut hi, 56, 6, to_twos_complement(i64::from(recv.mc_y), 6));
        set_bits(&mut hi, 64, 6, to_twos_complement(i64::from(recv.mc_x), 6));
        set_bits(&mut hi, 72, 8, u128::from(recv.tag_id));
        set_bits(&mut hi, 80, 8, u128::from(recv.end_num));
    }

    join_cell(lo, hi)
}

/// Decode one primitive from its 32-byte memory cell.
///
/// Returns `Ok(None)` for the end-of-queue terminator: an all-zero cell, or
/// one whose send/recv flags are both clear.
pub fn decode_prim_cell(cell: &[u8]) -> Result<Option<PrimOp>, CoreError> {
    let cell: [u8; CELL_BYTES] = cell
        .try_into()
        .map_err(|_| CoreError::InvalidCellLength(cell.len()))?;

    if cell.iter().all(|&b| b == 0) {
        return Ok(None);
    }

    let (lo, hi) = split_cell(&cell);

    if (lo & 0xFF) == 0x03 {
        return Ok(Some(PrimOp::stop()));
    }

    let send_valid = get_bits(lo, 4, 1) != 0;
    let recv_valid = get_bits(lo, 5, 1) != 0;
    if !send_valid && !recv_valid {
        return Ok(None);
    }

    let deps = get_bits(lo, 8, 16) as u16;

    let send = send_valid.then(|| SendPrim {
        deps,
        cell_or_neuron: AddressingMode::from_bit(get_bits(hi, 40, 1) != 0),
        message_num: get_bits(hi, 48, 8) as u16 + 1,
        send_addr: get_bits(lo, 48, 16) as u16,
        para_addr: get_bits(hi, 112, 16) as u16,
        messages: None,
    });

    let recv = recv_valid.then(|| RecvPrim {
        deps,
        recv_addr: get_bits(lo, 32, 16) as u16,
        tag_id: get_bits(hi, 72, 8) as u8,
        end_num: get_bits(hi, 80, 8) as u8,
        relay_mode: get_bits(hi, 44, 2) as u8,
        mc_y: sign_extend(get_bits(hi, 56, 6), 6) as i8,
        mc_x: sign_extend(get_bits(hi, 64, 6), 6) as i8,
    });

    let kind = if send_valid { PrimKind::Send } else { PrimKind::Recv };

    Ok(Some(PrimOp {
        kind,
        send,
        recv,
        mem_addr: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_roundtrips() {
        let op = PrimOp::stop();
        let cell = encode_prim_cell(&op);
        assert_eq!(cell[31], 0x03);
        assert_eq!(decode_prim_cell(&cell).unwrap(), Some(op));
    }

    #[test]
    fn all_zero_cell_is_terminator() {
        assert_eq!(decode_prim_cell(&[0u8; CELL_BYTES]).unwrap(), None);
    }

    #[test]
    fn send_only_roundtrips() {
        let send = SendPrim {
            deps: 0x1234,
            cell_or_neuron: AddressingMode::Neuron,
            message_num: 5,
            send_addr: 0xABCD,
            para_addr: 0x0102,
            messages: None,
        };
        let op = PrimOp::send(send.clone());
        let decoded = decode_prim_cell(&encode_prim_cell(&op)).unwrap().unwrap();
        assert_eq!(decoded.kind, PrimKind::Send);
        assert_eq!(decoded.send.unwrap(), send);
        assert!(decoded.recv.is_none());
    }

    #[test]
    fn recv_only_roundtrips() {
        let recv = RecvPrim {
            deps: 7,
            recv_addr: 0x4000,
            tag_id: 7,
            end_num: 3,
            relay_mode: 2,
            mc_y: -5,
            mc_x: 12,
        };
        let op = PrimOp::recv(recv);
        let decoded = decode_prim_cell(&encode_prim_cell(&op)).unwrap().unwrap();
        assert_eq!(decoded.kind, PrimKind::Recv);
        assert_eq!(decoded.recv, Some(recv));
        assert!(decoded.send.is_none());
    }

    #[test]
    fn message_num_zero_normalizes_to_one_on_encode() {
        let send = SendPrim {
            message_num: 0,
            ..Default::default()
        };
        let op = PrimOp::send(send);
        let decoded = decode_prim_cell(&encode_prim_cell(&op)).unwrap().unwrap();
        assert_eq!(decoded.send.unwrap().message_num, 1);
    }

    #[test]
    fn combined_send_and_recv_cell_dominates_as_send() {
        let op = PrimOp {
            kind: PrimKind::Send,
            send: Some(SendPrim {
                send_addr: 0x10,
                ..Default::default()
            }),
            recv: Some(RecvPrim {
                recv_addr: 0x40,
                tag_id: 9,
                ..Default::default()
            }),
            mem_addr: None,
        };
        let decoded = decode_prim_cell(&encode_prim_cell(&op)).unwrap().unwrap();
        assert_eq!(decoded.kind, PrimKind::Send);
        assert!(decoded.send.is_some());
        assert!(decoded.recv.is_some());
        assert_eq!(decoded.recv.unwrap().tag_id, 9);
    }

    #[test]
    fn wrong_length_is_decode_error() {
        assert!(decode_prim_cell(&[0u8; 31]).is_err());
    }
}
