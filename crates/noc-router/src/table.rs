use noc_core::{CellMemory, CoreError, CELL_BYTES};

use crate::rte::RouterTableEntry;

/// Pack two 128-bit words into one big-endian 32-byte cell: `lower` occupies
/// bits `[127:0]`, `upper` occupies bits `[255:128]`.
fn pack_cell(lower: u128, upper: u128) -> [u8; CELL_BYTES] {
    let mut cell = [0u8; CELL_BYTES];
    cell[0..16].copy_from_slice(&upper.to_be_bytes());
    cell[16..32].copy_from_slice(&lower.to_be_bytes());
    cell
}

/// Split a big-endian 32-byte cell into (lower 128 bits, upper 128 bits).
fn unpack_cell(cell: &[u8; CELL_BYTES]) -> (u128, u128) {
    let upper = u128::from_be_bytes(cell[0..16].try_into().unwrap());
    let lower = u128::from_be_bytes(cell[16..32].try_into().unwrap());
    (lower, upper)
}

/// Write `entries` into memory starting at `base_addr`, two packets per
/// 32B cell (first entry in the lower half, second in the upper half). If
/// `entries` has an odd length, the trailing upper half is zeroed.
pub fn write_router_table(
    mem: &mut CellMemory,
    base_addr: i64,
    entries: &[RouterTableEntry],
) -> Result<(), CoreError> {
    let mut cell_idx = 0i64;
    let mut chunks = entries.chunks(2);
    while let Some(pair) = chunks.next() {
        let lower = pair[0].encode();
        let upper = pair.get(1).map(RouterTableEntry::encode).unwrap_or(0);
        mem.write_cell(base_addr + cell_idx, pack_cell(lower, upper))?;
        cell_idx += 1;
    }
    Ok(())
}

/// Parse `count` entries starting at `base_addr`, reading `ceil(count/2)`
/// cells and discarding a trailing unused upper half when `count` is odd.
pub fn parse_router_table(
    mem: &CellMemory,
    base_addr: i64,
    count: u16,
) -> Result<Vec<RouterTableEntry>, CoreError> {
    let count = usize::from(count);
    let needed_cells = count.div_ceil(2);
    let mut entries = Vec::with_capacity(count);
    for i in 0..needed_cells {
        let cell = mem.read_cell(base_addr + i as i64)?;
        let (lower, upper) = unpack_cell(&cell);
        entries.push(RouterTableEntry::decode(lower));
        if entries.len() < count {
            entries.push(RouterTableEntry::decode(upper));
        }
    }
    entries.truncate(count);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: u8) -> RouterTableEntry {
        RouterTableEntry {
            tag_id: tag,
            ..RouterTableEntry::default()
        }
    }

    #[test]
    fn two_entries_pack_into_one_cell() {
        let mut mem = CellMemory::default();
        let entries = vec![entry(1), entry(2)];
        write_router_table(&mut mem, 0x30, &entries).unwrap();
        let cell = mem.read_cell(0x30).unwrap();
        let (lower, upper) = unpack_cell(&cell);
        assert_eq!(RouterTableEntry::decode(lower).tag_id, 1);
        assert_eq!(RouterTableEntry::decode(upper).tag_id, 2);
    }

    #[test]
    fn odd_count_zeroes_trailing_upper_half() {
        let mut mem = CellMemory::default();
        write_router_table(&mut mem, 0, &[entry(9)]).unwrap();
        let cell = mem.read_cell(0).unwrap();
        let (_lower, upper) = unpack_cell(&cell);
        assert_eq!(upper, 0);
    }

    #[test]
    fn roundtrip_through_memory() {
        let mut mem = CellMemory::default();
        let entries: Vec<_> = (0..5).map(entry).collect();
        write_router_table(&mut mem, 0x100, &entries).unwrap();
        let parsed = parse_router_table(&mem, 0x100, entries.len() as u16).unwrap();
        assert_eq!(parsed, entries);
    }
}
