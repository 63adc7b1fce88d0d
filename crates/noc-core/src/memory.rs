use std::collections::HashMap;

use crate::error::CoreError;

/// Width of one addressable cell, in bytes.
pub const CELL_BYTES: usize = 32;

/// Default number of cells in a core's scratchpad.
pub const DEFAULT_NUM_CELLS: u32 = 24576;

/// Sparse 32-byte-cell-addressable scratchpad memory.
///
/// Unmapped cells read as all zeros; writes materialize a cell on first
/// touch. Every stored cell is exactly [`CELL_BYTES`] long.
#[derive(Debug, Clone)]
pub struct CellMemory {
    num_cells: u32,
    cells: HashMap<u32, [u8; CELL_BYTES]>,
}

impl CellMemory {
    #[must_use]
    pub fn new(num_cells: u32) -> Self {
        Self {
            num_cells,
            cells: HashMap::new(),
        }
    }

    #[must_use]
    pub fn num_cells(&self) -> u32 {
        self.num_cells
    }

    fn bounds_check(&self, addr: i64) -> Result<u32, CoreError> {
        if addr < 0 || addr >= i64::from(self.num_cells) {
            return Err(CoreError::CellOutOfRange {
                addr,
                num_cells: self.num_cells,
            });
        }
        Ok(addr as u32)
    }

    /// Read a cell, returning 32 zero bytes if it was never written.
    pub fn read_cell(&self, addr: i64) -> Result<[u8; CELL_BYTES], CoreError> {
        let addr = self.bounds_check(addr)?;
        Ok(self.cells.get(&addr).copied().unwrap_or([0u8; CELL_BYTES]))
    }

    /// Overwrite a whole cell in one shot. Used by the primitive and router
    /// table codecs when seeding memory; not part of the masked-write API.
    pub fn write_cell(&mut self, addr: i64, data: [u8; CELL_BYTES]) -> Result<(), CoreError> {
        let addr = self.bounds_check(addr)?;
        self.cells.insert(addr, data);
        Ok(())
    }

    /// True if the cell has ever been written and contains a non-zero byte.
    /// Used by the seeding pass to find unoccupied cells for sequential
    /// primitive placement.
    #[must_use]
    pub fn is_occupied(&self, addr: u32) -> bool {
        self.cells
            .get(&addr)
            .is_some_and(|cell| cell.iter().any(|&b| b != 0))
    }

    /// Overwrite one 8-byte segment (`segment_idx` in `0..3`) of a cell.
    pub fn write_8b(&mut self, addr: i64, segment_idx: u8, data8: [u8; 8]) -> Result<(), CoreError> {
        if segment_idx > 3 {
            return Err(CoreError::InvalidSegment(segment_idx));
        }
        let addr = self.bounds_check(addr)?;
        let cell = self.cells.entry(addr).or_insert([0u8; CELL_BYTES]);
        let start = usize::from(segment_idx) * 8;
        cell[start..start + 8].copy_from_slice(&data8);
        Ok(())
    }

    /// Overwrite a single byte (`byte_idx` in `0..31`) of a cell.
    pub fn write_1b(&mut self, addr: i64, byte_idx: u8, value: u8) -> Result<(), CoreError> {
        if byte_idx > 31 {
            return Err(CoreError::InvalidByteIndex(byte_idx));
        }
        let addr = self.bounds_check(addr)?;
        let cell = self.cells.entry(addr).or_insert([0u8; CELL_BYTES]);
        cell[usize::from(byte_idx)] = value;
        Ok(())
    }

    /// Read a byte span that may cross cell boundaries.
    ///
    /// `start_byte_offset` must be in `0..31`. Reads past the end of a
    /// mapped region return zeros rather than allocating.
    pub fn read_bytes_linear(
        &self,
        start_cell_addr: i64,
        start_byte_offset: u8,
        length: usize,
    ) -> Result<Vec<u8>, CoreError> {
        debug_assert!(start_byte_offset < CELL_BYTES as u8);
        let mut out = Vec::with_capacity(length);
        let mut cell = start_cell_addr;
        let mut off = usize::from(start_byte_offset);
        let mut remaining = length;
        while remaining > 0 {
            let chunk = remaining.min(CELL_BYTES - off);
            let data = self.read_cell(cell)?;
            out.extend_from_slice(&data[off..off + chunk]);
            remaining -= chunk;
            cell += 1;
            off = 0;
        }
        Ok(out)
    }
}

impl Default for CellMemory {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_CELLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_cell_reads_zero() {
        let mem = CellMemory::default();
        assert_eq!(mem.read_cell(0x10).unwrap(), [0u8; CELL_BYTES]);
    }

    #[test]
    fn write_8b_then_read_cell_roundtrips() {
        let mut mem = CellMemory::default();
        mem.write_8b(5, 2, [1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let cell = mem.read_cell(5).unwrap();
        assert_eq!(&cell[16..24], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&cell[0..16], &[0u8; 16]);
    }

    #[test]
    fn write_1b_sets_single_byte() {
        let mut mem = CellMemory::default();
        mem.write_1b(0, 31, 0xAB).unwrap();
        assert_eq!(mem.read_cell(0).unwrap()[31], 0xAB);
    }

    #[test]
    fn out_of_range_cell_is_fatal() {
        let mem = CellMemory::new(4);
        assert!(mem.read_cell(4).is_err());
        assert!(mem.read_cell(-1).is_err());
    }

    #[test]
    fn read_bytes_linear_crosses_cell_boundary() {
        let mut mem = CellMemory::default();
        mem.write_cell(0, [0xAAu8; CELL_BYTES]).unwrap();
        mem.write_cell(1, [0xBBu8; CELL_BYTES]).unwrap();
        let got = mem.read_bytes_linear(0, 30, 4).unwrap();
        assert_eq!(got, vec![0xAA, 0xAA, 0xBB, 0xBB]);
    }

    #[test]
    fn occupied_tracks_nonzero_cells() {
        let mut mem = CellMemory::default();
        assert!(!mem.is_occupied(3));
        mem.write_1b(3, 0, 1).unwrap();
        assert!(mem.is_occupied(3));
    }
}
