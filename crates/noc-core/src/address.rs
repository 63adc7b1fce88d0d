//! A-address mappers.
//!
//! `A` is a destination-side accumulator walked per router-table unit. It is
//! signed (A0 and A_OFFSET are signed fields), so the shift here must be
//! arithmetic: a negative `a` must still produce a negative `cell_delta`
//! that, once added to the destination base, lands in range.

/// Map an 8B-unit address to (cell_delta, segment 0..3). Cell mode.
#[must_use]
pub fn map_a8(a: i64) -> (i64, u8) {
    (a >> 2, (a & 0x3) as u8)
}

/// Map a 1B-unit address to (cell_delta, byte_idx 0..31). Neuron mode.
#[must_use]
pub fn map_a1(a: i64) -> (i64, u8) {
    (a >> 5, (a & 0x1F) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_a8_positive() {
        assert_eq!(map_a8(5), (1, 1));
        assert_eq!(map_a8(4), (1, 0));
        assert_eq!(map_a8(0), (0, 0));
    }

    #[test]
    fn map_a8_negative_arithmetic_shift() {
        // -1 in 8B units: delta must be -1 with segment 3, so that
        // delta*4 + seg == -1.
        assert_eq!(map_a8(-1), (-1, 3));
        assert_eq!(map_a8(-4), (-1, 0));
        assert_eq!(map_a8(-5), (-2, 3));
    }

    #[test]
    fn map_a1_negative_arithmetic_shift() {
        assert_eq!(map_a1(-1), (-1, 31));
        assert_eq!(map_a1(-32), (-1, 0));
    }
}
