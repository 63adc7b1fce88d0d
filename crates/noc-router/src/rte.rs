use noc_core::{get_bits, set_bits, sign_extend, to_twos_complement};

/// One 128-bit router-table entry.
///
/// The same struct doubles as the inline message specification a `Send`
/// primitive can carry in its config (`SendPrim::messages` in `noc-prims`):
/// authoring an entry and decoding one off the wire produce the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterTableEntry {
    pub s: bool,
    pub t: bool,
    pub e: bool,
    /// Multicast flag. Reserved: always treated as ignored by the router
    /// engine.
    pub q: bool,
    /// Destination row offset in cores, 6-bit signed.
    pub y: i8,
    /// Destination column offset in cores, 6-bit signed.
    pub x: i8,
    /// Start `A` in 8B units (cell mode) or 1B units (neuron mode).
    pub a0: u16,
    /// Units per message: 32B cells in cell mode, bytes in neuron mode.
    /// Raw wire value; use [`Self::normalized_cnt`] for the effective count.
    pub cnt: u16,
    /// Stride applied to `A` between groups.
    pub a_offset: i16,
    /// Raw `CONST` field; use [`Self::group_size`] for the effective size.
    pub const_raw: u8,
    pub handshake: bool,
    pub tag_id: u8,
    pub en: bool,
}

impl Default for RouterTableEntry {
    fn default() -> Self {
        Self {
            s: false,
            t: false,
            e: false,
            q: false,
            y: 0,
            x: 0,
            a0: 0,
            cnt: 1,
            a_offset: 0,
            const_raw: 0,
            handshake: false,
            tag_id: 0,
            en: true,
        }
    }
}

impl RouterTableEntry {
    /// Effective group size: `CONST == 0` means a group of 1.
    #[must_use]
    pub fn group_size(&self) -> u16 {
        if self.const_raw == 0 {
            1
        } else {
            u16::from(self.const_raw) + 1
        }
    }

    /// Effective unit count: `CNT == 0` means a count of 1.
    #[must_use]
    pub fn normalized_cnt(&self) -> u16 {
        if self.cnt == 0 {
            1
        } else {
            self.cnt
        }
    }

    /// Pack into the 128-bit wire representation.
    #[must_use]
    pub fn encode(&self) -> u128 {
        let mut w = 0u128;
        set_bits(&mut w, 0, 1, u128::from(self.s));
        set_bits(&mut w, 1, 1, u128::from(self.t));
        set_bits(&mut w, 2, 1, u128::from(self.e));
        set_bits(&mut w, 3, 1, u128::from(self.q));
        set_bits(&mut w, 6, 6, to_twos_complement(i64::from(self.y), 6));
        set_bits(&mut w, 12, 6, to_twos_complement(i64::from(self.x), 6));
        set_bits(&mut w, 18, 14, u128::from(self.a0));
        set_bits(&mut w, 32, 12, u128::from(self.cnt));
        set_bits(&mut w, 44, 12, to_twos_complement(i64::from(self.a_offset), 12));
        set_bits(&mut w, 56, 7, u128::from(self.const_raw));
        set_bits(&mut w, 63, 1, u128::from(self.handshake));
        set_bits(&mut w, 64, 8, u128::from(self.tag_id));
        set_bits(&mut w, 72, 1, u128::from(self.en));
        w
    }

    /// Unpack from the 128-bit wire representation.
    #[must_use]
    pub fn decode(word: u128) -> Self {
        Self {
            s: get_bits(word, 0, 1) != 0,
            t: get_bits(word, 1, 1) != 0,
            e: get_bits(word, 2, 1) != 0,
            q: get_bits(word, 3, 1) != 0,
            y: sign_extend(get_bits(word, 6, 6), 6) as i8,
            x: sign_extend(get_bits(word, 12, 6), 6) as i8,
            a0: get_bits(word, 18, 14) as u16,
            cnt: get_bits(word, 32, 12) as u16,
            a_offset: sign_extend(get_bits(word, 44, 12), 12) as i16,
            const_raw: get_bits(word, 56, 7) as u8,
            handshake: get_bits(word, 63, 1) != 0,
            tag_id: get_bits(word, 64, 8) as u8,
            en: get_bits(word, 72, 1) != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_arbitrary_fields() {
        let rte = RouterTableEntry {
            s: true,
            t: false,
            e: true,
            q: false,
            y: -12,
            x: 31,
            a0: 0x3FFF,
            cnt: 0xABC,
            a_offset: -2048,
            const_raw: 0x7F,
            handshake: true,
            tag_id: 0xEE,
            en: true,
        };
        assert_eq!(RouterTableEntry::decode(rte.encode()), rte);
    }

    #[test]
    fn roundtrip_default() {
        let rte = RouterTableEntry::default();
        assert_eq!(RouterTableEntry::decode(rte.encode()), rte);
    }

    #[test]
    fn group_size_and_cnt_normalize_zero_to_one() {
        let mut rte = RouterTableEntry::default();
        rte.const_raw = 0;
        rte.cnt = 0;
        assert_eq!(rte.group_size(), 1);
        assert_eq!(rte.normalized_cnt(), 1);
        rte.const_raw = 3;
        assert_eq!(rte.group_size(), 4);
    }

    #[test]
    fn negative_y_x_offsets_sign_extend() {
        let rte = RouterTableEntry {
            y: -1,
            x: -32,
            ..RouterTableEntry::default()
        };
        let decoded = RouterTableEntry::decode(rte.encode());
        assert_eq!(decoded.y, -1);
        assert_eq!(decoded.x, -32);
    }
}
