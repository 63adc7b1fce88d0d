use std::fmt;

/// Fatal errors raised by the memory and codec layers.
///
/// All of these abort the run: there is no retry path and no partial
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A cell address fell outside `[0, num_cells)`.
    CellOutOfRange { addr: i64, num_cells: u32 },
    /// A segment index outside `0..3` was requested for an 8B write.
    InvalidSegment(u8),
    /// A byte index outside `0..31` was requested for a 1B write.
    InvalidByteIndex(u8),
    /// A codec was handed a buffer of the wrong length.
    InvalidCellLength(usize),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfRange { addr, num_cells } => {
                write!(f, "cell addr out of range: {addr} (num_cells={num_cells})")
            }
            Self::InvalidSegment(seg) => write!(f, "segment_idx must be in 0..3, got {seg}"),
            Self::InvalidByteIndex(idx) => write!(f, "byte_idx must be in 0..31, got {idx}"),
            Self::InvalidCellLength(len) => write!(f, "cell buffer must be exactly 32 bytes, got {len}"),
        }
    }
}

impl std::error::Error for CoreError {}
