//! Cell memory, address mapping, and bitfield helpers for the router golden
//! model.
//!
//! This crate has no notion of primitives, router tables, or scheduling —
//! those live in `noc-router`, `noc-prims`, and `noc-sim`. It only owns the
//! byte-addressable scratchpad and the handful of pure functions every layer
//! above it needs to talk about bits and addresses consistently.

mod address;
mod bits;
mod error;
mod memory;

pub use address::{map_a1, map_a8};
pub use bits::{get_bits, set_bits, sign_extend, to_twos_complement};
pub use error::CoreError;
pub use memory::{CellMemory, CELL_BYTES, DEFAULT_NUM_CELLS};
