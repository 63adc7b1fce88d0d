//! Router-table entry (RTE) codec.
//!
//! An RTE is a 128-bit per-message descriptor: two pack into one
//! 32-byte memory cell, lower half first. This crate only knows how to
//! encode/decode entries and pack/parse them to and from [`noc_core::CellMemory`];
//! the addressing walk that consumes them lives in `noc-sim`.

mod rte;
mod table;

pub use rte::RouterTableEntry;
pub use table::{parse_router_table, write_router_table};
