//! Golden-model simulator core: a two-dimensional toroidal grid of cores
//! that execute `Send`/`Recv`/`Stop` primitive queues to a fixed point.
//!
//! This crate owns the scheduler and router engine; the wire formats it
//! operates on live in `noc-core`, `noc-router`, and `noc-prims`. Loading
//! configuration files and CLI plumbing is left to a collaborator outside
//! the core; `ArrayConfig`/`CoreConfig` is the interface boundary.

mod config;
mod engine;
mod node;
mod seed;

use std::collections::BTreeMap;

use noc_core::{CellMemory, CoreError};
use noc_prims::PrimKind;

pub use config::{ArrayConfig, CoreConfig};
pub use engine::wrap_coord;
pub use node::{CoreNode, PendingPayload};

use seed::{parse_prims_from_memory, seed_core};

/// A fully constructed array ready to run, or already run.
///
/// Cores are keyed by `(y, x)` in a [`BTreeMap`] so that iteration order is
/// always row-major, matching the scheduler's round-robin guarantee.
#[derive(Debug, Clone)]
pub struct NoCSimulator {
    height: u32,
    width: u32,
    cores: BTreeMap<(u32, u32), CoreNode>,
}

impl NoCSimulator {
    /// Build the array: every `(y, x)` in `[0, height) x [0, width)` gets a
    /// core, seeded from `array.cores.get(&(y, x))` if present or left at
    /// default (empty) memory otherwise.
    #[must_use]
    pub fn new(array: &ArrayConfig) -> Self {
        let mut cores = BTreeMap::new();
        for y in 0..array.height {
            for x in 0..array.width {
                let cfg = array.cores.get(&(y, x));
                let mem = cfg.and_then(|c| c.initial_memory.clone()).unwrap_or_default();
                let mut node = CoreNode::new(y, x, mem);
                if let Some(cfg) = cfg {
                    seed_core(&mut node, cfg);
                }
                node.prim_queue = parse_prims_from_memory(&node);
                cores.insert((y, x), node);
            }
        }
        Self {
            height: array.height,
            width: array.width,
            cores,
        }
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The final memory image for one core, or `None` if `(y, x)` is
    /// outside the array.
    #[must_use]
    pub fn core_memory(&self, y: u32, x: u32) -> Option<&CellMemory> {
        self.cores.get(&(y, x)).map(|node| &node.mem)
    }

    /// The parsed primitive queue a core was seeded with.
    #[must_use]
    pub fn core_prim_queue(&self, y: u32, x: u32) -> Option<&[noc_prims::PrimOp]> {
        self.cores.get(&(y, x)).map(|node| node.prim_queue.as_slice())
    }

    /// Run every core's primitive queue in round-robin, row-major order
    /// until all cores are stopped or exhausted.
    ///
    /// Each live core executes at most one primitive per round: its `Recv`
    /// half first (so a handshake posted this round can accept a `Send`
    /// issued later in the same round by another core), then its `Send`
    /// half. A `Stop` primitive halts that core's participation in all
    /// further rounds without being counted against the others.
    ///
    /// Returns `Ok(())` once nothing can progress, whether that is because
    /// every queue is drained/stopped or because the whole array is stuck
    /// with work left (the latter is logged, not treated as an error: it
    /// mirrors a real dependency deadlock and the caller may still want the
    /// partial memory state).
    pub fn run(&mut self) -> Result<(), CoreError> {
        let coords: Vec<(u32, u32)> = self.cores.keys().copied().collect();
        let mut indices: BTreeMap<(u32, u32), usize> = coords.iter().map(|&c| (c, 0)).collect();
        let mut stopped: BTreeMap<(u32, u32), bool> = coords.iter().map(|&c| (c, false)).collect();
        let mut remaining: usize = self.cores.values().map(|node| node.prim_queue.len()).sum();

        while remaining > 0 {
            let mut progressed = false;
            for &coord in &coords {
                if stopped[&coord] {
                    continue;
                }
                let idx = indices[&coord];
                if idx >= self.cores[&coord].prim_queue.len() {
                    continue;
                }
                let op = self.cores[&coord].prim_queue[idx].clone();
                match op.kind {
                    PrimKind::Stop => {
                        stopped.insert(coord, true);
                    }
                    PrimKind::Send | PrimKind::Recv => {
                        if let Some(recv) = &op.recv {
                            engine::execute_recv(&mut self.cores, coord, recv)?;
                        }
                        if let Some(send) = &op.send {
                            engine::execute_send(&mut self.cores, coord, send, self.height, self.width)?;
                        }
                    }
                }
                *indices.get_mut(&coord).unwrap() += 1;
                remaining -= 1;
                progressed = true;
            }
            if !progressed {
                eprintln!("noc-sim: scheduler made no progress with {remaining} primitive(s) still queued; stopping");
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_array_runs_to_completion() {
        let array = ArrayConfig::new(2, 2);
        let mut sim = NoCSimulator::new(&array);
        sim.run().unwrap();
        assert!(sim.core_memory(0, 0).is_some());
        assert!(sim.core_memory(2, 0).is_none());
    }

    #[test]
    fn lone_stop_primitive_halts_immediately() {
        let mut array = ArrayConfig::new(1, 1);
        array.set_core(
            0,
            0,
            CoreConfig {
                initial_memory: None,
                prim_queue: vec![noc_prims::PrimOp::stop()],
            },
        );
        let mut sim = NoCSimulator::new(&array);
        sim.run().unwrap();
        assert_eq!(sim.core_prim_queue(0, 0).unwrap().len(), 1);
    }
}
