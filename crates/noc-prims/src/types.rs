use noc_router::RouterTableEntry;

/// Granularity a `Send` walks its destination address at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// 8B units, four segments per cell.
    Cell,
    /// 1B units.
    Neuron,
}

impl AddressingMode {
    #[must_use]
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::Neuron } else { Self::Cell }
    }

    #[must_use]
    pub fn as_bit(self) -> bool {
        matches!(self, Self::Neuron)
    }
}

/// A `Send` primitive.
///
/// `message_num` is the logical count `N`; the codec handles the wire's
/// `N-1` storage convention internally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SendPrim {
    pub deps: u16,
    pub cell_or_neuron: AddressingMode,
    pub message_num: u16,
    pub send_addr: u16,
    pub para_addr: u16,
    /// Inline router-table entries to seed at `para_addr` before this
    /// primitive's queue position is reached. Only meaningful for
    /// config-authored sends; a primitive parsed back off the wire never
    /// carries this (the RTEs already live in memory).
    pub messages: Option<Vec<RouterTableEntry>>,
}

impl Default for AddressingMode {
    fn default() -> Self {
        Self::Cell
    }
}

impl SendPrim {
    /// `message_num`, with the `0 -> 1` normalization applied.
    #[must_use]
    pub fn normalized_message_num(&self) -> u16 {
        if self.message_num == 0 { 1 } else { self.message_num }
    }
}

/// A `Recv` primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecvPrim {
    pub deps: u16,
    pub recv_addr: u16,
    pub tag_id: u8,
    /// Advisory; not enforced by the scheduler.
    pub end_num: u8,
    /// `CXY`, 2 bits. Reserved, ignored by the router engine.
    pub relay_mode: u8,
    /// Reserved, ignored.
    pub mc_y: i8,
    /// Reserved, ignored.
    pub mc_x: i8,
}

/// The logical operation a decoded [`PrimOp`] represents.
///
/// A single memory cell can carry both a `Send` and a `Recv` half;
/// when it does, `Send` dominates the `kind` used for dispatch while the
/// `Recv` half is retained on the same `PrimOp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimKind {
    Send,
    Recv,
    Stop,
}

/// One entry in a core's primitive queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimOp {
    pub kind: PrimKind,
    pub send: Option<SendPrim>,
    pub recv: Option<RecvPrim>,
    /// Explicit seeding address. Not part of the wire
    /// encoding; only used while placing config-authored ops into memory.
    pub mem_addr: Option<u32>,
}

impl PrimOp {
    #[must_use]
    pub fn stop() -> Self {
        Self {
            kind: PrimKind::Stop,
            send: None,
            recv: None,
            mem_addr: None,
        }
    }

    #[must_use]
    pub fn send(send: SendPrim) -> Self {
        Self {
            kind: PrimKind::Send,
            send: Some(send),
            recv: None,
            mem_addr: None,
        }
    }

    #[must_use]
    pub fn recv(recv: RecvPrim) -> Self {
        Self {
            kind: PrimKind::Recv,
            send: None,
            recv: Some(recv),
            mem_addr: None,
        }
    }

    #[must_use]
    pub fn with_mem_addr(mut self, addr: u32) -> Self {
        self.mem_addr = Some(addr);
        self
    }
}
