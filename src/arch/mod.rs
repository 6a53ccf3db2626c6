//! Motorola 68000 register definitions and memory-map constants.
//!
//! GDB's `m68k` target numbers the registers D0-D7 (0-7), A0-A7 (8-15), SR
//! (16) and PC (17). Every register travels over the wire as a big-endian
//! 32-bit value, including SR, which only has 16 meaningful bits on real
//! hardware.

use crate::util::range;

/// Number of registers exposed to GDB.
pub const NUM_REGS: usize = 18;

/// The `ILLEGAL` instruction. Software breakpoints are implemented by
/// replacing the instruction at the breakpoint address with this opcode.
pub const ILLEGAL_OPCODE: u16 = 0x4AFC;

/// Address of the illegal-instruction exception vector.
pub const ILLEGAL_VECTOR: u32 = 0x10;

/// Address of the trace exception vector.
pub const TRACE_VECTOR: u32 = 0x24;

/// The 68000 only decodes 24 address lines.
pub const ADDR_MASK: u32 = 0x00FF_FFFF;

/// Where a debug monitor conventionally lives in the 68000 address space.
pub const DEFAULT_MONITOR_ADDR: u32 = 0x40_0000;

/// 68000 register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegId {
    /// Data registers (D0-D7)
    D(u8),
    /// Address registers (A0-A7). A7 is the active stack pointer.
    A(u8),
    /// Status register
    Sr,
    /// Program counter
    Pc,
}

impl RegId {
    /// Map a raw GDB register number onto a register, returning `None` for
    /// anything past PC.
    pub fn from_raw_id(id: usize) -> Option<RegId> {
        let reg = match id {
            0..=7 => RegId::D(id as u8),
            8..=15 => RegId::A((id - 8) as u8),
            16 => RegId::Sr,
            17 => RegId::Pc,
            _ => return None,
        };
        Some(reg)
    }

    /// The register's GDB register number.
    pub fn to_raw_id(self) -> usize {
        match self {
            RegId::D(n) => n as usize,
            RegId::A(n) => 8 + n as usize,
            RegId::Sr => 16,
            RegId::Pc => 17,
        }
    }

    /// Iterate over every register in GDB order.
    pub fn all() -> impl Iterator<Item = RegId> {
        (0..NUM_REGS).filter_map(RegId::from_raw_id)
    }
}

/// The complete 68000 register file.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct M68kRegs {
    /// Data registers
    pub d: [u32; 8],
    /// Address registers
    pub a: [u32; 8],
    /// Status register
    pub sr: u32,
    /// Program counter
    pub pc: u32,
}

impl M68kRegs {
    /// Read a single register.
    pub fn get(&self, reg: RegId) -> u32 {
        match reg {
            RegId::D(n) => self.d[n as usize & 7],
            RegId::A(n) => self.a[n as usize & 7],
            RegId::Sr => self.sr,
            RegId::Pc => self.pc,
        }
    }

    /// Write a single register.
    pub fn set(&mut self, reg: RegId, val: u32) {
        match reg {
            RegId::D(n) => self.d[n as usize & 7] = val,
            RegId::A(n) => self.a[n as usize & 7] = val,
            RegId::Sr => self.sr = val,
            RegId::Pc => self.pc = val,
        }
    }

    /// Serialize the register file in the order GDB expects for the `g`
    /// packet: D0-D7, A0-A7, SR, PC, each as four big-endian bytes.
    pub fn gdb_serialize(&self, mut write_byte: impl FnMut(u8)) {
        for reg in RegId::all() {
            for b in self.get(reg).to_be_bytes().iter() {
                write_byte(*b)
            }
        }
    }
}

/// Redirect the illegal-instruction and trace vectors at `monitor_addr`.
///
/// `data` is about to be written to target memory starting at `start`. If the
/// write overlaps either vector, the overlapping bytes are replaced with the
/// big-endian monitor address, so the debugger can never unhook the monitor by
/// (re)loading a program's vector table.
///
/// Returns `true` if any bytes were replaced.
pub fn protect_vectors(data: &mut [u8], start: u32, monitor_addr: u32) -> bool {
    let monitor = monitor_addr.to_be_bytes();
    let len = data.len() as u32;

    let mut patched = false;
    for &vector in [ILLEGAL_VECTOR, TRACE_VECTOR].iter() {
        if range::overlaps(start, len, vector, 4) {
            range::patch(data, start, &monitor, vector);
            patched = true;
        }
    }
    patched
}
