use std::fs::File;
use std::io::Write;

use gdbbridge68k::arch::{protect_vectors, M68kRegs, RegId, ADDR_MASK, DEFAULT_MONITOR_ADDR, ILLEGAL_OPCODE};
use gdbbridge68k::target::ext::monitor::{Monitor, MonitorOps};
use gdbbridge68k::target::{Target, TargetError, TargetResult};

const MEM_SIZE: usize = 1 << 24;
const WRAM_START: usize = 0xFF_0000;

/// Instructions executed by a single `resume` before it gives up.
const RUN_LIMIT: usize = 1 << 20;

/// A stand-in 68000: 16MiB of flat memory and a register file.
///
/// There is no instruction decoder. Every instruction is treated as a
/// one-word no-op, except for `ILLEGAL`, which halts execution (as a
/// breakpoint would on real hardware).
pub struct Flat68k {
    mem: Vec<u8>,
    regs: M68kRegs,
    monitor_addr: u32,
    trace: Option<File>,
}

impl Flat68k {
    pub fn new(rom: &[u8]) -> Flat68k {
        let mut mem = vec![0; MEM_SIZE];
        let len = rom.len().min(MEM_SIZE);
        mem[..len].copy_from_slice(&rom[..len]);

        let mut emu = Flat68k {
            mem,
            regs: M68kRegs::default(),
            monitor_addr: DEFAULT_MONITOR_ADDR,
            trace: None,
        };

        // reset: initial SSP and PC come from the first two vectors
        emu.regs.a[7] = emu.read_long(0);
        emu.regs.pc = emu.read_long(4);
        emu.regs.sr = 0x2700;
        emu
    }

    fn read_long(&self, addr: u32) -> u32 {
        let addr = (addr & ADDR_MASK) as usize;
        match self.mem.get(addr..addr + 4) {
            Some(b) => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            None => 0,
        }
    }

    fn opcode_at_pc(&self) -> u16 {
        let pc = (self.regs.pc & ADDR_MASK) as usize;
        match self.mem.get(pc..pc + 2) {
            Some(b) => u16::from_be_bytes([b[0], b[1]]),
            None => ILLEGAL_OPCODE,
        }
    }

    /// Execute one instruction. Returns `false` if it was `ILLEGAL`.
    fn exec_one(&mut self) -> std::io::Result<bool> {
        let opcode = self.opcode_at_pc();
        if let Some(trace) = &mut self.trace {
            writeln!(trace, "{:06X}: {:04X}", self.regs.pc & ADDR_MASK, opcode)?;
        }
        if opcode == ILLEGAL_OPCODE {
            return Ok(false);
        }
        self.regs.pc = self.regs.pc.wrapping_add(2) & ADDR_MASK;
        Ok(true)
    }
}

impl Target for Flat68k {
    type Error = &'static str;

    fn read_addrs(&mut self, start_addr: u32, data: &mut [u8]) -> TargetResult<(), Self> {
        let start = start_addr as usize;
        let src = self.mem.get(start..start + data.len()).ok_or(())?;
        data.copy_from_slice(src);
        Ok(())
    }

    fn write_addrs(&mut self, start_addr: u32, data: &[u8]) -> TargetResult<(), Self> {
        let mut data = data.to_vec();
        if protect_vectors(&mut data, start_addr, self.monitor_addr) {
            log::info!("write at {:#08x} re-pointed the monitor vectors", start_addr);
        }

        let start = start_addr as usize;
        let dst = self.mem.get_mut(start..start + data.len()).ok_or(())?;
        dst.copy_from_slice(&data);
        Ok(())
    }

    fn read_register(&mut self, reg: RegId) -> u32 {
        match reg {
            RegId::Sr => self.regs.sr & 0xffff,
            reg => self.regs.get(reg),
        }
    }

    fn write_register(&mut self, reg: RegId, val: u32) {
        match reg {
            RegId::Sr => self.regs.sr = val & 0xffff,
            reg => self.regs.set(reg, val),
        }
    }

    fn step(&mut self, _interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self> {
        self.exec_one()?;
        self.trace = None;
        Ok(())
    }

    fn resume(&mut self, interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self> {
        let mut executed = 0;
        while self.exec_one()? {
            executed += 1;
            // only poll the connection every 1024 instructions
            if executed % 1024 == 0 && interrupt() {
                log::debug!("interrupted at {:#08x}", self.regs.pc);
                break;
            }
            if executed == RUN_LIMIT {
                log::warn!("no breakpoint hit after {} instructions", RUN_LIMIT);
                break;
            }
        }
        self.trace = None;
        Ok(())
    }

    fn acquire(
        &mut self,
        _interrupt_requested: bool,
        _interrupt: &mut dyn FnMut() -> bool,
    ) -> TargetResult<(), Self> {
        // `resume` always returns with the CPU halted
        Ok(())
    }

    fn support_monitor(&mut self) -> Option<MonitorOps<'_, Self>> {
        Some(self)
    }
}

impl Monitor for Flat68k {
    fn dump_ram(&mut self, path: &str) -> TargetResult<(), Self> {
        std::fs::write(path, &self.mem[WRAM_START..])?;
        Ok(())
    }

    fn open_trace(&mut self, path: &str) -> TargetResult<(), Self> {
        let file = File::create(path).map_err(|e| {
            log::error!("cannot create {}: {}", path, e);
            TargetError::NonFatal
        })?;
        self.trace = Some(file);
        Ok(())
    }
}
