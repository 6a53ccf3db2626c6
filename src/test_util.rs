//! Fixtures shared by the crate's unit tests.

use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::arch::{M68kRegs, RegId};
use crate::conn::{Connection, ConnectionExt};
use crate::target::ext::monitor::{Monitor, MonitorOps};
use crate::target::{Target, TargetError, TargetResult};

/// A scripted, in-memory connection. Reads drain `input` (an empty queue
/// reads as EOF), writes land in `output`.
pub struct MockConnection {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
    pub session_starts: usize,
}

impl MockConnection {
    pub fn new(input: &[u8]) -> MockConnection {
        MockConnection {
            input: input.iter().copied().collect(),
            output: Vec::new(),
            session_starts: 0,
        }
    }
}

impl Connection for &mut MockConnection {
    type Error = &'static str;

    fn write(&mut self, byte: u8) -> Result<(), &'static str> {
        self.output.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), &'static str> {
        Ok(())
    }

    fn on_session_start(&mut self) -> Result<(), &'static str> {
        self.session_starts += 1;
        Ok(())
    }
}

impl ConnectionExt for &mut MockConnection {
    fn read(&mut self) -> Result<u8, &'static str> {
        self.input.pop_front().ok_or("eof")
    }

    fn peek(&mut self) -> Result<Option<u8>, &'static str> {
        Ok(self.input.front().copied())
    }
}

/// A 68000 with 64KiB of flat memory and a handful of knobs to make it
/// misbehave.
pub struct FakeTarget {
    pub mem: Vec<u8>,
    pub regs: M68kRegs,

    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Returned (once) by the next `step` or `resume`.
    pub fail_exec: Option<TargetError<&'static str>>,
    /// `resume` spins on the interrupt callback instead of returning straight
    /// away.
    pub run_until_interrupt: bool,

    pub steps: usize,
    pub resumes: usize,
    pub interrupted: usize,
    /// The `interrupt_requested` argument of every `acquire` call.
    pub acquires: Vec<bool>,

    pub monitor: bool,
    pub dumps: Vec<String>,
    pub traces: Vec<String>,
}

impl FakeTarget {
    pub fn new() -> FakeTarget {
        FakeTarget {
            mem: vec![0; 0x10000],
            regs: M68kRegs::default(),
            fail_reads: false,
            fail_writes: false,
            fail_exec: None,
            run_until_interrupt: false,
            steps: 0,
            resumes: 0,
            interrupted: 0,
            acquires: Vec::new(),
            monitor: false,
            dumps: Vec::new(),
            traces: Vec::new(),
        }
    }
}

impl Target for FakeTarget {
    type Error = &'static str;

    fn read_addrs(&mut self, start_addr: u32, data: &mut [u8]) -> TargetResult<(), Self> {
        if self.fail_reads {
            return Err(TargetError::NonFatal);
        }
        let start = start_addr as usize;
        let src = self.mem.get(start..start + data.len()).ok_or(TargetError::Errno(14))?;
        data.copy_from_slice(src);
        Ok(())
    }

    fn write_addrs(&mut self, start_addr: u32, data: &[u8]) -> TargetResult<(), Self> {
        if self.fail_writes {
            return Err(TargetError::NonFatal);
        }
        let start = start_addr as usize;
        let dst = self
            .mem
            .get_mut(start..start + data.len())
            .ok_or(TargetError::Errno(14))?;
        dst.copy_from_slice(data);
        Ok(())
    }

    fn read_register(&mut self, reg: RegId) -> u32 {
        self.regs.get(reg)
    }

    fn write_register(&mut self, reg: RegId, val: u32) {
        self.regs.set(reg, val)
    }

    fn step(&mut self, _interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self> {
        self.steps += 1;
        if let Some(e) = self.fail_exec.take() {
            return Err(e);
        }
        self.regs.pc += 2;
        Ok(())
    }

    fn resume(&mut self, interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self> {
        self.resumes += 1;
        if let Some(e) = self.fail_exec.take() {
            return Err(e);
        }
        if self.run_until_interrupt {
            for _ in 0..1000 {
                if interrupt() {
                    self.interrupted += 1;
                    break;
                }
            }
        }
        Ok(())
    }

    fn acquire(
        &mut self,
        interrupt_requested: bool,
        _interrupt: &mut dyn FnMut() -> bool,
    ) -> TargetResult<(), Self> {
        self.acquires.push(interrupt_requested);
        Ok(())
    }

    fn support_monitor(&mut self) -> Option<MonitorOps<'_, Self>> {
        if self.monitor {
            Some(self)
        } else {
            None
        }
    }
}

impl Monitor for FakeTarget {
    fn dump_ram(&mut self, path: &str) -> TargetResult<(), Self> {
        if self.fail_writes {
            return Err(TargetError::Errno(13));
        }
        self.dumps.push(path.to_string());
        Ok(())
    }

    fn open_trace(&mut self, path: &str) -> TargetResult<(), Self> {
        if self.fail_writes {
            return Err(TargetError::NonFatal);
        }
        self.traces.push(path.to_string());
        Ok(())
    }
}
