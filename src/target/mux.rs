//! Run two backends in lock-step, and report where they disagree.
//!
//! This is primarily a tool for validating a software emulator against real
//! hardware (or vice versa): every write goes to both backends, every read is
//! served by the primary, and any difference between the two is logged at
//! `warn!` level.

use alloc::vec;
use core::fmt;

use crate::arch::RegId;
use crate::target::ext::monitor::MonitorOps;
use crate::target::{Target, TargetError, TargetResult};

/// A [`Target`] which forwards every operation to a `primary` and a
/// `secondary` backend.
///
/// Results (memory contents, register values, errors) are always those of
/// the primary. Non-fatal errors from the secondary are logged and otherwise
/// ignored; fatal errors from either backend are propagated.
///
/// Execution is forwarded sequentially, primary first. Once either backend
/// has observed an interrupt, every later poll (from either backend) reports
/// one too, so a backend that runs until interrupted is never left waiting
/// on an interrupt byte the other one already consumed.
pub struct Multiplex<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> Multiplex<P, S>
where
    P: Target,
    S: Target<Error = P::Error>,
{
    /// Create a new multiplexing backend.
    pub fn new(primary: P, secondary: S) -> Self {
        Multiplex { primary, secondary }
    }

    /// Get a reference to the primary backend.
    pub fn primary(&mut self) -> &mut P {
        &mut self.primary
    }

    /// Get a reference to the secondary backend.
    pub fn secondary(&mut self) -> &mut S {
        &mut self.secondary
    }

    /// Split the multiplexer back into its two backends.
    pub fn into_inner(self) -> (P, S) {
        (self.primary, self.secondary)
    }
}

/// Checks a result from the secondary backend, only letting fatal errors
/// through.
fn check_secondary<E>(op: &str, res: Result<(), TargetError<E>>) -> Result<bool, TargetError<E>> {
    match res {
        Ok(()) => Ok(true),
        Err(TargetError::Fatal(e)) => Err(TargetError::Fatal(e)),
        Err(_) => {
            warn!("secondary backend failed on {}", op);
            Ok(false)
        }
    }
}

/// Remembers whether the connection's interrupt callback ever fired.
struct Latch<'a> {
    interrupt: &'a mut dyn FnMut() -> bool,
    hit: bool,
}

impl<'a> Latch<'a> {
    fn new(interrupt: &'a mut dyn FnMut() -> bool) -> Self {
        Latch {
            interrupt,
            hit: false,
        }
    }

    fn poll(&mut self) -> bool {
        if !self.hit {
            self.hit = (self.interrupt)();
        }
        self.hit
    }
}

struct HexDump<'a>(&'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, " {:02X}", b)?;
        }
        Ok(())
    }
}

impl<P, S> Target for Multiplex<P, S>
where
    P: Target,
    S: Target<Error = P::Error>,
{
    type Error = P::Error;

    fn read_addrs(&mut self, start_addr: u32, data: &mut [u8]) -> TargetResult<(), Self> {
        self.primary.read_addrs(start_addr, data)?;

        let mut other = vec![0; data.len()];
        let res = self.secondary.read_addrs(start_addr, &mut other);
        if check_secondary("read_addrs", res)? && other[..] != data[..] {
            warn!(
                "read_addrs({:#08x}, {:#x}) mismatch:\n  primary:  {}\n  secondary:{}",
                start_addr,
                data.len(),
                HexDump(data),
                HexDump(&other)
            );
        }
        Ok(())
    }

    fn write_addrs(&mut self, start_addr: u32, data: &[u8]) -> TargetResult<(), Self> {
        self.primary.write_addrs(start_addr, data)?;
        let res = self.secondary.write_addrs(start_addr, data);
        check_secondary("write_addrs", res)?;
        Ok(())
    }

    fn read_register(&mut self, reg: RegId) -> u32 {
        let val = self.primary.read_register(reg);
        let other = self.secondary.read_register(reg);
        if val != other {
            warn!(
                "read_register({:?}) mismatch:\n  primary:   {:#010x}\n  secondary: {:#010x}",
                reg, val, other
            );
        }
        val
    }

    fn write_register(&mut self, reg: RegId, val: u32) {
        self.primary.write_register(reg, val);
        self.secondary.write_register(reg, val);
    }

    fn step(&mut self, interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self> {
        let mut latch = Latch::new(interrupt);
        let res = self.primary.step(&mut || latch.poll());
        check_secondary("step", self.secondary.step(&mut || latch.poll()))?;
        res
    }

    fn resume(&mut self, interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self> {
        let mut latch = Latch::new(interrupt);
        let res = self.primary.resume(&mut || latch.poll());
        check_secondary("resume", self.secondary.resume(&mut || latch.poll()))?;
        res
    }

    fn acquire(
        &mut self,
        interrupt_requested: bool,
        interrupt: &mut dyn FnMut() -> bool,
    ) -> TargetResult<(), Self> {
        let mut latch = Latch::new(interrupt);
        let res = self.primary.acquire(interrupt_requested, &mut || latch.poll());
        let requested = interrupt_requested || latch.hit;
        let other = self.secondary.acquire(requested, &mut || latch.poll());
        check_secondary("acquire", other)?;
        res
    }

    fn support_monitor(&mut self) -> Option<MonitorOps<'_, Self>> {
        self.primary.support_monitor()
    }
}
