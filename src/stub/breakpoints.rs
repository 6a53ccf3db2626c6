//! Software breakpoints, implemented by patching an `ILLEGAL` opcode into
//! target memory.

use core::fmt::{self, Debug, Display};

use crate::arch::{ADDR_MASK, ILLEGAL_OPCODE};
use crate::target::{Target, TargetError};

/// Number of breakpoints which may be active at once.
pub const BREAKPOINT_SLOTS: usize = 8;

/// An active breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakpointEntry {
    /// The address as GDB sent it. Target memory is patched at
    /// `addr & ADDR_MASK`.
    pub addr: u32,
    /// The two bytes it replaced.
    pub saved: [u8; 2],
}

/// An error returned by [`BreakpointTable`] operations.
#[derive(Debug)]
pub enum BreakpointError<E> {
    /// There is already a breakpoint at this address.
    Duplicate,
    /// All [`BREAKPOINT_SLOTS`] slots are in use.
    TableFull,
    /// There is no breakpoint at this address.
    NotFound,
    /// The target failed to read or patch memory.
    Target(TargetError<E>),
}

impl<E> BreakpointError<E> {
    /// The errno-style code reported to GDB for table-level failures
    /// (`EEXIST`, `ENOSPC` and `ENOENT`). `None` for target errors, which
    /// carry their own code.
    pub fn errno(&self) -> Option<u8> {
        match self {
            BreakpointError::Duplicate => Some(0x11),
            BreakpointError::TableFull => Some(0x1c),
            BreakpointError::NotFound => Some(0x02),
            BreakpointError::Target(_) => None,
        }
    }
}

impl<E> From<TargetError<E>> for BreakpointError<E> {
    fn from(e: TargetError<E>) -> Self {
        BreakpointError::Target(e)
    }
}

impl<E: Debug> Display for BreakpointError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::BreakpointError::*;
        match self {
            Duplicate => write!(f, "a breakpoint already exists at this address"),
            TableFull => write!(f, "no free breakpoint slots"),
            NotFound => write!(f, "no breakpoint at this address"),
            Target(e) => write!(f, "target error while patching memory: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: Debug> std::error::Error for BreakpointError<E> {}

/// A fixed-size table of software breakpoints.
///
/// The table lives in the [`DebugSession`](super::DebugSession), so
/// breakpoints survive the client disconnecting and reconnecting.
#[derive(Debug, Default)]
pub struct BreakpointTable {
    slots: [Option<BreakpointEntry>; BREAKPOINT_SLOTS],
}

impl BreakpointTable {
    /// Create an empty table.
    pub fn new() -> BreakpointTable {
        BreakpointTable::default()
    }

    /// Insert a breakpoint at `addr`.
    ///
    /// The table is only updated once the original opcode has been saved and
    /// the `ILLEGAL` opcode written in its place.
    pub fn insert<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        addr: u32,
    ) -> Result<(), BreakpointError<T::Error>> {
        if self.lookup(addr).is_some() {
            return Err(BreakpointError::Duplicate);
        }
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(BreakpointError::TableFull)?;

        let mut saved = [0; 2];
        target.read_addrs(addr & ADDR_MASK, &mut saved)?;
        target.write_addrs(addr & ADDR_MASK, &ILLEGAL_OPCODE.to_be_bytes())?;

        self.slots[slot] = Some(BreakpointEntry { addr, saved });
        Ok(())
    }

    /// Remove the breakpoint at `addr`, restoring the original opcode.
    ///
    /// If the target fails to restore memory, the entry is kept.
    pub fn remove<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        addr: u32,
    ) -> Result<(), BreakpointError<T::Error>> {
        let slot = self
            .slots
            .iter()
            .position(|s| matches!(s, Some(e) if e.addr == addr))
            .ok_or(BreakpointError::NotFound)?;

        if let Some(entry) = self.slots[slot] {
            target.write_addrs(addr & ADDR_MASK, &entry.saved)?;
        }
        self.slots[slot] = None;
        Ok(())
    }

    /// Returns the bytes saved by the breakpoint at `addr`, if any.
    pub fn lookup(&self, addr: u32) -> Option<[u8; 2]> {
        self.iter().find(|e| e.addr == addr).map(|e| e.saved)
    }

    /// Number of active breakpoints.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no breakpoints are active.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the active breakpoints, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &BreakpointEntry> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::FakeTarget;

    #[test]
    fn insert_and_remove() {
        let mut target = FakeTarget::new();
        target.mem[0x2000..0x2002].copy_from_slice(&[0x60, 0x00]);

        let mut table = BreakpointTable::new();
        table.insert(&mut target, 0x2000).unwrap();
        assert_eq!(&target.mem[0x2000..0x2002], &[0x4a, 0xfc]);
        assert_eq!(table.lookup(0x2000), Some([0x60, 0x00]));
        assert_eq!(table.len(), 1);

        table.remove(&mut target, 0x2000).unwrap();
        assert_eq!(&target.mem[0x2000..0x2002], &[0x60, 0x00]);
        assert!(table.is_empty());
    }

    #[test]
    fn target_sees_masked_address() {
        let mut target = FakeTarget::new();
        target.mem[0x2000..0x2002].copy_from_slice(&[0x4e, 0x75]);

        let mut table = BreakpointTable::new();
        table.insert(&mut target, 0xff00_2000).unwrap();
        assert_eq!(&target.mem[0x2000..0x2002], &[0x4a, 0xfc]);
        assert_eq!(table.lookup(0xff00_2000), Some([0x4e, 0x75]));
        assert_eq!(table.lookup(0x2000), None);

        table.remove(&mut target, 0xff00_2000).unwrap();
        assert_eq!(&target.mem[0x2000..0x2002], &[0x4e, 0x75]);
    }

    #[test]
    fn address_zero_is_a_valid_breakpoint() {
        let mut target = FakeTarget::new();
        let mut table = BreakpointTable::new();
        table.insert(&mut target, 0).unwrap();
        assert_eq!(table.lookup(0), Some([0, 0]));
        assert!(matches!(
            table.insert(&mut target, 0),
            Err(BreakpointError::Duplicate)
        ));
    }

    #[test]
    fn duplicate_leaves_memory_alone() {
        let mut target = FakeTarget::new();
        target.mem[0x2000..0x2002].copy_from_slice(&[0x12, 0x34]);

        let mut table = BreakpointTable::new();
        table.insert(&mut target, 0x2000).unwrap();
        let err = table.insert(&mut target, 0x2000).unwrap_err();
        assert!(matches!(err, BreakpointError::Duplicate));
        assert_eq!(err.errno(), Some(0x11));
        assert_eq!(table.lookup(0x2000), Some([0x12, 0x34]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn table_full() {
        let mut target = FakeTarget::new();
        let mut table = BreakpointTable::new();
        for i in 0..BREAKPOINT_SLOTS as u32 {
            table.insert(&mut target, 0x1000 + i * 2).unwrap();
        }

        target.mem[0x3000..0x3002].copy_from_slice(&[0xab, 0xcd]);
        let err = table.insert(&mut target, 0x3000).unwrap_err();
        assert!(matches!(err, BreakpointError::TableFull));
        assert_eq!(err.errno(), Some(0x1c));
        assert_eq!(&target.mem[0x3000..0x3002], &[0xab, 0xcd]);

        // freeing a slot makes room again
        table.remove(&mut target, 0x1004).unwrap();
        table.insert(&mut target, 0x3000).unwrap();
        assert_eq!(table.len(), BREAKPOINT_SLOTS);
    }

    #[test]
    fn remove_missing() {
        let mut target = FakeTarget::new();
        let mut table = BreakpointTable::new();
        let err = table.remove(&mut target, 0x2000).unwrap_err();
        assert!(matches!(err, BreakpointError::NotFound));
        assert_eq!(err.errno(), Some(0x02));
    }

    #[test]
    fn target_failure_leaves_table_unchanged() {
        let mut target = FakeTarget::new();
        let mut table = BreakpointTable::new();

        target.fail_reads = true;
        let err = table.insert(&mut target, 0x2000).unwrap_err();
        assert!(matches!(err, BreakpointError::Target(TargetError::NonFatal)));
        assert!(table.is_empty());

        target.fail_reads = false;
        table.insert(&mut target, 0x2000).unwrap();

        target.fail_writes = true;
        assert!(table.remove(&mut target, 0x2000).is_err());
        assert_eq!(table.len(), 1);
    }
}
