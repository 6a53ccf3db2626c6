//! The interface between the protocol core and a 68000 execution backend.
//!
//! A backend might be a software emulator running in-process, a bridge to a
//! debug monitor running on real hardware, or a [`Multiplex`](mux::Multiplex)
//! of the two. Either way, the protocol core only ever sees the [`Target`]
//! trait.
//!
//! ## Handling non-fatal errors
//!
//! Memory accesses and execution control return a [`TargetResult`], which can
//! carry either a recoverable [`TargetError::NonFatal`] /
//! [`TargetError::Errno`] (reported back to GDB, the session carries on), or a
//! [`TargetError::Fatal`] error (the connection is torn down, and
//! [`DebugSession::run`](crate::stub::DebugSession::run) returns it to the
//! caller).
//!
//! ## Interrupts
//!
//! `step`, `resume` and `acquire` may block for an unbounded amount of time.
//! Each of them receives an `interrupt` callback which performs a
//! non-blocking check of the connection. Once it returns `true`, the GDB
//! client has asked for the target to be halted (or has gone away), and the
//! backend should stop at the next safe point and return.
//!
//! ## Optional extensions
//!
//! Functionality not every backend can offer is exposed through "Inlineable
//! Dyn Extension Traits": the backend implements the extension trait, then
//! overrides the matching `support_` method on [`Target`] to return
//! `Some(self)`.
//!
//! ```rust,ignore
//! impl Target for MyBackend {
//!     fn support_monitor(&mut self) -> Option<MonitorOps<'_, Self>> {
//!         Some(self)
//!     }
//! }
//! ```

use crate::arch::RegId;

pub mod ext;
pub mod mux;

/// The error type for [`Target`] methods.
#[derive(Debug)]
pub enum TargetError<E> {
    /// A non-specific, non-fatal error. Reported to GDB as `EREMOTEIO`.
    NonFatal,
    /// An errno-style, non-fatal error code.
    Errno(u8),
    /// A backend-specific **fatal** error.
    ///
    /// Returning this error ends the current connection, and
    /// `DebugSession::run` hands it back to the caller wrapped in
    /// `GdbStubError::TargetError`. The session itself survives, and may be
    /// run again once the error has been dealt with.
    Fatal(E),
    /// A non-fatal I/O error. The raw OS error code is reported to GDB when
    /// available.
    #[cfg(feature = "std")]
    Io(std::io::Error),
}

/// Converts a `()` into a `TargetError::NonFatal`.
impl<E> From<()> for TargetError<E> {
    fn from(_: ()) -> TargetError<E> {
        TargetError::NonFatal
    }
}

#[cfg(feature = "std")]
impl<E> From<std::io::Error> for TargetError<E> {
    fn from(e: std::io::Error) -> TargetError<E> {
        TargetError::Io(e)
    }
}

/// A specialized `Result` type for [`Target`] operations.
pub type TargetResult<T, Tgt> = Result<T, TargetError<<Tgt as Target>::Error>>;

/// A 68000 execution backend which can be debugged by a
/// [`DebugSession`](crate::stub::DebugSession).
pub trait Target {
    /// A backend-specific **fatal** error.
    type Error;

    /// Read `data.len()` bytes starting at `start_addr`.
    ///
    /// Addresses arrive already masked to the 68000's 24-bit address space.
    fn read_addrs(&mut self, start_addr: u32, data: &mut [u8]) -> TargetResult<(), Self>;

    /// Write `data` starting at `start_addr`.
    ///
    /// The protocol core only issues word-aligned, even-length writes.
    fn write_addrs(&mut self, start_addr: u32, data: &[u8]) -> TargetResult<(), Self>;

    /// Read a register's current value.
    ///
    /// Only meaningful while the target is halted. SR is zero-extended to 32
    /// bits.
    fn read_register(&mut self, reg: RegId) -> u32;

    /// Set a register. Backends which only store 16 bits of SR truncate.
    fn write_register(&mut self, reg: RegId, val: u32);

    /// Execute a single instruction, then halt.
    fn step(&mut self, interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self>;

    /// Run until a breakpoint (or any other trap) is hit, or until `interrupt`
    /// reports a pending interrupt request.
    fn resume(&mut self, interrupt: &mut dyn FnMut() -> bool) -> TargetResult<(), Self>;

    /// Take control of the target, blocking until it is halted at a point
    /// where memory and registers are authoritative.
    ///
    /// `interrupt_requested` is `true` when the client sent an interrupt
    /// byte, in which case a running target must be forced to halt. This
    /// method must be idempotent when the target is already halted.
    fn acquire(
        &mut self,
        interrupt_requested: bool,
        interrupt: &mut dyn FnMut() -> bool,
    ) -> TargetResult<(), Self>;

    /// Support for the GDB `monitor` command.
    #[inline(always)]
    fn support_monitor(&mut self) -> Option<ext::monitor::MonitorOps<'_, Self>> {
        None
    }
}
