//! Handle the commands GDB sends through its `monitor` command.
//!
//! The protocol core parses the command line (e.g: `monitor rd wram.bin`) and
//! calls into this extension. Replies are formatted by the core.
//!
//! | Command       | Method                    |
//! |---------------|---------------------------|
//! | `rd <file>`   | [`Monitor::dump_ram`]     |
//! | `tr <file>`   | [`Monitor::open_trace`]   |

use crate::target::{Target, TargetResult};

/// Target Extension - Backend-specific debug monitor commands.
pub trait Monitor: Target {
    /// Save a snapshot of the machine's work RAM to `path` on the host.
    fn dump_ram(&mut self, path: &str) -> TargetResult<(), Self>;

    /// Arrange for the next execution operation (`step` or `resume`) to log
    /// an instruction trace to `path` on the host.
    ///
    /// A non-fatal error means the file could not be opened, which is reported
    /// to the user as such.
    fn open_trace(&mut self, path: &str) -> TargetResult<(), Self>;
}

/// See [`Monitor`]
pub type MonitorOps<'a, T> = &'a mut dyn Monitor<Error = <T as Target>::Error>;
