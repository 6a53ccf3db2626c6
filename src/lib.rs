//! A bridge between GDB's [Remote Serial Protocol](https://sourceware.org/gdb/onlinedocs/gdb/Remote-Protocol.html)
//! and a 68000-based machine.
//!
//! `gdbbridge68k` sits between a GDB client and some 68000 execution backend
//! (a software emulator, a hardware monitor running on a real machine, or
//! both at once). It decodes GDB's framed packets, turns them into memory,
//! register and execution requests against a [`Target`](target::Target), and
//! encodes the replies back onto the wire.
//!
//! ## Getting started
//!
//! 1. Implement [`Target`](target::Target) for your backend.
//! 2. Wrap it in a [`DebugSession`](stub::DebugSession).
//! 3. Accept a connection (anything implementing
//!    [`ConnectionExt`](conn::ConnectionExt), e.g: a `TcpStream`) and hand it
//!    to [`DebugSession::run`](stub::DebugSession::run).
//!
//! ```rust,ignore
//! let mut session = DebugSession::new(my_target);
//! let listener = std::net::TcpListener::bind("127.0.0.1:9001")?;
//! for stream in listener.incoming() {
//!     let err = session.run(stream?);
//!     log::info!("GDB disconnected: {}", err);
//! }
//! ```
//!
//! The session (and with it, the breakpoint table) outlives individual
//! connections, so a debugger may drop and reconnect without losing state.
//!
//! ## Protocol coverage
//!
//! Only the small set of packets required to debug a single 68000 is
//! supported: `?`, `g`, `p`, `P`, `m`, `X`, `s`, `c`, `Z0`, `z0` and
//! `qRcmd`. Everything else is answered with an empty ("unsupported") reply,
//! which GDB treats as a normal part of feature negotiation.
//!
//! ## Features
//!
//! - `std` (default)
//!   - Implements [`Connection`](conn::Connection) for `TcpStream` and
//!     `UnixStream`.
//!   - Implements `std::error::Error` for the crate's error types.
//!   - Adds [`TargetError::Io`](target::TargetError::Io).
//! - `trace-pkt` (default)
//!   - Logs every incoming and outgoing packet via `trace!`.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
extern crate log;

pub mod arch;
pub mod conn;
pub mod protocol;
pub mod stub;
pub mod target;
pub mod util;

#[cfg(test)]
mod test_util;
