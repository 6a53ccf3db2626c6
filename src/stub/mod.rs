//! The core [`DebugSession`] type, used to drive GDB debugging sessions for a
//! particular [`Target`] over a sequence of [`ConnectionExt`] connections.

use alloc::vec;
use managed::ManagedSlice;

use crate::conn::ConnectionExt;
use crate::protocol::{RecvPacketBlocking, RecvPacketError};
use crate::target::Target;

mod breakpoints;
mod builder;
mod core_impl;
mod error;

pub use breakpoints::{BreakpointEntry, BreakpointError, BreakpointTable, BREAKPOINT_SLOTS};
pub use builder::{DebugSessionBuilder, DebugSessionBuilderError, DEFAULT_PACKET_BUFFER_SIZE};
pub use error::GdbStubError;

use builder::SessionOptions;
use core_impl::GdbStubImpl;

/// Debug a [`Target`] using the GDB Remote Serial Protocol.
///
/// A `DebugSession` owns the target and the breakpoint table, and outlives
/// any individual connection: a client may disconnect and reconnect without
/// losing its breakpoints.
pub struct DebugSession<'a, T: Target> {
    target: T,
    packet_buffer: ManagedSlice<'a, u8>,
    inner: GdbStubImpl<T>,
}

impl<T: Target> DebugSession<'static, T> {
    /// Create a new `DebugSession` with default options and a heap-allocated
    /// 4096 byte packet buffer.
    ///
    /// For fine-grained control over the session's options, use the
    /// [`DebugSession::builder`] method instead.
    pub fn new(target: T) -> DebugSession<'static, T> {
        DebugSession {
            target,
            packet_buffer: ManagedSlice::Owned(vec![0; DEFAULT_PACKET_BUFFER_SIZE]),
            inner: GdbStubImpl::new(SessionOptions::default(), DEFAULT_PACKET_BUFFER_SIZE),
        }
    }

    /// Create a [`DebugSessionBuilder`] wrapping the provided target.
    pub fn builder(target: T) -> DebugSessionBuilder<'static, T> {
        DebugSessionBuilder::new(target)
    }
}

impl<'a, T: Target> DebugSession<'a, T> {
    /// Get a reference to the target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Get a mutable reference to the target.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Consume the session, returning the target.
    ///
    /// Any breakpoints still in the table are left patched into target
    /// memory.
    pub fn into_target(self) -> T {
        self.target
    }

    /// The currently active breakpoints.
    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.inner.breakpoints
    }

    /// Serve a single GDB connection until it fails.
    ///
    /// Frames are read one at a time, and each one is fully answered before
    /// the next is read. The connection only ends on an error (which includes
    /// the client hanging up), which is returned to the caller. The session
    /// can then be run again on a new connection.
    pub fn run<C>(&mut self, mut conn: C) -> GdbStubError<T::Error, C::Error>
    where
        C: ConnectionExt,
    {
        if let Err(e) = conn.on_session_start() {
            return GdbStubError::ConnectionInit(e);
        }
        info!("GDB client connected");

        let mut recv = RecvPacketBlocking::new();
        loop {
            let frame = match recv.recv(&mut self.packet_buffer, || conn.read()) {
                Ok(frame) => frame,
                Err(RecvPacketError::Capacity) => return GdbStubError::PacketBufferOverflow,
                Err(RecvPacketError::Connection(e)) => return GdbStubError::ConnectionRead(e),
            };

            if let Err(e) = self.inner.handle_frame(&mut self.target, &mut conn, frame) {
                return e;
            }
        }
    }
}
