use core::fmt::{self, Display};

use alloc::vec;
use managed::ManagedSlice;

use crate::target::Target;

use super::core_impl::GdbStubImpl;
use super::DebugSession;

/// Packet buffer size used when none is specified.
pub const DEFAULT_PACKET_BUFFER_SIZE: usize = 4096;

/// An error which may occur when building a [`DebugSession`].
#[derive(Debug)]
pub enum DebugSessionBuilderError {
    /// Custom packet buffer size is larger than the provided buffer's length.
    PacketBufSizeMismatch,
    /// The packet buffer cannot even hold an empty frame (`$#00`).
    PacketBufTooSmall,
}

impl Display for DebugSessionBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::DebugSessionBuilderError::*;
        match self {
            PacketBufSizeMismatch => write!(
                f,
                "`packet_buffer_size` is larger than `with_packet_buffer`'s size."
            ),
            PacketBufTooSmall => write!(f, "packet buffer must hold at least 4 bytes."),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DebugSessionBuilderError {}

#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub(crate) struct SessionOptions(u8);

bitflags::bitflags! {
    impl SessionOptions: u8 {
        const VERIFY_CHECKSUM = 1 << 0;
        const ERRNO_REPLIES = 1 << 1;
    }
}

impl Default for SessionOptions {
    fn default() -> SessionOptions {
        SessionOptions::VERIFY_CHECKSUM | SessionOptions::ERRNO_REPLIES
    }
}

/// Helper to construct and customize a [`DebugSession`].
pub struct DebugSessionBuilder<'a, T: Target> {
    target: T,
    packet_buffer: Option<&'a mut [u8]>,
    packet_buffer_size: Option<usize>,
    options: SessionOptions,
}

impl<'a, T: Target> DebugSessionBuilder<'a, T> {
    /// Create a new `DebugSessionBuilder` wrapping the provided target.
    pub fn new(target: T) -> DebugSessionBuilder<'static, T> {
        DebugSessionBuilder {
            target,
            packet_buffer: None,
            packet_buffer_size: None,
            options: SessionOptions::default(),
        }
    }

    /// Use a pre-allocated packet buffer (instead of heap-allocating).
    pub fn with_packet_buffer(mut self, packet_buffer: &'a mut [u8]) -> Self {
        self.packet_buffer = Some(packet_buffer);
        self
    }

    /// Specify a custom size for the packet buffer. Defaults to 4096 bytes.
    ///
    /// When used alongside `with_packet_buffer`, the provided `size` must be
    /// less than or equal to the length of the packet buffer.
    ///
    /// The buffer bounds both incoming frames (a larger frame ends the
    /// connection) and the length of a single `m` reply.
    pub fn packet_buffer_size(mut self, size: usize) -> Self {
        self.packet_buffer_size = Some(size);
        self
    }

    /// Verify the checksum of incoming frames, replying `-` on a mismatch.
    /// Defaults to `true`.
    ///
    /// When disabled, the checksum is still required to be present and
    /// well-formed, but its value is ignored.
    pub fn verify_checksums(mut self, enabled: bool) -> Self {
        self.options.set(SessionOptions::VERIFY_CHECKSUM, enabled);
        self
    }

    /// Report recoverable failures to GDB as `E<hh>` replies. Defaults to
    /// `true`.
    ///
    /// When disabled, such failures are only logged. Breakpoint failures get
    /// no reply at all, and memory accesses are reported as having succeeded.
    /// Some old front-ends rely on this behavior.
    pub fn errno_replies(mut self, enabled: bool) -> Self {
        self.options.set(SessionOptions::ERRNO_REPLIES, enabled);
        self
    }

    /// Build the DebugSession, returning an error if something went wrong.
    pub fn build(self) -> Result<DebugSession<'a, T>, DebugSessionBuilderError> {
        let packet_buffer = match self.packet_buffer {
            Some(buf) => {
                let buf = match self.packet_buffer_size {
                    Some(custom_len) => {
                        if custom_len > buf.len() {
                            return Err(DebugSessionBuilderError::PacketBufSizeMismatch);
                        } else {
                            &mut buf[..custom_len]
                        }
                    }
                    None => buf,
                };
                ManagedSlice::Borrowed(buf)
            }
            None => {
                let len = self
                    .packet_buffer_size
                    .unwrap_or(DEFAULT_PACKET_BUFFER_SIZE);
                ManagedSlice::Owned(vec![0; len])
            }
        };

        if packet_buffer.len() < 4 {
            return Err(DebugSessionBuilderError::PacketBufTooSmall);
        }

        Ok(DebugSession {
            target: self.target,
            inner: GdbStubImpl::new(self.options, packet_buffer.len()),
            packet_buffer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::FakeTarget;

    #[test]
    fn defaults() {
        let session = DebugSessionBuilder::new(FakeTarget::new()).build().unwrap();
        assert_eq!(session.packet_buffer.len(), DEFAULT_PACKET_BUFFER_SIZE);
        assert!(session.inner.options.contains(SessionOptions::VERIFY_CHECKSUM));
        assert!(session.inner.options.contains(SessionOptions::ERRNO_REPLIES));
    }

    #[test]
    fn options() {
        let session = DebugSessionBuilder::new(FakeTarget::new())
            .verify_checksums(false)
            .errno_replies(false)
            .packet_buffer_size(64)
            .build()
            .unwrap();
        assert_eq!(session.packet_buffer.len(), 64);
        assert!(session.inner.options.is_empty());
    }

    #[test]
    fn borrowed_buffer() {
        let mut buf = [0u8; 128];
        let session = DebugSessionBuilder::new(FakeTarget::new())
            .with_packet_buffer(&mut buf)
            .packet_buffer_size(100)
            .build()
            .unwrap();
        assert_eq!(session.packet_buffer.len(), 100);

        let mut buf = [0u8; 16];
        assert!(matches!(
            DebugSessionBuilder::new(FakeTarget::new())
                .with_packet_buffer(&mut buf)
                .packet_buffer_size(32)
                .build(),
            Err(DebugSessionBuilderError::PacketBufSizeMismatch)
        ));
    }

    #[test]
    fn tiny_buffer() {
        assert!(matches!(
            DebugSessionBuilder::new(FakeTarget::new())
                .packet_buffer_size(3)
                .build(),
            Err(DebugSessionBuilderError::PacketBufTooSmall)
        ));
    }
}
