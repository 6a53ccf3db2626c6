//! Traits to perform in-order, serial, byte-wise I/O with a GDB client.

mod impls;

/// A trait to perform in-order, serial, byte-wise I/O.
///
/// When the `std` feature is enabled, this trait is automatically implemented
/// for [`TcpStream`](std::net::TcpStream) and
/// [`UnixStream`](std::os::unix::net::UnixStream) (on unix systems).
pub trait Connection {
    /// Transport-specific error type.
    type Error;

    /// Write a single byte.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write the entire buffer, blocking until complete.
    ///
    /// The default implementation calls `self.write()` on each byte. Every
    /// reply frame goes through this method, so transports with a bulk write
    /// primitive should override it.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        for b in buf {
            self.write(*b)?;
        }
        Ok(())
    }

    /// Flush any intermediately buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Called once per connection, before any packets are exchanged.
    ///
    /// The default implementation is a no-op. `TcpStream` uses it to enable
    /// `TCP_NODELAY`: the protocol is a lock-step exchange of tiny packets,
    /// and Nagle's algorithm would add a delay to every single one of them.
    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Extends [`Connection`] with `read` and `peek` methods.
///
/// This is the transport required by
/// [`DebugSession::run`](crate::stub::DebugSession::run): frames are pulled
/// with blocking reads, while a running target is interrupted by peeking for
/// an out-of-band `0x03` byte.
pub trait ConnectionExt: Connection {
    /// Read a single byte, blocking until one is available.
    fn read(&mut self) -> Result<u8, Self::Error>;

    /// Peek a single byte. This MUST be a **non-blocking** operation,
    /// returning `None` if no byte is available.
    ///
    /// Subsequent calls to `peek` MUST return the same byte.
    fn peek(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Check whether the client has sent an interrupt request, without
    /// blocking.
    ///
    /// A pending [`INTERRUPT`](crate::protocol::INTERRUPT) byte is consumed.
    /// Stray `+` acknowledgements ahead of it are dropped. Any other pending
    /// byte is left in place for the packet reader.
    fn poll_interrupt(&mut self) -> Result<bool, Self::Error> {
        loop {
            match self.peek()? {
                Some(b'+') => {
                    self.read()?;
                }
                Some(crate::protocol::INTERRUPT) => {
                    self.read()?;
                    return Ok(true);
                }
                _ => return Ok(false),
            }
        }
    }
}
