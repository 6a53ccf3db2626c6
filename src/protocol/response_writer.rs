use alloc::vec::Vec;

use crate::conn::Connection;
use crate::protocol::common::hex::encode_hex_bytes;
use crate::protocol::packet::build_frame;

/// Newtype around a Connection error. Having a newtype allows implementing a
/// `From<ResponseWriterError<C>> for GdbStubError<T, C>`, which greatly
/// simplifies error handling in the dispatcher.
#[derive(Debug, Clone)]
pub struct Error<C>(pub C);

/// Accumulates a reply payload, then frames, checksums and sends it in one
/// go.
///
/// Dropping a `ResponseWriter` without calling one of its consuming methods
/// sends nothing at all.
pub struct ResponseWriter<'a, C: Connection> {
    inner: &'a mut C,
    payload: Vec<u8>,
}

impl<'a, C: Connection + 'a> ResponseWriter<'a, C> {
    /// Creates a new ResponseWriter
    pub fn new(inner: &'a mut C) -> Self {
        Self {
            inner,
            payload: Vec::new(),
        }
    }

    /// Get a mutable reference to the underlying connection.
    pub fn as_conn(&mut self) -> &mut C {
        self.inner
    }

    /// Consumes self, acknowledging the request and sending the accumulated
    /// payload as a single frame.
    pub fn flush(self) -> Result<(), Error<C::Error>> {
        let frame = build_frame(&self.payload, true);
        Self::send(self.inner, &frame)
    }

    /// Consumes self, sending a pre-built frame verbatim. Any accumulated
    /// payload is discarded.
    pub fn send_raw(self, frame: &[u8]) -> Result<(), Error<C::Error>> {
        Self::send(self.inner, frame)
    }

    fn send(conn: &mut C, frame: &[u8]) -> Result<(), Error<C::Error>> {
        #[cfg(feature = "trace-pkt")]
        trace!("--> {}", alloc::string::String::from_utf8_lossy(frame));

        conn.write_all(frame).map_err(Error)?;
        conn.flush().map_err(Error)
    }

    /// Write an entire string.
    pub fn write_str(&mut self, s: &str) {
        self.payload.extend_from_slice(s.as_bytes());
    }

    /// Write a single byte as a hex string (two ascii chars)
    pub fn write_hex(&mut self, byte: u8) {
        encode_hex_bytes(&[byte], &mut self.payload);
    }

    /// Write a byte-buffer as a hex string (i.e: two ascii chars / byte).
    pub fn write_hex_buf(&mut self, data: &[u8]) {
        encode_hex_bytes(data, &mut self.payload);
    }
}
