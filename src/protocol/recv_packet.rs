use managed::ManagedSlice;

use crate::util::managed_vec::{CapacityError, ManagedVec};

pub enum RecvPacketError<C> {
    Capacity,
    Connection(C),
}

impl<C> From<CapacityError<u8>> for RecvPacketError<C> {
    fn from(_: CapacityError<u8>) -> Self {
        RecvPacketError::Capacity
    }
}

/// Receives a raw frame by pulling data from a callback (typically backed by
/// a blocking `ConnectionExt::read`).
///
/// Bytes are accumulated until a `#` is seen, followed by exactly two
/// checksum bytes. Everything before the body (acks, stray `$`, interrupt
/// bytes) is kept in the buffer for the dispatcher to deal with.
pub struct RecvPacketBlocking {}

impl RecvPacketBlocking {
    pub fn new() -> Self {
        RecvPacketBlocking {}
    }

    pub fn recv<'b, C>(
        &mut self,
        packet_buffer: &'b mut ManagedSlice<'_, u8>,
        mut get_byte: impl FnMut() -> Result<u8, C>,
    ) -> Result<&'b mut [u8], RecvPacketError<C>> {
        // Wrap the buf in a `ManagedVec` to keep the code readable.
        let mut buf = ManagedVec::new(packet_buffer);
        buf.clear();

        let mut hash_seen = false;
        let mut checksum_bytes = 0;
        while checksum_bytes < 2 {
            let c = get_byte().map_err(RecvPacketError::Connection)?;
            if let Err(e) = buf.push(c) {
                error!("frame does not fit in a {} byte packet buffer", buf.capacity());
                return Err(e.into());
            }

            if hash_seen {
                checksum_bytes += 1;
            } else if c == b'#' {
                hash_seen = true;
            }
        }

        #[cfg(feature = "trace-pkt")]
        trace!("<-- {}", alloc::string::String::from_utf8_lossy(buf.as_slice()).escape_debug());

        let len = buf.len();
        drop(buf);

        Ok(&mut packet_buffer[..len])
    }
}
