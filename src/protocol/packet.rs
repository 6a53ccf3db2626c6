use alloc::vec::Vec;

use crate::protocol::common::hex::{decode_hex_byte, encode_hex_bytes};

/// The out-of-band "interrupt" (Ctrl-C) byte.
pub const INTERRUPT: u8 = 0x03;

/// Positive acknowledgement + `OK`.
pub const RESPONSE_OK: &[u8] = b"+$OK#9A";
/// Positive acknowledgement + empty payload ("command not supported").
pub const RESPONSE_EMPTY: &[u8] = b"+$#00";
/// Positive acknowledgement + a `SIGTRAP` stop reply.
pub const RESPONSE_SIG: &[u8] = b"+$S05#B8";
/// Negative acknowledgement, asking the client to retransmit.
pub const NACK: &[u8] = b"-";

/// Packet parse error.
#[derive(Debug, PartialEq, Eq)]
pub enum PacketParseError {
    /// Nothing was left once the leading `+`, `$` and interrupt bytes were
    /// stripped.
    IncompleteFrame,
    /// No `#` terminator.
    MissingChecksum,
    /// The two bytes after `#` are not a hex number.
    MalformedChecksum,
    /// The checksum doesn't match the body.
    ChecksumMismatched {
        /// The checksum sent after `#`.
        checksum: u8,
        /// The checksum of the body as received.
        calculated: u8,
    },
}

/// Sum of all payload bytes, mod 256.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |a, x| a.wrapping_add(*x))
}

/// Frame `payload` as `$<payload>#<hh>`, optionally preceded by a `+`
/// acknowledgement.
pub fn build_frame(payload: &[u8], ack: bool) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 5);
    if ack {
        frame.push(b'+');
    }
    frame.push(b'$');
    frame.extend_from_slice(payload);
    frame.push(b'#');
    encode_hex_bytes(&[checksum(payload)], &mut frame);
    frame
}

/// Split the leading `+`, `$` and [`INTERRUPT`] bytes off a raw frame.
///
/// Returns the number of interrupt bytes found, and the remainder of the
/// frame.
pub fn split_prefix(buf: &mut [u8]) -> (usize, &mut [u8]) {
    let mut interrupts = 0;
    let mut start = 0;
    for &b in buf.iter() {
        match b {
            INTERRUPT => interrupts += 1,
            b'+' | b'$' => {}
            _ => break,
        }
        start += 1;
    }
    (interrupts, &mut buf[start..])
}

/// A validated packet body, borrowed from the packet buffer.
pub struct PacketBuf<'a> {
    buf: &'a mut [u8],
    body_range: core::ops::Range<usize>,
}

impl<'a> PacketBuf<'a> {
    /// Validate the remainder of a raw frame (as returned by
    /// [`split_prefix`]), checking for structural correctness and, if
    /// `verify` is set, checksum consistency.
    pub fn new(frame: &'a mut [u8], verify: bool) -> Result<PacketBuf<'a>, PacketParseError> {
        if frame.is_empty() {
            return Err(PacketParseError::IncompleteFrame);
        }

        let hash = frame
            .iter()
            .position(|&b| b == b'#')
            .ok_or(PacketParseError::MissingChecksum)?;
        if hash == 0 {
            return Err(PacketParseError::IncompleteFrame);
        }

        let checksum = match frame.get(hash + 1..hash + 3) {
            Some(&[hi, lo]) => decode_hex_byte([hi, lo]),
            _ => return Err(PacketParseError::MalformedChecksum),
        }
        .map_err(|_| PacketParseError::MalformedChecksum)?;

        if verify {
            let calculated = self::checksum(&frame[..hash]);
            if calculated != checksum {
                return Err(PacketParseError::ChecksumMismatched {
                    checksum,
                    calculated,
                });
            }
        }

        Ok(PacketBuf {
            buf: frame,
            body_range: 0..hash,
        })
    }

    /// (used for tests) Create a packet buffer from a raw body, skipping the
    /// checksum stage entirely.
    #[cfg(test)]
    pub fn new_with_raw_body(body: &'a mut [u8]) -> PacketBuf<'a> {
        let len = body.len();
        PacketBuf {
            buf: body,
            body_range: 0..len,
        }
    }

    /// If the body starts with `prefix`, strip it and return `true`.
    pub fn strip_prefix(&mut self, prefix: &[u8]) -> bool {
        if self.as_body().starts_with(prefix) {
            self.body_range.start += prefix.len();
            true
        } else {
            false
        }
    }

    /// The current body.
    pub fn as_body(&self) -> &[u8] {
        &self.buf[self.body_range.clone()]
    }

    /// Return a mut reference to the slice of the packet buffer corresponding
    /// to the current body.
    pub fn into_body(self) -> &'a mut [u8] {
        &mut self.buf[self.body_range]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_of_ok() {
        assert_eq!(checksum(b"OK"), 0x9a);
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn canned_responses_are_well_formed() {
        assert_eq!(build_frame(b"OK", true), RESPONSE_OK);
        assert_eq!(build_frame(b"", true), RESPONSE_EMPTY);
        assert_eq!(build_frame(b"S05", true), RESPONSE_SIG);
        assert_eq!(build_frame(b"OK", false), b"$OK#9A");
    }

    #[test]
    fn ok_frame_is_recognised() {
        let mut frame = RESPONSE_OK.to_vec();
        let (interrupts, rest) = split_prefix(&mut frame);
        assert_eq!(interrupts, 0);
        let pkt = PacketBuf::new(rest, true).unwrap();
        assert_eq!(pkt.as_body(), b"OK");
    }

    #[test]
    fn prefix_counts_interrupts() {
        let mut frame = b"+\x03$\x03$g#67".to_vec();
        let (interrupts, rest) = split_prefix(&mut frame);
        assert_eq!(interrupts, 2);
        assert_eq!(rest, b"g#67");
    }

    #[test]
    fn prefix_only() {
        let mut frame = b"++\x03".to_vec();
        let (interrupts, rest) = split_prefix(&mut frame);
        assert_eq!(interrupts, 1);
        assert!(rest.is_empty());
        assert_eq!(
            PacketBuf::new(rest, true).err(),
            Some(PacketParseError::IncompleteFrame)
        );
    }

    #[test]
    fn checksum_verification() {
        let mut frame = b"g#00".to_vec();
        assert_eq!(
            PacketBuf::new(&mut frame, true).err(),
            Some(PacketParseError::ChecksumMismatched {
                checksum: 0,
                calculated: 0x67
            })
        );

        let mut frame = b"g#00".to_vec();
        assert!(PacketBuf::new(&mut frame, false).is_ok());
    }

    #[test]
    fn structural_errors() {
        let mut frame = b"g".to_vec();
        assert_eq!(
            PacketBuf::new(&mut frame, false).err(),
            Some(PacketParseError::MissingChecksum)
        );

        let mut frame = b"#00".to_vec();
        assert_eq!(
            PacketBuf::new(&mut frame, false).err(),
            Some(PacketParseError::IncompleteFrame)
        );

        let mut frame = b"g#6".to_vec();
        assert_eq!(
            PacketBuf::new(&mut frame, false).err(),
            Some(PacketParseError::MalformedChecksum)
        );

        let mut frame = b"g#zz".to_vec();
        assert_eq!(
            PacketBuf::new(&mut frame, false).err(),
            Some(PacketParseError::MalformedChecksum)
        );
    }

    #[test]
    fn strip_prefix_advances_body() {
        let mut body = b"qRcmd,6864".to_vec();
        let mut pkt = PacketBuf::new_with_raw_body(&mut body);
        assert!(!pkt.strip_prefix(b"qSupported"));
        assert!(pkt.strip_prefix(b"qRcmd,"));
        assert_eq!(pkt.as_body(), b"6864");
    }
}
