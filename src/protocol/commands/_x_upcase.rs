use alloc::vec::Vec;

use super::prelude::*;
use crate::protocol::common::hex::unescape_bin;

#[derive(PartialEq, Eq, Debug)]
pub struct X {
    pub addr: u32,
    pub len: u32,
    /// Exactly `len` bytes of unescaped data.
    pub val: Vec<u8>,
}

impl<'a> ParseCommand<'a> for X {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let ([addr, len], data) =
            decode_hex_fields::<u32, 2>(buf.as_body(), [Some(b','), Some(b':')]).ok()?;
        let (val, consumed) = unescape_bin(data, len as usize).ok()?;
        if consumed != data.len() {
            warn!(
                "X packet carries {} trailing bytes past the declared length",
                data.len() - consumed
            );
        }
        Some(X { addr, len, val })
    }
}
