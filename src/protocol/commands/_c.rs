use super::prelude::*;

#[derive(PartialEq, Eq, Debug)]
pub struct c {
    /// Resume at this address instead of the current PC.
    pub addr: Option<u32>,
}

impl<'a> ParseCommand<'a> for c {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.into_body();
        if body.is_empty() {
            return Some(c { addr: None });
        }
        let addr = decode_hex(body).ok()?;
        Some(c { addr: Some(addr) })
    }
}
