use super::prelude::*;

#[derive(PartialEq, Eq, Debug)]
pub struct P {
    pub reg_id: usize,
    pub val: u32,
}

impl<'a> ParseCommand<'a> for P {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.as_body();
        let eq = body.iter().position(|&b| b == b'=')?;
        let reg_id = decode_hex(&body[..eq]).ok()?;
        let val = decode_hex(&body[eq + 1..]).ok()?;
        Some(P { reg_id, val })
    }
}
