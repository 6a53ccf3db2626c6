use super::prelude::*;

#[derive(PartialEq, Eq, Debug)]
pub struct m {
    pub addr: u32,
    pub len: u32,
}

impl<'a> ParseCommand<'a> for m {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let ([addr, len], _) = decode_hex_fields(buf.as_body(), [Some(b','), None]).ok()?;
        Some(m { addr, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_m() {
        let mut body = b"1000,4".to_vec();
        let pkt = m::from_packet(PacketBuf::new_with_raw_body(&mut body));
        assert_eq!(pkt, Some(m { addr: 0x1000, len: 4 }));
    }

    #[test]
    fn parse_m_malformed() {
        for body in [&b"1000"[..], b"1000,", b",4", b"10g0,4"].iter() {
            let mut body = body.to_vec();
            assert!(m::from_packet(PacketBuf::new_with_raw_body(&mut body)).is_none());
        }
    }
}
