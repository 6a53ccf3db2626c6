use super::prelude::*;

#[derive(Debug)]
pub struct qRcmd<'a> {
    /// The decoded monitor command line.
    pub cmd: &'a [u8],
}

impl<'a> ParseCommand<'a> for qRcmd<'a> {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let cmd = decode_hex_buf(buf.into_body()).ok()?;
        Some(qRcmd { cmd })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_command_line() {
        let mut body = b"747220747261636524".to_vec();
        let pkt = qRcmd::from_packet(PacketBuf::new_with_raw_body(&mut body)).unwrap();
        assert_eq!(pkt.cmd, b"tr trace$");
    }

    #[test]
    fn rejects_bad_hex() {
        let mut body = b"7g".to_vec();
        assert!(qRcmd::from_packet(PacketBuf::new_with_raw_body(&mut body)).is_none());
    }
}
