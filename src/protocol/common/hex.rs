use alloc::vec::Vec;

use num_traits::{CheckedAdd, CheckedMul, FromPrimitive, Zero};

/// An error which may occur while decoding hex.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeHexError {
    /// A character outside `[0-9a-fA-F]`.
    NotHex,
    /// No digits at all.
    Empty,
    /// The value doesn't fit in the output type.
    Overflow,
    /// The output type can't represent a hex digit.
    InvalidOutput,
    /// A field was not followed by the expected delimiter.
    MissingDelimiter(u8),
}

#[inline]
fn ascii2byte(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn nybble2ascii(n: u8) -> u8 {
    match n & 0xf {
        n @ 0x0..=0x9 => b'0' + n,
        n => b'A' + (n - 0xa),
    }
}

/// Decode a big-endian hex string into the specified integer.
pub fn decode_hex<I>(buf: &[u8]) -> Result<I, DecodeHexError>
where
    I: FromPrimitive + Zero + CheckedAdd + CheckedMul,
{
    use DecodeHexError::*;

    let radix = I::from_u8(16).ok_or(InvalidOutput)?;

    if buf.is_empty() {
        return Err(Empty);
    }

    let mut result = I::zero();

    for &digit in buf {
        let x = I::from_u8(ascii2byte(digit).ok_or(NotHex)?).ok_or(InvalidOutput)?;
        result = result.checked_mul(&radix).ok_or(Overflow)?;
        result = result.checked_add(&x).ok_or(Overflow)?
    }

    Ok(result)
}

/// Decode a single two-character hex pair (high nybble first).
pub fn decode_hex_byte(pair: [u8; 2]) -> Result<u8, DecodeHexError> {
    let hi = ascii2byte(pair[0]).ok_or(DecodeHexError::NotHex)?;
    let lo = ascii2byte(pair[1]).ok_or(DecodeHexError::NotHex)?;
    Ok(hi << 4 | lo)
}

/// Decode a hex string into a byte slice _in place_.
///
/// An odd-length string is treated as if it had a leading `0`.
pub fn decode_hex_buf(base_buf: &mut [u8]) -> Result<&mut [u8], DecodeHexError> {
    let odd_adjust = base_buf.len() % 2;
    if odd_adjust != 0 {
        base_buf[0] = ascii2byte(base_buf[0]).ok_or(DecodeHexError::NotHex)?;
    }
    let buf = &mut base_buf[odd_adjust..];

    let decoded_len = buf.len() / 2;
    for i in 0..decoded_len {
        buf[i] = decode_hex_byte([buf[i * 2], buf[i * 2 + 1]])?;
    }

    Ok(&mut base_buf[..decoded_len + odd_adjust])
}

/// Append the uppercase hex encoding of `bytes` to `out`.
pub fn encode_hex_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.reserve(bytes.len() * 2);
    for &b in bytes {
        out.push(nybble2ascii(b >> 4));
        out.push(nybble2ascii(b));
    }
}

/// Parse a run of hex integers, each terminated by the matching entry of
/// `delims`.
///
/// `Some(b)` means the field ends at the next `b` (which is consumed), and
/// `None` means the field runs to the end of the input. Returns the decoded
/// fields alongside whatever input was left over.
///
/// e.g: `decode_hex_fields::<u32, 2>(b"1000,4:...", [Some(b','), Some(b':')])`
pub fn decode_hex_fields<I, const N: usize>(
    buf: &[u8],
    delims: [Option<u8>; N],
) -> Result<([I; N], &[u8]), DecodeHexError>
where
    I: FromPrimitive + Zero + CheckedAdd + CheckedMul + Copy,
{
    let mut fields = [I::zero(); N];
    let mut rest = buf;

    for (field, delim) in fields.iter_mut().zip(delims.iter()) {
        let (digits, tail) = match *delim {
            Some(d) => {
                let idx = rest
                    .iter()
                    .position(|&b| b == d)
                    .ok_or(DecodeHexError::MissingDelimiter(d))?;
                (&rest[..idx], &rest[idx + 1..])
            }
            None => (rest, &rest[rest.len()..]),
        };
        *field = decode_hex(digits)?;
        rest = tail;
    }

    Ok((fields, rest))
}

/// An error which may occur while unescaping binary data.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeBinError {
    /// The input ran out before the requested number of bytes was decoded.
    Truncated {
        /// Bytes decoded before the input ran out.
        decoded: usize,
    },
}

/// Decode `len` bytes of escaped binary data.
///
/// `}` is the escape character: it is dropped, and the byte following it is
/// XOR'd with `0x20`. Returns the decoded data and the number of input bytes
/// consumed.
pub fn unescape_bin(input: &[u8], len: usize) -> Result<(Vec<u8>, usize), DecodeBinError> {
    let mut out = Vec::with_capacity(len);
    let mut i = 0;

    while out.len() < len {
        let truncated = DecodeBinError::Truncated { decoded: out.len() };
        match *input.get(i).ok_or(truncated)? {
            b'}' => {
                let escaped = *input
                    .get(i + 1)
                    .ok_or(DecodeBinError::Truncated { decoded: out.len() })?;
                out.push(escaped ^ 0x20);
                i += 2;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    Ok((out, i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn decode_hex_simple() {
        assert_eq!(decode_hex::<u32>(b"1000"), Ok(0x1000));
        assert_eq!(decode_hex::<u32>(b"CaFe"), Ok(0xcafe));
        assert_eq!(decode_hex::<u32>(b""), Err(DecodeHexError::Empty));
        assert_eq!(decode_hex::<u32>(b"12g4"), Err(DecodeHexError::NotHex));
        assert_eq!(decode_hex::<u8>(b"100"), Err(DecodeHexError::Overflow));
    }

    #[test]
    fn decode_hex_byte_rejects_garbage() {
        assert_eq!(decode_hex_byte(*b"9a"), Ok(0x9a));
        assert_eq!(decode_hex_byte(*b"xx"), Err(DecodeHexError::NotHex));
        assert_eq!(decode_hex_byte(*b"0 "), Err(DecodeHexError::NotHex));
    }

    #[test]
    fn hex_byte_round_trip() {
        let all = (0..=255).collect::<Vec<u8>>();
        let mut out = Vec::new();
        encode_hex_bytes(&all, &mut out);
        for (b, pair) in all.iter().zip(out.chunks(2)) {
            assert_eq!(decode_hex_byte([pair[0], pair[1]]), Ok(*b));
        }
    }

    #[test]
    fn encode_is_uppercase() {
        let mut out = Vec::new();
        encode_hex_bytes(&[0xde, 0xad, 0xbe, 0xef, 0x01], &mut out);
        assert_eq!(out, b"DEADBEEF01");
    }

    #[test]
    fn decode_hex_buf_odd() {
        let mut payload = b"ffffff4".to_vec();
        let res = decode_hex_buf(&mut payload).unwrap();
        assert_eq!(res, [0xf, 0xff, 0xff, 0xf4]);
    }

    #[test]
    fn decode_hex_buf_text() {
        let mut payload = b"7264206f75742e62696e".to_vec();
        let res = decode_hex_buf(&mut payload).unwrap();
        assert_eq!(res, b"rd out.bin");
    }

    #[test]
    fn fields_with_trailing_data() {
        let (fields, rest) =
            decode_hex_fields::<u32, 2>(b"1000,4:\x01\x02", [Some(b','), Some(b':')]).unwrap();
        assert_eq!(fields, [0x1000, 4]);
        assert_eq!(rest, b"\x01\x02");
    }

    #[test]
    fn fields_to_end_of_input() {
        let (fields, rest) =
            decode_hex_fields::<u32, 3>(b"0,2000,0", [Some(b','), Some(b','), None]).unwrap();
        assert_eq!(fields, [0, 0x2000, 0]);
        assert!(rest.is_empty());
    }

    #[test]
    fn fields_malformed() {
        assert_eq!(
            decode_hex_fields::<u32, 2>(b"1000;4", [Some(b','), None]),
            Err(DecodeHexError::MissingDelimiter(b','))
        );
        assert_eq!(
            decode_hex_fields::<u32, 2>(b",4", [Some(b','), None]),
            Err(DecodeHexError::Empty)
        );
        assert_eq!(
            decode_hex_fields::<u32, 2>(b"10z0,4", [Some(b','), None]),
            Err(DecodeHexError::NotHex)
        );
    }

    #[test]
    fn unescape_space() {
        assert_eq!(unescape_bin(&[0x7d, 0x20], 1), Ok((vec![0x00], 2)));
    }

    #[test]
    fn unescape_counts_decoded_bytes() {
        // `}]` decodes to `}`, and the trailing byte is left alone
        let input = [0x01, 0x7d, 0x5d, 0x02, 0xff];
        assert_eq!(unescape_bin(&input, 3), Ok((vec![0x01, 0x7d, 0x02], 4)));
    }

    #[test]
    fn unescape_truncated() {
        assert_eq!(
            unescape_bin(&[0x01], 2),
            Err(DecodeBinError::Truncated { decoded: 1 })
        );
        assert_eq!(
            unescape_bin(&[0x01, 0x7d], 2),
            Err(DecodeBinError::Truncated { decoded: 1 })
        );
    }
}
