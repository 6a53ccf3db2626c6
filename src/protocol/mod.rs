//! Low-level GDB Remote Serial Protocol plumbing: framing, hex codecs and
//! command parsing.
//!
//! Most users will never touch this module directly. It is exposed so that
//! backends and tools can reuse the same codec the session uses (e.g: to
//! pre-build canned replies, or to decode a captured packet log).

mod common;
mod recv_packet;
mod response_writer;

pub(crate) mod commands;
/// Frame constants, checksums and incoming packet validation.
pub mod packet;

pub use common::hex::{
    decode_hex, decode_hex_buf, decode_hex_byte, decode_hex_fields, encode_hex_bytes,
    unescape_bin, DecodeBinError, DecodeHexError,
};
pub use packet::{
    build_frame, checksum, split_prefix, PacketBuf, PacketParseError, INTERRUPT, NACK,
    RESPONSE_EMPTY, RESPONSE_OK, RESPONSE_SIG,
};

pub(crate) use recv_packet::{RecvPacketBlocking, RecvPacketError};
pub(crate) use response_writer::{Error as ResponseWriterError, ResponseWriter};
