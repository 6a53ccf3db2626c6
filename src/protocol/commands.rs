use crate::protocol::packet::PacketBuf;

/// Common imports used by most command parsers.
mod prelude {
    pub use super::ParseCommand;
    pub use crate::protocol::common::hex::{decode_hex, decode_hex_buf, decode_hex_fields};
    pub use crate::protocol::packet::PacketBuf;
}

/// Parse a command's arguments out of a packet body, with the command's
/// prefix already stripped.
pub trait ParseCommand<'a>: Sized {
    /// Returns `None` if the arguments are malformed.
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self>;
}

macro_rules! commands {
    ($($name:literal => $mod:ident::$command:ident$(<$lifetime:lifetime>)?,)*) => {
        $(
            #[allow(non_snake_case, non_camel_case_types)]
            pub mod $mod;
        )*
        $(pub use $mod::$command;)*

        /// Supported GDB commands.
        #[allow(non_camel_case_types)]
        #[derive(Debug)]
        pub enum Command<'a> {
            $($command($command<$($lifetime)?>),)*
            /// Any other command. Replied to with an empty packet.
            Unknown(&'a [u8]),
        }

        impl<'a> Command<'a> {
            /// Identify the command by its prefix, and parse its arguments.
            pub fn from_packet(mut buf: PacketBuf<'a>) -> Result<Command<'a>, CommandParseError> {
                $(
                    if buf.strip_prefix($name.as_bytes()) {
                        return $command::from_packet(buf)
                            .map(Command::$command)
                            .ok_or(CommandParseError::MalformedArgument($name));
                    }
                )*

                Ok(Command::Unknown(buf.into_body()))
            }
        }
    };
}

/// Command parse error
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// The command was recognised, but its arguments could not be parsed.
    MalformedArgument(&'static str),
}

pub mod breakpoint;

commands! {
    "?" => question_mark::QuestionMark,
    "c" => _c::c,
    "g" => _g::g,
    "m" => _m::m,
    "p" => _p::p,
    "P" => _p_upcase::P,
    "qRcmd," => _qRcmd::qRcmd<'a>,
    "s" => _s::s,
    "X" => _x_upcase::X,
    "z" => _z::z,
    "Z" => _z_upcase::Z,
}
