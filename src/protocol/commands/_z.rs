use super::breakpoint::BasicBreakpoint;
use super::prelude::*;

/// Remove a breakpoint.
#[derive(PartialEq, Eq, Debug)]
pub struct z(pub BasicBreakpoint);

impl<'a> ParseCommand<'a> for z {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        BasicBreakpoint::from_slice(buf.as_body()).map(z)
    }
}
