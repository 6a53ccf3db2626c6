use super::breakpoint::BasicBreakpoint;
use super::prelude::*;

/// Insert a breakpoint.
#[derive(PartialEq, Eq, Debug)]
pub struct Z(pub BasicBreakpoint);

impl<'a> ParseCommand<'a> for Z {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        BasicBreakpoint::from_slice(buf.as_body()).map(Z)
    }
}
