use super::prelude::*;

#[derive(PartialEq, Eq, Debug)]
pub struct g;

impl<'a> ParseCommand<'a> for g {
    fn from_packet(_buf: PacketBuf<'a>) -> Option<Self> {
        Some(g)
    }
}
