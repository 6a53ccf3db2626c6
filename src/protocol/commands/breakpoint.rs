use crate::protocol::common::hex::decode_hex_fields;

// Breakpoint packets are split up like this:
//
// Z0,addr,kind[;cond_list…][;cmds:persist,cmd_list…]
//  \_________/
//       |
//     BasicBreakpoint
//
// Conditions and commands are not supported, and make the packet malformed.

#[derive(PartialEq, Eq, Debug)]
pub struct BasicBreakpoint {
    pub type_: u32,
    pub addr: u32,
    /// For software breakpoints, the size of the instruction to replace.
    pub kind: u32,
}

impl BasicBreakpoint {
    pub fn from_slice(body: &[u8]) -> Option<BasicBreakpoint> {
        let ([type_, addr, kind], _) =
            decode_hex_fields(body, [Some(b','), Some(b','), None]).ok()?;
        Some(BasicBreakpoint { type_, addr, kind })
    }
}
