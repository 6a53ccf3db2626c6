use super::prelude::*;
use crate::protocol::commands::breakpoint::BasicBreakpoint;
use crate::protocol::commands::{z, Z};
use crate::stub::breakpoints::BreakpointError;

enum CmdKind {
    Add,
    Remove,
}

impl<T: Target> GdbStubImpl<T> {
    fn handle_breakpoint_common<C: ConnectionExt>(
        &mut self,
        target: &mut T,
        cmd: BasicBreakpoint,
        cmd_kind: CmdKind,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        if cmd.type_ != 0 {
            warn!("unsupported breakpoint type: {}", cmd.type_);
            return Ok(HandlerStatus::NoReply);
        }

        let result = match cmd_kind {
            CmdKind::Add => self.breakpoints.insert(target, cmd.addr),
            CmdKind::Remove => self.breakpoints.remove(target, cmd.addr),
        };

        match result {
            Ok(()) => Ok(HandlerStatus::NeedsOk),
            Err(BreakpointError::Target(e)) => Err(e).handle_error(),
            Err(e) => {
                let code = e.errno().unwrap_or(121);
                let verb = match cmd_kind {
                    CmdKind::Add => "insert",
                    CmdKind::Remove => "remove",
                };
                warn!("cannot {} breakpoint at {:#x} (errno {})", verb, cmd.addr, code);
                Err(Error::NonFatalError(code))
            }
        }
    }

    pub(crate) fn handle_insert_breakpoint<C: ConnectionExt>(
        &mut self,
        target: &mut T,
        cmd: Z,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        self.handle_breakpoint_common::<C>(target, cmd.0, CmdKind::Add)
    }

    pub(crate) fn handle_remove_breakpoint<C: ConnectionExt>(
        &mut self,
        target: &mut T,
        cmd: z,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        self.handle_breakpoint_common::<C>(target, cmd.0, CmdKind::Remove)
    }
}
