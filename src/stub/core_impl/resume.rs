use super::prelude::*;
use crate::arch::RegId;
use crate::protocol::commands::{c, s};
use crate::target::TargetResult;

enum ExecKind {
    Step,
    Continue,
}

impl<T: Target> GdbStubImpl<T> {
    pub(crate) fn handle_step<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
        cmd: s,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        self.handle_exec(res, target, cmd.addr, ExecKind::Step)
    }

    pub(crate) fn handle_continue<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
        cmd: c,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        self.handle_exec(res, target, cmd.addr, ExecKind::Continue)
    }

    fn handle_exec<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
        addr: Option<u32>,
        kind: ExecKind,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        if let Some(addr) = addr {
            target.write_register(RegId::Pc, addr);
        }

        let mut interrupt = interrupt_poll(res.as_conn());
        let result: TargetResult<(), T> = match kind {
            ExecKind::Step => target.step(&mut interrupt),
            ExecKind::Continue => target.resume(&mut interrupt),
        };

        // no stop reply on failure, and a later interrupt gets none either
        match result.handle_error() {
            Ok(()) => Ok(HandlerStatus::StopTrap),
            Err(Error::NonFatalError(code)) => {
                error!("execution failed (errno {}); not replying", code);
                Ok(HandlerStatus::NoReply)
            }
            Err(e) => Err(e),
        }
    }
}
