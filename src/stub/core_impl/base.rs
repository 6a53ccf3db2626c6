use alloc::vec;

use super::prelude::*;
use crate::arch::{M68kRegs, RegId, ADDR_MASK};
use crate::protocol::commands::{m, p, P, X};

impl<T: Target> GdbStubImpl<T> {
    pub(crate) fn handle_read_registers<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        // registers are only authoritative once the target is halted
        let acquired = target.acquire(false, &mut interrupt_poll(res.as_conn()));
        self.lenient::<C>("acquire", acquired)?;

        let mut regs = M68kRegs::default();
        for reg in RegId::all() {
            regs.set(reg, target.read_register(reg));
        }

        let mut raw = vec![];
        regs.gdb_serialize(|b| raw.push(b));
        res.write_hex_buf(&raw);
        Ok(HandlerStatus::Handled)
    }

    pub(crate) fn handle_read_register<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
        cmd: p,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        let reg = match RegId::from_raw_id(cmd.reg_id) {
            Some(reg) => reg,
            None => return Ok(HandlerStatus::Unsupported),
        };

        res.write_hex_buf(&target.read_register(reg).to_be_bytes());
        Ok(HandlerStatus::Handled)
    }

    pub(crate) fn handle_write_register<C: ConnectionExt>(
        &mut self,
        target: &mut T,
        cmd: P,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        match RegId::from_raw_id(cmd.reg_id) {
            Some(reg) => target.write_register(reg, cmd.val),
            None => warn!("ignoring write to unknown register {}", cmd.reg_id),
        }
        Ok(HandlerStatus::NeedsOk)
    }

    pub(crate) fn handle_read_memory<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
        cmd: m,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        let addr = cmd.addr & ADDR_MASK;

        // `$` + two hex chars per byte + `#hh` must fit in the packet buffer
        let max_len = self.packet_buffer_len.saturating_sub(4) / 2;
        let len = (cmd.len as usize).min(max_len);
        if len < cmd.len as usize {
            debug!("clamping {}-byte read to {} bytes", cmd.len, len);
        }
        if len == 0 {
            return Ok(HandlerStatus::Handled);
        }

        let mut buf = vec![0; len];
        let read = target.read_addrs(addr, &mut buf);
        self.lenient::<C>("memory read", read)?;

        res.write_hex_buf(&buf);
        Ok(HandlerStatus::Handled)
    }

    pub(crate) fn handle_write_memory<C: ConnectionExt>(
        &mut self,
        target: &mut T,
        cmd: X,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        let addr = cmd.addr & ADDR_MASK;
        if cmd.len == 0 {
            return Ok(HandlerStatus::NeedsOk);
        }
        if addr & 1 != 0 || cmd.len & 1 != 0 {
            warn!("Nonaligned write: {} bytes to {:#08x}", cmd.len, addr);
            return Ok(HandlerStatus::NeedsOk);
        }

        let written = target.write_addrs(addr, &cmd.val);
        self.lenient::<C>("memory write", written)?;
        Ok(HandlerStatus::NeedsOk)
    }
}
