use core::marker::PhantomData;

use crate::conn::ConnectionExt;
use crate::protocol::commands::{Command, CommandParseError};
use crate::protocol::{
    split_prefix, PacketBuf, PacketParseError, ResponseWriter, NACK, RESPONSE_EMPTY, RESPONSE_OK,
    RESPONSE_SIG,
};
use crate::target::{Target, TargetResult};

use super::breakpoints::BreakpointTable;
use super::builder::SessionOptions;
use super::error::GdbStubError as Error;
use self::target_result_ext::TargetResultExt;

/// Common imports used by every command handler.
mod prelude {
    pub(super) use crate::conn::ConnectionExt;
    pub(super) use crate::protocol::ResponseWriter;
    pub(super) use crate::stub::core_impl::target_result_ext::TargetResultExt;
    pub(super) use crate::stub::core_impl::{interrupt_poll, GdbStubImpl, HandlerStatus};
    pub(super) use crate::stub::error::GdbStubError as Error;
    pub(super) use crate::target::Target;
}

mod base;
mod breakpoints;
mod monitor_cmd;
mod resume;

pub(crate) mod target_result_ext {
    use crate::stub::error::GdbStubError;
    use crate::target::TargetError;

    /// Extension trait to ease working with `TargetResult` in the command
    /// handlers.
    pub(crate) trait TargetResultExt<V, T, C> {
        /// Encapsulates the boilerplate associated with handling
        /// `TargetError`s, such as bailing-out on Fatal errors, or
        /// returning response codes.
        fn handle_error(self) -> Result<V, GdbStubError<T, C>>;
    }

    impl<V, T, C> TargetResultExt<V, T, C> for Result<V, TargetError<T>> {
        fn handle_error(self) -> Result<V, GdbStubError<T, C>> {
            let code = match self {
                Ok(v) => return Ok(v),
                Err(TargetError::Fatal(e)) => return Err(GdbStubError::TargetError(e)),
                // Recoverable errors:
                // Error code 121 corresponds to `EREMOTEIO`
                Err(TargetError::NonFatal) => 121,
                Err(TargetError::Errno(code)) => code,
                #[cfg(feature = "std")]
                Err(TargetError::Io(e)) => e.raw_os_error().unwrap_or(121) as u8,
            };

            Err(GdbStubError::NonFatalError(code))
        }
    }
}

/// What to send once a command has been handled.
pub(crate) enum HandlerStatus {
    /// Send whatever the handler wrote into the `ResponseWriter`.
    Handled,
    /// Sends `OK`.
    NeedsOk,
    /// Command (or subcommand) isn't supported. Sends an empty reply.
    Unsupported,
    /// The target is halted. Sends `S05`.
    StopTrap,
    /// Send nothing at all.
    NoReply,
}

/// Build the interrupt callback handed to `step`, `resume` and `acquire`.
///
/// A transport error is reported as an interrupt, since there is no longer
/// anyone to wait for.
pub(crate) fn interrupt_poll<C: ConnectionExt>(conn: &mut C) -> impl FnMut() -> bool + '_ {
    move || match conn.poll_interrupt() {
        Ok(true) => {
            debug!("<-- interrupt");
            true
        }
        Ok(false) => false,
        Err(_) => {
            debug!("connection error while polling for an interrupt");
            true
        }
    }
}

pub(crate) struct GdbStubImpl<T: Target> {
    _target: PhantomData<T>,

    pub(crate) options: SessionOptions,
    pub(crate) breakpoints: BreakpointTable,
    packet_buffer_len: usize,
}

impl<T: Target> GdbStubImpl<T> {
    pub fn new(options: SessionOptions, packet_buffer_len: usize) -> GdbStubImpl<T> {
        GdbStubImpl {
            _target: PhantomData,
            options,
            breakpoints: BreakpointTable::new(),
            packet_buffer_len,
        }
    }

    /// Handle a single raw frame, as returned by the packet reader.
    ///
    /// Returns an error only if the connection should be torn down.
    pub fn handle_frame<C: ConnectionExt>(
        &mut self,
        target: &mut T,
        conn: &mut C,
        frame: &mut [u8],
    ) -> Result<(), Error<T::Error, C::Error>> {
        let (interrupts, frame) = split_prefix(frame);
        for _ in 0..interrupts {
            debug!("<-- interrupt (between packets)");
            let res = target.acquire(true, &mut interrupt_poll(conn));
            self.log_non_fatal::<C>("interrupt", res)?;
        }

        let verify = self.options.contains(SessionOptions::VERIFY_CHECKSUM);
        let buf = match PacketBuf::new(frame, verify) {
            Ok(buf) => buf,
            Err(PacketParseError::ChecksumMismatched {
                checksum,
                calculated,
            }) => {
                warn!(
                    "checksum mismatch: frame says {:02x}, body sums to {:02x}",
                    checksum, calculated
                );
                conn.write_all(NACK).map_err(Error::ConnectionWrite)?;
                conn.flush().map_err(Error::ConnectionWrite)?;
                return Ok(());
            }
            Err(e) => {
                warn!("discarding malformed frame: {:?}", e);
                return Ok(());
            }
        };

        let command = match Command::from_packet(buf) {
            Ok(command) => command,
            Err(CommandParseError::MalformedArgument(name)) => {
                warn!("malformed arguments to `{}` command", name);
                return Ok(());
            }
        };

        let mut res = ResponseWriter::new(conn);
        let status = match self.handle_command(&mut res, target, command) {
            Ok(status) => status,
            Err(Error::NonFatalError(code)) => {
                if self.options.contains(SessionOptions::ERRNO_REPLIES) {
                    res.write_str("E");
                    res.write_hex(code);
                    HandlerStatus::Handled
                } else {
                    error!("command failed with errno {}; not replying", code);
                    HandlerStatus::NoReply
                }
            }
            Err(e) => return Err(e),
        };

        match status {
            HandlerStatus::Handled => res.flush()?,
            HandlerStatus::NeedsOk => res.send_raw(RESPONSE_OK)?,
            HandlerStatus::Unsupported => res.send_raw(RESPONSE_EMPTY)?,
            HandlerStatus::StopTrap => res.send_raw(RESPONSE_SIG)?,
            HandlerStatus::NoReply => {}
        }

        Ok(())
    }

    fn handle_command<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
        command: Command<'_>,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        match command {
            Command::QuestionMark(_) => Ok(HandlerStatus::StopTrap),
            Command::g(_) => self.handle_read_registers(res, target),
            Command::p(cmd) => self.handle_read_register(res, target, cmd),
            Command::P(cmd) => self.handle_write_register::<C>(target, cmd),
            Command::m(cmd) => self.handle_read_memory(res, target, cmd),
            Command::X(cmd) => self.handle_write_memory::<C>(target, cmd),
            Command::s(cmd) => self.handle_step(res, target, cmd),
            Command::c(cmd) => self.handle_continue(res, target, cmd),
            Command::Z(cmd) => self.handle_insert_breakpoint::<C>(target, cmd),
            Command::z(cmd) => self.handle_remove_breakpoint::<C>(target, cmd),
            Command::qRcmd(cmd) => self.handle_monitor_cmd(res, target, cmd),
            Command::Unknown(cmd) => {
                info!(
                    "Unknown command: {:?}",
                    core::str::from_utf8(cmd).unwrap_or("<non-ascii>")
                );
                Ok(HandlerStatus::Unsupported)
            }
        }
    }

    /// Swallow (and log) a non-fatal target error. Fatal errors pass through.
    fn log_non_fatal<C: ConnectionExt>(
        &self,
        what: &str,
        result: TargetResult<(), T>,
    ) -> Result<(), Error<T::Error, C::Error>> {
        match result.handle_error() {
            Err(Error::NonFatalError(code)) => {
                error!("{} failed (errno {})", what, code);
                Ok(())
            }
            other => other,
        }
    }

    /// Like `log_non_fatal`, but only when errno replies are disabled.
    fn lenient<C: ConnectionExt>(
        &self,
        what: &str,
        result: TargetResult<(), T>,
    ) -> Result<(), Error<T::Error, C::Error>> {
        if self.options.contains(SessionOptions::ERRNO_REPLIES) {
            result.handle_error()
        } else {
            self.log_non_fatal::<C>(what, result)
        }
    }
}
