use alloc::format;
use alloc::string::String;

use super::prelude::*;
use crate::protocol::commands::qRcmd;

const HELP: &str = "\
rd <file>  save a snapshot of work RAM to <file>
tr <file>  save a trace of the next step/continue to <file>
help       show this message
";

impl<T: Target> GdbStubImpl<T> {
    pub(crate) fn handle_monitor_cmd<C: ConnectionExt>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        target: &mut T,
        cmd: qRcmd<'_>,
    ) -> Result<HandlerStatus, Error<T::Error, C::Error>> {
        let line = String::from_utf8_lossy(cmd.cmd);
        let line: &str = &line;

        let reply = match target.support_monitor() {
            None => format!("{}: not supported by this target\n", line),
            Some(ops) => {
                if let Some(file) = line.strip_prefix("rd ") {
                    ops.dump_ram(file).handle_error()?;
                    format!("OK, WRAM snapshot saved to {}\n", file)
                } else if let Some(file) = line.strip_prefix("tr ") {
                    match ops.open_trace(file).handle_error() {
                        Ok(()) => format!(
                            "OK, a trace of the next execution operation will be saved to {}\n",
                            file
                        ),
                        Err(Error::NonFatalError(_)) => {
                            format!("Unable to open {} for writing!\n", file)
                        }
                        Err(e) => return Err(e),
                    }
                } else if line.trim() == "help" {
                    String::from(HELP)
                } else {
                    format!("Unrecognised command: {}\n", line)
                }
            }
        };

        res.write_hex_buf(reply.as_bytes());
        Ok(HandlerStatus::Handled)
    }
}
