use alloc::boxed::Box;

use crate::conn::{Connection, ConnectionExt};

// Lets a server hand out TCP and unix socket connections through one
// `DebugSession::run` call site.
impl<'a, E> Connection for Box<dyn ConnectionExt<Error = E> + 'a> {
    type Error = E;

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write(byte)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }

    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        (**self).on_session_start()
    }
}

impl<'a, E> ConnectionExt for Box<dyn ConnectionExt<Error = E> + 'a> {
    fn read(&mut self) -> Result<u8, Self::Error> {
        (**self).read()
    }

    fn peek(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).peek()
    }

    fn poll_interrupt(&mut self) -> Result<bool, Self::Error> {
        (**self).poll_interrupt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RESPONSE_SIG;
    use crate::stub::{DebugSession, GdbStubError};
    use crate::test_util::{FakeTarget, MockConnection};

    #[test]
    fn session_over_boxed_connection() {
        let mut mock = MockConnection::new(b"$?#3f");
        let conn: Box<dyn ConnectionExt<Error = &'static str> + '_> = Box::new(&mut mock);

        let mut session = DebugSession::new(FakeTarget::new());
        let err = session.run(conn);
        assert!(matches!(err, GdbStubError::ConnectionRead("eof")));
        assert_eq!(mock.output, RESPONSE_SIG);
        assert_eq!(mock.session_starts, 1);
    }
}
