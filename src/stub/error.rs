use core::fmt::{self, Debug, Display};

use crate::protocol::ResponseWriterError;

/// An error which ends a GDB connection.
///
/// Returned by [`DebugSession::run`](super::DebugSession::run). None of these
/// errors poison the session itself: the caller is free to accept a new
/// connection and call `run` again.
#[derive(Debug)]
#[non_exhaustive]
pub enum GdbStubError<T, C> {
    /// Connection Error while initializing the session.
    ConnectionInit(C),
    /// Connection Error while reading request. This includes the client
    /// hanging up.
    ConnectionRead(C),
    /// Connection Error while writing response.
    ConnectionWrite(C),
    /// Packet cannot fit in the packet buffer.
    PacketBufferOverflow,
    /// Target encountered a fatal error.
    TargetError(T),

    // Internal - A non-fatal error occurred (with errno-style error code)
    //
    // This "dummy" error is required as part of the internal
    // `TargetResultExt::handle_error()` machinery, and will never be
    // propagated up to the end user.
    #[doc(hidden)]
    NonFatalError(u8),
}

impl<T, C> From<ResponseWriterError<C>> for GdbStubError<T, C> {
    fn from(e: ResponseWriterError<C>) -> Self {
        GdbStubError::ConnectionWrite(e.0)
    }
}

impl<T, C> Display for GdbStubError<T, C>
where
    C: Debug,
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::GdbStubError::*;
        match self {
            ConnectionInit(e) => write!(f, "Connection Error while initializing the session: {:?}", e),
            ConnectionRead(e) => write!(f, "Connection Error while reading request: {:?}", e),
            ConnectionWrite(e) => write!(f, "Connection Error while writing response: {:?}", e),
            PacketBufferOverflow => write!(f, "Packet too big for the packet buffer!"),
            TargetError(e) => write!(f, "Target threw a fatal error: {:?}", e),

            NonFatalError(code) => write!(f, "Internal non-fatal error (errno {}). This should have been reported to the client!", code),
        }
    }
}

#[cfg(feature = "std")]
impl<T, C> std::error::Error for GdbStubError<T, C>
where
    C: Debug,
    T: Debug,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display() {
        let e: GdbStubError<&str, &str> = GdbStubError::ConnectionRead("eof");
        assert_eq!(
            e.to_string(),
            "Connection Error while reading request: \"eof\""
        );

        let e: GdbStubError<&str, &str> = GdbStubError::TargetError("bus fault");
        assert_eq!(e.to_string(), "Target threw a fatal error: \"bus fault\"");
    }

    #[test]
    fn conversions() {
        let e: GdbStubError<(), u8> = ResponseWriterError(7u8).into();
        assert!(matches!(e, GdbStubError::ConnectionWrite(7)));
    }
}
