use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;

use crate::conn::{Connection, ConnectionExt};

/// `MSG_PEEK` flavoured `recv(2)`.
///
/// `UnixStream::peek` is still unstable (rust-lang/rust#76923), so the
/// syscall is declared inline rather than pulling in `libc` for one function.
#[allow(non_camel_case_types)]
fn recv_peek(stream: &UnixStream, buf: &mut [u8]) -> io::Result<usize> {
    use core::ffi::c_void;
    use std::os::unix::io::AsRawFd;

    type c_int = i32;
    type size_t = usize;
    type ssize_t = isize;
    const MSG_PEEK: c_int = 2;
    extern "C" {
        fn recv(socket: c_int, buf: *mut c_void, len: size_t, flags: c_int) -> ssize_t;
    }

    // SAFETY: `buf` is a valid, writable allocation of `buf.len()` bytes, and
    // the fd is owned by `stream` for the duration of the call.
    let ret = unsafe {
        recv(
            stream.as_raw_fd(),
            buf.as_mut_ptr() as *mut c_void,
            buf.len(),
            MSG_PEEK,
        )
    };
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret as usize)
    }
}

impl Connection for UnixStream {
    type Error = io::Error;

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        Write::write_all(self, &[byte])
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        Write::write_all(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(self)
    }
}

impl ConnectionExt for UnixStream {
    fn read(&mut self) -> Result<u8, Self::Error> {
        self.set_nonblocking(false)?;

        let mut buf = [0u8];
        Read::read_exact(self, &mut buf)?;
        Ok(buf[0])
    }

    fn peek(&mut self) -> Result<Option<u8>, Self::Error> {
        self.set_nonblocking(true)?;

        let mut buf = [0u8];
        match recv_peek(self, &mut buf) {
            Ok(0) => Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_and_poll_interrupt() {
        let (mut ours, mut theirs) = UnixStream::pair().unwrap();

        assert_eq!(ConnectionExt::peek(&mut ours).unwrap(), None);
        assert!(!ours.poll_interrupt().unwrap());

        Write::write_all(&mut theirs, b"+\x03$").unwrap();
        assert!(ours.poll_interrupt().unwrap());
        assert_eq!(ConnectionExt::peek(&mut ours).unwrap(), Some(b'$'));
        assert!(!ours.poll_interrupt().unwrap());
        assert_eq!(ConnectionExt::read(&mut ours).unwrap(), b'$');

        drop(theirs);
        assert!(ConnectionExt::peek(&mut ours).is_err());
    }
}
