use std::io;
use std::os::unix::prelude::{AsRawFd, RawFd};

/// Owned TTY file descriptor in raw mode.
pub(crate) struct Uart(pub(crate) RawFd);

impl Drop for Uart {
    fn drop(&mut self) {
        unsafe {
            libc::ioctl(self.0, libc::TIOCNXCL);
            libc::close(self.0);
        }
    }
}

impl AsRawFd for Uart {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl io::Read for Uart {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = unsafe { libc::read(self.0, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };

        if len >= 0 {
            Ok(len as usize)
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

impl io::Write for Uart {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = unsafe { libc::write(self.0, buf.as_ptr() as *const libc::c_void, buf.len()) };

        if len >= 0 {
            Ok(len as usize)
        } else {
            Err(io::Error::last_os_error())
        }
    }

    // Sentences are handed to the kernel as a whole; waiting for the line to
    // drain would stall the translation loop at low baud rates.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
