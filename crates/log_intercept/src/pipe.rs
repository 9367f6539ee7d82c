use std::fs::File;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use crate::stream::StreamKind;

/// One unidirectional in-process pipe, allocated per captured stream.
pub(crate) struct RedirectPipe {
    read: OwnedFd,
    write: OwnedFd,
}

impl RedirectPipe {
    pub(crate) fn create() -> io::Result<Self> {
        let mut fds = [0 as libc::c_int; 2];
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self {
            read: unsafe { OwnedFd::from_raw_fd(fds[0]) },
            write: unsafe { OwnedFd::from_raw_fd(fds[1]) },
        })
    }

    /// Installs the write end over the stream slot and returns the read end.
    ///
    /// The original write end is released here, leaving the stream slot as
    /// the pipe's only write reference: restoring the slot later drops that
    /// reference and the reader observes end-of-stream. On error both ends
    /// are released and the slot is untouched.
    pub(crate) fn install(self, kind: StreamKind) -> io::Result<File> {
        if unsafe { libc::dup2(self.write.as_raw_fd(), kind.fd()) } < 0 {
            return Err(io::Error::last_os_error());
        }
        drop(self.write);
        Ok(File::from(self.read))
    }
}
