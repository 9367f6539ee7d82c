use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use crate::stream::StreamKind;

fn dup(fd: i32) -> io::Result<OwnedFd> {
    let duped = unsafe { libc::dup(fd) };
    if duped < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(unsafe { OwnedFd::from_raw_fd(duped) })
}

/// A duplicate of one stream's original descriptor, taken before redirection.
///
/// Holds the only durable reference to wherever the stream pointed before
/// `start`; dropping it after [`SavedStream::restore`] releases that
/// reference.
pub(crate) struct SavedStream {
    kind: StreamKind,
    fd: OwnedFd,
}

impl SavedStream {
    /// Duplicates the stream's current descriptor into private storage.
    pub(crate) fn save(kind: StreamKind) -> io::Result<Self> {
        Ok(Self {
            kind,
            fd: dup(kind.fd())?,
        })
    }

    /// Re-installs the saved descriptor over the stream slot.
    ///
    /// Idempotent; works regardless of what currently occupies the slot, so
    /// it still succeeds after the pipe write end was closed out from under
    /// the redirection.
    pub(crate) fn restore(&self) -> io::Result<()> {
        if unsafe { libc::dup2(self.fd.as_raw_fd(), self.kind.fd()) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// A second duplicate for the capture worker's tee writes.
    ///
    /// The worker owns its own descriptor so the controller can restore and
    /// release this one without racing in-flight write-throughs.
    pub(crate) fn duplicate_for_tee(&self) -> io::Result<TeeWriter> {
        Ok(TeeWriter {
            fd: dup(self.fd.as_raw_fd())?,
        })
    }
}

/// Write-through handle onto one stream's original destination.
pub(crate) struct TeeWriter {
    fd: OwnedFd,
}

impl TeeWriter {
    /// Writes the bytes exactly as captured, retrying short writes and EINTR.
    pub(crate) fn write_through(&self, bytes: &[u8]) -> io::Result<()> {
        let mut written = 0;
        while written < bytes.len() {
            let rest = &bytes[written..];
            let n = unsafe {
                libc::write(
                    self.fd.as_raw_fd(),
                    rest.as_ptr() as *const libc::c_void,
                    rest.len(),
                )
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "write to original stream returned 0",
                ));
            }
            written += n as usize;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_owned(fd: OwnedFd) -> Self {
        Self { fd }
    }
}
