use std::fmt;
use std::os::fd::RawFd;

/// One of the two captured standard streams.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub(crate) const ALL: [StreamKind; 2] = [StreamKind::Stdout, StreamKind::Stderr];

    /// The process stream slot this kind occupies.
    pub(crate) fn fd(self) -> RawFd {
        match self {
            StreamKind::Stdout => libc::STDOUT_FILENO,
            StreamKind::Stderr => libc::STDERR_FILENO,
        }
    }

    pub(crate) fn worker_name(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout-capture",
            StreamKind::Stderr => "stderr-capture",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        })
    }
}
