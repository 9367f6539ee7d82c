use std::io;

use thiserror::Error;

use crate::stream::StreamKind;

/// Setup failures reported by [`crate::LogInterceptor::start`].
///
/// Every variant leaves the process unredirected: `start` rolls back any
/// stream it had already redirected before returning one of these.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to duplicate the original {stream} descriptor: {source}")]
    Duplicate {
        stream: StreamKind,
        source: io::Error,
    },
    #[error("failed to create the redirect pipe for {stream}: {source}")]
    Pipe {
        stream: StreamKind,
        source: io::Error,
    },
    #[error("failed to install the redirect pipe over {stream}: {source}")]
    Install {
        stream: StreamKind,
        source: io::Error,
    },
    #[error("failed to spawn the {stream} capture worker: {source}")]
    WorkerSpawn {
        stream: StreamKind,
        source: io::Error,
    },
}
