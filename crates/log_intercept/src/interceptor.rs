use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::{debug, warn};

use crate::capture;
use crate::duplicator::SavedStream;
use crate::error::CaptureError;
use crate::observer::LineObserver;
use crate::pipe::RedirectPipe;
use crate::stream::StreamKind;

/// Captures the process's own stdout/stderr line by line.
///
/// While redirecting, every byte written to fd 1 or fd 2 flows through an
/// in-process pipe: a capture worker reassembles the bytes into lines,
/// invokes the observer once per line, and tees the raw bytes back to the
/// stream's original destination.
///
/// Each stream gets its own pipe and worker, so lines of one stream are
/// delivered in write order but the relative interleaving of stdout and
/// stderr lines is unspecified.
///
/// `start` and `stop` are idempotent and safe to call from different
/// threads; dropping the interceptor while redirecting behaves as an
/// implicit `stop`. The stream slots are process-wide: running more than one
/// interceptor at a time is unsupported.
pub struct LogInterceptor {
    observer: Arc<dyn LineObserver>,
    state: Mutex<State>,
}

enum State {
    Idle,
    Redirecting(Vec<CapturedStream>),
}

struct CapturedStream {
    kind: StreamKind,
    saved: SavedStream,
    worker: thread::JoinHandle<()>,
}

impl LogInterceptor {
    /// Stores the observer. Touches no OS state until [`start`](Self::start).
    pub fn new(observer: impl LineObserver) -> Self {
        Self {
            observer: Arc::new(observer),
            state: Mutex::new(State::Idle),
        }
    }

    /// Begins redirecting both standard streams. No-op while already
    /// redirecting.
    ///
    /// On error nothing stays redirected: any stream redirected before the
    /// failure is restored, and the interceptor remains idle so the call can
    /// be retried.
    pub fn start(&self) -> Result<(), CaptureError> {
        let mut state = self.lock_state();
        if matches!(*state, State::Redirecting(_)) {
            return Ok(());
        }

        // Buffered pre-capture output belongs to the original destination,
        // not the pipe.
        flush_host_streams();

        let mut captured = Vec::with_capacity(StreamKind::ALL.len());
        for kind in StreamKind::ALL {
            match self.redirect_stream(kind) {
                Ok(stream) => captured.push(stream),
                Err(err) => {
                    restore_streams(captured);
                    return Err(err);
                }
            }
        }

        *state = State::Redirecting(captured);
        debug!("standard stream capture started");
        Ok(())
    }

    /// Ends redirecting and restores the original streams. No-op while idle.
    ///
    /// Blocks until both capture workers have observed end-of-stream and
    /// drained, so every byte written before this call has been delivered
    /// (a trailing unterminated line is flushed as its own observation).
    pub fn stop(&self) {
        let mut state = self.lock_state();
        let State::Redirecting(captured) = std::mem::replace(&mut *state, State::Idle) else {
            return;
        };

        // The slots still point at the pipes here, so buffered bytes drain
        // through capture instead of being lost.
        flush_host_streams();

        restore_streams(captured);
        debug!("standard stream capture stopped");
    }

    fn redirect_stream(&self, kind: StreamKind) -> Result<CapturedStream, CaptureError> {
        let saved = SavedStream::save(kind).map_err(|source| CaptureError::Duplicate {
            stream: kind,
            source,
        })?;
        let tee = saved
            .duplicate_for_tee()
            .map_err(|source| CaptureError::Duplicate {
                stream: kind,
                source,
            })?;
        let pipe = RedirectPipe::create().map_err(|source| CaptureError::Pipe {
            stream: kind,
            source,
        })?;
        let reader = pipe.install(kind).map_err(|source| CaptureError::Install {
            stream: kind,
            source,
        })?;

        let observer = Arc::clone(&self.observer);
        let worker = thread::Builder::new()
            .name(kind.worker_name().to_string())
            .spawn(move || capture::run(kind, reader, tee, observer));
        let worker = match worker {
            Ok(worker) => worker,
            Err(source) => {
                // The slot is already redirected with nobody reading; undo it
                // before reporting.
                if let Err(err) = saved.restore() {
                    warn!(stream = %kind, error = %err, "failed to restore stream after spawn failure");
                }
                return Err(CaptureError::WorkerSpawn {
                    stream: kind,
                    source,
                });
            }
        };

        Ok(CapturedStream { kind, saved, worker })
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for LogInterceptor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Restores each slot, then joins its drained worker.
///
/// Re-installing the saved descriptor drops the pipe's last write reference,
/// which is what makes the worker's next read return end-of-stream.
fn restore_streams(captured: Vec<CapturedStream>) {
    for stream in captured {
        match stream.saved.restore() {
            Ok(()) => {
                if stream.worker.join().is_err() {
                    warn!(stream = %stream.kind, "capture worker panicked");
                }
            }
            Err(err) => {
                // The slot still holds the pipe write end, so the worker will
                // not see end-of-stream; detach it rather than hang.
                warn!(stream = %stream.kind, error = %err, "failed to restore original stream, detaching capture worker");
                drop(stream.worker);
            }
        }
    }
}

fn flush_host_streams() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}
