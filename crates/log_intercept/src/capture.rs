use std::fs::File;
use std::io::{ErrorKind, Read};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::duplicator::TeeWriter;
use crate::observer::LineObserver;
use crate::stream::StreamKind;

const CHUNK_SIZE_BYTES: usize = 4096;

/// Drains one redirected stream until end-of-stream.
///
/// Blocks reading the pipe in `CHUNK_SIZE_BYTES` chunks and splits the bytes
/// at `\n`. Each complete line is decoded (invalid UTF-8 replaced, `\r` from
/// `\r\n` left in the text), handed to the observer, and teed byte-exact —
/// terminator included — to the original destination. A non-empty accumulator
/// at end-of-stream is emitted as a final unterminated line, so no trailing
/// bytes are lost on shutdown.
pub(crate) fn run(kind: StreamKind, mut pipe: File, tee: TeeWriter, observer: Arc<dyn LineObserver>) {
    let mut chunk = [0u8; CHUNK_SIZE_BYTES];
    let mut pending: Vec<u8> = Vec::new();
    let mut tee_failed = false;

    loop {
        let n = match pipe.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                // The slot holds the only write reference; any other read
                // error is indistinguishable from closure.
                debug!(stream = %kind, error = %err, "capture read failed, treating as end-of-stream");
                break;
            }
        };

        let mut rest = &chunk[..n];
        while let Some(idx) = rest.iter().position(|b| *b == b'\n') {
            pending.extend_from_slice(&rest[..=idx]);
            rest = &rest[idx + 1..];

            let text_len = pending.len() - 1;
            observer.on_line(&String::from_utf8_lossy(&pending[..text_len]));
            tee_line(kind, &tee, &pending, &mut tee_failed);
            pending.clear();
        }
        pending.extend_from_slice(rest);
    }

    if !pending.is_empty() {
        observer.on_line(&String::from_utf8_lossy(&pending));
        tee_line(kind, &tee, &pending, &mut tee_failed);
    }
    debug!(stream = %kind, "capture loop exited");
}

fn tee_line(kind: StreamKind, tee: &TeeWriter, bytes: &[u8], tee_failed: &mut bool) {
    if let Err(err) = tee.write_through(bytes) {
        // Non-fatal: the observer already received the line.
        if !*tee_failed {
            warn!(stream = %kind, error = %err, "write-through to original destination failed");
            *tee_failed = true;
        }
    }
}
