//! Line-by-line capture of a process's **own** standard output and standard error.
//!
//! An embedding host (an SDK, a test harness, a supervisor) sometimes needs to
//! observe everything the surrounding program prints without touching the call
//! sites that print it. [`LogInterceptor`] does this at the descriptor level:
//! it installs an in-process pipe over fd 1 and fd 2, reassembles the bytes
//! flowing through into discrete lines, hands each line to a registered
//! [`LineObserver`], and tees the raw bytes back to the original destination so
//! the console (or whatever consumed the streams before) keeps working.
//!
//! Capture is strictly line-oriented; the crate does not parse, filter, or
//! persist log content, and it only covers the two standard streams of the
//! current process.
//!
//! Unix only: the mechanism is defined in terms of `pipe(2)`/`dup(2)`/`dup2(2)`
//! descriptor semantics.

mod capture;
mod duplicator;
mod error;
mod interceptor;
mod observer;
mod pipe;
mod stream;

pub use error::CaptureError;
pub use interceptor::LogInterceptor;
pub use observer::LineObserver;
pub use stream::StreamKind;
