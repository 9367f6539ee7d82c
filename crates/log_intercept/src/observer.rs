/// Receives every complete line captured from the redirected streams.
///
/// Invoked synchronously from the capture worker thread, with the line
/// terminator already stripped. Observers must return promptly and must not
/// write to stdout/stderr themselves while capture is active: those bytes
/// would re-enter the pipe the worker is reading from.
pub trait LineObserver: Send + Sync + 'static {
    fn on_line(&self, line: &str);
}

impl<F> LineObserver for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn on_line(&self, line: &str) {
        self(line)
    }
}
