//! `tracing` output for environments without stderr.
//!
//! The browser build has no terminal, so log lines are handed to a sink
//! function together with their level; `web` passes one that calls the
//! matching `console` method. Each event is buffered and delivered as one
//! line when the formatter drops its writer.

use std::io;
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

pub struct LineWriter<S: Fn(Level, &str)> {
    level: Level,
    buf: Vec<u8>,
    sink: S,
}

impl<S: Fn(Level, &str)> io::Write for LineWriter<S> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Fn(Level, &str)> Drop for LineWriter<S> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        (self.sink)(self.level, line.trim_end());
    }
}

#[derive(Clone)]
pub struct MakeLineWriter<S> {
    sink: S,
}

impl<S> MakeLineWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<'a, S> MakeWriter<'a> for MakeLineWriter<S>
where
    S: Fn(Level, &str) + Clone + 'a,
{
    type Writer = LineWriter<S>;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            level: Level::INFO,
            buf: Vec::new(),
            sink: self.sink.clone(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        LineWriter {
            level: *meta.level(),
            buf: Vec::new(),
            sink: self.sink.clone(),
        }
    }
}

/// A plain-text subscriber writing through `sink`. No timestamps: the
/// browser console adds its own, and `wasm32` has no system clock.
pub fn subscriber<S>(sink: S, max_level: Level) -> impl Subscriber + Send + Sync + 'static
where
    S: Fn(Level, &str) + Clone + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(MakeLineWriter::new(sink))
        .with_max_level(max_level)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish()
}
