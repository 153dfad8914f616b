use std::io::{self, Write};

use tracing::Level;

use crate::log_buffer::{LogWriter, global_log};

/// Where one formatted event goes: the activity log when installed, else stderr.
pub enum LogSink {
    Activity(LogWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    fn current() -> Self {
        match global_log() {
            Some(log) => LogSink::Activity(log.writer()),
            None => LogSink::Stderr(io::stderr()),
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Activity(writer) => writer.write(buf),
            LogSink::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Activity(writer) => writer.flush(),
            LogSink::Stderr(stderr) => stderr.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeskMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for DeskMakeWriter {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        LogSink::current()
    }
}

/// Parses a configured level name, falling back to `INFO`.
pub fn parse_level(name: &str) -> Level {
    name.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Installs the global subscriber. Output goes to the activity log buffer
/// when one is installed, otherwise to stderr. Later calls are no-ops.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(DeskMakeWriter)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
}
