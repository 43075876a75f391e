//! Standard streams and terminal capabilities.
//!
//! [`IoStreams`] bundles the process's output writers with the facts
//! commands need about them: which streams are terminals, whether prompting
//! is allowed, and which pager to pipe long output through.
//!
//! Writers are shared handles, so a clone of an `IoStreams` writes to the
//! same place. [`IoStreams::test`] swaps in in-memory buffers.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use ghx::iostreams::IoStreams;
//!
//! let (io, buffers) = IoStreams::test();
//! writeln!(io.out(), "hello").unwrap();
//! assert_eq!(buffers.stdout(), "hello\n");
//! assert!(!io.can_prompt());
//! ```

mod pager;

pub use pager::PagedOutput;

use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};

use console::Term;

type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// A cloneable writer over a shared sink.
#[derive(Clone)]
pub struct StreamWriter {
    sink: SharedSink,
}

impl StreamWriter {
    fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }
}

impl Write for StreamWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::other("stream lock poisoned"))?;
        sink.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::other("stream lock poisoned"))?;
        sink.flush()
    }
}

/// An in-memory sink whose contents can be read back.
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    /// Everything written so far, as lossy UTF-8.
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => String::new(),
        }
    }
}

impl Write for Buffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("buffer lock poisoned"))?
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Buffers behind an [`IoStreams::test`] instance.
#[derive(Clone, Default)]
pub struct TestBuffers {
    out: Buffer,
    err: Buffer,
}

impl TestBuffers {
    /// Captured stdout.
    pub fn stdout(&self) -> String {
        self.out.contents()
    }

    /// Captured stderr.
    pub fn stderr(&self) -> String {
        self.err.contents()
    }
}

/// Output streams plus terminal facts.
#[derive(Clone)]
pub struct IoStreams {
    out: StreamWriter,
    err: StreamWriter,
    stdin_tty: bool,
    stdout_tty: bool,
    stderr_tty: bool,
    never_prompt: bool,
    pager: Option<String>,
}

impl IoStreams {
    /// Streams for the real process.
    pub fn system() -> Self {
        Self {
            out: StreamWriter::new(Box::new(io::stdout())),
            err: StreamWriter::new(Box::new(io::stderr())),
            stdin_tty: io::stdin().is_terminal(),
            stdout_tty: Term::stdout().is_term(),
            stderr_tty: Term::stderr().is_term(),
            never_prompt: false,
            pager: None,
        }
    }

    /// In-memory streams; nothing is a terminal.
    pub fn test() -> (Self, TestBuffers) {
        let buffers = TestBuffers::default();
        let io = Self {
            out: StreamWriter::new(Box::new(buffers.out.clone())),
            err: StreamWriter::new(Box::new(buffers.err.clone())),
            stdin_tty: false,
            stdout_tty: false,
            stderr_tty: false,
            never_prompt: false,
            pager: None,
        };
        (io, buffers)
    }

    /// Handle to stdout.
    pub fn out(&self) -> StreamWriter {
        self.out.clone()
    }

    /// Handle to stderr.
    pub fn err(&self) -> StreamWriter {
        self.err.clone()
    }

    pub fn is_stdin_tty(&self) -> bool {
        self.stdin_tty
    }

    pub fn is_stdout_tty(&self) -> bool {
        self.stdout_tty
    }

    pub fn is_stderr_tty(&self) -> bool {
        self.stderr_tty
    }

    pub fn set_stdin_tty(&mut self, tty: bool) {
        self.stdin_tty = tty;
    }

    pub fn set_stdout_tty(&mut self, tty: bool) {
        self.stdout_tty = tty;
    }

    pub fn set_stderr_tty(&mut self, tty: bool) {
        self.stderr_tty = tty;
    }

    /// Turn off interactive prompting for the rest of the process.
    pub fn set_never_prompt(&mut self, never: bool) {
        self.never_prompt = never;
    }

    /// Whether a prompt may be shown: stdin and stdout are terminals and
    /// prompting has not been disabled.
    pub fn can_prompt(&self) -> bool {
        !self.never_prompt && self.stdin_tty && self.stdout_tty
    }

    /// Set the pager command. Empty and `cat` mean "no pager".
    pub fn set_pager(&mut self, pager: Option<String>) {
        self.pager = pager.filter(|p| !p.trim().is_empty() && p.trim() != "cat");
    }

    /// The pager command, if any.
    pub fn pager(&self) -> Option<&str> {
        self.pager.as_deref()
    }

    /// Writer for long output: the pager's stdin when stdout is a terminal
    /// and a pager is set, else stdout.
    pub fn start_pager(&self) -> io::Result<PagedOutput> {
        match (self.stdout_tty, self.pager.as_deref()) {
            (true, Some(cmd)) => PagedOutput::spawn(cmd),
            _ => Ok(PagedOutput::direct(self.out())),
        }
    }
}
