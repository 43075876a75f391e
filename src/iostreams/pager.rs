//! Pager process.

use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use super::StreamWriter;

enum Target {
    Direct(StreamWriter),
    Pager { child: Child, stdin: ChildStdin },
}

/// Output that either goes straight to stdout or through a pager.
///
/// Call [`PagedOutput::finish`] to wait for the pager to exit.
pub struct PagedOutput {
    target: Target,
}

impl PagedOutput {
    pub(super) fn direct(out: StreamWriter) -> Self {
        Self {
            target: Target::Direct(out),
        }
    }

    /// Start `cmd` through the shell with its stdin piped.
    pub(super) fn spawn(cmd: &str) -> io::Result<Self> {
        tracing::debug!("Starting pager: {}", cmd);
        let mut child = shell_command(cmd)
            .env("LESS", std::env::var("LESS").unwrap_or_else(|_| "FRX".to_string()))
            .env("LV", std::env::var("LV").unwrap_or_else(|_| "-c".to_string()))
            .stdin(Stdio::piped())
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("pager stdin unavailable"))?;
        Ok(Self {
            target: Target::Pager { child, stdin },
        })
    }

    /// Close the pager's input and wait for it.
    pub fn finish(self) -> io::Result<()> {
        match self.target {
            Target::Direct(mut out) => out.flush(),
            Target::Pager { mut child, stdin } => {
                drop(stdin);
                child.wait()?;
                Ok(())
            }
        }
    }
}

impl Write for PagedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.target {
            Target::Direct(out) => out.write(buf),
            Target::Pager { stdin, .. } => match stdin.write(buf) {
                // The user quit the pager early.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(buf.len()),
                other => other,
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.target {
            Target::Direct(out) => out.flush(),
            Target::Pager { stdin, .. } => match stdin.flush() {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            },
        }
    }
}

#[cfg(unix)]
fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    command
}

#[cfg(windows)]
fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(cmd);
    command
}
