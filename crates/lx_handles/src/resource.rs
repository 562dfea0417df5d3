//! OS resource handles: files, child-process pipes and sockets.
//!
//! Disposal depends on how the resource was opened: files are flushed to
//! disk when writable, pipes close the child's stdin and stdout and wait
//! for it to exit, sockets are shut down in both directions.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::errors::HandleError;

#[derive(Debug)]
pub enum Resource {
    File { file: File, writable: bool },
    Pipe(Child),
    Socket(TcpStream),
}

impl Resource {
    pub fn open_file(path: impl AsRef<Path>, writable: bool) -> io::Result<Self> {
        let file = if writable {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?
        } else {
            File::open(path)?
        };
        Ok(Resource::File { file, writable })
    }

    /// Spawn `command` with piped stdin and stdout.
    pub fn spawn_pipe(command: &mut Command) -> io::Result<Self> {
        let child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;
        Ok(Resource::Pipe(child))
    }

    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        Ok(Resource::Socket(TcpStream::connect(addr)?))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Resource::File { .. } => "file",
            Resource::Pipe(_) => "pipe",
            Resource::Socket(_) => "socket",
        }
    }

    /// Release the OS resource. Pipe disposal blocks until the child exits.
    pub fn dispose(self) -> Result<(), HandleError> {
        let what = self.describe();
        let close_err = |source: io::Error| HandleError::ResourceClose { what, source };
        match self {
            Resource::File { file, writable } => {
                if writable {
                    file.sync_all().map_err(close_err)?;
                }
                Ok(())
            }
            Resource::Pipe(mut child) => {
                // Both ends go before the wait: a child blocked writing to
                // an unread stdout would otherwise never exit.
                drop(child.stdin.take());
                drop(child.stdout.take());
                let status = child.wait().map_err(close_err)?;
                if status.success() || killed_by_closed_pipe(&status) {
                    Ok(())
                } else {
                    Err(HandleError::PipeStatus { what, status })
                }
            }
            Resource::Socket(stream) => match stream.shutdown(Shutdown::Both) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
                Err(e) => Err(close_err(e)),
            },
        }
    }
}

/// A child still writing when its stdout was closed dies of `SIGPIPE`; that
/// is the expected end of a pipe closed early, not a failure.
#[cfg(unix)]
fn killed_by_closed_pipe(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(libc::SIGPIPE)
}

#[cfg(not(unix))]
fn killed_by_closed_pipe(_status: &ExitStatus) -> bool {
    false
}

impl Read for Resource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Resource::File { file, .. } => file.read(buf),
            Resource::Pipe(child) => match child.stdout.as_mut() {
                Some(out) => out.read(buf),
                None => Ok(0),
            },
            Resource::Socket(stream) => stream.read(buf),
        }
    }
}

impl Write for Resource {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Resource::File { file, .. } => file.write(buf),
            Resource::Pipe(child) => match child.stdin.as_mut() {
                Some(input) => input.write(buf),
                None => Err(io::Error::from(io::ErrorKind::BrokenPipe)),
            },
            Resource::Socket(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Resource::File { file, .. } => file.flush(),
            Resource::Pipe(child) => match child.stdin.as_mut() {
                Some(input) => input.flush(),
                None => Ok(()),
            },
            Resource::Socket(stream) => stream.flush(),
        }
    }
}
