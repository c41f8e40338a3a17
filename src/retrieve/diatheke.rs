//! Subprocess driver for the `diatheke` command-line front end.

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use super::TextSource;
use crate::{Error, Result};

/// Per-lookup timeout used for extraction.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the availability check.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs `<program> [args..] -b <module> -f plain -k <reference>`.
#[derive(Debug, Clone)]
pub struct Diatheke {
    program: PathBuf,
    /// Extra arguments placed before the diatheke options, for wrappers
    /// such as `flatpak run` or a container shell.
    args: Vec<OsString>,
    timeout: Duration,
}

impl Default for Diatheke {
    fn default() -> Self {
        Self {
            program: PathBuf::from("diatheke"),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Diatheke {
    /// `diatheke` from `PATH` with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check that the tool can be started at all.
    ///
    /// Only a missing executable is an error; a probe that runs but prints
    /// nothing (no KJV module installed, say) still counts as available.
    pub fn probe(&self) -> Result<()> {
        match self.run("KJV", None, "Gen 1:1", PROBE_TIMEOUT) {
            Ok(_) | Err(Error::Timeout { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn run(
        &self,
        module: &str,
        format: Option<&str>,
        reference: &str,
        timeout: Duration,
    ) -> Result<String> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg("-b").arg(module);
        if let Some(format) = format {
            command.arg("-f").arg(format);
        }
        command
            .arg("-k")
            .arg(reference)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::ToolUnavailable(self.program.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout not captured"));
        let mut stdout = match stdout {
            Ok(stdout) => stdout,
            Err(e) => {
                reap(&mut child);
                return Err(e.into());
            }
        };
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let timed_out = || Error::Timeout {
            module: module.to_string(),
            reference: reference.to_string(),
            after: timeout,
        };
        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    reap(&mut child);
                    return Err(timed_out());
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    reap(&mut child);
                    return Err(e.into());
                }
            }
        }

        // Descendants of the tool may still hold stdout open
        let remaining = deadline.saturating_duration_since(Instant::now());
        let bytes = match rx.recv_timeout(remaining) {
            Ok(read) => read?,
            Err(RecvTimeoutError::Timeout) => return Err(timed_out()),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(io::Error::other("stdout reader panicked").into());
            }
        };
        trace!(module, reference, bytes = bytes.len(), "diatheke output");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl TextSource for Diatheke {
    fn fetch(&self, module: &str, reference: &str) -> Result<String> {
        self.run(module, Some("plain"), reference, self.timeout)
    }
}
