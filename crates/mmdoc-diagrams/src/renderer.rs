//! External renderer invocation.
//!
//! [`DiagramRenderer`] is the seam between the extractor and the program that
//! turns `.mmd` sources into images. [`MermaidCli`] drives `mmdc` (or any
//! compatible command) with a bounded wait.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{ChildStderr, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{
    DEFAULT_BACKGROUND, DEFAULT_COMMAND, DEFAULT_SCALE, DEFAULT_TIMEOUT, POLL_INTERVAL,
};

/// Error from a single renderer invocation.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer could not be started.
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// The renderer exited with a nonzero status.
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    /// The renderer did not finish in time and was killed.
    #[error("renderer timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// Waiting on the renderer failed.
    #[error("failed to wait for renderer: {0}")]
    Wait(#[source] std::io::Error),
}

/// Renders a diagram-source file into an image file.
pub trait DiagramRenderer {
    /// Render `input` into `output`.
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Renderer backed by the mermaid-cli (`mmdc`) command line.
///
/// Invokes `{command} {args...} -i <input> -o <output> -b <background> --scale <scale>`.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use mmdoc_diagrams::MermaidCli;
///
/// let renderer = MermaidCli::new("mmdc").timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: String,
    args: Vec<String>,
    background: String,
    scale: u32,
    timeout: Duration,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl MermaidCli {
    /// Create a renderer for the given program with default settings.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            background: DEFAULT_BACKGROUND.to_owned(),
            scale: DEFAULT_SCALE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set arguments placed before the input/output arguments.
    #[must_use]
    pub fn args(mut self, args: &[String]) -> Self {
        self.args = args.to_vec();
        self
    }

    /// Set the background color (default: transparent).
    #[must_use]
    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Set the scale factor (default: 2).
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the per-invocation timeout (default: 60 seconds).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-b")
            .arg(&self.background)
            .arg("--scale")
            .arg(self.scale.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Forward stderr lines to a channel from a helper thread.
///
/// The thread ends at EOF or once the receiver is dropped. It is never joined:
/// processes spawned by the renderer can keep the pipe open after it exits.
fn spawn_stderr_reader(stderr: Option<ChildStderr>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let Some(pipe) = stderr else {
            return;
        };
        for line in BufReader::new(pipe).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Collect stderr lines until the pipe closes or `deadline` passes.
fn collect_stderr(lines: &Receiver<String>, deadline: Instant) -> String {
    let mut collected = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::debug!("Renderer stderr still open, output truncated");
            break;
        }
        match lines.recv_timeout(remaining) {
            Ok(line) => collected.push(line),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("Renderer stderr still open, output truncated");
                break;
            }
        }
    }
    collected.join("\n")
}

impl DiagramRenderer for MermaidCli {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let mut child = self
            .build_command(input, output)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // Drain stderr on a helper thread so a full pipe cannot stall the child.
        let stderr_lines = spawn_stderr_reader(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(RenderError::Timeout(self.timeout));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RenderError::Wait(e));
                }
            }
        };

        if status.success() {
            tracing::debug!(output = %output.display(), "Rendered diagram");
            return Ok(());
        }

        // The remaining time bounds the stderr wait, with a short grace period
        // when the renderer exited right at the limit.
        let deadline = (start + self.timeout).max(Instant::now() + POLL_INTERVAL);
        let stderr = collect_stderr(&stderr_lines, deadline);
        Err(RenderError::Failed {
            status,
            stderr: stderr.trim().to_owned(),
        })
    }
}
