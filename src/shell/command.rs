//! Process execution.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{HsdemoError, Result};
use crate::ui::StatusSink;

use super::transcript::Transcript;

/// A program invocation: program, arguments and optional stdin payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name, looked up on PATH.
    pub program: String,
    /// Arguments, passed as-is (no shell).
    pub args: Vec<String>,
    /// Written to the child's stdin, which is then closed.
    pub stdin: Option<String>,
}

impl CommandSpec {
    /// Start a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Feed `payload` to the child's stdin.
    pub fn stdin(mut self, payload: impl Into<String>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Outcome of one streamed command.
#[derive(Debug)]
pub enum ExecutionResult {
    /// Exit status zero.
    Success { transcript: Transcript },
    /// Spawn, stream or exit failure; the transcript holds what was read.
    Failure {
        transcript: Transcript,
        error: HsdemoError,
    },
}

impl ExecutionResult {
    /// Whether the command succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The merged output, whatever the outcome.
    pub fn transcript(&self) -> &Transcript {
        match self {
            Self::Success { transcript } | Self::Failure { transcript, .. } => transcript,
        }
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&HsdemoError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

/// Runs a command to completion while reporting progress.
///
/// The sequencer only talks to this trait, so tests can substitute
/// scripted runners that never spawn a process.
pub trait ProcessRunner {
    /// Run `command`, reporting under the display name `name`.
    fn run(&self, name: &str, command: &CommandSpec, sink: &mut dyn StatusSink) -> ExecutionResult;
}

/// Production runner backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

/// Item produced by the stdout/stderr reader threads.
enum StreamEvent {
    Line(String),
    Error(io::Error),
}

impl ProcessRunner for SystemRunner {
    fn run(&self, name: &str, command: &CommandSpec, sink: &mut dyn StatusSink) -> ExecutionResult {
        sink.step_started(name);
        tracing::debug!("Starting '{}' ({} args)", command.program, command.args.len());

        let mut cmd = command.to_command();
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(if command.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                let error = HsdemoError::ProcessSpawn {
                    program: command.program.clone(),
                    source,
                };
                sink.step_failed(name, &error.to_string());
                return ExecutionResult::Failure {
                    transcript: Transcript::new(),
                    error,
                };
            }
        };

        let streams = OutputStreams::start(child.stdout.take(), child.stderr.take());

        // Readers are already draining, so a large payload cannot deadlock.
        if let (Some(payload), Some(mut stdin)) = (&command.stdin, child.stdin.take()) {
            match stdin.write_all(payload.as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("'{}' closed stdin early", command.program);
                }
                Err(e) => tracing::warn!("Writing stdin of '{}' failed: {}", command.program, e),
            }
        }

        let (transcript, stream_error) = streams.drain(name, sink);
        let status = child.wait();
        conclude(name, &command.program, transcript, stream_error, status, sink)
    }
}

/// The merged stdout/stderr of one child, fed by two reader threads.
struct OutputStreams {
    rx: Receiver<StreamEvent>,
    readers: Vec<JoinHandle<()>>,
}

impl OutputStreams {
    fn start<O, E>(stdout: Option<O>, stderr: Option<E>) -> Self
    where
        O: Read + Send + 'static,
        E: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(out) = stdout {
            readers.push(spawn_reader(out, tx.clone()));
        }
        if let Some(err) = stderr {
            readers.push(spawn_reader(err, tx.clone()));
        }
        Self { rx, readers }
    }

    /// Forward every line to `sink` until both streams end.
    ///
    /// A read error ends only its own stream; the first one is returned.
    fn drain(self, name: &str, sink: &mut dyn StatusSink) -> (Transcript, Option<io::Error>) {
        let mut transcript = Transcript::new();
        let mut stream_error = None;
        for event in self.rx {
            match event {
                StreamEvent::Line(line) => {
                    sink.update_line(name, &line);
                    transcript.push(line);
                }
                StreamEvent::Error(e) => {
                    stream_error.get_or_insert(e);
                }
            }
        }
        for handle in self.readers {
            let _ = handle.join();
        }
        (transcript, stream_error)
    }
}

/// Turn the drained output and the reaped status into a result.
fn conclude(
    name: &str,
    program: &str,
    transcript: Transcript,
    stream_error: Option<io::Error>,
    status: io::Result<ExitStatus>,
    sink: &mut dyn StatusSink,
) -> ExecutionResult {
    let error = match (stream_error, status) {
        (Some(source), _) => HsdemoError::ProcessStream {
            program: program.to_string(),
            source,
        },
        (None, Ok(status)) if status.success() => {
            tracing::debug!("'{}' exited 0 ({} lines)", program, transcript.len());
            sink.step_succeeded(name);
            return ExecutionResult::Success { transcript };
        }
        (None, Ok(status)) => HsdemoError::ProcessExit {
            program: program.to_string(),
            code: status.code(),
        },
        (None, Err(source)) => HsdemoError::ProcessWait {
            program: program.to_string(),
            source,
        },
    };

    tracing::debug!("'{}' failed: {}", program, error);
    sink.flush_transcript(name, &transcript);
    sink.step_failed(name, &error.to_string());
    ExecutionResult::Failure { transcript, error }
}

/// Read `reader` line by line into `tx` until EOF or the first error.
fn spawn_reader<R>(reader: R, tx: Sender<StreamEvent>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.send(StreamEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(StreamEvent::Error(e));
                    break;
                }
            }
        }
    })
}

/// Captured result of a non-streamed command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandOutput {
    /// Trimmed stdout of a successful command, or the exit error.
    pub fn into_stdout(self, program: &str) -> Result<String> {
        if self.success {
            Ok(self.stdout.trim().to_string())
        } else {
            Err(HsdemoError::ProcessExit {
                program: program.to_string(),
                code: self.exit_code,
            })
        }
    }
}

/// Run a short lookup command and collect its output without streaming.
///
/// Stdin is closed; a spawn failure is an error, a non-zero exit is not.
pub fn capture(command: &CommandSpec) -> Result<CommandOutput> {
    let start = Instant::now();

    let output = command
        .to_command()
        .stdin(Stdio::null())
        .output()
        .map_err(|source| HsdemoError::ProcessSpawn {
            program: command.program.clone(),
            source,
        })?;

    let result = CommandOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        success: output.status.success(),
    };
    tracing::debug!(
        "Captured '{}': exit {:?} in {:?}",
        command.program,
        result.exit_code,
        result.duration
    );
    Ok(result)
}
