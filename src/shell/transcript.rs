//! Command transcripts and the transcript log file.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The ordered, merged output of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one output line (without its line terminator).
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// All lines in the order they were received.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no output was produced.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render as text, one newline-terminated line per output line.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Append-only log file receiving the transcripts of failed steps.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    /// Log to the given file; it is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one transcript under a timestamped heading.
    pub fn append(&self, step: &str, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(
            file,
            "=== {} {} ===",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            step
        )?;
        file.write_all(text.as_bytes())?;
        if !text.is_empty() && !text.ends_with('\n') {
            writeln!(file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_transcript_renders_empty_text() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.text(), "");
    }

    #[test]
    fn text_terminates_every_line() {
        let mut transcript = Transcript::new();
        transcript.push("first");
        transcript.push("second");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.text(), "first\nsecond\n");
    }

    #[test]
    fn log_appends_with_heading() {
        let temp = TempDir::new().unwrap();
        let log = TranscriptLog::new(temp.path().join("run.log"));

        log.append("installing cilium", "error: timed out\n").unwrap();
        log.append("deploying TSA", "no such chart").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let headings: Vec<_> = content.lines().filter(|l| l.starts_with("===")).collect();
        assert_eq!(headings.len(), 2);
        assert!(headings[0].ends_with("installing cilium ==="));
        assert!(content.contains("error: timed out\n"));
        assert!(content.ends_with("no such chart\n"));
    }
}
