//! Output sinks for `print` and `fileprint`
//!
//! Console output goes through [`Output`], so the same program can write to
//! stdout, be captured for tests and the REPL, or run silently.

use std::io::{self, Write};
use std::path::Path;

/// Where console lines go
#[derive(Debug, Default)]
pub enum Output {
    /// Program lines to stdout, diagnostics to stderr (default)
    #[default]
    Stdout,
    /// Everything appended to an in-memory buffer
    Buffer(String),
    /// Everything discarded
    Silent,
}

impl Output {
    pub fn stdout() -> Self {
        Output::Stdout
    }

    pub fn buffer() -> Self {
        Output::Buffer(String::new())
    }

    pub fn silent() -> Self {
        Output::Silent
    }

    /// Print one program line
    pub fn println(&mut self, msg: &str) {
        match self {
            Output::Stdout => {
                let mut out = io::stdout().lock();
                // A closed stdout is not a program error
                let _ = writeln!(out, "{msg}");
            }
            Output::Buffer(buf) => {
                buf.push_str(msg);
                buf.push('\n');
            }
            Output::Silent => {}
        }
    }

    /// Print one diagnostic line
    pub fn diagnostic(&mut self, msg: &str) {
        match self {
            Output::Stdout => eprintln!("{msg}"),
            Output::Buffer(buf) => {
                buf.push_str(msg);
                buf.push('\n');
            }
            Output::Silent => {}
        }
    }

    /// Captured text; empty for sinks that don't capture
    pub fn get_output(&self) -> &str {
        match self {
            Output::Buffer(buf) => buf,
            Output::Stdout | Output::Silent => "",
        }
    }

    /// Take the captured text, leaving the buffer empty
    pub fn take_output(&mut self) -> String {
        match self {
            Output::Buffer(buf) => std::mem::take(buf),
            Output::Stdout | Output::Silent => String::new(),
        }
    }
}

/// Replace the file's contents with `contents` (no trailing newline)
pub fn write_file(path: impl AsRef<Path>, contents: &str) -> io::Result<()> {
    std::fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_lines() {
        let mut out = Output::buffer();
        out.println("hello");
        out.println("world");
        assert_eq!(out.get_output(), "hello\nworld\n");
    }

    #[test]
    fn buffer_captures_diagnostics_in_order() {
        let mut out = Output::buffer();
        out.println("1");
        out.diagnostic("error: boom");
        out.println("2");
        assert_eq!(out.get_output(), "1\nerror: boom\n2\n");
    }

    #[test]
    fn take_output_clears() {
        let mut out = Output::buffer();
        out.println("x");
        assert_eq!(out.take_output(), "x\n");
        assert_eq!(out.get_output(), "");
    }

    #[test]
    fn silent_discards() {
        let mut out = Output::silent();
        out.println("ignored");
        assert_eq!(out.get_output(), "");
    }

    #[test]
    fn write_file_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_file(&path, "a much longer first payload").unwrap();
        write_file(&path, "short").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }
}
