//! Command execution for svn-color.
//!
//! This module handles:
//! - Deciding whether an invocation is colorized
//! - Running svn with inherited stdio, or with stdout piped through the classifier
//! - Exit code propagation

pub mod gate;

pub use gate::{ColorGate, resolve_color_mode};

use crate::error::{Result, SvnColorError};
use crate::rules::Classifier;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

/// Execute a command with all stdio inherited.
///
/// Nothing is intercepted; the child writes straight to our terminal.
pub fn execute_passthrough(binary: &Path, args: &[OsString]) -> Result<ExitStatus> {
	let mut cmd = Command::new(binary);
	cmd.args(args)
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	cmd.status().map_err(|source| spawn_error(binary, source))
}

/// Execute a command with stdout piped through `classifier` into `out`.
///
/// stdin and stderr stay inherited. Each line is flushed as soon as it is
/// written.
pub fn execute_colorized<W: Write>(
	binary: &Path,
	args: &[OsString],
	classifier: &Classifier,
	out: &mut W,
) -> Result<ExitStatus> {
	let mut child = Command::new(binary)
		.args(args)
		.stdin(Stdio::inherit())
		.stdout(Stdio::piped())
		.stderr(Stdio::inherit())
		.spawn()
		.map_err(|source| spawn_error(binary, source))?;

	let command = binary.to_string_lossy().to_string();
	let relayed = match child.stdout.take() {
		Some(stdout) => colorize_stream(BufReader::new(stdout), out, classifier),
		None => Ok(()),
	};

	match relayed {
		Ok(()) => {}
		Err(source) if source.kind() == ErrorKind::BrokenPipe => {
			tracing::debug!("output closed, waiting for {command}");
		}
		Err(source) if source.kind() == ErrorKind::InvalidData => {
			abort_child(&mut child);
			return Err(SvnColorError::InvalidUtf8 { command, source });
		}
		Err(source) => {
			abort_child(&mut child);
			return Err(SvnColorError::OutputFailed { command, source });
		}
	}

	child
		.wait()
		.map_err(|source| SvnColorError::CommandFailed { command, source })
}

/// Relay `reader` to `writer` one line at a time through `classifier`.
///
/// Stops at end of input. Lines that are not valid UTF-8 surface as
/// `ErrorKind::InvalidData`.
pub fn colorize_stream<R: BufRead, W: Write>(
	mut reader: R,
	writer: &mut W,
	classifier: &Classifier,
) -> std::io::Result<()> {
	let mut line = String::new();
	loop {
		line.clear();
		if reader.read_line(&mut line)? == 0 {
			return Ok(());
		}
		writer.write_all(classifier.classify(&line).as_bytes())?;
		writer.flush()?;
	}
}

/// Map a child exit status to our own exit code.
///
/// A child killed by a signal reports `128 + signal` on Unix.
pub fn exit_code(status: ExitStatus) -> u8 {
	if let Some(code) = status.code() {
		return code as u8;
	}

	#[cfg(unix)]
	{
		use std::os::unix::process::ExitStatusExt;
		if let Some(signal) = status.signal() {
			return (128 + signal) as u8;
		}
	}

	1
}

/// Resolve a command name to its full path.
///
/// If the command is already an absolute path, returns it as-is.
/// Otherwise, searches PATH for the command.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	// If it's already an absolute path, return it if it exists
	if path.is_absolute() {
		if path.exists() {
			return Some(path.to_path_buf());
		} else {
			return None;
		}
	}

	// Search PATH
	if let Ok(path_var) = std::env::var("PATH") {
		for dir in std::env::split_paths(&path_var) {
			let full_path = dir.join(command);
			if full_path.is_file() {
				return Some(full_path);
			}
		}
	}

	None
}

/// Fail if `binary` is the running executable, which would recurse forever
/// when svn-color is installed under the name `svn`.
pub fn ensure_not_self(binary: &Path) -> Result<()> {
	let Ok(current) = std::env::current_exe() else {
		return Ok(());
	};

	let same = match (binary.canonicalize(), current.canonicalize()) {
		(Ok(a), Ok(b)) => a == b,
		_ => false,
	};

	if same {
		Err(SvnColorError::SelfInvocation {
			path: binary.to_path_buf(),
		})
	} else {
		Ok(())
	}
}

fn spawn_error(binary: &Path, source: std::io::Error) -> SvnColorError {
	if source.kind() == ErrorKind::NotFound {
		SvnColorError::CommandNotFound {
			command: binary.to_string_lossy().to_string(),
		}
	} else {
		SvnColorError::CommandFailed {
			command: binary.to_string_lossy().to_string(),
			source,
		}
	}
}

fn abort_child(child: &mut Child) {
	if let Err(e) = child.kill() {
		tracing::debug!("failed to kill child: {e}");
	}
	let _ = child.wait();
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn run_stream(input: &[u8]) -> (std::io::Result<()>, String) {
		let classifier = Classifier::builtin().unwrap();
		let mut out = Vec::new();
		let result = colorize_stream(Cursor::new(input.to_vec()), &mut out, &classifier);
		(result, String::from_utf8(out).unwrap())
	}

	/// Writer that records how many times it was flushed.
	#[derive(Default)]
	struct FlushCounter {
		data: Vec<u8>,
		flushes: usize,
	}

	impl Write for FlushCounter {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.data.extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			self.flushes += 1;
			Ok(())
		}
	}

	#[test]
	fn test_colorize_stream_per_line() {
		let (result, out) = run_stream(b"M       a.c\nplain\n?       b.c");
		assert!(result.is_ok());
		assert_eq!(
			out,
			"\x1b[32mM       a.c\n\x1b[mplain\n\x1b[37m?       b.c\x1b[m"
		);
	}

	#[test]
	fn test_colorize_stream_flushes_every_line() {
		let classifier = Classifier::builtin().unwrap();
		let mut out = FlushCounter::default();
		colorize_stream(Cursor::new(b"a\nb\nc\n".to_vec()), &mut out, &classifier).unwrap();
		assert_eq!(out.flushes, 3);
		assert_eq!(out.data, b"a\nb\nc\n");
	}

	#[test]
	fn test_colorize_stream_empty_input() {
		let (result, out) = run_stream(b"");
		assert!(result.is_ok());
		assert!(out.is_empty());
	}

	#[test]
	fn test_colorize_stream_invalid_utf8() {
		let (result, out) = run_stream(b"plain\n\xff\xfe\n");
		assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidData);
		assert_eq!(out, "plain\n");
	}

	#[test]
	fn test_resolve_command_absolute_path() {
		// /bin/sh should exist on Unix systems
		#[cfg(unix)]
		{
			let result = resolve_command("/bin/sh");
			assert!(result.is_some());
			assert_eq!(result.unwrap(), Path::new("/bin/sh"));
		}
	}

	#[test]
	fn test_resolve_command_not_found() {
		let result = resolve_command("/nonexistent/path/to/binary");
		assert!(result.is_none());
	}

	#[test]
	fn test_resolve_command_from_path() {
		// 'sh' should be in PATH on Unix systems
		#[cfg(unix)]
		{
			let result = resolve_command("sh");
			assert!(result.is_some());
		}
	}

	#[test]
	fn test_ensure_not_self() {
		let current = std::env::current_exe().unwrap();
		assert!(matches!(
			ensure_not_self(&current),
			Err(SvnColorError::SelfInvocation { .. })
		));
		#[cfg(unix)]
		assert!(ensure_not_self(Path::new("/bin/sh")).is_ok());
	}

	#[cfg(unix)]
	#[test]
	fn test_exit_code_from_status() {
		use std::os::unix::process::ExitStatusExt;
		assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
		assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
		// Killed by SIGKILL (9)
		assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
	}

	#[cfg(unix)]
	#[test]
	fn test_execute_colorized_relays_and_propagates() {
		let classifier = Classifier::builtin().unwrap();
		let mut out = Vec::new();
		let args: Vec<OsString> = ["-c", "printf 'A       x.c\\nok\\n'; exit 4"]
			.iter()
			.map(OsString::from)
			.collect();

		let status =
			execute_colorized(Path::new("/bin/sh"), &args, &classifier, &mut out).unwrap();

		assert_eq!(status.code(), Some(4));
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"\x1b[32mA       x.c\n\x1b[mok\n"
		);
	}

	#[test]
	fn test_execute_missing_binary() {
		let classifier = Classifier::builtin().unwrap();
		let mut out = Vec::new();
		let result = execute_colorized(
			Path::new("/nonexistent/svn-binary"),
			&[],
			&classifier,
			&mut out,
		);
		assert!(matches!(
			result,
			Err(SvnColorError::CommandNotFound { .. })
		));
	}
}
