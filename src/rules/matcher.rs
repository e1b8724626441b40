use crate::error::{Result, SvnColorError};
use crate::rules::ansi::{paint, validate_sgr};
use regex::{Captures, Regex};

/// Bold near-white used for revision numbers.
const REVISION: &str = "38;5;255;1";
/// Bright near-white used for the body of log and index lines.
const BODY: &str = "97";
const LOG_MODIFIED: &str = "38;5;34;1";
const LOG_ADDED: &str = "38;5;82;1";
const INDEX_BANNER: &str = "37;1";
const AUTHOR: &str = "38;5;220";
const LINE_COUNT: &str = "38;5;46;1";

const INDEX_PREFIX: &str = "Index: ";
const LOG_ENTRY_PREFIX_LEN: usize = 4;
const SEPARATOR_LINE: &str = "-----";

/// Which output shape a matcher recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherKind {
	AtRevision,
	UpdatedToRevision,
	CommitedRevision,
	StatusModified,
	LogModified,
	LogIndex,
	Untracked,
	StatusAdded,
	LogAdded,
	StatusExternal,
	StatusConflicted,
	DiffRemoved,
	StatusDeleted,
	StatusUpdated,
	StatusMerged,
	DiffAdded,
	DiffHunk,
	RevisionHeader,
	/// A rule loaded from configuration.
	Custom,
}

impl MatcherKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			MatcherKind::AtRevision => "at-revision",
			MatcherKind::UpdatedToRevision => "updated-to-revision",
			MatcherKind::CommitedRevision => "commited-revision",
			MatcherKind::StatusModified => "status-modified",
			MatcherKind::LogModified => "log-modified",
			MatcherKind::LogIndex => "log-index",
			MatcherKind::Untracked => "untracked",
			MatcherKind::StatusAdded => "status-added",
			MatcherKind::LogAdded => "log-added",
			MatcherKind::StatusExternal => "status-external",
			MatcherKind::StatusConflicted => "status-conflicted",
			MatcherKind::DiffRemoved => "diff-removed",
			MatcherKind::StatusDeleted => "status-deleted",
			MatcherKind::StatusUpdated => "status-updated",
			MatcherKind::StatusMerged => "status-merged",
			MatcherKind::DiffAdded => "diff-added",
			MatcherKind::DiffHunk => "diff-hunk",
			MatcherKind::RevisionHeader => "revision-header",
			MatcherKind::Custom => "custom",
		}
	}
}

/// How a line is recognized.
#[derive(Debug)]
enum Recognizer {
	/// Line starts with a literal string.
	Prefix(String),

	/// Anchored regex matches at the start of the line.
	StartsWith(Regex),

	/// Line starts with `-` but is not a `-----` separator.
	RemovedLine,

	/// Regex matches the whole line, terminator excluded.
	FullLine(Regex),
}

/// How a recognized line is rewritten.
#[derive(Debug)]
enum Paint {
	/// Wrap the whole line in one color.
	Solid(String),

	/// Re-emit `<sentence> N.` with only N colored.
	Announcement(&'static str),

	/// Color the first `head_len` bytes and the rest separately.
	Split {
		head_len: usize,
		head: &'static str,
		tail: &'static str,
	},

	/// Color the four `svn log` header fields independently.
	RevisionHeader,
}

/// A single line recognizer paired with its colorization.
///
/// Matchers are immutable once built: the recognition rule and colors are
/// fixed at construction.
#[derive(Debug)]
pub struct Matcher {
	kind: MatcherKind,
	recognizer: Recognizer,
	paint: Paint,
}

impl Matcher {
	pub fn kind(&self) -> MatcherKind {
		self.kind
	}

	/// Check if this matcher applies to `line`.
	pub fn matches(&self, line: &str) -> bool {
		match &self.recognizer {
			Recognizer::Prefix(prefix) => line.starts_with(prefix.as_str()),
			Recognizer::StartsWith(regex) => regex.is_match(line),
			Recognizer::RemovedLine => line.starts_with('-') && !line.starts_with(SEPARATOR_LINE),
			Recognizer::FullLine(regex) => regex.is_match(line_body(line)),
		}
	}

	/// Produce the colorized form of `line`.
	///
	/// Only meaningful for lines where [`Matcher::matches`] returned true.
	pub fn colorize(&self, line: &str) -> String {
		match &self.paint {
			Paint::Solid(color) => paint(color, line),
			Paint::Split {
				head_len,
				head,
				tail,
			} => match (line.get(..*head_len), line.get(*head_len..)) {
				(Some(first), Some(rest)) => paint(head, first) + &paint(tail, rest),
				_ => line.to_string(),
			},
			Paint::Announcement(sentence) => match self.full_line_captures(line) {
				Some(caps) => format!("{sentence} {}.\n", paint(REVISION, &caps[1])),
				None => line.to_string(),
			},
			Paint::RevisionHeader => match self.full_line_captures(line) {
				Some(caps) => {
					let fields = [
						paint(REVISION, &caps[1]),
						paint(AUTHOR, &caps[2]),
						caps[3].to_string(),
						paint(LINE_COUNT, &caps[4]),
					];
					fields.join(" | ") + "\n"
				}
				None => line.to_string(),
			},
		}
	}

	/// Captures from the recognizing regex. Recognition and extraction share
	/// one compiled pattern, so a line that matched always yields captures.
	fn full_line_captures<'l>(&self, line: &'l str) -> Option<Captures<'l>> {
		match &self.recognizer {
			Recognizer::FullLine(regex) => regex.captures(line_body(line)),
			_ => None,
		}
	}

	/// Build a solid-color rule triggered by a literal prefix.
	pub fn custom_prefix(prefix: &str, color: &str) -> Result<Self> {
		validate_sgr(color)?;
		Ok(Matcher {
			kind: MatcherKind::Custom,
			recognizer: Recognizer::Prefix(prefix.to_string()),
			paint: Paint::Solid(color.to_string()),
		})
	}

	/// Build a solid-color rule triggered by a regex matching at the start of
	/// the line.
	pub fn custom_pattern(pattern: &str, color: &str) -> Result<Self> {
		validate_sgr(color)?;
		let regex = compile_regex(&format!("^(?:{pattern})")).map_err(|err| match err {
			SvnColorError::InvalidRegex { source, .. } => SvnColorError::InvalidRegex {
				pattern: pattern.to_string(),
				source,
			},
			other => other,
		})?;
		Ok(Matcher {
			kind: MatcherKind::Custom,
			recognizer: Recognizer::StartsWith(regex),
			paint: Paint::Solid(color.to_string()),
		})
	}

	/// The built-in catalog in evaluation order.
	///
	/// Order matters: earlier entries shadow later ones, and the `-----`
	/// exclusion of [`MatcherKind::DiffRemoved`] keeps log separators plain.
	pub fn builtin() -> Result<Vec<Matcher>> {
		Ok(vec![
			announcement(MatcherKind::AtRevision, "At revision")?,
			announcement(MatcherKind::UpdatedToRevision, "Updated to revision")?,
			announcement(MatcherKind::CommitedRevision, "Commited revision")?,
			status(MatcherKind::StatusModified, 'M', "32")?,
			split(MatcherKind::LogModified, "   M", LOG_ENTRY_PREFIX_LEN, LOG_MODIFIED),
			split(MatcherKind::LogIndex, INDEX_PREFIX, INDEX_PREFIX.len(), INDEX_BANNER),
			solid(MatcherKind::Untracked, "?", "37"),
			status(MatcherKind::StatusAdded, 'A', "32")?,
			split(MatcherKind::LogAdded, "   A", LOG_ENTRY_PREFIX_LEN, LOG_ADDED),
			status(MatcherKind::StatusExternal, 'X', "31")?,
			status(MatcherKind::StatusConflicted, 'C', "30;41")?,
			Matcher {
				kind: MatcherKind::DiffRemoved,
				recognizer: Recognizer::RemovedLine,
				paint: Paint::Solid("31".to_string()),
			},
			status(MatcherKind::StatusDeleted, 'D', "31;1")?,
			status(MatcherKind::StatusUpdated, 'U', "32;1")?,
			status(MatcherKind::StatusMerged, 'G', "32;1")?,
			solid(MatcherKind::DiffAdded, "+", "32"),
			solid(MatcherKind::DiffHunk, "@@", "38;5;75"),
			Matcher {
				kind: MatcherKind::RevisionHeader,
				recognizer: Recognizer::FullLine(compile_regex(
					r"^(r\d+) \| (.*?) \| (.*?) \| (\d+ lines?)$",
				)?),
				paint: Paint::RevisionHeader,
			},
		])
	}
}

fn announcement(kind: MatcherKind, sentence: &'static str) -> Result<Matcher> {
	let regex = compile_regex(&format!(r"^{} (\d+)\.$", regex::escape(sentence)))?;
	Ok(Matcher {
		kind,
		recognizer: Recognizer::FullLine(regex),
		paint: Paint::Announcement(sentence),
	})
}

/// Single-letter status code followed by a word boundary.
fn status(kind: MatcherKind, letter: char, color: &str) -> Result<Matcher> {
	Ok(Matcher {
		kind,
		recognizer: Recognizer::StartsWith(compile_regex(&format!(r"^{letter}\b"))?),
		paint: Paint::Solid(color.to_string()),
	})
}

fn solid(kind: MatcherKind, prefix: &str, color: &str) -> Matcher {
	Matcher {
		kind,
		recognizer: Recognizer::Prefix(prefix.to_string()),
		paint: Paint::Solid(color.to_string()),
	}
}

fn split(kind: MatcherKind, prefix: &str, head_len: usize, head: &'static str) -> Matcher {
	Matcher {
		kind,
		recognizer: Recognizer::Prefix(prefix.to_string()),
		paint: Paint::Split {
			head_len,
			head,
			tail: BODY,
		},
	}
}

/// Strip one trailing `\n` (and a `\r` before it) for whole-line patterns.
fn line_body(line: &str) -> &str {
	let line = line.strip_suffix('\n').unwrap_or(line);
	line.strip_suffix('\r').unwrap_or(line)
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| SvnColorError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn builtin(kind: MatcherKind) -> Matcher {
		Matcher::builtin()
			.unwrap()
			.into_iter()
			.find(|m| m.kind() == kind)
			.unwrap()
	}

	#[test]
	fn test_compile_invalid_regex() {
		let result = compile_regex(r"[invalid");
		assert!(result.is_err());
		match result.unwrap_err() {
			SvnColorError::InvalidRegex { pattern, .. } => {
				assert_eq!(pattern, "[invalid");
			}
			_ => panic!("Expected InvalidRegex error"),
		}
	}

	#[test]
	fn test_builtin_catalog_order() {
		let kinds: Vec<_> = Matcher::builtin()
			.unwrap()
			.iter()
			.map(Matcher::kind)
			.collect();
		assert_eq!(
			kinds,
			vec![
				MatcherKind::AtRevision,
				MatcherKind::UpdatedToRevision,
				MatcherKind::CommitedRevision,
				MatcherKind::StatusModified,
				MatcherKind::LogModified,
				MatcherKind::LogIndex,
				MatcherKind::Untracked,
				MatcherKind::StatusAdded,
				MatcherKind::LogAdded,
				MatcherKind::StatusExternal,
				MatcherKind::StatusConflicted,
				MatcherKind::DiffRemoved,
				MatcherKind::StatusDeleted,
				MatcherKind::StatusUpdated,
				MatcherKind::StatusMerged,
				MatcherKind::DiffAdded,
				MatcherKind::DiffHunk,
				MatcherKind::RevisionHeader,
			]
		);
	}

	#[test]
	fn test_kind_names_are_distinct() {
		let mut names: Vec<_> = Matcher::builtin()
			.unwrap()
			.iter()
			.map(|m| m.kind().as_str())
			.collect();
		names.push(MatcherKind::Custom.as_str());
		let count = names.len();
		names.sort_unstable();
		names.dedup();
		assert_eq!(names.len(), count);
		assert_eq!(MatcherKind::CommitedRevision.as_str(), "commited-revision");
		assert_eq!(MatcherKind::DiffRemoved.as_str(), "diff-removed");
	}

	#[test]
	fn test_status_letter_needs_word_boundary() {
		let m = builtin(MatcherKind::StatusModified);
		assert!(m.matches("M       foo.c\n"));
		assert!(m.matches("M"));
		assert!(m.matches("M\n"));
		assert!(!m.matches("Makefile\n"));
		assert!(!m.matches(" M      foo.c\n"));
	}

	#[test]
	fn test_removed_line_skips_separator() {
		let m = builtin(MatcherKind::DiffRemoved);
		assert!(m.matches("-old line\n"));
		assert!(m.matches("--- foo.c\t(revision 3)\n"));
		assert!(m.matches("----\n"));
		assert!(!m.matches("-----\n"));
		assert!(!m.matches("------------------------------------------------------------------------\n"));
		assert!(!m.matches("+new line\n"));
	}

	#[test]
	fn test_announcement_colors_only_the_number() {
		let m = builtin(MatcherKind::AtRevision);
		assert!(m.matches("At revision 42.\n"));
		assert_eq!(
			m.colorize("At revision 42.\n"),
			"At revision \x1b[38;5;255;1m42\x1b[m.\n"
		);
	}

	#[test]
	fn test_announcement_always_ends_with_newline() {
		let m = builtin(MatcherKind::UpdatedToRevision);
		assert_eq!(
			m.colorize("Updated to revision 7."),
			"Updated to revision \x1b[38;5;255;1m7\x1b[m.\n"
		);
		assert_eq!(
			m.colorize("Updated to revision 7.\r\n"),
			"Updated to revision \x1b[38;5;255;1m7\x1b[m.\n"
		);
	}

	#[test]
	fn test_commited_spelling_is_literal() {
		let m = builtin(MatcherKind::CommitedRevision);
		assert!(m.matches("Commited revision 9.\n"));
		assert!(!m.matches("Committed revision 9.\n"));
	}

	#[test]
	fn test_announcement_requires_whole_sentence() {
		let m = builtin(MatcherKind::AtRevision);
		assert!(!m.matches("At revision HEAD.\n"));
		assert!(!m.matches("At revision 42. Done\n"));
	}

	#[test]
	fn test_log_entry_split_color() {
		let m = builtin(MatcherKind::LogModified);
		assert_eq!(
			m.colorize("   M /trunk/foo.c\n"),
			"\x1b[38;5;34;1m   M\x1b[m\x1b[97m /trunk/foo.c\n\x1b[m"
		);

		let m = builtin(MatcherKind::LogAdded);
		assert_eq!(
			m.colorize("   A /trunk/new.c\n"),
			"\x1b[38;5;82;1m   A\x1b[m\x1b[97m /trunk/new.c\n\x1b[m"
		);
	}

	#[test]
	fn test_index_banner_split_color() {
		let m = builtin(MatcherKind::LogIndex);
		assert_eq!(
			m.colorize("Index: src/main.c\n"),
			"\x1b[37;1mIndex: \x1b[m\x1b[97msrc/main.c\n\x1b[m"
		);
	}

	#[test]
	fn test_revision_header_groups() {
		let m = builtin(MatcherKind::RevisionHeader);
		let line = "r123 | alice | 2020-01-01 10:00 | 5 lines\n";
		assert!(m.matches(line));
		assert_eq!(
			m.colorize(line),
			"\x1b[38;5;255;1mr123\x1b[m | \x1b[38;5;220malice\x1b[m | 2020-01-01 10:00 | \x1b[38;5;46;1m5 lines\x1b[m\n"
		);
	}

	#[test]
	fn test_revision_header_single_line_and_no_terminator() {
		let m = builtin(MatcherKind::RevisionHeader);
		let line = "r7 | bob | 2009-06-15 12:00:00 +0200 (Mon, 15 Jun 2009) | 1 line";
		assert!(m.matches(line));
		assert!(m.colorize(line).ends_with("\x1b[38;5;46;1m1 line\x1b[m\n"));
	}

	#[test]
	fn test_revision_header_rejects_partial_shape() {
		let m = builtin(MatcherKind::RevisionHeader);
		assert!(!m.matches("r123 | alice | 2020-01-01\n"));
		assert!(!m.matches("r12a | alice | today | 5 lines\n"));
		assert!(!m.matches("r123 | alice | today | five lines\n"));
	}

	#[test]
	fn test_custom_prefix() {
		let m = Matcher::custom_prefix("Sending", "36").unwrap();
		assert_eq!(m.kind(), MatcherKind::Custom);
		assert!(m.matches("Sending        foo.c\n"));
		assert_eq!(m.colorize("Sending x\n"), "\x1b[36mSending x\n\x1b[m");
	}

	#[test]
	fn test_custom_pattern_is_anchored() {
		let m = Matcher::custom_pattern("Transmitting|Sending", "36").unwrap();
		assert!(m.matches("Transmitting file data .\n"));
		assert!(m.matches("Sending foo.c\n"));
		assert!(!m.matches("Not Sending\n"));
	}

	#[test]
	fn test_custom_pattern_reports_user_pattern() {
		match Matcher::custom_pattern("[oops", "36").unwrap_err() {
			SvnColorError::InvalidRegex { pattern, .. } => assert_eq!(pattern, "[oops"),
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_custom_rule_rejects_bad_color() {
		assert!(matches!(
			Matcher::custom_prefix("Sending", "cyan"),
			Err(SvnColorError::InvalidColor { .. })
		));
	}
}
