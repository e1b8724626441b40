use crate::error::{Result, SvnColorError};

/// Escape sequence that resets all attributes.
pub const RESET: &str = "\x1b[m";

/// Wrap `text` in an SGR color pair: `ESC[<code>m` ... `ESC[m`.
///
/// `code` is a semicolon delimited SGR parameter string such as `"32"`,
/// `"30;41"` or `"38;5;220"`.
pub fn paint(code: &str, text: &str) -> String {
	format!("\x1b[{code}m{text}{RESET}")
}

/// Check that a color string is a non-empty list of numeric SGR parameters.
pub fn validate_sgr(code: &str) -> Result<()> {
	let valid = !code.is_empty()
		&& code
			.split(';')
			.all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));

	if valid {
		Ok(())
	} else {
		Err(SvnColorError::InvalidColor {
			color: code.to_string(),
		})
	}
}
