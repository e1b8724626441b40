use crate::config::types::RuleWithSource;
use crate::error::Result;
use crate::rules::matcher::Matcher;
use std::borrow::Cow;

/// Ordered first-match-wins rule engine over output lines.
#[derive(Debug)]
pub struct Classifier {
	matchers: Vec<Matcher>,
}

impl Classifier {
	/// Classifier over the built-in catalog only.
	pub fn builtin() -> Result<Self> {
		Ok(Classifier {
			matchers: Matcher::builtin()?,
		})
	}

	pub fn matchers(&self) -> &[Matcher] {
		&self.matchers
	}

	/// The first matcher that applies to `line`.
	pub fn find(&self, line: &str) -> Option<&Matcher> {
		self.matchers.iter().find(|matcher| matcher.matches(line))
	}

	/// Colorize `line` with the first applicable matcher, or return it as is.
	pub fn classify<'a>(&self, line: &'a str) -> Cow<'a, str> {
		match self.find(line) {
			Some(matcher) => {
				tracing::trace!(kind = matcher.kind().as_str(), "line matched");
				Cow::Owned(matcher.colorize(line))
			}
			None => Cow::Borrowed(line),
		}
	}
}

/// Compile the built-in catalog followed by the configured rules.
///
/// Configured rules come last so they only see lines no built-in claims.
pub fn compile_classifier(rules: &[RuleWithSource]) -> Result<Classifier> {
	let mut classifier = Classifier::builtin()?;

	for rws in rules {
		let matcher = match (&rws.rule.prefix, &rws.rule.pattern) {
			(Some(prefix), _) => Matcher::custom_prefix(prefix, &rws.rule.color)?,
			(None, Some(pattern)) => Matcher::custom_pattern(pattern, &rws.rule.color)?,
			(None, None) => {
				rws.rule.validate()?;
				continue;
			}
		};
		tracing::debug!(
			kind = matcher.kind().as_str(),
			source = %rws.source.display(),
			"compiled custom rule"
		);
		classifier.matchers.push(matcher);
	}

	Ok(classifier)
}
