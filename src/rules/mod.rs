//! Line classification and colorization for svn-color.
//!
//! This module handles:
//! - Recognizing svn output line shapes (status codes, diff lines, log headers)
//! - Applying ANSI SGR colors to recognized lines
//! - First-match-wins ordering over the built-in and configured rules

pub mod ansi;
pub mod classifier;
pub mod matcher;

pub use classifier::{Classifier, compile_classifier};
pub use matcher::{Matcher, MatcherKind};
