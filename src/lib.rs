//! svn-color - drop-in svn wrapper that colorizes its output.
//!
//! This library provides the core functionality for svn-color, including:
//! - Line classification and ANSI colorization of svn output
//! - Configuration file parsing and cascade discovery
//! - Colorization gating and command execution with line-by-line relaying
//!
//! # Example
//!
//! ```
//! use svn_color::rules::Classifier;
//!
//! let classifier = Classifier::builtin().unwrap();
//!
//! assert_eq!(
//!     classifier.classify("M       src/lib.rs\n"),
//!     "\x1b[32mM       src/lib.rs\n\x1b[m"
//! );
//! assert_eq!(classifier.classify("Status against revision: 7\n"), "Status against revision: 7\n");
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod rules;

pub use error::{Result, SvnColorError};
