//! # Dependency Directive Scanning
//!
//! Source files declare what they must be preceded by in their leading
//! block comment, using `@depend <path>` (the historical `@depends`
//! spelling is accepted too). The argument is a path relative to the
//! declaring file's directory, containing no whitespace and not quoted.
//!
//! Scanning is purely line-based and deliberately knows nothing about the
//! grammar of the files it reads: it walks lines from the top and stops
//! after the first line containing the comment-close marker, so directives
//! are only honored inside a file's *opening* comment block. A directive
//! sharing a line with the closing marker is still honored.

use regex::Regex;

use crate::error::Result;

/// Marker that ends the scan region.
const COMMENT_CLOSE: &str = "*/";

/// Line scanner for dependency directives.
///
/// Compiled once and owned by the source registry so the pattern is not
/// rebuilt for every file.
#[derive(Debug)]
pub struct DirectiveScanner {
    pattern: Regex,
}

impl DirectiveScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // One non-whitespace, non-quote token after the directive.
            pattern: Regex::new(r#"@depends?\s+([^\s'";]+)"#)?,
        })
    }

    /// Extract dependency tokens from the leading comment block of
    /// `content`, in declaration order.
    ///
    /// Files with no directives yield an empty list.
    pub fn scan(&self, content: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for line in content.lines() {
            if let Some(captures) = self.pattern.captures(line) {
                tokens.push(captures[1].to_string());
            }
            if line.contains(COMMENT_CLOSE) {
                break;
            }
        }

        tokens
    }
}
