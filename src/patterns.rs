/*!
 * Exclusion pattern compilation and matching
 *
 * Patterns are matched against paths relative to the destination root,
 * always written with forward slashes.
 *
 * - `lib/` (trailing separator) excludes everything under `lib/`
 * - `*.spec.ts` excludes any path matching the whole glob, where `*` matches
 *   any run of characters (including `/`) and `?` matches exactly one
 * - anything else must equal the relative path exactly
 */

use std::fmt;

use regex::Regex;

/// A compiled exclusion pattern
#[derive(Debug, Clone)]
pub enum ExclusionPattern {
    /// Literal prefix, separator included
    Prefix(String),
    /// Anchored whole-path glob
    Glob {
        /// Pattern as given by the user
        source: String,
        /// Compiled `^...$` expression
        regex: Regex,
    },
    /// Exact path, used when a glob cannot be compiled
    Literal(String),
}

impl ExclusionPattern {
    /// Compile a user-supplied pattern. Never fails: anything that cannot
    /// become a regex falls back to an exact string comparison.
    pub fn parse(pattern: &str) -> Self {
        if pattern.ends_with('/') || pattern.ends_with('\\') {
            return Self::Prefix(pattern.replace('\\', "/"));
        }

        match Regex::new(&glob_to_regex(pattern)) {
            Ok(regex) => Self::Glob {
                source: pattern.to_string(),
                regex,
            },
            Err(e) => {
                tracing::debug!(pattern, error = %e, "falling back to literal match");
                Self::Literal(pattern.to_string())
            }
        }
    }

    /// Check a forward-slash relative path against this pattern
    pub fn is_match(&self, relative_path: &str) -> bool {
        match self {
            Self::Prefix(prefix) => relative_path.starts_with(prefix.as_str()),
            Self::Glob { regex, .. } => regex.is_match(relative_path),
            Self::Literal(literal) => relative_path == literal,
        }
    }

    /// The pattern text as the user wrote it (prefixes normalized)
    pub fn as_str(&self) -> &str {
        match self {
            Self::Prefix(s) | Self::Literal(s) => s,
            Self::Glob { source, .. } => source,
        }
    }
}

impl fmt::Display for ExclusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a glob into an anchored regular expression.
///
/// Literal runs are escaped with [`regex::escape`]; `(?s)` lets `*` cross
/// line breaks so no path character is unmatched.
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");

    let mut literal = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

/// Returns true iff any pattern matches `relative_path`
pub fn matches(relative_path: &str, patterns: &[ExclusionPattern]) -> bool {
    first_match(relative_path, patterns).is_some()
}

/// Returns the first pattern matching `relative_path`, if any
pub fn first_match<'a>(
    relative_path: &str,
    patterns: &'a [ExclusionPattern],
) -> Option<&'a ExclusionPattern> {
    patterns.iter().find(|p| p.is_match(relative_path))
}

/// Compile a list of raw patterns, skipping empty entries
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Vec<ExclusionPattern> {
    patterns
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .map(ExclusionPattern::parse)
        .collect()
}
