//! Glob matching for git refs.
//!
//! A pattern is a whitespace-separated list of alternatives. An alternative
//! starting with `!` excludes. A candidate matches when no exclusion matches
//! and at least one inclusion does; a pattern made only of exclusions
//! matches everything it does not exclude. `*` stops at `/`, `**` does not.
//! Braces and backslashes are ordinary characters: there is no `{a,b}`
//! alternation and no escaping.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use admission_types::{AdmissionError, Result};

/// A compiled glob alternation.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    include: GlobSet,
    exclude: GlobSet,
    has_include: bool,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut has_include = false;
        let mut has_exclude = false;

        for alt in pattern.split_whitespace() {
            let (builder, raw) = match alt.strip_prefix('!') {
                Some(rest) => {
                    has_exclude = true;
                    (&mut exclude, rest)
                }
                None => {
                    has_include = true;
                    (&mut include, alt)
                }
            };
            let glob = GlobBuilder::new(&literal_braces(raw))
                .literal_separator(true)
                .backslash_escape(false)
                .build()
                .map_err(|e| invalid(pattern, e))?;
            builder.add(glob);
        }

        if !has_include && !has_exclude {
            return Err(AdmissionError::InvalidGlob {
                pattern: pattern.to_string(),
                message: "empty pattern".into(),
            });
        }

        Ok(Self {
            include: include.build().map_err(|e| invalid(pattern, e))?,
            exclude: exclude.build().map_err(|e| invalid(pattern, e))?,
            has_include,
        })
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        if self.exclude.is_match(candidate) {
            return false;
        }
        !self.has_include || self.include.is_match(candidate)
    }
}

// Wrap `{` and `}` outside character classes in a class of their own so
// globset does not read them as alternation.
fn literal_braces(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            '[' => {
                out.push('[');
                if let Some(&neg) = chars.peek() {
                    if neg == '!' || neg == '^' {
                        out.push(neg);
                        chars.next();
                    }
                }
                // A leading ']' is a member, not the end of the class.
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
                for member in chars.by_ref() {
                    out.push(member);
                    if member == ']' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn invalid(pattern: &str, err: globset::Error) -> AdmissionError {
    AdmissionError::InvalidGlob {
        pattern: pattern.to_string(),
        message: err.to_string(),
    }
}

/// Compile `pattern` and match `candidate` against it.
pub fn glob_match(pattern: &str, candidate: &str) -> Result<bool> {
    Ok(GlobPattern::new(pattern)?.is_match(candidate))
}
