//! Shell-style path globs with extended pattern groups.
//!
//! A [`Glob`] is compiled once and matched against `/`-separated paths. The
//! dialect is the one contribution repositories already write their labeler
//! configs in:
//!
//! - `*` matches any run of characters within one path segment, `?` exactly
//!   one character, `[...]` a character class (`!`/`^` negate, ranges, POSIX
//!   classes such as `[[:alpha:]]`).
//! - A segment that is exactly `**` matches any number of whole segments:
//!   zero or more in the middle of a pattern, at least one at the end.
//! - Extended groups: `+(a|b)` one or more, `?(a|b)` zero or one, `*(a|b)` zero
//!   or more, `@(a|b)` exactly one. Groups nest.
//! - Brace alternatives `{a,b}` are expanded before anything else.
//! - A leading `!` negates the whole pattern.
//! - Wildcards never match a segment starting with `.` unless the pattern
//!   segment itself starts with a literal `.`.
//!
//! Each non-literal segment is compiled to an anchored [`Regex`]; globstars
//! are resolved by a small backtracking matcher over segments.

use std::fmt;
use std::fmt::Write as _;

use regex::Regex;
use thiserror::Error;

const POSIX_CLASSES: &[&str] = &[
    "alnum", "alpha", "ascii", "blank", "cntrl", "digit", "graph", "lower", "print", "punct",
    "space", "upper", "word", "xdigit",
];

/// Errors produced while compiling a glob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobError {
    /// `!(...)` groups cannot be expressed by the segment compiler.
    #[error("negated pattern groups `!(...)` are not supported: `{pattern}`")]
    NegatedGroup {
        /// The full pattern being compiled.
        pattern: String,
    },

    /// The pattern translated to something the regex engine rejected
    /// (typically a malformed character range such as `[z-a]`).
    #[error("invalid glob `{pattern}`: {message}")]
    Invalid {
        /// The full pattern being compiled.
        pattern: String,
        /// Why it was rejected.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Glob
// ---------------------------------------------------------------------------

/// A compiled path glob.
#[derive(Clone, Debug)]
pub struct Glob {
    source: String,
    negated: bool,
    /// One segment list per brace expansion.
    alternatives: Vec<Vec<Segment>>,
}

#[derive(Clone, Debug)]
enum Segment {
    /// Matched by string equality.
    Literal(String),
    /// `**` on its own.
    Globstar,
    /// Anything with wildcards, classes or groups.
    Wild {
        regex: Regex,
        /// The pattern segment starts with a literal `.`.
        dot: bool,
    },
}

impl Glob {
    /// Compile `pattern`.
    ///
    /// # Errors
    /// Returns [`GlobError`] if the pattern uses `!(...)` or translates to an
    /// invalid character class.
    pub fn new(pattern: &str) -> Result<Self, GlobError> {
        let (negated, body) = strip_negation(pattern);

        let alternatives = expand_braces(body)
            .iter()
            .map(|expanded| {
                expanded
                    .split('/')
                    .map(|segment| compile_segment(segment, pattern))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: pattern.to_owned(),
            negated,
            alternatives,
        })
    }

    /// The pattern text this glob was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a `/`-separated path against the glob.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').collect();
        let hit = self
            .alternatives
            .iter()
            .any(|segments| match_segments(segments, &parts));
        hit != self.negated
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Segment {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == name,
            Self::Globstar => !name.is_empty() && !is_hidden(name),
            Self::Wild { regex, dot } => {
                !name.is_empty() && (*dot || !is_hidden(name)) && regex.is_match(name)
            }
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

// ---------------------------------------------------------------------------
// Segment matching
// ---------------------------------------------------------------------------

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        // A trailing slash leaves one empty segment behind.
        return path.is_empty() || path == [""];
    };

    if let Segment::Globstar = first {
        if rest.is_empty() {
            return !path.is_empty() && path.iter().all(|name| !is_hidden(name));
        }
        for skip in 0..path.len() {
            if match_segments(rest, &path[skip..]) {
                return true;
            }
            if is_hidden(path[skip]) {
                return false;
            }
        }
        return false;
    }

    match path.split_first() {
        Some((name, remaining)) => first.matches(name) && match_segments(rest, remaining),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

fn strip_negation(pattern: &str) -> (bool, &str) {
    let mut negated = false;
    let mut body = pattern;
    while let Some(rest) = body.strip_prefix('!') {
        if rest.starts_with('(') {
            break;
        }
        negated = !negated;
        body = rest;
    }
    (negated, body)
}

fn compile_segment(segment: &str, pattern: &str) -> Result<Segment, GlobError> {
    if segment == "**" {
        return Ok(Segment::Globstar);
    }

    let chars: Vec<char> = segment.chars().collect();
    let (source, magic) = translate(&chars, pattern)?;
    if !magic {
        return Ok(Segment::Literal(unescape(&chars)));
    }

    let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| GlobError::Invalid {
        pattern: pattern.to_owned(),
        message: e.to_string(),
    })?;
    Ok(Segment::Wild {
        regex,
        dot: segment.starts_with('.'),
    })
}

/// Translate one segment (or one group alternative) into regex syntax.
/// Returns the regex fragment and whether it contains anything but literals.
fn translate(chars: &[char], pattern: &str) -> Result<(String, bool), GlobError> {
    let mut out = String::new();
    let mut magic = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' && i + 1 < chars.len() {
            push_literal(&mut out, chars[i + 1]);
            i += 2;
            continue;
        }

        if matches!(c, '+' | '@' | '!' | '?' | '*')
            && chars.get(i + 1) == Some(&'(')
            && let Some(close) = find_group_end(chars, i + 1)
        {
            if c == '!' {
                return Err(GlobError::NegatedGroup {
                    pattern: pattern.to_owned(),
                });
            }
            let mut alternatives = Vec::new();
            for alternative in split_alternatives(&chars[i + 2..close]) {
                alternatives.push(translate(alternative, pattern)?.0);
            }
            let quantifier = match c {
                '+' => "+",
                '?' => "?",
                '*' => "*",
                _ => "",
            };
            let _ = write!(out, "(?:{}){quantifier}", alternatives.join("|"));
            magic = true;
            i = close + 1;
            continue;
        }

        match c {
            '*' => {
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                out.push_str("[^/]*");
                magic = true;
            }
            '?' => {
                out.push_str("[^/]");
                magic = true;
            }
            '[' => {
                if let Some((class, end)) = parse_class(chars, i) {
                    out.push_str(&class);
                    magic = true;
                    i = end;
                } else {
                    push_literal(&mut out, '[');
                }
            }
            _ => push_literal(&mut out, c),
        }
        i += 1;
    }

    Ok((out, magic))
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut iter = chars.iter();
    while let Some(&c) = iter.next() {
        if c == '\\' {
            out.push(iter.next().copied().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Index of the `)` closing the group whose `(` is at `open`.
fn find_group_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => {
                if let Some((_, end)) = parse_class(chars, i) {
                    i = end;
                }
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split a group body on `|` at nesting depth zero.
fn split_alternatives(body: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            '\\' => i += 1,
            '[' => {
                if let Some((_, end)) = parse_class(body, i) {
                    i = end;
                }
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&body[start..]);
    parts
}

/// Parse a bracket expression starting at `start` (the `[`).
/// Returns the regex class and the index of the closing `]`, or `None` when
/// the bracket is never closed and should be read literally.
fn parse_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut out = String::from("[");
    let mut i = start + 1;
    if matches!(chars.get(i), Some('!' | '^')) {
        out.push('^');
        i += 1;
    }
    let body_start = i;

    while i < chars.len() {
        let c = chars[i];
        if c == ']' && i > body_start {
            out.push(']');
            return Some((out, i));
        }
        if c == '['
            && chars.get(i + 1) == Some(&':')
            && let Some(name) = posix_class_at(chars, i)
        {
            let _ = write!(out, "[:{name}:]");
            i += name.len() + 4;
            continue;
        }
        if c == '\\' && i + 1 < chars.len() {
            push_class_literal(&mut out, chars[i + 1]);
            i += 2;
            continue;
        }
        if c == '-' && i > body_start && chars.get(i + 1).is_some_and(|&n| n != ']') {
            out.push('-');
        } else {
            push_class_literal(&mut out, c);
        }
        i += 1;
    }
    None
}

/// `[:name:]` at `i`, if `name` is a known POSIX class.
fn posix_class_at(chars: &[char], i: usize) -> Option<String> {
    let rest = &chars[i + 2..];
    let end = rest.windows(2).position(|w| w == [':', ']'])?;
    let name: String = rest[..end].iter().collect();
    POSIX_CLASSES.contains(&name.as_str()).then_some(name)
}

fn push_class_literal(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}

/// Expand `{a,b}` alternatives. Braces without a top-level comma are literal.
fn expand_braces(pattern: &str) -> Vec<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => {
                if let Some((close, commas)) = brace_group(&chars, i)
                    && !commas.is_empty()
                {
                    let prefix: String = chars[..i].iter().collect();
                    let suffix: String = chars[close + 1..].iter().collect();
                    let mut bounds = Vec::with_capacity(commas.len() + 2);
                    bounds.push(i);
                    bounds.extend(commas);
                    bounds.push(close);
                    return bounds
                        .windows(2)
                        .flat_map(|w| {
                            let choice: String = chars[w[0] + 1..w[1]].iter().collect();
                            expand_braces(&format!("{prefix}{choice}{suffix}"))
                        })
                        .collect();
                }
            }
            _ => {}
        }
        i += 1;
    }
    vec![pattern.to_owned()]
}

/// Closing index and top-level comma positions of the brace group at `open`.
fn brace_group(chars: &[char], open: usize) -> Option<(usize, Vec<usize>)> {
    let mut depth = 0usize;
    let mut commas = Vec::new();
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((i, commas));
                }
            }
            ',' if depth == 1 => commas.push(i),
            _ => {}
        }
        i += 1;
    }
    None
}
