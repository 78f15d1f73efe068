//! Gitignore pattern compilation and matching (gitwildmatch dialect).
//!
//! Each line of an ignore file compiles to one [`Pattern`]; a [`PatternSet`]
//! evaluates a relative path against all patterns in declaration order with
//! last-match-wins precedence, so a later `!` negation can un-exclude an
//! earlier match.

use regex::Regex;

/// One compiled ignore rule.
///
/// A malformed line (invalid character class, `**` glued to other characters,
/// trailing backslash, a bare `/`) compiles to a pattern with no regex, which
/// never matches anything but never aborts compilation either.
#[derive(Debug)]
pub struct Pattern {
    regex: Option<Regex>,
    negated: bool,
    dir_only: bool,
}

impl Pattern {
    /// Compile a single ignore line. The caller has already stripped
    /// surrounding whitespace and dropped blank and `#` comment lines.
    pub fn compile(line: &str) -> Self {
        let mut rest = line;

        let negated = rest.starts_with('!');
        if let Some(stripped) = rest.strip_prefix('!') {
            rest = stripped;
        }

        // Trailing unescaped slash marks a directory-only pattern.
        let dir_only = rest.ends_with('/') && !rest.ends_with("\\/");
        if dir_only {
            rest = rest.strip_suffix('/').unwrap_or(rest);
        }

        // A leading slash, or any slash before the last character, anchors
        // the pattern to the full relative path.
        let anchored =
            rest.starts_with('/') || rest.find('/').is_some_and(|i| i + 1 < rest.len());
        rest = rest.strip_prefix('/').unwrap_or(rest);

        let regex = if rest.is_empty() {
            None
        } else {
            compile_regex(rest, anchored)
        };

        Pattern {
            regex,
            negated,
            dir_only,
        }
    }

    fn matches(&self, path: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(path))
    }
}

/// An ordered set of compiled ignore rules.
#[derive(Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = lines
            .into_iter()
            .map(|line| Pattern::compile(line.as_ref()))
            .collect();
        PatternSet { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Evaluate a `/`-separated path relative to the scan root. Directory
    /// candidates may carry a trailing slash; directory-only patterns only
    /// ever match directory candidates. Every pattern is consulted in
    /// declaration order and the last match decides the verdict.
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        let candidate = relative_path.strip_suffix('/').unwrap_or(relative_path);

        let mut excluded = false;
        for pattern in &self.patterns {
            if pattern.dir_only && !is_dir {
                continue;
            }
            if pattern.matches(candidate) {
                excluded = !pattern.negated;
            }
        }
        excluded
    }
}

/// Translate a gitwildmatch pattern (negation, leading and trailing slashes
/// already stripped) into an anchored regex over the relative path.
fn compile_regex(pattern: &str, anchored: bool) -> Option<Regex> {
    let segments: Vec<&str> = pattern.split('/').collect();

    // "a//b" and friends are malformed.
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    // "**" is only meaningful as a whole segment.
    if segments.iter().any(|s| s.contains("**") && *s != "**") {
        return None;
    }

    let mut body = String::new();
    let mut needs_slash = false;
    let last = segments.len() - 1;
    for (i, segment) in segments.iter().enumerate() {
        if *segment == "**" {
            if segments.len() == 1 {
                // Bare "**" matches every path.
                body.push_str(".*");
            } else if i == last {
                // Trailing "/**" matches everything inside, not the
                // directory itself.
                if needs_slash {
                    body.push('/');
                }
                body.push_str(".+");
                needs_slash = false;
            } else {
                if needs_slash {
                    body.push('/');
                    needs_slash = false;
                }
                // Zero or more whole segments.
                body.push_str("(?:[^/]+/)*");
            }
        } else {
            if needs_slash {
                body.push('/');
            }
            translate_segment(segment, &mut body)?;
            needs_slash = true;
        }
    }

    let full = if anchored {
        format!("^{body}$")
    } else {
        // Suffix-aligned: a bare pattern matches at any depth.
        format!("^(?:.*/)?{body}$")
    };
    Regex::new(&full).ok()
}

/// Translate one glob segment, appending regex text to `out`. Returns `None`
/// for malformed segments.
fn translate_segment(segment: &str, out: &mut String) -> Option<()> {
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '\\' => {
                let escaped = chars.next()?;
                push_literal(escaped, out);
            }
            '[' => {
                let negated = matches!(chars.peek(), Some('!') | Some('^'));
                if negated {
                    chars.next();
                }
                let mut inner = String::new();
                // A closing bracket in first position is a literal.
                if chars.peek() == Some(&']') {
                    chars.next();
                    inner.push_str("\\]");
                }
                let mut closed = false;
                for cc in chars.by_ref() {
                    match cc {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '\\' => inner.push_str("\\\\"),
                        '[' => inner.push_str("\\["),
                        _ => inner.push(cc),
                    }
                }
                if !closed {
                    return None;
                }
                // A class never matches the path separator, even via a
                // range like `,-1` that spans `/`.
                if negated {
                    out.push_str(&format!("[^/{inner}]"));
                } else {
                    out.push_str(&format!("[{inner}&&[^/]]"));
                }
            }
            _ => push_literal(c, out),
        }
    }
    Some(())
}

fn push_literal(c: char, out: &mut String) {
    out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
}
