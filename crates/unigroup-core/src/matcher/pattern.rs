// ── String rule patterns ──
//
// One rule field carries four syntaxes, told apart by sniffing:
//   "Apple,Samsung"   comma list, OR of the trimmed parts
//   "~^iPhone-\d+"    regex (unanchored search)
//   "*phone*"         shell-style glob over the whole value
//   "Apple"           exact
// All comparisons are case-insensitive. A pattern that fails to compile
// becomes `Never` so evaluation carries on with the other rules.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// A compiled string pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Empty or uncompilable; matches nothing.
    Never,
    /// Comma-separated alternatives.
    Any(Vec<Pattern>),
    /// `~`-prefixed regular expression.
    Regex(Regex),
    /// `*` / `?` glob, compiled to an anchored regex.
    Glob(Regex),
    /// Lowercased literal.
    Exact(String),
}

impl Pattern {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Never;
        }

        if raw.contains(',') && !raw.starts_with('~') {
            return Self::Any(raw.split(',').map(|part| Self::parse(part.trim())).collect());
        }

        if let Some(expr) = raw.strip_prefix('~') {
            return match RegexBuilder::new(expr).case_insensitive(true).build() {
                Ok(re) => Self::Regex(re),
                Err(err) => {
                    debug!(pattern = raw, error = %err, "ignoring invalid regex pattern");
                    Self::Never
                }
            };
        }

        if raw.contains(['*', '?']) {
            return match glob_to_regex(raw) {
                Ok(re) => Self::Glob(re),
                Err(err) => {
                    debug!(pattern = raw, error = %err, "ignoring invalid glob pattern");
                    Self::Never
                }
            };
        }

        Self::Exact(raw.to_lowercase())
    }

    /// Test a candidate value. Absent or empty values never match.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return false;
        };
        self.matches_str(value)
    }

    fn matches_str(&self, value: &str) -> bool {
        match self {
            Self::Never => false,
            Self::Any(parts) => parts.iter().any(|p| p.matches_str(value)),
            Self::Regex(re) | Self::Glob(re) => re.is_match(value),
            Self::Exact(expected) => value.to_lowercase() == *expected,
        }
    }
}

/// One-shot pattern test: parse `pattern` and match it against `value`.
pub fn pattern_matches(pattern: &str, value: Option<&str>) -> bool {
    Pattern::parse(pattern).matches(value)
}

/// Translate a shell glob into an anchored, case-insensitive regex.
///
/// `*` is any run, `?` any single character, `[seq]` / `[!seq]` a character
/// class. An unterminated `[` is a literal bracket.
fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let chars: Vec<char> = glob.chars().collect();
    let mut expr = String::from(r"\A(?s:");
    let mut i = 0;

    while let Some(&ch) = chars.get(i) {
        i += 1;
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut expr, chars.get(i..end).unwrap_or_default());
                    i = end + 1;
                }
                None => expr.push_str(r"\["),
            },
            other => {
                let mut buf = [0u8; 4];
                expr.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }

    expr.push_str(r")\z");
    RegexBuilder::new(&expr).case_insensitive(true).build()
}

/// Index of the `]` closing a class that opens just before `start`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading `]` is part of the class, not its end.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while let Some(&c) = chars.get(j) {
        if c == ']' {
            return Some(j);
        }
        j += 1;
    }
    None
}

fn push_class(expr: &mut String, body: &[char]) {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    expr.push('[');
    if negated {
        expr.push('^');
    }
    for &c in body {
        if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
            expr.push('\\');
        }
        expr.push(c);
    }
    expr.push(']');
}
