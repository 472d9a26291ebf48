//! Lenient dotenv parsing
//!
//! Accepts `KEY=VALUE` and `export KEY=VALUE` lines. Blank lines and `#`
//! comments are ignored. Malformed lines are reported individually and never
//! abort the parse.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Result of parsing one dotenv file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotenvFile {
    /// Parsed variables; a later line wins over an earlier one
    pub variables: BTreeMap<String, String>,
    /// Lines that could not be parsed
    pub skipped: Vec<SkippedLine>,
}

/// A dotenv line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line_no: usize,
    pub reason: String,
}

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:export\s+)?([A-Za-z_][A-Za-z0-9_.]*)\s*=\s*(.*)$")
            .expect("dotenv line regex is valid")
    })
}

impl DotenvFile {
    pub fn parse(content: &str) -> Self {
        let mut parsed = DotenvFile::default();

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match line_regex().captures(trimmed) {
                Some(caps) => {
                    let key = caps[1].to_string();
                    match parse_value(&caps[2]) {
                        Some(value) => {
                            parsed.variables.insert(key, value);
                        }
                        None => parsed.skipped.push(SkippedLine {
                            line_no: idx + 1,
                            reason: format!("unterminated quote in value of {key}"),
                        }),
                    }
                }
                None => parsed.skipped.push(SkippedLine {
                    line_no: idx + 1,
                    reason: if trimmed.contains('=') {
                        "invalid variable name".to_string()
                    } else {
                        "expected KEY=VALUE".to_string()
                    },
                }),
            }
        }

        parsed
    }
}

/// Strip trailing comment and surrounding quotes.
///
/// Returns `None` for a value that opens a quote without closing it.
fn parse_value(raw: &str) -> Option<String> {
    let value = strip_trailing_comment(raw);
    let first = value.chars().next();
    if matches!(first, Some('"') | Some('\'')) {
        let quote = first?;
        if value.len() < 2 || !value.ends_with(quote) {
            return None;
        }
        let inner = &value[1..value.len() - 1];
        return Some(if quote == '"' {
            unescape_double_quoted(inner)
        } else {
            inner.to_string()
        });
    }
    Some(value.to_string())
}

/// Strip trailing comment from a value, respecting quotes.
/// `'value'  # comment` → `'value'`
/// `value  # comment` → `value`
/// `'val#ue'` → `'val#ue'`
fn strip_trailing_comment(s: &str) -> &str {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
            b'"' if !in_single_quote => in_double_quote = !in_double_quote,
            // only a comment when preceded by whitespace; a leading `#` is data
            b'#' if !in_single_quote
                && !in_double_quote
                && i > 0
                && bytes[i - 1].is_ascii_whitespace() =>
            {
                return s[..i].trim_end();
            }
            _ => {}
        }
    }
    s
}

fn unescape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_hash_inside_value_without_space_when_parsing_then_keeps_it() {
        let parsed = DotenvFile::parse("COLOR=#fff\nURL=http://x/#frag # note\n");
        assert_eq!(parsed.variables.get("COLOR"), Some(&"#fff".to_string()));
        assert_eq!(
            parsed.variables.get("URL"),
            Some(&"http://x/#frag".to_string())
        );
    }

    #[test]
    fn given_value_starting_with_hash_when_parsing_then_value_kept() {
        let parsed = DotenvFile::parse("API_TOKEN=#abc\nexport SHADE=#000 # dark\n");
        assert_eq!(parsed.variables.get("API_TOKEN"), Some(&"#abc".to_string()));
        assert_eq!(parsed.variables.get("SHADE"), Some(&"#000".to_string()));
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn given_escaped_double_quotes_when_parsing_then_unescapes() {
        let parsed = DotenvFile::parse(r#"MSG="say \"hi\"\nbye""#);
        assert_eq!(
            parsed.variables.get("MSG"),
            Some(&"say \"hi\"\nbye".to_string())
        );
    }

    #[test]
    fn given_unterminated_quote_when_parsing_then_skips_line() {
        let parsed = DotenvFile::parse("BROKEN=\"open\nOK=1\n");
        assert!(!parsed.variables.contains_key("BROKEN"));
        assert_eq!(parsed.variables.get("OK"), Some(&"1".to_string()));
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line_no, 1);
    }
}
