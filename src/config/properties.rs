// ABOUTME: Parser for the key=value properties file format
// ABOUTME: Supports comments, line continuations and backslash escapes

use std::collections::HashMap;

/// A parsed properties file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Parse properties text. Malformed lines never fail: anything that is
    /// not a comment becomes an entry, possibly with an empty value.
    pub fn parse(input: &str) -> Self {
        let mut entries = HashMap::new();
        let mut lines = input.lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            entries.insert(unescape(key), unescape(value));
        }

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// A line continues onto the next one when it ends in an odd number of backslashes
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start();
    let rest = rest
        .strip_prefix(|c| c == '=' || c == ':')
        .unwrap_or(rest)
        .trim_start();
    (&line[..key_end], rest)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{0c}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let decoded = if hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    // Not a valid escape, keep it as written
                    _ => out.push_str("\\u"),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        let props = Properties::parse("a=1\nb: 2\nc 3\nd   =   4\n");
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.get("d"), Some("4"));
        assert_eq!(props.keys().count(), 4);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let props = Properties::parse("# comment\n! also a comment\n\n   \nkey=value\n");
        assert_eq!(props.keys().count(), 1);
        assert_eq!(props.get("key"), Some("value"));
    }

    #[test]
    fn test_value_keeps_inner_separators() {
        let props = Properties::parse("Person.selectAll.format=%d: %s = ok%n\n");
        assert_eq!(props.get("Person.selectAll.format"), Some("%d: %s = ok%n"));
    }

    #[test]
    fn test_line_continuation() {
        let props = Properties::parse(
            "Person.selectAll.statement=SELECT id, name \\\n    FROM Person \\\n    ORDER BY id\n",
        );
        assert_eq!(
            props.get("Person.selectAll.statement"),
            Some("SELECT id, name FROM Person ORDER BY id")
        );
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        let props = Properties::parse("path=C:\\\\\nnext=1\n");
        assert_eq!(props.get("path"), Some("C:\\"));
        assert_eq!(props.get("next"), Some("1"));
    }

    #[test]
    fn test_escapes() {
        let props = Properties::parse("key\\ with\\ spaces=tab\\there\nuni=caf\\u00e9\nbad=\\uZZ\n");
        assert_eq!(props.get("key with spaces"), Some("tab\there"));
        assert_eq!(props.get("uni"), Some("café"));
        assert_eq!(props.get("bad"), Some("\\uZZ"));
    }

    #[test]
    fn test_later_keys_override() {
        let props = Properties::parse("a=1\na=2\n");
        assert_eq!(props.get("a"), Some("2"));
    }

    #[test]
    fn test_key_without_value() {
        let props = Properties::parse("empty\nblank=\n");
        assert_eq!(props.get("empty"), Some(""));
        assert_eq!(props.get("blank"), Some(""));
    }
}
