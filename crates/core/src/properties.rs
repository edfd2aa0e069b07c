//! Java `.properties` parsing
//!
//! Reads the flat `key=value` format Gradle and the Flutter tool use for
//! `local.properties`. Parsing follows `java.util.Properties#load`:
//!
//! - `#` and `!` start comment lines
//! - keys end at the first unescaped `=`, `:` or whitespace
//! - a trailing odd run of backslashes continues the logical line
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded
//!
//! Input is decoded as UTF-8 rather than ISO-8859-1.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading properties text
#[derive(Error, Debug)]
pub enum PropertiesError {
    /// A `\uXXXX` escape without four hex digits
    #[error("line {line}: malformed \\uxxxx encoding")]
    MalformedUnicodeEscape {
        /// 1-based line where the logical line starts
        line: usize,
    },

    /// Bytes that are not valid UTF-8
    #[error("properties text is not valid UTF-8 (byte offset {offset})")]
    InvalidUtf8 {
        /// Offset of the first invalid byte
        offset: usize,
    },

    /// Underlying read failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PropertiesError {
    /// Line number the error points at, when known
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedUnicodeEscape { line } => Some(*line),
            _ => None,
        }
    }
}

/// Parsed key/value pairs. Later duplicates override earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parse properties text
    pub fn parse(input: &str) -> Result<Self, PropertiesError> {
        let mut props = Self::default();

        for logical in logical_lines(input) {
            let (raw_key, raw_value) = split_key_value(&logical.chars);
            let key = unescape(raw_key, logical.line)?;
            let value = unescape(raw_value, logical.line)?;
            props.entries.insert(key, value);
        }

        Ok(props)
    }

    /// Parse raw bytes, rejecting anything that is not UTF-8
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PropertiesError> {
        let text = std::str::from_utf8(bytes).map_err(|e| PropertiesError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;
        Self::parse(text)
    }

    /// Read and parse a properties file.
    ///
    /// The file handle lives only for the duration of the read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PropertiesError> {
        let bytes = {
            let mut file = File::open(path.as_ref())?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            buf
        };
        Self::from_bytes(&bytes)
    }

    /// Look up a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a key, treating an empty value as absent
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

struct LogicalLine {
    line: usize,
    chars: Vec<char>,
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Split on `\n`, `\r` and `\r\n`, keeping 1-based line numbers.
fn natural_lines(input: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 1;
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push((number, &input[start..i]));
                i += 1;
            }
            b'\r' => {
                lines.push((number, &input[start..i]));
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
            }
            _ => {
                i += 1;
                continue;
            }
        }
        start = i;
        number += 1;
    }
    if start < input.len() {
        lines.push((number, &input[start..]));
    }

    lines
}

/// Count the run of backslashes at the end of `chars`
fn trailing_backslashes(chars: &[char]) -> usize {
    chars.iter().rev().take_while(|c| **c == '\\').count()
}

fn logical_lines(input: &str) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut naturals = natural_lines(input).into_iter();

    while let Some((number, text)) = naturals.next() {
        let trimmed = text.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut chars: Vec<char> = trimmed.chars().collect();
        while trailing_backslashes(&chars) % 2 == 1 {
            chars.pop();
            match naturals.next() {
                Some((_, next)) => {
                    let next = next.trim_start_matches(is_blank);
                    if next.is_empty() {
                        break;
                    }
                    chars.extend(next.chars());
                }
                None => break,
            }
        }

        out.push(LogicalLine { line: number, chars });
    }

    out
}

/// Split a logical line into raw (still escaped) key and value
fn split_key_value(chars: &[char]) -> (&[char], &[char]) {
    let limit = chars.len();
    let mut key_len = 0;
    let mut value_start = limit;
    let mut has_sep = false;
    let mut preceding_backslash = false;

    while key_len < limit {
        let c = chars[key_len];
        if !preceding_backslash {
            if c == '=' || c == ':' {
                value_start = key_len + 1;
                has_sep = true;
                break;
            }
            if is_blank(c) {
                value_start = key_len + 1;
                break;
            }
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
        key_len += 1;
    }

    while value_start < limit {
        let c = chars[value_start];
        if !is_blank(c) {
            if !has_sep && (c == '=' || c == ':') {
                has_sep = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    (&chars[..key_len], &chars[value_start..])
}

fn unescape(raw: &[char], line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut iter = raw.iter().copied();

    while let Some(c) = iter.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = iter.next() else {
            break;
        };
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = iter
                        .next()
                        .and_then(|d| d.to_digit(16))
                        .ok_or(PropertiesError::MalformedUnicodeEscape { line })?;
                    code = code * 16 + digit;
                }
                // Lone surrogates have no char representation
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
