//! Lightweight object-literal matching helpers
//!
//! Blocks are anchored with a regex and then closed by counting braces.
//! String literals and `//` / `/* */` comments are skipped, so a `'{'` in a
//! string or an apostrophe in a comment doesn't unbalance the count.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// `name: {` at the start of a nested object literal
static OBJECT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*:\s*\{").expect("valid regex"));

/// `name: <integer>`
static NUMBER_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*:\s*(-?\d+)").expect("valid regex"));

/// What a `CodeBytes` walk stepped over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Code,
    String,
    Comment,
}

/// Walks a source text span by span: single code bytes, whole string
/// literals, whole comments. Positions are byte offsets into the text.
struct CodeBytes<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> CodeBytes<'a> {
    fn new(text: &'a str, start: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: start,
        }
    }

    /// Index just past the closing quote. `'` and `"` strings end at a newline.
    fn skip_string(&self, open: usize) -> usize {
        let quote = self.bytes[open];
        let mut i = open + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' if quote != b'`' => return i,
                b if b == quote => return i + 1,
                _ => i += 1,
            }
        }
        self.bytes.len()
    }

    /// Index just past `end`, or the end of the text
    fn skip_until(&self, from: usize, end: &[u8]) -> usize {
        self.bytes[from.min(self.bytes.len())..]
            .windows(end.len())
            .position(|w| w == end)
            .map(|p| from + p + end.len())
            .unwrap_or(self.bytes.len())
    }
}

impl Iterator for CodeBytes<'_> {
    /// (kind, start, end) with `end` exclusive
    type Item = (Span, usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let b = *self.bytes.get(start)?;
        let next = self.bytes.get(start + 1).copied();

        let (span, end) = match (b, next) {
            (b'"' | b'\'' | b'`', _) => (Span::String, self.skip_string(start)),
            (b'/', Some(b'/')) => (Span::Comment, self.skip_until(start + 2, b"\n")),
            (b'/', Some(b'*')) => (Span::Comment, self.skip_until(start + 2, b"*/")),
            _ => (Span::Code, start + utf8_width(b)),
        };
        self.pos = end.min(self.bytes.len());
        Some((span, start, self.pos))
    }
}

/// Byte length of the UTF-8 character starting with `lead`
fn utf8_width(lead: u8) -> usize {
    match lead {
        0xF0.. => 4,
        0xE0.. => 3,
        0xC0.. => 2,
        _ => 1,
    }
}

/// Offsets of `{` and `}` outside strings and comments, from `start`
fn code_braces(text: &str, start: usize) -> impl Iterator<Item = (usize, u8)> + '_ {
    let bytes = text.as_bytes();
    CodeBytes::new(text, start)
        .filter(|(span, _, _)| *span == Span::Code)
        .map(move |(_, at, _)| (at, bytes[at]))
        .filter(|(_, b)| *b == b'{' || *b == b'}')
}

/// The text with every comment blanked out (same length, strings untouched)
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (span, start, end) in CodeBytes::new(text, 0) {
        match span {
            Span::Comment => {
                let comment = &text[start..end];
                // newline kept so line structure survives
                let newline = comment.ends_with('\n');
                out.extend(std::iter::repeat_n(' ', end - start - usize::from(newline)));
                if newline {
                    out.push('\n');
                }
            }
            _ => out.push_str(&text[start..end]),
        }
    }
    out
}

/// Byte index of the brace closing the one at `open`
pub fn matching_brace(text: &str, open: usize) -> Option<usize> {
    if text.as_bytes().get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    for (i, b) in code_braces(text, open) {
        if b == b'{' {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}

/// Inner text of the first block whose opening brace ends a match of `anchor`.
///
/// The anchor regex must end with `\{`. An anchor whose block never closes
/// is logged and treated as absent.
pub fn find_block<'a>(content: &'a str, anchor: &Regex) -> Option<&'a str> {
    let m = anchor.find(content)?;
    let open = m.end() - 1;
    let Some(close) = matching_brace(content, open) else {
        warn!("Block opened by '{}' is never closed", m.as_str().trim());
        return None;
    };
    Some(&content[open + 1..close])
}

/// Top-level `name: { ... }` entries of a block, in source order
pub fn nested_objects(block: &str) -> Vec<(&str, &str)> {
    let mut entries = Vec::new();
    let mut cursor = 0;

    while let Some(caps) = OBJECT_KEY.captures_at(block, cursor) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let open = whole.end() - 1;
        let Some(close) = matching_brace(block, open) else {
            warn!("Entry '{}' is never closed", name.as_str());
            break;
        };
        entries.push((name.as_str(), &block[open + 1..close]));
        cursor = close + 1;
    }

    entries
}

/// The block with every nested `{ ... }` removed, so lookups only see its own keys
pub fn top_level(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut cursor = 0;

    while let Some((open, _)) = code_braces(block, cursor).find(|(_, b)| *b == b'{') {
        out.push_str(&block[cursor..open]);
        match matching_brace(block, open) {
            Some(close) => cursor = close + 1,
            None => return out,
        }
    }

    out.push_str(&block[cursor..]);
    out
}

/// Value of `key: <integer>` in a block
pub fn number_field(block: &str, key: &str) -> Option<i64> {
    number_pairs(block)
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| value)
}

/// Every `key: <integer>` pair in a block, in source order
pub fn number_pairs(block: &str) -> Vec<(&str, i64)> {
    NUMBER_PAIR
        .captures_iter(block)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str().parse().ok()?;
            Some((key, value))
        })
        .collect()
}
