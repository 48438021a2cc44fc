//! Local link extraction from markdown text.
//!
//! A small line-oriented state machine:
//!
//! ```text
//! Prose ──(```+)──▶ Fenced(n) ──(``` × ≥n)──▶ Prose
//! ```
//!
//! Prose lines indented by four spaces or a tab are code. Inside a prose line,
//! `[text](target)` matches are scanned left to right without overlap, and a
//! running backtick parity decides whether a match sits in inline code.

use std::iter::Enumerate;
use std::str::Lines;

use crate::utils::path::route::{is_external_target, is_local_doc_target, split_path_fragment};

/// A local link found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalLink<'a> {
    /// 1-based line number.
    pub line: usize,
    /// Link target with any `#fragment` removed.
    pub target: &'a str,
    pub text: &'a str,
}

/// Fence tracking carried across lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FenceState {
    /// Backtick count of the opening fence; 0 outside fenced blocks.
    depth: usize,
}

impl FenceState {
    /// Feed one line. Returns `true` when the line must not be scanned.
    fn skip_line(&mut self, line: &str) -> bool {
        let ticks = leading_backticks(line.trim());
        if ticks >= 3 {
            if self.depth == 0 {
                self.depth = ticks;
            } else if ticks >= self.depth {
                self.depth = 0;
            }
            return true;
        }

        self.depth > 0 || line.starts_with("    ") || line.starts_with('\t')
    }
}

/// Lazy iterator over the local links of one document.
pub struct LinkExtractor<'a> {
    lines: Enumerate<Lines<'a>>,
    fence: FenceState,
    /// Line being scanned: (1-based number, text, byte offset to resume from).
    current: Option<(usize, &'a str, usize)>,
}

impl<'a> LinkExtractor<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().enumerate(),
            fence: FenceState::default(),
            current: None,
        }
    }
}

impl<'a> Iterator for LinkExtractor<'a> {
    type Item = LocalLink<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((number, line, pos)) = self.current {
                match next_link_match(line, pos) {
                    Some(m) => {
                        self.current = Some((number, line, m.end));
                        if let Some(link) = accept(line, number, &m) {
                            return Some(link);
                        }
                        continue;
                    }
                    None => self.current = None,
                }
            }

            let (index, line) = self.lines.next()?;
            if !self.fence.skip_line(line) {
                self.current = Some((index + 1, line, 0));
            }
        }
    }
}

/// Byte span of one `[text](target)` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LinkMatch {
    /// Offset of `[`.
    start: usize,
    /// Offset just past `)`.
    end: usize,
    text: (usize, usize),
    target: (usize, usize),
}

/// Find the next `[text](target)` at or after `from`.
///
/// `text` may not contain `]` and `target` may not contain `)`; both must be
/// non-empty. A failed attempt at one `[` moves on to the next `[`.
fn next_link_match(line: &str, from: usize) -> Option<LinkMatch> {
    let bytes = line.as_bytes();
    let mut start = from;

    while let Some(offset) = line.get(start..)?.find('[') {
        let open = start + offset;
        start = open + 1;

        let Some(close) = line[open + 1..].find(']').map(|i| open + 1 + i) else {
            return None;
        };
        if close == open + 1 || bytes.get(close + 1) != Some(&b'(') {
            continue;
        }

        let target_start = close + 2;
        let Some(paren) = line[target_start..].find(')').map(|i| target_start + i) else {
            continue;
        };
        if paren == target_start {
            continue;
        }

        return Some(LinkMatch {
            start: open,
            end: paren + 1,
            text: (open + 1, close),
            target: (target_start, paren),
        });
    }

    None
}

/// Apply the inline-code, external and local-path filters to a match.
fn accept<'a>(line: &'a str, number: usize, m: &LinkMatch) -> Option<LocalLink<'a>> {
    let before = &line[..m.start];
    if before.bytes().filter(|&b| b == b'`').count() % 2 == 1 {
        return None;
    }

    let bytes = line.as_bytes();
    let wrapped = m.start > 0
        && bytes[m.start - 1] == b'`'
        && bytes.get(m.end) == Some(&b'`');
    if wrapped {
        return None;
    }

    let target = &line[m.target.0..m.target.1];
    if is_external_target(target) || !is_local_doc_target(target) {
        return None;
    }

    let (path, _) = split_path_fragment(target);
    if path.is_empty() {
        return None;
    }

    Some(LocalLink {
        line: number,
        target: path,
        text: &line[m.text.0..m.text.1],
    })
}

#[inline]
fn leading_backticks(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'`').count()
}
