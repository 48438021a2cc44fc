//! Display-title truncation.

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 27;

/// Fraction of the limit a word-boundary cut must reach.
pub const WORD_BREAK_RATIO: f64 = 0.7;

const ELLIPSIS: &str = "...";

/// Shorten `title` to at most `max_len` characters plus an ellipsis.
///
/// Length is counted in Unicode scalar values. A title that fits is returned
/// unchanged. Otherwise the first `max_len` characters are kept, cut back to
/// the last space when that space sits at or after `ratio * max_len`.
pub fn truncate_title(title: &str, max_len: usize, ratio: f64) -> String {
    let Some((cut_byte, _)) = title.char_indices().nth(max_len) else {
        return title.to_string();
    };
    let head = &title[..cut_byte];

    let threshold = ratio * max_len as f64;
    let space = head
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| *c == ' ')
        .last();

    match space {
        Some((char_idx, (byte_idx, _))) if char_idx as f64 >= threshold => {
            format!("{}{ELLIPSIS}", &head[..byte_idx])
        }
        _ => format!("{head}{ELLIPSIS}"),
    }
}
