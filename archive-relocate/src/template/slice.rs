//! Character slices applied to resolved placeholder values.
//!
//! A slice is written `[start:stop]` with either bound optional. Bounds are
//! half-open, negative values count from the end of the value, and anything
//! out of range is clamped, so a slice never fails at render time.

use std::fmt;

/// A `[start:stop]` suffix on a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

impl Slice {
    pub fn new(start: Option<i64>, stop: Option<i64>) -> Self {
        Self { start, stop }
    }

    /// Apply the slice to `value`, counting in characters.
    ///
    /// ```
    /// use archive_relocate::template::Slice;
    ///
    /// assert_eq!(Slice::new(None, Some(2)).apply("abcdef"), "ab");
    /// assert_eq!(Slice::new(Some(2), None).apply("abcdef"), "cdef");
    /// assert_eq!(Slice::new(Some(-2), None).apply("abcdef"), "ef");
    /// ```
    pub fn apply(&self, value: &str) -> String {
        let len = value.chars().count() as i64;
        let start = resolve_bound(self.start, 0, len);
        let stop = resolve_bound(self.stop, len, len);
        if start >= stop {
            return String::new();
        }
        value
            .chars()
            .skip(start as usize)
            .take((stop - start) as usize)
            .collect()
    }

    /// Parse a slice at the very start of `input`.
    ///
    /// Returns the slice and the number of bytes it occupied, or `None` when
    /// `input` does not begin with a well-formed `[start:stop]`.
    pub(crate) fn parse_prefix(input: &str) -> Option<(Slice, usize)> {
        let body = input.strip_prefix('[')?;
        let close = body.find(']')?;
        let (start_text, stop_text) = body[..close].split_once(':')?;
        let slice = Slice {
            start: parse_bound(start_text)?,
            stop: parse_bound(stop_text)?,
        };
        Some((slice, close + 2))
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        f.write_str(":")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        f.write_str("]")
    }
}

fn resolve_bound(bound: Option<i64>, default: i64, len: i64) -> i64 {
    match bound {
        None => default,
        Some(b) if b < 0 => (b + len).max(0),
        Some(b) => b.min(len),
    }
}

/// `Some(None)` for an omitted bound, `None` when the text is not a bound.
fn parse_bound(text: &str) -> Option<Option<i64>> {
    if text.is_empty() {
        return Some(None);
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok().map(Some)
}
