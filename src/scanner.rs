//! Cursor-based character scanner
//!
//! Positions are character offsets into the normalized input, never byte
//! offsets. Every scan reports "no match" with `None` instead of failing, and
//! leaves the cursor alone unless it actually consumed something. Callers
//! that look ahead are responsible for restoring the position themselves.

/// A set of characters a scan stops at (or runs over).
pub trait CharSet {
    fn contains(&self, c: char) -> bool;
}

impl CharSet for char {
    fn contains(&self, c: char) -> bool {
        *self == c
    }
}

impl CharSet for [char] {
    fn contains(&self, c: char) -> bool {
        self.iter().any(|&x| x == c)
    }
}

impl<const N: usize> CharSet for [char; N] {
    fn contains(&self, c: char) -> bool {
        self.iter().any(|&x| x == c)
    }
}

impl<F: Fn(char) -> bool> CharSet for F {
    fn contains(&self, c: char) -> bool {
        self(c)
    }
}

/// Cursor over a text buffer
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    position: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
        }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor, clamped to the end of input.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.chars.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Scan everything before the first character in `set`, then skip
    /// `then_skip` more characters. Returns `None` (and skips nothing) when
    /// no character was consumed.
    pub fn scan_up_to<S: CharSet + ?Sized>(&mut self, set: &S, then_skip: usize) -> Option<String> {
        let start = self.position;
        let end = self.chars[start..]
            .iter()
            .position(|&c| set.contains(c))
            .map_or(self.chars.len(), |n| start + n);
        self.take(start, end, then_skip)
    }

    /// Scan the run of characters contained in `set`.
    pub fn scan_while<S: CharSet + ?Sized>(&mut self, set: &S, then_skip: usize) -> Option<String> {
        let start = self.position;
        let end = self.chars[start..]
            .iter()
            .position(|&c| !set.contains(c))
            .map_or(self.chars.len(), |n| start + n);
        self.take(start, end, then_skip)
    }

    fn take(&mut self, start: usize, end: usize, then_skip: usize) -> Option<String> {
        if end == start {
            return None;
        }
        self.position = end;
        if then_skip > 0 {
            self.skip(then_skip as isize);
        }
        Some(self.chars[start..end].iter().collect())
    }

    /// Scan an unsigned integer, decimal or hexadecimal.
    ///
    /// Values too large for a `u64` saturate rather than fail, so an absurd
    /// numeric character reference still resolves to the replacement
    /// character.
    pub fn scan_int(&mut self, hexadecimal: bool) -> Option<u64> {
        let radix = if hexadecimal { 16 } else { 10 };
        let digits = self.scan_while(&|c: char| c.is_digit(radix), 0)?;
        let value = digits.chars().fold(0u64, |acc, c| {
            // is_digit above guarantees to_digit succeeds
            let digit = c.to_digit(radix).unwrap_or(0) as u64;
            acc.saturating_mul(radix as u64).saturating_add(digit)
        });
        Some(value)
    }

    /// Look at the next `count` characters (fewer near the end).
    pub fn peek(&self, count: usize) -> Option<String> {
        if self.is_at_end() {
            return None;
        }
        let end = (self.position + count).min(self.chars.len());
        Some(self.chars[self.position..end].iter().collect())
    }

    pub fn peek_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Consume the next `count` characters.
    pub fn scan(&mut self, count: usize) -> Option<String> {
        let text = self.peek(count)?;
        self.skip(text.chars().count() as isize);
        Some(text)
    }

    pub fn scan_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.position += 1;
        Some(c)
    }

    /// Move the cursor by `count` characters; negative values step back.
    pub fn skip(&mut self, count: isize) {
        let target = self.position as isize + count;
        self.set_position(target.max(0) as usize);
    }
}
