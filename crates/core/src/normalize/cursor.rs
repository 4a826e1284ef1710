// crates/core/src/normalize/cursor.rs
//! 行継続 (`\` + 改行) を透過的に読み飛ばすカーソル

/// Character cursor over the original source.
///
/// Backslash-newline splices (`\\\n`, `\\\r\n`) are skipped after every step,
/// so callers see the already-joined logical lines while offsets stay in
/// source coordinates.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        let mut cursor = Self { src, pos: 0 };
        cursor.skip_splices();
        cursor
    }

    /// 現在位置（ソース上のバイトオフセット）
    pub(crate) const fn offset(&self) -> usize {
        self.pos
    }

    /// 行継続を解釈しない残りのソース
    pub(crate) fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<char> {
        let mut ahead = self.clone();
        for _ in 0..n {
            ahead.bump()?;
        }
        ahead.peek()
    }

    pub(crate) fn bump(&mut self) -> Option<(usize, char)> {
        let ch = self.peek()?;
        let at = self.pos;
        self.pos += ch.len_utf8();
        self.skip_splices();
        Some((at, ch))
    }

    pub(crate) fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Moves to an absolute source offset. `pos` must be a char boundary.
    pub(crate) fn jump_to(&mut self, pos: usize) {
        debug_assert!(self.src.is_char_boundary(pos.min(self.src.len())));
        self.pos = pos.min(self.src.len());
        self.skip_splices();
    }

    fn skip_splices(&mut self) {
        loop {
            let rest = &self.src.as_bytes()[self.pos..];
            if rest.starts_with(b"\\\n") {
                self.pos += 2;
            } else if rest.starts_with(b"\\\r\n") {
                self.pos += 3;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splices_are_invisible() {
        let mut cur = Cursor::new("a\\\nb\\\r\nc");
        let seen: Vec<char> = core::iter::from_fn(|| cur.bump().map(|(_, c)| c)).collect();
        assert_eq!(seen, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_offsets_stay_in_source_coordinates() {
        let mut cur = Cursor::new("x\\\ny");
        assert_eq!(cur.bump(), Some((0, 'x')));
        assert_eq!(cur.bump(), Some((3, 'y')));
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn test_peek_nth_looks_through_splices() {
        let cur = Cursor::new("/\\\n/ comment");
        assert_eq!(cur.peek(), Some('/'));
        assert_eq!(cur.peek_nth(1), Some('/'));
    }

    #[test]
    fn test_leading_splice_skipped() {
        let cur = Cursor::new("\\\nint");
        assert_eq!(cur.offset(), 2);
        assert_eq!(cur.peek(), Some('i'));
    }
}
