// crates/core/src/flatten.rs
//! # Bracket Flattening Engine
//!
//! Resolves bracket nesting leaf-first with a single stack-based pass.
//!
//! Every group is rendered as the text between its brackets, with each
//! already-resolved child collapsed to a placeholder (`{}`, `()`, `[]`). A
//! group that has at least one child is yielded as a [`Leaf`] when it
//! closes; a group without children cannot hold a lambda and is only
//! collapsed. The whole text is treated as the content of one synthetic
//! `{ ... }` root, which is yielded last.
//!
//! ```rust
//! use lambda_census_core::flatten::Flattener;
//! use lambda_census_core::normalize::normalize;
//!
//! let normalized = normalize("f([](int x) { return g(x); });");
//! let leaves: Vec<String> = Flattener::new(&normalized)
//!     .map(|leaf| leaf.unwrap().text().to_owned())
//!     .collect();
//! assert_eq!(leaves, vec![" return g(); ", "[]() {}", "f();"]);
//! ```

use crate::error::FlattenError;
use crate::normalize::NormalizedSource;

/// Bracket pair kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    Brace,
    Paren,
    Square,
}

impl BracketKind {
    #[must_use]
    pub const fn from_open(ch: char) -> Option<Self> {
        match ch {
            '{' => Some(Self::Brace),
            '(' => Some(Self::Paren),
            '[' => Some(Self::Square),
            _ => None,
        }
    }

    #[must_use]
    pub const fn from_close(ch: char) -> Option<Self> {
        match ch {
            '}' => Some(Self::Brace),
            ')' => Some(Self::Paren),
            ']' => Some(Self::Square),
            _ => None,
        }
    }

    #[must_use]
    pub const fn open(self) -> char {
        match self {
            Self::Brace => '{',
            Self::Paren => '(',
            Self::Square => '[',
        }
    }

    /// Collapsed form used inside the parent leaf.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Brace => "{}",
            Self::Paren => "()",
            Self::Square => "[]",
        }
    }
}

/// A resolved bracket group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    kind: BracketKind,
    text: String,
    /// (byte position of a `[]` placeholder in `text`, source offset)
    origins: Vec<(usize, usize)>,
}

impl Leaf {
    #[must_use]
    pub const fn kind(&self) -> BracketKind {
        self.kind
    }

    /// Content between the brackets, children collapsed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source offset of the `[]` placeholder starting at `position`.
    #[must_use]
    pub fn origin_at(&self, position: usize) -> Option<usize> {
        self.origins
            .binary_search_by_key(&position, |&(at, _)| at)
            .ok()
            .map(|k| self.origins[k].1)
    }
}

#[derive(Debug)]
struct Frame {
    kind: BracketKind,
    /// 正規化テキスト上の開き括弧の位置（ルートは 0）
    opened_at: usize,
    /// 開き括弧 `[` の元ソース上のオフセット
    origin: usize,
    text: String,
    origins: Vec<(usize, usize)>,
    children: usize,
}

impl Frame {
    const fn new(kind: BracketKind, opened_at: usize, origin: usize) -> Self {
        Self {
            kind,
            opened_at,
            origin,
            text: String::new(),
            origins: Vec::new(),
            children: 0,
        }
    }

    /// Appends a resolved child as its placeholder.
    fn collapse(&mut self, child: &Self) {
        self.children += 1;
        if child.kind == BracketKind::Square {
            // 演算子名の `[]` はラムダ導入子ではない
            if ends_with_operator_keyword(&self.text) {
                let trimmed = self.text.trim_end().len();
                self.text.truncate(trimmed);
                return;
            }
            self.origins.push((self.text.len(), child.origin));
        }
        self.text.push_str(child.kind.placeholder());
    }

    fn into_leaf(self) -> Leaf {
        Leaf {
            kind: self.kind,
            text: self.text,
            origins: self.origins,
        }
    }
}

/// `operator[]`, `operator new[]`, `operator delete[]` の `[]` は演算子名の一部
fn ends_with_operator_keyword(text: &str) -> bool {
    let text = text.trim_end();
    let head = ["new", "delete"]
        .iter()
        .find_map(|op| strip_word_suffix(text, op))
        .map_or(text, str::trim_end);
    strip_word_suffix(head, "operator").is_some()
}

fn strip_word_suffix<'t>(text: &'t str, word: &str) -> Option<&'t str> {
    let head = text.strip_suffix(word)?;
    (!head
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_'))
    .then_some(head)
}

/// Iterator over the leaves of a normalized text, innermost first.
///
/// Yields `Err` once and then stops when the bracket structure is malformed.
#[derive(Debug)]
pub struct Flattener<'a> {
    chars: core::str::CharIndices<'a>,
    squares: core::slice::Iter<'a, (usize, usize)>,
    stack: Vec<Frame>,
    finished: bool,
}

impl<'a> Flattener<'a> {
    #[must_use]
    pub fn new(source: &'a NormalizedSource) -> Self {
        Self {
            chars: source.text().char_indices(),
            squares: source.square_origins().iter(),
            stack: vec![Frame::new(BracketKind::Brace, 0, 0)],
            finished: false,
        }
    }

    /// Drains the iterator and returns the number of leaves, or the structural error.
    ///
    /// # Errors
    ///
    /// Returns the [`FlattenError`] describing the first bracket that does not pair up.
    pub fn check(source: &NormalizedSource) -> Result<usize, FlattenError> {
        Flattener::new(source).try_fold(0, |n, leaf| leaf.map(|_| n + 1))
    }

    fn open(&mut self, index: usize, kind: BracketKind) {
        let origin = if kind == BracketKind::Square {
            // 正規化の時点ですべての `[` に由来が記録されている
            self.squares.next().map_or(index, |&(_, origin)| origin)
        } else {
            index
        };
        self.stack.push(Frame::new(kind, index, origin));
    }

    fn close(
        &mut self,
        index: usize,
        found: char,
        kind: BracketKind,
    ) -> Result<Option<Leaf>, FlattenError> {
        // ルートは仮想的な括弧なので、実際の閉じ括弧では閉じられない
        if self.stack.len() <= 1 {
            return Err(FlattenError::UnexpectedClose {
                found,
                position: index,
            });
        }
        let frame = self.stack.pop().ok_or(FlattenError::UnexpectedClose {
            found,
            position: index,
        })?;
        if frame.kind != kind {
            return Err(FlattenError::Mismatched {
                open: frame.kind.open(),
                found,
                position: index,
                opened_at: frame.opened_at,
            });
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.collapse(&frame);
        }
        Ok((frame.children > 0).then(|| frame.into_leaf()))
    }

    fn finish(&mut self) -> Option<Result<Leaf, FlattenError>> {
        self.finished = true;
        if self.stack.len() > 1 {
            let pending = self.stack.len() - 1;
            let innermost = self.stack.last()?;
            return Some(Err(FlattenError::Unclosed {
                open: innermost.kind.open(),
                opened_at: innermost.opened_at,
                pending,
            }));
        }
        let root = self.stack.pop()?;
        (root.children > 0).then(|| Ok(root.into_leaf()))
    }

}

impl Iterator for Flattener<'_> {
    type Item = Result<Leaf, FlattenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while let Some((index, ch)) = self.chars.next() {
            if let Some(kind) = BracketKind::from_open(ch) {
                self.open(index, kind);
            } else if let Some(kind) = BracketKind::from_close(ch) {
                match self.close(index, ch, kind) {
                    Ok(Some(leaf)) => return Some(Ok(leaf)),
                    Ok(None) => {}
                    Err(err) => {
                        self.finished = true;
                        return Some(Err(err));
                    }
                }
            } else if let Some(top) = self.stack.last_mut() {
                top.text.push(ch);
            }
        }
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(text: &str) -> Result<Vec<String>, FlattenError> {
        let source = NormalizedSource::from_structural(text);
        Flattener::new(&source)
            .map(|leaf| leaf.map(|l| l.text().to_owned()))
            .collect()
    }

    #[test]
    fn test_flat_text_yields_nothing() {
        assert_eq!(leaves("int x = 1;"), Ok(vec![]));
        assert_eq!(leaves(""), Ok(vec![]));
    }

    #[test]
    fn test_root_yields_when_it_has_children() {
        assert_eq!(leaves("f(a);"), Ok(vec!["f();".to_owned()]));
    }

    #[test]
    fn test_innermost_first() {
        let got = leaves("a { b ( c [ d ] ) }").unwrap();
        assert_eq!(got, vec![" c [] ", " b () ", "a {}"]);
    }

    #[test]
    fn test_siblings_left_to_right() {
        let got = leaves("{ f(x) } { g(y) }").unwrap();
        assert_eq!(got, vec![" f() ", " g() ", "{} {}"]);
    }

    #[test]
    fn test_empty_groups_collapse_and_count_as_children() {
        assert_eq!(leaves("{{}}").unwrap(), vec!["{}", "{}"]);
    }

    #[test]
    fn test_operator_subscript_neutralized() {
        let got = leaves("T::operator [ ] ( int i ) { }").unwrap();
        assert_eq!(got, vec!["T::operator () {}"]);
    }

    #[test]
    fn test_allocation_operators_neutralized() {
        let got = leaves("void* operator new [ ] ( size_t n ) { }").unwrap();
        assert_eq!(got, vec!["void* operator new () {}"]);
        let got = leaves("void operator delete[](void* p) { }").unwrap();
        assert_eq!(got, vec!["void operator delete() {}"]);
    }

    #[test]
    fn test_new_expression_not_neutralized() {
        assert_eq!(leaves("p = new int[n];").unwrap(), vec!["p = new int[];"]);
        assert_eq!(leaves("renew[x];").unwrap(), vec!["renew[];"]);
        assert_eq!(leaves("xoperator new[x];").unwrap(), vec!["xoperator new[];"]);
    }

    #[test]
    fn test_operator_suffix_of_identifier_not_neutralized() {
        let got = leaves("myoperator[x];").unwrap();
        assert_eq!(got, vec!["myoperator[];"]);
    }

    #[test]
    fn test_placeholder_origins() {
        let source = NormalizedSource::from_structural("f([x] {});");
        let all: Vec<Leaf> = Flattener::new(&source).collect::<Result<_, _>>().unwrap();
        let inner = &all[0];
        assert_eq!(inner.text(), "[] {}");
        assert_eq!(inner.origin_at(0), Some(2));
        assert_eq!(inner.origin_at(1), None);
    }

    #[test]
    fn test_unexpected_close() {
        assert_eq!(
            leaves("a ) b"),
            Err(FlattenError::UnexpectedClose {
                found: ')',
                position: 2
            })
        );
    }

    #[test]
    fn test_mismatched_kinds() {
        assert_eq!(
            leaves("( ]"),
            Err(FlattenError::Mismatched {
                open: '(',
                found: ']',
                position: 2,
                opened_at: 0,
            })
        );
    }

    #[test]
    fn test_unclosed_at_end() {
        assert_eq!(
            leaves("f() { {"),
            Err(FlattenError::Unclosed {
                open: '{',
                opened_at: 6,
                pending: 2,
            })
        );
    }

    #[test]
    fn test_error_is_terminal() {
        let source = NormalizedSource::from_structural("} {}");
        let mut it = Flattener::new(&source);
        assert!(matches!(it.next(), Some(Err(_))));
        assert!(it.next().is_none());
    }

    #[test]
    fn test_check_counts_leaves() {
        let source = NormalizedSource::from_structural("{ f() } g()");
        assert_eq!(Flattener::check(&source), Ok(2));
    }
}
