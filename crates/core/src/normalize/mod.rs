// crates/core/src/normalize/mod.rs
//! ソース正規化
//!
//! リテラルの中身・コメント・プリプロセッサ指令を取り除き、括弧だけが構造トークンとして
//! 残るテキストを生成します。各 `[` の元ソース上のオフセットは
//! [`NormalizedSource`] のサイドテーブルに記録されます。
//!
//! 処理内容:
//!
//! - 行継続 (`\` + 改行) の連結
//! - 文字・文字列リテラル（Raw 文字列を含む）の中身を空にする（区切り文字は残す）
//! - プリプロセッサ指令行の除去
//! - `//` コメントと `/* */` コメントの除去（ブロックコメントは行をまたげる）
//! - 改行を含む空白の連続を 1 つの空白へ圧縮

mod cursor;
pub mod literal;

use cursor::Cursor;
use literal::{char_literal_len, prefixed_raw_string_len};

/// Structural text plus the source offset of every opening square bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSource {
    text: String,
    /// (index in `text`, offset in the source), ascending by both.
    square_origins: Vec<(usize, usize)>,
}

impl NormalizedSource {
    /// Wraps text that is already structural, annotating every `[` with its own index.
    #[must_use]
    pub fn from_structural(text: &str) -> Self {
        let square_origins = text
            .match_indices('[')
            .map(|(index, _)| (index, index))
            .collect();
        Self {
            text: text.to_owned(),
            square_origins,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn square_origins(&self) -> &[(usize, usize)] {
        &self.square_origins
    }

    /// Source offset of the `[` found at `index` of the normalized text.
    #[must_use]
    pub fn origin_of(&self, index: usize) -> Option<usize> {
        self.square_origins
            .binary_search_by_key(&index, |&(at, _)| at)
            .ok()
            .map(|k| self.square_origins[k].1)
    }
}

/// 直前に出力したトークンの種類（数値の桁区切り `'` の判定に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Word {
    None,
    Ident,
    Number,
}

struct Builder {
    text: String,
    square_origins: Vec<(usize, usize)>,
    word: Word,
}

impl Builder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            square_origins: Vec::new(),
            word: Word::None,
        }
    }

    fn push(&mut self, ch: char) {
        self.word = if ch.is_alphanumeric() || ch == '_' {
            match self.word {
                Word::None if ch.is_ascii_digit() => Word::Number,
                Word::None => Word::Ident,
                word => word,
            }
        } else {
            Word::None
        };
        self.text.push(ch);
    }

    fn push_str(&mut self, s: &str) {
        s.chars().for_each(|ch| self.push(ch));
    }

    fn space(&mut self) {
        self.word = Word::None;
        if !self.text.ends_with(' ') {
            self.text.push(' ');
        }
    }

    fn open_square(&mut self, source_offset: usize) {
        self.square_origins.push((self.text.len(), source_offset));
        self.push('[');
    }

    /// 数値リテラル中の桁区切り（`1'000`）はそのまま残し、数値の続きとして扱う
    fn digit_separator(&mut self) {
        self.text.push('\'');
    }

    fn finish(self) -> NormalizedSource {
        NormalizedSource {
            text: self.text,
            square_origins: self.square_origins,
        }
    }
}

/// Normalizes C++ source text for structural analysis.
///
/// The source is never modified; every `[` left in the result can be traced
/// back through [`NormalizedSource::origin_of`].
#[must_use]
pub fn normalize(source: &str) -> NormalizedSource {
    let mut cur = Cursor::new(source);
    let mut out = Builder::with_capacity(source.len());
    let mut at_line_start = true;

    while let Some(ch) = cur.peek() {
        if ch == '\n' {
            cur.bump();
            out.space();
            at_line_start = true;
            continue;
        }
        if ch.is_whitespace() {
            cur.bump();
            out.space();
            continue;
        }

        let next = cur.peek_nth(1);
        match ch {
            '#' if at_line_start => skip_directive(&mut cur),
            '/' if next == Some('/') => skip_line_comment(&mut cur),
            '/' if next == Some('*') => {
                skip_block_comment(&mut cur);
                out.space();
                // コメントは空白扱いなので行頭判定を保つ
                continue;
            }
            '"' => {
                skip_string(&mut cur);
                out.push_str("\"\"");
            }
            '\'' => char_literal(&mut cur, &mut out),
            '[' => {
                if let Some((at, _)) = cur.bump() {
                    out.open_square(at);
                }
            }
            'R' | 'u' | 'U' | 'L' if out.word == Word::None && skip_raw_string(&mut cur) => {
                out.push_str("\"\"");
            }
            _ => {
                cur.bump();
                out.push(ch);
            }
        }
        at_line_start = false;
    }

    out.finish()
}

fn skip_line_comment(cur: &mut Cursor<'_>) {
    while cur.peek().is_some_and(|c| c != '\n') {
        cur.bump();
    }
}

fn skip_block_comment(cur: &mut Cursor<'_>) {
    cur.bump_n(2);
    // 閉じられていない場合はファイル末尾まで
    while let Some((_, ch)) = cur.bump() {
        if ch == '*' && cur.peek() == Some('/') {
            cur.bump();
            break;
        }
    }
}

/// 指令行は行末まで除去する。指令中で始まるブロックコメントは閉じるまで読み飛ばす
fn skip_directive(cur: &mut Cursor<'_>) {
    while let Some(ch) = cur.peek() {
        match ch {
            '\n' => break,
            '/' if cur.peek_nth(1) == Some('*') => skip_block_comment(cur),
            '/' if cur.peek_nth(1) == Some('/') => {
                skip_line_comment(cur);
                break;
            }
            _ => {
                cur.bump();
            }
        }
    }
}

/// 閉じられていない文字列は行末で終わったものとみなす
fn skip_string(cur: &mut Cursor<'_>) {
    cur.bump();
    while let Some(ch) = cur.peek() {
        match ch {
            '\n' => break,
            '"' => {
                cur.bump();
                break;
            }
            '\\' => cur.bump_n(2),
            _ => {
                cur.bump();
            }
        }
    }
}

fn skip_raw_string(cur: &mut Cursor<'_>) -> bool {
    match prefixed_raw_string_len(cur.rest()) {
        Some(len) => {
            cur.jump_to(cur.offset() + len);
            true
        }
        None => false,
    }
}

fn char_literal(cur: &mut Cursor<'_>, out: &mut Builder) {
    if out.word == Word::Number {
        cur.bump();
        out.digit_separator();
        return;
    }
    match char_literal_len(cur) {
        Some(len) => {
            cur.bump_n(len);
            out.push_str("''");
        }
        None => {
            cur.bump();
            out.push('\'');
        }
    }
}
