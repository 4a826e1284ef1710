// crates/core/src/normalize/literal.rs
//! 文字・文字列リテラルの長さ判定

use super::cursor::Cursor;

/// Raw 文字列のプレフィックス（エンコーディング接頭辞付き）
const RAW_PREFIXES: [&str; 5] = ["R\"", "u8R\"", "uR\"", "UR\"", "LR\""];

/// デリミタの最大長
const MAX_RAW_DELIMITER: usize = 16;

/// C++ Raw String Literal の長さを返す
/// 形式: `R"delimiter(...)delimiter"` (delimiterは0-16文字)
///
/// `bytes` は `R"` から始まる必要があります。閉じられていない場合は末尾までの長さを返します。
#[must_use]
pub fn raw_string_len(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < 3 || bytes[0] != b'R' || bytes[1] != b'"' {
        return None;
    }

    let mut i = 2;
    let delimiter_start = i;
    while i < bytes.len() && bytes[i] != b'(' {
        // 空白・括弧・バックスラッシュ・制御文字はデリミタに使えない
        let b = bytes[i];
        if i - delimiter_start >= MAX_RAW_DELIMITER
            || b == b' '
            || b == b')'
            || b == b'\\'
            || b == b'"'
            || b.is_ascii_control()
        {
            return None;
        }
        i += 1;
    }

    if i >= bytes.len() {
        return None;
    }

    let delimiter = &bytes[delimiter_start..i];
    i += 1; // '(' をスキップ

    // 終端パターン: )delimiter" を探す
    while i < bytes.len() {
        if bytes[i] == b')' {
            let remaining = &bytes[i + 1..];
            if remaining.len() > delimiter.len()
                && &remaining[..delimiter.len()] == delimiter
                && remaining[delimiter.len()] == b'"'
            {
                return Some(i + 1 + delimiter.len() + 1);
            }
        }
        i += 1;
    }

    Some(bytes.len())
}

/// Length in bytes of a raw string (prefix included) starting at `rest`.
#[must_use]
pub fn prefixed_raw_string_len(rest: &str) -> Option<usize> {
    let prefix = RAW_PREFIXES.iter().find(|p| rest.starts_with(**p))?;
    let r_at = prefix.len() - 2;
    raw_string_len(&rest.as_bytes()[r_at..]).map(|len| r_at + len)
}

/// Number of characters making up the character literal under the cursor.
///
/// Recognizes `'c'` and escaped forms such as `'\n'`, `'\''` or `'\x41'`.
/// Returns `None` when the quote does not open a literal.
pub(crate) fn char_literal_len(cur: &Cursor<'_>) -> Option<usize> {
    const MAX_ESCAPE: usize = 12;

    match cur.peek_nth(1)? {
        '\n' => None,
        '\\' => {
            if matches!(cur.peek_nth(2), None | Some('\n')) {
                return None;
            }
            (3..MAX_ESCAPE).find_map(|n| match cur.peek_nth(n) {
                Some('\'') => Some(Some(n + 1)),
                None | Some('\n') => Some(None),
                Some(_) => None,
            })?
        }
        _ => (cur.peek_nth(2) == Some('\'')).then_some(3),
    }
}
