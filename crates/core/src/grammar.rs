// crates/core/src/grammar.rs
//! # Lambda Pattern Matcher
//!
//! Recognizes lambda expressions inside a single [`Leaf`], where every nested
//! group has already collapsed to a placeholder:
//!
//! ```text
//! lambda      := introducer template? declarator? body
//! introducer  := []
//! template    := < ... >            (at most one nested <...> level)
//! body        := {}
//! declarator  := decl_a | decl_b
//! decl_a      := () specifiers? tail
//! decl_b      := tail
//! tail        := noexcept? attribute* trailing?
//! specifiers  := (mutable | constexpr) (mutable | constexpr)?
//! noexcept    := noexcept ()? | throw ()
//! attribute   := [] | alignas ()
//! trailing    := -> <text without ';'>
//! ```
//!
//! Adjacent tokens may be separated by at most one whitespace character.
//!
//! ## Known tolerance
//!
//! A capture list directly followed by a compound statement is not always a
//! lambda: `new int[n]{}` and `int a[] {1, 2}` are counted as well. These are
//! accepted false positives of the grammar.
//!
//! Not recognized: `requires` clauses, `consteval` / `static` specifiers and
//! attributes placed before the parameter list.

use regex::Regex;
use std::sync::OnceLock;

use crate::flatten::Leaf;

/// 正規表現の組み立て用ヘルパー
mod re {
    pub fn group(r: &str) -> String {
        format!("(?:{r})")
    }

    pub fn optional(r: &str) -> String {
        format!("{}?", group(r))
    }

    pub fn many(r: &str) -> String {
        format!("{}*", group(r))
    }

    /// 隣接トークン間は空白 1 文字まで
    pub fn join(rs: &[&str]) -> String {
        rs.join(r"\s?")
    }

    pub fn alternative(rs: &[&str]) -> String {
        rs.iter().map(|r| group(r)).collect::<Vec<_>>().join("|")
    }

    pub fn keyword(word: &str) -> String {
        format!(r"\b{word}\b")
    }
}

const INTRODUCER: &str = r"\[\]";
const BODY: &str = r"\{\}";
const PARAMS: &str = r"\(\)";
/// 後置戻り値型: `;` を含まない最短のテキスト
const TYPE_ID: &str = r"[^;]*?";
/// テンプレート引数リスト（入れ子は 1 段まで）
const TEMPLATE_PARAMS: &str = r"<(?:[^<>;]|<[^<>;]*>)*>";

fn specifier() -> String {
    re::alternative(&[&re::keyword("mutable"), &re::keyword("constexpr")])
}

fn specifiers() -> String {
    let spec = specifier();
    re::join(&[&re::group(&spec), &re::optional(&spec)])
}

fn noexcept_specifier() -> String {
    re::alternative(&[
        &re::join(&[&re::keyword("noexcept"), &re::optional(PARAMS)]),
        &re::join(&[&re::keyword("throw"), PARAMS]),
    ])
}

fn attribute_specifier() -> String {
    re::alternative(&[INTRODUCER, &re::join(&[&re::keyword("alignas"), PARAMS])])
}

fn trailing_return_type() -> String {
    re::join(&["->", TYPE_ID])
}

/// `noexcept`、属性、後置戻り値型の並び（いずれも省略可）
fn declarator_tail() -> String {
    let attribute = format!(r"{}\s?", re::group(&attribute_specifier()));
    re::join(&[
        &re::optional(&noexcept_specifier()),
        &re::many(&attribute),
        &re::optional(&trailing_return_type()),
    ])
}

fn declarator_a() -> String {
    re::join(&[PARAMS, &re::optional(&specifiers()), &declarator_tail()])
}

fn declarator_b() -> String {
    declarator_tail()
}

/// Full lambda expression pattern.
#[must_use]
pub fn lambda_pattern() -> String {
    let declarator = re::alternative(&[&declarator_a(), &declarator_b()]);
    re::join(&[
        INTRODUCER,
        &re::optional(TEMPLATE_PARAMS),
        &re::optional(&declarator),
        BODY,
    ])
}

/// One recognized lambda.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LambdaMatch {
    /// Source offset of the introducer's `[`.
    pub offset: usize,
    /// Byte range of the match inside the leaf text.
    pub start: usize,
    pub end: usize,
}

/// Compiled lambda grammar.
#[derive(Debug, Clone)]
pub struct LambdaMatcher {
    regex: Regex,
}

impl LambdaMatcher {
    /// Compiles a fresh matcher.
    ///
    /// # Panics
    ///
    /// Never in practice: the pattern is built from constants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regex: Regex::new(&lambda_pattern()).expect("lambda grammar must compile"),
        }
    }

    /// Process-wide shared instance.
    #[must_use]
    pub fn global() -> &'static Self {
        static MATCHER: OnceLock<LambdaMatcher> = OnceLock::new();
        MATCHER.get_or_init(Self::new)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Non-overlapping matches in `leaf`, left to right.
    pub fn find_iter<'l>(&'l self, leaf: &'l Leaf) -> impl Iterator<Item = LambdaMatch> + 'l {
        self.regex.find_iter(leaf.text()).map(move |m| LambdaMatch {
            // 導入子は必ず `[]` プレースホルダから始まる
            offset: leaf.origin_at(m.start()).unwrap_or(m.start()),
            start: m.start(),
            end: m.end(),
        })
    }

    /// Number of lambdas in `leaf`.
    #[must_use]
    pub fn count(&self, leaf: &Leaf) -> usize {
        self.regex.find_iter(leaf.text()).count()
    }
}

impl Default for LambdaMatcher {
    fn default() -> Self {
        Self::new()
    }
}
