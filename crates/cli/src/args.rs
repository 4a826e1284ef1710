// crates/cli/src/args.rs
use crate::options::{OutputFormat, SortKey};
use crate::parsers::{self, SizeArg};
use clap::{ArgAction, Args as ClapArgs, Parser, ValueHint};
use lambda_census_core::config::{DEFAULT_CONTEXT_MARGIN, DEFAULT_SAMPLE_PROBABILITY};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lambda_census",
    version,
    about = "C++ ソース中のラムダ式の出現数を集計するツール"
)]
pub struct Args {
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub filter: FilterOptions,

    #[command(flatten)]
    pub scan: ScanOptions,

    #[command(flatten)]
    pub sampling: SamplingOptions,

    #[command(flatten)]
    pub behavior: BehaviorOptions,

    /// 対象パス（省略時はカレントディレクトリ）
    #[arg(value_hint = ValueHint::AnyPath, help_heading = "走査/入力")]
    pub paths: Vec<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct OutputOptions {
    /// 出力フォーマット
    #[arg(long, value_enum, default_value = "table", help_heading = "出力")]
    pub format: OutputFormat,

    /// ソートキー
    #[arg(long, value_enum, default_value = "path", help_heading = "出力")]
    pub sort: SortKey,

    /// 降順でソート
    #[arg(long, help_heading = "出力")]
    pub desc: bool,

    /// 合計のみ表示
    #[arg(long, help_heading = "出力")]
    pub total_only: bool,

    /// 集計 (key,value) の CSV 出力先
    #[arg(long, value_hint = ValueHint::FilePath, help_heading = "出力")]
    pub summary_out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct FilterOptions {
    /// 対象とする拡張子（既定: cc,cpp,cxx,c++）
    #[arg(long, value_delimiter = ',', help_heading = "フィルタ")]
    pub ext: Vec<String>,

    /// 除外する拡張子
    #[arg(long, value_delimiter = ',', help_heading = "フィルタ")]
    pub exclude_ext: Vec<String>,

    /// これより大きいファイルを除外（例: 512K, 4MiB）
    #[arg(long, help_heading = "フィルタ")]
    pub max_size: Option<SizeArg>,
}

#[derive(ClapArgs, Debug)]
pub struct ScanOptions {
    /// 隠しファイルも走査
    #[arg(long, help_heading = "走査/入力")]
    pub hidden: bool,

    /// .gitignore を無視
    #[arg(long, help_heading = "走査/入力")]
    pub no_gitignore: bool,

    #[arg(long, help_heading = "走査/入力")]
    pub follow: bool,

    #[arg(long, help_heading = "走査/入力")]
    pub max_depth: Option<usize>,

    #[arg(long, help_heading = "走査/入力")]
    pub override_include: Vec<String>,

    #[arg(long, help_heading = "走査/入力")]
    pub override_exclude: Vec<String>,

    /// 並列数（既定: 論理 CPU 数）
    #[arg(long, short = 'j', value_parser = parsers::parse_positive_usize, help_heading = "走査/入力")]
    pub jobs: Option<usize>,

    /// 走査スレッド数（既定: --jobs と同じ）
    #[arg(long, value_parser = parsers::parse_positive_usize, help_heading = "走査/入力")]
    pub walk_threads: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct SamplingOptions {
    /// 一致ごとに文脈サンプルを採取する確率 (0〜1)
    #[arg(
        long,
        default_value_t = DEFAULT_SAMPLE_PROBABILITY,
        value_parser = parsers::parse_probability,
        help_heading = "サンプリング"
    )]
    pub sample_probability: f64,

    /// サンプルに含める前後の行数
    #[arg(long, default_value_t = DEFAULT_CONTEXT_MARGIN, help_heading = "サンプリング")]
    pub context_margin: usize,

    /// 乱数シード（ファイル内容のハッシュと混ぜて使う）
    #[arg(long, default_value_t = 0, help_heading = "サンプリング")]
    pub seed: u64,

    /// サンプルの出力先
    #[arg(long, value_hint = ValueHint::FilePath, help_heading = "サンプリング")]
    pub samples_out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct BehaviorOptions {
    /// 読み込みエラーで即座に失敗する
    #[arg(long, help_heading = "動作")]
    pub strict: bool,

    /// ログを詳細にする（-v: info, -vv: debug）
    #[arg(long, short = 'v', action = ArgAction::Count, help_heading = "動作")]
    pub verbose: u8,
}

impl Args {
    /// `RUST_LOG` が未設定のときに使うログレベル
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.behavior.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
