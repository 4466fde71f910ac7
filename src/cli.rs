use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "desc-diff")]
#[command(about = "請求書明細の説明文を正解と比較し、類似度表を画像で出力するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 正解と変更後の請求書を照合して比較表画像を出力
    Compare {
        /// 変更後の請求書フォルダ（invoice_*.json）
        #[arg(required = true)]
        modified: PathBuf,

        /// 正解の請求書フォルダ（デフォルト: 変更後フォルダ/../golden_invoices）
        #[arg(short, long)]
        golden: Option<PathBuf>,

        /// 出力画像（デフォルト: 変更後フォルダ/description_discrepancy_comparison.png）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 2つの文字列の類似度を表示
    Score {
        /// 正解側の文字列
        golden: String,

        /// 変更後の文字列
        modified: String,
    },

    /// 設定を表示/編集
    Config {
        /// 優先フォントファイルを追加
        #[arg(long)]
        add_font: Option<PathBuf>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 既定の出力ファイル名
pub const DEFAULT_OUTPUT_NAME: &str = "description_discrepancy_comparison.png";
