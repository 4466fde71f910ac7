use anyhow::Context;
use clap::Parser;
use desc_diff::{cli, config, render, scanner};
use desc_diff::common::{compare_all, format_score, similarity_score, Invoice};
use cli::{Cli, Commands};
use config::{Config, ConfigEdit};
use indicatif::{ProgressBar, ProgressStyle};
use render::TableRenderer;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_invoices(
    pairs: &[scanner::InvoicePair],
) -> anyhow::Result<Vec<(Invoice, Invoice)>> {
    let progress = ProgressBar::new(pairs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")?
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    let mut invoices = Vec::with_capacity(pairs.len());
    for pair in pairs {
        progress.set_message(pair.file_name.clone());
        let loaded = scanner::load_pair(pair)
            .with_context(|| format!("請求書の読み込みに失敗: {}", pair.file_name))?;
        invoices.push(loaded);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(invoices)
}

fn run_compare(
    config: &Config,
    modified: &Path,
    golden: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    println!("📊 desc-diff - 説明文比較\n");

    let golden_dir = golden
        .map(Path::to_path_buf)
        .unwrap_or_else(|| scanner::default_golden_dir(modified));
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| modified.join(cli::DEFAULT_OUTPUT_NAME));

    // 1. 請求書ペアの検出
    println!("[1/3] 請求書をスキャン中...");
    let pairs = scanner::find_invoice_pairs(modified, &golden_dir)?;
    println!("✔ {}組の請求書を検出\n", pairs.len());

    // 2. 照合・類似度計算
    println!("[2/3] 明細を照合中...");
    let invoices = load_invoices(&pairs)?;
    let comparisons = compare_all(invoices.iter().map(|(golden, modified)| (golden, modified)));
    println!("✔ {}件の明細を比較", comparisons.len());
    if !comparisons.is_empty() {
        let mean = comparisons.iter().map(|c| c.similarity).sum::<f64>() / comparisons.len() as f64;
        println!("  平均類似度: {}", format_score(mean));
    }
    println!();

    // 3. 画像出力
    println!("[3/3] 比較表を描画中...");
    let renderer = TableRenderer::from_chain(
        &config.font_chain(),
        config.header_font_size,
        config.body_font_size,
    )
    .with_headers(config.headers.clone());
    let (width, height) = renderer
        .render_to_file(&comparisons, &output)
        .with_context(|| format!("画像の保存に失敗: {}", output.display()))?;
    println!("✔ 比較表を保存: {} ({}x{})", output.display(), width, height);

    println!("\n✅ 完了");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compare { modified, golden, output } => {
            let config = Config::load().context("設定の読み込みに失敗")?;
            run_compare(&config, &modified, golden.as_deref(), output.as_deref())?;
        }

        Commands::Score { golden, modified } => {
            println!("{}", format_score(similarity_score(&golden, &modified)));
        }

        Commands::Config { add_font, reset, show } => {
            let path = Config::config_path()?;
            let (config, saved) = Config::apply_edit(&path, ConfigEdit { reset, add_font })
                .context("設定の読み込みに失敗（--reset で初期化できます）")?;

            if saved {
                println!("✔ 設定を保存しました: {}", path.display());
            }

            if show {
                println!("設定:");
                println!("  フォントファイル:");
                for path in &config.font_files {
                    println!("    - {}", path.display());
                }
                println!("  システムフォント: {}", config.font_families.join(", "));
                println!("  本文サイズ: {}px", config.body_font_size);
                println!("  見出しサイズ: {}px", config.header_font_size);
                println!("  見出し: {}", config.headers.join(" | "));
                println!("  使用フォント: {}", config.font_chain().resolve().name());
            }
        }
    }

    Ok(())
}
