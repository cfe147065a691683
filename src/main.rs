//! 程序入口：初始化日志，加载 JSON 文档，按参数搜索/下钻后输出当前屏幕

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::fmt::SubscriberBuilder;

use json_viewer::model::performance::run_performance_suite;
use json_viewer::vm::bridge::{highlight, render_value, KEY_SUFFIX, NO_RESULTS_TEXT};
use json_viewer::{AppState, RowData, ScreenView};

const USAGE: &str = "用法: json_viewer <file> [--search QUERY] [--open SECTION:ROW]... [--json] [--verbose]
       json_viewer --benchmark [--verbose]";

#[derive(Debug, Default)]
struct CliArgs {
    file: Option<PathBuf>,
    search: Option<String>,
    open: Vec<(usize, usize)>,
    json: bool,
    verbose: bool,
    benchmark: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--search" | "-s" => parsed.search = Some(args.next().context("--search 需要参数")?),
            "--open" | "-o" => {
                let position = args.next().context("--open 需要参数")?;
                parsed.open.push(parse_position(&position)?);
            }
            "--json" => parsed.json = true,
            "--benchmark" => parsed.benchmark = true,
            "--verbose" | "-v" => parsed.verbose = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("未知参数: {}\n{}", other, USAGE),
            other if parsed.file.is_none() => parsed.file = Some(PathBuf::from(other)),
            other => bail!("多余的参数: {}", other),
        }
    }
    Ok(parsed)
}

/// 解析 "SECTION:ROW"
fn parse_position(text: &str) -> Result<(usize, usize)> {
    let (section, row) = text
        .split_once(':')
        .with_context(|| format!("位置格式应为 SECTION:ROW，实际为 {}", text))?;
    let section: usize = section.trim().parse().with_context(|| format!("无效分区: {}", section))?;
    let row: usize = row.trim().parse().with_context(|| format!("无效行号: {}", row))?;
    Ok((section, row))
}

fn print_screen(view: &ScreenView<'_>) {
    let width = view.key_column_width();
    for section in 0..view.section_count() {
        if let Some(title) = view.section_title(section) {
            println!("== {} ==", title);
        }
        for row in view.rows(section) {
            match row {
                RowData::NoResults => println!("  ({})", NO_RESULTS_TEXT),
                RowData::Item { key, key_ranges, value } => {
                    let label = format!("{}{}", highlight(&key, &key_ranges, "[", "]"), KEY_SUFFIX);
                    let text = render_value(&value, "[", "]");
                    let marker = if value.is_composite() { " >" } else { "" };
                    println!("  {:<width$} {}{}", label, text, marker, width = width);
                }
            }
        }
    }
}

/// 运行内置基准套件，任何一项失败都以错误退出
fn run_benchmark() -> Result<()> {
    let results = run_performance_suite();
    for result in &results {
        let status = if result.success { "ok" } else { "FAILED" };
        println!(
            "{:<16} {:>6}ms  {:<6} {}",
            result.operation, result.duration_ms, status, result.details
        );
    }
    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        bail!("{} 项基准失败", failed);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    // 初始化日志输出，写到 stderr 以免干扰 --json 输出
    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    if args.benchmark {
        return run_benchmark();
    }

    let file = args.file.context(USAGE)?;
    let mut state = AppState::default();
    state
        .load_file(&file)
        .with_context(|| format!("无法加载 {}", file.display()))?;

    if let Some(query) = args.search.as_deref() {
        state.search(Some(query))?;
    }
    for &(section, row) in &args.open {
        if !state.select(section, row)? {
            bail!("{}:{} 不是可下钻的行", section, row);
        }
    }

    let view = state.view()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.snapshot())?);
    } else {
        println!("{}", state.breadcrumb()?);
        print_screen(&view);
    }
    Ok(())
}
