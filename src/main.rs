use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use collatz_viz::render::{self, PreviewLine};
use collatz_viz::{input, logging, Config, Generator, RangeReport, Sequence};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// コラッツ (3x+1) 軌道の計算と表示
///
/// Examples:
///   collatz-viz single 27
///   collatz-viz multiple 7,15,27 --log
///   collatz-viz stopping-times 1000 --csv stopping.csv
///   collatz-viz text 7
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// 設定ファイル（未指定なら ./collatz.toml があれば読む）
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 1軌道あたりのステップ上限（設定ファイルより優先）
    #[arg(long, global = true, env = "COLLATZ_MAX_STEPS", value_name = "STEPS")]
    max_steps: Option<u64>,

    /// 詳細ログ
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 単一軌道
    Single {
        /// 開始値
        n: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// 複数軌道（カンマ区切り, 例: 7,15,27）
    Multiple {
        numbers: String,
        /// log10 スケールで表示
        #[arg(long)]
        log: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// 1..=MAX_N の停止時間分布
    StoppingTimes {
        max_n: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// 1..=MAX_N の最大値分布
    MaxValues {
        max_n: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// 軌道の全ステップをテキストで表示
    Text { n: String },
    /// コラッツ予想の説明
    About,
    /// デフォルトの collatz.toml を作成
    InitConfig,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// CSV を書き出すファイル
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// 結果を JSON で stdout に出力
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);
    debug!("arguments: {:?}", args);

    if let Err(e) = run(args) {
        debug!("command failed: {:?}", e);
        eprintln!("{}", error_line(&e));
        std::process::exit(1);
    }
}

/// エラーチェーンを ": " で連結した1行
fn error_line(e: &anyhow::Error) -> String {
    format!("Error: {:#}", e).replace('\n', " ")
}

/// --max-steps / COLLATZ_MAX_STEPS は設定ファイルより優先
fn select_generator(max_steps: Option<u64>, config: &Config) -> Generator {
    match max_steps {
        Some(limit) => Generator::with_max_steps(limit),
        None => config.generator(),
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::load_or_default(args.config.as_deref())?;
    let generator = select_generator(args.max_steps, &config);

    match args.command {
        Command::Single { n, output } => cmd_single(&generator, &config, &n, &output),
        Command::Multiple {
            numbers,
            log,
            output,
        } => cmd_multiple(&generator, &config, &numbers, log || config.display.log_scale, &output),
        Command::StoppingTimes { max_n, output } => {
            let report = analyze(&generator, &config, max_n.as_deref())?;
            cmd_stopping_times(&report, &output)
        }
        Command::MaxValues { max_n, output } => {
            let report = analyze(&generator, &config, max_n.as_deref())?;
            cmd_max_values(&report, &output)
        }
        Command::Text { n } => {
            let seq = generator.generate_from(&input::parse_positive(&n)?)?;
            print!("{}", render::sequence_listing(&seq));
            Ok(())
        }
        Command::About => {
            println!("{}", render::ABOUT);
            Ok(())
        }
        Command::InitConfig => init_config(Path::new(collatz_viz::config::DEFAULT_CONFIG_FILE)),
    }
}

fn cmd_single(generator: &Generator, config: &Config, n: &str, output: &OutputArgs) -> Result<()> {
    let start = input::parse_positive(n)?;
    let seq = generator.generate_from(&start)?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&seq)?);
    } else {
        println!("{}", render::sequence_title(&seq));
        println!();
        print_preview(&seq, config.display.preview_limit);
    }

    write_csv(output.csv.as_deref(), |w| render::write_sequence_csv(w, &seq))
}

fn cmd_multiple(
    generator: &Generator,
    config: &Config,
    numbers: &str,
    log_scale: bool,
    output: &OutputArgs,
) -> Result<()> {
    let starts = input::parse_integer_list(numbers)?;
    let seqs = generator.generate_multiple(starts)?;

    if output.json {
        let sequences: Vec<&Sequence> = seqs.iter().map(|(_, seq)| seq).collect();
        println!("{}", serde_json::to_string_pretty(&sequences)?);
    } else {
        println!("Collatz Conjecture - Multiple Sequences");
        for (start, seq) in &seqs {
            println!();
            println!(
                "Start: {} | Length: {} steps | Max: {}",
                render::abbreviate(start),
                seq.len(),
                render::abbreviate(seq.peak())
            );
            if log_scale {
                let logs: Vec<String> = seq
                    .iter()
                    .take(config.display.preview_limit)
                    .map(|v| format!("{:.3}", render::log10(v)))
                    .collect();
                println!("  log10: {}", logs.join(" "));
            } else {
                let values: Vec<String> = seq
                    .iter()
                    .take(config.display.preview_limit)
                    .map(render::abbreviate)
                    .collect();
                println!("  {}", values.join(" -> "));
            }
            if seq.len() > config.display.preview_limit {
                println!("  ... ({} more)", seq.len() - config.display.preview_limit);
            }
        }
    }

    write_csv(output.csv.as_deref(), |w| render::write_multiple_csv(w, &seqs))
}

fn analyze(generator: &Generator, config: &Config, max_n: Option<&str>) -> Result<RangeReport> {
    let max_n = match max_n {
        Some(s) => input::parse_integer(s)?,
        None => config.range.default_max_n.into(),
    };
    let timer = Instant::now();
    let report = generator.analyze_range(max_n)?;
    info!(
        max_n = report.max_n,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "range analyzed"
    );
    Ok(report)
}

fn cmd_stopping_times(report: &RangeReport, output: &OutputArgs) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", render::stopping_times_title(report));
        println!();
        println!("  {:>10}  {:>6}", "n", "steps");
        for (n, steps) in report.stopping_times() {
            println!("  {:>10}  {:>6}", n, steps);
        }
    }
    write_csv(output.csv.as_deref(), |w| render::write_range_csv(w, report))
}

fn cmd_max_values(report: &RangeReport, output: &OutputArgs) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", render::max_values_title(report));
        println!();
        println!("  {:>10}  {}", "n", "max");
        for (n, peak) in report.peaks() {
            println!("  {:>10}  {}", n, render::abbreviate(peak));
        }
    }
    write_csv(output.csv.as_deref(), |w| render::write_range_csv(w, report))
}

fn print_preview(seq: &Sequence, limit: usize) {
    println!("  {:>6}  {}", "step", "value");
    for line in render::preview(seq, limit) {
        match line {
            PreviewLine::Step(i, v) => println!("  {:>6}  {}", i, v),
            PreviewLine::Skipped(count) => println!("  ... ({} steps omitted) ...", count),
        }
    }
}

fn write_csv(
    path: Option<&Path>,
    write: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write(&mut w)
        .and_then(|_| w.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("saved: {}", path.display());
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists; remove it first or edit it manually", path.display());
    }
    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("created {}", path.display());
    Ok(())
}
