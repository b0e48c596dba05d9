// ABOUTME: CLI binary for the HTML chunker.
// ABOUTME: Chunks an HTML file or every HTML file in a directory and writes one file per chunk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use html_chunker::resource::{collect_html_files, read_html_file};
use html_chunker::{ChunkStats, Chunker, ChunkerBuilder, Options};
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "html-chunker")]
#[command(about = "Split HTML documents into smaller chunks for LLM processing")]
struct Args {
    /// Input HTML file or directory
    input: PathBuf,

    /// Output directory for chunks
    #[arg(short = 'o', long = "output", default_value = "./chunks")]
    output: PathBuf,

    /// Maximum tokens per chunk
    #[arg(short = 't', long = "max-tokens", default_value_t = 1000)]
    max_tokens: usize,

    /// Skip HTML cleaning (keep scripts, styles, etc.)
    #[arg(long = "no-clean")]
    no_clean: bool,

    /// Maximum attribute length (0 for no limit)
    #[arg(long = "attr-cutoff", default_value_t = 40)]
    attr_cutoff: usize,

    /// Tokenizer model to use
    #[arg(long = "model", default_value = "gpt-3.5-turbo")]
    model: String,

    /// Prefix for chunk filenames
    #[arg(long = "prefix", default_value = "chunk_")]
    prefix: String,

    /// Verbose output (debug logging on stderr)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Show per-file token statistics
    #[arg(long = "stats")]
    stats: bool,

    /// Print a JSON summary instead of the plain report
    #[arg(long = "json")]
    json_output: bool,
}

/// What happened to one input file.
#[derive(Debug, Serialize)]
struct FileReport {
    input: PathBuf,
    output_dir: PathBuf,
    input_tokens: usize,
    stats: ChunkStats,
    removed_chars: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    files: Vec<FileReport>,
    failed: Vec<PathBuf>,
    total_chunks: usize,
    total_input_tokens: usize,
    total_output_tokens: usize,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn process_file(
    chunker: &Chunker,
    html_file: &Path,
    output: &Path,
    prefix: &str,
) -> anyhow::Result<FileReport> {
    let html = read_html_file(html_file)?;
    let input_tokens = chunker.count_tokens(&html);
    let result = chunker.chunk_with_metadata(&html);

    let stem = html_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let file_output_dir = output.join(stem);
    fs::create_dir_all(&file_output_dir)
        .with_context(|| format!("create {}", file_output_dir.display()))?;

    for (i, chunk) in result.chunks.iter().enumerate() {
        let chunk_path = file_output_dir.join(format!("{}{:03}.html", prefix, i));
        fs::write(&chunk_path, chunk).with_context(|| format!("write {}", chunk_path.display()))?;
        debug!(path = %chunk_path.display(), "wrote chunk");
    }

    Ok(FileReport {
        input: html_file.to_path_buf(),
        output_dir: file_output_dir,
        input_tokens,
        stats: result.stats(chunker.token_counter()),
        removed_chars: result.removed.as_deref().map(|r| r.chars().count()).unwrap_or(0),
    })
}

fn print_report(summary: &Summary, args: &Args) {
    for report in &summary.files {
        println!(
            "{}: {} chunk(s) in {}",
            report.input.display(),
            report.stats.chunks,
            report.output_dir.display()
        );
        if args.verbose && report.removed_chars > 0 {
            println!("  Removed {} chars of hidden content", report.removed_chars);
        }
        if args.stats {
            println!("  Input tokens: {}", report.input_tokens);
            println!("  Output tokens: {}", report.stats.total_tokens);
            println!("  Avg tokens per chunk: {}", report.stats.avg_tokens);
            println!(
                "  Token range: {} - {}",
                report.stats.min_tokens, report.stats.max_tokens
            );
        }
    }

    println!("Processing complete!");
    println!("Processed {} file(s)", summary.files.len());
    println!("Created {} chunk(s)", summary.total_chunks);
    println!("Total input tokens: {}", summary.total_input_tokens);
    println!("Total output tokens: {}", summary.total_output_tokens);
    if summary.total_chunks > 0 {
        println!(
            "Average tokens per chunk: {}",
            summary.total_output_tokens / summary.total_chunks
        );
    }
    println!("Output saved to: {}", args.output.display());
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let html_files = match collect_html_files(&args.input) {
        Ok(files) if files.is_empty() => {
            eprintln!("error: no HTML files found in {:?}", args.input);
            return ExitCode::from(1);
        }
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let opts = Options {
        max_tokens: args.max_tokens,
        clean: !args.no_clean,
        attr_cutoff: args.attr_cutoff,
        model: args.model.clone(),
    };
    let chunker = match ChunkerBuilder::from_options(opts).build() {
        Ok(chunker) => chunker,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = fs::create_dir_all(&args.output) {
        eprintln!("error creating {:?}: {}", args.output, e);
        return ExitCode::from(1);
    }

    info!(
        files = html_files.len(),
        output = %args.output.display(),
        max_tokens = args.max_tokens,
        clean = !args.no_clean,
        "chunking"
    );

    let mut summary = Summary {
        files: Vec::new(),
        failed: Vec::new(),
        total_chunks: 0,
        total_input_tokens: 0,
        total_output_tokens: 0,
    };

    for html_file in &html_files {
        match process_file(&chunker, html_file, &args.output, &args.prefix) {
            Ok(report) => {
                summary.total_chunks += report.stats.chunks;
                summary.total_input_tokens += report.input_tokens;
                summary.total_output_tokens += report.stats.total_tokens;
                summary.files.push(report);
            }
            Err(e) => {
                error!(file = %html_file.display(), error = %e, "failed to process file");
                eprintln!("error processing {:?}: {:#}", html_file, e);
                summary.failed.push(html_file.clone());
            }
        }
    }

    if args.json_output {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error serializing summary: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        print_report(&summary, &args);
    }

    if summary.failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
