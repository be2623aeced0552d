//! unblock CLI - document-analysis result reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use unblock::job::JobStatus;
use unblock::{read_raw_result, JsonFormat, TableStyle, Unblock};

#[derive(Parser)]
#[command(name = "unblock")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconstruct document-analysis results into Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Saved analysis result (block list or poll response JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct a saved analysis result
    Analyze {
        /// Saved analysis result
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Include YAML frontmatter (Markdown only)
        #[arg(long)]
        frontmatter: bool,

        /// Render tables as HTML (Markdown only)
        #[arg(long)]
        html_tables: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Reconstruct on the current thread only
        #[arg(long)]
        sequential: bool,

        /// Skip amount/date/vendor extraction
        #[arg(long)]
        no_heuristics: bool,
    },

    /// Show result statistics
    Info {
        /// Saved analysis result
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown with tables and a field list
    Markdown,
    /// JSON document summary
    Json,
    /// Plain text
    Text,
}

struct AnalyzeArgs<'a> {
    output: Option<&'a Path>,
    format: OutputFormat,
    frontmatter: bool,
    html_tables: bool,
    compact: bool,
    sequential: bool,
    no_heuristics: bool,
}

impl Default for AnalyzeArgs<'_> {
    fn default() -> Self {
        Self {
            output: None,
            format: OutputFormat::Markdown,
            frontmatter: false,
            html_tables: false,
            compact: false,
            sequential: false,
            no_heuristics: false,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Analyze {
            input,
            output,
            format,
            frontmatter,
            html_tables,
            compact,
            sequential,
            no_heuristics,
        }) => cmd_analyze(
            &input,
            AnalyzeArgs {
                output: output.as_deref(),
                format,
                frontmatter,
                html_tables,
                compact,
                sequential,
                no_heuristics,
            },
        ),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: Markdown to stdout if input is provided
            if let Some(input) = cli.input {
                cmd_analyze(&input, AnalyzeArgs::default())
            } else {
                println!("{}", "Usage: unblock <FILE>".yellow());
                println!("       unblock --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_analyze(input: &Path, args: AnalyzeArgs<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Unblock::new();
    if args.sequential {
        builder = builder.sequential();
    }
    if args.no_heuristics {
        builder = builder.without_heuristics();
    }
    if args.frontmatter {
        builder = builder.with_frontmatter();
    }
    if args.html_tables {
        builder = builder.with_table_style(TableStyle::Html);
    }

    let result = builder.analyze_file(input)?;

    let content = match args.format {
        OutputFormat::Markdown => result.to_markdown()?,
        OutputFormat::Text => result.to_text()?,
        OutputFormat::Json => {
            let format = if args.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            result.to_json(format)?
        }
    };

    if let Some(path) = args.output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_raw_result(input)?;
    if let Some(status) = raw.job_status {
        if status != JobStatus::Succeeded {
            log::warn!("{} has job status {:?}", input.display(), status);
        }
    }

    let summary = unblock::analyze_blocks(&raw.blocks, raw.page_count);
    let stats = &summary.stats;

    if json {
        let value = serde_json::json!({
            "file": input.display().to_string(),
            "shape": raw.shape.to_string(),
            "pages": summary.page_count,
            "average_confidence": summary.average_confidence,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Result Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), raw.shape);
    if let Some(status) = raw.job_status {
        println!("{}: {:?}", "Job status".bold(), status);
    }
    if let Some(ref message) = raw.status_message {
        println!("{}: {}", "Status message".bold(), message);
    }
    println!("{}: {}", "Pages".bold(), summary.page_count);
    println!(
        "{}: {:.2}",
        "Average confidence".bold(),
        summary.average_confidence
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Blocks".bold(), stats.block_count);
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Form fields".bold(), stats.field_count);

    if stats.unknown_block_count > 0 {
        println!("{}: {}", "Unknown blocks".yellow(), stats.unknown_block_count);
    }
    if stats.dangling_edge_count > 0 {
        println!("{}: {}", "Dangling edges".yellow(), stats.dangling_edge_count);
    }
    if stats.duplicate_id_count > 0 {
        println!("{}: {}", "Duplicate ids".yellow(), stats.duplicate_id_count);
    }

    if let Some(amount) = summary.amount {
        println!("{}: {:.2}", "Amount".bold(), amount);
    }
    if let Some(ref date) = summary.date {
        println!("{}: {}", "Date".bold(), date);
    }
    if let Some(ref vendor) = summary.vendor {
        println!("{}: {}", "Vendor".bold(), vendor);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unblock".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document-analysis result reconstruction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unblock".dimmed());
    println!("License: MIT");
}
