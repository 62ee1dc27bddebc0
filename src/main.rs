//! backmark - Convert documents between Markdown and Backlog wiki notation
//!
//! Usage:
//!   backmark to-backlog -f input.md -o output.backlog
//!   backmark to-markdown -f wiki.backlog -o output.md
//!   backmark to-backlog -d ./notes -o ./wiki
//!   cat input.md | backmark to-backlog > output.backlog

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};

use backmark::converter::BacklogConverter;
use backmark::settings::{ConversionSettings, SettingsPatch};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    /// Markdown to Backlog notation
    ToBacklog,
    /// Backlog notation to Markdown
    ToMarkdown,
}

#[derive(Parser)]
#[command(
    version,
    about = "Convert documents between Markdown and Backlog wiki notation",
    long_about = "Converts documents between Markdown and Backlog wiki notation.\n\n\
                  If no input file is specified, reads from stdin.\n\
                  If no output file is specified, writes to stdout.\n\
                  Custom rules from the settings file run only in the\n\
                  to-backlog direction."
)]
struct Cli {
    /// Conversion direction
    #[arg(value_enum)]
    direction: Direction,

    /// Input file (reads from stdin if not specified)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output file (writes to stdout if not specified)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Batch convert directory
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// File pattern for batch conversion
    #[arg(long, default_value = "*.md")]
    pattern: String,

    /// Settings file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backlog project key for issue references (overrides the settings file)
    #[arg(long, value_name = "KEY")]
    project_key: Option<String>,

    /// Use tab indentation when converting lists back to Markdown
    #[arg(long, conflicts_with = "spaces")]
    tabs: bool,

    /// Use two-space indentation when converting lists back to Markdown
    #[arg(long)]
    spaces: bool,

    /// Dry run (show what would be converted without writing)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Warn
    };
    simplelog::TermLogger::init(
        log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let settings = load_settings(&args)?;
    if args.verbose {
        log::debug!(
            "settings: {}",
            serde_json::to_string(&settings).unwrap_or_default()
        );
    }
    let converter = BacklogConverter::new(settings);

    if let Some(ref dir) = args.directory {
        return batch_convert(&converter, dir, &args);
    }

    let input_content = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let converted = convert(&converter, args.direction, &input_content);

    if args.dry_run {
        eprintln!("(dry run) {} bytes in, {} bytes out", input_content.len(), converted.len());
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(
                fs::File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            );
            writer.write_all(converted.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            writer.write_all(converted.as_bytes())?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn load_settings(args: &Cli) -> Result<ConversionSettings> {
    let settings = match &args.config {
        Some(path) => ConversionSettings::load(path)?,
        None => ConversionSettings::default(),
    };

    // command-line flags win over the settings file
    let use_tabs = if args.tabs {
        Some(true)
    } else if args.spaces {
        Some(false)
    } else {
        None
    };
    Ok(settings.merged(SettingsPatch {
        project_key: args.project_key.clone(),
        use_tabs_for_indent: use_tabs,
        ..Default::default()
    }))
}

fn convert(converter: &BacklogConverter, direction: Direction, content: &str) -> String {
    match direction {
        Direction::ToBacklog => converter.convert_to_backlog(content),
        Direction::ToMarkdown => converter.convert_to_markdown(content),
    }
}

fn batch_convert(converter: &BacklogConverter, dir: &Path, args: &Cli) -> Result<()> {
    let output_dir = args
        .output
        .as_ref()
        .ok_or_else(|| anyhow!("output directory required for batch conversion"))?;

    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let output_extension = match args.direction {
        Direction::ToBacklog => "backlog",
        Direction::ToMarkdown => "md",
    };

    let mut total_files = 0;
    let mut succeeded = 0;
    let mut failed = 0;

    let pattern = format!("{}/{}", dir.display(), args.pattern);
    let entries: Vec<_> = glob::glob(&pattern)
        .map_err(|e| anyhow!("invalid pattern: {}", e))?
        .filter_map(|e| e.ok())
        .collect();

    for entry in entries {
        total_files += 1;

        let relative = entry
            .strip_prefix(dir)
            .unwrap_or(&entry)
            .with_extension(output_extension);
        let output_path = output_dir.join(relative);

        if let Some(parent) = output_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        if args.verbose {
            eprintln!("Converting {} -> {}", entry.display(), output_path.display());
        }

        let input_content = match fs::read_to_string(&entry) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("✗ Failed to read {}: {}", entry.display(), e);
                failed += 1;
                continue;
            }
        };

        let converted = convert(converter, args.direction, &input_content);

        if !args.dry_run {
            if let Err(e) = fs::write(&output_path, &converted) {
                eprintln!("✗ Failed to write {}: {}", output_path.display(), e);
                failed += 1;
                continue;
            }
        }

        succeeded += 1;
    }

    eprintln!("\nBatch Conversion Summary");
    eprintln!("========================");
    eprintln!("Files processed: {}", total_files);
    eprintln!("Succeeded:       {}", succeeded);
    eprintln!("Failed:          {}", failed);

    if args.dry_run {
        eprintln!("\n(Dry run - no files were written)");
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
