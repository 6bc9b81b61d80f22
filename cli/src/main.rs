//! unscan CLI - PDF and scan text reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unscan::ocr::check_tools;
use unscan::parser::{extract_page_text, open_pdf};
use unscan::render::to_json;
use unscan::{
    detect_kind_from_path, CleanupOptions, CleanupPreset, Config, ExtractionResult, FileKind,
    JsonFormat, Page, PageSelection, PageTextSource, Pipeline, QualityGate,
};

#[derive(Parser)]
#[command(name = "unscan")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconstruct PDF and scanned document text into structured Markdown", long_about = None)]
struct Cli {
    /// Input PDF or image file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every processing command.
#[derive(Args, Clone)]
struct PipelineArgs {
    /// JSON configuration file (thresholds and vocabulary)
    #[arg(long, global = true, value_name = "FILE", env = "UNSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Native text shorter than this triggers OCR
    #[arg(long, global = true, value_name = "CHARS", env = "UNSCAN_OCR_THRESHOLD")]
    ocr_threshold: Option<usize>,

    /// Native text shorter than this is kept alongside OCR output
    #[arg(long, global = true, value_name = "CHARS", env = "UNSCAN_MERGE_THRESHOLD")]
    merge_threshold: Option<usize>,

    /// Rasterization resolution for OCR
    #[arg(long, global = true, env = "UNSCAN_DPI")]
    dpi: Option<u32>,

    /// Tesseract language (e.g. "por", "eng")
    #[arg(long, global = true, env = "UNSCAN_LANG")]
    lang: Option<String>,

    /// Text cleanup preset
    #[arg(long, global = true, value_enum)]
    cleanup: Option<CleanupLevel>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long, global = true)]
    pages: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct structured Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the merged page text before cleanup
    Raw {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the full result object as JSON
    Json {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the section/service summary as JSON
    Structured {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show per-page native text quality without running OCR
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Process many files in parallel, writing <name>.md next to each
    Batch {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Check that the OCR toolchain is installed
    Doctor,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Unicode fixes and whitespace only
    Minimal,
    /// Full artifact and layout cleanup (default)
    Standard,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let args = cli.pipeline;

    let result = match cli.command {
        Some(Commands::Markdown { input, output }) => cmd_markdown(&input, output.as_deref(), &args),
        Some(Commands::Raw { input, output }) => cmd_raw(&input, output.as_deref(), &args),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact, &args),
        Some(Commands::Structured { input }) => cmd_structured(&input, &args),
        Some(Commands::Info { input }) => cmd_info(&input, &args),
        Some(Commands::Batch { inputs, output }) => cmd_batch(&inputs, output.as_deref(), &args),
        Some(Commands::Doctor) => cmd_doctor(),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: Markdown to stdout if input is provided
            if let Some(input) = cli.input {
                cmd_markdown(&input, None, &args)
            } else {
                println!("{}", "Usage: unscan <FILE>".yellow());
                println!("       unscan --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Load the config file (if any) and apply command-line overrides.
fn load_config(args: &PipelineArgs) -> CliResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let options = &mut config.pipeline;
    if let Some(chars) = args.ocr_threshold {
        options.ocr_trigger_chars = chars;
    }
    if let Some(chars) = args.merge_threshold {
        options.merge_threshold_chars = chars;
    }
    if let Some(dpi) = args.dpi {
        options.raster_dpi = dpi;
    }
    if let Some(ref lang) = args.lang {
        options.ocr_language = lang.clone();
    }
    if let Some(level) = args.cleanup {
        options.cleanup = CleanupOptions::from_preset(level.into());
    }
    if let Some(ref pages) = args.pages {
        options.pages =
            PageSelection::parse(pages).map_err(|e| format!("Invalid page range: {}", e))?;
    }
    options.validate()?;

    Ok(config)
}

fn build_pipeline(args: &PipelineArgs) -> CliResult<Pipeline> {
    let config = load_config(args)?;
    log::debug!(
        "OCR trigger {} chars, merge threshold {} chars, {} dpi, language {}",
        config.pipeline.ocr_trigger_chars,
        config.pipeline.merge_threshold_chars,
        config.pipeline.raster_dpi,
        config.pipeline.ocr_language
    );
    Ok(Pipeline::from_config(&config)?)
}

fn run(input: &Path, args: &PipelineArgs) -> CliResult<ExtractionResult> {
    let pipeline = build_pipeline(args)?;
    Ok(pipeline.process_file(input))
}

/// Turn an error result into a CLI error.
fn require_success(result: &ExtractionResult) -> CliResult<()> {
    match &result.error {
        Some(message) => Err(message.clone().into()),
        None => Ok(()),
    }
}

fn write_output(content: &str, output: Option<&Path>) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_markdown(input: &Path, output: Option<&Path>, args: &PipelineArgs) -> CliResult<()> {
    let result = run(input, args)?;
    require_success(&result)?;
    if result.ocr_pages() > 0 {
        eprintln!(
            "{} {} of {} pages",
            "OCR applied to".dimmed(),
            result.ocr_pages(),
            result.pages_processed
        );
    }
    write_output(&result.text, output)
}

fn cmd_raw(input: &Path, output: Option<&Path>, args: &PipelineArgs) -> CliResult<()> {
    let result = run(input, args)?;
    require_success(&result)?;
    write_output(&result.raw_text, output)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &PipelineArgs,
) -> CliResult<()> {
    let pipeline = build_pipeline(args)?;
    let result = match fs::read(input) {
        Ok(data) => pipeline.process_structured(&data),
        Err(e) => ExtractionResult::failure(&unscan::Error::Io(e), None),
    };

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    // Error results are still valid JSON output.
    write_output(&to_json(&result, format)?, output)
}

fn cmd_structured(input: &Path, args: &PipelineArgs) -> CliResult<()> {
    let pipeline = build_pipeline(args)?;
    let data = fs::read(input)?;
    let result = pipeline.process_structured(&data);
    require_success(&result)?;

    let summary = result.structure.unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_info(input: &Path, args: &PipelineArgs) -> CliResult<()> {
    let config = load_config(args)?;
    let kind = detect_kind_from_path(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Type".bold(), kind);

    if kind.is_image() {
        println!("{}: 1 (scanned image, OCR only)", "Pages".bold());
        return Ok(());
    }
    if kind != FileKind::Pdf {
        return Err(format!("Unsupported format: {}", kind).into());
    }

    let data = fs::read(input)?;
    let source = open_pdf(&data)?;
    let numbers = source.page_numbers();
    let gate = QualityGate::new(config.pipeline.ocr_trigger_chars);

    println!("{}: {}", "Pages".bold(), numbers.len());
    println!();
    println!("{}", "Native Text Quality".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let mut needs_ocr = 0;
    for number in numbers
        .into_iter()
        .filter(|n| config.pipeline.pages.includes(*n))
    {
        let mut page = Page::new(number);
        let text = extract_page_text(&source, &mut page);
        let quality = gate.classify(text.as_deref());
        let chars = text.as_deref().map_or(0, |t| t.trim().chars().count());
        let fragments = page.fragments().map_or(0, |f| f.len());

        let label = if quality.needs_ocr() {
            needs_ocr += 1;
            "needs OCR".yellow()
        } else {
            "native".green()
        };
        println!(
            "  {} {:>4}: {:>6} chars, {:>4} lines  {}",
            "Page".bold(),
            number,
            chars,
            fragments,
            label
        );
    }

    println!();
    println!("{}: {}", "Pages needing OCR".bold(), needs_ocr);
    Ok(())
}

fn cmd_batch(inputs: &[PathBuf], output: Option<&Path>, args: &PipelineArgs) -> CliResult<()> {
    let pipeline = build_pipeline(args)?;

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading files...");
    let mut data = Vec::with_capacity(inputs.len());
    for input in inputs {
        data.push(fs::read(input)?);
    }

    pb.set_message("Processing...");
    let results = pipeline.process_batch(&data);

    let mut failed = 0;
    for (input, result) in inputs.iter().zip(&results) {
        pb.inc(1);
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        match &result.error {
            None => {
                let target = markdown_path(input, output);
                fs::write(&target, &result.text)?;
                pb.println(format!("{} {}", "✓".green(), name));
            }
            Some(message) => {
                failed += 1;
                pb.println(format!("{} {}: {}", "✗".red(), name, message));
            }
        }
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} succeeded, {} failed",
        "Batch complete:".green().bold(),
        results.len() - failed,
        failed
    );

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, results.len()).into());
    }
    Ok(())
}

fn markdown_path(input: &Path, output: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let name = format!("{}.md", stem.to_string_lossy());
    match output {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn cmd_doctor() -> CliResult<()> {
    println!("{}", "OCR Toolchain".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let tools = check_tools();
    for tool in &tools {
        let mark = if tool.available {
            "found".green()
        } else {
            "missing".red()
        };
        println!("  {:<12} {}", tool.name, mark);
    }

    if tools.iter().all(|t| t.available) {
        println!("\n{}", "Ready: scanned pages can be OCR'd.".green());
        Ok(())
    } else {
        println!(
            "\n{}",
            "Install poppler-utils and tesseract-ocr to enable OCR fallback.".yellow()
        );
        Err("OCR toolchain incomplete".into())
    }
}

fn cmd_version() {
    println!("{} {}", "unscan".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF and scan text reconstruction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unscan".dimmed());
    println!("License: MIT");
}
