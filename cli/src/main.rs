//! pdf2html CLI - PDF to semantic HTML reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2html::render::to_json;
use pdf2html::{
    CollectingSink, ConvertOptions, ConvertResult, Converter, Diagnostic, DiagnosticSink,
    JsonFormat, LogSink, LopdfProvider, LopdfSource, PageSelection, PdfSource,
};

#[derive(Parser)]
#[command(name = "pdf2html")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconstruct PDF documents as semantic HTML", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output HTML file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to HTML
    Html {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        convert: ConvertArgs,

        /// Omit the MathJax script
        #[arg(long)]
        no_math: bool,

        /// Omit the embedded stylesheet
        #[arg(long)]
        no_styles: bool,

        /// Print skipped content and failed pages
        #[arg(long)]
        diagnostics: bool,
    },

    /// Convert PDF to JSON blocks
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        convert: ConvertArgs,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Options shared by the converting commands.
#[derive(clap::Args, Default)]
struct ConvertArgs {
    /// Title used when the PDF has none
    #[arg(long, env = "PDF2HTML_TITLE")]
    title: Option<String>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,
}

impl ConvertArgs {
    fn options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let pages = match self.pages.as_deref() {
            Some(p) => PageSelection::parse(p)?,
            None => PageSelection::All,
        };

        let mut options = ConvertOptions::new()
            .with_pages(pages)
            .with_parallel(!self.sequential);
        if let Some(ref title) = self.title {
            options = options.with_title(title);
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Html {
            input,
            output,
            convert,
            no_math,
            no_styles,
            diagnostics,
        }) => cmd_html(&input, output.as_deref(), &convert, no_math, no_styles, diagnostics),
        Some(Commands::Json {
            input,
            output,
            convert,
            compact,
        }) => cmd_json(&input, output.as_deref(), &convert, compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert to HTML next to the input
            if let Some(input) = cli.input {
                let output = cli.output.unwrap_or_else(|| input.with_extension("html"));
                cmd_html(
                    &input,
                    Some(&output),
                    &ConvertArgs::default(),
                    false,
                    false,
                    false,
                )
            } else {
                println!("{}", "Usage: pdf2html <FILE> [OUTPUT]".yellow());
                println!("       pdf2html --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn convert(
    input: &Path,
    options: ConvertOptions,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<ConvertResult, Box<dyn std::error::Error>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Converting {}...", input.display()));

    let data = fs::read(input)?;
    let result = Converter::new(options)
        .with_sink(sink)
        .convert_bytes(&LopdfProvider, &data);

    spinner.finish_and_clear();
    Ok(result?)
}

fn cmd_html(
    input: &Path,
    output: Option<&Path>,
    args: &ConvertArgs,
    no_math: bool,
    no_styles: bool,
    show_diagnostics: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = args.options()?.with_styles(!no_styles);
    if no_math {
        options.render = options.render.without_math_script();
    }

    let sink = Arc::new(CollectingSink::new());
    let result = convert(input, options, sink.clone())?;

    write_output(output, &result.html)?;

    if show_diagnostics {
        print_diagnostics(&sink.diagnostics());
    }
    if result.stats.failed_pages > 0 {
        eprintln!(
            "{} {} page(s) could not be processed",
            "Warning:".yellow().bold(),
            result.stats.failed_pages
        );
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    args: &ConvertArgs,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let result = convert(input, args.options()?, Arc::new(LogSink))?;
    let json = to_json(&result.document, format)?;
    write_output(output, &json)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = LopdfSource::load_file(input)?;
    let metadata = source.metadata().unwrap_or_default();
    let result = Converter::new(ConvertOptions::default())
        .with_sink(Arc::new(CollectingSink::new()))
        .convert(&source);
    let stats = &result.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), source.page_count());

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref subject) = metadata.subject {
        println!("{}: {}", "Subject".bold(), subject);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_count);
    println!("{}: {}", "Math".bold(), stats.math_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Skipped".bold(), stats.skipped_count);
    println!("{}: {}", "Failed pages".bold(), stats.failed_pages);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2html".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to semantic HTML reconstruction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdf2html".dimmed());
    println!("License: MIT");
}

/// Write to a file, or to stdout when no path is given.
fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            println!("{} {}", "Saved to".green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        eprintln!("{}", "No content skipped".green());
        return;
    }
    eprintln!("{}", "Diagnostics".cyan().bold());
    for diagnostic in diagnostics {
        if diagnostic.is_page_failure() {
            eprintln!("  {} {}", "✗".red(), diagnostic);
        } else {
            eprintln!("  {} {}", "-".yellow(), diagnostic);
        }
    }
}
