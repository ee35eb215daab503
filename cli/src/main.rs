//! docxtree CLI - Word document block tree extraction
//!
//! A command-line tool for turning DOCX files into a flat JSON block tree
//! or plain text.

use clap::{Parser, Subcommand};
use colored::*;
use docxtree::docx::{BodyElements, DocxReader, ReaderOptions};
use docxtree::render::{JsonFormat, RenderOptions};
use docxtree::DocumentTree;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Word document block tree extraction to JSON and text
#[derive(Parser)]
#[command(
    name = "docxtree",
    author = "iyulab",
    version,
    about = "Extract a block tree from Word documents",
    long_about = "docxtree - Word (.docx) reader.\n\n\
                  Produces a flat block tree with resolved indentation, list and heading attributes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to its JSON block tree
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        /// Emit tables and other body elements as passthrough blocks
        #[arg(long)]
        passthrough: bool,
    },

    /// Convert a document to plain text
    Text {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix headings with '#' markers
        #[arg(long)]
        headings: bool,
    },

    /// Show block, heading and list counts
    Info {
        /// Input file path
        input: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Json {
            input,
            output,
            compact,
            passthrough,
        } => {
            let mut options = ReaderOptions::new();
            if passthrough {
                options = options.with_body_elements(BodyElements::Passthrough);
            }

            let pb = create_spinner("Parsing document...");
            let tree = read_tree(&input, options)?;
            pb.set_message("Rendering to JSON...");

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = docxtree::render::to_json(&tree, format)?;

            pb.finish_and_clear();
            write_output(output.as_deref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to JSON: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Text {
            input,
            output,
            headings,
        } => {
            let pb = create_spinner("Parsing document...");
            let tree = read_tree(&input, ReaderOptions::new().with_run_breaks(true))?;
            pb.set_message("Rendering to text...");

            let options = RenderOptions::new().with_heading_markers(headings);
            let text = docxtree::render::to_text(&tree, &options);

            pb.finish_and_clear();
            write_output(output.as_deref(), &text)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to text: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Info { input, json } => {
            let pb = create_spinner("Analyzing document...");

            let reader = DocxReader::open(&input)?;
            let tree = reader.parse()?;

            pb.finish_and_clear();

            let stats = Stats::collect(&reader, &tree);
            if json {
                let value = serde_json::json!({
                    "file": input.display().to_string(),
                    "documentPart": reader.document_part(),
                    "parts": reader.package().list_parts(),
                    "styles": stats.styles,
                    "numberingInstances": stats.numbering_instances,
                    "blocks": stats.blocks,
                    "headings": stats.headings,
                    "listItems": stats.list_items,
                    "emptyParagraphs": stats.empty,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            println!("{}", "Document Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Main part".bold(), reader.document_part());
            println!("{}: {}", "Package parts".bold(), reader.package().len());
            println!("{}: {}", "Styles".bold(), stats.styles);
            println!("{}: {}", "Numbering instances".bold(), stats.numbering_instances);

            println!("\n{}", "Content Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Blocks".bold(), stats.blocks);
            println!("{}: {}", "Headings".bold(), stats.headings);
            println!("{}: {}", "List items".bold(), stats.list_items);
            println!("{}: {}", "Empty paragraphs".bold(), stats.empty);

            let cycles = reader.styles().reported_cycles();
            if !cycles.is_empty() {
                println!(
                    "{} basedOn cycles in styles: {}",
                    "!".yellow().bold(),
                    cycles.join(", ")
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Counts shown by `info`.
struct Stats {
    styles: usize,
    numbering_instances: usize,
    blocks: usize,
    headings: usize,
    list_items: usize,
    empty: usize,
}

impl Stats {
    fn collect(reader: &DocxReader, tree: &DocumentTree) -> Self {
        Self {
            styles: reader.styles().len(),
            numbering_instances: reader.numbering().instances.len(),
            blocks: tree.len(),
            headings: tree.headings().count(),
            list_items: tree.list_items().count(),
            empty: tree.content.iter().filter(|b| b.is_empty()).count(),
        }
    }
}

fn read_tree(input: &Path, options: ReaderOptions) -> docxtree::Result<DocumentTree> {
    let tree = DocxReader::open(input)?.with_options(options).parse()?;
    log::debug!("{}: {} blocks", input.display(), tree.len());
    Ok(tree)
}

fn print_version() {
    println!("{} {}", "docxtree".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word document block tree extraction");
    println!();
    println!("Supported formats: DOCX");
    println!("Repository: https://github.com/iyulab/docxtree");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
