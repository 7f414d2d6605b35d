use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use gleaner_core::{ContentScore, Document, Metadata, ScoreConfig, candidate_elements, find_best_element};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of characters of content text shown in the text summary
const PREVIEW_CHARS: usize = 280;

const NO_CONTENT: &str = "No content root scored above the threshold";

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, text", s)),
        }
    }
}

/// Inspect page metadata and the detected content root of an HTML document
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "Extract page metadata and locate the main content of HTML documents", long_about = None)]
struct Args {
    /// Local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// URL the document was loaded from (used for domain and favicon)
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Minimum score the best content candidate must exceed
    #[arg(long, default_value = "50", value_name = "NUM")]
    min_score: f64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "gleaner_core=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Print a styled banner for verbose mode
fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Gleaner".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!();
}

/// Print a styled step message
fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

fn content_json(best: Option<&ContentScore<'_>>) -> serde_json::Value {
    match best {
        Some(best) => serde_json::json!({
            "score": best.score,
            "tag": best.element.tag_name(),
            "id": best.element.attr("id"),
            "class": best.element.attr("class"),
            "text": collapse_whitespace(&best.element.text()),
        }),
        None => serde_json::Value::Null,
    }
}

/// Renders the text summary. `styled` adds terminal colors; files get plain text.
fn render_text(metadata: &Metadata, best: Option<&ContentScore<'_>>, styled: bool) -> String {
    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Site", &metadata.site),
        ("Domain", &metadata.domain),
        ("Published", &metadata.published),
        ("Description", &metadata.description),
        ("Image", &metadata.image),
        ("Favicon", &metadata.favicon),
    ];

    let mut out = String::new();
    for (label, value) in fields {
        if value.is_empty() {
            continue;
        }
        let label = format!("{:<12}", format!("{}:", label));
        if styled {
            out.push_str(&format!("{} {}\n", label.dimmed(), value.bright_white()));
        } else {
            out.push_str(&format!("{} {}\n", label, value));
        }
    }

    out.push('\n');
    match best {
        Some(best) => {
            let text = collapse_whitespace(&best.element.text());
            let preview: String = text.chars().take(PREVIEW_CHARS).collect();
            let tag = best.element.tag_name();
            let score = format!("(score {:.1})", best.score);
            if styled {
                out.push_str(&format!(
                    "{} <{}> {}\n{}\n",
                    "Content:".dimmed(),
                    tag.bright_cyan(),
                    score.dimmed(),
                    preview
                ));
            } else {
                out.push_str(&format!("Content: <{}> {}\n{}\n", tag, score, preview));
            }
        }
        None if styled => out.push_str(&format!("{}\n", NO_CONTENT.yellow())),
        None => out.push_str(&format!("{}\n", NO_CONTENT)),
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        print_banner();
        print_step(1, 3, "Reading input");
    }

    let html = read_input(&args.input)?;
    let doc = match &args.url {
        Some(url) => Document::parse_with_location(&html, url),
        None => Document::parse(&html),
    }
    .context("Failed to parse HTML")?;

    if args.verbose {
        print_step(2, 3, "Extracting metadata and scoring candidates");
    }

    let metadata = doc.extract_metadata();
    let candidates = candidate_elements(&doc);
    let config = ScoreConfig::builder().min_score(args.min_score).build();
    let best = find_best_element(&candidates, &config);

    if args.verbose {
        eprintln!(
            "  {} {}",
            "Candidates:".dimmed(),
            candidates.len().to_string().bright_white()
        );
        print_step(3, 3, "Writing output");
    }

    let output = match args.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "metadata": metadata,
                "content": content_json(best.as_ref()),
            });
            serde_json::to_string_pretty(&report).context("Failed to serialize report")? + "\n"
        }
        OutputFormat::Text => render_text(&metadata, best.as_ref(), args.output.is_none()),
    };

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
