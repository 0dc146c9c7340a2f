//! CLI tool for inspecting and editing slide text in PowerPoint files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slide_core::{
    analyze_slide, apply_edit, classify, classify_shape, clean_text_for_bullet_formatting,
    edit_target_recommendations, summarize_slide, Deck, EditOutcome, EditTarget, ShapeClassification,
    SlideSummary,
};
use slide_pptx::PptxParser;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Inspect slide shapes and rework their text.
#[derive(Parser, Debug)]
#[command(name = "slide-inspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all slides with their titles
    List {
        /// Input presentation (.pptx)
        input: PathBuf,
    },

    /// Classify every shape on a slide
    Read {
        /// Input presentation (.pptx)
        input: PathBuf,

        /// 1-based slide number
        slide: usize,
    },

    /// Classify a piece of text as if it were a single shape
    Analyze {
        /// Text to classify (read from stdin when omitted)
        text: Option<String>,
    },

    /// Strip typed bullet glyphs from every line of text
    Clean {
        /// Text to clean (read from stdin when omitted)
        text: Option<String>,
    },

    /// Apply an edit to a slide in memory and show the edited shape
    Edit {
        /// Input presentation (.pptx)
        input: PathBuf,

        /// 1-based slide number
        slide: usize,

        /// How to target: shape_index, shape_type, bullet_point, bullet_list, text_replace
        target_type: String,

        /// Index or shape type, depending on target_type
        target_value: String,

        /// Replacement text
        new_text: String,

        /// Text to find (text_replace only)
        #[arg(long)]
        old_text: Option<String>,
    },
}

/// Output of the `list` command.
#[derive(Debug, Serialize)]
struct DeckOverview {
    total_slides: usize,
    slides: Vec<SlideSummary>,
}

/// Output of the `analyze` command.
#[derive(Debug, Serialize)]
struct TextAnalysis {
    #[serde(flatten)]
    shape: ShapeClassification,
    recommendations: BTreeMap<String, String>,
}

/// Output of the `edit` command.
///
/// Edits only touch the in-memory deck; `persisted` is always false.
#[derive(Debug, Serialize)]
struct EditReport {
    success: bool,
    persisted: bool,
    message: String,
    slide_number: usize,
    target_type: String,
    target_value: String,
    shape: ShapeClassification,
}

impl EditReport {
    fn new(
        outcome: EditOutcome,
        input: &Path,
        slide_number: usize,
        target_type: String,
        target_value: String,
        shape: ShapeClassification,
    ) -> Self {
        Self {
            success: true,
            persisted: false,
            message: format!(
                "{} (applied in memory only; {} was not modified)",
                outcome.message,
                input.display()
            ),
            slide_number,
            target_type,
            target_value,
            shape,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::List { input } => {
            let deck = load_deck(&input)?;
            let overview = DeckOverview {
                total_slides: deck.slides.len(),
                slides: deck
                    .slides
                    .iter()
                    .map(|s| summarize_slide(s.number, &s.shapes))
                    .collect(),
            };
            print_json(&overview)?;
        }
        Command::Read { input, slide } => {
            let deck = load_deck(&input)?;
            let slide = deck.slide(slide)?;
            print_json(&analyze_slide(slide.number, &slide.shapes))?;
        }
        Command::Analyze { text } => {
            let text = text_or_stdin(text)?;
            let shape = classify(0, true, Some(&text));
            let recommendations = edit_target_recommendations(&shape);
            print_json(&TextAnalysis {
                shape,
                recommendations,
            })?;
        }
        Command::Clean { text } => {
            let text = text_or_stdin(text)?;
            println!("{}", clean_text_for_bullet_formatting(&text));
        }
        Command::Edit {
            input,
            slide,
            target_type,
            target_value,
            new_text,
            old_text,
        } => {
            let target = EditTarget::parse(&target_type, &target_value, old_text.as_deref())?;
            let mut deck = load_deck(&input)?;
            let shapes = &mut deck.slide_mut(slide)?.shapes;

            let outcome = apply_edit(shapes, &target, &new_text)
                .with_context(|| format!("Error editing slide {}", slide))?;
            let shape = classify_shape(outcome.shape_index, &shapes[outcome.shape_index]);
            let report = EditReport::new(outcome, &input, slide, target_type, target_value, shape);
            print_json(&report)?;
        }
    }

    Ok(())
}

/// Read a presentation into memory.
fn load_deck(input_path: &Path) -> Result<Deck> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    let reader = BufReader::new(file);

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    log::debug!("Parsing {} as PPTX", input_path.display());
    let deck = PptxParser::new()
        .parse(reader, filename)
        .with_context(|| format!("Failed to parse {}", input_path.display()))?;

    Ok(deck)
}

/// Use the given text, or read all of stdin.
fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
