//! Flowbox CLI
//!
//! Lays out a box tree described in JSON and prints the resulting geometry.
//!
//! ```text
//! flowbox page.json
//! flowbox --width 320 --format json page.json
//! flowbox --json '{"root": {"type": "block", "children": [{"type": "text", "text": "hi"}]}}'
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use flowbox_common::warning::clear_warnings;
use flowbox_layout::{
    ApproximateShaper, BoxKind, BoxSpec, Direction, LayoutNode, LayoutOptions, LayoutTree, Rect,
    WritingMode,
};

/// Flowbox: block layout for box trees described in JSON
#[derive(Parser, Debug)]
#[command(name = "flowbox")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Lay out a document and print the box tree
    flowbox page.json

    # Narrow viewport, machine-readable output
    flowbox --width 320 --format json page.json

    # Vertical text
    flowbox --writing-mode vertical-rl page.json

    # Inline document
    flowbox --json '{"root": {"type": "block", "children": [{"type": "text", "text": "hi"}]}}'
"#)]
struct Cli {
    /// Path to a JSON layout document
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Read the layout document from this string instead of a file
    #[arg(long, value_name = "JSON")]
    json: Option<String>,

    /// Inline size of the initial containing block
    #[arg(long)]
    width: Option<f64>,

    /// Block size of the initial containing block
    #[arg(long)]
    height: Option<f64>,

    /// Writing mode of the initial containing block
    #[arg(long, value_name = "MODE")]
    writing_mode: Option<WritingMode>,

    /// Direction of the initial containing block
    #[arg(long, value_name = "DIR")]
    direction: Option<Direction>,

    /// Keep fractional pixel positions
    #[arg(long)]
    no_snap: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented, colored box tree
    Tree,
    /// One JSON record per formatting box
    Json,
}

/// Input file: layout options plus the root box.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct LayoutDocument {
    #[serde(default)]
    options: LayoutOptions,
    root: BoxSpec,
}

/// Output record for one formatting box.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct BoxReport {
    id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    kind: &'static str,
    anonymous: bool,
    bfc_root: bool,
    border: Rect,
    content: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG is parsed last so it wins over -v.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let document = load_document(&cli)?;
    let options = effective_options(&cli, document.options);

    clear_warnings();
    let mut tree = LayoutTree::from_spec(&document.root).context("invalid box tree")?;
    tree.layout(&options, &ApproximateShaper)
        .context("layout failed")?;
    debug!("laid out {} boxes", tree.len());

    match cli.format {
        Format::Tree => print_tree(&tree, &options),
        Format::Json => {
            let report = report(&tree);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Load the document from `--json` or from the file argument.
fn load_document(cli: &Cli) -> Result<LayoutDocument> {
    let text = if let Some(ref json) = cli.json {
        json.clone()
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?
    } else {
        bail!("a document path or --json is required")
    };
    serde_json::from_str(&text).context("malformed layout document")
}

/// Command-line flags override the document's options.
fn effective_options(cli: &Cli, mut options: LayoutOptions) -> LayoutOptions {
    if let Some(width) = cli.width {
        options.inline_size = width;
    }
    if let Some(height) = cli.height {
        options.block_size = height;
    }
    if let Some(writing_mode) = cli.writing_mode {
        options.writing_mode = writing_mode;
    }
    if let Some(direction) = cli.direction {
        options.direction = direction;
    }
    if cli.no_snap {
        options.snap_pixels = false;
    }
    options
}

fn print_tree(tree: &LayoutTree, options: &LayoutOptions) {
    println!(
        "{}",
        format!(
            "=== Layout ({}x{}, {}, {}) ===",
            options.inline_size, options.block_size, options.writing_mode, options.direction
        )
        .bold()
    );
    for node in tree.nodes() {
        let indent = "  ".repeat(tree.depth(node.id));
        let name = format!("{} {}", node.symbol(), node.name());
        let name = if node.flags.is_anonymous {
            name.dimmed().to_string()
        } else if node.flags.is_bfc_root {
            name.underline().to_string()
        } else {
            name
        };
        println!("{indent}{name}{}", describe(node).green());
    }
}

fn describe(node: &LayoutNode) -> String {
    let Some(geometry) = node.geometry else {
        return String::new();
    };
    let b = geometry.border;
    let mut out = format!(" @ {},{} {}x{}", b.x, b.y, b.width, b.height);
    if let BoxKind::BlockOfInlines(content) = &node.kind
        && !content.lineboxes.is_empty()
    {
        let _ = write!(out, " lines={}", content.lineboxes.len());
    }
    out
}

fn report(tree: &LayoutTree) -> Vec<BoxReport> {
    tree.nodes()
        .iter()
        .filter_map(|node| {
            let geometry = node.geometry?;
            Some(BoxReport {
                id: node.id.0,
                label: node.label.clone(),
                kind: node.symbol(),
                anonymous: node.flags.is_anonymous,
                bfc_root: node.flags.is_bfc_root,
                border: geometry.border,
                content: geometry.content,
                lines: match &node.kind {
                    BoxKind::BlockOfInlines(content) => Some(content.lineboxes.len()),
                    _ => None,
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("flowbox").chain(args.iter().copied()))
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_flags_override_document_options() {
        let cli = cli(&[
            "--width",
            "320",
            "--writing-mode",
            "vertical-lr",
            "--no-snap",
            "x.json",
        ]);
        let options = effective_options(&cli, LayoutOptions::default());
        assert_eq!(options.inline_size, 320.0);
        assert_eq!(options.block_size, 600.0);
        assert_eq!(options.writing_mode, WritingMode::VerticalLr);
        assert!(!options.snap_pixels);
    }

    #[test]
    fn test_inline_document_reports_every_formatting_box() {
        let cli = cli(&[
            "--json",
            r#"{"root": {"type": "block", "children": [{"type": "text", "text": "hi"}]}}"#,
        ]);
        let document = load_document(&cli).expect("document should parse");
        let mut tree = LayoutTree::from_spec(&document.root).expect("valid tree");
        tree.layout(&document.options, &ApproximateShaper)
            .expect("layout");
        let report = report(&tree);
        assert_eq!(report.len(), 1, "runs and inlines have no geometry");
        assert_eq!(report[0].lines, Some(1));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(load_document(&cli(&[])).is_err());
    }
}
