//! Highlight a single snippet from a file or stdin.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use fenceline_highlight::{block_to_html, Highlighter};
use fenceline_mdx::CodeBlock;

use crate::config::ConfigFile;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// HTML markup
    #[default]
    Html,
    /// Rendered lines as JSON
    Json,
}

#[derive(Debug, Args)]
pub struct HighlightArgs {
    /// Source file (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Language tag, e.g. "js" (defaults to the file extension)
    #[arg(short, long, conflicts_with = "class")]
    language: Option<String>,

    /// Fence class annotation, e.g. "language-js"
    #[arg(long)]
    class: Option<String>,

    /// Fence metastring, e.g. "{2,4-6} no-line-numbers"
    #[arg(short, long)]
    meta: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Theme name (overrides config)
    #[arg(long)]
    theme: Option<String>,

    /// Emit unstyled tokens
    #[arg(long)]
    plain: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Run the highlight command, writing to `out` unless `--output` is given.
pub fn run(args: HighlightArgs, config: &ConfigFile, out: &mut impl Write) -> Result<()> {
    let source = read_source(args.file.as_deref())?;

    let block = match &args.class {
        Some(class) => CodeBlock::from_class_name(class, source, args.meta.clone()),
        None => CodeBlock::new(
            source,
            resolve_language(args.language.as_deref(), args.file.as_deref()),
            args.meta.clone(),
            1,
        ),
    };

    let highlighter = if args.plain || config.highlight.plain {
        Highlighter::plain()
    } else {
        let theme = args.theme.as_deref().unwrap_or(&config.highlight.theme);
        Highlighter::syntect(theme)?
    };

    let rendered = highlighter.highlight(&block);
    tracing::debug!(
        "Rendered {} lines as {:?} with {} tokenizer",
        rendered.lines.len(),
        block.language,
        highlighter.tokenizer_name()
    );

    let output = match args.format {
        OutputFormat::Html => block_to_html(&rendered),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&rendered).context("Failed to serialize output")?
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            writeln!(out, "{}", output).context("Failed to write output")?;
        }
    }

    Ok(())
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}

/// Explicit language wins, then the file extension, then none.
fn resolve_language(language: Option<&str>, file: Option<&Path>) -> String {
    language
        .or_else(|| file.and_then(|f| f.extension()).and_then(|e| e.to_str()))
        .unwrap_or("")
        .to_string()
}
