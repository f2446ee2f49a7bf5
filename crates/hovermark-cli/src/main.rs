use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use hovermark_core::{FontHandle, StyleConfig, StyledText, parse, render};
use hovermark_lsp::{SignatureNavigator, SignatureView, documentation_markdown, hover_markdown};
use hovermark_renderer::{Renderer, Theme};
use lsp_types::{Hover, SignatureHelp};
use serde_json::json;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "hovermark", version, about = "Render hover markdown as styled text")]
struct Args {
    /// Markdown file to render; stdin when omitted.
    input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Ansi)]
    format: Format,

    #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    /// TOML style configuration. Overrides the theme palette.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Monospace font family for code.
    #[arg(long)]
    font: Option<String>,

    /// Treat the input as an LSP `Hover` JSON payload.
    #[arg(long, conflicts_with = "signature")]
    hover: bool,

    /// Treat the input as an LSP `SignatureHelp` JSON payload.
    #[arg(long)]
    signature: bool,

    /// Wrap HTML output in a standalone document.
    #[arg(long)]
    standalone: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Ansi,
    Html,
    Json,
    Tree,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<String> {
    let source = read_input(args.input.as_deref())?;
    let mut renderer = Renderer::new(args.theme.into());
    if let Some(font) = &args.font {
        renderer = renderer.with_font(font.clone());
    }
    let style = load_style(args.config.as_deref(), args.font.as_deref(), &renderer)?;

    if args.signature {
        let help: SignatureHelp = serde_json::from_str(&source)
            .context("input is not an LSP signature help payload")?;
        return signature_output(SignatureNavigator::new(help), args, &renderer, &style);
    }

    let markdown = if args.hover {
        let hover: Hover =
            serde_json::from_str(&source).context("input is not an LSP hover payload")?;
        hover_markdown(&hover.contents)
    } else {
        source
    };
    tracing::debug!(len = markdown.len(), format = ?args.format, "rendering");

    if args.format == Format::Tree {
        return Ok(format!("{:#?}\n", parse(&markdown)));
    }
    let styled = render(&markdown, &style);
    match args.format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&styled)?;
            json.push('\n');
            Ok(json)
        }
        _ => Ok(styled_output(&styled, args, &renderer)),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn load_style(path: Option<&Path>, font: Option<&str>, renderer: &Renderer) -> Result<StyleConfig> {
    let Some(path) = path else {
        return Ok(renderer.style_config());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut style: StyleConfig =
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?;
    // --font wins over the file.
    if let Some(font) = font {
        style.monospace = FontHandle::new(font);
    }
    tracing::info!(path = %path.display(), "loaded style config");
    Ok(style)
}

fn styled_output(styled: &StyledText, args: &Args, renderer: &Renderer) -> String {
    let fragment = fragment(styled, args.format, renderer);
    if args.format == Format::Html && args.standalone {
        renderer.embed_html(&fragment, true)
    } else {
        fragment
    }
}

/// ANSI or HTML text for one styled buffer, newline terminated.
fn fragment(styled: &StyledText, format: Format, renderer: &Renderer) -> String {
    let mut out = match format {
        Format::Html => renderer.to_html(styled),
        _ => renderer.to_ansi(styled),
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn signature_output(
    navigator: SignatureNavigator,
    args: &Args,
    renderer: &Renderer,
    style: &StyleConfig,
) -> Result<String> {
    let Some(SignatureView {
        label,
        documentation,
    }) = navigator.render(style)
    else {
        return Ok(String::new());
    };
    let position = navigator.position_label();

    match args.format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&json!({
                "label": label,
                "documentation": documentation,
                "position": position,
            }))?;
            json.push('\n');
            Ok(json)
        }
        Format::Tree => {
            let docs = navigator
                .current()
                .and_then(|signature| signature.documentation.as_ref())
                .map(documentation_markdown)
                .unwrap_or_default();
            Ok(format!("{:#?}\n", parse(&docs)))
        }
        Format::Ansi | Format::Html => {
            let mut out = fragment(&label, args.format, renderer);
            if let Some(position) = position {
                out = format!("{} {}\n", out.trim_end_matches('\n'), position);
            }
            if !documentation.is_empty() {
                out.push('\n');
                out.push_str(&fragment(&documentation, args.format, renderer));
            }
            if args.format == Format::Html && args.standalone {
                out = renderer.embed_html(&out, true);
            }
            Ok(out)
        }
    }
}
