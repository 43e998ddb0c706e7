//! wisp command-line renderer.
//!
//! Two invocation shapes, per [§6 External interfaces]:
//!
//! ```text
//! wisp-cli <input.html> <output.png> [width] [height]   # file-in/file-out
//! wisp-cli -w <width> -H <height> -o <output.png> <url> # network mode
//! ```
//!
//! `-h` is reserved by clap for `--help`; the network-mode height flag uses
//! `-H`/`--height` instead.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use wisp_browser::{Source, render};

/// Default viewport size when no width/height is given.
const DEFAULT_WIDTH: u32 = 800;
/// Default viewport height, tall enough for most single-page documents.
const DEFAULT_HEIGHT: u32 = 2400;

/// Render an HTML document (local file or URL) to a PNG screenshot.
#[derive(Parser, Debug)]
#[command(name = "wisp-cli", author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    wisp-cli page.html out.png
    wisp-cli page.html out.png 1024 768
    wisp-cli -w 1024 -H 768 -o out.png https://example.com
"#)]
struct Cli {
    /// Input HTML file path, or (network mode) a URL.
    input: String,

    /// Output PNG path (file mode positional form).
    output_positional: Option<PathBuf>,

    /// Viewport width (file mode positional form).
    width_positional: Option<u32>,

    /// Viewport height (file mode positional form).
    height_positional: Option<u32>,

    /// Viewport width (network mode).
    #[arg(short = 'w', long = "width")]
    width_flag: Option<u32>,

    /// Viewport height (network mode).
    #[arg(short = 'H', long = "height")]
    height_flag: Option<u32>,

    /// Output PNG path (network mode).
    #[arg(short = 'o', long = "output")]
    output_flag: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let is_url = cli.input.starts_with("http://") || cli.input.starts_with("https://");

    let (source_path, output, width, height) = if is_url {
        let output = cli.output_flag.clone().context("network mode requires -o <output.png>")?;
        let width = cli.width_flag.unwrap_or(DEFAULT_WIDTH);
        let height = cli.height_flag.unwrap_or(DEFAULT_HEIGHT);
        (None, output, width, height)
    } else {
        let output = cli.output_positional.clone().context("file mode requires <output.png>")?;
        let width = cli.width_positional.unwrap_or(DEFAULT_WIDTH);
        let height = cli.height_positional.unwrap_or(DEFAULT_HEIGHT);
        (Some(PathBuf::from(&cli.input)), output, width, height)
    };

    let source = if let Some(path) = &source_path {
        Source::File(path.as_path())
    } else {
        Source::Url(&cli.input)
    };

    eprintln!("{} loading {}", "stage:".blue().bold(), display_source(&source, &cli.input));
    let png = render(&source, width as f32, height as f32).with_context(|| format!("failed to render {}", display_source(&source, &cli.input)))?;

    eprintln!("{} writing {}", "stage:".blue().bold(), output.display());
    std::fs::write(&output, png).with_context(|| format!("failed to write {}", output.display()))?;

    Ok(output)
}

fn display_source(source: &Source<'_>, input: &str) -> String {
    match source {
        Source::File(path) => path.display().to_string(),
        Source::Url(_) => input.to_string(),
    }
}
