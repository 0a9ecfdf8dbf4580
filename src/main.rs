//! brandkit CLI - brand guideline PDFs from a JSON brand kit

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use brandkit_pdf::brand::{build_document, stub_palette, BrandKit};
use brandkit_pdf::pagesize::{self, PageOrientation};
use brandkit_pdf::{compose_to_path, Artifact, LayoutConfig, Mm, StandardMetrics};

#[derive(Parser)]
#[command(name = "brandkit")]
#[command(version)]
#[command(about = "Generate brand guideline PDFs", long_about = None)]
struct Cli {
    /// Log layout decisions (page breaks, section starts)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a brand guidelines PDF
    Generate {
        /// Brand kit JSON file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output PDF (brand-kit-<timestamp>.pdf if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Layout configuration JSON file
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Page size (a3, a4, a5, letter, legal); overrides the layout file
        #[arg(long)]
        page_size: Option<String>,

        /// Lay pages out in landscape orientation
        #[arg(long)]
        landscape: bool,

        /// Page margin in millimetres; overrides the layout file
        #[arg(long, value_name = "MM")]
        margin_mm: Option<f32>,
    },

    /// Print the palette reported for uploaded images
    Palette,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            layout,
            page_size,
            landscape,
            margin_mm,
        } => cmd_generate(
            &input,
            output,
            layout.as_deref(),
            PageOptions {
                size: page_size.as_deref(),
                landscape,
                margin: margin_mm.map(Mm),
            },
        ),
        Commands::Palette => {
            cmd_palette();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Page geometry overrides from the command line
struct PageOptions<'a> {
    size: Option<&'a str>,
    landscape: bool,
    margin: Option<Mm>,
}

fn cmd_generate(
    input: &Path,
    output: Option<PathBuf>,
    layout: Option<&Path>,
    page: PageOptions<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kit = BrandKit::from_json(&fs::read_to_string(input)?)?;
    let document = build_document(&kit)?;

    let mut config = match layout {
        Some(path) => LayoutConfig::from_json(&fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };
    if let Some(name) = page.size {
        let size = pagesize::by_name(name).ok_or_else(|| format!("unknown page size {name:?}"))?;
        config = config.with_page_size(size);
    }
    if page.landscape {
        let size = config.page_size.landscape();
        config = config.with_page_size(size);
    }
    if let Some(margin) = page.margin {
        config = config.with_margin(margin.into());
    }

    let output = output.unwrap_or_else(|| PathBuf::from(Artifact::filename_for(document.created)));
    let report = compose_to_path(&document, &config, &StandardMetrics, &output)?;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "{}: {} pages, {} bytes",
        output.display(),
        report.page_count,
        report.bytes_written
    );
    Ok(())
}

fn cmd_palette() {
    for (name, colour) in stub_palette(&[]) {
        println!("{name:<10} {}", colour.to_hex());
    }
}
