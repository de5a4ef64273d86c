use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image_palette_wasm::{
    ColorCluster, ColorCount, ExtractOptions, GridStyle, Rgb, extract_palette_bytes,
    palette_sheet_png, reference_rows, text_tone, unique_colors_bytes,
};
use log::LevelFilter;
use serde::Serialize;

/// Extract representative colors from images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input images (JPEG, PNG or AVIF)
    #[arg(required_unless_present = "reference")]
    inputs: Vec<PathBuf>,

    /// Number of representative colors
    #[arg(short = 'k', long, default_value_t = ColorCount::DEFAULT.get() as u16,
          value_parser = clap::value_parser!(u16).range(ColorCount::MIN as i64..=ColorCount::MAX as i64))]
    n_colors: u16,

    /// List every distinct color instead of clustering
    #[arg(short, long)]
    unique: bool,

    /// Downsample side length (images larger than this become side×side)
    #[arg(short, long, conflicts_with = "no_resize")]
    resize: Option<u32>,

    /// Cluster every pixel of the original image
    #[arg(long)]
    no_resize: bool,

    /// Seed of the first k-means run
    #[arg(long)]
    seed: Option<u64>,

    /// Number of k-means restarts
    #[arg(long)]
    runs: Option<usize>,

    /// JSON file with extraction options; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Write a PNG swatch sheet per input into this directory
    #[arg(short = 'd', long)]
    sheet_dir: Option<PathBuf>,

    /// Also print the reference color table
    #[arg(long)]
    reference: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Colors {
    Clusters(Vec<ColorCluster>),
    Unique(Vec<Rgb>),
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a Path,
    colors: Colors,
}

fn options_from(args: &Args) -> Result<ExtractOptions> {
    let mut options = match &args.config {
        Some(path) => ExtractOptions::from_json_file(path)?,
        None => ExtractOptions::default(),
    };
    if args.no_resize {
        options.resize = None;
    } else if let Some(side) = args.resize {
        options.resize = Some(side);
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    if let Some(runs) = args.runs {
        options.runs = runs;
    }
    options.validate()?;
    Ok(options)
}

/// A terminal swatch: the hex code on a 24-bit background in contrasting text.
fn ansi_swatch(c: Rgb) -> String {
    let fg = text_tone(c).color();
    format!(
        "\x1b[48;2;{};{};{}m\x1b[38;2;{};{};{}m  {}  \x1b[0m",
        c.r, c.g, c.b, fg.r, fg.g, fg.b, c
    )
}

fn print_clusters(clusters: &[ColorCluster]) {
    let style = GridStyle::default();
    for row in clusters.chunks(style.per_row) {
        let line: Vec<String> = row.iter().map(|c| ansi_swatch(c.color)).collect();
        println!("{}", line.join(" "));
    }
    for c in clusters {
        println!("{}  rgb({:>3}, {:>3}, {:>3})  {:5.1}%", c.color, c.color.r, c.color.g, c.color.b, c.share * 100.0);
    }
}

fn print_reference() {
    println!("Reference colors");
    for row in reference_rows(&GridStyle::reference()) {
        println!("{}  {:<13} {}", ansi_swatch(row.swatch.fill), row.name, row.hex);
    }
}

fn write_sheet(dir: &Path, input: &Path, clusters: &[ColorCluster]) -> Result<PathBuf> {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let out_path = dir.join(format!("{stem}_palette.png"));
    fs::create_dir_all(dir)?;
    fs::write(&out_path, palette_sheet_png(clusters)?)?;
    Ok(out_path)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = options_from(&args)?;
    let k = usize::from(args.n_colors);

    let mut reports = Vec::new();
    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;

        let colors = if args.unique {
            Colors::Unique(
                unique_colors_bytes(&bytes, &options)
                    .with_context(|| format!("counting colors of {}", input.display()))?,
            )
        } else {
            let clusters = extract_palette_bytes(&bytes, k, &options)
                .with_context(|| format!("extracting colors from {}", input.display()))?;
            if let Some(dir) = &args.sheet_dir {
                let out_path = write_sheet(dir, input, &clusters)?;
                eprintln!("Saved → {}", out_path.display());
            }
            Colors::Clusters(clusters)
        };

        if args.json {
            reports.push(Report { input, colors });
            continue;
        }

        println!("{}", input.display());
        match &colors {
            Colors::Clusters(clusters) => print_clusters(clusters),
            Colors::Unique(list) => {
                println!("{} distinct colors", list.len());
                for c in list {
                    println!("{c}");
                }
            }
        }
        println!();
    }

    if args.json {
        let reference = args.reference.then(|| reference_rows(&GridStyle::reference()));
        let out = serde_json::json!({ "results": reports, "reference": reference });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if args.reference {
        print_reference();
    }

    Ok(())
}
