use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ditherdeck::models::{PaletteSource, ProjectDocument};
use ditherdeck::rendering::{read_png, write_png};
use ditherdeck::services::FramePipeline;
use tone_dither::{extract, DitherAlgorithm, DitherFamily, ExtractAlgorithm, PRESET_NAMES};

#[derive(Parser)]
#[command(name = "ditherdeck")]
#[command(about = "Adjust, reduce and dither images and frame sequences")]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one PNG through a project's settings
    Render {
        /// Input PNG file
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Project file (.yaml, .yml or .json); defaults apply without one
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Resolve keyframed settings at this frame
        #[arg(short, long)]
        frame: Option<u32>,

        /// Override the dithering algorithm (e.g. "atkinson", "bayer-8x8")
        #[arg(short, long)]
        algorithm: Option<DitherAlgorithm>,

        /// Override the palette with a built-in preset
        #[arg(long)]
        palette: Option<String>,
    },
    /// Render a directory of PNG frames, in file-name order
    Frames {
        /// Directory of input PNG frames
        input: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Project file (.yaml, .yml or .json)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Frames per second of the sequence
        #[arg(long, default_value_t = 24.0)]
        fps: f32,
    },
    /// Extract a palette from a PNG
    Palette {
        /// Input PNG file
        input: PathBuf,

        /// Number of colors (1-256)
        #[arg(short, long, default_value_t = 8)]
        count: usize,

        /// Extraction algorithm: median-cut, octree or k-means
        #[arg(short, long, default_value = "median-cut")]
        algorithm: ExtractAlgorithm,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = PaletteFormat::Hex)]
        format: PaletteFormat,
    },
    /// List dithering algorithms and palette presets
    Algorithms,
    /// Write a starter project file
    Init {
        /// Project file to create
        #[arg(default_value = "project.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaletteFormat {
    Hex,
    Json,
    Yaml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            project,
            frame,
            algorithm,
            palette,
        } => run_render_command(&input, &output, project.as_deref(), frame, algorithm, palette),
        Commands::Frames {
            input,
            output,
            project,
            fps,
        } => run_frames_command(&input, &output, project.as_deref(), fps),
        Commands::Palette {
            input,
            count,
            algorithm,
            format,
        } => run_palette_command(&input, count, algorithm, format),
        Commands::Algorithms => {
            run_algorithms_command();
            Ok(())
        }
        Commands::Init { path, force } => run_init_command(&path, force),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "ditherdeck=debug,tone_dither=debug"
    } else {
        "ditherdeck=info,tone_dither=warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

fn load_project(path: Option<&Path>) -> anyhow::Result<ProjectDocument> {
    match path {
        Some(path) => {
            ProjectDocument::load(path).with_context(|| format!("Failed to load project {}", path.display()))
        }
        None => Ok(ProjectDocument::default()),
    }
}

fn run_render_command(
    input: &Path,
    output: &Path,
    project: Option<&Path>,
    frame: Option<u32>,
    algorithm: Option<DitherAlgorithm>,
    palette: Option<String>,
) -> anyhow::Result<()> {
    let mut project = load_project(project)?;
    if let Some(algorithm) = algorithm {
        project.dithering.algorithm = algorithm;
        // An explicit algorithm wins over any keyframed one
        project.animated_dithering = None;
    }
    if let Some(name) = palette {
        project.palette = PaletteSource::Preset(name);
    }

    let pipeline = FramePipeline::new(project)?;
    let source = read_png(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let out = pipeline.render_frame(&source, frame)?;
    let size = write_png(output, &out)?;

    tracing::info!(path = %output.display(), bytes = size, "Wrote image");
    println!("Rendered {} ({} bytes)", output.display(), size);
    Ok(())
}

fn run_frames_command(input: &Path, output: &Path, project: Option<&Path>, fps: f32) -> anyhow::Result<()> {
    let pipeline = FramePipeline::new(load_project(project)?)?;

    let mut paths: Vec<PathBuf> = std::fs::read_dir(input)
        .with_context(|| format!("Failed to list {}", input.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png")))
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(ditherdeck::error::RenderError::NoFrames(input.to_path_buf()).into());
    }

    std::fs::create_dir_all(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let frames = paths.iter().map(|p| read_png(p));
    let info = pipeline.process_sequence(frames, fps, |index, frame| {
        let path = output.join(format!("frame_{index:05}.png"));
        write_png(&path, &frame)?;
        tracing::debug!(frame = index, path = %path.display(), "Wrote frame");
        Ok(())
    })?;

    println!(
        "Rendered {} frames ({:.2}s at {} fps) into {}",
        info.total_frames,
        info.duration,
        info.fps,
        output.display()
    );
    Ok(())
}

fn run_palette_command(
    input: &Path,
    count: usize,
    algorithm: ExtractAlgorithm,
    format: PaletteFormat,
) -> anyhow::Result<()> {
    let source = read_png(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let palette = extract(&source, count, algorithm)?;

    match format {
        PaletteFormat::Hex => {
            for color in palette.colors() {
                println!("{}", color.to_hex());
            }
        }
        PaletteFormat::Json => println!("{}", serde_json::to_string_pretty(&palette)?),
        PaletteFormat::Yaml => print!("{}", serde_yaml::to_string(&palette)?),
    }
    Ok(())
}

fn run_algorithms_command() {
    for family in DitherFamily::ALL {
        println!("{family}:");
        for algorithm in DitherAlgorithm::ALL.into_iter().filter(|a| a.family() == family) {
            let note = if algorithm.is_deterministic() { "" } else { " (random)" };
            println!("  {algorithm}{note}");
        }
    }
    println!("\nPalette presets:");
    for name in PRESET_NAMES {
        println!("  {name}");
    }
}

fn run_init_command(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ProjectDocument::starter().save(path)?;
    println!("Wrote starter project to {}", path.display());
    Ok(())
}
