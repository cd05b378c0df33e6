use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use valueator::assets::AssetLoader;
use valueator::config::{ColorSpec, StudyConfig};
use valueator::export;
use valueator::ingest::{self, format_file_size};
use valueator::render::{self, Backend};
use valueator::store::ImageStore;
use value_study::{Hsv, PosterizedImage, ShadingParameters, SourceImage};

#[derive(Parser)]
#[command(name = "valueator")]
#[command(about = "Valueator - posterized value studies from photos")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Study overrides shared by several commands
#[derive(Args, Clone, Default)]
struct StudyArgs {
    /// Number of value levels (2-11)
    #[arg(short, long)]
    levels: Option<usize>,

    /// Comma-separated band proportions, darkest first (e.g. "1,2,1")
    #[arg(short, long, value_delimiter = ',')]
    proportions: Option<Vec<f64>>,

    /// Level color as LEVEL=COLOR, where COLOR is "h,s,v" or "#rrggbb"
    #[arg(long = "color", value_name = "LEVEL=COLOR", value_parser = parse_level_color)]
    colors: Vec<(usize, Hsv)>,
}

/// Options for commands that write a rendered PNG
#[derive(Args, Clone)]
struct RenderArgs {
    /// Output PNG file path (defaults to valueator-image-<millis>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    study: StudyArgs,

    /// Show the original photo instead of posterizing
    #[arg(long)]
    passthrough: bool,

    /// Render on the GPU when available
    #[arg(long)]
    gpu: bool,

    /// Re-compress the PNG with oxipng
    #[arg(long)]
    optimize: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a value study of an image to a PNG file
    Render {
        /// Input image (PNG, JPEG, GIF, WebP, BMP)
        input: PathBuf,

        #[command(flatten)]
        args: RenderArgs,
    },
    /// Print thresholds and level colors for a study
    Levels {
        #[command(flatten)]
        study: StudyArgs,
    },
    /// Manage recently used images
    Recent {
        #[command(subcommand)]
        command: RecentCommand,
    },
    /// Extract the embedded study.yaml for customization
    Init {
        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[derive(Subcommand)]
enum RecentCommand {
    /// List stored images, newest first
    List,
    /// Store images (compressing large ones)
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove stored images by id
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove every stored image
    Clear,
    /// Render a stored image
    Render {
        id: String,

        #[command(flatten)]
        args: RenderArgs,
    },
}

fn parse_level_color(s: &str) -> Result<(usize, Hsv), String> {
    let (level, color) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LEVEL=COLOR, got '{s}'"))?;
    let level: usize = level
        .trim()
        .parse()
        .map_err(|e| format!("invalid level '{level}': {e}"))?;
    let color: Hsv = color.parse().map_err(|e| format!("{e}"))?;
    Ok((level, color))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valueator=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Render { input, args }) => run_render_command(&input, &args),
        Some(Commands::Levels { study }) => run_levels_command(&study),
        Some(Commands::Recent { command }) => run_recent_command(command),
        Some(Commands::Init { force, list }) => run_init_command(force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn load_config() -> StudyConfig {
    StudyConfig::load_from_assets(&AssetLoader::from_env())
}

/// Apply CLI overrides on top of the configured study
fn study_parameters(
    config: &mut StudyConfig,
    study: &StudyArgs,
    passthrough: bool,
) -> anyhow::Result<ShadingParameters> {
    // Proportions alone imply the level count
    let levels = study
        .levels
        .or_else(|| study.proportions.as_ref().map(Vec::len));
    if let Some(levels) = levels {
        config.set_levels(levels);
    }
    if let Some(ref proportions) = study.proportions {
        config.proportions = Some(proportions.clone());
    }
    for &(level, color) in &study.colors {
        config.colors.insert(
            level,
            ColorSpec::Hsv {
                h: color.h,
                s: color.s,
                v: color.v,
            },
        );
    }
    if passthrough {
        config.grayscale = false;
    }
    Ok(config.to_parameters()?)
}

fn render_to_file(source: &SourceImage, args: &RenderArgs) -> anyhow::Result<()> {
    let mut config = load_config();
    let params = study_parameters(&mut config, &args.study, args.passthrough)?;

    let image = render::render(source, &params, Backend::from_flag(args.gpu))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export::default_file_name()));
    let optimize = args.optimize || config.export.optimize;
    let written = export::save_png(&image, &output, optimize)?;

    println!(
        "Rendered {}x{} -> {} ({})",
        image.width(),
        image.height(),
        output.display(),
        format_file_size(written as u64)
    );
    print_band_coverage(&image, params.level_count());
    Ok(())
}

fn print_band_coverage(image: &PosterizedImage, level_count: usize) {
    if image.bands().is_none() {
        return;
    }
    let histogram = image.band_histogram();
    let total = (image.width() as usize * image.height() as usize).max(1);
    for (band, count) in histogram.iter().take(level_count).enumerate() {
        println!(
            "  level {band:>2}: {:>5.1}%",
            *count as f64 / total as f64 * 100.0
        );
    }
}

/// Render an image file directly to a PNG file
fn run_render_command(input: &Path, args: &RenderArgs) -> anyhow::Result<()> {
    let source = ingest::load_source(input)?;
    render_to_file(&source, args)
}

fn run_levels_command(study: &StudyArgs) -> anyhow::Result<()> {
    let mut config = load_config();
    let params = study_parameters(&mut config, study, false)?;
    let thresholds = params.thresholds();

    println!("Levels: {}", params.level_count());
    let listed: Vec<String> = thresholds
        .as_slice()
        .iter()
        .map(|t| format!("{t:.4}"))
        .collect();
    println!("Thresholds: {}", listed.join(" "));
    println!();

    let bounds: Vec<f32> = std::iter::once(0.0)
        .chain(thresholds.as_slice().iter().copied())
        .chain(std::iter::once(1.0))
        .collect();
    for (level, weight) in params.proportions().as_slice().iter().enumerate() {
        let color = params.colors().get(level).unwrap_or(Hsv::WHITE);
        println!(
            "  {level:>2}  {:.3}-{:.3}  {:>5.1}%  {:<18} {}",
            bounds[level],
            bounds[level + 1],
            weight * 100.0,
            color.to_css(),
            color.to_hex()
        );
    }
    Ok(())
}

fn run_recent_command(command: RecentCommand) -> anyhow::Result<()> {
    let config = load_config();
    let store = ImageStore::open(&config.store)?;

    match command {
        RecentCommand::List => {
            let records = store.list();
            if records.is_empty() {
                println!("No recent images in {}", store.dir().display());
                return Ok(());
            }
            for record in &records {
                let compressed = if record.compressed {
                    format!(" (from {})", format_file_size(record.original_size))
                } else {
                    String::new()
                };
                println!(
                    "{}  {:<32} {:>10}{}  {}",
                    record.id,
                    record.name,
                    format_file_size(record.size),
                    compressed,
                    record.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
            let info = store.storage_info();
            println!(
                "\n{} images, {} of {} used ({:.1}%)",
                records.len(),
                format_file_size(info.used),
                format_file_size(info.quota),
                info.percentage
            );
        }
        RecentCommand::Add { files } => {
            for file in &files {
                let record = store.add_file(file)?;
                println!(
                    "  + {} {} ({}{})",
                    record.id,
                    record.name,
                    format_file_size(record.size),
                    if record.compressed { ", compressed" } else { "" }
                );
            }
        }
        RecentCommand::Remove { ids } => {
            let removed = store.delete(&ids)?;
            println!("Removed {removed} of {} images", ids.len());
        }
        RecentCommand::Clear => {
            store.clear()?;
            println!("Cleared {}", store.dir().display());
        }
        RecentCommand::Render { id, args } => {
            let source = store.load_source(&id)?;
            render_to_file(&source, &args)?;
        }
    }
    Ok(())
}

fn run_init_command(force: bool, list: bool) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        for f in AssetLoader::list_embedded() {
            println!("  {f}");
        }
        return Ok(());
    }

    let report = AssetLoader::from_env().init(force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }
    Ok(())
}

fn run_status_command() {
    let loader = AssetLoader::from_env();
    let config = StudyConfig::load_from_assets(&loader);

    println!("Valueator - posterized value studies from photos\n");
    match loader.config_file() {
        Some(path) if path.exists() => println!("Config:  {}", path.display()),
        Some(path) => println!("Config:  {} (missing, using embedded)", path.display()),
        None => println!("Config:  embedded"),
    }
    println!(
        "Study:   {} levels, {}",
        config.levels,
        if config.grayscale {
            "posterize"
        } else {
            "passthrough"
        }
    );

    let dir = config.store.data_dir();
    match ImageStore::open(&config.store) {
        Ok(store) => {
            let info = store.storage_info();
            println!(
                "Store:   {} ({} images, {})",
                dir.display(),
                store.list().len(),
                format_file_size(info.used)
            );
        }
        Err(e) => println!("Store:   {} (unavailable: {e})", dir.display()),
    }

    match render::gpu_description() {
        Some(gpu) => println!("GPU:     {gpu}"),
        None => println!(
            "GPU:     {}",
            if render::gpu_available() {
                "available"
            } else {
                "not available"
            }
        ),
    }

    println!("\nRun `valueator --help` for commands.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_color() {
        assert_eq!(
            parse_level_color("2=0.5,1,1").unwrap(),
            (2, Hsv::new(0.5, 1.0, 1.0))
        );
        assert_eq!(parse_level_color("0=#fff").unwrap(), (0, Hsv::WHITE));
        assert!(parse_level_color("0.5,1,1").is_err());
        assert!(parse_level_color("x=#fff").is_err());
        assert!(parse_level_color("1=#ff").is_err());
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "valueator",
            "render",
            "photo.jpg",
            "--levels",
            "4",
            "--proportions",
            "1,2,2,1",
            "--color",
            "3=#ffeecc",
            "--gpu",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Render { input, args }) => {
                assert_eq!(input, PathBuf::from("photo.jpg"));
                assert_eq!(args.study.levels, Some(4));
                assert_eq!(args.study.proportions, Some(vec![1.0, 2.0, 2.0, 1.0]));
                assert_eq!(args.study.colors.len(), 1);
                assert!(args.gpu);
                assert!(!args.passthrough);
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_study_overrides() {
        let mut config = StudyConfig::default();
        let study = StudyArgs {
            levels: Some(5),
            proportions: None,
            colors: vec![(4, Hsv::new(0.1, 0.2, 0.9))],
        };
        let params = study_parameters(&mut config, &study, true).unwrap();
        assert_eq!(params.level_count(), 5);
        assert!(!params.grayscale());
        assert_eq!(params.colors().get(4), Some(Hsv::new(0.1, 0.2, 0.9)));
    }

    #[test]
    fn test_proportions_imply_level_count() {
        let mut config = StudyConfig::default();
        let study = StudyArgs {
            proportions: Some(vec![1.0, 1.0, 2.0, 4.0]),
            ..Default::default()
        };
        let params = study_parameters(&mut config, &study, false).unwrap();
        assert_eq!(params.level_count(), 4);
        assert_eq!(params.thresholds().as_slice(), &[0.125, 0.25, 0.5]);
    }
}
