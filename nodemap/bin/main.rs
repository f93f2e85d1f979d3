use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;
use nodemap::{util::parse_img, Config, NodeMap, SolutionImage, Solver};

/// Solves a two color maze image and paints the path onto a copy of it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze image, walls dark and paths light
    input: PathBuf,

    /// Where to write the solved image, defaults to `<input>-solved.<ext>`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with solver settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the node map as a character grid
    #[arg(long)]
    visualize: bool,

    /// Print node statistics
    #[arg(long)]
    stats: bool,

    /// Only build the node map
    #[arg(long)]
    no_solve: bool,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "maze".to_owned());
    let ext = input
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_owned());
    input.with_file_name(format!("{}-solved.{}", stem, ext))
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let img = image::open(&args.input)
        .with_context(|| format!("opening maze {}", args.input.display()))?;
    let grid = parse_img(&img, config.wall_threshold)?;

    let mut map = NodeMap::from_grid(&grid, config.connect_from)?;
    info!(
        "loaded {} ({}x{}), {} nodes",
        args.input.display(),
        map.width,
        map.height,
        map.nodes().len()
    );

    if args.visualize {
        println!("{}", map.visualize());
    }
    if args.stats {
        println!("{}", map.stats());
    }
    if args.no_solve {
        return Ok(());
    }

    let solution = Solver::new(&map).finish(&mut map)?;
    info!(
        "solved: {} nodes on the path, length {}, {} backtracks",
        solution.path().len(),
        solution.length(&map),
        solution.backtracks
    );

    let output = args.output.unwrap_or_else(|| default_output(&args.input));
    SolutionImage::new(&img, &map, &solution, config.gradient)
        .to_image()
        .save(&output)
        .with_context(|| format!("writing solution {}", output.display()))?;
    info!("wrote {}", output.display());

    Ok(())
}
