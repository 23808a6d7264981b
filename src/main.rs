use clap::Parser;
use glowfield::app::{AppContext, SurfaceSize};
use glowfield::config::ViewerConfig;
use glowfield::window::{save_screenshot, Window};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "glowfield")]
#[command(about = "A field of randomly colored spheres, some of them glowing", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of spheres (overrides the configuration)
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Random seed, for reproducible fields
    #[arg(short, long)]
    seed: Option<u64>,

    /// Render one frame headless to this PNG instead of opening a window
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Quit after this many presented frames
    #[arg(long)]
    frames: Option<u64>,

    /// Write the effective configuration to this file, then continue
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> glowfield::Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load_from_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(count) = cli.count {
        config.scene.count = count;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let config = config.clamped();
    if let Some(path) = &cli.write_config {
        config.save_to_file(path)?;
        log::info!("wrote configuration to {}", path.display());
    }
    Ok(config)
}

fn run(cli: Cli) -> glowfield::Result<()> {
    let config = load_config(&cli)?;

    if let Some(path) = &cli.screenshot {
        let surface = SurfaceSize::new(config.window.width, config.window.height);
        let mut app = AppContext::new(Some(surface), config)?;
        let frame = app.frame(0.0);
        return save_screenshot(frame, path);
    }

    let mut window = pollster::block_on(Window::open(&config.window))?;
    let (width, height) = window.canvas().logical_size();
    let surface = SurfaceSize::new(width, height).with_pixel_ratio(window.canvas().scale_factor());
    let mut app = AppContext::new(Some(surface), config)?;
    window.run(&mut app, cli.frames)
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
