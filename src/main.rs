use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info};

use shapez::app::App;
use shapez::canvas::Surface;
use shapez::config::Config;
use shapez::painter::ShapeSelection;
use shapez::window::Viewer;
use shapez::{Result, source};

#[derive(Parser)]
struct Args {
    target: PathBuf,

    /// Resize the source to this height before painting
    #[clap(long)]
    height: Option<u32>,

    /// Output resolution relative to the source
    #[clap(short, long, default_value = "1.0")]
    scale: f32,

    /// 1 (slow) to 100 (fast)
    #[clap(long, default_value = "100")]
    speed: u32,

    /// Include triangles in the shape mix
    #[clap(long)]
    triangles: bool,

    #[clap(long, default_value = "30")]
    fill_threshold: u32,

    #[clap(long, default_value = "10")]
    brush_threshold: u32,

    /// Run a single fill without a window and save the result
    #[clap(long)]
    headless: bool,

    #[clap(short, long)]
    output: Option<PathBuf>,

    #[clap(long)]
    seed: Option<u64>,

    #[clap(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = Config::default()
            .with_scale(self.scale)
            .with_speed(self.speed)
            .with_thresholds(self.fill_threshold, self.brush_threshold);
        if self.triangles {
            config = config.with_shapes(ShapeSelection::with_triangles());
        }

        config.validate()?;
        Ok(config)
    }

    fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        let stem = self
            .target
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_owned());
        Path::new("generated_images").join(format!("{stem}_shapes.png"))
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.config()?;
    let source = source::load(&args.target, args.height)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut app = App::new(source, config, rng);

    if args.headless {
        let painted = app.fill_to_end();
        info!(painted, "headless fill done");
        return app.save(&args.output_path());
    }

    let mut viewer = Viewer::new(
        "shapez - space: fill, d: detail, g: regenerate, s: stop",
        app.canvas().width(),
        app.canvas().height(),
    )?;
    app.start_fill();

    while viewer.is_open() {
        let now = Instant::now();

        if let Some(command) = viewer.command() {
            app.handle(command);
        }
        if let Some(position) = viewer.pointer() {
            app.pointer_moved(position, now);
        }

        app.fire_pending(now);
        app.advance(now);
        viewer.present(app.canvas())?;
    }

    app.save(&args.output_path())
}
