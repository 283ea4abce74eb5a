//! Drives the fill loop and the pointer brush over one output canvas, a step
//! at a time, between frames.
use std::path::Path;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use tracing::info;

use crate::brush::{Burst, Debouncer};
use crate::buffer::PixelBuffer;
use crate::canvas::Canvas;
use crate::color::Background;
use crate::config::Config;
use crate::error::Result;
use crate::fill::{FillRun, FillScheduler, FillState, Step};
use crate::window::Command;

/// Work done per frame before the window gets a chance to redraw.
const FRAME_BUDGET: Duration = Duration::from_millis(12);

/// Everything the fill loop and the brush share.
pub struct App {
    config: Config,
    source: PixelBuffer,
    background: Background,
    canvas: Canvas,
    state: FillState,
    scheduler: FillScheduler,
    run: Option<FillRun>,
    debouncer: Debouncer,
    burst: Option<Burst>,
    resume_at: Instant,
    rng: StdRng,
}

impl App {
    pub fn new(source: PixelBuffer, config: Config, rng: StdRng) -> Self {
        let background = Background::from_source(&source);
        let width = ((source.width() as f32 * config.scale).round() as u32).max(1);
        let height = ((source.height() as f32 * config.scale).round() as u32).max(1);
        info!(?background, width, height, "output surface");

        Self {
            canvas: Canvas::new(width, height, background.color()),
            state: FillState::for_source(&source, &config),
            scheduler: FillScheduler::new(&config),
            debouncer: Debouncer::new(&config),
            run: None,
            burst: None,
            resume_at: Instant::now(),
            background,
            source,
            config,
            rng,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn start_fill(&mut self) {
        if let Some(run) = self.scheduler.start(&mut self.state, &self.source) {
            self.debouncer.cancel();
            self.run = Some(run);
        }
    }

    /// Starts a fill if none is active and drains it. Returns the shapes painted.
    pub fn fill_to_end(&mut self) -> usize {
        self.start_fill();
        match self.run.take() {
            Some(mut run) => run.run_to_end(&mut self.state, &mut self.canvas, &mut self.rng),
            None => 0,
        }
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Fill => self.start_fill(),
            Command::AddDetail => {
                if self
                    .state
                    .add_detail(self.config.detail_factor, self.config.min_detail_size)
                {
                    info!(shape_size = self.state.shape_size(), "adding detail");
                    self.start_fill();
                }
            }
            Command::Regenerate => {
                FillScheduler::stop(&mut self.state);
                self.run = None;
                self.burst = None;
                self.canvas.clear(self.background.color());
                self.start_fill();
            }
            Command::Stop => FillScheduler::stop(&mut self.state),
        }
    }

    pub fn pointer_moved(&mut self, position: [f32; 2], now: Instant) {
        self.debouncer.pointer_moved(position, now, &self.state);
    }

    /// Turns a due pointer action into a burst once the previous one is done.
    pub fn fire_pending(&mut self, now: Instant) {
        if self.burst.is_some() {
            return;
        }
        if let Some(pointer) = self.debouncer.poll(now) {
            self.burst = Some(Burst::new(pointer, &self.source, &self.config));
        }
    }

    /// Runs steps until a suspension point or the frame budget is used up.
    pub fn advance(&mut self, now: Instant) {
        if now < self.resume_at {
            return;
        }

        while now.elapsed() < FRAME_BUDGET {
            if let Some(run) = &mut self.run {
                match run.run_until_yield(&mut self.state, &mut self.canvas, &mut self.rng) {
                    Step::Painted(_) => {
                        let pause = self.config.paint_pause();
                        if !pause.is_zero() {
                            self.resume_at = Instant::now() + pause;
                            return;
                        }
                    }
                    _ => self.run = None,
                }
            } else if let Some(burst) = &mut self.burst {
                let background = self.background;
                match burst.step(&mut self.state, &mut self.canvas, background, &mut self.rng) {
                    Step::Painted(_) => {
                        self.resume_at = Instant::now() + self.config.burst_pause;
                        return;
                    }
                    Step::Skipped => {}
                    Step::Finished => self.burst = None,
                }
            } else {
                return;
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.canvas.to_image().save(path)?;
        info!(path = %path.display(), "saved painting");
        Ok(())
    }
}
