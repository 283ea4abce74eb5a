//! Progressive fill: random square regions of the source are compared with
//! the output, and a shape is painted wherever the two differ enough.
//!
//! A run is a step generator. Each [`FillRun::step`] makes at most one
//! attempt, and a painted shape is the point where the caller may present a
//! frame or handle input before asking for more.
use rand::Rng;
use tracing::{debug, info};

use crate::buffer::{PixelBuffer, Region};
use crate::canvas::Surface;
use crate::color::should_paint;
use crate::config::Config;
use crate::painter::{Shape, ShapePainter};

/// State shared by the fill loop and the brush, owned by whoever drives them.
#[derive(Clone, Debug, PartialEq)]
pub struct FillState {
    shape_size: f32,
    generating: bool,
}

impl FillState {
    pub fn new(shape_size: f32) -> Self {
        Self {
            shape_size: shape_size.max(1.0),
            generating: false,
        }
    }

    /// Starting size for a freshly loaded source.
    pub fn for_source(source: &PixelBuffer, config: &Config) -> Self {
        let longest = source.width().max(source.height()) as f32;
        Self::new(longest * config.initial_size_ratio)
    }

    pub fn shape_size(&self) -> f32 {
        self.shape_size
    }

    pub fn set_shape_size(&mut self, size: f32) {
        self.shape_size = size.max(1.0);
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Shrinks shapes for a finer pass. Refused while a run is active.
    pub fn add_detail(&mut self, factor: f32, min: f32) -> bool {
        if self.generating {
            return false;
        }

        self.set_shape_size((self.shape_size * factor).max(min));
        true
    }
}

/// Attempts needed to cover `fill_factor` of a `width` × `height` grid of
/// `shape_size` squares.
pub fn calculate_attempts(shape_size: f32, width: u32, height: u32, fill_factor: f32) -> usize {
    let across = (width as f32 / shape_size).ceil();
    let down = (height as f32 / shape_size).ceil();

    (across * down * fill_factor).ceil() as usize
}

/// Origin along one axis so that a shape of `size` fits in `extent`, or 0
/// when it cannot fit.
fn random_origin(extent: u32, size: f32, rng: &mut impl Rng) -> u32 {
    let span = (extent as f32 - size).max(0.0);
    (rng.random::<f32>() * span).floor() as u32
}

/// Outcome of one step of a fill run or brush burst.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// A shape was painted; the caller may yield here.
    Painted(Shape),
    /// The attempt was rejected by the color gate or fell off the surface.
    Skipped,
    Finished,
}

#[derive(Clone, Debug)]
pub struct FillScheduler {
    painter: ShapePainter,
    threshold: u32,
    fill_factor: f32,
}

impl FillScheduler {
    pub fn new(config: &Config) -> Self {
        Self {
            painter: ShapePainter::new(config.shapes.clone()),
            threshold: config.fill_threshold,
            fill_factor: config.fill_factor,
        }
    }

    /// Begins a run against a snapshot of `source`. Returns `None` when a run
    /// is already active.
    pub fn start(&self, state: &mut FillState, source: &PixelBuffer) -> Option<FillRun> {
        if state.generating {
            debug!("fill already running, ignoring start");
            return None;
        }

        state.generating = true;
        let attempts = calculate_attempts(
            state.shape_size,
            source.width(),
            source.height(),
            self.fill_factor,
        );
        info!(attempts, shape_size = state.shape_size, "starting fill");

        Some(FillRun {
            source: source.clone(),
            painter: self.painter.clone(),
            threshold: self.threshold,
            attempts,
            attempts_made: 0,
            painted: 0,
            finished: false,
        })
    }

    /// Asks the active run to halt. It notices on its next step.
    pub fn stop(state: &mut FillState) {
        state.generating = false;
    }
}

#[derive(Debug)]
pub struct FillRun {
    source: PixelBuffer,
    painter: ShapePainter,
    threshold: u32,
    attempts: usize,
    attempts_made: usize,
    painted: usize,
    finished: bool,
}

impl FillRun {
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn attempts_made(&self) -> usize {
        self.attempts_made
    }

    pub fn painted(&self) -> usize {
        self.painted
    }

    pub fn step(
        &mut self,
        state: &mut FillState,
        surface: &mut impl Surface,
        rng: &mut impl Rng,
    ) -> Step {
        if self.finished {
            return Step::Finished;
        }
        if !state.generating || self.attempts_made >= self.attempts {
            self.finished = true;
            state.generating = false;
            info!(
                painted = self.painted,
                attempts = self.attempts_made,
                "fill finished"
            );
            return Step::Finished;
        }

        self.attempts_made += 1;

        let size = state.shape_size;
        let side = size.ceil() as u32;
        let x = random_origin(self.source.width(), size, rng);
        let y = random_origin(self.source.height(), size, rng);

        let target = self.source.average_color(Region::new(x, y, side));
        let scale = surface.width() as f32 / self.source.width().max(1) as f32;
        let current = surface.average_color(Region::new(
            (x as f32 * scale).floor() as u32,
            (y as f32 * scale).floor() as u32,
            (size * scale).ceil() as u32,
        ));

        if !should_paint(target, current, self.threshold) {
            return Step::Skipped;
        }

        self.painted += 1;
        let position = [x as f32, y as f32];
        let shape = self
            .painter
            .paint(surface, self.source.width(), position, size, target, rng);

        Step::Painted(shape)
    }

    /// Steps until a shape is painted or the run ends.
    pub fn run_until_yield(
        &mut self,
        state: &mut FillState,
        surface: &mut impl Surface,
        rng: &mut impl Rng,
    ) -> Step {
        loop {
            match self.step(state, surface, rng) {
                Step::Skipped => continue,
                step => return step,
            }
        }
    }

    /// Drains the run and returns how many shapes it painted.
    pub fn run_to_end(
        &mut self,
        state: &mut FillState,
        surface: &mut impl Surface,
        rng: &mut impl Rng,
    ) -> usize {
        while self.run_until_yield(state, surface, rng) != Step::Finished {}
        self.painted
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::canvas::Canvas;
    use crate::color::{Background, color_difference};

    fn setup(color: [u8; 3], width: u32, height: u32) -> (PixelBuffer, Canvas, FillState) {
        let source = PixelBuffer::filled(width, height, color);
        let background = Background::from_source(&source);
        let canvas = Canvas::new(width, height, background.color());
        let state = FillState::for_source(&source, &Config::default());
        (source, canvas, state)
    }

    #[test]
    fn attempts_follow_grid_coverage() {
        assert_eq!(calculate_attempts(50.0, 500, 300, 0.95), 57);
        assert_eq!(calculate_attempts(40.0, 100, 100, 1.0), 9);
        assert_eq!(calculate_attempts(1000.0, 10, 10, 0.95), 1);
    }

    #[test]
    fn initial_size_is_forty_percent_of_longest_side() {
        let (_, _, state) = setup([0, 0, 0], 200, 100);
        assert_eq!(state.shape_size(), 80.0);
    }

    #[test]
    fn shape_size_never_drops_below_one() {
        let mut state = FillState::new(0.0);
        assert_eq!(state.shape_size(), 1.0);
        state.set_shape_size(-4.0);
        assert_eq!(state.shape_size(), 1.0);
    }

    #[test]
    fn add_detail_shrinks_down_to_the_minimum() {
        let mut state = FillState::new(10.0);
        assert!(state.add_detail(0.7, 5.0));
        assert_eq!(state.shape_size(), 7.0);
        assert!(state.add_detail(0.7, 5.0));
        assert_eq!(state.shape_size(), 5.0);
        assert!(state.add_detail(0.7, 5.0));
        assert_eq!(state.shape_size(), 5.0);
    }

    #[test]
    fn add_detail_is_refused_while_generating() {
        let (source, _, mut state) = setup([0, 0, 0], 20, 20);
        let _run = FillScheduler::new(&Config::default()).start(&mut state, &source);
        let size = state.shape_size();

        assert!(!state.add_detail(0.7, 5.0));
        assert_eq!(state.shape_size(), size);
    }

    #[test]
    fn red_source_paints_on_first_attempt() {
        let (source, mut canvas, mut state) = setup([255, 0, 0], 100, 100);
        let mut rng = StdRng::seed_from_u64(1);
        let mut run = FillScheduler::new(&Config::default())
            .start(&mut state, &source)
            .unwrap();

        assert!(matches!(run.step(&mut state, &mut canvas, &mut rng), Step::Painted(_)));
        assert_eq!(run.painted(), 1);
    }

    #[test]
    fn second_start_is_a_no_op() {
        let (source, _, mut state) = setup([255, 0, 0], 100, 100);
        let scheduler = FillScheduler::new(&Config::default());

        let run = scheduler.start(&mut state, &source);
        assert!(run.is_some());
        assert!(scheduler.start(&mut state, &source).is_none());
        assert!(state.is_generating());
    }

    #[test]
    fn run_never_exceeds_attempts_and_ends_idle() {
        let (source, mut canvas, mut state) = setup([200, 30, 90], 120, 80);
        state.set_shape_size(10.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut run = FillScheduler::new(&Config::default())
            .start(&mut state, &source)
            .unwrap();
        let attempts = run.attempts();

        let mut steps = 0;
        while run.step(&mut state, &mut canvas, &mut rng) != Step::Finished {
            steps += 1;
        }

        assert_eq!(steps, attempts);
        assert_eq!(run.attempts_made(), attempts);
        assert!(run.painted() <= attempts);
        assert!(!state.is_generating());
        assert_eq!(run.step(&mut state, &mut canvas, &mut rng), Step::Finished);
    }

    #[test]
    fn stop_halts_the_run_between_steps() {
        let (source, mut canvas, mut state) = setup([255, 0, 0], 100, 100);
        state.set_shape_size(5.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut run = FillScheduler::new(&Config::default())
            .start(&mut state, &source)
            .unwrap();

        run.run_until_yield(&mut state, &mut canvas, &mut rng);
        let made = run.attempts_made();
        FillScheduler::stop(&mut state);

        assert_eq!(run.step(&mut state, &mut canvas, &mut rng), Step::Finished);
        assert_eq!(run.attempts_made(), made);
        assert!(run.attempts_made() < run.attempts());
        assert!(!state.is_generating());
    }

    #[test]
    fn a_finished_run_does_not_revive_with_the_next_one() {
        let (source, mut canvas, mut state) = setup([255, 0, 0], 50, 50);
        let mut rng = StdRng::seed_from_u64(4);
        let scheduler = FillScheduler::new(&Config::default());

        let mut first = scheduler.start(&mut state, &source).unwrap();
        FillScheduler::stop(&mut state);
        assert_eq!(first.step(&mut state, &mut canvas, &mut rng), Step::Finished);

        let _second = scheduler.start(&mut state, &source).unwrap();
        assert_eq!(first.step(&mut state, &mut canvas, &mut rng), Step::Finished);
        assert!(state.is_generating());
    }

    #[test]
    fn fill_converges_toward_a_flat_source() {
        let (source, mut canvas, mut state) = setup([10, 200, 10], 60, 60);
        state.set_shape_size(6.0);
        let mut rng = StdRng::seed_from_u64(21);
        let scheduler = FillScheduler::new(&Config::default().with_fill_factor(4.0));

        let mut run = scheduler.start(&mut state, &source).unwrap();
        let painted = run.run_to_end(&mut state, &mut canvas, &mut rng);

        assert!(painted > 0);
        let full = Region::new(0, 0, 60);
        let target = source.average_color(full);
        let before = color_difference(target, [23, 23, 23]);
        let after = color_difference(target, canvas.average_color(full));
        assert!(after < before, "{after} >= {before}");
    }

    #[test]
    fn oversized_shapes_still_sample_inside_bounds() {
        let (source, mut canvas, mut state) = setup([255, 255, 255], 30, 10);
        state.set_shape_size(25.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut run = FillScheduler::new(&Config::default())
            .start(&mut state, &source)
            .unwrap();

        assert!(run.run_to_end(&mut state, &mut canvas, &mut rng) > 0);
        assert!(!state.is_generating());
    }

    #[test]
    fn scaled_output_is_sampled_in_output_space() {
        let source = PixelBuffer::filled(40, 40, [255, 0, 0]);
        let mut canvas = Canvas::new(80, 80, [23, 23, 23]);
        let mut state = FillState::new(40.0);
        let mut rng = StdRng::seed_from_u64(6);
        let mut run = FillScheduler::new(&Config::default())
            .start(&mut state, &source)
            .unwrap();

        assert!(matches!(
            run.run_until_yield(&mut state, &mut canvas, &mut rng),
            Step::Painted(_)
        ));
        // any shape for a 40px source square covers this pixel at 2x
        assert_eq!(canvas.color_at([30, 30]), [255, 0, 0]);
    }
}
