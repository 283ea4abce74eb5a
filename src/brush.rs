//! Pointer-driven painting: debounced bursts of small shapes around the
//! pointer, sized by how empty the output still is there.
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::trace;

use crate::buffer::{PixelBuffer, Region};
use crate::canvas::Surface;
use crate::color::{Background, should_paint};
use crate::config::Config;
use crate::fill::{FillState, Step};
use crate::occupancy::adaptive_size;
use crate::painter::ShapePainter;

/// Last-write-wins debounce for pointer moves. A new move replaces whatever
/// action was still pending.
#[derive(Debug)]
pub struct Debouncer {
    last: [f32; 2],
    pending: Option<([f32; 2], Instant)>,
    min_move: f32,
    delay: Duration,
}

impl Debouncer {
    pub fn new(config: &Config) -> Self {
        Self {
            last: [0.0, 0.0],
            pending: None,
            min_move: config.min_pointer_move,
            delay: config.debounce,
        }
    }

    /// Records a move in output coordinates. Returns whether an action was
    /// (re)scheduled.
    pub fn pointer_moved(&mut self, position: [f32; 2], now: Instant, state: &FillState) -> bool {
        if state.is_generating() {
            return false;
        }

        let distance = (position[0] - self.last[0]).hypot(position[1] - self.last[1]);
        if distance < self.min_move {
            return false;
        }

        self.last = position;
        self.pending = Some((position, now + self.delay));
        true
    }

    /// Position of the pending action once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<[f32; 2]> {
        match self.pending {
            Some((position, due)) if now >= due => {
                self.pending = None;
                Some(position)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// A few dabs around one pointer position, one per [`Burst::step`].
#[derive(Debug)]
pub struct Burst {
    pointer: [f32; 2],
    source: PixelBuffer,
    painter: ShapePainter,
    remaining: usize,
    threshold: u32,
    radius: u32,
    jitter: f32,
}

impl Burst {
    pub fn new(pointer: [f32; 2], source: &PixelBuffer, config: &Config) -> Self {
        Self {
            pointer,
            source: source.clone(),
            painter: ShapePainter::new(config.shapes.clone()),
            remaining: config.burst_count,
            threshold: config.brush_threshold,
            radius: config.brush_radius,
            jitter: config.brush_jitter,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn step(
        &mut self,
        state: &mut FillState,
        surface: &mut impl Surface,
        background: Background,
        rng: &mut impl Rng,
    ) -> Step {
        if self.remaining == 0 || state.is_generating() {
            self.remaining = 0;
            return Step::Finished;
        }
        self.remaining -= 1;

        let jitter = self.jitter;
        let mut offset =
            |center: f32| (center + (rng.random::<f32>() - 0.5) * 2.0 * jitter).round() as i64;
        let point = [offset(self.pointer[0]), offset(self.pointer[1])];

        // bounds come from the surface as it is now, which may have been resized
        if point[0] < 0
            || point[1] < 0
            || point[0] >= surface.width() as i64
            || point[1] >= surface.height() as i64
        {
            trace!(?point, "dab outside surface");
            return Step::Skipped;
        }

        let scale = surface.width() as f32 / self.source.width().max(1) as f32;
        let size = adaptive_size(surface, background, point, self.radius) / scale;

        let saved = state.shape_size();
        state.set_shape_size(size);
        let step = self.dab(state, surface, [point[0] as u32, point[1] as u32], scale, rng);
        state.set_shape_size(saved);

        step
    }

    fn dab(
        &self,
        state: &FillState,
        surface: &mut impl Surface,
        point: [u32; 2],
        scale: f32,
        rng: &mut impl Rng,
    ) -> Step {
        let size = state.shape_size();
        let source_point = [point[0] as f32 / scale, point[1] as f32 / scale];

        let target = self.source.average_color(Region::new(
            source_point[0] as u32,
            source_point[1] as u32,
            size.ceil() as u32,
        ));
        let current = surface.average_color(Region::new(
            point[0],
            point[1],
            (size * scale).ceil() as u32,
        ));

        if !should_paint(target, current, self.threshold) {
            return Step::Skipped;
        }

        let origin = [source_point[0] - size / 2.0, source_point[1] - size / 2.0];
        let shape = self
            .painter
            .paint(surface, self.source.width(), origin, size, target, rng);
        trace!(?shape, "brush dab");

        Step::Painted(shape)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::canvas::Canvas;
    use crate::fill::FillScheduler;

    fn dark() -> Background {
        Background::from_source(&PixelBuffer::filled(1, 1, [0, 0, 0]))
    }

    #[test]
    fn small_moves_are_ignored() {
        let mut debouncer = Debouncer::new(&Config::default());
        let state = FillState::new(10.0);
        let now = Instant::now();

        assert!(!debouncer.pointer_moved([3.0, 3.0], now, &state));
        assert!(debouncer.pointer_moved([30.0, 40.0], now, &state));
        assert!(!debouncer.pointer_moved([32.0, 42.0], now, &state));
    }

    #[test]
    fn newer_moves_replace_the_pending_one() {
        let mut debouncer = Debouncer::new(&Config::default());
        let state = FillState::new(10.0);
        let now = Instant::now();

        debouncer.pointer_moved([10.0, 10.0], now, &state);
        debouncer.pointer_moved([50.0, 50.0], now + Duration::from_micros(500), &state);

        assert_eq!(debouncer.poll(now + Duration::from_micros(900)), None);
        assert_eq!(debouncer.poll(now + Duration::from_millis(5)), Some([50.0, 50.0]));
        assert_eq!(debouncer.poll(now + Duration::from_millis(10)), None);
    }

    #[test]
    fn cancel_drops_the_pending_action() {
        let mut debouncer = Debouncer::new(&Config::default());
        let now = Instant::now();

        debouncer.pointer_moved([10.0, 10.0], now, &FillState::new(10.0));
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert_eq!(debouncer.poll(now + Duration::from_secs(1)), None);
    }

    #[test]
    fn moves_are_ignored_while_filling() {
        let source = PixelBuffer::filled(10, 10, [0, 0, 0]);
        let mut state = FillState::new(10.0);
        let _run = FillScheduler::new(&Config::default()).start(&mut state, &source);

        let mut debouncer = Debouncer::new(&Config::default());
        assert!(!debouncer.pointer_moved([50.0, 50.0], Instant::now(), &state));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn burst_paints_and_restores_shape_size() {
        let source = PixelBuffer::filled(200, 200, [250, 10, 10]);
        let mut canvas = Canvas::new(200, 200, dark().color());
        let mut state = FillState::new(80.0);
        let mut rng = StdRng::seed_from_u64(12);

        let mut burst = Burst::new([100.0, 100.0], &source, &Config::default());
        let mut painted = 0;
        loop {
            match burst.step(&mut state, &mut canvas, dark(), &mut rng) {
                Step::Painted(_) => painted += 1,
                Step::Skipped => {}
                Step::Finished => break,
            }
            assert_eq!(state.shape_size(), 80.0);
        }

        assert!(painted >= 1);
        assert_eq!(burst.remaining(), 0);
        assert_ne!(canvas.average_color(Region::new(0, 0, 200)), dark().color());
    }

    #[test]
    fn burst_runs_a_fixed_number_of_dabs() {
        let source = PixelBuffer::filled(50, 50, [23, 23, 23]);
        let mut canvas = Canvas::new(50, 50, dark().color());
        let mut state = FillState::new(10.0);
        let mut rng = StdRng::seed_from_u64(0);

        let mut burst = Burst::new([25.0, 25.0], &source, &Config::default());
        let mut steps = Vec::new();
        loop {
            match burst.step(&mut state, &mut canvas, dark(), &mut rng) {
                Step::Finished => break,
                step => steps.push(step),
            }
        }

        // source already matches the output, nothing is painted
        assert_eq!(steps, vec![Step::Skipped; 3]);
    }

    #[test]
    fn dabs_off_a_shrunken_surface_are_skipped() {
        let source = PixelBuffer::filled(100, 100, [250, 250, 250]);
        let mut canvas = Canvas::new(100, 100, dark().color());
        let mut state = FillState::new(10.0);
        let mut rng = StdRng::seed_from_u64(1);

        // pointer recorded on a larger surface than the one painted now
        let mut burst = Burst::new([400.0, 400.0], &source, &Config::default());
        for _ in 0..3 {
            assert_eq!(burst.step(&mut state, &mut canvas, dark(), &mut rng), Step::Skipped);
        }
        assert_eq!(burst.step(&mut state, &mut canvas, dark(), &mut rng), Step::Finished);
    }

    #[test]
    fn burst_stops_when_a_fill_starts() {
        let source = PixelBuffer::filled(100, 100, [250, 250, 250]);
        let mut canvas = Canvas::new(100, 100, dark().color());
        let mut state = FillState::new(10.0);
        let mut rng = StdRng::seed_from_u64(1);

        let mut burst = Burst::new([50.0, 50.0], &source, &Config::default());
        let _run = FillScheduler::new(&Config::default()).start(&mut state, &source);

        assert_eq!(burst.step(&mut state, &mut canvas, dark(), &mut rng), Step::Finished);
    }
}
