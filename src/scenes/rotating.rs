//! Rotating Images
//!
//! A grid of sprite copies, each spinning at its own rate about its cell
//! centre, all pulsing in size together.

use std::f32::consts::TAU;
use std::rc::Rc;

use super::SourceScene;
use crate::assets::Sprite;
use crate::display::PixelBuffer;
use crate::util::{RandomSource, Rng};

const MIN_ROWS: i32 = 2;
const MAX_ROWS: i32 = 5;
const MIN_COLUMNS: i32 = 3;
const MAX_COLUMNS: i32 = 8;

// Radians per millisecond
const MIN_ANGLE_INCREMENT: f32 = 1.0 / 1000.0;
const MAX_ANGLE_INCREMENT: f32 = 8.0 / 1000.0;

const MIN_SCALE: f32 = 0.7;
const MAX_SCALE: f32 = 3.0;

// Pulse frequency range in cycles per second
const MIN_PULSE_RATE: f32 = 0.1;
const MAX_PULSE_RATE: f32 = 0.8;

struct Cell {
    cx: f32,
    cy: f32,
    angle: f32,
    angle_increment: f32,
}

pub struct RotatingImages {
    width: f32,
    height: f32,
    rows: u32,
    columns: u32,
    // Peak size multiplier for this run
    scale_peak: f32,
    // Radians of pulse phase per millisecond
    pulse_rate: f32,
    elapsed_ms: f32,
    sprite: Option<Rc<Sprite>>,
    cells: Vec<Cell>,
    rng: Rng,
}

impl RotatingImages {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            rows: MIN_ROWS as u32,
            columns: MIN_COLUMNS as u32,
            scale_peak: MIN_SCALE,
            pulse_rate: 0.0,
            elapsed_ms: 0.0,
            sprite: None,
            cells: Vec::new(),
            rng: Rng::new(1),
        }
    }

    /// Current size multiplier, oscillating between MIN_SCALE and `scale_peak`
    fn size_multiplier(&self) -> f32 {
        let wave = ((self.elapsed_ms * self.pulse_rate).sin() + 1.0) / 2.0;
        (self.scale_peak - MIN_SCALE) * wave + MIN_SCALE
    }

    /// Draw size shared by every cell this frame
    fn draw_size(&self) -> (f32, f32) {
        let m = self.size_multiplier();
        (
            (self.width / self.columns as f32 * m).max(0.0),
            (self.height / self.rows as f32 * m).max(0.0),
        )
    }

    fn update(&mut self, dt_ms: f32) {
        for cell in &mut self.cells {
            cell.angle = (cell.angle + cell.angle_increment * dt_ms).rem_euclid(TAU);
        }
    }
}

impl SourceScene for RotatingImages {
    fn initialize(&mut self, sprite: Rc<Sprite>, rng: &mut dyn RandomSource) {
        self.rng = Rng::fork(rng);
        self.scale_peak = self.rng.range_f32(MIN_SCALE, MAX_SCALE);
        self.pulse_rate = TAU / 1000.0 * self.rng.range_f32(MIN_PULSE_RATE, MAX_PULSE_RATE);
        self.elapsed_ms = 0.0;

        self.rows = self.rng.range_i32(MIN_ROWS, MAX_ROWS) as u32;
        self.columns = self.rng.range_i32(MIN_COLUMNS, MAX_COLUMNS) as u32;
        let cell_w = self.width / self.columns as f32;
        let cell_h = self.height / self.rows as f32;

        self.cells.clear();
        for row in 0..self.rows {
            for col in 0..self.columns {
                let angle = self.rng.range_f32(0.0, TAU);
                let angle_increment = self.rng.range_f32(MIN_ANGLE_INCREMENT, MAX_ANGLE_INCREMENT);
                self.cells.push(Cell {
                    cx: cell_w * col as f32 + cell_w / 2.0,
                    cy: cell_h * row as f32 + cell_h / 2.0,
                    angle,
                    angle_increment,
                });
            }
        }
        self.sprite = Some(sprite);
    }

    fn execute_step(&mut self, dt_ms: f32, target: &mut PixelBuffer) {
        self.update(dt_ms);
        if let Some(sprite) = &self.sprite {
            let (w, h) = self.draw_size();
            for cell in &self.cells {
                target.draw_sprite_rotated(sprite, cell.cx, cell.cy, w, h, cell.angle);
            }
        }
        self.elapsed_ms += dt_ms;
    }

    fn name(&self) -> &str {
        "Rotating Images"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized(seed: u64) -> RotatingImages {
        let mut scene = RotatingImages::new(480, 360);
        scene.initialize(Rc::new(Sprite::solid(32, 32, (9, 9, 9, 255))), &mut Rng::new(seed));
        scene
    }

    #[test]
    fn test_grid_dimensions_in_range() {
        for seed in 1..50 {
            let scene = initialized(seed);
            assert!((2..=5).contains(&scene.rows));
            assert!((3..=8).contains(&scene.columns));
            assert_eq!(scene.cells.len(), (scene.rows * scene.columns) as usize);
        }
    }

    #[test]
    fn test_cells_centered_in_grid() {
        let scene = initialized(21);
        let cell_w = 480.0 / scene.columns as f32;
        let cell_h = 360.0 / scene.rows as f32;
        let first = &scene.cells[0];
        assert!((first.cx - cell_w / 2.0).abs() < 1e-4);
        assert!((first.cy - cell_h / 2.0).abs() < 1e-4);
        let last = &scene.cells[scene.cells.len() - 1];
        assert!((last.cx - (480.0 - cell_w / 2.0)).abs() < 1e-3);
        assert!((last.cy - (360.0 - cell_h / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_angles_stay_wrapped() {
        let mut scene = initialized(4);
        let mut buf = PixelBuffer::with_size(480, 360);
        for _ in 0..100 {
            scene.execute_step(100.0, &mut buf);
            for cell in &scene.cells {
                assert!((0.0..TAU).contains(&cell.angle));
            }
        }
    }

    #[test]
    fn test_size_pulses_within_bounds() {
        let mut scene = initialized(8);
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for _ in 0..2000 {
            let m = scene.size_multiplier();
            assert!(m >= MIN_SCALE - 1e-4 && m <= scene.scale_peak + 1e-4);
            lo = lo.min(m);
            hi = hi.max(m);
            scene.elapsed_ms += 10.0;
        }
        // 20 seconds covers at least two full pulses at the slowest rate
        assert!(lo < MIN_SCALE + 0.01);
        assert!(hi > scene.scale_peak - 0.01);
    }

    #[test]
    fn test_reinitialize_resets_pulse() {
        let mut scene = initialized(2);
        let mut buf = PixelBuffer::with_size(480, 360);
        scene.execute_step(500.0, &mut buf);
        assert_eq!(scene.elapsed_ms, 500.0);
        scene.initialize(Rc::new(Sprite::solid(4, 4, (0, 0, 0, 255))), &mut Rng::new(3));
        assert_eq!(scene.elapsed_ms, 0.0);
    }
}
