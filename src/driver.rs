//! Top-level scene driver
//!
//! Owns the working-canvas source buffer, the kaleidoscope and the scroller,
//! and cycles randomly through sub-scenes and sprites. Each call to
//! `execute_step` produces one finished output frame.

use std::rc::Rc;

use crate::assets::Sprite;
use crate::config::DemoConfig;
use crate::display::{MessageScroller, PixelBuffer};
use crate::error::Result;
use crate::kaleidoscope::Kaleidoscope;
use crate::scenes::{standard_scenes, SourceScene};
use crate::util::RandomSource;

pub struct HolidaScope {
    kaleidoscope: Kaleidoscope,
    source: PixelBuffer,
    scroller: MessageScroller,
    scenes: Vec<Box<dyn SourceScene>>,
    sprites: Vec<Rc<Sprite>>,
    active: Option<usize>,
    // Time the active sub-scene has been running
    scene_time_ms: f32,
    max_scene_ms: f32,
    elapsed_ms: f64,
    rng: Box<dyn RandomSource>,
    reported_no_sprites: bool,
}

impl HolidaScope {
    /// Validate `config` and build everything that depends on the canvas size.
    /// Fails before any frame is drawn if the sizes can't work together.
    pub fn new(
        config: &DemoConfig,
        sprites: Vec<Rc<Sprite>>,
        rng: impl RandomSource + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let (width, height) = config.working_size();
        let output = (config.output_width, config.output_height);

        let kaleidoscope = Kaleidoscope::new(width, height, output, config.remap_stride)?;
        tracing::info!(
            width,
            height,
            output_width = output.0,
            output_height = output.1,
            stride = config.remap_stride,
            sprites = sprites.len(),
            "holidascope ready"
        );

        Ok(Self {
            kaleidoscope,
            source: PixelBuffer::with_size(width, height),
            scroller: MessageScroller::new(&config.scroller, config.output_width),
            scenes: standard_scenes(width, height),
            sprites,
            active: None,
            scene_time_ms: 0.0,
            max_scene_ms: config.max_sub_scene_ms,
            elapsed_ms: 0.0,
            rng: Box::new(rng),
            reported_no_sprites: false,
        })
    }

    /// Produce one output frame, `dt_ms` after the previous one.
    ///
    /// An `output` of the wrong size is reported as an error. The sub-scene
    /// and the scroller still advance by `dt_ms`, so the caller can skip the
    /// frame and carry on.
    pub fn execute_step(&mut self, dt_ms: f32, output: &mut PixelBuffer) -> Result<()> {
        self.elapsed_ms += dt_ms as f64;
        self.maintain_sub_scene(dt_ms);

        self.source.clear(0, 0, 0);
        if let Some(idx) = self.active {
            self.scenes[idx].execute_step(dt_ms, &mut self.source);
        }

        if let Err(e) = self.kaleidoscope.render(&self.source, output) {
            self.scroller.skip(dt_ms);
            return Err(e);
        }
        self.scroller.render(output, dt_ms);
        Ok(())
    }

    /// Pick a new sub-scene when none is running or the current one has
    /// used up its time
    fn maintain_sub_scene(&mut self, dt_ms: f32) {
        self.scene_time_ms += dt_ms;
        if self.active.is_some() && self.scene_time_ms < self.max_scene_ms {
            return;
        }

        if self.sprites.is_empty() || self.scenes.is_empty() {
            if !self.reported_no_sprites {
                tracing::warn!("no sprites available, source canvas stays black");
                self.reported_no_sprites = true;
            }
            return;
        }

        let scene_idx = self.rng.index(self.scenes.len());
        let sprite = self.sprites[self.rng.index(self.sprites.len())].clone();
        let scene = &mut self.scenes[scene_idx];
        scene.initialize(sprite, self.rng.as_mut());
        tracing::debug!(scene = scene.name(), elapsed_ms = self.elapsed_ms, "sub-scene started");

        self.active = Some(scene_idx);
        self.scene_time_ms = 0.0;
    }

    /// Name of the running sub-scene, if any
    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.map(|idx| self.scenes[idx].name())
    }

    /// Total animation time so far
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Time the running sub-scene has been active
    #[inline]
    pub fn scene_time_ms(&self) -> f32 {
        self.scene_time_ms
    }

    /// Source canvas as drawn in the last step
    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn kaleidoscope(&self) -> &Kaleidoscope {
        &self.kaleidoscope
    }

    pub fn scroller(&self) -> &MessageScroller {
        &self.scroller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrollerConfig;
    use crate::display::ScrollerPhase;
    use crate::error::Error;
    use crate::util::Rng;

    fn small_config() -> DemoConfig {
        DemoConfig {
            output_width: 64,
            output_height: 48,
            max_sub_scene_ms: 100.0,
            scroller: ScrollerConfig {
                lead_in_ms: 1.0e9,
                ..ScrollerConfig::default()
            },
            ..DemoConfig::default()
        }
    }

    fn sprites() -> Vec<Rc<Sprite>> {
        vec![
            Rc::new(Sprite::solid(8, 8, (255, 0, 0, 255))),
            Rc::new(Sprite::checkerboard(12, 3, (0, 255, 0), (0, 0, 255))),
        ]
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = DemoConfig {
            output_width: 63,
            ..small_config()
        };
        assert!(matches!(
            HolidaScope::new(&config, sprites(), Rng::new(1)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_first_step_starts_a_scene() {
        let mut scope = HolidaScope::new(&small_config(), sprites(), Rng::new(5)).unwrap();
        assert_eq!(scope.active_scene_name(), None);
        let mut out = PixelBuffer::with_size(64, 48);
        scope.execute_step(16.0, &mut out).unwrap();
        let name = scope.active_scene_name().unwrap();
        assert!(["Scrolling Images", "Zooming Images", "Rotating Images"].contains(&name));
        assert_eq!(scope.scene_time_ms(), 0.0);
    }

    #[test]
    fn test_scene_timer_counts_once_and_expires() {
        let mut scope = HolidaScope::new(&small_config(), sprites(), Rng::new(5)).unwrap();
        let mut out = PixelBuffer::with_size(64, 48);
        scope.execute_step(16.0, &mut out).unwrap();
        scope.execute_step(40.0, &mut out).unwrap();
        assert_eq!(scope.scene_time_ms(), 40.0);
        scope.execute_step(40.0, &mut out).unwrap();
        assert_eq!(scope.scene_time_ms(), 80.0);
        // Reaching the limit re-picks and restarts the timer
        scope.execute_step(20.0, &mut out).unwrap();
        assert_eq!(scope.scene_time_ms(), 0.0);
        assert!(scope.active_scene_name().is_some());
        assert_eq!(scope.elapsed_ms(), 116.0);
    }

    #[test]
    fn test_no_sprites_renders_black() {
        let mut scope = HolidaScope::new(&small_config(), Vec::new(), Rng::new(1)).unwrap();
        let mut out = PixelBuffer::with_size(64, 48);
        for _ in 0..3 {
            scope.execute_step(16.0, &mut out).unwrap();
        }
        assert_eq!(scope.active_scene_name(), None);
        assert!(out.as_bytes().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_output_is_mirrored() {
        let mut scope = HolidaScope::new(&small_config(), sprites(), Rng::new(99)).unwrap();
        let mut out = PixelBuffer::with_size(64, 48);
        for _ in 0..10 {
            scope.execute_step(33.0, &mut out).unwrap();
        }
        for y in 0..48 {
            for x in 0..64 {
                let p = out.get_pixel(x, y);
                assert_eq!(p, out.get_pixel(63 - x, y));
                assert_eq!(p, out.get_pixel(x, 47 - y));
            }
        }
    }

    #[test]
    fn test_wrong_output_size_is_skippable() {
        let mut scope = HolidaScope::new(&small_config(), sprites(), Rng::new(3)).unwrap();
        let mut small = PixelBuffer::with_size(32, 24);
        assert!(matches!(
            scope.execute_step(16.0, &mut small),
            Err(Error::TargetTooSmall { .. })
        ));
        // The next good frame still works
        let mut out = PixelBuffer::with_size(64, 48);
        scope.execute_step(16.0, &mut out).unwrap();
        assert_eq!(scope.elapsed_ms(), 32.0);
    }

    #[test]
    fn test_skipped_frames_keep_scroller_in_step() {
        let config = DemoConfig {
            scroller: ScrollerConfig {
                lead_in_ms: 20.0,
                ..ScrollerConfig::default()
            },
            ..small_config()
        };
        let mut scope = HolidaScope::new(&config, sprites(), Rng::new(8)).unwrap();
        let mut small = PixelBuffer::with_size(8, 8);
        for _ in 0..3 {
            assert!(scope.execute_step(10.0, &mut small).is_err());
        }
        assert_eq!(scope.elapsed_ms(), 30.0);
        assert_eq!(scope.scroller().phase(), ScrollerPhase::FadeIn);
        assert!(small.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_same_seed_same_frames() {
        let run = || {
            let mut scope = HolidaScope::new(&small_config(), sprites(), Rng::new(2024)).unwrap();
            let mut out = PixelBuffer::with_size(64, 48);
            for _ in 0..20 {
                scope.execute_step(25.0, &mut out).unwrap();
            }
            out
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_scroller_draws_after_lead_in() {
        let config = DemoConfig {
            scroller: ScrollerConfig {
                lead_in_ms: 0.0,
                fade_in_ms: 0.0,
                offset_from_bottom: 30,
                background_intensity: 1.0,
                background_alpha: 1.0,
                ..ScrollerConfig::default()
            },
            ..small_config()
        };
        let mut scope = HolidaScope::new(&config, Vec::new(), Rng::new(1)).unwrap();
        let mut out = PixelBuffer::with_size(64, 48);
        // LeadIn -> FadeIn -> DisplayText, then one drawn frame
        for _ in 0..3 {
            scope.execute_step(10.0, &mut out).unwrap();
        }
        assert_eq!(out.get_pixel(0, 48 - 30), Some((255, 255, 255)));
        assert_eq!(out.get_pixel(0, 0), Some((0, 0, 0)));
    }
}
