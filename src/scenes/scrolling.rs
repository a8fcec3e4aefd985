//! Scrolling Images
//!
//! Copies of the sprite drift diagonally down and to the right at random
//! speeds, respawning somewhere new once they leave the canvas.

use std::rc::Rc;

use super::SourceScene;
use crate::assets::Sprite;
use crate::display::PixelBuffer;
use crate::util::{RandomSource, Rng};

const NUM_IMAGES: usize = 20;
const MIN_SPEED: f32 = 20.0; // pixels per second, both axes
const MAX_SPEED: f32 = 400.0;

struct Instance {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

pub struct ScrollingImages {
    width: f32,
    height: f32,
    sprite: Option<Rc<Sprite>>,
    instances: Vec<Instance>,
    rng: Rng,
}

impl ScrollingImages {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            sprite: None,
            instances: Vec::with_capacity(NUM_IMAGES),
            rng: Rng::new(1),
        }
    }

    /// Random placement anywhere a sprite could still be partially visible
    fn spawn(&mut self, sprite_w: f32, sprite_h: f32) -> Instance {
        Instance {
            x: self.rng.range_f32(-sprite_w, self.width),
            y: self.rng.range_f32(-sprite_h, self.height),
            vx: self.rng.range_f32(MIN_SPEED, MAX_SPEED),
            vy: self.rng.range_f32(MIN_SPEED, MAX_SPEED),
        }
    }

    fn update(&mut self, dt_ms: f32) {
        let Some(sprite) = self.sprite.clone() else {
            return;
        };
        let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
        let dt = dt_ms / 1000.0;

        for i in 0..self.instances.len() {
            let inst = &mut self.instances[i];
            inst.x += inst.vx * dt;
            inst.y += inst.vy * dt;
            if inst.x > self.width || inst.y > self.height {
                self.instances[i] = self.spawn(sw, sh);
            }
        }
    }
}

impl SourceScene for ScrollingImages {
    fn initialize(&mut self, sprite: Rc<Sprite>, rng: &mut dyn RandomSource) {
        self.rng = Rng::fork(rng);
        let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
        self.instances.clear();
        for _ in 0..NUM_IMAGES {
            let inst = self.spawn(sw, sh);
            self.instances.push(inst);
        }
        self.sprite = Some(sprite);
    }

    fn execute_step(&mut self, dt_ms: f32, target: &mut PixelBuffer) {
        if let Some(sprite) = &self.sprite {
            let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
            for inst in &self.instances {
                target.draw_sprite_scaled(sprite, inst.x, inst.y, sw, sh);
            }
        }
        self.update(dt_ms);
    }

    fn name(&self) -> &str {
        "Scrolling Images"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_stay_in_spawn_area() {
        let mut scene = ScrollingImages::new(100, 80);
        let sprite = Rc::new(Sprite::solid(10, 10, (1, 1, 1, 255)));
        scene.initialize(sprite, &mut Rng::new(5));
        assert_eq!(scene.instances.len(), NUM_IMAGES);

        let mut buf = PixelBuffer::with_size(100, 80);
        for _ in 0..200 {
            scene.execute_step(50.0, &mut buf);
            for inst in &scene.instances {
                assert!(inst.x >= -10.0 && inst.x <= 100.0, "x {}", inst.x);
                assert!(inst.y >= -10.0 && inst.y <= 80.0, "y {}", inst.y);
                assert!(inst.vx >= MIN_SPEED && inst.vx <= MAX_SPEED);
            }
        }
    }

    #[test]
    fn test_moves_down_and_right() {
        let mut scene = ScrollingImages::new(1000, 1000);
        let sprite = Rc::new(Sprite::solid(4, 4, (1, 1, 1, 255)));
        scene.initialize(sprite, &mut Rng::new(9));
        let before: Vec<(f32, f32)> = scene.instances.iter().map(|i| (i.x, i.y)).collect();
        scene.update(1.0);
        for (inst, (x, y)) in scene.instances.iter().zip(before) {
            // 1ms moves at most 0.4px, so nothing respawns
            assert!(inst.x > x && inst.y > y);
        }
    }
}
