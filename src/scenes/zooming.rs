//! Zooming Images
//!
//! Sprites fly outward from the canvas centre, speeding up and growing as
//! they get further away, which reads as things rushing towards the viewer.

use std::rc::Rc;

use super::SourceScene;
use crate::assets::Sprite;
use crate::display::PixelBuffer;
use crate::util::{RandomSource, Rng};

const NUM_IMAGES: usize = 40;
const MIN_SPEED: f32 = 80.0;
const MAX_SPEED: f32 = 300.0;

struct Instance {
    x: f32,
    y: f32,
    speed: f32,
}

pub struct ZoomingImages {
    width: f32,
    height: f32,
    center_x: f32,
    center_y: f32,
    max_distance: f32,
    // Top-left corner of the spawn area; depends on the sprite size
    min_x: f32,
    min_y: f32,
    sprite: Option<Rc<Sprite>>,
    instances: Vec<Instance>,
    rng: Rng,
}

/// Offset from the centre along one axis, normalised so the canvas edge is 1
#[inline]
fn axis_factor(coord: f32, center: f32, max: f32) -> f32 {
    (coord - center) / (max / 2.0)
}

impl ZoomingImages {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let (center_x, center_y) = (w / 2.0, h / 2.0);
        Self {
            width: w,
            height: h,
            center_x,
            center_y,
            max_distance: center_x.hypot(center_y),
            min_x: 0.0,
            min_y: 0.0,
            sprite: None,
            instances: Vec::with_capacity(NUM_IMAGES),
            rng: Rng::new(1),
        }
    }

    fn spawn(&mut self) -> Instance {
        Instance {
            x: self.rng.range_f32(self.min_x, self.width),
            y: self.rng.range_f32(self.min_y, self.height),
            speed: self.rng.range_f32(MIN_SPEED, MAX_SPEED),
        }
    }

    fn out_of_bounds(&self, inst: &Instance) -> bool {
        inst.x < self.min_x || inst.x > self.width || inst.y < self.min_y || inst.y > self.height
    }

    /// Draw scale for a sprite at (x, y): 0 at the centre, 1 at the corners
    fn scale_at(&self, x: f32, y: f32) -> f32 {
        if self.max_distance <= 0.0 {
            return 0.0;
        }
        (x - self.center_x).hypot(y - self.center_y) / self.max_distance
    }

    fn update(&mut self, dt_ms: f32) {
        let dt = dt_ms / 1000.0;
        for i in 0..self.instances.len() {
            let fx = axis_factor(self.instances[i].x, self.center_x, self.width);
            let fy = axis_factor(self.instances[i].y, self.center_y, self.height);

            let inst = &mut self.instances[i];
            inst.x += inst.speed * fx * dt;
            inst.y += inst.speed * fy * dt;

            if self.out_of_bounds(&self.instances[i]) {
                self.instances[i] = self.spawn();
            }
        }
    }
}

impl SourceScene for ZoomingImages {
    fn initialize(&mut self, sprite: Rc<Sprite>, rng: &mut dyn RandomSource) {
        self.rng = Rng::fork(rng);
        self.min_x = -(sprite.width() as f32);
        self.min_y = -(sprite.height() as f32);
        self.instances.clear();
        for _ in 0..NUM_IMAGES {
            let inst = self.spawn();
            self.instances.push(inst);
        }
        self.sprite = Some(sprite);
    }

    fn execute_step(&mut self, dt_ms: f32, target: &mut PixelBuffer) {
        if let Some(sprite) = &self.sprite {
            let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
            for inst in &self.instances {
                let scale = self.scale_at(inst.x, inst.y);
                target.draw_sprite_scaled(sprite, inst.x, inst.y, sw * scale, sh * scale);
            }
        }
        self.update(dt_ms);
    }

    fn name(&self) -> &str {
        "Zooming Images"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_factor() {
        assert_eq!(axis_factor(50.0, 50.0, 100.0), 0.0);
        assert_eq!(axis_factor(100.0, 50.0, 100.0), 1.0);
        assert_eq!(axis_factor(0.0, 50.0, 100.0), -1.0);
    }

    #[test]
    fn test_scale_grows_with_distance() {
        let scene = ZoomingImages::new(200, 100);
        assert_eq!(scene.scale_at(100.0, 50.0), 0.0);
        assert!((scene.scale_at(200.0, 100.0) - 1.0).abs() < 1e-6);
        assert!(scene.scale_at(150.0, 50.0) < scene.scale_at(180.0, 50.0));
    }

    #[test]
    fn test_moves_away_from_center() {
        let mut scene = ZoomingImages::new(400, 400);
        let sprite = Rc::new(Sprite::solid(8, 8, (1, 1, 1, 255)));
        scene.initialize(sprite, &mut Rng::new(3));
        // 1ms moves at most 0.3px, so only sprites hugging the border respawn
        let interior: Vec<Option<f32>> = scene
            .instances
            .iter()
            .map(|i| {
                let inside = i.x > -7.0 && i.x < 399.0 && i.y > -7.0 && i.y < 399.0;
                inside.then(|| (i.x - 200.0).hypot(i.y - 200.0))
            })
            .collect();
        scene.update(1.0);
        for (inst, d) in scene.instances.iter().zip(interior) {
            if let Some(d) = d {
                assert!((inst.x - 200.0).hypot(inst.y - 200.0) >= d);
            }
        }
    }

    #[test]
    fn test_instances_respawn_inside_area() {
        let mut scene = ZoomingImages::new(120, 90);
        let sprite = Rc::new(Sprite::solid(12, 12, (1, 1, 1, 255)));
        scene.initialize(sprite, &mut Rng::new(11));
        assert_eq!(scene.instances.len(), NUM_IMAGES);

        let mut buf = PixelBuffer::with_size(120, 90);
        for _ in 0..300 {
            scene.execute_step(40.0, &mut buf);
            for inst in &scene.instances {
                assert!(!scene.out_of_bounds(inst));
            }
        }
    }
}
