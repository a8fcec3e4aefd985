//! Demo configuration
//!
//! Every field has a default, so a config file only needs the values it wants
//! to change. Loaded from JSON the same way scenes are saved and restored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};

/// Top-level demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Final frame width; the working canvas is half of this
    pub output_width: u32,
    /// Final frame height; the working canvas is half of this
    pub output_height: u32,
    /// Columns advanced per remap sample. 1 samples every pixel, 2 halves
    /// horizontal resolution by duplicating each sample into its neighbour.
    pub remap_stride: u32,
    /// Longest time a sub-scene stays active before a new one is picked
    pub max_sub_scene_ms: f32,
    /// Directory the asset list is resolved against
    pub asset_dir: PathBuf,
    /// Sprite images used by the sub-scenes
    pub assets: Vec<PathBuf>,
    pub scroller: ScrollerConfig,
}

/// Text scroller overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollerConfig {
    pub message: String,
    /// Delay before anything of the scroller is shown
    pub lead_in_ms: f32,
    /// Duration of the background strip fade-in
    pub fade_in_ms: f32,
    /// Distance from the bottom of the frame to the top of the strip
    pub offset_from_bottom: u32,
    /// Grey level of the background strip, 0.0 - 1.0
    pub background_intensity: f32,
    /// Opacity of the background strip once fully faded in, 0.0 - 1.0
    pub background_alpha: f32,
    /// Pixels per second
    pub speed: f32,
    /// Font pixel size multiplier for the 8x8 glyphs
    pub scale: u32,
    pub color: (u8, u8, u8),
}

const DEFAULT_ASSETS: [&str; 13] = [
    "CandyCaneWithBow.png",
    "HappyRudolphAnimated.gif",
    "GingerBreadMan.png",
    "SnowMan.png",
    "ChristmasBell.gif",
    "SnowFlake.png",
    "Candles.png",
    "Ornaments-Holly-Poinsettias.gif",
    "Gift.png",
    "HolidayCookies.png",
    "Wreath.png",
    "Ornaments.png",
    "ChistmasTree.png",
];

/// Largest accepted output dimension in either direction
pub const MAX_OUTPUT_DIMENSION: u32 = 16_384;

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_WIDTH,
            output_height: DEFAULT_HEIGHT,
            remap_stride: 1,
            max_sub_scene_ms: 10_000.0,
            asset_dir: PathBuf::from("images"),
            assets: DEFAULT_ASSETS.iter().map(PathBuf::from).collect(),
            scroller: ScrollerConfig::default(),
        }
    }
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            message: "Happy holidays from Katie and Ayo! We hope that you find time to relax \
                      and enjoy the holidays. May you have a prosperous and joyful year in 2016!"
                .to_string(),
            lead_in_ms: 3000.0,
            fade_in_ms: 2000.0,
            offset_from_bottom: 100,
            background_intensity: 0.1,
            background_alpha: 0.2,
            speed: 120.0,
            scale: 2,
            color: (255, 255, 255),
        }
    }
}

impl DemoConfig {
    /// Load config from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Working canvas size (half the output in each dimension)
    pub fn working_size(&self) -> (u32, u32) {
        (self.output_width / 2, self.output_height / 2)
    }

    /// Reject settings the renderer can't honour
    pub fn validate(&self) -> Result<()> {
        if self.output_width < 2 || self.output_height < 2 {
            return Err(Error::InvalidConfig(format!(
                "output must be at least 2x2, got {}x{}",
                self.output_width, self.output_height
            )));
        }
        if self.output_width > MAX_OUTPUT_DIMENSION || self.output_height > MAX_OUTPUT_DIMENSION {
            return Err(Error::InvalidConfig(format!(
                "output must be at most {0}x{0}, got {1}x{2}",
                MAX_OUTPUT_DIMENSION, self.output_width, self.output_height
            )));
        }
        if self.output_width % 2 != 0 || self.output_height % 2 != 0 {
            return Err(Error::InvalidConfig(format!(
                "output dimensions must be even, got {}x{}",
                self.output_width, self.output_height
            )));
        }
        if self.remap_stride == 0 {
            return Err(Error::InvalidConfig("remap_stride must be at least 1".into()));
        }
        if !(self.max_sub_scene_ms > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_sub_scene_ms must be positive, got {}",
                self.max_sub_scene_ms
            )));
        }
        let s = &self.scroller;
        if s.lead_in_ms < 0.0 || s.fade_in_ms < 0.0 {
            return Err(Error::InvalidConfig("scroller phase durations must be >= 0".into()));
        }
        if !(0.0..=1.0).contains(&s.background_alpha)
            || !(0.0..=1.0).contains(&s.background_intensity)
        {
            return Err(Error::InvalidConfig(
                "scroller background intensity and alpha must be within 0.0 - 1.0".into(),
            ));
        }
        Ok(())
    }

    /// Asset paths resolved against `asset_dir`
    pub fn asset_paths(&self) -> Vec<PathBuf> {
        self.assets.iter().map(|a| self.asset_dir.join(a)).collect()
    }
}
