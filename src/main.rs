use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use holidascope::assets;
use holidascope::config::DemoConfig;
use holidascope::display::PixelBuffer;
use holidascope::util::Rng;
use holidascope::HolidaScope;

#[derive(Parser, Debug)]
#[command(name = "holidascope", version, about = "Kaleidoscope holiday greeting demo")]
struct Cli {
    /// JSON config file. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to render headless.
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Directory for headless PNG frames.
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// Animation rate used for headless frame timing.
    #[arg(long, default_value_t = 30.0)]
    fps: f32,

    /// Seed for sub-scene and sprite selection (default: system clock).
    #[arg(long)]
    seed: Option<u64>,

    /// Remap stride override (1 = full resolution).
    #[arg(long)]
    stride: Option<u32>,

    /// Open a live window instead of writing frames.
    #[cfg(feature = "window")]
    #[arg(long, default_value_t = false)]
    window: bool,

    /// Uncapped framerate in the live window.
    #[cfg(feature = "window")]
    #[arg(long, default_value_t = false)]
    no_vsync: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let sprites = assets::load_sprites(&config);
    let rng = cli.seed.map_or_else(Rng::from_time, Rng::new);
    let scope = HolidaScope::new(&config, sprites, rng).context("set up kaleidoscope")?;

    #[cfg(feature = "window")]
    if cli.window {
        return run_window(scope, &config, !cli.no_vsync);
    }

    run_headless(scope, &config, &cli)
}

fn load_config(cli: &Cli) -> anyhow::Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(stride) = cli.stride {
        config.remap_stride = stride;
    }
    config.validate().context("invalid settings")?;
    Ok(config)
}

fn run_headless(mut scope: HolidaScope, config: &DemoConfig, cli: &Cli) -> anyhow::Result<()> {
    if !(cli.fps > 0.0) {
        anyhow::bail!("--fps must be positive, got {}", cli.fps);
    }
    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("create output dir '{}'", cli.out.display()))?;

    let dt_ms = 1000.0 / cli.fps;
    let mut frame = PixelBuffer::with_size(config.output_width, config.output_height);
    let mut written = 0u32;

    for index in 0..cli.frames {
        if let Err(e) = scope.execute_step(dt_ms, &mut frame) {
            tracing::warn!(frame = index, error = %e, "skipping frame");
            continue;
        }
        let path = cli.out.join(format!("frame_{:05}.png", index));
        frame.save_png(&path)?;
        written += 1;
    }

    tracing::info!(
        frames = written,
        out = %cli.out.display(),
        elapsed_ms = scope.elapsed_ms(),
        "headless render finished"
    );
    Ok(())
}

#[cfg(feature = "window")]
fn run_window(mut scope: HolidaScope, config: &DemoConfig, vsync: bool) -> anyhow::Result<()> {
    use holidascope::display::{draw_text_scaled, Display, InputEvent, RenderTarget};
    use holidascope::util::FpsCounter;
    use sdl2::keyboard::Keycode;

    let (width, height) = (config.output_width, config.output_height);
    let (mut display, texture_creator) =
        Display::with_options("holidascope", width, height, vsync).map_err(anyhow::Error::msg)?;
    let mut target =
        RenderTarget::with_size(&texture_creator, width, height).map_err(anyhow::Error::msg)?;
    let mut frame = PixelBuffer::with_size(width, height);

    // FPS counter with 60 sample rolling average
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;

    tracing::info!(width, height, vsync, "window open (F toggles FPS, Escape quits)");

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::F) => show_fps = !show_fps,
                InputEvent::KeyDown(_) => {},
            }
        }

        if let Err(e) = scope.execute_step(dt * 1000.0, &mut frame) {
            tracing::warn!(error = %e, "skipping frame");
            continue;
        }

        if show_fps {
            let fps_text = format!(
                "FPS {} avg  {}ms",
                avg_fps as u32,
                fps_counter.avg_frame_time_ms() as u32
            );
            // Shadow for visibility
            draw_text_scaled(&mut frame, 5, 5, &fps_text, 0, 0, 0, 1);
            draw_text_scaled(&mut frame, 4, 4, &fps_text, 255, 255, 0, 1);
        }

        display.present(&mut target, &frame).map_err(anyhow::Error::msg)?;
    }

    Ok(())
}
