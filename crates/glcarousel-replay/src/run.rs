use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use carouselconfig::CarouselConfig;
use glcarousel::{
    gesture_feed, Bitmap, Carousel, CarouselController, Compositor, CpuRasterizer, GestureFeed,
    GestureSender, ImageRef, TransitionRegistry,
};
use tracing_subscriber::EnvFilter;

use crate::bindings::{gesture_tuning, resolve_viewport};
use crate::cli::RunArgs;
use crate::script::{load_script, ScriptStep};

/// Upper bound on frames simulated while waiting for the carousel to settle.
const MAX_SETTLE_FRAMES: u32 = 10_000;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn list_transitions() -> Result<()> {
    let registry = TransitionRegistry::with_builtins();
    println!("Available transitions:");
    for name in registry.names() {
        println!("  {name}");
    }
    Ok(())
}

pub fn run(args: RunArgs) -> Result<()> {
    let Some(config_path) = args.config.as_deref() else {
        bail!("--config is required unless a subcommand is given");
    };
    let config = CarouselConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let steps = match args.script.as_deref() {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let carousel = Arc::new(build_carousel(&config, args.size)?);
    tracing::info!(
        images = carousel.images().len(),
        transitions = carousel.effects().len(),
        viewport = %carousel.viewport(),
        "carousel ready"
    );

    let mut session = Session::new(carousel, &config, &args);
    session.replay(&steps)?;
    session.settle()?;

    if let Some(path) = &args.export {
        session.render_to(path)?;
    }

    let offset = session.controller.offset();
    let current = session.controller.visible().current.label().to_string();
    println!("offset={offset} current={current}");
    Ok(())
}

fn build_carousel(config: &CarouselConfig, size: Option<(u32, u32)>) -> Result<Carousel> {
    let registry = TransitionRegistry::with_builtins();
    let images = config
        .images
        .iter()
        .map(|path| {
            let bitmap = Bitmap::open(path)?;
            tracing::debug!(path = %path.display(), size = ?bitmap.pixels().dimensions(), "loaded image");
            Ok(Arc::new(bitmap) as ImageRef)
        })
        .collect::<Result<Vec<_>>>()?;
    let viewport = resolve_viewport(config.viewport, size);
    Carousel::from_names(images, &config.transitions, &registry, viewport)
        .context("failed to build carousel")
}

/// A controller, its feed and a software renderer driven by a simulated
/// clock.
struct Session {
    controller: CarouselController,
    sender: GestureSender,
    feed: GestureFeed,
    compositor: Compositor,
    raster: CpuRasterizer,
    now: Instant,
    frame_interval: Duration,
    frames_dir: Option<PathBuf>,
    frame_index: u32,
}

impl Session {
    fn new(carousel: Arc<Carousel>, config: &CarouselConfig, args: &RunArgs) -> Self {
        let controller = CarouselController::new(carousel.clone(), gesture_tuning(&config.gesture));
        let (sender, feed) = gesture_feed();
        let compositor = Compositor::new(controller.reader());
        Self {
            controller,
            sender,
            feed,
            compositor,
            raster: CpuRasterizer::new(carousel.viewport()),
            now: Instant::now(),
            frame_interval: Duration::from_secs_f32(1.0 / args.fps),
            frames_dir: args.frames_dir.clone(),
            frame_index: 0,
        }
    }

    fn replay(&mut self, steps: &[ScriptStep]) -> Result<()> {
        for step in steps {
            if let Some(event) = step.touch_event() {
                self.sender.send(event)?;
                continue;
            }
            match step {
                ScriptStep::Wait { ms } => {
                    let deadline = self.now + Duration::from_millis(*ms);
                    while self.now < deadline {
                        self.advance()?;
                    }
                }
                ScriptStep::Snapshot { path } => {
                    self.controller.pump(&self.feed, self.now);
                    self.render_to(path)?;
                }
                _ => {}
            }
        }
        self.controller.pump(&self.feed, self.now);
        Ok(())
    }

    /// Runs frames until both channels are idle.
    fn settle(&mut self) -> Result<()> {
        for _ in 0..MAX_SETTLE_FRAMES {
            if self.controller.is_idle() && self.feed.pending() == 0 {
                return Ok(());
            }
            self.advance()?;
        }
        bail!("carousel did not settle within {MAX_SETTLE_FRAMES} frames")
    }

    fn advance(&mut self) -> Result<()> {
        self.now += self.frame_interval;
        self.controller.pump(&self.feed, self.now);
        if let Some(dir) = self.frames_dir.clone() {
            let path = dir.join(format!("frame_{:05}.png", self.frame_index));
            self.render_to(&path)?;
        }
        self.frame_index += 1;
        Ok(())
    }

    fn render_to(&mut self, path: &Path) -> Result<()> {
        let composition = self.compositor.draw(&mut self.raster)?;
        self.raster.export_png(path)?;
        tracing::info!(
            path = %path.display(),
            offset = composition.offset,
            forward = composition.root.progress,
            backward = composition.root.from.progress,
            "wrote frame"
        );
        Ok(())
    }
}
