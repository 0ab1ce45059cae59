//! Software pipeline that shades every pixel through [`Composition::shade`].
//!
//! Used by the replay tool and tests where no GPU is available.

use std::fs;
use std::path::Path;

use image::{Rgba as Pixel, RgbaImage};
use tracing::debug;

use crate::compositor::{Composition, RenderError, RenderPipeline};
use crate::types::{Uv, Viewport};

#[derive(Debug)]
pub struct CpuRasterizer {
    viewport: Viewport,
    frame: RgbaImage,
    frames_drawn: u64,
}

impl CpuRasterizer {
    pub fn new(viewport: Viewport) -> Self {
        let (width, height) = viewport.pixel_size();
        Self {
            viewport,
            frame: RgbaImage::new(width, height),
            frames_drawn: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Most recently drawn frame. Transparent black before the first submit.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Writes the last frame as PNG, creating parent directories as needed.
    pub fn export_png(&self, path: &Path) -> Result<(), RenderError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.frame.save_with_format(path, image::ImageFormat::Png)?;
        debug!(path = %path.display(), frame = self.frames_drawn, "exported frame");
        Ok(())
    }
}

impl RenderPipeline for CpuRasterizer {
    fn submit(&mut self, composition: &Composition) -> Result<(), RenderError> {
        if composition.resolution != self.viewport {
            return Err(RenderError::Pipeline(format!(
                "composition is {} but the rasterizer targets {}",
                composition.resolution, self.viewport
            )));
        }
        let width = self.frame.width() as f32;
        let height = self.frame.height() as f32;
        for (x, y, pixel) in self.frame.enumerate_pixels_mut() {
            let uv = Uv::new((x as f32 + 0.5) / width, (y as f32 + 0.5) / height);
            *pixel = Pixel(composition.shade(uv).to_rgba8());
        }
        self.frames_drawn += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::Carousel;
    use crate::registry::TransitionRegistry;
    use crate::source::{ImageRef, SolidColor};
    use crate::state::FrameState;
    use crate::types::Rgba;
    use std::sync::Arc;

    fn carousel(viewport: Viewport) -> Carousel {
        let images: Vec<ImageRef> = vec![
            Arc::new(SolidColor::new("A", Rgba::opaque(1.0, 0.0, 0.0))),
            Arc::new(SolidColor::new("B", Rgba::opaque(0.0, 1.0, 0.0))),
        ];
        let registry = TransitionRegistry::with_builtins();
        Carousel::from_names(images, &["wipe_left"], &registry, viewport).expect("carousel")
    }

    #[test]
    fn resting_frame_is_filled_with_current_image() {
        let viewport = Viewport::new(8.0, 4.0);
        let mut raster = CpuRasterizer::new(viewport);
        let composition = Composition::build(&carousel(viewport), FrameState::default());
        raster.submit(&composition).expect("submit");

        assert_eq!(raster.frames_drawn(), 1);
        assert_eq!(raster.frame().dimensions(), (8, 4));
        assert!(raster.frame().pixels().all(|p| p.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn half_wipe_splits_the_frame() {
        let viewport = Viewport::new(10.0, 2.0);
        let mut raster = CpuRasterizer::new(viewport);
        let frame = FrameState {
            offset: 0,
            progress_forward: 0.0,
            progress_backward: 0.5,
        };
        raster
            .submit(&Composition::build(&carousel(viewport), frame))
            .expect("submit");

        // wipe_left reveals the destination from the right edge.
        assert_eq!(raster.frame().get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(raster.frame().get_pixel(9, 1).0, [0, 255, 0, 255]);
    }

    #[test]
    fn mismatched_resolution_is_rejected() {
        let mut raster = CpuRasterizer::new(Viewport::new(4.0, 4.0));
        let composition =
            Composition::build(&carousel(Viewport::new(8.0, 8.0)), FrameState::default());
        assert!(matches!(
            raster.submit(&composition),
            Err(RenderError::Pipeline(_))
        ));
        assert_eq!(raster.frames_drawn(), 0);
    }

    #[test]
    fn export_writes_a_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out.png");
        let viewport = Viewport::new(3.0, 3.0);
        let mut raster = CpuRasterizer::new(viewport);
        raster
            .submit(&Composition::build(&carousel(viewport), FrameState::default()))
            .expect("submit");
        raster.export_png(&path).expect("export");

        let decoded = image::open(&path).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 3));
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }
}
