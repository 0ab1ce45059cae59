//! Image sources the carousel references but does not own.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::effect::Sampler;
use crate::types::{Rgba, Uv, Viewport};

/// A decoded image the compositor can sample.
///
/// Sampling always applies "cover" fit: the image is scaled uniformly until
/// it covers the viewport, centred, and cropped. Coordinates outside `[0, 1]`
/// clamp to the nearest edge texel.
pub trait ImageSource: Send + Sync + fmt::Debug {
    /// Human-readable identifier (usually the path it was loaded from).
    fn label(&self) -> &str;

    /// Native size in pixels, `None` for resolution-independent sources.
    fn dimensions(&self) -> Option<(u32, u32)>;

    fn sample(&self, uv: Uv, viewport: Viewport) -> Rgba;
}

pub type ImageRef = Arc<dyn ImageSource>;

#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to decode image at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image at {0} has no pixels")]
    Empty(PathBuf),
}

/// Maps surface uv into image uv for cover fit.
///
/// Returns `[scale_x, scale_y, offset_x, offset_y]` such that
/// `image_uv = uv * scale + offset`.
pub fn cover_transform(image: (u32, u32), viewport: Viewport) -> [f32; 4] {
    let (w, h) = (image.0.max(1) as f32, image.1.max(1) as f32);
    let scale = (viewport.width / w).max(viewport.height / h);
    let scale_x = viewport.width / (w * scale);
    let scale_y = viewport.height / (h * scale);
    [scale_x, scale_y, (1.0 - scale_x) * 0.5, (1.0 - scale_y) * 0.5]
}

/// In-memory RGBA bitmap.
#[derive(Clone)]
pub struct Bitmap {
    label: String,
    pixels: RgbaImage,
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("label", &self.label)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl Bitmap {
    pub fn new(label: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            label: label.into(),
            pixels,
        }
    }

    /// Decodes any format enabled in the `image` crate features.
    pub fn open(path: &Path) -> Result<Self, ImageLoadError> {
        let decoded = image::open(path).map_err(|source| ImageLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = decoded.to_rgba8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ImageLoadError::Empty(path.to_path_buf()));
        }
        Ok(Self::new(path.display().to_string(), pixels))
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    fn texel(&self, u: f32, v: f32) -> Rgba {
        let (w, h) = self.pixels.dimensions();
        if w == 0 || h == 0 {
            return Rgba::TRANSPARENT;
        }
        let x = (u * w as f32).floor().clamp(0.0, (w - 1) as f32) as u32;
        let y = (v * h as f32).floor().clamp(0.0, (h - 1) as f32) as u32;
        Rgba::from_rgba8(self.pixels.get_pixel(x, y).0)
    }
}

impl ImageSource for Bitmap {
    fn label(&self) -> &str {
        &self.label
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        let (w, h) = self.pixels.dimensions();
        (w > 0 && h > 0).then_some((w, h))
    }

    fn sample(&self, uv: Uv, viewport: Viewport) -> Rgba {
        let [sx, sy, ox, oy] = cover_transform(self.pixels.dimensions(), viewport);
        let u = if uv.x.is_finite() { uv.x * sx + ox } else { 0.0 };
        let v = if uv.y.is_finite() { uv.y * sy + oy } else { 0.0 };
        self.texel(u, v)
    }
}

/// Flat colour, handy as a placeholder while real images load.
#[derive(Debug, Clone)]
pub struct SolidColor {
    label: String,
    color: Rgba,
}

impl SolidColor {
    pub fn new(label: impl Into<String>, color: Rgba) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

impl ImageSource for SolidColor {
    fn label(&self) -> &str {
        &self.label
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        None
    }

    fn sample(&self, _uv: Uv, _viewport: Viewport) -> Rgba {
        self.color
    }
}

/// Binds an image to the viewport so effects can sample it by uv alone.
pub(crate) struct Placed<'a> {
    pub image: &'a dyn ImageSource,
    pub viewport: Viewport,
}

impl Sampler for Placed<'_> {
    fn sample(&self, uv: Uv) -> Rgba {
        self.image.sample(uv, self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba as Pixel;

    fn two_tone(width: u32, height: u32) -> Bitmap {
        // Left half red, right half blue.
        let pixels = RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Pixel([255, 0, 0, 255])
            } else {
                Pixel([0, 0, 255, 255])
            }
        });
        Bitmap::new("two-tone", pixels)
    }

    #[test]
    fn cover_transform_is_identity_for_matching_aspect() {
        let [sx, sy, ox, oy] = cover_transform((200, 100), Viewport::new(400.0, 200.0));
        assert!((sx - 1.0).abs() < 1e-6 && (sy - 1.0).abs() < 1e-6);
        assert!(ox.abs() < 1e-6 && oy.abs() < 1e-6);
    }

    #[test]
    fn cover_crops_the_long_axis() {
        // Square image on a portrait viewport: horizontal crop, full height.
        let [sx, sy, ox, oy] = cover_transform((100, 100), Viewport::new(100.0, 200.0));
        assert!((sx - 0.5).abs() < 1e-6);
        assert!((sy - 1.0).abs() < 1e-6);
        assert!((ox - 0.25).abs() < 1e-6);
        assert!(oy.abs() < 1e-6);
    }

    #[test]
    fn bitmap_samples_with_cover_fit_and_edge_clamp() {
        let bitmap = two_tone(100, 100);
        let portrait = Viewport::new(100.0, 200.0);
        // The visible window is the centre half, so uv 0.05 still lands on red.
        assert_eq!(bitmap.sample(Uv::new(0.05, 0.5), portrait), Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(bitmap.sample(Uv::new(0.95, 0.5), portrait), Rgba::opaque(0.0, 0.0, 1.0));
        assert_eq!(bitmap.sample(Uv::new(-3.0, 9.0), portrait), Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(bitmap.sample(Uv::new(f32::NAN, 0.5), portrait), Rgba::opaque(1.0, 0.0, 0.0));
    }

    #[test]
    fn empty_bitmap_samples_transparent() {
        let empty = Bitmap::new("empty", RgbaImage::new(0, 0));
        let viewport = Viewport::new(100.0, 200.0);
        assert_eq!(empty.dimensions(), None);
        assert_eq!(empty.sample(Uv::CENTER, viewport), Rgba::TRANSPARENT);
        assert_eq!(empty.sample(Uv::new(1.0, 1.0), viewport), Rgba::TRANSPARENT);

        let thin = Bitmap::new("thin", RgbaImage::new(4, 0));
        assert_eq!(thin.sample(Uv::new(0.25, 0.5), viewport), Rgba::TRANSPARENT);
    }

    #[test]
    fn open_reports_missing_files() {
        let err = Bitmap::open(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ImageLoadError::Decode { .. }));
    }
}
