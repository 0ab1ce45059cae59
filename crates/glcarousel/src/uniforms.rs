use bytemuck::{Pod, Zeroable};

use crate::source::{cover_transform, ImageSource};
use crate::types::Viewport;

/// Texture slots in the composed program, in binding order.
pub const TEXTURE_SLOTS: [&str; 3] = ["previous", "current", "next"];

/// std140 uniform block for the composed transition program.
///
/// Layout must match `CarouselParams` in [`crate::compile`]:
/// `vec2 resolution; float progress_forward; float progress_backward;
/// vec4 cover[3];`
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositionUniforms {
    pub resolution: [f32; 2],
    pub progress_forward: f32,
    pub progress_backward: f32,
    /// Per-texture cover-fit transform `(scale.xy, offset.xy)`.
    pub cover: [[f32; 4]; 3],
}

unsafe impl Zeroable for CompositionUniforms {}
unsafe impl Pod for CompositionUniforms {}

const IDENTITY_COVER: [f32; 4] = [1.0, 1.0, 0.0, 0.0];

impl CompositionUniforms {
    pub fn new(resolution: Viewport) -> Self {
        Self {
            resolution: [resolution.width, resolution.height],
            progress_forward: 0.0,
            progress_backward: 0.0,
            cover: [IDENTITY_COVER; 3],
        }
    }

    pub fn set_progress(&mut self, forward: f32, backward: f32) {
        self.progress_forward = forward;
        self.progress_backward = backward;
    }

    /// Fills the cover transform for each slot from the image's native size.
    pub fn set_textures(&mut self, images: [&dyn ImageSource; 3]) {
        let viewport = Viewport::new(self.resolution[0], self.resolution[1]);
        for (slot, image) in self.cover.iter_mut().zip(images) {
            *slot = image
                .dimensions()
                .map(|size| cover_transform(size, viewport))
                .unwrap_or(IDENTITY_COVER);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Bitmap, SolidColor};
    use crate::types::Rgba;
    use image::RgbaImage;

    #[test]
    fn block_is_std140_sized() {
        assert_eq!(std::mem::size_of::<CompositionUniforms>(), 64);
        let uniforms = CompositionUniforms::new(Viewport::new(640.0, 480.0));
        assert_eq!(uniforms.as_bytes().len(), 64);
    }

    #[test]
    fn progress_lands_after_resolution() {
        let mut uniforms = CompositionUniforms::new(Viewport::new(2.0, 4.0));
        uniforms.set_progress(0.25, 0.75);
        let floats: &[f32] = bytemuck::cast_slice(uniforms.as_bytes());
        assert_eq!(&floats[..4], &[2.0, 4.0, 0.25, 0.75]);
    }

    #[test]
    fn cover_slots_follow_image_sizes() {
        let mut uniforms = CompositionUniforms::new(Viewport::new(100.0, 200.0));
        let square = Bitmap::new("square", RgbaImage::new(50, 50));
        let flat = SolidColor::new("flat", Rgba::WHITE);
        uniforms.set_textures([&square, &flat, &square]);
        assert_eq!(uniforms.cover[1], IDENTITY_COVER);
        assert!((uniforms.cover[0][0] - 0.5).abs() < 1e-6);
        assert!((uniforms.cover[2][2] - 0.25).abs() < 1e-6);
    }
}
