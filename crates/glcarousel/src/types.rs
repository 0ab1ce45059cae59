use std::fmt;

/// Size of the drawable surface in logical pixels.
///
/// Read once when the carousel is constructed; the engine does not react to
/// resizes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel dimensions rounded up, for rasterising into a bitmap.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.ceil().max(1.0) as u32, self.height.ceil().max(1.0) as u32)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Normalised surface coordinate, `(0, 0)` top-left and `(1, 1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Uv {
    pub x: f32,
    pub y: f32,
}

impl Uv {
    pub const CENTER: Uv = Uv { x: 0.5, y: 0.5 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Straight (non-premultiplied) RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_rgba8(pixel: [u8; 4]) -> Self {
        let [r, g, b, a] = pixel;
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let quantise = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantise(self.r),
            quantise(self.g),
            quantise(self.b),
            quantise(self.a),
        ]
    }

    /// Linear interpolation, GLSL `mix` semantics.
    pub fn mix(self, other: Rgba, t: f32) -> Rgba {
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Largest per-channel absolute difference.
    pub fn distance(self, other: Rgba) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
            .max((self.a - other.a).abs())
    }
}

/// Which way a progress channel reveals content.
///
/// `Forward` grows with rightward drags and reveals the previous image;
/// committing it decrements the offset. `Backward` grows with leftward drags
/// and reveals the next image; committing it increments the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Forward,
    Backward,
}

impl SwipeDirection {
    /// Multiplier applied to raw horizontal deltas and velocities.
    pub fn sign(self) -> f32 {
        match self {
            SwipeDirection::Forward => 1.0,
            SwipeDirection::Backward => -1.0,
        }
    }

    /// Offset delta applied when this channel commits.
    pub fn offset_step(self) -> i64 {
        match self {
            SwipeDirection::Forward => -1,
            SwipeDirection::Backward => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            SwipeDirection::Forward => SwipeDirection::Backward,
            SwipeDirection::Backward => SwipeDirection::Forward,
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwipeDirection::Forward => f.write_str("forward"),
            SwipeDirection::Backward => f.write_str("backward"),
        }
    }
}
