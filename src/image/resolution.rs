//! Types for representing image resolutions.

use std::fmt;

/// Resolution (`width x height`) of an image or camera frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// VGA resolution: `640x480`, the default capture size of most webcams.
    pub const VGA: Self = Self {
        width: 640,
        height: 480,
    };

    /// Creates a new [`Resolution`] of `width x height`.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the width of this [`Resolution`].
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this [`Resolution`].
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn num_pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Maps a normalized coordinate (`0.0..=1.0` on both axes) to integer pixel coordinates.
    ///
    /// The scaled coordinates are truncated, not rounded, so `1.0` maps to `width`/`height`
    /// (one past the last pixel) and anything in `[0.0, 1.0 / width)` maps to column 0.
    ///
    /// The product is computed in `f64`, where it is exact; an `f32` product can round up to the
    /// next integer before truncation.
    #[inline]
    pub fn to_pixel(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (f64::from(x) * f64::from(self.width)) as i32,
            (f64::from(y) * f64::from(self.height)) as i32,
        )
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<(u32, u32)> for Resolution {
    #[inline]
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}
