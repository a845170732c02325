//! Image manipulation.
//!
//! This module provides:
//!
//! - The [`Image`] type, an owned RGBA image that frames are read into and overlays are drawn on.
//! - [`ChannelOrder`], used to convert to and from the packed pixel layouts expected by cameras
//!   and landmark providers.
//! - A variety of [`draw`] functions to quickly visualize landmarks and derived geometry.

pub mod draw;
mod resolution;


use std::{fmt, path::Path};

use anyhow::{bail, ensure, Context};
use embedded_graphics::{pixelcolor::raw::RawU32, prelude::PixelColor};
use image::{ImageBuffer, Rgba, RgbaImage};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub use resolution::Resolution;

#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => bail!(
                "invalid image path '{}' (must have one of the supported extensions)",
                path.display()
            ),
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Returns whether `path` has an extension that [`Image::load`] understands.
pub fn is_supported_path(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

/// Byte order of the color channels in a packed 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
    Rgba,
    Bgra,
}

impl ChannelOrder {
    /// Returns the number of bytes each pixel occupies in this layout.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ChannelOrder::Rgb | ChannelOrder::Bgr => 3,
            ChannelOrder::Rgba | ChannelOrder::Bgra => 4,
        }
    }

    fn to_rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            ChannelOrder::Rgb => [px[0], px[1], px[2], 255],
            ChannelOrder::Bgr => [px[2], px[1], px[0], 255],
            ChannelOrder::Rgba => [px[0], px[1], px[2], px[3]],
            ChannelOrder::Bgra => [px[2], px[1], px[0], px[3]],
        }
    }

    fn write_from_rgba(self, [r, g, b, a]: [u8; 4], out: &mut Vec<u8>) {
        match self {
            ChannelOrder::Rgb => out.extend_from_slice(&[r, g, b]),
            ChannelOrder::Bgr => out.extend_from_slice(&[b, g, r]),
            ChannelOrder::Rgba => out.extend_from_slice(&[r, g, b, a]),
            ChannelOrder::Bgra => out.extend_from_slice(&[b, g, r, a]),
        }
    }
}

/// An 8-bit sRGB image with alpha channel.
#[derive(Clone)]
pub struct Image {
    pub(crate) buf: RgbaImage,
}

impl Image {
    /// Loads an image from the filesystem.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let format = ImageFormat::from_path(path)?;
        let data =
            std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
        let buf = image::load_from_memory_with_format(&data, format.to_image_format())
            .with_context(|| format!("failed to decode '{}'", path.display()))?
            .to_rgba8();
        Ok(Self { buf })
    }

    /// Saves an image to the file system.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.save_impl(path.as_ref())
    }

    fn save_impl(&self, path: &Path) -> anyhow::Result<()> {
        match ImageFormat::from_path(path)? {
            // JPEG has no alpha channel.
            ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(self.buf.clone())
                .to_rgb8()
                .save(path)?,
            ImageFormat::Png => self.buf.save(path)?,
        }
        Ok(())
    }

    /// Creates an image of the given size with every pixel set to `color`.
    pub fn filled(res: Resolution, color: Color) -> Self {
        Self {
            buf: ImageBuffer::from_pixel(res.width(), res.height(), Rgba(color.0)),
        }
    }

    /// Creates an image from a tightly packed pixel buffer with the given channel order.
    ///
    /// Fails if `buf` does not contain exactly one pixel per pixel of `res`.
    pub fn from_raw(res: Resolution, order: ChannelOrder, buf: &[u8]) -> anyhow::Result<Self> {
        let bpp = order.bytes_per_pixel();
        let expected_size = res.num_pixels() as usize * bpp;
        ensure!(
            expected_size == buf.len(),
            "incorrect buffer size {} for {} {:?} image (expected {} bytes)",
            buf.len(),
            res,
            order,
            expected_size,
        );

        let data = buf
            .chunks_exact(bpp)
            .flat_map(|px| order.to_rgba(px))
            .collect::<Vec<_>>();
        let buf = ImageBuffer::from_vec(res.width(), res.height(), data)
            .context("buffer size does not match image resolution")?;
        Ok(Self { buf })
    }

    /// Copies the pixel data into a new, tightly packed buffer with the given channel order.
    pub fn to_raw(&self, order: ChannelOrder) -> Vec<u8> {
        if order == ChannelOrder::Rgba {
            return self.buf.as_raw().clone();
        }

        let len = self.resolution().num_pixels() as usize * order.bytes_per_pixel();
        let mut out = Vec::with_capacity(len);
        for px in self.buf.pixels() {
            order.write_from_rgba(px.0, &mut out);
        }
        out
    }

    /// Returns the width of this image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the size of this image.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf[(x, y)].0)
    }

    /// Sets the image color at the given pixel coordinates.
    ///
    /// Coordinates outside of the image are ignored.
    pub(crate) fn set(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.buf[(x as u32, y as u32)] = Rgba(color.0);
        }
    }

    /// Mirrors the image along the vertical axis.
    pub fn flip_horizontal_in_place(&mut self) {
        image::imageops::flip_horizontal_in_place(&mut self.buf);
    }

    /// Returns the raw RGBA8 data of this image.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.buf.as_raw()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Image", self.width(), self.height())
    }
}

/// An 8-bit RGBA color.
///
/// Colors are always in the sRGB color space and use non-premultiplied alpha.
///
/// In configuration files, colors are written as `"#rrggbb"` or `"#rrggbbaa"` strings.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Color(pub(crate) [u8; 4]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    pub const BLUE: Self = Self([0, 0, 255, 255]);
    pub const YELLOW: Self = Self([255, 255, 0, 255]);
    pub const MAGENTA: Self = Self([255, 0, 255, 255]);
    pub const CYAN: Self = Self([0, 255, 255, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Parses a `#rrggbb` or `#rrggbbaa` hex string (the `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }

        let mut color = [255; 4];
        for (i, out) in color.iter_mut().enumerate().take(hex.len() / 2) {
            *out = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(color))
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    pub fn with_alpha(mut self, a: u8) -> Color {
        self.0[3] = a;
        self
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a(),
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let hex = if self.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            format!("{:?}", self)
        };
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid color '{s}' (expected `#rrggbb` or `#rrggbbaa`)"
            ))
        })
    }
}

impl PixelColor for Color {
    type Raw = RawU32;
}
