//! Interface to the external hand landmark model.

use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::{
    image::{ChannelOrder, Resolution},
    landmark::DetectionResult,
};

/// A borrowed, tightly packed frame handed to a [`LandmarkProvider`].
#[derive(Clone, Copy)]
pub struct PixelBuffer<'a> {
    resolution: Resolution,
    order: ChannelOrder,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wraps `data`, checking that it holds exactly one `order` pixel per pixel of `resolution`.
    pub fn new(
        resolution: Resolution,
        order: ChannelOrder,
        data: &'a [u8],
    ) -> anyhow::Result<Self> {
        let expected = resolution.num_pixels() as usize * order.bytes_per_pixel();
        ensure!(
            data.len() == expected,
            "{order:?} pixel buffer for {resolution} frame has {} bytes (expected {expected})",
            data.len(),
        );
        Ok(Self {
            resolution,
            order,
            data,
        })
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl std::fmt::Debug for PixelBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?} PixelBuffer", self.resolution, self.order)
    }
}

/// A hand detection and landmark regression model.
///
/// Implementations receive whole frames and report every hand they found, with landmark
/// coordinates normalized to the frame size.
pub trait LandmarkProvider {
    /// The channel order the provider expects its input frames in.
    ///
    /// Most models are trained on RGB, while most capture devices produce BGR; callers convert
    /// frames to this order before calling [`LandmarkProvider::detect`].
    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Rgb
    }

    /// Detects hands in `frame`.
    ///
    /// Finding no hand is not an error and yields an empty [`DetectionResult`].
    fn detect(&mut self, frame: PixelBuffer<'_>) -> anyhow::Result<DetectionResult>;
}

impl<P: LandmarkProvider + ?Sized> LandmarkProvider for &mut P {
    fn channel_order(&self) -> ChannelOrder {
        (**self).channel_order()
    }

    fn detect(&mut self, frame: PixelBuffer<'_>) -> anyhow::Result<DetectionResult> {
        (**self).detect(frame)
    }
}

impl<P: LandmarkProvider + ?Sized> LandmarkProvider for Box<P> {
    fn channel_order(&self) -> ChannelOrder {
        (**self).channel_order()
    }

    fn detect(&mut self, frame: PixelBuffer<'_>) -> anyhow::Result<DetectionResult> {
        (**self).detect(frame)
    }
}

/// Detection options understood by landmark providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Treat every frame as unrelated to the previous one, so tracking never kicks in.
    pub static_image_mode: bool,
    /// Maximum number of hands to report per frame.
    pub max_hands: usize,
    /// Minimum score for a hand to be reported when it is detected from scratch.
    pub min_detection_confidence: f32,
    /// Minimum score for a hand to be reported while hands are being tracked across frames.
    pub min_tracking_confidence: f32,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            max_hands: 2,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl ProviderOptions {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.max_hands > 0, "`max_hands` must be at least 1");
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "`{name}` must be between 0.0 and 1.0 (got {value})"
            );
        }
        Ok(())
    }

    /// Returns the score threshold to apply to the next frame.
    pub(crate) fn threshold(&self, tracking: bool) -> f32 {
        if tracking && !self.static_image_mode {
            self.min_tracking_confidence
        } else {
            self.min_detection_confidence
        }
    }
}
