//! Frame-by-frame hand tracking on top of a [`LandmarkProvider`].

use crate::{
    config::DrawStyle,
    error::GeometryError,
    image::Image,
    landmark::DetectionResult,
    timer::Timer,
};

use super::{
    geometry::{self, Distance, FingerStates, GeometryExtractor, HandPosition},
    provider::{LandmarkProvider, PixelBuffer},
};

/// Runs a [`LandmarkProvider`] on frames and extracts hand geometry from its results.
///
/// The tracker retains the detection result of the latest [`HandTracker::find_hands`] call and
/// the pixel landmarks of the latest [`HandTracker::find_position`] call. Both are replaced on
/// every call, so finger states and distances always refer to the most recent frame.
pub struct HandTracker<P> {
    provider: P,
    extractor: GeometryExtractor,
    result: Option<DetectionResult>,
    style: DrawStyle,
    t_convert: Timer,
    t_detect: Timer,
}

impl<P: LandmarkProvider> HandTracker<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            extractor: GeometryExtractor::new(),
            result: None,
            style: DrawStyle::default(),
            t_convert: Timer::new("convert"),
            t_detect: Timer::new("detect"),
        }
    }

    /// Sets the colors and sizes used by the drawing variants of the tracker's methods.
    pub fn with_style(mut self, style: DrawStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Returns the detection result of the latest successful [`HandTracker::find_hands`] call.
    pub fn detection(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub fn extractor(&self) -> &GeometryExtractor {
        &self.extractor
    }

    /// Runs the provider on `frame`.
    ///
    /// If `draw` is `true`, the skeleton of every detected hand is drawn onto `frame` afterwards.
    ///
    /// The previous detection result and extracted landmarks are discarded, even if the provider
    /// fails.
    pub fn find_hands(
        &mut self,
        frame: &mut Image,
        draw: bool,
    ) -> anyhow::Result<&DetectionResult> {
        self.result = None;
        self.extractor.clear();

        let order = self.provider.channel_order();
        let data = self.t_convert.time(|| frame.to_raw(order));
        let buf = PixelBuffer::new(frame.resolution(), order, &data)?;
        let result = self.t_detect.time(|| self.provider.detect(buf))?;
        log::trace!("{} hands in {frame:?}", result.len());

        if draw {
            for hand in result.hands() {
                geometry::draw_skeleton(frame, hand, &self.style);
            }
        }

        Ok(&*self.result.insert(result))
    }

    /// Extracts the pixel landmarks and bounding box of hand `hand_index` from the latest
    /// detection result, scaled to the size of `frame`.
    ///
    /// If `draw` is `true`, the landmarks and the padded bounding box are drawn onto `frame`.
    /// When no hand was detected, an empty [`HandPosition`] is returned and nothing is drawn.
    pub fn find_position(
        &mut self,
        frame: &mut Image,
        hand_index: usize,
        draw: bool,
    ) -> Result<HandPosition<'_>, GeometryError> {
        let result = self
            .result
            .as_ref()
            .ok_or_else(|| GeometryError::stale("find_position"))?;
        let position = self
            .extractor
            .extract(result, hand_index, frame.resolution())?;
        if draw {
            position.draw(frame, &self.style);
        }
        Ok(position)
    }

    /// Classifies the fingers of the hand extracted by the latest
    /// [`HandTracker::find_position`] call.
    pub fn fingers_up(&self) -> Result<FingerStates, GeometryError> {
        self.extractor.fingers_up()
    }

    /// Measures the distance between two landmarks of the hand extracted by the latest
    /// [`HandTracker::find_position`] call, optionally drawing it onto `frame`.
    pub fn distance(
        &self,
        a: impl Into<usize>,
        b: impl Into<usize>,
        frame: &mut Image,
        draw: bool,
    ) -> Result<Distance, GeometryError> {
        let distance = self.extractor.distance(a, b)?;
        if draw {
            distance.draw(frame, &self.style);
        }
        Ok(distance)
    }

    pub fn timers(&self) -> impl IntoIterator<Item = &Timer> + '_ {
        [&self.t_convert, &self.t_detect]
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use crate::{
        image::{ChannelOrder, Color, Resolution},
        landmark::{Hand, LandmarkIdx, NormalizedLandmark, NUM_LANDMARKS},
    };

    use super::*;

    /// Returns the same result for every frame, or fails if there is none.
    struct Fixed(Option<DetectionResult>);

    impl LandmarkProvider for Fixed {
        fn detect(&mut self, frame: PixelBuffer<'_>) -> anyhow::Result<DetectionResult> {
            assert_eq!(frame.channel_order(), ChannelOrder::Rgb);
            match &self.0 {
                Some(result) => Ok(result.clone()),
                None => bail!("provider failure"),
            }
        }
    }

    fn centered_hand() -> DetectionResult {
        let mut landmarks = [NormalizedLandmark::new(0.5, 0.5, 0.0); NUM_LANDMARKS];
        landmarks[LandmarkIdx::IndexFingerTip as usize] = NormalizedLandmark::new(0.8, 0.5, 0.0);
        DetectionResult::new(vec![Hand::new(landmarks)])
    }

    fn frame() -> Image {
        Image::filled(Resolution::new(100, 100), Color::WHITE)
    }

    #[test]
    fn find_position_requires_detection() {
        let mut tracker = HandTracker::new(Fixed(Some(centered_hand())));
        let err = tracker.find_position(&mut frame(), 0, false).unwrap_err();
        assert_eq!(err, GeometryError::stale("find_position"));
        assert!(tracker.fingers_up().unwrap_err().is_stale());
    }

    #[test]
    fn tracks_frame() {
        let mut tracker = HandTracker::new(Fixed(Some(centered_hand())));
        let mut frame = frame();

        assert_eq!(tracker.find_hands(&mut frame, false).unwrap().len(), 1);
        let position = tracker.find_position(&mut frame, 0, false).unwrap();
        assert_eq!(position.get(LandmarkIdx::Wrist).unwrap().pos(), (50, 50));
        assert_eq!(
            position.bounding_box().unwrap().to_tuple(),
            (50, 50, 80, 50)
        );

        let d = tracker
            .distance(LandmarkIdx::Wrist, LandmarkIdx::IndexFingerTip, &mut frame, false)
            .unwrap();
        assert_eq!(d.length(), 30.0);
        assert!(frame.data().iter().all(|&b| b == 255));
    }

    #[test]
    fn draws_when_asked() {
        let mut tracker = HandTracker::new(Fixed(Some(centered_hand())));
        let mut frame = frame();
        tracker.find_hands(&mut frame, true).unwrap();
        assert_eq!(frame.get(50, 50), tracker.style().joint_color);
        assert_eq!(frame.get(65, 50), tracker.style().connection_color);

        tracker.find_position(&mut frame, 0, true).unwrap();
        assert_eq!(frame.get(50, 50), tracker.style().landmark_color);
        assert_eq!(frame.get(30, 30), tracker.style().bbox_color);

        tracker.distance(0usize, 8usize, &mut frame, true).unwrap();
        assert_eq!(frame.get(65, 50), tracker.style().distance_color);
    }

    #[test]
    fn empty_frame_invalidates_previous_hand() {
        let mut tracker = HandTracker::new(Fixed(Some(centered_hand())));
        tracker.find_hands(&mut frame(), false).unwrap();
        tracker.find_position(&mut frame(), 0, false).unwrap();
        assert!(tracker.fingers_up().is_ok());

        tracker.provider_mut().0 = Some(DetectionResult::empty());
        tracker.find_hands(&mut frame(), false).unwrap();
        assert!(tracker.fingers_up().unwrap_err().is_stale());
        let position = tracker.find_position(&mut frame(), 3, true).unwrap();
        assert!(position.is_empty());
        assert!(tracker.fingers_up().unwrap_err().is_stale());
    }

    #[test]
    fn provider_failure_invalidates_previous_result() {
        let mut tracker = HandTracker::new(Fixed(Some(centered_hand())));
        tracker.find_hands(&mut frame(), false).unwrap();
        tracker.find_position(&mut frame(), 0, false).unwrap();

        tracker.provider_mut().0 = None;
        let err = tracker.find_hands(&mut frame(), false).unwrap_err();
        assert_eq!(err.to_string(), "provider failure");
        assert!(tracker.detection().is_none());
        assert!(tracker.fingers_up().unwrap_err().is_stale());
        assert!(tracker
            .find_position(&mut frame(), 0, false)
            .unwrap_err()
            .is_stale());
    }

    #[test]
    fn hand_index_out_of_range() {
        let mut tracker = HandTracker::new(Fixed(Some(centered_hand())));
        tracker.find_hands(&mut frame(), false).unwrap();
        let err = tracker.find_position(&mut frame(), 1, false).unwrap_err();
        assert_eq!(err, GeometryError::hand_out_of_range(1, 1));
    }
}
