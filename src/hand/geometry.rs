//! Pixel-space geometry derived from a single hand's landmarks.
//!
//! [`GeometryExtractor`] is the only stateful piece: it remembers the pixel landmarks of the most
//! recent extraction, which [`GeometryExtractor::fingers_up`] and [`GeometryExtractor::distance`]
//! operate on. Every extraction replaces that list, and an extraction that yields no hand (or
//! fails) leaves it empty, so later queries can never observe a previous frame's hand.

use std::{fmt, ops::Index};

use itertools::Itertools;

use crate::{
    config::DrawStyle,
    error::GeometryError,
    image::{draw, Image, Resolution},
    landmark::{DetectionResult, Hand, LandmarkIdx, PixelLandmark, CONNECTIVITY, NUM_LANDMARKS},
};

/// Axis-aligned bounding box of a hand, in pixels.
///
/// All bounds are inclusive and tight: every landmark lies inside, and each bound is attained by
/// at least one landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    /// Computes the bounding box of `landmarks`, or `None` if there are none.
    pub fn around(landmarks: &[PixelLandmark]) -> Option<Self> {
        let (x_min, x_max) = landmarks.iter().map(|lm| lm.x).minmax().into_option()?;
        let (y_min, y_max) = landmarks.iter().map(|lm| lm.y).minmax().into_option()?;
        Some(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Returns a copy of this box, grown by `padding` pixels in every direction.
    pub fn padded(&self, padding: i32) -> Self {
        Self {
            x_min: self.x_min - padding,
            y_min: self.y_min - padding,
            x_max: self.x_max + padding,
            y_max: self.y_max + padding,
        }
    }

    /// Returns `(x_min, y_min, x_max, y_max)`.
    #[inline]
    pub fn to_tuple(&self) -> (i32, i32, i32, i32) {
        (self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

/// The fingers of a hand, in landmark order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Returns the landmark on the tip of this finger.
    pub fn tip(self) -> LandmarkIdx {
        match self {
            Finger::Thumb => LandmarkIdx::ThumbTip,
            Finger::Index => LandmarkIdx::IndexFingerTip,
            Finger::Middle => LandmarkIdx::MiddleFingerTip,
            Finger::Ring => LandmarkIdx::RingFingerTip,
            Finger::Pinky => LandmarkIdx::PinkyTip,
        }
    }

    /// Returns the joint the fingertip is compared against to decide whether the finger is
    /// extended.
    ///
    /// For the thumb this is the IP joint directly below the tip; for the other fingers it is the
    /// PIP joint, two landmarks below the tip.
    pub fn reference_joint(self) -> LandmarkIdx {
        match self {
            Finger::Thumb => LandmarkIdx::ThumbIp,
            Finger::Index => LandmarkIdx::IndexFingerPip,
            Finger::Middle => LandmarkIdx::MiddleFingerPip,
            Finger::Ring => LandmarkIdx::RingFingerPip,
            Finger::Pinky => LandmarkIdx::PinkyPip,
        }
    }

    fn is_extended(self, tip: PixelLandmark, joint: PixelLandmark) -> bool {
        match self {
            // The thumb extends sideways, towards larger x for a right hand facing the camera.
            Finger::Thumb => tip.x > joint.x,
            // Y points down, so an extended finger has its tip *above* the joint.
            _ => tip.y < joint.y,
        }
    }
}

/// Extended/flexed state of all five fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates([bool; 5]);

impl FingerStates {
    /// Creates finger states from booleans in thumb to pinky order (`true` means extended).
    pub const fn new(states: [bool; 5]) -> Self {
        Self(states)
    }

    #[inline]
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Returns the states in thumb to pinky order.
    #[inline]
    pub fn to_array(&self) -> [bool; 5] {
        self.0
    }

    /// Returns the number of extended fingers.
    pub fn count_extended(&self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Finger, bool)> + '_ {
        Finger::ALL.into_iter().zip(self.0)
    }
}

impl Index<Finger> for FingerStates {
    type Output = bool;

    #[inline]
    fn index(&self, finger: Finger) -> &bool {
        &self.0[finger as usize]
    }
}

/// Formats the states as five digits, `1` for an extended finger and `0` for a flexed one.
impl fmt::Display for FingerStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for up in self.0 {
            f.write_str(if up { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Result of [`GeometryExtractor::distance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    length: f32,
    start: (i32, i32),
    end: (i32, i32),
    midpoint: (i32, i32),
}

impl Distance {
    fn between(start: PixelLandmark, end: PixelLandmark) -> Self {
        let (x1, y1) = start.pos();
        let (x2, y2) = end.pos();
        Self {
            length: ((x2 - x1) as f32).hypot((y2 - y1) as f32),
            start: (x1, y1),
            end: (x2, y2),
            midpoint: ((x1 + x2).div_euclid(2), (y1 + y2).div_euclid(2)),
        }
    }

    /// Returns the Euclidean distance between the two landmarks, in pixels.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    pub fn start(&self) -> (i32, i32) {
        self.start
    }

    #[inline]
    pub fn end(&self) -> (i32, i32) {
        self.end
    }

    /// Returns the midpoint between both landmarks, rounded down to whole pixels.
    #[inline]
    pub fn midpoint(&self) -> (i32, i32) {
        self.midpoint
    }

    /// Draws a line between both landmarks and filled circles at its ends and midpoint.
    pub fn draw(&self, target: &mut Image, style: &DrawStyle) {
        draw::line(target, self.start, self.end)
            .color(style.distance_color)
            .stroke_width(style.distance_thickness);
        for (x, y) in [self.start, self.end, self.midpoint] {
            draw::circle(target, x, y, style.distance_radius)
                .color(style.distance_color)
                .filled();
        }
    }
}

/// Result of [`GeometryExtractor::extract`]: one hand's pixel landmarks and bounding box.
///
/// When the detection result contained no hand, both are empty. Callers have to check for that
/// (see [`HandPosition::is_empty`]) before asking for finger states or distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPosition<'a> {
    landmarks: &'a [PixelLandmark],
    bbox: Option<BoundingBox>,
}

impl<'a> HandPosition<'a> {
    /// Returns the pixel landmarks, indexed by landmark identifier.
    #[inline]
    pub fn landmarks(&self) -> &'a [PixelLandmark] {
        self.landmarks
    }

    #[inline]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, idx: LandmarkIdx) -> Option<PixelLandmark> {
        self.landmarks.get(idx as usize).copied()
    }

    /// Draws a filled circle on every landmark and a padded rectangle around the hand.
    pub fn draw(&self, target: &mut Image, style: &DrawStyle) {
        for lm in self.landmarks {
            draw::circle(target, lm.x, lm.y, style.landmark_radius)
                .color(style.landmark_color)
                .filled();
        }
        if let Some(bbox) = self.bbox {
            let padded = bbox.padded(style.bbox_padding);
            draw::rect(
                target,
                (padded.x_min, padded.y_min),
                (padded.x_max, padded.y_max),
            )
            .color(style.bbox_color)
            .stroke_width(style.bbox_thickness);
        }
    }
}

/// Draws the bones and joints of `hand` onto `target`.
///
/// The hand's normalized landmarks are scaled to the resolution of `target`.
pub fn draw_skeleton(target: &mut Image, hand: &Hand, style: &DrawStyle) {
    let points = hand.pixel_landmarks(target.resolution()).collect::<Vec<_>>();
    for (a, b) in CONNECTIVITY {
        draw::line(target, points[*a as usize].pos(), points[*b as usize].pos())
            .color(style.connection_color)
            .stroke_width(style.skeleton_thickness);
    }
    for lm in &points {
        draw::circle(target, lm.x, lm.y, style.skeleton_thickness)
            .color(style.joint_color)
            .filled();
    }
}

/// Converts normalized hand landmarks to pixel space and derives features from them.
#[derive(Debug, Clone, Default)]
pub struct GeometryExtractor {
    /// Pixel landmarks of the latest extraction, empty if it found no hand.
    landmarks: Vec<PixelLandmark>,
}

impl GeometryExtractor {
    /// Creates an extractor that has not seen any hand yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor whose retained landmarks are the given pixel positions, in landmark
    /// identifier order.
    ///
    /// This is mostly useful for feeding synthetic hands into [`GeometryExtractor::fingers_up`]
    /// and [`GeometryExtractor::distance`]. Fewer than 21 positions are allowed; querying a
    /// missing landmark then fails with [`GeometryError::IndexOutOfRange`].
    pub fn from_positions<I>(positions: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut landmarks = Vec::with_capacity(NUM_LANDMARKS);
        for (i, (x, y)) in positions.into_iter().enumerate() {
            let id = LandmarkIdx::from_index(i)?;
            landmarks.push(PixelLandmark { id, x, y });
        }
        Ok(Self { landmarks })
    }

    /// Extracts the pixel landmarks and bounding box of hand number `hand_index` in `result`.
    ///
    /// Normalized coordinates are scaled by the width and height of `res` and truncated to whole
    /// pixels. The previous extraction's landmarks are discarded in every case.
    ///
    /// If `result` contains no hands at all, an empty [`HandPosition`] is returned, regardless of
    /// `hand_index`. If it does contain hands, but fewer than `hand_index + 1`,
    /// [`GeometryError::IndexOutOfRange`] is returned.
    pub fn extract(
        &mut self,
        result: &DetectionResult,
        hand_index: usize,
        res: Resolution,
    ) -> Result<HandPosition<'_>, GeometryError> {
        self.landmarks.clear();

        if result.is_empty() {
            log::trace!("no hand detected, extraction is empty");
            return Ok(HandPosition {
                landmarks: &self.landmarks,
                bbox: None,
            });
        }

        let hand = result.hand(hand_index)?;
        self.landmarks.extend(hand.pixel_landmarks(res));
        let bbox = BoundingBox::around(&self.landmarks);
        log::trace!("extracted hand {hand_index} at {res}: {bbox:?}");

        Ok(HandPosition {
            landmarks: &self.landmarks,
            bbox,
        })
    }

    /// Returns the retained pixel landmarks of the latest extraction.
    #[inline]
    pub fn landmarks(&self) -> &[PixelLandmark] {
        &self.landmarks
    }

    /// Returns the latest extraction's landmarks and bounding box again.
    pub fn position(&self) -> HandPosition<'_> {
        HandPosition {
            landmarks: &self.landmarks,
            bbox: BoundingBox::around(&self.landmarks),
        }
    }

    /// Forgets the retained landmarks.
    pub fn clear(&mut self) {
        self.landmarks.clear();
    }

    /// Classifies each finger of the last extracted hand as extended or flexed.
    ///
    /// The thumb counts as extended if its tip lies to the right of (has a larger x than) the
    /// thumb's IP joint. Every other finger counts as extended if its tip lies above (has a smaller
    /// y than) the finger's PIP joint. Ties count as flexed. This only gives sensible results for
    /// an upright hand with the palm facing the camera.
    pub fn fingers_up(&self) -> Result<FingerStates, GeometryError> {
        const OP: &str = "fingers_up";

        let mut states = [false; 5];
        for (finger, state) in Finger::ALL.into_iter().zip(&mut states) {
            let tip = self.lookup(finger.tip().into(), OP)?;
            let joint = self.lookup(finger.reference_joint().into(), OP)?;
            *state = finger.is_extended(tip, joint);
        }
        Ok(FingerStates(states))
    }

    /// Measures the distance between landmarks `a` and `b` of the last extracted hand.
    ///
    /// Both identifiers must be in range `0..=20` and present in the retained landmarks.
    pub fn distance(
        &self,
        a: impl Into<usize>,
        b: impl Into<usize>,
    ) -> Result<Distance, GeometryError> {
        const OP: &str = "distance";

        let start = self.lookup(a.into(), OP)?;
        let end = self.lookup(b.into(), OP)?;
        Ok(Distance::between(start, end))
    }

    fn lookup(&self, id: usize, operation: &'static str) -> Result<PixelLandmark, GeometryError> {
        if self.landmarks.is_empty() {
            return Err(GeometryError::stale(operation));
        }
        if id >= NUM_LANDMARKS {
            return Err(GeometryError::landmark_out_of_range(id, NUM_LANDMARKS));
        }
        self.landmarks
            .get(id)
            .copied()
            .ok_or_else(|| GeometryError::landmark_out_of_range(id, self.landmarks.len()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{
        image::Color,
        landmark::{Hand, NormalizedLandmark},
    };

    use super::*;

    use crate::landmark::LandmarkIdx as L;

    fn result_from(points: [(f32, f32); NUM_LANDMARKS]) -> DetectionResult {
        DetectionResult::new(vec![hand_from(points)])
    }

    fn hand_from(points: [(f32, f32); NUM_LANDMARKS]) -> Hand {
        Hand::new(points.map(|(x, y)| NormalizedLandmark::new(x, y, 0.0)))
    }

    /// An upright right hand with every finger stretched out, in pixel coordinates.
    fn open_hand() -> [(i32, i32); NUM_LANDMARKS] {
        let mut pos = [(0, 0); NUM_LANDMARKS];
        pos[L::Wrist as usize] = (100, 200);
        // Thumb goes to the right.
        for (i, lm) in [L::ThumbCmc, L::ThumbMcp, L::ThumbIp, L::ThumbTip]
            .into_iter()
            .enumerate()
        {
            pos[lm as usize] = (120 + 15 * i as i32, 180 - 10 * i as i32);
        }
        // The other fingers go up.
        for (f, base) in [L::IndexFingerMcp, L::MiddleFingerMcp, L::RingFingerMcp, L::PinkyMcp]
            .into_iter()
            .enumerate()
        {
            for joint in 0..4 {
                pos[base as usize + joint] = (110 - 15 * f as i32, 150 - 20 * joint as i32);
            }
        }
        pos
    }

    fn extractor_with(pos: [(i32, i32); NUM_LANDMARKS]) -> GeometryExtractor {
        GeometryExtractor::from_positions(pos).unwrap()
    }

    #[test]
    fn pixel_coordinates() {
        let mut points = [(0.5, 0.25); NUM_LANDMARKS];
        points[0] = (0.0, 0.0);
        points[1] = (1.0, 1.0);
        points[2] = (0.999, 0.001);
        points[3] = (0.75, 0.5);
        // Rounded up to the next pixel by a single-precision product.
        points[5] = (0.3015625, 0.303125);
        points[6] = (0.309375, 0.75);

        let mut ex = GeometryExtractor::new();
        let pos = ex
            .extract(&result_from(points), 0, Resolution::new(640, 480))
            .unwrap();
        let lms = pos.landmarks();
        assert_eq!(lms.len(), NUM_LANDMARKS);
        assert_eq!(lms[0].pos(), (0, 0));
        assert_eq!(lms[1].pos(), (640, 480));
        assert_eq!(lms[2].pos(), (639, 0));
        assert_eq!(lms[3].pos(), (480, 240));
        assert_eq!(lms[4].pos(), (320, 120));
        assert_eq!(lms[5].pos(), (192, 145));
        assert_eq!(lms[6].pos(), (197, 360));
        for (i, lm) in lms.iter().enumerate() {
            assert_eq!(lm.id.index(), i);
        }
        assert_eq!(
            pos.bounding_box().map(|bb| bb.to_tuple()),
            Some((0, 0, 640, 480))
        );
    }

    #[test]
    fn pixel_coordinates_and_bounding_box_random() {
        let mut rng = fastrand::Rng::with_seed(0x4a4d);
        let mut ex = GeometryExtractor::new();
        for _ in 0..500 {
            let (w, h) = (rng.u32(1..4000), rng.u32(1..4000));
            let points = [(); NUM_LANDMARKS].map(|_| (rng.f32(), rng.f32()));

            let pos = ex
                .extract(&result_from(points), 0, Resolution::new(w, h))
                .unwrap();
            for (lm, (x, y)) in pos.landmarks().iter().zip(points) {
                assert_eq!(lm.x, (f64::from(x) * f64::from(w)).floor() as i32);
                assert_eq!(lm.y, (f64::from(y) * f64::from(h)).floor() as i32);
            }

            let bb = pos.bounding_box().unwrap();
            assert!(pos.landmarks().iter().all(|lm| bb.contains(lm.x, lm.y)));
            assert!(pos.landmarks().iter().any(|lm| lm.x == bb.x_min));
            assert!(pos.landmarks().iter().any(|lm| lm.x == bb.x_max));
            assert!(pos.landmarks().iter().any(|lm| lm.y == bb.y_min));
            assert!(pos.landmarks().iter().any(|lm| lm.y == bb.y_max));
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let result = result_from([(0.3, 0.6); NUM_LANDMARKS]);
        let res = Resolution::new(1280, 720);
        let mut ex = GeometryExtractor::new();

        let first = ex.extract(&result, 0, res).unwrap();
        let (first_lms, first_bb) = (first.landmarks().to_vec(), first.bounding_box());
        let second = ex.extract(&result, 0, res).unwrap();
        assert_eq!(second.landmarks(), &first_lms[..]);
        assert_eq!(second.bounding_box(), first_bb);
    }

    #[test]
    fn selects_hand_by_index() {
        let result = DetectionResult::new(vec![
            hand_from([(0.25, 0.25); NUM_LANDMARKS]),
            hand_from([(0.75, 0.5); NUM_LANDMARKS]),
        ]);
        let mut ex = GeometryExtractor::new();
        let pos = ex.extract(&result, 1, Resolution::new(100, 100)).unwrap();
        assert_eq!(pos.get(L::Wrist).unwrap().pos(), (75, 50));

        let err = ex
            .extract(&result, 2, Resolution::new(100, 100))
            .unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn empty_detection() {
        let mut ex = GeometryExtractor::new();
        for hand_index in [0, 5] {
            let pos = ex
                .extract(&DetectionResult::empty(), hand_index, Resolution::VGA)
                .unwrap();
            assert!(pos.is_empty());
            assert_eq!(pos.bounding_box(), None);
        }
    }

    #[test]
    fn empty_detection_discards_previous_hand() {
        let mut ex = GeometryExtractor::new();
        ex.extract(&result_from([(0.5, 0.5); NUM_LANDMARKS]), 0, Resolution::VGA)
            .unwrap();
        assert!(ex.fingers_up().is_ok());

        ex.extract(&DetectionResult::empty(), 0, Resolution::VGA)
            .unwrap();
        assert!(ex.fingers_up().unwrap_err().is_stale());
        assert!(ex.distance(L::ThumbTip, L::IndexFingerTip).unwrap_err().is_stale());
    }

    #[test]
    fn failed_extraction_discards_previous_hand() {
        let result = result_from([(0.5, 0.5); NUM_LANDMARKS]);
        let mut ex = GeometryExtractor::new();
        ex.extract(&result, 0, Resolution::VGA).unwrap();

        let err = ex.extract(&result, 1, Resolution::VGA).unwrap_err();
        assert_eq!(err, GeometryError::hand_out_of_range(1, 1));
        assert!(ex.fingers_up().unwrap_err().is_stale());
    }

    #[test]
    fn queries_before_extraction() {
        let ex = GeometryExtractor::new();
        assert_eq!(
            ex.fingers_up(),
            Err(GeometryError::StalePrecondition {
                operation: "fingers_up"
            })
        );
        assert!(ex.distance(0usize, 1usize).unwrap_err().is_stale());
    }

    #[test]
    fn distance_3_4_5() {
        let mut pos = [(0, 0); NUM_LANDMARKS];
        pos[L::ThumbTip as usize] = (3, 4);
        let ex = extractor_with(pos);

        let d = ex.distance(L::Wrist, L::ThumbTip).unwrap();
        assert_eq!(d.length(), 5.0);
        assert_eq!(d.start(), (0, 0));
        assert_eq!(d.end(), (3, 4));
        assert_eq!(d.midpoint(), (1, 2));
    }

    #[test]
    fn distance_is_symmetric() {
        let mut rng = fastrand::Rng::with_seed(77);
        for _ in 0..100 {
            let pos = [(); NUM_LANDMARKS].map(|_| (rng.i32(-100..2000), rng.i32(-100..2000)));
            let ex = extractor_with(pos);
            let (a, b) = (rng.usize(..NUM_LANDMARKS), rng.usize(..NUM_LANDMARKS));

            let ab = ex.distance(a, b).unwrap();
            let ba = ex.distance(b, a).unwrap();
            assert_eq!(ab.length(), ba.length());
            assert_eq!(ab.midpoint(), ba.midpoint());

            let (dx, dy) = ((pos[b].0 - pos[a].0) as f64, (pos[b].1 - pos[a].1) as f64);
            assert_relative_eq!(ab.length() as f64, dx.hypot(dy), max_relative = 1e-6);
        }
    }

    #[test]
    fn distance_midpoint_rounds_down() {
        let mut pos = [(0, 0); NUM_LANDMARKS];
        pos[1] = (-3, 5);
        let ex = extractor_with(pos);
        assert_eq!(ex.distance(0usize, 1usize).unwrap().midpoint(), (-2, 2));
    }

    #[test]
    fn distance_out_of_range() {
        let ex = extractor_with(open_hand());
        assert_eq!(
            ex.distance(25usize, 0usize),
            Err(GeometryError::landmark_out_of_range(25, 21))
        );
        assert!(ex.distance(L::Wrist, 21usize).unwrap_err().is_out_of_range());

        let short = GeometryExtractor::from_positions([(0, 0); 5]).unwrap();
        assert!(short.distance(0usize, 4usize).is_ok());
        assert_eq!(
            short.distance(0usize, 8usize),
            Err(GeometryError::landmark_out_of_range(8, 5))
        );
        assert!(short.fingers_up().unwrap_err().is_out_of_range());
    }

    #[test]
    fn too_many_positions() {
        let err = GeometryExtractor::from_positions([(0, 0); 22]).unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn open_hand_has_all_fingers_up() {
        let states = extractor_with(open_hand()).fingers_up().unwrap();
        assert_eq!(states.to_array(), [true; 5]);
        assert_eq!(states.count_extended(), 5);
        assert_eq!(states.to_string(), "11111");
    }

    #[test]
    fn finger_tip_against_pip() {
        for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
            let joint_y = open_hand()[finger.reference_joint() as usize].1;

            for (tip_y, extended) in [(joint_y - 1, true), (joint_y, false), (joint_y + 1, false)]
            {
                let mut pos = open_hand();
                pos[finger.tip() as usize].1 = tip_y;
                let states = extractor_with(pos).fingers_up().unwrap();
                assert_eq!(states[finger], extended, "{finger:?} with tip at y={tip_y}");
                for other in Finger::ALL.into_iter().filter(|f| *f != finger) {
                    assert!(states.is_extended(other));
                }
            }
        }
    }

    #[test]
    fn thumb_tip_against_ip() {
        let joint_x = open_hand()[L::ThumbIp as usize].0;
        for (tip_x, extended) in [(joint_x + 1, true), (joint_x, false), (joint_x - 10, false)] {
            let mut pos = open_hand();
            pos[L::ThumbTip as usize].0 = tip_x;
            let states = extractor_with(pos).fingers_up().unwrap();
            assert_eq!(states[Finger::Thumb], extended, "thumb tip at x={tip_x}");
        }
    }

    #[test]
    fn thumb_ignores_vertical_position() {
        let mut pos = open_hand();
        // Tip far below the IP joint, but still to its right.
        pos[L::ThumbTip as usize].1 = 400;
        assert!(extractor_with(pos).fingers_up().unwrap()[Finger::Thumb]);
    }

    #[test]
    fn fist() {
        let mut pos = open_hand();
        for finger in Finger::ALL {
            let (jx, jy) = pos[finger.reference_joint() as usize];
            pos[finger.tip() as usize] = (jx - 5, jy + 5);
        }
        let states = extractor_with(pos).fingers_up().unwrap();
        assert_eq!(states, FingerStates::new([false; 5]));
        assert_eq!(states.to_string(), "00000");
    }

    #[test]
    fn draw_position() {
        let points = [(); NUM_LANDMARKS].map(|_| (0.5, 0.5));
        let mut ex = GeometryExtractor::new();
        let pos = ex
            .extract(&result_from(points), 0, Resolution::new(200, 200))
            .unwrap();

        let style = DrawStyle::default();
        let mut image = Image::filled((200, 200).into(), Color::WHITE);
        pos.draw(&mut image, &style);
        assert_eq!(image.get(100, 100), style.landmark_color);
        assert_eq!(image.get(80, 80), style.bbox_color);
        assert_eq!(image.get(120, 120), style.bbox_color);
        assert_eq!(image.get(10, 10), Color::WHITE);
    }

    #[test]
    fn draw_distance() {
        let mut pos = [(10, 50); NUM_LANDMARKS];
        pos[L::IndexFingerTip as usize] = (90, 50);
        let d = extractor_with(pos)
            .distance(L::ThumbTip, L::IndexFingerTip)
            .unwrap();

        let style = DrawStyle::default();
        let mut image = Image::filled((100, 100).into(), Color::WHITE);
        d.draw(&mut image, &style);
        for x in [10, 30, 50, 70, 90] {
            assert_eq!(image.get(x, 50), style.distance_color);
        }
        assert_eq!(image.get(50, 95), Color::WHITE);
    }
}
