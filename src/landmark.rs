//! Hand landmark data as delivered by a landmark provider.

use serde::{Deserialize, Serialize};

use crate::{error::GeometryError, image::Resolution};

/// Number of landmarks in a hand skeleton.
pub const NUM_LANDMARKS: usize = 21;

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkIdx {
    /// All landmarks, in identifier order.
    pub const ALL: [LandmarkIdx; NUM_LANDMARKS] = {
        use LandmarkIdx::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };

    /// Returns the landmark with identifier `index`.
    ///
    /// Fails with [`GeometryError::IndexOutOfRange`] for identifiers above 20.
    pub fn from_index(index: usize) -> Result<Self, GeometryError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| GeometryError::landmark_out_of_range(index, NUM_LANDMARKS))
    }

    /// Returns the numeric identifier of this landmark (0 to 20).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<LandmarkIdx> for usize {
    #[inline]
    fn from(idx: LandmarkIdx) -> usize {
        idx as usize
    }
}

impl TryFrom<usize> for LandmarkIdx {
    type Error = GeometryError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

/// Pairs of landmarks that are connected by bones (or the palm outline).
pub const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// A landmark position as returned by the provider.
///
/// `x` and `y` are normalized to the frame width and height. `z` is the depth relative to the
/// wrist, in roughly the same scale as `x`; it is passed through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl NormalizedLandmark {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

fn full_confidence() -> f32 {
    1.0
}

/// A single detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    landmarks: [NormalizedLandmark; NUM_LANDMARKS],
    #[serde(default)]
    handedness: Option<Handedness>,
    #[serde(default = "full_confidence")]
    score: f32,
}

impl Hand {
    /// Creates a hand from its 21 landmarks, in identifier order.
    ///
    /// The hand starts out with unknown handedness and a score of 1.0.
    pub fn new(landmarks: [NormalizedLandmark; NUM_LANDMARKS]) -> Self {
        Self {
            landmarks,
            handedness: None,
            score: full_confidence(),
        }
    }

    /// Sets the provider's confidence that this is a hand (0.0 to 1.0).
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    #[inline]
    pub fn landmarks(&self) -> &[NormalizedLandmark; NUM_LANDMARKS] {
        &self.landmarks
    }

    #[inline]
    pub fn landmark(&self, idx: LandmarkIdx) -> NormalizedLandmark {
        self.landmarks[idx as usize]
    }

    #[inline]
    pub fn handedness(&self) -> Option<Handedness> {
        self.handedness
    }

    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns the landmarks scaled to pixel coordinates of a frame of size `res`.
    pub fn pixel_landmarks(&self, res: Resolution) -> impl Iterator<Item = PixelLandmark> + '_ {
        LandmarkIdx::ALL
            .into_iter()
            .zip(self.landmarks.iter())
            .map(move |(id, lm)| {
                let (x, y) = res.to_pixel(lm.x, lm.y);
                PixelLandmark { id, x, y }
            })
    }
}

/// The hands found in a single frame.
///
/// Hands are kept in the order the provider reported them in. The result may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    hands: Vec<Hand>,
}

impl DetectionResult {
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    /// Creates a result without any detected hands.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Returns the hand at `index`, failing with [`GeometryError::IndexOutOfRange`] if there is no
    /// such hand.
    pub fn hand(&self, index: usize) -> Result<&Hand, GeometryError> {
        self.hands
            .get(index)
            .ok_or_else(|| GeometryError::hand_out_of_range(index, self.hands.len()))
    }

    /// Keeps only the hands for which `keep` returns `true`, then drops all but the first
    /// `max_hands`.
    pub(crate) fn retain_first(&mut self, max_hands: usize, keep: impl FnMut(&Hand) -> bool) {
        self.hands.retain(keep);
        self.hands.truncate(max_hands);
    }
}

/// A landmark mapped to integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLandmark {
    pub id: LandmarkIdx,
    pub x: i32,
    pub y: i32,
}

impl PixelLandmark {
    #[inline]
    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
