use crate::{error::Error, point::Point};
use num_traits::ToPrimitive;

/// The 33 pose landmarks, in the oracle's wire order.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
pub(crate) enum LandmarkKind {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

pub(crate) const NUM_LANDMARKS: usize = 33;

impl LandmarkKind {
    pub(crate) fn idx(self) -> Result<usize, Error> {
        self.to_usize().ok_or(Error::LandmarkKindToUSize(self))
    }
}

/// One detected landmark in normalized image coordinates.
#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct Keypoint {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) z: f32,
    pub(crate) visibility: f32,
}

pub(crate) type Landmarks = [Keypoint; NUM_LANDMARKS];

pub(crate) const NUM_ANGLES: usize = 8;

/// The 8 measured angles; NaN marks an angle whose triple was not visible.
pub(crate) type AngleSet = [f32; NUM_ANGLES];

pub(crate) mod constants {
    use crate::pose::LandmarkKind::{self, *};

    /// Joint triples (endpoint, vertex, endpoint) measured per frame, in
    /// angle_1..angle_8 column order.
    pub(crate) const ANGLE_TRIPLES: [(LandmarkKind, LandmarkKind, LandmarkKind);
        super::NUM_ANGLES] = [
        (RightShoulder, RightElbow, RightWrist),
        (LeftShoulder, LeftElbow, LeftWrist),
        (RightElbow, RightShoulder, RightHip),
        (LeftElbow, LeftShoulder, LeftHip),
        (RightShoulder, RightHip, RightKnee),
        (LeftShoulder, LeftHip, LeftKnee),
        (RightHip, RightKnee, RightAnkle),
        (LeftHip, LeftKnee, LeftAnkle),
    ];
}

/// Landmarks that passed the visibility gate, keyed by [`LandmarkKind`].
#[derive(Debug, Clone)]
pub(crate) struct VisiblePoints([Option<Point>; NUM_LANDMARKS]);

impl VisiblePoints {
    /// Keep the `(x, y)` of every landmark whose visibility exceeds
    /// `threshold`; everything else maps to missing.
    pub(crate) fn gate(landmarks: &Landmarks, threshold: f32) -> Result<Self, Error> {
        let mut points = [None; NUM_LANDMARKS];
        for (slot, keypoint) in points.iter_mut().zip(landmarks.iter()) {
            if keypoint.visibility > threshold {
                *slot = Some(Point::new(keypoint.x, keypoint.y)?);
            }
        }
        Ok(Self(points))
    }

    pub(crate) fn require(&self, kind: LandmarkKind) -> Result<Point, Error> {
        self.0[kind.idx()?].ok_or(Error::MissingKeypoint(kind))
    }
}
