use crate::{
    angle::joint_angle,
    config::PipelineConfig,
    dataset::{Fragment, FrameRecord},
    detect::PoseDetector,
    error::{Error, FrameError},
    point::Point,
    pose::{constants::ANGLE_TRIPLES, AngleSet, LandmarkKind, Landmarks, VisiblePoints, NUM_ANGLES, NUM_LANDMARKS},
};
use std::path::Path;

/// Process one image: decode it, ask the oracle for landmarks, and turn them
/// into a 33-row fragment. Every failure is contained here; the caller only
/// sees which [`FrameError`] kind it was.
pub(crate) fn extract<D: PoseDetector>(
    detector: &mut D,
    config: &PipelineConfig,
    path: &Path,
    frame: usize,
) -> Result<Fragment, FrameError> {
    let landmarks = detect_frame(detector, path).map_err(FrameError::Processing)?;
    let landmarks = match landmarks {
        Some(landmarks) => landmarks,
        None => return Err(FrameError::NoDetection),
    };
    build_fragment(&landmarks, config.visibility_threshold, frame)
        .map_err(FrameError::Processing)
}

fn detect_frame<D: PoseDetector>(
    detector: &mut D,
    path: &Path,
) -> Result<Option<Landmarks>, Error> {
    let image = image::open(path)
        .map_err(|e| Error::ReadImage(e, path.to_owned()))?
        .to_rgb8();
    detector.detect(&image)
}

fn build_fragment(
    landmarks: &Landmarks,
    visibility_threshold: f32,
    frame: usize,
) -> Result<Fragment, Error> {
    let visible = VisiblePoints::gate(landmarks, visibility_threshold)?;
    let angles = measure_angles(&visible)?;

    let mut records = Vec::with_capacity(NUM_LANDMARKS);
    for (id, keypoint) in landmarks.iter().enumerate() {
        records.push(FrameRecord {
            frame,
            id,
            x: keypoint.x,
            y: keypoint.y,
            z: keypoint.z,
            vis: keypoint.visibility,
            angles,
        });
    }
    Ok(records)
}

/// Compute the 8 angles from the gated map. A triple with any missing
/// endpoint yields NaN; the column itself is never dropped.
fn measure_angles(visible: &VisiblePoints) -> Result<AngleSet, Error> {
    let mut angles = [f32::NAN; NUM_ANGLES];
    for (slot, &(a, b, c)) in angles.iter_mut().zip(ANGLE_TRIPLES.iter()) {
        if let (Some(a), Some(b), Some(c)) =
            (resolve(visible, a)?, resolve(visible, b)?, resolve(visible, c)?)
        {
            *slot = joint_angle(a, b, c);
        }
    }
    Ok(angles)
}

fn resolve(visible: &VisiblePoints, kind: LandmarkKind) -> Result<Option<Point>, Error> {
    match visible.require(kind) {
        Ok(point) => Ok(Some(point)),
        Err(Error::MissingKeypoint(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
