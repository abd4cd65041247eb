use crate::{
    config::DetectorConfig,
    error::Error,
    pose::{Keypoint, Landmarks, NUM_LANDMARKS},
};
use image::RgbImage;
use serde::Deserialize;
use std::{
    ffi::OsString,
    io::Write,
    process::{Command, Stdio},
};

/// The pose-detection oracle seam: maps one RGB frame to zero or one set of
/// 33 landmarks.
pub(crate) trait PoseDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Option<Landmarks>, Error>;
}

#[derive(Debug, Deserialize)]
struct WireLandmark {
    x: f32,
    y: f32,
    z: f32,
    visibility: f32,
}

/// Black-box oracle run as an external command, once per frame.
///
/// The command receives the frame dimensions and confidence thresholds as
/// flags, raw RGB24 pixels on stdin, and must print a JSON document on
/// stdout: `null` when no pose was found, otherwise an array of exactly 33
/// `{x, y, z, visibility}` objects in wire order.
pub(crate) struct CommandDetector {
    program: OsString,
    config: DetectorConfig,
}

impl CommandDetector {
    pub(crate) fn new(program: impl Into<OsString>, config: DetectorConfig) -> Self {
        Self {
            program: program.into(),
            config,
        }
    }
}

impl PoseDetector for CommandDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Option<Landmarks>, Error> {
        // The child is the oracle context: spawned and reaped within this
        // call, so release is scoped per image even on failure paths.
        let mut child = Command::new(&self.program)
            .arg("--width")
            .arg(frame.width().to_string())
            .arg("--height")
            .arg(frame.height().to_string())
            .arg("--min-detection-confidence")
            .arg(self.config.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(self.config.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(Error::SpawnOracle)?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(source) = stdin.write_all(frame.as_raw()) {
                // the oracle may have exited without reading stdin; reap it
                // before propagating so a failed frame cannot leak a child
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::WriteOracleInput(source));
            }
        }

        let output = child.wait_with_output().map_err(Error::WaitOracle)?;
        if !output.status.success() {
            return Err(Error::OracleStatus(output.status));
        }

        let wire: Option<Vec<WireLandmark>> =
            serde_json::from_slice(&output.stdout).map_err(Error::ParseLandmarks)?;

        match wire {
            None => Ok(None),
            Some(raw) => {
                if raw.len() != NUM_LANDMARKS {
                    return Err(Error::LandmarkCount(raw.len()));
                }
                let mut landmarks: Landmarks = [Keypoint::default(); NUM_LANDMARKS];
                for (slot, wire) in landmarks.iter_mut().zip(raw) {
                    *slot = Keypoint {
                        x: wire.x,
                        y: wire.y,
                        z: wire.z,
                        visibility: wire.visibility,
                    };
                }
                Ok(Some(landmarks))
            }
        }
    }
}

/// Replays canned detection outcomes, one per frame, in call order.
#[cfg(test)]
pub(crate) struct ScriptedDetector {
    outcomes: std::collections::VecDeque<Result<Option<Landmarks>, Error>>,
}

#[cfg(test)]
impl ScriptedDetector {
    pub(crate) fn new(
        outcomes: impl IntoIterator<Item = Result<Option<Landmarks>, Error>>,
    ) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl PoseDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Option<Landmarks>, Error> {
        self.outcomes
            .pop_front()
            .expect("scripted detector ran out of outcomes")
    }
}
