use std::path::PathBuf;

/// Confidence thresholds handed to the pose-detection oracle.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DetectorConfig {
    pub(crate) min_detection_confidence: f32,
    pub(crate) min_tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

/// One batch run: where the images are, where the dataset goes, and the
/// visibility gate applied before angle computation.
#[derive(Debug, Clone)]
pub(crate) struct PipelineConfig {
    pub(crate) image_dir: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) visibility_threshold: f32,
    pub(crate) detector: DetectorConfig,
}

impl PipelineConfig {
    pub(crate) fn new(image_dir: PathBuf, output: PathBuf) -> Self {
        Self {
            image_dir,
            output,
            visibility_threshold: 0.5,
            detector: DetectorConfig::default(),
        }
    }
}
