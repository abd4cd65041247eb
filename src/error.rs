#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("failed to construct NotNan from f32: {1}")]
    ConstructNotNan(#[source] ordered_float::FloatIsNan, f32),

    #[error("failed to convert landmark kind to usize: {0:?}")]
    LandmarkKindToUSize(crate::pose::LandmarkKind),

    #[error("landmark {0:?} did not pass the visibility gate")]
    MissingKeypoint(crate::pose::LandmarkKind),

    #[error("failed to read image: {1:?}")]
    ReadImage(#[source] image::ImageError, std::path::PathBuf),

    #[error("failed to spawn oracle command")]
    SpawnOracle(#[source] std::io::Error),

    #[error("failed to write frame pixels to oracle stdin")]
    WriteOracleInput(#[source] std::io::Error),

    #[error("failed to collect oracle output")]
    WaitOracle(#[source] std::io::Error),

    #[error("oracle command exited with {0}")]
    OracleStatus(std::process::ExitStatus),

    #[error("failed to parse landmarks from oracle output")]
    ParseLandmarks(#[source] serde_json::Error),

    #[error("expected 33 landmarks, got {0}")]
    LandmarkCount(usize),

    #[error("failed to list image directory: {1:?}")]
    ListImageDir(#[source] std::io::Error, std::path::PathBuf),

    #[error("failed to read directory entry in: {1:?}")]
    ReadDirEntry(#[source] std::io::Error, std::path::PathBuf),

    #[error("failed to create output file: {1:?}")]
    CreateOutput(#[source] std::io::Error, std::path::PathBuf),

    #[error("failed to write dataset")]
    WriteDataset(#[source] std::io::Error),
}

/// Outcome of one image that produced no rows. Contained at the image
/// boundary; the aggregator matches on the kind and keeps going.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FrameError {
    #[error("no pose detected")]
    NoDetection,

    #[error("failed to process image")]
    Processing(#[source] Error),
}
