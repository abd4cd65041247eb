use crate::{
    config::PipelineConfig,
    dataset::Dataset,
    detect::PoseDetector,
    error::{Error, FrameError},
    extract,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

/// Run the whole batch: list the image directory, extract a fragment per
/// image, and write the accumulated dataset once at the end. Per-image
/// failures are logged and skipped; only directory and output I/O abort.
pub(crate) fn run<D: PoseDetector>(
    config: &PipelineConfig,
    detector: &mut D,
    show_progress: bool,
) -> Result<(), Error> {
    let images = list_images(&config.image_dir)?;
    info!(
        message = "listed image directory",
        path = ?config.image_dir,
        images = images.len()
    );

    let progress = if show_progress {
        Some(
            ProgressBar::new(images.len() as u64).with_style(
                ProgressStyle::default_bar().template("{bar:40} {pos}/{len} {wide_msg}"),
            ),
        )
    } else {
        None
    };

    let mut dataset = Dataset::default();
    for (frame, path) in images.iter().enumerate() {
        info!(message = "processing image", path = ?path, frame);
        match extract::extract(detector, config, path, frame) {
            Ok(fragment) => dataset.append(fragment),
            Err(FrameError::NoDetection) => {
                warn!(message = "no landmarks detected", path = ?path, frame);
            }
            Err(FrameError::Processing(source)) => {
                error!(message = "failed to process image", path = ?path, frame, error = %source);
            }
        }
        if let Some(progress) = progress.as_ref() {
            progress.inc(1);
        }
    }

    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let file = File::create(&config.output)
        .map_err(|e| Error::CreateOutput(e, config.output.clone()))?;
    let mut writer = BufWriter::new(file);
    dataset.write_csv(&mut writer)?;
    writer.flush().map_err(Error::WriteDataset)?;

    info!(
        message = "dataset written",
        output = ?config.output,
        rows = dataset.len()
    );
    Ok(())
}

/// Image files of the directory, sorted by file name so frame indices do not
/// depend on filesystem listing order.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::ListImageDir(e, dir.to_owned()))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::ReadDirEntry(e, dir.to_owned()))?;
        let path = entry.path();
        if has_image_extension(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|extension| {
            matches!(
                extension.to_ascii_lowercase().as_str(),
                "png" | "jpg" | "jpeg"
            )
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        angle::joint_angle,
        detect::ScriptedDetector,
        point::Point,
        pose::{constants::ANGLE_TRIPLES, Keypoint, LandmarkKind, Landmarks, NUM_LANDMARKS},
    };

    struct Scratch(PathBuf);

    impl Scratch {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("pose-angles-{}-{}", name, std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn save_image(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::new(4, 4).save(&path).unwrap();
        path
    }

    fn detectable_landmarks() -> Landmarks {
        let mut landmarks: Landmarks = [Keypoint::default(); NUM_LANDMARKS];
        for (index, keypoint) in landmarks.iter_mut().enumerate() {
            *keypoint = Keypoint {
                x: 0.1 + 0.015 * index as f32,
                y: 0.9 - 0.02 * index as f32,
                z: -0.01 * index as f32,
                visibility: 0.95,
            };
        }
        // bend the right arm so at least one angle is far from degenerate
        let elbow = LandmarkKind::RightElbow.idx().unwrap();
        landmarks[elbow].x = 0.5;
        landmarks[elbow].y = 0.1;
        landmarks
    }

    fn expected_angles(landmarks: &Landmarks) -> Vec<f32> {
        ANGLE_TRIPLES
            .iter()
            .map(|&(a, b, c)| {
                let point = |kind: LandmarkKind| {
                    let keypoint = landmarks[kind.idx().unwrap()];
                    Point::new(keypoint.x, keypoint.y).unwrap()
                };
                joint_angle(point(a), point(b), point(c))
            })
            .collect()
    }

    fn read_rows(output: &Path) -> Vec<String> {
        let contents = fs::read_to_string(output).unwrap();
        contents.lines().map(str::to_owned).collect()
    }

    #[test]
    fn two_image_batch_keeps_only_the_detected_frame() {
        let scratch = Scratch::new("two-image-batch");
        let images = scratch.path().join("images");
        fs::create_dir_all(&images).unwrap();
        save_image(&images, "image_a_0.png");
        save_image(&images, "image_a_1.png");

        let landmarks = detectable_landmarks();
        let mut detector =
            ScriptedDetector::new(vec![Ok(Some(landmarks)), Ok(None)]);
        let config = PipelineConfig::new(images, scratch.path().join("out.csv"));

        run(&config, &mut detector, false).unwrap();

        let rows = read_rows(&config.output);
        assert_eq!(rows[0].split(',').count(), 14);
        assert_eq!(rows.len(), 1 + NUM_LANDMARKS);

        let expected = expected_angles(&landmarks);
        for row in &rows[1..] {
            let fields: Vec<&str> = row.split(',').collect();
            assert_eq!(fields[0], "0");
            for (column, angle) in expected.iter().enumerate() {
                assert_eq!(fields[6 + column], format!("{}", angle));
            }
        }

        let ids: Vec<&str> = rows[1..]
            .iter()
            .map(|row| row.split(',').nth(1).unwrap())
            .collect();
        let expected_ids: Vec<String> = (0..NUM_LANDMARKS).map(|id| id.to_string()).collect();
        assert_eq!(ids, expected_ids);
    }

    #[test]
    fn no_detections_leave_just_the_header() {
        let scratch = Scratch::new("no-detections");
        let images = scratch.path().join("images");
        fs::create_dir_all(&images).unwrap();
        save_image(&images, "a.png");
        save_image(&images, "b.jpg");

        let mut detector = ScriptedDetector::new(vec![Ok(None), Ok(None)]);
        let config = PipelineConfig::new(images, scratch.path().join("out.csv"));

        run(&config, &mut detector, false).unwrap();

        let rows = read_rows(&config.output);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("frame,id,x,y,z,vis,angle_1"));
    }

    #[test]
    fn processing_failures_do_not_abort_the_batch() {
        let scratch = Scratch::new("processing-failure");
        let images = scratch.path().join("images");
        fs::create_dir_all(&images).unwrap();
        save_image(&images, "bad.png");
        save_image(&images, "good.png");
        // an unreadable "image": extension matches, contents do not decode
        fs::write(images.join("broken.jpeg"), b"not an image").unwrap();

        // sorted order: bad.png, broken.jpeg, good.png; broken.jpeg never
        // reaches the detector
        let mut detector = ScriptedDetector::new(vec![
            Ok(Some(detectable_landmarks())),
            Ok(Some(detectable_landmarks())),
        ]);
        let config = PipelineConfig::new(images, scratch.path().join("out.csv"));

        run(&config, &mut detector, false).unwrap();

        let rows = read_rows(&config.output);
        assert_eq!(rows.len(), 1 + 2 * NUM_LANDMARKS);

        let frames: Vec<&str> = rows[1..]
            .iter()
            .map(|row| row.split(',').next().unwrap())
            .collect();
        // frame 1 (broken.jpeg) contributes nothing; indices are positions,
        // so the surviving frames are 0 and 2
        assert!(frames.contains(&"0"));
        assert!(frames.contains(&"2"));
        assert!(!frames.contains(&"1"));
    }

    #[test]
    fn non_image_files_are_ignored() {
        let scratch = Scratch::new("extension-filter");
        let images = scratch.path().join("images");
        fs::create_dir_all(&images).unwrap();
        save_image(&images, "frame.PNG");
        fs::write(images.join("notes.txt"), b"ignored").unwrap();
        fs::write(images.join("pose.csv"), b"ignored").unwrap();

        let listed = list_images(&images).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(has_image_extension(Path::new("x.JPeG")));
        assert!(!has_image_extension(Path::new("x.png.bak")));
    }

    #[test]
    fn rerun_is_byte_identical() {
        let scratch = Scratch::new("idempotence");
        let images = scratch.path().join("images");
        fs::create_dir_all(&images).unwrap();
        save_image(&images, "image_0.png");
        save_image(&images, "image_1.png");

        let landmarks = detectable_landmarks();
        let first_out = scratch.path().join("first.csv");
        let second_out = scratch.path().join("second.csv");

        for output in [&first_out, &second_out] {
            let mut detector =
                ScriptedDetector::new(vec![Ok(Some(landmarks)), Ok(None)]);
            let config = PipelineConfig::new(images.clone(), output.to_path_buf());
            run(&config, &mut detector, false).unwrap();
        }

        assert_eq!(fs::read(&first_out).unwrap(), fs::read(&second_out).unwrap());
    }
}
