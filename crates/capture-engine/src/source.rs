//! Frame sources.
//!
//! The camera is an external collaborator: anything that can hand over
//! BGR rasters on demand can drive a session. A source is exclusively
//! owned by the active session, which enforces the one-session-per-
//! camera rule by construction.

use std::path::{Path, PathBuf};

use kinetrack_common::error::{KinetrackError, KinetrackResult};
use kinetrack_trial_model::sample::Point;
use kinetrack_vision_core::frame::BgrFrame;

/// Trait for frame-delivering backends.
pub trait FrameSource: Send {
    /// Pull the next frame. `Ok(None)` is end-of-stream.
    fn next_frame(&mut self) -> KinetrackResult<Option<BgrFrame>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// A source that replays image files from a directory in order.
///
/// Files are ordered by any trailing number in the stem
/// (`frame_2.png` before `frame_10.png`), falling back to
/// lexicographic order.
pub struct ImageDirSource {
    frames: Vec<PathBuf>,
    index: usize,
    name: String,
}

impl ImageDirSource {
    pub fn new(dir: impl AsRef<Path>) -> KinetrackResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(KinetrackError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("png") | Some("jpg") | Some("jpeg") | Some("bmp")
                )
            })
            .collect();

        if frames.is_empty() {
            return Err(KinetrackError::capture(format!(
                "no image files in {}",
                dir.display()
            )));
        }

        frames.sort_by_key(|p| sort_key(p));

        Ok(Self {
            frames,
            index: 0,
            name: format!("dir:{}", dir.display()),
        })
    }

    /// Number of frames this source will deliver.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn sort_key(path: &Path) -> (u64, String) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let trailing: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    (trailing.parse().unwrap_or(u64::MAX), stem)
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> KinetrackResult<Option<BgrFrame>> {
        let Some(path) = self.frames.get(self.index) else {
            return Ok(None);
        };
        self.index += 1;
        BgrFrame::load(path).map(Some)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A synthetic source rendering a colored disk moving on a straight
/// line over a black background. Used by tests and demos.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    radius: f64,
    color_bgr: [u8; 3],
    position: Point,
    step: (f64, f64),
    frames_left: usize,
}

impl SyntheticSource {
    pub fn new(
        width: u32,
        height: u32,
        radius: f64,
        color_bgr: [u8; 3],
        start: Point,
        step: (f64, f64),
        frames: usize,
    ) -> Self {
        Self {
            width,
            height,
            radius,
            color_bgr,
            position: start,
            step,
            frames_left: frames,
        }
    }

    /// A red disk drifting right, a convenient default for smoke runs.
    pub fn red_drift(width: u32, height: u32, frames: usize) -> Self {
        Self::new(
            width,
            height,
            8.0,
            [0, 0, 255],
            Point::new(width as f64 * 0.2, height as f64 * 0.5),
            (4.0, 0.0),
            frames,
        )
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> KinetrackResult<Option<BgrFrame>> {
        if self.frames_left == 0 {
            return Ok(None);
        }
        self.frames_left -= 1;

        let mut frame = BgrFrame::new(self.width, self.height);
        let r2 = self.radius * self.radius;
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f64 - self.position.x;
                let dy = y as f64 - self.position.y;
                if dx * dx + dy * dy <= r2 {
                    frame.set_bgr(x, y, self.color_bgr);
                }
            }
        }

        self.position = Point::new(
            self.position.x + self.step.0,
            self.position.y + self.step.1,
        );
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetrack_trial_model::sample::HueRange;
    use kinetrack_vision_core::detector::detect;

    #[test]
    fn test_synthetic_source_moves_the_disk() {
        let mut source = SyntheticSource::red_drift(64, 48, 3);
        let band = HueRange::new(0, 6).unwrap();

        let first = detect(&source.next_frame().unwrap().unwrap(), band);
        let second = detect(&source.next_frame().unwrap().unwrap(), band);

        assert!(first.detected());
        assert!(second.detected());
        assert!(second.x > first.x);
        assert!((second.x - first.x - 4.0).abs() < 1.0);

        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_image_dir_source_orders_numerically() {
        let dir = std::env::temp_dir().join("kinetrack_test_dirsource");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        for n in [1u8, 2, 10] {
            let mut frame = BgrFrame::new(2, 2);
            frame.set_bgr(0, 0, [n, n, n]);
            frame.save(dir.join(format!("frame_{n}.png"))).unwrap();
        }

        let mut source = ImageDirSource::new(&dir).unwrap();
        assert_eq!(source.len(), 3);

        let order: Vec<u8> = (0..3)
            .map(|_| source.next_frame().unwrap().unwrap().bgr_at(0, 0)[0])
            .collect();
        assert_eq!(order, vec![1, 2, 10]);
        assert!(source.next_frame().unwrap().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_dir_is_distinct_error() {
        assert!(matches!(
            ImageDirSource::new("/nonexistent/kinetrack/frames"),
            Err(KinetrackError::FileNotFound { .. })
        ));
    }
}
