//! Frame loop: pull frames from a source, extract blobs and label them with
//! an optional rectangle tracker.

use std::path::{Path, PathBuf};

use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    backend::ImageprocGeoBackend,
    error::{ContourError, Result},
    pipeline::Pipeline,
    traits::{FrameSource, GeometryBackend, RectTracker},
    types::BlobSummary,
};

/// Image files of one directory, read in file-name order
#[derive(Debug, Clone)]
pub struct ImageSequenceSource {
    directory: PathBuf,
    paths: Vec<PathBuf>,
    cursor: usize,
    delivered: usize,
}

impl ImageSequenceSource {
    pub fn open(directory: impl AsRef<Path>) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&directory)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if paths.is_empty() {
            return Err(ContourError::EmptyFrameSource(directory.display().to_string()));
        }
        debug!(directory = %directory.display(), files = paths.len(), "opened image sequence");

        Ok(Self {
            directory,
            paths,
            cursor: 0,
            delivered: 0,
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<GrayImage>> {
        while let Some(path) = self.paths.get(self.cursor) {
            self.cursor += 1;
            match image::open(path) {
                Ok(image) => {
                    self.delivered += 1;
                    return Ok(Some(image.to_luma8()));
                }
                Err(err) => warn!(path = %path.display(), %err, "skipping unreadable file"),
            }
        }

        if self.delivered == 0 {
            return Err(ContourError::EmptyFrameSource(self.directory.display().to_string()));
        }
        Ok(None)
    }
}

/// What one frame produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub blobs: Vec<BlobSummary>,
    /// Tracker labels, parallel to `blobs`; empty without a tracker
    pub labels: Vec<u32>,
}

/// Drives a pipeline over every frame of a source
pub struct Session<S, B = ImageprocGeoBackend> {
    pipeline: Pipeline<B>,
    source: S,
    tracker: Option<Box<dyn RectTracker>>,
    frame_index: usize,
}

impl<S: FrameSource, B: GeometryBackend> Session<S, B> {
    pub fn new(pipeline: Pipeline<B>, source: S) -> Self {
        Self {
            pipeline,
            source,
            tracker: None,
            frame_index: 0,
        }
    }

    pub fn with_tracker<T>(mut self, tracker: T) -> Self
    where
        T: RectTracker + 'static,
    {
        self.tracker = Some(Box::new(tracker));
        self
    }

    /// Process the next frame, or return `None` once the source is exhausted
    pub fn step(&mut self) -> Result<Option<FrameReport>> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };

        let contours = self.pipeline.process(&frame)?;
        let blobs = contours.blobs()?;

        let labels = match self.tracker.as_mut() {
            Some(tracker) => {
                let rects = contours.bounding_rects();
                let labels = tracker.track(&rects);
                if labels.len() != rects.len() {
                    return Err(ContourError::TrackerLabelMismatch {
                        labels: labels.len(),
                        rects: rects.len(),
                    });
                }
                labels
            }
            None => Vec::new(),
        };

        let report = FrameReport {
            index: self.frame_index,
            width: frame.width(),
            height: frame.height(),
            blobs,
            labels,
        };
        debug!(frame = report.index, blobs = report.blobs.len(), "processed frame");
        self.frame_index += 1;

        Ok(Some(report))
    }

    /// Process every remaining frame
    pub fn run(&mut self) -> Result<Vec<FrameReport>> {
        let mut reports = Vec::new();
        while let Some(report) = self.step()? {
            reports.push(report);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;
    use image::Luma;
    use std::collections::VecDeque;

    fn frame_with_blocks(blocks: &[(u32, u32)]) -> GrayImage {
        let mut image = GrayImage::new(64, 64);
        for &(x0, y0) in blocks {
            for y in y0..y0 + 8 {
                for x in x0..x0 + 8 {
                    image.put_pixel(x, y, Luma([255]));
                }
            }
        }
        image
    }

    struct VecSource(VecDeque<GrayImage>);

    impl FrameSource for VecSource {
        fn next_frame(&mut self) -> Result<Option<GrayImage>> {
            Ok(self.0.pop_front())
        }
    }

    /// Labels rectangles by their left edge
    struct LeftEdgeTracker;

    impl RectTracker for LeftEdgeTracker {
        fn track(&mut self, rects: &[Rect]) -> Vec<u32> {
            rects.iter().map(|r| r.x as u32).collect()
        }
    }

    struct ForgetfulTracker;

    impl RectTracker for ForgetfulTracker {
        fn track(&mut self, _rects: &[Rect]) -> Vec<u32> {
            Vec::new()
        }
    }

    #[test]
    fn test_session_without_tracker() {
        let frames = VecDeque::from(vec![frame_with_blocks(&[(4, 4)]), frame_with_blocks(&[])]);
        let mut session = Session::new(Pipeline::builder().build(), VecSource(frames));

        let reports = session.run().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].index, 0);
        assert_eq!(reports[0].blobs.len(), 1);
        assert!(reports[0].labels.is_empty());
        assert_eq!(reports[1].index, 1);
        assert!(reports[1].blobs.is_empty());
        assert!(session.step().unwrap().is_none());
    }

    #[test]
    fn test_session_reports_tracker_labels() {
        let frames = VecDeque::from(vec![frame_with_blocks(&[(4, 4), (40, 20)])]);
        let mut session =
            Session::new(Pipeline::builder().build(), VecSource(frames)).with_tracker(LeftEdgeTracker);

        let report = session.step().unwrap().unwrap();
        assert_eq!((report.width, report.height), (64, 64));
        let mut labels = report.labels.clone();
        labels.sort();
        assert_eq!(labels, vec![4, 40]);
    }

    #[test]
    fn test_session_rejects_label_mismatch() {
        let frames = VecDeque::from(vec![frame_with_blocks(&[(4, 4)])]);
        let mut session =
            Session::new(Pipeline::builder().build(), VecSource(frames)).with_tracker(ForgetfulTracker);

        assert!(matches!(
            session.step(),
            Err(ContourError::TrackerLabelMismatch { labels: 0, rects: 1 })
        ));
    }

    #[test]
    fn test_image_sequence_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        frame_with_blocks(&[(4, 4), (30, 30)]).save(dir.path().join("frame_002.png")).unwrap();
        frame_with_blocks(&[(4, 4)]).save(dir.path().join("frame_001.png")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let source = ImageSequenceSource::open(dir.path()).unwrap();
        let mut session = Session::new(Pipeline::builder().build(), source);
        let reports = session.run().unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].blobs.len(), 1);
        assert_eq!(reports[1].blobs.len(), 2);
    }

    #[test]
    fn test_image_sequence_without_images() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageSequenceSource::open(dir.path()),
            Err(ContourError::EmptyFrameSource(_))
        ));

        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        let mut source = ImageSequenceSource::open(dir.path()).unwrap();
        assert!(matches!(source.next_frame(), Err(ContourError::EmptyFrameSource(_))));
    }
}
