pub mod annotate;
pub mod labels;
pub mod nms;
pub mod yolo;

use std::path::Path;

use crate::error::DetectResult;

pub use labels::ClassNames;
pub use yolo::{YoloDetector, YoloLoader, YoloPrediction};

/// A single detection as produced by an engine, in original image pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl RawDetection {
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over Union with another detection's box
    pub fn iou(&self, other: &Self) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if intersection <= 0.0 {
            return 0.0;
        }

        let union = self.area() + other.area() - intersection;
        if union <= 0.0 { 0.0 } else { intersection / union }
    }
}

/// Loads a model artifact from disk
pub trait ModelLoader {
    type Model: Detector;

    fn load(&self, path: &Path) -> DetectResult<Self::Model>;
}

/// A loaded model that can run inference on one image at a time
pub trait Detector {
    type Output: Prediction;

    /// Class index to name table owned by this model
    fn names(&self) -> &ClassNames;

    /// Run inference, discarding candidates scoring below `confidence`
    fn predict(&mut self, image: &Path, confidence: f32) -> DetectResult<Self::Output>;
}

/// Result of one inference run
pub trait Prediction {
    /// Detections in engine order
    fn detections(&self) -> &[RawDetection];

    /// Save an annotated rendering of this result, labelled from `names`
    fn save(&self, path: &Path, names: &ClassNames) -> DetectResult<()>;
}
