use image::{ImageBuffer, Rgb, RgbImage};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use tempfile::NamedTempFile;

use yolodetect::engine::annotate::save_annotated;
use yolodetect::{ClassNames, DetectError, DetectResult, Detector, ModelLoader, Prediction, RawDetection};

/// Creates a 100x100 red test image and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image() -> NamedTempFile {
    let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([255u8, 0u8, 0u8]));
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Shorthand for a raw detection
pub fn det(class_id: usize, confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> RawDetection {
    RawDetection { class_id, confidence, x1, y1, x2, y2 }
}

pub fn test_names() -> ClassNames {
    ClassNames::new(["person", "dog", "car"])
}

/// Engine that returns a fixed list of detections, in the given order.
/// Records the confidence threshold it was asked to apply.
pub struct StubLoader {
    pub names: ClassNames,
    pub detections: Vec<RawDetection>,
    pub seen_confidence: Rc<Cell<Option<f32>>>,
}

impl StubLoader {
    pub fn new(detections: Vec<RawDetection>) -> Self {
        Self {
            names: test_names(),
            detections,
            seen_confidence: Rc::new(Cell::new(None)),
        }
    }
}

impl ModelLoader for StubLoader {
    type Model = StubModel;

    fn load(&self, path: &Path) -> DetectResult<StubModel> {
        if !path.exists() {
            return Err(DetectError::model_load(path, "No such file"));
        }
        Ok(StubModel {
            names: self.names.clone(),
            detections: self.detections.clone(),
            seen_confidence: self.seen_confidence.clone(),
        })
    }
}

pub struct StubModel {
    names: ClassNames,
    detections: Vec<RawDetection>,
    seen_confidence: Rc<Cell<Option<f32>>>,
}

impl Detector for StubModel {
    type Output = StubPrediction;

    fn names(&self) -> &ClassNames {
        &self.names
    }

    fn predict(&mut self, image: &Path, confidence: f32) -> DetectResult<StubPrediction> {
        self.seen_confidence.set(Some(confidence));
        let image = image::open(image).map_err(DetectError::inference)?.to_rgb8();
        let detections = self
            .detections
            .iter()
            .filter(|d| d.confidence >= confidence)
            .copied()
            .collect();
        Ok(StubPrediction { image, detections })
    }
}

pub struct StubPrediction {
    image: RgbImage,
    detections: Vec<RawDetection>,
}

impl Prediction for StubPrediction {
    fn detections(&self) -> &[RawDetection] {
        &self.detections
    }

    fn save(&self, path: &Path, names: &ClassNames) -> DetectResult<()> {
        save_annotated(&self.image, &self.detections, names, path)
    }
}
