use std::path::Path;

use image::{imageops::FilterType, Rgb, RgbImage};
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, NdTensorView};

use super::annotate::save_annotated;
use super::nms::non_max_suppression;
use super::{ClassNames, Detector, ModelLoader, Prediction, RawDetection};
use crate::error::{DetectError, DetectResult};

/// Grey used by YOLO training pipelines for letterbox padding
const PAD_VALUE: u8 = 114;

/// Loads YOLOv8-family detection models in `.rten` format
#[derive(Debug, Clone)]
pub struct YoloLoader {
    /// Side of the square model input
    pub input_size: u32,
    /// Same-class boxes overlapping more than this are suppressed
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl YoloLoader {
    pub fn new() -> Self {
        Self {
            input_size: 640,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }

    pub fn with_input_size(mut self, input_size: u32) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f32) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = max_detections;
        self
    }
}

impl Default for YoloLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader for YoloLoader {
    type Model = YoloDetector;

    fn load(&self, path: &Path) -> DetectResult<YoloDetector> {
        let model = Model::load_file(path).map_err(|e| DetectError::model_load(path, e))?;
        let names = ClassNames::for_model(path)?;

        Ok(YoloDetector {
            model,
            names,
            config: self.clone(),
        })
    }
}

/// A loaded YOLO model plus its label table
pub struct YoloDetector {
    model: Model,
    names: ClassNames,
    config: YoloLoader,
}

impl Detector for YoloDetector {
    type Output = YoloPrediction;

    fn names(&self) -> &ClassNames {
        &self.names
    }

    fn predict(&mut self, image: &Path, confidence: f32) -> DetectResult<YoloPrediction> {
        let rgb = image::open(image)
            .map_err(|e| DetectError::inference(format!("failed to read {}: {}", image.display(), e)))?
            .to_rgb8();

        let (canvas, letterbox) = letterbox(&rgb, self.config.input_size)?;
        let input = image_to_tensor(&canvas);

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(DetectError::inference)?;
        let output: NdTensor<f32, 3> = output.try_into().map_err(DetectError::inference)?;

        let candidates = decode_output(output.view(), self.names.len(), confidence)?;
        let detections: Vec<RawDetection> = non_max_suppression(
            candidates,
            self.config.iou_threshold,
            self.config.max_detections,
        )
        .into_iter()
        .map(|d| letterbox.restore(d, rgb.width(), rgb.height()))
        .collect();

        Ok(YoloPrediction { image: rgb, detections })
    }
}

/// Output of one YOLO run, keeping the source image for annotation
pub struct YoloPrediction {
    image: RgbImage,
    detections: Vec<RawDetection>,
}

impl Prediction for YoloPrediction {
    fn detections(&self) -> &[RawDetection] {
        &self.detections
    }

    fn save(&self, path: &Path, names: &ClassNames) -> DetectResult<()> {
        save_annotated(&self.image, &self.detections, names, path)
    }
}

/// Scale and padding applied when fitting an image onto the model canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl Letterbox {
    /// Map a box from canvas space back into the source image, clipped to its bounds
    pub fn restore(&self, d: RawDetection, width: u32, height: u32) -> RawDetection {
        let max_x = width as f32;
        let max_y = height as f32;
        let unmap_x = |x: f32| ((x - self.pad_x) / self.scale).clamp(0.0, max_x);
        let unmap_y = |y: f32| ((y - self.pad_y) / self.scale).clamp(0.0, max_y);

        RawDetection {
            x1: unmap_x(d.x1),
            y1: unmap_y(d.y1),
            x2: unmap_x(d.x2),
            y2: unmap_y(d.y2),
            ..d
        }
    }
}

/// Resize preserving aspect ratio and centre on a square grey canvas
pub fn letterbox(image: &RgbImage, size: u32) -> DetectResult<(RgbImage, Letterbox)> {
    let (w, h) = image.dimensions();
    if size == 0 {
        return Err(DetectError::inference("model input size must be at least 1"));
    }
    if w == 0 || h == 0 {
        return Err(DetectError::inference(format!("image has zero size {}x{}", w, h)));
    }

    let scale = (size as f32 / w as f32).min(size as f32 / h as f32);
    let new_w = ((w as f32 * scale).round() as u32).clamp(1, size);
    let new_h = ((h as f32 * scale).round() as u32).clamp(1, size);

    let resized = image::imageops::resize(image, new_w, new_h, FilterType::Triangle);

    let mut canvas = RgbImage::from_pixel(size, size, Rgb([PAD_VALUE; 3]));
    let offset_x = (size - new_w) / 2;
    let offset_y = (size - new_h) / 2;
    image::imageops::overlay(&mut canvas, &resized, offset_x.into(), offset_y.into());

    Ok((
        canvas,
        Letterbox {
            scale,
            pad_x: offset_x as f32,
            pad_y: offset_y as f32,
        },
    ))
}

/// Convert to an NCHW float tensor with values in 0..1
fn image_to_tensor(image: &RgbImage) -> NdTensor<f32, 4> {
    let (w, h) = image.dimensions();
    let mut tensor = NdTensor::zeros([1, 3, h as usize, w as usize]);
    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }
    tensor
}

/// Decode raw YOLOv8 output into candidate boxes in canvas space.
///
/// Accepts `[1, 4 + classes, anchors]` (the default export) or the
/// transposed `[1, anchors, 4 + classes]`. Each anchor row holds
/// `cx, cy, w, h` followed by one score per class.
pub fn decode_output(
    output: NdTensorView<f32, 3>,
    num_classes: usize,
    confidence: f32,
) -> DetectResult<Vec<RawDetection>> {
    let [batch, dim1, dim2] = output.shape();
    let attrs = 4 + num_classes;

    if batch != 1 {
        return Err(DetectError::inference(format!("expected batch size 1, got {}", batch)));
    }

    let transposed = if dim1 == attrs {
        false
    } else if dim2 == attrs {
        true
    } else {
        return Err(DetectError::inference(format!(
            "model output [1, {}, {}] does not match {} labels",
            dim1, dim2, num_classes
        )));
    };

    let anchors = if transposed { dim1 } else { dim2 };
    let value = |attr: usize, anchor: usize| {
        if transposed {
            output[[0, anchor, attr]]
        } else {
            output[[0, attr, anchor]]
        }
    };

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let mut class_id = 0;
        let mut best = f32::MIN;
        for class in 0..num_classes {
            let score = value(4 + class, anchor);
            if score > best {
                best = score;
                class_id = class;
            }
        }

        if best < confidence {
            continue;
        }

        let cx = value(0, anchor);
        let cy = value(1, anchor);
        let w = value(2, anchor);
        let h = value(3, anchor);

        candidates.push(RawDetection {
            class_id,
            confidence: best,
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        });
    }

    Ok(candidates)
}
