use std::path::{Path, PathBuf};

use crate::error::{DetectError, DetectResult};

/// COCO class names used by the stock YOLOv8 checkpoints
pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

/// Class index to name table owned by a loaded model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn coco() -> Self {
        Self::new(COCO_CLASSES)
    }

    /// Parse a names file: one class per line, blank lines skipped
    pub fn parse(text: &str) -> Self {
        Self::new(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    /// Load the label sidecar for a model, falling back to COCO names.
    ///
    /// Looks for `<model>.names` first (e.g. `yolov8n.rten.names`), then
    /// `<stem>.names` (e.g. `yolov8n.names`).
    pub fn for_model(model_path: &Path) -> DetectResult<Self> {
        match sidecar_path(model_path) {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| DetectError::model_load(&path, e))?;
                let names = Self::parse(&text);
                if names.is_empty() {
                    return Err(DetectError::model_load(path, "label file is empty"));
                }
                Ok(names)
            }
            None => Ok(Self::coco()),
        }
    }

    /// Look up a class name. Out-of-range indices are an error.
    pub fn name(&self, class_id: usize) -> DetectResult<&str> {
        self.names
            .get(class_id)
            .map(String::as_str)
            .ok_or_else(|| {
                DetectError::inference(format!(
                    "class index {} out of range for {} labels",
                    class_id,
                    self.names.len()
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn sidecar_path(model_path: &Path) -> Option<PathBuf> {
    let mut full = model_path.as_os_str().to_owned();
    full.push(".names");
    let full = PathBuf::from(full);

    let candidates = [full, model_path.with_extension("names")];
    candidates.into_iter().find(|p| p.is_file())
}
