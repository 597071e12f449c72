pub mod detect;
pub mod engine;
pub mod error;
pub mod models;

pub use detect::{CONFIDENCE_THRESHOLD, detect_objects, detect_objects_with};
pub use engine::{
    ClassNames, Detector, ModelLoader, Prediction, RawDetection, YoloDetector, YoloLoader,
};
pub use error::{DetectError, DetectResult};
pub use models::{
    DetectionRecord, MESSAGE_NO_DETECTIONS, MESSAGE_SUCCESS, RECORD_KEYS, ResultEnvelope,
};
