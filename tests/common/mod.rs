mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from yolodetect for tests
pub use yolodetect::{
    DetectError, DetectionRecord, MESSAGE_NO_DETECTIONS, MESSAGE_SUCCESS, RECORD_KEYS,
    ResultEnvelope, detect_objects_with,
};
