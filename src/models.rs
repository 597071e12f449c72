use serde::Serialize;
use std::fmt;

use crate::engine::{ClassNames, RawDetection};
use crate::error::DetectResult;

/// Field names of a detection record, in output order
pub const RECORD_KEYS: [&str; 6] = ["objName", "probability", "topX", "topY", "bottomX", "bottomY"];

/// Status message when at least one object was detected ("sending complete")
pub const MESSAGE_SUCCESS: &str = "送信終了";

/// Status message when nothing was detected ("cannot detect")
pub const MESSAGE_NO_DETECTIONS: &str = "検出できません";

/// One detected object, formatted for callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    pub obj_name: String,
    /// Confidence with exactly two decimal digits, e.g. "0.87"
    pub probability: String,
    pub top_x: i32,
    pub top_y: i32,
    pub bottom_x: i32,
    pub bottom_y: i32,
}

impl DetectionRecord {
    /// Resolve the class name and format a raw engine detection.
    ///
    /// Corner coordinates are truncated toward zero, not rounded.
    pub fn from_raw(raw: &RawDetection, names: &ClassNames) -> DetectResult<Self> {
        let obj_name = names.name(raw.class_id)?.to_string();

        Ok(Self {
            obj_name,
            probability: format!("{:.2}", f64::from(raw.confidence)),
            top_x: raw.x1 as i32,
            top_y: raw.y1 as i32,
            bottom_x: raw.x2 as i32,
            bottom_y: raw.y2 as i32,
        })
    }
}

/// Dict-style rendering used for debug lines, e.g.
/// `{'objName': 'dog', 'probability': '0.88', 'topX': 10, ...}`
impl fmt::Display for DetectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'objName': '{}', 'probability': '{}', 'topX': {}, 'topY': {}, 'bottomX': {}, 'bottomY': {}}}",
            self.obj_name, self.probability, self.top_x, self.top_y, self.bottom_x, self.bottom_y
        )
    }
}

/// Everything a single detection run hands back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEnvelope {
    pub keys: Vec<String>,
    pub records: Vec<DetectionRecord>,
    pub message: String,
}

impl ResultEnvelope {
    /// Build the envelope, picking the status message from the record count
    pub fn new(records: Vec<DetectionRecord>) -> Self {
        let message = if records.is_empty() {
            MESSAGE_NO_DETECTIONS
        } else {
            MESSAGE_SUCCESS
        };

        Self {
            keys: RECORD_KEYS.iter().map(|k| k.to_string()).collect(),
            records,
            message: message.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
