use std::cmp::Ordering;

use super::RawDetection;

/// Class-aware greedy non-maximum suppression.
///
/// Candidates are visited in descending confidence; a candidate is dropped
/// when its IoU with an already kept box of the same class exceeds
/// `iou_threshold`. At most `max_detections` boxes are returned, highest
/// confidence first.
pub fn non_max_suppression(
    mut candidates: Vec<RawDetection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<RawDetection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<RawDetection> = Vec::with_capacity(candidates.len().min(max_detections));
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }

        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);

        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
