use std::io::Write;
use std::path::Path;

use crate::engine::{Detector, ModelLoader, Prediction, YoloLoader};
use crate::error::DetectResult;
use crate::models::{DetectionRecord, ResultEnvelope};

/// Candidates scoring below this are dropped by the engine
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Detect objects in one image with a YOLO model.
///
/// Loads `model_file`, runs it on `input_image_file` and, when anything is
/// found, writes an annotated copy to `output_image_file`. With `debug` set,
/// each record is printed to stdout as it is produced.
pub fn detect_objects(
    input_image_file: impl AsRef<Path>,
    output_image_file: impl AsRef<Path>,
    model_file: impl AsRef<Path>,
    debug: bool,
) -> DetectResult<ResultEnvelope> {
    let stdout = std::io::stdout();
    detect_objects_with(
        &YoloLoader::new(),
        input_image_file.as_ref(),
        output_image_file.as_ref(),
        model_file.as_ref(),
        debug,
        &mut stdout.lock(),
    )
}

/// Same as [`detect_objects`] with an explicit engine and diagnostic sink
pub fn detect_objects_with<L: ModelLoader>(
    loader: &L,
    input_image_file: &Path,
    output_image_file: &Path,
    model_file: &Path,
    debug: bool,
    diagnostics: &mut dyn Write,
) -> DetectResult<ResultEnvelope> {
    // The model lives only for this call
    let mut model = loader.load(model_file)?;
    let prediction = model.predict(input_image_file, CONFIDENCE_THRESHOLD)?;

    let mut records = Vec::with_capacity(prediction.detections().len());
    for raw in prediction.detections() {
        let record = DetectionRecord::from_raw(raw, model.names())?;
        if debug {
            // Diagnostics are best effort
            let _ = writeln!(diagnostics, "Detected: {}", record);
        }
        records.push(record);
    }

    if !records.is_empty() {
        prediction.save(output_image_file, model.names())?;
    }

    Ok(ResultEnvelope::new(records))
}

