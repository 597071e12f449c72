//! Drawing detections onto the inference image.

use std::path::Path;

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};

use super::{ClassNames, RawDetection};
use crate::error::{DetectError, DetectResult};

const PALETTE: [[u8; 3]; 20] = [
    [0xFF, 0x38, 0x38], [0xFF, 0x9D, 0x97], [0xFF, 0x70, 0x1F], [0xFF, 0xB2, 0x1D],
    [0xCF, 0xD2, 0x31], [0x48, 0xF9, 0x0A], [0x92, 0xCC, 0x17], [0x3D, 0xDB, 0x86],
    [0x1A, 0x93, 0x34], [0x00, 0xD4, 0xBB], [0x2C, 0x99, 0xA8], [0x00, 0xC2, 0xFF],
    [0x34, 0x45, 0x93], [0x64, 0x73, 0xFF], [0x00, 0x18, 0xEC], [0x84, 0x38, 0xFF],
    [0x52, 0x00, 0x85], [0xCB, 0x38, 0xFF], [0xFF, 0x95, 0xC8], [0xFF, 0x37, 0xC7],
];

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Colour used for a class, stable across runs
pub fn class_color(class_id: usize) -> Rgb<u8> {
    Rgb(PALETTE[class_id % PALETTE.len()])
}

/// Line width scaled to image size, never thinner than 2px
fn line_width(width: u32, height: u32) -> u32 {
    (((width + height) as f32 / 2.0 * 0.003).round() as u32).max(2)
}

/// Label text height scaled to image size, never smaller than 12px
fn font_size(width: u32, height: u32) -> f32 {
    ((width + height) as f32 / 2.0 * 0.035).round().max(12.0)
}

/// Embedded label font (DejaVu Sans Mono Bold, see assets/DejaVu-LICENSE)
fn label_font() -> DetectResult<FontRef<'static>> {
    FontRef::try_from_slice(include_bytes!("../../assets/DejaVuSansMono-Bold.ttf"))
        .map_err(|e| DetectError::inference(format!("invalid label font: {}", e)))
}

/// Text shown in a detection's tab, e.g. "dog 0.87"
pub fn label_text(detection: &RawDetection, names: &ClassNames) -> String {
    let name = names
        .name(detection.class_id)
        .map(str::to_string)
        .unwrap_or_else(|_| detection.class_id.to_string());
    format!("{} {:.2}", name, detection.confidence)
}

/// Draw each detection as a class-coloured box with a labelled tab on its top edge
pub fn annotate(
    image: &RgbImage,
    detections: &[RawDetection],
    names: &ClassNames,
) -> DetectResult<RgbImage> {
    let mut canvas = image.clone();
    let (img_w, img_h) = canvas.dimensions();
    if img_w == 0 || img_h == 0 {
        return Ok(canvas);
    }

    let font = label_font()?;
    let scale = PxScale::from(font_size(img_w, img_h));
    let thickness = line_width(img_w, img_h);
    let line_height = font.as_scaled(scale).height().ceil() as u32;

    for detection in detections {
        let color = class_color(detection.class_id);
        let Some(rect) = rect_from_detection(detection, img_w, img_h) else {
            continue;
        };

        // Nest rectangles inward for thick outlines
        for inset in 0..thickness {
            let w = rect.width().saturating_sub(2 * inset);
            let h = rect.height().saturating_sub(2 * inset);
            if w == 0 || h == 0 {
                break;
            }
            let inner = Rect::at(rect.left() + inset as i32, rect.top() + inset as i32).of_size(w, h);
            draw_hollow_rect_mut(&mut canvas, inner, color);
        }

        let text = label_text(detection, names);
        let (text_w, _) = text_size(scale, &font, &text);
        let tab_w = text_w.max(1) + 2 * thickness;
        let tab_h = line_height + 2 * thickness;

        // Above the box when there is room, otherwise inside its top edge
        let tab_top = if rect.top() >= tab_h as i32 {
            rect.top() - tab_h as i32
        } else {
            rect.top()
        };

        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(rect.left(), tab_top).of_size(tab_w, tab_h),
            color,
        );
        draw_text_mut(
            &mut canvas,
            TEXT_COLOR,
            rect.left() + thickness as i32,
            tab_top + thickness as i32,
            scale,
            &font,
            &text,
        );
    }

    Ok(canvas)
}

/// Annotate and write to `path`, creating parent directories as needed.
/// The output format follows the file extension.
pub fn save_annotated(
    image: &RgbImage,
    detections: &[RawDetection],
    names: &ClassNames,
    path: &Path,
) -> DetectResult<()> {
    let annotated = annotate(image, detections, names)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DetectError::image_write(path, e))?;
    }

    annotated
        .save(path)
        .map_err(|e| DetectError::image_write(path, e))
}

/// Clamp a detection box to the image and convert to an integer rect
fn rect_from_detection(detection: &RawDetection, img_w: u32, img_h: u32) -> Option<Rect> {
    let max_x = (img_w - 1) as f32;
    let max_y = (img_h - 1) as f32;

    let x1 = detection.x1.clamp(0.0, max_x);
    let y1 = detection.y1.clamp(0.0, max_y);
    let x2 = detection.x2.clamp(0.0, max_x);
    let y2 = detection.y2.clamp(0.0, max_y);
    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    let width = ((x2 - x1).round() as u32).max(1);
    let height = ((y2 - y1).round() as u32).max(1);
    Some(Rect::at(x1 as i32, y1 as i32).of_size(width, height))
}
