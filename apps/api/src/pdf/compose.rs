//! Renders a [`PagePlan`] into PDF bytes with printpdf.
//!
//! A capture that fails to decode is skipped with a warning; the rest of the
//! document still renders. Whole-document failures are handled by the
//! caller, which falls back to a text-only PDF.

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm,
    PdfDocument, PdfLayerReference, Px, Rect, Rgb,
};
use tracing::warn;

use crate::pdf::paginate::{PagePlan, Placement};
use crate::pdf::types::{
    CapturedSection, PageMetrics, Theme, CAPTION_TEXT, DARK_BACKGROUND_RGB,
};

const MM_PER_INCH: f32 = 25.4;

/// Composes the planned pages into a finished PDF.
///
/// `sidebar` is the capture drawn at every entry of
/// `plan.sidebar_placements`; pass `None` for the single-column layout.
pub fn compose_pdf(
    title: &str,
    plan: &PagePlan,
    sections: &[CapturedSection],
    sidebar: Option<&CapturedSection>,
    metrics: &PageMetrics,
    theme: Theme,
) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(metrics.width_mm),
        Mm(metrics.height_mm),
        "content",
    );

    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..plan.page_count {
        let (page, layer) = doc.add_page(Mm(metrics.width_mm), Mm(metrics.height_mm), "content");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    if theme == Theme::Dark {
        for layer in &layers {
            paint_background(layer, metrics);
        }
    }

    if let Some(sidebar) = sidebar {
        for placement in &plan.sidebar_placements {
            draw_capture(&layers[placement.page], sidebar, placement, metrics);
        }
    }

    for placement in &plan.placements {
        let section = &sections[placement.block];
        draw_capture(&layers[placement.page], section, placement, metrics);
    }

    if plan.trailing_page {
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("loading caption font")?;
        let layer = &layers[plan.page_count - 1];
        layer.set_fill_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
        layer.use_text(
            CAPTION_TEXT,
            8.0,
            Mm(metrics.width_mm / 2.0 - 18.0),
            Mm(5.0),
            &font,
        );
    }

    doc.save_to_bytes().context("serializing PDF")
}

fn paint_background(layer: &PdfLayerReference, metrics: &PageMetrics) {
    let (r, g, b) = DARK_BACKGROUND_RGB;
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    layer.add_rect(Rect::new(
        Mm(0.0),
        Mm(0.0),
        Mm(metrics.width_mm),
        Mm(metrics.height_mm),
    ));
}

/// Decodes one capture and places it; decode failure skips the section.
fn draw_capture(
    layer: &PdfLayerReference,
    section: &CapturedSection,
    placement: &Placement,
    metrics: &PageMetrics,
) {
    let decoded = match image::load_from_memory(&section.png) {
        Ok(img) => img.to_rgb8(),
        Err(e) => {
            warn!(kind = ?section.kind, "Skipping capture that failed to decode: {e}");
            return;
        }
    };

    let (width_px, height_px) = (decoded.width() as usize, decoded.height() as usize);
    let xobject = ImageXObject {
        width: Px(width_px),
        height: Px(height_px),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: decoded.into_raw(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    };

    // printpdf positions from the bottom-left corner; the plan is top-left.
    let y_bottom = metrics.height_mm - placement.y_mm - placement.height_mm;
    let dpi = width_px as f32 * MM_PER_INCH / placement.width_mm;

    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(placement.x_mm)),
            translate_y: Some(Mm(y_bottom)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
