//! Text-only fallback PDF, produced when composing the captured document
//! fails entirely. One A4 page: name, title, a note, and contact details.

use anyhow::{Context, Result};
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};
use serde_json::Value;

use crate::pdf::types::{A4_HEIGHT_MM, A4_WIDTH_MM};

const FALLBACK_NOTE: &str =
    "The full visual export could not be generated. Please try again, or download the JSON export.";

pub fn build_fallback_pdf(profile: &Value) -> Result<Vec<u8>> {
    let name = profile
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Your Name");
    let title = profile
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let (doc, page, layer) = PdfDocument::new(name, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "content");
    let layer = doc.get_page(page).get_layer(layer);

    let heading = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("loading heading font")?;
    let body = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("loading body font")?;

    layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
    layer.use_text(name, 24.0, Mm(20.0), Mm(A4_HEIGHT_MM - 30.0), &heading);
    if !title.is_empty() {
        layer.use_text(title, 16.0, Mm(20.0), Mm(A4_HEIGHT_MM - 42.0), &body);
    }

    layer.set_fill_color(Color::Rgb(Rgb::new(0.4, 0.4, 0.4, None)));
    layer.use_text(FALLBACK_NOTE, 11.0, Mm(20.0), Mm(A4_HEIGHT_MM - 60.0), &body);

    let mut y = A4_HEIGHT_MM - 80.0;
    if let Some(contact) = profile.get("contact").and_then(Value::as_object) {
        layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
        for key in ["email", "phone", "location"] {
            if let Some(value) = contact.get(key).and_then(Value::as_str) {
                if !value.is_empty() {
                    layer.use_text(value, 11.0, Mm(20.0), Mm(y), &body);
                    y -= 7.0;
                }
            }
        }
    }

    doc.save_to_bytes().context("serializing fallback PDF")
}
