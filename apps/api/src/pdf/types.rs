//! Shared geometry and wire types for PDF export.
//!
//! The client rasterizes each rendered section to a PNG capture and sends
//! pixel dimensions; everything on this side works in millimetres on A4.

use serde::Deserialize;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// When less than this much vertical space remains after the final section,
/// a trailing page is added so nothing renders flush against the page edge.
pub const TRAILING_SPACE_MM: f32 = 20.0;

/// Oversized captures are scaled to 95% of the usable page height so they
/// keep a visible margin.
pub const OVERSIZE_FIT_RATIO: f32 = 0.95;

/// Vertical gap between sections in the two-column layout.
pub const SECTION_SPACING_MM: f32 = 5.0;

/// Dark theme page background, matching the rendered site (#0a0a0f).
pub const DARK_BACKGROUND_RGB: (f32, f32, f32) = (10.0 / 255.0, 10.0 / 255.0, 15.0 / 255.0);

pub const CAPTION_TEXT: &str = "Generated with cvsite";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CvLayout {
    Standard,
    TwoColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Light,
    Dark,
}

/// Section kinds in their fixed top-to-bottom order on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Header,
    ExperienceTitle,
    ExperienceItem,
    EducationSkills,
    Projects,
    CustomSection,
    Footer,
    /// The left column of the two-column layout, redrawn on every page.
    Sidebar,
}

impl SectionKind {
    /// Vertical padding inserted after a section of this kind in the
    /// standard layout.
    pub fn padding_after_mm(self) -> f32 {
        match self {
            SectionKind::Header => 2.0,
            SectionKind::ExperienceItem => 5.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Page geometry for one export run.
#[derive(Debug, Clone, Copy)]
pub struct PageMetrics {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margins: Margins,
}

impl PageMetrics {
    pub fn standard() -> Self {
        Self {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
            margins: Margins {
                top: 5.0,
                right: 5.0,
                bottom: 5.0,
                left: 5.0,
            },
        }
    }

    pub fn two_column() -> Self {
        Self {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
            margins: Margins {
                top: 10.0,
                right: 10.0,
                bottom: 15.0,
                left: 10.0,
            },
        }
    }

    pub fn for_layout(layout: CvLayout) -> Self {
        match layout {
            CvLayout::Standard => Self::standard(),
            CvLayout::TwoColumn => Self::two_column(),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width_mm - self.margins.left - self.margins.right
    }

    pub fn usable_height(&self) -> f32 {
        self.height_mm - self.margins.top - self.margins.bottom
    }
}

/// One captured section as measured on the client, before decoding.
#[derive(Debug, Clone)]
pub struct CapturedSection {
    pub kind: SectionKind,
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// The dimensions the paginator needs; decoupled from pixel data so the
/// planner stays pure.
#[derive(Debug, Clone, Copy)]
pub struct BlockExtent {
    pub kind: SectionKind,
    pub width_px: u32,
    pub height_px: u32,
}

impl From<&CapturedSection> for BlockExtent {
    fn from(section: &CapturedSection) -> Self {
        Self {
            kind: section.kind,
            width_px: section.width_px,
            height_px: section.height_px,
        }
    }
}
