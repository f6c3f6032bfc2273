//! Pure pagination planning.
//!
//! Given section extents and page geometry, produces the exact placement of
//! every capture without touching pixel data, so page-break behavior is
//! testable in isolation. Composition happens in `compose`.

use crate::pdf::types::{
    BlockExtent, PageMetrics, OVERSIZE_FIT_RATIO, SECTION_SPACING_MM, TRAILING_SPACE_MM,
};

/// Where one capture lands. `block` indexes into the input slice; top-left
/// origin in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub block: usize,
    pub page: usize,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// A complete plan for one document.
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub placements: Vec<Placement>,
    /// Two-column layout only: one sidebar placement per content page.
    pub sidebar_placements: Vec<Placement>,
    pub page_count: usize,
    /// True when a trailing page with only the caption was appended.
    pub trailing_page: bool,
}

/// Plans the single-column layout: full-width sections stacked top to
/// bottom, each with its kind-specific padding after it.
pub fn plan_standard(blocks: &[BlockExtent], metrics: &PageMetrics) -> PagePlan {
    let content_width = metrics.content_width();
    let usable_height = metrics.usable_height();
    let bottom_limit = metrics.height_mm - metrics.margins.bottom;

    let mut placements = Vec::with_capacity(blocks.len());
    let mut page = 0usize;
    let mut cursor = metrics.margins.top;

    for (i, block) in blocks.iter().enumerate() {
        if block.width_px == 0 || block.height_px == 0 {
            continue;
        }
        let ratio = block.height_px as f32 / block.width_px as f32;
        let (mut width_mm, mut height_mm) = (content_width, content_width * ratio);

        // A capture taller than a whole page is shrunk to fit rather than
        // split mid-section.
        if height_mm > usable_height {
            let scale = usable_height * OVERSIZE_FIT_RATIO / height_mm;
            width_mm *= scale;
            height_mm *= scale;
        }

        let padding = block.kind.padding_after_mm();
        if cursor + height_mm + padding > bottom_limit && cursor > metrics.margins.top {
            page += 1;
            cursor = metrics.margins.top;
        }

        placements.push(Placement {
            block: i,
            page,
            x_mm: metrics.margins.left,
            y_mm: cursor,
            width_mm,
            height_mm,
        });
        cursor += height_mm + padding;
    }

    let trailing_page = bottom_limit - cursor < TRAILING_SPACE_MM;
    if trailing_page {
        page += 1;
    }

    PagePlan {
        placements,
        sidebar_placements: Vec::new(),
        page_count: page + 1,
        trailing_page,
    }
}

/// Plans the two-column layout: the sidebar capture occupies the left third
/// of the content area and is redrawn at the top of every content page; the
/// main sections flow down the right two-thirds.
pub fn plan_two_column(
    sidebar: &BlockExtent,
    blocks: &[BlockExtent],
    metrics: &PageMetrics,
) -> PagePlan {
    let content_width = metrics.content_width();
    let usable_height = metrics.usable_height();
    let bottom_limit = metrics.height_mm - metrics.margins.bottom;

    let sidebar_width = content_width / 3.0;
    let sidebar_height = if sidebar.width_px == 0 {
        0.0
    } else {
        (sidebar_width * sidebar.height_px as f32 / sidebar.width_px as f32).min(usable_height)
    };

    let main_x = metrics.margins.left + sidebar_width;
    let main_width = content_width - sidebar_width;

    let mut placements = Vec::with_capacity(blocks.len());
    let mut page = 0usize;
    let mut cursor = metrics.margins.top;

    for (i, block) in blocks.iter().enumerate() {
        if block.width_px == 0 || block.height_px == 0 {
            continue;
        }
        let ratio = block.height_px as f32 / block.width_px as f32;
        let (mut width_mm, mut height_mm) = (main_width, main_width * ratio);

        if height_mm > usable_height {
            let scale = usable_height * OVERSIZE_FIT_RATIO / height_mm;
            width_mm *= scale;
            height_mm *= scale;
        }

        if cursor + height_mm > bottom_limit && cursor > metrics.margins.top {
            page += 1;
            cursor = metrics.margins.top;
        }

        placements.push(Placement {
            block: i,
            page,
            x_mm: main_x,
            y_mm: cursor,
            width_mm,
            height_mm,
        });
        cursor += height_mm + SECTION_SPACING_MM;
    }

    let content_pages = page + 1;
    let sidebar_placements = (0..content_pages)
        .map(|p| Placement {
            block: usize::MAX, // resolved by the composer, not an index into `blocks`
            page: p,
            x_mm: metrics.margins.left,
            y_mm: metrics.margins.top,
            width_mm: sidebar_width,
            height_mm: sidebar_height,
        })
        .collect();

    let trailing_page = bottom_limit - cursor < TRAILING_SPACE_MM;
    if trailing_page {
        page += 1;
    }

    PagePlan {
        placements,
        sidebar_placements,
        page_count: page + 1,
        trailing_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::types::{PageMetrics, SectionKind};

    // 1000px wide captures; height in px maps to mm via the content width.
    fn block(kind: SectionKind, height_px: u32) -> BlockExtent {
        BlockExtent {
            kind,
            width_px: 1000,
            height_px,
        }
    }

    /// Pixel height that renders to roughly `mm` at full content width.
    fn px_for_mm(mm: f32, metrics: &PageMetrics) -> u32 {
        (mm * 1000.0 / metrics.content_width()) as u32
    }

    #[test]
    fn test_single_short_section_fits_on_one_page() {
        let metrics = PageMetrics::standard();
        let blocks = vec![block(SectionKind::Header, px_for_mm(50.0, &metrics))];
        let plan = plan_standard(&blocks, &metrics);
        assert_eq!(plan.placements.len(), 1);
        assert_eq!(plan.placements[0].page, 0);
        assert_eq!(plan.placements[0].x_mm, metrics.margins.left);
        assert_eq!(plan.placements[0].y_mm, metrics.margins.top);
        assert!(!plan.trailing_page);
        assert_eq!(plan.page_count, 1);
    }

    #[test]
    fn test_page_break_before_overflowing_section() {
        let metrics = PageMetrics::standard();
        // Two 150mm sections: the second cannot fit below the first on a
        // 287mm usable page, so it must start page 2 at the top margin.
        let h = px_for_mm(150.0, &metrics);
        let blocks = vec![
            block(SectionKind::EducationSkills, h),
            block(SectionKind::Projects, h),
        ];
        let plan = plan_standard(&blocks, &metrics);
        assert_eq!(plan.placements[0].page, 0);
        assert_eq!(plan.placements[1].page, 1);
        assert_eq!(plan.placements[1].y_mm, metrics.margins.top);
    }

    #[test]
    fn test_sections_stack_with_kind_padding() {
        let metrics = PageMetrics::standard();
        let blocks = vec![
            block(SectionKind::Header, px_for_mm(40.0, &metrics)),
            block(SectionKind::ExperienceItem, px_for_mm(40.0, &metrics)),
            block(SectionKind::Projects, px_for_mm(40.0, &metrics)),
        ];
        let plan = plan_standard(&blocks, &metrics);
        let p = &plan.placements;
        // Header carries 2mm padding after it, experience items 5mm.
        let expected_second = metrics.margins.top + p[0].height_mm + 2.0;
        let expected_third = expected_second + p[1].height_mm + 5.0;
        assert!((p[1].y_mm - expected_second).abs() < 0.01);
        assert!((p[2].y_mm - expected_third).abs() < 0.01);
    }

    #[test]
    fn test_oversized_section_scaled_to_95_percent() {
        let metrics = PageMetrics::standard();
        let blocks = vec![block(SectionKind::CustomSection, px_for_mm(400.0, &metrics))];
        let plan = plan_standard(&blocks, &metrics);
        let placement = &plan.placements[0];
        let expected = metrics.usable_height() * 0.95;
        assert!((placement.height_mm - expected).abs() < 0.5);
        // Width shrinks by the same factor, preserving aspect ratio.
        assert!(placement.width_mm < metrics.content_width());
    }

    #[test]
    fn test_trailing_page_added_when_less_than_20mm_remains() {
        let metrics = PageMetrics::standard();
        // One section filling all but ~10mm of the page.
        let blocks = vec![block(
            SectionKind::EducationSkills,
            px_for_mm(metrics.usable_height() - 10.0, &metrics),
        )];
        let plan = plan_standard(&blocks, &metrics);
        assert!(plan.trailing_page);
        assert_eq!(plan.page_count, 2);
        // All content stays on page 1.
        assert!(plan.placements.iter().all(|p| p.page == 0));
    }

    #[test]
    fn test_no_trailing_page_with_ample_space() {
        let metrics = PageMetrics::standard();
        let blocks = vec![block(SectionKind::Header, px_for_mm(100.0, &metrics))];
        let plan = plan_standard(&blocks, &metrics);
        assert!(!plan.trailing_page);
        assert_eq!(plan.page_count, 1);
    }

    #[test]
    fn test_zero_dimension_blocks_skipped() {
        let metrics = PageMetrics::standard();
        let blocks = vec![
            BlockExtent {
                kind: SectionKind::Header,
                width_px: 0,
                height_px: 100,
            },
            block(SectionKind::Projects, px_for_mm(50.0, &metrics)),
        ];
        let plan = plan_standard(&blocks, &metrics);
        assert_eq!(plan.placements.len(), 1);
        assert_eq!(plan.placements[0].block, 1);
    }

    #[test]
    fn test_two_column_sidebar_takes_a_third() {
        let metrics = PageMetrics::two_column();
        let sidebar = block(SectionKind::Sidebar, 2000);
        let blocks = vec![block(SectionKind::ExperienceItem, px_for_mm(60.0, &metrics))];
        let plan = plan_two_column(&sidebar, &blocks, &metrics);

        let sb = &plan.sidebar_placements[0];
        assert!((sb.width_mm - metrics.content_width() / 3.0).abs() < 0.01);
        assert_eq!(sb.x_mm, metrics.margins.left);
        assert_eq!(sb.y_mm, metrics.margins.top);

        // Main content starts right of the sidebar.
        let main = &plan.placements[0];
        assert!((main.x_mm - (metrics.margins.left + sb.width_mm)).abs() < 0.01);
        assert!((main.width_mm - metrics.content_width() * 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_two_column_sidebar_redrawn_on_every_content_page() {
        let metrics = PageMetrics::two_column();
        let sidebar = block(SectionKind::Sidebar, 2000);
        // Main column is ~126mm wide; three 140mm-tall sections span pages.
        let main_width = metrics.content_width() * 2.0 / 3.0;
        let h = (140.0 * 1000.0 / main_width) as u32;
        let blocks = vec![
            block(SectionKind::ExperienceItem, h),
            block(SectionKind::ExperienceItem, h),
            block(SectionKind::ExperienceItem, h),
        ];
        let plan = plan_two_column(&sidebar, &blocks, &metrics);

        let content_pages: Vec<usize> = plan.placements.iter().map(|p| p.page).collect();
        assert_eq!(content_pages, vec![0, 1, 2]);
        // One sidebar per content page, all at the top-left.
        assert_eq!(plan.sidebar_placements.len(), 3);
        for (i, sb) in plan.sidebar_placements.iter().enumerate() {
            assert_eq!(sb.page, i);
            assert_eq!(sb.y_mm, metrics.margins.top);
        }
    }

    #[test]
    fn test_two_column_sidebar_clamped_to_page_height() {
        let metrics = PageMetrics::two_column();
        // Extremely tall sidebar capture.
        let sidebar = block(SectionKind::Sidebar, 50_000);
        let blocks = vec![block(SectionKind::Header, px_for_mm(30.0, &metrics))];
        let plan = plan_two_column(&sidebar, &blocks, &metrics);
        assert!(plan.sidebar_placements[0].height_mm <= metrics.usable_height());
    }

    #[test]
    fn test_two_column_trailing_page_has_no_sidebar() {
        let metrics = PageMetrics::two_column();
        let sidebar = block(SectionKind::Sidebar, 2000);
        let main_width = metrics.content_width() * 2.0 / 3.0;
        // Fill the page almost completely so the trailing rule fires.
        let h = ((metrics.usable_height() - 8.0) * 1000.0 / main_width) as u32;
        let blocks = vec![block(SectionKind::EducationSkills, h)];
        let plan = plan_two_column(&sidebar, &blocks, &metrics);
        assert!(plan.trailing_page);
        assert_eq!(plan.page_count, 2);
        assert_eq!(plan.sidebar_placements.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_single_page() {
        let metrics = PageMetrics::standard();
        let plan = plan_standard(&[], &metrics);
        assert!(plan.placements.is_empty());
        assert_eq!(plan.page_count, 1);
    }
}
