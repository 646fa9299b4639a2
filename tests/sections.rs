mod common;

use std::collections::BTreeMap;

use report_pdf::geometry::HEADER_MIN_HEIGHT;
use report_pdf::pdf::{
    Area, CARD_GAP, CARD_HEIGHT, CHART_BOX_HEIGHT, CHART_BOX_WIDTH, DrawOp, Page,
    summary_grid_cell,
};
use report_pdf::{ASCENDER_RATIO, DateRange, FontFace, layout_report, text_width};

#[test]
fn header_is_centered_above_metadata() {
    let data = common::report(vec![], vec![]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();
    let page = &layout.pages[0];

    let (x, baseline) = common::text_pos(page, "Quarterly Portfolio Review").unwrap();
    let width = text_width(FontFace::Bold, "Quarterly Portfolio Review", 24.0);
    assert!(common::approx(x, 50.0 + (layout.geometry.content_width() - width) / 2.0));
    assert!(common::approx(baseline, 50.0 + 24.0 * ASCENDER_RATIO));
    assert!(page.contains_text("Project Status"));

    let (_, meta) = common::text_pos(page, "Generated At:").unwrap();
    assert!(common::approx(meta, 50.0 + HEADER_MIN_HEIGHT + 11.0 * ASCENDER_RATIO));
    assert!(page.contains_text("2024-03-15 14:30:00 UTC"));
}

#[test]
fn metadata_lists_optional_fields_in_order() {
    let mut data = common::report(vec![], vec![]);
    data.metadata.generated_by = Some("Ops Team".into());
    data.metadata.project_name = Some("Apollo".into());
    data.metadata.date_range = Some(DateRange {
        start: Some(common::date(2024, 1, 5)),
        end: None,
    });
    data.metadata.filters = BTreeMap::from([("status".to_string(), serde_json::json!("active"))]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();
    let page = &layout.pages[0];

    let labels = [
        "Generated At:",
        "Generated By:",
        "Project:",
        "Date Range:",
        "Filter (status):",
    ];
    let baselines: Vec<f32> = labels
        .iter()
        .map(|l| common::text_pos(page, l).unwrap().1)
        .collect();
    for pair in baselines.windows(2) {
        assert!(common::approx(pair[1] - pair[0], 18.0));
    }
    assert!(page.contains_text("Ops Team"));
    assert!(page.contains_text("Apollo"));
    assert!(page.contains_text("1/5/2024 - N/A"));
    assert!(page.contains_text("active"));
}

#[test]
fn metadata_omits_unset_fields() {
    let mut data = common::report(vec![], vec![]);
    data.metadata.date_range = Some(DateRange::default());
    let layout = layout_report(&data, vec![], common::a4()).unwrap();
    let page = &layout.pages[0];

    assert!(page.contains_text("Generated At:"));
    assert!(!page.contains_text("Generated By:"));
    assert!(!page.contains_text("Project:"));
    assert!(!page.contains_text("Date Range:"));
}

#[test]
fn long_metadata_continues_on_the_next_page() {
    let mut data = common::report(vec![], vec![]);
    data.metadata.filters = (0..50)
        .map(|i| (format!("key{i:02}"), serde_json::json!("value")))
        .collect();
    let layout = layout_report(&data, vec![], common::a4()).unwrap();
    let limit = layout.geometry.bottom_limit();

    // 36 lines fit between offset 129 and the bottom limit.
    assert_eq!(common::page_of(&layout.pages, "Filter (key34):"), Some(0));
    assert_eq!(common::page_of(&layout.pages, "Filter (key35):"), Some(1));
    assert_eq!(common::page_of(&layout.pages, "Filter (key49):"), Some(1));
    assert_eq!(common::page_of(&layout.pages, "Total Projects"), Some(1));
    assert_eq!(layout.page_count(), 2);

    let (_, top) = common::text_pos(&layout.pages[1], "Filter (key35):").unwrap();
    assert!(common::approx(top, 50.0 + 11.0 * ASCENDER_RATIO));
    for page in &layout.pages {
        for label in page.texts().filter(|t| t.starts_with("Filter (")) {
            let (_, baseline) = common::text_pos(page, label).unwrap();
            assert!(baseline < limit, "{label} at {baseline}");
        }
    }
}

/// Clip rectangle of the first text op reading exactly `needle`.
fn clip_of(page: &Page, needle: &str) -> Option<Area> {
    page.ops.iter().find_map(|op| match op {
        DrawOp::Text { text, clip, .. } if text == needle => *clip,
        _ => None,
    })
}

#[test]
fn wide_titles_stay_inside_the_content_area() {
    let name = "Consolidated Infrastructure Programme Portfolio Review";
    let title = "Quarterly Capital Expenditure Across All Regional Delivery Units and Partner Agencies";
    let charts = vec![common::bar_chart(title)];
    let mut data = common::report(charts.clone(), vec![]);
    data.metadata.report_name = name.into();
    let layout = layout_report(&data, common::placeholder_images(&charts), common::a4()).unwrap();
    let geometry = layout.geometry;
    assert!(text_width(FontFace::Bold, name, 24.0) > geometry.content_width());
    assert!(text_width(FontFace::Bold, title, 14.0) > geometry.content_width());

    for (page, text) in [(&layout.pages[0], name), (&layout.pages[1], title)] {
        let (x, _) = common::text_pos(page, text).unwrap();
        assert!(common::approx(x, geometry.left()), "{text}");
        let clip = clip_of(page, text).unwrap();
        assert!(common::approx(clip.x, geometry.left()));
        assert!(common::approx(clip.width, geometry.content_width()));
    }
}

#[test]
fn charts_on_a_short_page_take_one_page_each() {
    let charts = vec![common::bar_chart("Chart A"), common::bar_chart("Chart B")];
    let data = common::report(charts.clone(), vec![]);
    let geometry = common::page_with_height(400.0);
    let layout = layout_report(&data, common::placeholder_images(&charts), geometry).unwrap();

    assert_eq!(layout.page_count(), 3);
    for page in &layout.pages[1..] {
        assert_eq!(page.image_count(), 1);
        for op in &page.ops {
            if let DrawOp::Image { area, .. } = op {
                assert!(area.y + area.height <= geometry.bottom_limit());
            }
        }
    }
}

#[test]
fn summary_card_positions_follow_the_grid() {
    assert_eq!(summary_grid_cell(0), (0, 0));
    assert_eq!(summary_grid_cell(7), (3, 1));
    assert_eq!(summary_grid_cell(9), (4, 1));

    let data = common::report(vec![], vec![]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();
    let page = &layout.pages[0];

    // Grid starts below header (79) and one metadata line (18 + 12).
    let grid_top = 50.0 + HEADER_MIN_HEIGHT + 30.0;
    let card_w = (layout.geometry.content_width() - CARD_GAP) / 2.0;
    let (x, baseline) = common::text_pos(page, "Completion Rate").unwrap();
    assert!(common::approx(x, 50.0 + card_w + CARD_GAP + 10.0));
    assert!(common::approx(
        baseline,
        grid_top + 3.0 * (CARD_HEIGHT + CARD_GAP) + 10.0 + 9.0 * ASCENDER_RATIO
    ));

    assert!(page.contains_text("64.86%"));
    assert!(page.contains_text("$1,250,000.00"));
    assert!(page.contains_text("-$37,500.00"));
    assert!(page.contains_text("87.5"));
    assert!(page.contains_text("148"));
}

#[test]
fn summary_cards_past_the_margin_are_skipped() {
    // Bottom limit 350: rows at 159 and 234 fit, the row at 309 does not.
    let data = common::report(vec![], vec![]);
    let layout = layout_report(&data, vec![], common::page_with_height(400.0)).unwrap();

    assert_eq!(layout.page_count(), 1);
    let page = &layout.pages[0];
    for label in ["Total Projects", "Active Projects", "Total Activities", "Completed Activities"] {
        assert!(page.contains_text(label), "{label}");
    }
    for metric in &data.summary[4..] {
        assert!(!page.contains_text(&metric.label), "{}", metric.label);
    }
}

#[test]
fn charts_open_a_new_page_and_break_per_block() {
    let charts = vec![
        common::bar_chart("Chart A"),
        common::bar_chart("Chart B"),
        common::bar_chart("Chart C"),
    ];
    let data = common::report(charts.clone(), vec![]);
    let layout = layout_report(&data, common::placeholder_images(&charts), common::a4()).unwrap();

    assert_eq!(layout.page_count(), 3);
    assert_eq!(layout.pages[0].image_count(), 0);
    assert_eq!(layout.pages[1].image_count(), 2);
    assert_eq!(layout.pages[2].image_count(), 1);
    assert_eq!(common::page_of(&layout.pages, "Chart C"), Some(2));

    let images: Vec<(usize, f32, f32)> = layout.pages[1]
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Image { image, area } => Some((*image, area.x, area.y)),
            _ => None,
        })
        .collect();
    let centered_x = (layout.geometry.width - CHART_BOX_WIDTH) / 2.0;
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].0, 0);
    assert_eq!(images[1].0, 1);
    assert!(images.iter().all(|(_, x, _)| common::approx(*x, centered_x)));
    assert!(common::approx(images[0].2, 74.0));
    assert!(common::approx(images[1].2, 74.0 + CHART_BOX_HEIGHT + 30.0 + 24.0));
}

#[test]
fn empty_charts_and_tables_give_a_single_page() {
    let data = common::report(vec![], vec![]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();

    assert_eq!(layout.page_count(), 1);
    assert_eq!(layout.pages[0].image_count(), 0);
    assert!(layout.pages[0].contains_text("Page 1 of 1"));
}

#[test]
fn empty_summary_still_renders_header_page() {
    let mut data = common::report(vec![], vec![]);
    data.summary.clear();
    let layout = layout_report(&data, vec![], common::a4()).unwrap();

    assert_eq!(layout.page_count(), 1);
    assert!(layout.pages[0].contains_text("Quarterly Portfolio Review"));
}
