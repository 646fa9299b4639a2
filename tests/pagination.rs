mod common;

use report_pdf::pdf::{ROW_HEIGHT, SHADE_EVEN, SHADE_ODD, TABLE_HEAD_HEIGHT, row_shade};
use report_pdf::{PageCursor, layout_report};

#[test]
fn ensure_space_breaks_only_when_short() {
    let geometry = common::page_with_height(650.0);
    assert!(common::approx(geometry.usable_height(), 550.0));

    let mut cursor = geometry.start_cursor();
    assert!(!geometry.ensure_space(&mut cursor, 550.0));
    assert_eq!(cursor, PageCursor { page_index: 0, offset: 50.0 });

    cursor.offset = 590.0;
    assert!(common::approx(geometry.remaining(&cursor), 10.0));
    assert!(!geometry.ensure_space(&mut cursor, 10.0));
    assert!(geometry.ensure_space(&mut cursor, 10.5));
    assert_eq!(cursor, PageCursor { page_index: 1, offset: 50.0 });
}

#[test]
fn short_table_stays_on_one_page() {
    let table = common::task_table("Open Activities", "Task", 10);
    let data = common::report(vec![], vec![table]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();

    // Summary leaves the cursor at 534; 48 + 10 * 20 fits above 791.89.
    assert_eq!(layout.page_count(), 1);
    let page = &layout.pages[0];
    for i in 0..10 {
        assert!(page.contains_text(&format!("Task {i:02}")));
    }
}

#[test]
fn long_table_rows_appear_once_in_order() {
    let first = common::task_table("Milestones", "Milestone", 3);
    let second = common::task_table("All Activities", "Task", 100);
    let data = common::report(vec![], vec![first, second]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();

    // Second table opens page 2. First page holds floor((791.89 - 98) / 20) = 34 rows,
    // continuation pages floor(741.89 / 20) = 37 rows.
    let start = common::page_of(&layout.pages, "All Activities").unwrap();
    assert_eq!(start, 1);

    let mut last_page = start;
    let mut last_baseline = f32::MIN;
    let mut rows_per_page = vec![0usize; layout.page_count()];
    for i in 0..100 {
        let label = format!("Task {i:02}");
        let hits: Vec<usize> = layout
            .pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.texts().filter(|t| *t == label).count() == 1)
            .map(|(pi, _)| pi)
            .collect();
        assert_eq!(hits.len(), 1, "{label} should appear on exactly one page");
        let page = hits[0];
        let (_, baseline) = common::text_pos(&layout.pages[page], &label).unwrap();
        if page == last_page {
            assert!(baseline > last_baseline, "{label} out of order");
        } else {
            assert_eq!(page, last_page + 1, "{label} skipped a page");
        }
        last_page = page;
        last_baseline = baseline;
        rows_per_page[page] += 1;
    }

    assert_eq!(&rows_per_page[1..], &[34, 37, 29]);
    let capacity = ((layout.geometry.bottom_limit() - layout.geometry.margins.top) / ROW_HEIGHT)
        .floor() as usize;
    let breaks = layout.page_count() - 1 - start;
    assert_eq!(breaks, (100 - 34usize).div_ceil(capacity));
}

#[test]
fn header_row_is_not_repeated_after_break() {
    let table = common::task_table("All Activities", "Task", 60);
    let data = common::report(vec![], vec![table]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();

    let with_header: Vec<usize> = layout
        .pages
        .iter()
        .enumerate()
        .filter(|(_, p)| p.contains_text("Activity"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(with_header.len(), 1);
    let continuation = layout.page_count() - 1;
    assert!(continuation > with_header[0]);

    // Continuation rows start right at the top margin.
    let page = &layout.pages[continuation];
    let first_row = (0..60)
        .map(|i| format!("Task {i:02}"))
        .find(|label| page.contains_text(label))
        .unwrap();
    let (_, baseline) = common::text_pos(page, &first_row).unwrap();
    assert!(baseline > 50.0 && baseline < 50.0 + ROW_HEIGHT);
}

#[test]
fn every_table_after_the_first_starts_a_page() {
    let tables = vec![
        common::task_table("Alpha", "A", 2),
        common::task_table("Beta", "B", 2),
        common::task_table("Gamma", "C", 2),
    ];
    let data = common::report(vec![], tables);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();

    assert_eq!(common::page_of(&layout.pages, "Alpha"), Some(0));
    assert_eq!(common::page_of(&layout.pages, "Beta"), Some(1));
    assert_eq!(common::page_of(&layout.pages, "Gamma"), Some(2));
    let (_, title_baseline) = common::text_pos(&layout.pages[2], "Gamma").unwrap();
    assert!(title_baseline < 50.0 + TABLE_HEAD_HEIGHT);
}

#[test]
fn first_table_moves_when_its_head_does_not_fit() {
    // 400pt page: the summary grid pushes the cursor past the bottom margin.
    let geometry = common::page_with_height(400.0);
    let data = common::report(vec![], vec![common::task_table("Backlog", "Task", 3)]);
    let layout = layout_report(&data, vec![], geometry).unwrap();

    assert_eq!(common::page_of(&layout.pages, "Backlog"), Some(1));
    let (_, baseline) = common::text_pos(&layout.pages[1], "Backlog").unwrap();
    assert!(baseline > 50.0 && baseline < 50.0 + 24.0);
}

#[test]
fn shading_follows_table_index_across_pages() {
    let table = common::task_table("All Activities", "Task", 80);
    let data = common::report(vec![], vec![table]);
    let layout = layout_report(&data, vec![], common::a4()).unwrap();
    assert!(layout.page_count() > 1);

    for i in 0..80 {
        let label = format!("Task {i:02}");
        let page = common::page_of(&layout.pages, &label).unwrap();
        let fill = layout.pages[page].fill_behind(&label);
        assert_eq!(fill, Some(row_shade(i)), "{label}");
    }
    assert_eq!(row_shade(0), SHADE_EVEN);
    assert_eq!(row_shade(1), SHADE_ODD);
}

#[test]
fn chart_and_long_table_round_trip() {
    // 650pt page: chart page ends at 344, the table head at 392, leaving room
    // for exactly ten 20pt rows above 600.
    let geometry = common::page_with_height(650.0);
    let charts = vec![common::status_chart()];
    let data = common::report(
        charts.clone(),
        vec![common::task_table("Activity Log", "Task", 15)],
    );
    let layout = layout_report(&data, common::placeholder_images(&charts), geometry).unwrap();

    assert_eq!(layout.page_count(), 3);
    assert_eq!(layout.pages[0].image_count(), 0);
    assert_eq!(layout.pages[1].image_count(), 1);
    assert!(layout.pages[1].contains_text("Activity Status"));
    assert_eq!(common::page_of(&layout.pages, "Activity Log"), Some(1));

    for i in 0..10 {
        assert_eq!(common::page_of(&layout.pages, &format!("Task {i:02}")), Some(1));
    }
    for i in 10..15 {
        assert_eq!(common::page_of(&layout.pages, &format!("Task {i:02}")), Some(2));
    }

    assert_eq!(layout.pages[1].fill_behind("Task 09"), Some(SHADE_ODD));
    assert_eq!(layout.pages[2].fill_behind("Task 10"), Some(SHADE_EVEN));
    let (_, baseline) = common::text_pos(&layout.pages[2], "Task 10").unwrap();
    assert!(baseline > 50.0 && baseline < 50.0 + ROW_HEIGHT);
}
