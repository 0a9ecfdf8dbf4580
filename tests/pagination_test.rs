//! Integration tests for page breaking, section starts, grids and footers.

mod common;

use brandkit_pdf::{
    layout_grid, Assembler, Colour, Composition, ContentBlock, Document, FlowCursor, GridSpec,
    Info, LayoutConfig, MockElement, Pt, Section, SwatchEntry, Warning,
};
use chrono::Utc;
use common::{lines, tight_config, FixedMetrics, USABLE};

fn compose(document: &Document, config: LayoutConfig) -> Composition {
    Assembler::new(&FixedMetrics, config)
        .compose(document)
        .expect("composition succeeds")
}

fn single_section(blocks: Vec<ContentBlock>) -> Document {
    let mut section = Section::new("Body");
    for block in blocks {
        section.push(block);
    }
    Document::new("Pagination").with_section(section)
}

#[test]
fn test_exact_fit_produces_one_page() {
    // 120pt split in different ways across blocks
    for split in [vec![10], vec![5, 5], vec![1, 2, 3, 4], vec![9, 1]] {
        let document = single_section(split.iter().map(|n| lines(*n)).collect());
        let composition = compose(&document, tight_config());
        assert_eq!(composition.page_count(), 1, "split {split:?}");
    }
}

#[test]
fn test_exact_fit_with_headings_produces_one_page() {
    let heading = |level| ContentBlock::Heading {
        level,
        text: "Heading".into(),
        colour: None,
    };
    // h1 32, h2 24, h3 20 with the lines around them adding up to 120pt
    let cases = [
        vec![lines(6), heading(2), lines(2)],
        vec![heading(1), lines(2), heading(3), lines(1), heading(3), lines(1)],
        vec![lines(8), heading(2)],
        vec![lines(3), heading(2), heading(2), lines(3)],
    ];
    for blocks in cases {
        let document = single_section(blocks.clone());
        let composition = compose(&document, tight_config());
        assert_eq!(composition.page_count(), 1, "{blocks:?}");
    }
}

#[test]
fn test_heading_never_ends_a_page_before_its_content() {
    let heading = ContentBlock::Heading {
        level: 2,
        text: "Heading".into(),
        colour: None,
    };
    // 96pt or 108pt of text leave no room for the 24pt heading and a 12pt line
    for filler in [8, 9] {
        let document = single_section(vec![lines(filler), heading.clone(), lines(2)]);
        let composition = compose(&document, tight_config());
        assert_eq!(composition.page_count(), 2);
        let heading_page = composition
            .placements
            .iter()
            .find(|p| p.block == 1)
            .map(|p| p.page_index);
        assert_eq!(heading_page, Some(1), "filler {filler}");
    }
}

#[test]
fn test_overflow_produces_more_pages_within_bounds() {
    let config = tight_config();
    for extra in 1..=25 {
        let document = single_section(vec![lines(10), lines(extra)]);
        let composition = compose(&document, config.clone());
        assert!(composition.page_count() >= 2, "extra {extra}");
        for placement in &composition.placements {
            assert!(placement.top >= config.content_top());
            assert!(
                placement.bottom <= config.content_bottom(),
                "{placement:?} crosses the content edge"
            );
        }
        assert!(composition.warnings.is_empty());
    }
}

#[test]
fn test_oversized_block_is_the_only_exception() {
    let config = tight_config();
    let tall = ContentBlock::TemplatePreview {
        elements: vec![MockElement::Placeholder {
            label: "Logo".into(),
            height: Pt(USABLE * 2.0),
        }],
    };
    let document = single_section(vec![lines(2), tall, lines(2)]);
    let composition = compose(&document, config.clone());

    let crossing: Vec<_> = composition
        .placements
        .iter()
        .filter(|p| p.bottom > config.content_bottom())
        .collect();
    assert_eq!(crossing.len(), 1);
    assert_eq!(crossing[0].block, 1);
    assert!(matches!(
        composition.warnings.as_slice(),
        [Warning::OverflowBlock { block: 1, .. }]
    ));
    // the block after it moves on to a fresh page
    let after = composition
        .placements
        .iter()
        .find(|p| p.block == 2)
        .map(|p| p.page_index);
    assert_eq!(after, Some(crossing[0].page_index + 1));
}

#[test]
fn test_sections_never_share_a_page() {
    let sizes = [3, 14, 0, 1, 0, 0, 25, 7];
    let mut document = Document::new("Sections");
    for (i, n) in sizes.iter().enumerate() {
        let mut section = Section::new(format!("Section {i}"));
        if *n > 0 {
            section.push(lines(*n));
        }
        document.add_section(section);
    }
    let composition = compose(&document, tight_config());

    let mut previous_last: Option<usize> = None;
    for (i, n) in sizes.iter().enumerate() {
        let pages: Vec<usize> = composition.placements_of(i).map(|p| p.page_index).collect();
        if *n == 0 {
            // empty sections place nothing and open no page
            assert!(pages.is_empty());
            continue;
        }
        let first = pages[0];
        if let Some(last) = previous_last {
            assert!(first > last, "section {i} starts on page {first}, previous ended on {last}");
        }
        previous_last = pages.last().copied();
    }

    // no blank pages anywhere
    assert!(composition
        .iter_pages()
        .all(|p| p.contents.iter().count() > 2));
    assert_eq!(composition.outline.entries.len(), sizes.len());
}

#[test]
fn test_footers_count_every_page() {
    let document = Document::new("Footers")
        .with_section(Section::new("A").with(lines(30)))
        .with_section(Section::new("B").with(lines(3)));
    let composition = compose(&document, tight_config());
    let n = composition.page_count();
    assert_eq!(n, 4);

    let footers: Vec<String> = composition
        .iter_pages()
        .map(|p| p.footer.clone().expect("every page is stamped"))
        .collect();
    for (i, footer) in footers.iter().enumerate() {
        assert!(footer.contains(&format!("of {n}")));
        assert_eq!(footer, &format!("Footers — Page {} of {n}", i + 1));
    }
}

#[test]
fn test_grid_scenario_five_entries_three_columns() {
    let entries: Vec<SwatchEntry> = ["primary", "secondary", "accent", "dark", "light"]
        .iter()
        .map(|name| SwatchEntry::new(name, Colour::new_grey_bytes(128)))
        .collect();

    let run = |usable: f32| {
        let config = LayoutConfig::default()
            .with_page_size((Pt(595.0), Pt(usable + 130.0)))
            .with_margin(Pt(50.0))
            .with_footer_height(Pt(30.0));
        let spec = GridSpec::swatches(&config, 3);
        let mut cursor = FlowCursor::new(&config);
        let mut pages = Composition::new(Info::new("grid", Utc::now()), config);
        layout_grid(&mut cursor, &mut pages, &entries, &spec)
            .cells
            .iter()
            .map(|c| (c.index, c.row, c.page_index, c.x, c.y))
            .collect::<Vec<_>>()
    };

    // room for exactly one 95pt row: the second row is forced onto the next page
    let one_row = run(95.0);
    assert!(one_row[..3].iter().all(|c| c.1 == 0 && c.2 == 0));
    assert!(one_row[3..].iter().all(|c| c.1 == 1 && c.2 == 1));

    // room for both rows and the gap between them: no break
    let two_rows = run(95.0 * 2.0 + 30.0);
    assert!(two_rows.iter().all(|c| c.2 == 0));
    assert_eq!(two_rows[3].4, two_rows[0].4 + Pt(125.0));

    // determinism
    assert_eq!(run(95.0), one_row);
}

#[test]
fn test_composition_is_deterministic() {
    let document = Document::new("Deterministic")
        .with_section(Section::new("A").with(lines(17)))
        .with_section(
            Section::new("B").with(ContentBlock::SwatchGrid {
                entries: (0..7)
                    .map(|i| SwatchEntry::new(format!("c{i}"), Colour::new_grey_bytes(i * 30)))
                    .collect(),
                columns: 3,
            }),
        );
    let a = compose(&document, LayoutConfig::default());
    let b = compose(&document, LayoutConfig::default());
    assert_eq!(a.placements, b.placements);
    assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
}
