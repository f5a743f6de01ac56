//! Integration tests for whole layout passes.

use flowbox_common::image::ImageDimensions;
use flowbox_layout::layout::inline::LineFragment;
use flowbox_layout::{
    ApproximateShaper, AutoOr, BoxGeometry, BoxId, BoxSizing, BoxSpec, Direction, Display, Float,
    IntrinsicSizeMode, LayoutError, LayoutOptions, LayoutTree, Position, Rect, Style, TextAlign,
    WritingMode, layout_contribution,
};

/// Helper: build and lay out a tree in the default 800x600 viewport.
fn layout(spec: &BoxSpec) -> LayoutTree {
    layout_with(spec, &LayoutOptions::default())
}

/// Helper: build and lay out a tree with custom options.
fn layout_with(spec: &BoxSpec, options: &LayoutOptions) -> LayoutTree {
    let mut tree = LayoutTree::from_spec(spec).expect("valid box tree");
    tree.layout(options, &ApproximateShaper)
        .expect("layout should succeed");
    tree
}

/// Helper: border box of the labelled box.
fn border(tree: &LayoutTree, label: &str) -> Rect {
    tree.geometry_of(label)
        .unwrap_or_else(|| panic!("box {label} should have geometry"))
        .border
}

/// Helper: a block holding one text run.
fn paragraph(label: &str, style: Style, text: &str) -> BoxSpec {
    BoxSpec::block(style, vec![BoxSpec::text(text)]).with_id(label)
}

// ---------------------------------------------------------------------------
// Widths and horizontal margins
//
// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
// ---------------------------------------------------------------------------

#[test]
#[allow(clippy::float_cmp)]
fn test_auto_width_fills_the_containing_block() {
    let child = BoxSpec::block(Style::default().padding(0.0, 10.0, 0.0, 10.0), vec![])
        .with_id("c");
    let tree = layout(&BoxSpec::block(Style::default(), vec![child]));
    let geometry = tree.geometry_of("c").expect("geometry");
    assert_eq!(geometry.border.width, 800.0);
    assert_eq!(geometry.content.width, 780.0);
    assert_eq!(geometry.content.x, 10.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_auto_margins_center_a_sized_block() {
    let child = BoxSpec::block(
        Style::default().with_width(200.0).margin(
            AutoOr::Length(0.0),
            AutoOr::Auto,
            AutoOr::Length(0.0),
            AutoOr::Auto,
        ),
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(Style::default(), vec![child]));
    let c = border(&tree, "c");
    assert_eq!(c.x, 300.0, "(800 - 200) / 2 on each side");
    assert_eq!(c.width, 200.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_single_auto_margin_takes_the_rest() {
    let child = BoxSpec::block(
        Style::default().with_width(200.0).margin(
            AutoOr::Length(0.0),
            AutoOr::Length(50.0),
            AutoOr::Length(0.0),
            AutoOr::Auto,
        ),
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(Style::default(), vec![child]));
    assert_eq!(border(&tree, "c").x, 550.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_over_constrained_margin_follows_direction() {
    let child = || {
        BoxSpec::block(
            Style::default().with_width(200.0).margin(
                AutoOr::Length(0.0),
                AutoOr::Length(0.0),
                AutoOr::Length(0.0),
                AutoOr::Length(0.0),
            ),
            vec![],
        )
        .with_id("c")
    };

    let ltr = layout(&BoxSpec::block(Style::default(), vec![child()]));
    assert_eq!(border(&ltr, "c").x, 0.0, "ltr ignores margin-right");

    let rtl_root = Style {
        direction: Direction::Rtl,
        ..Style::default()
    };
    let rtl = layout(&BoxSpec::block(rtl_root, vec![child()]));
    assert_eq!(border(&rtl, "c").x, 600.0, "rtl ignores margin-left");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_border_box_sizing() {
    let child = BoxSpec::block(
        Style {
            box_sizing: BoxSizing::BorderBox,
            ..Style::default()
                .with_width(200.0)
                .with_height(100.0)
                .padding(10.0, 10.0, 10.0, 10.0)
        },
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(Style::default(), vec![child]));
    let geometry = tree.geometry_of("c").expect("geometry");
    assert_eq!(geometry.border.width, 200.0);
    assert_eq!(geometry.border.height, 100.0);
    assert_eq!(geometry.content.width, 180.0);
}

// ---------------------------------------------------------------------------
// Replaced boxes
//
// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
// ---------------------------------------------------------------------------

#[test]
#[allow(clippy::float_cmp)]
fn test_replaced_box_keeps_its_ratio() {
    let image = BoxSpec::replaced(
        Style::default().with_width(100.0),
        Some(ImageDimensions::new(200.0, 100.0)),
    )
    .with_id("img");
    let after = BoxSpec::block(Style::default().with_height(10.0), vec![]).with_id("after");
    let tree = layout(&BoxSpec::block(Style::default(), vec![image, after]));

    let img = border(&tree, "img");
    assert_eq!((img.width, img.height), (100.0, 50.0));
    assert_eq!(border(&tree, "after").y, 50.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_replaced_box_uses_natural_size() {
    let image = BoxSpec::replaced(Style::default(), Some(ImageDimensions::new(120.0, 80.0)))
        .with_id("img");
    let tree = layout(&BoxSpec::block(Style::default(), vec![image]));
    let img = border(&tree, "img");
    assert_eq!((img.width, img.height), (120.0, 80.0));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_replaced_margins_collapse_with_neighbors() {
    let image = BoxSpec::replaced(
        Style::default().margin_y(20.0, 10.0),
        Some(ImageDimensions::new(50.0, 50.0)),
    )
    .with_id("img");
    let after = BoxSpec::block(
        Style::default().margin_y(30.0, 0.0).with_height(5.0),
        vec![],
    )
    .with_id("after");
    let before = BoxSpec::block(Style::default().margin_y(0.0, 5.0).with_height(5.0), vec![]);
    let tree = layout(&BoxSpec::block(Style::default(), vec![before, image, after]));
    assert_eq!(border(&tree, "img").y, 25.0);
    assert_eq!(border(&tree, "after").y, 105.0);
}

// ---------------------------------------------------------------------------
// Inline content
// ---------------------------------------------------------------------------

#[test]
#[allow(clippy::float_cmp)]
fn test_text_wraps_at_the_content_edge() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![paragraph("p", Style::default().with_width(100.0), "aaaa bbbb cccc")],
    ));
    let id = tree.find("p").expect("labelled box");
    let content = tree.inline_content(id).expect("block of inlines");
    assert_eq!(content.lineboxes.len(), 2);
    assert_eq!(content.lineboxes[0].width, 72.0, "two words and a space");
    assert_eq!(border(&tree, "p").height, 32.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_forced_break_starts_a_line() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![BoxSpec::block(
            Style::default(),
            vec![BoxSpec::text("a"), BoxSpec::line_break(), BoxSpec::text("b")],
        )
        .with_id("p")],
    ));
    let id = tree.find("p").expect("labelled box");
    assert_eq!(tree.inline_content(id).expect("ifc").lineboxes.len(), 2);
    assert_eq!(border(&tree, "p").height, 32.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_text_align_center() {
    let style = Style {
        text_align: TextAlign::Center,
        ..Style::default().with_width(100.0)
    };
    let tree = layout(&BoxSpec::block(Style::default(), vec![paragraph("p", style, "ab")]));
    let id = tree.find("p").expect("labelled box");
    let content = tree.inline_content(id).expect("block of inlines");
    match content.lineboxes[0].fragments.first() {
        Some(LineFragment::Text { inline_offset, .. }) => assert_eq!(*inline_offset, 42.0),
        other => panic!("expected a text fragment, got {other:?}"),
    }
}

#[test]
#[allow(clippy::float_cmp)]
fn test_whitespace_only_block_collapses() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![
            paragraph("blank", Style::default().margin_y(10.0, 10.0), "   "),
            BoxSpec::block(Style::default().with_height(10.0), vec![]).with_id("after"),
        ],
    ));
    assert_eq!(border(&tree, "blank").height, 0.0);
    assert_eq!(border(&tree, "after").y, 10.0, "margins collapse through the blank block");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_inline_block_sits_on_the_line() {
    let inline_block = BoxSpec::block(
        Style::default()
            .displayed(Display::InlineBlock)
            .with_width(30.0)
            .with_height(30.0),
        vec![],
    )
    .with_id("ib");
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![
            BoxSpec::block(Style::default(), vec![BoxSpec::text("ab "), inline_block])
                .with_id("p"),
        ],
    ));
    let ib = border(&tree, "ib");
    assert_eq!(ib.x, 24.0, "after two letters and a space");
    assert_eq!(ib.width, 30.0);
    assert_eq!(border(&tree, "p").height, 33.0, "baseline at 30, descent 3.2");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_shrink_to_fit_float() {
    let float = BoxSpec::block(
        Style::default().floated(Float::Left),
        vec![BoxSpec::text("aaaa bb")],
    )
    .with_id("f");
    let tree = layout(&BoxSpec::block(Style::default(), vec![float]));
    assert_eq!(border(&tree, "f").width, 56.0, "max-content width of the text");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_layout_contribution() {
    let tree = {
        let mut tree = LayoutTree::from_spec(&BoxSpec::block(
            Style::default().padding(0.0, 5.0, 0.0, 5.0),
            vec![BoxSpec::text("aaaa bb")],
        ))
        .expect("valid box tree");
        tree.prelayout(&ApproximateShaper).expect("prelayout");
        tree
    };
    let min = layout_contribution(&tree, BoxId::ROOT, IntrinsicSizeMode::MinContent)
        .expect("contribution");
    let max = layout_contribution(&tree, BoxId::ROOT, IntrinsicSizeMode::MaxContent)
        .expect("contribution");
    assert_eq!(min, 42.0, "longest word plus padding");
    assert_eq!(max, 66.0, "whole line plus padding");
}

// ---------------------------------------------------------------------------
// Whole-pass behavior
// ---------------------------------------------------------------------------

#[test]
#[allow(clippy::float_cmp)]
fn test_relative_position_shifts_the_box_and_its_children() {
    let child = BoxSpec::block(Style::default().with_height(10.0), vec![]).with_id("inner");
    let shifted = BoxSpec::block(
        Style {
            position: Position::Relative,
            top: AutoOr::Length(10.0),
            left: AutoOr::Length(5.0),
            ..Style::default()
        },
        vec![child],
    )
    .with_id("outer");
    let after = BoxSpec::block(Style::default().with_height(10.0), vec![]).with_id("after");
    let tree = layout(&BoxSpec::block(Style::default(), vec![shifted, after]));

    assert_eq!((border(&tree, "outer").x, border(&tree, "outer").y), (5.0, 10.0));
    assert_eq!(border(&tree, "inner").y, 10.0);
    assert_eq!(border(&tree, "after").y, 10.0, "the flow is not affected");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_vertical_rl_stacks_right_to_left() {
    let vertical = Style {
        writing_mode: WritingMode::VerticalRl,
        ..Style::default()
    };
    let options = LayoutOptions {
        writing_mode: WritingMode::VerticalRl,
        ..LayoutOptions::default()
    };
    let tree = layout_with(
        &BoxSpec::block(
            vertical,
            vec![
                BoxSpec::block(Style::default().with_width(30.0), vec![]).with_id("first"),
                BoxSpec::block(Style::default().with_width(40.0), vec![]).with_id("second"),
            ],
        ),
        &options,
    );

    let root = tree.node(BoxId::ROOT).geometry.expect("root geometry").border;
    let first = border(&tree, "first");
    let second = border(&tree, "second");
    assert_eq!(root.width, 70.0);
    assert_eq!(first.x - root.x, 40.0, "the first box hugs the right edge");
    assert_eq!(second.x - root.x, 0.0);
    assert_eq!(first.height, 800.0, "the inline axis is vertical");
}

#[test]
fn test_layout_is_idempotent() {
    let spec = BoxSpec::block(
        Style::default(),
        vec![
            BoxSpec::block(
                Style::default().floated(Float::Right).with_width(50.0).with_height(50.0),
                vec![],
            ),
            BoxSpec::text("some words that wrap around the float"),
            BoxSpec::block(
                Style::default().margin_y(12.0, 3.0),
                vec![BoxSpec::text("x")],
            ),
        ],
    );
    let mut tree = LayoutTree::from_spec(&spec).expect("valid box tree");
    let options = LayoutOptions {
        inline_size: 200.0,
        ..LayoutOptions::default()
    };
    tree.layout(&options, &ApproximateShaper).expect("first pass");
    let first: Vec<Option<BoxGeometry>> = tree.nodes().iter().map(|n| n.geometry).collect();
    tree.layout(&options, &ApproximateShaper).expect("second pass");
    let second: Vec<Option<BoxGeometry>> = tree.nodes().iter().map(|n| n.geometry).collect();
    assert_eq!(first, second);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_tree_from_json() {
    let json = r#"{
        "type": "block",
        "children": [
            { "type": "block", "id": "a", "style": { "height": 20, "margin-bottom": 5 } },
            { "type": "block", "id": "b", "style": { "height": 10, "margin-top": 10, "width": "auto" } }
        ]
    }"#;
    let spec: BoxSpec = serde_json::from_str(json).expect("valid json");
    let tree = layout(&spec);
    assert_eq!(border(&tree, "b").y, 30.0);
    assert_eq!(border(&tree, "b").width, 800.0);
}

#[test]
fn test_floating_root_is_rejected() {
    let spec = BoxSpec::block(Style::default().floated(Float::Left), vec![]);
    assert!(matches!(
        LayoutTree::from_spec(&spec),
        Err(LayoutError::InvalidTree(_))
    ));
}
