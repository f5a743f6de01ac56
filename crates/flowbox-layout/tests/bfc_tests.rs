//! Integration tests for block formatting contexts, floats and clearance.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//! [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)

use flowbox_layout::{
    ApproximateShaper, BlockFormattingContext, BoxId, BoxSpec, Clear, Display, Float,
    LayoutError, LayoutOptions, LayoutTree, Rect, Style,
};

/// Helper: build and lay out a tree in the default 800x600 viewport.
fn layout(spec: &BoxSpec) -> LayoutTree {
    let mut tree = LayoutTree::from_spec(spec).expect("valid box tree");
    tree.layout(&LayoutOptions::default(), &ApproximateShaper)
        .expect("layout should succeed");
    tree
}

/// Helper: border box of the labelled box.
fn border(tree: &LayoutTree, label: &str) -> Rect {
    tree.geometry_of(label)
        .unwrap_or_else(|| panic!("box {label} should have geometry"))
        .border
}

/// Helper: a floated empty block of the given size.
fn float(label: &str, side: Float, width: f64, height: f64) -> BoxSpec {
    BoxSpec::block(
        Style::default()
            .floated(side)
            .with_width(width)
            .with_height(height),
        vec![],
    )
    .with_id(label)
}

#[test]
#[allow(clippy::float_cmp)]
fn test_floats_go_to_their_sides() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![
            float("l", Float::Left, 100.0, 40.0),
            float("r", Float::Right, 100.0, 60.0),
        ],
    ));
    let l = border(&tree, "l");
    let r = border(&tree, "r");
    assert_eq!((l.x, l.y, l.width, l.height), (0.0, 0.0, 100.0, 40.0));
    assert_eq!((r.x, r.y, r.width, r.height), (700.0, 0.0, 100.0, 60.0));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_clear_both_moves_below_every_float() {
    let cleared = BoxSpec::block(
        Style::default().cleared(Clear::Both).with_height(10.0),
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![
            float("l", Float::Left, 100.0, 40.0),
            float("r", Float::Right, 100.0, 60.0),
            cleared,
        ],
    ));
    assert_eq!(border(&tree, "c").y, 60.0, "cleared past the taller float");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_clear_left_ignores_right_floats() {
    let cleared = BoxSpec::block(
        Style::default().cleared(Clear::Left).with_height(10.0),
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![
            float("l", Float::Left, 100.0, 40.0),
            float("r", Float::Right, 100.0, 60.0),
            cleared,
        ],
    ));
    assert_eq!(border(&tree, "c").y, 40.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_clear_after_a_taller_in_flow_box() {
    let tall = BoxSpec::block(Style::default().with_height(100.0), vec![]);
    let cleared = BoxSpec::block(
        Style::default().cleared(Clear::Left).with_height(10.0),
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![float("l", Float::Left, 100.0, 40.0), tall, cleared],
    ));
    assert_eq!(
        border(&tree, "c").y,
        100.0,
        "already below the float, so no clearance"
    );
}

#[test]
#[allow(clippy::float_cmp)]
fn test_clearance_replaces_a_small_margin() {
    let cleared = BoxSpec::block(
        Style::default()
            .cleared(Clear::Left)
            .with_height(10.0)
            .margin_y(15.0, 0.0),
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![float("l", Float::Left, 100.0, 40.0), cleared],
    ));
    assert_eq!(
        border(&tree, "c").y,
        40.0,
        "the border edge lands on the float's bottom, not 15px below it"
    );
}

#[test]
#[allow(clippy::float_cmp)]
fn test_no_clearance_when_margin_already_clears() {
    let cleared = BoxSpec::block(
        Style::default()
            .cleared(Clear::Left)
            .with_height(10.0)
            .margin_y(50.0, 0.0),
        vec![],
    )
    .with_id("c");
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![float("l", Float::Left, 100.0, 40.0), cleared],
    ));
    assert_eq!(border(&tree, "c").y, 50.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_formatting_context_root_contains_its_floats() {
    let root = BoxSpec::block(
        Style::default().displayed(Display::FlowRoot),
        vec![float("f", Float::Left, 50.0, 50.0)],
    )
    .with_id("p");
    let after = BoxSpec::block(Style::default().with_height(10.0), vec![]).with_id("after");
    let tree = layout(&BoxSpec::block(Style::default(), vec![root, after]));

    assert_eq!(border(&tree, "p").height, 50.0, "grows to its float's bottom");
    assert_eq!(border(&tree, "after").y, 50.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_plain_block_does_not_contain_floats() {
    let plain = BoxSpec::block(
        Style::default(),
        vec![float("f", Float::Left, 50.0, 50.0)],
    )
    .with_id("p");
    let tree = layout(&BoxSpec::block(Style::default(), vec![plain]));
    assert_eq!(border(&tree, "p").height, 0.0);
    let root = tree.node(BoxId::ROOT).geometry.expect("root geometry");
    assert_eq!(root.border.height, 50.0, "the root still grows to the float");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_text_wraps_around_a_float() {
    let ifc = BoxSpec::block(
        Style::default().with_width(200.0),
        vec![
            float("f", Float::Left, 100.0, 20.0),
            BoxSpec::text("aaaaaaaa bbbbbbbb"),
        ],
    )
    .with_id("p");
    let tree = layout(&BoxSpec::block(Style::default(), vec![ifc]));

    let id = tree.find("p").expect("labelled box");
    let content = tree.inline_content(id).expect("block of inlines");
    assert_eq!(content.lineboxes.len(), 2, "one word fits beside the float");
    assert_eq!(content.lineboxes[0].inline_offset, 100.0);
    assert_eq!(content.lineboxes[0].inline_size, 100.0);
    assert_eq!(content.lineboxes[1].block_offset, 16.0);
    assert_eq!(content.lineboxes[1].inline_offset, 100.0, "still beside the float");
    assert_eq!(border(&tree, "p").height, 32.0);
}

#[test]
fn test_box_end_without_box_start() {
    let mut tree =
        LayoutTree::from_spec(&BoxSpec::block(Style::default(), vec![])).expect("valid box tree");
    let mut bfc = BlockFormattingContext::new(800.0);
    let result = bfc.box_end(&mut tree, BoxId::ROOT);
    assert!(matches!(result, Err(LayoutError::StructuralInvariant(_))));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_float_that_misses_a_started_line_drops_below_it() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![
            BoxSpec::text("aaaa"),
            float("f", Float::Left, 790.0, 10.0),
        ],
    ));
    let f = border(&tree, "f");
    assert_eq!(f.x, 0.0);
    assert_eq!(f.y, 16.0, "placed after the line that already holds text");

    let content = tree.inline_content(BoxId::ROOT).expect("block of inlines");
    assert_eq!(content.lineboxes.len(), 1);
    assert_eq!(content.lineboxes[0].inline_offset, 0.0, "the line keeps its full width");
}
