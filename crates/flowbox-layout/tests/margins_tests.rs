//! Integration tests for vertical margin collapsing.
//!
//! [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
//!
//! "When two or more margins collapse, the resulting margin width is the
//! maximum of the collapsing margins' widths. In the case of negative
//! margins, the maximum of the absolute values of the negative adjoining
//! margins is deducted from the maximum of the positive adjoining margins."

use flowbox_layout::{ApproximateShaper, BoxSpec, Display, LayoutOptions, LayoutTree, Rect, Style};

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

/// Helper: an empty block with a label, a height and block margins.
fn sized(label: &str, height: f64, top: f64, bottom: f64) -> BoxSpec {
    BoxSpec::block(
        Style::default().with_height(height).margin_y(top, bottom),
        vec![],
    )
    .with_id(label)
}

#[test]
#[allow(clippy::float_cmp)]
fn test_sibling_margins_collapse_to_the_larger() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![sized("a", 20.0, 0.0, 5.0), sized("b", 10.0, 10.0, 0.0)],
    ));
    assert_eq!(border(&tree, "a").y, 0.0);
    assert_eq!(
        border(&tree, "b").y,
        30.0,
        "5px and 10px collapse into 10px below a 20px box"
    );
    assert_eq!(border(&tree, "b").height, 10.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_negative_margin_is_deducted() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![sized("a", 20.0, 0.0, 10.0), sized("b", 10.0, -4.0, 0.0)],
    ));
    assert_eq!(border(&tree, "b").y, 26.0, "10px and -4px collapse into 6px");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_both_negative_margins_take_the_most_negative() {
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![sized("a", 20.0, 0.0, -3.0), sized("b", 10.0, -7.0, 0.0)],
    ));
    assert_eq!(border(&tree, "b").y, 13.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_margins_collapse_through_an_empty_block() {
    let empty = BoxSpec::block(Style::default().margin_y(10.0, 10.0), vec![]).with_id("e");
    let tree = layout(&BoxSpec::block(
        Style::default(),
        vec![sized("a", 20.0, 0.0, 0.0), empty, sized("b", 10.0, 15.0, 0.0)],
    ));

    let e = border(&tree, "e");
    assert_eq!(e.height, 0.0, "an empty block collapses to nothing");
    assert_eq!(
        e.y, 30.0,
        "the collapsed-through box sits where its own margins put it"
    );
    assert_eq!(border(&tree, "b").y, 35.0, "10, 10 and 15 collapse into 15");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_first_child_margin_collapses_with_parent() {
    let child = sized("c", 10.0, 20.0, 0.0);
    let parent = BoxSpec::block(Style::default().margin_y(10.0, 0.0), vec![child]).with_id("p");
    let tree = layout(&BoxSpec::block(Style::default(), vec![parent]));

    let p = border(&tree, "p");
    let c = border(&tree, "c");
    assert_eq!(p.y, 20.0, "the parent takes the larger of the two margins");
    assert_eq!(c.y, p.y, "the child sits flush with the parent's top edge");
    assert_eq!(p.height, 10.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_last_child_margin_collapses_with_parent() {
    let child = sized("c", 10.0, 0.0, 25.0);
    let parent = BoxSpec::block(Style::default(), vec![child]).with_id("p");
    let after = sized("after", 10.0, 5.0, 0.0);
    let tree = layout(&BoxSpec::block(Style::default(), vec![parent, after]));

    assert_eq!(border(&tree, "p").height, 10.0, "the margin is not inside the parent");
    assert_eq!(border(&tree, "after").y, 35.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_border_separates_parent_and_child_margins() {
    let child = sized("c", 10.0, 20.0, 0.0);
    let parent = BoxSpec::block(
        Style::default()
            .margin_y(10.0, 0.0)
            .border(1.0, 0.0, 0.0, 0.0),
        vec![child],
    )
    .with_id("p");
    let tree = layout(&BoxSpec::block(Style::default(), vec![parent]));

    assert_eq!(border(&tree, "p").y, 10.0);
    assert_eq!(
        border(&tree, "c").y,
        31.0,
        "the child's margin stays inside the bordered parent"
    );
    assert_eq!(border(&tree, "p").height, 31.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_padding_separates_parent_and_child_margins() {
    let child = sized("c", 10.0, 20.0, 0.0);
    let parent = BoxSpec::block(
        Style::default()
            .margin_y(10.0, 0.0)
            .padding(5.0, 0.0, 0.0, 0.0),
        vec![child],
    )
    .with_id("p");
    let tree = layout(&BoxSpec::block(Style::default(), vec![parent]));

    assert_eq!(border(&tree, "c").y, 35.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_formatting_context_root_keeps_child_margins() {
    let child = sized("c", 10.0, 20.0, 0.0);
    let parent = BoxSpec::block(
        Style::default()
            .margin_y(10.0, 0.0)
            .displayed(Display::FlowRoot),
        vec![child],
    )
    .with_id("p");
    let tree = layout(&BoxSpec::block(Style::default(), vec![parent]));

    assert_eq!(border(&tree, "p").y, 10.0);
    assert_eq!(border(&tree, "c").y, 30.0);
    assert_eq!(border(&tree, "p").height, 30.0);
}
