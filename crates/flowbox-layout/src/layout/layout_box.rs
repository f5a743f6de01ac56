//! Block-level layout drivers.
//!
//! [§ 10.3 Calculating widths and margins](https://www.w3.org/TR/CSS2/visudet.html#Computing_widths_and_margins)
//! [§ 10.6 Calculating heights and margins](https://www.w3.org/TR/CSS2/visudet.html#Computing_heights_and_margins)
//!
//! Every block-level box first resolves its inline box model (width and
//! margins), then its block box model (height, unless `auto`), then enters
//! its block formatting context and lays out its children.

use log::trace;

use super::float::FloatBox;
use super::formatting_context::BlockFormattingContext;
use super::inline::{self, TextShaper};
use super::tree::{BoxId, BoxKind, LayoutTree};
use super::values::AutoOr;
use crate::error::{LayoutError, Result};
use crate::style::Direction;

/// [§ 5.1 Intrinsic Sizes](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrinsicSizeMode {
    /// "The smallest size a box could take that doesn't lead to overflow
    /// that could be avoided by choosing a larger size."
    MinContent,
    /// "A box's ideal size in a given axis when given infinite available
    /// space."
    MaxContent,
}

/// Natural logical size of a replaced box: `(inline, block, inline / block)`.
fn replaced_intrinsic(tree: &LayoutTree, id: BoxId) -> (f64, f64, f64) {
    let horizontal = tree.cb_writing_mode(id).is_horizontal();
    match &tree.node(id).kind {
        BoxKind::Replaced(content) => match content.intrinsic {
            Some(dims) if horizontal => (dims.width, dims.height, dims.ratio()),
            Some(dims) => (dims.height, dims.width, 1.0 / dims.ratio()),
            None => (0.0, 0.0, 1.0),
        },
        _ => (0.0, 0.0, 1.0),
    }
}

/// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
///
/// Content-box inline size when it does not depend on layout.
fn definite_inner_inline_size(tree: &LayoutTree, id: BoxId) -> Option<f64> {
    let wm = tree.cb_writing_mode(id);
    let node = tree.node(id);
    match node.style.inline_size(wm) {
        AutoOr::Length(size) => Some(size),
        AutoOr::Auto => match node.kind {
            BoxKind::Replaced(_) => {
                let (inline_size, _, ratio) = replaced_intrinsic(tree, id);
                Some(match node.style.block_size(wm) {
                    AutoOr::Length(block_size) => block_size * ratio,
                    AutoOr::Auto => inline_size,
                })
            }
            _ => None,
        },
    }
}

/// Border-box inline size when it does not depend on layout.
fn definite_outer_inline_size(tree: &LayoutTree, id: BoxId) -> Option<f64> {
    let wm = tree.cb_writing_mode(id);
    definite_inner_inline_size(tree, id)
        .map(|size| size + tree.node(id).style.inline_padding_border(wm))
}

/// Content-box block size when it does not depend on layout.
fn definite_inner_block_size(tree: &LayoutTree, id: BoxId) -> Option<f64> {
    let wm = tree.cb_writing_mode(id);
    let node = tree.node(id);
    match node.style.block_size(wm) {
        AutoOr::Length(size) => Some(size),
        AutoOr::Auto => match node.kind {
            BoxKind::Replaced(_) => {
                let (_, block_size, ratio) = replaced_intrinsic(tree, id);
                Some(match node.style.inline_size(wm) {
                    AutoOr::Length(inline_size) => inline_size / ratio,
                    AutoOr::Auto => block_size,
                })
            }
            _ => None,
        },
    }
}

fn fill_areas(tree: &mut LayoutTree, id: BoxId) {
    let wm = tree.cb_writing_mode(id);
    let node = tree.node_mut(id);
    node.areas.fill(&node.style, wm);
}

/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
/// 'padding-right' + 'border-right-width' + 'margin-right' = width of
/// containing block"
fn do_inline_box_model_for_block_box(tree: &mut LayoutTree, id: BoxId) -> Result<()> {
    let wm = tree.cb_writing_mode(id);
    let direction = tree.cb_direction(id);
    let c_inline_size = tree.containing_inline_size(id)?;
    let inline_size = definite_inner_inline_size(tree, id);
    let style = &tree.node(id).style;
    let mut margin_line_left = style.margin_line_left(wm);
    let mut margin_line_right = style.margin_line_right(wm);

    let (line_left, line_right) = if let Some(inline_size) = inline_size {
        let specified = inline_size
            + style.inline_padding_border(wm)
            + margin_line_left.to_px_or(0.0)
            + margin_line_right.to_px_or(0.0);

        // "If 'width' is not 'auto' and 'border-left-width' + ... is larger
        // than the width of the containing block, then any 'auto' values
        // for 'margin-left' or 'margin-right' are, for the following rules,
        // treated as zero."
        if specified > c_inline_size {
            margin_line_left = AutoOr::Length(margin_line_left.to_px_or(0.0));
            margin_line_right = AutoOr::Length(margin_line_right.to_px_or(0.0));
        }

        match (margin_line_left, margin_line_right) {
            // "If all of the above have a computed value other than 'auto',
            // the values are said to be over-constrained and one of the used
            // values will have to be different from its computed value."
            (AutoOr::Length(left), AutoOr::Length(right)) => match direction {
                Direction::Ltr => (left, c_inline_size - (specified - right)),
                Direction::Rtl => (c_inline_size - (specified - left), right),
            },
            (AutoOr::Auto, AutoOr::Length(right)) => (c_inline_size - specified, right),
            (AutoOr::Length(left), AutoOr::Auto) => (left, c_inline_size - specified),
            // "If both 'margin-left' and 'margin-right' are 'auto', their
            // used values are equal."
            (AutoOr::Auto, AutoOr::Auto) => {
                let margin = (c_inline_size - specified) / 2.0;
                (margin, margin)
            }
        }
    } else {
        (
            margin_line_left.to_px_or(0.0),
            margin_line_right.to_px_or(0.0),
        )
    };

    let node = tree.node_mut(id);
    node.areas.set_inline_position(line_left);
    node.areas
        .set_inline_outer_size(c_inline_size - line_left - line_right, &node.style, wm);
    Ok(())
}

/// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
fn do_block_box_model_for_block_box(tree: &mut LayoutTree, id: BoxId) -> Result<()> {
    let wm = tree.cb_writing_mode(id);
    let size = match tree.node(id).style.block_size(wm) {
        AutoOr::Length(size) => Some(size),
        AutoOr::Auto if can_collapse_through(tree, id)? => Some(0.0),
        AutoOr::Auto => None,
    };
    if let Some(size) = size {
        let node = tree.node_mut(id);
        node.areas.set_block_size(size, &node.style, wm);
    }
    Ok(())
}

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// True if the box's own block-start and block-end margins adjoin: it has
/// a zero or `auto` block size, no content that takes up block space, and
/// it is not a formatting context root.
///
/// "top and bottom margins of a box that does not establish a new block
/// formatting context and that has zero computed 'min-height', zero or
/// 'auto' computed 'height', and no in-flow children"
///
/// # Errors
///
/// Returns [`LayoutError::UnexpectedBoxKind`] for anything but a block
/// container.
pub fn can_collapse_through(tree: &LayoutTree, id: BoxId) -> Result<bool> {
    let wm = tree.cb_writing_mode(id);
    let node = tree.node(id);
    if let AutoOr::Length(size) = node.style.block_size(wm)
        && size != 0.0
    {
        return Ok(false);
    }
    if node.flags.is_bfc_root {
        return Ok(false);
    }
    match node.kind {
        BoxKind::BlockOfInlines(_) => Ok(!tree.root_inline(id)?.flags.makes_lines()),
        BoxKind::BlockOfBlocks => Ok(node.tree_final == node.tree_start),
        _ => Err(LayoutError::UnexpectedBoxKind {
            id,
            expected: "block container",
        }),
    }
}

/// Lay out a block container's content after its box model is resolved.
///
/// `containing` is the formatting context the box participates in; floats
/// and atomic inlines have none.
fn layout_block_box_inner(
    tree: &mut LayoutTree,
    id: BoxId,
    mut containing: Option<&mut BlockFormattingContext>,
    shaper: &dyn TextShaper,
) -> Result<()> {
    let node = tree.node(id);
    let is_ifc = matches!(node.kind, BoxKind::BlockOfInlines(_));
    let mut established = node
        .flags
        .is_bfc_root
        .then(|| BlockFormattingContext::new(node.areas.content.inline_size));

    match containing.as_deref_mut() {
        Some(bfc) => bfc.box_start(tree, id, established.as_mut(), shaper)?,
        None if is_ifc => {
            let bfc = established.as_mut().ok_or_else(|| {
                LayoutError::StructuralInvariant(format!(
                    "box {id} is outside any formatting context and does not establish one"
                ))
            })?;
            inline::do_text_layout(tree, id, bfc, shaper)?;
        }
        None => {}
    }

    if matches!(tree.node(id).kind, BoxKind::BlockOfBlocks) {
        let children: Vec<BoxId> = tree.children(id).collect();
        for child in children {
            let bfc = match established.as_mut() {
                Some(bfc) => bfc,
                None => containing.as_deref_mut().ok_or_else(|| {
                    LayoutError::StructuralInvariant(format!(
                        "box {id} is outside any formatting context and does not establish one"
                    ))
                })?,
            };
            layout_block_level_box(tree, child, bfc, shaper)?;
        }
    }

    if let Some(bfc) = established.as_mut() {
        bfc.finalize(tree, id)?;
    }

    if let Some(bfc) = containing {
        bfc.box_end(tree, id)?;
    }
    Ok(())
}

fn layout_block_box(
    tree: &mut LayoutTree,
    id: BoxId,
    bfc: &mut BlockFormattingContext,
    shaper: &dyn TextShaper,
) -> Result<()> {
    fill_areas(tree, id);
    do_inline_box_model_for_block_box(tree, id)?;
    do_block_box_model_for_block_box(tree, id)?;
    layout_block_box_inner(tree, id, Some(bfc), shaper)
}

fn layout_replaced_box(
    tree: &mut LayoutTree,
    id: BoxId,
    bfc: &mut BlockFormattingContext,
) -> Result<()> {
    fill_areas(tree, id);
    do_inline_box_model_for_block_box(tree, id)?;
    let wm = tree.cb_writing_mode(id);
    let block_size = definite_inner_block_size(tree, id).unwrap_or(0.0);
    let node = tree.node_mut(id);
    node.areas.set_block_size(block_size, &node.style, wm);
    bfc.box_atomic(tree, id)
}

/// Lay out an in-flow block-level box and its subtree in `bfc`.
///
/// # Errors
///
/// Returns [`LayoutError::StructuralInvariant`] for floats, which are laid
/// out by their inline formatting context, and
/// [`LayoutError::UnexpectedBoxKind`] for inline-level boxes. Errors from
/// the subtree are propagated.
pub fn layout_block_level_box(
    tree: &mut LayoutTree,
    id: BoxId,
    bfc: &mut BlockFormattingContext,
    shaper: &dyn TextShaper,
) -> Result<()> {
    let node = tree.node(id);
    if node.is_float() {
        return Err(LayoutError::StructuralInvariant(format!(
            "float {id} reached block flow; floats are placed by their inline formatting context"
        )));
    }
    trace!("layout {}", node.name());
    match node.kind {
        BoxKind::BlockOfInlines(_) | BoxKind::BlockOfBlocks => {
            layout_block_box(tree, id, bfc, shaper)
        }
        BoxKind::Replaced(_) => layout_replaced_box(tree, id, bfc),
        BoxKind::Inline | BoxKind::Run { .. } | BoxKind::Break => {
            Err(LayoutError::UnexpectedBoxKind {
                id,
                expected: "block-level box",
            })
        }
    }
}

/// [§ 5.1 Intrinsic Sizes](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
///
/// Outer min-content or max-content contribution of a block-level box:
/// its margin box inline size when laid out at that intrinsic size.
/// `auto` margins count as zero.
///
/// # Errors
///
/// Returns [`LayoutError::UnexpectedBoxKind`] for inline-level boxes.
pub fn layout_contribution(tree: &LayoutTree, id: BoxId, mode: IntrinsicSizeMode) -> Result<f64> {
    let wm = tree.cb_writing_mode(id);
    let node = tree.node(id);
    let style = &node.style;
    let outer = style.margin_line_left(wm).to_px_or(0.0)
        + style.inline_padding_border(wm)
        + style.margin_line_right(wm).to_px_or(0.0);

    let inline_size = match style.inline_size(wm) {
        AutoOr::Length(size) => size,
        AutoOr::Auto => match &node.kind {
            BoxKind::Replaced(_) => definite_inner_inline_size(tree, id).unwrap_or(0.0),
            BoxKind::BlockOfBlocks => {
                let mut widest: f64 = 0.0;
                for child in tree.children(id) {
                    widest = widest.max(layout_contribution(tree, child, mode)?);
                }
                widest
            }
            BoxKind::BlockOfInlines(_) => {
                let flags = tree.root_inline(id)?.flags;
                if flags.makes_lines() || flags.has_float_or_replaced {
                    inline::ifc_contribution(tree, id, mode)?
                } else {
                    0.0
                }
            }
            BoxKind::Inline | BoxKind::Run { .. } | BoxKind::Break => {
                return Err(LayoutError::UnexpectedBoxKind {
                    id,
                    expected: "block-level box",
                });
            }
        },
    };
    Ok(outer + inline_size)
}

/// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
///
/// Size a float or an atomic inline and lay out its content in its own
/// formatting context. Positioning is left to the caller.
///
/// "If 'width' is computed as 'auto', the used value is the
/// 'shrink-to-fit' width. [...] min(max(preferred minimum width, available
/// width), preferred width)."
///
/// # Errors
///
/// Propagates errors from measuring and laying out the subtree.
pub fn layout_float_box(tree: &mut LayoutTree, id: BoxId, shaper: &dyn TextShaper) -> Result<()> {
    fill_areas(tree, id);
    let wm = tree.cb_writing_mode(id);

    let inline_size = match definite_outer_inline_size(tree, id) {
        Some(size) => size,
        None => {
            let min_content = layout_contribution(tree, id, IntrinsicSizeMode::MinContent)?;
            let max_content = layout_contribution(tree, id, IntrinsicSizeMode::MaxContent)?;
            let available = tree.containing_inline_size(id)?;
            let style = &tree.node(id).style;
            min_content.max(max_content.min(available))
                - style.margin_line_left(wm).to_px_or(0.0)
                - style.margin_line_right(wm).to_px_or(0.0)
        }
    };

    let block_size = definite_inner_block_size(tree, id);
    let node = tree.node_mut(id);
    node.areas.set_inline_outer_size(inline_size, &node.style, wm);
    if let Some(block_size) = block_size {
        node.areas.set_block_size(block_size, &node.style, wm);
    }
    trace!("float-or-atomic {id}: inline size {inline_size}");

    if node.kind.is_block_container() {
        layout_block_box_inner(tree, id, None, shaper)?;
    }
    Ok(())
}

/// Describe a laid out float (or atomic inline) for the float context.
///
/// # Errors
///
/// Returns [`LayoutError::UsedValueNotReady`] if the box has not been
/// sized yet.
pub fn float_box_desc(tree: &LayoutTree, id: BoxId) -> Result<FloatBox> {
    let wm = tree.cb_writing_mode(id);
    let style = &tree.node(id).style;
    Ok(FloatBox {
        id,
        float: style.float,
        clear: style.clear,
        border_inline_size: tree.border_inline_size(id)?,
        border_block_size: tree.border_block_size(id)?,
        margin_block_start: style.margin_block_start(wm).to_px_or(0.0),
        margin_block_end: style.margin_block_end(wm).to_px_or(0.0),
        margin_line_left: style.margin_line_left(wm).to_px_or(0.0),
        margin_line_right: style.margin_line_right(wm).to_px_or(0.0),
        cb_inline_size: tree.containing_inline_size(id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tree::BoxSpec;
    use crate::style::{Display, Style};

    fn tree_of(children: Vec<BoxSpec>) -> LayoutTree {
        LayoutTree::from_spec(&BoxSpec::block(Style::default(), children)).unwrap()
    }

    #[test]
    fn test_empty_block_collapses_through() {
        let tree = tree_of(vec![BoxSpec::block(Style::default(), vec![])]);
        assert!(can_collapse_through(&tree, BoxId(1)).unwrap());
    }

    #[test]
    fn test_sized_or_rooted_block_does_not_collapse_through() {
        let tree = tree_of(vec![
            BoxSpec::block(Style::default().with_height(1.0), vec![]),
            BoxSpec::block(Style::default().displayed(Display::FlowRoot), vec![]),
        ]);
        assert!(!can_collapse_through(&tree, BoxId(1)).unwrap());
        assert!(!can_collapse_through(&tree, BoxId(2)).unwrap());
    }

    #[test]
    fn test_zero_height_is_still_empty() {
        let tree = tree_of(vec![BoxSpec::block(Style::default().with_height(0.0), vec![])]);
        assert!(can_collapse_through(&tree, BoxId(1)).unwrap());
    }

    #[test]
    fn test_inline_is_not_a_block_container() {
        let mut tree = tree_of(vec![BoxSpec::text("a")]);
        tree.prelayout(&inline::ApproximateShaper).unwrap();
        // 0: root, 1: anonymous root inline, 2: the run
        assert!(matches!(
            can_collapse_through(&tree, BoxId(1)),
            Err(LayoutError::UnexpectedBoxKind { .. })
        ));
        assert!(!can_collapse_through(&tree, BoxId::ROOT).unwrap());
    }
}
