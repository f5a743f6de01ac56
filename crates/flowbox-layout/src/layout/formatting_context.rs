//! Block Formatting Context.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a block
//! formatting context collapse."
//!
//! Positions are not final when a box is entered: a margin that is still
//! collapsing can push boxes that were already entered further down. Entered
//! and exited boxes are therefore queued on a stack and replayed by
//! [`BlockFormattingContext::position_block_containers`] once the collapsed
//! margin is known.

use std::collections::HashMap;
use std::mem;

use log::trace;

use super::float::{BfcCursor, FloatContext, IfcVacancy};
use super::inline::{self, TextShaper};
use super::layout_box::can_collapse_through;
use super::margin::MarginCollapseCollection;
use super::tree::{BoxId, BoxKind, LayoutTree};
use crate::error::{LayoutError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackItem {
    Start(BoxId),
    End(BoxId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    End,
}

/// The margin currently collapsing and the depth it started at.
#[derive(Debug, Clone, Copy, Default)]
struct MarginState {
    level: usize,
    collection: MarginCollapseCollection,
    clearance_at_level: Option<usize>,
}

impl MarginState {
    fn at(level: usize) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

/// Layout state of one block formatting context.
///
/// One instance lives exactly as long as its root's subtree is being laid
/// out. Offsets are relative to the root's content area.
#[derive(Debug, Clone)]
pub struct BlockFormattingContext {
    /// Inline size of the root's content area.
    pub inline_size: f64,
    /// Floats of this context, created when the first float is met.
    pub fctx: Option<FloatContext>,
    /// Block offset of the last positioned content edge.
    pub cb_block_start: f64,
    /// Line-left inset of the current containing block.
    pub cb_line_left: f64,
    /// Line-right inset of the current containing block.
    pub cb_line_right: f64,
    stack: Vec<StackItem>,
    size_stack: Vec<f64>,
    offset_stack: Vec<f64>,
    last: Option<Last>,
    level: usize,
    hypotheticals: HashMap<BoxId, f64>,
    margin: MarginState,
}

impl BlockFormattingContext {
    /// Create a context for a root whose content area is `inline_size` wide.
    #[must_use]
    pub fn new(inline_size: f64) -> Self {
        Self {
            inline_size,
            fctx: None,
            cb_block_start: 0.0,
            cb_line_left: 0.0,
            cb_line_right: 0.0,
            stack: Vec::new(),
            size_stack: vec![0.0],
            offset_stack: vec![0.0],
            last: None,
            level: 0,
            hypotheticals: HashMap::new(),
            margin: MarginState::default(),
        }
    }

    /// Current containing block edges, as seen by the float context.
    #[must_use]
    pub const fn cursor(&self) -> BfcCursor {
        BfcCursor {
            block_start: self.cb_block_start,
            line_left: self.cb_line_left,
            line_right: self.cb_line_right,
            inline_size: self.inline_size,
        }
    }

    /// Nesting depth of the box currently entered.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// Fold a box's block-start margin into the collapsing margin, or break
    /// the chain with clearance.
    ///
    /// "Values other than 'none' potentially introduce clearance. Clearance
    /// inhibits margin collapsing and acts as spacing above the margin-top
    /// of an element."
    fn collapse_start(&mut self, tree: &mut LayoutTree, id: BoxId) -> Result<()> {
        let wm = tree.cb_writing_mode(id);
        let style = &tree.node(id).style;
        let margin_block_start = style.margin_block_start(wm).to_px_or(0.0);
        let mut float_bottom: f64 = 0.0;
        let mut clearance: f64 = 0.0;

        if let Some(fctx) = &self.fctx {
            if style.clear.clears_left() {
                float_bottom = float_bottom.max(fctx.left_bottom());
            }
            if style.clear.clears_right() {
                float_bottom = float_bottom.max(fctx.right_bottom());
            }
        }

        if style.clear.clears_left() || style.clear.clears_right() {
            let mut hypothetical = self.margin.collection;
            let hypothetical = hypothetical.add(margin_block_start).get();
            clearance = clearance.max(float_bottom - (self.cb_block_start + hypothetical));
        }

        trace!("collapse-start {id}: margin {margin_block_start}, clearance {clearance}");

        if clearance <= 0.0 {
            let _ = self.margin.collection.add(margin_block_start);
        } else {
            self.position_block_containers(tree)?;
            self.margin = MarginState {
                level: self.level,
                collection: MarginCollapseCollection::new(float_bottom - self.cb_block_start),
                clearance_at_level: None,
            };
            if can_collapse_through(tree, id)? {
                self.margin.clearance_at_level = Some(self.level);
            }
        }
        Ok(())
    }

    /// Enter a block container.
    ///
    /// A block container of inlines is laid out right away so that the
    /// boxes after it see its size. Its text is laid out in `established`
    /// if the box is a formatting context root, and in `self` otherwise.
    ///
    /// # Errors
    ///
    /// Propagates errors from inline layout and from reading unresolved
    /// sizes of the box.
    pub fn box_start(
        &mut self,
        tree: &mut LayoutTree,
        id: BoxId,
        established: Option<&mut Self>,
        shaper: &dyn TextShaper,
    ) -> Result<()> {
        let wm = tree.cb_writing_mode(id);
        let (line_left, line_right, block_start) = tree.containing_block_to_content(id)?;
        let node = tree.node(id);
        let adjoins_next = node.style.padding_block_start(wm) == 0.0
            && node.style.border_block_start_width(wm) == 0.0;
        let is_ifc = matches!(node.kind, BoxKind::BlockOfInlines(_));

        self.collapse_start(tree, id)?;
        trace!("box-start {id}: level {}", self.level + 1);

        self.last = Some(Last::Start);
        self.level += 1;
        self.cb_line_left += line_left;
        self.cb_line_right += line_right;
        self.stack.push(StackItem::Start(id));

        if is_ifc {
            let offset = block_start + self.margin.collection.get();
            self.cb_block_start += offset;
            let cursor = self.cursor();
            if let Some(fctx) = &mut self.fctx {
                fctx.box_start(&cursor);
            }
            match established {
                Some(bfc) => inline::do_text_layout(tree, id, bfc, shaper)?,
                None => inline::do_text_layout(tree, id, self, shaper)?,
            }
            self.cb_block_start -= offset;
        } else {
            let cursor = self.cursor();
            if let Some(fctx) = &mut self.fctx {
                fctx.box_start(&cursor);
            }
        }

        if !adjoins_next {
            self.position_block_containers(tree)?;
            self.margin = MarginState::at(self.level);
        }
        Ok(())
    }

    /// Leave a block container.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::StructuralInvariant`] if no box is entered.
    pub fn box_end(&mut self, tree: &mut LayoutTree, id: BoxId) -> Result<()> {
        if self.level == 0 {
            return Err(LayoutError::StructuralInvariant(format!(
                "box-end for box {id} without a matching box-start"
            )));
        }
        let wm = tree.cb_writing_mode(id);
        let (line_left, line_right, _) = tree.containing_block_to_content(id)?;
        let style = &tree.node(id).style;
        let margin_block_end = style.margin_block_end(wm).to_px_or(0.0);
        let mut adjoins = style.padding_block_end(wm) == 0.0
            && style.border_block_end_width(wm) == 0.0
            && self
                .margin
                .clearance_at_level
                .is_none_or(|level| self.level > level);

        if adjoins {
            adjoins = if self.last == Some(Last::Start) {
                can_collapse_through(tree, id)?
            } else {
                style.block_size(wm).is_auto()
            };
        }

        trace!("box-end {id}: margin {margin_block_end}, adjoins {adjoins}");

        self.stack.push(StackItem::End(id));
        self.level -= 1;
        self.cb_line_left -= line_left;
        self.cb_line_right -= line_right;

        if !adjoins {
            self.position_block_containers(tree)?;
            self.margin = MarginState::at(self.level);
        }

        if self.last == Some(Last::Start) {
            let _ = self.hypotheticals.insert(id, self.margin.collection.get());
        }

        let _ = self.margin.collection.add(margin_block_end);
        if self.level < self.margin.level {
            self.margin.level = self.level;
        }

        self.last = Some(Last::End);
        Ok(())
    }

    /// Place an atomic block-level box (a replaced box) immediately.
    ///
    /// The box's border block size must already be resolved.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UsedValueNotReady`] if it is not.
    pub fn box_atomic(&mut self, tree: &mut LayoutTree, id: BoxId) -> Result<()> {
        let wm = tree.cb_writing_mode(id);
        let margin_block_end = tree.node(id).style.margin_block_end(wm).to_px_or(0.0);
        let block_size = tree.border_block_size(id)?;

        self.collapse_start(tree, id)?;
        self.position_block_containers(tree)?;
        let cursor = self.cursor();
        if let Some(fctx) = &mut self.fctx {
            fctx.box_start(&cursor);
        }

        let level = self.size_stack.len() - 1;
        let position = self.size_stack[level];
        tree.node_mut(id).areas.set_block_position(position);
        self.size_stack[level] += block_size;
        self.cb_block_start += block_size;
        trace!("box-atomic {id}: at {position}, size {block_size}");

        self.margin = MarginState {
            level: self.level,
            collection: MarginCollapseCollection::new(margin_block_end),
            clearance_at_level: None,
        };
        self.last = Some(Last::End);
        Ok(())
    }

    /// Create the float context if there is none yet.
    pub fn ensure_float_context(&mut self, block_offset: f64) -> &mut FloatContext {
        self.fctx
            .get_or_insert_with(|| FloatContext::new(block_offset))
    }

    fn to_local(&self, vacancy: IfcVacancy) -> IfcVacancy {
        IfcVacancy {
            left_offset: vacancy.left_offset - self.cb_line_left,
            right_offset: vacancy.right_offset - self.cb_line_right,
            block_offset: vacancy.block_offset - self.cb_block_start,
            ..vacancy
        }
    }

    fn unconstrained_vacancy(&self, block_offset: f64) -> IfcVacancy {
        IfcVacancy {
            left_offset: 0.0,
            right_offset: 0.0,
            inline_size: self.inline_size - self.cb_line_left - self.cb_line_right,
            block_offset,
            left_float_count: 0,
            right_float_count: 0,
        }
    }

    /// Vacancy for a line of the current containing block.
    ///
    /// `block_offset` and the result are relative to the containing block's
    /// content area. Without floats this is the containing block's full
    /// inline extent.
    #[must_use]
    pub fn local_vacancy_for_line(&self, block_offset: f64, block_size: f64) -> IfcVacancy {
        match &self.fctx {
            Some(fctx) => self.to_local(fctx.get_vacancy_for_line(
                &self.cursor(),
                self.cb_block_start + block_offset,
                block_size,
            )),
            None => self.unconstrained_vacancy(block_offset),
        }
    }

    /// [`FloatContext::find_line_position`] in the current containing
    /// block's coordinates.
    #[must_use]
    pub fn find_line_position_local(
        &self,
        block_offset: f64,
        block_size: f64,
        inline_size: f64,
    ) -> IfcVacancy {
        match &self.fctx {
            Some(fctx) => self.to_local(fctx.find_line_position(
                &self.cursor(),
                self.cb_block_start + block_offset,
                block_size,
                inline_size,
            )),
            None => self.unconstrained_vacancy(block_offset),
        }
    }

    /// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// Flush the queue and size the root.
    ///
    /// "If the element has any floating descendants whose bottom margin
    /// edge is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::StructuralInvariant`] if `id` is not a
    /// formatting context root.
    pub fn finalize(&mut self, tree: &mut LayoutTree, id: BoxId) -> Result<()> {
        if !tree.node(id).flags.is_bfc_root {
            return Err(LayoutError::StructuralInvariant(format!(
                "finalize called for box {id}, which is not a formatting context root"
            )));
        }
        let wm = tree.cb_writing_mode(id);

        self.position_block_containers(tree)?;

        let node = tree.node_mut(id);
        if node.style.block_size(wm).is_auto() {
            let linebox_height = match node.kind {
                BoxKind::BlockOfInlines(_) => node.areas.content.block_size,
                _ => 0.0,
            };
            let float_bottom = self.fctx.as_ref().map_or(0.0, FloatContext::both_bottom);
            let size = linebox_height.max(self.cb_block_start).max(float_bottom);
            node.areas.set_block_size(size, &node.style, wm);
        }
        trace!("finalize {id}: content ends at {}", self.cb_block_start);
        Ok(())
    }

    /// Replay queued box starts and ends now that the collapsing margin is
    /// known, writing final block positions and auto block sizes.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UsedValueNotReady`] if a queued box has no
    /// block size, or [`LayoutError::StructuralInvariant`] if the queue is
    /// unbalanced.
    pub fn position_block_containers(&mut self, tree: &mut LayoutTree) -> Result<()> {
        let margin = self.margin.collection.get();
        let mut passed_margin_level = self.margin.level == self.offset_stack.len() - 1;
        let mut level_needs_post_offset = self.offset_stack.len() - 1;

        if let Some(size) = self.size_stack.get_mut(self.margin.level) {
            *size += margin;
        }
        self.cb_block_start += margin;

        trace!(
            "position {} queued item(s) with margin {margin}",
            self.stack.len()
        );

        for item in mem::take(&mut self.stack) {
            match item {
                StackItem::End(id) => {
                    let (Some(child_size), Some(offset)) =
                        (self.size_stack.pop(), self.offset_stack.pop())
                    else {
                        return Err(LayoutError::StructuralInvariant(format!(
                            "box {id} ended without a queued start"
                        )));
                    };
                    let level = self.size_stack.len().checked_sub(1).ok_or_else(|| {
                        LayoutError::StructuralInvariant(format!(
                            "box {id} ended below the formatting context root"
                        ))
                    })?;
                    let wm = tree.cb_writing_mode(id);
                    let node = tree.node_mut(id);
                    if node.style.block_size(wm).is_auto()
                        && node.kind == BoxKind::BlockOfBlocks
                        && !node.flags.is_bfc_root
                    {
                        node.areas.set_block_size(child_size, &node.style, wm);
                    }

                    let block_size = tree.border_block_size(id)?;
                    self.size_stack[level] += block_size;
                    self.cb_block_start = offset + block_size;

                    if level < level_needs_post_offset {
                        level_needs_post_offset -= 1;
                        self.cb_block_start += margin;
                    }
                }
                StackItem::Start(id) => {
                    let level = self.size_stack.len() - 1;
                    let mut block_offset = self.size_stack[level];

                    if !passed_margin_level {
                        passed_margin_level = self.margin.level == level;
                    }
                    if !passed_margin_level {
                        block_offset += margin;
                    }
                    if let Some(hypothetical) = self.hypotheticals.get(&id) {
                        block_offset -= margin - hypothetical;
                    }

                    let node = tree.node_mut(id);
                    node.areas.set_block_position(block_offset);
                    self.size_stack.push(0.0);
                    self.offset_stack.push(self.cb_block_start);
                    self.cb_block_start += node.areas.content_block_offset();
                }
            }
        }
        Ok(())
    }
}
