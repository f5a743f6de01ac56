//! Inline Formatting Context.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! Pre-layout flattens the inline subtree of a block container into a list
//! of [`InlineItem`]s. Layout breaks the items into [`Linebox`]es, asking
//! the block formatting context for the space each line may use.

use std::mem;

use log::trace;
use serde::Serialize;

use flowbox_common::warning::warn_once;

use super::float::{IfcVacancy, PlacedFloat};
use super::formatting_context::BlockFormattingContext;
use super::layout_box::{IntrinsicSizeMode, float_box_desc, layout_contribution, layout_float_box};
use super::tree::{BoxId, BoxKind, LayoutNode, LayoutTree};
use crate::error::Result;
use crate::style::{Direction, LineHeight, Style, TextAlign, WhiteSpace};

/// Font metrics in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the em box.
    pub ascender: f64,
    /// Distance from the baseline to the bottom of the em box (positive).
    pub descender: f64,
    /// Extra space recommended between lines.
    pub line_gap: f64,
}

/// The text-shaping collaborator.
///
/// Shaping is opaque to layout: it only needs advances and vertical metrics.
pub trait TextShaper {
    /// Advance width of `text` set in `style`'s font.
    fn measure(&self, text: &str, style: &Style) -> f64;

    /// Metrics of `style`'s font.
    fn metrics(&self, style: &Style) -> FontMetrics;
}

/// A shaper with fixed-pitch metrics: every character advances half the
/// font size, ascender 0.8 and descender 0.2 of the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateShaper;

impl TextShaper for ApproximateShaper {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, style: &Style) -> f64 {
        text.chars().count() as f64 * style.font_size * 0.5
    }

    fn metrics(&self, style: &Style) -> FontMetrics {
        FontMetrics {
            ascender: style.font_size * 0.8,
            descender: style.font_size * 0.2,
            line_gap: 0.0,
        }
    }
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// Ascender and descender of an inline box's layout bounds.
///
/// "Half the leading is added above A and the other half below D, giving
/// the glyph and its leading a total height above the baseline of
/// A' = A + L/2 and a total depth of D' = D + L/2."
fn inline_extent(shaper: &dyn TextShaper, style: &Style) -> (f64, f64) {
    let metrics = shaper.metrics(style);
    let content = metrics.ascender + metrics.descender + metrics.line_gap;
    let line_height = match style.line_height {
        LineHeight::Normal => content,
        LineHeight::Number(n) => n * style.font_size,
    };
    let half_leading = (line_height - content) / 2.0;
    (
        metrics.ascender + metrics.line_gap / 2.0 + half_leading,
        metrics.descender + metrics.line_gap / 2.0 + half_leading,
    )
}

/// One shaped piece of an inline formatting context.
///
/// `start..end` index the context's text buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InlineItem {
    /// A word.
    Text {
        /// Inline box the text belongs to.
        inline: BoxId,
        /// Start of the text.
        start: usize,
        /// End of the text.
        end: usize,
        /// Advance width.
        width: f64,
    },
    /// A space.
    Space {
        /// Inline box the space belongs to.
        inline: BoxId,
        /// Start of the text.
        start: usize,
        /// End of the text.
        end: usize,
        /// Advance width.
        width: f64,
        /// A line may break after this space.
        breakable: bool,
        /// The space is removed at the start and end of a line.
        collapsible: bool,
    },
    /// Margin, border and padding at the start or end of an inline box.
    Gap {
        /// The inline box.
        inline: BoxId,
        /// Inline extent.
        width: f64,
    },
    /// A forced line break.
    Break,
    /// A float anchored at this point.
    Float(BoxId),
    /// An atomic inline.
    Atomic(BoxId),
}

/// A piece of a line box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LineFragment {
    /// A text range.
    Text {
        /// Inline box the text belongs to.
        inline: BoxId,
        /// Start of the text.
        start: usize,
        /// End of the text.
        end: usize,
        /// Offset from the block container's line-left content edge.
        inline_offset: f64,
        /// Advance width.
        width: f64,
    },
    /// An atomic inline.
    Atomic {
        /// The atomic inline.
        id: BoxId,
        /// Offset of its margin box from the line-left content edge.
        inline_offset: f64,
        /// Margin-box inline size.
        width: f64,
    },
}

/// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is
/// called a line box."
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Linebox {
    /// Offset from the block container's content block-start edge.
    pub block_offset: f64,
    /// Height above the baseline.
    pub ascender: f64,
    /// Depth below the baseline.
    pub descender: f64,
    /// Offset of the line's vacancy from the line-left content edge.
    pub inline_offset: f64,
    /// Width of the line's vacancy.
    pub inline_size: f64,
    /// Width used by the line's content.
    pub width: f64,
    /// Content of the line in logical order.
    pub fragments: Vec<LineFragment>,
}

impl Linebox {
    /// Line height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascender + self.descender
    }

    /// Block offset of the line's block-end edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.block_offset + self.height()
    }
}

/// Everything a block container of inlines owns for layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InlineContent {
    /// Text after white space processing.
    pub text: String,
    /// Items in logical order, rebuilt by every pre-layout pass.
    pub items: Vec<InlineItem>,
    /// Line boxes of the last layout pass.
    pub lineboxes: Vec<Linebox>,
}

impl InlineContent {
    /// Text of a fragment.
    #[must_use]
    pub fn fragment_text(&self, fragment: &LineFragment) -> &str {
        match fragment {
            LineFragment::Text { start, end, .. } => self.text.get(*start..*end).unwrap_or(""),
            LineFragment::Atomic { .. } => "",
        }
    }
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// True if a run produces visible text under `white_space`.
pub(crate) fn run_has_text(text: &str, white_space: WhiteSpace) -> bool {
    if white_space.collapses_spaces() {
        text.chars()
            .any(|c| !is_space(c) || (c == '\n' && white_space.preserves_newlines()))
    } else {
        !text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineSide {
    Start,
    End,
}

struct ItemBuilder<'a> {
    tree: &'a LayoutTree,
    shaper: &'a dyn TextShaper,
    content: InlineContent,
    /// The previous item ends in collapsible white space (or nothing).
    prev_space: bool,
}

impl ItemBuilder<'_> {
    /// Margin, border and padding on one side of an inline box.
    fn gap(&mut self, inline: BoxId, side: InlineSide) {
        let wm = self.tree.cb_writing_mode(inline);
        let style = &self.tree.node(inline).style;
        let line_left = matches!(
            (self.tree.cb_direction(inline), side),
            (Direction::Ltr, InlineSide::Start) | (Direction::Rtl, InlineSide::End)
        );
        let width = if line_left {
            style.margin_line_left(wm).to_px_or(0.0)
                + style.border_line_left_width(wm)
                + style.padding_line_left(wm)
        } else {
            style.margin_line_right(wm).to_px_or(0.0)
                + style.border_line_right_width(wm)
                + style.padding_line_right(wm)
        };
        if width != 0.0 {
            self.content.items.push(InlineItem::Gap { inline, width });
        }
    }

    fn flush_word(&mut self, word_start: &mut Option<usize>, inline: BoxId, style: &Style) {
        if let Some(start) = word_start.take() {
            let end = self.content.text.len();
            let width = self.shaper.measure(&self.content.text[start..end], style);
            self.content.items.push(InlineItem::Text {
                inline,
                start,
                end,
                width,
            });
        }
    }

    /// [§ 4.1 The White Space Processing Rules](https://www.w3.org/TR/css-text-3/#white-space-rules)
    fn run(&mut self, node: &LayoutNode, text: &str, inline: BoxId) {
        let style = &node.style;
        let white_space = style.white_space;
        let collapsible = white_space.collapses_spaces();
        let mut word_start = None;

        for c in text.chars() {
            if c == '\n' && white_space.preserves_newlines() {
                self.flush_word(&mut word_start, inline, style);
                self.content.items.push(InlineItem::Break);
                self.prev_space = true;
                continue;
            }

            if is_space(c) {
                self.flush_word(&mut word_start, inline, style);
                if collapsible && self.prev_space {
                    continue;
                }
                if c == '\t' && !collapsible {
                    warn_once(
                        "inline",
                        "tab stops are not supported, tabs are laid out as spaces",
                    );
                }
                let start = self.content.text.len();
                self.content.text.push(' ');
                self.content.items.push(InlineItem::Space {
                    inline,
                    start,
                    end: start + 1,
                    width: self.shaper.measure(" ", style),
                    breakable: white_space.wraps(),
                    collapsible,
                });
                self.prev_space = collapsible;
                continue;
            }

            if word_start.is_none() {
                word_start = Some(self.content.text.len());
            }
            self.content.text.push(c);
            self.prev_space = false;
        }

        self.flush_word(&mut word_start, inline, style);
    }
}

/// Flatten the inline subtree of block container `ifc` into items.
///
/// # Errors
///
/// Returns [`crate::LayoutError::UnexpectedBoxKind`] if the first child of
/// `ifc` is not its root inline box.
pub fn build_inline_content(
    tree: &LayoutTree,
    ifc: BoxId,
    shaper: &dyn TextShaper,
) -> Result<InlineContent> {
    let root = tree.root_inline(ifc)?;
    let mut builder = ItemBuilder {
        tree,
        shaper,
        content: InlineContent::default(),
        prev_space: true,
    };
    let mut open: Vec<BoxId> = Vec::new();
    let mut i = root.id.0 + 1;

    while i <= root.tree_final {
        while let Some(&inline) = open.last() {
            if tree.node(inline).tree_final >= i {
                break;
            }
            let _ = open.pop();
            builder.gap(inline, InlineSide::End);
        }

        let node = tree.node(BoxId(i));
        match &node.kind {
            BoxKind::Inline => {
                builder.gap(node.id, InlineSide::Start);
                open.push(node.id);
            }
            BoxKind::Run { text } => {
                let inline = node.parent.unwrap_or(root.id);
                builder.run(node, text, inline);
            }
            BoxKind::Break => {
                builder.content.items.push(InlineItem::Break);
                builder.prev_space = true;
            }
            BoxKind::BlockOfInlines(_) | BoxKind::BlockOfBlocks | BoxKind::Replaced(_) => {
                if node.is_float() {
                    builder.content.items.push(InlineItem::Float(node.id));
                } else {
                    builder.content.items.push(InlineItem::Atomic(node.id));
                    builder.prev_space = false;
                }
            }
        }
        // Floats and atomic inlines are skipped as a whole.
        i = if node.kind.is_formatting_box() {
            node.tree_final + 1
        } else {
            i + 1
        };
    }
    while let Some(inline) = open.pop() {
        builder.gap(inline, InlineSide::End);
    }

    trace!(
        "ifc {ifc}: {} item(s), {} byte(s) of text",
        builder.content.items.len(),
        builder.content.text.len()
    );
    Ok(builder.content)
}

fn apply_placements(tree: &mut LayoutTree, placed: &[PlacedFloat]) {
    for p in placed {
        let areas = &mut tree.node_mut(p.id).areas;
        areas.set_block_position(p.block_start);
        areas.set_inline_position(p.line_left);
    }
}

/// End of the unit starting at `start`: a run of items with no break
/// opportunity between them.
fn unit_end(items: &[InlineItem], start: usize) -> usize {
    if let Some(InlineItem::Space {
        breakable: true, ..
    }) = items.get(start)
    {
        return start + 1;
    }
    let mut end = start;
    while let Some(item) = items.get(end) {
        match item {
            InlineItem::Text { .. }
            | InlineItem::Gap { .. }
            | InlineItem::Atomic(_)
            | InlineItem::Space {
                breakable: false, ..
            } => end += 1,
            InlineItem::Space { .. } | InlineItem::Break | InlineItem::Float(_) => break,
        }
    }
    end
}

#[derive(Debug, Default)]
struct Line {
    vacancy: Option<IfcVacancy>,
    width: f64,
    fragments: Vec<LineFragment>,
    inlines: Vec<BoxId>,
    atomics: Vec<BoxId>,
    has_content: bool,
}

impl Line {
    fn push_inline(&mut self, inline: BoxId) {
        if !self.inlines.contains(&inline) {
            self.inlines.push(inline);
        }
    }
}

/// Greedy line breaker for one inline formatting context.
struct LineBuilder<'a> {
    tree: &'a mut LayoutTree,
    bfc: &'a mut BlockFormattingContext,
    shaper: &'a dyn TextShaper,
    strut: (f64, f64),
    align: TextAlign,
    block_offset: f64,
    line: Line,
    pending_space: Option<InlineItem>,
    lineboxes: Vec<Linebox>,
}

impl LineBuilder<'_> {
    fn strut_height(&self) -> f64 {
        self.strut.0 + self.strut.1
    }

    fn run(mut self, items: &[InlineItem]) -> Result<Vec<Linebox>> {
        let mut i = 0;
        while i < items.len() {
            match &items[i] {
                InlineItem::Break => {
                    self.finish_line(true)?;
                    i += 1;
                }
                InlineItem::Float(id) => {
                    self.place_float(*id)?;
                    i += 1;
                }
                space @ InlineItem::Space {
                    breakable: true,
                    collapsible: true,
                    ..
                } => {
                    if self.line.has_content {
                        self.pending_space = Some(space.clone());
                    }
                    i += 1;
                }
                _ => {
                    let end = unit_end(items, i);
                    self.place_unit(&items[i..end])?;
                    i = end;
                }
            }
        }

        if self.line.has_content {
            self.finish_line(false)?;
        }

        // Misfits never outlive the formatting context that anchored them.
        let cursor = self.bfc.cursor();
        let placed = match self.bfc.fctx.as_mut() {
            Some(fctx) => fctx.consume_misfits(&cursor)?,
            None => Vec::new(),
        };
        apply_placements(self.tree, &placed);
        Ok(self.lineboxes)
    }

    fn item_width(&mut self, item: &InlineItem) -> Result<f64> {
        Ok(match item {
            InlineItem::Text { width, .. }
            | InlineItem::Space { width, .. }
            | InlineItem::Gap { width, .. } => *width,
            InlineItem::Atomic(id) => {
                layout_float_box(self.tree, *id, self.shaper)?;
                float_box_desc(self.tree, *id)?.margin_box_inline_size()
            }
            InlineItem::Break | InlineItem::Float(_) => 0.0,
        })
    }

    fn place_unit(&mut self, unit: &[InlineItem]) -> Result<()> {
        let mut width = 0.0;
        let mut widths = Vec::with_capacity(unit.len());
        for item in unit {
            let w = self.item_width(item)?;
            widths.push(w);
            width += w;
        }
        let hangs = matches!(unit, [InlineItem::Space { .. }]);

        if self.line.has_content {
            let space = match &self.pending_space {
                Some(InlineItem::Space { width, .. }) => *width,
                _ => 0.0,
            };
            let fits = self
                .line
                .vacancy
                .is_some_and(|v| v.fits(self.line.width + space + width));
            if hangs || fits {
                if let Some(space) = self.pending_space.take() {
                    self.push_item(&space, space_width(&space));
                }
                self.push_unit(unit, &widths);
                return Ok(());
            }
            self.finish_line(false)?;
        }

        self.start_line(width)?;
        self.push_unit(unit, &widths);
        Ok(())
    }

    fn start_line(&mut self, width: f64) -> Result<()> {
        let cursor = self.bfc.cursor();
        let placed = match self.bfc.fctx.as_mut() {
            Some(fctx) => fctx.pre_text_content(&cursor)?,
            None => Vec::new(),
        };
        apply_placements(self.tree, &placed);

        let vacancy =
            self.bfc
                .find_line_position_local(self.block_offset, self.strut_height(), width);
        self.line.vacancy = Some(vacancy);
        self.pending_space = None;
        Ok(())
    }

    fn push_unit(&mut self, unit: &[InlineItem], widths: &[f64]) {
        for (item, width) in unit.iter().zip(widths) {
            self.push_item(item, *width);
        }
        self.line.has_content = true;
    }

    fn push_item(&mut self, item: &InlineItem, width: f64) {
        let inline_offset = self.line.width;
        match item {
            InlineItem::Text {
                inline, start, end, ..
            }
            | InlineItem::Space {
                inline, start, end, ..
            } => {
                self.line.fragments.push(LineFragment::Text {
                    inline: *inline,
                    start: *start,
                    end: *end,
                    inline_offset,
                    width,
                });
                self.line.push_inline(*inline);
            }
            InlineItem::Gap { inline, .. } => self.line.push_inline(*inline),
            InlineItem::Atomic(id) => {
                self.line.fragments.push(LineFragment::Atomic {
                    id: *id,
                    inline_offset,
                    width,
                });
                self.line.atomics.push(*id);
            }
            InlineItem::Break | InlineItem::Float(_) => return,
        }
        self.line.width += width;
    }

    /// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// "A floated box is shifted to the left or right until its outer edge
    /// touches the containing block edge or the outer edge of another float.
    /// If there is a line box, the outer top of the floated box is aligned
    /// with the top of the current line box."
    fn place_float(&mut self, id: BoxId) -> Result<()> {
        layout_float_box(self.tree, id, self.shaper)?;
        let float = float_box_desc(self.tree, id)?;

        let cursor = self.bfc.cursor();
        let line_top = self.line.vacancy.map_or(self.block_offset, |v| v.block_offset);
        let line_top_abs = cursor.block_start + line_top;
        let line_width = if self.line.has_content {
            self.line.width
        } else {
            0.0
        };

        let fctx = self.bfc.ensure_float_context(line_top_abs);
        fctx.drop_shelf(line_top_abs);
        let placed = fctx.place_float(&cursor, &float, line_width, !self.line.has_content)?;

        if let Some(p) = placed {
            apply_placements(self.tree, &[p]);
            if self.line.vacancy.is_some() {
                self.line.vacancy =
                    Some(self.bfc.local_vacancy_for_line(line_top, self.strut_height()));
            }
        }
        Ok(())
    }

    fn finish_line(&mut self, did_break: bool) -> Result<()> {
        let line = mem::take(&mut self.line);
        self.pending_space = None;
        if !line.has_content && !did_break {
            return Ok(());
        }

        let vacancy = match line.vacancy {
            Some(vacancy) => vacancy,
            None => self
                .bfc
                .find_line_position_local(self.block_offset, self.strut_height(), 0.0),
        };

        // [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
        let (mut ascender, mut descender) = self.strut;
        for inline in &line.inlines {
            let (a, d) = inline_extent(self.shaper, &self.tree.node(*inline).style);
            ascender = ascender.max(a);
            descender = descender.max(d);
        }
        for atomic in &line.atomics {
            ascender = ascender.max(float_box_desc(self.tree, *atomic)?.margin_box_block_size());
        }

        // [§ 7.1 Text Alignment](https://www.w3.org/TR/css-text-3/#text-align-property)
        let free = vacancy.inline_size - line.width;
        let shift = match self.align {
            TextAlign::Right => free.max(0.0),
            TextAlign::Center => (free / 2.0).max(0.0),
            TextAlign::Left | TextAlign::Start | TextAlign::End => 0.0,
        };
        let line_start = vacancy.left_offset + shift;

        let mut fragments = line.fragments;
        for fragment in &mut fragments {
            match fragment {
                LineFragment::Text { inline_offset, .. } => *inline_offset += line_start,
                LineFragment::Atomic {
                    id, inline_offset, ..
                } => {
                    *inline_offset += line_start;
                    let desc = float_box_desc(self.tree, *id)?;
                    let areas = &mut self.tree.node_mut(*id).areas;
                    areas.set_inline_position(*inline_offset + desc.margin_line_left);
                    areas.set_block_position(
                        vacancy.block_offset + ascender - desc.margin_box_block_size()
                            + desc.margin_block_start,
                    );
                }
            }
        }

        let linebox = Linebox {
            block_offset: vacancy.block_offset,
            ascender,
            descender,
            inline_offset: vacancy.left_offset,
            inline_size: vacancy.inline_size,
            width: line.width,
            fragments,
        };
        self.block_offset = linebox.bottom();
        trace!(
            "line {}: at {} width {} of {}",
            self.lineboxes.len(),
            linebox.block_offset,
            linebox.width,
            linebox.inline_size
        );
        self.lineboxes.push(linebox);

        let cursor = self.bfc.cursor();
        let placed = match self.bfc.fctx.as_mut() {
            Some(fctx) => {
                fctx.post_line(&cursor, cursor.block_start + self.block_offset, did_break)?
            }
            None => Vec::new(),
        };
        apply_placements(self.tree, &placed);
        Ok(())
    }
}

const fn space_width(item: &InlineItem) -> f64 {
    match item {
        InlineItem::Space { width, .. } => *width,
        _ => 0.0,
    }
}

/// Break the content of block container `ifc` into lines inside `bfc`,
/// placing its floats and atomic inlines, and size the box if its block
/// size is `auto`.
///
/// `bfc`'s cursor must be at the content edges of `ifc`.
///
/// # Errors
///
/// Propagates layout errors of floats and atomic inlines and float
/// placement errors.
pub fn do_text_layout(
    tree: &mut LayoutTree,
    ifc: BoxId,
    bfc: &mut BlockFormattingContext,
    shaper: &dyn TextShaper,
) -> Result<()> {
    let wm = tree.cb_writing_mode(ifc);
    let root = tree.root_inline(ifc)?;
    let flags = root.flags;

    let lineboxes = if flags.makes_lines() || flags.has_float_or_replaced {
        let strut = inline_extent(shaper, &root.style);
        let align = tree.node(ifc).style.resolved_text_align();
        let items = tree.inline_content(ifc)?.items.clone();
        let builder = LineBuilder {
            tree: &mut *tree,
            bfc,
            shaper,
            strut,
            align,
            block_offset: 0.0,
            line: Line::default(),
            pending_space: None,
            lineboxes: Vec::new(),
        };
        builder.run(&items)?
    } else {
        Vec::new()
    };

    let height = lineboxes.last().map_or(0.0, Linebox::bottom);
    trace!("ifc {ifc}: {} line(s), {height} tall", lineboxes.len());
    tree.inline_content_mut(ifc)?.lineboxes = lineboxes;

    let node = tree.node_mut(ifc);
    if node.style.block_size(wm).is_auto() {
        node.areas.set_block_size(height, &node.style, wm);
    }
    Ok(())
}

/// [§ 5.1 Intrinsic Sizes](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
///
/// Min-content or max-content inline size of the content of `ifc`.
///
/// The min-content size is the widest sequence of items without a soft
/// wrap opportunity; the max-content size the widest line between forced
/// breaks, without trailing collapsible spaces.
///
/// # Errors
///
/// Propagates errors from measuring floats and atomic inlines.
pub fn ifc_contribution(tree: &LayoutTree, ifc: BoxId, mode: IntrinsicSizeMode) -> Result<f64> {
    let items = &tree.inline_content(ifc)?.items;
    let mut widest: f64 = 0.0;
    let mut current: f64 = 0.0;
    let mut trailing: f64 = 0.0;

    for item in items {
        match (mode, item) {
            (_, InlineItem::Float(id)) => {
                widest = widest.max(layout_contribution(tree, *id, mode)?);
            }
            (_, InlineItem::Break)
            | (
                IntrinsicSizeMode::MinContent,
                InlineItem::Space {
                    breakable: true, ..
                },
            ) => {
                widest = widest.max(current - trailing);
                current = 0.0;
                trailing = 0.0;
            }
            (
                _,
                InlineItem::Space {
                    width, collapsible, ..
                },
            ) => {
                current += width;
                trailing = if *collapsible { trailing + width } else { 0.0 };
            }
            (_, InlineItem::Text { width, .. } | InlineItem::Gap { width, .. }) => {
                current += width;
                trailing = 0.0;
            }
            (_, InlineItem::Atomic(id)) => {
                current += layout_contribution(tree, *id, mode)?;
                trailing = 0.0;
            }
        }
    }
    Ok(widest.max(current - trailing))
}
