//! The box tree.
//!
//! Boxes live in one arena in pre-order. Every box covers the span
//! `tree_start..=tree_final` of the arena, so its subtree is a contiguous
//! slice and children are found by skipping over each child's span.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)

use std::fmt::{self, Write as _};

use log::debug;
use serde::{Deserialize, Serialize};

use flowbox_common::image::ImageDimensions;

use super::box_model::{BoxAreas, BoxGeometry, Rect};
use super::formatting_context::BlockFormattingContext;
use super::inline::{self, InlineContent, TextShaper};
use super::layout_box::layout_block_level_box;
use crate::error::{LayoutError, Result};
use crate::style::{Direction, DisplayOuter, Position, Style, WritingMode};

/// A type-safe index into the box arena.
///
/// The index is also the box's `tree_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoxId(pub usize);

impl BoxId {
    /// The root box is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attributes of a box.
///
/// The first three are fixed when the tree is built; the `has_*` flags
/// describe content and are recomputed by every pre-layout pass.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoxFlags {
    /// Generated by the tree builder rather than described by the caller.
    pub is_anonymous: bool,
    /// Participates in an inline formatting context as an atomic inline.
    pub is_inline_level: bool,
    /// Establishes a new block formatting context.
    pub is_bfc_root: bool,
    /// Contains text that is not collapsible white space.
    pub has_text: bool,
    /// Contains floats or replaced boxes.
    pub has_float_or_replaced: bool,
    /// Contains atomic inlines (inline-blocks or inline replaced boxes).
    pub has_inline_blocks: bool,
    /// Contains an inline box with margin, border or padding on a line side.
    pub has_sized_inline: bool,
    /// Contains a forced line break.
    pub has_break: bool,
}

impl BoxFlags {
    fn clear_content(&mut self) {
        self.has_text = false;
        self.has_float_or_replaced = false;
        self.has_inline_blocks = false;
        self.has_sized_inline = false;
        self.has_break = false;
    }

    fn merge_content(&mut self, other: Self) {
        self.has_text |= other.has_text;
        self.has_float_or_replaced |= other.has_float_or_replaced;
        self.has_inline_blocks |= other.has_inline_blocks;
        self.has_sized_inline |= other.has_sized_inline;
        self.has_break |= other.has_break;
    }

    /// True if inline content with these flags produces at least one line.
    #[must_use]
    pub const fn makes_lines(&self) -> bool {
        self.has_text || self.has_inline_blocks || self.has_sized_inline || self.has_break
    }
}

/// [§ 3 Replaced Elements](https://www.w3.org/TR/css-display-3/#replaced-element)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplacedContent {
    /// Natural dimensions, if the resource has any.
    pub intrinsic: Option<ImageDimensions>,
}

/// What a node in the tree is.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// A block container whose children are all inline-level. Its first
    /// child is always the anonymous root [`BoxKind::Inline`].
    BlockOfInlines(InlineContent),
    /// A block container of block-level boxes.
    BlockOfBlocks,
    /// A replaced box with opaque content.
    Replaced(ReplacedContent),
    /// A non-replaced inline box.
    Inline,
    /// A run of text.
    Run {
        /// The text as written, before white space processing.
        text: String,
    },
    /// A forced line break.
    Break,
}

impl BoxKind {
    /// Block containers and replaced boxes take part in block layout.
    #[must_use]
    pub const fn is_formatting_box(&self) -> bool {
        matches!(self, Self::BlockOfInlines(_) | Self::BlockOfBlocks | Self::Replaced(_))
    }

    /// True for both kinds of block container.
    #[must_use]
    pub const fn is_block_container(&self) -> bool {
        matches!(self, Self::BlockOfInlines(_) | Self::BlockOfBlocks)
    }
}

/// One box of the tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    /// This box's index.
    pub id: BoxId,
    /// Used style.
    pub style: Style,
    /// What the box is.
    pub kind: BoxKind,
    /// Attribute flags.
    pub flags: BoxFlags,
    /// First index of this box's subtree (the box itself).
    pub tree_start: usize,
    /// Last index of this box's subtree.
    pub tree_final: usize,
    /// Parent box, `None` for the root.
    pub parent: Option<BoxId>,
    /// Nearest ancestor block container, `None` for the initial containing block.
    pub containing_block: Option<BoxId>,
    /// Logical areas written during layout.
    pub areas: BoxAreas,
    /// Physical geometry written after layout.
    pub geometry: Option<BoxGeometry>,
    /// Caller-supplied label.
    pub label: Option<String>,
}

impl LayoutNode {
    /// True if this box is floated.
    #[must_use]
    pub fn is_float(&self) -> bool {
        self.kind.is_formatting_box() && self.style.is_float()
    }

    /// Symbol used in tree dumps.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match &self.kind {
            BoxKind::BlockOfInlines(_) | BoxKind::BlockOfBlocks if self.is_float() => "○",
            BoxKind::BlockOfInlines(_) | BoxKind::BlockOfBlocks if self.flags.is_inline_level => {
                "▬"
            }
            BoxKind::BlockOfInlines(_) | BoxKind::BlockOfBlocks => "◼",
            BoxKind::Replaced(_) => "▣",
            BoxKind::Inline => "▭",
            BoxKind::Run { .. } => "¶",
            BoxKind::Break => "⏎",
        }
    }

    /// Short human-readable name, e.g. `Block 3 "intro"`.
    #[must_use]
    pub fn name(&self) -> String {
        let base = match &self.kind {
            BoxKind::BlockOfInlines(_) | BoxKind::BlockOfBlocks => format!("Block {}", self.id),
            BoxKind::Replaced(_) => format!("Replaced {}", self.id),
            BoxKind::Inline => format!("Inline {}", self.id),
            BoxKind::Run { text } => format!("{text:?}"),
            BoxKind::Break => "BR".to_string(),
        };
        match &self.label {
            Some(label) => format!("{base} #{label}"),
            None => base,
        }
    }
}

/// Declarative description of a box tree.
///
/// ```json
/// { "type": "block", "id": "a", "style": { "margin-top": 10 },
///   "children": [ { "type": "text", "text": "Hello" } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BoxSpec {
    /// A block container (or, with `display: inline-block`, an atomic inline).
    Block {
        /// Optional label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Used style.
        #[serde(default)]
        style: Style,
        /// Child boxes.
        #[serde(default)]
        children: Vec<BoxSpec>,
    },
    /// An inline box.
    Inline {
        /// Optional label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Used style.
        #[serde(default)]
        style: Style,
        /// Inline-level children.
        #[serde(default)]
        children: Vec<BoxSpec>,
    },
    /// A text run. It takes the style of its parent.
    Text {
        /// The text.
        text: String,
    },
    /// A forced line break.
    Break,
    /// A replaced box, such as an image.
    Replaced {
        /// Optional label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Used style.
        #[serde(default)]
        style: Style,
        /// Natural dimensions.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intrinsic: Option<ImageDimensions>,
    },
}

impl BoxSpec {
    /// A block container.
    #[must_use]
    pub const fn block(style: Style, children: Vec<Self>) -> Self {
        Self::Block {
            id: None,
            style,
            children,
        }
    }

    /// An inline box.
    #[must_use]
    pub const fn inline(style: Style, children: Vec<Self>) -> Self {
        Self::Inline {
            id: None,
            style,
            children,
        }
    }

    /// A text run.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::Text {
            text: text.to_string(),
        }
    }

    /// A forced line break.
    #[must_use]
    pub const fn line_break() -> Self {
        Self::Break
    }

    /// A replaced box.
    #[must_use]
    pub const fn replaced(style: Style, intrinsic: Option<ImageDimensions>) -> Self {
        Self::Replaced {
            id: None,
            style,
            intrinsic,
        }
    }

    /// Attach a label. Text runs and breaks cannot carry one.
    #[must_use]
    pub fn with_id(mut self, label: &str) -> Self {
        match &mut self {
            Self::Block { id, .. } | Self::Inline { id, .. } | Self::Replaced { id, .. } => {
                *id = Some(label.to_string());
            }
            Self::Text { .. } | Self::Break => {}
        }
        self
    }

    fn style(&self) -> Option<&Style> {
        match self {
            Self::Block { style, .. }
            | Self::Inline { style, .. }
            | Self::Replaced { style, .. } => Some(style),
            Self::Text { .. } | Self::Break => None,
        }
    }

    /// True if this box goes into an inline formatting context. Floats
    /// count as inline-level content.
    fn is_inline_content(&self) -> bool {
        match self {
            Self::Text { .. } | Self::Break | Self::Inline { .. } => true,
            Self::Block { style, .. } | Self::Replaced { style, .. } => {
                style.is_float() || style.display.outer() == DisplayOuter::Inline
            }
        }
    }

    fn is_collapsible_whitespace(&self, parent: &Style) -> bool {
        matches!(self, Self::Text { text } if parent.white_space.collapses_spaces()
            && text.chars().all(char::is_whitespace))
    }
}

/// Options of one layout pass.
///
/// The initial containing block has the given logical size and establishes
/// the given writing mode and direction for the root box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutOptions {
    /// Logical inline size of the initial containing block.
    pub inline_size: f64,
    /// Logical block size of the initial containing block.
    pub block_size: f64,
    /// Writing mode of the initial containing block.
    pub writing_mode: WritingMode,
    /// Direction of the initial containing block.
    pub direction: Direction,
    /// Round final rectangles to whole pixels.
    pub snap_pixels: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            inline_size: 800.0,
            block_size: 600.0,
            writing_mode: WritingMode::HorizontalTb,
            direction: Direction::Ltr,
            snap_pixels: true,
        }
    }
}

impl LayoutOptions {
    /// Physical rectangle of the initial containing block.
    #[must_use]
    pub const fn icb_rect(&self) -> Rect {
        if self.writing_mode.is_horizontal() {
            Rect::new(0.0, 0.0, self.inline_size, self.block_size)
        } else {
            Rect::new(0.0, 0.0, self.block_size, self.inline_size)
        }
    }
}

/// The box tree and everything layout writes into it.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    icb: LayoutOptions,
}

impl LayoutTree {
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Build the tree from a description.
    ///
    /// "if a block container box has a block-level box inside it, then we
    /// force it to have only block-level boxes inside it." Runs of
    /// inline-level siblings of block-level boxes are wrapped in anonymous
    /// block containers; a run made only of collapsible white space is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidTree`] if the root is not an in-flow
    /// block, or a block-level box appears inside an inline box.
    pub fn from_spec(spec: &BoxSpec) -> Result<Self> {
        let mut builder = Builder::default();
        match spec {
            BoxSpec::Block {
                id,
                style,
                children,
            } if !style.is_float() => builder.block(id.as_ref(), style, children, None)?,
            _ => {
                return Err(LayoutError::InvalidTree(
                    "the root box must be an in-flow block".to_string(),
                ));
            }
        }
        Ok(Self {
            nodes: builder.nodes,
            icb: LayoutOptions::default(),
        })
    }

    /// Number of boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a built tree has a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All boxes in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Get a box by id.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutNode> {
        self.nodes.get(id.0)
    }

    /// Get a box by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: BoxId) -> &LayoutNode {
        &self.nodes[id.0]
    }

    /// Get a box by id, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node_mut(&mut self, id: BoxId) -> &mut LayoutNode {
        &mut self.nodes[id.0]
    }

    /// Find the first box with the given label.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<BoxId> {
        self.nodes
            .iter()
            .find(|n| n.label.as_deref() == Some(label))
            .map(|n| n.id)
    }

    /// Physical geometry of the box with the given label.
    #[must_use]
    pub fn geometry_of(&self, label: &str) -> Option<BoxGeometry> {
        self.find(label).and_then(|id| self.node(id).geometry)
    }

    /// Direct children of a box.
    pub fn children(&self, id: BoxId) -> impl Iterator<Item = BoxId> + '_ {
        let last = self.node(id).tree_final;
        let mut next = id.0 + 1;
        std::iter::from_fn(move || {
            if next > last {
                return None;
            }
            let child = BoxId(next);
            next = self.nodes[next].tree_final + 1;
            Some(child)
        })
    }

    /// Options of the current (or last) layout pass.
    #[must_use]
    pub const fn initial_containing_block(&self) -> &LayoutOptions {
        &self.icb
    }

    /// Writing mode of a box's containing block.
    #[must_use]
    pub fn cb_writing_mode(&self, id: BoxId) -> WritingMode {
        self.node(id)
            .containing_block
            .map_or(self.icb.writing_mode, |cb| self.node(cb).style.writing_mode)
    }

    /// Direction of a box's containing block.
    #[must_use]
    pub fn cb_direction(&self, id: BoxId) -> Direction {
        self.node(id)
            .containing_block
            .map_or(self.icb.direction, |cb| self.node(cb).style.direction)
    }

    /// Inline size available to a box from its containing block, in the
    /// box's own inline axis.
    ///
    /// When the containing block is orthogonal to its own containing block,
    /// its content block size is the child's inline size; before that size
    /// is known the initial containing block's extent is used.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UsedValueNotReady`] if the containing block's
    /// inline size has not been resolved.
    pub fn containing_inline_size(&self, id: BoxId) -> Result<f64> {
        let Some(cb) = self.node(id).containing_block else {
            return Ok(self.icb.inline_size);
        };
        let cb_node = self.node(cb);
        let established = cb_node.style.writing_mode;
        if self.cb_writing_mode(cb).is_horizontal() != established.is_horizontal() {
            if cb_node.areas.block_resolved {
                return Ok(cb_node.areas.content.block_size);
            }
            let icb = self.icb.icb_rect();
            return Ok(if established.is_horizontal() {
                icb.width
            } else {
                icb.height
            });
        }
        if !cb_node.areas.inline_resolved {
            return Err(LayoutError::UsedValueNotReady {
                id: cb,
                what: "inline size",
            });
        }
        Ok(cb_node.areas.content.inline_size)
    }

    /// Offsets of a block container's content edges from its containing
    /// block's content edges: `(line_left, line_right, block_start)`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UsedValueNotReady`] if the inline sizes are
    /// not resolved yet.
    pub fn containing_block_to_content(&self, id: BoxId) -> Result<(f64, f64, f64)> {
        let inline_size = self.containing_inline_size(id)?;
        let node = self.node(id);
        if !node.areas.inline_resolved {
            return Err(LayoutError::UsedValueNotReady {
                id,
                what: "inline size",
            });
        }
        let wm = self.cb_writing_mode(id);
        let block_start =
            node.style.border_block_start_width(wm) + node.style.padding_block_start(wm);
        let line_left = node.areas.border.line_left
            + node.style.border_line_left_width(wm)
            + node.style.padding_line_left(wm);
        let line_right = inline_size - line_left - node.areas.content.inline_size;
        Ok((line_left, line_right, block_start))
    }

    /// Border-box block size.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UsedValueNotReady`] if it is not resolved yet.
    pub fn border_block_size(&self, id: BoxId) -> Result<f64> {
        let areas = &self.node(id).areas;
        if areas.block_resolved {
            Ok(areas.border.block_size)
        } else {
            Err(LayoutError::UsedValueNotReady {
                id,
                what: "block size",
            })
        }
    }

    /// Border-box inline size.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UsedValueNotReady`] if it is not resolved yet.
    pub fn border_inline_size(&self, id: BoxId) -> Result<f64> {
        let areas = &self.node(id).areas;
        if areas.inline_resolved {
            Ok(areas.border.inline_size)
        } else {
            Err(LayoutError::UsedValueNotReady {
                id,
                what: "inline size",
            })
        }
    }

    /// Inline content of a block container of inlines.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnexpectedBoxKind`] for any other box.
    pub fn inline_content(&self, id: BoxId) -> Result<&InlineContent> {
        match &self.node(id).kind {
            BoxKind::BlockOfInlines(content) => Ok(content),
            _ => Err(LayoutError::UnexpectedBoxKind {
                id,
                expected: "block container of inlines",
            }),
        }
    }

    /// Mutable inline content of a block container of inlines.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnexpectedBoxKind`] for any other box.
    pub fn inline_content_mut(&mut self, id: BoxId) -> Result<&mut InlineContent> {
        match &mut self.node_mut(id).kind {
            BoxKind::BlockOfInlines(content) => Ok(content),
            _ => Err(LayoutError::UnexpectedBoxKind {
                id,
                expected: "block container of inlines",
            }),
        }
    }

    /// The anonymous root inline of a block container of inlines.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnexpectedBoxKind`] if the first child is not
    /// an inline box.
    pub fn root_inline(&self, id: BoxId) -> Result<&LayoutNode> {
        let child = BoxId(id.0 + 1);
        match self.get(child) {
            Some(node) if node.kind == BoxKind::Inline && node.parent == Some(id) => Ok(node),
            _ => Err(LayoutError::UnexpectedBoxKind {
                id: child,
                expected: "inline",
            }),
        }
    }

    /// Lay out the whole tree.
    ///
    /// Runs pre-layout, lays the root out in the initial containing block's
    /// formatting context and converts every area to physical geometry.
    ///
    /// # Errors
    ///
    /// Any [`LayoutError`]; the geometry of a failed pass must not be used.
    pub fn layout(&mut self, options: &LayoutOptions, shaper: &dyn TextShaper) -> Result<()> {
        self.icb = *options;
        debug!(
            "layout pass: {} boxes in a {}x{} {} initial containing block",
            self.nodes.len(),
            options.inline_size,
            options.block_size,
            options.writing_mode
        );

        self.prelayout(shaper)?;

        let mut icb_bfc = BlockFormattingContext::new(options.inline_size);
        layout_block_level_box(self, BoxId::ROOT, &mut icb_bfc, shaper)?;
        icb_bfc.position_block_containers(self)?;

        self.postlayout();
        debug!("layout pass done, root is {:?}", self.node(BoxId::ROOT).geometry);
        Ok(())
    }

    /// Reset layout state, resolve containing blocks, propagate content
    /// flags and rebuild every inline formatting context's items.
    ///
    /// # Errors
    ///
    /// Returns an error if an inline formatting context is malformed.
    pub fn prelayout(&mut self, shaper: &dyn TextShaper) -> Result<()> {
        // STEP 1: Forget the previous pass.
        for node in &mut self.nodes {
            node.areas = BoxAreas::default();
            node.geometry = None;
            node.flags.clear_content();
            if let BoxKind::BlockOfInlines(content) = &mut node.kind {
                *content = InlineContent::default();
            }
        }

        // STEP 2: The containing block is the nearest ancestor block container.
        // [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
        let mut open: Vec<BoxId> = Vec::new();
        for i in 0..self.nodes.len() {
            while open
                .last()
                .is_some_and(|top| self.nodes[top.0].tree_final < i)
            {
                let _ = open.pop();
            }
            self.nodes[i].containing_block = open.last().copied();
            if self.nodes[i].kind.is_block_container() {
                open.push(BoxId(i));
            }
        }

        // STEP 3: Propagate content flags; children come after parents, so a
        // reverse walk sees every subtree complete.
        for i in (1..self.nodes.len()).rev() {
            let Some(parent) = self.nodes[i].parent else {
                continue;
            };
            let contribution = self.flag_contribution(BoxId(i), parent);
            self.nodes[parent.0].flags.merge_content(contribution);
        }

        // STEP 4: Build the items of each inline formatting context.
        for i in 0..self.nodes.len() {
            if matches!(self.nodes[i].kind, BoxKind::BlockOfInlines(_)) {
                let content = inline::build_inline_content(self, BoxId(i), shaper)?;
                *self.inline_content_mut(BoxId(i))? = content;
            }
        }
        Ok(())
    }

    fn flag_contribution(&self, id: BoxId, parent: BoxId) -> BoxFlags {
        let node = self.node(id);
        let mut flags = BoxFlags::default();
        match &node.kind {
            BoxKind::Run { text } => {
                flags.has_text = inline::run_has_text(text, node.style.white_space);
            }
            BoxKind::Break => flags.has_break = true,
            BoxKind::Inline => {
                if self.node(parent).kind == BoxKind::Inline {
                    flags = node.flags;
                    let wm = self.cb_writing_mode(id);
                    flags.has_sized_inline |=
                        node.style.has_line_left_gap(wm) || node.style.has_line_right_gap(wm);
                }
            }
            BoxKind::BlockOfInlines(_) | BoxKind::BlockOfBlocks | BoxKind::Replaced(_) => {
                if node.is_float() {
                    flags.has_float_or_replaced = true;
                } else if node.flags.is_inline_level {
                    flags.has_inline_blocks = true;
                    flags.has_float_or_replaced = matches!(node.kind, BoxKind::Replaced(_));
                }
            }
        }
        flags.is_anonymous = false;
        flags.is_inline_level = false;
        flags.is_bfc_root = false;
        flags
    }

    /// Convert every formatting box's logical areas to physical geometry,
    /// apply relative positioning and snap to pixels if asked to.
    ///
    /// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    pub fn postlayout(&mut self) {
        let icb_rect = self.icb.icb_rect();
        for i in 0..self.nodes.len() {
            if !self.nodes[i].kind.is_formatting_box() {
                continue;
            }
            let id = BoxId(i);
            let wm = self.cb_writing_mode(id);
            let containing = self.nodes[i].containing_block.map_or(icb_rect, |cb| {
                self.nodes[cb.0]
                    .geometry
                    .map(|g| g.content)
                    .unwrap_or_default()
            });
            let node = &self.nodes[i];
            let mut geometry = BoxGeometry::from_areas(&node.areas, wm, &containing);
            if node.style.position == Position::Relative {
                geometry = geometry.translated(
                    node.style.relative_horizontal_shift(self.cb_direction(id)),
                    node.style.relative_vertical_shift(),
                );
            }
            self.nodes[i].geometry = Some(geometry);
        }

        if self.icb.snap_pixels {
            for node in &mut self.nodes {
                node.geometry = node.geometry.map(|g| g.snapped());
            }
        }
    }

    /// Render the tree one box per line.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let depth = self.depth(node.id);
            let _ = writeln!(
                out,
                "{}{} {}{}",
                "  ".repeat(depth),
                node.symbol(),
                node.name(),
                self.describe(node)
            );
        }
        out
    }

    /// Nesting depth of a box (0 for the root).
    #[must_use]
    pub fn depth(&self, id: BoxId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).parent;
        }
        depth
    }

    /// Flags and geometry of a box as shown in a dump.
    #[must_use]
    pub fn describe(&self, node: &LayoutNode) -> String {
        let mut out = String::new();
        if node.flags.is_anonymous {
            out.push_str(" (anon)");
        }
        if node.flags.is_bfc_root {
            out.push_str(" [bfc]");
        }
        if let Some(g) = node.geometry {
            let b = g.border;
            let _ = write!(out, " @ {},{} {}x{}", b.x, b.y, b.width, b.height);
        }
        if let BoxKind::BlockOfInlines(content) = &node.kind
            && !content.lineboxes.is_empty()
        {
            let _ = write!(out, " lines={}", content.lineboxes.len());
        }
        out
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<LayoutNode>,
}

impl Builder {
    fn push(
        &mut self,
        style: Style,
        kind: BoxKind,
        flags: BoxFlags,
        parent: Option<BoxId>,
        label: Option<&String>,
    ) -> BoxId {
        let id = BoxId(self.nodes.len());
        self.nodes.push(LayoutNode {
            id,
            style,
            kind,
            flags,
            tree_start: id.0,
            tree_final: id.0,
            parent,
            containing_block: None,
            areas: BoxAreas::default(),
            geometry: None,
            label: label.cloned(),
        });
        id
    }

    fn close(&mut self, id: BoxId) {
        let last = self.nodes.len() - 1;
        self.nodes[id.0].tree_final = last;
    }

    fn block(
        &mut self,
        label: Option<&String>,
        style: &Style,
        children: &[BoxSpec],
        parent: Option<BoxId>,
    ) -> Result<()> {
        let flags = BoxFlags {
            is_inline_level: parent.is_some()
                && !style.is_float()
                && style.display.outer() == DisplayOuter::Inline,
            is_bfc_root: parent.is_none() || style.establishes_bfc(),
            ..BoxFlags::default()
        };

        if children.is_empty() {
            let id = self.push(style.clone(), BoxKind::BlockOfBlocks, flags, parent, label);
            self.close(id);
            return Ok(());
        }

        if children.iter().all(BoxSpec::is_inline_content) {
            let id = self.push(
                style.clone(),
                BoxKind::BlockOfInlines(InlineContent::default()),
                flags,
                parent,
                label,
            );
            self.root_inline(id, style, children)?;
            self.close(id);
            return Ok(());
        }

        let id = self.push(style.clone(), BoxKind::BlockOfBlocks, flags, parent, label);
        let mut pending: Vec<&BoxSpec> = Vec::new();
        for child in children {
            if child.is_inline_content() {
                pending.push(child);
                continue;
            }
            self.anonymous_block(id, style, &pending)?;
            pending.clear();
            self.block_level(child, id)?;
        }
        self.anonymous_block(id, style, &pending)?;
        self.close(id);
        Ok(())
    }

    fn anonymous_block(
        &mut self,
        parent: BoxId,
        style: &Style,
        children: &[&BoxSpec],
    ) -> Result<()> {
        if children.iter().all(|c| c.is_collapsible_whitespace(style)) {
            return Ok(());
        }
        let anonymous = style.anonymous_child();
        let flags = BoxFlags {
            is_anonymous: true,
            ..BoxFlags::default()
        };
        let id = self.push(
            anonymous.clone(),
            BoxKind::BlockOfInlines(InlineContent::default()),
            flags,
            Some(parent),
            None,
        );
        let children: Vec<BoxSpec> = children.iter().map(|c| (*c).clone()).collect();
        self.root_inline(id, &anonymous, &children)?;
        self.close(id);
        Ok(())
    }

    fn root_inline(&mut self, ifc: BoxId, ifc_style: &Style, children: &[BoxSpec]) -> Result<()> {
        let style = ifc_style.anonymous_child();
        let flags = BoxFlags {
            is_anonymous: true,
            is_inline_level: true,
            ..BoxFlags::default()
        };
        let id = self.push(style.clone(), BoxKind::Inline, flags, Some(ifc), None);
        for child in children {
            self.inline_level(child, id, &style)?;
        }
        self.close(id);
        Ok(())
    }

    fn block_level(&mut self, spec: &BoxSpec, parent: BoxId) -> Result<()> {
        match spec {
            BoxSpec::Block {
                id,
                style,
                children,
            } => self.block(id.as_ref(), style, children, Some(parent)),
            BoxSpec::Replaced {
                id,
                style,
                intrinsic,
            } => {
                self.replaced(id.as_ref(), style, *intrinsic, parent);
                Ok(())
            }
            BoxSpec::Inline { .. } | BoxSpec::Text { .. } | BoxSpec::Break => {
                Err(LayoutError::InvalidTree(format!(
                    "inline content cannot be placed directly in block flow under box {parent}"
                )))
            }
        }
    }

    fn replaced(
        &mut self,
        label: Option<&String>,
        style: &Style,
        intrinsic: Option<ImageDimensions>,
        parent: BoxId,
    ) {
        let flags = BoxFlags {
            is_inline_level: !style.is_float() && style.display.outer() == DisplayOuter::Inline,
            ..BoxFlags::default()
        };
        let id = self.push(
            style.clone(),
            BoxKind::Replaced(ReplacedContent { intrinsic }),
            flags,
            Some(parent),
            label,
        );
        self.close(id);
    }

    fn inline_level(&mut self, spec: &BoxSpec, parent: BoxId, parent_style: &Style) -> Result<()> {
        let inline_flags = BoxFlags {
            is_inline_level: true,
            ..BoxFlags::default()
        };
        match spec {
            BoxSpec::Text { text } => {
                let id = self.push(
                    parent_style.clone(),
                    BoxKind::Run { text: text.clone() },
                    inline_flags,
                    Some(parent),
                    None,
                );
                self.close(id);
                Ok(())
            }
            BoxSpec::Break => {
                let id = self.push(
                    parent_style.clone(),
                    BoxKind::Break,
                    inline_flags,
                    Some(parent),
                    None,
                );
                self.close(id);
                Ok(())
            }
            BoxSpec::Inline {
                id,
                style,
                children,
            } => {
                let inline = self.push(
                    style.clone(),
                    BoxKind::Inline,
                    inline_flags,
                    Some(parent),
                    id.as_ref(),
                );
                for child in children {
                    self.inline_level(child, inline, style)?;
                }
                self.close(inline);
                Ok(())
            }
            BoxSpec::Block { .. } | BoxSpec::Replaced { .. } if spec.is_inline_content() => {
                self.block_level(spec, parent)
            }
            BoxSpec::Block { .. } | BoxSpec::Replaced { .. } => {
                Err(LayoutError::InvalidTree(format!(
                    "block-level box {} inside inline box {parent}",
                    spec.style()
                        .map_or_else(String::new, |s| s.display.to_string())
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_children_get_anonymous_wrappers() {
        let spec = BoxSpec::block(
            Style::default(),
            vec![
                BoxSpec::text("before"),
                BoxSpec::block(Style::default(), vec![]).with_id("b"),
                BoxSpec::text("   "),
            ],
        );
        let tree = LayoutTree::from_spec(&spec).unwrap();
        let kids: Vec<BoxId> = tree.children(BoxId::ROOT).collect();
        assert_eq!(kids.len(), 2, "whitespace-only run should not be wrapped");
        assert!(tree.node(kids[0]).flags.is_anonymous);
        assert!(matches!(tree.node(kids[0]).kind, BoxKind::BlockOfInlines(_)));
        assert_eq!(tree.find("b"), Some(kids[1]));
        assert_eq!(tree.node(BoxId::ROOT).tree_final, tree.len() - 1);
    }

    #[test]
    fn test_block_inside_inline_is_rejected() {
        let spec = BoxSpec::block(
            Style::default(),
            vec![BoxSpec::inline(
                Style::default(),
                vec![BoxSpec::block(Style::default(), vec![])],
            )],
        );
        assert!(matches!(
            LayoutTree::from_spec(&spec),
            Err(LayoutError::InvalidTree(_))
        ));
    }

    #[test]
    fn test_spec_from_json() {
        let json = r#"{
            "type": "block",
            "children": [
                { "type": "block", "id": "a", "style": { "height": 20 } },
                { "type": "replaced", "intrinsic": { "width": 40, "height": 20 } }
            ]
        }"#;
        let spec: BoxSpec = serde_json::from_str(json).unwrap();
        let tree = LayoutTree::from_spec(&spec).unwrap();
        assert_eq!(tree.len(), 3);
        assert!(tree.node(BoxId::ROOT).flags.is_bfc_root);
        assert!(matches!(tree.node(BoxId(2)).kind, BoxKind::Replaced(_)));
    }
}
