//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! During layout every box carries three logical areas (border, padding,
//! content) expressed in the writing mode of its containing block. After
//! layout they are converted into physical [`Rect`]s.

use serde::Serialize;

use crate::style::{Style, WritingMode};

/// A logical rectangle, relative to its parent area.
///
/// [§ 6.2 Flow-relative Directions](https://www.w3.org/TR/css-writing-modes-3/#logical-directions)
///
/// The border area is relative to the containing block's content area, the
/// padding area to the border area, and the content area to the padding area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxArea {
    /// Offset from the parent's block-start edge.
    pub block_start: f64,
    /// Extent along the block axis.
    pub block_size: f64,
    /// Offset from the parent's line-left edge.
    pub line_left: f64,
    /// Extent along the inline axis.
    pub inline_size: f64,
}

impl BoxArea {
    /// Map this area into physical space inside `parent`, the already
    /// physical rectangle this area is relative to.
    ///
    /// [§ 7.1 Abstract-to-Physical Mappings](https://www.w3.org/TR/css-writing-modes-3/#logical-to-physical)
    ///
    /// ```text
    /// horizontal-tb    x = line_left            y = block_start
    /// vertical-lr      x = block_start          y = line_left
    /// vertical-rl      x = parent.width - block_start - block_size
    /// ```
    #[must_use]
    pub fn to_physical(&self, wm: WritingMode, parent: &Rect) -> Rect {
        let (x, y, width, height) = match wm {
            WritingMode::HorizontalTb => (
                self.line_left,
                self.block_start,
                self.inline_size,
                self.block_size,
            ),
            WritingMode::VerticalLr => (
                self.block_start,
                self.line_left,
                self.block_size,
                self.inline_size,
            ),
            WritingMode::VerticalRl => (
                parent.width - self.block_start - self.block_size,
                self.line_left,
                self.block_size,
                self.inline_size,
            ),
        };
        Rect {
            x: parent.x + x,
            y: parent.y + y,
            width,
            height,
        }
    }
}

/// The three logical areas of one box plus which of its sizes are resolved.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxAreas {
    /// Border area, relative to the containing block's content area.
    pub border: BoxArea,
    /// Padding area, relative to the border area.
    pub padding: BoxArea,
    /// Content area, relative to the padding area.
    pub content: BoxArea,
    /// Set once the inline sizes have been written.
    pub inline_resolved: bool,
    /// Set once the block sizes have been written.
    pub block_resolved: bool,
}

impl BoxAreas {
    /// Write the fixed offsets of the padding and content areas.
    ///
    /// `wm` is the containing block's writing mode.
    pub fn fill(&mut self, style: &Style, wm: WritingMode) {
        self.padding.block_start = style.border_block_start_width(wm);
        self.padding.line_left = style.border_line_left_width(wm);
        self.content.block_start = style.padding_block_start(wm);
        self.content.line_left = style.padding_line_left(wm);
    }

    /// Set the content block size and derive the outer block sizes.
    pub fn set_block_size(&mut self, size: f64, style: &Style, wm: WritingMode) {
        self.content.block_size = size;
        self.padding.block_size =
            size + style.padding_block_start(wm) + style.padding_block_end(wm);
        self.border.block_size = self.padding.block_size
            + style.border_block_start_width(wm)
            + style.border_block_end_width(wm);
        self.block_resolved = true;
    }

    /// Set the border-box inline size and derive the inner inline sizes.
    pub fn set_inline_outer_size(&mut self, size: f64, style: &Style, wm: WritingMode) {
        self.border.inline_size = size;
        self.padding.inline_size =
            size - style.border_line_left_width(wm) - style.border_line_right_width(wm);
        self.content.inline_size =
            self.padding.inline_size - style.padding_line_left(wm) - style.padding_line_right(wm);
        self.inline_resolved = true;
    }

    /// Set the block offset of the border box within the containing block.
    pub const fn set_block_position(&mut self, position: f64) {
        self.border.block_start = position;
    }

    /// Set the line-left offset of the border box within the containing block.
    pub const fn set_inline_position(&mut self, line_left: f64) {
        self.border.line_left = line_left;
    }

    /// Offset of the content area's block-start edge from the border box's.
    #[must_use]
    pub fn content_block_offset(&self) -> f64 {
        self.padding.block_start + self.content.block_start
    }

    /// Offset of the content area's line-left edge from the border box's.
    #[must_use]
    pub fn content_line_offset(&self) -> f64 {
        self.padding.line_left + self.content.line_left
    }
}

/// A rectangle positioned in 2D physical space.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f64,
    /// Vertical position of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Round the edges to whole pixels.
    ///
    /// Edges are rounded rather than sizes so that adjacent boxes stay
    /// adjacent after snapping.
    #[must_use]
    pub fn snapped(&self) -> Self {
        let x = self.x.round();
        let y = self.y.round();
        Self {
            x,
            y,
            width: (self.x + self.width).round() - x,
            height: (self.y + self.height).round() - y,
        }
    }

    /// Translate by a physical offset.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Final physical geometry of a box.
///
/// ```text
/// ┌───────────────────────────────┐  border
/// │   ┌───────────────────────┐   │  padding
/// │   │   ┌───────────────┐   │   │  content
/// │   │   │    CONTENT    │   │   │
/// │   │   └───────────────┘   │   │
/// │   └───────────────────────┘   │
/// └───────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxGeometry {
    /// Border box.
    pub border: Rect,
    /// Padding box.
    pub padding: Rect,
    /// Content box.
    pub content: Rect,
}

impl BoxGeometry {
    /// Convert logical areas to physical rectangles.
    ///
    /// `wm` is the writing mode of the containing block and `containing`
    /// its physical content rectangle.
    #[must_use]
    pub fn from_areas(areas: &BoxAreas, wm: WritingMode, containing: &Rect) -> Self {
        let border = areas.border.to_physical(wm, containing);
        let padding = areas.padding.to_physical(wm, &border);
        let content = areas.content.to_physical(wm, &padding);
        Self {
            border,
            padding,
            content,
        }
    }

    /// Translate all three rectangles.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            border: self.border.translated(dx, dy),
            padding: self.padding.translated(dx, dy),
            content: self.content.translated(dx, dy),
        }
    }

    /// Snap all three rectangles to whole pixels.
    #[must_use]
    pub fn snapped(&self) -> Self {
        Self {
            border: self.border.snapped(),
            padding: self.padding.snapped(),
            content: self.content.snapped(),
        }
    }
}
