//! Block-level box layout.
//!
//! This crate lays out a tree of styled boxes according to the rules of
//! block formatting contexts: vertical margin collapsing, float placement,
//! clearance, and the horizontal vacancy left to each line of inline content.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual Formatting Model Details](https://www.w3.org/TR/CSS2/visudet.html)
//! - [CSS 2.1 Box Model](https://www.w3.org/TR/CSS2/box.html)
//! - [CSS Writing Modes Level 3](https://www.w3.org/TR/css-writing-modes-3/)
//!
//! # Usage
//!
//! ```ignore
//! use flowbox_layout::{ApproximateShaper, BoxSpec, LayoutOptions, LayoutTree, Style};
//!
//! let spec = BoxSpec::block(Style::default(), vec![BoxSpec::text("Hello")]);
//! let mut tree = LayoutTree::from_spec(&spec)?;
//! tree.layout(&LayoutOptions::default(), &ApproximateShaper)?;
//! ```

pub mod error;
pub mod layout;
pub mod style;

pub use error::{LayoutError, Result};
pub use layout::{
    ApproximateShaper, AutoOr, BfcCursor, BlockFormattingContext, BoxArea, BoxAreas, BoxFlags,
    BoxGeometry, BoxId, BoxKind, BoxSpec, FloatBox, FloatContext, FloatSide, FontMetrics,
    IfcVacancy, IntrinsicSizeMode, LayoutNode, LayoutOptions, LayoutTree, Linebox,
    MarginCollapseCollection, PlacedFloat, Rect, TextShaper, layout_block_level_box,
    layout_contribution,
};
pub use style::{
    BoxSizing, Clear, Direction, Display, DisplayInner, DisplayOuter, Float, LineHeight, Overflow,
    Position, Style, TextAlign, WhiteSpace, WritingMode,
};
