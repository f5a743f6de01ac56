//! Block Layout Engine
//!
//! This module implements block formatting contexts for a flattened tree of
//! styled boxes: margin collapsing, float placement and the per-line vacancy
//! that inline content wraps within.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual Formatting Model Details](https://www.w3.org/TR/CSS2/visudet.html)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS Writing Modes Level 3](https://www.w3.org/TR/css-writing-modes-3/)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`values`] - Auto-or-length used values
//! - [`box_model`] - Logical box areas and physical rectangles
//! - [`margin`] - Adjoining margin collection
//! - [`float`] - Float tracks, vacancies and placement
//! - [`formatting_context`] - The block formatting context state machine
//! - [`inline`] - Inline content items and the line builder
//! - [`layout_box`] - Block, replaced and float layout drivers
//! - [`tree`] - The box tree, its construction and pre/post layout passes

pub mod box_model;
pub mod float;
pub mod formatting_context;
pub mod inline;
pub mod layout_box;
pub mod margin;
pub mod tree;
pub mod values;

// Re-exports for convenience
pub use box_model::{BoxArea, BoxAreas, BoxGeometry, Rect};
pub use float::{BfcCursor, FloatBox, FloatContext, FloatSide, IfcVacancy, PlacedFloat};
pub use formatting_context::BlockFormattingContext;
pub use inline::{ApproximateShaper, FontMetrics, Linebox, TextShaper};
pub use layout_box::{IntrinsicSizeMode, layout_block_level_box, layout_contribution};
pub use margin::MarginCollapseCollection;
pub use tree::{BoxFlags, BoxId, BoxKind, BoxSpec, LayoutNode, LayoutOptions, LayoutTree};
pub use values::AutoOr;
