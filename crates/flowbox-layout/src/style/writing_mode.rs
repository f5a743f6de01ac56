//! Writing modes and the logical-to-physical side mapping.
//!
//! [CSS Writing Modes Level 3](https://www.w3.org/TR/css-writing-modes-3/)
//!
//! "CSS writing modes ... determine whether lines of text are laid out
//! horizontally or vertically and the direction in which blocks progress."

use serde::{Deserialize, Serialize};

/// [§ 3.2 Block Flow Direction: the writing-mode property](https://www.w3.org/TR/css-writing-modes-3/#block-flow)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WritingMode {
    /// "Top-to-bottom block flow direction. Both the writing mode and the
    /// typographic mode are horizontal."
    #[default]
    HorizontalTb,
    /// "Left-to-right block flow direction. Both the writing mode and the
    /// typographic mode are vertical."
    VerticalLr,
    /// "Right-to-left block flow direction. Both the writing mode and the
    /// typographic mode are vertical."
    VerticalRl,
}

/// [§ 2.1 Specifying Directionality: the direction property](https://www.w3.org/TR/css-writing-modes-3/#direction)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Direction {
    /// "Left-to-right directionality."
    #[default]
    Ltr,
    /// "Right-to-left directionality."
    Rtl,
}

/// A physical side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalSide {
    /// The top side.
    Top,
    /// The right side.
    Right,
    /// The bottom side.
    Bottom,
    /// The left side.
    Left,
}

impl WritingMode {
    /// True for `horizontal-tb`, where the inline axis is horizontal.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::HorizontalTb)
    }

    /// [§ 6.2 Flow-relative Directions](https://www.w3.org/TR/css-writing-modes-3/#logical-directions)
    ///
    /// "block-start: Nominally the side that comes earlier in the block
    /// progression."
    #[must_use]
    pub const fn block_start(self) -> PhysicalSide {
        match self {
            Self::HorizontalTb => PhysicalSide::Top,
            Self::VerticalLr => PhysicalSide::Left,
            Self::VerticalRl => PhysicalSide::Right,
        }
    }

    /// "block-end: The side opposite block-start."
    #[must_use]
    pub const fn block_end(self) -> PhysicalSide {
        match self {
            Self::HorizontalTb => PhysicalSide::Bottom,
            Self::VerticalLr => PhysicalSide::Right,
            Self::VerticalRl => PhysicalSide::Left,
        }
    }

    /// [§ 6.3 Line-relative Directions](https://www.w3.org/TR/css-writing-modes-3/#line-directions)
    ///
    /// "line-left: Nominally the side from which LTR text would start."
    #[must_use]
    pub const fn line_left(self) -> PhysicalSide {
        match self {
            Self::HorizontalTb => PhysicalSide::Left,
            Self::VerticalLr | Self::VerticalRl => PhysicalSide::Top,
        }
    }

    /// "line-right: Nominally the side from which RTL text would start."
    #[must_use]
    pub const fn line_right(self) -> PhysicalSide {
        match self {
            Self::HorizontalTb => PhysicalSide::Right,
            Self::VerticalLr | Self::VerticalRl => PhysicalSide::Bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_vertical_modes_map_block_axis_horizontally() {
        assert_eq!(WritingMode::VerticalLr.block_start(), PhysicalSide::Left);
        assert_eq!(WritingMode::VerticalRl.block_start(), PhysicalSide::Right);
        assert_eq!(WritingMode::VerticalRl.block_end(), PhysicalSide::Left);
        assert_eq!(WritingMode::VerticalLr.line_left(), PhysicalSide::Top);
        assert_eq!(WritingMode::HorizontalTb.line_right(), PhysicalSide::Right);
    }

    #[test]
    fn test_keywords_parse() {
        assert_eq!(
            WritingMode::from_str("vertical-rl").ok(),
            Some(WritingMode::VerticalRl)
        );
        assert_eq!(WritingMode::HorizontalTb.to_string(), "horizontal-tb");
        assert!(WritingMode::from_str("sideways-lr").is_err());
    }
}
