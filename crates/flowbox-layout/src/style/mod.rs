//! Used-value style consumed by layout.
//!
//! [§ 6.1 Used Values](https://www.w3.org/TR/css-cascade-4/#used)
//!
//! "The used value is the result of taking the computed value and completing
//! any remaining calculations to make it the absolute theoretical value used
//! in the formatting of the document."
//!
//! Values arrive already resolved to pixels, except where `auto` is allowed.
//! Properties are stored physically; the logical accessors take the writing
//! mode of the containing block.

mod writing_mode;

pub use writing_mode::{Direction, PhysicalSide, WritingMode};

use serde::{Deserialize, Serialize};

use crate::layout::AutoOr;

/// Declares a CSS keyword enum that parses from and prints as kebab-case,
/// both through serde and through `FromStr`/`Display`.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
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
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant
            ),+
        }
    };
}

keyword_enum! {
    /// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub enum Display {
        /// `display: block` (block flow).
        #[default]
        Block,
        /// `display: inline`. On a block container this means inline-block.
        Inline,
        /// `display: inline-block` (inline flow-root).
        InlineBlock,
        /// `display: flow-root` (block flow-root).
        FlowRoot,
    }
}

/// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOuter {
    /// "The element generates a block-level box."
    Block,
    /// "The element generates an inline-level box."
    Inline,
}

/// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayInner {
    /// "The element lays out its contents using flow layout."
    Flow,
    /// "The element generates a block container box, and lays out its
    /// contents using flow layout. It always establishes a new block
    /// formatting context for its contents."
    FlowRoot,
}

impl Display {
    /// The outer display role.
    #[must_use]
    pub const fn outer(self) -> DisplayOuter {
        match self {
            Self::Block | Self::FlowRoot => DisplayOuter::Block,
            Self::Inline | Self::InlineBlock => DisplayOuter::Inline,
        }
    }

    /// The inner display model.
    #[must_use]
    pub const fn inner(self) -> DisplayInner {
        match self {
            Self::Block | Self::Inline => DisplayInner::Flow,
            Self::FlowRoot | Self::InlineBlock => DisplayInner::FlowRoot,
        }
    }
}

keyword_enum! {
    /// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub enum Float {
        /// "The box is not floated."
        #[default]
        None,
        /// "The element generates a block box that is floated to the left."
        Left,
        /// "The element generates a block box that is floated to the right."
        Right,
    }
}

keyword_enum! {
    /// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub enum Clear {
        /// "No constraint on the box's position with respect to floats."
        #[default]
        None,
        /// "Requires that the top border edge of the box be below the bottom
        /// outer edge of any left-floating boxes."
        Left,
        /// "Requires that the top border edge of the box be below the bottom
        /// outer edge of any right-floating boxes."
        Right,
        /// "Requires that the top border edge of the box be below the bottom
        /// outer edge of any right-floating and left-floating boxes."
        Both,
    }
}

impl Clear {
    /// True if this value clears left floats.
    #[must_use]
    pub const fn clears_left(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    /// True if this value clears right floats.
    #[must_use]
    pub const fn clears_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

keyword_enum! {
    /// [§ 11.1.1 Overflow: the 'overflow' property](https://www.w3.org/TR/CSS2/visufx.html#overflow)
    pub enum Overflow {
        /// "This value indicates that content is not clipped."
        #[default]
        Visible,
        /// "This value indicates that the content is clipped."
        Hidden,
    }
}

keyword_enum! {
    /// [§ 9.3.1 Choosing a positioning scheme: 'position' property](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    pub enum Position {
        /// "The box is a normal box, laid out according to the normal flow."
        #[default]
        Static,
        /// "The box's position is calculated according to the normal flow.
        /// Then the box is offset relative to its normal position."
        Relative,
    }
}

keyword_enum! {
    /// [§ 3.1 Box Sizing: the box-sizing property](https://www.w3.org/TR/css-sizing-3/#box-sizing)
    pub enum BoxSizing {
        /// Width and height size the content box.
        #[default]
        ContentBox,
        /// Width and height size the border box.
        BorderBox,
    }
}

keyword_enum! {
    /// [§ 3 White Space and Wrapping: the white-space property](https://www.w3.org/TR/css-text-3/#white-space-property)
    pub enum WhiteSpace {
        /// Collapse white space, wrap lines.
        #[default]
        Normal,
        /// Collapse white space, never wrap.
        Nowrap,
        /// Preserve white space and newlines, never wrap.
        Pre,
        /// Preserve white space and newlines, wrap lines.
        PreWrap,
        /// Collapse spaces, preserve newlines, wrap lines.
        PreLine,
    }
}

impl WhiteSpace {
    /// Spaces and tabs collapse into a single space.
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Line feeds are forced breaks rather than collapsible white space.
    #[must_use]
    pub const fn preserves_newlines(self) -> bool {
        matches!(self, Self::Pre | Self::PreWrap | Self::PreLine)
    }

    /// Soft wrap opportunities exist.
    #[must_use]
    pub const fn wraps(self) -> bool {
        !matches!(self, Self::Nowrap | Self::Pre)
    }
}

keyword_enum! {
    /// [§ 7.1 Text Alignment: the text-align shorthand](https://www.w3.org/TR/css-text-3/#text-align-property)
    pub enum TextAlign {
        /// Align to the start edge of the line box.
        #[default]
        Start,
        /// Align to the end edge of the line box.
        End,
        /// Align to the line-left edge.
        Left,
        /// Align to the line-right edge.
        Right,
        /// Center within the line box.
        Center,
    }
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "LineHeightRepr", into = "LineHeightRepr")]
pub enum LineHeight {
    /// "Tells user agents to set the used value to a 'reasonable' value
    /// based on the font of the element."
    #[default]
    Normal,
    /// "The used value of the property is this number multiplied by the
    /// element's font size."
    Number(f64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LineHeightRepr {
    Number(f64),
    Keyword(String),
}

impl TryFrom<LineHeightRepr> for LineHeight {
    type Error = String;

    fn try_from(repr: LineHeightRepr) -> Result<Self, Self::Error> {
        match repr {
            LineHeightRepr::Number(n) => Ok(Self::Number(n)),
            LineHeightRepr::Keyword(k) if k == "normal" => Ok(Self::Normal),
            LineHeightRepr::Keyword(k) => Err(format!("expected a number or 'normal', got '{k}'")),
        }
    }
}

impl From<LineHeight> for LineHeightRepr {
    fn from(value: LineHeight) -> Self {
        match value {
            LineHeight::Normal => Self::Keyword("normal".to_string()),
            LineHeight::Number(n) => Self::Number(n),
        }
    }
}

/// Used style of one box.
///
/// Missing fields in JSON take the initial values of [`Style::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Style {
    /// Outer and inner display type.
    pub display: Display,
    /// Float side, if floated.
    pub float: Float,
    /// Sides whose floats this box must be placed below.
    pub clear: Clear,
    /// Whether overflowing content is clipped (establishes a BFC when hidden).
    pub overflow: Overflow,
    /// Positioning scheme.
    pub position: Position,
    /// Relative offset from the top edge.
    pub top: AutoOr,
    /// Relative offset from the right edge.
    pub right: AutoOr,
    /// Relative offset from the bottom edge.
    pub bottom: AutoOr,
    /// Relative offset from the left edge.
    pub left: AutoOr,
    /// Top margin.
    pub margin_top: AutoOr,
    /// Right margin.
    pub margin_right: AutoOr,
    /// Bottom margin.
    pub margin_bottom: AutoOr,
    /// Left margin.
    pub margin_left: AutoOr,
    /// Top padding.
    pub padding_top: f64,
    /// Right padding.
    pub padding_right: f64,
    /// Bottom padding.
    pub padding_bottom: f64,
    /// Left padding.
    pub padding_left: f64,
    /// Top border width.
    pub border_top_width: f64,
    /// Right border width.
    pub border_right_width: f64,
    /// Bottom border width.
    pub border_bottom_width: f64,
    /// Left border width.
    pub border_left_width: f64,
    /// Physical width.
    pub width: AutoOr,
    /// Physical height.
    pub height: AutoOr,
    /// Which box `width`/`height` size.
    pub box_sizing: BoxSizing,
    /// Writing mode this box establishes for its contents.
    pub writing_mode: WritingMode,
    /// Inline base direction this box establishes for its contents.
    pub direction: Direction,
    /// Font size in pixels.
    pub font_size: f64,
    /// Line height.
    pub line_height: LineHeight,
    /// White space handling for text in this box.
    pub white_space: WhiteSpace,
    /// Alignment of line contents.
    pub text_align: TextAlign,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Block,
            float: Float::None,
            clear: Clear::None,
            overflow: Overflow::Visible,
            position: Position::Static,
            top: AutoOr::Auto,
            right: AutoOr::Auto,
            bottom: AutoOr::Auto,
            left: AutoOr::Auto,
            margin_top: AutoOr::Length(0.0),
            margin_right: AutoOr::Length(0.0),
            margin_bottom: AutoOr::Length(0.0),
            margin_left: AutoOr::Length(0.0),
            padding_top: 0.0,
            padding_right: 0.0,
            padding_bottom: 0.0,
            padding_left: 0.0,
            border_top_width: 0.0,
            border_right_width: 0.0,
            border_bottom_width: 0.0,
            border_left_width: 0.0,
            width: AutoOr::Auto,
            height: AutoOr::Auto,
            box_sizing: BoxSizing::ContentBox,
            writing_mode: WritingMode::HorizontalTb,
            direction: Direction::Ltr,
            font_size: 16.0,
            line_height: LineHeight::Normal,
            white_space: WhiteSpace::Normal,
            text_align: TextAlign::Start,
        }
    }
}

// Builder-style setters, mostly for tests and programmatic trees.
impl Style {
    /// Set all four margins (top, right, bottom, left).
    #[must_use]
    pub const fn margin(
        mut self,
        top: AutoOr,
        right: AutoOr,
        bottom: AutoOr,
        left: AutoOr,
    ) -> Self {
        self.margin_top = top;
        self.margin_right = right;
        self.margin_bottom = bottom;
        self.margin_left = left;
        self
    }

    /// Set the top and bottom margins in pixels.
    #[must_use]
    pub const fn margin_y(mut self, top: f64, bottom: f64) -> Self {
        self.margin_top = AutoOr::Length(top);
        self.margin_bottom = AutoOr::Length(bottom);
        self
    }

    /// Set all four paddings.
    #[must_use]
    pub const fn padding(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.padding_top = top;
        self.padding_right = right;
        self.padding_bottom = bottom;
        self.padding_left = left;
        self
    }

    /// Set all four border widths.
    #[must_use]
    pub const fn border(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.border_top_width = top;
        self.border_right_width = right;
        self.border_bottom_width = bottom;
        self.border_left_width = left;
        self
    }

    /// Set a definite width in pixels.
    #[must_use]
    pub const fn with_width(mut self, px: f64) -> Self {
        self.width = AutoOr::Length(px);
        self
    }

    /// Set a definite height in pixels.
    #[must_use]
    pub const fn with_height(mut self, px: f64) -> Self {
        self.height = AutoOr::Length(px);
        self
    }

    /// Float this box.
    #[must_use]
    pub const fn floated(mut self, float: Float) -> Self {
        self.float = float;
        self
    }

    /// Set `clear`.
    #[must_use]
    pub const fn cleared(mut self, clear: Clear) -> Self {
        self.clear = clear;
        self
    }

    /// Set `display`.
    #[must_use]
    pub const fn displayed(mut self, display: Display) -> Self {
        self.display = display;
        self
    }
}

impl Style {
    /// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// Style for an anonymous box generated inside a box with this style:
    /// inherited properties are copied, everything else takes its initial value.
    #[must_use]
    pub fn anonymous_child(&self) -> Self {
        Self {
            writing_mode: self.writing_mode,
            direction: self.direction,
            font_size: self.font_size,
            line_height: self.line_height,
            white_space: self.white_space,
            text_align: self.text_align,
            ..Self::default()
        }
    }

    /// True if the box is taken out of flow by `float`.
    #[must_use]
    pub fn is_float(&self) -> bool {
        self.float != Float::None
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "Floats, absolutely positioned elements, block containers (such as
    /// inline-blocks, table-cells, and table-captions) that are not block
    /// boxes, and block boxes with 'overflow' other than 'visible' (except
    /// when that value has been propagated to the viewport) establish new
    /// block formatting contexts for their contents."
    #[must_use]
    pub fn establishes_bfc(&self) -> bool {
        self.display.inner() == DisplayInner::FlowRoot
            || self.display.outer() == DisplayOuter::Inline
            || self.overflow == Overflow::Hidden
            || self.is_float()
    }

    /// Resolve `start`/`end` against the inline base direction.
    #[must_use]
    pub const fn resolved_text_align(&self) -> TextAlign {
        match (self.text_align, self.direction) {
            (TextAlign::Start, Direction::Ltr) | (TextAlign::End, Direction::Rtl) => {
                TextAlign::Left
            }
            (TextAlign::Start, Direction::Rtl) | (TextAlign::End, Direction::Ltr) => {
                TextAlign::Right
            }
            (align, _) => align,
        }
    }

    /// Margin on a physical side.
    #[must_use]
    pub const fn margin_on(&self, side: PhysicalSide) -> AutoOr {
        match side {
            PhysicalSide::Top => self.margin_top,
            PhysicalSide::Right => self.margin_right,
            PhysicalSide::Bottom => self.margin_bottom,
            PhysicalSide::Left => self.margin_left,
        }
    }

    /// Padding on a physical side.
    #[must_use]
    pub const fn padding_on(&self, side: PhysicalSide) -> f64 {
        match side {
            PhysicalSide::Top => self.padding_top,
            PhysicalSide::Right => self.padding_right,
            PhysicalSide::Bottom => self.padding_bottom,
            PhysicalSide::Left => self.padding_left,
        }
    }

    /// Border width on a physical side.
    #[must_use]
    pub const fn border_on(&self, side: PhysicalSide) -> f64 {
        match side {
            PhysicalSide::Top => self.border_top_width,
            PhysicalSide::Right => self.border_right_width,
            PhysicalSide::Bottom => self.border_bottom_width,
            PhysicalSide::Left => self.border_left_width,
        }
    }

    /// `margin-block-start` in the containing block's writing mode.
    #[must_use]
    pub const fn margin_block_start(&self, wm: WritingMode) -> AutoOr {
        self.margin_on(wm.block_start())
    }

    /// `margin-block-end` in the containing block's writing mode.
    #[must_use]
    pub const fn margin_block_end(&self, wm: WritingMode) -> AutoOr {
        self.margin_on(wm.block_end())
    }

    /// Line-left margin in the containing block's writing mode.
    #[must_use]
    pub const fn margin_line_left(&self, wm: WritingMode) -> AutoOr {
        self.margin_on(wm.line_left())
    }

    /// Line-right margin in the containing block's writing mode.
    #[must_use]
    pub const fn margin_line_right(&self, wm: WritingMode) -> AutoOr {
        self.margin_on(wm.line_right())
    }

    /// `padding-block-start` in the containing block's writing mode.
    #[must_use]
    pub const fn padding_block_start(&self, wm: WritingMode) -> f64 {
        self.padding_on(wm.block_start())
    }

    /// `padding-block-end` in the containing block's writing mode.
    #[must_use]
    pub const fn padding_block_end(&self, wm: WritingMode) -> f64 {
        self.padding_on(wm.block_end())
    }

    /// Line-left padding in the containing block's writing mode.
    #[must_use]
    pub const fn padding_line_left(&self, wm: WritingMode) -> f64 {
        self.padding_on(wm.line_left())
    }

    /// Line-right padding in the containing block's writing mode.
    #[must_use]
    pub const fn padding_line_right(&self, wm: WritingMode) -> f64 {
        self.padding_on(wm.line_right())
    }

    /// `border-block-start-width` in the containing block's writing mode.
    #[must_use]
    pub const fn border_block_start_width(&self, wm: WritingMode) -> f64 {
        self.border_on(wm.block_start())
    }

    /// `border-block-end-width` in the containing block's writing mode.
    #[must_use]
    pub const fn border_block_end_width(&self, wm: WritingMode) -> f64 {
        self.border_on(wm.block_end())
    }

    /// Line-left border width in the containing block's writing mode.
    #[must_use]
    pub const fn border_line_left_width(&self, wm: WritingMode) -> f64 {
        self.border_on(wm.line_left())
    }

    /// Line-right border width in the containing block's writing mode.
    #[must_use]
    pub const fn border_line_right_width(&self, wm: WritingMode) -> f64 {
        self.border_on(wm.line_right())
    }

    /// Sum of padding and border on both inline sides.
    #[must_use]
    pub const fn inline_padding_border(&self, wm: WritingMode) -> f64 {
        self.padding_line_left(wm)
            + self.padding_line_right(wm)
            + self.border_line_left_width(wm)
            + self.border_line_right_width(wm)
    }

    /// Sum of padding and border on both block sides.
    #[must_use]
    pub const fn block_padding_border(&self, wm: WritingMode) -> f64 {
        self.padding_block_start(wm)
            + self.padding_block_end(wm)
            + self.border_block_start_width(wm)
            + self.border_block_end_width(wm)
    }

    /// [§ 3.1 box-sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
    ///
    /// Content-box inline size in the containing block's writing mode.
    #[must_use]
    pub fn inline_size(&self, wm: WritingMode) -> AutoOr {
        let size = if wm.is_horizontal() { self.width } else { self.height };
        match self.box_sizing {
            BoxSizing::ContentBox => size,
            BoxSizing::BorderBox => {
                size.map(|px| (px - self.inline_padding_border(wm)).max(0.0))
            }
        }
    }

    /// Content-box block size in the containing block's writing mode.
    #[must_use]
    pub fn block_size(&self, wm: WritingMode) -> AutoOr {
        let size = if wm.is_horizontal() { self.height } else { self.width };
        match self.box_sizing {
            BoxSizing::ContentBox => size,
            BoxSizing::BorderBox => size.map(|px| (px - self.block_padding_border(wm)).max(0.0)),
        }
    }

    /// True if the line-left side of an inline box takes up space.
    #[must_use]
    pub fn has_line_left_gap(&self, wm: WritingMode) -> bool {
        self.margin_line_left(wm).to_px_or(0.0) != 0.0
            || self.padding_line_left(wm) > 0.0
            || self.border_line_left_width(wm) > 0.0
    }

    /// True if the line-right side of an inline box takes up space.
    #[must_use]
    pub fn has_line_right_gap(&self, wm: WritingMode) -> bool {
        self.margin_line_right(wm).to_px_or(0.0) != 0.0
            || self.padding_line_right(wm) > 0.0
            || self.border_line_right_width(wm) > 0.0
    }

    /// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    ///
    /// "If both 'top' and 'bottom' are 'auto', their used values are both
    /// '0'. If one of them is 'auto', it becomes the negative of the other.
    /// If neither is 'auto', 'bottom' is ignored."
    #[must_use]
    pub const fn relative_vertical_shift(&self) -> f64 {
        match (self.top, self.bottom) {
            (AutoOr::Length(top), _) => top,
            (AutoOr::Auto, AutoOr::Length(bottom)) => -bottom,
            (AutoOr::Auto, AutoOr::Auto) => 0.0,
        }
    }

    /// "If neither 'left' nor 'right' is 'auto', the position is
    /// over-constrained, and one of them has to be ignored. If the
    /// 'direction' property of the containing block is 'ltr', the value of
    /// 'left' wins and 'right' becomes -'left'."
    #[must_use]
    pub const fn relative_horizontal_shift(&self, cb_direction: Direction) -> f64 {
        match (self.left, self.right, cb_direction) {
            (AutoOr::Length(left), AutoOr::Auto, _)
            | (AutoOr::Length(left), AutoOr::Length(_), Direction::Ltr) => left,
            (_, AutoOr::Length(right), _) => -right,
            (AutoOr::Auto, AutoOr::Auto, _) => 0.0,
        }
    }
}
