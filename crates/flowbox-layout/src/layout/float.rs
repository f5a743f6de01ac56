//! CSS Float Layout.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."
//!
//! Each side keeps a ledger of vertical tracks. A track is a band
//! `[block_offsets[i], block_offsets[i + 1])` with uniform float occupancy.
//! All block offsets here are in the coordinate space of the block
//! formatting context that owns the [`FloatContext`].

use std::mem;

use log::trace;

use flowbox_common::warning::warn_once;

use super::tree::BoxId;
use crate::error::{LayoutError, Result};
use crate::style::{Clear, Float};

/// Occupancy ledger of one side (left or right) of a float context.
#[derive(Debug, Clone)]
pub struct FloatSide {
    items: Vec<BoxId>,
    shelf_block_offset: f64,
    shelf_track_index: usize,
    /// Track boundaries; the last entry is an open-ended sentinel.
    block_offsets: Vec<f64>,
    inline_sizes: Vec<f64>,
    inline_offsets: Vec<f64>,
    float_counts: Vec<usize>,
}

impl FloatSide {
    /// Create a side with one empty, open-ended track starting at `block_offset`.
    #[must_use]
    pub fn new(block_offset: f64) -> Self {
        Self {
            items: Vec::new(),
            shelf_block_offset: block_offset,
            shelf_track_index: 0,
            block_offsets: vec![block_offset, f64::INFINITY],
            inline_sizes: vec![0.0],
            inline_offsets: vec![0.0],
            float_counts: vec![0],
        }
    }

    /// Number of tracks.
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.inline_sizes.len()
    }

    /// Track boundaries, including the trailing open-ended sentinel.
    #[must_use]
    pub fn block_offsets(&self) -> &[f64] {
        &self.block_offsets
    }

    /// Number of floats placed on this side.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no float has been placed on this side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Boxes placed on this side, in placement order.
    #[must_use]
    pub fn items(&self) -> &[BoxId] {
        &self.items
    }

    /// The next insertion offset.
    #[must_use]
    pub const fn shelf_block_offset(&self) -> f64 {
        self.shelf_block_offset
    }

    /// Largest inline extent occupied in tracks `start..end`, measured from
    /// `inline_offset`. Tracks without floats do not count.
    #[must_use]
    pub fn get_size_of_tracks(&self, start: usize, end: usize, inline_offset: f64) -> f64 {
        (start..end)
            .filter(|&i| self.float_counts[i] > 0)
            .map(|i| inline_offset + self.inline_sizes[i] + self.inline_offsets[i])
            .fold(0.0, f64::max)
    }

    /// Largest number of overlapping floats in tracks `start..end`.
    #[must_use]
    pub fn get_float_count_of_tracks(&self, start: usize, end: usize) -> usize {
        self.float_counts[start..end].iter().copied().max().unwrap_or(0)
    }

    /// First track at or past the end of the band starting in track `start`.
    #[must_use]
    pub fn get_end_track(&self, start: usize, block_offset: f64, block_size: f64) -> usize {
        let block_position = block_offset + block_size;
        let n_tracks = self.track_count();
        let mut end = start + 1;
        while end < n_tracks && self.block_offsets[end] < block_position {
            end += 1;
        }
        end
    }

    /// Tracks `[start, end)` overlapped by the band
    /// `[block_offset, block_offset + block_size)`.
    #[must_use]
    pub fn get_track_range(&self, block_offset: f64, block_size: f64) -> (usize, usize) {
        let n_tracks = self.track_count();
        let start = self.block_offsets[..n_tracks]
            .partition_point(|&b| b <= block_offset)
            .saturating_sub(1);
        (start, self.get_end_track(start, block_offset, block_size))
    }

    /// Inline space taken by this side's floats in a band, measured from
    /// `inline_offset`.
    #[must_use]
    pub fn get_occupied_space(
        &self,
        block_offset: f64,
        block_size: f64,
        inline_offset: f64,
    ) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        let (start, end) = self.get_track_range(block_offset, block_size);
        self.get_size_of_tracks(start, end, inline_offset)
    }

    /// Move the shelf to the start of a new block container.
    pub fn box_start(&mut self, block_offset: f64) {
        self.shelf_block_offset = block_offset;
        self.shelf_track_index = self.get_track_range(block_offset, 0.0).0;
    }

    /// Lower the shelf. The shelf never moves up.
    pub fn drop_shelf(&mut self, block_offset: f64) {
        if block_offset > self.shelf_block_offset {
            self.shelf_block_offset = block_offset;
            self.shelf_track_index = self.get_track_range(block_offset, 0.0).0;
        }
    }

    /// Start of the track after the shelf's track, or of the shelf's track
    /// if it is the last one.
    #[must_use]
    pub fn get_next_track_offset(&self) -> f64 {
        if self.shelf_track_index + 1 < self.track_count() {
            self.block_offsets[self.shelf_track_index + 1]
        } else {
            self.block_offsets[self.shelf_track_index]
        }
    }

    /// Block offset below which no float on this side extends.
    #[must_use]
    pub fn get_bottom(&self) -> f64 {
        self.block_offsets[self.track_count() - 1]
    }

    fn split_track(&mut self, track_index: usize, block_offset: f64) {
        let size = self.inline_sizes[track_index];
        let offset = self.inline_offsets[track_index];
        let count = self.float_counts[track_index];
        self.block_offsets.insert(track_index + 1, block_offset);
        self.inline_sizes.insert(track_index, size);
        self.inline_offsets.insert(track_index, offset);
        self.float_counts.insert(track_index, count);
    }

    #[allow(clippy::float_cmp)]
    fn split_if_shelf_dropped(&mut self) {
        if self.block_offsets[self.shelf_track_index] != self.shelf_block_offset {
            self.split_track(self.shelf_track_index, self.shelf_block_offset);
            self.shelf_track_index += 1;
        }
    }

    /// Record a float at the shelf and return the line-left offset of its
    /// border box within its containing block.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::StructuralInvariant`] if the box is not floated
    /// or the vacancy was not computed at this side's shelf.
    #[allow(clippy::float_cmp)]
    pub fn place_float(
        &mut self,
        float: &FloatBox,
        vacancy: &IfcVacancy,
        cb_line_left: f64,
        cb_line_right: f64,
    ) -> Result<f64> {
        if float.float == Float::None {
            return Err(LayoutError::StructuralInvariant(format!(
                "tried to place box {} with float: none",
                float.id
            )));
        }
        if vacancy.block_offset != self.shelf_block_offset {
            return Err(LayoutError::StructuralInvariant(format!(
                "vacancy for box {} was computed at {} but the shelf is at {}",
                float.id, vacancy.block_offset, self.shelf_block_offset
            )));
        }

        self.split_if_shelf_dropped();

        // STEP 1: Split the tracks so the float's margin box starts and ends
        // on a boundary.
        let start_track = self.shelf_track_index;
        let block_size = float.margin_box_block_size();
        let block_end_offset = self.shelf_block_offset + block_size;
        let end_track = if block_size > 0.0 {
            let end = self.get_end_track(start_track, self.shelf_block_offset, block_size);
            if self.block_offsets[end] != block_end_offset {
                self.split_track(end - 1, block_end_offset);
            }
            end
        } else {
            start_track
        };

        // STEP 2: Position the border box.
        // [§ 9.5.1 Rule 9](https://www.w3.org/TR/CSS2/visuren.html#float-position)
        //
        // "A left-floating box must be put as far to the left as possible,
        // a right-floating box as far to the right as possible."
        let is_left = float.float == Float::Left;
        let (vc_offset, margin_offset, margin_end) = if is_left {
            (
                vacancy.left_offset,
                float.margin_line_left,
                float.margin_line_right,
            )
        } else {
            (
                vacancy.right_offset,
                float.margin_line_right,
                float.margin_line_left,
            )
        };
        let line_left = if is_left {
            vc_offset - cb_line_left + margin_offset
        } else {
            float.cb_inline_size - float.border_inline_size - vc_offset + cb_line_right
                - margin_offset
        };

        // STEP 3: Widen the occupied space of every covered track.
        let outer = margin_offset + float.border_inline_size + margin_end;
        for track in start_track..end_track {
            if self.float_counts[track] == 0 {
                self.inline_offsets[track] = vc_offset;
                self.inline_sizes[track] = outer;
            } else {
                self.inline_sizes[track] = vc_offset - self.inline_offsets[track] + outer;
            }
            self.float_counts[track] += 1;
        }

        self.items.push(float.id);
        Ok(line_left)
    }
}

/// What the float context needs to know about a float to place it.
///
/// Sizes are used values of the already laid out float, in the writing mode
/// of its containing block. `auto` margins are 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBox {
    /// The floated box.
    pub id: BoxId,
    /// Which side it floats to.
    pub float: Float,
    /// Its `clear` value.
    pub clear: Clear,
    /// Border-box inline size.
    pub border_inline_size: f64,
    /// Border-box block size.
    pub border_block_size: f64,
    /// Block-start margin.
    pub margin_block_start: f64,
    /// Block-end margin.
    pub margin_block_end: f64,
    /// Line-left margin.
    pub margin_line_left: f64,
    /// Line-right margin.
    pub margin_line_right: f64,
    /// Inline size of the containing block's content area.
    pub cb_inline_size: f64,
}

impl FloatBox {
    /// Inline size of the margin box.
    #[must_use]
    pub fn margin_box_inline_size(&self) -> f64 {
        self.border_inline_size + self.margin_line_left + self.margin_line_right
    }

    /// Block size of the margin box.
    #[must_use]
    pub fn margin_box_block_size(&self) -> f64 {
        self.border_block_size + self.margin_block_start + self.margin_block_end
    }
}

/// Where a float ended up, relative to its containing block's content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedFloat {
    /// The floated box.
    pub id: BoxId,
    /// Block offset of the border box.
    pub block_start: f64,
    /// Line-left offset of the border box.
    pub line_left: f64,
}

/// Snapshot of the owning formatting context's cursor.
///
/// `block_start` is the block offset of the current containing block's
/// content edge and `line_left`/`line_right` its insets from the formatting
/// context root, all in the root's coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BfcCursor {
    /// Block offset of the current containing block.
    pub block_start: f64,
    /// Line-left inset of the current containing block.
    pub line_left: f64,
    /// Line-right inset of the current containing block.
    pub line_right: f64,
    /// Inline size of the formatting context root's content area.
    pub inline_size: f64,
}

/// Inline space available at one block offset once floats are subtracted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfcVacancy {
    /// Distance from the root's line-left edge to the free space.
    pub left_offset: f64,
    /// Distance from the root's line-right edge to the free space.
    pub right_offset: f64,
    /// Width of the free space.
    pub inline_size: f64,
    /// Block offset the vacancy was measured at.
    pub block_offset: f64,
    /// Floats overlapping the band on the left.
    pub left_float_count: usize,
    /// Floats overlapping the band on the right.
    pub right_float_count: usize,
}

impl IfcVacancy {
    /// Widths closer than this to the vacancy still fit.
    pub const EPSILON: f64 = 1.0 / 64.0;

    /// True if content of `inline_size` fits, within [`Self::EPSILON`].
    #[must_use]
    pub fn fits(&self, inline_size: f64) -> bool {
        inline_size - self.inline_size < Self::EPSILON
    }

    /// True if any float overlaps the band.
    #[must_use]
    pub const fn has_floats(&self) -> bool {
        self.left_float_count > 0 || self.right_float_count > 0
    }
}

/// Floats of one block formatting context.
///
/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "Since a float is not in the flow, non-positioned block boxes created
/// before and after the float box flow vertically as if the float did not
/// exist. However, the current and subsequent line boxes created next to
/// the float are shortened as necessary to make room for the margin box
/// of the float."
#[derive(Debug, Clone)]
pub struct FloatContext {
    left: FloatSide,
    right: FloatSide,
    misfits: Vec<FloatBox>,
}

impl FloatContext {
    /// Create an empty context whose tracks start at `block_offset`.
    #[must_use]
    pub fn new(block_offset: f64) -> Self {
        Self {
            left: FloatSide::new(block_offset),
            right: FloatSide::new(block_offset),
            misfits: Vec::new(),
        }
    }

    /// The left side's ledger.
    #[must_use]
    pub const fn left_floats(&self) -> &FloatSide {
        &self.left
    }

    /// The right side's ledger.
    #[must_use]
    pub const fn right_floats(&self) -> &FloatSide {
        &self.right
    }

    /// Floats waiting for space.
    #[must_use]
    pub fn misfits(&self) -> &[FloatBox] {
        &self.misfits
    }

    /// Reset both shelves to the start of a new block container.
    pub fn box_start(&mut self, cursor: &BfcCursor) {
        self.left.box_start(cursor.block_start);
        self.right.box_start(cursor.block_start);
    }

    /// Space left for a line occupying `[block_offset, block_offset + block_size)`.
    #[must_use]
    pub fn get_vacancy_for_line(
        &self,
        cursor: &BfcCursor,
        block_offset: f64,
        block_size: f64,
    ) -> IfcVacancy {
        let left_space = self
            .left
            .get_occupied_space(block_offset, block_size, -cursor.line_left);
        let right_space = self
            .right
            .get_occupied_space(block_offset, block_size, -cursor.line_right);
        let left_offset = cursor.line_left + left_space;
        let right_offset = cursor.line_right + right_space;
        let (ls, le) = self.left.get_track_range(block_offset, block_size);
        let (rs, re) = self.right.get_track_range(block_offset, block_size);
        IfcVacancy {
            left_offset,
            right_offset,
            inline_size: cursor.inline_size - left_offset - right_offset,
            block_offset,
            left_float_count: self.left.get_float_count_of_tracks(ls, le),
            right_float_count: self.right.get_float_count_of_tracks(rs, re),
        }
    }

    /// Space left at the shelf of the float's side for a float, after
    /// `line_width` of the current line is taken.
    ///
    /// The float's own side is measured from the shelf track; the opposite
    /// side from whatever tracks the float would overlap.
    #[must_use]
    pub fn get_vacancy_for_box(
        &self,
        cursor: &BfcCursor,
        float: &FloatBox,
        line_width: f64,
    ) -> IfcVacancy {
        let is_left = float.float == Float::Left;
        let (side, opposite) = if is_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };
        let (inline_offset, opposite_inline_offset) = if is_left {
            (-cursor.line_left, -cursor.line_right)
        } else {
            (-cursor.line_right, -cursor.line_left)
        };
        let block_offset = side.shelf_block_offset;
        let block_size = float.border_block_size;

        let start_track = side.shelf_track_index;
        let end_track = side.get_end_track(start_track, block_offset, block_size);
        let inline_space = side.get_size_of_tracks(start_track, end_track, inline_offset);
        let (opposite_start, opposite_end) = opposite.get_track_range(block_offset, block_size);
        let opposite_space =
            opposite.get_size_of_tracks(opposite_start, opposite_end, opposite_inline_offset);

        let (left_space, right_space) = if is_left {
            (inline_space, opposite_space)
        } else {
            (opposite_space, inline_space)
        };
        let left_offset = cursor.line_left + left_space;
        let right_offset = cursor.line_right + right_space;

        let count = side.get_float_count_of_tracks(start_track, end_track);
        let opposite_count = opposite.get_float_count_of_tracks(opposite_start, opposite_end);
        let (left_float_count, right_float_count) = if is_left {
            (count, opposite_count)
        } else {
            (opposite_count, count)
        };

        IfcVacancy {
            left_offset,
            right_offset,
            inline_size: cursor.inline_size - left_offset - right_offset - line_width,
            block_offset,
            left_float_count,
            right_float_count,
        }
    }

    /// Bottom of the left floats.
    #[must_use]
    pub fn left_bottom(&self) -> f64 {
        self.left.get_bottom()
    }

    /// Bottom of the right floats.
    #[must_use]
    pub fn right_bottom(&self) -> f64 {
        self.right.get_bottom()
    }

    /// Bottom of all floats.
    #[must_use]
    pub fn both_bottom(&self) -> f64 {
        self.left.get_bottom().max(self.right.get_bottom())
    }

    /// First vacancy at or below `block_offset` wide enough for `inline_size`.
    ///
    /// Walks both sides' track boundaries downwards. When no candidate is wide
    /// enough the vacancy below the last boundary is returned.
    #[must_use]
    pub fn find_line_position(
        &self,
        cursor: &BfcCursor,
        block_offset: f64,
        block_size: f64,
        inline_size: f64,
    ) -> IfcVacancy {
        let mut block_offset = block_offset;
        let (mut left_index, _) = self.left.get_track_range(block_offset, block_size);
        let (mut right_index, _) = self.right.get_track_range(block_offset, block_size);
        let left_tracks = self.left.track_count();
        let right_tracks = self.right.track_count();

        while left_index < left_tracks || right_index < right_tracks {
            let left_off = if left_index < left_tracks {
                self.left.block_offsets[left_index]
            } else {
                f64::INFINITY
            };
            let right_off = if right_index < right_tracks {
                self.right.block_offsets[right_index]
            } else {
                f64::INFINITY
            };

            block_offset = block_offset.max(left_off.min(right_off));
            let vacancy = self.get_vacancy_for_line(cursor, block_offset, block_size);
            if vacancy.fits(inline_size) {
                return vacancy;
            }

            // Both sides advance when their boundaries tie.
            if left_off <= right_off {
                left_index += 1;
            }
            if right_off <= left_off {
                right_index += 1;
            }
        }

        self.get_vacancy_for_line(cursor, block_offset, block_size)
    }

    fn sides_mut(&mut self, float: Float) -> (&mut FloatSide, &mut FloatSide) {
        if float == Float::Left {
            (&mut self.left, &mut self.right)
        } else {
            (&mut self.right, &mut self.left)
        }
    }

    /// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Place a float at its side's shelf, or queue it as a misfit.
    ///
    /// `line_width` is the width already used on the current line and
    /// `line_is_empty` whether anything is on it yet. A float that does not
    /// fit is still placed, overflowing, when the line is empty and no float
    /// overlaps the band. Otherwise the shelf is lowered past the nearest
    /// obstruction and the float waits for [`Self::consume_misfits`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::StructuralInvariant`] for `float: none` or an
    /// inconsistent track ledger.
    pub fn place_float(
        &mut self,
        cursor: &BfcCursor,
        float: &FloatBox,
        line_width: f64,
        line_is_empty: bool,
    ) -> Result<Option<PlacedFloat>> {
        if float.float == Float::None {
            return Err(LayoutError::StructuralInvariant(format!(
                "attempted to place box {} with float: none",
                float.id
            )));
        }

        if !self.misfits.is_empty() {
            trace!("float {}: queued behind {} misfit(s)", float.id, self.misfits.len());
            self.misfits.push(*float);
            return Ok(None);
        }

        // STEP 1: Honor 'clear' by dropping the shelf below the cleared floats.
        // [§ 9.5.2](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
        let left_bottom = self.left_bottom();
        let right_bottom = self.right_bottom();
        {
            let (side, _) = self.sides_mut(float.float);
            if float.clear.clears_left() {
                side.drop_shelf(left_bottom);
            }
            if float.clear.clears_right() {
                side.drop_shelf(right_bottom);
            }
        }

        // STEP 2: Measure the space at the shelf.
        let vacancy = self.get_vacancy_for_box(cursor, float, line_width);
        let inline_size = float.margin_box_inline_size();

        if vacancy.fits(inline_size) || (line_is_empty && !vacancy.has_floats()) {
            if !vacancy.fits(inline_size) {
                warn_once(
                    "layout",
                    "float is wider than its containing block and overflows it",
                );
            }
            // STEP 3: Commit the placement.
            let (side, _) = self.sides_mut(float.float);
            let block_start =
                side.shelf_block_offset + float.margin_block_start - cursor.block_start;
            let line_left = side.place_float(float, &vacancy, cursor.line_left, cursor.line_right)?;
            trace!(
                "float {}: placed at block {block_start} line-left {line_left}",
                float.id
            );
            return Ok(Some(PlacedFloat {
                id: float.id,
                block_start,
                line_left,
            }));
        }

        // STEP 4: Lower the shelf past the nearest obstruction and queue.
        let vacancy = self.get_vacancy_for_box(cursor, float, 0.0);
        if !vacancy.fits(inline_size) {
            let (own_count, opposite_count) = if float.float == Float::Left {
                (vacancy.left_float_count, vacancy.right_float_count)
            } else {
                (vacancy.right_float_count, vacancy.left_float_count)
            };
            let (side, opposite) = self.sides_mut(float.float);
            if own_count > 0 {
                side.drop_shelf(side.get_next_track_offset());
            } else if opposite_count > 0 {
                let (_, track) = opposite.get_track_range(side.shelf_block_offset, 0.0);
                if track == opposite.track_count() {
                    return Err(LayoutError::StructuralInvariant(format!(
                        "no track boundary below the shelf for box {}",
                        float.id
                    )));
                }
                side.drop_shelf(opposite.block_offsets[track]);
            }
        }

        let shelf_offset = if float.float == Float::Left {
            self.left.shelf_block_offset
        } else {
            self.right.shelf_block_offset
        };
        trace!("float {}: misfit, shelf now at {shelf_offset}", float.id);
        self.misfits.push(*float);
        Ok(None)
    }

    /// Retry every queued misfit on an empty line until all are placed.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::StructuralInvariant`] if a retry pass neither
    /// places a float nor lowers a shelf.
    #[allow(clippy::float_cmp)]
    pub fn consume_misfits(&mut self, cursor: &BfcCursor) -> Result<Vec<PlacedFloat>> {
        let mut placed = Vec::new();
        while !self.misfits.is_empty() {
            let shelves = (self.left.shelf_block_offset, self.right.shelf_block_offset);
            let misfits = mem::take(&mut self.misfits);
            let queued = misfits.len();
            for float in &misfits {
                if let Some(placement) = self.place_float(cursor, float, 0.0, true)? {
                    placed.push(placement);
                }
            }
            if self.misfits.len() == queued
                && shelves == (self.left.shelf_block_offset, self.right.shelf_block_offset)
            {
                return Err(LayoutError::StructuralInvariant(format!(
                    "{queued} float(s) can never be placed"
                )));
            }
        }
        Ok(placed)
    }

    /// Lower both shelves.
    pub fn drop_shelf(&mut self, block_offset: f64) {
        self.left.drop_shelf(block_offset);
        self.right.drop_shelf(block_offset);
    }

    /// Called after every line. `line_bottom` is the line's block-end edge in
    /// the formatting context's coordinates.
    ///
    /// # Errors
    ///
    /// See [`Self::consume_misfits`].
    pub fn post_line(
        &mut self,
        cursor: &BfcCursor,
        line_bottom: f64,
        did_break: bool,
    ) -> Result<Vec<PlacedFloat>> {
        if did_break || !self.misfits.is_empty() {
            self.drop_shelf(line_bottom);
        }
        self.consume_misfits(cursor)
    }

    /// Called before laying out a new unit of text content.
    ///
    /// # Errors
    ///
    /// See [`Self::consume_misfits`].
    pub fn pre_text_content(&mut self, cursor: &BfcCursor) -> Result<Vec<PlacedFloat>> {
        self.consume_misfits(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(id: usize, side: Float, width: f64, height: f64) -> FloatBox {
        FloatBox {
            id: BoxId(id),
            float: side,
            clear: Clear::None,
            border_inline_size: width,
            border_block_size: height,
            margin_block_start: 0.0,
            margin_block_end: 0.0,
            margin_line_left: 0.0,
            margin_line_right: 0.0,
            cb_inline_size: 300.0,
        }
    }

    fn cursor(inline_size: f64) -> BfcCursor {
        BfcCursor {
            inline_size,
            ..BfcCursor::default()
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_new_side_has_sentinel_boundary() {
        let side = FloatSide::new(0.0);
        assert_eq!(side.track_count(), 1);
        assert_eq!(side.block_offsets().len(), side.track_count() + 1);
        assert_eq!(side.get_bottom(), 0.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_placing_splits_tracks() {
        let c = cursor(300.0);
        let mut ctx = FloatContext::new(0.0);
        let placed = ctx.place_float(&c, &float(1, Float::Left, 100.0, 50.0), 0.0, true);
        assert!(matches!(placed, Ok(Some(_))), "float should be placed");
        let left = ctx.left_floats();
        assert_eq!(left.block_offsets(), &[0.0, 50.0, f64::INFINITY]);
        assert_eq!(left.get_bottom(), 50.0);
        assert_eq!(left.get_occupied_space(10.0, 0.0, 0.0), 100.0);
        assert_eq!(left.get_occupied_space(50.0, 10.0, 0.0), 0.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_right_float_position() {
        let c = cursor(300.0);
        let mut ctx = FloatContext::new(0.0);
        let placed = ctx
            .place_float(&c, &float(1, Float::Right, 80.0, 50.0), 0.0, true)
            .ok()
            .flatten();
        assert_eq!(placed.map(|p| p.line_left), Some(220.0));
    }

    #[test]
    fn test_vacancy_fit_threshold() {
        let vacancy = IfcVacancy {
            left_offset: 0.0,
            right_offset: 0.0,
            inline_size: 120.0,
            block_offset: 0.0,
            left_float_count: 0,
            right_float_count: 0,
        };
        assert!(vacancy.fits(120.0 + 0.5 * IfcVacancy::EPSILON));
        assert!(!vacancy.fits(120.0 + 2.0 * IfcVacancy::EPSILON));
    }
}
