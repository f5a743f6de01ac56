//! Integration tests for float tracks, shelves and line vacancies.
//!
//! [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)

use flowbox_layout::{BfcCursor, BoxId, Clear, Float, FloatBox, FloatContext, IfcVacancy};

/// Helper: a float border box of the given size without margins.
fn float_box(id: usize, side: Float, width: f64, height: f64) -> FloatBox {
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

/// Helper: a cursor at the root of a 300px wide formatting context.
fn root_cursor() -> BfcCursor {
    BfcCursor {
        inline_size: 300.0,
        ..BfcCursor::default()
    }
}

/// Helper: a context holding a 100x50 left float and an 80x30 right float.
fn two_floats() -> FloatContext {
    let cursor = root_cursor();
    let mut ctx = FloatContext::new(0.0);
    let left = ctx.place_float(&cursor, &float_box(1, Float::Left, 100.0, 50.0), 0.0, true);
    assert!(matches!(left, Ok(Some(_))), "left float should be placed");
    let right = ctx.place_float(&cursor, &float_box(2, Float::Right, 80.0, 30.0), 0.0, true);
    assert!(matches!(right, Ok(Some(_))), "right float should be placed");
    ctx
}

#[test]
#[allow(clippy::float_cmp)]
fn test_line_between_two_floats() {
    let ctx = two_floats();
    let vacancy = ctx.get_vacancy_for_line(&root_cursor(), 0.0, 16.0);
    assert_eq!(vacancy.left_offset, 100.0, "left float takes 100px");
    assert_eq!(vacancy.right_offset, 80.0, "right float takes 80px");
    assert_eq!(vacancy.inline_size, 120.0, "120px remain between the floats");
    assert_eq!(vacancy.left_float_count, 1);
    assert_eq!(vacancy.right_float_count, 1);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_line_below_all_floats_is_unconstrained() {
    let ctx = two_floats();
    let vacancy = ctx.get_vacancy_for_line(&root_cursor(), 60.0, 16.0);
    assert_eq!(vacancy.inline_size, 300.0);
    assert!(!vacancy.has_floats(), "no float reaches below 50px");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_stacked_floats_widen_the_occupied_space() {
    let cursor = root_cursor();
    let mut ctx = FloatContext::new(0.0);
    let occupied = |ctx: &FloatContext| ctx.left_floats().get_occupied_space(0.0, 16.0, 0.0);
    assert_eq!(occupied(&ctx), 0.0);

    let first = ctx.place_float(&cursor, &float_box(1, Float::Left, 100.0, 50.0), 0.0, true);
    assert!(matches!(first, Ok(Some(_))));
    assert_eq!(occupied(&ctx), 100.0);

    let second = ctx
        .place_float(&cursor, &float_box(2, Float::Left, 50.0, 50.0), 0.0, true)
        .ok()
        .flatten();
    assert_eq!(second.map(|p| p.line_left), Some(100.0), "stacks beside the first");
    assert_eq!(occupied(&ctx), 150.0, "occupancy only grows");
}

#[test]
#[allow(clippy::float_cmp)]
fn test_find_line_position_moves_below_the_shorter_float() {
    let ctx = two_floats();
    let vacancy = ctx.find_line_position(&root_cursor(), 0.0, 16.0, 200.0);
    assert_eq!(
        vacancy.block_offset, 30.0,
        "200px first fit once the right float ends"
    );
    assert_eq!(vacancy.left_offset, 100.0);
    assert!(vacancy.fits(200.0));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_bottoms() {
    let ctx = two_floats();
    assert_eq!(ctx.left_bottom(), 50.0);
    assert_eq!(ctx.right_bottom(), 30.0);
    assert_eq!(ctx.both_bottom(), 50.0);
}

#[test]
fn test_vacancy_epsilon() {
    let ctx = two_floats();
    let vacancy = ctx.get_vacancy_for_line(&root_cursor(), 0.0, 16.0);
    assert!(vacancy.fits(120.0 + IfcVacancy::EPSILON / 2.0));
    assert!(!vacancy.fits(120.0 + IfcVacancy::EPSILON * 2.0));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_shelf_never_moves_up() {
    let cursor = root_cursor();
    let mut ctx = FloatContext::new(0.0);
    ctx.drop_shelf(40.0);
    ctx.drop_shelf(10.0);
    assert_eq!(ctx.left_floats().shelf_block_offset(), 40.0);

    let placed = ctx
        .place_float(&cursor, &float_box(1, Float::Left, 50.0, 10.0), 0.0, true)
        .ok()
        .flatten();
    assert_eq!(placed.map(|p| p.block_start), Some(40.0));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_misfit_waits_for_the_next_track() {
    let cursor = root_cursor();
    let mut ctx = FloatContext::new(0.0);
    let first = ctx.place_float(&cursor, &float_box(1, Float::Left, 200.0, 50.0), 0.0, true);
    assert!(matches!(first, Ok(Some(_))));

    let second = ctx.place_float(&cursor, &float_box(2, Float::Left, 200.0, 20.0), 0.0, true);
    assert!(matches!(second, Ok(None)), "second float does not fit beside the first");
    assert_eq!(ctx.misfits().len(), 1);

    let placed = ctx.consume_misfits(&cursor).expect("misfit should be placed");
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].block_start, 50.0, "placed below the first float");
    assert_eq!(placed[0].line_left, 0.0);
    assert!(ctx.misfits().is_empty());
}

#[test]
fn test_later_floats_queue_behind_misfits() {
    let cursor = root_cursor();
    let mut ctx = FloatContext::new(0.0);
    let _ = ctx.place_float(&cursor, &float_box(1, Float::Left, 200.0, 50.0), 0.0, true);
    let _ = ctx.place_float(&cursor, &float_box(2, Float::Left, 200.0, 20.0), 0.0, true);
    let small = ctx.place_float(&cursor, &float_box(3, Float::Right, 10.0, 10.0), 0.0, true);
    assert!(
        matches!(small, Ok(None)),
        "floats keep document order behind a misfit"
    );
    assert_eq!(ctx.misfits().len(), 2);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_overflowing_float_on_empty_line() {
    let cursor = root_cursor();
    let mut ctx = FloatContext::new(0.0);
    let placed = ctx
        .place_float(&cursor, &float_box(1, Float::Left, 400.0, 10.0), 0.0, true)
        .ok()
        .flatten();
    assert_eq!(placed.map(|p| p.line_left), Some(0.0), "overflows rather than waits");
}

#[test]
fn test_none_float_is_rejected() {
    let mut ctx = FloatContext::new(0.0);
    let result = ctx.place_float(
        &root_cursor(),
        &float_box(1, Float::None, 10.0, 10.0),
        0.0,
        true,
    );
    assert!(result.is_err());
}
