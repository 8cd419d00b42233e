//! Member positioning.
//!
//! Positions are recomputed from scratch on every draw, so this module is a
//! pure function of the container's geometry and its members' sizes.

use sim_draw::{Point, Size};

use crate::options::{ContainerKind, FillDirection, Overflow};

/// Gap between neighbouring member slots, in pixels.
pub const SPACER: i32 = 5;

/// Resolved container geometry fed to [`compute_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub kind: ContainerKind,
    /// Top-left corner of the container on the surface, after alignment.
    pub origin: Point,
    pub size: Size,
    pub padding: i32,
    /// Already normalized for `kind`.
    pub fill_direction: FillDirection,
    pub overflow: Overflow,
}

/// Computes the top-left corner of every member slot.
///
/// `sizes` holds member sizes in insertion order. Every slot is as large as
/// the biggest member; members are spaced by that size plus [`SPACER`].
/// Entries are `None` for members culled by [`Overflow::Hidden`].
pub fn compute_layout(params: &LayoutParams, sizes: &[i32]) -> Vec<Option<Point>> {
    let Some(cell) = sizes.iter().copied().max() else {
        return Vec::new();
    };
    let stride = cell + SPACER;
    let hidden = params.overflow == Overflow::Hidden;

    (0..sizes.len())
        .map(|i| {
            let i = i as i32;
            let (x_offset, y_offset) = match params.kind {
                ContainerKind::Row => (params.padding + i * stride, params.padding),
                ContainerKind::Column => (params.padding, params.padding + i * stride),
                ContainerKind::Grid => {
                    let columns = grid_columns(params.size.width, params.padding, stride);
                    (
                        params.padding + (i % columns) * stride,
                        params.padding + (i / columns) * stride,
                    )
                }
            };

            if hidden && culled(params, x_offset, y_offset) {
                return None;
            }

            Some(place(params, cell, x_offset, y_offset))
        })
        .collect()
}

/// Number of columns a grid fits into `width`, never less than one.
fn grid_columns(width: i32, padding: i32, stride: i32) -> i32 {
    ((width - 2 * padding + SPACER) / stride.max(1)).max(1)
}

/// Whether a slot starts at or past the far edge on the culled axes.
fn culled(params: &LayoutParams, x_offset: i32, y_offset: i32) -> bool {
    let past_x = x_offset >= params.size.width;
    let past_y = y_offset >= params.size.height;
    match params.kind {
        ContainerKind::Row => past_x,
        ContainerKind::Column => past_y,
        ContainerKind::Grid => past_x || past_y,
    }
}

/// Turns offsets measured from the fill anchor into surface coordinates.
fn place(params: &LayoutParams, cell: i32, x_offset: i32, y_offset: i32) -> Point {
    let Point { x, y } = params.origin;
    let Size { width, height } = params.size;
    let fill = params.fill_direction;

    let far_x = x + width - x_offset - cell;
    let far_y = y + height - y_offset - cell;

    match params.kind {
        // Right anchors a row at its right edge and a column at its bottom
        ContainerKind::Row => {
            let x = if fill.is_far_horizontal() {
                far_x
            } else {
                x + x_offset
            };
            Point::new(x, y + y_offset)
        }
        ContainerKind::Column => {
            let y = if fill.is_far_horizontal() {
                far_y
            } else {
                y + y_offset
            };
            Point::new(x + x_offset, y)
        }
        ContainerKind::Grid => {
            let x = if fill.is_far_horizontal() {
                far_x
            } else {
                x + x_offset
            };
            let y = if fill.is_far_vertical() {
                far_y
            } else {
                y + y_offset
            };
            Point::new(x, y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(kind: ContainerKind, width: i32, height: i32) -> LayoutParams {
        LayoutParams {
            kind,
            origin: Point::new(100, 50),
            size: Size::new(width, height),
            padding: 0,
            fill_direction: match kind {
                ContainerKind::Grid => FillDirection::TopLeft,
                _ => FillDirection::Left,
            },
            overflow: Overflow::Visible,
        }
    }

    #[test]
    fn test_empty_container_places_nothing() {
        assert!(compute_layout(&params(ContainerKind::Row, 100, 20), &[]).is_empty());
    }

    #[test]
    fn test_row_left_spacing() {
        let mut p = params(ContainerKind::Row, 200, 20);
        p.padding = 2;
        let slots = compute_layout(&p, &[10, 10, 10]);
        assert_eq!(
            slots,
            vec![
                Some(Point::new(102, 52)),
                Some(Point::new(117, 52)),
                Some(Point::new(132, 52)),
            ]
        );
    }

    #[test]
    fn test_row_uses_largest_member_as_cell() {
        let p = params(ContainerKind::Row, 200, 40);
        let slots = compute_layout(&p, &[10, 30, 20]);
        // stride = 30 + 5
        assert_eq!(slots[1], Some(Point::new(135, 50)));
        assert_eq!(slots[2], Some(Point::new(170, 50)));
    }

    #[test]
    fn test_row_right_fills_from_right_edge() {
        let mut p = params(ContainerKind::Row, 100, 20);
        p.fill_direction = FillDirection::Right;
        let slots = compute_layout(&p, &[10, 10]);
        assert_eq!(slots[0], Some(Point::new(190, 50)));
        assert_eq!(slots[1], Some(Point::new(175, 50)));
    }

    #[test]
    fn test_column_stacks_downward() {
        let mut p = params(ContainerKind::Column, 20, 200);
        p.padding = 1;
        let slots = compute_layout(&p, &[8, 8]);
        assert_eq!(slots[0], Some(Point::new(101, 51)));
        assert_eq!(slots[1], Some(Point::new(101, 64)));
    }

    #[test]
    fn test_column_right_fills_from_bottom_edge() {
        let mut p = params(ContainerKind::Column, 20, 200);
        p.fill_direction = FillDirection::Right;
        let slots = compute_layout(&p, &[8, 8]);
        assert_eq!(slots[0], Some(Point::new(100, 242)));
        assert_eq!(slots[1], Some(Point::new(100, 229)));
    }

    #[test]
    fn test_grid_wraps_rows() {
        // (50 + 5) / 15 = 3 columns
        let p = params(ContainerKind::Grid, 50, 50);
        let slots = compute_layout(&p, &[10; 5]);
        assert_eq!(slots[0], Some(Point::new(100, 50)));
        assert_eq!(slots[2], Some(Point::new(130, 50)));
        assert_eq!(slots[3], Some(Point::new(100, 65)));
        assert_eq!(slots[4], Some(Point::new(115, 65)));
    }

    #[test]
    fn test_grid_bottom_right_mirrors_both_axes() {
        let mut p = params(ContainerKind::Grid, 50, 50);
        p.fill_direction = FillDirection::BottomRight;
        let slots = compute_layout(&p, &[10; 4]);
        assert_eq!(slots[0], Some(Point::new(140, 90)));
        assert_eq!(slots[1], Some(Point::new(125, 90)));
        assert_eq!(slots[3], Some(Point::new(140, 75)));
    }

    #[test]
    fn test_grid_narrower_than_member_has_one_column() {
        let p = params(ContainerKind::Grid, 5, 100);
        let slots = compute_layout(&p, &[10, 10]);
        assert_eq!(slots[1], Some(Point::new(100, 65)));
    }

    #[test]
    fn test_hidden_row_culls_past_width() {
        let mut p = params(ContainerKind::Row, 60, 40);
        p.overflow = Overflow::Hidden;
        // stride 35: offsets 0, 35, 70
        let slots = compute_layout(&p, &[10, 20, 30]);
        assert!(slots[0].is_some());
        assert!(slots[1].is_some());
        assert_eq!(slots[2], None);
    }

    #[test]
    fn test_hidden_cull_is_inclusive_of_edge() {
        let mut p = params(ContainerKind::Row, 15, 40);
        p.overflow = Overflow::Hidden;
        // second slot starts exactly at the width
        let slots = compute_layout(&p, &[10, 10]);
        assert_eq!(slots, vec![Some(Point::new(100, 50)), None]);
    }

    #[test]
    fn test_visible_keeps_overflowing_members() {
        let p = params(ContainerKind::Row, 15, 40);
        let slots = compute_layout(&p, &[10, 10, 10]);
        assert!(slots.iter().all(Option::is_some));
    }

    #[test]
    fn test_hidden_column_culls_past_height() {
        let mut p = params(ContainerKind::Column, 100, 20);
        p.overflow = Overflow::Hidden;
        // stride 15: offsets 0, 15, 30; width never culls a column
        let slots = compute_layout(&p, &[10, 10, 10]);
        assert_eq!(
            slots,
            vec![Some(Point::new(100, 50)), Some(Point::new(100, 65)), None]
        );
    }

    #[test]
    fn test_grid_of_degenerate_sizes_does_not_divide_by_zero() {
        let p = params(ContainerKind::Grid, 50, 50);
        let slots = compute_layout(&p, &[-5, -5]);
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(Option::is_some));
    }

    #[test]
    fn test_hidden_grid_culls_rows_past_height() {
        let mut p = params(ContainerKind::Grid, 15, 20);
        p.overflow = Overflow::Hidden;
        // one column, rows at 0, 15, 30
        let slots = compute_layout(&p, &[10, 10, 10]);
        assert_eq!(slots.iter().filter(|s| s.is_some()).count(), 2);
    }
}
