//! Arrangement: box tree + outer rectangle -> window rectangles
//!
//! Per parent box, along its direction:
//! 1. separators (`spacing` cells per adjacent pair) come off the top,
//! 2. fixed-size children take their cells in order, clamped to what is left,
//! 3. the rest is split between weighted children proportionally.
//!
//! Rounding rule for weighted children: each child first gets
//! `floor(remaining * weight / total_weight)`, then the leftover cells (always
//! fewer than the number of weighted children) go one each to the weighted
//! children in declaration order. The sum of weighted sizes is therefore
//! exactly `remaining` whenever any weight is non-zero, and every child ends
//! up within one cell of its exact share.
//!
//! Degenerate rectangles are never reported: a window whose box ends up with
//! no width or height is simply left out of the result for that pass.

use super::boxes::{BoxContent, Direction, LayoutBox, Sizing};
use super::dimensions::Dimensions;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Window name -> rectangle, ordered by name so identical inputs print identically
pub type Arrangement = BTreeMap<String, Dimensions>;

/// Compute rectangles for every window leaf reachable from `root`
///
/// Conditional children are resolved exactly once per node, parent before
/// child. A degenerate `outer` yields an empty arrangement ("terminal too
/// small"), not an error.
pub fn arrange(root: &LayoutBox, outer: Dimensions) -> Arrangement {
    let mut result = Arrangement::new();
    if outer.is_degenerate() {
        debug!(?outer, "Skipping arrangement for degenerate outer rectangle");
        return result;
    }
    arrange_node(root, outer, &mut result);
    result
}

fn arrange_node(node: &LayoutBox, outer: Dimensions, result: &mut Arrangement) {
    match &node.content {
        BoxContent::Window(name) => {
            if outer.is_degenerate() {
                debug!(window = %name, ?outer, "Window omitted: degenerate geometry");
                return;
            }
            if result.contains_key(name) {
                warn!(window = %name, "Window appears twice in layout tree; keeping first");
                return;
            }
            result.insert(name.clone(), outer);
        }
        BoxContent::Children(children) => {
            if !outer.is_degenerate() {
                arrange_children(node.direction, node.spacing, children, outer, result);
            }
        }
        BoxContent::Conditional(children_fn) => {
            if !outer.is_degenerate() {
                let children = children_fn(outer.width(), outer.height());
                arrange_children(node.direction, node.spacing, &children, outer, result);
            }
        }
    }
}

fn arrange_children(
    direction: Direction,
    spacing: u16,
    children: &[LayoutBox],
    outer: Dimensions,
    result: &mut Arrangement,
) {
    if children.is_empty() {
        return;
    }

    let sizes = calc_sizes(children, outer.extent(direction), spacing);
    let gap = i32::from(spacing);

    let (start, end) = match direction {
        Direction::Row => (outer.y0, outer.y1),
        Direction::Column => (outer.x0, outer.x1),
    };

    let mut cursor = start;
    for (child, size) in children.iter().zip(sizes) {
        let from = cursor.min(end);
        let to = (from + size).min(end);
        let rect = match direction {
            Direction::Row => Dimensions::new(outer.x0, from, outer.x1, to),
            Direction::Column => Dimensions::new(from, outer.y0, to, outer.y1),
        };
        arrange_node(child, rect, result);
        cursor = to + gap;
    }
}

/// Main-axis size for each child given the parent's `extent`
pub(crate) fn calc_sizes(children: &[LayoutBox], extent: i32, spacing: u16) -> Vec<i32> {
    let separators = i32::from(spacing).saturating_mul(children.len() as i32 - 1);
    let mut remaining = (extent.max(0) - separators).max(0);

    let mut sizes = vec![0; children.len()];

    // Fixed children first, in order, never exceeding what is left
    for (slot, child) in sizes.iter_mut().zip(children) {
        if let Sizing::Size(cells) = child.sizing {
            let cells = i32::from(cells).min(remaining);
            *slot = cells;
            remaining -= cells;
        }
    }

    let weights: Vec<(usize, u16)> = children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| match child.sizing {
            Sizing::Weight(w) if w > 0 => Some((i, w)),
            _ => None,
        })
        .collect();

    for (i, share) in distribute(remaining, &weights) {
        sizes[i] = share;
    }

    sizes
}

/// Split `total` cells across `(index, weight)` pairs, floor first then leftovers in order
fn distribute(total: i32, weights: &[(usize, u16)]) -> Vec<(usize, i32)> {
    let weight_sum: i64 = weights.iter().map(|&(_, w)| i64::from(w)).sum();
    if weight_sum == 0 {
        return Vec::new();
    }

    let total = i64::from(total);
    let mut shares: Vec<(usize, i32)> = weights
        .iter()
        .map(|&(i, w)| (i, (total * i64::from(w) / weight_sum) as i32))
        .collect();

    let assigned: i64 = shares.iter().map(|&(_, s)| i64::from(s)).sum();
    let leftover = (total - assigned) as usize;
    for share in shares.iter_mut().take(leftover) {
        share.1 += 1;
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn dims(x0: i32, y0: i32, x1: i32, y1: i32) -> Dimensions {
        Dimensions::new(x0, y0, x1, y1)
    }

    #[test]
    fn basic_split_is_exact_half() {
        let root = LayoutBox::columns(vec![
            LayoutBox::window("left").weight(1),
            LayoutBox::window("right").weight(1),
        ]);
        let result = arrange(&root, dims(0, 0, 100, 10));

        assert_eq!(result.len(), 2);
        assert_eq!(result["left"], dims(0, 0, 50, 10));
        assert_eq!(result["right"], dims(50, 0, 100, 10));
    }

    #[test]
    fn fixed_plus_weighted() {
        let root = LayoutBox::rows(vec![
            LayoutBox::window("top").size(3),
            LayoutBox::window("body").weight(1),
        ]);
        let result = arrange(&root, dims(0, 0, 80, 24));

        assert_eq!(result["top"], dims(0, 0, 80, 3));
        assert_eq!(result["body"], dims(0, 3, 80, 24));
        assert_eq!(result["top"].height(), 3);
        assert_eq!(result["body"].height(), 21);
    }

    #[test]
    fn degenerate_terminal_yields_empty_map() {
        let root = LayoutBox::rows(vec![LayoutBox::window("only").weight(1)]);
        assert!(arrange(&root, dims(0, 0, 0, 0)).is_empty());
        assert!(arrange(&root, dims(0, 0, 80, 0)).is_empty());
        assert!(arrange(&root, dims(10, 10, 5, 20)).is_empty());
    }

    #[test]
    fn weighted_shares_stay_within_one_cell_and_sum_exactly() {
        let weight_sets: [&[u16]; 6] = [&[1, 1], &[2, 1], &[3, 2], &[5, 1], &[1, 1, 1], &[7, 3, 2, 1]];

        for weights in weight_sets {
            let children: Vec<LayoutBox> = weights
                .iter()
                .enumerate()
                .map(|(i, &w)| LayoutBox::window(format!("w{i}")).weight(w))
                .collect();
            let weight_sum: i32 = weights.iter().map(|&w| i32::from(w)).sum();

            for remaining in 0..=97 {
                let sizes = calc_sizes(&children, remaining, 0);
                assert_eq!(
                    sizes.iter().sum::<i32>(),
                    remaining,
                    "weights {weights:?}, remaining {remaining}"
                );
                for (size, &w) in sizes.iter().zip(weights) {
                    let floor = remaining * i32::from(w) / weight_sum;
                    assert!(
                        *size == floor || *size == floor + 1,
                        "weights {weights:?}, remaining {remaining}: got {size}, floor {floor}"
                    );
                }
            }
        }
    }

    #[test]
    fn leftover_cells_go_to_first_weighted_children() {
        let children = vec![
            LayoutBox::window("a").weight(1),
            LayoutBox::window("fixed").size(2),
            LayoutBox::window("b").weight(1),
            LayoutBox::window("c").weight(1),
        ];
        // 12 - 2 fixed = 10 over three equal weights: 3,3,3 + 1 leftover to "a"
        assert_eq!(calc_sizes(&children, 12, 0), vec![4, 2, 3, 3]);
    }

    #[test]
    fn leaves_tile_outer_rectangle() {
        let root = LayoutBox::rows(vec![
            LayoutBox::window("status").size(2),
            LayoutBox::columns(vec![
                LayoutBox::window("messages").weight(3),
                LayoutBox::window("debug").weight(2),
            ])
            .weight(1),
            LayoutBox::window("input").size(4),
        ]);
        let outer = dims(0, 0, 117, 41);
        let result = arrange(&root, outer);

        let total: i64 = result.values().map(Dimensions::area).sum();
        assert_eq!(total, outer.area());

        let rects: Vec<_> = result.values().collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn conservation_holds_when_fixed_sizes_overflow() {
        let root = LayoutBox::rows(vec![
            LayoutBox::window("a").size(10),
            LayoutBox::window("b").size(10),
            LayoutBox::window("c").weight(1),
        ]);
        let outer = dims(0, 0, 20, 15);
        let result = arrange(&root, outer);

        assert_eq!(result["a"], dims(0, 0, 20, 10));
        assert_eq!(result["b"], dims(0, 10, 20, 15));
        assert!(!result.contains_key("c"));

        let total: i64 = result.values().map(Dimensions::area).sum();
        assert!(total <= outer.area());
    }

    #[test]
    fn spacing_reserves_separator_cells() {
        let root = LayoutBox::columns(vec![
            LayoutBox::window("left").weight(1),
            LayoutBox::window("right").weight(1),
        ])
        .spacing(1);
        let result = arrange(&root, dims(0, 0, 21, 5));

        assert_eq!(result["left"], dims(0, 0, 10, 5));
        assert_eq!(result["right"], dims(11, 0, 21, 5));
    }

    #[test]
    fn box_without_size_or_weight_takes_nothing() {
        let root = LayoutBox::rows(vec![
            LayoutBox::window("ghost"),
            LayoutBox::window("body").weight(1),
        ]);
        let result = arrange(&root, dims(0, 0, 40, 10));

        assert!(!result.contains_key("ghost"));
        assert_eq!(result["body"], dims(0, 0, 40, 10));
    }

    #[test]
    fn nested_boxes_use_parent_rect_as_outer() {
        let root = LayoutBox::columns(vec![
            LayoutBox::window("side").size(20),
            LayoutBox::rows(vec![
                LayoutBox::window("main").weight(1),
                LayoutBox::window("input").size(3),
            ])
            .weight(1),
        ]);
        let result = arrange(&root, dims(5, 2, 105, 32));

        assert_eq!(result["side"], dims(5, 2, 25, 32));
        assert_eq!(result["main"], dims(25, 2, 105, 29));
        assert_eq!(result["input"], dims(25, 29, 105, 32));
    }

    #[test]
    fn conditional_children_see_own_size_and_run_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let root = LayoutBox::rows(vec![
            LayoutBox::window("header").size(4),
            LayoutBox::conditional(Direction::Column, move |width, height| {
                counter.fetch_add(1, Ordering::SeqCst);
                assert_eq!((width, height), (60, 16));
                if width < 80 {
                    vec![LayoutBox::window("narrow").weight(1)]
                } else {
                    vec![LayoutBox::window("wide").weight(1)]
                }
            })
            .weight(1),
        ]);

        let result = arrange(&root, dims(0, 0, 60, 20));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result["narrow"], dims(0, 4, 60, 20));
        assert!(!result.contains_key("wide"));
    }

    #[test]
    fn degenerate_branch_skips_conditional_evaluation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let root = LayoutBox::rows(vec![
            LayoutBox::window("all").size(10),
            LayoutBox::conditional(Direction::Row, move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                vec![LayoutBox::window("never").weight(1)]
            })
            .weight(1),
        ]);

        let result = arrange(&root, dims(0, 0, 30, 10));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn arrangement_is_idempotent() {
        let root = LayoutBox::conditional(Direction::Row, |width, _| {
            let side = if width > 90 { 2 } else { 1 };
            vec![
                LayoutBox::columns(vec![
                    LayoutBox::window("messages").weight(3),
                    LayoutBox::window("debug").weight(side),
                ])
                .weight(1),
                LayoutBox::window("input").size(4),
            ]
        });
        let outer = dims(0, 0, 133, 47);

        let first = arrange(&root, outer);
        let second = arrange(&root, outer);
        assert_eq!(first, second);
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn duplicate_window_keeps_first_rect() {
        let root = LayoutBox::rows(vec![
            LayoutBox::window("dup").size(2),
            LayoutBox::window("dup").weight(1),
        ]);
        let result = arrange(&root, dims(0, 0, 10, 10));
        assert_eq!(result["dup"], dims(0, 0, 10, 2));
    }
}
