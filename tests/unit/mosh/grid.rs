use super::*;

fn origins(blocks: &[Block]) -> Vec<(u32, u32)> {
    blocks.iter().map(|b| (b.x, b.y)).collect()
}

#[test]
fn initial_grid_is_x_major() {
    let grid = initial_grid(8, 8, 4);
    assert_eq!(origins(&grid), vec![(0, 0), (0, 4), (4, 0), (4, 4)]);
    assert!(grid.iter().all(|b| b.size == 4));
}

#[test]
fn initial_grid_covers_partial_edges_without_shrinking() {
    let grid = initial_grid(10, 5, 4);
    assert_eq!(
        origins(&grid),
        vec![(0, 0), (0, 4), (4, 0), (4, 4), (8, 0), (8, 4)]
    );
    assert!(grid.iter().all(|b| b.size == 4));
}

#[test]
fn block_larger_than_frame_yields_single_origin() {
    let grid = initial_grid(8, 8, 16);
    assert_eq!(grid, vec![Block::new(0, 0, 16)]);
}

#[test]
fn quadrants_follow_fixed_order() {
    let q = Block::new(8, 16, 8).quadrants(100, 100).collect::<Vec<_>>();
    assert_eq!(
        q,
        vec![
            Block::new(8, 16, 4),
            Block::new(12, 16, 4),
            Block::new(8, 20, 4),
            Block::new(12, 20, 4),
        ]
    );
}

#[test]
fn quadrants_drop_origins_outside_frame() {
    // Only the top-left quadrant's origin is inside a 10x10 frame.
    let q = Block::new(8, 8, 4).quadrants(10, 10).collect::<Vec<_>>();
    assert_eq!(q, vec![Block::new(8, 8, 2)]);

    // A quadrant whose origin is in bounds is kept even when its extent is not.
    let q = Block::new(0, 0, 8).quadrants(5, 5).collect::<Vec<_>>();
    assert_eq!(q.len(), 4);
}

#[test]
fn clip_shrinks_to_frame() {
    assert_eq!(Block::new(4, 4, 4).clip(6, 5), Some((4, 4, 6, 5)));
    assert_eq!(Block::new(0, 0, 4).clip(8, 8), Some((0, 0, 4, 4)));
    assert_eq!(Block::new(8, 0, 4).clip(8, 8), None);
}
