use super::*;

fn filled(width: u32, height: u32, channels: u8, f: impl Fn(u32, u32) -> u8) -> Frame {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            for _ in 0..channels {
                data.push(f(x, y));
            }
        }
    }
    Frame::new(width, height, channels, data).unwrap()
}

#[test]
fn copies_only_selected_blocks() {
    let mut base = Frame::zeroed(8, 8, 3).unwrap();
    let curr = filled(8, 8, 3, |x, y| (y * 8 + x) as u8 + 1);
    apply_updates(&mut base, &curr, &[Block::new(4, 0, 4)], 4).unwrap();

    for y in 0..8 {
        for x in 0..8 {
            let inside = x >= 4 && y < 4;
            let want = if inside { curr.pixel(x, y) } else { &[0, 0, 0][..] };
            assert_eq!(base.pixel(x, y), want, "pixel ({x},{y})");
        }
    }
}

#[test]
fn edge_blocks_are_clipped() {
    let mut base = Frame::zeroed(5, 5, 1).unwrap();
    let curr = filled(5, 5, 1, |_, _| 7);
    apply_updates(&mut base, &curr, &[Block::new(4, 4, 4)], 4).unwrap();
    let touched = base.data.iter().filter(|&&b| b == 7).count();
    assert_eq!(touched, 1);
    assert_eq!(base.pixel(4, 4), &[7]);
}

#[test]
fn copy_region_uses_division_size() {
    // Block records carry their own size, but the copied region is division_size wide.
    let mut base = Frame::zeroed(8, 8, 1).unwrap();
    let curr = filled(8, 8, 1, |_, _| 1);
    apply_updates(&mut base, &curr, &[Block::new(0, 0, 8)], 2).unwrap();
    assert_eq!(base.data.iter().filter(|&&b| b == 1).count(), 4);
}

#[test]
fn parallel_stripes_match_sequential() {
    let curr = filled(30, 17, 3, |x, y| (x * 7 + y * 13) as u8);
    let updates = [
        Block::new(0, 0, 3),
        Block::new(27, 0, 3),
        Block::new(9, 6, 3),
        Block::new(12, 6, 3),
        Block::new(3, 15, 3),
        Block::new(27, 15, 3),
    ];

    let mut seq = Frame::zeroed(30, 17, 3).unwrap();
    apply_updates(&mut seq, &curr, &updates, 3).unwrap();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap();
    let mut par = Frame::zeroed(30, 17, 3).unwrap();
    apply_updates_in(&mut par, &curr, &updates, 3, Some(&pool)).unwrap();

    assert_eq!(seq, par);
}

#[test]
fn parallel_rejects_unaligned_origins() {
    let curr = Frame::zeroed(8, 8, 1).unwrap();
    let mut base = Frame::zeroed(8, 8, 1).unwrap();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .build()
        .unwrap();
    let err = apply_updates_in(&mut base, &curr, &[Block::new(0, 1, 2)], 2, Some(&pool))
        .unwrap_err();
    assert!(matches!(err, MoshError::Validation(_)));
}

#[test]
fn geometry_mismatch_is_rejected() {
    let curr = Frame::zeroed(8, 8, 3).unwrap();
    let mut base = Frame::zeroed(8, 4, 3).unwrap();
    let err = apply_updates(&mut base, &curr, &[], 2).unwrap_err();
    assert!(matches!(err, MoshError::FrameGeometry(_)));
}
